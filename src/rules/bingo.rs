//! Bingo line and board completion detection.

use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Error;

/// Cells along one side of a board.
pub const GRID_SIZE: usize = 5;

/// Total cells on a board.
pub const CELL_COUNT: usize = GRID_SIZE * GRID_SIZE;

/// Positions on the main diagonal (top-left to bottom-right).
const MAIN_DIAGONAL: [usize; GRID_SIZE] = [0, 6, 12, 18, 24];

/// Positions on the anti-diagonal (top-right to bottom-left).
const ANTI_DIAGONAL: [usize; GRID_SIZE] = [4, 8, 12, 16, 20];

/// Kind of completed line on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    /// A full row.
    Row,
    /// A full column.
    Column,
    /// The main diagonal (positions 0, 6, 12, 18, 24).
    Diagonal,
    /// The anti-diagonal (positions 4, 8, 12, 16, 20).
    AntiDiagonal,
}

/// Completion snapshot of one cell, detached from storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, new)]
pub struct CellStatus {
    /// Grid position (0-24, row-major).
    pub position: i32,
    /// Whether the goal at this position is completed.
    pub completed: bool,
}

/// Builds the row-major completion grid from a full cell snapshot.
///
/// Rejects partial sets, duplicate positions, and out-of-range positions:
/// line evaluation over an incomplete grid is undefined, so callers must
/// supply all 25 cells.
fn completion_grid(cells: &[CellStatus]) -> Result<[bool; CELL_COUNT], Error> {
    if cells.len() != CELL_COUNT {
        return Err(Error::validation(format!(
            "Expected {CELL_COUNT} goals, got {}",
            cells.len()
        )));
    }

    let mut grid = [false; CELL_COUNT];
    let mut seen = [false; CELL_COUNT];
    for cell in cells {
        let pos = usize::try_from(cell.position)
            .ok()
            .filter(|p| *p < CELL_COUNT)
            .ok_or_else(|| {
                Error::validation(format!("Goal position {} is out of range", cell.position))
            })?;
        if seen[pos] {
            return Err(Error::validation(format!(
                "Duplicate goal at position {pos}"
            )));
        }
        seen[pos] = true;
        grid[pos] = cell.completed;
    }

    Ok(grid)
}

/// Detects a newly completed line through `changed_position`.
///
/// Given the full set of a board's 25 cells and the position whose
/// completion just flipped to true, returns the kind of one complete line
/// containing that position, or `None` if no such line exists. Only the
/// row, the column, and (when the position lies on one) the diagonals
/// through `changed_position` are checked.
///
/// When several lines complete at once, exactly one kind is reported:
/// row beats column, column beats the main diagonal, and the main diagonal
/// beats the anti-diagonal.
///
/// The function is level-triggered: it answers "is a line through this
/// position complete", not "was this the completing change". Callers must
/// gate on the completion transition to avoid re-announcing a bingo.
///
/// # Errors
///
/// Returns a validation error if the snapshot is not a full, well-formed
/// set of 25 cells or `changed_position` is out of range.
#[instrument(skip(cells))]
pub fn detect_new_line(
    cells: &[CellStatus],
    changed_position: i32,
) -> Result<Option<LineKind>, Error> {
    let grid = completion_grid(cells)?;

    let pos = usize::try_from(changed_position)
        .ok()
        .filter(|p| *p < CELL_COUNT)
        .ok_or_else(|| {
            Error::validation(format!(
                "Changed position {changed_position} is out of range"
            ))
        })?;

    let row = pos / GRID_SIZE;
    let col = pos % GRID_SIZE;

    if (0..GRID_SIZE).all(|c| grid[row * GRID_SIZE + c]) {
        return Ok(Some(LineKind::Row));
    }
    if (0..GRID_SIZE).all(|r| grid[r * GRID_SIZE + col]) {
        return Ok(Some(LineKind::Column));
    }
    if MAIN_DIAGONAL.contains(&pos) && MAIN_DIAGONAL.iter().all(|&p| grid[p]) {
        return Ok(Some(LineKind::Diagonal));
    }
    if ANTI_DIAGONAL.contains(&pos) && ANTI_DIAGONAL.iter().all(|&p| grid[p]) {
        return Ok(Some(LineKind::AntiDiagonal));
    }

    Ok(None)
}

/// Returns true iff all 25 positions are present and completed.
///
/// Partial or malformed snapshots are simply not complete boards, so this
/// never fails.
#[instrument(skip(cells))]
pub fn is_board_complete(cells: &[CellStatus]) -> bool {
    match completion_grid(cells) {
        Ok(grid) => grid.iter().all(|&completed| completed),
        Err(_) => false,
    }
}
