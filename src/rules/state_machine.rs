//! Mutation legality rules for boards and goals.
//!
//! Pure decision functions: each takes the persisted facts it depends on as
//! explicit inputs (including the current time) and returns either a
//! normalized payload for the caller to persist or a typed rejection. No
//! function here touches storage.

use chrono::NaiveDateTime;
use derive_new::new;
use tracing::instrument;

use super::bingo::CELL_COUNT;
use crate::error::Error;

/// Lowest year accepted for a board.
pub const MIN_YEAR: i32 = 1900;

/// Highest year accepted for a board.
pub const MAX_YEAR: i32 = 2100;

/// Center cell of the 5x5 grid, the conventional free-space position.
pub const FREE_SPACE_POSITION: i32 = 12;

/// The persisted facts about a goal that the mutation rules depend on.
#[derive(Debug, Clone, Copy, new)]
pub struct GoalView {
    /// Whether the goal is marked as the free space.
    pub is_free_space: bool,
    /// Whether the owning board is locked.
    pub board_locked: bool,
}

/// A requested partial update to a goal. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct GoalUpdate {
    /// New goal text.
    pub text: Option<String>,
    /// New completion state.
    pub completed: Option<bool>,
    /// New free-space flag.
    pub is_free_space: Option<bool>,
}

/// An authorized, normalized goal update ready to persist.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GoalPatch {
    /// Trimmed replacement text, if the text changes.
    pub text: Option<String>,
    /// New completion state, if it changes.
    pub completed: Option<bool>,
    /// Outer `None` leaves the column unchanged; inner `None` clears it.
    pub completed_at: Option<Option<NaiveDateTime>>,
    /// New free-space flag, if it changes.
    pub is_free_space: Option<bool>,
}

/// A validated goal ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalDraft {
    /// Grid position (0-24).
    pub position: i32,
    /// Trimmed goal text.
    pub text: String,
    /// Initial completion state (true for a free space).
    pub completed: bool,
    /// Completion timestamp, set iff `completed`.
    pub completed_at: Option<NaiveDateTime>,
    /// Whether the goal is the free space.
    pub is_free_space: bool,
}

/// Validated board title and year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardDraft {
    /// Trimmed board title.
    pub title: String,
    /// Board year within [`MIN_YEAR`]..=[`MAX_YEAR`].
    pub year: i32,
}

/// Decides whether a requested goal mutation is legal and normalizes it.
///
/// Rules, in order:
/// 1. Free-space text is immutable unless the same request clears the
///    free-space flag.
/// 2. Completion state may only change on a locked board.
/// 3. Text and the free-space flag may only change on an unlocked board.
///
/// On acceptance, marking a goal as free space forces `completed = true`
/// with `completed_at = now`, overriding any caller-supplied completion
/// state; a completion change stamps or clears `completed_at`; text is
/// trimmed and must be non-empty.
///
/// # Errors
///
/// Returns [`Error::IllegalTransition`] for rule violations and
/// [`Error::Validation`] for empty text.
#[instrument(skip(update))]
pub fn authorize_goal_mutation(
    goal: GoalView,
    update: &GoalUpdate,
    now: NaiveDateTime,
) -> Result<GoalPatch, Error> {
    if goal.is_free_space && update.text.is_some() && update.is_free_space != Some(false) {
        return Err(Error::illegal_transition(
            "Cannot edit free space goal text. Unmark it as free space first.",
        ));
    }

    if !goal.board_locked && update.completed.is_some() {
        return Err(Error::illegal_transition(
            "Goal completion can only be changed on locked boards. Lock the board first.",
        ));
    }

    if goal.board_locked && (update.text.is_some() || update.is_free_space.is_some()) {
        return Err(Error::illegal_transition(
            "Cannot edit goal text or free space status on locked boards.",
        ));
    }

    let mut patch = GoalPatch::default();

    if let Some(text) = &update.text {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(Error::validation("Goal text cannot be empty"));
        }
        patch.text = Some(trimmed.to_string());
    }

    if let Some(completed) = update.completed {
        patch.completed = Some(completed);
        patch.completed_at = Some(completed.then_some(now));
    }

    if let Some(is_free_space) = update.is_free_space {
        patch.is_free_space = Some(is_free_space);
        // Marking as free space auto-completes the goal, regardless of any
        // caller-supplied completion state.
        if is_free_space {
            patch.completed = Some(true);
            patch.completed_at = Some(Some(now));
        }
    }

    Ok(patch)
}

/// Decides whether a board lock change is legal.
///
/// Locking requires exactly [`CELL_COUNT`] goals on the board; the
/// rejection names the shortfall. Unlocking is always authorized.
///
/// # Errors
///
/// Returns [`Error::IllegalTransition`] when locking with fewer than 25
/// goals.
#[instrument]
pub fn authorize_lock_change(requested: bool, goal_count: i64) -> Result<bool, Error> {
    if requested && goal_count != CELL_COUNT as i64 {
        let missing = CELL_COUNT as i64 - goal_count;
        return Err(Error::illegal_transition(format!(
            "Cannot lock board. Please add {missing} more goal(s)."
        )));
    }
    Ok(requested)
}

/// Validates and normalizes a new goal before insertion.
///
/// Position must be within the grid, text non-empty after trimming, and a
/// free-space goal is created already completed with `completed_at = now`.
///
/// # Errors
///
/// Returns [`Error::Validation`] for an out-of-range position or empty
/// text.
#[instrument(skip(text))]
pub fn validate_new_goal(
    position: i32,
    text: &str,
    is_free_space: bool,
    now: NaiveDateTime,
) -> Result<GoalDraft, Error> {
    if !(0..CELL_COUNT as i32).contains(&position) {
        return Err(Error::validation("Position must be between 0 and 24"));
    }

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(Error::validation("Goal text is required"));
    }

    Ok(GoalDraft {
        position,
        text: trimmed.to_string(),
        completed: is_free_space,
        completed_at: is_free_space.then_some(now),
        is_free_space,
    })
}

/// Decides whether a goal may be deleted.
///
/// The free space is permanent once created, and a locked board only
/// permits completion toggles, so deletion requires an unlocked board.
///
/// # Errors
///
/// Returns [`Error::IllegalTransition`] for either violation.
#[instrument]
pub fn authorize_goal_deletion(goal: GoalView) -> Result<(), Error> {
    if goal.is_free_space {
        return Err(Error::illegal_transition("Cannot delete free space goal"));
    }
    if goal.board_locked {
        return Err(Error::illegal_transition(
            "Cannot delete goals on a locked board. Unlock the board first.",
        ));
    }
    Ok(())
}

/// Validates and normalizes a board's title and year.
///
/// # Errors
///
/// Returns [`Error::Validation`] for an empty title or a year outside
/// [`MIN_YEAR`]..=[`MAX_YEAR`].
#[instrument(skip(title))]
pub fn validate_board_fields(title: &str, year: i32) -> Result<BoardDraft, Error> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(Error::validation("Board title is required"));
    }

    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(Error::validation(format!(
            "Valid year is required ({MIN_YEAR}-{MAX_YEAR})"
        )));
    }

    Ok(BoardDraft {
        title: trimmed.to_string(),
        year,
    })
}
