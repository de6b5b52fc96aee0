//! Pure decision core: mutation legality and bingo detection.

mod bingo;
mod state_machine;

pub use bingo::{CELL_COUNT, CellStatus, GRID_SIZE, LineKind, detect_new_line, is_board_complete};
pub use state_machine::{
    BoardDraft, FREE_SPACE_POSITION, GoalDraft, GoalPatch, GoalUpdate, GoalView, MAX_YEAR,
    MIN_YEAR, authorize_goal_deletion, authorize_goal_mutation, authorize_lock_change,
    validate_board_fields, validate_new_goal,
};
