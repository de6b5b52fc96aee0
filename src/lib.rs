//! Bingoal library - yearly-goal bingo boards with lock-state rules.
//!
//! A board is a user-owned 5x5 grid of yearly goals. Once all 25 cells are
//! filled the board may be locked, after which only completion state (not
//! text) may change; completing goals triggers bingo-line and full-board
//! detection.
//!
//! # Architecture
//!
//! - **Rules**: pure decision core - mutation legality conditioned on lock
//!   state and the free-space flag, plus line/completion detection
//! - **Db**: diesel/sqlite persistence for boards and goals
//! - **Service**: per-request orchestration - ownership, rules,
//!   persistence, detection
//! - **Server**: axum HTTP boundary with an opaque-identity extractor

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod db;
mod error;
mod rules;
mod server;
mod service;

// Public module declarations
pub mod cli;

// Crate-level exports - persistence
pub use db::{
    Board, BoardChangeset, BoardRepository, DbError, Goal, GoalChangeset, MIGRATIONS, NewBoard,
    NewGoal,
};

// Crate-level exports - error taxonomy
pub use error::Error;

// Crate-level exports - decision core
pub use rules::{
    BoardDraft, CELL_COUNT, CellStatus, FREE_SPACE_POSITION, GRID_SIZE, GoalDraft, GoalPatch,
    GoalUpdate, GoalView, LineKind, MAX_YEAR, MIN_YEAR, authorize_goal_deletion,
    authorize_goal_mutation, authorize_lock_change, detect_new_line, is_board_complete,
    validate_board_fields, validate_new_goal,
};

// Crate-level exports - orchestration
pub use service::{BoardService, GoalUpdateOutcome};

// Crate-level exports - HTTP boundary
pub use server::{AppState, Identity, USER_ID_HEADER, router};
