//! Database persistence layer for boards and goals.

mod error;
mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only

pub use error::DbError;
pub use models::{Board, BoardChangeset, Goal, GoalChangeset, NewBoard, NewGoal};
pub use repository::{BoardRepository, MIGRATIONS};
