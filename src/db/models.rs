//! Database models for boards and goals.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use serde::Serialize;

use crate::db::schema;
use crate::rules::{CellStatus, GoalDraft, GoalPatch};

/// Bingo board database model: a user-owned 5x5 grid of yearly goals.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters, Serialize)]
#[diesel(table_name = schema::boards)]
pub struct Board {
    id: i32,
    user_id: String,
    title: String,
    year: i32,
    locked: bool,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

/// Insertable board model for creating new boards.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::boards)]
pub struct NewBoard {
    user_id: String,
    title: String,
    year: i32,
}

/// Goal database model: one cell of a board.
#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable, Getters, Serialize)]
#[diesel(table_name = schema::goals)]
#[diesel(belongs_to(Board))]
pub struct Goal {
    id: i32,
    board_id: i32,
    position: i32,
    text: String,
    completed: bool,
    completed_at: Option<NaiveDateTime>,
    is_free_space: bool,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl Goal {
    /// Completion snapshot of this goal for the bingo detector.
    pub fn cell_status(&self) -> CellStatus {
        CellStatus::new(self.position, self.completed)
    }
}

/// Insertable goal model for creating new goals.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::goals)]
pub struct NewGoal {
    board_id: i32,
    position: i32,
    text: String,
    completed: bool,
    completed_at: Option<NaiveDateTime>,
    is_free_space: bool,
}

impl NewGoal {
    /// Builds an insertable goal from a validated draft.
    pub fn from_draft(board_id: i32, draft: GoalDraft) -> Self {
        Self::new(
            board_id,
            draft.position,
            draft.text,
            draft.completed,
            draft.completed_at,
            draft.is_free_space,
        )
    }
}

/// Typed optional-field update for a goal row.
///
/// `None` fields are left untouched by the update statement; the nested
/// option on `completed_at` distinguishes "unchanged" from "set NULL".
#[derive(Debug, Clone, AsChangeset, new)]
#[diesel(table_name = schema::goals)]
pub struct GoalChangeset {
    text: Option<String>,
    completed: Option<bool>,
    completed_at: Option<Option<NaiveDateTime>>,
    is_free_space: Option<bool>,
    updated_at: NaiveDateTime,
}

impl GoalChangeset {
    /// Builds a changeset from an authorized patch.
    pub fn from_patch(patch: GoalPatch, now: NaiveDateTime) -> Self {
        Self::new(
            patch.text,
            patch.completed,
            patch.completed_at,
            patch.is_free_space,
            now,
        )
    }
}

/// Typed update for a board's title and year.
#[derive(Debug, Clone, AsChangeset, new)]
#[diesel(table_name = schema::boards)]
pub struct BoardChangeset {
    title: String,
    year: i32,
    updated_at: NaiveDateTime,
}
