//! Board orchestration business logic layer.
//!
//! Each operation is one logical request: resolve ownership, run the pure
//! authorization rules, persist the normalized payload, and (for goal
//! completion) run bingo detection over the board's full goal set.

use chrono::{NaiveDateTime, Utc};
use derive_getters::Getters;
use tracing::{debug, info, instrument, warn};

use crate::db::{
    Board, BoardChangeset, BoardRepository, Goal, GoalChangeset, NewBoard, NewGoal,
};
use crate::error::Error;
use crate::rules::{
    self, CellStatus, FREE_SPACE_POSITION, GoalUpdate, GoalView, LineKind,
};

/// Result of a goal update, including any newly completed line.
#[derive(Debug, Clone, Getters)]
pub struct GoalUpdateOutcome {
    /// The updated goal row.
    goal: Goal,
    /// Kind of line completed by this update, if any.
    bingo: Option<LineKind>,
    /// Whether every cell on the board is now completed.
    board_complete: bool,
}

impl GoalUpdateOutcome {
    /// Consumes the outcome into its parts.
    pub fn into_parts(self) -> (Goal, Option<LineKind>, bool) {
        (self.goal, self.bingo, self.board_complete)
    }
}

/// Service layer for board and goal operations.
///
/// Wraps [`BoardRepository`] with ownership checks, the state-machine
/// rules, and bingo detection. Identity arrives as an opaque user id
/// already resolved by the caller.
#[derive(Debug, Clone)]
pub struct BoardService {
    repository: BoardRepository,
}

impl BoardService {
    /// Creates a new board service backed by the given repository.
    #[instrument(skip(repository))]
    pub fn new(repository: BoardRepository) -> Self {
        info!("Creating BoardService");
        Self { repository }
    }

    /// Returns the underlying repository.
    pub fn repository(&self) -> &BoardRepository {
        &self.repository
    }

    /// Loads a board and verifies the acting identity owns it.
    #[instrument(skip(self))]
    fn owned_board(&self, user_id: &str, board_id: i32) -> Result<Board, Error> {
        let board = self
            .repository
            .get_board(board_id)?
            .ok_or_else(|| Error::not_found("Board not found"))?;

        if board.user_id() != user_id {
            warn!(board_id, "Identity does not own board");
            return Err(Error::access_denied("Access denied"));
        }

        Ok(board)
    }

    /// Creates a board, optionally pre-seeded with a center free space.
    ///
    /// Free-space seeding is best effort: a seeding failure is logged and
    /// the board is returned anyway, usable without its free space.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for a bad title or year, or a store
    /// error.
    #[instrument(skip(self, title))]
    pub fn create_board(
        &self,
        user_id: &str,
        title: &str,
        year: i32,
        include_free_space: bool,
    ) -> Result<Board, Error> {
        let draft = rules::validate_board_fields(title, year)?;
        let board =
            self.repository
                .create_board(NewBoard::new(user_id.to_string(), draft.title, draft.year))?;

        if include_free_space {
            let now = Self::now();
            let free_space = NewGoal::new(
                *board.id(),
                FREE_SPACE_POSITION,
                "FREE SPACE".to_string(),
                true,
                Some(now),
                true,
            );
            if let Err(e) = self.repository.create_goal(free_space) {
                warn!(board_id = board.id(), error = %e, "Failed to seed free space, board remains usable");
            }
        }

        info!(board_id = board.id(), "Board created");
        Ok(board)
    }

    /// Updates a board's title and year. Owner only.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`], [`Error::AccessDenied`],
    /// [`Error::Validation`], or a store error.
    #[instrument(skip(self, title))]
    pub fn update_board(
        &self,
        user_id: &str,
        board_id: i32,
        title: &str,
        year: i32,
    ) -> Result<Board, Error> {
        self.owned_board(user_id, board_id)?;
        let draft = rules::validate_board_fields(title, year)?;
        let changes = BoardChangeset::new(draft.title, draft.year, Self::now());
        Ok(self.repository.update_board(board_id, changes)?)
    }

    /// Deletes a board. The store cascades deletion to its goals.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`], [`Error::AccessDenied`], or a store
    /// error.
    #[instrument(skip(self))]
    pub fn delete_board(&self, user_id: &str, board_id: i32) -> Result<(), Error> {
        self.owned_board(user_id, board_id)?;
        Ok(self.repository.delete_board(board_id)?)
    }

    /// Changes a board's lock state.
    ///
    /// Locking requires all 25 goals to exist; unlocking is always
    /// authorized.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalTransition`] naming the shortfall when
    /// locking an unfilled board, plus the usual ownership errors.
    #[instrument(skip(self))]
    pub fn set_board_lock(
        &self,
        user_id: &str,
        board_id: i32,
        locked: bool,
    ) -> Result<bool, Error> {
        self.owned_board(user_id, board_id)?;

        let goal_count = self.repository.count_goals(board_id)?;
        let authorized = rules::authorize_lock_change(locked, goal_count)?;

        let board = self.repository.set_locked(board_id, authorized)?;
        info!(board_id, locked = board.locked(), "Board lock changed");
        Ok(*board.locked())
    }

    /// Lists the boards owned by a user.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    #[instrument(skip(self))]
    pub fn list_boards(&self, user_id: &str) -> Result<Vec<Board>, Error> {
        Ok(self.repository.list_boards(user_id)?)
    }

    /// Fetches a board and its goals. Owner only.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`], [`Error::AccessDenied`], or a store
    /// error.
    #[instrument(skip(self))]
    pub fn get_board(&self, user_id: &str, board_id: i32) -> Result<(Board, Vec<Goal>), Error> {
        let board = self.owned_board(user_id, board_id)?;
        let goals = self.repository.goals_for_board(board_id)?;
        Ok((board, goals))
    }

    /// Creates a goal on a board. Owner only.
    ///
    /// A free-space goal is created already completed. A duplicate
    /// position surfaces as [`Error::Conflict`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`], [`Error::Conflict`], the usual
    /// ownership errors, or a store error.
    #[instrument(skip(self, text))]
    pub fn create_goal(
        &self,
        user_id: &str,
        board_id: i32,
        position: i32,
        text: &str,
        is_free_space: bool,
    ) -> Result<Goal, Error> {
        self.owned_board(user_id, board_id)?;

        let draft = rules::validate_new_goal(position, text, is_free_space, Self::now())?;
        let goal = self.repository.create_goal(NewGoal::from_draft(board_id, draft))?;

        info!(goal_id = goal.id(), board_id, position, "Goal created");
        Ok(goal)
    }

    /// Applies a partial update to a goal. Owner only.
    ///
    /// The state machine decides legality from the board's lock state and
    /// the goal's free-space flag. When the request set `completed = true`,
    /// the bingo detector runs over the board's full goal set and the
    /// outcome carries any newly completed line and the board-complete
    /// flag.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalTransition`] or [`Error::Validation`] for
    /// rejected mutations, plus the usual ownership errors.
    #[instrument(skip(self, update))]
    pub fn update_goal(
        &self,
        user_id: &str,
        goal_id: i32,
        update: GoalUpdate,
    ) -> Result<GoalUpdateOutcome, Error> {
        let goal = self
            .repository
            .get_goal(goal_id)?
            .ok_or_else(|| Error::not_found("Goal not found"))?;
        let board = self.owned_board(user_id, *goal.board_id())?;

        let now = Self::now();
        let view = GoalView::new(*goal.is_free_space(), *board.locked());
        let patch = rules::authorize_goal_mutation(view, &update, now)?;

        let updated = self
            .repository
            .update_goal(goal_id, GoalChangeset::from_patch(patch, now))?;

        // Detection runs only when this request completed the goal; the
        // detector itself is level-triggered.
        let (bingo, board_complete) = if update.completed == Some(true) {
            let cells = self.board_cells(*updated.board_id())?;
            let bingo = rules::detect_new_line(&cells, *updated.position())?;
            let complete = rules::is_board_complete(&cells);
            debug!(goal_id, ?bingo, complete, "Detection complete");
            (bingo, complete)
        } else {
            (None, false)
        };

        info!(goal_id, ?bingo, board_complete, "Goal updated");
        Ok(GoalUpdateOutcome {
            goal: updated,
            bingo,
            board_complete,
        })
    }

    /// Deletes a goal. Owner only; free spaces are permanent and locked
    /// boards only permit completion toggles.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalTransition`] for a free space or a locked
    /// board, plus the usual ownership errors.
    #[instrument(skip(self))]
    pub fn delete_goal(&self, user_id: &str, goal_id: i32) -> Result<(), Error> {
        let goal = self
            .repository
            .get_goal(goal_id)?
            .ok_or_else(|| Error::not_found("Goal not found"))?;
        let board = self.owned_board(user_id, *goal.board_id())?;

        rules::authorize_goal_deletion(GoalView::new(*goal.is_free_space(), *board.locked()))?;

        self.repository.delete_goal(goal_id)?;
        info!(goal_id, "Goal deleted");
        Ok(())
    }

    /// Loads the completion snapshot of a board's goals.
    fn board_cells(&self, board_id: i32) -> Result<Vec<CellStatus>, Error> {
        let goals = self.repository.goals_for_board(board_id)?;
        Ok(goals.iter().map(Goal::cell_status).collect())
    }

    fn now() -> NaiveDateTime {
        Utc::now().naive_utc()
    }
}
