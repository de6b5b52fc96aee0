//! Database repository for boards and goals.

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument};

use crate::db::{
    Board, BoardChangeset, DbError, Goal, GoalChangeset, NewBoard, NewGoal, schema,
};

/// Embedded schema migrations, applied at startup.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Database repository for board and goal operations.
#[derive(Debug, Clone)]
pub struct BoardRepository {
    db_path: String,
}

impl BoardRepository {
    /// Creates a new repository connected to the database at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the path is invalid.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Result<Self, DbError> {
        info!(path = %db_path, "Creating BoardRepository");
        Ok(Self { db_path })
    }

    /// Establishes a database connection with foreign keys enforced.
    ///
    /// Cascade deletion of a board's goals relies on the foreign-key
    /// pragma, which sqlite scopes per connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.db_path)
            .map_err(|e| DbError::new(format!("Failed to connect to '{}': {}", self.db_path, e)))?;
        diesel::sql_query("PRAGMA foreign_keys = ON").execute(&mut conn)?;
        Ok(conn)
    }

    /// Applies any pending schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a migration fails.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(format!("Migration error: {}", e)))?;
        info!(count = applied.len(), "Migrations applied");
        Ok(())
    }

    /// Creates a new board.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, board))]
    pub fn create_board(&self, board: NewBoard) -> Result<Board, DbError> {
        debug!("Creating board");
        let mut conn = self.connection()?;

        let board = diesel::insert_into(schema::boards::table)
            .values(&board)
            .returning(Board::as_returning())
            .get_result(&mut conn)?;

        info!(board_id = board.id(), user_id = %board.user_id(), "Board created");
        Ok(board)
    }

    /// Gets a board by id. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn get_board(&self, board_id: i32) -> Result<Option<Board>, DbError> {
        debug!(board_id, "Looking up board");
        let mut conn = self.connection()?;

        let board = schema::boards::table
            .find(board_id)
            .first::<Board>(&mut conn)
            .optional()?;

        if board.is_none() {
            debug!(board_id, "Board not found");
        }

        Ok(board)
    }

    /// Lists all boards owned by a user, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn list_boards(&self, user_id: &str) -> Result<Vec<Board>, DbError> {
        debug!(user_id = %user_id, "Listing boards");
        let mut conn = self.connection()?;

        let boards = schema::boards::table
            .filter(schema::boards::user_id.eq(user_id))
            .order(schema::boards::created_at.desc())
            .load::<Board>(&mut conn)?;

        info!(user_id = %user_id, count = boards.len(), "Boards loaded");
        Ok(boards)
    }

    /// Updates a board's title and year.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, changes))]
    pub fn update_board(&self, board_id: i32, changes: BoardChangeset) -> Result<Board, DbError> {
        debug!(board_id, "Updating board");
        let mut conn = self.connection()?;

        let board = diesel::update(schema::boards::table.find(board_id))
            .set(&changes)
            .returning(Board::as_returning())
            .get_result(&mut conn)?;

        info!(board_id = board.id(), "Board updated");
        Ok(board)
    }

    /// Sets a board's locked flag.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn set_locked(&self, board_id: i32, locked: bool) -> Result<Board, DbError> {
        debug!(board_id, locked, "Setting board lock");
        let mut conn = self.connection()?;

        let board = diesel::update(schema::boards::table.find(board_id))
            .set(schema::boards::locked.eq(locked))
            .returning(Board::as_returning())
            .get_result(&mut conn)?;

        info!(board_id = board.id(), locked, "Board lock updated");
        Ok(board)
    }

    /// Deletes a board. Its goals are removed by the cascade constraint.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn delete_board(&self, board_id: i32) -> Result<(), DbError> {
        debug!(board_id, "Deleting board");
        let mut conn = self.connection()?;

        diesel::delete(schema::boards::table.find(board_id)).execute(&mut conn)?;

        info!(board_id, "Board deleted");
        Ok(())
    }

    /// Creates a new goal.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::UniqueViolation`] when a goal already exists at
    /// the same position on the board, or [`DbError`] for any other
    /// database error.
    #[instrument(skip(self, goal))]
    pub fn create_goal(&self, goal: NewGoal) -> Result<Goal, DbError> {
        debug!("Creating goal");
        let mut conn = self.connection()?;

        let goal = diesel::insert_into(schema::goals::table)
            .values(&goal)
            .returning(Goal::as_returning())
            .get_result(&mut conn)?;

        info!(
            goal_id = goal.id(),
            board_id = goal.board_id(),
            position = goal.position(),
            "Goal created"
        );
        Ok(goal)
    }

    /// Gets a goal by id. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn get_goal(&self, goal_id: i32) -> Result<Option<Goal>, DbError> {
        debug!(goal_id, "Looking up goal");
        let mut conn = self.connection()?;

        let goal = schema::goals::table
            .find(goal_id)
            .first::<Goal>(&mut conn)
            .optional()?;

        if goal.is_none() {
            debug!(goal_id, "Goal not found");
        }

        Ok(goal)
    }

    /// Loads all goals for a board, ordered by position.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn goals_for_board(&self, board_id: i32) -> Result<Vec<Goal>, DbError> {
        debug!(board_id, "Loading goals for board");
        let mut conn = self.connection()?;

        let goals = schema::goals::table
            .filter(schema::goals::board_id.eq(board_id))
            .order(schema::goals::position.asc())
            .load::<Goal>(&mut conn)?;

        debug!(board_id, count = goals.len(), "Goals loaded");
        Ok(goals)
    }

    /// Counts the goals on a board.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn count_goals(&self, board_id: i32) -> Result<i64, DbError> {
        debug!(board_id, "Counting goals");
        let mut conn = self.connection()?;

        let count = schema::goals::table
            .filter(schema::goals::board_id.eq(board_id))
            .count()
            .get_result(&mut conn)?;

        debug!(board_id, count, "Goals counted");
        Ok(count)
    }

    /// Applies an authorized changeset to a goal.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, changes))]
    pub fn update_goal(&self, goal_id: i32, changes: GoalChangeset) -> Result<Goal, DbError> {
        debug!(goal_id, "Updating goal");
        let mut conn = self.connection()?;

        let goal = diesel::update(schema::goals::table.find(goal_id))
            .set(&changes)
            .returning(Goal::as_returning())
            .get_result(&mut conn)?;

        info!(
            goal_id = goal.id(),
            completed = goal.completed(),
            "Goal updated"
        );
        Ok(goal)
    }

    /// Deletes a goal.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn delete_goal(&self, goal_id: i32) -> Result<(), DbError> {
        debug!(goal_id, "Deleting goal");
        let mut conn = self.connection()?;

        diesel::delete(schema::goals::table.find(goal_id)).execute(&mut conn)?;

        info!(goal_id, "Goal deleted");
        Ok(())
    }
}
