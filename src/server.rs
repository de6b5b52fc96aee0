//! HTTP API for boards and goals.
//!
//! The handlers own HTTP semantics only: identity arrives as an opaque,
//! already-authenticated user id in the `x-user-id` header, and every
//! decision is delegated to [`BoardService`].

use axum::body::Body;
use axum::extract::{FromRequestParts, Path, State};
use axum::http::Request;
use axum::http::request::Parts;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tracing::{debug, info, instrument};

use crate::db::{Board, Goal};
use crate::error::Error;
use crate::rules::{GoalUpdate, LineKind};
use crate::service::BoardService;

/// Header carrying the opaque authenticated user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Board orchestration service.
    pub service: BoardService,
}

/// The authenticated identity resolved for a request.
///
/// Extraction fails with [`Error::Unauthenticated`] when the header is
/// missing or blank.
#[derive(Debug, Clone)]
pub struct Identity(pub String);

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(Error::Unauthenticated)?;

        Ok(Identity(user_id.to_string()))
    }
}

/// Request for creating a board.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBoardRequest {
    /// Board title.
    pub title: String,
    /// Board year.
    pub year: i32,
    /// Pre-seed the center cell as a free space.
    #[serde(default)]
    pub include_free_space: bool,
}

/// Request for updating a board's title and year.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBoardRequest {
    /// Target board id.
    pub board_id: i32,
    /// New title.
    pub title: String,
    /// New year.
    pub year: i32,
}

/// Request for deleting a board.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteBoardRequest {
    /// Target board id.
    pub board_id: i32,
}

/// Request for changing a board's lock state.
#[derive(Debug, Clone, Deserialize)]
pub struct ToggleLockRequest {
    /// Target board id.
    pub board_id: i32,
    /// Requested lock state.
    pub locked: bool,
}

/// Request for creating a goal.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGoalRequest {
    /// Owning board id.
    pub board_id: i32,
    /// Grid position (0-24).
    pub position: i32,
    /// Goal text.
    pub text: String,
    /// Mark the goal as the free space.
    #[serde(default)]
    pub is_free_space: bool,
}

/// Request for a partial goal update. Absent fields are left unchanged.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateGoalRequest {
    /// Target goal id.
    pub goal_id: i32,
    /// New goal text.
    pub text: Option<String>,
    /// New completion state.
    pub completed: Option<bool>,
    /// New free-space flag.
    pub is_free_space: Option<bool>,
}

/// Request for deleting a goal.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteGoalRequest {
    /// Target goal id.
    pub goal_id: i32,
}

/// Response carrying a single board.
#[derive(Debug, Serialize)]
pub struct BoardResponse {
    /// Always true on the success path.
    pub success: bool,
    /// The affected board.
    pub board: Board,
}

/// Response carrying a user's boards.
#[derive(Debug, Serialize)]
pub struct BoardListResponse {
    /// Always true on the success path.
    pub success: bool,
    /// Boards owned by the requesting user.
    pub boards: Vec<Board>,
}

/// Response carrying a board with its goals.
#[derive(Debug, Serialize)]
pub struct BoardDetailResponse {
    /// Always true on the success path.
    pub success: bool,
    /// The requested board.
    pub board: Board,
    /// The board's goals, ordered by position.
    pub goals: Vec<Goal>,
}

/// Response carrying a single goal.
#[derive(Debug, Serialize)]
pub struct GoalResponse {
    /// Always true on the success path.
    pub success: bool,
    /// The affected goal.
    pub goal: Goal,
}

/// Response for a goal update, including detection results.
#[derive(Debug, Serialize)]
pub struct UpdateGoalResponse {
    /// Always true on the success path.
    pub success: bool,
    /// The updated goal.
    pub goal: Goal,
    /// Kind of line completed by this update, if any.
    pub bingo_type: Option<LineKind>,
    /// Whether every cell on the board is now completed.
    pub board_complete: bool,
}

/// Response for a lock change.
#[derive(Debug, Serialize)]
pub struct ToggleLockResponse {
    /// Always true on the success path.
    pub success: bool,
    /// The persisted lock state.
    pub locked: bool,
}

/// Response for operations with no payload.
#[derive(Debug, Serialize)]
pub struct AckResponse {
    /// Always true on the success path.
    pub success: bool,
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/boards", get(list_boards))
        .route("/api/boards/{id}", get(get_board))
        .route("/api/boards/create", post(create_board))
        .route("/api/boards/update", post(update_board))
        .route("/api/boards/delete", post(delete_board))
        .route("/api/boards/toggle-lock", post(toggle_lock))
        .route("/api/goals/create", post(create_goal))
        .route("/api/goals/update", post(update_goal))
        .route("/api/goals/delete", post(delete_goal))
        .layer(ServiceBuilder::new().map_request(|req: Request<Body>| {
            info!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
            req
        }))
        .with_state(state)
}

/// Lists the requesting user's boards.
#[instrument(skip(state, identity), fields(user_id = %identity.0))]
async fn list_boards(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<BoardListResponse>, Error> {
    let boards = state.service.list_boards(&identity.0)?;
    Ok(Json(BoardListResponse {
        success: true,
        boards,
    }))
}

/// Fetches one board with its goals.
#[instrument(skip(state, identity), fields(user_id = %identity.0, board_id))]
async fn get_board(
    State(state): State<AppState>,
    identity: Identity,
    Path(board_id): Path<i32>,
) -> Result<Json<BoardDetailResponse>, Error> {
    let (board, goals) = state.service.get_board(&identity.0, board_id)?;
    Ok(Json(BoardDetailResponse {
        success: true,
        board,
        goals,
    }))
}

/// Creates a board.
#[instrument(skip(state, identity, req), fields(user_id = %identity.0, year = req.year))]
async fn create_board(
    State(state): State<AppState>,
    identity: Identity,
    Json(req): Json<CreateBoardRequest>,
) -> Result<Json<BoardResponse>, Error> {
    debug!(include_free_space = req.include_free_space, "Creating board");
    let board =
        state
            .service
            .create_board(&identity.0, &req.title, req.year, req.include_free_space)?;
    Ok(Json(BoardResponse {
        success: true,
        board,
    }))
}

/// Updates a board's title and year.
#[instrument(skip(state, identity, req), fields(user_id = %identity.0, board_id = req.board_id))]
async fn update_board(
    State(state): State<AppState>,
    identity: Identity,
    Json(req): Json<UpdateBoardRequest>,
) -> Result<Json<BoardResponse>, Error> {
    let board = state
        .service
        .update_board(&identity.0, req.board_id, &req.title, req.year)?;
    Ok(Json(BoardResponse {
        success: true,
        board,
    }))
}

/// Deletes a board and, via the store cascade, its goals.
#[instrument(skip(state, identity, req), fields(user_id = %identity.0, board_id = req.board_id))]
async fn delete_board(
    State(state): State<AppState>,
    identity: Identity,
    Json(req): Json<DeleteBoardRequest>,
) -> Result<Json<AckResponse>, Error> {
    state.service.delete_board(&identity.0, req.board_id)?;
    Ok(Json(AckResponse { success: true }))
}

/// Changes a board's lock state.
#[instrument(skip(state, identity, req), fields(user_id = %identity.0, board_id = req.board_id, locked = req.locked))]
async fn toggle_lock(
    State(state): State<AppState>,
    identity: Identity,
    Json(req): Json<ToggleLockRequest>,
) -> Result<Json<ToggleLockResponse>, Error> {
    let locked = state
        .service
        .set_board_lock(&identity.0, req.board_id, req.locked)?;
    Ok(Json(ToggleLockResponse {
        success: true,
        locked,
    }))
}

/// Creates a goal.
#[instrument(skip(state, identity, req), fields(user_id = %identity.0, board_id = req.board_id, position = req.position))]
async fn create_goal(
    State(state): State<AppState>,
    identity: Identity,
    Json(req): Json<CreateGoalRequest>,
) -> Result<Json<GoalResponse>, Error> {
    let goal = state.service.create_goal(
        &identity.0,
        req.board_id,
        req.position,
        &req.text,
        req.is_free_space,
    )?;
    Ok(Json(GoalResponse {
        success: true,
        goal,
    }))
}

/// Applies a partial goal update and reports any completed line.
#[instrument(skip(state, identity, req), fields(user_id = %identity.0, goal_id = req.goal_id))]
async fn update_goal(
    State(state): State<AppState>,
    identity: Identity,
    Json(req): Json<UpdateGoalRequest>,
) -> Result<Json<UpdateGoalResponse>, Error> {
    let update = GoalUpdate {
        text: req.text,
        completed: req.completed,
        is_free_space: req.is_free_space,
    };
    let outcome = state.service.update_goal(&identity.0, req.goal_id, update)?;
    let (goal, bingo_type, board_complete) = outcome.into_parts();
    Ok(Json(UpdateGoalResponse {
        success: true,
        goal,
        bingo_type,
        board_complete,
    }))
}

/// Deletes a goal.
#[instrument(skip(state, identity, req), fields(user_id = %identity.0, goal_id = req.goal_id))]
async fn delete_goal(
    State(state): State<AppState>,
    identity: Identity,
    Json(req): Json<DeleteGoalRequest>,
) -> Result<Json<AckResponse>, Error> {
    state.service.delete_goal(&identity.0, req.goal_id)?;
    Ok(Json(AckResponse { success: true }))
}
