//! End-to-end scenarios for the board service.

use std::collections::HashMap;

use tempfile::NamedTempFile;

use bingoal::{
    Board, BoardRepository, BoardService, Error, FREE_SPACE_POSITION, GoalUpdate, LineKind,
};

const OWNER: &str = "owner-1";
const STRANGER: &str = "stranger-1";

fn setup_service() -> (NamedTempFile, BoardService) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();

    let repo = BoardRepository::new(db_path).expect("Failed to create repository");
    repo.run_migrations().expect("Migrations failed");
    (db_file, BoardService::new(repo))
}

/// Creates a board pre-seeded with the free space, fills the remaining 24
/// cells, and returns the board plus a position -> goal id map.
fn full_board(service: &BoardService) -> (Board, HashMap<i32, i32>) {
    let board = service
        .create_board(OWNER, "2026 Goals", 2026, true)
        .expect("Create board failed");

    let mut ids = HashMap::new();
    for position in 0..25 {
        if position == FREE_SPACE_POSITION {
            continue;
        }
        let goal = service
            .create_goal(OWNER, *board.id(), position, &format!("goal {position}"), false)
            .expect("Create goal failed");
        ids.insert(position, *goal.id());
    }

    let (_, goals) = service
        .get_board(OWNER, *board.id())
        .expect("Get board failed");
    let free_space = goals
        .iter()
        .find(|g| *g.is_free_space())
        .expect("Free space missing");
    ids.insert(FREE_SPACE_POSITION, *free_space.id());

    (board, ids)
}

fn complete_goal(service: &BoardService, goal_id: i32) -> (Option<LineKind>, bool) {
    let update = GoalUpdate {
        completed: Some(true),
        ..GoalUpdate::default()
    };
    let outcome = service
        .update_goal(OWNER, goal_id, update)
        .expect("Completion failed");
    let (_, bingo, board_complete) = outcome.into_parts();
    (bingo, board_complete)
}

#[test]
fn test_create_board_seeds_free_space() {
    let (_db, service) = setup_service();
    let board = service
        .create_board(OWNER, "  2026 Goals  ", 2026, true)
        .expect("Create failed");
    assert_eq!(board.title(), "2026 Goals");

    let (_, goals) = service
        .get_board(OWNER, *board.id())
        .expect("Get board failed");
    assert_eq!(goals.len(), 1);
    let free_space = &goals[0];
    assert_eq!(*free_space.position(), FREE_SPACE_POSITION);
    assert!(*free_space.is_free_space());
    assert!(*free_space.completed());
    assert!(free_space.completed_at().is_some());
}

#[test]
fn test_create_board_without_free_space() {
    let (_db, service) = setup_service();
    let board = service
        .create_board(OWNER, "2026 Goals", 2026, false)
        .expect("Create failed");

    let (_, goals) = service
        .get_board(OWNER, *board.id())
        .expect("Get board failed");
    assert!(goals.is_empty());
}

#[test]
fn test_create_board_rejects_bad_input() {
    let (_db, service) = setup_service();
    assert!(matches!(
        service.create_board(OWNER, "   ", 2026, false),
        Err(Error::Validation { .. })
    ));
    assert!(matches!(
        service.create_board(OWNER, "Goals", 1899, false),
        Err(Error::Validation { .. })
    ));
    assert!(matches!(
        service.create_board(OWNER, "Goals", 2101, false),
        Err(Error::Validation { .. })
    ));
}

#[test]
fn test_stranger_cannot_touch_board() {
    let (_db, service) = setup_service();
    let board = service
        .create_board(OWNER, "Goals", 2026, false)
        .expect("Create failed");

    assert!(matches!(
        service.get_board(STRANGER, *board.id()),
        Err(Error::AccessDenied { .. })
    ));
    assert!(matches!(
        service.update_board(STRANGER, *board.id(), "Hijacked", 2026),
        Err(Error::AccessDenied { .. })
    ));
    assert!(matches!(
        service.delete_board(STRANGER, *board.id()),
        Err(Error::AccessDenied { .. })
    ));
    assert!(matches!(
        service.create_goal(STRANGER, *board.id(), 0, "goal", false),
        Err(Error::AccessDenied { .. })
    ));

    assert!(service.list_boards(STRANGER).expect("List failed").is_empty());
}

#[test]
fn test_unknown_board_is_not_found() {
    let (_db, service) = setup_service();
    assert!(matches!(
        service.get_board(OWNER, 999),
        Err(Error::NotFound { .. })
    ));
    assert!(matches!(
        service.update_goal(OWNER, 999, GoalUpdate::default()),
        Err(Error::NotFound { .. })
    ));
}

#[test]
fn test_duplicate_position_is_conflict() {
    let (_db, service) = setup_service();
    let board = service
        .create_board(OWNER, "Goals", 2026, false)
        .expect("Create failed");

    service
        .create_goal(OWNER, *board.id(), 3, "first", false)
        .expect("First create failed");
    let err = service
        .create_goal(OWNER, *board.id(), 3, "second", false)
        .expect_err("Duplicate should fail");
    assert!(matches!(err, Error::Conflict { .. }));
    assert_eq!(err.to_string(), "A goal already exists at this position");
}

#[test]
fn test_lock_requires_full_board() {
    let (_db, service) = setup_service();
    let board = service
        .create_board(OWNER, "Goals", 2026, true)
        .expect("Create failed");

    let err = service
        .set_board_lock(OWNER, *board.id(), true)
        .expect_err("Lock with 1 goal should fail");
    assert!(matches!(err, Error::IllegalTransition { .. }));
    assert!(err.to_string().contains("24 more goal(s)"));
}

#[test]
fn test_unlock_is_unconditional() {
    let (_db, service) = setup_service();
    let (board, _) = full_board(&service);

    assert!(service
        .set_board_lock(OWNER, *board.id(), true)
        .expect("Lock failed"));
    assert!(!service
        .set_board_lock(OWNER, *board.id(), false)
        .expect("Unlock failed"));
}

#[test]
fn test_completion_rejected_while_unlocked() {
    let (_db, service) = setup_service();
    let board = service
        .create_board(OWNER, "Goals", 2026, false)
        .expect("Create failed");
    let goal = service
        .create_goal(OWNER, *board.id(), 0, "goal", false)
        .expect("Create goal failed");

    let update = GoalUpdate {
        completed: Some(true),
        ..GoalUpdate::default()
    };
    assert!(matches!(
        service.update_goal(OWNER, *goal.id(), update),
        Err(Error::IllegalTransition { .. })
    ));
}

#[test]
fn test_text_edit_rejected_while_locked() {
    let (_db, service) = setup_service();
    let (board, ids) = full_board(&service);
    service
        .set_board_lock(OWNER, *board.id(), true)
        .expect("Lock failed");

    let update = GoalUpdate {
        text: Some("rewritten".to_string()),
        ..GoalUpdate::default()
    };
    assert!(matches!(
        service.update_goal(OWNER, ids[&0], update),
        Err(Error::IllegalTransition { .. })
    ));
}

#[test]
fn test_text_edit_trims_and_persists() {
    let (_db, service) = setup_service();
    let board = service
        .create_board(OWNER, "Goals", 2026, false)
        .expect("Create failed");
    let goal = service
        .create_goal(OWNER, *board.id(), 0, "draft", false)
        .expect("Create goal failed");

    let update = GoalUpdate {
        text: Some("  learn to sail  ".to_string()),
        ..GoalUpdate::default()
    };
    let outcome = service
        .update_goal(OWNER, *goal.id(), update)
        .expect("Update failed");
    assert_eq!(outcome.goal().text(), "learn to sail");

    let update = GoalUpdate {
        text: Some("   ".to_string()),
        ..GoalUpdate::default()
    };
    assert!(matches!(
        service.update_goal(OWNER, *goal.id(), update),
        Err(Error::Validation { .. })
    ));
}

#[test]
fn test_free_space_text_edit_rejected() {
    let (_db, service) = setup_service();
    let board = service
        .create_board(OWNER, "Goals", 2026, true)
        .expect("Create failed");
    let (_, goals) = service
        .get_board(OWNER, *board.id())
        .expect("Get board failed");
    let free_space = &goals[0];

    let update = GoalUpdate {
        text: Some("not so free".to_string()),
        ..GoalUpdate::default()
    };
    assert!(matches!(
        service.update_goal(OWNER, *free_space.id(), update),
        Err(Error::IllegalTransition { .. })
    ));
}

#[test]
fn test_free_space_deletion_rejected_any_lock_state() {
    let (_db, service) = setup_service();
    let (board, ids) = full_board(&service);
    let free_space_id = ids[&FREE_SPACE_POSITION];

    let err = service
        .delete_goal(OWNER, free_space_id)
        .expect_err("Free space deletion should fail");
    assert!(matches!(err, Error::IllegalTransition { .. }));

    service
        .set_board_lock(OWNER, *board.id(), true)
        .expect("Lock failed");
    let err = service
        .delete_goal(OWNER, free_space_id)
        .expect_err("Free space deletion should fail");
    assert!(matches!(err, Error::IllegalTransition { .. }));
}

#[test]
fn test_deletion_rejected_while_locked() {
    let (_db, service) = setup_service();
    let (board, ids) = full_board(&service);
    service
        .set_board_lock(OWNER, *board.id(), true)
        .expect("Lock failed");

    assert!(matches!(
        service.delete_goal(OWNER, ids[&0]),
        Err(Error::IllegalTransition { .. })
    ));

    service
        .set_board_lock(OWNER, *board.id(), false)
        .expect("Unlock failed");
    service
        .delete_goal(OWNER, ids[&0])
        .expect("Deletion on unlocked board failed");
}

#[test]
fn test_completion_timestamp_invariant() {
    let (_db, service) = setup_service();
    let (board, ids) = full_board(&service);
    service
        .set_board_lock(OWNER, *board.id(), true)
        .expect("Lock failed");

    let outcome = service
        .update_goal(
            OWNER,
            ids[&0],
            GoalUpdate {
                completed: Some(true),
                ..GoalUpdate::default()
            },
        )
        .expect("Completion failed");
    assert!(*outcome.goal().completed());
    assert!(outcome.goal().completed_at().is_some());

    let outcome = service
        .update_goal(
            OWNER,
            ids[&0],
            GoalUpdate {
                completed: Some(false),
                ..GoalUpdate::default()
            },
        )
        .expect("Un-completion failed");
    assert!(!*outcome.goal().completed());
    assert!(outcome.goal().completed_at().is_none());
}

#[test]
fn test_main_diagonal_scenario() {
    let (_db, service) = setup_service();
    let (board, ids) = full_board(&service);

    // Completing diagonal goals while unlocked must fail.
    for position in [0, 6, 18, 24] {
        let update = GoalUpdate {
            completed: Some(true),
            ..GoalUpdate::default()
        };
        assert!(matches!(
            service.update_goal(OWNER, ids[&position], update),
            Err(Error::IllegalTransition { .. })
        ));
    }

    // 24 ordinary goals + the free space fill the grid, so locking succeeds.
    assert!(service
        .set_board_lock(OWNER, *board.id(), true)
        .expect("Lock failed"));

    // The free space at 12 is already complete; the first three diagonal
    // completions finish no line.
    for position in [0, 6, 18] {
        let (bingo, complete) = complete_goal(&service, ids[&position]);
        assert_eq!(bingo, None);
        assert!(!complete);
    }

    // The fourth completes the main diagonal.
    let (bingo, complete) = complete_goal(&service, ids[&24]);
    assert_eq!(bingo, Some(LineKind::Diagonal));
    assert!(!complete);
}

#[test]
fn test_board_complete_after_last_goal() {
    let (_db, service) = setup_service();
    let (board, ids) = full_board(&service);
    service
        .set_board_lock(OWNER, *board.id(), true)
        .expect("Lock failed");

    let mut last = (None, false);
    for position in 0..25 {
        if position == FREE_SPACE_POSITION {
            continue;
        }
        last = complete_goal(&service, ids[&position]);
    }

    // Position 24 lands last and closes row 4 along with the whole board.
    assert_eq!(last.0, Some(LineKind::Row));
    assert!(last.1);
}
