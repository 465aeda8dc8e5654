use boardkit_core::db::open_db_in_memory;
use boardkit_core::{
    Board, BoardRepository, BoardService, Column, ColumnRepository, InsertPosition, Rank,
    RestoredEntity, SqliteBoardRepository, SqliteColumnRepository, TrashedKind,
};

#[test]
fn new_board_gets_the_default_layout_in_order() {
    let conn = open_db_in_memory().unwrap();
    let service = BoardService::try_new(&conn).unwrap();

    let board = service.create_board("Sprint 12", Some("release work".to_string())).unwrap();

    let rows = service.list_rows(board.uuid).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].title, "All Tasks");
    assert_eq!(rows[0].rank, Rank::middle().to_string());

    let columns = service.list_columns(board.uuid).unwrap();
    let titles: Vec<&str> = columns.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["Todo", "In Progress", "Completed"]);
    for pair in columns.windows(2) {
        assert!(pair[0].rank < pair[1].rank);
    }
    assert_eq!(columns[0].rank, Rank::middle().to_string());
}

#[test]
fn new_tasks_prepend_to_their_cell() {
    let conn = open_db_in_memory().unwrap();
    let service = BoardService::try_new(&conn).unwrap();

    let board = service.create_board("Board", None).unwrap();
    let column = service.list_columns(board.uuid).unwrap().remove(0);
    let row = service.list_rows(board.uuid).unwrap().remove(0);

    let first = service.add_task(board.uuid, column.uuid, row.uuid, "first").unwrap();
    let second = service.add_task(board.uuid, column.uuid, row.uuid, "second").unwrap();
    let third = service.add_task(board.uuid, column.uuid, row.uuid, "third").unwrap();

    let cell = service.list_cell_tasks(board.uuid, column.uuid, row.uuid).unwrap();
    let ids: Vec<_> = cell.iter().map(|t| t.uuid).collect();
    assert_eq!(ids, vec![third.uuid, second.uuid, first.uuid]);
}

#[test]
fn moving_a_task_across_cells_updates_cell_and_rank() {
    let conn = open_db_in_memory().unwrap();
    let service = BoardService::try_new(&conn).unwrap();

    let board = service.create_board("Board", None).unwrap();
    let columns = service.list_columns(board.uuid).unwrap();
    let row = service.list_rows(board.uuid).unwrap().remove(0);
    let (todo, in_progress) = (&columns[0], &columns[1]);

    let stays = service.add_task(board.uuid, in_progress.uuid, row.uuid, "stays").unwrap();
    let moved = service.add_task(board.uuid, todo.uuid, row.uuid, "moves").unwrap();

    let moved = service
        .move_task(moved.uuid, in_progress.uuid, row.uuid, InsertPosition::After(stays.uuid))
        .unwrap();
    assert_eq!(moved.column_uuid, in_progress.uuid);

    assert!(service
        .list_cell_tasks(board.uuid, todo.uuid, row.uuid)
        .unwrap()
        .is_empty());
    let cell = service.list_cell_tasks(board.uuid, in_progress.uuid, row.uuid).unwrap();
    let ids: Vec<_> = cell.iter().map(|t| t.uuid).collect();
    assert_eq!(ids, vec![stays.uuid, moved.uuid]);
}

#[test]
fn moving_a_column_to_start_reorders_the_board() {
    let conn = open_db_in_memory().unwrap();
    let service = BoardService::try_new(&conn).unwrap();

    let board = service.create_board("Board", None).unwrap();
    let columns = service.list_columns(board.uuid).unwrap();
    let completed = columns.last().unwrap();

    service.move_column(completed.uuid, InsertPosition::Start).unwrap();

    let titles: Vec<String> = service
        .list_columns(board.uuid)
        .unwrap()
        .into_iter()
        .map(|c| c.title)
        .collect();
    assert_eq!(titles, vec!["Completed", "Todo", "In Progress"]);
}

#[test]
fn deleting_a_column_trashes_its_tasks_and_restore_brings_it_back() {
    let conn = open_db_in_memory().unwrap();
    let service = BoardService::try_new(&conn).unwrap();

    let board = service.create_board("Board", None).unwrap();
    let column = service.list_columns(board.uuid).unwrap().remove(0);
    let row = service.list_rows(board.uuid).unwrap().remove(0);
    let task = service.add_task(board.uuid, column.uuid, row.uuid, "doomed").unwrap();

    let column_entry = service.delete_column(column.uuid).unwrap();
    assert_eq!(column_entry.kind, TrashedKind::Column);

    assert_eq!(service.list_columns(board.uuid).unwrap().len(), 2);
    assert!(service.get_task(task.uuid).unwrap().is_none());

    let trash = service.list_trash(board.uuid).unwrap();
    assert_eq!(trash.len(), 2);
    assert!(trash.iter().any(|e| e.kind == TrashedKind::Task && e.entity_uuid == task.uuid));

    match service.restore(column_entry.uuid).unwrap() {
        RestoredEntity::Column(restored) => {
            assert_eq!(restored.uuid, column.uuid);
            assert_eq!(restored.rank, column.rank);
        }
        other => panic!("unexpected restore result: {other:?}"),
    }
    assert_eq!(service.list_columns(board.uuid).unwrap().len(), 3);
    assert_eq!(service.list_trash(board.uuid).unwrap().len(), 1);
}

#[test]
fn deleted_task_round_trips_through_the_trash() {
    let conn = open_db_in_memory().unwrap();
    let service = BoardService::try_new(&conn).unwrap();

    let board = service.create_board("Board", None).unwrap();
    let column = service.list_columns(board.uuid).unwrap().remove(0);
    let row = service.list_rows(board.uuid).unwrap().remove(0);
    let task = service.add_task(board.uuid, column.uuid, row.uuid, "todo item").unwrap();

    let entry = service.delete_task(task.uuid).unwrap();
    assert!(service.get_task(task.uuid).unwrap().is_none());

    match service.restore(entry.uuid).unwrap() {
        RestoredEntity::Task(restored) => {
            assert_eq!(restored.uuid, task.uuid);
            assert_eq!(restored.rank, task.rank);
            assert_eq!(restored.title, "todo item");
        }
        other => panic!("unexpected restore result: {other:?}"),
    }
    assert!(service.list_trash(board.uuid).unwrap().is_empty());
}

#[test]
fn emptying_the_trash_drops_all_snapshots() {
    let conn = open_db_in_memory().unwrap();
    let service = BoardService::try_new(&conn).unwrap();

    let board = service.create_board("Board", None).unwrap();
    let column = service.list_columns(board.uuid).unwrap().remove(0);
    let row = service.list_rows(board.uuid).unwrap().remove(0);
    for title in ["one", "two"] {
        let task = service.add_task(board.uuid, column.uuid, row.uuid, title).unwrap();
        service.delete_task(task.uuid).unwrap();
    }
    assert_eq!(service.list_trash(board.uuid).unwrap().len(), 2);

    service.empty_trash(board.uuid).unwrap();
    assert!(service.list_trash(board.uuid).unwrap().is_empty());
}

#[test]
fn deleting_a_board_cascades_to_everything() {
    let conn = open_db_in_memory().unwrap();
    let service = BoardService::try_new(&conn).unwrap();

    let board = service.create_board("Board", None).unwrap();
    let column = service.list_columns(board.uuid).unwrap().remove(0);
    let row = service.list_rows(board.uuid).unwrap().remove(0);
    let task = service.add_task(board.uuid, column.uuid, row.uuid, "task").unwrap();
    service.delete_task(task.uuid).unwrap();

    service.delete_board(board.uuid).unwrap();

    assert!(service.get_board(board.uuid).unwrap().is_none());
    assert!(service.list_columns(board.uuid).unwrap().is_empty());
    assert!(service.list_rows(board.uuid).unwrap().is_empty());
    assert!(service.list_trash(board.uuid).unwrap().is_empty());
}

#[test]
fn exhausted_column_move_rebalances_and_succeeds() {
    let conn = open_db_in_memory().unwrap();

    // Hand-build a board whose first two columns are adjacent at maximum
    // precision, so any key between them is exhausted.
    let boards = SqliteBoardRepository::try_new(&conn).unwrap();
    let columns_repo = SqliteColumnRepository::try_new(&conn).unwrap();
    let board = Board::new("Tight", None);
    boards.create_board(&board).unwrap();

    let tight_low = format!("0|hzzzzz:{}1", "1".repeat(127));
    let tight_high = format!("0|hzzzzz:{}2", "1".repeat(127));
    let low = Column::new(board.uuid, "Low", "#111", &Rank::parse(&tight_low).unwrap());
    let high = Column::new(board.uuid, "High", "#222", &Rank::parse(&tight_high).unwrap());
    let tail = Column::new(board.uuid, "Tail", "#333", &Rank::parse("0|i00000:").unwrap());
    for column in [&low, &high, &tail] {
        columns_repo.create_column(column).unwrap();
    }

    let service = BoardService::try_new(&conn).unwrap();
    service.move_column(tail.uuid, InsertPosition::After(low.uuid)).unwrap();

    let listed = service.list_columns(board.uuid).unwrap();
    let titles: Vec<&str> = listed.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["Low", "Tail", "High"]);
    // Recovery rebalanced the whole group into the next bucket.
    for column in &listed {
        assert!(column.rank.starts_with("1|"), "rank not re-bucketed: {}", column.rank);
    }
}
