//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `boardkit_core` linkage.
//! - Exercise the rank allocation path end to end against an in-memory
//!   database, with deterministic output for quick local sanity checks.

use boardkit_core::db::open_db_in_memory;
use boardkit_core::{BoardService, InsertPosition, RepoError};

fn main() {
    println!("boardkit_core version={}", boardkit_core::core_version());

    let conn = match open_db_in_memory() {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("failed to open in-memory database: {err}");
            std::process::exit(1);
        }
    };

    let service = match BoardService::try_new(&conn) {
        Ok(service) => service,
        Err(err) => {
            eprintln!("failed to build board service: {err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run_smoke(&service) {
        eprintln!("smoke run failed: {err}");
        std::process::exit(1);
    }
}

fn run_smoke(service: &BoardService<'_>) -> Result<(), RepoError> {
    let board = service.create_board("Demo Board", None)?;
    let columns = service.list_columns(board.uuid)?;
    for column in &columns {
        println!("column title={} rank={}", column.title, column.rank);
    }

    let row = service.list_rows(board.uuid)?.remove(0);
    let first = service.add_task(board.uuid, columns[0].uuid, row.uuid, "first task")?;
    let second = service.add_task(board.uuid, columns[0].uuid, row.uuid, "second task")?;
    service.move_task(
        second.uuid,
        columns[0].uuid,
        row.uuid,
        InsertPosition::After(first.uuid),
    )?;

    for task in service.list_cell_tasks(board.uuid, columns[0].uuid, row.uuid)? {
        println!("task title={} rank={}", task.title, task.rank);
    }

    Ok(())
}
