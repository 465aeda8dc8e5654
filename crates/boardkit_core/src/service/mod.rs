//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into board-level use cases.
//! - Own the exhaustion recovery path: rebalance the affected group,
//!   persist atomically, retry the allocation exactly once.

pub mod board_service;

pub use board_service::{BoardService, RestoredEntity};
