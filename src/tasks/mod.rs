//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Memo purge: Drops expired memoized results at configured intervals

mod purge;

pub use purge::spawn_purge_task;
