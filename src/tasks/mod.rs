//! Background Tasks Module
//!
//! # Tasks
//! - Expiry purge: removes expired tables from the in-memory store

mod purge;

pub use purge::spawn_purge_task;
