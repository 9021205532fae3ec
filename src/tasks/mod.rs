//! Background Tasks Module
//!
//! - Cache sweep: removes expired entries at a fixed interval

mod cleanup;

pub use cleanup::spawn_cleanup_task;
