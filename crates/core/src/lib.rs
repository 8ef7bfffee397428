//! Domain core for the todo service.
//!
//! Holds the todo entity rules, the list query resolver and the error
//! taxonomy. Nothing in this crate performs I/O, so it can be shared by the
//! persistence adapters and the HTTP layer alike.

pub mod error;
pub mod read_plan;
pub mod todo;
pub mod types;
