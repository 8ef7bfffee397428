//! SQL repositories. Each is a zero-sized struct of associated async
//! functions taking the pool explicitly.

pub mod todo_repo;

pub use todo_repo::TodoRepo;
