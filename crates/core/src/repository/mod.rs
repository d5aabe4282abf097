//! Repository module - generic persistence contract plus the in-memory adapter.

mod memory_repository;
mod repository_traits;

pub use memory_repository::InMemoryRepository;
pub use repository_traits::{Entity, QueryFilters, RepositoryTrait};
