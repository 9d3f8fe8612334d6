pub mod factory;
pub mod memory;
pub mod repository;

pub use factory::{DbConfig, RepositoryFactory, RepositoryRegistry};
pub use memory::{InMemoryRepository, InMemoryRepositoryFactory};
pub use repository::{DeductionConfigRepository, RepositoryError};
