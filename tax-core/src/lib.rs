pub mod calculations;
pub mod db;
pub mod models;
pub mod services;

pub use db::repository::{DeductionConfigRepository, RepositoryError};
pub use models::*;
pub use services::{AdminService, AdminServiceError, TaxService, TaxServiceError};
