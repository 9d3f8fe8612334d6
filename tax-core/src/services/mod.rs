pub mod admin_service;
pub mod tax_service;

pub use admin_service::{AdminService, AdminServiceError};
pub use tax_service::{TaxService, TaxServiceError};
