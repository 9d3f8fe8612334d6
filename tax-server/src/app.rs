use std::sync::Arc;

use tax_core::db::{DbConfig, InMemoryRepositoryFactory, RepositoryRegistry};
use tax_core::{AdminService, DeductionConfigRepository, RepositoryError, TaxService};
use tax_db_sqlite::SqliteRepositoryFactory;
use tracing::info;

use crate::auth::AdminCredentials;

/// Registry with every backend this binary can run against.
pub fn build_registry() -> RepositoryRegistry {
    let mut registry = RepositoryRegistry::new();
    registry.register(Box::new(SqliteRepositoryFactory));
    registry.register(Box::new(InMemoryRepositoryFactory));
    registry
}

/// Services shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub tax_service: TaxService,
    pub admin_service: AdminService,
    pub credentials: Arc<AdminCredentials>,
}

impl AppState {
    pub fn new(
        repository: Arc<dyn DeductionConfigRepository>,
        credentials: AdminCredentials,
    ) -> Self {
        Self {
            tax_service: TaxService::new(repository.clone()),
            admin_service: AdminService::new(repository),
            credentials: Arc::new(credentials),
        }
    }

    /// Opens the configured backend and wires the services to it.
    pub async fn connect(
        db_config: &DbConfig,
        credentials: AdminCredentials,
    ) -> Result<Self, RepositoryError> {
        let registry = build_registry();
        info!(
            backend = %db_config.backend,
            available = ?registry.available_backends(),
            "opening repository"
        );
        let repository = registry.create(db_config).await?;
        Ok(Self::new(Arc::from(repository), credentials))
    }
}
