//! Application state containing repositories and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::domain::{CatalogRepository, LoanPolicy};
use crate::infrastructure::SeaOrmCatalogRepository;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection used by the lending and report services
    db: DatabaseConnection,
    /// Catalog repository
    pub catalog: Arc<dyn CatalogRepository>,
    /// Loan period and other lending rules
    pub policy: LoanPolicy,
}

impl AppState {
    pub fn new(db: DatabaseConnection, policy: LoanPolicy) -> Self {
        let catalog = Arc::new(SeaOrmCatalogRepository::new(db.clone()));

        Self {
            db,
            catalog,
            policy,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}
