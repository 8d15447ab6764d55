pub mod sites;
pub mod equipment;
pub mod dashboard;

pub use sites::*;
pub use equipment::*;
pub use dashboard::*;

use crate::auth::{AuthService, PasswordHasher, TokenIssuer};
use crate::core::config::SecurityConfig;
use crate::core::quote::QuoteService;
use crate::db::manager::DatabaseManager;
use crate::db::repository::{
    DashboardRepository, EquipmentRepository, SiteKind, SiteRepository, UserRepository,
};
use std::sync::Arc;

/// Shared application state for handlers
#[derive(Clone)]
pub struct AppState {
    pub user_repo: Arc<UserRepository>,
    pub tower_repo: Arc<SiteRepository>,
    pub server_repo: Arc<SiteRepository>,
    pub equipment_repo: Arc<EquipmentRepository>,
    pub dashboard_repo: Arc<DashboardRepository>,
    pub auth_service: Arc<AuthService>,
    pub quote_service: Arc<QuoteService>,
    pub tokens: Arc<TokenIssuer>,
}

impl AppState {
    /// Wire repositories and services over one database
    pub fn new(db: Arc<DatabaseManager>, security: &SecurityConfig) -> Self {
        let user_repo = Arc::new(UserRepository::new(db.clone()));
        let equipment_repo = Arc::new(EquipmentRepository::new(db.clone()));
        let tokens = Arc::new(TokenIssuer::new(&security.jwt_secret, security.token_ttl_secs));
        let auth_service = Arc::new(AuthService::new(
            user_repo.clone(),
            PasswordHasher::new(security.bcrypt_cost),
            tokens.clone(),
        ));

        Self {
            tower_repo: Arc::new(SiteRepository::new(db.clone(), SiteKind::Tower)),
            server_repo: Arc::new(SiteRepository::new(db.clone(), SiteKind::Server)),
            dashboard_repo: Arc::new(DashboardRepository::new(db)),
            quote_service: Arc::new(QuoteService::new(equipment_repo.clone())),
            user_repo,
            equipment_repo,
            auth_service,
            tokens,
        }
    }

    /// Repository backing the given site collection
    pub fn sites(&self, kind: SiteKind) -> &SiteRepository {
        match kind {
            SiteKind::Tower => self.tower_repo.as_ref(),
            SiteKind::Server => self.server_repo.as_ref(),
        }
    }
}
