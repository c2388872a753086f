//! Business logic services

pub mod catalog;
pub mod loans;
pub mod sessions;
pub mod users;

use crate::{config::AuthConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub loans: loans::LoansService,
    pub sessions: sessions::SessionService,
    pub users: users::UsersService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(
        repository: Repository,
        auth_config: AuthConfig,
        sessions: sessions::SessionService,
    ) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            loans: loans::LoansService::new(repository.clone()),
            sessions,
            users: users::UsersService::new(repository, auth_config),
        }
    }
}
