use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::{
    CategoryRepository, OrderRepository, ProductRepository, UserRepository,
};
use crate::message::MessageBus;
use crate::orders::OrdersManager;
use crate::utils::AppError;

/// Server state - shared handles for every request
///
/// Cloning is shallow; everything inside is either `Clone`-cheap or
/// behind an `Arc`.
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// Embedded database handle
    pub db: Surreal<Db>,
    /// JWT token service
    pub jwt_service: Arc<JwtService>,
    /// Live-update broadcast bus
    pub bus: Arc<MessageBus>,
}

impl ServerState {
    /// Initialize all services from configuration
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        let db_dir = config.database_dir();
        std::fs::create_dir_all(&db_dir)
            .map_err(|e| AppError::internal(format!("Failed to create work dir: {e}")))?;

        let db_service = DbService::new(&db_dir.to_string_lossy()).await?;

        Ok(Self {
            config: config.clone(),
            db: db_service.db,
            jwt_service: Arc::new(JwtService::with_config(config.jwt.clone())),
            bus: Arc::new(MessageBus::new()),
        })
    }

    /// In-memory state for integration tests
    pub async fn initialize_memory(config: &Config) -> Result<Self, AppError> {
        let db_service = DbService::new_memory().await?;
        Ok(Self {
            config: config.clone(),
            db: db_service.db,
            jwt_service: Arc::new(JwtService::with_config(config.jwt.clone())),
            bus: Arc::new(MessageBus::new()),
        })
    }

    // Repository accessors - repositories are cheap wrappers around the
    // shared database handle, constructed per use.

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.db.clone())
    }

    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.db.clone())
    }

    pub fn categories(&self) -> CategoryRepository {
        CategoryRepository::new(self.db.clone())
    }

    pub fn order_repo(&self) -> OrderRepository {
        OrderRepository::new(self.db.clone())
    }

    /// Order lifecycle engine bound to this state's bus
    pub fn orders(&self) -> OrdersManager {
        OrdersManager::new(self.order_repo(), self.bus.clone())
    }

    /// Announce a generic catalog change to connected clients
    pub fn emit_data_updated(&self) {
        self.bus.publish(crate::message::BusMessage::data_updated());
    }
}
