//! Module bootstrap: store, identity provider, services and router wiring

use crate::api::rest::register_routes;
use crate::config::{AuthConfig, AuthProviderKind, Config, DatabaseConfig};
use crate::domain::{AuthGate, Collection, DocumentStore, FleetServices, IdentityProvider};
use crate::infra::identity::{FirebaseIdentityProvider, StaticTokenIdentityProvider};
use crate::infra::storage::{migrations::Migrator, InMemoryDocumentStore, SeaOrmDocumentStore};
use anyhow::{Context, Result};
use axum::Router;
use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;
use tracing::info;

/// Fully wired fleet service
pub struct FleetModule {
    services: FleetServices,
    gate: Arc<AuthGate>,
}

impl FleetModule {
    /// Connect the store, run migrations and build every service from `config`
    pub async fn init(config: &Config) -> Result<Self> {
        let store = connect_store(&config.database).await?;
        let identity = build_identity_provider(&config.auth)?;
        let module = Self::from_parts(store, identity, config);
        info!("fleet service initialized");
        Ok(module)
    }

    /// Assemble the module over an existing store and identity provider
    pub fn from_parts(
        store: Arc<dyn DocumentStore>,
        identity: Arc<dyn IdentityProvider>,
        config: &Config,
    ) -> Self {
        let gate = Arc::new(AuthGate::new(
            identity,
            Collection::new(store.clone()),
            config.auth.clock_skew_retry,
        ));
        let services = FleetServices::new(store, config.service.clone());
        Self { services, gate }
    }

    pub fn services(&self) -> &FleetServices {
        &self.services
    }

    pub fn gate(&self) -> Arc<AuthGate> {
        self.gate.clone()
    }

    /// The complete HTTP surface
    pub fn router(&self) -> Router {
        info!("registering fleet service REST routes");
        register_routes(Router::new(), self.services.clone(), self.gate.clone())
    }
}

/// Open the configured document store; SQL backends are migrated first
pub async fn connect_store(config: &DatabaseConfig) -> Result<Arc<dyn DocumentStore>> {
    if config.is_memory() {
        info!("using in-memory document store");
        return Ok(Arc::new(InMemoryDocumentStore::new()));
    }

    let mut options = ConnectOptions::new(config.url.clone());
    options.sqlx_logging(false);
    // Every pooled connection to an in-memory SQLite database is a separate database
    if config.url.starts_with("sqlite") && config.url.contains(":memory:") {
        options.max_connections(1).min_connections(1);
    }
    let db = Database::connect(options)
        .await
        .with_context(|| format!("failed to connect to database '{}'", config.url))?;
    Migrator::up(&db, None).await.context("database migration failed")?;
    info!("fleet service migrations completed");

    Ok(Arc::new(SeaOrmDocumentStore::new(Arc::new(db))))
}

pub fn build_identity_provider(config: &AuthConfig) -> Result<Arc<dyn IdentityProvider>> {
    Ok(match config.provider {
        AuthProviderKind::Firebase => {
            info!(
                project_id = %config.firebase.project_id,
                keys = config.firebase.public_keys.len(),
                "using firebase identity provider"
            );
            Arc::new(FirebaseIdentityProvider::new(
                &config.firebase.project_id,
                &config.firebase.public_keys,
            )?)
        }
        AuthProviderKind::Static => {
            info!(tokens = config.static_tokens.len(), "using static token identity provider");
            Arc::new(StaticTokenIdentityProvider::new(config.static_tokens.clone()))
        }
    })
}
