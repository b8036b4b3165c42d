use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use fleetdesk_core::config::{AppConfig, ConfigError, LoadOptions};
use fleetdesk_db::repositories::SqlEditRequestRepository;
use fleetdesk_db::{connect_with_settings, migrations, DbPool};
use fleetdesk_notify::{Dispatcher, NoopNotifier, Notifier, WebhookNotifier};
use fleetdesk_workflow::{EditRequestManager, TracingAuditSink};

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub manager: EditRequestManager<SqlEditRequestRepository, TracingAuditSink>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
    #[error("notification client construction failed: {0}")]
    Notifier(#[source] reqwest::Error),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let db_pool = connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(BootstrapError::DatabaseConnect)?;
    info!(
        event_name = "system.bootstrap.database_connected",
        correlation_id = "bootstrap",
        "database connection established"
    );

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(
        event_name = "system.bootstrap.migrations_applied",
        correlation_id = "bootstrap",
        "database migrations applied"
    );

    let notifier: Arc<dyn Notifier> =
        match WebhookNotifier::from_config(&config.notify).map_err(BootstrapError::Notifier)? {
            Some(webhook) => Arc::new(webhook),
            None => Arc::new(NoopNotifier),
        };

    let manager = EditRequestManager::new(
        SqlEditRequestRepository::with_default_registry(db_pool.clone()),
        Dispatcher::new(notifier),
        TracingAuditSink,
    );

    Ok(Application { config, db_pool, manager })
}
