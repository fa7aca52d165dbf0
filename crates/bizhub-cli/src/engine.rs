//! Wires stores, evaluator, dispatcher and inbox from configuration.

use std::sync::Arc;

use tracing::{info, warn};

use bizhub_auth::{PermissionEvaluator, PermissionGuard};
use bizhub_core::config::{AppConfig, NotificationsConfig, RealtimeConfig};
use bizhub_core::error::AppError;
use bizhub_core::traits::RealtimeTransport;
use bizhub_database::{DatabasePool, PgNotificationStore, PgTenancyStore};
use bizhub_realtime::{ConnectionManager, RealtimeMetrics, RealtimePublisher};
use bizhub_service::{NotificationDispatcher, NotificationService};

/// Everything a command needs, built over one database pool.
pub struct Engine {
    pub db: DatabasePool,
    pub guard: PermissionGuard,
    pub dispatcher: Arc<NotificationDispatcher>,
    pub inbox: NotificationService,
}

impl Engine {
    /// Connect to the database and build the services.
    pub async fn connect(config: &AppConfig) -> Result<Self, AppError> {
        let db = DatabasePool::connect(&config.database).await?;
        let tenancy = Arc::new(PgTenancyStore::new(db.pool().clone()));
        let notifications = Arc::new(PgNotificationStore::new(db.pool().clone()));

        let metrics = Arc::new(RealtimeMetrics::new());
        let transport = transport(&config.realtime, metrics.clone()).await?;
        info!(transport = transport.name(), "Realtime transport ready");
        let publisher = RealtimePublisher::new(transport, &config.realtime, metrics);

        // The process exits right after the command, so the push is awaited.
        let dispatch_config = NotificationsConfig {
            detach_realtime: false,
            ..config.notifications.clone()
        };
        let dispatcher = Arc::new(NotificationDispatcher::new(
            notifications.clone(),
            tenancy.clone(),
            publisher,
            dispatch_config,
        ));

        let evaluator = PermissionEvaluator::new(tenancy, config.authorization.clone());
        let inbox = NotificationService::new(
            notifications,
            dispatcher.clone(),
            evaluator.clone(),
            config.notifications.clone(),
        );

        Ok(Self {
            db,
            guard: PermissionGuard::new(evaluator),
            dispatcher,
            inbox,
        })
    }

    /// Close the database pool.
    pub async fn shutdown(self) {
        self.db.close().await;
    }
}

async fn transport(
    config: &RealtimeConfig,
    metrics: Arc<RealtimeMetrics>,
) -> Result<Arc<dyn RealtimeTransport>, AppError> {
    #[cfg(feature = "redis-pubsub")]
    {
        if let Some(url) = &config.redis_url {
            let redis = bizhub_realtime::bridge::RedisTransport::connect(url).await?;
            return Ok(Arc::new(redis));
        }
    }
    #[cfg(not(feature = "redis-pubsub"))]
    {
        if config.redis_url.is_some() {
            warn!("realtime.redis_url is set but the redis-pubsub feature is disabled");
        }
    }

    // No sessions live in a CLI process; local publishes reach nobody.
    warn!("Using local session transport");
    Ok(Arc::new(ConnectionManager::new(config.clone(), metrics)))
}
