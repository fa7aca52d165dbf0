//! Shared fixtures for service scenario tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use bizhub_auth::PermissionEvaluator;
use bizhub_core::config::{AuthorizationConfig, NotificationsConfig, RealtimeConfig};
use bizhub_core::error::AppError;
use bizhub_core::result::AppResult;
use bizhub_core::traits::RealtimeTransport;
use bizhub_database::MemoryStore;
use bizhub_entity::actor::Actor;
use bizhub_entity::business::{Business, BusinessUser};
use bizhub_realtime::{RealtimeMetrics, RealtimePublisher};
use bizhub_service::{NotificationDispatcher, NotificationService};

/// Transport that records every publish.
#[derive(Default)]
pub struct RecordingTransport {
    published: Mutex<Vec<(String, Value)>>,
}

impl RecordingTransport {
    pub fn topics(&self) -> Vec<String> {
        let mut topics: Vec<String> = self
            .published
            .lock()
            .unwrap()
            .iter()
            .map(|(topic, _)| topic.clone())
            .collect();
        topics.sort();
        topics
    }

    pub fn payloads(&self) -> Vec<Value> {
        self.published
            .lock()
            .unwrap()
            .iter()
            .map(|(_, payload)| payload.clone())
            .collect()
    }
}

#[async_trait]
impl RealtimeTransport for RecordingTransport {
    async fn publish(&self, topic: &str, payload: &Value) -> AppResult<usize> {
        self.published
            .lock()
            .unwrap()
            .push((topic.to_string(), payload.clone()));
        Ok(1)
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Transport whose every publish fails.
pub struct FailingTransport;

#[async_trait]
impl RealtimeTransport for FailingTransport {
    async fn publish(&self, _topic: &str, _payload: &Value) -> AppResult<usize> {
        Err(AppError::realtime("transport unavailable"))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

/// Awaits realtime inline so assertions can inspect the transport.
pub fn inline_config() -> NotificationsConfig {
    NotificationsConfig {
        detach_realtime: false,
        ..NotificationsConfig::default()
    }
}

pub fn dispatcher(
    store: &Arc<MemoryStore>,
    transport: Arc<dyn RealtimeTransport>,
    config: NotificationsConfig,
) -> NotificationDispatcher {
    let publisher = RealtimePublisher::new(
        transport,
        &RealtimeConfig::default(),
        Arc::new(RealtimeMetrics::new()),
    );
    NotificationDispatcher::new(store.clone(), store.clone(), publisher, config)
}

pub fn inbox(store: &Arc<MemoryStore>, dispatcher: NotificationDispatcher) -> NotificationService {
    NotificationService::new(
        store.clone(),
        Arc::new(dispatcher),
        PermissionEvaluator::new(store.clone(), AuthorizationConfig::default()),
        NotificationsConfig::default(),
    )
}

pub async fn business(store: &MemoryStore, name: &str) -> Business {
    let business = Business::new(name);
    store.insert_business(business.clone()).await.unwrap();
    business
}

pub async fn actor(store: &MemoryStore, email: &str) -> Actor {
    let actor = Actor::new(email);
    store.insert_actor(actor.clone()).await.unwrap();
    actor
}

pub async fn member(store: &MemoryStore, business: &Business, email: &str) -> BusinessUser {
    let actor = actor(store, email).await;
    let bu = BusinessUser::new(actor.id, business.id);
    store.insert_business_user(bu.clone()).await.unwrap();
    bu
}
