//! Fan-out of a notification payload to recipients' live sessions.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, warn};

use bizhub_core::config::RealtimeConfig;
use bizhub_core::traits::RealtimeTransport;
use bizhub_core::types::ActorId;
use bizhub_entity::business::BusinessMember;

use crate::channel::TopicScheme;
use crate::metrics::RealtimeMetrics;

/// Outcome of one fan-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PublishReport {
    /// Distinct actor rooms published to.
    pub attempted: usize,
    /// Rooms the transport accepted.
    pub delivered: usize,
    /// Rooms that errored or timed out.
    pub failed: usize,
    /// Sessions reached, as reported by the transport.
    pub sessions: usize,
}

/// Publishes to `<prefix>:<actor_id>` once per distinct recipient actor.
///
/// At-most-once with no acknowledgement and no retry. Failures are logged
/// and counted, never returned.
#[derive(Clone)]
pub struct RealtimePublisher {
    transport: Arc<dyn RealtimeTransport>,
    topics: TopicScheme,
    timeout: Duration,
    metrics: Arc<RealtimeMetrics>,
}

impl std::fmt::Debug for RealtimePublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimePublisher")
            .field("transport", &self.transport.name())
            .field("topics", &self.topics)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl RealtimePublisher {
    /// Create a publisher over a transport.
    pub fn new(
        transport: Arc<dyn RealtimeTransport>,
        config: &RealtimeConfig,
        metrics: Arc<RealtimeMetrics>,
    ) -> Self {
        Self {
            transport,
            topics: TopicScheme::new(config.topic_prefix.clone()),
            timeout: Duration::from_millis(config.publish_timeout_ms.max(1)),
            metrics,
        }
    }

    /// Push `payload` to every session of every recipient's actor.
    pub async fn publish(
        &self,
        recipients: &[BusinessMember],
        payload: &serde_json::Value,
    ) -> PublishReport {
        let actors: BTreeSet<ActorId> = recipients.iter().map(|m| m.actor_id).collect();
        let mut report = PublishReport {
            attempted: actors.len(),
            ..PublishReport::default()
        };
        if actors.is_empty() {
            return report;
        }

        let sends = actors.into_iter().map(|actor_id| {
            let topic = self.topics.for_actor(actor_id);
            async move {
                let publish = self.transport.publish(&topic, payload);
                let result = tokio::time::timeout(self.timeout, publish).await;
                (topic, result)
            }
        });

        for (topic, result) in join_all(sends).await {
            match result {
                Ok(Ok(sessions)) => {
                    report.delivered += 1;
                    report.sessions += sessions;
                }
                Ok(Err(e)) => {
                    warn!(
                        transport = self.transport.name(),
                        topic = %topic,
                        error = %e,
                        "Realtime publish failed"
                    );
                    report.failed += 1;
                    self.metrics.publish_failed();
                }
                Err(_) => {
                    warn!(
                        transport = self.transport.name(),
                        topic = %topic,
                        timeout_ms = self.timeout.as_millis() as u64,
                        "Realtime publish timed out"
                    );
                    report.failed += 1;
                    self.metrics.publish_failed();
                }
            }
        }

        debug!(
            transport = self.transport.name(),
            attempted = report.attempted,
            delivered = report.delivered,
            failed = report.failed,
            sessions = report.sessions,
            "Realtime fan-out finished"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use bizhub_core::error::AppError;
    use bizhub_core::result::AppResult;
    use bizhub_core::types::BusinessUserId;
    use serde_json::json;
    use tokio::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct Recording {
        topics: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl RealtimeTransport for Recording {
        async fn publish(&self, topic: &str, _payload: &serde_json::Value) -> AppResult<usize> {
            self.topics.lock().await.push(topic.to_string());
            Ok(1)
        }

        fn name(&self) -> &'static str {
            "recording"
        }
    }

    struct Broken;

    #[async_trait]
    impl RealtimeTransport for Broken {
        async fn publish(&self, _topic: &str, _payload: &serde_json::Value) -> AppResult<usize> {
            Err(AppError::realtime("connection refused"))
        }

        fn name(&self) -> &'static str {
            "broken"
        }
    }

    struct Stalled;

    #[async_trait]
    impl RealtimeTransport for Stalled {
        async fn publish(&self, _topic: &str, _payload: &serde_json::Value) -> AppResult<usize> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(1)
        }

        fn name(&self) -> &'static str {
            "stalled"
        }
    }

    fn member(actor_id: ActorId) -> BusinessMember {
        BusinessMember {
            business_user_id: BusinessUserId::new(),
            actor_id,
        }
    }

    #[tokio::test]
    async fn test_one_publish_per_distinct_actor() {
        let transport = Arc::new(Recording::default());
        let metrics = Arc::new(RealtimeMetrics::new());
        let publisher =
            RealtimePublisher::new(transport.clone(), &RealtimeConfig::default(), metrics);

        let shared = ActorId::new();
        let other = ActorId::new();
        let recipients = [member(shared), member(shared), member(other)];
        let report = publisher.publish(&recipients, &json!({"n": 1})).await;

        assert_eq!(report.attempted, 2);
        assert_eq!(report.delivered, 2);
        assert_eq!(report.failed, 0);
        let mut topics = transport.topics.lock().await.clone();
        topics.sort();
        let mut expected = vec![format!("notif:{shared}"), format!("notif:{other}")];
        expected.sort();
        assert_eq!(topics, expected);
    }

    #[tokio::test]
    async fn test_failures_are_counted_not_returned() {
        let metrics = Arc::new(RealtimeMetrics::new());
        let publisher =
            RealtimePublisher::new(Arc::new(Broken), &RealtimeConfig::default(), metrics.clone());

        let report = publisher.publish(&[member(ActorId::new())], &json!({})).await;
        assert_eq!(report.failed, 1);
        assert_eq!(report.delivered, 0);
        assert_eq!(metrics.snapshot().publishes_failed, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_publish_is_bounded_by_timeout() {
        let config = RealtimeConfig {
            publish_timeout_ms: 50,
            ..RealtimeConfig::default()
        };
        let publisher =
            RealtimePublisher::new(Arc::new(Stalled), &config, Arc::new(RealtimeMetrics::new()));

        let report = publisher.publish(&[member(ActorId::new())], &json!({})).await;
        assert_eq!(report.attempted, 1);
        assert_eq!(report.failed, 1);
    }

    #[tokio::test]
    async fn test_no_recipients_publishes_nothing() {
        let transport = Arc::new(Recording::default());
        let publisher = RealtimePublisher::new(
            transport.clone(),
            &RealtimeConfig::default(),
            Arc::new(RealtimeMetrics::new()),
        );
        let report = publisher.publish(&[], &json!({})).await;
        assert_eq!(report, PublishReport::default());
        assert!(transport.topics.lock().await.is_empty());
    }
}
