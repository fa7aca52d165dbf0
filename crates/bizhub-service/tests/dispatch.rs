//! Dispatch scenarios against the in-memory store.

mod common;

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::json;

use bizhub_core::config::NotificationsConfig;
use bizhub_core::error::ErrorKind;
use bizhub_core::types::{ActorId, BusinessUserId, NotificationId, NotificationTypeId};
use bizhub_database::MemoryStore;
use bizhub_database::store::NotificationStore;
use bizhub_entity::business::Business;
use bizhub_entity::notification::{DeliveryStatus, NotificationType};
use bizhub_entity::role::Role;
use bizhub_service::CreateNotification;

use common::{FailingTransport, RecordingTransport, business, dispatcher, inline_config, member};

fn request(created_by: ActorId, type_id: Option<NotificationTypeId>) -> CreateNotification {
    CreateNotification {
        type_id,
        business_id: None,
        title: "Budget created".to_string(),
        body: Some("FY26 marketing budget".to_string()),
        payload: Some(json!({"budget_id": 42})),
        created_by,
        recipient_ids: None,
    }
}

/// Two approvers in business 7, one in business 9, all via the Approvers role.
struct Approvers {
    store: Arc<MemoryStore>,
    business_7: Business,
    kind: NotificationType,
    in_7: Vec<BusinessUserId>,
    in_9: BusinessUserId,
}

async fn approvers() -> Approvers {
    let store = Arc::new(MemoryStore::new());
    let business_7 = business(&store, "Business 7").await;
    let business_9 = business(&store, "Business 9").await;

    let role = Role::new("Approvers");
    store.insert_role(role.clone()).await.unwrap();
    let kind = NotificationType::new("budget_created");
    store.insert_notification_type(kind.clone()).await.unwrap();
    store.subscribe_role(kind.id, role.id).await.unwrap();

    let mut in_7 = Vec::new();
    for email in ["ana@b7.test", "ben@b7.test"] {
        let bu = member(&store, &business_7, email).await;
        store.assign_role(bu.id, role.id).await.unwrap();
        in_7.push(bu.id);
    }
    let in_9 = member(&store, &business_9, "cy@b9.test").await;
    store.assign_role(in_9.id, role.id).await.unwrap();

    Approvers {
        store,
        business_7,
        kind,
        in_7,
        in_9: in_9.id,
    }
}

#[tokio::test]
async fn test_budget_created_resolves_business_scoped_approvers() {
    let world = approvers().await;
    let transport = Arc::new(RecordingTransport::default());
    let dispatcher = dispatcher(&world.store, transport.clone(), inline_config());

    let scoped = dispatcher
        .resolver()
        .resolve_recipients(world.kind.id, Some(world.business_7.id))
        .await
        .unwrap();
    assert_eq!(scoped, world.in_7.iter().copied().collect::<HashSet<_>>());

    let everyone = dispatcher
        .resolver()
        .resolve_recipients(world.kind.id, None)
        .await
        .unwrap();
    assert_eq!(everyone.len(), 3);
    assert!(everyone.contains(&world.in_9));

    let creator = common::actor(&world.store, "cfo@b7.test").await;
    let mut req = request(creator.id, Some(world.kind.id));
    req.business_id = Some(world.business_7.id);
    let outcome = dispatcher.dispatch(req).await.unwrap();

    assert_eq!(outcome.deliveries.len(), 2);
    assert!(outcome.deliveries.iter().all(|d| d.status == DeliveryStatus::Unread));
    assert_eq!(
        outcome.notification.notification_type.as_ref().map(|t| t.code.as_str()),
        Some("budget_created")
    );
    assert_eq!(transport.topics().len(), 2);
    assert_eq!(transport.payloads()[0]["type"], "notification");
}

#[tokio::test]
async fn test_direct_and_role_subscribers_are_unioned_without_duplicates() {
    let world = approvers().await;
    world
        .store
        .subscribe_business_user(world.kind.id, world.in_7[0])
        .await
        .unwrap();
    let transport = Arc::new(RecordingTransport::default());
    let dispatcher = dispatcher(&world.store, transport, inline_config());

    let recipients = dispatcher
        .resolver()
        .resolve_recipients(world.kind.id, Some(world.business_7.id))
        .await
        .unwrap();
    assert_eq!(recipients.len(), 2);
}

#[tokio::test]
async fn test_disabled_and_unknown_types() {
    let store = Arc::new(MemoryStore::new());
    let mut kind = NotificationType::new("quiet");
    kind.enabled = false;
    store.insert_notification_type(kind.clone()).await.unwrap();
    let dispatcher = dispatcher(&store, Arc::new(RecordingTransport::default()), inline_config());

    let none = dispatcher.resolver().resolve_recipients(kind.id, None).await.unwrap();
    assert!(none.is_empty());

    let err = dispatcher
        .resolver()
        .resolve_recipients(NotificationTypeId::new(), None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_unknown_type_fails_before_persisting() {
    let store = Arc::new(MemoryStore::new());
    let creator = common::actor(&store, "a@acme.test").await;
    let dispatcher = dispatcher(&store, Arc::new(RecordingTransport::default()), inline_config());

    let err = dispatcher
        .create_and_dispatch(request(creator.id, Some(NotificationTypeId::new())))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(store.notification_count().await, 0);
}

#[tokio::test]
async fn test_explicit_recipients_bypass_resolver_and_are_deduplicated() {
    let world = approvers().await;
    let transport = Arc::new(RecordingTransport::default());
    let dispatcher = dispatcher(&world.store, transport, inline_config());
    let creator = common::actor(&world.store, "cfo@b7.test").await;

    let mut req = request(creator.id, Some(world.kind.id));
    req.recipient_ids = Some(vec![world.in_9, world.in_9]);
    let outcome = dispatcher.dispatch(req).await.unwrap();

    assert_eq!(outcome.deliveries.len(), 1);
    assert_eq!(outcome.deliveries[0].business_user_id, world.in_9);
}

#[tokio::test]
async fn test_zero_recipients_still_creates_one_notification() {
    let store = Arc::new(MemoryStore::new());
    let kind = NotificationType::new("nobody_listens");
    store.insert_notification_type(kind.clone()).await.unwrap();
    let creator = common::actor(&store, "a@acme.test").await;
    let transport = Arc::new(RecordingTransport::default());
    let dispatcher = dispatcher(&store, transport.clone(), inline_config());

    let outcome = dispatcher.dispatch(request(creator.id, Some(kind.id))).await.unwrap();
    assert!(outcome.deliveries.is_empty());
    assert_eq!(store.notification_count().await, 1);
    assert_eq!(store.delivery_count().await, 0);
    assert!(transport.topics().is_empty());

    dispatcher.dispatch(request(creator.id, None)).await.unwrap();
    assert_eq!(store.notification_count().await, 2);
}

#[tokio::test]
async fn test_n_recipients_yield_n_unread_deliveries() {
    let store = Arc::new(MemoryStore::new());
    let acme = business(&store, "Acme").await;
    let mut ids = Vec::new();
    for i in 0..5 {
        ids.push(member(&store, &acme, &format!("m{i}@acme.test")).await.id);
    }
    let creator = common::actor(&store, "boss@acme.test").await;
    let dispatcher = dispatcher(&store, Arc::new(RecordingTransport::default()), inline_config());

    let mut req = request(creator.id, None);
    req.recipient_ids = Some(ids.clone());
    let outcome = dispatcher.dispatch(req).await.unwrap();

    let stored = store.deliveries_for(outcome.notification.notification.id).await;
    assert_eq!(stored.len(), 5);
    for record in &stored {
        assert!(record.is_unread());
        assert!(record.read_at.is_none());
        assert_eq!(record.delivered_at, record.created_at);
    }
}

#[tokio::test]
async fn test_failing_transport_does_not_fail_dispatch() {
    let store = Arc::new(MemoryStore::new());
    let acme = business(&store, "Acme").await;
    let bu = member(&store, &acme, "a@acme.test").await;

    for config in [inline_config(), NotificationsConfig::default()] {
        let dispatcher = dispatcher(&store, Arc::new(FailingTransport), config);
        let mut req = request(bu.actor_id, None);
        req.recipient_ids = Some(vec![bu.id]);
        let outcome = dispatcher.dispatch(req).await.unwrap();
        assert_eq!(outcome.deliveries.len(), 1);
    }
    assert_eq!(store.delivery_count().await, 2);
}

#[tokio::test]
async fn test_delivery_failure_keeps_orphan_by_default() {
    let store = Arc::new(MemoryStore::new());
    let acme = business(&store, "Acme").await;
    let bu = member(&store, &acme, "a@acme.test").await;
    let dispatcher = dispatcher(&store, Arc::new(RecordingTransport::default()), inline_config());

    let mut req = request(bu.actor_id, None);
    req.recipient_ids = Some(vec![bu.id, BusinessUserId::new()]);
    assert!(dispatcher.dispatch(req).await.is_err());

    assert_eq!(store.notification_count().await, 1);
    assert_eq!(store.delivery_count().await, 0);
}

#[tokio::test]
async fn test_delivery_failure_rolls_back_when_configured() {
    let store = Arc::new(MemoryStore::new());
    let acme = business(&store, "Acme").await;
    let bu = member(&store, &acme, "a@acme.test").await;
    let config = NotificationsConfig {
        rollback_orphans: true,
        ..inline_config()
    };
    let transport = Arc::new(RecordingTransport::default());
    let dispatcher = dispatcher(&store, transport.clone(), config);

    let mut req = request(bu.actor_id, None);
    req.recipient_ids = Some(vec![bu.id, BusinessUserId::new()]);
    assert!(dispatcher.dispatch(req).await.is_err());

    assert_eq!(store.notification_count().await, 0);
    assert_eq!(store.delivery_count().await, 0);
    assert!(transport.topics().is_empty());
}

#[tokio::test]
async fn test_mark_as_read_is_idempotent() {
    let store = Arc::new(MemoryStore::new());
    let acme = business(&store, "Acme").await;
    let bu = member(&store, &acme, "a@acme.test").await;
    let dispatcher = dispatcher(&store, Arc::new(RecordingTransport::default()), inline_config());

    let mut req = request(bu.actor_id, None);
    req.recipient_ids = Some(vec![bu.id]);
    let id = dispatcher.create_and_dispatch(req).await.unwrap().notification.id;

    let first = dispatcher.mark_as_read(id, bu.id).await.unwrap().unwrap();
    assert_eq!(first.status, DeliveryStatus::Read);
    let first_read = first.read_at.unwrap();

    let second = dispatcher.mark_as_read(id, bu.id).await.unwrap().unwrap();
    assert_eq!(second.status, DeliveryStatus::Read);
    assert!(second.read_at.unwrap() >= first_read);
    assert_eq!(second.id, first.id);
    assert_eq!(store.delivery_count().await, 1);
}

#[tokio::test]
async fn test_mark_as_read_absent_returns_none_without_writing() {
    let store = Arc::new(MemoryStore::new());
    let acme = business(&store, "Acme").await;
    let bu = member(&store, &acme, "a@acme.test").await;
    let other = member(&store, &acme, "b@acme.test").await;
    let dispatcher = dispatcher(&store, Arc::new(RecordingTransport::default()), inline_config());

    let mut req = request(bu.actor_id, None);
    req.recipient_ids = Some(vec![bu.id]);
    let id = dispatcher.create_and_dispatch(req).await.unwrap().notification.id;

    assert!(dispatcher.mark_as_read(NotificationId::new(), bu.id).await.unwrap().is_none());
    assert!(dispatcher.mark_as_read(id, other.id).await.unwrap().is_none());

    let untouched = store.find_delivery(id, bu.id).await.unwrap().unwrap();
    assert!(untouched.is_unread());
    assert!(untouched.read_at.is_none());
}

#[tokio::test]
async fn test_empty_title_is_rejected() {
    let store = Arc::new(MemoryStore::new());
    let dispatcher = dispatcher(&store, Arc::new(RecordingTransport::default()), inline_config());
    let mut req = request(ActorId::new(), None);
    req.title = "   ".to_string();

    let err = dispatcher.dispatch(req).await.unwrap_err();
    assert_eq!(err.code(), "VALIDATION_ERROR");
    assert_eq!(store.notification_count().await, 0);
}
