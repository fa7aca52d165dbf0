mod common;

use std::sync::Arc;

use bizhub_core::types::{BusinessUserId, NotificationId, PageRequest};
use bizhub_database::MemoryStore;
use bizhub_entity::business::{Business, BusinessUser};
use bizhub_entity::notification::DeliveryStatus;
use bizhub_service::{CreateNotification, NotificationService, RequestContext};

use common::{RecordingTransport, business, dispatcher, inbox, inline_config, member};

struct Inbox {
    store: Arc<MemoryStore>,
    acme: Business,
    reader: BusinessUser,
    service: NotificationService,
    transport: Arc<RecordingTransport>,
    ids: Vec<NotificationId>,
}

async fn seeded(count: usize) -> Inbox {
    let store = Arc::new(MemoryStore::new());
    let acme = business(&store, "Acme").await;
    let reader = member(&store, &acme, "reader@acme.test").await;
    let transport = Arc::new(RecordingTransport::default());
    let dispatcher = dispatcher(&store, transport.clone(), inline_config());

    let mut ids = Vec::new();
    for i in 0..count {
        let outcome = dispatcher
            .dispatch(send(&reader, format!("Item {i}"), vec![reader.id]))
            .await
            .unwrap();
        ids.push(outcome.notification.notification.id);
    }

    let service = inbox(&store, dispatcher);
    Inbox {
        store,
        acme,
        reader,
        service,
        transport,
        ids,
    }
}

fn send(from: &BusinessUser, title: String, to: Vec<BusinessUserId>) -> CreateNotification {
    CreateNotification {
        type_id: None,
        business_id: Some(from.business_id),
        title,
        body: None,
        payload: None,
        created_by: from.actor_id,
        recipient_ids: Some(to),
    }
}

#[tokio::test]
async fn test_list_and_unread_count_with_explicit_business() {
    let inbox = seeded(3).await;
    let ctx = RequestContext::for_business(inbox.reader.actor_id, inbox.acme.id);

    let page = inbox.service.list(&ctx, None, None).await.unwrap();
    assert_eq!(page.total_items, 3);
    assert!(page.items.iter().all(|item| item.status == DeliveryStatus::Unread));
    assert!(page.items.iter().all(|item| item.business_user_id == inbox.reader.id));
    assert_eq!(inbox.service.unread_count(&ctx).await.unwrap(), 3);

    let first = inbox
        .service
        .list(&ctx, None, Some(PageRequest::new(1, 2)))
        .await
        .unwrap();
    assert_eq!(first.items.len(), 2);
    assert!(first.has_next);
}

#[tokio::test]
async fn test_selected_business_is_used_without_explicit_context() {
    let inbox = seeded(1).await;
    let ctx = RequestContext::new(inbox.reader.actor_id);

    let err = inbox.service.unread_count(&ctx).await.unwrap_err();
    assert!(err.is_not_found());

    inbox
        .store
        .select_business(inbox.reader.actor_id, inbox.acme.id)
        .await
        .unwrap();
    assert_eq!(inbox.service.unread_count(&ctx).await.unwrap(), 1);
}

#[tokio::test]
async fn test_mark_read_updates_count_and_rejects_unknown() {
    let inbox = seeded(2).await;
    let ctx = RequestContext::for_business(inbox.reader.actor_id, inbox.acme.id);

    let record = inbox.service.mark_read(&ctx, inbox.ids[0]).await.unwrap();
    assert_eq!(record.status, DeliveryStatus::Read);
    assert!(record.read_at.is_some());
    assert_eq!(inbox.service.unread_count(&ctx).await.unwrap(), 1);

    let err = inbox
        .service
        .mark_read(&ctx, NotificationId::new())
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_mark_all_read() {
    let inbox = seeded(4).await;
    let ctx = RequestContext::for_business(inbox.reader.actor_id, inbox.acme.id);
    inbox.service.mark_read(&ctx, inbox.ids[1]).await.unwrap();

    assert_eq!(inbox.service.mark_all_read(&ctx).await.unwrap(), 3);
    assert_eq!(inbox.service.unread_count(&ctx).await.unwrap(), 0);
    assert_eq!(inbox.service.mark_all_read(&ctx).await.unwrap(), 0);

    let read = inbox
        .service
        .list(&ctx, Some(DeliveryStatus::Read), None)
        .await
        .unwrap();
    assert_eq!(read.total_items, 4);
}

#[tokio::test]
async fn test_archive_hides_from_default_listing() {
    let inbox = seeded(2).await;
    let ctx = RequestContext::for_business(inbox.reader.actor_id, inbox.acme.id);

    let archived = inbox.service.archive(&ctx, inbox.ids[0]).await.unwrap();
    assert_eq!(archived.status, DeliveryStatus::Archived);

    let visible = inbox.service.list(&ctx, None, None).await.unwrap();
    assert_eq!(visible.total_items, 1);
    assert_eq!(visible.items[0].notification_id, inbox.ids[1]);

    let only_archived = inbox
        .service
        .list(&ctx, Some(DeliveryStatus::Archived), None)
        .await
        .unwrap();
    assert_eq!(only_archived.total_items, 1);
    assert_eq!(inbox.service.unread_count(&ctx).await.unwrap(), 1);

    assert!(
        inbox
            .service
            .archive(&ctx, NotificationId::new())
            .await
            .unwrap_err()
            .is_not_found()
    );
}

#[tokio::test]
async fn test_inbox_is_scoped_to_the_membership() {
    let inbox = seeded(2).await;
    let other = member(&inbox.store, &inbox.acme, "other@acme.test").await;
    let ctx = RequestContext::for_business(other.actor_id, inbox.acme.id);

    assert_eq!(inbox.service.unread_count(&ctx).await.unwrap(), 0);
    assert!(
        inbox
            .service
            .mark_read(&ctx, inbox.ids[0])
            .await
            .unwrap_err()
            .is_not_found()
    );

    let outsider = business(&inbox.store, "Globex").await;
    let ctx = RequestContext::for_business(inbox.reader.actor_id, outsider.id);
    assert!(inbox.service.list(&ctx, None, None).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_read_changes_push_the_unread_count() {
    let inbox = seeded(3).await;
    let ctx = RequestContext::for_business(inbox.reader.actor_id, inbox.acme.id);
    let unread_frames = || {
        inbox
            .transport
            .payloads()
            .into_iter()
            .filter(|frame| frame["type"] == "unread_count")
            .map(|frame| frame["count"].as_u64().unwrap())
            .collect::<Vec<_>>()
    };
    assert!(unread_frames().is_empty());

    inbox.service.mark_read(&ctx, inbox.ids[0]).await.unwrap();
    assert_eq!(unread_frames(), vec![2]);
    inbox.service.archive(&ctx, inbox.ids[1]).await.unwrap();
    assert_eq!(unread_frames(), vec![2, 1]);
    inbox.service.mark_all_read(&ctx).await.unwrap();
    assert_eq!(unread_frames(), vec![2, 1, 0]);

    inbox.service.mark_all_read(&ctx).await.unwrap();
    assert_eq!(unread_frames().len(), 3);
    let topic = format!("notif:{}", inbox.reader.actor_id);
    assert!(inbox.transport.topics().iter().all(|t| *t == topic));
}

#[tokio::test]
async fn test_mark_read_keeps_an_archived_delivery_archived() {
    let inbox = seeded(2).await;
    let ctx = RequestContext::for_business(inbox.reader.actor_id, inbox.acme.id);
    inbox.service.archive(&ctx, inbox.ids[0]).await.unwrap();

    let record = inbox.service.mark_read(&ctx, inbox.ids[0]).await.unwrap();
    assert_eq!(record.status, DeliveryStatus::Archived);
    assert!(record.read_at.is_some());

    let visible = inbox.service.list(&ctx, None, None).await.unwrap();
    assert_eq!(visible.total_items, 1);
    assert_eq!(visible.items[0].notification_id, inbox.ids[1]);
}
