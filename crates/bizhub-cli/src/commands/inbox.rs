//! Inbox commands acting as a given actor.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::engine::Engine;
use crate::output::{self, OutputFormat};
use bizhub_core::config::AppConfig;
use bizhub_core::error::AppError;
use bizhub_core::types::{ActorId, BusinessId, NotificationId, PageRequest};
use bizhub_entity::notification::{DeliveryStatus, InboxItem};
use bizhub_service::RequestContext;

/// Arguments for inbox commands
#[derive(Debug, Args)]
pub struct InboxArgs {
    /// Acting actor
    #[arg(long, global = true)]
    pub actor: Option<ActorId>,
    /// Business; defaults to the actor's selected business
    #[arg(long, global = true)]
    pub business: Option<BusinessId>,
    /// Inbox subcommand
    #[command(subcommand)]
    pub command: InboxCommand,
}

/// Inbox subcommands
#[derive(Debug, Subcommand)]
pub enum InboxCommand {
    /// List notifications, newest first
    List {
        /// Filter by status: unread, read, archived
        #[arg(short, long)]
        status: Option<String>,
        /// Page number
        #[arg(long, default_value = "1")]
        page: u64,
        /// Page size; defaults to `notifications.default_page_size`
        #[arg(long)]
        page_size: Option<u64>,
    },
    /// Show the unread count
    Unread,
    /// Mark one notification as read
    Read {
        /// Notification id
        notification: NotificationId,
    },
    /// Mark every notification as read
    ReadAll,
    /// Archive a notification
    Archive {
        /// Notification id
        notification: NotificationId,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct InboxRow {
    notification_id: String,
    status: String,
    #[tabled(rename = "type")]
    type_code: String,
    title: String,
    delivered_at: String,
}

impl From<&InboxItem> for InboxRow {
    fn from(item: &InboxItem) -> Self {
        Self {
            notification_id: item.notification_id.to_string(),
            status: item.status.to_string(),
            type_code: item.type_code.clone().unwrap_or_else(|| "-".to_string()),
            title: item.title.chars().take(60).collect(),
            delivered_at: item.delivered_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute inbox commands
pub async fn execute(
    args: &InboxArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let actor = args
        .actor
        .ok_or_else(|| AppError::validation("--actor is required for inbox commands"))?;
    let ctx = match args.business {
        Some(business) => RequestContext::for_business(actor, business),
        None => RequestContext::new(actor),
    };
    let engine = Engine::connect(config).await?;
    let inbox = &engine.inbox;

    match &args.command {
        InboxCommand::List {
            status,
            page,
            page_size,
        } => {
            let status = status
                .as_deref()
                .map(str::parse::<DeliveryStatus>)
                .transpose()?;
            let page = page_size.map(|size| PageRequest::new(*page, size)).or_else(|| {
                (*page > 1).then(|| PageRequest::new(*page, config.notifications.default_page_size))
            });
            let result = inbox.list(&ctx, status, page).await?;
            match format {
                OutputFormat::Json => output::print_item(&result, format),
                OutputFormat::Table => {
                    let rows: Vec<InboxRow> = result.items.iter().map(InboxRow::from).collect();
                    output::print_list(&rows, format);
                    println!(
                        "Page {}/{} ({} total)",
                        result.page, result.total_pages, result.total_items
                    );
                }
            }
        }
        InboxCommand::Unread => {
            let count = inbox.unread_count(&ctx).await?;
            output::print_kv("unread", &count.to_string());
        }
        InboxCommand::Read { notification } => {
            let record = inbox.mark_read(&ctx, *notification).await?;
            output::print_success(&format!("Notification {} marked read", record.notification_id));
        }
        InboxCommand::ReadAll => {
            let changed = inbox.mark_all_read(&ctx).await?;
            output::print_success(&format!("{changed} notifications marked read"));
        }
        InboxCommand::Archive { notification } => {
            let record = inbox.archive(&ctx, *notification).await?;
            output::print_success(&format!("Notification {} archived", record.notification_id));
        }
    }

    engine.shutdown().await;
    Ok(())
}
