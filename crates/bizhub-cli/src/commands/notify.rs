//! Notification dispatch commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::engine::Engine;
use crate::output::{self, OutputFormat};
use bizhub_core::config::AppConfig;
use bizhub_core::error::AppError;
use bizhub_core::types::{ActorId, BusinessId, BusinessUserId, NotificationTypeId};
use bizhub_entity::notification::DeliveryRecord;
use bizhub_service::CreateNotification;

/// Arguments for notify commands
#[derive(Debug, Args)]
pub struct NotifyArgs {
    /// Notify subcommand
    #[command(subcommand)]
    pub command: NotifyCommand,
}

/// Notify subcommands
#[derive(Debug, Subcommand)]
pub enum NotifyCommand {
    /// Create a notification and deliver it
    Send {
        /// Notification type; resolves recipients when `--to` is absent
        #[arg(long = "type")]
        type_id: Option<NotificationTypeId>,
        /// Owning business; omit for cross-tenant
        #[arg(long)]
        business: Option<BusinessId>,
        /// Title
        #[arg(short, long)]
        title: String,
        /// Body text
        #[arg(short, long)]
        body: Option<String>,
        /// JSON payload
        #[arg(long)]
        payload: Option<String>,
        /// Creating actor
        #[arg(long)]
        created_by: ActorId,
        /// Explicit recipient memberships, comma separated
        #[arg(long, value_delimiter = ',')]
        to: Vec<BusinessUserId>,
    },
    /// List who a notification type would reach
    Recipients {
        /// Notification type
        #[arg(long = "type")]
        type_id: NotificationTypeId,
        /// Restrict to one business
        #[arg(long)]
        business: Option<BusinessId>,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct DeliveryRow {
    delivery_id: String,
    business_user_id: String,
    status: String,
    delivered_at: String,
}

impl From<&DeliveryRecord> for DeliveryRow {
    fn from(d: &DeliveryRecord) -> Self {
        Self {
            delivery_id: d.id.to_string(),
            business_user_id: d.business_user_id.to_string(),
            status: d.status.to_string(),
            delivered_at: d.delivered_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

#[derive(Debug, Serialize, Tabled)]
struct RecipientRow {
    business_user_id: String,
}

/// Execute notify commands
pub async fn execute(
    args: &NotifyArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let engine = Engine::connect(config).await?;

    match &args.command {
        NotifyCommand::Send {
            type_id,
            business,
            title,
            body,
            payload,
            created_by,
            to,
        } => {
            let payload = payload
                .as_deref()
                .map(serde_json::from_str::<serde_json::Value>)
                .transpose()?;
            let outcome = engine
                .dispatcher
                .dispatch(CreateNotification {
                    type_id: *type_id,
                    business_id: *business,
                    title: title.clone(),
                    body: body.clone(),
                    payload,
                    created_by: *created_by,
                    recipient_ids: (!to.is_empty()).then(|| to.clone()),
                })
                .await?;

            output::print_success(&format!(
                "Notification {} created with {} deliveries",
                outcome.notification.notification.id,
                outcome.deliveries.len()
            ));
            if outcome.deliveries.is_empty() {
                output::print_warning("No recipients resolved");
            }
            let rows: Vec<DeliveryRow> = outcome.deliveries.iter().map(DeliveryRow::from).collect();
            output::print_list(&rows, format);
        }
        NotifyCommand::Recipients { type_id, business } => {
            let mut recipients: Vec<BusinessUserId> = engine
                .dispatcher
                .resolver()
                .resolve_recipients(*type_id, *business)
                .await?
                .into_iter()
                .collect();
            recipients.sort();
            let rows: Vec<RecipientRow> = recipients
                .iter()
                .map(|id| RecipientRow {
                    business_user_id: id.to_string(),
                })
                .collect();
            output::print_list(&rows, format);
        }
    }

    engine.shutdown().await;
    Ok(())
}
