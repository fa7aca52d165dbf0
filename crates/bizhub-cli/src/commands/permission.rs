//! Permission check and route inference commands.

use clap::{Args, Subcommand};
use http::Method;
use serde::Serialize;

use crate::engine::Engine;
use crate::output::{self, OutputFormat};
use bizhub_auth::{BusinessContext, GuardOutcome, RouteInference};
use bizhub_core::config::AppConfig;
use bizhub_core::error::AppError;
use bizhub_core::types::{ActorId, BusinessId};

/// Arguments for permission commands
#[derive(Debug, Args)]
pub struct PermissionArgs {
    /// Permission subcommand
    #[command(subcommand)]
    pub command: PermissionCommand,
}

/// Permission subcommands
#[derive(Debug, Subcommand)]
pub enum PermissionCommand {
    /// Evaluate whether an actor may perform an action
    Check {
        /// Actor id
        #[arg(long)]
        actor: ActorId,
        /// Module key, e.g. `settings`
        #[arg(long)]
        module: String,
        /// Action key, e.g. `view`
        #[arg(long)]
        action: String,
        /// Business to evaluate in; defaults to the actor's selected business
        #[arg(long)]
        business: Option<BusinessId>,
    },
    /// Show the permission a controller action requires
    Infer {
        /// Controller name, e.g. `SettingController`
        controller: String,
        /// Action name, e.g. `update`
        action: String,
        /// HTTP method used when the action is not in the table
        #[arg(long, default_value = "GET")]
        method: String,
    },
}

#[derive(Debug, Serialize)]
struct CheckReport {
    actor_id: ActorId,
    permission: String,
    context: String,
    allowed: bool,
    decision: String,
}

/// Execute permission commands
pub async fn execute(
    args: &PermissionArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        PermissionCommand::Check {
            actor,
            module,
            action,
            business,
        } => {
            let engine = Engine::connect(config).await?;
            let context = BusinessContext::from(*business);
            let outcome = engine
                .guard
                .require_permission(*actor, module, action, context)
                .await;

            let decision = match &outcome {
                GuardOutcome::Allowed(decision) => decision.to_string(),
                GuardOutcome::Denied(denial) => match denial.reason {
                    Some(reason) => format!("denied ({reason})"),
                    None => "denied (check failed)".to_string(),
                },
            };
            output::print_item(
                &CheckReport {
                    actor_id: *actor,
                    permission: format!("{module}.{action}"),
                    context: context.to_string(),
                    allowed: !outcome.is_handled(),
                    decision,
                },
                format,
            );

            engine.shutdown().await;
            outcome.into_result()
        }
        PermissionCommand::Infer {
            controller,
            action,
            method,
        } => {
            let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
                .map_err(|_| AppError::validation(format!("Invalid HTTP method '{method}'")))?;
            let required = RouteInference::new().infer(controller, action, &method);
            match format {
                OutputFormat::Table => output::print_kv("required", &required.to_string()),
                OutputFormat::Json => output::print_item(&required, format),
            }
            Ok(())
        }
    }
}
