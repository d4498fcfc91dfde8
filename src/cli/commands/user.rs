use anyhow::{bail, Context};
use clap::Args;
use serde_json::json;
use uuid::Uuid;

use crate::auth::password::hash_password;
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::database::users::{insert_user, NewUser};
use crate::handlers::public::auth::utils::{validate_display_name, validate_email_format, validate_password_strength};
use crate::types::{ApprovalStatus, Role};

#[derive(Args, Debug)]
pub struct CreateUserArgs {
    #[arg(long, help = "Email address used to sign in")]
    pub email: String,

    #[arg(long, help = "Display name")]
    pub name: String,

    #[arg(long, env = "CAMPUS_USER_PASSWORD", help = "Password (or set CAMPUS_USER_PASSWORD)")]
    pub password: String,

    #[arg(long, help = "student, faculty, admin or principal")]
    pub role: String,

    #[arg(long, help = "Department id (required for faculty)")]
    pub department: Option<Uuid>,
}

pub async fn handle(args: CreateUserArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let role: Role = args.role.parse()?;

    validate_email_format(&args.email).map_err(anyhow::Error::msg)?;
    validate_display_name(&args.name).map_err(anyhow::Error::msg)?;
    validate_password_strength(&args.password).map_err(anyhow::Error::msg)?;
    if role == Role::Faculty && args.department.is_none() {
        bail!("--department is required when creating faculty");
    }

    let new_user = NewUser {
        email: args.email.trim().to_string(),
        name: args.name.trim().to_string(),
        password_hash: hash_password(&args.password)?,
        role,
        department_id: args.department,
        // Operator-created faculty skip the approval queue
        status: Some(ApprovalStatus::Approved),
    };

    let db = connect_database().await?;
    let result = insert_user(db.pool(), new_user).await;
    db.close().await;
    let profile = result.context("Could not create user")?;

    output_success(
        &output_format,
        &format!("Created {} account {}", role, profile.email),
        Some(json!({
            "id": profile.user_id,
            "email": profile.email,
            "role": role,
        })),
    )
}
