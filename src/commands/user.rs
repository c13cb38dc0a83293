//! User command - account administration from the shell.

use crate::cli::args::{UserAction, UserArgs};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::Database;
use crate::services::{ServiceContainer, Services};

/// Execute the user command
pub async fn execute(args: UserArgs, config: Config) -> AppResult<()> {
    let db = Database::connect(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;
    let users = Services::from_connection(db.get_connection(), config).users();

    match args.action {
        UserAction::Create {
            email,
            name,
            password,
        } => {
            let user = users.create_user(email, password, name).await?;
            println!("Created user {} ({})", user.email, user.id);
        }
        UserAction::Deactivate { email } => {
            let user = users.set_active(email, false).await?;
            println!("Deactivated {}", user.email);
        }
        UserAction::Activate { email } => {
            let user = users.set_active(email, true).await?;
            println!("Activated {}", user.email);
        }
    }

    Ok(())
}
