//! Seed command - Creates the initial administrator account.
//!
//! The permission catalogue and the admin role are seeded by the
//! migrations; this command only creates a user holding that role.

use crate::cli::args::SeedArgs;
use crate::config::{Config, ROLE_ADMIN};
use crate::domain::Password;
use crate::errors::{AppError, AppResult};
use crate::infra::{Database, Persistence};

/// Execute the seed command
pub async fn execute(args: SeedArgs, config: Config) -> AppResult<()> {
    let db = Database::connect(&config).await;
    let persistence = Persistence::new(db.get_connection());

    let users = persistence.users();
    if users.find_by_username(&args.username).await?.is_some() {
        tracing::info!(username = %args.username, "administrator already exists, nothing to do");
        return Ok(());
    }

    let admin_role = persistence
        .roles()
        .find_by_name(ROLE_ADMIN)
        .await?
        .ok_or_else(|| AppError::internal("admin role missing, run migrations first"))?;

    let password_hash = Password::new(&args.password)?.into_string();
    let user = users
        .create(args.username, args.email, password_hash, vec![admin_role.id])
        .await?;

    tracing::info!(username = %user.username, "administrator account created");
    Ok(())
}
