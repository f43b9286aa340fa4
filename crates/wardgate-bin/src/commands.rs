// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Command implementations.

use std::sync::Arc;

use tracing::{info, warn};

use wardgate_api::{server::ApiServer, AppState};
use wardgate_core::{password, MemoryUserStore, NewUser, Role, UserStore};

use crate::cli::Cli;
use crate::config;
use crate::error::BinResult;
use crate::shutdown::ShutdownCoordinator;

// =============================================================================
// run
// =============================================================================

/// Starts the gateway server and blocks until shutdown.
pub async fn run(cli: &Cli) -> BinResult<()> {
    let api_config = config::load_config(&cli.config)?;

    let users: Arc<dyn UserStore> = Arc::new(MemoryUserStore::new());
    bootstrap_admin(users.as_ref()).await?;

    let state = AppState::builder()
        .config(api_config)
        .user_store(users)
        .build()?;

    let server = ApiServer::new(state);

    let coordinator = ShutdownCoordinator::new();
    let signal = coordinator.shutdown_signal();
    tokio::spawn(async move {
        coordinator.wait_for_signals().await;
    });

    server.run_with_shutdown(signal).await?;
    Ok(())
}

/// Creates the first admin account when the store starts empty.
///
/// The generated password is printed to the log exactly once so an operator
/// can perform the first login; it is stored only as a hash.
async fn bootstrap_admin(users: &dyn UserStore) -> BinResult<()> {
    if users.count().await > 0 {
        return Ok(());
    }

    let plaintext = generated_password();
    let password_hash = match password::hash(&plaintext) {
        Ok(hash) => hash,
        Err(e) => {
            warn!(error = %e, "failed to hash bootstrap admin password");
            return Ok(());
        }
    };

    let admin = users
        .create(
            NewUser::new("admin", "admin@wardgate.local", password_hash).with_role(Role::Admin),
        )
        .await?;

    info!(
        user = %admin.username,
        password = %plaintext,
        "created bootstrap admin account; change this password after first login"
    );

    Ok(())
}

/// Generates a random first-login password for the bootstrap admin.
fn generated_password() -> String {
    uuid::Uuid::now_v7().simple().to_string()
}

// =============================================================================
// validate
// =============================================================================

/// Validates the configuration file without starting the server.
pub fn validate(cli: &Cli) -> BinResult<()> {
    let api_config = config::load_config(&cli.config)?;
    println!(
        "configuration ok: listening on {}, access token ttl {}s",
        api_config.socket_addr(),
        api_config.token.access_ttl_secs
    );
    Ok(())
}

// =============================================================================
// version
// =============================================================================

/// Prints version information.
pub fn version() -> BinResult<()> {
    println!("wardgate v{}", wardgate_core::VERSION);
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bootstrap_admin_on_empty_store() {
        let store = MemoryUserStore::new();
        bootstrap_admin(&store).await.unwrap();

        let admin = store.find_by_username("admin").await.unwrap();
        assert_eq!(admin.role, Role::Admin);
        assert!(admin.is_active);

        // Idempotent: a populated store is left alone.
        bootstrap_admin(&store).await.unwrap();
        assert_eq!(store.count().await, 1);
    }

    #[test]
    fn test_generated_passwords_differ() {
        assert_ne!(generated_password(), generated_password());
    }
}
