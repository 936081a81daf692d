use std::sync::Arc;

use crate::commands::{runtime, CommandResult};
use shopchat_agent::AgentRuntime;
use shopchat_core::config::{AppConfig, LoadOptions};
use shopchat_db::repositories::{SqlCatalogRepository, SqlOrderRepository};
use shopchat_db::{connect_with_settings, migrations};

/// One-shot chat query against the configured database; prints the reply
/// envelope the HTTP endpoint would return.
pub fn run(message: &str) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "ask",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let runtime = match runtime() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "ask",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    let result = runtime.block_on(async {
        let pool = connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
        .map_err(|error| ("db_connectivity", error.to_string(), 4u8))?;

        migrations::run_pending(&pool)
            .await
            .map_err(|error| ("migration", error.to_string(), 5u8))?;

        let agent = AgentRuntime::new(
            Arc::new(SqlCatalogRepository::new(pool.clone())),
            Arc::new(SqlOrderRepository::new(pool.clone())),
        );
        let reply = agent.handle_message(message).await;
        pool.close().await;

        serde_json::to_string_pretty(&reply)
            .map_err(|error| ("serialization", error.to_string(), 6u8))
    });

    match result {
        Ok(rendered) => CommandResult { exit_code: 0, output: rendered },
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("ask", error_class, message, exit_code)
        }
    }
}
