use crate::commands::{runtime, CommandResult};
use shopchat_core::config::{AppConfig, LoadOptions};
use shopchat_db::{connect_with_settings, migrations, DemoDataset};

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "seed",
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
                "seed",
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

        let seeded = DemoDataset::load(&pool)
            .await
            .map_err(|error| ("seed_load", error.to_string(), 6u8))?;

        let verification = DemoDataset::verify(&pool)
            .await
            .map_err(|error| ("seed_verify", error.to_string(), 6u8))?;

        pool.close().await;

        if !verification.passed {
            let failed: Vec<String> = verification
                .checks
                .into_iter()
                .filter(|(_, ok)| !ok)
                .map(|(name, _)| name)
                .collect();
            return Err(("seed_contract", format!("failed checks: {}", failed.join(", ")), 7u8));
        }

        Ok::<_, (&'static str, String, u8)>(seeded)
    });

    match result {
        Ok(seeded) => CommandResult::success(
            "seed",
            format!(
                "seeded {} products and {} orders; verification passed",
                seeded.products_seeded, seeded.orders_seeded
            ),
        ),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("seed", error_class, message, exit_code)
        }
    }
}
