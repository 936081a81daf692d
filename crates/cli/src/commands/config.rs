use serde::Serialize;

use shopchat_core::config::{AppConfig, ConfigError, LoadOptions, LogFormat};

#[derive(Debug, Serialize)]
struct EffectiveConfig {
    database_url: String,
    database_max_connections: u32,
    database_timeout_secs: u64,
    server_bind_address: String,
    server_port: u16,
    server_graceful_shutdown_secs: u64,
    logging_level: String,
    logging_format: &'static str,
}

pub fn run() -> String {
    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => render(&config),
        Err(error) => render_error(&error),
    }
}

fn render(config: &AppConfig) -> String {
    let effective = EffectiveConfig {
        database_url: config.database.url.clone(),
        database_max_connections: config.database.max_connections,
        database_timeout_secs: config.database.timeout_secs,
        server_bind_address: config.server.bind_address.clone(),
        server_port: config.server.port,
        server_graceful_shutdown_secs: config.server.graceful_shutdown_secs,
        logging_level: config.logging.level.clone(),
        logging_format: match config.logging.format {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        },
    };

    serde_json::to_string_pretty(&effective)
        .unwrap_or_else(|error| format!("{{\"error\":\"{error}\"}}"))
}

fn render_error(error: &ConfigError) -> String {
    format!("{{\"status\":\"error\",\"message\":\"{error}\"}}")
}

#[cfg(test)]
mod tests {
    use shopchat_core::config::AppConfig;

    use super::render;

    #[test]
    fn render_includes_every_effective_value() {
        let output = render(&AppConfig::default());
        assert!(output.contains("database_url"));
        assert!(output.contains("sqlite://shopchat.db"));
        assert!(output.contains("server_port"));
        assert!(output.contains("compact"));
    }
}
