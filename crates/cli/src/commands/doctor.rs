use serde::Serialize;

use crate::commands::runtime;
use shopchat_core::config::{AppConfig, LoadOptions};
use shopchat_db::connect_with_settings;

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: &'static str,
    detail: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    status: &'static str,
    checks: Vec<DoctorCheck>,
}

pub fn run(json: bool) -> String {
    let report = collect_report();
    if json {
        serde_json::to_string_pretty(&report)
            .unwrap_or_else(|error| format!("{{\"error\":\"{error}\"}}"))
    } else {
        render_text(&report)
    }
}

fn collect_report() -> DoctorReport {
    let mut checks = Vec::new();

    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config",
                status: "ok",
                detail: "configuration loaded and validated".to_string(),
            });
            Some(config)
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config",
                status: "error",
                detail: error.to_string(),
            });
            None
        }
    };

    if let Some(config) = config {
        checks.push(database_check(&config));
    } else {
        checks.push(DoctorCheck {
            name: "database",
            status: "skipped",
            detail: "skipped because configuration failed".to_string(),
        });
    }

    let healthy = checks.iter().all(|check| check.status == "ok");
    DoctorReport { status: if healthy { "ready" } else { "degraded" }, checks }
}

fn database_check(config: &AppConfig) -> DoctorCheck {
    let Ok(runtime) = runtime() else {
        return DoctorCheck {
            name: "database",
            status: "error",
            detail: "failed to initialize async runtime".to_string(),
        };
    };

    let result = runtime.block_on(async {
        let pool = connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await?;
        sqlx::query_scalar::<_, i64>("SELECT 1").fetch_one(&pool).await?;
        pool.close().await;
        Ok::<(), sqlx::Error>(())
    });

    match result {
        Ok(()) => DoctorCheck {
            name: "database",
            status: "ok",
            detail: "database reachable and answering queries".to_string(),
        },
        Err(error) => {
            DoctorCheck { name: "database", status: "error", detail: error.to_string() }
        }
    }
}

fn render_text(report: &DoctorReport) -> String {
    let mut lines = vec![format!("shopchat doctor: {}", report.status)];
    for check in &report.checks {
        lines.push(format!("  [{}] {}: {}", check.status, check.name, check.detail));
    }
    lines.join("\n")
}
