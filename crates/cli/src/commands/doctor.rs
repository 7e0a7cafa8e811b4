//! Doctor command - validate configuration and show status

use anyhow::Result;
use devpulse_adapters::state::SqliteUserStateStore;
use devpulse_domain::ports::UserStateStore;
use serde::Serialize;
use std::path::PathBuf;

use crate::args::DoctorArgs;
use crate::config::AppConfig;

#[derive(Debug, Serialize)]
struct DoctorReport {
    config: CheckResult,
    sources: CheckResult,
    newsapi: CheckResult,
    state: CheckResult,
    overall: String,
}

#[derive(Debug, Serialize)]
struct CheckResult {
    status: String,
    message: String,
    details: Option<serde_json::Value>,
}

impl CheckResult {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            message: message.into(),
            details: None,
        }
    }

    fn warn(message: impl Into<String>) -> Self {
        Self {
            status: "warn".to_string(),
            message: message.into(),
            details: None,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            details: None,
        }
    }

    fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    fn is_ok(&self) -> bool {
        self.status == "ok"
    }

    fn is_error(&self) -> bool {
        self.status == "error"
    }
}

pub async fn execute(args: DoctorArgs, config_path: Option<PathBuf>) -> Result<()> {
    let mut report = DoctorReport {
        config: CheckResult::error("Not checked"),
        sources: CheckResult::error("Not checked"),
        newsapi: CheckResult::error("Not checked"),
        state: CheckResult::error("Not checked"),
        overall: "error".to_string(),
    };

    let config = match AppConfig::load(config_path.as_deref()) {
        Ok(c) => {
            report.config = CheckResult::ok("Configuration loaded successfully");
            Some(c)
        }
        Err(e) => {
            report.config = CheckResult::error(format!("Failed to load config: {}", e));
            None
        }
    };

    if let Some(ref config) = config {
        report.sources = check_sources(config);
        report.newsapi = check_newsapi(config);
        report.state = check_state(config).await;
    }

    let checks = [&report.config, &report.sources, &report.state];
    let has_error = checks.iter().any(|c| c.is_error());
    let all_ok = checks.iter().all(|c| c.is_ok()) && report.newsapi.is_ok();

    report.overall = if has_error {
        "error".to_string()
    } else if all_ok {
        "ok".to_string()
    } else {
        "warn".to_string()
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if report.overall == "error" {
        std::process::exit(1);
    }

    Ok(())
}

fn check_sources(config: &AppConfig) -> CheckResult {
    if config.default_category().is_err() {
        return CheckResult::error(format!(
            "Invalid default_category: {}",
            config.general.default_category
        ));
    }

    let enabled = config.sources.enabled_sources();
    if enabled.is_empty() {
        return CheckResult::error("No sources enabled");
    }

    let names: Vec<&str> = enabled.iter().map(|s| s.as_str()).collect();
    CheckResult::ok(format!("{} source(s) enabled", enabled.len()))
        .with_details(serde_json::json!({ "enabled": names }))
}

fn check_newsapi(config: &AppConfig) -> CheckResult {
    if !config.sources.newsapi {
        return CheckResult::ok("NewsAPI disabled");
    }

    let env_var = &config.sources.newsapi_key_env;
    if env_var.is_empty() {
        return CheckResult::warn("NewsAPI enabled but no key env var configured");
    }

    // Presence only; the value is never shown
    match std::env::var(env_var) {
        Ok(val) if !val.is_empty() => CheckResult::ok(format!("API key: {} (set)", env_var)),
        _ => CheckResult::warn(format!(
            "API key: {} (not set), NewsAPI will be skipped",
            env_var
        )),
    }
}

async fn check_state(config: &AppConfig) -> CheckResult {
    match SqliteUserStateStore::new(&config.general.state_db_path).await {
        Ok(store) => {
            let history_len = match store.read_history().await {
                Ok(history) => history.len(),
                Err(e) => return CheckResult::error(format!("State db unreadable: {}", e)),
            };
            CheckResult::ok(format!(
                "State db: {} ({} history entries)",
                config.general.state_db_path.display(),
                history_len
            ))
        }
        Err(e) => CheckResult::error(format!("Failed to open state db: {}", e)),
    }
}

fn print_report(report: &DoctorReport) {
    println!("devpulse Doctor Report");
    println!("======================");
    println!();

    print_check("Config", &report.config);
    print_check("Sources", &report.sources);
    print_check("NewsAPI", &report.newsapi);
    print_check("State", &report.state);

    println!();
    let symbol = match report.overall.as_str() {
        "ok" => "✓",
        "warn" => "⚠",
        _ => "✗",
    };
    println!("{} Overall: {}", symbol, report.overall.to_uppercase());

    if report.overall == "ok" {
        println!();
        println!("Ready to run! Try: devpulse fetch");
    }
}

fn print_check(name: &str, result: &CheckResult) {
    let symbol = match result.status.as_str() {
        "ok" => "✓",
        "warn" => "⚠",
        _ => "✗",
    };
    println!("{} {}: {}", symbol, name, result.message);
}
