use crate::config::{DEFAULT_LOG_LEVEL, Settings};
use serde_json::{Value, json};
use std::fmt::Display;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tsirouters_registry::{Notice, Registry};

/// Exit status for advisory notices with error severity.
pub const EXIT_NOTICE: i32 = 1;
/// Exit status for store, filesystem and configuration faults.
pub const EXIT_FAULT: i32 = 2;

/// `RUST_LOG` wins; otherwise the configured level.
pub fn init_logging(level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}

pub fn fail(context: &str, err: impl Display) -> ! {
    eprintln!("error: {context}: {err}");
    std::process::exit(EXIT_FAULT);
}

pub fn open_registry_or_exit(settings: &Settings) -> Registry {
    Registry::open(&settings.data_dir).unwrap_or_else(|e| {
        fail(
            &format!("failed to open registry {}", settings.data_dir.display()),
            e,
        )
    })
}

pub fn print_json(payload: &Value) {
    println!(
        "{}",
        serde_json::to_string_pretty(payload).expect("json serialization")
    );
}

/// Print a notice for `action` and exit non-zero if it is an advisory error.
pub fn finish_with_notice(action: &str, notice: &Notice, json_output: bool) {
    if json_output {
        print_json(&json!({
            "action": action,
            "notice": notice,
        }));
    } else {
        println!("tsirouters {action}\n  {notice}");
    }
    if notice.is_error() {
        std::process::exit(EXIT_NOTICE);
    }
}

pub fn yes_no(ok: bool) -> &'static str {
    if ok { "yes" } else { "no" }
}
