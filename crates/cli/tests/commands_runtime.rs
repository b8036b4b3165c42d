use std::env;
use std::sync::{Mutex, OnceLock};

use fleetdesk_cli::commands::{migrate, seed, start};
use serde_json::Value;

#[test]
fn start_reports_missing_schema_on_a_fresh_database() {
    with_env(&[("FLEETDESK_DATABASE_URL", "sqlite::memory:"), ("FLEETDESK_DATABASE_MAX_CONNECTIONS", "1")], || {
        let result = start::run();
        assert_eq!(result.exit_code, 5, "fresh database has no baseline schema");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "start");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "schema_missing");
    });
}

#[test]
fn start_returns_config_failure_for_non_sqlite_url() {
    with_env(&[("FLEETDESK_DATABASE_URL", "postgres://nope")], || {
        let result = start::run();
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "start");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn migrate_returns_success_with_valid_env() {
    with_env(&[("FLEETDESK_DATABASE_URL", "sqlite::memory:"), ("FLEETDESK_DATABASE_MAX_CONNECTIONS", "1")], || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 0, "expected successful migrate run");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "migrate");
        assert_eq!(payload["status"], "ok");
    });
}

#[test]
fn seed_returns_success_with_valid_env() {
    with_env(&[("FLEETDESK_DATABASE_URL", "sqlite::memory:"), ("FLEETDESK_DATABASE_MAX_CONNECTIONS", "1")], || {
        let result = seed::run();
        assert_eq!(result.exit_code, 0, "expected seed success");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "seed");
        assert_eq!(payload["status"], "ok");

        let message = payload["message"].as_str().unwrap_or("");
        assert!(message.contains("org-hauler-demo"));
        assert!(message.contains("pending edit request"));
    });
}

#[test]
fn seed_is_idempotent_across_runs() {
    with_env(&[("FLEETDESK_DATABASE_URL", "sqlite::memory:"), ("FLEETDESK_DATABASE_MAX_CONNECTIONS", "1")], || {
        let first = seed::run();
        assert_eq!(first.exit_code, 0, "expected first seed invocation success");
        let first_payload = parse_payload(&first.output);
        assert_eq!(first_payload["status"], "ok");

        let second = seed::run();
        assert_eq!(second.exit_code, 0, "expected second seed invocation success");
        let second_payload = parse_payload(&second.output);
        assert_eq!(second_payload["status"], "ok");

        assert_eq!(first_payload["message"], second_payload["message"]);
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "FLEETDESK_DATABASE_URL",
        "FLEETDESK_DATABASE_MAX_CONNECTIONS",
        "FLEETDESK_DATABASE_TIMEOUT_SECS",
        "FLEETDESK_NOTIFY_ENABLED",
        "FLEETDESK_NOTIFY_WEBHOOK_URL",
        "FLEETDESK_NOTIFY_AUTH_TOKEN",
        "FLEETDESK_NOTIFY_TIMEOUT_SECS",
        "FLEETDESK_SERVER_BIND_ADDRESS",
        "FLEETDESK_SERVER_HEALTH_CHECK_PORT",
        "FLEETDESK_SERVER_GRACEFUL_SHUTDOWN_SECS",
        "FLEETDESK_LOGGING_LEVEL",
        "FLEETDESK_LOGGING_FORMAT",
        "FLEETDESK_LOG_LEVEL",
        "FLEETDESK_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
