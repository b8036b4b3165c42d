use crate::commands::CommandResult;
use fleetdesk_core::config::{AppConfig, LoadOptions};
use fleetdesk_db::{connect_with_settings, migrations};

/// Preflight: config must validate, the database must answer, and the
/// baseline schema must already be in place (run `fleetdesk migrate`
/// first).
pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "start",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "start",
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

        let schema_ready = migrations::schema_ready(&pool)
            .await
            .map_err(|error| ("schema_check", error.to_string(), 5u8))?;

        pool.close().await;

        if !schema_ready {
            return Err((
                "schema_missing",
                "baseline schema is absent; run `fleetdesk migrate` first".to_string(),
                5u8,
            ));
        }
        Ok::<(), (&'static str, String, u8)>(())
    });

    match result {
        Ok(()) => CommandResult::success("start", "preflight checks passed; runtime is ready"),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("start", error_class, message, exit_code)
        }
    }
}
