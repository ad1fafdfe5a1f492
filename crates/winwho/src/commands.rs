use std::time::Duration;

use clap::ArgMatches;
use tracing::{error, warn};

use winwho_core::config::WinwhoConfig;
use winwho_core::Resolver;

pub fn run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    match matches.subcommand() {
        Some(("current", sub_matches)) => handle_current_command(sub_matches),
        Some(("watch", sub_matches)) => handle_watch_command(sub_matches),
        Some(("env", _)) => handle_env_command(),
        _ => {
            error!(event = "cli.command_unknown");
            Err("Unknown command".into())
        }
    }
}

/// Load configuration with warning on errors.
///
/// Falls back to defaults if config loading fails, but notifies the user via:
/// - stderr message for immediate visibility
/// - structured log event `cli.config.load_failed` for debugging
fn load_config_with_warning() -> WinwhoConfig {
    match WinwhoConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Could not load config: {}. Using defaults.\n\
                 Tip: Check ~/.winwho/config.toml for syntax errors.",
                e
            );
            warn!(event = "cli.config.load_failed", error = %e);
            WinwhoConfig::default()
        }
    }
}

fn handle_current_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let resolver = Resolver::new(load_config_with_warning());
    let names = resolver.current_window_process_names()?;

    if matches.get_flag("json") {
        let payload = serde_json::json!({
            "environment": resolver.detect_environment().to_string(),
            "process_names": names,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        // An empty answer prints nothing: "no focused window" is a normal
        // state, not something to dress up as output.
        for name in &names {
            println!("{}", name);
        }
    }

    Ok(())
}

fn handle_watch_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let interval = Duration::from_millis(*matches.get_one::<u64>("interval-ms").unwrap_or(&250));
    let resolver = Resolver::new(load_config_with_warning());

    let mut last: Option<Vec<String>> = None;
    loop {
        match resolver.current_window_process_names() {
            Ok(names) => {
                if last.as_ref() != Some(&names) {
                    if names.is_empty() {
                        println!("-");
                    } else {
                        println!("{}", names.join(" "));
                    }
                    last = Some(names);
                }
            }
            Err(e) => {
                // Genuine backend breakage; keep polling, it may recover
                warn!(event = "cli.watch.resolve_failed", error = %e);
            }
        }
        std::thread::sleep(interval);
    }
}

fn handle_env_command() -> Result<(), Box<dyn std::error::Error>> {
    let resolver = Resolver::new(load_config_with_warning());
    println!("{}", resolver.detect_environment());
    Ok(())
}
