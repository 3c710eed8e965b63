//! overview-nav - Keyboard navigation for a desktop overview
//!
//! The library is meant to be embedded in a shell. The binary only drives
//! the simulated overview for manual and scripted testing:
//! - **test**: read commands on stdin, answer with JSON or ASCII renders
//!
//! Run without arguments to see the available options.

use std::path::Path;

static USAGE: &[&str] = &[
    "--test : Drive a simulated overview from commands on stdin.",
    "         Options: --windows N (default: 4)",
    "                  --workspaces N (default: 4)",
    "                  --ascii-size WIDTHxHEIGHT (default: 96x27)",
    "                  --config FILE (default: $OVERVIEW_NAV_CONFIG)",
];

fn main() {
    if let Ok(env_filter) = tracing_subscriber::EnvFilter::try_from_default_env() {
        tracing_subscriber::fmt()
            .compact()
            .with_writer(std::io::stderr)
            .with_env_filter(env_filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .compact()
            .with_writer(std::io::stderr)
            .init();
    }

    profiling::register_thread!("Main Thread");

    let arg = ::std::env::args().nth(1);
    match arg.as_ref().map(|s| &s[..]) {
        Some("--test") => {
            let mut mode = overview_nav::test_mode::TestModeConfig::default();
            let mut config_file = None;

            let args: Vec<String> = ::std::env::args().collect();
            let mut i = 2;
            while i < args.len() {
                if args[i] == "--ascii-size" && i + 1 < args.len() {
                    if let Some((width, height)) = args[i + 1].split_once('x') {
                        if let (Ok(w), Ok(h)) = (width.parse::<usize>(), height.parse::<usize>()) {
                            mode.ascii_width = w;
                            mode.ascii_height = h;
                            tracing::info!("Using custom ASCII size: {w}x{h}");
                        }
                    }
                    i += 2;
                } else if args[i] == "--windows" && i + 1 < args.len() {
                    match args[i + 1].parse::<usize>() {
                        Ok(count) => mode.windows = count,
                        Err(_) => tracing::warn!("Ignoring window count {}", args[i + 1]),
                    }
                    i += 2;
                } else if args[i] == "--workspaces" && i + 1 < args.len() {
                    match args[i + 1].parse::<usize>() {
                        Ok(count) if count > 0 => mode.workspaces = count,
                        _ => tracing::warn!("Ignoring workspace count {}", args[i + 1]),
                    }
                    i += 2;
                } else if args[i] == "--config" && i + 1 < args.len() {
                    config_file = Some(args[i + 1].clone());
                    tracing::info!("Using config file: {}", args[i + 1]);
                    i += 2;
                } else {
                    tracing::warn!("Ignoring argument {}", args[i]);
                    i += 1;
                }
            }

            let config = match config_file {
                Some(path) => overview_nav::config::Config::load_from_file(Path::new(&path)),
                None => overview_nav::config::Config::load(),
            };
            mode.config = match config {
                Ok(config) => config,
                Err(e) => {
                    tracing::error!("Failed to load config: {e}");
                    std::process::exit(1);
                }
            };

            tracing::info!("Starting overview-nav test mode");
            if let Err(e) = overview_nav::test_mode::run_test_mode(mode) {
                tracing::error!("Fatal error: {e}");
                std::process::exit(1);
            }
        }
        Some(other) => {
            tracing::error!("Unknown option: {other}");
            std::process::exit(2);
        }
        None => {
            #[allow(clippy::disallowed_macros)]
            {
                println!("USAGE: overview-nav --test [options]");
                println!();
                println!("Possible modes are:");
                for line in USAGE {
                    println!("\t{line}");
                }
            }
        }
    }
}
