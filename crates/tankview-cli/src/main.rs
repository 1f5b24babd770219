//! `tankview` – live water-tank visualization client.
//!
//! 1. Loads `tankview.toml` (falling back to defaults when absent).
//! 2. Reads the static SVG process diagram and binds all required elements,
//!    capturing the empty-tank reference geometry before the first frame.
//! 3. Connects to the tank simulation server, sends the greeting, and
//!    renders every telemetry frame onto the diagram.
//! 4. Persists the updated diagram after each frame so a browser or viewer
//!    can display it live; exits when the server closes the connection.

mod config;

use colored::Colorize;
use tracing::{debug, error, info, warn};

use tankview_client::{SvgDiagram, TankClient, TankConnection};

#[tokio::main]
async fn main() {
    // ── Structured logging ────────────────────────────────────────────────
    // Initialise tracing-subscriber using RUST_LOG (defaults to "info").
    // Set TANKVIEW_LOG_FORMAT=json to emit newline-delimited JSON logs
    // suitable for log aggregators.
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    if std::env::var("TANKVIEW_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .compact()
            .init();
    }

    print_banner();

    // ── Configuration ─────────────────────────────────────────────────────
    let cfg = match config::load() {
        Ok(Some(cfg)) => {
            println!(
                "  Config loaded from {}",
                config::config_path().display().to_string().bold()
            );
            cfg
        }
        Ok(None) => {
            let mut cfg = config::Config::default();
            match config::save(&cfg) {
                Ok(()) => println!(
                    "  No config file found; defaults written to {}",
                    config::config_path().display().to_string().bold()
                ),
                Err(e) => println!("{}: {}", "Could not write default config".yellow(), e),
            }
            config::apply_env_overrides(&mut cfg);
            cfg
        }
        Err(e) => {
            println!("{}: {}", "Config error".red(), e);
            println!("  Using default configuration.");
            config::Config::default()
        }
    };

    // ── Diagram binding ───────────────────────────────────────────────────
    // The reference geometry must be captured before the connection opens.
    let diagram = match SvgDiagram::load(&cfg.diagram_path) {
        Ok(diagram) => diagram,
        Err(e) => {
            error!(error = %e, path = %cfg.diagram_path.display(), "cannot load diagram");
            std::process::exit(1);
        }
    };
    let mut client = match TankClient::bind(diagram) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "diagram does not satisfy the visual asset contract");
            std::process::exit(1);
        }
    };
    info!(reference = ?client.reference(), "diagram bound");

    // ── Connection run loop ───────────────────────────────────────────────
    println!(
        "  Connecting to {} …\n",
        cfg.server_url.as_str().dimmed()
    );
    let mut connection = TankConnection::new(cfg.server_url.as_str())
        .with_greeting(cfg.greeting.as_str());

    let output_path = cfg.output_path.clone();
    let result = connection
        .run(&mut client, |client, frame| {
            if let Err(e) = std::fs::write(&output_path, client.svg()) {
                warn!(error = %e, path = %output_path.display(), "failed to persist rendered diagram");
            } else {
                debug!(level = frame.level, inflow = frame.inflow, "frame rendered");
            }
        })
        .await;

    match result {
        Ok(()) => {
            println!("\n  {}", "Connection closed by server.  Exiting.".yellow());
        }
        Err(e) => {
            error!(error = %e, "connection failed");
            std::process::exit(1);
        }
    }
}

fn print_banner() {
    println!();
    println!("{}", "  ╔══════════════════════════════════════╗".bold().cyan());
    println!("{}", "  ║      tankview – live tank display    ║".bold().cyan());
    println!("{}", "  ╚══════════════════════════════════════╝".bold().cyan());
    println!();
}
