//! CLI entry point for webmate.

mod cli;

use clap::Parser;
use std::sync::Arc;
use webmate::config::{load_config, load_instructions};
use webmate::mcp::ToolServer;
use webmate::preflight;
use webmate::render::{ChatSink, Renderer};
use webmate::runtime::http::HttpAgentRuntime;
use webmate::session::ChatSession;
use webmate::turn::TurnController;

#[tokio::main]
async fn main() {
    let args = cli::Args::parse();
    init_tracing();

    // Load config and apply CLI overrides.
    let mut config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };
    if let Some(turns) = args.memory_turns() {
        config.memory_turns = turns;
    }
    if let Some(model) = &args.model {
        config.api.model = model.clone();
    }
    if let Some(url) = &args.base_url {
        config.api.base_url = url.clone();
    }
    if args.no_color {
        config.display.color = false;
    }

    let renderer = Renderer::new(config.display.color);

    // Preflight before any chat state exists: config sanity, then the
    // launcher the tool server depends on.
    if let Err(msg) = preflight::validate_config(&config) {
        renderer.error(&msg);
        std::process::exit(1);
    }
    if let Err(msg) = preflight::ensure_launcher_available(&config.tool_server.command) {
        renderer.error(&msg);
        std::process::exit(1);
    }

    let instructions = match load_instructions(&config) {
        Ok(instructions) => instructions,
        Err(err) => {
            renderer.error(&err.to_string());
            std::process::exit(1);
        }
    };

    // The tool server lives for the whole session. kill_on_drop guards the
    // error paths; the normal path shuts it down explicitly below.
    let server = match ToolServer::start(&config.tool_server).await {
        Ok(server) => server,
        Err(err) => {
            renderer.error(&err.to_string());
            std::process::exit(1);
        }
    };

    renderer.system(&format!(
        "🚀 Chat started. Memory: {} turns.",
        config.memory_turns
    ));
    renderer.system("✏️ Type your request (exit/quit/salir to leave)\n");

    let runtime = Arc::new(HttpAgentRuntime::new(&config, instructions));
    let controller = TurnController::new(runtime, config.memory_turns);
    let mut session = ChatSession::new(controller);

    let result = session.run(&renderer).await;
    server.shutdown().await;

    if let Err(err) = result {
        renderer.error(&format!("session failed: {err}"));
        std::process::exit(1);
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env("WEBMATE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
