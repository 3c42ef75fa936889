//! PaperSage — exam-paper topic prediction server.

use std::sync::Arc;

use papersage_core::PaperSageConfig;
use papersage_server::{build_router, cli, AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    // Handle CLI subcommands
    if args.len() > 1 {
        match args[1].as_str() {
            "analyze" => {
                let parsed = match cli::parse_analyze_args(&args[2..]) {
                    Ok(parsed) => parsed,
                    Err(e) => {
                        eprintln!("{}", e);
                        eprintln!("Usage: papersage analyze <file>... [--subject S]");
                        std::process::exit(1);
                    }
                };
                let state = AppState::from_config(PaperSageConfig::from_env()?)?;
                let value =
                    cli::analyze_files(&state.analyzer, &parsed.files, parsed.subject.as_deref())?;
                println!("{}", serde_json::to_string_pretty(&value)?);
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                println!("PaperSage — exam-paper topic prediction");
                println!();
                println!("Usage: papersage [command]");
                println!();
                println!("Commands:");
                println!("  (none)                          Start the server");
                println!("  analyze <file>... [--subject S] Analyze local PDF/text papers");
                println!("  help                            Show this help message");
                return Ok(());
            }
            _ => {
                eprintln!("Unknown command: {}. Use 'papersage help' for usage.", args[1]);
                std::process::exit(1);
            }
        }
    }

    let config = PaperSageConfig::from_env()?;
    let port = config.port;
    let state = Arc::new(AppState::from_config(config)?);
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("PaperSage server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
