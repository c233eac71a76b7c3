//! pitwall - entry point.
//!
//! Two modes: `repl` (default) runs the chat loop in the terminal, `serve`
//! starts the HTTP chat server.

use std::io::{self, Write};

use anyhow::anyhow;
use pitwall::agent::ChatSession;
use pitwall::{api, build_agent, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pitwall=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mode = std::env::args().nth(1).unwrap_or_else(|| "repl".to_string());

    if mode == "-h" || mode == "--help" {
        println!("pitwall - conversational assistant for Formula 1 data");
        println!();
        println!("Usage: pitwall [MODE]");
        println!();
        println!("Modes:");
        println!("  repl     Interactive terminal chat (default)");
        println!("  serve    Start the HTTP chat server");
        println!();
        println!("Requires OPENROUTER_API_KEY to be set. See src/config.rs for");
        println!("the full list of environment variables.");
        return Ok(());
    }

    let config = Config::from_env()?;
    tracing::info!("loaded configuration: model={}", config.model);

    match mode.as_str() {
        "serve" => api::serve(config).await,
        "repl" => run_repl(config).await,
        other => Err(anyhow!("unknown mode '{}', use 'repl' or 'serve'", other)),
    }
}

async fn run_repl(config: Config) -> anyhow::Result<()> {
    let agent = build_agent(&config);
    let mut session = ChatSession::new();

    println!("pitwall - ask me about F1 sessions, drivers, and lap times.");
    println!("Example: What was George Russell's lap time on lap 8 of Bahrain?");
    println!("Type 'quit' to exit.\n");

    loop {
        print!("You: ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();
        if input.is_empty() {
            continue;
        }
        if matches!(input, "quit" | "exit" | "bye") {
            break;
        }

        match agent.run_turn(&mut session, input).await {
            Ok(reply) => println!("\npitwall: {}\n", reply),
            // A failed turn is not fatal; report it and keep the session.
            Err(e) => println!("\npitwall: Sorry, something went wrong: {}\n", e),
        }
    }

    println!("Thanks for using pitwall!");
    Ok(())
}
