//! analyst-chat - terminal front end for the Analyst Assistant
//!
//! Plain lines are sent as questions. Commands:
//! `/new` starts a new conversation, `/toggle <turn> <page>` expands or
//! collapses a citation group, `/quit` exits.

use analyst_assistant::answer::{HttpAnswerService, LoggingService};
use analyst_assistant::config::ChatConfig;
use analyst_assistant::conversation::Turn;
use analyst_assistant::runtime::{self, ChatHandle, ChatSnapshot};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Parsed input line
#[derive(Debug, PartialEq)]
enum Command {
    Ask(String),
    New,
    Toggle { turn_index: usize, page: u32 },
    Quit,
    Unknown(String),
}

fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Command::Ask(line.to_string());
    };

    let mut parts = rest.split_whitespace();
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some("new"), None, ..) => Command::New,
        (Some("quit" | "exit"), None, ..) => Command::Quit,
        (Some("toggle"), Some(turn), Some(page), None) => {
            match (turn.parse::<usize>(), page.parse::<u32>()) {
                (Ok(turn_index), Ok(page)) => Command::Toggle { turn_index, page },
                _ => Command::Unknown(trimmed.to_string()),
            }
        }
        _ => Command::Unknown(trimmed.to_string()),
    }
}

fn render_turn(snapshot: &ChatSnapshot, index: usize) -> String {
    let Some(turn) = snapshot.turns.get(index) else {
        return String::new();
    };

    match turn {
        Turn::User { text } => format!("[{index}] Tú: {text}"),
        Turn::Assistant { answer, .. } => {
            let mut out = format!("[{index}] Asistente: {answer}");
            for group in snapshot.citation_view(index) {
                let noun = if group.count == 1 { "cita" } else { "citas" };
                let marker = if group.expanded { "▾" } else { "▸" };
                out.push_str(&format!("\n    {marker} Pág. {} ({} {noun})", group.page, group.count));
                if group.expanded {
                    for citation in &group.citations {
                        out.push_str(&format!(
                            "\n        [{:.2}] {}",
                            citation.relevance_score, citation.text
                        ));
                    }
                }
            }
            out
        }
    }
}

fn print_from(snapshot: &ChatSnapshot, start: usize) {
    for index in start..snapshot.turns.len() {
        println!("{}", render_turn(snapshot, index));
    }
}

async fn run_repl(handle: &ChatHandle) -> Result<(), Box<dyn std::error::Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("Analyst Assistant. /new, /toggle <turno> <página>, /quit");

    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Command::Quit => break,
            Command::New => {
                handle.reset().await?;
                println!("-- Nueva conversación --");
            }
            Command::Toggle { turn_index, page } => {
                let snapshot = handle.toggle_citations(turn_index, page).await?;
                println!("{}", render_turn(&snapshot, turn_index));
            }
            Command::Unknown(cmd) => println!("Comando desconocido: {cmd}"),
            Command::Ask(text) => {
                let before = handle.snapshot().turns.len();
                let snapshot = handle.submit(text).await?;
                if snapshot.turns.len() == before {
                    continue;
                }
                println!("...");
                let snapshot = handle.wait_until_idle().await?;
                print_from(&snapshot, before + 1);
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "analyst_assistant=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = ChatConfig::from_env()?;
    let http = HttpAnswerService::from_config(&config)?;

    match http.health().await {
        Ok(()) => tracing::info!(api_base = %config.api_base, "Backend reachable"),
        Err(e) => tracing::warn!(
            api_base = %config.api_base,
            error = %e,
            "Backend health check failed; queries will fall back until it is up"
        ),
    }

    let service = LoggingService::new(Arc::new(http));
    let handle = runtime::spawn(config.dispatch_context(), service);

    run_repl(&handle).await
}
