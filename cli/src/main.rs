use std::io::{self, BufRead, Write};
use std::str::FromStr;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use serde_json::Value;

use api::ai::HttpAssistant;
use api::db::repository::DEFAULT_DB_URL;
use api::domain::request::{ApiRequest, HttpMethod};
use api::history::{ComparisonForm, HistoryStore};
use api::DiffApi;

#[derive(Parser)]
#[command(
    name = "diff-detective",
    about = "Compare two JSON API responses and explain the differences"
)]
struct Cli {
    /// Sqlite database holding the request history
    #[arg(long, env = "DIFF_DETECTIVE_DB", default_value = DEFAULT_DB_URL)]
    db: String,
    /// Base URL of the diff assistant service
    #[arg(long, env = "DIFF_ASSISTANT_URL", default_value = "http://localhost:9090")]
    ai_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch both endpoints, summarize the differences, suggest fixes
    Compare {
        #[arg(long)]
        url1: String,
        #[arg(long, default_value = "GET")]
        method1: String,
        /// JSON payload for the first request
        #[arg(long)]
        data1: Option<String>,
        #[arg(long)]
        url2: String,
        #[arg(long, default_value = "GET")]
        method2: String,
        /// JSON payload for the second request
        #[arg(long)]
        data2: Option<String>,
    },
    /// Inspect the stored request history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
}

#[derive(Subcommand)]
enum HistoryAction {
    /// Show the stored log, oldest first
    List,
    /// Copy an entry into a fresh comparison form (first slot)
    Load { index: usize },
    /// Delete an entry by its position
    Delete {
        index: usize,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

fn build_request(url: String, method: &str, data: Option<String>) -> anyhow::Result<ApiRequest> {
    let method =
        HttpMethod::from_str(method).map_err(|_| anyhow!("unsupported method: {}", method))?;
    let data = match data {
        Some(raw) => serde_json::from_str::<Value>(&raw)
            .with_context(|| format!("request data is not valid JSON: {}", raw))?,
        None => Value::Null,
    };
    Ok(ApiRequest { url, method, data })
}

fn print_pane(title: &str, content: Option<&String>) {
    println!("--- {} ---", title);
    match content {
        Some(text) => println!("{}", text),
        None => println!("(none)"),
    }
    println!();
}

fn print_entry(index: usize, entry: &ApiRequest) {
    println!(
        "{}. {} {} data={}",
        index + 1,
        entry.method,
        entry.url,
        entry.data
    );
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

async fn run_compare(
    db_url: &str,
    ai_url: String,
    request1: ApiRequest,
    request2: ApiRequest,
) -> anyhow::Result<()> {
    let assistant = Box::new(HttpAssistant::new(ai_url));
    let mut app = DiffApi::new(db_url, assistant).await?;
    match app.run_comparison(request1, request2).await {
        Ok(report) => {
            print_pane("Response 1", Some(&report.response1_text));
            print_pane("Response 2", Some(&report.response2_text));
            print_pane("Differences Summary", Some(&report.differences));
            print_pane("Suggestions", Some(&report.suggestions));
            Ok(())
        }
        Err(e) => {
            // show whatever stages completed before the failure
            print_pane("Response 1", app.panes.response1.as_ref());
            print_pane("Response 2", app.panes.response2.as_ref());
            print_pane("Differences Summary", app.panes.differences.as_ref());
            print_pane("Suggestions", app.panes.suggestions.as_ref());
            Err(e.context("failed to fetch data or analyze differences"))
        }
    }
}

async fn run_history(db_url: &str, action: HistoryAction) -> anyhow::Result<()> {
    let mut store = HistoryStore::open(db_url).await?;
    match action {
        HistoryAction::List => {
            if store.log().is_empty() {
                println!("history is empty");
            }
            for (i, entry) in store.log().entries().iter().enumerate() {
                print_entry(i, entry);
            }
        }
        HistoryAction::Load { index } => {
            let entry = store
                .log()
                .entries()
                .get(index.checked_sub(1).ok_or_else(|| anyhow!("indexes start at 1"))?)
                .ok_or_else(|| anyhow!("no history entry at position {}", index))?;
            let mut form = ComparisonForm::default();
            form.load_entry(entry);
            println!(
                "compare --url1 {} --method1 {} --data1 '{}' --url2 <fill me>",
                form.request1.url, form.request1.method, form.request1.data
            );
        }
        HistoryAction::Delete { index, yes } => {
            let position = index
                .checked_sub(1)
                .ok_or_else(|| anyhow!("indexes start at 1"))?;
            match store.log().entries().get(position) {
                Some(entry) => {
                    print_entry(position, entry);
                    if !yes && !confirm("Delete this entry? This action cannot be undone.")? {
                        println!("aborted");
                        return Ok(());
                    }
                    store.remove(position).await?;
                    println!("deleted");
                }
                None => println!("no history entry at position {}", index),
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let Cli {
        db,
        ai_url,
        command,
    } = Cli::parse();
    log::info!("using history database at {}", db);
    match command {
        Command::Compare {
            url1,
            method1,
            data1,
            url2,
            method2,
            data2,
        } => {
            let request1 = build_request(url1, &method1, data1)?;
            let request2 = build_request(url2, &method2, data2)?;
            run_compare(&db, ai_url, request1, request2).await
        }
        Command::History { action } => run_history(&db, action).await,
    }
}
