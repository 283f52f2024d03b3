//! Page Chat binary.
//!
//! Terminal stand-in for the side panel: point it at a URL and chat about
//! the page. Slash commands map the panel's controls (reload, model
//! selector, export).

use anyhow::Result;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

use providers::gemini::GeminiClient;
use services::credential_store::CredentialStore;
use services::page_context::{DocumentQuery, PageContextProvider};
use shared::page::DocumentInfo;
use shared::settings::ModelTier;
use shared::transcript::Message;

mod conversation;
mod markdown;

use conversation::ConversationManager;

/// Document query backed by the command-line argument.
struct CliDocumentQuery {
    url: Option<String>,
}

#[async_trait::async_trait]
impl DocumentQuery for CliDocumentQuery {
    async fn active_document(&self) -> Option<DocumentInfo> {
        self.url.as_ref().map(|url| DocumentInfo {
            id: 1,
            url: url.clone(),
            title: String::new(),
            fav_icon_url: None,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let url = std::env::args().nth(1);
    let query = CliDocumentQuery { url };

    let store = CredentialStore::open_default();
    let client = GeminiClient::new()?;
    let provider = PageContextProvider::new()?;

    let mut mgr = ConversationManager::new(store, Box::new(client), provider);
    mgr.bootstrap();
    mgr.load_page(&query).await;

    let mut cursor = 0;
    print_new_messages(&mgr, &mut cursor);
    println!("Type a question, or /reload, /model flash|pro, /export [dir], /quit.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt()?;
    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        if line.is_empty() {
            prompt()?;
            continue;
        }

        let mut words = line.split_whitespace();
        match words.next() {
            Some("/quit") => break,
            Some("/reload") => mgr.reload_page(&query).await,
            Some("/model") => match words.next().and_then(ModelTier::parse) {
                Some(tier) => {
                    mgr.set_model(tier);
                    println!("Model set to {}.", tier.as_str());
                }
                None => println!("Usage: /model flash|pro"),
            },
            Some("/export") => {
                let dir = words.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
                match mgr.export_to(&dir) {
                    Ok(path) => println!("Saved {}", path.display()),
                    // Stand-in for the panel's blocking alert.
                    Err(e) => println!("{e}"),
                }
            }
            _ => mgr.submit(&line).await,
        }

        print_new_messages(&mgr, &mut cursor);
        prompt()?;
    }

    Ok(())
}

fn prompt() -> Result<()> {
    print!("> ");
    std::io::stdout().flush()?;
    Ok(())
}

fn print_new_messages(mgr: &ConversationManager, cursor: &mut usize) {
    for msg in &mgr.transcript().messages()[*cursor..] {
        println!("[{}] {}", msg.sender.display_name(), terminal_text(msg));
    }
    *cursor = mgr.transcript().len();
}

/// Flatten display markup for the terminal.
fn terminal_text(msg: &Message) -> String {
    msg.raw_text.replace("<br>", "\n")
}
