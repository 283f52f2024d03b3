//! Conversation state machine.
//!
//! Owns the transcript and the per-panel session state, and orchestrates
//! credential bootstrap, page-context loading, turn submission, and export.

use crate::markdown::{escape_html, rendered_for};
use providers::CompletionClient;
use services::credential_store::CredentialStore;
use services::export::{self, ExportError};
use services::page_context::{ContextStatus, DocumentQuery, PageContextProvider, PageSnapshot};
use shared::page::ActiveDocument;
use shared::settings::ModelTier;
use shared::transcript::{Message, Sender, Transcript};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Key capture accepts inputs shaped like a Google AI Studio key.
const KEY_PREFIX: &str = "AIza";
const KEY_MIN_LEN: usize = 30;

/// Whether an input syntactically looks like an API key.
pub fn looks_like_api_key(input: &str) -> bool {
    input.starts_with(KEY_PREFIX) && input.len() > KEY_MIN_LEN
}

/// Panel lifecycle phase. `Ready` is terminal for the session; re-keying
/// requires external action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelPhase {
    AwaitingKey,
    Ready,
}

/// Per-panel mutable state. Created on open, discarded on close; only the
/// api key outlives the panel (through the credential store).
#[derive(Debug, Default)]
pub struct SessionState {
    pub api_key: String,
    pub page_context: String,
    pub active_document: Option<ActiveDocument>,
    pub selected_model: ModelTier,
    /// Gate: one completion request at a time.
    pub request_in_flight: bool,
}

pub struct ConversationManager {
    state: SessionState,
    phase: PanelPhase,
    transcript: Transcript,
    store: CredentialStore,
    client: Box<dyn CompletionClient>,
    provider: PageContextProvider,
}

impl ConversationManager {
    pub fn new(
        store: CredentialStore,
        client: Box<dyn CompletionClient>,
        provider: PageContextProvider,
    ) -> Self {
        Self {
            state: SessionState::default(),
            phase: PanelPhase::AwaitingKey,
            transcript: Transcript::new(),
            store,
            client,
            provider,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn phase(&self) -> PanelPhase {
        self.phase
    }

    pub fn model(&self) -> ModelTier {
        self.state.selected_model
    }

    pub fn set_model(&mut self, tier: ModelTier) {
        self.state.selected_model = tier;
    }

    pub fn active_document(&self) -> Option<&ActiveDocument> {
        self.state.active_document.as_ref()
    }

    /// Read the persisted key and set the starting phase. A keyless panel
    /// opens with a prompt for the key.
    pub fn bootstrap(&mut self) {
        match self.store.get() {
            Some(key) => {
                self.state.api_key = key;
                self.phase = PanelPhase::Ready;
            }
            None => {
                self.phase = PanelPhase::AwaitingKey;
                self.push_system(
                    "No API key configured.<br>\
                     Paste your Google AI Studio API key below to get started.",
                );
            }
        }
    }

    /// Initial page-context load.
    pub async fn load_page(&mut self, query: &dyn DocumentQuery) {
        let snapshot = self.provider.load(query).await;
        self.apply_snapshot(snapshot, false);
    }

    /// Explicit reload. Announces before and after; the transcript and the
    /// key are otherwise untouched.
    pub async fn reload_page(&mut self, query: &dyn DocumentQuery) {
        self.push_system("Reloading page content...");
        let snapshot = self.provider.load(query).await;
        self.apply_snapshot(snapshot, true);
    }

    fn apply_snapshot(&mut self, snapshot: PageSnapshot, announce_all: bool) {
        self.state.active_document = snapshot.document;
        self.state.page_context = snapshot.text;

        match snapshot.status {
            ContextStatus::Restricted => {
                self.push_system("Page chat is not available on this page.");
            }
            ContextStatus::Loaded => {
                // On the initial load a keyless panel shows only the key
                // prompt; explicit reloads always report the outcome.
                if announce_all || !self.state.api_key.is_empty() {
                    self.push_system("Page loaded.");
                }
            }
            ContextStatus::Empty => {
                if announce_all {
                    self.push_system("No page content available.");
                }
            }
        }
    }

    /// Handle one user submission: key capture while awaiting a key, a
    /// completion turn once ready.
    pub async fn submit(&mut self, input: &str) {
        let input = input.trim();
        if input.is_empty() {
            return;
        }

        if self.phase == PanelPhase::AwaitingKey {
            self.capture_key(input);
            return;
        }

        if self.state.request_in_flight {
            tracing::warn!("ignoring submission while a request is in flight");
            return;
        }
        self.state.request_in_flight = true;

        self.push_user(input);
        let pending = self.push_system("Thinking...");

        let result = self
            .client
            .send(
                &self.state.api_key,
                input,
                &self.state.page_context,
                self.state.selected_model,
            )
            .await;

        // The placeholder never outlives the turn.
        self.transcript.remove(pending);
        self.state.request_in_flight = false;

        match result {
            Ok(reply) => {
                self.push_model(&reply);
            }
            Err(err) if err.is_auth_error() => {
                tracing::warn!(error = %err, "completion failed with an auth-shaped error");
                self.push_error(
                    "The request failed and your API key may be invalid.<br>\
                     Reset the key and try again.",
                );
            }
            Err(err) => {
                tracing::warn!(error = %err, "completion failed");
                self.push_error(&format!(
                    "An error occurred:<br>{}",
                    escape_html(&err.to_string())
                ));
            }
        }
    }

    /// Key capture path. No network call happens in this phase.
    fn capture_key(&mut self, input: &str) {
        if !looks_like_api_key(input) {
            self.push_error(
                "That does not look like a valid API key.<br>\
                 Keys start with AIza and are longer than 30 characters.",
            );
            return;
        }

        if let Err(e) = self.store.set(input) {
            tracing::error!(error = %e, "failed to persist api key");
            self.push_error(
                "Could not save the API key.<br>\
                 Check that the configuration directory is writable.",
            );
            return;
        }

        self.state.api_key = input.to_string();
        self.phase = PanelPhase::Ready;
        self.push_system("API key saved.<br>Ask a question about this page to get started.");
    }

    /// Export the transcript to a Markdown file in `dir`.
    pub fn export_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        export::write_export(dir, &self.transcript, self.state.active_document.as_ref())
    }

    fn push(&mut self, sender: Sender, raw: &str) -> Uuid {
        let html = rendered_for(sender, raw);
        self.transcript.append(Message::new(sender, raw, html))
    }

    fn push_user(&mut self, raw: &str) {
        self.push(Sender::User, raw);
    }

    fn push_model(&mut self, raw: &str) {
        self.push(Sender::Model, raw);
    }

    fn push_system(&mut self, markup: &str) -> Uuid {
        self.push(Sender::System, markup)
    }

    fn push_error(&mut self, markup: &str) {
        self.push(Sender::Error, markup);
    }
}
