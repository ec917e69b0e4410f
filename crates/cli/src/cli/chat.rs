//! `docchat chat`: interactive REPL command.
//!
//! Opens a readline-based loop over one conversation.  Plain lines are
//! chat turns; slash-commands upload documents and query the backend.
//! Upload batches run on a background task so the prompt stays usable
//! while they finish.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use dc_client::RestDocChatClient;
use dc_domain::config::Config;
use dc_sessions::{partition, Conversation, Refused, SessionStatus};
use tokio::task::JoinHandle;

use crate::render;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Public entry point
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Run the interactive chat REPL.
///
/// Creates the backend session, uploads `files` if any were given, then
/// enters a readline loop.  New timeline entries are printed before each
/// prompt.
pub async fn chat(config: Arc<Config>, files: Vec<PathBuf>) -> anyhow::Result<()> {
    // 1. Connect.
    let client = RestDocChatClient::new(&config.backend)?;
    let conv = Conversation::new(Arc::new(client));
    let status = conv.start().await;

    eprintln!("docchat interactive chat");
    eprintln!(
        "Backend: {}  |  {}",
        config.backend.base_url,
        render::session(&status)
    );
    if let SessionStatus::Unavailable { .. } = status {
        eprintln!("Uploads and chat are disabled for this run.");
    }
    eprintln!("Type /help for commands, Ctrl+D to exit");
    eprintln!();

    let mut repl = Repl {
        conv,
        config,
        cursor: 0,
        uploads: Vec::new(),
    };

    // 2. Initial documents from the command line.
    if !files.is_empty() {
        if let Some(handle) = repl.start_upload(files) {
            handle.await.ok();
        }
    }

    // 3. Initialize rustyline editor with persistent history.
    let history_path = dirs::home_dir()
        .unwrap_or_default()
        .join(".docchat")
        .join("history.txt");
    if let Some(parent) = history_path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    let mut rl = rustyline::DefaultEditor::new()?;
    let _ = rl.load_history(&history_path);

    // 4. REPL loop.
    loop {
        repl.flush_timeline();
        let readline = rl.readline("you> ");

        match readline {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                rl.add_history_entry(&line).ok();

                // ── Slash commands ────────────────────────────────
                if trimmed.starts_with('/') {
                    match SlashCommand::parse(trimmed) {
                        Ok(SlashCommand::Exit) => break,
                        Ok(cmd) => repl.run_command(cmd).await,
                        Err(msg) => eprintln!("{msg}"),
                    }
                    continue;
                }

                // ── User message → chat turn ─────────────────────
                repl.send(&line).await;
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                eprintln!("(Use Ctrl+D or /exit to quit)");
                continue;
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                break;
            }
            Err(e) => {
                eprintln!("\x1B[31mreadline error: {e}\x1B[0m");
                break;
            }
        }
    }

    // 5. Save history.
    rl.save_history(&history_path).ok();

    // 6. Let running uploads finish, then release the session.
    if repl.conv.is_uploading() {
        eprintln!("Waiting for uploads to finish…");
    }
    for handle in repl.uploads.drain(..) {
        handle.await.ok();
    }
    repl.flush_timeline();
    repl.conv.end_session().await;

    eprintln!("Goodbye!");
    Ok(())
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Slash command parsing
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, PartialEq, Eq)]
pub enum SlashCommand {
    Upload(Vec<PathBuf>),
    Docs,
    Refresh,
    Summary(Option<String>),
    Insights(String),
    Status,
    Help,
    Exit,
}

impl SlashCommand {
    /// Parse a line starting with `/`.  The error is a message for the user.
    pub fn parse(input: &str) -> Result<Self, String> {
        let (cmd, arg) = match input.split_once(char::is_whitespace) {
            Some((c, a)) => (c, a.trim()),
            None => (input, ""),
        };

        match cmd {
            "/upload" => {
                let paths: Vec<PathBuf> = arg.split_whitespace().map(PathBuf::from).collect();
                if paths.is_empty() {
                    Err("Usage: /upload <path> [path...]".into())
                } else {
                    Ok(Self::Upload(paths))
                }
            }
            "/docs" => Ok(Self::Docs),
            "/refresh" => Ok(Self::Refresh),
            "/summary" => Ok(Self::Summary((!arg.is_empty()).then(|| arg.to_owned()))),
            "/insights" => {
                if arg.is_empty() {
                    Err("Usage: /insights <question>".into())
                } else {
                    Ok(Self::Insights(arg.to_owned()))
                }
            }
            "/status" => Ok(Self::Status),
            "/help" => Ok(Self::Help),
            "/exit" | "/quit" => Ok(Self::Exit),
            other => Err(format!("Unknown command: {other}  (type /help for a list)")),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// REPL state
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

struct Repl {
    conv: Conversation,
    config: Arc<Config>,
    /// Timeline entries already printed.
    cursor: usize,
    uploads: Vec<JoinHandle<()>>,
}

impl Repl {
    /// Print timeline entries appended since the last flush.
    fn flush_timeline(&mut self) {
        let fresh = self.conv.timeline_since(self.cursor);
        self.cursor += fresh.len();
        for e in &fresh {
            let line = render::paint(e.kind, &render::entry(e));
            println!("{line}");
        }
        if !fresh.is_empty() {
            std::io::stdout().flush().ok();
        }
    }

    async fn send(&mut self, line: &str) {
        self.conv.set_pending_input(line);
        let indicator = thinking_indicator(self.conv.clone());
        let result = self.conv.submit_pending_input().await;
        indicator.abort();
        clear_indicator();

        match result {
            Ok(_) => {}
            Err(Refused::NoDocuments) => {
                eprintln!("Upload a document first: /upload <path>");
            }
            Err(refused) => eprintln!("\x1B[33m{refused}\x1B[0m"),
        }
        self.flush_timeline();
    }

    async fn run_command(&mut self, cmd: SlashCommand) {
        match cmd {
            SlashCommand::Upload(paths) => {
                if let Some(handle) = self.start_upload(paths) {
                    self.uploads.push(handle);
                }
                self.uploads.retain(|h| !h.is_finished());
            }

            SlashCommand::Docs => eprintln!("{}", render::documents(&self.conv.documents())),

            SlashCommand::Refresh => match self.conv.refresh_documents().await {
                Ok(_) => eprintln!("{}", render::documents(&self.conv.documents())),
                Err(e) => eprintln!("\x1B[31mrefresh failed: {e}\x1B[0m"),
            },

            SlashCommand::Summary(filename) => {
                match self.conv.summary(filename.as_deref()).await {
                    Ok(value) => print_json(&value),
                    Err(e) => eprintln!("\x1B[31msummary failed: {e}\x1B[0m"),
                }
            }

            SlashCommand::Insights(question) => match self.conv.insights(&question).await {
                Ok(value) => print_json(&value),
                Err(e) => eprintln!("\x1B[31minsights failed: {e}\x1B[0m"),
            },

            SlashCommand::Status => {
                eprintln!("Backend:   {}", self.config.backend.base_url);
                eprintln!("Session:   {}", render::session(&self.conv.session_status()));
                eprintln!("Documents: {}", self.conv.documents().len());
                eprintln!("Uploading: {}", yes_no(self.conv.is_uploading()));
                eprintln!("Chat:      {}", if self.conv.chat_enabled() { "ready" } else { "disabled" });
            }

            SlashCommand::Help => {
                eprintln!("Commands:");
                eprintln!("  /upload <paths...>   Upload PDF, TXT or DOCX files (runs in background)");
                eprintln!("  /docs                List uploaded documents");
                eprintln!("  /refresh             Re-read the document list from the backend");
                eprintln!("  /summary [filename]  Summarize one document or all of them");
                eprintln!("  /insights <q>        Cross-document insights for a question");
                eprintln!("  /status              Show session and upload state");
                eprintln!("  /exit, /quit         Exit the chat");
                eprintln!("  /help                Show this help");
            }

            SlashCommand::Exit => {}
        }
    }

    /// Filter `paths` and run the accepted ones as one batch on a
    /// background task.  Returns `None` when nothing was started.
    fn start_upload(&mut self, paths: Vec<PathBuf>) -> Option<JoinHandle<()>> {
        let (accepted, rejected) = partition(&paths, &self.config.upload);
        for r in &rejected {
            eprintln!("\x1B[33m{}\x1B[0m", render::rejection(r));
        }
        if accepted.is_empty() {
            return None;
        }
        if self.conv.is_uploading() {
            eprintln!("\x1B[33m{}\x1B[0m", Refused::UploadInProgress);
            return None;
        }

        eprintln!("Uploading {} file(s)…", accepted.len());
        let conv = self.conv.clone();
        Some(tokio::spawn(async move {
            match conv.submit_uploads(accepted).await {
                Ok(report) => tracing::debug!(?report, "background upload batch finished"),
                Err(refused) => eprintln!("\x1B[33m{refused}\x1B[0m"),
            }
        }))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Animate a "thinking…" line on stderr while an answer is outstanding.
fn thinking_indicator(conv: Conversation) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut dots = 0usize;
        let mut tick = tokio::time::interval(Duration::from_millis(400));
        loop {
            tick.tick().await;
            if !conv.is_awaiting_answer() && dots > 0 {
                break;
            }
            dots = dots % 3 + 1;
            eprint!("\r\x1B[2mthinking{:<3}\x1B[0m", ".".repeat(dots));
            std::io::stderr().flush().ok();
        }
    })
}

fn clear_indicator() {
    eprint!("\r\x1B[2K");
    std::io::stderr().flush().ok();
}

fn print_json(value: &serde_json::Value) {
    match value {
        serde_json::Value::String(s) => println!("{s}"),
        other => match serde_json::to_string_pretty(other) {
            Ok(s) => println!("{s}"),
            Err(_) => println!("{other}"),
        },
    }
}

fn yes_no(b: bool) -> &'static str {
    if b {
        "yes"
    } else {
        "no"
    }
}
