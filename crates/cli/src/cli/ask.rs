//! `docchat ask`: one-shot question over a set of documents.
//!
//! Creates a session, uploads the given files in order, asks one question,
//! prints the resulting timeline to stdout and releases the session.
//! Useful for scripting and quick checks against a backend.

use std::path::PathBuf;
use std::sync::Arc;

use dc_client::RestDocChatClient;
use dc_domain::config::Config;
use dc_sessions::{partition, Conversation, SessionStatus, TurnOutcome};

use crate::render;

/// Execute a single question and print the conversation.
///
/// This is the entry point for `docchat ask --file F "question"`.
pub async fn ask(
    config: Arc<Config>,
    files: Vec<PathBuf>,
    question: String,
    json_output: bool,
) -> anyhow::Result<()> {
    // 1. Filter candidates before touching the backend.
    let (accepted, rejected) = partition(&files, &config.upload);
    for r in &rejected {
        eprintln!("{}", render::rejection(r));
    }
    if accepted.is_empty() {
        anyhow::bail!("no uploadable documents (accepted: PDF, TXT, DOCX)");
    }

    // 2. Session.
    let client = RestDocChatClient::new(&config.backend)?;
    let conv = Conversation::new(Arc::new(client));
    if let SessionStatus::Unavailable { reason } = conv.start().await {
        anyhow::bail!("could not create a session at {}: {reason}", config.backend.base_url);
    }

    // 3. Upload, then ask.  A refusal here (e.g. every upload failed)
    //    still prints the timeline so the user sees why.
    let uploaded = conv.submit_uploads(accepted).await;
    let turn = match uploaded {
        Ok(_) => conv.send_turn(&question).await,
        Err(refused) => Err(refused),
    };

    // 4. Print.
    let timeline = conv.timeline();
    if json_output {
        println!("{}", serde_json::to_string_pretty(&timeline)?);
    } else {
        for e in &timeline {
            println!("{}", render::entry(e));
        }
    }

    conv.end_session().await;

    match turn {
        Ok(TurnOutcome::Answered) => Ok(()),
        Ok(TurnOutcome::Failed) => anyhow::bail!("the backend did not answer"),
        Err(refused) => anyhow::bail!("question not sent: {refused}"),
    }
}
