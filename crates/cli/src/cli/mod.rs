pub mod ask;
pub mod chat;
pub mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dc_domain::config::Config;

/// docchat: chat with your documents.
#[derive(Debug, Parser)]
#[command(name = "docchat", version, about)]
pub struct Cli {
    /// Backend base URL (overrides `[backend].base_url`).
    #[arg(long, global = true)]
    pub backend_url: Option<String>,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive chat (default when no subcommand is given).
    Chat {
        /// Documents to upload before the first prompt.
        files: Vec<PathBuf>,
    },
    /// Upload documents, ask one question, print the conversation and exit.
    Ask {
        /// Document to upload (repeatable).
        #[arg(long = "file", short = 'f', required = true)]
        files: Vec<PathBuf>,
        /// The question to ask.
        question: String,
        /// Print the timeline as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Configuration utilities.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Print version information.
    Version,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Dump the resolved configuration (with defaults) as TOML.
    Show,
}

impl Cli {
    /// Fold command-line overrides into a loaded config.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(url) = &self.backend_url {
            config.backend.base_url = url.clone();
        }
        if self.json_logs {
            config.observability.json = true;
        }
    }
}

// ── Config loading helper ─────────────────────────────────────────────

/// Load the configuration from the path specified by `DOCCHAT_CONFIG`
/// (or `docchat.toml` by default).  A missing file yields defaults.
/// Returns the parsed [`Config`] and the path that was used.
pub fn load_config() -> anyhow::Result<(Config, String)> {
    let config_path =
        std::env::var("DOCCHAT_CONFIG").unwrap_or_else(|_| "docchat.toml".into());
    let config = load_config_from(&config_path)?;
    Ok((config, config_path))
}

pub fn load_config_from(config_path: &str) -> anyhow::Result<Config> {
    if !std::path::Path::new(config_path).exists() {
        return Ok(Config::default());
    }
    let raw = std::fs::read_to_string(config_path)
        .map_err(|e| anyhow::anyhow!("reading {config_path}: {e}"))?;
    toml::from_str(&raw).map_err(|e| anyhow::anyhow!("parsing {config_path}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_chat() {
        let cli = Cli::try_parse_from(["docchat"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.backend_url.is_none());
    }

    #[test]
    fn chat_takes_files_and_global_flags() {
        let cli = Cli::try_parse_from([
            "docchat",
            "chat",
            "a.pdf",
            "b.txt",
            "--backend-url",
            "http://10.0.0.2:5001",
            "--json-logs",
        ])
        .unwrap();
        let Some(Command::Chat { files }) = &cli.command else {
            panic!("expected chat");
        };
        assert_eq!(files, &vec![PathBuf::from("a.pdf"), PathBuf::from("b.txt")]);

        let mut config = Config::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.backend.base_url, "http://10.0.0.2:5001");
        assert!(config.observability.json);
    }

    #[test]
    fn ask_requires_a_file() {
        assert!(Cli::try_parse_from(["docchat", "ask", "why?"]).is_err());

        let cli =
            Cli::try_parse_from(["docchat", "ask", "-f", "x.txt", "--file", "y.pdf", "why?"])
                .unwrap();
        let Some(Command::Ask { files, question, json }) = cli.command else {
            panic!("expected ask");
        };
        assert_eq!(files.len(), 2);
        assert_eq!(question, "why?");
        assert!(!json);
    }

    #[test]
    fn overrides_leave_config_alone_when_absent() {
        let cli = Cli::try_parse_from(["docchat", "version"]).unwrap();
        let mut config = Config::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.backend.base_url, "http://localhost:5001");
        assert!(!config.observability.json);
    }

    #[test]
    fn load_missing_and_present_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let cfg = load_config_from(missing.to_str().unwrap()).unwrap();
        assert_eq!(cfg.upload.max_file_bytes, 16 * 1024 * 1024);

        let path = dir.path().join("docchat.toml");
        std::fs::write(&path, "[backend]\nbase_url = \"http://example:9000\"\n").unwrap();
        let cfg = load_config_from(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.backend.base_url, "http://example:9000");

        std::fs::write(&path, "[backend\n").unwrap();
        let err = load_config_from(path.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().starts_with("parsing "));
    }
}
