//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for streamchat
#[derive(Parser, Debug)]
#[command(name = "streamchat")]
#[command(author, version, about = "Terminal client for a streaming chat server")]
#[command(long_about = r#"
streamchat sends your messages to a chat server and prints the reply as it
streams in. The whole conversation is sent with every turn.

Configuration is merged from (highest priority first):
1. Command-line flags
2. STREAMCHAT_* environment variables (e.g. STREAMCHAT_SERVER__BASE_URL)
3. --config <path>                          Explicit config file
4. ./streamchat.toml or ./.streamchat.toml  Project-level config
5. ~/.config/streamchat/config.toml         Global config

Example:
  streamchat "Explain ownership in one paragraph"
  streamchat --no-stream -m gpt-4o-mini "Summarise RFC 2119"
  streamchat --chat --endpoint http://localhost:8000
  streamchat --health
"#)]
pub struct Cli {
    /// Message to send (one-shot mode; not used in chat mode)
    pub question: Option<String>,

    /// Start interactive chat mode
    #[arg(short, long)]
    pub chat: bool,

    /// Chat server base URL
    #[arg(short, long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Model name sent with each request
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Maximum tokens to generate per reply
    #[arg(long, value_name = "N")]
    pub max_tokens: Option<u32>,

    /// Sampling temperature (0.0 - 2.0)
    #[arg(short, long, value_name = "T")]
    pub temperature: Option<f32>,

    /// Wait for the whole reply instead of streaming it
    #[arg(long)]
    pub no_stream: bool,

    /// Check that the server is up and exit
    #[arg(long)]
    pub health: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration sources and the effective configuration, then exit
    #[arg(long)]
    pub show_config: bool,

    /// Also write diagnostic logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Append a JSONL transcript of the conversation to this file
    #[arg(long, value_name = "PATH")]
    pub conversation_log: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_one_shot_question() {
        let cli = Cli::try_parse_from(["streamchat", "hello there"]).unwrap();
        assert_eq!(cli.question.as_deref(), Some("hello there"));
        assert!(!cli.chat);
        assert!(!cli.no_stream);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_overrides_and_verbosity() {
        let cli = Cli::try_parse_from([
            "streamchat",
            "--chat",
            "-e",
            "http://10.0.0.2:8000",
            "-m",
            "local",
            "--max-tokens",
            "128",
            "-t",
            "0.3",
            "-vv",
            "--conversation-log",
            "chat.jsonl",
        ])
        .unwrap();
        assert!(cli.chat);
        assert_eq!(cli.endpoint.as_deref(), Some("http://10.0.0.2:8000"));
        assert_eq!(cli.model.as_deref(), Some("local"));
        assert_eq!(cli.max_tokens, Some(128));
        assert_eq!(cli.temperature, Some(0.3));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.conversation_log, Some(PathBuf::from("chat.jsonl")));
    }

    #[test]
    fn test_rejects_non_numeric_max_tokens() {
        assert!(Cli::try_parse_from(["streamchat", "--max-tokens", "lots"]).is_err());
    }
}
