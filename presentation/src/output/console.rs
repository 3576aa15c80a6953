//! Console output formatting

use colored::{ColoredString, Colorize};
use streamchat_application::HealthStatus;
use streamchat_domain::{History, Role};

/// Formats session data for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Label printed in front of a message.
    pub fn role_label(role: Role) -> ColoredString {
        match role {
            Role::User => "You:".green().bold(),
            Role::Assistant => "Assistant:".cyan().bold(),
        }
    }

    /// Format the committed conversation.
    pub fn format_history(history: &History) -> String {
        if history.is_empty() {
            return format!("{}\n", "(no messages yet)".dimmed());
        }

        let mut output = Self::section_header("Conversation");
        for message in history.iter() {
            output.push_str(&format!(
                "{} {}\n",
                Self::role_label(message.role),
                Self::indent_continuation(&message.content, "  ")
            ));
        }
        output
    }

    pub fn format_health(base_url: &str, health: &HealthStatus) -> String {
        let status = if health.is_healthy() {
            health.status.green().bold()
        } else {
            health.status.red().bold()
        };
        let service = if health.service.is_empty() {
            "unknown service"
        } else {
            health.service.as_str()
        };
        format!("{} {} ({}) at {}", "Server:".cyan().bold(), status, service, base_url)
    }

    pub fn format_error(message: &str) -> String {
        format!("{} {}", "Error:".red().bold(), message)
    }

    pub fn format_cancelled() -> String {
        "[cancelled]".yellow().to_string()
    }

    pub fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    /// Indent every line after the first.
    pub fn indent_continuation(text: &str, prefix: &str) -> String {
        text.lines()
            .enumerate()
            .map(|(i, line)| {
                if i == 0 {
                    line.to_string()
                } else {
                    format!("{}{}", prefix, line)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
