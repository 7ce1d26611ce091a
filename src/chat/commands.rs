//! Slash command parsing for the chat application.
//!
//! This module handles parsing of special commands that start with `/`,
//! which stand in for the sidebar controls: managing chats, picking a
//! regional focus, and entering the API key.

/// A parsed chat command.
///
/// These commands control the application and are not sent to the API.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCommand {
    /// Start a new chat.
    New,

    /// List all chats.
    List,

    /// Switch to a chat by list number or id prefix.
    Select(String),

    /// Delete a chat by list number or id prefix.
    Delete(String),

    /// Focus answers on a region.
    Region(String),

    /// Clear the regional focus.
    ClearRegion,

    /// Save a new API key.
    Key(String),

    /// Show API key status, model, and current chat.
    Status,

    /// Show suggested questions.
    Ideas,

    /// Ask the n-th suggested question (1-based).
    Ask(usize),

    /// Re-request a reply for an unanswered message.
    Retry,

    /// Print the current chat's transcript.
    History,

    /// Display help information.
    Help,

    /// Exit the chat application.
    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a valid command,
/// or `None` if it should be treated as a regular message.
///
/// # Examples
///
/// ```
/// # use teman_wisata::chat::parse_command;
/// assert!(parse_command("/quit").is_some());
/// assert!(parse_command("/region Bali").is_some());
/// assert!(parse_command("Apa makanan khas Yogyakarta?").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    if !input.starts_with('/') {
        return None;
    }

    let mut parts = input[1..].splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "new" => ChatCommand::New,
        "list" | "chats" => ChatCommand::List,
        "select" | "open" => match argument {
            Some(arg) => ChatCommand::Select(arg.to_string()),
            None => ChatCommand::Invalid("/select requires a chat number or id".to_string()),
        },
        "delete" | "rm" => match argument {
            Some(arg) => ChatCommand::Delete(arg.to_string()),
            None => ChatCommand::Invalid("/delete requires a chat number or id".to_string()),
        },
        "region" => match argument {
            Some(arg) if arg.eq_ignore_ascii_case("clear") || arg.eq_ignore_ascii_case("reset") => {
                ChatCommand::ClearRegion
            }
            Some(arg) => ChatCommand::Region(arg.to_string()),
            None => ChatCommand::Invalid(
                "/region requires a name (Bali, Jawa, Sumatra, Sulawesi) or 'clear'".to_string(),
            ),
        },
        "key" => match argument {
            Some(arg) => ChatCommand::Key(arg.to_string()),
            None => ChatCommand::Invalid("/key requires an API key".to_string()),
        },
        "status" => ChatCommand::Status,
        "ideas" => ChatCommand::Ideas,
        "ask" => match argument.map(str::parse::<usize>) {
            Some(Ok(n)) if n > 0 => ChatCommand::Ask(n),
            Some(_) => ChatCommand::Invalid("/ask expects a suggestion number".to_string()),
            None => ChatCommand::Invalid("/ask requires a suggestion number".to_string()),
        },
        "retry" => ChatCommand::Retry,
        "history" => ChatCommand::History,
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /new                   Start a new chat
  /list                  List chats (current one is marked with *)
  /select <n|id>         Switch to a chat
  /delete <n|id>         Delete a chat
  /region <name>         Focus on Bali, Jawa, Sumatra, Sulawesi, or any region
  /region clear          Clear the regional focus
  /key <api-key>         Save your OpenRouter API key
  /status                Show API key status, model, and current chat
  /ideas                 Show suggested questions
  /ask <n>               Ask the n-th suggested question
  /retry                 Retry an unanswered message
  /history               Show the current chat
  /help                  Show this help message
  /quit                  Exit the chat"#
}
