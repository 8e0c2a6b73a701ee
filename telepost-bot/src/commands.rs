//! Chat command parsing.
//!
//! Non-command text is silently ignored; unrecognized `/commands` get a
//! help hint. The argument is everything after the command token, trimmed.

/// A recognized (or explicitly unknown) bot command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    /// `/newpost <topic>`; topic may be empty, the adapter replies with usage.
    NewPost(String),
    Approve,
    /// `/revise <feedback>`; feedback may be empty, see above.
    Revise(String),
    Poster,
    Publish,
    Status,
    Unknown(String),
}

/// Parses incoming chat text. Returns `None` for anything that is not a
/// command so ordinary group chatter is never answered.
pub fn parse_command(text: &str) -> Option<Command> {
    let text = text.trim();
    if !text.starts_with('/') {
        return None;
    }

    let (token, rest) = match text.split_once(char::is_whitespace) {
        Some((token, rest)) => (token, rest.trim()),
        None => (text, ""),
    };
    // In groups Telegram appends the bot name: `/approve@MyBot`.
    let token = token.split('@').next().unwrap_or(token);

    let command = match token {
        "/start" => Command::Start,
        "/newpost" => Command::NewPost(rest.to_string()),
        "/approve" => Command::Approve,
        "/revise" => Command::Revise(rest.to_string()),
        "/poster" => Command::Poster,
        "/publish" => Command::Publish,
        "/status" => Command::Status,
        other => Command::Unknown(other.to_string()),
    };
    Some(command)
}
