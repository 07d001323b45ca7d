use crate::dashboard::confirm::Confirmation;
use crate::models::chat::ConversationId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    New,
    Open(ConversationId),
    Delete(ConversationId),
    Menu,
    Help,
    Quit,
    /// Plain text typed into the composer and submitted with Enter.
    Say(String),
}

pub const HELP: &str = "\
Commands:
  /new          start a new conversation
  /open <n>     open conversation number n
  /delete <n>   delete conversation number n
  /menu         show or hide the conversation list
  /help         show this help
  /quit         leave the dashboard
Anything else is sent to the open conversation.";

/// Parses a typed line. Conversation numbers are the displayed ones (id + 1).
pub fn parse_command(line: &str) -> Result<Command, String> {
    let trimmed = line.trim();
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Ok(Command::Say(line.to_string()));
    };

    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or("");
    let arg = parts.next();

    match name {
        "new" => Ok(Command::New),
        "menu" => Ok(Command::Menu),
        "help" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        "open" => parse_number(name, arg).map(Command::Open),
        "delete" => parse_number(name, arg).map(Command::Delete),
        _ => Err(format!("Unknown command '/{}'. Type /help for the list.", name)),
    }
}

fn parse_number(command: &str, arg: Option<&str>) -> Result<ConversationId, String> {
    let arg = arg.ok_or_else(|| format!("Usage: /{} <n>", command))?;
    match arg.parse::<i64>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(format!("'{}' is not a conversation number", arg)),
    }
}

pub fn parse_answer(line: &str) -> Confirmation {
    match line.trim().to_lowercase().as_str() {
        "y" | "yes" => Confirmation::Confirmed,
        "n" | "no" => Confirmation::Cancelled,
        _ => Confirmation::Dismissed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_one_based() {
        assert_eq!(parse_command("/open 3"), Ok(Command::Open(2)));
        assert_eq!(parse_command(" /delete 1 "), Ok(Command::Delete(0)));
        assert!(parse_command("/open 0").is_err());
        assert!(parse_command("/delete").is_err());
    }

    #[test]
    fn plain_text_is_kept_verbatim() {
        assert_eq!(parse_command("  hello there "), Ok(Command::Say("  hello there ".into())));
    }

    #[test]
    fn unknown_commands_are_rejected() {
        assert!(parse_command("/rename 2").is_err());
    }

    #[test]
    fn answers() {
        assert_eq!(parse_answer("Yes"), Confirmation::Confirmed);
        assert_eq!(parse_answer("n"), Confirmation::Cancelled);
        assert_eq!(parse_answer(""), Confirmation::Dismissed);
    }
}
