//! Slash commands understood by the bot.

use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Copy, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "show the main menu.")]
    Start,
    #[command(description = "create your account.")]
    Register,
    #[command(description = "show this message.")]
    Help,
    #[command(description = "abort the current action.")]
    Cancel,
    #[command(rename = "get_currencies", description = "list the exchange rates.")]
    GetCurrencies,
    #[command(description = "convert an amount into rubles.")]
    Convert,
    #[command(
        rename = "manage_currency",
        description = "add, delete or re-rate currencies (admins only)."
    )]
    ManageCurrency,
}

/// Parses a slash command, ignoring arguments and a `@botname` suffix.
pub(crate) fn parse_command(text: &str) -> Option<Command> {
    let trimmed = text.trim();
    if !trimmed.starts_with('/') {
        return None;
    }
    let head = trimmed.split_whitespace().next().unwrap_or("");
    let name = head.split('@').next().unwrap_or(head);

    match name.to_ascii_lowercase().as_str() {
        "/start" => Some(Command::Start),
        "/register" => Some(Command::Register),
        "/help" => Some(Command::Help),
        "/cancel" => Some(Command::Cancel),
        "/get_currencies" => Some(Command::GetCurrencies),
        "/convert" => Some(Command::Convert),
        "/manage_currency" => Some(Command::ManageCurrency),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_commands() {
        assert_eq!(parse_command("/start"), Some(Command::Start));
        assert_eq!(parse_command(" /Register "), Some(Command::Register));
        assert_eq!(parse_command("/help@finbot"), Some(Command::Help));
        assert_eq!(parse_command("/cancel now"), Some(Command::Cancel));
        assert_eq!(parse_command("/get_currencies"), Some(Command::GetCurrencies));
        assert_eq!(parse_command("/Convert"), Some(Command::Convert));
        assert_eq!(
            parse_command("/manage_currency@finbot"),
            Some(Command::ManageCurrency)
        );
    }

    #[test]
    fn ignores_plain_text_and_unknown_commands() {
        assert_eq!(parse_command("start"), None);
        assert_eq!(parse_command("/stats"), None);
    }

    #[test]
    fn descriptions_list_every_command() {
        let text = Command::descriptions().to_string();
        for name in [
            "/start",
            "/register",
            "/help",
            "/cancel",
            "/get_currencies",
            "/convert",
            "/manage_currency",
        ] {
            assert!(text.contains(name), "{name} missing from {text}");
        }
    }
}
