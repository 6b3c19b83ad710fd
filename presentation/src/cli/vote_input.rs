//! Parsing of the interactive vote prompt

use tripvote_domain::VoteValue;

/// What the participant typed at the vote prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteCommand {
    Cast(VoteValue),
    /// Go back to the previous item to change that vote
    Back,
    /// Show group status
    Status,
    Help,
    Quit,
}

impl VoteCommand {
    pub fn parse(line: &str) -> Result<Self, String> {
        let input = line.trim().to_lowercase();
        match input.as_str() {
            "b" | "back" | "<" => Ok(VoteCommand::Back),
            "s" | "status" => Ok(VoteCommand::Status),
            "?" | "h" | "help" => Ok(VoteCommand::Help),
            "q" | "quit" | "exit" => Ok(VoteCommand::Quit),
            "" => Err("Type like or pass (l/p), or ? for help".to_string()),
            other => other.parse::<VoteValue>().map(VoteCommand::Cast),
        }
    }

    pub fn help() -> &'static str {
        "  l, like   like this item\n  \
           p, pass   pass on this item\n  \
           b, back   revisit the previous item\n  \
           s, status show who is still voting\n  \
           q, quit   stop (votes so far are saved)"
    }
}
