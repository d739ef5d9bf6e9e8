use std::fmt;

use quiz_core::model::{TagName, parse_tag_list};

use crate::render::option_index;

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Zero-based question position and option index.
    Answer { position: usize, option: usize },
    Clear { position: usize },
    Show,
    Submit,
    Review,
    Filter(Vec<TagName>),
    Restart,
    Reset,
    Time,
    Progress,
    Best,
    Tags,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Empty,
    Unknown(String),
    InvalidQuestion(String),
    InvalidOption(String),
    MissingArgument { command: &'static str },
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Empty => write!(f, "type a command (or `help`)"),
            CommandError::Unknown(raw) => write!(f, "unknown command: {raw}"),
            CommandError::InvalidQuestion(raw) => write!(f, "invalid question number: {raw}"),
            CommandError::InvalidOption(raw) => write!(f, "invalid option letter: {raw}"),
            CommandError::MissingArgument { command } => {
                write!(f, "{command} needs an argument")
            }
        }
    }
}

impl std::error::Error for CommandError {}

impl Command {
    /// Parse a line such as `3 b`, `submit` or `filter phishing,malware`.
    ///
    /// Question numbers are 1-based on input.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };

        let command = match head.to_ascii_lowercase().as_str() {
            "" => return Err(CommandError::Empty),
            "show" | "s" => Self::Show,
            "submit" => Self::Submit,
            "review" => Self::Review,
            "filter" => Self::Filter(parse_tag_list(rest)),
            "restart" => Self::Restart,
            "reset" => Self::Reset,
            "time" => Self::Time,
            "progress" => Self::Progress,
            "best" => Self::Best,
            "tags" => Self::Tags,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            "clear" => {
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument { command: "clear" });
                }
                Self::Clear {
                    position: parse_position(rest)?,
                }
            }
            _ if head.chars().all(|c| c.is_ascii_digit()) => {
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument { command: "answer" });
                }
                let option = option_index(rest)
                    .ok_or_else(|| CommandError::InvalidOption(rest.to_string()))?;
                Self::Answer {
                    position: parse_position(head)?,
                    option,
                }
            }
            _ => return Err(CommandError::Unknown(head.to_string())),
        };
        Ok(command)
    }
}

fn parse_position(raw: &str) -> Result<usize, CommandError> {
    raw.parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .ok_or_else(|| CommandError::InvalidQuestion(raw.to_string()))
}

pub fn print_help() {
    println!("Commands:");
    println!("  <n> <letter>        answer question n (e.g. `3 b`)");
    println!("  clear <n>           clear the answer to question n");
    println!("  show                show the questions again");
    println!("  submit              grade the current attempt");
    println!("  review              show the answer key");
    println!("  filter [a,b,...]    restart with the given topics (empty = all)");
    println!("  restart             reshuffle and start over with the same topics");
    println!("  reset               stop the current attempt");
    println!("  time | progress     remaining time / answered count");
    println!("  best | tags         stored best score / available topics");
    println!("  quit");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_answers_with_one_based_positions() {
        assert_eq!(
            Command::parse("3 b"),
            Ok(Command::Answer {
                position: 2,
                option: 1
            })
        );
        assert_eq!(
            Command::parse("  10   D "),
            Ok(Command::Answer {
                position: 9,
                option: 3
            })
        );
    }

    #[test]
    fn rejects_bad_answers() {
        assert_eq!(
            Command::parse("0 a"),
            Err(CommandError::InvalidQuestion("0".into()))
        );
        assert_eq!(
            Command::parse("2 7"),
            Err(CommandError::InvalidOption("7".into()))
        );
        assert_eq!(
            Command::parse("2"),
            Err(CommandError::MissingArgument { command: "answer" })
        );
    }

    #[test]
    fn parses_filter_lists() {
        let Ok(Command::Filter(tags)) = Command::parse("filter phishing, malware,,phishing") else {
            panic!("expected filter");
        };
        let names: Vec<&str> = tags.iter().map(TagName::as_str).collect();
        assert_eq!(names, ["phishing", "malware"]);
        assert_eq!(Command::parse("filter"), Ok(Command::Filter(Vec::new())));
    }

    #[test]
    fn parses_keywords_case_insensitively() {
        assert_eq!(Command::parse("SUBMIT"), Ok(Command::Submit));
        assert_eq!(Command::parse("q"), Ok(Command::Quit));
        assert_eq!(Command::parse(""), Err(CommandError::Empty));
        assert_eq!(
            Command::parse("dance"),
            Err(CommandError::Unknown("dance".into()))
        );
    }
}
