//! Line-oriented command grammar for the interactive front end.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::common::{Error, Result};
use crate::index::btree::Key;

/// One parsed front-end command.
///
/// ```text
/// insert <v>        delete <v>        search <v>
/// range <lo> <hi>   display           order <m>
/// save [path]       load [path]       help        exit
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Insert(Key),
    Delete(Key),
    Search(Key),
    Range(Key, Key),
    Display,
    /// Rebuild the tree under a new order.
    Order(usize),
    /// Save to the given path, or the session's snapshot path.
    Save(Option<PathBuf>),
    /// Replace the tree with one read from the given path, or the session's
    /// snapshot path.
    Load(Option<PathBuf>),
    Help,
    Exit,
}

/// Command summary printed by `help`.
pub const HELP: &str = "\
Commands:
  insert <value>     Insert a value into the tree
  delete <value>     Delete a value from the tree
  search <value>     Search for a value in the tree
  range <lo> <hi>    List every value in [lo, hi]
  display            Display the current tree
  order <value>      Rebuild the tree with a new order (keys are kept)
  save [path]        Write the tree to a snapshot file
  load [path]        Replace the tree with a snapshot file
  help               Show this message
  exit               Leave interactive mode";

impl FromStr for Command {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Err(Error::InvalidCommand("empty command".to_string()));
        };
        let args: Vec<&str> = words.collect();

        let command = match name.to_ascii_lowercase().as_str() {
            "insert" => Command::Insert(parse_arg(name, &args, 0)?),
            "delete" => Command::Delete(parse_arg(name, &args, 0)?),
            "search" => Command::Search(parse_arg(name, &args, 0)?),
            "range" => Command::Range(parse_arg(name, &args, 0)?, parse_arg(name, &args, 1)?),
            "display" => Command::Display,
            "order" => Command::Order(parse_arg(name, &args, 0)?),
            "save" => Command::Save(args.first().map(PathBuf::from)),
            "load" => Command::Load(args.first().map(PathBuf::from)),
            "help" => Command::Help,
            "exit" | "quit" => Command::Exit,
            _ => return Err(Error::InvalidCommand(format!("unknown command '{}'", name))),
        };

        if args.len() > command.arity() {
            return Err(Error::InvalidCommand(format!(
                "'{}' takes at most {} argument(s), got {}",
                name,
                command.arity(),
                args.len()
            )));
        }
        Ok(command)
    }
}

impl Command {
    /// Maximum number of arguments the command accepts.
    fn arity(&self) -> usize {
        match self {
            Command::Insert(_)
            | Command::Delete(_)
            | Command::Search(_)
            | Command::Order(_)
            | Command::Save(_)
            | Command::Load(_) => 1,
            Command::Range(..) => 2,
            Command::Display | Command::Help | Command::Exit => 0,
        }
    }

    /// Returns true if executing the command can change the tree.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Command::Insert(_) | Command::Delete(_) | Command::Order(_) | Command::Load(_)
        )
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Insert(v) => write!(f, "insert {}", v),
            Command::Delete(v) => write!(f, "delete {}", v),
            Command::Search(v) => write!(f, "search {}", v),
            Command::Range(lo, hi) => write!(f, "range {} {}", lo, hi),
            Command::Display => write!(f, "display"),
            Command::Order(m) => write!(f, "order {}", m),
            Command::Save(None) => write!(f, "save"),
            Command::Save(Some(path)) => write!(f, "save {}", path.display()),
            Command::Load(None) => write!(f, "load"),
            Command::Load(Some(path)) => write!(f, "load {}", path.display()),
            Command::Help => write!(f, "help"),
            Command::Exit => write!(f, "exit"),
        }
    }
}

fn parse_arg<T: FromStr>(name: &str, args: &[&str], index: usize) -> Result<T> {
    let raw = args
        .get(index)
        .ok_or_else(|| Error::InvalidCommand(format!("'{}' is missing an argument", name)))?;
    raw.parse()
        .map_err(|_| Error::InvalidCommand(format!("'{}' is not a valid number", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Command {
        line.parse().unwrap()
    }

    fn parse_err(line: &str) -> String {
        match line.parse::<Command>() {
            Err(Error::InvalidCommand(msg)) => msg,
            other => panic!("Expected InvalidCommand for {:?}, got {:?}", line, other),
        }
    }

    #[test]
    fn test_parse_value_commands() {
        assert_eq!(parse("insert 5"), Command::Insert(5));
        assert_eq!(parse("delete -12"), Command::Delete(-12));
        assert_eq!(parse("search 2147483647"), Command::Search(i32::MAX));
        assert_eq!(parse("range 3 9"), Command::Range(3, 9));
        assert_eq!(parse("order 7"), Command::Order(7));
    }

    #[test]
    fn test_parse_bare_commands() {
        assert_eq!(parse("display"), Command::Display);
        assert_eq!(parse("help"), Command::Help);
        assert_eq!(parse("exit"), Command::Exit);
        assert_eq!(parse("quit"), Command::Exit);
    }

    #[test]
    fn test_parse_paths() {
        assert_eq!(parse("save"), Command::Save(None));
        assert_eq!(parse("load snap.bin"), Command::Load(Some(PathBuf::from("snap.bin"))));
    }

    #[test]
    fn test_parse_ignores_case_and_spacing() {
        assert_eq!(parse("  INSERT\t 42  \n"), Command::Insert(42));
        assert_eq!(parse("Display"), Command::Display);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_err("").contains("empty"));
        assert!(parse_err("   ").contains("empty"));
        assert!(parse_err("frobnicate 1").contains("unknown command 'frobnicate'"));
        assert!(parse_err("insert").contains("missing"));
        assert!(parse_err("insert abc").contains("'abc' is not a valid number"));
        assert!(parse_err("insert 99999999999").contains("not a valid number"));
        assert!(parse_err("range 1").contains("missing"));
        assert!(parse_err("order -3").contains("not a valid number"));
        assert!(parse_err("display now").contains("at most 0"));
        assert!(parse_err("insert 1 2").contains("at most 1"));
    }

    #[test]
    fn test_display_parses_back() {
        for command in [
            Command::Insert(-4),
            Command::Range(1, 2),
            Command::Order(5),
            Command::Save(Some(PathBuf::from("a.bin"))),
            Command::Load(None),
            Command::Exit,
        ] {
            assert_eq!(parse(&command.to_string()), command);
        }
    }

    #[test]
    fn test_is_mutation() {
        assert!(Command::Insert(1).is_mutation());
        assert!(Command::Load(None).is_mutation());
        assert!(!Command::Search(1).is_mutation());
        assert!(!Command::Save(None).is_mutation());
    }
}
