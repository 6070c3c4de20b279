use crate::interpreter::{self, Interpreter};
use crate::printer;
use ansi_term::Colour::Red;
use linefeed::{DefaultTerminal, Interface, ReadResult, Terminal};
use std::fmt;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};

const PROMPT: &str = "lisp> ";

#[derive(Debug)]
pub enum Error {
    Usage,
    IOError(std::io::Error),
    Script(interpreter::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Usage => write!(f, "usage: repl [FILE]"),
            Error::IOError(e) => write!(f, "io error: {}", e),
            Error::Script(e) => write!(f, "{}", e),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::IOError(e)
    }
}

impl From<interpreter::Error> for Error {
    fn from(e: interpreter::Error) -> Self {
        Self::Script(e)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Config {
    Repl,
    Script(PathBuf),
}

impl Config {
    /// Expects the program name first, as `std::env::args` supplies it.
    pub fn from_args(args: impl IntoIterator<Item = String>) -> Result<Self, Error> {
        let args: Vec<String> = args.into_iter().skip(1).collect();
        match args.as_slice() {
            [] => Ok(Config::Repl),
            [path] => Ok(Config::Script(PathBuf::from(path))),
            _ => Err(Error::Usage),
        }
    }
}

pub fn launch(config: &Config, interpreter: &Interpreter) -> Result<(), Error> {
    match config {
        Config::Repl => {
            let interface = setup()?;
            repl(&interface, |line| rep(line, interpreter));
            save_history(&interface)?;
            Ok(())
        }
        Config::Script(path) => match run_file(path, interpreter) {
            Err(Error::Script(e)) => {
                eprintln!("{}", format_error(&e, atty::is(atty::Stream::Stderr)));
                std::process::exit(1)
            }
            other => other,
        },
    }
}

pub fn run_file(path: &Path, interpreter: &Interpreter) -> Result<(), Error> {
    log::info!("running {}", path.display());
    let source = read_to_string(path)?;
    if source.trim().is_empty() {
        return Ok(());
    }
    interpreter.rep(&source)?;
    Ok(())
}

fn rep(line: &str, interpreter: &Interpreter) -> String {
    match interpreter.rep(line) {
        Ok(value) => printer::pr_str(&value),
        Err(e) => format_error(&e, atty::is(atty::Stream::Stdout)),
    }
}

fn format_error(e: &interpreter::Error, colour: bool) -> String {
    let message = format!("Error ({:?}): {}", e.kind(), e);
    if colour {
        Red.paint(message).to_string()
    } else {
        message
    }
}

pub fn setup() -> std::io::Result<Interface<DefaultTerminal>> {
    let interface = linefeed::Interface::new("tiny-lisp")?;
    interface.set_prompt(PROMPT)?;
    if let Some(path) = history_path() {
        interface.load_history(path).ok();
    };
    Ok(interface)
}

fn history_path() -> Option<PathBuf> {
    match dirs::data_dir() {
        Some(mut path) => {
            path.push(".tiny_lisp_history");
            Some(path)
        }
        None => None,
    }
}

pub fn save_history<T: Terminal>(interface: &Interface<T>) -> std::io::Result<()> {
    match history_path() {
        Some(path) => interface.save_history(path),
        None => Ok(()),
    }
}

pub fn repl<T: Terminal>(interface: &Interface<T>, processor: impl Fn(&str) -> String) {
    loop {
        match interface.read_line() {
            Ok(ReadResult::Eof) => break,
            Ok(ReadResult::Signal(sig)) => {
                writeln!(interface, "Received signal {:?}", sig).ok();
            }
            Ok(ReadResult::Input(line)) => {
                if line.trim().is_empty() {
                    continue;
                }
                interface.add_history_unique(line.clone());
                writeln!(interface, "{}", processor(&line)).ok();
            }
            Err(e) => {
                writeln!(interface, "Error: {}", e).ok();
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_arguments_starts_a_repl() {
        assert_eq!(Config::from_args(args(&["repl"])).unwrap(), Config::Repl);
    }

    #[test]
    fn one_argument_is_a_script() {
        assert_eq!(
            Config::from_args(args(&["repl", "fact.lisp"])).unwrap(),
            Config::Script(PathBuf::from("fact.lisp"))
        );
    }

    #[test]
    fn more_arguments_is_a_usage_error() {
        assert!(matches!(
            Config::from_args(args(&["repl", "a", "b"])),
            Err(Error::Usage)
        ));
    }

    #[test]
    fn rep_prints_values_and_errors() {
        let interpreter = Interpreter::new();
        assert_eq!(rep("(CONS 1 2)", &interpreter), "(1 . 2)");
        assert!(rep("(CAR 1)", &interpreter).contains("Type"));
    }

    #[test]
    fn script_errors_use_the_repl_format() {
        let interpreter = Interpreter::new();
        let path = std::env::temp_dir().join(format!("tiny-lisp-{}.lisp", std::process::id()));
        std::fs::write(&path, "(define x 1)\n(car x)\n").unwrap();
        let result = run_file(&path, &interpreter);
        std::fs::remove_file(&path).ok();
        match result {
            Err(Error::Script(e)) => {
                assert!(format_error(&e, false).starts_with("Error (Type): type mismatch"))
            }
            other => panic!("expected a script error, got {:?}", other),
        }
    }
}
