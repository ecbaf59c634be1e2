use anyhow::Context;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use crate::query::{CommandEngine, CommandResult};
use super::display::display_result;

pub struct CLI {
    pub engine: CommandEngine,
    pub prompt: String,
}

impl CLI {
    pub fn new() -> Self {
        CLI {
            engine: CommandEngine::new(),
            prompt: "(hbnb) ".to_string(),
        }
    }

    pub fn new_with_file(file_path: impl Into<PathBuf>, prompt: &str) -> Self {
        CLI {
            engine: CommandEngine::new_with_file(file_path),
            prompt: prompt.to_string(),
        }
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.run_with(stdin.lock(), stdout.lock())
    }

    /// Reads commands until `quit` or end of input. User errors are printed
    /// and the loop continues; a persistence failure ends it with an error.
    pub fn run_with<R: BufRead, W: Write>(&mut self, mut input: R, mut output: W) -> anyhow::Result<()> {
        loop {
            write!(output, "{}", self.prompt)?;
            output.flush()?;

            let mut line = String::new();
            let read = input.read_line(&mut line).context("failed to read command")?;
            // End of input behaves like an `EOF` command.
            let line = if read == 0 { "EOF" } else { line.as_str() };

            match self.engine.execute(line) {
                Ok(result) => {
                    display_result(&mut output, &result)?;
                    if matches!(result, CommandResult::Quit | CommandResult::EndOfInput) {
                        break;
                    }
                }
                Err(error) if error.is_fatal() => {
                    return Err(error).context("could not persist the store");
                }
                Err(error) => writeln!(output, "{}", error)?,
            }
        }
        output.flush()?;
        Ok(())
    }
}

impl Default for CLI {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn run_session(cli: &mut CLI, script: &str) -> String {
        let mut out = Vec::new();
        cli.run_with(script.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_prompt_and_errors_on_stdout() {
        let temp_dir = TempDir::new().unwrap();
        let mut cli = CLI::new_with_file(temp_dir.path().join("file.json"), "> ");

        let output = run_session(&mut cli, "show\ncreate Foo\nquit\n");
        assert_eq!(output, "> ** class name missing **\n> ** class doesn't exist **\n> ");
    }

    #[test]
    fn test_end_of_input_prints_blank_line() {
        let temp_dir = TempDir::new().unwrap();
        let mut cli = CLI::new_with_file(temp_dir.path().join("file.json"), "> ");

        assert_eq!(run_session(&mut cli, "\nall\n"), "> > []\n> \n");
    }

    #[test]
    fn test_quit_stops_reading() {
        let temp_dir = TempDir::new().unwrap();
        let mut cli = CLI::new_with_file(temp_dir.path().join("file.json"), "");

        assert_eq!(run_session(&mut cli, "quit\ncreate User\n"), "");
        assert!(cli.engine.storage().all().is_empty());
    }

    #[test]
    fn test_persistence_failure_ends_session() {
        let temp_dir = TempDir::new().unwrap();
        let mut cli = CLI::new_with_file(temp_dir.path().join("nope").join("file.json"), "");

        let mut out = Vec::new();
        assert!(cli.run_with("create User\n".as_bytes(), &mut out).is_err());
    }
}
