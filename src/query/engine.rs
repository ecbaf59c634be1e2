use std::path::PathBuf;
use tracing::{debug, info};

use crate::metadata::Kind;
use crate::storage::{FileStorage, Record, DEFAULT_FILE_PATH};
use super::error::CommandError;
use super::result::CommandResult;
use super::parser::{split_arguments, CommandLine, TargetParser};

pub const COMMANDS: [&str; 8] = ["EOF", "all", "create", "destroy", "help", "quit", "show", "update"];

pub struct CommandEngine {
    storage: FileStorage,
    target_parser: TargetParser,
}

impl CommandEngine {
    pub fn new() -> Self {
        CommandEngine::new_with_file(DEFAULT_FILE_PATH)
    }

    /// Engine over the document at `file_path`, loaded once up front.
    pub fn new_with_file(file_path: impl Into<PathBuf>) -> Self {
        let mut storage = FileStorage::new(file_path);
        storage.reload();
        info!(path = %storage.file_path().display(), records = storage.all().len(), "store loaded");

        CommandEngine {
            storage,
            target_parser: TargetParser::new(),
        }
    }

    pub fn storage(&self) -> &FileStorage {
        &self.storage
    }

    /// Runs one input line. User mistakes come back as non-fatal
    /// `CommandError`s; see `CommandError::is_fatal`.
    pub fn execute(&mut self, input: &str) -> Result<CommandResult, CommandError> {
        let Some(command) = CommandLine::parse(input) else {
            return Ok(CommandResult::Empty);
        };
        debug!(verb = command.verb, args = command.args, "executing");

        match command.verb {
            "create" => self.execute_create(command.args),
            "show" => self.execute_show(command.args),
            "destroy" => self.execute_destroy(command.args),
            "all" => self.execute_all(command.args),
            "update" => self.execute_update(command.args),
            "help" => Ok(CommandResult::Help(help_text(command.args))),
            "quit" => Ok(CommandResult::Quit),
            "EOF" => Ok(CommandResult::EndOfInput),
            _ => Err(CommandError::UnknownSyntax(command.line.to_string())),
        }
    }

    fn execute_create(&mut self, args: &str) -> Result<CommandResult, CommandError> {
        let tokens = split_arguments(args)?;
        if args.is_empty() || tokens.is_empty() {
            return Err(CommandError::ClassNameMissing);
        }
        if tokens.len() > 1 {
            return Err(CommandError::TooManyClasses);
        }
        let kind = Kind::from_name(&tokens[0]).ok_or(CommandError::ClassNotFound)?;

        let mut record = Record::new(kind);
        record.touch();
        let id = record.id.clone();
        self.storage.insert(record.key(), record);
        self.storage.save()?;
        info!(kind = %kind, id = %id, "created record");

        Ok(CommandResult::Created(id))
    }

    fn execute_show(&mut self, args: &str) -> Result<CommandResult, CommandError> {
        let tokens = split_arguments(args)?;
        let (_, key) = self.target_parser.parse_target(args, &tokens)?;

        self.storage.reload();
        let record = self.storage.get(&key).ok_or(CommandError::InstanceNotFound)?;
        Ok(CommandResult::Show(record.to_string()))
    }

    fn execute_destroy(&mut self, args: &str) -> Result<CommandResult, CommandError> {
        let tokens = split_arguments(args)?;
        let (_, key) = self.target_parser.parse_target(args, &tokens)?;

        self.storage.reload();
        self.storage.remove(&key).ok_or(CommandError::InstanceNotFound)?;
        self.storage.save()?;
        info!(key = %key, "destroyed record");

        Ok(CommandResult::Destroyed)
    }

    fn execute_all(&mut self, args: &str) -> Result<CommandResult, CommandError> {
        let tokens = split_arguments(args)?;
        let filter = if args.is_empty() || tokens.is_empty() {
            None
        } else {
            Some(Kind::from_name(&tokens[0]).ok_or(CommandError::ClassNotFound)?)
        };

        self.storage.reload();
        // Filter on the key prefix, the kind the record was stored under.
        let prefix = filter.map(|kind| format!("{}.", kind));
        let listing = self.storage.all()
            .iter()
            .filter(|(key, _)| prefix.as_ref().map_or(true, |p| key.starts_with(p.as_str())))
            .map(|(_, record)| record.to_string())
            .collect();

        Ok(CommandResult::All(listing))
    }

    fn execute_update(&mut self, args: &str) -> Result<CommandResult, CommandError> {
        let tokens = split_arguments(args)?;
        let (_, key) = self.target_parser.parse_target(args, &tokens)?;

        self.storage.reload();
        let record = self.storage.get_mut(&key).ok_or(CommandError::InstanceNotFound)?;
        let attribute = tokens.get(2).ok_or(CommandError::AttributeNameMissing)?;
        let raw_value = tokens.get(3).ok_or(CommandError::ValueMissing)?;

        record.update_attribute(attribute, raw_value).map_err(|e| {
            debug!(key = %key, error = %e, "rejected update");
            CommandError::TypeMismatch
        })?;
        self.storage.save()?;
        info!(key = %key, attribute = %attribute, "updated record");

        Ok(CommandResult::Updated)
    }
}

impl Default for CommandEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn help_text(topic: &str) -> String {
    match topic {
        "" => format!(
            "\nDocumented commands (type help <topic>):\n========================================\n{}\n",
            COMMANDS.join("  ")
        ),
        "create" => "Creates a new instance of a class, saves it and prints its id.\n  create <Class>".to_string(),
        "show" => "Prints the string representation of an instance.\n  show <Class> <id>".to_string(),
        "destroy" => "Deletes an instance and saves the change.\n  destroy <Class> <id>".to_string(),
        "all" => "Prints all instances, optionally only those of one class.\n  all [<Class>]".to_string(),
        "update" => "Adds or updates an attribute of an instance and saves the change.\n  update <Class> <id> <attribute> \"<value>\"".to_string(),
        "help" => "Lists commands, or shows help for one.\n  help [<command>]".to_string(),
        "quit" => "Quit command to exit the program".to_string(),
        "EOF" => "Exits the program on end of input".to_string(),
        other => format!("*** No help on {}", other),
    }
}
