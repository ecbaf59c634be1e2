use thiserror::Error;
use crate::storage::StorageError;

/// Everything a command can fail with. All variants but `Storage` are user
/// errors that are printed and forgotten.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("** class name missing **")]
    ClassNameMissing,
    #[error("** class doesn't exist **")]
    ClassNotFound,
    #[error("** provide one class only **")]
    TooManyClasses,
    #[error("** instance id missing **")]
    InstanceIdMissing,
    #[error("** no instance found **")]
    InstanceNotFound,
    #[error("** attribute name missing **")]
    AttributeNameMissing,
    #[error("** value missing **")]
    ValueMissing,
    #[error("** value type mismatch **")]
    TypeMismatch,
    #[error("** unbalanced quotes **")]
    UnbalancedQuotes,
    #[error("*** Unknown syntax: {0}")]
    UnknownSyntax(String),
    #[error("storage failure: {0}")]
    Storage(#[from] StorageError),
}

impl CommandError {
    /// Persistence failures end the session; nothing else does.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CommandError::Storage(_))
    }
}
