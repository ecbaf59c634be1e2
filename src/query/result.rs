#[derive(Debug, PartialEq)]
pub enum CommandResult {
    Created(String),
    Show(String),
    All(Vec<String>),
    Destroyed,
    Updated,
    Help(String),
    Empty,
    Quit,
    EndOfInput,
}
