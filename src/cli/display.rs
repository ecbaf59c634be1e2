use std::io::{self, Write};
use crate::query::CommandResult;

pub fn display_result<W: Write>(out: &mut W, result: &CommandResult) -> io::Result<()> {
    match result {
        CommandResult::Created(id) => writeln!(out, "{}", id),
        CommandResult::Show(display) => writeln!(out, "{}", display),
        CommandResult::All(listing) => writeln!(out, "{}", json_list(listing)),
        CommandResult::Help(text) => writeln!(out, "{}", text),
        CommandResult::EndOfInput => writeln!(out),
        CommandResult::Destroyed
        | CommandResult::Updated
        | CommandResult::Empty
        | CommandResult::Quit => Ok(()),
    }
}

/// JSON array of strings with `", "` between items.
pub fn json_list(items: &[String]) -> String {
    let encoded: Vec<String> = items
        .iter()
        .map(|item| serde_json::Value::String(item.clone()).to_string())
        .collect();
    format!("[{}]", encoded.join(", "))
}
