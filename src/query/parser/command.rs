/// A raw input line split into its verb and the untouched argument text.
#[derive(Debug, PartialEq)]
pub struct CommandLine<'a> {
    pub verb: &'a str,
    pub args: &'a str,
    pub line: &'a str,
}

impl<'a> CommandLine<'a> {
    /// Returns `None` for a blank line.
    pub fn parse(input: &'a str) -> Option<Self> {
        let line = input.trim();
        if line.is_empty() {
            return None;
        }

        // `?` is shorthand for `help`.
        if let Some(rest) = line.strip_prefix('?') {
            return Some(CommandLine { verb: "help", args: rest.trim(), line });
        }

        let verb_end = line
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(line.len());
        let (verb, args) = line.split_at(verb_end);
        Some(CommandLine { verb, args: args.trim(), line })
    }
}
