use crate::metadata::Kind;
use crate::query::error::CommandError;

/// Validates the `<Kind> <id> ...` prefix shared by `show`, `destroy` and
/// `update`. Checks run in a fixed order since each failure has its own
/// message.
pub struct TargetParser;

impl TargetParser {
    pub fn new() -> Self {
        TargetParser
    }

    pub fn parse_kind(&self, args: &str, tokens: &[String]) -> Result<Kind, CommandError> {
        if args.is_empty() || tokens.is_empty() {
            return Err(CommandError::ClassNameMissing);
        }
        Kind::from_name(&tokens[0]).ok_or(CommandError::ClassNotFound)
    }

    /// Returns the kind and the store key `<Kind>.<id>`.
    pub fn parse_target(&self, args: &str, tokens: &[String]) -> Result<(Kind, String), CommandError> {
        let kind = self.parse_kind(args, tokens)?;
        let id = tokens.get(1).ok_or(CommandError::InstanceIdMissing)?;
        Ok((kind, format!("{}.{}", kind, id)))
    }
}

impl Default for TargetParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(args: &str) -> Vec<String> {
        args.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_validation_order() {
        let parser = TargetParser::new();
        assert!(matches!(parser.parse_target("", &[]), Err(CommandError::ClassNameMissing)));
        assert!(matches!(parser.parse_target("Foo", &tokens("Foo")), Err(CommandError::ClassNotFound)));
        assert!(matches!(parser.parse_target("Foo 1", &tokens("Foo 1")), Err(CommandError::ClassNotFound)));
        assert!(matches!(parser.parse_target("City", &tokens("City")), Err(CommandError::InstanceIdMissing)));
    }

    #[test]
    fn test_key_uses_registry_name() {
        let parser = TargetParser::new();
        let (kind, key) = parser.parse_target("BaseRecord 42", &tokens("BaseRecord 42")).unwrap();
        assert_eq!(kind, Kind::BaseModel);
        assert_eq!(key, "BaseModel.42");
    }
}
