use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;

/// The command the installer places in the composer hook list.
pub const INJECTED_COMMAND: &str = "@php artisan boost:update --ansi";

static BOOST_UPDATE: LazyLock<CommandSignature> = LazyLock::new(|| {
    CommandSignature::new("php", "artisan", "boost:update").expect("escaped literal pattern")
});

/// Recognizes `[@]<interpreter> [./|.]<entry point> <verb> [args...]`.
///
/// Matching is case-insensitive and ignores surrounding whitespace. The verb must
/// be followed by whitespace or the end of the command, so `boost:update` never
/// matches `boost:updater` or `boost:update-all`.
#[derive(Debug, Clone)]
pub struct CommandSignature {
    verb: String,
    pattern: Regex,
}

impl CommandSignature {
    pub fn new(interpreter: &str, entry_point: &str, verb: &str) -> Result<Self, regex::Error> {
        let pattern = format!(
            r"^@?{}\s+(?:\./|\.)?{}\s+{}(?:\s+.*)?$",
            regex::escape(interpreter),
            regex::escape(entry_point),
            regex::escape(verb),
        );
        let pattern = RegexBuilder::new(&pattern).case_insensitive(true).build()?;
        Ok(Self {
            verb: verb.to_string(),
            pattern,
        })
    }

    /// Signature of the `boost:update` hook injected by the installer.
    pub fn boost_update() -> &'static CommandSignature {
        &BOOST_UPDATE
    }

    pub fn verb(&self) -> &str {
        &self.verb
    }

    pub fn matches(&self, command: &str) -> bool {
        self.pattern.is_match(command.trim())
    }
}
