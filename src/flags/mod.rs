//! Command-line parsing into a [`ConfigSet`].
//!
//! Accepted forms are `-name`, `-name=value`, `-name value` (non-boolean
//! configs only) and the same with two leading dashes. Parsing stops at the
//! first token that is not a flag; `--` is consumed as a terminator, a bare
//! `-` is kept as the first positional argument.

use crate::registry::ConfigSet;
use crate::{Error, Result};

/// What one step of the parser found.
enum Step {
    /// A flag was applied; keep going.
    Flag,
    /// The flag section ended; the remaining tokens are positional.
    Done,
}

impl ConfigSet {
    /// Parse flag tokens, excluding the program name.
    ///
    /// Later occurrences of a flag overwrite earlier ones. Unknown flags are
    /// handled like [`ConfigSet::set`] handles unknown names. Positional
    /// arguments are available from [`ConfigSet::args`] afterwards.
    ///
    /// # Errors
    ///
    /// Returns the first [`Error::Parse`], [`Error::UnknownConfig`],
    /// [`Error::MissingValue`] or [`Error::BadFlagSyntax`] encountered.
    /// Flags before the failing one have already been applied.
    pub fn parse<I, S>(&mut self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parsed = true;
        self.args.clear();

        let mut tokens = args.into_iter().map(Into::<String>::into);
        while let Some(token) = tokens.next() {
            if let Step::Done = self.parse_one(&token, &mut tokens)? {
                if token != "--" {
                    self.args.push(token);
                }
                break;
            }
        }
        self.args.extend(tokens);

        tracing::debug!(
            set = self.count_set(),
            positional = self.args.len(),
            "parsed command line"
        );
        Ok(())
    }

    /// Parse the process arguments, skipping the program name.
    ///
    /// # Errors
    ///
    /// See [`ConfigSet::parse`].
    pub fn parse_env(&mut self) -> Result<()> {
        self.parse(std::env::args().skip(1))
    }

    fn parse_one(
        &mut self,
        token: &str,
        rest: &mut impl Iterator<Item = String>,
    ) -> Result<Step> {
        if token.len() < 2 || !token.starts_with('-') || token == "--" {
            return Ok(Step::Done);
        }

        let stripped = token.strip_prefix("--").unwrap_or(&token[1..]);
        if stripped.is_empty() || stripped.starts_with('-') || stripped.starts_with('=') {
            return Err(Error::BadFlagSyntax(token.to_string()));
        }

        if let Some((name, value)) = stripped.split_once('=') {
            self.set(name, value)?;
            return Ok(Step::Flag);
        }

        let name = stripped;
        if self.lookup(name).is_some_and(|b| b.value.is_bool()) {
            self.set(name, "true")?;
        } else {
            let value = rest
                .next()
                .ok_or_else(|| Error::MissingValue(name.to_string()))?;
            self.set(name, &value)?;
        }
        Ok(Step::Flag)
    }

    /// Whether [`ConfigSet::parse`] has been called.
    #[must_use]
    pub const fn parsed(&self) -> bool {
        self.parsed
    }

    /// Positional arguments left after the flags.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// The `i`th positional argument.
    #[must_use]
    pub fn arg(&self, i: usize) -> Option<&str> {
        self.args.get(i).map(String::as_str)
    }

    /// Number of positional arguments.
    #[must_use]
    pub fn narg(&self) -> usize {
        self.args.len()
    }
}

#[cfg(test)]
mod tests {
    use crate::registry::ConfigSet;
    use crate::Error;

    fn sample() -> ConfigSet {
        let mut set = ConfigSet::new();
        set.bool("b", false, "a bool");
        set.int("n", 0, "an int");
        set.string("s", String::new(), "a string");
        set
    }

    #[test]
    fn test_mixed_forms_and_terminator() {
        let mut set = sample();
        set.parse(["-b", "-n=42", "-s", "hello", "--", "pos1", "pos2"])
            .unwrap();
        assert_eq!(set.lookup("b").unwrap().current(), "true");
        assert_eq!(set.lookup("n").unwrap().current(), "42");
        assert_eq!(set.lookup("s").unwrap().current(), "hello");
        assert_eq!(set.args(), ["pos1", "pos2"]);
        assert_eq!(set.narg(), 2);
        assert_eq!(set.arg(1), Some("pos2"));
        assert_eq!(set.arg(2), None);
        assert_eq!(set.count_set(), 3);
    }

    #[test]
    fn test_bool_never_consumes_next_token() {
        let mut set = ConfigSet::new();
        let b = set.bool("b", false, "");
        set.parse(["-b", "true"]).unwrap();
        assert!(b.get());
        assert_eq!(set.args(), ["true"]);
    }

    #[test]
    fn test_bool_explicit_false() {
        let mut set = ConfigSet::new();
        let b = set.bool("b", true, "");
        set.parse(["--b=false"]).unwrap();
        assert!(!b.get());
    }

    #[test]
    fn test_double_dash_equivalent() {
        let mut set = sample();
        set.parse(["--n", "7", "--s=x"]).unwrap();
        assert_eq!(set.lookup("n").unwrap().current(), "7");
        assert_eq!(set.lookup("s").unwrap().current(), "x");
        assert!(set.args().is_empty());
    }

    #[test]
    fn test_stops_at_first_non_flag() {
        let mut set = sample();
        set.parse(["-n", "1", "file.txt", "-b"]).unwrap();
        assert_eq!(set.lookup("b").unwrap().current(), "false");
        assert_eq!(set.args(), ["file.txt", "-b"]);
    }

    #[test]
    fn test_single_dash_is_positional() {
        let mut set = sample();
        set.parse(["-b", "-", "-n=3"]).unwrap();
        assert_eq!(set.args(), ["-", "-n=3"]);
        assert_eq!(set.lookup("n").unwrap().current(), "0");
    }

    #[test]
    fn test_only_first_terminator_is_consumed() {
        let mut set = sample();
        set.parse(["--", "--", "x"]).unwrap();
        assert_eq!(set.args(), ["--", "x"]);
    }

    #[test]
    fn test_repeated_flag_last_wins() {
        let mut set = sample();
        set.parse(["-n=1", "-n", "2", "-n=0x10"]).unwrap();
        assert_eq!(set.lookup("n").unwrap().current(), "16");
    }

    #[test]
    fn test_value_keeps_later_equals() {
        let mut set = sample();
        set.parse(["-s=a=b"]).unwrap();
        assert_eq!(set.lookup("s").unwrap().current(), "a=b");
    }

    #[test]
    fn test_missing_value() {
        let mut set = sample();
        let err = set.parse(["-n"]).unwrap_err();
        assert!(matches!(err, Error::MissingValue(ref n) if n == "n"));
    }

    #[test]
    fn test_bad_syntax() {
        for token in ["---n", "-=1", "--=1"] {
            let mut set = sample();
            let err = set.parse([token]).unwrap_err();
            assert!(matches!(err, Error::BadFlagSyntax(_)), "{token}");
        }
    }

    #[test]
    fn test_invalid_value_is_reported() {
        let mut set = sample();
        let err = set.parse(["-n=forty"]).unwrap_err();
        assert!(err.is_parse());
        assert_eq!(set.count_set(), 0);
    }

    #[test]
    fn test_unknown_flag_auto_registers() {
        let mut set = sample();
        set.parse(["-colour=blue", "-size", "xl", "rest"]).unwrap();
        assert_eq!(set.lookup("colour").unwrap().current(), "blue");
        assert_eq!(set.lookup("size").unwrap().current(), "xl");
        assert_eq!(set.args(), ["rest"]);
    }

    #[test]
    fn test_unknown_flag_strict() {
        let mut set = sample().strict(true);
        let err = set.parse(["-colour=blue"]).unwrap_err();
        assert!(matches!(err, Error::UnknownConfig(_)));
    }

    #[test]
    fn test_reparse_resets_positionals() {
        let mut set = sample();
        assert!(!set.parsed());
        set.parse(["a", "b"]).unwrap();
        set.parse(["-b", "c"]).unwrap();
        assert!(set.parsed());
        assert_eq!(set.args(), ["c"]);
    }
}
