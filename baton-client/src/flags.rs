//! Command-line flag rendering
//!
//! Builds the ` -q short -M 8000 ...` fragments appended to scheduler
//! commands, and the shell quoting those fragments need.

use std::borrow::Cow;

/// Value carried by a single flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagValue {
    /// Flag with no argument (e.g. `-N`)
    Switch,
    /// Numeric argument, never quoted
    Number(u64),
    /// Free-text argument, double-quoted when it contains `[` or `=` and
    /// shell-quoted otherwise
    Text(String),
}

/// One `-name value` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flag {
    pub name: &'static str,
    pub value: FlagValue,
}

impl Flag {
    pub fn switch(name: &'static str) -> Self {
        Self {
            name,
            value: FlagValue::Switch,
        }
    }

    pub fn number(name: &'static str, value: u64) -> Self {
        Self {
            name,
            value: FlagValue::Number(value),
        }
    }

    pub fn text(name: &'static str, value: impl Into<String>) -> Self {
        Self {
            name,
            value: FlagValue::Text(value.into()),
        }
    }
}

/// Renders flags as a string where every flag is preceded by a space, so
/// the result can be appended directly to a program name.
pub fn render_flags(flags: &[Flag]) -> String {
    let mut rendered = String::new();
    for flag in flags {
        rendered.push_str(" -");
        rendered.push_str(flag.name);
        match &flag.value {
            FlagValue::Switch => {}
            FlagValue::Number(n) => {
                rendered.push(' ');
                rendered.push_str(&n.to_string());
            }
            FlagValue::Text(text) => {
                rendered.push(' ');
                rendered.push_str(&text_value(text));
            }
        }
    }
    rendered
}

/// Wraps a flag value in double quotes when it contains `[` or `=`,
/// unless it is already quoted.
///
/// Resource strings such as `select[mem>8000] rusage[mem=8000]` need this.
pub fn quote_value(value: &str) -> Cow<'_, str> {
    let already_quoted = value.starts_with(['\'', '"']);
    if !already_quoted && value.contains(['[', '=']) {
        Cow::Owned(format!("\"{}\"", value))
    } else {
        Cow::Borrowed(value)
    }
}

/// Quotes a free-text value so the shell hands it to the scheduler as one
/// argument.
fn text_value(value: &str) -> Cow<'_, str> {
    match quote_value(value) {
        Cow::Borrowed(unchanged) if !unchanged.starts_with(['\'', '"']) => shell_quote(unchanged),
        quoted => quoted,
    }
}

/// POSIX shell quoting. Words made only of safe characters pass through.
pub fn shell_quote(word: &str) -> Cow<'_, str> {
    let safe = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_-./:@%+,".contains(c));
    if safe {
        Cow::Borrowed(word)
    } else {
        Cow::Owned(format!("'{}'", word.replace('\'', r#"'\''"#)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_mixed_flags() {
        let flags = vec![
            Flag::text("q", "short"),
            Flag::number("M", 8000),
            Flag::switch("N"),
        ];
        assert_eq!(render_flags(&flags), " -q short -M 8000 -N");
    }

    #[test]
    fn test_values_with_brackets_or_equals_are_quoted() {
        assert_eq!(
            quote_value("select[mem>8000] rusage[mem=8000]"),
            "\"select[mem>8000] rusage[mem=8000]\""
        );
        assert_eq!(quote_value("a=b"), "\"a=b\"");
        assert_eq!(quote_value("\"already[quoted]\""), "\"already[quoted]\"");
        assert_eq!(quote_value("'single=quoted'"), "'single=quoted'");
        assert_eq!(quote_value("/plain/path.log"), "/plain/path.log");
    }

    #[test]
    fn test_text_values_are_single_arguments() {
        let flags = vec![
            Flag::text("o", "/scratch/my run/logs/%J.out"),
            Flag::text("u", "ops@example.org"),
            Flag::text("q", "short;rm"),
            Flag::text("R", "rusage[mem=8000]"),
        ];
        assert_eq!(
            render_flags(&flags),
            " -o '/scratch/my run/logs/%J.out' -u ops@example.org -q 'short;rm' \
             -R \"rusage[mem=8000]\""
        );
    }

    #[test]
    fn test_shell_quote() {
        assert_eq!(shell_quote("cohort.align"), "cohort.align");
        assert_eq!(shell_quote("two words"), "'two words'");
        assert_eq!(shell_quote("it's"), r#"'it'\''s'"#);
        assert_eq!(shell_quote(""), "''");
    }
}
