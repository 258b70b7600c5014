/*!
Method arguments and literal-token coercion.

Only three spellings are recognized, case-sensitively:
  "null"  -> Argument::Null
  "true"  -> Argument::Bool(true)
  "false" -> Argument::Bool(false)

Everything else (numbers, lists, quoted words) stays a string. There is no escape
hatch for passing the literal string "null".
*/

use serde::Serialize;
use std::fmt;

/// A single coerced method argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Argument {
    Null,
    Bool(bool),
    Str(String),
}

impl Argument {
    /// Coerce one raw command-line token.
    pub fn coerce(raw: &str) -> Self {
        match raw {
            "null" => Argument::Null,
            "true" => Argument::Bool(true),
            "false" => Argument::Bool(false),
            other => Argument::Str(other.to_string()),
        }
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::Null => f.write_str("null"),
            Argument::Bool(b) => write!(f, "{b}"),
            Argument::Str(s) => write!(f, "{s:?}"),
        }
    }
}

/// Coerce a whole token list; length and order are preserved.
pub fn coerce_arguments<I, S>(raw: I) -> Vec<Argument>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter().map(|t| Argument::coerce(t.as_ref())).collect()
}

/// Fetch a required string argument at `index`, for use inside method handles.
pub fn required_str<'a>(args: &'a [Argument], index: usize, param: &str) -> anyhow::Result<&'a str> {
    match args.get(index) {
        Some(Argument::Str(s)) => Ok(s),
        Some(other) => anyhow::bail!("argument #{index} ({param}) must be a string, got {other}"),
        None => anyhow::bail!("too few arguments: missing #{index} ({param})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_tokens_become_typed() {
        assert_eq!(Argument::coerce("null"), Argument::Null);
        assert_eq!(Argument::coerce("true"), Argument::Bool(true));
        assert_eq!(Argument::coerce("false"), Argument::Bool(false));
    }

    #[test]
    fn near_misses_stay_strings() {
        for raw in ["NULL", "True", "FALSE", " null", "nil", "0", "1", "", "[]"] {
            assert_eq!(
                Argument::coerce(raw),
                Argument::Str(raw.to_string()),
                "token {raw:?} must pass through"
            );
        }
    }

    #[test]
    fn display_quotes_strings_only() {
        let shown: Vec<String> = coerce_arguments(["null", "true", "x y"])
            .iter()
            .map(|a| a.to_string())
            .collect();
        assert_eq!(shown, vec!["null", "true", "\"x y\""]);
    }

    #[test]
    fn numbers_are_not_coerced() {
        assert_eq!(Argument::coerce("3"), Argument::Str("3".into()));
        assert_eq!(Argument::coerce("-1.5"), Argument::Str("-1.5".into()));
    }

    #[test]
    fn order_and_count_preserved() {
        let raw = ["a", "null", "true", "3", "false", "null"];
        let out = coerce_arguments(&raw);
        assert_eq!(out.len(), raw.len());
        assert_eq!(
            out,
            vec![
                Argument::Str("a".into()),
                Argument::Null,
                Argument::Bool(true),
                Argument::Str("3".into()),
                Argument::Bool(false),
                Argument::Null,
            ]
        );
    }

    #[test]
    fn empty_input() {
        assert!(coerce_arguments(Vec::<String>::new()).is_empty());
    }

    #[test]
    fn serializes_as_plain_values() {
        let args = coerce_arguments(&["null", "true", "3"]);
        assert_eq!(
            serde_json::to_value(&args).unwrap(),
            serde_json::json!([null, true, "3"])
        );
    }

    #[test]
    fn required_str_reports_position() {
        let args = coerce_arguments(&["x", "null"]);
        assert_eq!(required_str(&args, 0, "path").unwrap(), "x");
        let err = required_str(&args, 1, "path").unwrap_err();
        assert!(err.to_string().contains("must be a string"));
        let err = required_str(&args, 2, "path").unwrap_err();
        assert!(err.to_string().contains("too few arguments"));
    }
}
