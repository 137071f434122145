//! Array style hints: how delimited text is split into a list before casting.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// A recognised way of encoding a list in a single source value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrayStyle {
    /// Already a native list.
    Basic,
    /// Comma separated.
    Csv,
    /// Space separated.
    Ssv,
    /// Tab separated.
    Tsv,
    /// Pipe separated.
    Pipes,
    /// Semicolon separated.
    Semi,
    /// Colon separated.
    Colon,
}

impl ArrayStyle {
    /// All styles, in declaration order.
    pub const ALL: [ArrayStyle; 7] = [
        ArrayStyle::Basic,
        ArrayStyle::Csv,
        ArrayStyle::Ssv,
        ArrayStyle::Tsv,
        ArrayStyle::Pipes,
        ArrayStyle::Semi,
        ArrayStyle::Colon,
    ];

    /// Parse a style token, case-insensitively.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        Self::ALL
            .into_iter()
            .find(|style| style.as_str().eq_ignore_ascii_case(token))
    }

    /// The style token.
    pub const fn as_str(self) -> &'static str {
        match self {
            ArrayStyle::Basic => "basic",
            ArrayStyle::Csv => "csv",
            ArrayStyle::Ssv => "ssv",
            ArrayStyle::Tsv => "tsv",
            ArrayStyle::Pipes => "pipes",
            ArrayStyle::Semi => "semi",
            ArrayStyle::Colon => "colon",
        }
    }

    /// The delimiter, or `None` for [`ArrayStyle::Basic`].
    pub const fn delimiter(self) -> Option<char> {
        match self {
            ArrayStyle::Basic => None,
            ArrayStyle::Csv => Some(','),
            ArrayStyle::Ssv => Some(' '),
            ArrayStyle::Tsv => Some('\t'),
            ArrayStyle::Pipes => Some('|'),
            ArrayStyle::Semi => Some(';'),
            ArrayStyle::Colon => Some(':'),
        }
    }

    /// Try to read `value` as a list in this style.
    ///
    /// `Basic` matches native non-empty lists only. Delimited styles match
    /// scalars (rendered as text) and never lists.
    pub fn extract(self, value: &Value) -> Option<Value> {
        match (self.delimiter(), value) {
            (None, Value::List(items)) if !items.is_empty() => Some(value.clone()),
            (None, _) | (Some(_), Value::List(_)) => None,
            (Some(delimiter), other) => {
                let text = other.scalar_text()?;
                let parts = split_delimited(&text, delimiter);
                Some(Value::List(parts.into_iter().map(Value::Text).collect()))
            }
        }
    }
}

impl fmt::Display for ArrayStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Apply style hints in order; the first that matches wins.
///
/// Returns the value unchanged when no hint matches.
pub fn extract_with(styles: &[ArrayStyle], value: &Value) -> Value {
    styles
        .iter()
        .find_map(|style| style.extract(value))
        .unwrap_or_else(|| value.clone())
}

/// Split one line of delimited text with CSV quoting rules.
///
/// A field wrapped in double quotes may contain the delimiter; `""` inside
/// quotes is a literal quote. Always yields at least one field.
pub fn split_delimited(input: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(ch);
            }
        } else if ch == '"' && current.is_empty() {
            in_quotes = true;
        } else if ch == delimiter {
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    fields.push(current);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(items: &[&str]) -> Value {
        Value::from(items.to_vec())
    }

    #[test]
    fn test_parse() {
        assert_eq!(ArrayStyle::parse("CSV"), Some(ArrayStyle::Csv));
        assert_eq!(ArrayStyle::parse(" pipes "), Some(ArrayStyle::Pipes));
        assert_eq!(ArrayStyle::parse("tsv"), Some(ArrayStyle::Tsv));
        assert_eq!(ArrayStyle::parse("commas"), None);
        for style in ArrayStyle::ALL {
            assert_eq!(ArrayStyle::parse(style.as_str()), Some(style));
        }
    }

    #[test]
    fn test_split_delimited() {
        assert_eq!(split_delimited("a,b,c", ','), vec!["a", "b", "c"]);
        assert_eq!(split_delimited("", ','), vec![""]);
        assert_eq!(split_delimited("a,,b", ','), vec!["a", "", "b"]);
        assert_eq!(
            split_delimited(r#""x,y",z,"say ""hi""""#, ','),
            vec!["x,y", "z", r#"say "hi""#]
        );
        assert_eq!(split_delimited("a\tb", '\t'), vec!["a", "b"]);
    }

    #[test]
    fn test_extract_delimited() {
        assert_eq!(
            ArrayStyle::Pipes.extract(&Value::from("1|2|3")),
            Some(texts(&["1", "2", "3"]))
        );
        assert_eq!(
            ArrayStyle::Csv.extract(&Value::Int(7)),
            Some(texts(&["7"]))
        );
        assert_eq!(ArrayStyle::Csv.extract(&Value::from(vec!["a"])), None);
        assert_eq!(ArrayStyle::Csv.extract(&Value::Map(Default::default())), None);
    }

    #[test]
    fn test_extract_basic() {
        let list = texts(&["a", "b"]);
        assert_eq!(ArrayStyle::Basic.extract(&list), Some(list.clone()));
        assert_eq!(ArrayStyle::Basic.extract(&Value::from("a,b")), None);
        assert_eq!(ArrayStyle::Basic.extract(&Value::List(vec![])), None);
    }

    #[test]
    fn test_first_matching_hint_wins() {
        let styles = [ArrayStyle::Basic, ArrayStyle::Semi, ArrayStyle::Csv];
        assert_eq!(
            extract_with(&styles, &Value::from("a;b,c")),
            texts(&["a", "b,c"])
        );
        let list = texts(&["x"]);
        assert_eq!(extract_with(&styles, &list), list);
        assert_eq!(extract_with(&[], &Value::from("a,b")), Value::from("a,b"));
    }
}
