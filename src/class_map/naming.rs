//! Member-name to element-name conventions.

use serde::Deserialize;

/// How a member name becomes an element name when no explicit override exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingConvention {
    /// Use the member name as-is.
    #[default]
    Verbatim,
    /// `FirstName` -> `firstName`
    CamelCase,
    /// `FirstName` -> `first_name`
    SnakeCase,
}

impl NamingConvention {
    pub fn apply(&self, member_name: &str) -> String {
        match self {
            NamingConvention::Verbatim => member_name.to_string(),
            NamingConvention::CamelCase => to_camel_case(member_name),
            NamingConvention::SnakeCase => to_snake_case(member_name),
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "verbatim" | "none" => Some(NamingConvention::Verbatim),
            "camel" | "camel_case" | "camelcase" => Some(NamingConvention::CamelCase),
            "snake" | "snake_case" => Some(NamingConvention::SnakeCase),
            _ => None,
        }
    }
}

fn to_camel_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn to_snake_case(name: &str) -> String {
    let mut result = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for c in name.chars() {
        if c.is_uppercase() {
            if prev_lower {
                result.push('_');
            }
            result.extend(c.to_lowercase());
            prev_lower = false;
        } else {
            result.push(c);
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conventions() {
        assert_eq!(NamingConvention::Verbatim.apply("FirstName"), "FirstName");
        assert_eq!(NamingConvention::CamelCase.apply("FirstName"), "firstName");
        assert_eq!(NamingConvention::SnakeCase.apply("FirstName"), "first_name");
        assert_eq!(NamingConvention::SnakeCase.apply("HTTPCode"), "httpcode");
        assert_eq!(NamingConvention::SnakeCase.apply("Line2Text"), "line2_text");
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            NamingConvention::parse("Camel"),
            Some(NamingConvention::CamelCase)
        );
        assert_eq!(NamingConvention::parse("kebab"), None);
    }
}
