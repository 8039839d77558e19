//! Raw string field path parser.
//!
//! Grammar:
//!
//! ```text
//! path    := segment ( '.' segment | '[' bracket ']' )*
//! segment := '$' | name
//! bracket := digits | '-' digits | '$'
//! ```
//!
//! Digits after a dot are a member name, never an index. Only brackets
//! produce index segments; a negative bracket index means "positional".

use std::iter::Peekable;
use std::str::CharIndices;

use crate::error::PathParseError;

use super::{FieldPath, Segment};

pub struct PathParser<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> PathParser<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
        }
    }

    pub fn parse(mut self) -> Result<FieldPath, PathParseError> {
        let mut path = FieldPath::new();
        path.push(self.segment()?);

        while let Some((offset, c)) = self.chars.next() {
            match c {
                '.' => path.push(self.segment()?),
                '[' => path.push(self.bracket(offset)?),
                other => {
                    return Err(self.error(format!("unexpected character '{}'", other), offset))
                }
            }
        }
        Ok(path)
    }

    fn offset(&mut self) -> usize {
        self.chars
            .peek()
            .map(|&(offset, _)| offset)
            .unwrap_or(self.source.len())
    }

    fn error(&self, message: impl Into<String>, offset: usize) -> PathParseError {
        PathParseError::invalid(self.source, message, offset)
    }

    fn segment(&mut self) -> Result<Segment, PathParseError> {
        let start = self.offset();
        let mut name = String::new();
        while let Some(&(_, c)) = self.chars.peek() {
            if c == '.' || c == '[' || c == ']' {
                break;
            }
            name.push(c);
            self.chars.next();
        }
        match name.as_str() {
            "" => Err(self.error("empty segment", start)),
            "$" => Ok(Segment::Positional),
            _ => Ok(Segment::Member(name)),
        }
    }

    fn bracket(&mut self, open: usize) -> Result<Segment, PathParseError> {
        let start = self.offset();
        let mut content = String::new();
        loop {
            match self.chars.next() {
                Some((_, ']')) => break,
                Some((_, c)) => content.push(c),
                None => return Err(self.error("unclosed '['", open)),
            }
        }

        if content == "$" {
            return Ok(Segment::Positional);
        }
        if let Some(digits) = content.strip_prefix('-') {
            if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
                return Ok(Segment::Positional);
            }
        }
        if !content.is_empty() && content.chars().all(|c| c.is_ascii_digit()) {
            return content
                .parse::<usize>()
                .map(Segment::Index)
                .map_err(|_| self.error("index out of range", start));
        }
        Err(self.error(format!("invalid index '{}'", content), start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Vec<Segment> {
        FieldPath::parse(source).unwrap().segments().to_vec()
    }

    #[test]
    fn test_dotted_members() {
        assert_eq!(
            parse("Name.First"),
            vec![Segment::member("Name"), Segment::member("First")]
        );
    }

    #[test]
    fn test_digits_after_dot_stay_members() {
        assert_eq!(
            parse("pets.3.type"),
            vec![
                Segment::member("pets"),
                Segment::member("3"),
                Segment::member("type")
            ]
        );
    }

    #[test]
    fn test_brackets() {
        assert_eq!(
            parse("Pets[3].Type"),
            vec![
                Segment::member("Pets"),
                Segment::Index(3),
                Segment::member("Type")
            ]
        );
        assert_eq!(parse("Pets[-1].Type")[1], Segment::Positional);
        assert_eq!(parse("Pets[$]")[1], Segment::Positional);
        assert_eq!(parse("pets.$.type")[1], Segment::Positional);
        assert_eq!(parse("Grid[1][2]")[1..], [Segment::Index(1), Segment::Index(2)]);
    }

    #[test]
    fn test_casing_preserved() {
        assert_eq!(parse("name.NoExisty")[1], Segment::member("NoExisty"));
    }

    #[test]
    fn test_malformed_paths() {
        for source in ["", "a..b", ".a", "a.", "a[", "a[x]", "a[]", "a]b", "a[1]b"] {
            assert!(FieldPath::parse(source).is_err(), "{} should not parse", source);
        }
    }

    #[test]
    fn test_error_offset() {
        match FieldPath::parse("a[x]").unwrap_err() {
            PathParseError::Invalid { offset, .. } => assert_eq!(offset, 2),
        }
    }
}
