use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::NoteError;

/// Classification applied to a note.
///
/// The set is closed: parsing accepts any casing of the member names and
/// rejects everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tag {
    Business,
    Personal,
    Important,
}

impl Tag {
    /// Every member, in declaration order.
    pub const ALL: [Tag; 3] = [Tag::Business, Tag::Personal, Tag::Important];

    /// Returns the canonical uppercase name used for storage and display.
    ///
    /// # Examples
    ///
    /// ```
    /// use notes::Tag;
    ///
    /// assert_eq!(Tag::Business.as_str(), "BUSINESS");
    /// ```
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Business => "BUSINESS",
            Self::Personal => "PERSONAL",
            Self::Important => "IMPORTANT",
        }
    }

    /// Comma-separated list of the allowed names, for error messages.
    pub fn allowed_values() -> String {
        Self::ALL
            .iter()
            .map(|tag| tag.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tag {
    type Err = NoteError;

    /// Parses a tag name, ignoring case.
    ///
    /// # Examples
    ///
    /// ```
    /// use notes::Tag;
    ///
    /// assert_eq!("business".parse::<Tag>().unwrap(), Tag::Business);
    /// assert_eq!("Important".parse::<Tag>().unwrap(), Tag::Important);
    /// assert!("urgent".parse::<Tag>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| NoteError::InvalidTag(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_any_casing() {
        assert_eq!("BUSINESS".parse::<Tag>().unwrap(), Tag::Business);
        assert_eq!("personal".parse::<Tag>().unwrap(), Tag::Personal);
        assert_eq!("iMpOrTaNt".parse::<Tag>().unwrap(), Tag::Important);
    }

    #[test]
    fn rejects_unknown_name_and_reports_it() {
        let err = "urgent".parse::<Tag>().unwrap_err();
        assert!(matches!(err, NoteError::InvalidTag(ref name) if name == "urgent"));
    }

    #[test]
    fn rejects_padded_and_empty_input() {
        assert!(" business".parse::<Tag>().is_err());
        assert!("".parse::<Tag>().is_err());
    }

    #[test]
    fn serializes_as_uppercase_name() {
        let json = serde_json::to_string(&Tag::Important).unwrap();
        assert_eq!(json, r#""IMPORTANT""#);

        let tag: Tag = serde_json::from_str(r#""PERSONAL""#).unwrap();
        assert_eq!(tag, Tag::Personal);
    }

    #[test]
    fn allowed_values_lists_every_member() {
        assert_eq!(Tag::allowed_values(), "BUSINESS, PERSONAL, IMPORTANT");
    }
}
