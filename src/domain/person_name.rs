use std::collections::HashSet;

use unicode_segmentation::UnicodeSegmentation;

/// A first or last name, as submitted on registration. Unlike an email, a name
/// may be left empty; it is forwarded to Mailchimp as-is (`FNAME`/`LNAME`).
///
/// Constraints: trimmed, at most 256 graphemes, none of `/()"<>\{}`.
///
/// The field is left private, to prevent bypassing of `parse`.
#[derive(Debug, Clone)]
pub struct PersonName(String);

impl PersonName {
    pub fn parse(name: String) -> Result<Self, String> {
        let name = name.trim().to_string();
        let too_long = name.graphemes(true).count() > 256;
        let bad_chars: HashSet<char> = r#"/()"<>\{}"#.chars().collect();
        let bad = name.chars().any(|c| bad_chars.contains(&c));
        match !too_long && !bad {
            true => Ok(Self(name)),
            false => Err(format!("Invalid name: {name:?}")),
        }
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str { &self.0 }
}
