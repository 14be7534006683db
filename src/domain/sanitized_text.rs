use once_cell::sync::Lazy;
use regex::Captures;
use regex::Regex;

/// Plain text that is safe to store and echo back into a form: no tags, no
/// script/style content, no line breaks or whitespace runs, no percent-encoded
/// octets. Admin input must pass through `SanitizedText::parse` before it
/// reaches the option store.
///
/// Unlike `UserEmail::parse`, this never fails; bad input is cleaned, not
/// rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedText(String);

static LESS_THAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^<>]*>?").expect("valid regex"));
static SCRIPT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script[^>]*?>.*?</script>").expect("valid regex"));
static STYLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<style[^>]*?>.*?</style>").expect("valid regex"));
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>?").expect("valid regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\r\n\t ]+").expect("valid regex"));
static SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r" +").expect("valid regex"));
static OCTET: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)%[a-f0-9]{2}").expect("valid regex"));

impl SanitizedText {
    pub fn parse(raw: &str) -> Self {
        let mut text = raw.to_string();
        if text.contains('<') {
            text = escape_lone_less_than(&text);
            text = SCRIPT.replace_all(&text, "").into_owned();
            text = STYLE.replace_all(&text, "").into_owned();
            text = TAG.replace_all(&text, "").into_owned();
        }
        text = WHITESPACE.replace_all(&text, " ").into_owned();

        let mut found = false;
        while OCTET.is_match(&text) {
            text = OCTET.replace_all(&text, "").into_owned();
            found = true;
        }
        if found {
            text = SPACES.replace_all(trim(&text), " ").into_owned();
        }

        Self(trim(&text).to_string())
    }

    pub fn into_inner(self) -> String { self.0 }
}

impl AsRef<str> for SanitizedText {
    fn as_ref(&self) -> &str { &self.0 }
}

fn trim(text: &str) -> &str {
    text.trim_matches(|c| matches!(c, ' ' | '\t' | '\n' | '\r' | '\0' | '\x0B'))
}

/// A `<` only opens a tag if a `>` follows before the next `<`. Otherwise the
/// `<` and everything up to the next `<` (or the end) is html-escaped, so it
/// can no longer be mistaken for markup.
fn escape_lone_less_than(text: &str) -> String {
    LESS_THAN
        .replace_all(text, |caps: &Captures| {
            let segment = &caps[0];
            match segment.ends_with('>') {
                true => segment.to_string(),
                false => htmlescape::encode_minimal(segment),
            }
        })
        .into_owned()
}
