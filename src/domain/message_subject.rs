use serde::Deserialize;
use sqlx::{
    error::BoxDynError,
    postgres::{PgTypeInfo, PgValueRef},
    Decode, Postgres, Type,
};
use unicode_segmentation::UnicodeSegmentation;

/// A mail subject line: non-empty, at most 150 graphemes, single line.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageSubject(String);

// CR and LF would let a subject smuggle extra headers into the message.
static FORBIDDEN_CHARS: [char; 2] = ['\r', '\n'];

impl MessageSubject {
    pub fn parse(s: String) -> Result<MessageSubject, String> {
        match s {
            _ if s.trim().is_empty() => Err(format!(
                "Message subject is empty or contains whitespace only: `{s}`"
            )),
            _ if s.graphemes(true).count() > 150 => {
                Err(format!("`{s}` is longer than 150 graphemes"))
            }
            _ if s.chars().any(|c| FORBIDDEN_CHARS.contains(&c)) => {
                Err("Message subject contains a line break".to_string())
            }
            _ => Ok(Self(s)),
        }
    }
}

impl AsRef<str> for MessageSubject {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Type<Postgres> for MessageSubject {
    fn type_info() -> PgTypeInfo {
        String::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for MessageSubject {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let subject = String::decode(value)?;
        Self::parse(subject).map_err(|e| e.into())
    }
}
