use sqlx::{
    error::BoxDynError,
    postgres::{PgTypeInfo, PgValueRef},
    Decode, Postgres, Type,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailingStatus {
    Created,
    Launched,
    Completed,
}

impl AsRef<str> for MailingStatus {
    fn as_ref(&self) -> &'static str {
        match self {
            MailingStatus::Created => "created",
            MailingStatus::Launched => "launched",
            MailingStatus::Completed => "completed",
        }
    }
}

impl TryFrom<String> for MailingStatus {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.as_ref() {
            "created" => Ok(MailingStatus::Created),
            "launched" => Ok(MailingStatus::Launched),
            "completed" => Ok(MailingStatus::Completed),
            other => Err(format!("`{other}` is not a valid variant of MailingStatus")),
        }
    }
}

impl Type<Postgres> for MailingStatus {
    fn type_info() -> PgTypeInfo {
        String::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for MailingStatus {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let status = String::decode(value)?;
        Self::try_from(status).map_err(|e| e.into())
    }
}
