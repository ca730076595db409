#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptStatus {
    Successful,
    Failed,
}

impl AsRef<str> for AttemptStatus {
    fn as_ref(&self) -> &'static str {
        match self {
            AttemptStatus::Successful => "successful",
            AttemptStatus::Failed => "failed",
        }
    }
}

impl TryFrom<String> for AttemptStatus {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.as_ref() {
            "successful" => Ok(AttemptStatus::Successful),
            "failed" => Ok(AttemptStatus::Failed),
            other => Err(format!("`{other}` is not a valid variant of AttemptStatus")),
        }
    }
}
