use std::fmt;
use std::str::FromStr;

/// An email address as submitted through the landing page form.
///
/// The value is kept byte-for-byte: uniqueness is checked on the exact
/// submitted text, so no trimming or case folding happens here.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct SubmittedEmail(String);

impl FromStr for SubmittedEmail {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.is_empty() {
            return Err("Email address cannot be empty".into());
        }
        Ok(Self(value.to_string()))
    }
}

impl AsRef<str> for SubmittedEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubmittedEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
