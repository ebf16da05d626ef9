//! Validated email addresses.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Why a string was rejected by [`Email::parse`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// The input was empty.
    #[error("email is empty")]
    Empty,
    /// The input exceeds [`Email::MAX_LEN`] bytes.
    #[error("email is longer than {0} characters")]
    TooLong(usize),
    /// The input has no `@` separating local part and domain.
    #[error("email is missing the '@' separator")]
    NoSeparator,
    /// Nothing precedes the `@`.
    #[error("email has an empty local part")]
    EmptyLocal,
    /// Nothing follows the `@`.
    #[error("email has an empty domain")]
    EmptyDomain,
}

/// An email address with `local@domain` structure.
///
/// Validation is deliberately shallow: one `@`, a non-empty part on each
/// side, and the RFC 5321 length cap. Deliverability is the mail server's
/// problem, not this type's.
///
/// ```
/// use backoffice_core::Email;
///
/// assert!(Email::parse("ops@example.com").is_ok());
/// assert!(Email::parse("ops+tag@mail.example.com").is_ok());
/// assert!(Email::parse("not-an-email").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// RFC 5321 length cap.
    pub const MAX_LEN: usize = 254;

    /// Validate and wrap an email string.
    ///
    /// # Errors
    ///
    /// Returns an [`EmailError`] describing the first structural problem
    /// found: empty input, over-length input, a missing `@`, or an empty
    /// local part or domain.
    pub fn parse(raw: &str) -> Result<Self, EmailError> {
        if raw.is_empty() {
            return Err(EmailError::Empty);
        }
        if raw.len() > Self::MAX_LEN {
            return Err(EmailError::TooLong(Self::MAX_LEN));
        }

        let (local, domain) = raw.split_once('@').ok_or(EmailError::NoSeparator)?;
        if local.is_empty() {
            return Err(EmailError::EmptyLocal);
        }
        if domain.is_empty() {
            return Err(EmailError::EmptyDomain);
        }

        Ok(Self(raw.to_owned()))
    }

    /// The address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Unwrap into the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// The address lowercased. Login identifiers are matched
    /// case-insensitively, so lookups go through this form.
    #[must_use]
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Email {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Email {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        // Stored values were validated on the way in
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Email {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_common_shapes() {
        for ok in [
            "ops@example.com",
            "first.last@example.com",
            "ops+orders@example.com",
            "a@b",
        ] {
            assert!(Email::parse(ok).is_ok(), "{ok}");
        }
    }

    #[test]
    fn test_rejects_structural_problems() {
        assert_eq!(Email::parse(""), Err(EmailError::Empty));
        assert_eq!(Email::parse("no-separator"), Err(EmailError::NoSeparator));
        assert_eq!(Email::parse("@example.com"), Err(EmailError::EmptyLocal));
        assert_eq!(Email::parse("ops@"), Err(EmailError::EmptyDomain));
    }

    #[test]
    fn test_rejects_over_length() {
        let long = format!("{}@example.com", "x".repeat(Email::MAX_LEN));
        assert_eq!(Email::parse(&long), Err(EmailError::TooLong(Email::MAX_LEN)));
    }

    #[test]
    fn test_normalized_lowercases() {
        let email = Email::parse("Ops@Example.COM").unwrap();
        assert_eq!(email.normalized(), "ops@example.com");
        // the original casing is preserved
        assert_eq!(email.as_str(), "Ops@Example.COM");
    }

    #[test]
    fn test_serde_is_transparent() {
        let email = Email::parse("ops@example.com").unwrap();
        let json = serde_json::to_string(&email).unwrap();
        assert_eq!(json, "\"ops@example.com\"");
        assert_eq!(serde_json::from_str::<Email>(&json).unwrap(), email);
    }
}
