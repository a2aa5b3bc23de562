//! Certificate identifier type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`CertificateId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CertificateIdError {
    /// The input string is empty.
    #[error("certificate id cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("certificate id must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside `[A-Za-z0-9_-]`.
    #[error("certificate id contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// Identifier of a registered certificate holder.
///
/// The id doubles as the object-store key stem (`{id}.pdf`) and as a URL
/// path segment, so it is restricted to characters that need no escaping
/// in either place.
///
/// ## Constraints
///
/// - Length: 1-128 characters
/// - Characters: ASCII letters, digits, `-` and `_`
///
/// ## Examples
///
/// ```
/// use ignite_certificates_core::CertificateId;
///
/// assert!(CertificateId::parse("abc123").is_ok());
/// assert!(CertificateId::parse("1f0e6a7c-55b2-4bb4-9f3e-0d1d8e6f7a10").is_ok());
///
/// assert!(CertificateId::parse("").is_err());
/// assert!(CertificateId::parse("../etc/passwd").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct CertificateId(String);

impl CertificateId {
    /// Maximum length of a certificate id.
    pub const MAX_LENGTH: usize = 128;

    /// File extension of the rendered artifact.
    pub const ARTIFACT_EXTENSION: &'static str = "pdf";

    /// Parse a `CertificateId` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, longer than 128 characters,
    /// or contains anything other than ASCII letters, digits, `-` and `_`.
    pub fn parse(s: &str) -> Result<Self, CertificateIdError> {
        if s.is_empty() {
            return Err(CertificateIdError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(CertificateIdError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if let Some(bad) = s
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(CertificateIdError::InvalidCharacter(bad));
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the id and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Object-store key under which this id's certificate is stored.
    ///
    /// ```
    /// use ignite_certificates_core::CertificateId;
    ///
    /// let id = CertificateId::parse("abc123").unwrap();
    /// assert_eq!(id.object_key(), "abc123.pdf");
    /// ```
    #[must_use]
    pub fn object_key(&self) -> String {
        format!("{}.{}", self.0, Self::ARTIFACT_EXTENSION)
    }
}

impl fmt::Display for CertificateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for CertificateId {
    type Err = CertificateIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CertificateId {
    type Error = CertificateIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CertificateId> for String {
    fn from(id: CertificateId) -> Self {
        id.0
    }
}

impl AsRef<str> for CertificateId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for CertificateId {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for CertificateId {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::parse(&s)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for CertificateId {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}
