//! Human-readable order numbers.
//!
//! Order numbers look like `SH-482931`: the `SH-` prefix followed by six
//! decimal digits. They are generated randomly at order placement and
//! made unique by a database constraint plus a bounded retry loop, so
//! this type never checks uniqueness itself.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Prefix shared by every order number.
const PREFIX: &str = "SH-";

/// Number of decimal digits after the prefix.
const DIGITS: usize = 6;

/// Errors that can occur when parsing an [`OrderNumber`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum OrderNumberError {
    /// The input does not match `SH-` followed by six digits, even after
    /// lenient normalization.
    #[error("not a valid order number")]
    Invalid,
}

/// A business-unique, human-readable order number (`SH-######`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Generate a candidate order number from six random decimal digits.
    ///
    /// Uniqueness is enforced at insert time by the order store, which
    /// regenerates on collision.
    #[must_use]
    pub fn generate() -> Self {
        use rand::Rng;
        let digits: u32 = rand::rng().random_range(0..1_000_000);
        Self(format!("{PREFIX}{digits:06}"))
    }

    /// Parse an order number from customer input, normalizing leniently.
    ///
    /// Accepted forms, all yielding `SH-123456`:
    /// - `SH-123456` (canonical, any case)
    /// - ` sh123456 ` (missing hyphen, stray whitespace)
    /// - `SH - 123456`, `sh_123456` (any non-alphanumeric separators)
    ///
    /// # Errors
    ///
    /// Returns [`OrderNumberError::Invalid`] when no normalization
    /// produces the canonical form.
    pub fn parse(raw: &str) -> Result<Self, OrderNumberError> {
        let mut s: String = raw
            .trim()
            .to_uppercase()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();

        // `SH123456` -> `SH-123456`
        if Self::is_prefixed_digits(&s) {
            s.insert_str(2, "-");
        }

        if Self::is_canonical(&s) {
            return Ok(Self(s));
        }

        // Fallback: strip every non-alphanumeric character and rebuild.
        let alnum: String = s.chars().filter(char::is_ascii_alphanumeric).collect();
        if Self::is_prefixed_digits(&alnum) {
            let mut canonical = alnum;
            canonical.insert_str(2, "-");
            return Ok(Self(canonical));
        }

        Err(OrderNumberError::Invalid)
    }

    /// Returns the canonical `SH-######` form as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `OrderNumber` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// `SH` immediately followed by exactly six digits, no separator.
    fn is_prefixed_digits(s: &str) -> bool {
        s.len() == 2 + DIGITS
            && s.starts_with("SH")
            && s.chars().skip(2).all(|c| c.is_ascii_digit())
    }

    /// Canonical form: `SH-` followed by exactly six digits.
    fn is_canonical(s: &str) -> bool {
        s.len() == PREFIX.len() + DIGITS
            && s.starts_with(PREFIX)
            && s.chars().skip(PREFIX.len()).all(|c| c.is_ascii_digit())
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for OrderNumber {
    type Err = OrderNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for OrderNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for OrderNumber {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for OrderNumber {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are in canonical form already
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for OrderNumber {
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
    fn test_generate_format() {
        for _ in 0..100 {
            let number = OrderNumber::generate();
            let s = number.as_str();
            assert_eq!(s.len(), 9);
            assert!(s.starts_with("SH-"));
            assert!(s.chars().skip(3).all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_parse_canonical() {
        let number = OrderNumber::parse("SH-123456").unwrap();
        assert_eq!(number.as_str(), "SH-123456");
    }

    #[test]
    fn test_parse_lowercase_with_whitespace() {
        let number = OrderNumber::parse(" sh123456 ").unwrap();
        assert_eq!(number.as_str(), "SH-123456");
    }

    #[test]
    fn test_parse_internal_spaces() {
        let number = OrderNumber::parse("sh 123 456").unwrap();
        assert_eq!(number.as_str(), "SH-123456");
    }

    #[test]
    fn test_parse_odd_separators() {
        let number = OrderNumber::parse("SH - 123456").unwrap();
        assert_eq!(number.as_str(), "SH-123456");
        let number = OrderNumber::parse("sh_123456").unwrap();
        assert_eq!(number.as_str(), "SH-123456");
    }

    #[test]
    fn test_parse_preserves_leading_zeros() {
        let number = OrderNumber::parse("sh000042").unwrap();
        assert_eq!(number.as_str(), "SH-000042");
    }

    #[test]
    fn test_parse_invalid() {
        assert!(OrderNumber::parse("").is_err());
        assert!(OrderNumber::parse("SH-12345").is_err()); // five digits
        assert!(OrderNumber::parse("SH-1234567").is_err()); // seven digits
        assert!(OrderNumber::parse("XY-123456").is_err()); // wrong prefix
        assert!(OrderNumber::parse("SH-12A456").is_err()); // non-digit
    }

    #[test]
    fn test_generated_numbers_parse_back() {
        let number = OrderNumber::generate();
        let parsed = OrderNumber::parse(number.as_str()).unwrap();
        assert_eq!(parsed, number);
    }
}
