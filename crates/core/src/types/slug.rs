//! URL slug type.

use core::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Characters used for the random token prefixed to generated slugs.
const TOKEN_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Length of the random token prefixed to generated slugs.
pub const TOKEN_LENGTH: usize = 3;

/// Errors that can occur when parsing a [`Slug`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SlugError {
    /// The input string is empty.
    #[error("slug cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("slug must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside `[A-Za-z0-9_-]`.
    #[error("slug contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// A URL-safe identifier for categories and products.
///
/// ## Constraints
///
/// - Length: 1-255 characters
/// - Characters: ASCII letters, digits, underscores and hyphens
///
/// ## Examples
///
/// ```
/// use corner_shop_core::Slug;
///
/// assert!(Slug::parse("django-book").is_ok());
/// assert!(Slug::parse("").is_err());
/// assert!(Slug::parse("has space").is_err());
///
/// let slug = Slug::from_name("Django Book!").unwrap();
/// assert_eq!(slug.as_str(), "django-book");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Maximum length of a slug (matches the database column).
    pub const MAX_LENGTH: usize = 255;

    /// Parse a `Slug` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, longer than 255 characters, or
    /// contains anything other than ASCII alphanumerics, `_` and `-`.
    pub fn parse(s: &str) -> Result<Self, SlugError> {
        if s.is_empty() {
            return Err(SlugError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(SlugError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if let Some(c) = s.chars().find(|c| !is_slug_char(*c)) {
            return Err(SlugError::InvalidCharacter(c));
        }

        Ok(Self(s.to_owned()))
    }

    /// Build a slug from a display name.
    ///
    /// # Errors
    ///
    /// Returns [`SlugError::Empty`] if the name has no sluggable characters.
    pub fn from_name(name: &str) -> Result<Self, SlugError> {
        let mut slug = slugify(name);
        truncate_slug(&mut slug);
        Self::parse(&slug)
    }

    /// Generate a slug for a name that was given none.
    ///
    /// A short random token is prefixed so that categories sharing a name
    /// still get distinct slugs: `"Books"` becomes e.g. `"k3x-books"`.
    #[must_use]
    pub fn generate<R: Rng>(name: &str, rng: &mut R) -> Self {
        let mut slug = slugify(&format!("{}-{name}", random_token(rng)));
        truncate_slug(&mut slug);
        // The token alone is always a valid slug
        Self(slug)
    }

    /// Returns the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Slug` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Random token of [`TOKEN_LENGTH`] characters from `[a-z0-9]`.
fn random_token<R: Rng>(rng: &mut R) -> String {
    (0..TOKEN_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..TOKEN_ALPHABET.len());
            TOKEN_ALPHABET.get(idx).copied().map_or('a', char::from)
        })
        .collect()
}

const fn is_slug_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// Convert arbitrary text into slug form.
///
/// Decomposes accented letters to their ASCII base (NFKD without combining
/// marks), lowercases, drops everything except ASCII alphanumerics,
/// underscores, hyphens and whitespace, collapses runs of whitespace and hyphens into a
/// single hyphen, and trims leading/trailing hyphens and underscores.
///
/// ```
/// use corner_shop_core::slugify;
///
/// assert_eq!(slugify("  Hello,   World! "), "hello-world");
/// assert_eq!(slugify("abc - Django_Book"), "abc-django_book");
/// assert_eq!(slugify("Crème brûlée"), "creme-brulee");
/// ```
#[must_use]
pub fn slugify(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut pending_separator = false;

    for c in value.nfkd().filter(|c| !is_combining_mark(*c)) {
        if c.is_whitespace() || c == '-' {
            pending_separator = true;
        } else if c.is_ascii_alphanumeric() || c == '_' {
            if pending_separator && !out.is_empty() {
                out.push('-');
            }
            pending_separator = false;
            out.push(c.to_ascii_lowercase());
        }
    }

    out.trim_matches(|c| c == '-' || c == '_').to_owned()
}

/// Cut a slug to `MAX_LENGTH` without leaving a trailing separator.
fn truncate_slug(slug: &mut String) {
    if slug.len() > Slug::MAX_LENGTH {
        // Slugs are pure ASCII, so any byte index is a char boundary
        slug.truncate(Slug::MAX_LENGTH);
        let trimmed_len = slug.trim_end_matches(['-', '_']).len();
        slug.truncate(trimmed_len);
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Slug {
    type Err = SlugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Slug {
    type Error = SlugError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Slug {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Slug {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::parse(&s)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Slug {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}
