//! Typed cache key scoping one staleness record

use std::borrow::{Borrow, Cow};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CampusCalError;

/// Identifier for one logical data source's cached scrape.
///
/// Keys are non-empty and limited to lowercase ASCII letters, digits, `.`,
/// `_` and `-` so they are safe as database keys and in log fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CacheKey(Cow<'static, str>);

impl CacheKey {
    /// Academic calendar (registrar) events
    pub const ACADEMIC_EVENTS: CacheKey = CacheKey(Cow::Borrowed("academic-events-last-saved"));

    /// Campus-wide events feed
    pub const CAMPUS_EVENTS: CacheKey = CacheKey(Cow::Borrowed("campus-events-last-saved"));

    /// Longest accepted key
    pub const MAX_LEN: usize = 128;

    /// Validate and wrap a key.
    ///
    /// # Errors
    /// Returns `CampusCalError::InvalidInput` for empty, overlong or
    /// non-conforming keys.
    pub fn new(key: impl Into<String>) -> Result<Self, CampusCalError> {
        let key = key.into();
        validate(&key)?;
        Ok(Self(Cow::Owned(key)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn validate(key: &str) -> Result<(), CampusCalError> {
    if key.is_empty() {
        return Err(CampusCalError::InvalidInput("cache key must not be empty".into()));
    }
    if key.len() > CacheKey::MAX_LEN {
        return Err(CampusCalError::InvalidInput(format!(
            "cache key exceeds {} characters",
            CacheKey::MAX_LEN
        )));
    }
    if let Some(bad) =
        key.chars().find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '-')))
    {
        return Err(CampusCalError::InvalidInput(format!(
            "cache key '{key}' contains invalid character '{bad}'"
        )));
    }
    Ok(())
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for CacheKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl FromStr for CacheKey {
    type Err = CampusCalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for CacheKey {
    type Error = CampusCalError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CacheKey> for String {
    fn from(key: CacheKey) -> Self {
        key.0.into_owned()
    }
}
