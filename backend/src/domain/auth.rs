//! Email allow-list authorisation.
//!
//! User identity is nothing more than the email address returned by the OAuth2
//! provider. Access is granted when that address appears on a static
//! allow-list. The decision is expressed through [`AccessPolicy`] so the HTTP
//! gate can be tested without sessions or providers.

use std::collections::BTreeSet;
use std::fmt;

/// Email address returned by an identity provider.
///
/// The original spelling is preserved for display; comparisons go through
/// [`Email::normalized`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email(String);

/// Validation failures for [`Email`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmailValidationError {
    /// The address was blank.
    #[error("email must not be empty")]
    Empty,
    /// The address had no `@` separating local part and domain.
    #[error("email '{0}' is missing an '@'")]
    MissingAt(String),
}

impl Email {
    /// Validate and trim an address.
    ///
    /// # Examples
    /// ```
    /// use travelmap::domain::Email;
    ///
    /// let email = Email::new(" John@Example.com ").unwrap();
    /// assert_eq!(email.as_str(), "John@Example.com");
    /// assert_eq!(email.normalized(), "john@example.com");
    /// ```
    pub fn new(raw: impl AsRef<str>) -> Result<Self, EmailValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(EmailValidationError::Empty);
        }
        if !trimmed.contains('@') {
            return Err(EmailValidationError::MissingAt(trimmed.to_owned()));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Address as supplied.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Lower-cased form used for allow-list matching.
    #[must_use]
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static set of addresses allowed past the gate.
///
/// Matching ignores case: providers are inconsistent about capitalisation and
/// the list comes from free-text configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList {
    entries: BTreeSet<String>,
}

impl AllowList {
    /// Parse a comma separated list. Blank entries are dropped.
    ///
    /// # Examples
    /// ```
    /// use travelmap::domain::{AllowList, Email};
    ///
    /// let list = AllowList::parse("john@example.com, Marcia@Example.com,");
    /// assert_eq!(list.len(), 2);
    /// assert!(list.allows(&Email::new("marcia@example.com").unwrap()));
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        raw.split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_owned)
            .collect()
    }

    /// Whether `email` is on the list.
    #[must_use]
    pub fn allows(&self, email: &Email) -> bool {
        self.entries.contains(&email.normalized())
    }

    /// Number of distinct addresses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list is empty (nobody can log in).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<String> for AllowList {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|entry| entry.to_lowercase()).collect(),
        }
    }
}

/// Decides whether a caller may reach a protected operation.
pub trait AccessPolicy: Send + Sync {
    /// `email` is the address stored in the caller's session, if any.
    fn is_authorized(&self, email: Option<&Email>) -> bool;
}

/// Grants access to addresses on an [`AllowList`].
#[derive(Debug, Clone)]
pub struct AllowListPolicy {
    allow_list: AllowList,
}

impl AllowListPolicy {
    /// Wrap an allow-list.
    #[must_use]
    pub const fn new(allow_list: AllowList) -> Self {
        Self { allow_list }
    }
}

impl AccessPolicy for AllowListPolicy {
    fn is_authorized(&self, email: Option<&Email>) -> bool {
        email.is_some_and(|address| self.allow_list.allows(address))
    }
}

/// Grants access to everyone. Only constructed for development and staging
/// environments in debug builds.
#[derive(Debug, Clone, Copy, Default)]
pub struct BypassPolicy;

impl AccessPolicy for BypassPolicy {
    fn is_authorized(&self, _email: Option<&Email>) -> bool {
        true
    }
}
