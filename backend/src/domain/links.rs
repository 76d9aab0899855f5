//! Curated travel links.
//!
//! Links are displayed in `position` order. Positions are assigned by the
//! server as one past both the current maximum and the highest position ever
//! issued. They are never renumbered, so gaps appear after deletions.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A stored travel link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Link {
    pub id: Uuid,
    #[schema(example = "Rail passes")]
    pub name: String,
    #[schema(example = "https://www.seat61.com/")]
    pub url: String,
    #[serde(default)]
    pub notes: String,
    pub position: i64,
}

impl Link {
    /// Merge a partial update into this link.
    pub fn apply(&mut self, patch: LinkPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(url) = patch.url {
            self.url = url;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
        if let Some(position) = patch.position {
            self.position = position;
        }
    }
}

/// Position for a link created after `existing`.
///
/// `highest_issued` is the largest position handed out so far, including
/// positions of links that have since been deleted.
///
/// # Examples
/// ```
/// use travelmap::domain::next_position;
///
/// assert_eq!(next_position([], None), 1);
/// assert_eq!(next_position([1, 4, 2], None), 5);
/// assert_eq!(next_position([1], Some(2)), 3);
/// ```
pub fn next_position(
    existing: impl IntoIterator<Item = i64>,
    highest_issued: Option<i64>,
) -> i64 {
    existing
        .into_iter()
        .chain(highest_issued)
        .max()
        .map_or(1, |max| max.saturating_add(1))
}

/// Validation failures for link payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LinkValidationError {
    /// `name` was missing or blank.
    #[error("name must not be empty")]
    EmptyName,
    /// `url` was missing or blank.
    #[error("url must not be empty")]
    EmptyUrl,
}

/// Validated payload for a new link. Position and id are server-assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkDraft {
    name: String,
    url: String,
    notes: String,
}

impl LinkDraft {
    /// Validate raw payload parts; missing notes become an empty string.
    pub fn try_new(name: &str, url: &str, notes: Option<&str>) -> Result<Self, LinkValidationError> {
        Ok(Self {
            name: non_blank(name).ok_or(LinkValidationError::EmptyName)?,
            url: non_blank(url).ok_or(LinkValidationError::EmptyUrl)?,
            notes: notes.unwrap_or_default().to_owned(),
        })
    }

    /// Link title.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Target URL.
    #[must_use]
    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Free-form notes.
    #[must_use]
    pub fn notes(&self) -> &str {
        self.notes.as_str()
    }

    /// Build the stored link.
    #[must_use]
    pub fn into_link(self, id: Uuid, position: i64) -> Link {
        Link {
            id,
            name: self.name,
            url: self.url,
            notes: self.notes,
            position,
        }
    }
}

/// Partial update for `PUT /api/links/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LinkPatch {
    pub name: Option<String>,
    pub url: Option<String>,
    pub notes: Option<String>,
    pub position: Option<i64>,
}

impl LinkPatch {
    /// Validate the optional fields; blank names or URLs are rejected.
    pub fn try_new(
        name: Option<&str>,
        url: Option<&str>,
        notes: Option<&str>,
        position: Option<i64>,
    ) -> Result<Self, LinkValidationError> {
        let name = name
            .map(|raw| non_blank(raw).ok_or(LinkValidationError::EmptyName))
            .transpose()?;
        let url = url
            .map(|raw| non_blank(raw).ok_or(LinkValidationError::EmptyUrl))
            .transpose()?;
        Ok(Self {
            name,
            url,
            notes: notes.map(str::to_owned),
            position,
        })
    }
}

fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
