//! Visited places shown on the world and US-state maps.
//!
//! A place is identified by a UUID but its natural key is the pair
//! (`lower(name)`, `which_map`). Creation goes through an upsert on that key,
//! so clients that do not know an id still converge on a single record.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Map a place belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum WhichMap {
    /// Countries on the world map.
    #[default]
    World,
    /// US states.
    States,
}

/// Raised when a map label is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown map '{0}'; expected world or states")]
pub struct UnknownMapError(pub String);

impl WhichMap {
    /// Stable lowercase label used in storage and JSON.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::World => "world",
            Self::States => "states",
        }
    }

    /// Parse the `whichMap` query label.
    ///
    /// The page titles (`"Visited World"`, `"Visited States"`) are accepted as
    /// well as the bare names, in any case. A missing label means the world map.
    ///
    /// # Examples
    /// ```
    /// use travelmap::domain::WhichMap;
    ///
    /// assert_eq!(WhichMap::from_query_label(Some("Visited States")).unwrap(), WhichMap::States);
    /// assert_eq!(WhichMap::from_query_label(None).unwrap(), WhichMap::World);
    /// ```
    pub fn from_query_label(label: Option<&str>) -> Result<Self, UnknownMapError> {
        match label {
            None => Ok(Self::World),
            Some(raw) => {
                let trimmed = raw.trim();
                let bare = trimmed.strip_prefix("Visited ").unwrap_or(trimmed);
                bare.parse()
            }
        }
    }
}

impl FromStr for WhichMap {
    type Err = UnknownMapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "world" => Ok(Self::World),
            "states" => Ok(Self::States),
            _ => Err(UnknownMapError(s.to_owned())),
        }
    }
}

impl fmt::Display for WhichMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A place on one of the maps and who has been there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct VisitedPlace {
    pub id: Uuid,
    #[schema(example = "France")]
    pub name: String,
    pub which_map: WhichMap,
    #[serde(default)]
    pub john: bool,
    #[serde(default)]
    pub marcia: bool,
    #[serde(default)]
    pub todo: bool,
}

impl VisitedPlace {
    /// Whether this place carries the natural key (`name`, `which_map`).
    #[must_use]
    pub fn has_natural_key(&self, which_map: WhichMap, name: &str) -> bool {
        self.which_map == which_map && names_match(&self.name, name)
    }

    /// Overwrite the flags supplied in `flags`, leaving the rest untouched.
    pub fn apply_flags(&mut self, flags: VisitFlags) {
        if let Some(john) = flags.john {
            self.john = john;
        }
        if let Some(marcia) = flags.marcia {
            self.marcia = marcia;
        }
        if let Some(todo) = flags.todo {
            self.todo = todo;
        }
    }

    /// Merge a partial update into this place.
    pub fn apply(&mut self, patch: VisitedPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(which_map) = patch.which_map {
            self.which_map = which_map;
        }
        self.apply_flags(patch.flags);
    }
}

/// Case-insensitive name comparison used for the natural key.
#[must_use]
pub fn names_match(left: &str, right: &str) -> bool {
    left.to_lowercase() == right.to_lowercase()
}

/// Optional traveller flags carried by create and update payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisitFlags {
    pub john: Option<bool>,
    pub marcia: Option<bool>,
    pub todo: Option<bool>,
}

/// Validated create-or-update request for a visited place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitedDraft {
    name: String,
    which_map: WhichMap,
    flags: VisitFlags,
}

/// Validation failures for visited place payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VisitedValidationError {
    /// `name` was missing or blank.
    #[error("name must not be empty")]
    EmptyName,
    /// `which_map` was missing.
    #[error("which_map is required")]
    MissingMap,
    /// `which_map` was not a known map.
    #[error(transparent)]
    UnknownMap(#[from] UnknownMapError),
}

impl VisitedDraft {
    /// Validate raw payload parts. The name is trimmed.
    pub fn try_new(
        name: &str,
        which_map: WhichMap,
        flags: VisitFlags,
    ) -> Result<Self, VisitedValidationError> {
        Ok(Self {
            name: validate_name(name)?,
            which_map,
            flags,
        })
    }

    /// Trimmed display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Target map.
    #[must_use]
    pub fn which_map(&self) -> WhichMap {
        self.which_map
    }

    /// Supplied flags.
    #[must_use]
    pub fn flags(&self) -> VisitFlags {
        self.flags
    }

    /// Materialise a brand-new place; absent flags default to `false`.
    #[must_use]
    pub fn into_place(self, id: Uuid) -> VisitedPlace {
        VisitedPlace {
            id,
            name: self.name,
            which_map: self.which_map,
            john: self.flags.john.unwrap_or(false),
            marcia: self.flags.marcia.unwrap_or(false),
            todo: self.flags.todo.unwrap_or(false),
        }
    }
}

/// Partial update for `PUT /api/visited/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VisitedPatch {
    pub name: Option<String>,
    pub which_map: Option<WhichMap>,
    pub flags: VisitFlags,
}

impl VisitedPatch {
    /// Validate the optional name, trimming it when present.
    pub fn try_new(
        name: Option<&str>,
        which_map: Option<WhichMap>,
        flags: VisitFlags,
    ) -> Result<Self, VisitedValidationError> {
        let name = name.map(validate_name).transpose()?;
        Ok(Self {
            name,
            which_map,
            flags,
        })
    }
}

fn validate_name(raw: &str) -> Result<String, VisitedValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(VisitedValidationError::EmptyName);
    }
    Ok(trimmed.to_owned())
}
