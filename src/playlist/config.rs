use crate::error::{PlaylistError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// Optional filter criteria held by a user
///
/// Every field is one independent dimension; `None` means no constraint on it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    #[serde(deserialize_with = "unset_or")]
    pub min_popularity: Option<u8>, // Inclusive floor
    #[serde(deserialize_with = "unset_or")]
    pub max_duration_ms: Option<u32>, // Inclusive ceiling
    #[serde(deserialize_with = "unset_or")]
    pub explicit: Option<bool>,
    #[serde(deserialize_with = "unset_or")]
    pub genre: Option<String>,
}

/// The four preference dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceDimension {
    Popularity,
    Duration,
    Explicit,
    Genre,
}

impl FromStr for PreferenceDimension {
    type Err = PlaylistError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "popularity" => Ok(Self::Popularity),
            "duration" => Ok(Self::Duration),
            "explicit" => Ok(Self::Explicit),
            "genre" => Ok(Self::Genre),
            other => Err(PlaylistError::invalid_preference(format!(
                "unknown preference dimension '{other}'"
            ))),
        }
    }
}

/// Check for the textual "unset" marker
pub fn is_unset_marker(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("none")
}

/// Accept either a typed value, JSON null, or the string "none" as unset
fn unset_or<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) if is_unset_marker(&s) => Ok(None),
        Some(value) => T::deserialize(value)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

impl Preferences {
    /// Check whether every dimension is unset
    pub fn is_empty(&self) -> bool {
        self.min_popularity.is_none()
            && self.max_duration_ms.is_none()
            && self.explicit.is_none()
            && self.genre.is_none()
    }

    /// Set or clear one dimension from text
    ///
    /// A value without a dimension is rejected, and so is a value the
    /// dimension cannot parse. On error the preferences are left untouched.
    pub fn apply(&mut self, dimension: Option<&str>, value: &str) -> Result<()> {
        let Some(dimension) = dimension.filter(|d| !d.trim().is_empty()) else {
            return Err(PlaylistError::invalid_preference(format!(
                "value '{value}' given without a preference dimension"
            )));
        };
        let dimension: PreferenceDimension = dimension.parse()?;
        let value = value.trim();
        let unset = is_unset_marker(value);

        match dimension {
            PreferenceDimension::Popularity => {
                self.min_popularity = if unset {
                    None
                } else {
                    Some(
                        value
                            .parse::<u8>()
                            .ok()
                            .filter(|p| *p <= 100)
                            .ok_or_else(|| {
                                PlaylistError::invalid_preference(format!(
                                    "popularity '{value}' is not in 0-100"
                                ))
                            })?,
                    )
                };
            }
            PreferenceDimension::Duration => {
                self.max_duration_ms = if unset {
                    None
                } else {
                    Some(value.parse::<u32>().map_err(|_| {
                        PlaylistError::invalid_preference(format!(
                            "duration '{value}' is not a millisecond count"
                        ))
                    })?)
                };
            }
            PreferenceDimension::Explicit => {
                self.explicit = if unset {
                    None
                } else if value.eq_ignore_ascii_case("true") {
                    Some(true)
                } else if value.eq_ignore_ascii_case("false") {
                    Some(false)
                } else {
                    return Err(PlaylistError::invalid_preference(format!(
                        "explicit '{value}' is not true or false"
                    )));
                };
            }
            PreferenceDimension::Genre => {
                if value.is_empty() {
                    return Err(PlaylistError::invalid_preference("genre is empty"));
                }
                self.genre = if unset { None } else { Some(value.to_string()) };
            }
        }
        Ok(())
    }

    /// Apply a list of `dimension=value` assignments, all or nothing
    pub fn with_assignments<I, S>(&self, assignments: I) -> Result<Preferences>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut updated = self.clone();
        for assignment in assignments {
            let assignment = assignment.as_ref();
            match assignment.split_once('=') {
                Some((dimension, value)) => updated.apply(Some(dimension), value)?,
                None => updated.apply(None, assignment)?,
            }
        }
        Ok(updated)
    }

    /// Build preferences from `dimension=value` assignments
    pub fn from_assignments<I, S>(assignments: I) -> Result<Preferences>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Preferences::default().with_assignments(assignments)
    }

    /// Check the ranges `apply` enforces on values that arrived another way
    pub fn validate(&self) -> Result<()> {
        if let Some(popularity) = self.min_popularity.filter(|p| *p > 100) {
            return Err(PlaylistError::invalid_preference(format!(
                "popularity '{popularity}' is not in 0-100"
            )));
        }
        if self.genre.as_deref().is_some_and(|g| g.trim().is_empty()) {
            return Err(PlaylistError::invalid_preference("genre is empty"));
        }
        Ok(())
    }

    /// Load preferences from a JSON object file
    pub fn load_from_file(path: &str) -> Result<Preferences> {
        let content = std::fs::read_to_string(path)?;
        let preferences: Preferences = serde_json::from_str(&content)?;
        preferences.validate()?;
        Ok(preferences)
    }
}
