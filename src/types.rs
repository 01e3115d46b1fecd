//! Theme catalog record types

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Read an explicit JSON `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A field that the catalog stores either as a single string or as a list
/// of strings (`originalModel`, and `platform` in later catalog revisions).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl Default for OneOrMany {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl OneOrMany {
    /// Non-empty values in catalog order
    pub fn values(&self) -> Vec<&str> {
        match self {
            OneOrMany::One(s) => {
                if s.is_empty() {
                    Vec::new()
                } else {
                    vec![s.as_str()]
                }
            }
            OneOrMany::Many(items) => items
                .iter()
                .map(String::as_str)
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    pub fn joined(&self, sep: &str) -> String {
        self.values().join(sep)
    }

    pub fn is_empty(&self) -> bool {
        self.values().is_empty()
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values().contains(&value)
    }
}

/// Alternative flash-menu download offered next to the main theme file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlternateFlashMenu {
    #[serde(default, deserialize_with = "null_as_default")]
    pub screenshot: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// One catalog entry.
///
/// Every field is optional on the wire: a missing field or a `null` reads
/// as absent rather than failing the whole catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Theme {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub supported_models: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub original_model: OneOrMany,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carrier: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub platform: OneOrMany,
    #[serde(deserialize_with = "null_as_default")]
    pub resolution: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_type: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub screenshots: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swf: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub alternate_flash_menus: Vec<AlternateFlashMenu>,
}

/// Treat `Some("")` the same as a missing field
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

impl Theme {
    pub fn author(&self) -> Option<&str> {
        present(&self.author)
    }

    pub fn carrier(&self) -> Option<&str> {
        present(&self.carrier)
    }

    pub fn home_type(&self) -> Option<&str> {
        present(&self.home_type)
    }

    pub fn swf(&self) -> Option<&str> {
        present(&self.swf)
    }

    pub fn note(&self) -> Option<&str> {
        present(&self.note)
    }

    /// Non-empty supported models in catalog order
    pub fn models(&self) -> impl Iterator<Item = &str> {
        self.supported_models
            .iter()
            .map(String::as_str)
            .filter(|m| !m.is_empty())
    }

    /// First non-empty screenshot, used as the card preview
    pub fn preview(&self) -> Option<&str> {
        self.screenshots
            .iter()
            .map(String::as_str)
            .find(|s| !s.is_empty())
    }
}

/// Derived classification of a theme, never stored in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeType {
    User,
    Carrier,
    Preloaded,
}

impl ThemeType {
    pub const ALL: [ThemeType; 3] = [ThemeType::User, ThemeType::Carrier, ThemeType::Preloaded];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeType::User => "user",
            ThemeType::Carrier => "carrier",
            ThemeType::Preloaded => "preloaded",
        }
    }

    /// Badge and filter label
    pub fn label(&self) -> &'static str {
        match self {
            ThemeType::User => "User-made",
            ThemeType::Carrier => "Carrier",
            ThemeType::Preloaded => "Preloaded",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "user" => Some(ThemeType::User),
            "carrier" => Some(ThemeType::Carrier),
            "preloaded" => Some(ThemeType::Preloaded),
            _ => None,
        }
    }
}

/// Model name to representative image path, used by the model picker
pub type ModelImages = BTreeMap<String, String>;
