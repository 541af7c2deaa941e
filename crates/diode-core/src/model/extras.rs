// ── Extras domain types ──

use serde::{Deserialize, Serialize};

/// A free-form label attachable to any record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub slug: String,
    /// Six hex digits, no leading `#`. Empty when unset.
    #[serde(default)]
    pub color: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
            color: String::new(),
        }
    }
}
