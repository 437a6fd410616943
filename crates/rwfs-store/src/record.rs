use serde::{Deserialize, Serialize};

/// A named record: the unit the file server reads and writes.
///
/// The name is the record's key and cannot change once the record exists.
/// Content is replaced wholesale; there is no partial update. Values handed
/// out by a store are owned copies, so changing one never reaches the
/// authoritative copy held by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    name: String,
    content: String,
}

impl Record {
    /// Create a record with the given name and content.
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Create a record with empty content.
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, String::new())
    }

    /// The record's key. Fixed at construction.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The current content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Return the same record carrying `content` instead.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Split into `(name, content)`.
    pub fn into_parts(self) -> (String, String) {
        (self.name, self.content)
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({} bytes)", self.name, self.content.len())
    }
}
