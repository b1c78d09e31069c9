use std::collections::BTreeMap;

/// Key written once the first-visit preloader has run.
pub const PRELOADER_SEEN: &str = "preloaderSeen";

/// Small string key-value store scoped to one browsing session.
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);

    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

/// In-memory [`SessionStore`].
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct MemorySession {
    entries: BTreeMap<String, String>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.set(key, value);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SessionStore for MemorySession {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_owned(), value.to_owned());
    }
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;
