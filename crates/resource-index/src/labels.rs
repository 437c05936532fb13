//! Multi-language display labels for variables and collections.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Display names keyed by language code.
///
/// Labels keep insertion order so that the first inserted name acts as the
/// final fallback. An optional priority list decides which language wins when
/// the requested one is missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Labels {
    #[serde(default)]
    names: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    lang_priority: Vec<String>,
}

impl Labels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, lang: impl Into<String>, name: impl Into<String>) -> Self {
        self.insert(lang, name);
        self
    }

    /// Set the order in which languages are tried as fallback.
    pub fn with_priority<I, S>(mut self, langs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lang_priority = langs.into_iter().map(Into::into).collect();
        self
    }

    /// Add or replace the name for a language.
    pub fn insert(&mut self, lang: impl Into<String>, name: impl Into<String>) {
        self.names.insert(lang.into(), name.into());
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate `(lang, name)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names.iter().map(|(l, n)| (l.as_str(), n.as_str()))
    }

    /// Default name, resolved through the fallback chain.
    pub fn name(&self) -> &str {
        self.name_by_lang(None)
    }

    /// Name in `lang`, falling back to the priority list and then to the
    /// first inserted name. Empty string when no names are set.
    pub fn name_by_lang(&self, lang: Option<&str>) -> &str {
        if let Some(name) = lang.and_then(|l| self.names.get(l)) {
            return name;
        }
        self.lang_priority
            .iter()
            .find_map(|l| self.names.get(l))
            .or_else(|| self.names.values().next())
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Name in exactly `lang`, or an empty string.
    pub fn name_by_lang_no_fallback(&self, lang: &str) -> &str {
        self.names.get(lang).map(String::as_str).unwrap_or("")
    }
}
