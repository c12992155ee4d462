//! Static message catalogs.
//!
//! Catalogs map a source-language message to its translation and are
//! keyed by locale and category (e.g. `fi` / `FileModule.base`). An
//! empty translation counts as untranslated.

mod format;

use std::collections::HashMap;

pub use format::{Arg, format_message};

use crate::error::GroupError;

/// Catalogs compiled into the binary: (locale, category, JSON).
const EMBEDDED_CATALOGS: &[(&str, &str, &str)] = &[
    (
        "de",
        "UserModule.auth",
        include_str!("../../messages/de/user_auth.json"),
    ),
    (
        "fi",
        "FileModule.base",
        include_str!("../../messages/fi/file_base.json"),
    ),
    (
        "fi",
        "UserModule.auth",
        include_str!("../../messages/fi/user_auth.json"),
    ),
];

type Catalog = HashMap<String, String>;

/// Resolves translated messages by locale and category.
#[derive(Debug, Clone, Default)]
pub struct Translator {
    catalogs: HashMap<(String, String), Catalog>,
}

impl Translator {
    /// An empty translator; every lookup returns the source message.
    pub fn new() -> Self {
        Self::default()
    }

    /// A translator loaded with the catalogs shipped in the binary.
    pub fn embedded() -> Result<Self, GroupError> {
        let mut translator = Self::new();
        for (locale, category, json) in EMBEDDED_CATALOGS {
            translator.load_json(locale, category, json)?;
        }
        Ok(translator)
    }

    /// Merge a JSON object of `source -> translation` pairs.
    pub fn load_json(&mut self, locale: &str, category: &str, json: &str) -> Result<(), GroupError> {
        let messages: Catalog = serde_json::from_str(json).map_err(|e| GroupError::Catalog {
            locale: locale.to_string(),
            category: category.to_string(),
            reason: e.to_string(),
        })?;
        self.catalogs
            .entry((locale.to_string(), category.to_string()))
            .or_default()
            .extend(messages);
        Ok(())
    }

    pub fn has_catalog(&self, locale: &str, category: &str) -> bool {
        self.catalogs
            .contains_key(&(locale.to_string(), category.to_string()))
    }

    /// The raw translation of `message`, if one exists.
    ///
    /// Tries the full locale first (`fi-FI`), then its language (`fi`).
    pub fn lookup(&self, locale: &str, category: &str, message: &str) -> Option<&str> {
        let language = locale.split(['-', '_']).next().unwrap_or(locale);
        [locale, language]
            .into_iter()
            .filter_map(|loc| self.catalogs.get(&(loc.to_string(), category.to_string())))
            .filter_map(|catalog| catalog.get(message))
            .map(String::as_str)
            .find(|translation| !translation.is_empty())
    }

    /// Translate and format `message`.
    pub fn translate(
        &self,
        locale: &str,
        category: &str,
        message: &str,
        args: &[(&str, Arg<'_>)],
    ) -> String {
        let pattern = self.lookup(locale, category, message).unwrap_or(message);
        format_message(pattern, args)
    }
}
