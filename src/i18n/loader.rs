//! Dictionary loaders.
//!
//! The factory only knows the [`TranslatesLoader`] trait. Two implementations
//! ship with the crate: [`MemoryLoader`] for embedded tables and tests, and
//! [`JsonDirLoader`] for a `<root>/<section>/<lang>.json` tree.
//!
//! Both layer the requested language over the fallback language, so a key
//! missing from `lang` still resolves from `default_lang`.

use crate::i18n::error::LoadError;
use crate::i18n::translator::Dictionary;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Source of section dictionaries.
pub trait TranslatesLoader: Send + Sync {
    /// Load the dictionary of `section` for `lang`, falling back to
    /// `default_lang` however the implementation sees fit.
    fn load_translates(
        &self,
        section: &str,
        lang: &str,
        default_lang: &str,
    ) -> Result<Dictionary, LoadError>;
}

impl<T> TranslatesLoader for Arc<T>
where
    T: TranslatesLoader + ?Sized,
{
    fn load_translates(
        &self,
        section: &str,
        lang: &str,
        default_lang: &str,
    ) -> Result<Dictionary, LoadError> {
        (**self).load_translates(section, lang, default_lang)
    }
}

/// In-memory dictionaries keyed by `(section, lang)`.
#[derive(Debug, Default, Clone)]
pub struct MemoryLoader {
    sections: HashMap<(String, String), Dictionary>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add entries for `section` in `lang`, merging over existing ones.
    pub fn insert<I, K, V>(&mut self, section: &str, lang: &str, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.sections
            .entry((section.to_string(), lang.to_string()))
            .or_default()
            .extend(
                entries
                    .into_iter()
                    .map(|(key, template)| (key.into(), template.into())),
            );
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_section<I, K, V>(mut self, section: &str, lang: &str, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.insert(section, lang, entries);
        self
    }

    fn get(&self, section: &str, lang: &str) -> Option<&Dictionary> {
        self.sections.get(&(section.to_string(), lang.to_string()))
    }
}

impl TranslatesLoader for MemoryLoader {
    fn load_translates(
        &self,
        section: &str,
        lang: &str,
        default_lang: &str,
    ) -> Result<Dictionary, LoadError> {
        let mut dictionary = self.get(section, default_lang).cloned().unwrap_or_default();
        if lang != default_lang {
            if let Some(localized) = self.get(section, lang) {
                dictionary.extend(localized.clone());
            }
        }

        debug!(
            section,
            lang,
            default_lang,
            entries = dictionary.len(),
            "Loaded section from memory"
        );
        Ok(dictionary)
    }
}

/// Loads `<root>/<section>/<lang>.json`.
///
/// Nested objects are flattened into dot-separated keys, so
/// `{"form": {"submit": "Send"}}` yields `form.submit`. Numbers and booleans
/// are stored as their JSON text, `null` entries are skipped, arrays are
/// rejected. A missing file is an empty dictionary.
#[derive(Debug, Clone)]
pub struct JsonDirLoader {
    root: PathBuf,
}

impl JsonDirLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn load_file(&self, section: &str, lang: &str) -> Result<Dictionary, LoadError> {
        for component in [section, lang] {
            if !is_safe_component(component) {
                return Err(LoadError::InvalidDictionary {
                    section: section.to_string(),
                    lang: lang.to_string(),
                    reason: format!("'{}' is not a valid path component", component),
                });
            }
        }

        let path = self.root.join(section).join(format!("{}.json", lang));
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "Dictionary file not found, using empty section");
                return Ok(Dictionary::new());
            }
            Err(source) => {
                return Err(LoadError::Io {
                    path: path.display().to_string(),
                    source,
                })
            }
        };

        let value: Value = serde_json::from_str(&content)?;
        let Value::Object(entries) = value else {
            return Err(LoadError::InvalidDictionary {
                section: section.to_string(),
                lang: lang.to_string(),
                reason: "top level must be a JSON object".to_string(),
            });
        };

        let mut dictionary = Dictionary::new();
        for (key, value) in entries {
            flatten_into(&key, value, &mut dictionary).map_err(|reason| {
                LoadError::InvalidDictionary {
                    section: section.to_string(),
                    lang: lang.to_string(),
                    reason,
                }
            })?;
        }
        debug!(
            path = %path.display(),
            entries = dictionary.len(),
            "Loaded dictionary file"
        );
        Ok(dictionary)
    }
}

impl TranslatesLoader for JsonDirLoader {
    fn load_translates(
        &self,
        section: &str,
        lang: &str,
        default_lang: &str,
    ) -> Result<Dictionary, LoadError> {
        let mut dictionary = self.load_file(section, default_lang)?;
        if lang != default_lang {
            dictionary.extend(self.load_file(section, lang)?);
        }
        Ok(dictionary)
    }
}

fn is_safe_component(component: &str) -> bool {
    !component.is_empty()
        && component != "."
        && component != ".."
        && !component.contains(|c: char| c == '/' || c == '\\')
}

fn flatten_into(key: &str, value: Value, out: &mut Dictionary) -> Result<(), String> {
    match value {
        Value::String(template) => {
            out.insert(key.to_string(), template);
        }
        Value::Number(number) => {
            out.insert(key.to_string(), number.to_string());
        }
        Value::Bool(flag) => {
            out.insert(key.to_string(), flag.to_string());
        }
        Value::Null => {
            warn!(key, "Skipping null translation entry");
        }
        Value::Object(children) => {
            for (child, value) in children {
                flatten_into(&format!("{}.{}", key, child), value, out)?;
            }
        }
        Value::Array(_) => {
            return Err(format!("unsupported array value at '{}'", key));
        }
    }
    Ok(())
}
