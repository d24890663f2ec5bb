use anyhow::{bail, Context, Result};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    // Dictionaries
    pub translations_dir: PathBuf,

    // Factory defaults
    pub default_lang: String,
    pub default_sections: Vec<String>,

    // Language aliases (requested -> loaded)
    pub aliases: Vec<(String, String)>,

    // Global parameters
    pub parameters: Vec<(String, String)>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Dictionaries - <dir>/<section>/<lang>.json
            translations_dir: std::env::var("TRANSLATIONS_DIR")
                .context("TRANSLATIONS_DIR not set")?
                .into(),

            // Factory defaults
            default_lang: std::env::var("TRANSLATOR_DEFAULT_LANG")
                .ok()
                .filter(|lang| !lang.trim().is_empty())
                .unwrap_or_else(|| "en".to_string()),
            default_sections: parse_list(
                &std::env::var("TRANSLATOR_DEFAULT_SECTIONS").unwrap_or_default(),
            ),

            // Aliases, e.g. "cs=cs_CZ,sk=sk_SK"
            aliases: parse_pairs(&std::env::var("TRANSLATOR_ALIASES").unwrap_or_default())
                .context("Invalid TRANSLATOR_ALIASES")?,

            // Parameters, e.g. "baseUrl=https://example.com/{lang}"
            parameters: parse_pairs(&std::env::var("TRANSLATOR_PARAMETERS").unwrap_or_default())
                .context("Invalid TRANSLATOR_PARAMETERS")?,
        })
    }
}

/// Split a comma separated list, dropping blank items.
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse comma separated `name=value` pairs. Only the first `=` splits, so
/// values may contain `=`.
fn parse_pairs(raw: &str) -> Result<Vec<(String, String)>> {
    parse_list(raw)
        .into_iter()
        .map(|item| {
            let Some((name, value)) = item.split_once('=') else {
                bail!("expected name=value, got '{}'", item);
            };
            let name = name.trim();
            if name.is_empty() {
                bail!("empty name in '{}'", item);
            }
            Ok((name.to_string(), value.trim().to_string()))
        })
        .collect()
}
