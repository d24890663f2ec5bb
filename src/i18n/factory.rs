//! Factory stamping out configured [`Translator`] instances.
//!
//! The factory holds the process-wide defaults (fallback language, language
//! aliases, sections loaded for every translator, global parameters and
//! filters) and the [`TranslatesLoader`] that supplies dictionaries.

use crate::config::Config;
use crate::i18n::error::LoadError;
use crate::i18n::loader::TranslatesLoader;
use crate::i18n::metrics::LookupMetrics;
use crate::i18n::translator::{Dictionary, Filter, Parameters, Translator};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Picks the fallback language for `(section, lang)`.
pub type DefaultLangStrategy = Arc<dyn Fn(&str, &str) -> String + Send + Sync>;

/// Builds per-language translators.
///
/// Configure once, then call [`create`](Self::create) as often as needed;
/// `create` only reads factory state.
pub struct TranslatorFactory {
    /// Requested language -> language used for loading dictionaries
    pub alias: HashMap<String, String>,

    /// Fallback language handed to the loader
    pub default_lang: String,

    /// Sections loaded for every translator, before the per-call ones
    pub default_sections: Vec<String>,

    parameters: Parameters,
    filters: Vec<Filter>,
    loader: Arc<dyn TranslatesLoader>,
    default_lang_strategy: Option<DefaultLangStrategy>,
    parameter_depth_limit: Option<usize>,
    metrics: Option<Arc<LookupMetrics>>,
}

impl TranslatorFactory {
    pub const DEFAULT_LANG: &'static str = "en";

    pub fn new<L>(loader: L) -> Self
    where
        L: TranslatesLoader + 'static,
    {
        Self::with_loader(Arc::new(loader))
    }

    /// Create a factory around a loader that is shared with other owners.
    pub fn with_loader(loader: Arc<dyn TranslatesLoader>) -> Self {
        Self {
            alias: HashMap::new(),
            default_lang: Self::DEFAULT_LANG.to_string(),
            default_sections: Vec::new(),
            parameters: Parameters::new(),
            filters: Vec::new(),
            loader,
            default_lang_strategy: None,
            parameter_depth_limit: None,
            metrics: None,
        }
    }

    /// Create a factory with defaults, sections, aliases and parameters
    /// taken from `config`.
    pub fn from_config<L>(config: &Config, loader: L) -> Self
    where
        L: TranslatesLoader + 'static,
    {
        let mut factory = Self::new(loader);
        factory.default_lang = config.default_lang.clone();
        factory.default_sections = config.default_sections.clone();
        for (from, to) in &config.aliases {
            factory.set_alias(from, to);
        }
        factory.set_parameters(config.parameters.iter().cloned());
        factory
    }

    /// Load `to` dictionaries whenever `from` is requested. Last write wins.
    pub fn set_alias(&mut self, from: &str, to: &str) {
        self.alias.insert(from.to_string(), to.to_string());
    }

    /// Merge global parameters; incoming values win. Only affects
    /// translators created afterwards.
    pub fn set_parameters<I, K, V>(&mut self, parameters: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.parameters.extend(
            parameters
                .into_iter()
                .map(|(name, value)| (name.into(), value.into())),
        );
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Append a global filter. Only affects translators created afterwards.
    pub fn add_filter<F>(&mut self, filter: F)
    where
        F: Fn(&str, &str) -> String + Send + Sync + 'static,
    {
        self.filters.push(Arc::new(filter));
    }

    /// Replace the fallback language rule. The strategy receives the section
    /// and the alias-resolved language.
    pub fn set_default_lang_strategy<F>(&mut self, strategy: F)
    where
        F: Fn(&str, &str) -> String + Send + Sync + 'static,
    {
        self.default_lang_strategy = Some(Arc::new(strategy));
    }

    /// Give created translators a parameter expansion depth limit.
    pub fn set_parameter_depth_limit(&mut self, limit: usize) {
        self.parameter_depth_limit = Some(limit);
    }

    /// Share `metrics` with every translator created afterwards.
    pub fn set_metrics(&mut self, metrics: Arc<LookupMetrics>) {
        self.metrics = Some(metrics);
    }

    /// Fallback language for `section`; [`default_lang`](Self::default_lang)
    /// unless a strategy was installed.
    pub fn default_lang_for(&self, section: &str, lang: &str) -> String {
        match &self.default_lang_strategy {
            Some(strategy) => strategy(section, lang),
            None => self.default_lang.clone(),
        }
    }

    /// Language used for loading `lang`'s dictionaries.
    pub fn resolve_lang<'a>(&'a self, lang: &'a str) -> &'a str {
        self.alias.get(lang).map(String::as_str).unwrap_or(lang)
    }

    /// Build a translator for `lang` with [`default_sections`](Self::default_sections)
    /// followed by `sections`.
    ///
    /// The `lang` parameter always holds the requested language, never the
    /// alias target. Global parameters are merged after it, so a global
    /// parameter named `lang` replaces it.
    ///
    /// Sections are merged first-write-wins: a key loaded by an earlier
    /// section is not replaced by a later one.
    pub fn create(&self, lang: &str, sections: &[&str]) -> Result<Translator, LoadError> {
        let mut translator = Translator::new();
        if let Some(limit) = self.parameter_depth_limit {
            translator = translator.with_parameter_depth_limit(limit);
        }
        if let Some(metrics) = &self.metrics {
            translator = translator.with_metrics(Arc::clone(metrics));
        }

        translator.set_parameters([("lang", lang)]);
        translator.set_parameters(
            self.parameters
                .iter()
                .map(|(name, value)| (name.clone(), value.clone())),
        );
        for filter in &self.filters {
            translator.add_shared_filter(Arc::clone(filter));
        }

        let resolved = self.resolve_lang(lang);
        if resolved != lang {
            debug!(lang, resolved, "Resolved language alias");
        }

        let mut translates = Dictionary::new();
        let all_sections = self
            .default_sections
            .iter()
            .map(String::as_str)
            .chain(sections.iter().copied());
        for section in all_sections {
            let default_lang = self.default_lang_for(section, resolved);
            let loaded = self.loader.load_translates(section, resolved, &default_lang)?;
            debug!(
                section,
                lang = resolved,
                default_lang = %default_lang,
                entries = loaded.len(),
                "Loaded translation section"
            );
            for (key, template) in loaded {
                translates.entry(key).or_insert(template);
            }
        }
        translator.set_translates(translates);

        Ok(translator)
    }
}

impl fmt::Debug for TranslatorFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslatorFactory")
            .field("alias", &self.alias)
            .field("default_lang", &self.default_lang)
            .field("default_sections", &self.default_sections)
            .field("parameters", &self.parameters)
            .field("filters", &self.filters.len())
            .field("custom_default_lang", &self.default_lang_strategy.is_some())
            .finish()
    }
}
