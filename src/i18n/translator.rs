//! Per-language message translator.
//!
//! A [`Translator`] owns one resolved dictionary, a set of named parameters
//! and an ordered filter chain. Translation is a fixed pipeline:
//!
//! 1. template lookup (with `|key|` sentinel for missing namespaced keys)
//! 2. argument substitution, named (`{name}`) or positional (`%s`, `%d`, ...)
//! 3. recursive parameter expansion
//! 4. filters, in registration order

use crate::i18n::error::TranslateError;
use crate::i18n::format::{sprintf, FormatArg};
use crate::i18n::metrics::LookupMetrics;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};
use tracing::trace;

/// Translation key -> message template.
pub type Dictionary = HashMap<String, String>;

/// Parameter name -> value (values may reference other parameters).
pub type Parameters = HashMap<String, String>;

/// Post-processing step receiving `(message, key)`.
pub type Filter = Arc<dyn Fn(&str, &str) -> String + Send + Sync>;

/// `{name}` placeholder; the name may not contain `}`
static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

/// Dot-separated key like `section.sub.key`
static NAMESPACED_KEY_REGEX: OnceLock<Regex> = OnceLock::new();

pub(crate) fn placeholder_regex() -> &'static Regex {
    PLACEHOLDER_REGEX.get_or_init(|| Regex::new(r"\{([^}]+)\}").unwrap())
}

fn namespaced_key_regex() -> &'static Regex {
    NAMESPACED_KEY_REGEX
        .get_or_init(|| Regex::new(r"^(?:[A-Za-z][A-Za-z0-9_]*\.)+[A-Za-z0-9_]+$").unwrap())
}

/// Arguments for a single [`Translator::translate`] call.
///
/// The two modes are mutually exclusive.
#[derive(Debug, Clone, PartialEq)]
pub enum Args {
    /// Replace `{name}` placeholders; unknown names are left as-is
    Named(HashMap<String, String>),

    /// printf-style formatting of the whole template
    Positional(Vec<FormatArg>),
}

impl Args {
    /// Build named arguments from `(name, value)` pairs.
    pub fn named<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        Args::Named(
            pairs
                .into_iter()
                .map(|(name, value)| (name.into(), value.to_string()))
                .collect(),
        )
    }

    /// Build positional arguments.
    pub fn positional<I, A>(values: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<FormatArg>,
    {
        Args::Positional(values.into_iter().map(Into::into).collect())
    }
}

impl From<HashMap<String, String>> for Args {
    fn from(named: HashMap<String, String>) -> Self {
        Args::Named(named)
    }
}

impl From<FormatArg> for Args {
    fn from(arg: FormatArg) -> Self {
        Args::Positional(vec![arg])
    }
}

impl From<Vec<FormatArg>> for Args {
    fn from(args: Vec<FormatArg>) -> Self {
        Args::Positional(args)
    }
}

/// Anything that can turn a key (plus optional arguments) into display text.
pub trait MessageTranslator {
    fn translate(&self, key: &str, args: Option<&Args>) -> Result<String, TranslateError>;
}

/// Translator for a single language.
#[derive(Clone, Default)]
pub struct Translator {
    dictionary: Dictionary,
    parameters: Parameters,
    filters: Vec<Filter>,
    parameter_depth_limit: Option<usize>,
    metrics: Option<Arc<LookupMetrics>>,
}

impl Translator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail parameter expansion nested deeper than `limit` levels instead of
    /// recursing without bound on a self-referencing parameter.
    pub fn with_parameter_depth_limit(mut self, limit: usize) -> Self {
        self.parameter_depth_limit = Some(limit);
        self
    }

    /// Record lookup outcomes into `metrics`.
    pub fn with_metrics(mut self, metrics: Arc<LookupMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Replace the dictionary wholesale.
    pub fn set_translates(&mut self, dictionary: Dictionary) {
        self.dictionary = dictionary;
    }

    pub fn translates(&self) -> &Dictionary {
        &self.dictionary
    }

    /// Merge `parameters` into the current set; incoming values win.
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

    /// Append a filter to the end of the chain.
    pub fn add_filter<F>(&mut self, filter: F)
    where
        F: Fn(&str, &str) -> String + Send + Sync + 'static,
    {
        self.filters.push(Arc::new(filter));
    }

    /// Append an already shared filter (used when stamping out translators).
    pub(crate) fn add_shared_filter(&mut self, filter: Filter) {
        self.filters.push(filter);
    }

    pub fn filter_count(&self) -> usize {
        self.filters.len()
    }

    /// Exact dictionary membership; sentinel and verbatim fallbacks don't count.
    pub fn has_message(&self, key: &str) -> bool {
        self.dictionary.contains_key(key)
    }

    /// Translate `key`.
    ///
    /// Missing keys never fail: a namespaced key (`section.key`) becomes
    /// `|section.key|`, anything else is used verbatim as the template.
    /// Errors come only from positional formatting and, when a depth limit
    /// is configured, from runaway parameter expansion.
    pub fn translate(&self, key: &str, args: Option<&Args>) -> Result<String, TranslateError> {
        let mut message = self.resolve_template(key);

        match args {
            Some(Args::Named(named)) => message = substitute_named(&message, named),
            Some(Args::Positional(values)) => {
                message = sprintf(&message, values).map_err(|source| {
                    if let Some(metrics) = &self.metrics {
                        metrics.record_format_failure();
                    }
                    TranslateError::Format {
                        key: key.to_string(),
                        source,
                    }
                })?;
            }
            None => {}
        }

        if !self.parameters.is_empty() {
            message = self.expand_parameters(&message, 0)?;
        }

        Ok(self
            .filters
            .iter()
            .fold(message, |message, filter| filter(&message, key)))
    }

    fn resolve_template(&self, key: &str) -> String {
        if let Some(template) = self.dictionary.get(key) {
            if let Some(metrics) = &self.metrics {
                metrics.record_hit();
            }
            return template.clone();
        }

        if namespaced_key_regex().is_match(key) {
            trace!(key, "Missing translation for namespaced key");
            if let Some(metrics) = &self.metrics {
                metrics.record_namespaced_miss();
            }
            format!("|{}|", key)
        } else {
            if let Some(metrics) = &self.metrics {
                metrics.record_verbatim_fallback();
            }
            key.to_string()
        }
    }

    /// Expand `{name}` placeholders from the parameter set. A parameter's
    /// value is expanded before it is substituted, so chains resolve fully.
    /// Without a depth limit a cyclic chain recurses until the stack is
    /// exhausted.
    fn expand_parameters(&self, text: &str, depth: usize) -> Result<String, TranslateError> {
        if !text.contains('{') {
            return Ok(text.to_string());
        }

        let mut failure = None;
        let expanded = placeholder_regex().replace_all(text, |caps: &Captures<'_>| {
            if failure.is_some() {
                return caps[0].to_string();
            }
            let Some(value) = self.parameters.get(&caps[1]) else {
                return caps[0].to_string();
            };
            if let Some(limit) = self.parameter_depth_limit {
                if depth >= limit {
                    failure = Some(TranslateError::ParameterDepthExceeded {
                        name: caps[1].to_string(),
                        limit,
                    });
                    return caps[0].to_string();
                }
            }
            match self.expand_parameters(value, depth + 1) {
                Ok(value) => value,
                Err(err) => {
                    failure = Some(err);
                    caps[0].to_string()
                }
            }
        });

        match failure {
            Some(err) => Err(err),
            None => Ok(expanded.into_owned()),
        }
    }
}

impl MessageTranslator for Translator {
    fn translate(&self, key: &str, args: Option<&Args>) -> Result<String, TranslateError> {
        Translator::translate(self, key, args)
    }
}

impl fmt::Debug for Translator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Translator")
            .field("dictionary", &self.dictionary.len())
            .field("parameters", &self.parameters)
            .field("filters", &self.filters.len())
            .field("parameter_depth_limit", &self.parameter_depth_limit)
            .finish()
    }
}

fn substitute_named(message: &str, named: &HashMap<String, String>) -> String {
    placeholder_regex()
        .replace_all(message, |caps: &Captures<'_>| match named.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}
