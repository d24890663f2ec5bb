//! Runtime message translation.
//!
//! This module provides section-scoped dictionaries, parameter and argument
//! interpolation, and filter chains for per-language translators.
//!
//! # Architecture
//!
//! - `translator`: Per-language `Translator` (lookup, interpolation, filters)
//! - `factory`: `TranslatorFactory` building translators from loaded sections
//! - `loader`: `TranslatesLoader` trait plus in-memory and JSON directory loaders
//! - `format`: printf-style positional formatting
//! - `validator`: Dictionary completeness and placeholder checks
//! - `metrics`: Lookup hit/miss counters
//! - `error`: Error types
//!
//! # Example
//!
//! ```rust,ignore
//! use section_translator::i18n::{Args, MemoryLoader, TranslatorFactory};
//!
//! let loader = MemoryLoader::new().with_section("common", "en", [("greet", "Hello, {name}!")]);
//! let mut factory = TranslatorFactory::new(loader);
//! factory.default_sections.push("common".to_string());
//!
//! let translator = factory.create("en", &[])?;
//! let text = translator.translate("greet", Some(&Args::named([("name", "Ann")])))?;
//! ```

mod error;
mod factory;
mod format;
mod loader;
mod metrics;
mod translator;
mod validator;

pub use error::{FormatError, LoadError, TranslateError};
pub use factory::{DefaultLangStrategy, TranslatorFactory};
pub use format::{sprintf, FormatArg};
pub use loader::{JsonDirLoader, MemoryLoader, TranslatesLoader};
pub use metrics::{LookupMetrics, MetricsReport};
pub use translator::{Args, Dictionary, Filter, MessageTranslator, Parameters, Translator};
pub use validator::{DictionaryValidator, ValidationReport};
