//! Error types for translation, formatting and dictionary loading.

use thiserror::Error;

/// Failure of printf-style positional formatting.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// A conversion referenced an argument that was not supplied
    #[error("Missing argument {position} (only {supplied} supplied)")]
    MissingArgument { position: usize, supplied: usize },

    /// More arguments were supplied than the template consumes
    #[error("Template uses {used} argument(s) but {supplied} were supplied")]
    UnusedArguments { used: usize, supplied: usize },

    /// An argument cannot be rendered by the requested conversion
    #[error("Argument {position} ({value:?}) is not valid for %{conversion}")]
    IncompatibleArgument {
        position: usize,
        conversion: char,
        value: String,
    },

    /// Unsupported conversion character
    #[error("Unknown conversion '%{conversion}' at byte {offset}")]
    UnknownConversion { conversion: char, offset: usize },

    /// A `%` sequence ended before its conversion character
    #[error("Incomplete format specifier at byte {offset}")]
    IncompleteSpecifier { offset: usize },

    /// Width or precision above the supported maximum
    #[error("Width or precision exceeds {max} at byte {offset}")]
    SpecifierOutOfRange { offset: usize, max: usize },

    /// Argument numbers are 1-based
    #[error("Argument number must be greater than zero at byte {offset}")]
    ZeroArgumentNumber { offset: usize },
}

/// Failure of [`Translator::translate`](crate::i18n::Translator::translate).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslateError {
    /// Positional argument substitution failed
    #[error("Failed to format message for key '{key}': {source}")]
    Format {
        key: String,
        #[source]
        source: FormatError,
    },

    /// Parameter expansion nested deeper than the configured limit
    #[error("Parameter '{name}' exceeded the expansion depth limit of {limit}")]
    ParameterDepthExceeded { name: String, limit: usize },
}

/// Failure of a [`TranslatesLoader`](crate::i18n::TranslatesLoader).
#[derive(Error, Debug)]
pub enum LoadError {
    /// Dictionary file could not be read
    #[error("Failed to read dictionary {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Dictionary file is not valid JSON
    #[error("Failed to parse dictionary: {0}")]
    Json(#[from] serde_json::Error),

    /// Dictionary content has a shape that cannot be flattened into key/template pairs
    #[error("Invalid dictionary for section '{section}' ({lang}): {reason}")]
    InvalidDictionary {
        section: String,
        lang: String,
        reason: String,
    },
}
