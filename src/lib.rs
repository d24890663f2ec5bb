//! Section-scoped runtime translator.
//!
//! Translators resolve keys against per-language dictionaries assembled from
//! named sections, interpolate named or positional arguments and global
//! parameters, and run the result through a filter chain.

pub mod config;
pub mod i18n;
