use anyhow::{bail, Context, Result};
use section_translator::config::Config;
use section_translator::i18n::{
    Args, DictionaryValidator, FormatArg, JsonDirLoader, MessageTranslator, TranslatesLoader,
    TranslatorFactory, ValidationReport,
};
use std::collections::HashMap;
use tracing::{info, warn};

const USAGE: &str = "Usage:
  translate <lang> <key> [name=value ...] [--arg VALUE ...] [--section NAME ...]
  translate check <reference-lang> <lang> [--section NAME ...]";

/// Parsed command line.
#[derive(Debug, PartialEq)]
enum Command {
    Translate {
        lang: String,
        key: String,
        args: Option<Args>,
        sections: Vec<String>,
    },
    Check {
        reference: String,
        lang: String,
        sections: Vec<String>,
    },
}

impl Command {
    fn parse<I>(argv: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut positional = Vec::new();
        let mut named = HashMap::new();
        let mut format_args = Vec::new();
        let mut sections = Vec::new();

        let mut argv = argv.into_iter();
        while let Some(arg) = argv.next() {
            match arg.as_str() {
                "--section" => sections.push(argv.next().context("--section needs a value")?),
                "--arg" => format_args.push(FormatArg::from(
                    argv.next().context("--arg needs a value")?,
                )),
                "-h" | "--help" => bail!("{}", USAGE),
                _ if positional.len() >= 2 && arg.contains('=') => {
                    let (name, value) = arg.split_once('=').unwrap_or((arg.as_str(), ""));
                    named.insert(name.to_string(), value.to_string());
                }
                _ => positional.push(arg),
            }
        }

        if positional.first().map(String::as_str) == Some("check") {
            let [_, reference, lang] = <[String; 3]>::try_from(positional)
                .map_err(|_| anyhow::anyhow!("check needs <reference-lang> <lang>\n{}", USAGE))?;
            return Ok(Command::Check {
                reference,
                lang,
                sections,
            });
        }

        let [lang, key] = <[String; 2]>::try_from(positional)
            .map_err(|_| anyhow::anyhow!("expected <lang> <key>\n{}", USAGE))?;
        let args = match (named.is_empty(), format_args.is_empty()) {
            (true, true) => None,
            (false, true) => Some(Args::Named(named)),
            (true, false) => Some(Args::Positional(format_args)),
            (false, false) => bail!("name=value and --arg cannot be combined"),
        };
        Ok(Command::Translate {
            lang,
            key,
            args,
            sections,
        })
    }
}

fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    // Initialize logging (stderr, so stdout only carries the result)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("section_translator=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let command = Command::parse(std::env::args().skip(1))?;
    let config = Config::from_env()?;

    match command {
        Command::Translate {
            lang,
            key,
            args,
            sections,
        } => {
            let loader = JsonDirLoader::new(&config.translations_dir);
            let factory = TranslatorFactory::from_config(&config, loader);
            let sections: Vec<&str> = sections.iter().map(String::as_str).collect();
            let translator = factory
                .create(&lang, &sections)
                .with_context(|| format!("Failed to load translations for '{}'", lang))?;
            info!(
                lang = %lang,
                entries = translator.translates().len(),
                "Translator ready"
            );

            println!("{}", render(&translator, &key, args.as_ref())?);
        }
        Command::Check {
            reference,
            lang,
            sections,
        } => {
            let mut clean = true;
            for (section, report) in check(&config, &reference, &lang, &sections)? {
                for error in &report.errors {
                    println!("[{}] error: {}", section, error);
                }
                for warning in &report.warnings {
                    println!("[{}] warning: {}", section, warning);
                }
                if report.has_errors() {
                    warn!(section = %section, errors = report.errors.len(), "Section has errors");
                    clean = false;
                }
            }
            if !clean {
                bail!("'{}' is incomplete relative to '{}'", lang, reference);
            }
            info!("✓ '{}' matches '{}'", lang, reference);
        }
    }

    Ok(())
}

/// Validate `lang` against `reference` for the configured default sections
/// plus `sections`. Both languages go through the configured aliases.
fn check(
    config: &Config,
    reference: &str,
    lang: &str,
    sections: &[String],
) -> Result<Vec<(String, ValidationReport)>> {
    let loader = JsonDirLoader::new(&config.translations_dir);
    let factory = TranslatorFactory::from_config(config, loader.clone());
    let reference = factory.resolve_lang(reference);
    let lang = factory.resolve_lang(lang);

    config
        .default_sections
        .iter()
        .chain(sections)
        .map(|section| -> Result<(String, ValidationReport)> {
            // Load each language on its own so the fallback doesn't hide gaps
            let expected = loader.load_translates(section, reference, reference)?;
            let actual = loader.load_translates(section, lang, lang)?;
            Ok((
                section.clone(),
                DictionaryValidator::validate(&expected, &actual),
            ))
        })
        .collect()
}

fn render(translator: &dyn MessageTranslator, key: &str, args: Option<&Args>) -> Result<String> {
    translator
        .translate(key, args)
        .with_context(|| format!("Failed to translate '{}'", key))
}
