//! Arguments shared by commands that process one markdown document.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use emtag_config::{CliSettings, Config};
use emtag_core::{EmphasisOptions, Marker};
use emtag_markdown::{MarkdownEngine, configure_markdown};

use crate::error::CliError;

/// Input, configuration and per-marker tag overrides.
#[derive(Args, Debug, Default)]
pub(crate) struct DocumentArgs {
    /// Markdown file to read (default: stdin).
    input: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover emtag.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Tag for `_single underscore_` emphasis.
    #[arg(long, value_name = "TAG", env = "EMTAG_UNDERSCORE")]
    underscore: Option<String>,

    /// Tag for `__double underscore__` emphasis.
    #[arg(long, value_name = "TAG", env = "EMTAG_DOUBLE_UNDERSCORE")]
    double_underscore: Option<String>,

    /// Tag for `*single asterisk*` emphasis.
    #[arg(long, value_name = "TAG", env = "EMTAG_ASTERISK")]
    asterisk: Option<String>,

    /// Tag for `**double asterisk**` emphasis.
    #[arg(long, value_name = "TAG", env = "EMTAG_DOUBLE_ASTERISK")]
    double_asterisk: Option<String>,

    /// Disable GitHub Flavored Markdown extensions.
    #[arg(long)]
    no_gfm: bool,
}

impl DocumentArgs {
    /// CLI overrides to layer over the config file.
    fn cli_settings(&self) -> CliSettings {
        let mut emphasis = EmphasisOptions::new();
        let flags = [
            (Marker::Underscore, &self.underscore),
            (Marker::DoubleUnderscore, &self.double_underscore),
            (Marker::Asterisk, &self.asterisk),
            (Marker::DoubleAsterisk, &self.double_asterisk),
        ];
        for (marker, tag) in flags {
            if let Some(tag) = tag {
                emphasis.set(marker, tag.as_str());
            }
        }
        CliSettings {
            emphasis,
            gfm: self.no_gfm.then_some(false),
        }
    }

    /// Load configuration and build an engine with the emphasis rule registered.
    pub(crate) fn engine(&self) -> Result<(MarkdownEngine, Config), CliError> {
        let config = Config::load(self.config.as_deref(), Some(&self.cli_settings()))?;
        if let Some(path) = &config.config_path {
            tracing::info!(path = %path.display(), "Loaded configuration");
        }

        let mut engine = MarkdownEngine::new().with_gfm(config.markdown.gfm);
        configure_markdown(&mut engine, config.emphasis.clone())?;
        Ok((engine, config))
    }

    /// Read the markdown source from the input file or stdin.
    pub(crate) fn read_input(&self) -> Result<String, CliError> {
        match self.input.as_deref() {
            Some(path) if path != Path::new("-") => Ok(std::fs::read_to_string(path)?),
            _ => {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                Ok(buf)
            }
        }
    }
}

/// Write `content` to `path`, or to stdout when no path is given.
pub(crate) fn write_output(path: Option<&Path>, content: &str) -> Result<(), CliError> {
    match path {
        Some(path) => std::fs::write(path, content)?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            if !content.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cli_settings_from_flags() {
        let args = DocumentArgs {
            underscore: Some("u".to_owned()),
            double_asterisk: Some("b".to_owned()),
            no_gfm: true,
            ..Default::default()
        };

        let settings = args.cli_settings();

        let entries: Vec<_> = settings.emphasis.iter().collect();
        assert_eq!(
            entries,
            vec![(Marker::Underscore, "u"), (Marker::DoubleAsterisk, "b")]
        );
        assert_eq!(settings.gfm, Some(false));
    }

    #[test]
    fn test_cli_settings_without_flags() {
        let settings = DocumentArgs::default().cli_settings();
        assert!(settings.emphasis.is_empty());
        assert_eq!(settings.gfm, None);
    }

    #[test]
    fn test_engine_from_config_file_and_flags() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("emtag.toml");
        std::fs::write(&config, "[emphasis]\n\"_\" = \"cite\"\n\"*\" = \"i\"\n").unwrap();
        let args = DocumentArgs {
            config: Some(config),
            asterisk: Some("mark".to_owned()),
            ..Default::default()
        };

        let (engine, config) = args.engine().unwrap();

        assert_eq!(config.emphasis.get(Marker::Underscore), Some("cite"));
        assert_eq!(
            engine.render("_a_ *b*"),
            "<p><cite>a</cite> <mark>b</mark></p>"
        );
    }

    #[test]
    fn test_engine_missing_config_is_error() {
        let args = DocumentArgs {
            config: Some(PathBuf::from("/nonexistent/emtag.toml")),
            ..Default::default()
        };
        assert!(matches!(
            args.engine(),
            Err(CliError::Config(emtag_config::ConfigError::NotFound(_)))
        ));
    }

    #[test]
    fn test_read_input_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("doc.md");
        std::fs::write(&input, "*x*").unwrap();
        let args = DocumentArgs {
            input: Some(input),
            ..Default::default()
        };

        assert_eq!(args.read_input().unwrap(), "*x*");
    }

    #[test]
    fn test_write_output_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.html");

        write_output(Some(&path), "<p>x</p>").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<p>x</p>");
    }
}
