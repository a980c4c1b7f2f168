//! `emtag render` command implementation.

use std::path::PathBuf;

use clap::Args;

use super::document::{DocumentArgs, write_output};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    #[command(flatten)]
    document: DocumentArgs,

    /// Output file (default: stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl RenderArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let (engine, config) = self.document.engine()?;
        if config.emphasis.is_empty() {
            output.warning("No emphasis tags configured; rendering default <em>/<strong>");
        }

        let markdown = self.document.read_input()?;
        let html = engine.render(&markdown);
        write_output(self.output.as_deref(), &html)?;

        if let Some(path) = &self.output {
            output.success(&format!("Wrote {}", path.display()));
        }
        Ok(())
    }
}
