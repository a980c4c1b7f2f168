//! `emtag tokens` command implementation.

use std::path::PathBuf;

use clap::Args;

use super::document::{DocumentArgs, write_output};
use crate::error::CliError;

/// Arguments for the tokens command.
#[derive(Args)]
pub(crate) struct TokensArgs {
    #[command(flatten)]
    document: DocumentArgs,

    /// Output file (default: stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print tokens before core rules run.
    #[arg(long)]
    raw: bool,
}

impl TokensArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let (engine, _config) = self.document.engine()?;
        let markdown = self.document.read_input()?;

        let tokens = if self.raw {
            engine.tokenize(&markdown)
        } else {
            engine.parse(&markdown)
        };
        let json = serde_json::to_string_pretty(&tokens)?;
        write_output(self.output.as_deref(), &json)
    }
}
