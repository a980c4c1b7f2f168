//! CLI command implementations.

mod document;
mod render;
mod tokens;

pub(crate) use render::RenderArgs;
pub(crate) use tokens::TokensArgs;
