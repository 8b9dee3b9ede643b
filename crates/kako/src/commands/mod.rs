//! CLI command implementations.

pub(crate) mod render;
pub(crate) mod tripcode;

pub(crate) use render::RenderArgs;
pub(crate) use tripcode::TripcodeArgs;
