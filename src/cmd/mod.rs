/*!
Command modules.

  glean.rs   GleanArgs + execute_glean (the fixture command)

Each command module exposes one public `execute_*` function returning
`anyhow::Result`, with its argument struct deriving `clap::Args`.
*/

pub mod glean;

pub use glean::{GleanArgs, execute_glean};
