//! glean - generate test fixtures from the output of any registered method.
//!
//! resolve target -> coerce arguments -> invoke -> serialize -> write `<path>/<name>.<format>`
//!
//! Embedding applications build a [`target::Registry`] (class/method handles) and a
//! [`target::Container`] (receiver factories) and hand both to [`cmd::execute_glean`].

pub mod cmd;
pub mod config;
pub mod error;
pub mod fixture;
pub mod host;
pub mod serialize;
pub mod target;
pub mod utils;

pub use cmd::{GleanArgs, execute_glean};
pub use config::Config;
