//! CLI command handling

pub mod check;
pub mod input;
pub mod output;
pub mod render;
pub mod send;

pub use check::*;
pub use input::*;
pub use output::*;
pub use render::*;
pub use send::*;
