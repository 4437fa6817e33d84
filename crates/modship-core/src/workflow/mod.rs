//! Release workflow building blocks

mod notes;
mod release;
mod version;

pub use notes::*;
pub use release::*;
pub use version::*;
