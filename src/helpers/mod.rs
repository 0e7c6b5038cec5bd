//! Helper functions shared across loading, indexing and rendering

mod date;
mod text;
mod url;

pub use date::*;
pub use text::*;
pub use url::*;
