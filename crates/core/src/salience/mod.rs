//! Salient-text extraction from parsed HTML.

pub mod script;
pub mod soup;
pub mod walker;

pub use soup::{SCRIPT_STRING_NAME, SalienceConfig, SoupElement, SoupLine, SoupToken};
pub use walker::{SalienceWalker, render_salient_text};
