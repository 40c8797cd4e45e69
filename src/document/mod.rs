//! Skin documents: parsing, loading and the fragment catalog

pub mod loader;
pub mod node;
pub mod parser;

pub use loader::{Fragment, Skin};
pub use node::Element;
pub use parser::parse_document;
