//! Layout: space allocation and fragment binding

pub mod context;
pub mod engine;
pub mod registry;

pub use context::{LayoutContext, LayoutMode, Placement};
pub use engine::{AppletCompiler, BindReport, LayoutEngine, NoApplets};
pub use registry::{ComponentRegistry, ConverterFactory, ElementFactory};
