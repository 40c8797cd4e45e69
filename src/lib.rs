//! Veneer - skin layout engine
//!
//! Loads declarative skin documents, cascades their colors, fonts and
//! window styles into a registry, and binds named screen fragments onto
//! host screens: positions and sizes are resolved from the coordinate
//! language, data sources are wired through converter pipelines to
//! renderers, and every attribute is applied to its widget.

#[macro_use]
extern crate lalrpop_util;

// Include the log module first so the log! macro works everywhere
#[macro_use]
pub mod log;

pub mod errors;
pub mod types;

// Coordinate expression language (lalrpop grammar)
pub mod expr;

pub mod document;
pub mod registry;

pub mod layout;
pub mod screen;
pub mod widget;

pub mod shared;

pub use document::Skin;
pub use errors::{Diagnostics, SkinError};
pub use layout::{BindReport, ComponentRegistry, LayoutEngine};
pub use screen::{GuiElement, Screen};
pub use shared::EngineConfig;
