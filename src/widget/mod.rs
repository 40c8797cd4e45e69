//! Widget styling for skin layouts
//!
//! A [`Widget`] is the target state every skin attribute lands on. The
//! [`attributes`] dispatcher turns raw `(name, value)` pairs into typed
//! [`Attribute`]s and applies them in skin order.

pub mod attributes;
pub mod base;
pub mod style;

pub use attributes::{apply_all, AttrValue, AttributeContext, AttributeList};
pub use base::{Attribute, Widget};
pub use style::{
    BlitFlags, CornerRadius, HAlign, Orientation, RadiusEdges, ScrollbarMode, VAlign, WindowFlags,
};
