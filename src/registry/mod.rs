//! Process-wide skin values: colors, fonts, parameters, window chrome

pub mod parameter;
pub mod store;
pub mod window_style;

pub use parameter::Parameter;
pub use store::{FontFace, MergeContext, RegistryStore, SubtitleStyle};
pub use window_style::{BorderPos, BorderSet, StyleColor, WindowStyle};
