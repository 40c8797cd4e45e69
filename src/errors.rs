//! Error taxonomy for skin loading and binding
//!
//! `Parse`, `Registry` and `Consistency` failures unwind to the loader or
//! screen construction. Binding, attribute and coordinate failures are
//! reported into [`Diagnostics`] and skipped where they occurred.

use std::path::PathBuf;

use thiserror::Error;

use crate::expr::CoordinateError;
use crate::types::ValueError;

#[derive(Error, Debug)]
pub enum SkinError {
    #[error("XML parse error in '{path}' at line {line}, column {column}: {message}")]
    Parse {
        path: String,
        line: usize,
        column: usize,
        message: String,
    },
    #[error("IO error reading '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Binding(#[from] BindingError),
    #[error(transparent)]
    Attribute(#[from] AttributeError),
    #[error(transparent)]
    Coordinate(#[from] CoordinateError),
    #[error("The following components in '{screen}' don't have a skin entry: {}", components.join(", "))]
    Consistency {
        screen: String,
        components: Vec<String>,
    },
}

/// Failures while merging a document's global declarations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("Root element in skin must be 'skin', got '{0}'")]
    BadRoot(String),
    #[error("Color '{0}' must be #aarrggbb or valid named color")]
    UnknownColor(String),
    #[error("Tag '{tag}' needs a '{attribute}' attribute")]
    MissingAttribute {
        tag: &'static str,
        attribute: &'static str,
    },
    #[error("Included file '{0}' not found")]
    IncludeNotFound(PathBuf),
    #[error("File '{0}' includes itself")]
    IncludeCycle(PathBuf),
    #[error("Font file '{0}' not found")]
    FontNotFound(PathBuf),
    #[error("Pixmap file '{0}' not found")]
    PixmapNotFound(PathBuf),
    #[error("Unknown color type '{0}'")]
    UnknownStyleColor(String),
    #[error("Bad font alias '{name}': {reason}")]
    BadFontAlias { name: String, reason: String },
    #[error("Bad parameter '{name}': {reason}")]
    BadParameter { name: String, reason: String },
    #[error("Bad value '{value}' for '{attribute}'")]
    BadValue { attribute: String, value: String },
    #[error(transparent)]
    Value(#[from] ValueError),
}

/// Per-node binding failures; the node is skipped, siblings continue
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BindingError {
    #[error("The widget has no name, no source and no addon type specified")]
    NoTarget,
    #[error("Component with name '{name}' was not found in skin of screen '{screen}'")]
    MissingComponent { name: String, screen: String },
    #[error("Specified related screen '{path}' was not found in screen '{screen}'")]
    MissingRelatedScreen { path: String, screen: String },
    #[error("The source '{source_name}' was not found in screen '{screen}'")]
    MissingSource { source_name: String, screen: String },
    #[error("For source '{0}' a renderer must be defined with a 'render=' attribute")]
    MissingRenderAttribute(String),
    #[error("Renderer '{0}' not found")]
    UnknownRenderer(String),
    #[error("Converter '{0}' not found")]
    UnknownConverter(String),
    #[error("The 'convert' tag needs a 'type' attribute")]
    ConverterWithoutType,
    #[error("GUI Addon '{0}' not found")]
    UnknownAddon(String),
    #[error("The widget is from addon type '{0}', but no connection is specified")]
    MissingConnection(String),
    #[error("Applet failed to compile: '{0}'")]
    AppletCompile(String),
    #[error("Applet type '{0}' is unknown")]
    UnknownAppletTrigger(String),
    #[error("Unable to find screen '{0}' referred to by a panel")]
    UnknownFragment(String),
    #[error("Panel refers to screen '{0}' while already inside it")]
    PanelCycle(String),
    #[error("Failed to create skin context (position={position:?}, size={size:?})")]
    PanelContext {
        position: Option<String>,
        size: Option<String>,
    },
    #[error(transparent)]
    Attribute(#[from] AttributeError),
}

/// Per-attribute failures; the attribute is skipped unless [`is_fatal`]
///
/// [`is_fatal`]: AttributeError::is_fatal
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AttributeError {
    #[error("Attribute '{name}' (with value of '{value}') in object of type '{class_name}' is not implemented")]
    NotImplemented {
        name: String,
        value: String,
        class_name: String,
    },
    #[error("Attribute '{name}' with wrong (or unknown) value '{value}': {reason}")]
    InvalidValue {
        name: String,
        value: String,
        reason: String,
    },
    #[error("Invalid {name} '{value}', must be one of: {}", expected.join(", "))]
    UnknownKeyword {
        name: &'static str,
        value: String,
        expected: Vec<&'static str>,
    },
    #[error("Pixmap file '{0}' not found")]
    PixmapNotFound(PathBuf),
}

impl AttributeError {
    /// Missing image files abort the element's construction
    pub fn is_fatal(&self) -> bool {
        matches!(self, AttributeError::PixmapNotFound(_))
    }

    pub(crate) fn invalid(name: &str, value: &str, reason: impl ToString) -> Self {
        AttributeError::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Collector for non-fatal problems
///
/// Every report is logged and kept, so callers can inspect what went wrong
/// after a load or bind completes.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<SkinError>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, err: impl Into<SkinError>) {
        let err = err.into();
        crate::log!("[Skin] Error: {}", err);
        self.entries.push(err);
    }

    pub fn entries(&self) -> &[SkinError] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Move every entry from `other` into this collector
    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostics_collects_reports() {
        let mut diagnostics = Diagnostics::new();
        assert!(diagnostics.is_empty());

        diagnostics.report(BindingError::UnknownRenderer("Gauge".to_string()));
        diagnostics.report(CoordinateError::DivisionByZero);

        assert_eq!(diagnostics.len(), 2);
        assert!(matches!(
            diagnostics.entries()[0],
            SkinError::Binding(BindingError::UnknownRenderer(_))
        ));
    }

    #[test]
    fn test_consistency_message_lists_components() {
        let err = SkinError::Consistency {
            screen: "Main".to_string(),
            components: vec!["list".to_string(), "title".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "The following components in 'Main' don't have a skin entry: list, title"
        );
    }

    #[test]
    fn test_only_missing_pixmaps_are_fatal() {
        assert!(AttributeError::PixmapNotFound(PathBuf::from("a.png")).is_fatal());
        assert!(!AttributeError::invalid("zPosition", "x", "not a number").is_fatal());
    }
}
