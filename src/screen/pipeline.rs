//! Source → converter → renderer pipelines
//!
//! A source is the root of a small tree of stages. Each converter stage
//! hangs off its upstream's `downstream` list, so two widgets asking for
//! the same converter with the same arguments share one stage.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// A data transformation between a source and a renderer
pub trait Converter: Any {
    /// Argument text the converter was created with
    fn arguments(&self) -> &str;
}

pub enum StageKind {
    Source {
        name: String,
        class_name: String,
    },
    Converter {
        kind: String,
        converter: Box<dyn Converter>,
    },
}

pub struct Stage {
    kind: StageKind,
    upstream: Option<Weak<Stage>>,
    downstream: RefCell<Vec<Rc<Stage>>>,
}

impl fmt::Debug for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            StageKind::Source { name, class_name } => {
                write!(f, "Source({} : {})", name, class_name)
            }
            StageKind::Converter { kind, converter } => {
                write!(f, "Converter({} '{}')", kind, converter.arguments())
            }
        }
    }
}

impl Stage {
    /// A root stage for a named data source
    pub fn source(name: impl Into<String>, class_name: impl Into<String>) -> Rc<Stage> {
        Rc::new(Stage {
            kind: StageKind::Source {
                name: name.into(),
                class_name: class_name.into(),
            },
            upstream: None,
            downstream: RefCell::new(Vec::new()),
        })
    }

    pub fn kind(&self) -> &StageKind {
        &self.kind
    }

    /// Concrete type name: the source class or the converter kind
    pub fn class_name(&self) -> &str {
        match &self.kind {
            StageKind::Source { class_name, .. } => class_name,
            StageKind::Converter { kind, .. } => kind,
        }
    }

    pub fn converter(&self) -> Option<&dyn Converter> {
        match &self.kind {
            StageKind::Converter { converter, .. } => Some(converter.as_ref()),
            StageKind::Source { .. } => None,
        }
    }

    pub fn upstream(&self) -> Option<Rc<Stage>> {
        self.upstream.as_ref().and_then(Weak::upgrade)
    }

    pub fn downstream(&self) -> Vec<Rc<Stage>> {
        self.downstream.borrow().clone()
    }

    /// The root source this stage ultimately reads from
    pub fn root(self: &Rc<Self>) -> Rc<Stage> {
        let mut stage = Rc::clone(self);
        while let Some(up) = stage.upstream() {
            stage = up;
        }
        stage
    }

    /// Last downstream converter of `kind` built with `arguments`
    pub fn find_converter(&self, kind: &str, arguments: &str) -> Option<Rc<Stage>> {
        self.downstream
            .borrow()
            .iter()
            .rev()
            .find(|stage| match &stage.kind {
                StageKind::Converter { kind: k, converter } => {
                    k == kind && converter.arguments() == arguments
                }
                StageKind::Source { .. } => false,
            })
            .cloned()
    }

    /// Reuse a matching downstream converter or connect a new one from `make`
    pub fn connect_converter(
        self: &Rc<Self>,
        kind: &str,
        arguments: &str,
        make: impl FnOnce() -> Box<dyn Converter>,
    ) -> Rc<Stage> {
        if let Some(existing) = self.find_converter(kind, arguments) {
            return existing;
        }
        let stage = Rc::new(Stage {
            kind: StageKind::Converter {
                kind: kind.to_string(),
                converter: make(),
            },
            upstream: Some(Rc::downgrade(self)),
            downstream: RefCell::new(Vec::new()),
        });
        self.downstream.borrow_mut().push(Rc::clone(&stage));
        stage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Text(String);

    impl Converter for Text {
        fn arguments(&self) -> &str {
            &self.0
        }
    }

    fn text(args: &str) -> impl FnOnce() -> Box<dyn Converter> {
        let args = args.to_string();
        move || Box::new(Text(args)) as Box<dyn Converter>
    }

    #[test]
    fn test_identical_converters_are_shared() {
        let source = Stage::source("title", "StaticText");
        let a = source.connect_converter("ClockToText", "Format:%H:%M", text("Format:%H:%M"));
        let b = source.connect_converter("ClockToText", "Format:%H:%M", text("Format:%H:%M"));
        let c = source.connect_converter("ClockToText", "Date", text("Date"));

        assert!(Rc::ptr_eq(&a, &b));
        assert!(!Rc::ptr_eq(&a, &c));
        assert_eq!(source.downstream().len(), 2);
    }

    #[test]
    fn test_chain_walks_back_to_source() {
        let source = Stage::source("event", "EventInfo");
        let name = source.connect_converter("EventName", "Name", text("Name"));
        let upper = name.connect_converter("TextCase", "Upper", text("Upper"));

        assert_eq!(upper.class_name(), "TextCase");
        assert!(Rc::ptr_eq(&upper.upstream().unwrap(), &name));
        assert!(Rc::ptr_eq(&upper.root(), &source));
        assert_eq!(upper.converter().unwrap().arguments(), "Upper");
    }
}
