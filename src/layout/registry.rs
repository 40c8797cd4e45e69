//! Component factories looked up by the names used in skin documents

use std::collections::HashMap;

use crate::screen::{Converter, GuiElement};

/// Factory for a converter, given its argument text
pub type ConverterFactory = fn(&str) -> Box<dyn Converter>;

/// Factory for a renderer or addon element
pub type ElementFactory = fn() -> Box<dyn GuiElement>;

/// Registry of converter, renderer and addon factories
///
/// The host registers its component kinds at startup; the binder resolves
/// `convert type=`, `render=` and `addon=` names through it.
#[derive(Default)]
pub struct ComponentRegistry {
    converters: HashMap<String, ConverterFactory>,
    renderers: HashMap<String, ElementFactory>,
    addons: HashMap<String, ElementFactory>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_converter(&mut self, kind: &str, factory: ConverterFactory) {
        self.converters.insert(kind.to_string(), factory);
    }

    pub fn register_renderer(&mut self, kind: &str, factory: ElementFactory) {
        self.renderers.insert(kind.to_string(), factory);
    }

    pub fn register_addon(&mut self, kind: &str, factory: ElementFactory) {
        self.addons.insert(kind.to_string(), factory);
    }

    pub fn converter(&self, kind: &str) -> Option<ConverterFactory> {
        self.converters.get(kind).copied()
    }

    /// Create a renderer by kind, returns None if unknown
    pub fn create_renderer(&self, kind: &str) -> Option<Box<dyn GuiElement>> {
        self.renderers.get(kind).map(|factory| factory())
    }

    /// Create an addon by kind, returns None if unknown
    pub fn create_addon(&self, kind: &str) -> Option<Box<dyn GuiElement>> {
        self.addons.get(kind).map(|factory| factory())
    }
}
