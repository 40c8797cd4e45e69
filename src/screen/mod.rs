//! Screens: the objects a skin fragment is bound onto
//!
//! A [`Screen`] is built by the host with its named GUI elements and data
//! sources already in place. Binding positions and styles the elements,
//! attaches renderer pipelines and decorative widgets, and registers the
//! applet hooks.

pub mod pipeline;

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;

use crate::document::Element;
use crate::types::Scale;
use crate::widget::Widget;

pub use pipeline::{Converter, Stage, StageKind};

/// A live UI object a skin entry can be bound to
pub trait GuiElement {
    /// Concrete kind, matched by `objectTypes`
    fn class_name(&self) -> &str;

    fn widget(&self) -> &Widget;

    fn widget_mut(&mut self) -> &mut Widget;

    /// Elements that need a skin entry; the rest may stay unbound
    fn is_gui_component(&self) -> bool {
        true
    }

    /// Addons are tied to the element named by their `connection`
    fn connect_related(&mut self, _connection: &str, _screen: &Screen) {}
}

/// Callable registered by an `applet` entry
pub type Hook = Box<dyn Fn(&Screen)>;

pub enum SourceEntry {
    Live(Rc<Stage>),
    /// A retired source name that now points at `replacement`
    Obsolete {
        replacement: String,
        removal_date: String,
        description: Option<String>,
    },
}

/// A renderer attached at the end of a source pipeline
pub struct BoundRenderer {
    pub kind: String,
    pub element: Box<dyn GuiElement>,
    pub input: Rc<Stage>,
    /// Source name the renderer was declared against
    pub label_name: String,
}

impl fmt::Debug for BoundRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundRenderer")
            .field("kind", &self.kind)
            .field("input", &self.input)
            .field("label_name", &self.label_name)
            .finish()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecorationKind {
    Label,
    Pixmap,
}

/// Anonymous `eLabel`/`ePixmap` entry
#[derive(Clone, Debug, PartialEq)]
pub struct AdditionalWidget {
    pub kind: DecorationKind,
    pub widget: Widget,
}

/// Skin text carried by the screen itself, used when no document offers
/// a usable fragment
#[derive(Clone, Debug, PartialEq)]
pub enum EmbeddedSkin {
    Single(String),
    /// Several `<screen>` documents; the first whose `id` is absent or
    /// matches the surface wins
    Candidates(Vec<String>),
    /// `%d` placeholders filled in order with `values` times the skin factor
    Template { template: String, values: Vec<i32> },
}

pub struct Screen {
    class_name: String,
    pub window: Widget,
    elements: BTreeMap<String, Box<dyn GuiElement>>,
    sources: HashMap<String, SourceEntry>,
    related: HashMap<String, Rc<Screen>>,
    pub renderers: Vec<BoundRenderer>,
    pub additional_widgets: Vec<AdditionalWidget>,
    on_layout_finish: Vec<Hook>,
    on_content_changed: Vec<Hook>,
    mandatory_widgets: Option<Vec<String>>,
    embedded_skin: Option<EmbeddedSkin>,
    pub(crate) parsed_skin: Option<Rc<Element>>,
    scale: Scale,
}

impl fmt::Debug for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Screen")
            .field("class_name", &self.class_name)
            .field("elements", &self.elements.keys().collect::<Vec<_>>())
            .field("sources", &self.sources.keys().collect::<Vec<_>>())
            .field("renderers", &self.renderers)
            .field("additional_widgets", &self.additional_widgets.len())
            .finish()
    }
}

impl Screen {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            window: Widget::new(),
            elements: BTreeMap::new(),
            sources: HashMap::new(),
            related: HashMap::new(),
            renderers: Vec::new(),
            additional_widgets: Vec::new(),
            on_layout_finish: Vec::new(),
            on_content_changed: Vec::new(),
            mandatory_widgets: None,
            embedded_skin: None,
            parsed_skin: None,
            scale: Scale::IDENTITY,
        }
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    // ========================================================================
    // Setup by the host
    // ========================================================================

    pub fn add_element(&mut self, name: impl Into<String>, element: Box<dyn GuiElement>) {
        self.elements.insert(name.into(), element);
    }

    /// Register a live data source and return its pipeline root
    pub fn add_source(&mut self, name: impl Into<String>, class_name: &str) -> Rc<Stage> {
        let name = name.into();
        let stage = Stage::source(name.clone(), class_name);
        self.sources
            .insert(name, SourceEntry::Live(Rc::clone(&stage)));
        stage
    }

    pub fn add_obsolete_source(
        &mut self,
        name: impl Into<String>,
        replacement: impl Into<String>,
        removal_date: impl Into<String>,
        description: Option<String>,
    ) {
        self.sources.insert(
            name.into(),
            SourceEntry::Obsolete {
                replacement: replacement.into(),
                removal_date: removal_date.into(),
                description,
            },
        );
    }

    /// Make another screen reachable as `name.` in source paths
    pub fn add_related(&mut self, name: impl Into<String>, screen: Rc<Screen>) {
        self.related.insert(name.into(), screen);
    }

    pub fn set_mandatory_widgets(&mut self, names: Vec<String>) {
        self.mandatory_widgets = Some(names);
    }

    pub fn set_embedded_skin(&mut self, skin: EmbeddedSkin) {
        self.embedded_skin = Some(skin);
        self.parsed_skin = None;
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    pub fn element(&self, name: &str) -> Option<&dyn GuiElement> {
        self.elements.get(name).map(|e| e.as_ref())
    }

    pub fn element_mut(&mut self, name: &str) -> Option<&mut (dyn GuiElement + 'static)> {
        self.elements.get_mut(name).map(|e| e.as_mut())
    }

    pub fn element_names(&self) -> impl Iterator<Item = &str> {
        self.elements.keys().map(String::as_str)
    }

    pub fn source(&self, name: &str) -> Option<&SourceEntry> {
        self.sources.get(name)
    }

    pub fn related(&self, name: &str) -> Option<&Rc<Screen>> {
        self.related.get(name)
    }

    /// Whether `name` is an element or a source of this screen
    pub fn contains(&self, name: &str) -> bool {
        self.elements.contains_key(name) || self.sources.contains_key(name)
    }

    /// Concrete kind of the element or live source called `name`
    pub fn class_of(&self, name: &str) -> Option<&str> {
        if let Some(element) = self.elements.get(name) {
            return Some(element.class_name());
        }
        match self.sources.get(name) {
            Some(SourceEntry::Live(stage)) => Some(stage.class_name()),
            _ => None,
        }
    }

    pub fn mandatory_widgets(&self) -> Option<&[String]> {
        self.mandatory_widgets.as_deref()
    }

    pub fn embedded_skin(&self) -> Option<&EmbeddedSkin> {
        self.embedded_skin.as_ref()
    }

    /// Resolution scale the screen was laid out with
    pub fn scale(&self) -> Scale {
        self.scale
    }

    pub(crate) fn set_scale(&mut self, scale: Scale) {
        self.scale = scale;
    }

    // ========================================================================
    // Hooks
    // ========================================================================

    pub fn on_layout_finish(&self) -> &[Hook] {
        &self.on_layout_finish
    }

    pub fn on_content_changed(&self) -> &[Hook] {
        &self.on_content_changed
    }

    pub(crate) fn add_layout_finish_hook(&mut self, hook: Hook) {
        self.on_layout_finish.push(hook);
    }

    pub(crate) fn add_content_changed_hook(&mut self, hook: Hook) {
        self.on_content_changed.push(hook);
    }

    /// Run every `onLayoutFinish` hook in registration order
    pub fn run_layout_finish(&self) {
        for hook in &self.on_layout_finish {
            hook(self);
        }
    }

    pub fn run_content_changed(&self) {
        for hook in &self.on_content_changed {
            hook(self);
        }
    }

    /// Drop everything a previous binding attached
    pub(crate) fn clear_bindings(&mut self) {
        self.renderers.clear();
        self.additional_widgets.clear();
        self.on_layout_finish.clear();
        self.on_content_changed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Label {
        widget: Widget,
    }

    impl GuiElement for Label {
        fn class_name(&self) -> &str {
            "Label"
        }

        fn widget(&self) -> &Widget {
            &self.widget
        }

        fn widget_mut(&mut self) -> &mut Widget {
            &mut self.widget
        }
    }

    #[test]
    fn test_class_of_elements_and_sources() {
        let mut screen = Screen::new("InfoBar");
        screen.add_element(
            "title",
            Box::new(Label {
                widget: Widget::new(),
            }),
        );
        screen.add_source("session", "CurrentService");
        screen.add_obsolete_source("Event", "session", "2030-01-01", None);

        assert_eq!(screen.class_of("title"), Some("Label"));
        assert_eq!(screen.class_of("session"), Some("CurrentService"));
        assert_eq!(screen.class_of("Event"), None);
        assert!(screen.contains("Event"));
        assert!(!screen.contains("clock"));
    }

    #[test]
    fn test_hooks_run_in_order() {
        use std::cell::RefCell;

        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut screen = Screen::new("Main");
        for i in 0..2 {
            let calls = Rc::clone(&calls);
            screen.add_layout_finish_hook(Box::new(move |s: &Screen| {
                calls.borrow_mut().push(format!("{}:{}", s.class_name(), i));
            }));
        }

        screen.run_layout_finish();
        screen.run_content_changed();
        assert_eq!(*calls.borrow(), vec!["Main:0", "Main:1"]);
    }
}
