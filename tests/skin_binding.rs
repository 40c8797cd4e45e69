use std::fs;
use std::path::Path;
use std::rc::Rc;

use tempfile::TempDir;
use veneer::errors::SkinError;
use veneer::layout::ComponentRegistry;
use veneer::screen::Converter;
use veneer::shared::config::PathsConfig;
use veneer::types::{Color, Point, Size};
use veneer::widget::Widget;
use veneer::{EngineConfig, GuiElement, LayoutEngine, Screen, Skin};

struct Label {
    widget: Widget,
}

impl Label {
    fn boxed() -> Box<dyn GuiElement> {
        Box::new(Label {
            widget: Widget::new(),
        })
    }
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

struct EventName(String);

impl Converter for EventName {
    fn arguments(&self) -> &str {
        &self.0
    }
}

const BASE_SKIN: &str = r##"<skin>
    <colors>
        <color name="key_red" value="#009f1313"/>
    </colors>
    <screen name="Main">
        <widget name="label1" position="10,10" size="50,20" foregroundColor="key_red"/>
    </screen>
</skin>"##;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn config(root: &Path, primary: &str) -> EngineConfig {
    let mut config = EngineConfig::with_defaults();
    config.skin.primary = primary.to_string();
    config.paths = PathsConfig {
        skin_dir: Some(root.join("skins")),
        display_skin_dir: Some(root.join("display")),
        fonts_dir: Some(root.join("fonts")),
        user_dir: Some(root.join("user")),
    };
    config
}

fn main_screen() -> Screen {
    let mut screen = Screen::new("Main");
    screen.add_element("label1", Label::boxed());
    screen
}

#[test]
fn test_base_fragment_binds_when_override_omits_it() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "skins/skin_default/skin.xml", BASE_SKIN);
    write(
        temp_dir.path(),
        "skins/Override/skin.xml",
        r##"<skin><colors><color name="accent" value="#00102030"/></colors></skin>"##,
    );

    let mut skin = Skin::new(&config(temp_dir.path(), "Override/skin.xml"));
    skin.init();
    assert_eq!(skin.current_primary(), Some("Override/skin.xml"));
    assert_eq!(skin.registry().color("key_red"), Some(Color::from_argb(0x009f_1313)));
    assert_eq!(skin.registry().color("accent"), Some(Color::from_argb(0x0010_2030)));

    let mut screen = main_screen();
    let report = LayoutEngine::new()
        .read_skin(&skin, &mut screen, &["Main"], 0)
        .unwrap();

    assert_eq!(report.fragment, "Main");
    assert!(report.diagnostics.is_empty());
    let widget = screen.element("label1").unwrap().widget();
    assert_eq!(widget.position, Point::new(10, 10));
    assert_eq!(widget.size, Size::new(50, 20));
    assert_eq!(widget.foreground_color, Some(Color::from_argb(0x009f_1313)));
}

#[test]
fn test_primary_fragment_replaces_base() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "skins/skin_default/skin.xml", BASE_SKIN);
    write(
        temp_dir.path(),
        "skins/Wide/skin.xml",
        r##"<skin>
            <colors><color name="key_red" value="#00ff0000"/></colors>
            <screen name="Main" position="center,center" size="600,400">
                <widget name="label1" position="20,e-60" size="e-40,40" foregroundColor="key_red"/>
            </screen>
        </skin>"##,
    );

    let mut skin = Skin::new(&config(temp_dir.path(), "Wide/skin.xml"));
    skin.init();

    let mut screen = main_screen();
    let report = LayoutEngine::new()
        .read_skin(&skin, &mut screen, &["Main"], 0)
        .unwrap();

    assert!(report.diagnostics.is_empty());
    assert_eq!(screen.window.position, Point::new(340, 160));
    assert_eq!(screen.window.size, Size::new(600, 400));
    let widget = screen.element("label1").unwrap().widget();
    assert_eq!(widget.position, Point::new(20, 340));
    assert_eq!(widget.size, Size::new(560, 40));
    assert_eq!(widget.foreground_color, Some(Color::from_argb(0x00ff_0000)));
}

#[test]
fn test_reload_drops_values_removed_from_disk() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "skins/skin_default/skin.xml", BASE_SKIN);
    write(
        temp_dir.path(),
        "skins/Night/skin.xml",
        r##"<skin><colors><color name="accent" value="#00102030"/></colors></skin>"##,
    );

    let mut skin = Skin::new(&config(temp_dir.path(), "Night/skin.xml"));
    skin.init();
    assert!(skin.registry().color("accent").is_some());

    write(
        temp_dir.path(),
        "skins/Night/skin.xml",
        r##"<skin><colors><color name="key_red" value="#00000001"/></colors></skin>"##,
    );
    skin.reload();

    assert_eq!(skin.registry().color("accent"), None);
    assert_eq!(skin.registry().color("key_red"), Some(Color::from_argb(1)));
    assert!(skin.has_fragment("Main"));
}

#[test]
fn test_pixmap_resolves_relative_to_skin_directory() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "skins/skin_default/skin.xml", BASE_SKIN);
    write(temp_dir.path(), "skins/Night/icons/logo.png", "png");
    write(
        temp_dir.path(),
        "skins/Night/skin.xml",
        r#"<skin>
            <screen name="Main">
                <widget name="label1" position="0,0" size="64,64" pixmap="icons/logo.png" alphatest="blend"/>
            </screen>
        </skin>"#,
    );

    let mut skin = Skin::new(&config(temp_dir.path(), "Night/skin.xml"));
    skin.init();

    let mut screen = main_screen();
    let report = LayoutEngine::new()
        .read_skin(&skin, &mut screen, &["Main"], 0)
        .unwrap();

    assert!(report.diagnostics.is_empty());
    let pixmap = screen.element("label1").unwrap().widget().pixmap.clone().unwrap();
    assert_eq!(pixmap.path, temp_dir.path().join("skins/Night/icons/logo.png"));
}

#[test]
fn test_include_supplies_colors_and_fragments() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "skins/skin_default/skin.xml", BASE_SKIN);
    write(
        temp_dir.path(),
        "skins/Split/skin.xml",
        r#"<skin><include filename="screens.xml"/></skin>"#,
    );
    write(
        temp_dir.path(),
        "skins/Split/screens.xml",
        r##"<skin>
            <colors><color name="title" value="#00abcdef"/></colors>
            <screen name="Main">
                <widget name="label1" position="5,5" size="10,10" backgroundColor="title"/>
            </screen>
        </skin>"##,
    );

    let mut skin = Skin::new(&config(temp_dir.path(), "Split/skin.xml"));
    skin.init();

    let mut screen = main_screen();
    LayoutEngine::new()
        .read_skin(&skin, &mut screen, &["Main"], 0)
        .unwrap();

    let widget = screen.element("label1").unwrap().widget();
    assert_eq!(widget.position, Point::new(5, 5));
    assert_eq!(widget.background_color, Some(Color::from_argb(0x00ab_cdef)));
}

#[test]
fn test_unskinned_element_fails_binding() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "skins/skin_default/skin.xml", BASE_SKIN);

    let mut skin = Skin::new(&config(temp_dir.path(), "skin_default/skin.xml"));
    skin.init();

    let mut screen = main_screen();
    screen.add_element("list", Label::boxed());
    let err = LayoutEngine::new()
        .read_skin(&skin, &mut screen, &["Main"], 0)
        .unwrap_err();

    match err {
        SkinError::Consistency { screen, components } => {
            assert_eq!(screen, "Main");
            assert_eq!(components, vec!["list".to_string()]);
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_source_pipeline_reaches_renderer() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "skins/skin_default/skin.xml", BASE_SKIN);
    write(
        temp_dir.path(),
        "skins/Guide/skin.xml",
        r#"<skin>
            <screen name="Main">
                <widget name="label1" position="0,0" size="10,10"/>
                <widget source="session" render="Label" position="0,20" size="200,30">
                    <convert type="EventName">Name</convert>
                </widget>
                <widget source="session" render="Label" position="0,60" size="200,30">
                    <convert type="EventName">Name</convert>
                </widget>
            </screen>
        </skin>"#,
    );

    let mut skin = Skin::new(&config(temp_dir.path(), "Guide/skin.xml"));
    skin.init();

    let mut registry = ComponentRegistry::new();
    registry.register_renderer("Label", Label::boxed);
    registry.register_converter("EventName", |args| Box::new(EventName(args.to_string())));
    let engine = LayoutEngine::with_registry(registry);

    let mut screen = main_screen();
    let session = screen.add_source("session", "CurrentService");
    let report = engine.read_skin(&skin, &mut screen, &["Main"], 0).unwrap();

    assert!(report.diagnostics.is_empty());
    assert_eq!(screen.renderers.len(), 2);
    assert!(Rc::ptr_eq(&screen.renderers[0].input, &screen.renderers[1].input));
    assert_eq!(screen.renderers[0].label_name, "session");
    assert_eq!(screen.renderers[1].element.widget().position, Point::new(0, 60));
    assert_eq!(
        screen.renderers[0].input.converter().map(|c| c.arguments()),
        Some("Name")
    );
    assert_eq!(session.downstream().len(), 1);
}
