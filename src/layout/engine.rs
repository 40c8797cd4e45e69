//! Layout engine - binds skin fragments onto screens

use std::collections::{BTreeSet, HashSet};
use std::path::PathBuf;
use std::rc::Rc;

use crate::document::{parse_document, Element, Fragment, Skin};
use crate::errors::{AttributeError, BindingError, Diagnostics, SkinError};
use crate::layout::context::{LayoutContext, LayoutMode, Placement};
use crate::layout::registry::ComponentRegistry;
use crate::screen::{
    AdditionalWidget, BoundRenderer, DecorationKind, EmbeddedSkin, Hook, Screen, SourceEntry,
    Stage,
};
use crate::shared::Scope;
use crate::types::{parse_int_pair, AxisScale, Rect, Scale};
use crate::widget::attributes::{truthy, FILE_ATTRIBUTES};
use crate::widget::{apply_all, AttrValue, AttributeContext, AttributeList, Widget};

/// Turns the code of an `applet` entry into a hook
///
/// Applet code is host-language specific, so the embedding application
/// decides what it may contain.
pub trait AppletCompiler {
    fn compile(&self, code: &str) -> Result<Hook, String>;
}

/// Compiler for hosts without applet support; every applet fails
#[derive(Clone, Copy, Debug, Default)]
pub struct NoApplets;

impl AppletCompiler for NoApplets {
    fn compile(&self, _code: &str) -> Result<Hook, String> {
        Err("applets are not supported".to_string())
    }
}

/// Outcome of a successful [`LayoutEngine::read_skin`]
#[derive(Debug)]
pub struct BindReport {
    /// Name of the fragment that was bound, or `<embedded-in-Class>`
    pub fragment: String,
    /// Non-fatal problems met while binding
    pub diagnostics: Diagnostics,
}

/// Layout engine that binds skin fragments onto screens
pub struct LayoutEngine {
    registry: ComponentRegistry,
    applets: Box<dyn AppletCompiler>,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutEngine {
    /// Create a layout engine with no registered components
    pub fn new() -> Self {
        Self::with_registry(ComponentRegistry::new())
    }

    /// Create with a custom registry
    pub fn with_registry(registry: ComponentRegistry) -> Self {
        Self {
            registry,
            applets: Box::new(NoApplets),
        }
    }

    pub fn with_applets(mut self, applets: Box<dyn AppletCompiler>) -> Self {
        self.applets = applets;
        self
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ComponentRegistry {
        &mut self.registry
    }

    /// Bind the first suitable fragment in `names` onto `screen`
    ///
    /// A fragment is suitable when it exists and declares every mandatory
    /// widget of the screen. Without one, the screen's embedded skin is
    /// used, and failing that an empty screen. Every GUI element of the
    /// screen must be bound by name, otherwise the screen cannot be shown.
    pub fn read_skin(
        &self,
        skin: &Skin,
        screen: &mut Screen,
        names: &[&str],
        surface: u32,
    ) -> Result<BindReport, SkinError> {
        let mut diagnostics = Diagnostics::new();

        let (name, root, base) = match self.select_fragment(skin, screen, names) {
            Some((name, fragment)) => (
                name.to_string(),
                Rc::clone(&fragment.element),
                Some(fragment.base.clone()),
            ),
            None => {
                let name = format!("<embedded-in-{}>", screen.class_name());
                let root = embedded_root(skin, screen, &name, surface)?;
                (name, root, None)
            }
        };

        crate::log!(
            "[Skin] Processing screen '{}' for module '{}'",
            name,
            screen.class_name()
        );

        screen.clear_bindings();

        let desktop = skin.registry().surface_size(surface);
        let desktop = Rect::new(0, 0, desktop.width, desktop.height);
        let scale = match root.attr("resolution") {
            Some(resolution) => match parse_int_pair(resolution) {
                Ok((w, h)) => Scale::new(
                    AxisScale::new(desktop.width, w),
                    AxisScale::new(desktop.height, h),
                ),
                Err(err) => {
                    diagnostics.report(AttributeError::invalid("resolution", resolution, err));
                    Scale::IDENTITY
                }
            },
            None => Scale::IDENTITY,
        };
        screen.set_scale(scale);

        let mut binder = Binder {
            engine: self,
            skin,
            screen,
            name,
            base,
            surface,
            scale,
            used: BTreeSet::new(),
            inlining: Vec::new(),
            diagnostics,
        };

        let mut desktop_context = LayoutContext::stacking(desktop, scale, skin.registry().skin_factor());
        let (attrs, placement) = binder.collect(&root, &mut desktop_context, &["name", "id"]);
        let window_class = binder.screen.class_name().to_string();
        let ctx = binder.attribute_context();
        if let Err(err) = apply_all(
            &mut binder.screen.window,
            attrs,
            &ctx,
            &window_class,
            &mut binder.diagnostics,
        ) {
            binder.diagnostics.report(err);
        }

        let rect = placement.map(|p| p.rect()).unwrap_or(desktop);
        let mut context = LayoutContext::sequential(rect, scale, skin.registry().skin_factor());
        context.reset_origin();
        binder.process_screen(&root, &mut context);

        let unused: Vec<String> = binder
            .screen
            .element_names()
            .filter(|n| !binder.used.contains(*n))
            .filter(|n| {
                binder
                    .screen
                    .element(n)
                    .is_some_and(|e| e.is_gui_component())
            })
            .map(str::to_string)
            .collect();
        if !unused.is_empty() {
            return Err(SkinError::Consistency {
                screen: binder.name,
                components: unused,
            });
        }

        Ok(BindReport {
            fragment: binder.name,
            diagnostics: binder.diagnostics,
        })
    }

    /// First fragment in `names` that offers every mandatory widget
    fn select_fragment<'s>(
        &self,
        skin: &'s Skin,
        screen: &Screen,
        names: &[&'s str],
    ) -> Option<(&'s str, &'s Fragment)> {
        for &name in names {
            let Some(fragment) = skin.fragment(name) else {
                continue;
            };
            let accepted = match screen.mandatory_widgets() {
                None | Some([]) => true,
                Some(required) => {
                    let declared = skin.find_widgets(name);
                    required.iter().all(|w| declared.contains(w))
                }
            };
            if accepted {
                return Some((name, fragment));
            }
            crate::log!(
                "[Skin] Warning: Skin screen '{}' rejected as it does not offer all the mandatory widgets '{}'!",
                name,
                screen.mandatory_widgets().unwrap_or_default().join(", ")
            );
        }
        None
    }
}

/// The screen's own skin, parsed once and cached on the screen
fn embedded_root(
    skin: &Skin,
    screen: &mut Screen,
    name: &str,
    surface: u32,
) -> Result<Rc<Element>, SkinError> {
    if let Some(parsed) = &screen.parsed_skin {
        return Ok(Rc::clone(parsed));
    }

    let parsed = match screen.embedded_skin() {
        Some(EmbeddedSkin::Single(text)) => Some(parse_document(text, name)?),
        Some(EmbeddedSkin::Template { template, values }) => {
            crate::log!("[Skin] Resizable embedded skin template found in '{}'", name);
            let text = fill_template(template, values, skin.registry().skin_factor());
            Some(parse_document(&text, name)?)
        }
        Some(EmbeddedSkin::Candidates(candidates)) => {
            let mut chosen = None;
            for text in candidates {
                let candidate = parse_document(text, name)?;
                let for_surface = match candidate.attr("id") {
                    None => true,
                    Some(id) => id.trim().parse::<u32>().ok() == Some(surface),
                };
                if candidate.tag == "screen" && for_surface {
                    chosen = Some(candidate);
                    break;
                }
            }
            if chosen.is_none() {
                crate::log!("[Skin] No suitable screen found in '{}'", name);
            }
            chosen
        }
        None => None,
    };

    let root = parsed.unwrap_or_else(|| {
        crate::log!("[Skin] No skin to read or screen to display for '{}'", name);
        Rc::new(Element::new("screen"))
    });
    screen.parsed_skin = Some(Rc::clone(&root));
    Ok(root)
}

/// Fill `%d` placeholders in order with `values` times the skin factor
fn fill_template(template: &str, values: &[i32], factor: f64) -> String {
    let mut out = String::with_capacity(template.len());
    let mut values = values.iter();
    let mut rest = template;
    while let Some(i) = rest.find("%d") {
        out.push_str(&rest[..i]);
        match values.next() {
            Some(v) => out.push_str(&((*v as f64 * factor) as i32).to_string()),
            None => out.push_str("%d"),
        }
        rest = &rest[i + 2..];
    }
    out.push_str(rest);
    out
}

/// State for binding one fragment onto one screen
struct Binder<'a> {
    engine: &'a LayoutEngine,
    skin: &'a Skin,
    screen: &'a mut Screen,
    name: String,
    base: Option<PathBuf>,
    surface: u32,
    scale: Scale,
    /// Element names bound so far, including generated addon names
    used: BTreeSet<String>,
    /// Fragments currently inlined by panels
    inlining: Vec<String>,
    diagnostics: Diagnostics,
}

impl<'a> Binder<'a> {
    fn attribute_context(&self) -> AttributeContext<'a> {
        let skin: &'a Skin = self.skin;
        AttributeContext {
            registry: skin.registry(),
            services: skin.services(),
            scale: self.scale,
            surface: self.surface,
        }
    }

    fn process_screen(&mut self, element: &Element, ctx: &mut LayoutContext) {
        for child in &element.children {
            if self.filtered_out(child) {
                continue;
            }
            let result = match child.tag.as_str() {
                "widget" => self.process_widget(child, ctx),
                "applet" => self.process_applet(child),
                "eLabel" => self.process_decoration(child, ctx, DecorationKind::Label),
                "ePixmap" => self.process_decoration(child, ctx, DecorationKind::Pixmap),
                "panel" => self.process_panel(child, ctx),
                _ => Ok(()),
            };
            if let Err(err) = result {
                crate::log!("[Skin] Error in screen '{}' widget '{}'", self.name, child.tag);
                self.diagnostics.report(err);
            }
        }
    }

    /// `conditional` first, then `objectTypes`
    fn filtered_out(&self, node: &Element) -> bool {
        if let Some(conditional) = node.attr("conditional").filter(|c| !c.is_empty()) {
            if !conditional
                .split(',')
                .any(|name| self.screen.contains(name.trim()))
            {
                return true;
            }
        }

        let object_types: Vec<&str> = node
            .attr("objectTypes")
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .collect();
        if let [target, kinds @ ..] = object_types.as_slice() {
            if !kinds.is_empty() {
                return match self.screen.class_of(target) {
                    Some(class) => !kinds.contains(&class),
                    None => true,
                };
            }
        }
        false
    }

    /// Resolve files, place `position`/`size` and gather the rest in
    /// document order
    fn collect(
        &mut self,
        node: &Element,
        ctx: &mut LayoutContext,
        ignore: &[&str],
    ) -> (AttributeList, Option<Placement>) {
        let mut attrs = AttributeList::new();
        let mut position = None;
        let mut size = None;
        let mut font = None;

        for (name, value) in &node.attributes {
            if ignore.contains(&name.as_str()) {
                continue;
            }
            match name.as_str() {
                "position" => position = Some(value.as_str()),
                "size" => size = Some(value.as_str()),
                "font" => {
                    font = Some(value.as_str());
                    attrs.push((name.clone(), AttrValue::text(value.as_str())));
                }
                _ if FILE_ATTRIBUTES.contains(&name.as_str()) => {
                    let path = self.skin.services().paths.resolve(
                        Scope::CurrentSkin,
                        value,
                        self.base.as_deref(),
                    );
                    attrs.push((name.clone(), AttrValue::text(path.to_string_lossy())));
                }
                _ => attrs.push((name.clone(), AttrValue::text(value.as_str()))),
            }
        }

        let metrics = font.map(|f| self.skin.registry().font_metrics(f));
        let mut placement = None;
        if let Some(position) = position {
            let placed = ctx.place(position, size, metrics, &mut self.diagnostics);
            attrs.push(("position".to_string(), AttrValue::Point(placed.position)));
            attrs.push(("size".to_string(), AttrValue::Size(placed.size)));
            placement = Some(placed);
        } else if size.is_some() {
            let size = ctx.eval_size(size, metrics, &mut self.diagnostics);
            attrs.push(("size".to_string(), AttrValue::Size(size)));
        }
        (attrs, placement)
    }

    fn process_widget(&mut self, node: &Element, ctx: &mut LayoutContext) -> Result<(), BindingError> {
        let name = node.attr("name").filter(|n| !n.is_empty());
        let source = node.attr("source").filter(|s| !s.is_empty());
        let addon = node.attr("addon").filter(|a| !a.is_empty());

        if let Some(name) = name {
            self.bind_element(node, name, ctx)
        } else if let Some(source) = source {
            self.bind_source(node, source, ctx)
        } else if let Some(addon) = addon {
            self.bind_addon(node, addon, ctx)
        } else {
            Err(BindingError::NoTarget)
        }
    }

    fn bind_element(
        &mut self,
        node: &Element,
        name: &str,
        ctx: &mut LayoutContext,
    ) -> Result<(), BindingError> {
        self.used.insert(name.to_string());
        let class_name = match self.screen.element(name) {
            Some(element) => element.class_name().to_string(),
            None => {
                return Err(BindingError::MissingComponent {
                    name: name.to_string(),
                    screen: self.name.clone(),
                })
            }
        };

        let (attrs, _) = self.collect(node, ctx, &["name"]);
        let actx = self.attribute_context();
        if let Some(element) = self.screen.element_mut(name) {
            apply_all(element.widget_mut(), attrs, &actx, &class_name, &mut self.diagnostics)?;
        }
        Ok(())
    }

    fn bind_source(
        &mut self,
        node: &Element,
        source: &str,
        ctx: &mut LayoutContext,
    ) -> Result<(), BindingError> {
        let (mut stage, label_name) = self.resolve_source(source)?;

        let render = node
            .attr("render")
            .filter(|r| !r.is_empty())
            .ok_or_else(|| BindingError::MissingRenderAttribute(label_name.clone()))?;

        let mut converters = Vec::new();
        for convert in node.children_named("convert") {
            let kind = convert
                .attr("type")
                .filter(|t| !t.is_empty())
                .ok_or(BindingError::ConverterWithoutType)?;
            let nostrip = convert.attr("nostrip").is_some_and(|v| truthy(v, "nostrip"));
            let arguments = if nostrip {
                convert.text()
            } else {
                convert.text().trim()
            };
            let factory = self
                .engine
                .registry
                .converter(kind)
                .ok_or_else(|| BindingError::UnknownConverter(kind.to_string()))?;
            converters.push((kind, arguments, factory));
        }

        let mut renderer = self
            .engine
            .registry
            .create_renderer(render)
            .ok_or_else(|| BindingError::UnknownRenderer(render.to_string()))?;

        let (attrs, _) = self.collect(node, ctx, &["render", "source"]);
        let actx = self.attribute_context();
        let class_name = renderer.class_name().to_string();
        apply_all(renderer.widget_mut(), attrs, &actx, &class_name, &mut self.diagnostics)?;

        // Only a renderer that was fully built gets linked into the pipeline
        for (kind, arguments, factory) in converters {
            stage = stage.connect_converter(kind, arguments, || factory(arguments));
        }

        self.screen.renderers.push(BoundRenderer {
            kind: render.to_string(),
            element: renderer,
            input: stage,
            label_name,
        });
        Ok(())
    }

    /// Follow a dotted source path through related screens, replacing
    /// obsolete sources until a live one is found
    fn resolve_source(&self, path: &str) -> Result<(Rc<Stage>, String), BindingError> {
        let mut current = path.to_string();
        let mut seen = HashSet::new();

        loop {
            let segments: Vec<&str> = current.split('.').collect();
            let Some((last, related)) = segments.split_last() else {
                break;
            };

            let mut screen: &Screen = &*self.screen;
            for segment in related {
                screen = screen.related(segment).map(|s| &**s).ok_or_else(|| {
                    BindingError::MissingRelatedScreen {
                        path: current.clone(),
                        screen: self.name.clone(),
                    }
                })?;
            }

            match screen.source(last) {
                Some(SourceEntry::Live(stage)) => return Ok((Rc::clone(stage), current)),
                Some(SourceEntry::Obsolete {
                    replacement,
                    removal_date,
                    description,
                }) => {
                    crate::log!(
                        "[Skin] WARNING: Skin '{}' uses obsolete source '{}', use '{}' instead! It will be removed {}.",
                        self.name,
                        current,
                        replacement,
                        removal_date
                    );
                    if let Some(description) = description {
                        crate::log!("[Skin] Source description: '{}'", description);
                    }
                    if !seen.insert(current.clone()) {
                        break;
                    }
                    current = replacement.clone();
                }
                None => break,
            }
        }

        Err(BindingError::MissingSource {
            source_name: current,
            screen: self.name.clone(),
        })
    }

    fn bind_addon(
        &mut self,
        node: &Element,
        addon: &str,
        ctx: &mut LayoutContext,
    ) -> Result<(), BindingError> {
        let mut element = self
            .engine
            .registry
            .create_addon(addon)
            .ok_or_else(|| BindingError::UnknownAddon(addon.to_string()))?;
        let connection = node
            .attr("connection")
            .filter(|c| !c.is_empty())
            .ok_or_else(|| BindingError::MissingConnection(addon.to_string()))?;

        let prefix = format!("{}_{}_{}_", self.name, addon, connection);
        let mut i = 0;
        while self.used.contains(&format!("{}{}", prefix, i)) {
            i += 1;
        }
        let generated = format!("{}{}", prefix, i);
        self.used.insert(generated.clone());

        element.connect_related(connection, &*self.screen);

        let (attrs, _) = self.collect(node, ctx, &["addon", "connection"]);
        let actx = self.attribute_context();
        let class_name = element.class_name().to_string();
        let applied = apply_all(element.widget_mut(), attrs, &actx, &class_name, &mut self.diagnostics);

        self.screen.add_element(generated, element);
        applied.map_err(BindingError::from)
    }

    fn process_applet(&mut self, node: &Element) -> Result<(), BindingError> {
        let hook = self
            .engine
            .applets
            .compile(node.text().trim())
            .map_err(BindingError::AppletCompile)?;
        match node.attr("type") {
            Some("onLayoutFinish") => self.screen.add_layout_finish_hook(hook),
            Some("onContentChanged") => self.screen.add_content_changed_hook(hook),
            other => {
                return Err(BindingError::UnknownAppletTrigger(
                    other.unwrap_or_default().to_string(),
                ))
            }
        }
        Ok(())
    }

    fn process_decoration(
        &mut self,
        node: &Element,
        ctx: &mut LayoutContext,
        kind: DecorationKind,
    ) -> Result<(), BindingError> {
        let (attrs, _) = self.collect(node, ctx, &["name"]);
        let actx = self.attribute_context();
        let class_name = match kind {
            DecorationKind::Label => "eLabel",
            DecorationKind::Pixmap => "ePixmap",
        };
        let mut widget = Widget::new();
        apply_all(&mut widget, attrs, &actx, class_name, &mut self.diagnostics)?;
        self.screen
            .additional_widgets
            .push(AdditionalWidget { kind, widget });
        Ok(())
    }

    /// Inline a named fragment at the current context, then lay out the
    /// panel's own children in a context of their own
    fn process_panel(&mut self, node: &Element, ctx: &mut LayoutContext) -> Result<(), BindingError> {
        if let Some(name) = node.attr("name").filter(|n| !n.is_empty()) {
            let skin: &'a Skin = self.skin;
            if self.inlining.iter().any(|n| n == name) {
                self.diagnostics.report(BindingError::PanelCycle(name.to_string()));
            } else if let Some(fragment) = skin.fragment(name) {
                self.inlining.push(name.to_string());
                self.process_screen(&fragment.element, ctx);
                self.inlining.pop();
            } else {
                self.diagnostics
                    .report(BindingError::UnknownFragment(name.to_string()));
            }
        }

        let position = node.attr("position");
        let size = node.attr("size");
        let Some(position) = position else {
            // A bare `<panel name=.../>` only inlines
            if node.children.is_empty() {
                return Ok(());
            }
            return Err(BindingError::PanelContext {
                position: None,
                size: size.map(str::to_string),
            });
        };
        let mode = LayoutMode::from_layout_attr(node.attr("layout"));
        let font = node.attr("font").map(|f| self.skin.registry().font_metrics(f));
        let mut child = ctx.derive(mode, position, size, font, &mut self.diagnostics);
        self.process_screen(node, &mut child);
        Ok(())
    }
}
