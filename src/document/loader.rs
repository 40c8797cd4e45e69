//! Skin document loading and the fragment catalog
//!
//! Skins are loaded in order of priority, the highest last. Registry values
//! cascade key by key and a screen fragment loaded later replaces one of the
//! same name.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::document::node::Element;
use crate::document::parser::parse_document;
use crate::errors::{Diagnostics, RegistryError, SkinError};
use crate::registry::{MergeContext, RegistryStore};
use crate::shared::config::{
    EngineConfig, SkinSettings, DEFAULT_DISPLAY_SKIN, DEFAULT_SKIN, DISPLAY_SURFACE, GUI_SURFACE,
};
use crate::shared::{Scope, Services};

pub const EMERGENCY_SKIN: &str = "skin_default/skin.xml";
pub const SUBTITLE_SKIN: &str = "skin_subtitles.xml";
pub const USER_SKIN: &str = "skin_user.xml";

/// Last resort when no primary skin loads; must always parse
const EMERGENCY_DOCUMENT: &str = r##"<skin>
	<colors>
		<color name="background" value="#00000000" />
		<color name="foreground" value="#00ffffff" />
	</colors>
	<windowstyle id="0">
		<title offset="20,5" font="Regular;20" />
		<color name="Background" color="background" />
		<color name="LabelForeground" color="foreground" />
		<color name="WindowTitleForeground" color="foreground" />
	</windowstyle>
</skin>"##;

/// A named screen fragment and the directory its assets are relative to
#[derive(Clone, Debug)]
pub struct Fragment {
    pub element: Rc<Element>,
    pub base: PathBuf,
}

/// A windowstyle block kept for replay
#[derive(Clone, Debug)]
struct RecordedStyle {
    element: Rc<Element>,
    base: PathBuf,
    scope: Scope,
    surface: u32,
}

type LoadCallback = Box<dyn FnMut()>;

/// Loaded skin state: registry values plus the fragment catalog
pub struct Skin {
    services: Services,
    registry: RegistryStore,
    settings: SkinSettings,
    fragments: HashMap<String, Fragment>,
    window_styles: BTreeMap<u32, RecordedStyle>,
    diagnostics: Diagnostics,
    /// Documents currently being loaded, to stop include cycles
    loading: Vec<PathBuf>,
    current_primary: Option<String>,
    current_display: Option<String>,
    callbacks: Vec<(usize, LoadCallback)>,
    next_callback_id: usize,
    callbacks_ran: bool,
}

impl Skin {
    /// Create an empty skin over filesystem services from the configuration
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_services(config, Services::new(&config.paths))
    }

    pub fn with_services(config: &EngineConfig, services: Services) -> Self {
        let surfaces = config.surface.iter().map(|s| (s.id, s.size()));
        Self {
            services,
            registry: RegistryStore::with_surfaces(surfaces),
            settings: config.skin.clone(),
            fragments: HashMap::new(),
            window_styles: BTreeMap::new(),
            diagnostics: Diagnostics::new(),
            loading: Vec::new(),
            current_primary: None,
            current_display: None,
            callbacks: Vec::new(),
            next_callback_id: 0,
            callbacks_ran: false,
        }
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Load every skin in priority order
    ///
    /// Emergency and subtitle skins come first, then the display skin, the
    /// primary skin and finally the optional user skin. Successful choices
    /// are written back to the settings.
    pub fn init(&mut self) {
        self.load(EMERGENCY_SKIN, Scope::CurrentSkin, GUI_SURFACE);
        self.load(SUBTITLE_SKIN, Scope::CurrentSkin, GUI_SURFACE);

        let candidates = [self.settings.display.clone(), DEFAULT_DISPLAY_SKIN.to_string()];
        self.current_display = self.load_first(
            &candidates,
            Scope::CurrentDisplaySkin,
            DISPLAY_SURFACE,
            "display",
        );
        if let Some(display) = &self.current_display {
            self.settings.display = display.clone();
        }

        let candidates = [self.settings.primary.clone(), DEFAULT_SKIN.to_string()];
        self.current_primary =
            self.load_first(&candidates, Scope::CurrentSkin, GUI_SURFACE, "GUI");
        if let Some(primary) = self.current_primary.clone() {
            self.settings.primary = primary;
        } else {
            crate::log!("[Skin] Error: No GUI skin could be loaded, using the embedded emergency skin");
            self.load_str(EMERGENCY_DOCUMENT, Path::new(""), Scope::CurrentSkin, GUI_SURFACE);
        }

        self.load_user_skin();

        if !self.callbacks_ran {
            self.callbacks_ran = true;
            for (_, callback) in self.callbacks.iter_mut() {
                callback();
            }
        }
    }

    /// Clear everything and run [`init`](Self::init) again
    pub fn reload(&mut self) {
        self.fragments.clear();
        self.window_styles.clear();
        self.registry.reset();
        self.init();
    }

    fn load_first(
        &mut self,
        candidates: &[String],
        scope: Scope,
        surface: u32,
        kind: &str,
    ) -> Option<String> {
        let mut failed: Vec<&String> = Vec::new();
        for candidate in candidates {
            if failed.contains(&candidate) {
                continue;
            }
            if self.load(candidate, scope, surface) {
                return Some(candidate.clone());
            }
            crate::log!("[Skin] Error: Adding {} skin '{}' has failed!", kind, candidate);
            failed.push(candidate);
        }
        None
    }

    /// A skin specific `skin_user_<dir>.xml`, else the generic user skin
    fn load_user_skin(&mut self) {
        let primary = self.settings.primary.clone();
        if let Some(dir) = Path::new(&primary).parent().and_then(|d| d.to_str()) {
            if !dir.is_empty() {
                let name = format!("skin_user_{}.xml", dir);
                let path = self.services.paths.resolve(Scope::CurrentSkin, &name, None);
                if path.is_file() {
                    self.load(&name, Scope::CurrentSkin, GUI_SURFACE);
                    return;
                }
            }
        }
        let path = self.services.paths.resolve(Scope::CurrentSkin, USER_SKIN, None);
        if path.is_file() {
            self.load(USER_SKIN, Scope::CurrentSkin, GUI_SURFACE);
        }
    }

    /// Load one skin file; failures are reported and yield `false`
    pub fn load(&mut self, filename: &str, scope: Scope, surface: u32) -> bool {
        let path = self.services.paths.resolve(scope, filename, None);
        crate::log!("[Skin] Loading skin file '{}'.", path.display());
        match self.load_path(&path, scope, surface) {
            Ok(()) => {
                crate::log!("[Skin] Loading skin file '{}' complete.", path.display());
                true
            }
            Err(err) => {
                self.diagnostics.report(err);
                false
            }
        }
    }

    /// Load a document held in memory, as if read from `path`
    pub fn load_str(&mut self, source: &str, path: &Path, scope: Scope, surface: u32) -> bool {
        let result = parse_document(source, &path.display().to_string())
            .and_then(|root| self.merge_document(root, path, scope, surface))
            .map(|()| self.reload_window_styles());
        match result {
            Ok(()) => true,
            Err(err) => {
                self.diagnostics.report(err);
                false
            }
        }
    }

    fn load_path(&mut self, path: &Path, scope: Scope, surface: u32) -> Result<(), SkinError> {
        if self.loading.iter().any(|p| p == path) {
            return Err(RegistryError::IncludeCycle(path.to_path_buf()).into());
        }
        let source = std::fs::read_to_string(path).map_err(|source| SkinError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let root = parse_document(&source, &path.display().to_string())?;

        self.loading.push(path.to_path_buf());
        let merged = self.merge_document(root, path, scope, surface);
        self.loading.pop();
        merged?;

        self.reload_window_styles();
        Ok(())
    }

    /// Merge globals, register fragments and follow includes in document
    /// order
    fn merge_document(
        &mut self,
        root: Rc<Element>,
        path: &Path,
        scope: Scope,
        surface: u32,
    ) -> Result<(), SkinError> {
        if root.tag != "skin" {
            return Err(RegistryError::BadRoot(root.tag.clone()).into());
        }
        let base = path.parent().map(Path::to_path_buf).unwrap_or_default();

        for block in &root.children {
            match block.tag.as_str() {
                "include" => {
                    let Some(filename) = block.attr("filename").filter(|f| !f.is_empty()) else {
                        continue;
                    };
                    let included = self.services.paths.resolve(scope, filename, Some(&base));
                    if !included.is_file() {
                        return Err(RegistryError::IncludeNotFound(included).into());
                    }
                    // A broken include is reported but does not fail its parent
                    if let Err(err) = self.load_path(&included, scope, surface) {
                        if matches!(err, SkinError::Registry(RegistryError::IncludeCycle(_))) {
                            return Err(err);
                        }
                        self.diagnostics.report(err);
                    }
                }
                "screen" => {
                    let Some(name) = block.attr("name").filter(|n| !n.is_empty()) else {
                        continue;
                    };
                    let for_surface = match block.attr("id") {
                        None => true,
                        Some(id) => id.trim().parse::<u32>().ok() == Some(surface),
                    };
                    if for_surface {
                        self.fragments.insert(
                            name.to_string(),
                            Fragment {
                                element: Rc::clone(block),
                                base: base.clone(),
                            },
                        );
                    }
                }
                _ => {
                    let ctx = MergeContext {
                        services: &self.services,
                        scope,
                        base: &base,
                        surface,
                    };
                    self.registry
                        .merge_block(block, &ctx, &mut self.diagnostics)?;

                    if block.tag == "windowstyle" {
                        let id = block
                            .attr("id")
                            .and_then(|id| id.trim().parse::<u32>().ok())
                            .unwrap_or(GUI_SURFACE);
                        self.window_styles.insert(
                            id,
                            RecordedStyle {
                                element: Rc::clone(block),
                                base: base.clone(),
                                scope,
                                surface,
                            },
                        );
                    }
                }
            }
        }
        Ok(())
    }

    /// Replay every recorded windowstyle block
    pub fn reload_window_styles(&mut self) {
        for recorded in self.window_styles.values() {
            let ctx = MergeContext {
                services: &self.services,
                scope: recorded.scope,
                base: &recorded.base,
                surface: recorded.surface,
            };
            if let Err(err) = self
                .registry
                .merge_block(&recorded.element, &ctx, &mut self.diagnostics)
            {
                self.diagnostics.report(err);
            }
        }
    }

    // ========================================================================
    // Fragment catalog
    // ========================================================================

    pub fn fragment(&self, name: &str) -> Option<&Fragment> {
        self.fragments.get(name)
    }

    pub fn has_fragment(&self, name: &str) -> bool {
        self.fragments.contains_key(name)
    }

    /// First name in `names` with a loaded fragment
    pub fn find_skin_screen<'a>(&self, names: &[&'a str]) -> Option<&'a str> {
        names.iter().copied().find(|n| self.fragments.contains_key(*n))
    }

    /// Widget, source and connection names a fragment declares
    ///
    /// A static scan of the document: named panels are followed into their
    /// fragments, nothing is bound.
    pub fn find_widgets(&self, name: &str) -> BTreeSet<String> {
        let mut found = BTreeSet::new();
        let mut visited = BTreeSet::new();
        self.collect_widgets(name, &mut found, &mut visited);
        found
    }

    fn collect_widgets(&self, name: &str, found: &mut BTreeSet<String>, visited: &mut BTreeSet<String>) {
        if !visited.insert(name.to_string()) {
            return;
        }
        if let Some(fragment) = self.fragments.get(name) {
            self.scan_element(&fragment.element, found, visited);
        }
    }

    fn scan_element(&self, element: &Element, found: &mut BTreeSet<String>, visited: &mut BTreeSet<String>) {
        for child in &element.children {
            match child.tag.as_str() {
                "widget" => {
                    for key in ["name", "source"] {
                        if let Some(v) = child.attr(key) {
                            found.insert(v.to_string());
                        }
                    }
                    if let Some(connection) = child.attr("connection") {
                        found.extend(connection.split(',').map(|c| c.trim().to_string()));
                    }
                }
                "panel" => {
                    if let Some(n) = child.attr("name").filter(|n| !n.is_empty()) {
                        self.collect_widgets(n, found, visited);
                    }
                    self.scan_element(child, found, visited);
                }
                _ => {}
            }
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn registry(&self) -> &RegistryStore {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut RegistryStore {
        &mut self.registry
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    /// Skin choices, updated by [`init`](Self::init) to what actually loaded
    pub fn settings(&self) -> &SkinSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut SkinSettings {
        &mut self.settings
    }

    pub fn current_primary(&self) -> Option<&str> {
        self.current_primary.as_deref()
    }

    pub fn current_display(&self) -> Option<&str> {
        self.current_display.as_deref()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Diagnostics {
        std::mem::take(&mut self.diagnostics)
    }

    /// Register a callback to run once after the first [`init`](Self::init)
    pub fn add_callback(&mut self, callback: impl FnMut() + 'static) -> usize {
        let id = self.next_callback_id;
        self.next_callback_id += 1;
        self.callbacks.push((id, Box::new(callback)));
        id
    }

    pub fn remove_callback(&mut self, id: usize) {
        self.callbacks.retain(|(i, _)| *i != id);
    }
}
