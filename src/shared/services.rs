//! Collaborator services
//!
//! Path resolution, image loading and translation are owned by the host.
//! The engine only talks to them through these narrow traits, and the
//! `Fs*` defaults are enough for tests and simple embedders.

use std::path::{Path, PathBuf};

use crate::shared::config::PathsConfig;
use crate::types::{Pixmap, Size};

/// Lookup roots for scoped file names
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Scope {
    /// General skin assets
    Skin,
    /// Files of the active skin, with user overrides
    CurrentSkin,
    /// Files of the active display skin
    CurrentDisplaySkin,
    Fonts,
}

pub trait PathResolver {
    /// Resolve `name` within `scope`; `prefix` is the directory of the
    /// document asking, tried first for relative names
    fn resolve(&self, scope: Scope, name: &str, prefix: Option<&Path>) -> PathBuf;
}

pub trait PixmapLoader {
    /// Load an image for a surface, optionally at a requested size
    fn load(&self, path: &Path, surface: u32, size: Option<Size>) -> Option<Pixmap>;
}

pub trait Translator {
    fn translate(&self, text: &str) -> String;
}

/// Resolver over the directories in `[paths]`
#[derive(Clone, Debug)]
pub struct FsPathResolver {
    skin_dir: PathBuf,
    display_skin_dir: PathBuf,
    fonts_dir: PathBuf,
    user_dir: PathBuf,
}

impl FsPathResolver {
    pub fn new(paths: &PathsConfig) -> Self {
        Self {
            skin_dir: paths.skin_dir(),
            display_skin_dir: paths.display_skin_dir(),
            fonts_dir: paths.fonts_dir(),
            user_dir: paths.user_dir(),
        }
    }

    fn roots(&self, scope: Scope) -> Vec<PathBuf> {
        match scope {
            Scope::Skin => vec![self.skin_dir.clone(), self.user_dir.clone()],
            Scope::CurrentSkin => vec![self.user_dir.clone(), self.skin_dir.clone()],
            Scope::CurrentDisplaySkin => vec![self.display_skin_dir.clone()],
            Scope::Fonts => vec![self.fonts_dir.clone(), self.skin_dir.join("fonts")],
        }
    }
}

impl PathResolver for FsPathResolver {
    fn resolve(&self, scope: Scope, name: &str, prefix: Option<&Path>) -> PathBuf {
        let name = Path::new(name);
        if name.is_absolute() {
            return name.to_path_buf();
        }

        let mut candidates: Vec<PathBuf> = Vec::new();
        if let Some(prefix) = prefix {
            candidates.push(prefix.join(name));
        }
        candidates.extend(self.roots(scope).into_iter().map(|root| root.join(name)));

        match candidates.iter().find(|c| c.exists()) {
            Some(found) => found.clone(),
            None => self.roots(scope)[0].join(name),
        }
    }
}

/// Loader that accepts any existing file
///
/// Decoding is left to the rendering layer; the handle remembers the path
/// and the requested size.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsPixmapLoader;

impl PixmapLoader for FsPixmapLoader {
    fn load(&self, path: &Path, _surface: u32, size: Option<Size>) -> Option<Pixmap> {
        // "name.png#option" selects a variant of the same file
        let path = match path.to_str().and_then(|s| s.find('#').map(|i| &s[..i])) {
            Some(stripped) => PathBuf::from(stripped),
            None => path.to_path_buf(),
        };
        if !path.is_file() {
            return None;
        }
        Some(Pixmap {
            path,
            size: size.filter(|s| !s.is_empty()),
        })
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityTranslator;

impl Translator for IdentityTranslator {
    fn translate(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Container for the collaborator services
pub struct Services {
    pub paths: Box<dyn PathResolver>,
    pub pixmaps: Box<dyn PixmapLoader>,
    pub translator: Box<dyn Translator>,
}

impl Services {
    /// Filesystem-backed services over the configured directories
    pub fn new(paths: &PathsConfig) -> Self {
        Self {
            paths: Box::new(FsPathResolver::new(paths)),
            pixmaps: Box::new(FsPixmapLoader),
            translator: Box::new(IdentityTranslator),
        }
    }

    pub fn with_translator(mut self, translator: Box<dyn Translator>) -> Self {
        self.translator = translator;
        self
    }
}
