//! Cascading registry of skin-wide values
//!
//! Documents are merged in load priority order; a later merge overrides
//! earlier entries with the same key and leaves the others alone.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::document::Element;
use crate::errors::{Diagnostics, RegistryError};
use crate::expr;
use crate::registry::parameter::{parse_parameter, scale_or_report, Parameter};
use crate::registry::window_style::{BorderPos, BorderSet, StyleColor, WindowStyle};
use crate::shared::config::GUI_SURFACE;
use crate::shared::{Scope, Services};
use crate::types::{AxisScale, Color, Font, FontAlias, FontMetrics, Margins, Pixmap, Size};

/// Reference height the skin factor is measured against
const BASE_HEIGHT: f64 = 720.0;

const SEED_COLORS: [(&str, u32); 6] = [
    ("key_back", 0x0031_3131),
    ("key_blue", 0x0018_188b),
    ("key_green", 0x001f_771f),
    ("key_red", 0x009f_1313),
    ("key_text", 0x00ff_ffff),
    ("key_yellow", 0x00a0_8500),
];

fn body_font() -> FontAlias {
    FontAlias::new("Regular", 20, 24, 18)
}

/// A registered physical font face
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontFace {
    pub path: PathBuf,
    pub scale: i32,
    pub replacement: bool,
    pub render: i32,
}

/// Subtitle rendering style for one face
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubtitleStyle {
    pub font: Font,
    pub foreground: Color,
    /// False when the document left the foreground to the stream
    pub have_color: bool,
    pub border_color: Color,
    pub border_width: i32,
}

/// Where a block being merged came from
pub struct MergeContext<'a> {
    pub services: &'a Services,
    pub scope: Scope,
    /// Directory of the document, for relative file names
    pub base: &'a Path,
    pub surface: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RegistryStore {
    colors: HashMap<String, Color>,
    fonts: HashMap<String, FontAlias>,
    font_faces: HashMap<String, FontFace>,
    parameters: HashMap<String, Parameter>,
    menus: HashMap<String, String>,
    menu_icons: HashMap<String, String>,
    screens: HashMap<String, String>,
    setups: HashMap<String, String>,
    switch_pixmaps: HashMap<String, Pixmap>,
    window_styles: HashMap<u32, WindowStyle>,
    margins: HashMap<u32, Margins>,
    subtitle_styles: HashMap<String, SubtitleStyle>,
    /// Desktop sizes; owned by the host and not part of the reset
    surfaces: HashMap<u32, Size>,
}

impl Default for RegistryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryStore {
    /// Create a store holding only the built-in seed values
    pub fn new() -> Self {
        let mut store = Self {
            colors: HashMap::new(),
            fonts: HashMap::new(),
            font_faces: HashMap::new(),
            parameters: HashMap::new(),
            menus: HashMap::new(),
            menu_icons: HashMap::new(),
            screens: HashMap::new(),
            setups: HashMap::new(),
            switch_pixmaps: HashMap::new(),
            window_styles: HashMap::new(),
            margins: HashMap::new(),
            subtitle_styles: HashMap::new(),
            surfaces: HashMap::new(),
        };
        store.seed();
        store
    }

    pub fn with_surfaces(surfaces: impl IntoIterator<Item = (u32, Size)>) -> Self {
        let mut store = Self::new();
        store.surfaces.extend(surfaces);
        store
    }

    fn seed(&mut self) {
        for (name, argb) in SEED_COLORS {
            self.colors.insert(name.to_string(), Color::from_argb(argb));
        }
        self.fonts.insert("Body".to_string(), body_font());
    }

    /// Drop everything merged so far and restore the seed values
    pub fn reset(&mut self) {
        self.colors.clear();
        self.fonts.clear();
        self.font_faces.clear();
        self.parameters.clear();
        self.menus.clear();
        self.menu_icons.clear();
        self.screens.clear();
        self.setups.clear();
        self.switch_pixmaps.clear();
        self.window_styles.clear();
        self.margins.clear();
        self.subtitle_styles.clear();
        self.seed();
    }

    // ========================================================================
    // Merging
    // ========================================================================

    /// Merge one top-level declaration block
    ///
    /// Tags without global declarations (`screen`, `include`, anything
    /// unknown) are ignored here.
    pub fn merge_block(
        &mut self,
        block: &Element,
        ctx: &MergeContext<'_>,
        diagnostics: &mut Diagnostics,
    ) -> Result<(), RegistryError> {
        match block.tag.as_str() {
            "output" => self.merge_output(block),
            "switchpixmap" => self.merge_switch_pixmaps(block, ctx),
            "colors" => self.merge_colors(block),
            "fonts" => self.merge_fonts(block, ctx, diagnostics),
            "parameters" => self.merge_parameters(block, diagnostics),
            "menus" => merge_images(&mut self.menus, block, "menu"),
            "menuicons" => merge_images(&mut self.menu_icons, block, "menuicon"),
            "screens" => merge_images(&mut self.screens, block, "screen"),
            "setups" => merge_images(&mut self.setups, block, "setup"),
            "subtitles" => self.merge_subtitles(block, diagnostics),
            "windowstyle" => self.merge_window_style(block, ctx, diagnostics),
            "margin" => self.merge_margin(block),
            _ => Ok(()),
        }
    }

    fn merge_output(&mut self, block: &Element) -> Result<(), RegistryError> {
        if surface_id(block)? != GUI_SURFACE {
            return Ok(());
        }
        for res in block.children_named("resolution") {
            let xres = int_attr(res, "xres")?.unwrap_or(720);
            let yres = int_attr(res, "yres")?.unwrap_or(576);
            // Palettes for other depths are not supported
            let _bpp = int_attr(res, "bpp")?.unwrap_or(32);
            crate::log!("[Skin] Resolution xres={}, yres={}", xres, yres);
            self.surfaces.insert(GUI_SURFACE, Size::new(xres, yres));

            let body = body_font();
            self.fonts.insert(
                "Body".to_string(),
                FontAlias::new(
                    body.family,
                    self.apply_skin_factor(body.size),
                    self.apply_skin_factor(body.height),
                    self.apply_skin_factor(body.width),
                ),
            );
        }
        Ok(())
    }

    fn merge_switch_pixmaps(
        &mut self,
        block: &Element,
        ctx: &MergeContext<'_>,
    ) -> Result<(), RegistryError> {
        for pixmap in block.children_named("pixmap") {
            let name = required(pixmap, "pixmap", "name")?;
            let filename = required(pixmap, "pixmap", "filename")?;
            let resolved = ctx.services.paths.resolve(ctx.scope, filename, Some(ctx.base));
            if !resolved.is_file() {
                return Err(RegistryError::PixmapNotFound(resolved));
            }
            let loaded = ctx
                .services
                .pixmaps
                .load(&resolved, ctx.surface, None)
                .ok_or(RegistryError::PixmapNotFound(resolved))?;
            self.switch_pixmaps.insert(name.to_string(), loaded);
        }
        Ok(())
    }

    fn merge_colors(&mut self, block: &Element) -> Result<(), RegistryError> {
        for color in block.children_named("color") {
            let name = required(color, "color", "name")?;
            let value = required(color, "color", "value")?;
            let parsed = self.parse_color(value)?;
            self.colors.insert(name.to_string(), parsed);
        }
        Ok(())
    }

    fn merge_fonts(
        &mut self,
        block: &Element,
        ctx: &MergeContext<'_>,
        diagnostics: &mut Diagnostics,
    ) -> Result<(), RegistryError> {
        for font in block.children_named("font") {
            let filename = font.attr("filename").unwrap_or("<NONAME>");
            let name = font.attr("name").unwrap_or("Regular");
            let scale = int_attr(font, "scale")?.unwrap_or(100);
            let replacement = font.attr("replacement").is_some_and(|v| !v.is_empty());
            let render = int_attr(font, "render")?.unwrap_or(0);

            let path = ctx.services.paths.resolve(Scope::Fonts, filename, Some(ctx.base));
            if !path.is_file() {
                return Err(RegistryError::FontNotFound(path));
            }
            crate::log!("[Skin] Add font: path='{}', name='{}'", path.display(), name);
            self.font_faces.insert(
                name.to_string(),
                FontFace {
                    path,
                    scale,
                    replacement,
                    render,
                },
            );
        }

        let fallback = ctx
            .services
            .paths
            .resolve(Scope::Fonts, "fallback.font", Some(ctx.base));
        if fallback.is_file() {
            self.font_faces.insert(
                "Fallback".to_string(),
                FontFace {
                    path: fallback,
                    scale: 100,
                    replacement: true,
                    render: 0,
                },
            );
        }

        let factor = self.skin_factor();
        for alias in block.children_named("alias") {
            let name = alias.attr("name").unwrap_or_default();
            let bad = |reason: &str| RegistryError::BadFontAlias {
                name: name.to_string(),
                reason: reason.to_string(),
            };
            if name.is_empty() {
                return Err(bad("missing name"));
            }
            let family = alias.attr("font").ok_or_else(|| bad("missing font"))?;
            let size_spec = alias.attr("size").ok_or_else(|| bad("missing size"))?;

            let size = scale_or_report(size_spec, factor, diagnostics);
            let height = alias
                .attr("height")
                .map_or(size, |h| scale_or_report(h, factor, diagnostics));
            let width = alias
                .attr("width")
                .map_or(size, |w| scale_or_report(w, factor, diagnostics));
            self.fonts
                .insert(name.to_string(), FontAlias::new(family, size, height, width));
        }
        Ok(())
    }

    fn merge_parameters(
        &mut self,
        block: &Element,
        diagnostics: &mut Diagnostics,
    ) -> Result<(), RegistryError> {
        let factor = self.skin_factor();
        for parameter in block.children_named("parameter") {
            let name = required(parameter, "parameter", "name")?;
            let value = required(parameter, "parameter", "value")?;
            let lookup = |n: &str| self.colors.get(n).copied();
            let parsed = parse_parameter(value, factor, &lookup, diagnostics).map_err(|reason| {
                RegistryError::BadParameter {
                    name: name.to_string(),
                    reason,
                }
            })?;
            self.parameters.insert(name.to_string(), parsed);
        }
        Ok(())
    }

    fn merge_subtitles(
        &mut self,
        block: &Element,
        diagnostics: &mut Diagnostics,
    ) -> Result<(), RegistryError> {
        for sub in block.children_named("sub") {
            let name = required(sub, "sub", "name")?;
            let font = self.parse_font(required(sub, "sub", "font")?, AxisScale::IDENTITY, diagnostics);
            let (foreground, have_color) = match sub.attr("foregroundColor") {
                Some(c) => (self.parse_color(c)?, true),
                None => (Color::WHITE, false),
            };
            let border_color = match sub.attr("borderColor") {
                Some(c) => self.parse_color(c)?,
                None => Color::BLACK,
            };
            let border_width = int_attr(sub, "borderWidth")?.unwrap_or(3);
            self.subtitle_styles.insert(
                name.to_string(),
                SubtitleStyle {
                    font,
                    foreground,
                    have_color,
                    border_color,
                    border_width,
                },
            );
        }
        Ok(())
    }

    fn merge_window_style(
        &mut self,
        block: &Element,
        ctx: &MergeContext<'_>,
        diagnostics: &mut Diagnostics,
    ) -> Result<(), RegistryError> {
        let id = surface_id(block)?;
        let mut style = WindowStyle::default();

        for title in block.children_named("title") {
            if let Some(offset) = title.attr("offset") {
                style.title_offset = self.parse_plain_size(offset, diagnostics)?;
            }
            if let Some(font) = title.attr("font") {
                style.title_font = self.parse_font(font, AxisScale::IDENTITY, diagnostics);
            }
        }

        for borderset in block.children_named("borderset") {
            let set = borderset.attr("name").and_then(BorderSet::from_name);
            for pixmap in borderset.children_named("pixmap") {
                let (Some(pos), Some(filename)) = (pixmap.attr("pos"), pixmap.attr("filename")) else {
                    continue;
                };
                let path = ctx.services.paths.resolve(ctx.scope, filename, Some(ctx.base));
                let loaded = ctx
                    .services
                    .pixmaps
                    .load(&path, ctx.surface, None)
                    .ok_or(RegistryError::PixmapNotFound(path))?;
                if let (Some(set), Some(pos)) = (set, BorderPos::from_name(pos)) {
                    style.borders.insert((set, pos), loaded);
                }
            }
        }

        for color in block.children_named("color") {
            let slot_name = color.attr("name").unwrap_or_default();
            let value = required(color, "color", "color")?;
            let parsed = self.parse_color(value)?;
            let slot = StyleColor::from_name(slot_name)
                .ok_or_else(|| RegistryError::UnknownStyleColor(slot_name.to_string()))?;
            style.colors.insert(slot, parsed);
        }

        self.window_styles.insert(id, style);
        Ok(())
    }

    fn merge_margin(&mut self, block: &Element) -> Result<(), RegistryError> {
        let id = surface_id(block)?;
        let margins = Margins {
            left: int_attr(block, "left")?.unwrap_or(0),
            top: int_attr(block, "top")?.unwrap_or(0),
            right: int_attr(block, "right")?.unwrap_or(0),
            bottom: int_attr(block, "bottom")?.unwrap_or(0),
        };
        self.margins.insert(id, margins);
        Ok(())
    }

    // ========================================================================
    // Value parsing against the registry
    // ========================================================================

    /// `#AARRGGBB` or the name of an already registered color
    pub fn parse_color(&self, value: &str) -> Result<Color, RegistryError> {
        if value.starts_with('#') {
            return Ok(Color::from_hex(value)?);
        }
        self.colors
            .get(value)
            .copied()
            .ok_or_else(|| RegistryError::UnknownColor(value.to_string()))
    }

    /// Resolve a `family;size` font spec
    ///
    /// The family may be an alias; a missing size takes the alias size. An
    /// unknown family that is not a registered face falls back to `Body`.
    /// The size formula may use `f`. `scale` rescales the final size.
    pub fn parse_font(&self, spec: &str, scale: AxisScale, diagnostics: &mut Diagnostics) -> Font {
        let (name, mut size) = match spec.split_once(';') {
            Some((name, size)) => {
                let size = match expr::parse_scale(size, self.skin_factor()) {
                    Ok(v) => v,
                    Err(err) => {
                        diagnostics.report(err);
                        0
                    }
                };
                (name.trim(), size)
            }
            None => (spec.trim(), 0),
        };

        let mut family = name.to_string();
        if let Some(alias) = self.fonts.get(name) {
            family = alias.family.clone();
            if size == 0 {
                size = alias.size;
            }
        } else if !self.font_faces.contains_key(name) {
            let body = self.body();
            crate::log!(
                "[Skin] Error: Font '{}' (in '{}') is not defined! Using 'Body' font ('{}') instead.",
                name,
                spec,
                body.family
            );
            family = body.family;
            if size == 0 {
                size = body.size;
            }
        }

        Font::new(family, scale.apply(size))
    }

    /// A `"w,h"` pair of absolute coordinates, clamped at zero
    fn parse_plain_size(&self, value: &str, diagnostics: &mut Diagnostics) -> Result<Size, RegistryError> {
        let (w, h) = crate::types::split_pair(value)?;
        let factor = self.skin_factor();
        let mut eval = |s: &str| {
            expr::evaluate_or_report(s, 0, 0, None, AxisScale::IDENTITY, factor, diagnostics)
                .unwrap_or(0)
                .max(0)
        };
        Ok(Size::new(eval(w), eval(h)))
    }

    fn body(&self) -> FontAlias {
        self.fonts.get("Body").cloned().unwrap_or_else(body_font)
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    pub fn color(&self, name: &str) -> Option<Color> {
        self.colors.get(name).copied()
    }

    pub fn colors(&self) -> &HashMap<String, Color> {
        &self.colors
    }

    pub fn font_alias(&self, name: &str) -> Option<&FontAlias> {
        self.fonts.get(name)
    }

    pub fn font_face(&self, name: &str) -> Option<&FontFace> {
        self.font_faces.get(name)
    }

    /// Metrics for the `w`/`h` suffixes; the family of a `family;size` spec
    /// names the alias. Unknown aliases measure zero.
    pub fn font_metrics(&self, spec: &str) -> FontMetrics {
        let name = spec.split(';').next().unwrap_or(spec).trim();
        self.fonts
            .get(name)
            .map(FontAlias::metrics)
            .unwrap_or_default()
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.get(name)
    }

    pub fn menu_image(&self, key: &str) -> Option<&str> {
        self.menus.get(key).map(String::as_str)
    }

    pub fn menu_icon(&self, key: &str) -> Option<&str> {
        self.menu_icons.get(key).map(String::as_str)
    }

    pub fn screen_image(&self, key: &str) -> Option<&str> {
        self.screens.get(key).map(String::as_str)
    }

    pub fn setup_image(&self, key: &str) -> Option<&str> {
        self.setups.get(key).map(String::as_str)
    }

    pub fn switch_pixmap(&self, name: &str) -> Option<&Pixmap> {
        self.switch_pixmaps.get(name)
    }

    pub fn window_style(&self, surface: u32) -> Option<&WindowStyle> {
        self.window_styles.get(&surface)
    }

    pub fn margin(&self, surface: u32) -> Option<Margins> {
        self.margins.get(&surface).copied()
    }

    pub fn subtitle_style(&self, face: &str) -> Option<&SubtitleStyle> {
        self.subtitle_styles.get(face)
    }

    pub fn surface_size(&self, surface: u32) -> Size {
        self.surfaces.get(&surface).copied().unwrap_or(Size::ZERO)
    }

    pub fn set_surface_size(&mut self, surface: u32, size: Size) {
        self.surfaces.insert(surface, size);
    }

    /// GUI surface height relative to 720 lines
    pub fn skin_factor(&self) -> f64 {
        match self.surfaces.get(&GUI_SURFACE) {
            Some(size) if size.height > 0 => size.height as f64 / BASE_HEIGHT,
            _ => 1.0,
        }
    }

    pub fn apply_skin_factor(&self, value: i32) -> i32 {
        (value as f64 * self.skin_factor()) as i32
    }
}

fn merge_images(
    map: &mut HashMap<String, String>,
    block: &Element,
    tag: &'static str,
) -> Result<(), RegistryError> {
    for entry in block.children_named(tag) {
        let key = required(entry, tag, "key")?;
        let image = required(entry, tag, "image")?;
        map.insert(key.to_string(), image.to_string());
    }
    Ok(())
}

fn required<'a>(
    element: &'a Element,
    tag: &'static str,
    attribute: &'static str,
) -> Result<&'a str, RegistryError> {
    element
        .attr(attribute)
        .filter(|v| !v.is_empty())
        .ok_or(RegistryError::MissingAttribute { tag, attribute })
}

fn int_attr(element: &Element, attribute: &str) -> Result<Option<i32>, RegistryError> {
    match element.attr(attribute).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => v
            .trim()
            .parse::<i32>()
            .map(Some)
            .map_err(|_| RegistryError::BadValue {
                attribute: attribute.to_string(),
                value: v.to_string(),
            }),
    }
}

fn surface_id(block: &Element) -> Result<u32, RegistryError> {
    Ok(int_attr(block, "id")?.map_or(GUI_SURFACE, |id| id.max(0) as u32))
}
