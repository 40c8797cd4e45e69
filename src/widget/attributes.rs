//! Attribute dispatch
//!
//! Every attribute a skin may set on a widget has a fixed parser here that
//! turns the raw text into a typed [`Attribute`]. Unknown names and bad
//! values are reported and skipped; a missing image file aborts the whole
//! batch because the widget cannot be built without it.

use std::fmt;
use std::path::Path;

use crate::errors::{AttributeError, Diagnostics};
use crate::expr;
use crate::registry::RegistryStore;
use crate::shared::Services;
use crate::types::{parse_int_pair, split_pair, AxisScale, Color, Pixmap, Point, Scale, Size};

use super::base::{Attribute, Widget};
use super::style::{
    BlitFlags, CornerRadius, HAlign, Orientation, ScrollbarMode, VAlign, WindowFlags,
    ALPHATEST_KEYWORDS, HALIGN_KEYWORDS, ORIENTATION_KEYWORDS, SCALE_FLAG_KEYWORDS,
    SCROLLBAR_MODE_KEYWORDS, VALIGN_KEYWORDS,
};

/// A collected attribute value
///
/// `position` and `size` usually arrive already resolved by the layout
/// context; everything else is raw document text.
#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
    Text(String),
    Point(Point),
    Size(Size),
}

impl AttrValue {
    pub fn text(value: impl Into<String>) -> Self {
        AttrValue::Text(value.into())
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Text(s) => write!(f, "{}", s),
            AttrValue::Point(p) => write!(f, "{},{}", p.x, p.y),
            AttrValue::Size(s) => write!(f, "{},{}", s.width, s.height),
        }
    }
}

/// Ordered `(name, value)` pairs for one target
pub type AttributeList = Vec<(String, AttrValue)>;

/// What attribute parsers may consult
pub struct AttributeContext<'a> {
    pub registry: &'a RegistryStore,
    pub services: &'a Services,
    pub scale: Scale,
    pub surface: u32,
}

/// Attributes that name files, resolved against the skin before dispatch
pub const FILE_ATTRIBUTES: &[&str] = &[
    "pixmap",
    "pointer",
    "seek_pointer",
    "backgroundPixmap",
    "selectionPixmap",
    "selectionPixmapLarge",
    "sliderPixmap",
    "scrollbarSliderPicture",
    "scrollbarbackgroundPixmap",
    "scrollbarBackgroundPicture",
];

/// Accepted and ignored; they steer binding or belong to other layers
const IGNORED_ATTRIBUTES: &[&str] = &[
    "conditional",
    "objectTypes",
    "animationPaused",
    "split",
    "colposition",
    "dividechar",
    "resolution",
];

/// Order a batch for application: `scale` first, `pixmap` last
///
/// When the batch ends in a pixmap and the screen is being rescaled, a
/// `scale="1"` is forced in front so the image gets scaled too.
pub fn sort_attributes(attrs: &mut AttributeList, scale: Scale) {
    attrs.sort_by_key(|(name, _)| match name.as_str() {
        "scale" => -1,
        "pixmap" => 1,
        _ => 0,
    });

    let ends_in_pixmap = attrs.last().is_some_and(|(name, _)| name == "pixmap");
    let starts_with_scale = attrs.first().is_some_and(|(name, _)| name == "scale");
    if ends_in_pixmap && !scale.is_identity() && !starts_with_scale {
        attrs.insert(0, ("scale".to_string(), AttrValue::text("1")));
    }
}

/// Sort and apply a whole batch to `widget`
///
/// Only fatal errors are returned; the rest are reported and the attribute
/// is skipped.
pub fn apply_all(
    widget: &mut Widget,
    mut attrs: AttributeList,
    ctx: &AttributeContext<'_>,
    class_name: &str,
    diagnostics: &mut Diagnostics,
) -> Result<(), AttributeError> {
    sort_attributes(&mut attrs, ctx.scale);
    for (name, value) in &attrs {
        apply_one(widget, name, value, ctx, class_name, diagnostics)?;
    }
    Ok(())
}

pub fn apply_one(
    widget: &mut Widget,
    name: &str,
    value: &AttrValue,
    ctx: &AttributeContext<'_>,
    class_name: &str,
    diagnostics: &mut Diagnostics,
) -> Result<(), AttributeError> {
    if name == "pixmap" && matches!(value, AttrValue::Text(path) if path.ends_with(".svg")) {
        widget.apply(Attribute::Alphatest(BlitFlags::ALPHABLEND));
    }

    match parse_attribute(name, value, widget, ctx, class_name, diagnostics) {
        Ok(Some(attribute)) => widget.apply(attribute),
        Ok(None) => {}
        Err(err) if err.is_fatal() => return Err(err),
        Err(err) => diagnostics.report(err),
    }
    Ok(())
}

/// Parse one attribute for `widget`
///
/// `Ok(None)` means the attribute is accepted but has no effect.
pub fn parse_attribute(
    name: &str,
    value: &AttrValue,
    widget: &Widget,
    ctx: &AttributeContext<'_>,
    class_name: &str,
    diagnostics: &mut Diagnostics,
) -> Result<Option<Attribute>, AttributeError> {
    match (name, value) {
        ("position", AttrValue::Point(p)) => return Ok(Some(Attribute::Position(*p))),
        ("size", AttrValue::Size(s)) => return Ok(Some(Attribute::Size(*s))),
        _ => {}
    }

    let raw = value.to_string();
    let v = raw.as_str();

    let attribute = match name {
        "position" => Attribute::Position(scaled_pair(name, v, ctx, diagnostics)?),
        "size" => {
            let p = scaled_pair(name, v, ctx, diagnostics)?;
            Attribute::Size(Size::new(p.x, p.y))
        }
        "title" => Attribute::Title(ctx.services.translator.translate(v)),
        "text" => Attribute::Text(ctx.services.translator.translate(v)),
        "font" => Attribute::Font(ctx.registry.parse_font(v, ctx.scale.x, diagnostics)),
        "secondfont" => Attribute::SecondFont(ctx.registry.parse_font(v, ctx.scale.x, diagnostics)),
        "zPosition" => Attribute::ZPosition(parse_int(name, v)?),
        "transparent" => Attribute::Transparent(parse_int(name, v)? != 0),
        "itemHeight" => Attribute::ItemHeight(scaled(name, v, ctx.scale.y, ctx)?),
        "itemWidth" => Attribute::ItemWidth(scaled(name, v, ctx.scale.x, ctx)?),
        "borderWidth" => Attribute::BorderWidth(scaled(name, v, ctx.scale.y, ctx)?),
        "widgetBorderWidth" => Attribute::WidgetBorderWidth(scaled(name, v, ctx.scale.y, ctx)?),
        "scrollbarWidth" => Attribute::ScrollbarWidth(scaled(name, v, ctx.scale.x, ctx)?),
        "scrollbarSliderBorderWidth" => {
            Attribute::ScrollbarBorderWidth(scaled(name, v, ctx.scale.x, ctx)?)
        }
        "itemCornerRadius" => Attribute::ItemCornerRadius(radius(name, v)?),
        "itemCornerRadiusSelected" => Attribute::ItemCornerRadiusSelected(radius(name, v)?),
        "cornerRadius" => Attribute::CornerRadius(radius(name, v)?),
        "pixmap" => Attribute::Pixmap(load_pixmap(v, Some(widget.size), ctx)?),
        "backgroundPixmap" => Attribute::BackgroundPixmap(load_pixmap(v, None, ctx)?),
        "selectionPixmap" => Attribute::SelectionPixmap(load_pixmap(v, None, ctx)?),
        "selectionPixmapLarge" => Attribute::SelectionPixmapLarge(load_pixmap(v, None, ctx)?),
        "sliderPixmap" | "scrollbarSliderPicture" => {
            Attribute::SliderPixmap(load_pixmap(v, None, ctx)?)
        }
        "scrollbarbackgroundPixmap" | "scrollbarBackgroundPicture" => {
            Attribute::ScrollbarBackgroundPixmap(load_pixmap(v, None, ctx)?)
        }
        "pointer" => {
            let (pixmap, at) = pointer(name, v, ctx, diagnostics)?;
            Attribute::Pointer(pixmap, at)
        }
        "seek_pointer" => {
            let (pixmap, at) = pointer(name, v, ctx, diagnostics)?;
            Attribute::SeekPointer(pixmap, at)
        }
        "alphatest" => Attribute::Alphatest(keyword(
            "alphatest",
            v,
            BlitFlags::from_alphatest,
            ALPHATEST_KEYWORDS,
        )?),
        "scale" => Attribute::Scale(truthy(v, "scale")),
        "scaleFlags" => Attribute::ScaleFlags(keyword(
            "scale",
            v,
            BlitFlags::from_scale_flags,
            SCALE_FLAG_KEYWORDS,
        )?),
        "orientation" => {
            let (orientation, reversed) = keyword(
                "orientation",
                v,
                Orientation::from_keyword,
                ORIENTATION_KEYWORDS,
            )?;
            Attribute::Orientation(orientation, reversed)
        }
        "valign" => Attribute::VAlign(keyword("valign", v, VAlign::from_keyword, VALIGN_KEYWORDS)?),
        "halign" => Attribute::HAlign(keyword("halign", v, HAlign::from_keyword, HALIGN_KEYWORDS)?),
        "scrollbarMode" => Attribute::ScrollbarMode(keyword(
            "scrollbarMode",
            v,
            ScrollbarMode::from_keyword,
            SCROLLBAR_MODE_KEYWORDS,
        )?),
        "textOffset" => {
            let (x, y) = parse_int_pair(v).map_err(|e| AttributeError::invalid(name, v, e))?;
            Attribute::TextOffset(Point::new(ctx.scale.x.apply(x), ctx.scale.y.apply(y)))
        }
        "shadowOffset" => Attribute::ShadowOffset(scaled_pair(name, v, ctx, diagnostics)?),
        "flags" => {
            let mut flags = WindowFlags::empty();
            for flag in v.split(',') {
                match WindowFlags::from_keyword(flag.trim()) {
                    Some(f) => flags |= f,
                    None => diagnostics.report(AttributeError::invalid(name, flag, "unknown flag")),
                }
            }
            Attribute::Flags(flags)
        }
        "backgroundColor" | "backgroundNotCrypted" | "backgroundCrypted"
        | "backgroundEncrypted" => Attribute::BackgroundColor(color(name, v, ctx)?),
        "foregroundColor" | "foregroundNotCrypted" | "foregroundCrypted"
        | "foregroundEncrypted" => Attribute::ForegroundColor(color(name, v, ctx)?),
        "backgroundColorSelected" => Attribute::BackgroundColorSelected(color(name, v, ctx)?),
        "foregroundColorSelected" => Attribute::ForegroundColorSelected(color(name, v, ctx)?),
        "shadowColor" => Attribute::ShadowColor(color(name, v, ctx)?),
        "borderColor" => Attribute::BorderColor(color(name, v, ctx)?),
        "widgetBorderColor" => Attribute::WidgetBorderColor(color(name, v, ctx)?),
        "scrollbarSliderBorderColor" => Attribute::SliderBorderColor(color(name, v, ctx)?),
        "scrollbarSliderForegroundColor" => Attribute::SliderForegroundColor(color(name, v, ctx)?),
        "selectionDisabled" => Attribute::SelectionDisabled,
        "enableWrapAround" => Attribute::WrapAround(truthy(v, "enablewraparound")),
        "noWrap" => Attribute::NoWrap(truthy(v, "nowrap")),
        _ if IGNORED_ATTRIBUTES.contains(&name) => return Ok(None),
        _ => {
            return Err(AttributeError::NotImplemented {
                name: name.to_string(),
                value: raw,
                class_name: class_name.to_string(),
            })
        }
    };
    Ok(Some(attribute))
}

/// Tolerant boolean: the usual spellings plus the feature's own name
pub(crate) fn truthy(value: &str, own_name: &str) -> bool {
    let value = value.to_lowercase();
    matches!(value.as_str(), "1" | "enabled" | "on" | "true" | "yes") || value == own_name
}

fn keyword<T>(
    name: &'static str,
    value: &str,
    parse: impl Fn(&str) -> Option<T>,
    expected: &[&'static str],
) -> Result<T, AttributeError> {
    parse(value).ok_or_else(|| AttributeError::UnknownKeyword {
        name,
        value: value.to_string(),
        expected: expected.to_vec(),
    })
}

fn parse_int(name: &str, value: &str) -> Result<i32, AttributeError> {
    value
        .trim()
        .parse::<i32>()
        .map_err(|e| AttributeError::invalid(name, value, e))
}

fn color(name: &str, value: &str, ctx: &AttributeContext<'_>) -> Result<Color, AttributeError> {
    ctx.registry
        .parse_color(value)
        .map_err(|e| AttributeError::invalid(name, value, e))
}

fn radius(name: &str, value: &str) -> Result<CornerRadius, AttributeError> {
    CornerRadius::parse(value).ok_or_else(|| AttributeError::invalid(name, value, "expected 'radius;edges'"))
}

/// Scale-evaluated scalar, rescaled along one axis
fn scaled(
    name: &str,
    value: &str,
    axis: AxisScale,
    ctx: &AttributeContext<'_>,
) -> Result<i32, AttributeError> {
    let v = expr::parse_scale(value, ctx.registry.skin_factor())
        .map_err(|e| AttributeError::invalid(name, value, e))?;
    Ok(axis.apply_truncating(v))
}

/// `"x,y"` evaluated without a parent, then rescaled
fn scaled_pair(
    name: &str,
    value: &str,
    ctx: &AttributeContext<'_>,
    diagnostics: &mut Diagnostics,
) -> Result<Point, AttributeError> {
    let (x, y) = split_pair(value).map_err(|e| AttributeError::invalid(name, value, e))?;
    let factor = ctx.registry.skin_factor();
    let mut eval = |s: &str| {
        expr::evaluate_or_report(s, 0, 0, None, AxisScale::IDENTITY, factor, diagnostics)
            .unwrap_or(0)
    };
    let (x, y) = (eval(x), eval(y));
    Ok(Point::new(ctx.scale.x.apply(x), ctx.scale.y.apply(y)))
}

fn load_pixmap(
    value: &str,
    size: Option<Size>,
    ctx: &AttributeContext<'_>,
) -> Result<Pixmap, AttributeError> {
    let path = Path::new(value);
    ctx.services
        .pixmaps
        .load(path, ctx.surface, size)
        .ok_or_else(|| AttributeError::PixmapNotFound(path.to_path_buf()))
}

/// `"file:x,y"`
fn pointer(
    name: &str,
    value: &str,
    ctx: &AttributeContext<'_>,
    diagnostics: &mut Diagnostics,
) -> Result<(Pixmap, Point), AttributeError> {
    let (file, at) = value
        .rsplit_once(':')
        .ok_or_else(|| AttributeError::invalid(name, value, "expected 'file:x,y'"))?;
    let at = scaled_pair(name, at, ctx, diagnostics)?;
    Ok((load_pixmap(file, None, ctx)?, at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SkinError;
    use crate::shared::config::PathsConfig;
    use crate::widget::style::RadiusEdges;

    fn services() -> Services {
        Services::new(&PathsConfig::default())
    }

    fn attrs(pairs: &[(&str, &str)]) -> AttributeList {
        pairs
            .iter()
            .map(|(n, v)| (n.to_string(), AttrValue::text(*v)))
            .collect()
    }

    fn names(list: &AttributeList) -> Vec<&str> {
        list.iter().map(|(n, _)| n.as_str()).collect()
    }

    #[test]
    fn test_sort_puts_scale_first_and_pixmap_last() {
        let mut list = attrs(&[("pixmap", "a.png"), ("zPosition", "1"), ("scale", "1")]);
        sort_attributes(&mut list, Scale::IDENTITY);
        assert_eq!(names(&list), vec!["scale", "zPosition", "pixmap"]);
    }

    #[test]
    fn test_sort_inserts_scale_for_rescaled_pixmap() {
        let half = Scale::new(AxisScale::new(1, 2), AxisScale::new(1, 2));

        let mut list = attrs(&[("pixmap", "a.png"), ("zPosition", "1")]);
        sort_attributes(&mut list, half);
        assert_eq!(names(&list), vec!["scale", "zPosition", "pixmap"]);

        // Identity scale leaves the batch alone
        let mut list = attrs(&[("pixmap", "a.png"), ("zPosition", "1")]);
        sort_attributes(&mut list, Scale::IDENTITY);
        assert_eq!(names(&list), vec!["zPosition", "pixmap"]);
    }

    #[test]
    fn test_truthy_spellings() {
        assert!(truthy("Yes", "nowrap"));
        assert!(truthy("NOWRAP", "nowrap"));
        assert!(truthy("enabled", "scale"));
        assert!(!truthy("nowrap", "scale"));
        assert!(!truthy("0", "scale"));
    }

    #[test]
    fn test_apply_colors_and_keywords() {
        let registry = RegistryStore::new();
        let services = services();
        let ctx = AttributeContext {
            registry: &registry,
            services: &services,
            scale: Scale::IDENTITY,
            surface: 0,
        };
        let mut widget = Widget::new();
        let mut diagnostics = Diagnostics::new();

        let list = attrs(&[
            ("foregroundColor", "key_red"),
            ("backgroundCrypted", "#00102030"),
            ("halign", "block"),
            ("orientation", "orBottomToTop"),
            ("cornerRadius", "6;topLeft"),
            ("noWrap", "1"),
            ("conditional", "list"),
        ]);
        apply_all(&mut widget, list, &ctx, "eLabel", &mut diagnostics).unwrap();

        assert!(diagnostics.is_empty());
        assert_eq!(widget.foreground_color, Some(Color::from_argb(0x009f_1313)));
        assert_eq!(widget.background_color, Some(Color::from_argb(0x0010_2030)));
        assert_eq!(widget.halign, HAlign::Block);
        assert_eq!(widget.orientation, Orientation::Vertical);
        assert!(widget.reversed);
        assert_eq!(
            widget.corner_radius,
            Some(CornerRadius {
                radius: 6,
                edges: RadiusEdges::TOP_LEFT
            })
        );
        assert!(widget.no_wrap);
    }

    #[test]
    fn test_bad_values_are_reported_and_skipped() {
        let registry = RegistryStore::new();
        let services = services();
        let ctx = AttributeContext {
            registry: &registry,
            services: &services,
            scale: Scale::IDENTITY,
            surface: 0,
        };
        let mut widget = Widget::new();
        widget.valign = VAlign::Bottom;
        let mut diagnostics = Diagnostics::new();

        let list = attrs(&[
            ("valign", "middle"),
            ("foregroundColor", "no_such_color"),
            ("blink", "yes"),
            ("flags", "wfNoBorder,wfBogus"),
            ("zPosition", "3"),
        ]);
        apply_all(&mut widget, list, &ctx, "eLabel", &mut diagnostics).unwrap();

        assert_eq!(widget.valign, VAlign::Bottom);
        assert_eq!(widget.foreground_color, None);
        assert!(widget.flags.contains(WindowFlags::NO_BORDER));
        assert_eq!(widget.z_position, 3);
        assert_eq!(diagnostics.len(), 4);
        assert!(diagnostics.entries().iter().any(|e| matches!(
            e,
            SkinError::Attribute(AttributeError::NotImplemented { name, class_name, .. })
                if name == "blink" && class_name == "eLabel"
        )));
    }

    #[test]
    fn test_scaled_scalars_follow_their_axis() {
        let registry = RegistryStore::new();
        let services = services();
        let ctx = AttributeContext {
            registry: &registry,
            services: &services,
            scale: Scale::new(AxisScale::new(3, 2), AxisScale::new(1, 2)),
            surface: 0,
        };
        let mut widget = Widget::new();
        let mut diagnostics = Diagnostics::new();

        let list = attrs(&[
            ("itemHeight", "40"),
            ("scrollbarWidth", "10"),
            ("textOffset", "4,4"),
        ]);
        apply_all(&mut widget, list, &ctx, "eListbox", &mut diagnostics).unwrap();

        assert_eq!(widget.item_height, Some(20));
        assert_eq!(widget.scrollbar_width, Some(15));
        assert_eq!(widget.text_offset, Point::new(6, 2));
    }

    #[test]
    fn test_missing_pixmap_is_fatal() {
        let registry = RegistryStore::new();
        let services = services();
        let ctx = AttributeContext {
            registry: &registry,
            services: &services,
            scale: Scale::IDENTITY,
            surface: 0,
        };
        let mut widget = Widget::new();
        let mut diagnostics = Diagnostics::new();

        let list = attrs(&[("pixmap", "/nonexistent/veneer/icon.png"), ("zPosition", "2")]);
        let err = apply_all(&mut widget, list, &ctx, "ePixmap", &mut diagnostics).unwrap_err();

        assert!(err.is_fatal());
        // Attributes sorted ahead of the pixmap were already applied
        assert_eq!(widget.z_position, 2);
    }

    #[test]
    fn test_svg_pixmap_forces_blending() {
        let dir = tempfile::tempdir().unwrap();
        let svg = dir.path().join("logo.svg");
        std::fs::write(&svg, "<svg/>").unwrap();

        let registry = RegistryStore::new();
        let services = services();
        let ctx = AttributeContext {
            registry: &registry,
            services: &services,
            scale: Scale::IDENTITY,
            surface: 0,
        };
        let mut widget = Widget::new();
        let mut diagnostics = Diagnostics::new();

        let list = vec![
            ("size".to_string(), AttrValue::Size(Size::new(64, 32))),
            ("pixmap".to_string(), AttrValue::text(svg.to_string_lossy())),
            ("alphatest".to_string(), AttrValue::text("on")),
        ];
        apply_all(&mut widget, list, &ctx, "ePixmap", &mut diagnostics).unwrap();

        assert_eq!(widget.alphatest, BlitFlags::ALPHABLEND);
        let pixmap = widget.pixmap.unwrap();
        assert_eq!(pixmap.path, svg);
        assert_eq!(pixmap.size, Some(Size::new(64, 32)));
    }
}
