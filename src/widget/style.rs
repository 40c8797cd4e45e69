//! Keyword-valued widget styles and blit flags

use bitflags::bitflags;

bitflags! {
    /// Corners a radius applies to
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct RadiusEdges: u8 {
        const TOP_LEFT = 0b0001;
        const TOP_RIGHT = 0b0010;
        const BOTTOM_LEFT = 0b0100;
        const BOTTOM_RIGHT = 0b1000;
        const TOP = Self::TOP_LEFT.bits() | Self::TOP_RIGHT.bits();
        const BOTTOM = Self::BOTTOM_LEFT.bits() | Self::BOTTOM_RIGHT.bits();
        const LEFT = Self::TOP_LEFT.bits() | Self::BOTTOM_LEFT.bits();
        const RIGHT = Self::TOP_RIGHT.bits() | Self::BOTTOM_RIGHT.bits();
    }
}

impl RadiusEdges {
    pub fn from_keyword(name: &str) -> Option<Self> {
        match name {
            "topLeft" => Some(Self::TOP_LEFT),
            "topRight" => Some(Self::TOP_RIGHT),
            "top" => Some(Self::TOP),
            "bottomLeft" => Some(Self::BOTTOM_LEFT),
            "bottomRight" => Some(Self::BOTTOM_RIGHT),
            "bottom" => Some(Self::BOTTOM),
            "left" => Some(Self::LEFT),
            "right" => Some(Self::RIGHT),
            _ => None,
        }
    }
}

bitflags! {
    /// Pixmap blit behaviour: alpha handling, scaling and alignment
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct BlitFlags: u32 {
        const ALPHATEST = 1;
        const ALPHABLEND = 2;
        const SCALE = 4;
        const KEEP_ASPECT_RATIO = 8;
        const HALIGN_CENTER = 32;
        const HALIGN_RIGHT = 64;
        const VALIGN_CENTER = 128;
        const VALIGN_BOTTOM = 256;
    }
}

pub const ALPHATEST_KEYWORDS: &[&str] = &["on", "off", "blend"];

pub const SCALE_FLAG_KEYWORDS: &[&str] = &[
    "none",
    "scale",
    "scaleKeepAspect",
    "scaleLeftTop",
    "scaleLeftCenter",
    "scaleLeftBottom",
    "scaleCenterTop",
    "scaleCenter",
    "scaleCenterBottom",
    "scaleRightTop",
    "scaleRightCenter",
    "scaleRightBottom",
    "moveLeftTop",
    "moveLeftCenter",
    "moveLeftBottom",
    "moveCenterTop",
    "moveCenter",
    "moveCenterBottom",
    "moveRightTop",
    "moveRightCenter",
    "moveRightBottom",
];

impl BlitFlags {
    /// `alphatest` keyword: `on`, `off` or `blend`
    pub fn from_alphatest(name: &str) -> Option<Self> {
        match name {
            "on" => Some(Self::ALPHATEST),
            "off" => Some(Self::empty()),
            "blend" => Some(Self::ALPHABLEND),
            _ => None,
        }
    }

    /// `scaleFlags` keyword
    ///
    /// The `scale*` family keeps the aspect ratio and aligns the scaled
    /// image; the `move*` family only aligns it.
    pub fn from_scale_flags(name: &str) -> Option<Self> {
        let aspect = Self::SCALE | Self::KEEP_ASPECT_RATIO;
        let flags = match name {
            "none" => Self::empty(),
            "scale" => Self::SCALE,
            "scaleKeepAspect" => aspect,
            _ => {
                let (base, placement) = if let Some(rest) = name.strip_prefix("scale") {
                    (aspect, rest)
                } else if let Some(rest) = name.strip_prefix("move") {
                    (Self::empty(), rest)
                } else {
                    return None;
                };
                base | Self::from_placement(placement)?
            }
        };
        Some(flags)
    }

    fn from_placement(placement: &str) -> Option<Self> {
        let flags = match placement {
            "LeftTop" => Self::empty(),
            "LeftCenter" => Self::VALIGN_CENTER,
            "LeftBottom" => Self::VALIGN_BOTTOM,
            "CenterTop" => Self::HALIGN_CENTER,
            "Center" => Self::HALIGN_CENTER | Self::VALIGN_CENTER,
            "CenterBottom" => Self::HALIGN_CENTER | Self::VALIGN_BOTTOM,
            "RightTop" => Self::HALIGN_RIGHT,
            "RightCenter" => Self::HALIGN_RIGHT | Self::VALIGN_CENTER,
            "RightBottom" => Self::HALIGN_RIGHT | Self::VALIGN_BOTTOM,
            _ => return None,
        };
        Some(flags)
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct WindowFlags: u32 {
        const NO_BORDER = 1;
    }
}

impl WindowFlags {
    pub fn from_keyword(name: &str) -> Option<Self> {
        match name {
            "wfNoBorder" => Some(Self::NO_BORDER),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

pub const ORIENTATION_KEYWORDS: &[&str] = &[
    "orVertical",
    "orTopToBottom",
    "orBottomToTop",
    "orHorizontal",
    "orLeftToRight",
    "orRightToLeft",
];

impl Orientation {
    /// Parse an orientation keyword into the axis and whether it runs reversed
    pub fn from_keyword(name: &str) -> Option<(Self, bool)> {
        match name {
            "orVertical" | "orTopToBottom" => Some((Self::Vertical, false)),
            "orBottomToTop" => Some((Self::Vertical, true)),
            "orHorizontal" | "orLeftToRight" => Some((Self::Horizontal, false)),
            "orRightToLeft" => Some((Self::Horizontal, true)),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VAlign {
    #[default]
    Top,
    Center,
    Bottom,
}

pub const VALIGN_KEYWORDS: &[&str] = &["top", "center", "bottom"];

impl VAlign {
    pub fn from_keyword(name: &str) -> Option<Self> {
        match name {
            "top" => Some(Self::Top),
            "center" => Some(Self::Center),
            "bottom" => Some(Self::Bottom),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
    Block,
}

pub const HALIGN_KEYWORDS: &[&str] = &["left", "center", "right", "block"];

impl HAlign {
    pub fn from_keyword(name: &str) -> Option<Self> {
        match name {
            "left" => Some(Self::Left),
            "center" => Some(Self::Center),
            "right" => Some(Self::Right),
            "block" => Some(Self::Block),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScrollbarMode {
    #[default]
    ShowOnDemand,
    ShowAlways,
    ShowNever,
    ShowLeft,
}

pub const SCROLLBAR_MODE_KEYWORDS: &[&str] =
    &["showOnDemand", "showAlways", "showNever", "showLeft"];

impl ScrollbarMode {
    pub fn from_keyword(name: &str) -> Option<Self> {
        match name {
            "showOnDemand" => Some(Self::ShowOnDemand),
            "showAlways" => Some(Self::ShowAlways),
            "showNever" => Some(Self::ShowNever),
            "showLeft" => Some(Self::ShowLeft),
            _ => None,
        }
    }
}

/// Corner radius restricted to a set of edges
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CornerRadius {
    pub radius: i32,
    pub edges: RadiusEdges,
}

impl CornerRadius {
    /// Parse `"radius"` or `"radius;edge,edge"`; with no edges listed the
    /// radius applies to all four corners
    pub fn parse(value: &str) -> Option<Self> {
        let (radius, edges) = match value.split_once(';') {
            Some((radius, edges)) => (radius, Some(edges)),
            None => (value, None),
        };
        let radius = radius.trim().parse::<i32>().ok()?;
        let edges = match edges {
            Some(list) => list
                .split(',')
                .filter_map(|edge| RadiusEdges::from_keyword(edge.trim()))
                .fold(RadiusEdges::empty(), |acc, edge| acc | edge),
            None => RadiusEdges::all(),
        };
        Some(Self { radius, edges })
    }
}
