//! Window chrome styles per surface

use std::collections::BTreeMap;

use crate::types::{Color, Font, Pixmap, Size};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BorderSet {
    Window,
    Button,
    ListboxEntry,
}

impl BorderSet {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "bsWindow" => Some(Self::Window),
            "bsButton" => Some(Self::Button),
            "bsListboxEntry" => Some(Self::ListboxEntry),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BorderPos {
    TopLeft,
    Top,
    TopRight,
    Left,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
    Background,
}

impl BorderPos {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "bpTopLeft" => Some(Self::TopLeft),
            "bpTop" => Some(Self::Top),
            "bpTopRight" => Some(Self::TopRight),
            "bpLeft" => Some(Self::Left),
            "bpRight" => Some(Self::Right),
            "bpBottomLeft" => Some(Self::BottomLeft),
            "bpBottom" => Some(Self::Bottom),
            "bpBottomRight" => Some(Self::BottomRight),
            "bpBackground" => Some(Self::Background),
            _ => None,
        }
    }
}

/// Fixed color slots of a window style
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StyleColor {
    Background,
    LabelForeground,
    ListboxBackground,
    ListboxForeground,
    ListboxSelectedBackground,
    ListboxSelectedForeground,
    ListboxMarkedBackground,
    ListboxMarkedForeground,
    ListboxMarkedAndSelectedBackground,
    ListboxMarkedAndSelectedForeground,
    WindowTitleForeground,
    WindowTitleBackground,
}

impl StyleColor {
    /// Slot for a `<color name=...>` entry (the name without its `col` prefix)
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Background" => Some(Self::Background),
            "LabelForeground" => Some(Self::LabelForeground),
            "ListboxBackground" => Some(Self::ListboxBackground),
            "ListboxForeground" => Some(Self::ListboxForeground),
            "ListboxSelectedBackground" => Some(Self::ListboxSelectedBackground),
            "ListboxSelectedForeground" => Some(Self::ListboxSelectedForeground),
            "ListboxMarkedBackground" => Some(Self::ListboxMarkedBackground),
            "ListboxMarkedForeground" => Some(Self::ListboxMarkedForeground),
            "ListboxMarkedAndSelectedBackground" => Some(Self::ListboxMarkedAndSelectedBackground),
            "ListboxMarkedAndSelectedForeground" => Some(Self::ListboxMarkedAndSelectedForeground),
            "WindowTitleForeground" => Some(Self::WindowTitleForeground),
            "WindowTitleBackground" => Some(Self::WindowTitleBackground),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct WindowStyle {
    pub title_font: Font,
    pub title_offset: Size,
    pub borders: BTreeMap<(BorderSet, BorderPos), Pixmap>,
    pub colors: BTreeMap<StyleColor, Color>,
}

impl Default for WindowStyle {
    fn default() -> Self {
        Self {
            title_font: Font::new("Regular", 20),
            title_offset: Size::new(20, 5),
            borders: BTreeMap::new(),
            colors: BTreeMap::new(),
        }
    }
}

impl WindowStyle {
    pub fn border(&self, set: BorderSet, pos: BorderPos) -> Option<&Pixmap> {
        self.borders.get(&(set, pos))
    }

    pub fn color(&self, slot: StyleColor) -> Option<Color> {
        self.colors.get(&slot).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        assert_eq!(BorderSet::from_name("bsButton"), Some(BorderSet::Button));
        assert_eq!(BorderSet::from_name("bsNope"), None);
        assert_eq!(BorderPos::from_name("bpBackground"), Some(BorderPos::Background));
        assert_eq!(
            StyleColor::from_name("ListboxSelectedForeground"),
            Some(StyleColor::ListboxSelectedForeground)
        );
        assert_eq!(StyleColor::from_name("colBackground"), None);
    }

    #[test]
    fn test_default_title() {
        let style = WindowStyle::default();
        assert_eq!(style.title_font, Font::new("Regular", 20));
        assert_eq!(style.title_offset, Size::new(20, 5));
        assert!(style.color(StyleColor::Background).is_none());
    }
}
