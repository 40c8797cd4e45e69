//! The styled widget state that skin attributes are applied to

use crate::types::{Color, Font, Pixmap, Point, Size};

use super::style::{
    BlitFlags, CornerRadius, HAlign, Orientation, ScrollbarMode, VAlign, WindowFlags,
};

/// One typed attribute, ready to apply
#[derive(Clone, Debug, PartialEq)]
pub enum Attribute {
    Position(Point),
    Size(Size),
    Title(String),
    Text(String),
    Font(Font),
    SecondFont(Font),
    ZPosition(i32),
    ItemHeight(i32),
    ItemWidth(i32),
    ItemCornerRadius(CornerRadius),
    ItemCornerRadiusSelected(CornerRadius),
    CornerRadius(CornerRadius),
    Pixmap(Pixmap),
    BackgroundPixmap(Pixmap),
    SelectionPixmap(Pixmap),
    SelectionPixmapLarge(Pixmap),
    SliderPixmap(Pixmap),
    ScrollbarBackgroundPixmap(Pixmap),
    Pointer(Pixmap, Point),
    SeekPointer(Pixmap, Point),
    Alphatest(BlitFlags),
    Scale(bool),
    ScaleFlags(BlitFlags),
    Orientation(Orientation, bool),
    VAlign(VAlign),
    HAlign(HAlign),
    TextOffset(Point),
    ShadowOffset(Point),
    Flags(WindowFlags),
    BackgroundColor(Color),
    BackgroundColorSelected(Color),
    ForegroundColor(Color),
    ForegroundColorSelected(Color),
    ShadowColor(Color),
    BorderColor(Color),
    BorderWidth(i32),
    WidgetBorderColor(Color),
    WidgetBorderWidth(i32),
    ScrollbarMode(ScrollbarMode),
    ScrollbarWidth(i32),
    ScrollbarBorderWidth(i32),
    SliderBorderColor(Color),
    SliderForegroundColor(Color),
    SelectionDisabled,
    Transparent(bool),
    WrapAround(bool),
    NoWrap(bool),
}

/// Everything a skin can set on a widget
///
/// Fields stay at their defaults until an attribute touches them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Widget {
    pub position: Point,
    pub size: Size,
    pub title: Option<String>,
    pub text: Option<String>,
    pub font: Option<Font>,
    pub second_font: Option<Font>,
    pub z_position: i32,
    pub item_height: Option<i32>,
    pub item_width: Option<i32>,
    pub item_corner_radius: Option<CornerRadius>,
    pub item_corner_radius_selected: Option<CornerRadius>,
    pub corner_radius: Option<CornerRadius>,
    pub pixmap: Option<Pixmap>,
    pub background_pixmap: Option<Pixmap>,
    pub selection_pixmap: Option<Pixmap>,
    pub selection_pixmap_large: Option<Pixmap>,
    pub slider_pixmap: Option<Pixmap>,
    pub scrollbar_background_pixmap: Option<Pixmap>,
    pub pointer: Option<(Pixmap, Point)>,
    pub seek_pointer: Option<(Pixmap, Point)>,
    pub alphatest: BlitFlags,
    pub scale: bool,
    pub scale_flags: BlitFlags,
    pub orientation: Orientation,
    pub reversed: bool,
    pub valign: VAlign,
    pub halign: HAlign,
    pub text_offset: Point,
    pub shadow_offset: Point,
    pub flags: WindowFlags,
    pub background_color: Option<Color>,
    pub background_color_selected: Option<Color>,
    pub foreground_color: Option<Color>,
    pub foreground_color_selected: Option<Color>,
    pub shadow_color: Option<Color>,
    pub border_color: Option<Color>,
    pub border_width: i32,
    pub widget_border_color: Option<Color>,
    pub widget_border_width: i32,
    pub scrollbar_mode: ScrollbarMode,
    pub scrollbar_width: Option<i32>,
    pub scrollbar_border_width: Option<i32>,
    pub slider_border_color: Option<Color>,
    pub slider_foreground_color: Option<Color>,
    pub selection_enabled: bool,
    pub transparent: bool,
    pub wrap_around: bool,
    pub no_wrap: bool,
}

impl Widget {
    pub fn new() -> Self {
        Self {
            selection_enabled: true,
            ..Default::default()
        }
    }

    pub fn apply(&mut self, attribute: Attribute) {
        match attribute {
            Attribute::Position(p) => self.position = p,
            Attribute::Size(s) => self.size = s,
            Attribute::Title(t) => self.title = Some(t),
            Attribute::Text(t) => self.text = Some(t),
            Attribute::Font(f) => self.font = Some(f),
            Attribute::SecondFont(f) => self.second_font = Some(f),
            Attribute::ZPosition(z) => self.z_position = z,
            Attribute::ItemHeight(v) => self.item_height = Some(v),
            Attribute::ItemWidth(v) => self.item_width = Some(v),
            Attribute::ItemCornerRadius(r) => self.item_corner_radius = Some(r),
            Attribute::ItemCornerRadiusSelected(r) => self.item_corner_radius_selected = Some(r),
            Attribute::CornerRadius(r) => self.corner_radius = Some(r),
            Attribute::Pixmap(p) => self.pixmap = Some(p),
            Attribute::BackgroundPixmap(p) => self.background_pixmap = Some(p),
            Attribute::SelectionPixmap(p) => self.selection_pixmap = Some(p),
            Attribute::SelectionPixmapLarge(p) => self.selection_pixmap_large = Some(p),
            Attribute::SliderPixmap(p) => self.slider_pixmap = Some(p),
            Attribute::ScrollbarBackgroundPixmap(p) => self.scrollbar_background_pixmap = Some(p),
            Attribute::Pointer(p, at) => self.pointer = Some((p, at)),
            Attribute::SeekPointer(p, at) => self.seek_pointer = Some((p, at)),
            Attribute::Alphatest(f) => self.alphatest = f,
            Attribute::Scale(on) => self.scale = on,
            Attribute::ScaleFlags(f) => self.scale_flags = f,
            Attribute::Orientation(o, reversed) => {
                self.orientation = o;
                self.reversed = reversed;
            }
            Attribute::VAlign(a) => self.valign = a,
            Attribute::HAlign(a) => self.halign = a,
            Attribute::TextOffset(p) => self.text_offset = p,
            Attribute::ShadowOffset(p) => self.shadow_offset = p,
            Attribute::Flags(f) => self.flags |= f,
            Attribute::BackgroundColor(c) => self.background_color = Some(c),
            Attribute::BackgroundColorSelected(c) => self.background_color_selected = Some(c),
            Attribute::ForegroundColor(c) => self.foreground_color = Some(c),
            Attribute::ForegroundColorSelected(c) => self.foreground_color_selected = Some(c),
            Attribute::ShadowColor(c) => self.shadow_color = Some(c),
            Attribute::BorderColor(c) => self.border_color = Some(c),
            Attribute::BorderWidth(w) => self.border_width = w,
            Attribute::WidgetBorderColor(c) => self.widget_border_color = Some(c),
            Attribute::WidgetBorderWidth(w) => self.widget_border_width = w,
            Attribute::ScrollbarMode(m) => self.scrollbar_mode = m,
            Attribute::ScrollbarWidth(w) => self.scrollbar_width = Some(w),
            Attribute::ScrollbarBorderWidth(w) => self.scrollbar_border_width = Some(w),
            Attribute::SliderBorderColor(c) => self.slider_border_color = Some(c),
            Attribute::SliderForegroundColor(c) => self.slider_foreground_color = Some(c),
            Attribute::SelectionDisabled => self.selection_enabled = false,
            Attribute::Transparent(on) => self.transparent = on,
            Attribute::WrapAround(on) => self.wrap_around = on,
            Attribute::NoWrap(on) => self.no_wrap = on,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_widget_defaults() {
        let widget = Widget::new();
        assert!(widget.selection_enabled);
        assert_eq!(widget.size, Size::ZERO);
        assert!(widget.alphatest.is_empty());
    }

    #[test]
    fn test_apply_attributes() {
        let mut widget = Widget::new();
        widget.apply(Attribute::Position(Point::new(10, 20)));
        widget.apply(Attribute::Orientation(Orientation::Horizontal, true));
        widget.apply(Attribute::SelectionDisabled);
        widget.apply(Attribute::Flags(WindowFlags::NO_BORDER));

        assert_eq!(widget.position, Point::new(10, 20));
        assert_eq!(widget.orientation, Orientation::Horizontal);
        assert!(widget.reversed);
        assert!(!widget.selection_enabled);
        assert!(widget.flags.contains(WindowFlags::NO_BORDER));
    }
}
