//! Space allocation for layout fragments
//!
//! A context is the rectangle still available to the children of a screen
//! or panel. Sequential contexts hand out space and shrink; stacking
//! contexts let children overlap and never change.

use crate::errors::Diagnostics;
use crate::expr::{self, CoordinateError};
use crate::types::{split_pair, AxisScale, FontMetrics, Point, Rect, Scale, Size};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutMode {
    /// Each placement consumes part of the remaining rectangle
    Sequential,
    /// Placements overlap; the rectangle is never shrunk
    Stacking,
}

impl LayoutMode {
    /// Mode for a panel's `layout` attribute
    pub fn from_layout_attr(layout: Option<&str>) -> Self {
        match layout {
            Some("stack") => LayoutMode::Stacking,
            _ => LayoutMode::Sequential,
        }
    }
}

/// Resolved position and size of one child
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Placement {
    pub position: Point,
    pub size: Size,
}

impl Placement {
    pub fn rect(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.size.width, self.size.height)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutContext {
    mode: LayoutMode,
    /// Rectangle at creation; absolute positions are relative to it
    full: Rect,
    remaining: Rect,
    scale: Scale,
    skin_factor: f64,
}

impl LayoutContext {
    pub fn new(mode: LayoutMode, rect: Rect, scale: Scale, skin_factor: f64) -> Self {
        Self {
            mode,
            full: rect,
            remaining: rect,
            scale,
            skin_factor,
        }
    }

    pub fn sequential(rect: Rect, scale: Scale, skin_factor: f64) -> Self {
        Self::new(LayoutMode::Sequential, rect, scale, skin_factor)
    }

    pub fn stacking(rect: Rect, scale: Scale, skin_factor: f64) -> Self {
        Self::new(LayoutMode::Stacking, rect, scale, skin_factor)
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    pub fn full(&self) -> Rect {
        self.full
    }

    pub fn remaining(&self) -> Rect {
        self.remaining
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    pub fn skin_factor(&self) -> f64 {
        self.skin_factor
    }

    /// Make children relative to the context's own origin
    pub fn reset_origin(&mut self) {
        self.remaining.x -= self.full.x;
        self.remaining.y -= self.full.y;
        self.full.x = 0;
        self.full.y = 0;
    }

    /// Carve out a child's rectangle
    ///
    /// `position` is `fill`, an edge (`top`, `bottom`, `left`, `right`) or an
    /// `"x,y"` coordinate pair. `size` is a `"w,h"` pair evaluated against
    /// the remaining space. Coordinate failures are reported and count as 0.
    pub fn place(
        &mut self,
        position: &str,
        size: Option<&str>,
        font: Option<FontMetrics>,
        diagnostics: &mut Diagnostics,
    ) -> Placement {
        let sequential = self.mode == LayoutMode::Sequential;
        let r = self.remaining;

        if position == "fill" {
            if sequential {
                self.remaining.width = 0;
                self.remaining.height = 0;
            }
            return Placement {
                position: r.origin(),
                size: r.size(),
            };
        }

        let Size { width: w, height: h } = self.eval_size(size, font, diagnostics);

        match position {
            "top" => {
                if sequential {
                    self.remaining.height -= h;
                    self.remaining.y += h;
                }
                Placement {
                    position: r.origin(),
                    size: Size::new(r.width, h),
                }
            }
            "bottom" => {
                if sequential {
                    self.remaining.height -= h;
                }
                Placement {
                    position: Point::new(r.x, r.y + r.height - h),
                    size: Size::new(r.width, h),
                }
            }
            "left" => {
                if sequential {
                    self.remaining.x += w;
                    self.remaining.width -= w;
                }
                Placement {
                    position: r.origin(),
                    size: Size::new(w, r.height),
                }
            }
            "right" => {
                if sequential {
                    self.remaining.width -= w;
                }
                Placement {
                    position: Point::new(r.x + r.width - w, r.y),
                    size: Size::new(w, r.height),
                }
            }
            _ => {
                let size = Size::new(w, h);
                Placement {
                    position: self.eval_position(position, size, font, diagnostics),
                    size,
                }
            }
        }
    }

    /// Place a child and open a new context over its rectangle
    pub fn derive(
        &mut self,
        mode: LayoutMode,
        position: &str,
        size: Option<&str>,
        font: Option<FontMetrics>,
        diagnostics: &mut Diagnostics,
    ) -> LayoutContext {
        let placement = self.place(position, size, font, diagnostics);
        LayoutContext::new(mode, placement.rect(), self.scale, self.skin_factor)
    }

    /// Evaluate a `"w,h"` size without placing anything
    pub fn eval_size(
        &self,
        size: Option<&str>,
        font: Option<FontMetrics>,
        diagnostics: &mut Diagnostics,
    ) -> Size {
        let Some(size) = size else {
            return Size::ZERO;
        };
        let (w, h) = match split_pair(size) {
            Ok(pair) => pair,
            Err(err) => {
                diagnostics.report(bad_pair(size, err.to_string()));
                return Size::ZERO;
            }
        };
        Size::new(
            self.eval(w, self.remaining.width, 0, font, self.scale.x, diagnostics),
            self.eval(h, self.remaining.height, 0, font, self.scale.y, diagnostics),
        )
    }

    fn eval_position(
        &self,
        position: &str,
        size: Size,
        font: Option<FontMetrics>,
        diagnostics: &mut Diagnostics,
    ) -> Point {
        let (x, y) = match split_pair(position) {
            Ok(pair) => pair,
            Err(err) => {
                diagnostics.report(bad_pair(position, err.to_string()));
                return self.full.origin();
            }
        };
        Point::new(
            self.full.x + self.eval(x, self.full.width, size.width, font, self.scale.x, diagnostics),
            self.full.y + self.eval(y, self.full.height, size.height, font, self.scale.y, diagnostics),
        )
    }

    fn eval(
        &self,
        input: &str,
        extent: i32,
        object_size: i32,
        font: Option<FontMetrics>,
        scale: AxisScale,
        diagnostics: &mut Diagnostics,
    ) -> i32 {
        // "*" leaves the value unspecified, which for layout means nothing
        expr::evaluate_or_report(input, extent, object_size, font, scale, self.skin_factor, diagnostics)
            .unwrap_or(0)
    }
}

fn bad_pair(input: &str, message: String) -> CoordinateError {
    CoordinateError::Syntax {
        input: input.to_string(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(mode: LayoutMode) -> LayoutContext {
        LayoutContext::new(mode, Rect::new(0, 0, 100, 100), Scale::IDENTITY, 1.0)
    }

    #[test]
    fn test_sequential_edges_then_fill() {
        let mut c = ctx(LayoutMode::Sequential);
        let mut d = Diagnostics::new();

        let top = c.place("top", Some("*,20"), None, &mut d);
        assert_eq!(top.rect(), Rect::new(0, 0, 100, 20));

        let left = c.place("left", Some("30,*"), None, &mut d);
        assert_eq!(left.rect(), Rect::new(0, 20, 30, 80));

        let fill = c.place("fill", None, None, &mut d);
        assert_eq!(fill.rect(), Rect::new(30, 20, 70, 80));
        assert_eq!(c.remaining().size(), Size::ZERO);
        // fill keeps the origin
        assert_eq!(c.remaining().origin(), Point::new(30, 20));

        let after = c.place("fill", None, None, &mut d);
        assert_eq!(after.size, Size::ZERO);
        assert!(d.is_empty());
    }

    #[test]
    fn test_bottom_and_right() {
        let mut c = ctx(LayoutMode::Sequential);
        let mut d = Diagnostics::new();

        let bottom = c.place("bottom", Some("0,10"), None, &mut d);
        assert_eq!(bottom.rect(), Rect::new(0, 90, 100, 10));
        let right = c.place("right", Some("25,0"), None, &mut d);
        assert_eq!(right.rect(), Rect::new(75, 0, 25, 90));
        assert_eq!(c.remaining(), Rect::new(0, 0, 75, 90));
    }

    #[test]
    fn test_stacking_never_shrinks() {
        let mut c = ctx(LayoutMode::Stacking);
        let mut d = Diagnostics::new();

        assert_eq!(c.place("fill", None, None, &mut d).rect(), Rect::new(0, 0, 100, 100));
        assert_eq!(c.place("top", Some("0,40"), None, &mut d).rect(), Rect::new(0, 0, 100, 40));
        assert_eq!(c.place("fill", None, None, &mut d).rect(), Rect::new(0, 0, 100, 100));
        assert_eq!(c.remaining(), Rect::new(0, 0, 100, 100));
    }

    #[test]
    fn test_absolute_positions_use_full_extent() {
        let mut c = ctx(LayoutMode::Sequential);
        let mut d = Diagnostics::new();

        c.place("top", Some("0,50"), None, &mut d);
        let centered = c.place("center,center", Some("20,10"), None, &mut d);
        // Centering is against the whole parent, size against what is left
        assert_eq!(centered.rect(), Rect::new(40, 45, 20, 10));
        assert_eq!(c.remaining(), Rect::new(0, 50, 100, 50));

        let relative = c.place("10%,e-10", Some("50%,10"), None, &mut d);
        assert_eq!(relative.rect(), Rect::new(10, 90, 50, 10));
    }

    #[test]
    fn test_derive_and_reset_origin() {
        let mut screen = LayoutContext::stacking(Rect::new(0, 0, 1280, 720), Scale::IDENTITY, 1.0);
        let mut d = Diagnostics::new();

        let mut inner = screen.derive(LayoutMode::Sequential, "100,50", Some("400,300"), None, &mut d);
        assert_eq!(inner.full(), Rect::new(100, 50, 400, 300));
        inner.reset_origin();
        assert_eq!(inner.remaining(), Rect::new(0, 0, 400, 300));

        let header = inner.place("top", Some("0,40"), None, &mut d);
        assert_eq!(header.rect(), Rect::new(0, 0, 400, 40));
        assert_eq!(inner.remaining(), Rect::new(0, 40, 400, 260));
    }

    #[test]
    fn test_scaled_context() {
        // Skin declared at 1280x720 shown on 1920x1080
        let scale = Scale::new(AxisScale::new(1920, 1280), AxisScale::new(1080, 720));
        let mut c = LayoutContext::stacking(Rect::new(0, 0, 1920, 1080), scale, 1.0);
        let mut d = Diagnostics::new();

        let p = c.place("100,c", Some("200,10%"), None, &mut d);
        assert_eq!(p.rect(), Rect::new(150, 540, 300, 108));
    }

    #[test]
    fn test_bad_pairs_report() {
        let mut c = ctx(LayoutMode::Sequential);
        let mut d = Diagnostics::new();

        let p = c.place("10", Some("20"), None, &mut d);
        assert_eq!(p.rect(), Rect::new(0, 0, 0, 0));
        assert_eq!(d.len(), 2);

        let p = c.place("5,5", Some("2w,10"), None, &mut d);
        assert_eq!(p.size, Size::new(0, 10));
        assert_eq!(d.len(), 3);
    }
}
