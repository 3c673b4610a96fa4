//! Highlight geometry.
//!
//! A highlight only needs a vertical band: the top of the highest line and
//! the bottom of the lowest one. Horizontal extent comes from CSS.

/// CSS custom property carrying the highlight top offset.
pub const TOP_PROPERTY: &str = "--top-ref";

/// CSS custom property carrying the highlight height.
pub const HEIGHT_PROPERTY: &str = "--height-ref";

/// Vertical layout box of a rendered line, in CSS pixels.
#[derive(Clone, Debug, Copy, PartialEq, Default)]
pub struct LineBox {
    pub top: f64,
    pub height: f64,
}

impl LineBox {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Vertical band covering a set of lines.
#[derive(Clone, Debug, Copy, PartialEq)]
pub struct HighlightSpan {
    pub top: f64,
    pub height: f64,
}

impl HighlightSpan {
    /// Smallest band containing every box, or `None` for no boxes.
    pub fn covering(boxes: impl IntoIterator<Item = LineBox>) -> Option<Self> {
        let mut top = f64::INFINITY;
        let mut bottom = f64::NEG_INFINITY;
        let mut any = false;
        for b in boxes {
            any = true;
            top = top.min(b.top);
            bottom = bottom.max(b.bottom());
        }
        any.then(|| Self {
            top,
            height: bottom - top,
        })
    }

    /// Value for [`TOP_PROPERTY`].
    pub fn top_css(&self) -> String {
        format!("{}px", self.top)
    }

    /// Value for [`HEIGHT_PROPERTY`].
    pub fn height_css(&self) -> String {
        format!("{}px", self.height)
    }
}
