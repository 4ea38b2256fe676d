//! Plain-rect measurement for the tab strip.
//!
//! Tab geometry lives as an ordered array of `(x, width)` pairs produced by a
//! single measure step. The indicator interpolation below is a pure function
//! of that array and the current scroll progress; derived geometry is never
//! stored here.

use tessera_ui::Px;

/// One tab's horizontal slot inside the strip content.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TabRect {
    pub x: Px,
    pub width: Px,
}

impl TabRect {
    /// The slot's trailing edge.
    pub fn right(&self) -> Px {
        self.x + self.width
    }
}

/// Positions tabs left-to-right: a leading margin, then uniform spacing
/// between adjacent slots.
pub(crate) fn layout_tabs(widths: &[Px], edge_margin: Px, spacing: Px) -> Vec<TabRect> {
    let mut rects = Vec::with_capacity(widths.len());
    let mut x = edge_margin;
    for (index, &width) in widths.iter().enumerate() {
        if index > 0 {
            x += spacing;
        }
        rects.push(TabRect { x, width });
        x += width;
    }
    rects
}

/// Interpolated highlight geometry for a scroll progress value.
///
/// `floor(progress)` picks the base tab and the fractional part sweeps the
/// rect linearly toward the next tab, so the indicator morphs between slots
/// of unequal width instead of sliding as a fixed block. Progress outside
/// `[0, len)` degenerates to the boundary tab's own rect; the last tab never
/// interpolates toward a slot past the end.
pub(crate) fn indicator_rect(rects: &[TabRect], progress: f32) -> Option<TabRect> {
    if rects.is_empty() {
        return None;
    }
    let last = rects.len() - 1;
    let index = (progress.floor() as isize).clamp(0, last as isize) as usize;
    let t = (progress - index as f32).clamp(0.0, 1.0);

    let tab = rects[index];
    let next = rects[(index + 1).min(last)];

    let gap = (next.x.0 - tab.x.0) as f32;
    let delta_width = (next.width.0 - tab.width.0) as f32;
    let x = tab.x.0 as f32 + gap * t;
    let width = tab.width.0 as f32 + delta_width * t;

    Some(TabRect {
        x: Px(x.round() as i32),
        width: Px(width.round() as i32),
    })
}

/// Minimal strip-offset change that brings `indicator` fully into a viewport
/// currently scrolled to `offset`, keeping `margin` slack on the revealed
/// edge. `None` when the indicator is already fully visible.
pub(crate) fn reveal_offset(
    indicator: TabRect,
    offset: Px,
    viewport: Px,
    margin: Px,
) -> Option<Px> {
    if indicator.x < offset {
        Some(indicator.x - margin)
    } else if indicator.right() > offset + viewport {
        Some(indicator.right() - viewport + margin)
    } else {
        None
    }
}

/// The tab whose slot contains the content-space x position, if any.
pub(crate) fn hit_tab(rects: &[TabRect], x: Px) -> Option<usize> {
    rects.iter().position(|rect| x >= rect.x && x < rect.right())
}
