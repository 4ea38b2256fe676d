//! A horizontally scrollable tab strip with an interpolated highlight
//! indicator.
//!
//! The strip owns a row of host-supplied tab elements plus one highlight
//! indicator element. It consumes a continuous scroll-progress signal
//! (typically the bound [`pager`](crate::pager)) and re-derives the
//! indicator's position and width on every tick, so the highlight morphs
//! smoothly between tabs of unequal width while the user drags. Tapping a
//! tab only emits a selection event; the indicator moves when the host
//! reacts by scrolling the pager, which keeps its motion tied to actual
//! scrolling instead of jumping.
mod layout;

use std::{sync::Arc, time::Duration};

use derive_builder::Builder;
use parking_lot::RwLock;
use tessera_ui::{
    ComputedData, Constraint, CursorEventContent, DimensionValue, Dp, GestureState,
    MeasurementError, PressKeyEventType, Px, PxPosition, tessera,
    winit::window::CursorIcon,
};

use crate::{
    animation::Glide,
    layout_util::{cursor_within, resolve_dimension},
};

pub use layout::TabRect;
use layout::{hit_tab, indicator_rect, layout_tabs, reveal_offset};

const REVEAL_ANIMATION_DURATION: Duration = Duration::from_millis(250);

/// Paint hook receiving a tab index and whether that tab is highlighted.
pub type HighlightFn = Arc<dyn Fn(usize, bool) + Send + Sync>;

/// Arguments for the `tab_strip` component.
#[derive(Builder, Clone)]
#[builder(pattern = "owned")]
pub struct TabStripArgs {
    /// The desired width behavior of the strip.
    #[builder(default = "DimensionValue::FILLED")]
    pub width: DimensionValue,
    /// The desired height behavior of the strip.
    #[builder(default = "DimensionValue::Wrap { min: None, max: None }")]
    pub height: DimensionValue,
    /// Leading/trailing margin of the strip content. Also the slack kept
    /// between the indicator and the strip edge when revealing it.
    #[builder(default = "Dp(10.0)")]
    pub edge_margin: Dp,
    /// Uniform spacing between adjacent tabs.
    #[builder(default = "Dp(24.0)")]
    pub tab_spacing: Dp,
    /// Symmetric horizontal expansion of the indicator beyond the
    /// interpolated tab rect.
    #[builder(default = "Dp(0.0)")]
    pub indicator_padding: Dp,
    /// Fired once per recognized tap with the tapped tab index. The strip
    /// does not change its own current index here; the host is expected to
    /// scroll the bound pager, which drives the indicator through the
    /// shared progress signal.
    #[builder(default, setter(strip_option))]
    pub on_tab_selected: Option<Arc<dyn Fn(usize) + Send + Sync>>,
    /// Paint hook invoked when the highlighted tab changes: once with
    /// `false` for the previously focused index, then once with `true` for
    /// the new one.
    #[builder(default, setter(strip_option))]
    pub on_highlight_changed: Option<HighlightFn>,
}

impl Default for TabStripArgs {
    fn default() -> Self {
        TabStripArgsBuilder::default()
            .build()
            .expect("builder construction failed")
    }
}

/// Shared state for a [`tab_strip`].
///
/// Tab rects are republished on every layout pass and the indicator is a
/// pure function of those rects and the latest scroll progress; nothing
/// derived is persisted across geometry changes.
#[derive(Clone, Default)]
pub struct TabStripState {
    inner: Arc<RwLock<TabStripStateInner>>,
}

struct TabStripStateInner {
    rects: Vec<TabRect>,
    current_index: usize,
    focused_index: usize,
    progress: f32,
    indicator: Option<TabRect>,
    offset: Px,
    glide: Option<Glide>,
    viewport_width: Px,
    content_width: Px,
    edge_margin: Px,
    on_highlight: Option<HighlightFn>,
}

impl Default for TabStripStateInner {
    fn default() -> Self {
        Self {
            rects: Vec::new(),
            current_index: 0,
            focused_index: 0,
            progress: 0.0,
            indicator: None,
            offset: Px::ZERO,
            glide: None,
            viewport_width: Px::ZERO,
            content_width: Px::ZERO,
            edge_margin: Px::ZERO,
            on_highlight: None,
        }
    }
}

/// A pending highlight refresh, extracted under the lock and dispatched
/// after it is released so paint hooks may read the state again.
type HighlightRefresh = Option<(HighlightFn, usize, usize)>;

fn pending_highlight(inner: &mut TabStripStateInner) -> HighlightRefresh {
    let previous = inner.focused_index;
    let current = inner.current_index;
    inner.focused_index = current;
    if previous == current {
        return None;
    }
    inner
        .on_highlight
        .clone()
        .map(|hook| (hook, previous, current))
}

fn dispatch_highlight(refresh: HighlightRefresh) {
    if let Some((hook, previous, current)) = refresh {
        hook(previous, false);
        hook(current, true);
    }
}

impl TabStripState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A strip that starts on `index`; the indicator seeds from that tab's
    /// rect on the first layout pass.
    pub fn with_initial_tab(index: usize) -> Self {
        let state = Self::default();
        {
            let mut inner = state.inner.write();
            inner.current_index = index;
            inner.focused_index = index;
            inner.progress = index as f32;
        }
        state
    }

    /// The tab the continuous progress currently resolves to.
    pub fn current_index(&self) -> usize {
        self.inner.read().current_index
    }

    /// The tab last painted as highlighted. Converges with
    /// [`Self::current_index`] after every highlight refresh.
    pub fn focused_index(&self) -> usize {
        self.inner.read().focused_index
    }

    /// The indicator's interpolated rect in strip-content coordinates, or
    /// `None` before the first layout pass (and whenever the tab set is
    /// empty).
    pub fn indicator(&self) -> Option<TabRect> {
        self.inner.read().indicator
    }

    /// The strip's own horizontal scroll offset.
    pub fn scroll_offset(&self) -> Px {
        self.inner.read().offset
    }

    /// Feeds one scroll-progress tick (page index plus fractional offset).
    ///
    /// Recomputes the indicator rect by linear interpolation between the
    /// progress's base tab and its right neighbor, updates the current
    /// index and refreshes the highlight. The result depends only on
    /// `progress` and the measured rects, so repeated or
    /// direction-reversing ticks are safe; with no tabs this is a no-op.
    pub fn set_scroll_progress(&self, progress: f32) {
        let refresh = {
            let mut inner = self.inner.write();
            if inner.rects.is_empty() {
                return;
            }
            inner.progress = progress;
            inner.indicator = indicator_rect(&inner.rects, progress);
            let last = inner.rects.len() - 1;
            inner.current_index = (progress.floor() as isize).clamp(0, last as isize) as usize;
            pending_highlight(&mut inner)
        };
        dispatch_highlight(refresh);
    }

    /// Validates a tap target: `true` iff `index` is inside the tab set.
    ///
    /// Selection never moves the indicator or the current index by itself;
    /// both follow the next scroll-progress tick once the host repositions
    /// the bound pager. Out-of-range indices are silently ignored.
    pub fn select_tab(&self, index: usize) -> bool {
        let count = self.inner.read().rects.len();
        if index < count {
            true
        } else {
            tracing::trace!(index, count, "ignoring tap outside the tab set");
            false
        }
    }

    /// Scrolls the strip itself, animated, by the minimal amount that makes
    /// the indicator fully visible with the configured edge margin. Called
    /// when the bound pager settles. This is the only operation that writes
    /// the strip's own scroll offset; without an indicator it does nothing.
    pub fn ensure_indicator_visible(&self) {
        let refresh = {
            let mut inner = self.inner.write();
            let Some(indicator) = inner.indicator else {
                tracing::trace!("no indicator to reveal");
                return;
            };
            if let Some(target) =
                reveal_offset(indicator, inner.offset, inner.viewport_width, inner.edge_margin)
            {
                let max_offset = inner
                    .content_width
                    .saturating_sub(inner.viewport_width)
                    .max(Px::ZERO);
                let target = target.min(max_offset).max(Px::ZERO);
                if target != inner.offset {
                    inner.glide = Some(Glide::new(
                        inner.offset.to_f32(),
                        target.to_f32(),
                        REVEAL_ANIMATION_DURATION,
                    ));
                }
            }
            pending_highlight(&mut inner)
        };
        dispatch_highlight(refresh);
    }

    /// Publishes the rects produced by the measure pass and re-derives the
    /// indicator from the stored progress. Returns the indicator rect used
    /// for this frame's placement.
    pub(crate) fn sync_layout(
        &self,
        rects: Vec<TabRect>,
        viewport_width: Px,
        content_width: Px,
        edge_margin: Px,
    ) -> Option<TabRect> {
        let mut inner = self.inner.write();
        inner.rects = rects;
        inner.viewport_width = viewport_width;
        inner.content_width = content_width;
        inner.edge_margin = edge_margin;

        if inner.rects.is_empty() {
            inner.indicator = None;
            inner.offset = Px::ZERO;
            return None;
        }

        let last = inner.rects.len() - 1;
        inner.current_index = inner.current_index.min(last);
        inner.focused_index = inner.focused_index.min(last);
        inner.indicator = indicator_rect(&inner.rects, inner.progress);

        let max_offset = content_width.saturating_sub(viewport_width).max(Px::ZERO);
        inner.offset = inner.offset.min(max_offset).max(Px::ZERO);
        inner.indicator
    }

    pub(crate) fn install_highlight_listener(&self, listener: Option<HighlightFn>) {
        self.inner.write().on_highlight = listener;
    }

    pub(crate) fn tap_target(&self, content_x: Px) -> Option<usize> {
        hit_tab(&self.inner.read().rects, content_x)
    }

    /// User wheel input pans the strip directly, cancelling any reveal
    /// animation in flight.
    pub(crate) fn scroll_by(&self, delta: f32) {
        let mut inner = self.inner.write();
        inner.glide = None;
        let max_offset = inner
            .content_width
            .saturating_sub(inner.viewport_width)
            .max(Px::ZERO);
        let next = Px::saturating_from_f32(inner.offset.to_f32() - delta);
        inner.offset = next.min(max_offset).max(Px::ZERO);
    }

    /// Advances the reveal animation by one frame.
    pub(crate) fn advance_animation(&self) {
        let mut inner = self.inner.write();
        if let Some(glide) = inner.glide {
            if glide.is_finished() {
                inner.offset = Px::saturating_from_f32(glide.target());
                inner.glide = None;
            } else {
                inner.offset = Px::saturating_from_f32(glide.value());
            }
        }
    }
}

type TabContent = Box<dyn FnOnce(bool) + Send + Sync>;

/// Collects the host-supplied indicator and tab content for one frame.
pub struct TabStripScope<'a> {
    indicator: &'a mut Option<Box<dyn FnOnce() + Send + Sync>>,
    tabs: &'a mut Vec<TabContent>,
}

impl<'a> TabStripScope<'a> {
    /// Installs the highlight indicator content. Without one the strip
    /// still lays out tabs and emits selection events; it just never draws
    /// a highlight.
    pub fn indicator<F>(&mut self, content: F)
    where
        F: FnOnce() + Send + Sync + 'static,
    {
        *self.indicator = Some(Box::new(content));
    }

    /// Appends one tab. The closure receives whether its tab is currently
    /// highlighted.
    pub fn tab<F>(&mut self, content: F)
    where
        F: FnOnce(bool) + Send + Sync + 'static,
    {
        self.tabs.push(Box::new(content));
    }
}

/// # tab_strip
///
/// A row of tabs with a highlight indicator that tracks an external
/// scroll-progress signal.
///
/// ## Parameters
///
/// - `args` — spacing, margins and event hooks; see [`TabStripArgs`].
/// - `state` — a clonable [`TabStripState`]; feed it progress via
///   [`TabStripState::set_scroll_progress`] or bind it to a pager with
///   [`bind_tab_strip`](crate::progress::bind_tab_strip).
/// - `scope_config` — declares the indicator and tab content.
///
/// ## Example
///
/// ```rust,ignore
/// tab_strip(
///     TabStripArgsBuilder::default()
///         .on_tab_selected(Arc::new(move |index| {
///             pager_state.scroll_to_page(index, true);
///         }))
///         .build()
///         .unwrap(),
///     strip_state.clone(),
///     |strip| {
///         strip.indicator(|| underline());
///         for title in ["One", "Two", "Three"] {
///             strip.tab(move |highlighted| tab_label(title, highlighted));
///         }
///     },
/// );
/// ```
#[tessera]
pub fn tab_strip<F>(args: impl Into<TabStripArgs>, state: TabStripState, scope_config: F)
where
    F: FnOnce(&mut TabStripScope),
{
    let args: TabStripArgs = args.into();

    let mut indicator = None;
    let mut tabs = Vec::new();
    {
        let mut scope = TabStripScope {
            indicator: &mut indicator,
            tabs: &mut tabs,
        };
        scope_config(&mut scope);
    }
    let num_tabs = tabs.len();
    let has_indicator = indicator.is_some();

    state.install_highlight_listener(args.on_highlight_changed.clone());

    // Children: indicator first (if any), then one node per tab.
    if let Some(content) = indicator {
        content();
    }
    let highlighted = state.current_index();
    for (index, tab) in tabs.into_iter().enumerate() {
        tab(index == highlighted);
    }

    let measure_state = state.clone();
    let measure_args = args.clone();
    measure(Box::new(
        move |input| -> Result<ComputedData, MeasurementError> {
            input.enable_clipping();

            let intrinsic = Constraint::new(measure_args.width, measure_args.height);
            let merged = intrinsic.merge(input.parent_constraint);

            let edge_margin = Px::from(measure_args.edge_margin);
            let spacing = Px::from(measure_args.tab_spacing);

            let tab_ids = if has_indicator {
                &input.children_ids[1..]
            } else {
                &input.children_ids[..]
            };

            // Tabs take their intrinsic width; unequal widths are expected.
            let tab_constraint = Constraint::new(
                DimensionValue::Wrap { min: None, max: None },
                merged.height,
            );
            let mut widths = Vec::with_capacity(num_tabs);
            let mut sizes = Vec::with_capacity(num_tabs);
            let mut max_height = Px::ZERO;
            for &tab_id in tab_ids {
                let size = input.measure_child(tab_id, &tab_constraint)?;
                widths.push(size.width);
                max_height = max_height.max(size.height);
                sizes.push(size);
            }

            let rects = layout_tabs(&widths, edge_margin, spacing);
            let content_width = rects
                .last()
                .map_or(edge_margin + edge_margin, |rect| rect.right() + edge_margin);

            let width = resolve_dimension(merged.width, content_width);
            let height = resolve_dimension(merged.height, max_height);

            let indicator_frame =
                measure_state.sync_layout(rects.clone(), width, content_width, edge_margin);
            let offset = measure_state.scroll_offset();

            if has_indicator {
                let indicator_id = input.children_ids[0];
                match indicator_frame {
                    Some(frame) => {
                        let padding = Px::from(measure_args.indicator_padding);
                        let indicator_constraint = Constraint::new(
                            DimensionValue::Fixed(frame.width + padding + padding),
                            DimensionValue::Fixed(height),
                        );
                        let _ = input.measure_child(indicator_id, &indicator_constraint)?;
                        input.place_child(
                            indicator_id,
                            PxPosition::new(frame.x - padding - offset, Px::ZERO),
                        );
                    }
                    None => {
                        // Empty tab set: collapse the indicator entirely.
                        let indicator_constraint = Constraint::new(
                            DimensionValue::Fixed(Px::ZERO),
                            DimensionValue::Fixed(Px::ZERO),
                        );
                        let _ = input.measure_child(indicator_id, &indicator_constraint)?;
                        input.place_child(indicator_id, PxPosition::ZERO);
                    }
                }
            }

            for ((&tab_id, rect), size) in tab_ids.iter().zip(rects.iter()).zip(sizes.iter()) {
                // Center tabs vertically inside the strip.
                let y = Px((height.0 - size.height.0) / 2);
                input.place_child(tab_id, PxPosition::new(rect.x - offset, y));
            }

            Ok(ComputedData { width, height })
        },
    ));

    let handler_state = state;
    let handler_args = args;
    input_handler(Box::new(move |mut input| {
        // Runs once per frame, so the animation tick lives here.
        handler_state.advance_animation();

        let size = input.computed_data;
        let cursor_pos = input.cursor_position_rel;
        let cursor_inside = cursor_pos
            .map(|pos| cursor_within(size, pos))
            .unwrap_or(false);
        if !cursor_inside {
            return;
        }

        if handler_args.on_tab_selected.is_some() {
            input.requests.cursor_icon = CursorIcon::Pointer;
        }

        // Wheel scrolling pans the strip itself.
        for event in input
            .cursor_events
            .iter()
            .filter_map(|event| match &event.content {
                CursorEventContent::Scroll(event) => Some(event),
                _ => None,
            })
        {
            let delta = if event.delta_x.abs() >= event.delta_y.abs() {
                event.delta_x
            } else {
                event.delta_y
            };
            handler_state.scroll_by(delta);
        }

        let tapped = input.cursor_events.iter().any(|event| {
            event.gesture_state == GestureState::TapCandidate
                && matches!(
                    event.content,
                    CursorEventContent::Released(PressKeyEventType::Left)
                )
        });
        if tapped
            && let Some(pos) = cursor_pos
        {
            let content_x = pos.x + handler_state.scroll_offset();
            if let Some(index) = handler_state.tap_target(content_x)
                && handler_state.select_tab(index)
                && let Some(ref on_tab_selected) = handler_args.on_tab_selected
            {
                on_tab_selected(index);
            }
        }

        input.cursor_events.clear();
    }));
}
