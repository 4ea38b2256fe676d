//! A horizontally paging container that hosts one full-viewport page per
//! index.
//!
//! The pager's scroll position is the single source of truth for paging
//! progress: every offset change is broadcast synchronously to the
//! registered observers (see [`crate::progress`]), and coming to rest on a
//! page boundary emits a settle event. External code moves the pager only
//! through [`PagerState::scroll_to_page`]; drags and animations settle onto
//! page boundaries by themselves.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

use derive_builder::Builder;
use parking_lot::RwLock;
use tessera_ui::{
    ComputedData, Constraint, CursorEventContent, DimensionValue, MeasurementError, Px,
    PxPosition, tessera,
};

use crate::{
    animation::Glide,
    layout_util::{cursor_within, resolve_dimension},
    progress::ProgressObservers,
};

const PAGE_ANIMATION_DURATION: Duration = Duration::from_millis(250);
/// Idle time after the last scroll event before the pager snaps to the
/// nearest page boundary.
const SNAP_DELAY: Duration = Duration::from_millis(120);

/// Arguments for the `pager` component.
#[derive(Builder, Clone)]
#[builder(pattern = "owned")]
pub struct PagerArgs {
    /// The desired width behavior of the pager viewport.
    #[builder(default = "DimensionValue::FILLED")]
    pub width: DimensionValue,
    /// The desired height behavior of the pager viewport.
    #[builder(default = "DimensionValue::FILLED")]
    pub height: DimensionValue,
}

impl Default for PagerArgs {
    fn default() -> Self {
        PagerArgsBuilder::default()
            .build()
            .expect("builder construction failed")
    }
}

/// Retained record for one hosted page.
///
/// Pages are rebuilt all-or-nothing by [`PagerState::reload`]; a record from
/// a previous generation keeps answering [`Page::index`] but reports itself
/// as detached.
#[derive(Debug)]
pub struct Page {
    index: usize,
    attached: AtomicBool,
}

impl Page {
    fn new(index: usize) -> Self {
        Self {
            index,
            attached: AtomicBool::new(true),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Whether this record still belongs to the pager's current page set.
    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::Relaxed)
    }

    fn detach(&self) {
        self.attached.store(false, Ordering::Relaxed);
    }
}

/// Shared state for a [`pager`]: the page registry, the scroll offset and
/// the observers subscribed to it.
#[derive(Clone, Default)]
pub struct PagerState {
    inner: Arc<RwLock<PagerStateInner>>,
}

struct PagerStateInner {
    page_count: usize,
    pages: Vec<Arc<Page>>,
    offset: Px,
    viewport: ComputedData,
    glide: Option<Glide>,
    pending_page: Option<usize>,
    last_scroll_input: Option<Instant>,
    settle_notified: bool,
    observers: ProgressObservers,
}

impl Default for PagerStateInner {
    fn default() -> Self {
        Self {
            page_count: 0,
            pages: Vec::new(),
            offset: Px::ZERO,
            viewport: ComputedData::ZERO,
            glide: None,
            pending_page: None,
            last_scroll_input: None,
            settle_notified: true,
            observers: ProgressObservers::default(),
        }
    }
}

fn rebuild_pages(inner: &mut PagerStateInner) {
    for page in inner.pages.drain(..) {
        page.detach();
    }
    inner.pages = (0..inner.page_count)
        .map(|index| Arc::new(Page::new(index)))
        .collect();
}

fn max_pager_offset(inner: &PagerStateInner) -> Px {
    if inner.page_count == 0 || inner.viewport.width <= Px::ZERO {
        Px::ZERO
    } else {
        Px(inner.viewport.width.0 * (inner.page_count as i32 - 1))
    }
}

fn progress_of(offset: Px, width: Px) -> f32 {
    if width <= Px::ZERO {
        0.0
    } else {
        offset.to_f32() / width.to_f32()
    }
}

fn page_for(offset: Px, width: Px) -> usize {
    if width <= Px::ZERO {
        0
    } else {
        (offset.to_f32() / width.to_f32()).round().max(0.0) as usize
    }
}

impl PagerState {
    /// A pager hosting `page_count` pages, starting on page 0.
    pub fn new(page_count: usize) -> Self {
        let state = Self::default();
        state.reset(page_count);
        state
    }

    /// Replaces the page count and rebuilds the page set from scratch,
    /// returning the pager to page 0. This is the supported way to
    /// re-configure a pager after its initial setup.
    pub fn reset(&self, page_count: usize) {
        let mut inner = self.inner.write();
        inner.page_count = page_count;
        rebuild_pages(&mut inner);
        inner.offset = Px::ZERO;
        inner.glide = None;
        inner.pending_page = None;
        inner.settle_notified = true;
    }

    /// Tears down all current pages and rebuilds them. Prior [`Page`]
    /// references are detached; repeated calls never accumulate duplicate
    /// pages.
    pub fn reload(&self) {
        let mut inner = self.inner.write();
        rebuild_pages(&mut inner);
    }

    pub fn page_count(&self) -> usize {
        self.inner.read().page_count
    }

    /// The page at `index`, or `None` when out of range. Callers may probe
    /// speculatively; a bad index is never a fault.
    pub fn page_at(&self, index: usize) -> Option<Arc<Page>> {
        self.inner.read().pages.get(index).cloned()
    }

    /// Continuous paging progress: the integer part is the page index, the
    /// fractional part the in-between offset. Zero before the first layout
    /// pass.
    pub fn progress(&self) -> f32 {
        let inner = self.inner.read();
        progress_of(inner.offset, inner.viewport.width)
    }

    /// The page the viewport's leading edge is currently on.
    pub fn current_page(&self) -> usize {
        self.progress().floor().max(0.0) as usize
    }

    /// Repositions the pager on `index`. This is the single write channel
    /// for external code; out-of-range indices are silently ignored.
    ///
    /// Non-animated calls jump, notifying progress and settle observers
    /// immediately. Animated calls start a glide whose completion is the
    /// "scroll animation finished" event.
    pub fn scroll_to_page(&self, index: usize, animated: bool) {
        let jumped = {
            let mut inner = self.inner.write();
            if index >= inner.page_count {
                tracing::trace!(
                    index,
                    page_count = inner.page_count,
                    "ignoring scroll to out-of-range page"
                );
                return;
            }
            if inner.viewport.width <= Px::ZERO {
                // Not measured yet; applied by the first layout pass.
                inner.pending_page = Some(index);
                return;
            }
            let target = Px(inner.viewport.width.0 * index as i32);
            if animated {
                if target != inner.offset {
                    inner.glide = Some(Glide::new(
                        inner.offset.to_f32(),
                        target.to_f32(),
                        PAGE_ANIMATION_DURATION,
                    ));
                    inner.settle_notified = false;
                }
                false
            } else {
                inner.glide = None;
                inner.offset = target;
                inner.settle_notified = true;
                true
            }
        };
        if jumped {
            self.emit_progress();
            self.emit_settled(index);
        }
    }

    /// Registers an observer for every paging-progress change. Observers
    /// are called synchronously at the mutation site, in registration
    /// order; registering more observers never displaces earlier ones.
    pub fn observe_progress<F>(&self, observer: F)
    where
        F: Fn(f32) + Send + Sync + 'static,
    {
        self.inner.write().observers.push_progress(Arc::new(observer));
    }

    /// Registers an observer for settle events (drag end and animation
    /// end), receiving the resting page index.
    pub fn observe_settled<F>(&self, observer: F)
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.inner.write().observers.push_settled(Arc::new(observer));
    }

    /// Publishes the measured viewport, applies any pre-layout page jump
    /// and keeps the offset inside the pageable range. Returns the offset
    /// to place children with.
    pub(crate) fn sync_viewport(&self, viewport: ComputedData) -> Px {
        let (offset, notify_progress, jumped_to) = {
            let mut inner = self.inner.write();
            inner.viewport = viewport;
            let mut notify_progress = false;
            let mut jumped_to = None;
            if viewport.width > Px::ZERO
                && let Some(page) = inner.pending_page.take()
            {
                let page = page.min(inner.page_count.saturating_sub(1));
                inner.offset = Px(viewport.width.0 * page as i32);
                inner.glide = None;
                inner.settle_notified = true;
                notify_progress = true;
                jumped_to = Some(page);
            }
            let max_offset = max_pager_offset(&inner);
            let clamped = inner.offset.min(max_offset).max(Px::ZERO);
            if clamped != inner.offset {
                inner.offset = clamped;
                notify_progress = true;
            }
            (inner.offset, notify_progress, jumped_to)
        };
        if notify_progress {
            self.emit_progress();
        }
        if let Some(page) = jumped_to {
            self.emit_settled(page);
        }
        offset
    }

    /// Applies one wheel/drag delta, cancelling any glide in flight. The
    /// pager snaps back onto a page boundary once input goes idle.
    pub(crate) fn handle_scroll(&self, delta: f32) {
        let changed = {
            let mut inner = self.inner.write();
            if inner.page_count == 0 || inner.viewport.width <= Px::ZERO {
                return;
            }
            inner.glide = None;
            inner.last_scroll_input = Some(Instant::now());
            inner.settle_notified = false;
            let max_offset = max_pager_offset(&inner);
            let next = Px::saturating_from_f32(inner.offset.to_f32() - delta)
                .min(max_offset)
                .max(Px::ZERO);
            let changed = next != inner.offset;
            inner.offset = next;
            changed
        };
        if changed {
            self.emit_progress();
        }
    }

    /// Advances glides by one frame and performs settle detection.
    pub(crate) fn advance(&self) {
        let (progress_changed, settled) = {
            let mut inner = self.inner.write();
            let mut progress_changed = false;
            let mut settled = None;
            if let Some(glide) = inner.glide {
                if glide.is_finished() {
                    let target = Px::saturating_from_f32(glide.target());
                    progress_changed = target != inner.offset;
                    inner.offset = target;
                    inner.glide = None;
                    inner.settle_notified = true;
                    settled = Some(page_for(inner.offset, inner.viewport.width));
                } else {
                    let value = Px::saturating_from_f32(glide.value());
                    if value != inner.offset {
                        inner.offset = value;
                        progress_changed = true;
                    }
                }
            } else if !inner.settle_notified {
                let idle = inner
                    .last_scroll_input
                    .is_none_or(|at| at.elapsed() >= SNAP_DELAY);
                if idle && inner.page_count > 0 && inner.viewport.width > Px::ZERO {
                    let width = inner.viewport.width;
                    let last = inner.page_count as i32 - 1;
                    let nearest =
                        ((inner.offset.to_f32() / width.to_f32()).round() as i32).clamp(0, last);
                    let target = Px(width.0 * nearest);
                    if target == inner.offset {
                        inner.settle_notified = true;
                        settled = Some(nearest as usize);
                    } else {
                        inner.glide = Some(Glide::new(
                            inner.offset.to_f32(),
                            target.to_f32(),
                            PAGE_ANIMATION_DURATION,
                        ));
                    }
                }
            }
            (progress_changed, settled)
        };
        if progress_changed {
            self.emit_progress();
        }
        if let Some(page) = settled {
            self.emit_settled(page);
        }
    }

    fn emit_progress(&self) {
        let (observers, progress) = {
            let inner = self.inner.read();
            (
                inner.observers.progress_list(),
                progress_of(inner.offset, inner.viewport.width),
            )
        };
        for observer in observers {
            observer(progress);
        }
    }

    fn emit_settled(&self, page: usize) {
        let observers = self.inner.read().observers.settled_list();
        for observer in observers {
            observer(page);
        }
    }
}

/// # pager
///
/// Hosts one page per index inside a horizontally paging viewport. Every
/// page is sized to exactly the viewport and laid out contiguously, so the
/// scrollable extent is `page_count x viewport_width`.
///
/// ## Parameters
///
/// - `args` — viewport dimensions; see [`PagerArgs`].
/// - `state` — a clonable [`PagerState`] carrying the page count, page
///   registry and scroll position.
/// - `page_content` — the host's page factory, invoked with each page
///   index.
///
/// ## Example
///
/// ```rust,ignore
/// pager(PagerArgs::default(), pager_state.clone(), move |index| {
///     page_body(index);
/// });
/// ```
#[tessera]
pub fn pager<F>(args: impl Into<PagerArgs>, state: PagerState, page_content: F)
where
    F: Fn(usize) + Send + Sync + 'static,
{
    let args: PagerArgs = args.into();
    let page_count = state.page_count();

    for index in 0..page_count {
        page_content(index);
    }

    let measure_state = state.clone();
    measure(Box::new(
        move |input| -> Result<ComputedData, MeasurementError> {
            input.enable_clipping();

            let intrinsic = Constraint::new(args.width, args.height);
            let merged = intrinsic.merge(input.parent_constraint);
            let width = resolve_dimension(merged.width, Px::ZERO);
            let height = resolve_dimension(merged.height, Px::ZERO);
            let viewport = ComputedData { width, height };

            let offset = measure_state.sync_viewport(viewport);

            let page_constraint = Constraint::new(
                DimensionValue::Fixed(width),
                DimensionValue::Fixed(height),
            );
            for (index, &page_id) in input.children_ids.iter().enumerate() {
                let _ = input.measure_child(page_id, &page_constraint)?;
                input.place_child(
                    page_id,
                    PxPosition::new(Px(width.0 * index as i32) - offset, Px::ZERO),
                );
            }

            Ok(viewport)
        },
    ));

    let handler_state = state;
    input_handler(Box::new(move |mut input| {
        // Runs once per frame, so the animation tick lives here.
        handler_state.advance();

        let size = input.computed_data;
        let cursor_inside = input
            .cursor_position_rel
            .map(|pos| cursor_within(size, pos))
            .unwrap_or(false);
        if !cursor_inside {
            return;
        }

        for event in input
            .cursor_events
            .iter()
            .filter_map(|event| match &event.content {
                CursorEventContent::Scroll(event) => Some(event),
                _ => None,
            })
        {
            // Either wheel axis drags the pager horizontally.
            let delta = if event.delta_x.abs() >= event.delta_y.abs() {
                event.delta_x
            } else {
                event.delta_y
            };
            handler_state.handle_scroll(delta);
        }

        input.cursor_events.clear();
    }));
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    fn measured(page_count: usize) -> PagerState {
        let state = PagerState::new(page_count);
        state.sync_viewport(ComputedData {
            width: Px(300),
            height: Px(200),
        });
        state
    }

    #[test]
    fn pages_are_built_for_every_index() {
        let state = PagerState::new(3);
        for index in 0..3 {
            let page = state.page_at(index).unwrap();
            assert_eq!(page.index(), index);
            assert!(page.is_attached());
        }
        assert!(state.page_at(3).is_none());
    }

    #[test]
    fn reload_rebuilds_without_accumulating() {
        let state = PagerState::new(2);
        let old = state.page_at(1).unwrap();

        state.reload();
        state.reload();

        assert_eq!(state.page_count(), 2);
        assert!(!old.is_attached());
        let fresh = state.page_at(1).unwrap();
        assert!(fresh.is_attached());
        assert!(!Arc::ptr_eq(&old, &fresh));
    }

    #[test]
    fn reset_changes_the_page_count() {
        let state = measured(3);
        state.scroll_to_page(2, false);
        let old = state.page_at(0).unwrap();

        state.reset(5);
        assert_eq!(state.page_count(), 5);
        assert!(!old.is_attached());
        assert!(state.page_at(4).is_some());
        assert_eq!(state.progress(), 0.0);
    }

    #[test]
    fn jump_notifies_progress_then_settle_in_registration_order() {
        let state = measured(4);
        let log = Arc::new(Mutex::new(Vec::new()));

        let sink = log.clone();
        state.observe_progress(move |progress| {
            sink.lock().unwrap().push(format!("a:{progress}"));
        });
        let sink = log.clone();
        state.observe_progress(move |progress| {
            sink.lock().unwrap().push(format!("b:{progress}"));
        });
        let sink = log.clone();
        state.observe_settled(move |page| {
            sink.lock().unwrap().push(format!("settled:{page}"));
        });

        state.scroll_to_page(2, false);

        assert_eq!(state.progress(), 2.0);
        assert_eq!(state.current_page(), 2);
        assert_eq!(*log.lock().unwrap(), vec!["a:2", "b:2", "settled:2"]);
    }

    #[test]
    fn out_of_range_page_is_ignored() {
        let state = measured(3);
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = log.clone();
        state.observe_progress(move |progress| {
            sink.lock().unwrap().push(progress);
        });

        state.scroll_to_page(3, false);
        assert_eq!(state.progress(), 0.0);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn wheel_drag_produces_fractional_progress() {
        let state = measured(3);
        state.handle_scroll(-150.0);
        assert!((state.progress() - 0.5).abs() < 1e-6);
        assert_eq!(state.current_page(), 0);
    }

    #[test]
    fn drag_is_clamped_to_the_page_range() {
        let state = measured(3);
        state.handle_scroll(500.0);
        assert_eq!(state.progress(), 0.0);
        state.handle_scroll(-10_000.0);
        assert_eq!(state.progress(), 2.0);
    }

    #[test]
    fn pre_layout_scroll_is_applied_on_first_measure() {
        let state = PagerState::new(4);
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = log.clone();
        state.observe_settled(move |page| {
            sink.lock().unwrap().push(page);
        });

        state.scroll_to_page(3, true);
        assert_eq!(state.progress(), 0.0);

        state.sync_viewport(ComputedData {
            width: Px(300),
            height: Px(200),
        });
        assert_eq!(state.progress(), 3.0);
        assert_eq!(*log.lock().unwrap(), vec![3]);
    }

    #[test]
    fn idle_drag_snaps_to_the_nearest_page() {
        let state = measured(3);
        state.handle_scroll(-100.0);
        state.inner.write().last_scroll_input = Some(Instant::now() - SNAP_DELAY);

        state.advance();
        let glide = state.inner.read().glide.expect("snap should animate");
        assert_eq!(glide.target(), 0.0);
    }

    #[test]
    fn finished_animation_emits_exactly_one_settle() {
        let state = measured(3);
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = log.clone();
        state.observe_settled(move |page| {
            sink.lock().unwrap().push(page);
        });

        state.handle_scroll(-400.0);
        state.inner.write().glide = Some(Glide::new(400.0, 300.0, Duration::ZERO));

        state.advance();
        assert_eq!(state.progress(), 1.0);
        assert_eq!(*log.lock().unwrap(), vec![1]);

        // Nothing further once settled.
        state.advance();
        assert_eq!(*log.lock().unwrap(), vec![1]);
    }

    #[test]
    fn viewport_shrink_keeps_the_offset_in_range() {
        let state = measured(3);
        state.scroll_to_page(2, false);
        state.sync_viewport(ComputedData {
            width: Px(100),
            height: Px(200),
        });
        // Max offset is now 200; progress stays on the last page.
        assert_eq!(state.progress(), 2.0);
    }
}
