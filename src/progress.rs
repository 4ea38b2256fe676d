//! Scroll-progress fan-out from a pager to its listeners.
//!
//! The pager pushes two signals: a continuous progress value on every offset
//! change and a settle event when motion comes to rest on a page boundary.
//! [`bind_tab_strip`] wires both into a [`TabStripState`] so the strip's
//! indicator tracks the pager frame by frame.

use std::sync::Arc;

use smallvec::SmallVec;

use crate::{pager::PagerState, tab_strip::TabStripState};

pub(crate) type ProgressFn = Arc<dyn Fn(f32) + Send + Sync>;
pub(crate) type SettleFn = Arc<dyn Fn(usize) + Send + Sync>;

/// Observer lists for a pager's progress and settle signals.
///
/// Observers are invoked in registration order. Callers snapshot the lists
/// via [`Self::progress_list`]/[`Self::settled_list`] and notify outside the
/// state lock, so an observer may freely call back into the pager.
#[derive(Clone, Default)]
pub(crate) struct ProgressObservers {
    progress: SmallVec<[ProgressFn; 2]>,
    settled: SmallVec<[SettleFn; 2]>,
}

impl ProgressObservers {
    pub(crate) fn push_progress(&mut self, observer: ProgressFn) {
        self.progress.push(observer);
    }

    pub(crate) fn push_settled(&mut self, observer: SettleFn) {
        self.settled.push(observer);
    }

    pub(crate) fn progress_list(&self) -> SmallVec<[ProgressFn; 2]> {
        self.progress.clone()
    }

    pub(crate) fn settled_list(&self) -> SmallVec<[SettleFn; 2]> {
        self.settled.clone()
    }
}

/// Synchronizes a tab strip with a pager.
///
/// Every pager progress tick feeds
/// [`TabStripState::set_scroll_progress`], and every settle triggers
/// [`TabStripState::ensure_indicator_visible`] so the highlighted tab is
/// scrolled into view once paging comes to rest. Binding is additive;
/// observers registered earlier keep firing.
pub fn bind_tab_strip(pager: &PagerState, strip: &TabStripState) {
    {
        let strip = strip.clone();
        pager.observe_progress(move |progress| {
            strip.set_scroll_progress(progress);
        });
    }
    let strip = strip.clone();
    pager.observe_settled(move |_| {
        strip.ensure_indicator_visible();
    });
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use tessera_ui::{ComputedData, Px};

    use super::*;
    use crate::tab_strip::TabRect;

    #[test]
    fn observers_fire_in_registration_order() {
        let mut observers = ProgressObservers::default();
        let log = Arc::new(Mutex::new(Vec::new()));

        let sink = log.clone();
        observers.push_progress(Arc::new(move |progress| {
            sink.lock().unwrap().push(format!("first:{progress}"));
        }));
        let sink = log.clone();
        observers.push_progress(Arc::new(move |progress| {
            sink.lock().unwrap().push(format!("second:{progress}"));
        }));

        for observer in observers.progress_list() {
            observer(1.5);
        }
        assert_eq!(*log.lock().unwrap(), vec!["first:1.5", "second:1.5"]);
    }

    #[test]
    fn bound_strip_tracks_the_pager() {
        let pager = PagerState::new(3);
        pager.sync_viewport(ComputedData {
            width: Px(300),
            height: Px(200),
        });

        let strip = TabStripState::new();
        let rects = vec![
            TabRect {
                x: Px(10),
                width: Px(40),
            },
            TabRect {
                x: Px(60),
                width: Px(60),
            },
            TabRect {
                x: Px(130),
                width: Px(50),
            },
        ];
        strip.sync_layout(rects, Px(200), Px(190), Px(10));
        bind_tab_strip(&pager, &strip);

        pager.scroll_to_page(2, false);
        assert_eq!(strip.current_index(), 2);
        assert_eq!(
            strip.indicator(),
            Some(TabRect {
                x: Px(130),
                width: Px(50),
            })
        );
    }
}
