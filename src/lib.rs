//! Synchronized tab strip and pager components for
//! [tessera-ui](https://github.com/tessera-ui/tessera).
//!
//! Two widgets that share one scroll-progress signal:
//!
//! - [`tab_strip`](tab_strip::tab_strip) lays out host-supplied tabs in a
//!   horizontally scrollable row and paints a highlight indicator whose
//!   position and width interpolate between adjacent tabs.
//! - [`pager`](pager::pager) hosts one full-viewport page per index and
//!   publishes its paging progress as a continuous value (integer part:
//!   page index, fractional part: in-between offset).
//!
//! [`bind_tab_strip`](progress::bind_tab_strip) wires the two together, so
//! dragging the pager morphs the strip's indicator in lockstep and settling
//! on a page scrolls the highlighted tab into view.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use tessera_strip_pager::{
//!     pager::{PagerArgs, PagerState, pager},
//!     progress::bind_tab_strip,
//!     tab_strip::{TabStripArgsBuilder, TabStripState, tab_strip},
//! };
//!
//! let titles = ["Home", "Library", "Search"];
//! let pager_state = PagerState::new(titles.len());
//! let strip_state = TabStripState::new();
//! bind_tab_strip(&pager_state, &strip_state);
//!
//! // Inside a #[tessera] component:
//! tab_strip(
//!     TabStripArgsBuilder::default()
//!         .on_tab_selected(Arc::new({
//!             let pager_state = pager_state.clone();
//!             move |index| pager_state.scroll_to_page(index, true)
//!         }))
//!         .build()
//!         .unwrap(),
//!     strip_state.clone(),
//!     |strip| {
//!         strip.indicator(|| underline());
//!         for title in titles {
//!             strip.tab(move |highlighted| tab_label(title, highlighted));
//!         }
//!     },
//! );
//! pager(PagerArgs::default(), pager_state.clone(), move |index| {
//!     page_body(titles[index]);
//! });
//! ```

mod animation;
mod layout_util;
pub mod pager;
pub mod progress;
pub mod tab_strip;
