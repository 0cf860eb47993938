//! Timeline layout for task bars on a date axis.
//!
//! Layout is greedy first-fit interval partitioning: items sorted by start
//! day go into the lowest row whose half-open day intervals they do not
//! overlap. Everything here is pure; callers re-run the layout whenever the
//! task set, filter or zoom level changes.

mod error;
mod item;
mod layout;
mod view;

pub use error::TimelineError;
pub use item::{DayRange, TimelineItem};
pub use layout::{
    LaneLayout, Placement, TimelineGeometry, TimelineLayout, TimelineWindow, layout,
    layout_by_lane,
};
pub use view::TimelineView;
