//! Greedy first-fit row assignment and pixel geometry.

use super::TimelineItem;
use super::item::day_number;
use crate::task::domain::TaskStatus;
use chrono::NaiveDate;
use std::collections::BTreeMap;

const DEFAULT_CELL_WIDTH: u32 = 120;
const DEFAULT_ROW_HEIGHT: u32 = 100;
const DEFAULT_ROW_GAP: u32 = 20;

/// Rendering units for one day column and one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineGeometry {
    /// Width of one day.
    pub cell_width: u32,
    /// Height of one row.
    pub row_height: u32,
    /// Vertical space between rows.
    pub gap: u32,
}

impl TimelineGeometry {
    /// Default card geometry.
    pub const DEFAULT: Self = Self {
        cell_width: DEFAULT_CELL_WIDTH,
        row_height: DEFAULT_ROW_HEIGHT,
        gap: DEFAULT_ROW_GAP,
    };

    fn row_pitch(self) -> u64 {
        u64::from(self.row_height) + u64::from(self.gap)
    }
}

impl Default for TimelineGeometry {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Visible date window and the geometry used to draw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineWindow {
    /// First visible day.
    pub start: NaiveDate,
    /// Rendering units.
    pub geometry: TimelineGeometry,
}

impl TimelineWindow {
    /// Window starting at `start` with the default geometry.
    #[must_use]
    pub const fn starting(start: NaiveDate) -> Self {
        Self {
            start,
            geometry: TimelineGeometry::DEFAULT,
        }
    }

    /// Replaces the geometry, e.g. after a zoom change.
    #[must_use]
    pub const fn with_geometry(mut self, geometry: TimelineGeometry) -> Self {
        self.geometry = geometry;
        self
    }
}

/// Position of one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Row index within the layout.
    pub row: usize,
    /// Days from the window start, clamped at zero.
    pub start_offset: u64,
    /// Visible length in days, at least one.
    pub span: u64,
    /// Vertical pixel offset.
    pub top: u64,
    /// Horizontal pixel offset.
    pub left: u64,
    /// Pixel width.
    pub width: u64,
}

/// Row assignment for a set of items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineLayout<K: Ord> {
    placements: BTreeMap<K, Placement>,
    row_count: usize,
}

impl<K: Ord> TimelineLayout<K> {
    /// Placement of `id`, if it was laid out.
    #[must_use]
    pub fn placement(&self, id: &K) -> Option<&Placement> {
        self.placements.get(id)
    }

    /// All placements keyed by item id.
    #[must_use]
    pub const fn placements(&self) -> &BTreeMap<K, Placement> {
        &self.placements
    }

    /// Number of rows used.
    #[must_use]
    pub const fn row_count(&self) -> usize {
        self.row_count
    }

    /// Pixel height needed to draw every row; an empty layout keeps one row.
    #[must_use]
    pub fn height(&self, geometry: TimelineGeometry) -> u64 {
        to_u64(self.row_count.max(1)).saturating_mul(geometry.row_pitch())
    }
}

/// Layout of a single lane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaneLayout<K: Ord> {
    /// Lane status.
    pub lane: TaskStatus,
    /// Rows of the lane.
    pub layout: TimelineLayout<K>,
}

/// Assigns every item a row so that no two items in a row overlap.
///
/// Items are taken in ascending start order, keeping input order for equal
/// starts, and each goes to the lowest row it fits in. The result uses as
/// many rows as the deepest overlap among the items. Item ids are expected
/// to be unique; a repeated id keeps its last placement.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use taskboard::task::domain::TaskStatus;
/// use taskboard::timeline::{TimelineItem, TimelineWindow, layout};
///
/// let day = |d| NaiveDate::from_ymd_opt(2025, 3, d).expect("valid date");
/// let items = [
///     TimelineItem::new("a", day(1), day(4), TaskStatus::Todo).expect("valid range"),
///     TimelineItem::new("b", day(2), day(3), TaskStatus::Todo).expect("valid range"),
///     TimelineItem::new("c", day(4), day(6), TaskStatus::Todo).expect("valid range"),
/// ];
///
/// let result = layout(&items, &TimelineWindow::starting(day(1)));
/// assert_eq!(result.row_count(), 2);
/// assert_eq!(result.placement(&"c").map(|p| p.row), Some(0));
/// ```
#[must_use]
pub fn layout<K>(items: &[TimelineItem<K>], window: &TimelineWindow) -> TimelineLayout<K>
where
    K: Ord + Clone,
{
    let mut ordered: Vec<&TimelineItem<K>> = items.iter().collect();
    ordered.sort_by_key(|item| item.range().start());

    // Rows receive items in start order, so the last interval placed in a
    // row ends latest and is the only one a new item can collide with.
    let mut row_ends: Vec<i64> = Vec::new();
    let mut placements = BTreeMap::new();
    for item in ordered {
        let (start, end) = item.range().occupied();
        let row = row_ends
            .iter()
            .position(|row_end| *row_end <= start)
            .unwrap_or(row_ends.len());
        if let Some(row_end) = row_ends.get_mut(row) {
            *row_end = end;
        } else {
            row_ends.push(end);
        }
        placements.insert(item.id().clone(), place(item, row, window));
    }

    TimelineLayout {
        placements,
        row_count: row_ends.len(),
    }
}

/// Lays out each lane independently.
///
/// Lanes come back in status order and only lanes holding items appear.
#[must_use]
pub fn layout_by_lane<K>(items: &[TimelineItem<K>], window: &TimelineWindow) -> Vec<LaneLayout<K>>
where
    K: Ord + Clone,
{
    TaskStatus::ALL
        .into_iter()
        .filter_map(|lane| {
            let lane_items: Vec<TimelineItem<K>> = items
                .iter()
                .filter(|item| item.lane() == lane)
                .cloned()
                .collect();
            (!lane_items.is_empty()).then(|| LaneLayout {
                lane,
                layout: layout(&lane_items, window),
            })
        })
        .collect()
}

fn place<K>(item: &TimelineItem<K>, row: usize, window: &TimelineWindow) -> Placement {
    let window_start = day_number(window.start);
    let start = day_number(item.range().start());
    let end = day_number(item.range().end());

    let start_offset = to_u64(start - window_start);
    let span = to_u64(end - start.max(window_start)).max(1);
    let geometry = window.geometry;
    Placement {
        row,
        start_offset,
        span,
        top: to_u64(row).saturating_mul(geometry.row_pitch()),
        left: start_offset.saturating_mul(u64::from(geometry.cell_width)),
        width: span.saturating_mul(u64::from(geometry.cell_width)),
    }
}

/// Converts to `u64`, clamping negatives to zero.
fn to_u64<T: TryInto<u64>>(value: T) -> u64 {
    value.try_into().unwrap_or(0)
}
