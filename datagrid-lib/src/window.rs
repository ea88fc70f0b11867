//! Virtualization window and viewport scroll state.
//!
//! This module provides:
//! - `compute_window`: maps a scroll offset to the index range to materialize
//! - `Window`: the result, with spacer height and slice offset
//! - `ScrollRequest`: actions that can be applied to a viewport
//! - `Viewport`: scroll state that recomputes its window on every change
//!
//! Rows are assumed to share one fixed height.

use std::ops::Range;

use serde::Serialize;

// =============================================================================
// Window
// =============================================================================

/// The slice of the display sequence that must be materialized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Window {
    /// First index to render (inclusive).
    pub start_index: usize,
    /// Last index to render (inclusive). Meaningless when the window is empty.
    pub end_index: usize,
    /// Height of the scroll spacer: `item_count * item_height`.
    pub total_height: f64,
    /// Translation of the rendered slice: `start_index * item_height`.
    pub offset_y: f64,
    /// Number of rows the window was computed over.
    pub item_count: usize,
}

impl Window {
    fn empty(total_height: f64) -> Self {
        Self {
            start_index: 0,
            end_index: 0,
            total_height,
            offset_y: 0.0,
            item_count: 0,
        }
    }

    /// Half-open index range to render.
    pub fn range(&self) -> Range<usize> {
        if self.item_count == 0 {
            0..0
        } else {
            self.start_index..self.end_index + 1
        }
    }

    /// Number of rows to render.
    pub fn len(&self) -> usize {
        self.range().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `index` falls inside the window.
    pub fn contains(&self, index: usize) -> bool {
        self.range().contains(&index)
    }
}

/// Computes the rows to materialize for a scroll position.
///
/// ```text
/// start = max(0, floor(scroll_top / item_height) - overscan)
/// end   = min(item_count - 1, ceil((scroll_top + container_height) / item_height) + overscan)
/// ```
///
/// `start` is additionally clamped to `end`, so an offset past the content
/// still yields a valid window over the last rows. No rows, or a row height
/// that is not a positive number, yield an empty window.
///
/// # Example
///
/// ```
/// use datagrid_lib::window::compute_window;
///
/// let window = compute_window(480.0, 48.0, 600.0, 1000, 10);
/// assert_eq!((window.start_index, window.end_index), (0, 33));
/// assert_eq!(window.total_height, 48_000.0);
/// ```
pub fn compute_window(
    scroll_top: f64,
    item_height: f64,
    container_height: f64,
    item_count: usize,
    overscan: usize,
) -> Window {
    if !(item_height.is_finite() && item_height > 0.0) {
        return Window::empty(0.0);
    }
    let total_height = item_count as f64 * item_height;
    if item_count == 0 {
        return Window::empty(total_height);
    }

    let scroll_top = non_negative(scroll_top);
    let container_height = non_negative(container_height);
    let last = item_count - 1;

    // float-to-int casts saturate
    let first_visible = (scroll_top / item_height).floor() as usize;
    let last_visible = ((scroll_top + container_height) / item_height).ceil() as usize;

    let end_index = last_visible.saturating_add(overscan).min(last);
    let start_index = first_visible.saturating_sub(overscan).min(end_index);

    log::trace!(
        "window scroll_top={} rows={} -> {}..={}",
        scroll_top,
        item_count,
        start_index,
        end_index
    );

    Window {
        start_index,
        end_index,
        total_height,
        offset_y: start_index as f64 * item_height,
        item_count,
    }
}

fn non_negative(n: f64) -> f64 {
    if n.is_finite() { n.max(0.0) } else { 0.0 }
}

// =============================================================================
// ScrollRequest
// =============================================================================

/// Actions that can be applied to a viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollRequest {
    /// Scroll by a relative amount in pixels (positive = down).
    Delta(f64),
    /// Scroll to an absolute offset.
    ToOffset(f64),
    /// Scroll the least amount that makes the row at index fully visible.
    IntoView(usize),
    /// Scroll up by one container height.
    PageUp,
    /// Scroll down by one container height.
    PageDown,
    /// Scroll to top.
    Home,
    /// Scroll to bottom.
    End,
}

// =============================================================================
// Viewport
// =============================================================================

/// Scroll state of a virtualized body.
///
/// Every change to the offset, the container or the row count recomputes
/// the window immediately; there is no debouncing, so the window always
/// matches the latest scroll position.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    scroll_top: f64,
    item_height: f64,
    container_height: f64,
    overscan: usize,
    item_count: usize,
    window: Window,
}

impl Viewport {
    /// Create a viewport at the top of an empty list.
    pub fn new(item_height: f64, container_height: f64, overscan: usize) -> Self {
        let mut viewport = Self {
            scroll_top: 0.0,
            item_height,
            container_height: non_negative(container_height),
            overscan,
            item_count: 0,
            window: Window::empty(0.0),
        };
        viewport.recompute();
        viewport
    }

    /// Current scroll offset.
    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    pub fn item_height(&self) -> f64 {
        self.item_height
    }

    pub fn container_height(&self) -> f64 {
        self.container_height
    }

    pub fn overscan(&self) -> usize {
        self.overscan
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// The window for the current state.
    pub fn window(&self) -> Window {
        self.window
    }

    /// Total content height.
    pub fn content_height(&self) -> f64 {
        self.window.total_height
    }

    /// Maximum scroll offset (content height minus container height).
    pub fn max_offset(&self) -> f64 {
        (self.content_height() - self.container_height).max(0.0)
    }

    /// Current scroll progress (0.0 = top, 1.0 = bottom).
    pub fn progress(&self) -> f64 {
        let max = self.max_offset();
        if max == 0.0 { 0.0 } else { self.scroll_top / max }
    }

    /// Whether content exceeds the container.
    pub fn can_scroll(&self) -> bool {
        self.max_offset() > 0.0
    }

    /// Set the row count. The offset is clamped if the content shrank.
    pub fn set_item_count(&mut self, count: usize) {
        self.item_count = count;
        self.clamp_and_recompute();
    }

    /// Set the container height. The offset is clamped to the new maximum.
    pub fn set_container_height(&mut self, height: f64) {
        self.container_height = non_negative(height);
        self.clamp_and_recompute();
    }

    pub fn set_overscan(&mut self, overscan: usize) {
        self.overscan = overscan;
        self.recompute();
    }

    /// Set the row height, keeping the first visible row in place.
    pub fn set_item_height(&mut self, height: f64) {
        let first_row = if self.item_height > 0.0 {
            self.scroll_top / self.item_height
        } else {
            0.0
        };
        self.item_height = height;
        self.scroll_top = non_negative(first_row * height);
        self.clamp_and_recompute();
    }

    /// Apply a scroll request and return the resulting window.
    pub fn apply(&mut self, request: ScrollRequest) -> Window {
        let target = match request {
            ScrollRequest::Delta(d) => self.scroll_top + d,
            ScrollRequest::ToOffset(o) => o,
            ScrollRequest::IntoView(index) => self.offset_for_index(index),
            ScrollRequest::PageUp => self.scroll_top - self.container_height,
            ScrollRequest::PageDown => self.scroll_top + self.container_height,
            ScrollRequest::Home => 0.0,
            ScrollRequest::End => self.max_offset(),
        };
        self.scroll_top = non_negative(target);
        self.clamp_and_recompute();
        self.window
    }

    /// Offset that brings the row at `index` fully into view with the least
    /// movement.
    fn offset_for_index(&self, index: usize) -> f64 {
        let top = index as f64 * self.item_height;
        let bottom = top + self.item_height;
        if top < self.scroll_top {
            top
        } else if bottom > self.scroll_top + self.container_height {
            bottom - self.container_height
        } else {
            self.scroll_top
        }
    }

    fn clamp_and_recompute(&mut self) {
        self.recompute();
        let max = self.max_offset();
        if self.scroll_top > max {
            self.scroll_top = max;
            self.recompute();
        }
    }

    fn recompute(&mut self) {
        self.window = compute_window(
            self.scroll_top,
            self.item_height,
            self.container_height,
            self.item_count,
            self.overscan,
        );
    }
}
