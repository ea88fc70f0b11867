//! Table presentation settings.

use serde::Deserialize;
use serde::Serialize;

use crate::error::ConfigError;
use crate::page::DEFAULT_PAGE_SIZE;
use crate::selection::SelectionMode;

/// Settings that shape how a table presents its rows.
///
/// Deserializes from camelCase JSON with every field optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableConfig {
    /// Render through a scroll window instead of pages.
    ///
    /// Default: false
    pub virtual_scrolling: bool,

    /// Default: multiple
    pub selection_mode: SelectionMode,

    /// Rows per page when paginating.
    ///
    /// Default: 50
    pub page_size: usize,

    /// Show the per-column filter inputs.
    ///
    /// Default: true
    pub show_filters: bool,

    /// Fixed row height in pixels.
    ///
    /// Default: 48
    pub row_height: f64,

    /// Height of the scrollable body in pixels.
    ///
    /// Default: 600
    pub container_height: f64,

    /// Rows rendered beyond each edge of the viewport.
    ///
    /// Default: 5
    pub overscan: usize,

    /// Show whole-table summaries under the body.
    ///
    /// Default: false
    pub sticky_footer: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            virtual_scrolling: false,
            selection_mode: SelectionMode::Multiple,
            page_size: DEFAULT_PAGE_SIZE,
            show_filters: true,
            row_height: 48.0,
            container_height: 600.0,
            overscan: 5,
            sticky_footer: false,
        }
    }
}

impl TableConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables virtual scrolling.
    pub fn with_virtual_scrolling(mut self, enabled: bool) -> Self {
        self.virtual_scrolling = enabled;
        self
    }

    pub fn with_selection_mode(mut self, mode: SelectionMode) -> Self {
        self.selection_mode = mode;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_show_filters(mut self, show: bool) -> Self {
        self.show_filters = show;
        self
    }

    /// Sets the row height in pixels.
    pub fn with_row_height(mut self, height: f64) -> Self {
        self.row_height = height;
        self
    }

    /// Sets the container height in pixels.
    pub fn with_container_height(mut self, height: f64) -> Self {
        self.container_height = height;
        self
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn with_sticky_footer(mut self, enabled: bool) -> Self {
        self.sticky_footer = enabled;
        self
    }

    /// Checks the settings that would otherwise break windowing or paging.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.row_height.is_finite() && self.row_height > 0.0) {
            return Err(ConfigError::InvalidRowHeight(self.row_height));
        }
        if self.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        Ok(())
    }
}
