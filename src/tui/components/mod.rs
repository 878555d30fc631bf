// Components module - reusable UI building blocks
//
// Shell components are rendered in every view:
// - Title bar: App name and view tabs
// - Status bar: Path, key hints, selection, user
// - Logs panel: System log entries
//
// The data table is the generic widget every page is built from.

pub mod data_table;
pub mod logs_panel;
pub mod scrollbar;
pub mod status_bar;
pub mod title_bar;
pub mod toast;
