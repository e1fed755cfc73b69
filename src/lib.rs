//! Object-oriented, virtualized data layer for the Win32 `SysListView32`.
//!
//! A [`VirtualObjectListView`] answers the owner-data callbacks of a list
//! control from a pluggable [`VirtualListDataSource`], tracks check states
//! per model object, and projects [`OlvGroup`] descriptors onto native group
//! records. Everything except `ui::list_view` is platform independent.

pub mod config;
pub mod engine;
pub mod error;
pub mod logger;
pub mod types;
pub mod ui;
pub mod utils;

pub use config::ListViewConfig;
pub use engine::check_state::CheckState;
pub use engine::column::{Aspect, OlvColumn, SortOrder};
pub use engine::controller::VirtualObjectListView;
pub use engine::data_source::{AbstractDataSource, RowGetterDataSource, VecDataSource, VirtualListDataSource};
pub use engine::group::{GroupState, OlvGroup};
pub use engine::image::{ImageList, ImageSelector};
pub use error::{ConfigError, ListViewError, NativeError};
pub use ui::dispatch::RemoteHandle;
pub use ui::native::{NativeListView, SearchDirection, View};
