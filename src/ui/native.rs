//! The native list control as seen by the controller.
//!
//! [`NativeListView`] is the whole surface the data layer needs from a
//! `SysListView32` in owner-data mode. The Win32 implementation lives in
//! `ui::list_view`; tests use the recording mock at the bottom of this file.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::engine::group_record::{GroupMetricsRecord, NativeGroupRecord};
use crate::error::NativeError;
use crate::types::*;

/// List-view display mode (`LV_VIEW_*`).
#[repr(u32)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum View {
    LargeIcon = LV_VIEW_ICON,
    #[default]
    Details = LV_VIEW_DETAILS,
    SmallIcon = LV_VIEW_SMALLICON,
    List = LV_VIEW_LIST,
    Tile = LV_VIEW_TILE,
}

impl View {
    pub fn from_u32(v: u32) -> Self {
        match v {
            LV_VIEW_ICON => View::LargeIcon,
            LV_VIEW_SMALLICON => View::SmallIcon,
            LV_VIEW_LIST => View::List,
            LV_VIEW_TILE => View::Tile,
            _ => View::Details,
        }
    }
}

/// Direction hint carried by a type-ahead search request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchDirection {
    Up,
    Down,
}

/// Header alignment of a group (`LVGA_HEADER_*`).
#[repr(u32)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HorizontalAlignment {
    #[default]
    Left = LVGA_HEADER_LEFT,
    Center = LVGA_HEADER_CENTER,
    Right = LVGA_HEADER_RIGHT,
}

/// Minimal group registered through the control's own group collection
/// before the full record is applied with [`NativeListView::set_group_info`].
#[derive(Clone, Default)]
pub struct GroupPlaceholder {
    pub header: String,
    pub alignment: HorizontalAlignment,
    pub name: String,
    /// Host data carried with the group; compared by identity.
    pub tag: Option<Rc<dyn Any>>,
}

impl fmt::Debug for GroupPlaceholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupPlaceholder")
            .field("header", &self.header)
            .field("alignment", &self.alignment)
            .field("name", &self.name)
            .field("tag", &self.tag.is_some())
            .finish()
    }
}

impl PartialEq for GroupPlaceholder {
    fn eq(&self, other: &Self) -> bool {
        let same_tag = match (&self.tag, &other.tag) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        self.header == other.header && self.alignment == other.alignment && self.name == other.name && same_tag
    }
}

/// Operations the controller and group descriptors perform on the control.
pub trait NativeListView {
    /// Number of rows the control believes it has.
    fn virtual_list_size(&self) -> usize;
    fn set_virtual_list_size(&mut self, size: usize) -> Result<(), NativeError>;

    fn top_item_index(&self) -> usize;
    fn set_top_item_index(&mut self, index: usize) -> Result<(), NativeError>;

    fn redraw_items(&mut self, first: usize, last: usize);
    fn invalidate(&mut self);
    fn begin_update(&mut self) {}
    fn end_update(&mut self) {}

    fn selected_indices(&self) -> Vec<usize>;
    fn set_selected_indices(&mut self, indices: &[usize]);
    fn focus_item(&mut self, index: usize);

    /// Inserts a group described entirely by `record`. Returns the assigned index.
    fn insert_group(&mut self, record: &NativeGroupRecord) -> Result<i32, NativeError>;
    /// Registers a placeholder group and returns the id the control assigned to it.
    fn add_group_placeholder(&mut self, placeholder: &GroupPlaceholder) -> Result<i32, NativeError>;
    fn set_group_info(&mut self, group_id: i32, record: &NativeGroupRecord) -> Result<(), NativeError>;
    /// Returns the raw status of the metrics call.
    fn set_group_metrics(&mut self, group_id: i32, metrics: &GroupMetricsRecord) -> i32;
    fn add_items_to_group(&mut self, group_id: i32, rows: &[usize]);
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;

    /// Recording stand-in for the native control.
    #[derive(Debug, Default)]
    pub struct MockListView {
        pub size: usize,
        pub top: usize,
        pub selected: Vec<usize>,
        pub focused: Option<usize>,
        pub redraws: Vec<(usize, usize)>,
        pub invalidations: usize,
        pub size_calls: Vec<usize>,
        pub scroll_calls: Vec<usize>,
        pub fail_resize: Option<NativeError>,
        pub fail_scroll: bool,
        pub inserted_groups: Vec<NativeGroupRecord>,
        pub placeholders: Vec<GroupPlaceholder>,
        pub group_infos: Vec<(i32, NativeGroupRecord)>,
        pub metrics: Vec<(i32, GroupMetricsRecord)>,
        pub group_members: Vec<(i32, Vec<usize>)>,
        pub next_placeholder_id: i32,
    }

    impl NativeListView for MockListView {
        fn virtual_list_size(&self) -> usize {
            self.size
        }

        fn set_virtual_list_size(&mut self, size: usize) -> Result<(), NativeError> {
            self.size_calls.push(size);
            if let Some(err) = self.fail_resize.clone() {
                return Err(err);
            }
            self.size = size;
            if self.top >= size {
                self.top = size.saturating_sub(1);
            }
            Ok(())
        }

        fn top_item_index(&self) -> usize {
            self.top
        }

        fn set_top_item_index(&mut self, index: usize) -> Result<(), NativeError> {
            self.scroll_calls.push(index);
            if self.fail_scroll {
                return Err(NativeError::NullReference);
            }
            self.top = index;
            Ok(())
        }

        fn redraw_items(&mut self, first: usize, last: usize) {
            self.redraws.push((first, last));
        }

        fn invalidate(&mut self) {
            self.invalidations += 1;
        }

        fn selected_indices(&self) -> Vec<usize> {
            self.selected.clone()
        }

        fn set_selected_indices(&mut self, indices: &[usize]) {
            self.selected = indices.to_vec();
        }

        fn focus_item(&mut self, index: usize) {
            self.focused = Some(index);
        }

        fn insert_group(&mut self, record: &NativeGroupRecord) -> Result<i32, NativeError> {
            self.inserted_groups.push(record.clone());
            Ok(self.inserted_groups.len() as i32 - 1)
        }

        fn add_group_placeholder(&mut self, placeholder: &GroupPlaceholder) -> Result<i32, NativeError> {
            self.placeholders.push(placeholder.clone());
            self.next_placeholder_id += 1;
            Ok(1000 + self.next_placeholder_id)
        }

        fn set_group_info(&mut self, group_id: i32, record: &NativeGroupRecord) -> Result<(), NativeError> {
            self.group_infos.push((group_id, record.clone()));
            Ok(())
        }

        fn set_group_metrics(&mut self, group_id: i32, metrics: &GroupMetricsRecord) -> i32 {
            self.metrics.push((group_id, *metrics));
            1
        }

        fn add_items_to_group(&mut self, group_id: i32, rows: &[usize]) {
            self.group_members.push((group_id, rows.to_vec()));
        }
    }
}
