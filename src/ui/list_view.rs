//! Win32ListView - a facade over an owner-data `SysListView32`.
//!
//! Every `SendMessageW` the data layer needs lives here, behind
//! [`NativeListView`]. Callers never see `WPARAM`/`LPARAM`.

use std::any::Any;
use std::collections::HashMap;
use std::rc::Rc;

use windows_sys::Win32::Graphics::Gdi::InvalidateRect;
use windows_sys::Win32::System::LibraryLoader::GetModuleHandleW;
use windows_sys::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, PostMessageW, SendMessageW, WM_SETREDRAW, WS_BORDER, WS_CHILD, WS_VISIBLE,
};

use crate::engine::column::OlvColumn;
use crate::engine::group_record::{FieldValue, GroupField, GroupMetricsRecord, GroupRecordBuilder, NativeGroupRecord};
use crate::error::NativeError;
use crate::types::*;
use crate::ui::native::{GroupPlaceholder, NativeListView, View};
use crate::utils::to_wstring;
use crate::w;

/// Posted by [`post_message_waker`] to ask the UI thread to run `pump_pending`.
pub const WM_APP_PUMP_LIST: u32 = WM_APP + 0x40;

const DEFAULT_COLUMN_WIDTH: i32 = 120;

/// First id handed to placeholder groups; keeps them clear of generated ids.
const FIRST_PLACEHOLDER_ID: i32 = 0x4000_0000;

/// A `SysListView32` created with `LVS_OWNERDATA`.
pub struct Win32ListView {
    hwnd: HWND,
    next_placeholder_id: i32,
    // LVGROUP has no slot for host data.
    group_tags: HashMap<i32, Rc<dyn Any>>,
}

impl Win32ListView {
    /// Creates a report-style owner-data list view.
    ///
    /// # Safety
    /// `parent` must be a valid window owned by the calling thread.
    pub unsafe fn create(
        parent: HWND,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        id: u16,
        check_boxes: bool,
    ) -> Result<Self, NativeError> {
        unsafe {
            // SAFETY: null asks for the current module.
            let instance = GetModuleHandleW(std::ptr::null());

            let hwnd = CreateWindowExW(
                0,
                w!("SysListView32").as_ptr(),
                w!("").as_ptr(),
                WS_VISIBLE | WS_CHILD | WS_BORDER | LVS_REPORT | LVS_SHOWSELALWAYS | LVS_OWNERDATA,
                x,
                y,
                w,
                h,
                parent,
                id as usize as _,
                instance,
                std::ptr::null(),
            );
            if hwnd.is_null() {
                return Err(NativeError::NullReference);
            }

            let mut ex_style = LVS_EX_FULLROWSELECT | LVS_EX_DOUBLEBUFFER;
            if check_boxes {
                ex_style |= LVS_EX_CHECKBOXES;
            }
            SendMessageW(hwnd, LVM_SETEXTENDEDLISTVIEWSTYLE, 0, ex_style as isize);

            Ok(Self::from_hwnd(hwnd))
        }
    }

    /// Wraps an existing owner-data list view.
    pub fn from_hwnd(hwnd: HWND) -> Self {
        Self { hwnd, next_placeholder_id: FIRST_PLACEHOLDER_ID, group_tags: HashMap::new() }
    }

    #[inline]
    pub fn hwnd(&self) -> HWND {
        self.hwnd
    }

    fn send(&self, msg: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
        // SAFETY: messages sent here take plain values or pointers to locals
        // that outlive the synchronous call.
        unsafe { SendMessageW(self.hwnd, msg, wparam, lparam) }
    }

    fn ensure_window(&self) -> Result<(), NativeError> {
        if self.hwnd.is_null() { Err(NativeError::NullReference) } else { Ok(()) }
    }

    /// Adds one header column per controller column, in order.
    pub fn insert_columns<M>(&self, columns: &[OlvColumn<M>]) {
        for column in columns {
            let mut text = to_wstring(column.text());
            let lvc = LVCOLUMNW {
                mask: LVCF_TEXT | LVCF_WIDTH | LVCF_SUBITEM,
                cx: DEFAULT_COLUMN_WIDTH,
                pszText: text.as_mut_ptr(),
                iSubItem: column.index() as i32,
                ..Default::default()
            };
            self.send(LVM_INSERTCOLUMNW, column.index(), &lvc as *const _ as isize);
        }
    }

    /// Tag of a placeholder group registered through this facade.
    pub fn group_tag(&self, group_id: i32) -> Option<&Rc<dyn Any>> {
        self.group_tags.get(&group_id)
    }

    pub fn set_view(&self, view: View) {
        self.send(LVM_SETVIEW, view as usize, 0);
    }

    pub fn enable_group_view(&self, enable: bool) {
        self.send(LVM_ENABLEGROUPVIEW, enable as usize, 0);
    }

    pub fn remove_all_groups(&mut self) {
        self.group_tags.clear();
        self.send(LVM_REMOVEALLGROUPS, 0, 0);
    }

    fn set_item_state(&self, index: WPARAM, state: u32, mask: u32) {
        let item = LVITEMW { state, stateMask: mask, ..Default::default() };
        self.send(LVM_SETITEMSTATE, index, &item as *const _ as isize);
    }
}

impl NativeListView for Win32ListView {
    fn virtual_list_size(&self) -> usize {
        usize::try_from(self.send(LVM_GETITEMCOUNT, 0, 0)).unwrap_or(0)
    }

    fn set_virtual_list_size(&mut self, size: usize) -> Result<(), NativeError> {
        self.ensure_window()?;
        if size > i32::MAX as usize {
            return Err(NativeError::OutOfRange);
        }
        let flags = if size > 0 { LVSICF_NOSCROLL } else { 0 };
        match self.send(LVM_SETITEMCOUNT, size, flags as isize) {
            0 => Err(NativeError::Rejected { message: LVM_SETITEMCOUNT, result: 0 }),
            _ => Ok(()),
        }
    }

    fn top_item_index(&self) -> usize {
        usize::try_from(self.send(LVM_GETTOPINDEX, 0, 0)).unwrap_or(0)
    }

    fn set_top_item_index(&mut self, index: usize) -> Result<(), NativeError> {
        self.ensure_window()?;
        match self.send(LVM_ENSUREVISIBLE, index, 0) {
            0 => Err(NativeError::Rejected { message: LVM_ENSUREVISIBLE, result: 0 }),
            _ => Ok(()),
        }
    }

    fn redraw_items(&mut self, first: usize, last: usize) {
        self.send(LVM_REDRAWITEMS, first, last as isize);
    }

    fn invalidate(&mut self) {
        // SAFETY: a null rect invalidates the whole client area.
        unsafe {
            InvalidateRect(self.hwnd, std::ptr::null(), 1);
        }
    }

    fn begin_update(&mut self) {
        self.send(WM_SETREDRAW, 0, 0);
    }

    fn end_update(&mut self) {
        self.send(WM_SETREDRAW, 1, 0);
        self.invalidate();
    }

    fn selected_indices(&self) -> Vec<usize> {
        let mut selected = Vec::new();
        let mut start = usize::MAX; // -1: search from the beginning
        loop {
            let next = self.send(LVM_GETNEXTITEM, start, LVNI_SELECTED as isize);
            let Ok(index) = usize::try_from(next) else {
                break;
            };
            selected.push(index);
            start = index;
        }
        selected
    }

    fn set_selected_indices(&mut self, indices: &[usize]) {
        // Index -1 applies the state to every row.
        self.set_item_state(usize::MAX, 0, LVIS_SELECTED);
        for &index in indices {
            self.set_item_state(index, LVIS_SELECTED, LVIS_SELECTED);
        }
    }

    fn focus_item(&mut self, index: usize) {
        self.set_item_state(index, LVIS_FOCUSED, LVIS_FOCUSED);
    }

    fn insert_group(&mut self, record: &NativeGroupRecord) -> Result<i32, NativeError> {
        self.ensure_window()?;
        let result = record.with_native(|group| self.send(LVM_INSERTGROUP, usize::MAX, group as *mut _ as isize));
        if result < 0 {
            log::warn!("LVM_INSERTGROUP rejected group {:?}", record.group_id());
            return Err(NativeError::Rejected { message: LVM_INSERTGROUP, result });
        }
        Ok(result as i32)
    }

    fn add_group_placeholder(&mut self, placeholder: &GroupPlaceholder) -> Result<i32, NativeError> {
        let id = self.next_placeholder_id;
        self.next_placeholder_id += 1;

        let mut b = GroupRecordBuilder::new();
        b.set(GroupField::Header, FieldValue::Text(placeholder.header.clone()))
            .set(GroupField::Align, FieldValue::Int(placeholder.alignment as i32))
            .set(GroupField::GroupId, FieldValue::Int(id));
        self.insert_group(&b.build())?;
        if let Some(tag) = &placeholder.tag {
            self.group_tags.insert(id, Rc::clone(tag));
        }
        Ok(id)
    }

    fn set_group_info(&mut self, group_id: i32, record: &NativeGroupRecord) -> Result<(), NativeError> {
        self.ensure_window()?;
        let result =
            record.with_native(|group| self.send(LVM_SETGROUPINFO, group_id as usize, group as *mut _ as isize));
        if result < 0 {
            return Err(NativeError::Rejected { message: LVM_SETGROUPINFO, result });
        }
        Ok(())
    }

    fn set_group_metrics(&mut self, _group_id: i32, metrics: &GroupMetricsRecord) -> i32 {
        // The control applies metrics to every group.
        let native = metrics.to_native();
        self.send(LVM_SETGROUPMETRICS, 0, &native as *const _ as isize) as i32
    }

    fn add_items_to_group(&mut self, group_id: i32, rows: &[usize]) {
        for &row in rows {
            let item = LVITEMW {
                mask: LVIF_GROUPID,
                iItem: row as i32,
                iGroupId: group_id,
                ..Default::default()
            };
            self.send(LVM_SETITEMW, 0, &item as *const _ as isize);
        }
    }
}

/// Waker for remote handles: posts [`WM_APP_PUMP_LIST`] to `hwnd`.
///
/// The window procedure should answer it with `pump_pending`.
pub fn post_message_waker(hwnd: HWND) -> impl Fn() + Send + Sync + 'static {
    let raw = hwnd as isize;
    move || {
        // SAFETY: PostMessageW tolerates stale handles and fails cleanly.
        unsafe {
            PostMessageW(raw as HWND, WM_APP_PUMP_LIST, 0, 0);
        }
    }
}
