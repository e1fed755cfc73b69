#![allow(non_camel_case_types, non_snake_case, dead_code)]

//! Hand-declared common-control records and constants.
//!
//! These are plain declarations with no platform dependency, so the group
//! projection and the notification decoding can be unit tested anywhere.
//! Layouts follow `commctrl.h` for the v6 common controls.

// Basic Types
pub type BOOL = i32;
pub type HANDLE = *mut c_void;
pub type HWND = HANDLE;
pub type LPARAM = isize;
pub type WPARAM = usize;
pub type LRESULT = isize;
pub type LPCWSTR = *const u16;
pub type LPWSTR = *mut u16;
pub type COLORREF = u32;
pub use std::ffi::c_void;

// Structs

#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct POINT {
    pub x: i32,
    pub y: i32,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct NMHDR {
    pub hwndFrom: HWND,
    pub idFrom: usize,
    pub code: u32,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct LVITEMW {
    pub mask: u32,
    pub iItem: i32,
    pub iSubItem: i32,
    pub state: u32,
    pub stateMask: u32,
    pub pszText: LPWSTR,
    pub cchTextMax: i32,
    pub iImage: i32,
    pub lParam: LPARAM,
    pub iIndent: i32,
    pub iGroupId: i32,
    pub cColumns: u32,
    pub puColumns: *mut u32,
    pub piColFmt: *mut i32,
    pub iGroup: i32,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct LVFINDINFOW {
    pub flags: u32,
    pub psz: LPCWSTR,
    pub lParam: isize,
    pub pt: POINT,
    pub vkDirection: u32,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct NMLISTVIEW {
    pub hdr: NMHDR,
    pub iItem: i32,
    pub iSubItem: i32,
    pub uNewState: u32,
    pub uOldState: u32,
    pub uChanged: u32,
    pub ptAction: POINT,
    pub lParam: LPARAM,
}

/// `LVN_GETDISPINFOW` payload. The control owns `item.pszText`.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct NMLVDISPINFOW {
    pub hdr: NMHDR,
    pub item: LVITEMW,
}

/// `LVN_ODCACHEHINT` payload. Both bounds are inclusive.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct NMLVCACHEHINT {
    pub hdr: NMHDR,
    pub iFrom: i32,
    pub iTo: i32,
}

/// `LVN_ODFINDITEMW` payload.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct NMLVFINDITEMW {
    pub hdr: NMHDR,
    pub iStart: i32,
    pub lvfi: LVFINDINFOW,
}

/// Full v6 group record (`LVGROUP` with the Vista extensions).
///
/// Only fields whose `LVGF_*` bit is present in `mask` are read by the control.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct LVGROUP {
    pub cbSize: u32,
    pub mask: u32,
    pub pszHeader: LPWSTR,
    pub cchHeader: i32,
    pub pszFooter: LPWSTR,
    pub cchFooter: i32,
    pub iGroupId: i32,
    pub stateMask: u32,
    pub state: u32,
    pub uAlign: u32,
    pub pszSubtitle: LPWSTR,
    pub cchSubtitle: u32,
    pub pszTask: LPWSTR,
    pub cchTask: u32,
    pub pszDescriptionTop: LPWSTR,
    pub cchDescriptionTop: u32,
    pub pszDescriptionBottom: LPWSTR,
    pub cchDescriptionBottom: u32,
    pub iTitleImage: i32,
    pub iExtendedImage: i32,
    pub iFirstItem: i32,
    pub cItems: u32,
    pub pszSubsetTitle: LPWSTR,
    pub cchSubsetTitle: u32,
}

#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct LVGROUPMETRICS {
    pub cbSize: u32,
    pub mask: u32,
    pub Left: u32,
    pub Top: u32,
    pub Right: u32,
    pub Bottom: u32,
    pub crLeft: COLORREF,
    pub crTop: COLORREF,
    pub crRight: COLORREF,
    pub crBottom: COLORREF,
    pub crHeader: COLORREF,
    pub crFooter: COLORREF,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RECT {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct NMCUSTOMDRAW {
    pub hdr: NMHDR,
    pub dwDrawStage: u32,
    pub hdc: HANDLE,
    pub rc: RECT,
    pub dwItemSpec: usize,
    pub uItemState: u32,
    pub lItemlParam: LPARAM,
}

/// `NM_CUSTOMDRAW` payload sent by a list view.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct NMLVCUSTOMDRAW {
    pub nmcd: NMCUSTOMDRAW,
    pub clrText: COLORREF,
    pub clrTextBk: COLORREF,
    pub iSubItem: i32,
    pub dwItemType: u32,
    pub clrFace: COLORREF,
    pub iIconEffect: i32,
    pub iIconPhase: i32,
    pub iPartId: i32,
    pub iStateId: i32,
    pub rcText: RECT,
    pub uAlign: u32,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct LVCOLUMNW {
    pub mask: u32,
    pub fmt: i32,
    pub cx: i32,
    pub pszText: LPWSTR,
    pub cchTextMax: i32,
    pub iSubItem: i32,
    pub iImage: i32,
    pub iOrder: i32,
    pub cxMin: i32,
    pub cxDefault: i32,
    pub cxIdeal: i32,
}

impl Default for LVCOLUMNW {
    fn default() -> Self { unsafe { std::mem::zeroed() } }
}

impl Default for LVITEMW {
    fn default() -> Self { unsafe { std::mem::zeroed() } }
}

impl Default for LVFINDINFOW {
    fn default() -> Self { unsafe { std::mem::zeroed() } }
}

impl Default for NMLVCUSTOMDRAW {
    fn default() -> Self { unsafe { std::mem::zeroed() } }
}

impl Default for LVGROUP {
    fn default() -> Self { unsafe { std::mem::zeroed() } }
}

impl Default for LVGROUPMETRICS {
    fn default() -> Self { unsafe { std::mem::zeroed() } }
}

// Window Messages
pub const WM_NOTIFY: u32 = 0x004E;
pub const WM_APP: u32 = 0x8000;

// ListView Messages
pub const LVM_FIRST: u32 = 0x1000;
pub const LVM_GETITEMCOUNT: u32 = LVM_FIRST + 4;
pub const LVM_GETNEXTITEM: u32 = LVM_FIRST + 12;
pub const LVM_ENSUREVISIBLE: u32 = LVM_FIRST + 19;
pub const LVM_REDRAWITEMS: u32 = LVM_FIRST + 21;
pub const LVM_GETTOPINDEX: u32 = LVM_FIRST + 39;
pub const LVM_SETITEMSTATE: u32 = LVM_FIRST + 43;
pub const LVM_SETITEMCOUNT: u32 = LVM_FIRST + 47;
pub const LVM_SETEXTENDEDLISTVIEWSTYLE: u32 = LVM_FIRST + 54;
pub const LVM_SETITEMW: u32 = LVM_FIRST + 76;
pub const LVM_INSERTCOLUMNW: u32 = LVM_FIRST + 97;
pub const LVM_SETVIEW: u32 = LVM_FIRST + 142;
pub const LVM_GETVIEW: u32 = LVM_FIRST + 143;
pub const LVM_INSERTGROUP: u32 = LVM_FIRST + 145;
pub const LVM_SETGROUPINFO: u32 = LVM_FIRST + 147;
pub const LVM_SETGROUPMETRICS: u32 = LVM_FIRST + 155;
pub const LVM_ENABLEGROUPVIEW: u32 = LVM_FIRST + 157;
pub const LVM_REMOVEALLGROUPS: u32 = LVM_FIRST + 160;

// ListView styles
pub const LVS_REPORT: u32 = 0x0001;
pub const LVS_SHOWSELALWAYS: u32 = 0x0008;
pub const LVS_OWNERDATA: u32 = 0x1000;
pub const LVS_EX_CHECKBOXES: u32 = 0x00000004;
pub const LVS_EX_FULLROWSELECT: u32 = 0x00000020;
pub const LVS_EX_DOUBLEBUFFER: u32 = 0x00010000;

// LVCOLUMN mask
pub const LVCF_WIDTH: u32 = 0x0002;
pub const LVCF_TEXT: u32 = 0x0004;
pub const LVCF_SUBITEM: u32 = 0x0008;

// LVM_SETITEMCOUNT flags
pub const LVSICF_NOINVALIDATEALL: u32 = 0x00000001;
pub const LVSICF_NOSCROLL: u32 = 0x00000002;

// ListView Notifications (negative codes, stored as u32 like NMHDR::code)
const LVN_FIRST: i32 = -100;
pub const LVN_COLUMNCLICK: u32 = (LVN_FIRST - 8) as u32;
pub const LVN_ODCACHEHINT: u32 = (LVN_FIRST - 13) as u32;
pub const LVN_GETDISPINFOW: u32 = (LVN_FIRST - 77) as u32;
pub const LVN_ODFINDITEMW: u32 = (LVN_FIRST - 79) as u32;

// Custom draw
pub const NM_CUSTOMDRAW: u32 = (-12i32) as u32;
pub const CDDS_PREPAINT: u32 = 0x00000001;
pub const CDDS_ITEM: u32 = 0x00010000;
pub const CDDS_ITEMPREPAINT: u32 = CDDS_ITEM | CDDS_PREPAINT;
pub const CDRF_DODEFAULT: isize = 0x00000000;
pub const CDRF_NEWFONT: isize = 0x00000002;
pub const CDRF_NOTIFYITEMDRAW: isize = 0x00000020;

// LVITEM mask / state
pub const LVIF_TEXT: u32 = 0x0001;
pub const LVIF_IMAGE: u32 = 0x0002;
pub const LVIF_PARAM: u32 = 0x0004;
pub const LVIF_STATE: u32 = 0x0008;
pub const LVIF_GROUPID: u32 = 0x0100;

pub const LVIS_FOCUSED: u32 = 0x0001;
pub const LVIS_SELECTED: u32 = 0x0002;
pub const LVIS_STATEIMAGEMASK: u32 = 0xF000;

pub const LVNI_ALL: u32 = 0x0000;
pub const LVNI_SELECTED: u32 = 0x0002;

/// `INDEXTOSTATEIMAGEMASK` from commctrl.h
pub const fn index_to_state_image_mask(i: u32) -> u32 {
    i << 12
}

// LVFINDINFO flags
pub const LVFI_PARAM: u32 = 0x0001;
pub const LVFI_STRING: u32 = 0x0002;
pub const LVFI_PARTIAL: u32 = 0x0008;
pub const LVFI_WRAP: u32 = 0x0020;

// Virtual keys used as search direction hints
pub const VK_PRIOR: u32 = 0x21;
pub const VK_LEFT: u32 = 0x25;
pub const VK_UP: u32 = 0x26;

// Views
pub const LV_VIEW_ICON: u32 = 0x0000;
pub const LV_VIEW_DETAILS: u32 = 0x0001;
pub const LV_VIEW_SMALLICON: u32 = 0x0002;
pub const LV_VIEW_LIST: u32 = 0x0003;
pub const LV_VIEW_TILE: u32 = 0x0004;

// LVGROUP mask
pub const LVGF_NONE: u32 = 0x00000000;
pub const LVGF_HEADER: u32 = 0x00000001;
pub const LVGF_FOOTER: u32 = 0x00000002;
pub const LVGF_STATE: u32 = 0x00000004;
pub const LVGF_ALIGN: u32 = 0x00000008;
pub const LVGF_GROUPID: u32 = 0x00000010;
pub const LVGF_SUBTITLE: u32 = 0x00000100;
pub const LVGF_TASK: u32 = 0x00000200;
pub const LVGF_DESCRIPTIONTOP: u32 = 0x00000400;
pub const LVGF_DESCRIPTIONBOTTOM: u32 = 0x00000800;
pub const LVGF_TITLEIMAGE: u32 = 0x00001000;
pub const LVGF_EXTENDEDIMAGE: u32 = 0x00002000;
pub const LVGF_ITEMS: u32 = 0x00004000;
pub const LVGF_SUBSET: u32 = 0x00008000;
pub const LVGF_SUBSETITEMS: u32 = 0x00010000;

// LVGROUP state
pub const LVGS_NORMAL: u32 = 0x00000000;
pub const LVGS_COLLAPSED: u32 = 0x00000001;
pub const LVGS_HIDDEN: u32 = 0x00000002;
pub const LVGS_NOHEADER: u32 = 0x00000004;
pub const LVGS_COLLAPSIBLE: u32 = 0x00000008;
pub const LVGS_FOCUSED: u32 = 0x00000010;
pub const LVGS_SELECTED: u32 = 0x00000020;
pub const LVGS_SUBSETED: u32 = 0x00000040;
pub const LVGS_SUBSETLINKFOCUSED: u32 = 0x00000080;

// LVGROUP alignment
pub const LVGA_HEADER_LEFT: u32 = 0x00000001;
pub const LVGA_HEADER_CENTER: u32 = 0x00000002;
pub const LVGA_HEADER_RIGHT: u32 = 0x00000004;

// LVGROUPMETRICS mask
pub const LVGMF_NONE: u32 = 0x00000000;
pub const LVGMF_BORDERSIZE: u32 = 0x00000001;
pub const LVGMF_BORDERCOLOR: u32 = 0x00000002;
pub const LVGMF_TEXTCOLOR: u32 = 0x00000004;
