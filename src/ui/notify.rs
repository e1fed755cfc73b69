//! `WM_NOTIFY` decoding for an owner-data list view.
//!
//! The host window forwards the `lParam` of every `WM_NOTIFY` coming from the
//! list control; anything not handled here returns `None` so the host can
//! fall through to `DefWindowProcW`.

use std::hash::Hash;

use crate::engine::controller::VirtualObjectListView;
use crate::types::*;
use crate::ui::native::{NativeListView, SearchDirection};
use crate::utils::{copy_to_wide_buffer, from_wide_ptr};

/// Answers one list-view notification.
///
/// # Safety
/// `lparam` must be the `lParam` of a `WM_NOTIFY` sent by a list view, i.e.
/// point to a live `NMHDR` whose code matches the structure behind it.
pub unsafe fn handle_notify<M, N>(list: &mut VirtualObjectListView<M, N>, lparam: LPARAM) -> Option<LRESULT>
where
    M: Clone + Eq + Hash + 'static,
    N: NativeListView,
{
    if lparam == 0 {
        return None;
    }
    // SAFETY: caller guarantees lparam points to a notification header.
    let code = unsafe { (*(lparam as *const NMHDR)).code };

    match code {
        LVN_GETDISPINFOW => {
            // SAFETY: code identifies the payload.
            let info = unsafe { &mut *(lparam as *mut NMLVDISPINFOW) };
            unsafe { fill_display_info(list, &mut info.item) };
            Some(0)
        }
        LVN_ODCACHEHINT => {
            let hint = unsafe { &*(lparam as *const NMLVCACHEHINT) };
            if let (Ok(from), Ok(to)) = (usize::try_from(hint.iFrom), usize::try_from(hint.iTo)) {
                list.prepare_cache(from, to);
            }
            Some(0)
        }
        LVN_ODFINDITEMW => {
            let find = unsafe { &*(lparam as *const NMLVFINDITEMW) };
            let found = unsafe { find_item(list, find) };
            Some(found.map_or(-1, |i| i as LRESULT))
        }
        LVN_COLUMNCLICK => {
            let nmlv = unsafe { &*(lparam as *const NMLISTVIEW) };
            if let Ok(column) = usize::try_from(nmlv.iSubItem) {
                list.handle_column_click(column);
            }
            Some(0)
        }
        NM_CUSTOMDRAW => {
            let draw = unsafe { &mut *(lparam as *mut NMLVCUSTOMDRAW) };
            Some(custom_draw(list, draw))
        }
        _ => None,
    }
}

unsafe fn fill_display_info<M, N>(list: &mut VirtualObjectListView<M, N>, item: &mut LVITEMW)
where
    M: Clone + Eq + Hash + 'static,
    N: NativeListView,
{
    let Ok(index) = usize::try_from(item.iItem) else {
        return;
    };
    let Some(row) = list.get_item(index) else {
        return;
    };
    let column = usize::try_from(item.iSubItem).unwrap_or(0);

    if item.mask & LVIF_TEXT != 0 && !item.pszText.is_null() && item.cchTextMax > 0 {
        // SAFETY: the control owns a buffer of cchTextMax units at pszText.
        let buffer = unsafe { std::slice::from_raw_parts_mut(item.pszText, item.cchTextMax as usize) };
        copy_to_wide_buffer(row.text(column), buffer);
    }

    if item.mask & LVIF_IMAGE != 0 {
        item.iImage = row.image(column);
    }

    if item.mask & LVIF_STATE != 0 && column == 0 && list.config().check_boxes {
        item.state = (item.state & !LVIS_STATEIMAGEMASK)
            | index_to_state_image_mask(row.check_state.state_image_index());
        item.stateMask |= LVIS_STATEIMAGEMASK;
    }
}

unsafe fn find_item<M, N>(list: &VirtualObjectListView<M, N>, find: &NMLVFINDITEMW) -> Option<usize>
where
    M: Clone + Eq + Hash + 'static,
    N: NativeListView,
{
    if find.lvfi.flags & (LVFI_STRING | LVFI_PARTIAL) == 0 {
        return None;
    }
    // SAFETY: with LVFI_STRING the control supplies a terminated string.
    let text = unsafe { from_wide_ptr(find.lvfi.psz) };
    let direction = match find.lvfi.vkDirection {
        VK_UP | VK_LEFT | VK_PRIOR => SearchDirection::Up,
        _ => SearchDirection::Down,
    };
    let start = usize::try_from(find.iStart).unwrap_or(0);
    list.find_matching_row(&text, start, direction)
}

fn custom_draw<M, N>(list: &mut VirtualObjectListView<M, N>, draw: &mut NMLVCUSTOMDRAW) -> LRESULT
where
    M: Clone + Eq + Hash + 'static,
    N: NativeListView,
{
    if !list.config().use_alternating_back_colors {
        return CDRF_DODEFAULT;
    }
    match draw.nmcd.dwDrawStage {
        CDDS_PREPAINT => CDRF_NOTIFYITEMDRAW,
        CDDS_ITEMPREPAINT => {
            let color = list.get_item(draw.nmcd.dwItemSpec).and_then(|row| row.back_color);
            match color {
                Some(c) => {
                    draw.clrTextBk = c;
                    CDRF_NEWFONT
                }
                None => CDRF_DODEFAULT,
            }
        }
        _ => CDRF_DODEFAULT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ListViewConfig;
    use crate::engine::check_state::CheckState;
    use crate::engine::column::{Aspect, OlvColumn, SortOrder};
    use crate::engine::data_source::VecDataSource;
    use crate::ui::native::mock::MockListView;
    use crate::utils::to_wstring;

    type List = VirtualObjectListView<String, MockListView>;

    fn list(config: ListViewConfig) -> List {
        let mut list = VirtualObjectListView::new(MockListView::default(), config);
        list.add_column(OlvColumn::new("Name", "name", |m: &String| Aspect::from(m.as_str())));
        list.add_column(OlvColumn::new("Len", "len", |m: &String| Aspect::Int(m.len() as i64)));
        let rows = ["apple", "banana", "cherry"].iter().map(|s| s.to_string()).collect();
        list.set_data_source(VecDataSource::new(rows)).unwrap();
        list
    }

    fn header(code: u32) -> NMHDR {
        NMHDR { hwndFrom: std::ptr::null_mut(), idFrom: 1, code }
    }

    #[test]
    fn test_unknown_and_null_notifications_pass_through() {
        let mut l = list(ListViewConfig::default());
        let mut hdr = header(0xFFFF_FFF0);
        assert_eq!(unsafe { handle_notify(&mut l, &mut hdr as *mut _ as LPARAM) }, None);
        assert_eq!(unsafe { handle_notify(&mut l, 0) }, None);
    }

    #[test]
    fn test_get_display_info_copies_truncated_text() {
        let mut l = list(ListViewConfig::default());
        let mut buffer = [0xFFFFu16; 4];
        let mut info = NMLVDISPINFOW { hdr: header(LVN_GETDISPINFOW), item: LVITEMW::default() };
        info.item.mask = LVIF_TEXT | LVIF_IMAGE;
        info.item.iItem = 1;
        info.item.iSubItem = 0;
        info.item.pszText = buffer.as_mut_ptr();
        info.item.cchTextMax = buffer.len() as i32;

        assert_eq!(unsafe { handle_notify(&mut l, &mut info as *mut _ as LPARAM) }, Some(0));
        assert_eq!(buffer, [b'b' as u16, b'a' as u16, b'n' as u16, 0]);
        assert_eq!(info.item.iImage, -1);

        info.item.iSubItem = 1;
        unsafe { handle_notify(&mut l, &mut info as *mut _ as LPARAM) };
        assert_eq!(unsafe { from_wide_ptr(buffer.as_ptr()) }, "6");
    }

    #[test]
    fn test_get_display_info_reports_check_state() {
        let mut l = list(ListViewConfig { check_boxes: true, ..ListViewConfig::default() });
        l.check_object(&"cherry".to_string());

        let mut info = NMLVDISPINFOW { hdr: header(LVN_GETDISPINFOW), item: LVITEMW::default() };
        info.item.mask = LVIF_STATE;
        info.item.iItem = 2;
        unsafe { handle_notify(&mut l, &mut info as *mut _ as LPARAM) };
        assert_eq!(info.item.state & LVIS_STATEIMAGEMASK, index_to_state_image_mask(2));
        assert_eq!(info.item.stateMask, LVIS_STATEIMAGEMASK);

        info.item.iItem = 0;
        info.item.state = 0;
        unsafe { handle_notify(&mut l, &mut info as *mut _ as LPARAM) };
        assert_eq!(info.item.state, index_to_state_image_mask(CheckState::Unchecked.state_image_index()));
    }

    #[test]
    fn test_find_item() {
        let mut l = list(ListViewConfig::default());
        let text = to_wstring("A");
        let mut find = NMLVFINDITEMW {
            hdr: header(LVN_ODFINDITEMW),
            iStart: 2,
            lvfi: LVFINDINFOW::default(),
        };
        find.lvfi.flags = LVFI_STRING | LVFI_PARTIAL;
        find.lvfi.psz = text.as_ptr();
        assert_eq!(unsafe { handle_notify(&mut l, &mut find as *mut _ as LPARAM) }, Some(0));

        let text = to_wstring("zzz");
        find.lvfi.psz = text.as_ptr();
        find.lvfi.vkDirection = VK_UP;
        assert_eq!(unsafe { handle_notify(&mut l, &mut find as *mut _ as LPARAM) }, Some(-1));

        find.lvfi.flags = LVFI_PARAM;
        assert_eq!(unsafe { handle_notify(&mut l, &mut find as *mut _ as LPARAM) }, Some(-1));
    }

    #[test]
    fn test_column_click_sorts() {
        let mut l = list(ListViewConfig::default());
        let mut nmlv: NMLISTVIEW = unsafe { std::mem::zeroed() };
        nmlv.hdr = header(LVN_COLUMNCLICK);
        nmlv.iItem = -1;
        nmlv.iSubItem = 1;

        unsafe { handle_notify(&mut l, &mut nmlv as *mut _ as LPARAM) };
        assert_eq!(l.last_sort_order(), SortOrder::Ascending);
        unsafe { handle_notify(&mut l, &mut nmlv as *mut _ as LPARAM) };
        assert_eq!(l.last_sort_order(), SortOrder::Descending);
        assert_eq!(l.model_object(2).as_deref(), Some("apple"));
    }

    #[test]
    fn test_cache_hint_reaches_source() {
        let mut l = list(ListViewConfig::default());
        let mut hint = NMLVCACHEHINT { hdr: header(LVN_ODCACHEHINT), iFrom: 0, iTo: 2 };
        assert_eq!(unsafe { handle_notify(&mut l, &mut hint as *mut _ as LPARAM) }, Some(0));
    }

    #[test]
    fn test_custom_draw_alternates() {
        let mut plain = list(ListViewConfig::default());
        let mut draw = NMLVCUSTOMDRAW::default();
        draw.nmcd.hdr = header(NM_CUSTOMDRAW);
        draw.nmcd.dwDrawStage = CDDS_PREPAINT;
        assert_eq!(unsafe { handle_notify(&mut plain, &mut draw as *mut _ as LPARAM) }, Some(CDRF_DODEFAULT));

        let mut l = list(ListViewConfig { use_alternating_back_colors: true, ..ListViewConfig::default() });
        assert_eq!(unsafe { handle_notify(&mut l, &mut draw as *mut _ as LPARAM) }, Some(CDRF_NOTIFYITEMDRAW));

        draw.nmcd.dwDrawStage = CDDS_ITEMPREPAINT;
        draw.nmcd.dwItemSpec = 1;
        assert_eq!(unsafe { handle_notify(&mut l, &mut draw as *mut _ as LPARAM) }, Some(CDRF_NEWFONT));
        assert_eq!(draw.clrTextBk, l.config().alternate_row_back_color_or_default());
    }
}
