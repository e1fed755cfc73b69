//! Materialised display rows and the single-slot row memo.

use std::rc::Rc;

use super::check_state::CheckState;
use super::image::NO_IMAGE;
use crate::types::COLORREF;

/// What the control draws for one row.
#[derive(Clone, Debug, PartialEq)]
pub struct OlvListItem<M> {
    pub index: usize,
    pub row_object: Option<M>,
    /// Text per column, in column order.
    pub sub_items: Vec<String>,
    /// Resolved image per column, [`NO_IMAGE`] when none.
    pub images: Vec<i32>,
    pub back_color: Option<COLORREF>,
    pub check_state: CheckState,
}

impl<M> OlvListItem<M> {
    pub fn new(index: usize, row_object: Option<M>) -> Self {
        Self {
            index,
            row_object,
            sub_items: Vec::new(),
            images: Vec::new(),
            back_color: None,
            check_state: CheckState::Unchecked,
        }
    }

    pub fn text(&self, column: usize) -> &str {
        self.sub_items.get(column).map(String::as_str).unwrap_or("")
    }

    pub fn image(&self, column: usize) -> i32 {
        self.images.get(column).copied().unwrap_or(NO_IMAGE)
    }
}

/// Remembers the last row handed to the control.
///
/// The control asks for the same index several times while painting one row,
/// so a single slot absorbs nearly all of the repeats.
#[derive(Debug)]
pub struct RowMemo<M> {
    slot: Option<(usize, Rc<OlvListItem<M>>)>,
}

impl<M> Default for RowMemo<M> {
    fn default() -> Self {
        Self { slot: None }
    }
}

impl<M> RowMemo<M> {
    pub fn get(&self, index: usize) -> Option<Rc<OlvListItem<M>>> {
        match &self.slot {
            Some((i, row)) if *i == index => Some(Rc::clone(row)),
            _ => None,
        }
    }

    pub fn store(&mut self, index: usize, row: Rc<OlvListItem<M>>) {
        self.slot = Some((index, row));
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }

    pub fn index(&self) -> Option<usize> {
        self.slot.as_ref().map(|(i, _)| *i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memo_hits_same_index_only() {
        let mut memo = RowMemo::default();
        let row = Rc::new(OlvListItem::new(3, Some("c")));
        memo.store(3, Rc::clone(&row));

        assert!(Rc::ptr_eq(&memo.get(3).unwrap(), &row));
        assert!(memo.get(4).is_none());

        memo.clear();
        assert!(memo.get(3).is_none());
        assert_eq!(memo.index(), None);
    }

    #[test]
    fn test_missing_cells() {
        let row: OlvListItem<()> = OlvListItem::new(0, None);
        assert_eq!(row.text(5), "");
        assert_eq!(row.image(5), NO_IMAGE);
    }
}
