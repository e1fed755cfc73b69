//! Backing stores for virtual lists.
//!
//! A virtual list never holds its rows. Everything it shows is pulled, one
//! index at a time, from a [`VirtualListDataSource`].

use std::fmt;

use super::column::{OlvColumn, SortOrder};
use crate::utils::starts_with_ignore_case;

/// The contract between a virtual list and whatever stores its model objects.
///
/// Every method except [`Self::object_at`] has an inert default, so a source
/// only implements what its storage can actually do.
pub trait VirtualListDataSource<M> {
    /// Model shown at row `index`, or `None` when nothing is available there.
    fn object_at(&self, index: usize) -> Option<M>;

    /// Number of rows, or `None` when the source cannot tell.
    ///
    /// A list only syncs its size from sources that return `Some`.
    fn count(&self) -> Option<usize> {
        None
    }

    /// Row showing `model`, or `None` if absent or unsupported.
    fn index_of(&self, _model: &M) -> Option<usize> {
        None
    }

    /// Rows `first..=last` are about to be requested repeatedly.
    fn prepare_cache(&mut self, _first: usize, _last: usize) {}

    /// First row in the range from `first` to `last` (either direction, both
    /// inclusive) whose `column` text starts with `text`, ignoring case.
    fn search_text(&self, _text: &str, _first: usize, _last: usize, _column: &OlvColumn<M>) -> Option<usize> {
        None
    }

    /// Reorder the backing store. Any index-based cache the source holds must be dropped.
    fn sort(&mut self, _column: &OlvColumn<M>, _order: SortOrder) {}

    fn add_objects(&mut self, _models: &[M]) {}

    /// Remove every row showing one of `models`. Unknown models are ignored.
    fn remove_objects(&mut self, _models: &[M]) {}

    /// Replace the entire backing collection.
    fn set_objects(&mut self, _models: Vec<M>) {}
}

/// Linear range scan shared by data sources that can fetch rows cheaply.
///
/// Scans ascending when `first <= last`, descending otherwise. The first
/// matching index wins.
pub fn default_search_text<M, S>(text: &str, first: usize, last: usize, column: &OlvColumn<M>, source: &S) -> Option<usize>
where
    S: VirtualListDataSource<M> + ?Sized,
{
    let matches = |i: usize| {
        let value = column.get_string_value(source.object_at(i).as_ref());
        starts_with_ignore_case(&value, text)
    };

    if first <= last {
        (first..=last).find(|&i| matches(i))
    } else {
        (last..=first).rev().find(|&i| matches(i))
    }
}

/// A source that knows nothing. Every query misses, every mutation is ignored.
#[derive(Clone, Copy, Debug, Default)]
pub struct AbstractDataSource;

impl<M> VirtualListDataSource<M> for AbstractDataSource {
    fn object_at(&self, _index: usize) -> Option<M> {
        None
    }
}

type RowGetter<M> = Box<dyn Fn(usize) -> Option<M>>;

/// Read-only source backed by a single "row at index" function.
///
/// Its count is unknown, so the owning list's size is set by the host.
pub struct RowGetterDataSource<M> {
    row_getter: Option<RowGetter<M>>,
}

impl<M> Default for RowGetterDataSource<M> {
    fn default() -> Self {
        Self { row_getter: None }
    }
}

impl<M> fmt::Debug for RowGetterDataSource<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowGetterDataSource")
            .field("has_row_getter", &self.row_getter.is_some())
            .finish()
    }
}

impl<M> RowGetterDataSource<M> {
    pub fn new(row_getter: impl Fn(usize) -> Option<M> + 'static) -> Self {
        Self { row_getter: Some(Box::new(row_getter)) }
    }

    pub fn set_row_getter(&mut self, row_getter: impl Fn(usize) -> Option<M> + 'static) {
        self.row_getter = Some(Box::new(row_getter));
    }

    pub fn has_row_getter(&self) -> bool {
        self.row_getter.is_some()
    }
}

impl<M> VirtualListDataSource<M> for RowGetterDataSource<M> {
    fn object_at(&self, index: usize) -> Option<M> {
        self.row_getter.as_ref().and_then(|get| get(index))
    }

    fn search_text(&self, text: &str, first: usize, last: usize, column: &OlvColumn<M>) -> Option<usize> {
        default_search_text(text, first, last, column, self)
    }
}

/// Source that owns its models in a `Vec`.
#[derive(Clone, Debug, Default)]
pub struct VecDataSource<M> {
    objects: Vec<M>,
}

impl<M> VecDataSource<M> {
    pub fn new(objects: Vec<M>) -> Self {
        Self { objects }
    }

    pub fn objects(&self) -> &[M] {
        &self.objects
    }
}

impl<M: Clone + PartialEq> VirtualListDataSource<M> for VecDataSource<M> {
    fn object_at(&self, index: usize) -> Option<M> {
        self.objects.get(index).cloned()
    }

    fn count(&self) -> Option<usize> {
        Some(self.objects.len())
    }

    fn index_of(&self, model: &M) -> Option<usize> {
        self.objects.iter().position(|m| m == model)
    }

    fn search_text(&self, text: &str, first: usize, last: usize, column: &OlvColumn<M>) -> Option<usize> {
        default_search_text(text, first, last, column, self)
    }

    /// Stable sort by the column's aspect value.
    fn sort(&mut self, column: &OlvColumn<M>, order: SortOrder) {
        match order {
            SortOrder::None => {}
            SortOrder::Ascending => self
                .objects
                .sort_by(|a, b| column.get_value(a).cmp(&column.get_value(b))),
            SortOrder::Descending => self
                .objects
                .sort_by(|a, b| column.get_value(b).cmp(&column.get_value(a))),
        }
    }

    fn add_objects(&mut self, models: &[M]) {
        self.objects.extend_from_slice(models);
    }

    fn remove_objects(&mut self, models: &[M]) {
        self.objects.retain(|m| !models.contains(m));
    }

    fn set_objects(&mut self, models: Vec<M>) {
        self.objects = models;
    }
}
