//! The virtual list controller.
//!
//! Owns the native control facade and the data source and answers the
//! control's owner-data callbacks (retrieve, cache hint, find) on the UI
//! thread. Nothing here keeps per-row state except the single-slot row memo
//! and the check-state map.

use std::collections::HashSet;
use std::hash::Hash;
use std::rc::Rc;

use super::check_state::{CheckState, CheckStateMap};
use super::column::{OlvColumn, SortOrder};
use super::data_source::{RowGetterDataSource, VirtualListDataSource};
use super::events::{
    ItemsAddingEventArgs, ItemsChangedEventArgs, ItemsChangingEventArgs, ItemsRemovingEventArgs, ListViewEvents,
};
use super::group::{GroupEnv, OlvGroup};
use super::image::{ImageList, NO_IMAGE, compute_image_index};
use super::row::{OlvListItem, RowMemo};
use crate::config::ListViewConfig;
use crate::error::{NativeError, Result};
use crate::ui::dispatch::{RemoteHandle, RemoteJob, UiDispatcher};
use crate::ui::native::{NativeListView, SearchDirection, View};

type CheckStateGetter<M> = Box<dyn Fn(&M) -> CheckState>;
type CheckStatePutter<M> = Box<dyn FnMut(&M, CheckState) -> CheckState>;

/// An object list view in owner-data mode.
///
/// `M` is the model type. It must be hashable so check states can be tracked
/// per object, since the control itself cannot hold them in virtual mode.
pub struct VirtualObjectListView<M, N> {
    native: N,
    data_source: Option<Box<dyn VirtualListDataSource<M>>>,
    columns: Vec<OlvColumn<M>>,
    check_states: CheckStateMap<M>,
    check_state_getter: Option<CheckStateGetter<M>>,
    check_state_putter: Option<CheckStatePutter<M>>,
    memo: RowMemo<M>,
    config: ListViewConfig,
    last_sort_column: Option<usize>,
    last_sort_order: SortOrder,
    events: ListViewEvents<M>,
    small_image_list: Option<ImageList>,
    group_image_list: Option<ImageList>,
    dispatcher: UiDispatcher<M>,
}

impl<M, N> VirtualObjectListView<M, N>
where
    M: Clone + Eq + Hash + 'static,
    N: NativeListView,
{
    /// Wraps `native`. Must be called on the UI thread.
    pub fn new(native: N, config: ListViewConfig) -> Self {
        Self {
            native,
            data_source: None,
            columns: Vec::new(),
            check_states: CheckStateMap::new(),
            check_state_getter: None,
            check_state_putter: None,
            memo: RowMemo::default(),
            config,
            last_sort_column: None,
            last_sort_order: SortOrder::None,
            events: ListViewEvents::default(),
            small_image_list: None,
            group_image_list: None,
            dispatcher: UiDispatcher::new(),
        }
    }

    // ---- Configuration ----

    pub fn native(&self) -> &N {
        &self.native
    }

    pub fn native_mut(&mut self) -> &mut N {
        &mut self.native
    }

    pub fn config(&self) -> &ListViewConfig {
        &self.config
    }

    /// Replaces the configuration and repaints with it.
    pub fn set_config(&mut self, config: ListViewConfig) {
        self.config = config;
        self.build_list();
    }

    pub fn events_mut(&mut self) -> &mut ListViewEvents<M> {
        &mut self.events
    }

    /// Appends a column; its index becomes its position.
    pub fn add_column(&mut self, mut column: OlvColumn<M>) -> usize {
        let index = self.columns.len();
        column.set_index(index);
        self.columns.push(column);
        self.memo.clear();
        index
    }

    pub fn columns(&self) -> &[OlvColumn<M>] {
        &self.columns
    }

    pub fn set_small_image_list(&mut self, images: Option<ImageList>) {
        self.small_image_list = images;
        self.memo.clear();
    }

    pub fn set_group_image_list(&mut self, images: Option<ImageList>) {
        self.group_image_list = images;
    }

    pub fn last_sort_column(&self) -> Option<&OlvColumn<M>> {
        self.last_sort_column.and_then(|i| self.columns.get(i))
    }

    pub fn last_sort_order(&self) -> SortOrder {
        self.last_sort_order
    }

    // ---- Data source ----

    pub fn data_source(&self) -> Option<&dyn VirtualListDataSource<M>> {
        self.data_source.as_deref()
    }

    /// Installs `source` and syncs the row count to it.
    pub fn set_data_source(&mut self, source: impl VirtualListDataSource<M> + 'static) -> Result<()> {
        self.data_source = Some(Box::new(source));
        self.memo.clear();
        self.update_virtual_list_size()
    }

    /// Installs a read-only source backed by `row_getter`.
    ///
    /// Such a source cannot count its rows; set the size with
    /// [`Self::set_virtual_list_size`].
    pub fn set_row_getter(&mut self, row_getter: impl Fn(usize) -> Option<M> + 'static) -> Result<()> {
        self.set_data_source(RowGetterDataSource::new(row_getter))
    }

    // ---- Object access ----

    /// Rows the control currently shows.
    pub fn item_count(&self) -> usize {
        self.native.virtual_list_size()
    }

    pub fn model_object(&self, index: usize) -> Option<M> {
        self.data_source.as_ref()?.object_at(index)
    }

    pub fn index_of(&self, model: &M) -> Option<usize> {
        self.data_source.as_ref()?.index_of(model)
    }

    pub fn model_to_item(&mut self, model: &M) -> Option<Rc<OlvListItem<M>>> {
        let index = self.index_of(model)?;
        self.get_item(index)
    }

    // ---- Owner-data callbacks ----

    /// Row at `index`, as the control should draw it.
    ///
    /// Consecutive requests for the same index return the same row until the
    /// next structural change.
    pub fn get_item(&mut self, index: usize) -> Option<Rc<OlvListItem<M>>> {
        self.data_source.as_ref()?;

        if let Some(row) = self.memo.get(index) {
            return Some(row);
        }

        let row = Rc::new(self.make_list_view_item(index));
        self.memo.store(index, Rc::clone(&row));
        Some(row)
    }

    fn make_list_view_item(&self, index: usize) -> OlvListItem<M> {
        let model = self.model_object(index);
        let mut row = OlvListItem::new(index, None);

        if let Some(m) = &model {
            row.sub_items = self.columns.iter().map(|c| c.get_string_value(Some(m))).collect();
            row.images = self
                .columns
                .iter()
                .map(|c| compute_image_index(&c.get_image(m), self.small_image_list.as_ref()))
                .collect();
            if self.config.check_boxes {
                row.check_state = self.get_check_state(m);
            }
        } else {
            row.sub_items = vec![String::new(); self.columns.len()];
            row.images = vec![NO_IMAGE; self.columns.len()];
        }

        if self.config.use_alternating_back_colors {
            row.back_color = Some(if self.config.view == View::Details && index % 2 == 1 {
                self.config.alternate_row_back_color_or_default()
            } else {
                self.config.back_color
            });
        }

        log::trace!("materialised row {index}");
        row.row_object = model;
        row
    }

    /// Forwards the control's cache hint to the data source.
    pub fn prepare_cache(&mut self, first: usize, last: usize) {
        if let Some(source) = &mut self.data_source {
            source.prepare_cache(first, last);
        }
    }

    /// Type-ahead search starting at `start`, wrapping around the list once.
    ///
    /// `start` may equal the row count, which the control sends when the
    /// focused row is the last one. Sources that cannot count their rows are
    /// searched over the size the control reports.
    pub fn find_matching_row(&self, text: &str, start: usize, direction: SearchDirection) -> Option<usize> {
        let source = self.data_source.as_ref()?;
        let count = source.count().unwrap_or_else(|| self.native.virtual_list_size());
        if count == 0 {
            return None;
        }

        let column = match self.last_sort_column {
            Some(i) if self.config.is_search_on_sort_column && self.config.view == View::Details => {
                self.columns.get(i)
            }
            _ => self.columns.first(),
        }?;

        let hint = start;
        let start = hint.min(count - 1);
        let last = count - 1;

        match direction {
            SearchDirection::Down => source
                .search_text(text, start, last, column)
                .or_else(|| (hint > 0 && start > 0).then(|| source.search_text(text, 0, start - 1, column)).flatten()),
            SearchDirection::Up => source.search_text(text, start, 0, column).or_else(|| {
                (hint < count && start < last)
                    .then(|| source.search_text(text, last, start + 1, column))
                    .flatten()
            }),
        }
    }

    // ---- Mutation ----

    /// Adds `models` after giving listeners a chance to edit or cancel them.
    pub fn add_objects(&mut self, models: Vec<M>) -> Result<()> {
        if self.data_source.is_none() {
            return Ok(());
        }

        let mut args = ItemsAddingEventArgs { objects_to_add: models, canceled: false };
        self.events.raise_items_adding(&mut args);
        if args.canceled {
            log::debug!("add of {} objects vetoed", args.objects_to_add.len());
            return Ok(());
        }

        if let Some(source) = &mut self.data_source {
            source.add_objects(&args.objects_to_add);
        }
        self.finish_mutation()
    }

    /// Removes `models`. Objects the source does not hold are ignored.
    pub fn remove_objects(&mut self, models: Vec<M>) -> Result<()> {
        if self.data_source.is_none() {
            return Ok(());
        }

        let mut args = ItemsRemovingEventArgs { objects_to_remove: models, canceled: false };
        self.events.raise_items_removing(&mut args);
        if args.canceled {
            log::debug!("removal of {} objects vetoed", args.objects_to_remove.len());
            return Ok(());
        }

        if let Some(source) = &mut self.data_source {
            source.remove_objects(&args.objects_to_remove);
        }
        self.finish_mutation()
    }

    /// Replaces every object, then re-applies the last sort.
    pub fn set_objects(&mut self, models: Vec<M>) -> Result<()> {
        if self.data_source.is_none() {
            return Ok(());
        }

        self.native.begin_update();
        let result = self.set_objects_inner(models);
        self.native.end_update();
        result
    }

    fn set_objects_inner(&mut self, models: Vec<M>) -> Result<()> {
        let mut args = ItemsChangingEventArgs { old_objects: None, new_objects: models, canceled: false };
        self.events.raise_items_changing(&mut args);
        if args.canceled {
            log::debug!("replacement by {} objects vetoed", args.new_objects.len());
            return Ok(());
        }

        if let Some(source) = &mut self.data_source {
            source.set_objects(args.new_objects);
        }
        self.update_virtual_list_size()?;
        if let Some(column) = self.last_sort_column {
            self.sort(column, self.last_sort_order);
        }
        self.memo.clear();
        self.native.invalidate();
        Ok(())
    }

    fn finish_mutation(&mut self) -> Result<()> {
        let resized = self.update_virtual_list_size();
        self.memo.clear();
        self.native.invalidate();
        resized
    }

    /// Empties the list without touching the data source.
    pub fn clear_objects(&mut self) -> Result<()> {
        self.memo.clear();
        self.set_virtual_list_size(0)
    }

    /// Redraws the rows showing `models`. Objects the source cannot locate are skipped.
    pub fn refresh_objects(&mut self, models: &[M]) {
        let Some(source) = &self.data_source else {
            return;
        };
        let indices: Vec<usize> = models.iter().filter_map(|m| source.index_of(m)).collect();
        for index in indices {
            self.refresh_item(index);
        }
    }

    pub fn refresh_item(&mut self, index: usize) {
        self.memo.clear();
        self.native.redraw_items(index, index);
    }

    /// Drops cached rows and repaints everything.
    pub fn build_list(&mut self) {
        self.memo.clear();
        self.native.invalidate();
    }

    // ---- Sizing ----

    /// Syncs the row count to the data source, if it knows its count.
    pub fn update_virtual_list_size(&mut self) -> Result<()> {
        match self.data_source.as_ref().and_then(|s| s.count()) {
            Some(count) => self.set_virtual_list_size(count),
            None => Ok(()),
        }
    }

    /// Resizes the control, raising `ItemsChanged` after the attempt.
    ///
    /// Collapsing to zero scrolls to the top first; a scrolled list emptied in
    /// place keeps a stale scroll range. Known transient resize failures are
    /// swallowed.
    pub fn set_virtual_list_size(&mut self, new_size: usize) -> Result<()> {
        let old_size = self.native.virtual_list_size();
        if old_size == new_size {
            return Ok(());
        }

        self.memo.clear();

        if new_size == 0 && self.native.top_item_index() > 0 {
            if let Err(e) = self.native.set_top_item_index(0) {
                log::debug!("scroll to top before clearing failed: {e}");
            }
        }

        let resized = match self.native.set_virtual_list_size(new_size) {
            Ok(()) => Ok(()),
            Err(e) if e.is_benign_resize_failure() => {
                log::debug!("ignoring resize to {new_size}: {e}");
                Ok(())
            }
            Err(e) => {
                log::warn!("resize to {new_size} failed: {e}");
                Err(e)
            }
        };

        let args = ItemsChangedEventArgs { old_count: old_size, new_count: self.native.virtual_list_size() };
        log::debug!("list size {} -> {}", args.old_count, args.new_count);
        self.events.raise_items_changed(&args);

        resized.map_err(Into::into)
    }

    // ---- Sorting ----

    /// Sorts the data source by `column` and repaints.
    pub fn sort(&mut self, column: usize, order: SortOrder) {
        let Some(col) = self.columns.get(column) else {
            return;
        };
        self.last_sort_column = Some(column);
        self.last_sort_order = order;

        if let Some(source) = &mut self.data_source {
            self.memo.clear();
            source.sort(col, order);
            self.native.invalidate();
        }
    }

    /// Header click: repeat clicks toggle the order, a new column starts ascending.
    ///
    /// Selection is carried across by object, because the control only
    /// remembers selected indices.
    pub fn handle_column_click(&mut self, column: usize) {
        let order = if self.last_sort_column == Some(column) {
            self.last_sort_order.toggled()
        } else {
            SortOrder::Ascending
        };

        self.native.begin_update();
        let previous = self.selected_objects();
        self.sort(column, order);
        self.select_objects(&previous);
        self.native.end_update();
    }

    // ---- Selection ----

    pub fn selected_objects(&self) -> Vec<M> {
        self.native
            .selected_indices()
            .into_iter()
            .filter_map(|i| self.model_object(i))
            .collect()
    }

    /// Selects only the row showing `model`. No-op when it is unknown or
    /// already the sole selection.
    pub fn select_object(&mut self, model: &M, set_focus: bool) {
        let Some(index) = self.index_of(model) else {
            return;
        };
        if self.native.selected_indices() == [index] {
            return;
        }
        self.native.set_selected_indices(&[index]);
        if set_focus {
            self.native.focus_item(index);
        }
    }

    /// Selects the rows showing `models` and nothing else.
    pub fn select_objects(&mut self, models: &[M]) {
        if self.data_source.is_none() {
            return;
        }
        let indices: Vec<usize> = models.iter().filter_map(|m| self.index_of(m)).collect();
        self.native.set_selected_indices(&indices);
    }

    // ---- Check states ----

    pub fn set_check_state_getter(&mut self, getter: Option<impl Fn(&M) -> CheckState + 'static>) {
        self.check_state_getter = getter.map(|g| Box::new(g) as CheckStateGetter<M>);
        self.memo.clear();
    }

    pub fn set_check_state_putter(&mut self, putter: Option<impl FnMut(&M, CheckState) -> CheckState + 'static>) {
        self.check_state_putter = putter.map(|p| Box::new(p) as CheckStatePutter<M>);
    }

    /// Check state of `model`; objects never written read as unchecked.
    pub fn get_check_state(&self, model: &M) -> CheckState {
        match &self.check_state_getter {
            Some(getter) => getter(model),
            None => self.check_states.get(model),
        }
    }

    /// Records a state, letting the putter adjust it. Returns what was recorded.
    fn put_check_state(&mut self, model: &M, state: CheckState) -> CheckState {
        let state = match &mut self.check_state_putter {
            Some(putter) => putter(model, state),
            None => state,
        };
        self.check_states.set(model.clone(), state);
        state
    }

    /// Sets the state of `model` and redraws its row.
    pub fn set_object_checkedness(&mut self, model: &M, state: CheckState) {
        if self.get_check_state(model) == state {
            return;
        }
        self.put_check_state(model, state);
        self.memo.clear();
        if let Some(index) = self.index_of(model) {
            self.native.redraw_items(index, index);
        }
    }

    pub fn check_object(&mut self, model: &M) {
        self.set_object_checkedness(model, CheckState::Checked);
    }

    pub fn uncheck_object(&mut self, model: &M) {
        self.set_object_checkedness(model, CheckState::Unchecked);
    }

    pub fn toggle_check_object(&mut self, model: &M) {
        let state = self.get_check_state(model).toggled();
        self.set_object_checkedness(model, state);
    }

    pub fn is_checked(&self, model: &M) -> bool {
        self.get_check_state(model) == CheckState::Checked
    }

    /// Checked objects. Empty when check boxes are off.
    ///
    /// With a getter installed every row is visited; otherwise only the
    /// tracked objects are.
    pub fn checked_objects(&self) -> Vec<M> {
        if !self.config.check_boxes {
            return Vec::new();
        }
        if self.check_state_getter.is_some() {
            return (0..self.item_count())
                .filter_map(|i| self.model_object(i))
                .filter(|m| self.is_checked(m))
                .collect();
        }
        self.check_states.checked().cloned().collect()
    }

    /// Makes exactly `models` checked.
    ///
    /// Every tracked object outside `models` is unchecked first, then every
    /// member of `models` is checked. Does nothing when check boxes are off.
    pub fn set_checked_objects(&mut self, models: &[M]) {
        if !self.config.check_boxes {
            return;
        }

        let wanted: HashSet<&M> = models.iter().collect();
        let tracked: Vec<M> = self.check_states.tracked().cloned().collect();
        for model in &tracked {
            let state = if wanted.contains(model) { CheckState::Checked } else { CheckState::Unchecked };
            self.set_object_checkedness(model, state);
        }
        for model in models {
            self.set_object_checkedness(model, CheckState::Checked);
        }
    }

    /// Click on the check box of row `index`.
    ///
    /// When that row is selected, every selected row takes its new state.
    pub fn handle_state_image_click(&mut self, index: usize) {
        if !self.config.check_boxes {
            return;
        }
        let Some(model) = self.model_object(index) else {
            return;
        };

        self.toggle_check_object(&model);
        if self.native.selected_indices().contains(&index) {
            let state = self.get_check_state(&model);
            for other in self.selected_objects() {
                self.set_object_checkedness(&other, state);
            }
        }
    }

    // ---- Groups ----

    /// Inserts count-only groups directly into the control.
    pub fn insert_groups(&mut self, groups: &[OlvGroup]) -> std::result::Result<(), NativeError> {
        let env = GroupEnv {
            image_list: self.group_image_list.as_ref(),
            space_between_groups: self.config.space_between_groups,
        };
        for group in groups {
            group.insert_new_style(&mut self.native, &env)?;
        }
        Ok(())
    }

    // ---- Cross-thread ----

    /// Handle for other threads. Its calls run on this thread in [`Self::pump_pending`].
    pub fn remote_handle(&self) -> RemoteHandle<M> {
        self.dispatcher.handle()
    }

    /// Installs the waker used by handles created afterwards.
    pub fn set_remote_waker(&mut self, waker: impl Fn() + Send + Sync + 'static) {
        self.dispatcher.set_waker(waker);
    }

    /// Runs every queued cross-thread job. Returns how many ran.
    pub fn pump_pending(&mut self) -> usize {
        let mut ran = 0;
        while let Some(pending) = self.dispatcher.try_next() {
            pending.run(|job| match job {
                RemoteJob::SetObjects(models) => self.set_objects(models),
                RemoteJob::ClearObjects => self.clear_objects(),
            });
            ran += 1;
        }
        ran
    }
}
