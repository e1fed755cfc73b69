//! Notifications raised around object-set mutations.
//!
//! The `*ing` notifications are synchronous veto points: a handler may edit
//! the proposed objects or cancel the operation outright.

/// Raised before objects are added.
#[derive(Debug)]
pub struct ItemsAddingEventArgs<M> {
    pub objects_to_add: Vec<M>,
    pub canceled: bool,
}

/// Raised before objects are removed.
#[derive(Debug)]
pub struct ItemsRemovingEventArgs<M> {
    pub objects_to_remove: Vec<M>,
    pub canceled: bool,
}

/// Raised before the whole object set is replaced.
#[derive(Debug)]
pub struct ItemsChangingEventArgs<M> {
    /// Previous collection, when the list can enumerate it. Virtual lists cannot.
    pub old_objects: Option<Vec<M>>,
    pub new_objects: Vec<M>,
    pub canceled: bool,
}

/// Raised after the row count changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemsChangedEventArgs {
    pub old_count: usize,
    pub new_count: usize,
}

type Handler<A> = Box<dyn FnMut(&mut A)>;

/// Registered listeners, called in registration order.
pub struct ListViewEvents<M> {
    items_adding: Vec<Handler<ItemsAddingEventArgs<M>>>,
    items_removing: Vec<Handler<ItemsRemovingEventArgs<M>>>,
    items_changing: Vec<Handler<ItemsChangingEventArgs<M>>>,
    items_changed: Vec<Box<dyn FnMut(&ItemsChangedEventArgs)>>,
}

impl<M> Default for ListViewEvents<M> {
    fn default() -> Self {
        Self {
            items_adding: Vec::new(),
            items_removing: Vec::new(),
            items_changing: Vec::new(),
            items_changed: Vec::new(),
        }
    }
}

impl<M> ListViewEvents<M> {
    pub fn on_items_adding(&mut self, f: impl FnMut(&mut ItemsAddingEventArgs<M>) + 'static) {
        self.items_adding.push(Box::new(f));
    }

    pub fn on_items_removing(&mut self, f: impl FnMut(&mut ItemsRemovingEventArgs<M>) + 'static) {
        self.items_removing.push(Box::new(f));
    }

    pub fn on_items_changing(&mut self, f: impl FnMut(&mut ItemsChangingEventArgs<M>) + 'static) {
        self.items_changing.push(Box::new(f));
    }

    pub fn on_items_changed(&mut self, f: impl FnMut(&ItemsChangedEventArgs) + 'static) {
        self.items_changed.push(Box::new(f));
    }

    pub(crate) fn raise_items_adding(&mut self, args: &mut ItemsAddingEventArgs<M>) {
        for h in &mut self.items_adding {
            h(args);
        }
    }

    pub(crate) fn raise_items_removing(&mut self, args: &mut ItemsRemovingEventArgs<M>) {
        for h in &mut self.items_removing {
            h(args);
        }
    }

    pub(crate) fn raise_items_changing(&mut self, args: &mut ItemsChangingEventArgs<M>) {
        for h in &mut self.items_changing {
            h(args);
        }
    }

    pub(crate) fn raise_items_changed(&mut self, args: &ItemsChangedEventArgs) {
        for h in &mut self.items_changed {
            h(args);
        }
    }
}
