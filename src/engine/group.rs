//! Group descriptors.
//!
//! An [`OlvGroup`] is passive: changing a field after the group has been
//! inserted does not touch the control until one of the insert methods is
//! called again.

use std::any::Any;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicI32, Ordering};

use bitflags::bitflags;

use super::column::Aspect;
use super::group_record::{FieldValue, GroupField, GroupMetricsRecord, GroupRecordBuilder, NativeGroupRecord};
use super::image::{ImageList, ImageSelector, compute_image_index};
use crate::error::NativeError;
use crate::types::*;
use crate::ui::native::{GroupPlaceholder, HorizontalAlignment, NativeListView};

bitflags! {
    /// `LVGS_*` group state. The empty set is `LVGS_NORMAL`.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct GroupState: u32 {
        const COLLAPSED = LVGS_COLLAPSED;
        const HIDDEN = LVGS_HIDDEN;
        const NOHEADER = LVGS_NOHEADER;
        const COLLAPSIBLE = LVGS_COLLAPSIBLE;
        const FOCUSED = LVGS_FOCUSED;
        const SELECTED = LVGS_SELECTED;
        const SUBSETED = LVGS_SUBSETED;
        const SUBSETLINKFOCUSED = LVGS_SUBSETLINKFOCUSED;
    }
}

static NEXT_GROUP_ID: AtomicI32 = AtomicI32::new(0);

/// Control-level settings a group needs while inserting itself.
#[derive(Clone, Copy, Debug, Default)]
pub struct GroupEnv<'a> {
    pub image_list: Option<&'a ImageList>,
    pub space_between_groups: i32,
}

/// A titled partition of rows, or a count-only placeholder on virtual lists.
pub struct OlvGroup {
    id: i32,
    native_id: Option<i32>,
    pub header: String,
    pub header_alignment: HorizontalAlignment,
    pub name: String,
    pub footer: String,
    pub subtitle: String,
    pub task: String,
    pub top_description: String,
    pub bottom_description: String,
    pub subset_title: String,
    /// Key the rows were partitioned by.
    pub key: Aspect,
    pub sort_value: Aspect,
    pub tag: Option<Rc<dyn Any>>,
    pub contents: Option<Rc<dyn Any>>,
    pub title_image: ImageSelector,
    pub extended_image: ImageSelector,
    pub state: GroupState,
    /// Which bits of `state` are meaningful.
    pub state_mask: GroupState,
    /// Member count for virtual lists, where members are never enumerated.
    pub virtual_item_count: u32,
    /// Member rows for non-virtual lists.
    pub items: Vec<usize>,
}

impl Default for OlvGroup {
    fn default() -> Self {
        Self::new("Default group header")
    }
}

impl fmt::Debug for OlvGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OlvGroup")
            .field("id", &self.id)
            .field("native_id", &self.native_id)
            .field("header", &self.header)
            .field("key", &self.key)
            .field("state", &self.state)
            .field("state_mask", &self.state_mask)
            .field("virtual_item_count", &self.virtual_item_count)
            .field("items", &self.items.len())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for OlvGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.header)
    }
}

impl OlvGroup {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            id: NEXT_GROUP_ID.fetch_add(1, Ordering::Relaxed),
            native_id: None,
            header: header.into(),
            header_alignment: HorizontalAlignment::Left,
            name: String::new(),
            footer: String::new(),
            subtitle: String::new(),
            task: String::new(),
            top_description: String::new(),
            bottom_description: String::new(),
            subset_title: String::new(),
            key: Aspect::Empty,
            sort_value: Aspect::Empty,
            tag: None,
            contents: None,
            title_image: ImageSelector::None,
            extended_image: ImageSelector::None,
            state: GroupState::empty(),
            state_mask: GroupState::empty(),
            virtual_item_count: 0,
            items: Vec::new(),
        }
    }

    /// Internally generated id, unique for the life of the process.
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Id the control knows this group by: the native id once bound, else [`Self::id`].
    pub fn group_id(&self) -> i32 {
        self.native_id.unwrap_or(self.id)
    }

    pub fn is_bound(&self) -> bool {
        self.native_id.is_some()
    }

    pub fn compute_image_index(&self, selector: &ImageSelector, images: Option<&ImageList>) -> i32 {
        compute_image_index(selector, images)
    }

    /// Sets or clears one state bit and marks it valid in `state_mask`.
    pub fn set_state_flag(&mut self, flag: GroupState, on: bool) {
        self.state_mask |= flag;
        self.state.set(flag, on);
    }

    pub fn is_collapsible(&self) -> bool {
        self.state.contains(GroupState::COLLAPSIBLE)
    }

    pub fn set_collapsible(&mut self, on: bool) {
        self.set_state_flag(GroupState::COLLAPSIBLE, on);
    }

    pub fn is_collapsed(&self) -> bool {
        self.state.contains(GroupState::COLLAPSED)
    }

    pub fn set_collapsed(&mut self, on: bool) {
        self.set_state_flag(GroupState::COLLAPSED, on);
    }

    pub fn is_subsetted(&self) -> bool {
        self.state.contains(GroupState::SUBSETED)
    }

    pub fn set_subsetted(&mut self, on: bool) {
        self.set_state_flag(GroupState::SUBSETED, on);
    }

    /// Projects this descriptor onto a native group record.
    ///
    /// Header, alignment and state are always present. Every other field is
    /// present only when it carries a value: non-empty text, a resolved image
    /// (`>= 0`), a positive virtual item count. The id is written only when
    /// `with_id` is set.
    pub fn to_native_record(&self, images: Option<&ImageList>, with_id: bool) -> NativeGroupRecord {
        let mut b = GroupRecordBuilder::new();
        b.set(GroupField::Header, FieldValue::Text(self.header.clone()))
            .set(GroupField::Align, FieldValue::Int(self.header_alignment as i32))
            .set(
                GroupField::State,
                FieldValue::Flags { state: self.state.bits(), mask: self.state_mask.bits() },
            );

        if with_id {
            b.set(GroupField::GroupId, FieldValue::Int(self.group_id()));
        }

        let title_image = self.compute_image_index(&self.title_image, images);
        let extended_image = self.compute_image_index(&self.extended_image, images);

        b.set_text_if_present(GroupField::Footer, &self.footer)
            .set_text_if_present(GroupField::Subtitle, &self.subtitle)
            .set_text_if_present(GroupField::Task, &self.task)
            .set_text_if_present(GroupField::DescriptionTop, &self.top_description)
            .set_text_if_present(GroupField::DescriptionBottom, &self.bottom_description)
            .set_int_if(GroupField::TitleImage, title_image, |i| i >= 0)
            .set_int_if(GroupField::ExtendedImage, extended_image, |i| i >= 0)
            .set_text_if_present(GroupField::SubsetTitle, &self.subset_title);

        if self.virtual_item_count > 0 {
            b.set(GroupField::Items, FieldValue::UInt(self.virtual_item_count));
        }

        b.build()
    }

    /// Applies the inter-group spacing as this group's bottom border.
    ///
    /// Returns 0 without calling the control when `spacing <= 0`, otherwise the
    /// control's status.
    pub fn apply_spacing(&self, native: &mut impl NativeListView, spacing: i32) -> i32 {
        if spacing <= 0 {
            return 0;
        }
        let metrics = GroupMetricsRecord::bottom_border(spacing as u32);
        native.set_group_metrics(self.group_id(), &metrics)
    }

    /// Inserts the full record directly, id included. Used for virtual groups.
    pub fn insert_new_style(&self, native: &mut impl NativeListView, env: &GroupEnv) -> Result<i32, NativeError> {
        let record = self.to_native_record(env.image_list, true);
        let index = native.insert_group(&record)?;
        let status = self.apply_spacing(native, env.space_between_groups);
        log::trace!("inserted group {} ({:?}) at {index}, spacing status {status}", self.group_id(), self.header);
        Ok(index)
    }

    /// Registers a placeholder, adopts the id the control assigned to it, then
    /// augments it with the full record.
    pub fn insert_old_style(&mut self, native: &mut impl NativeListView, env: &GroupEnv) -> Result<(), NativeError> {
        let placeholder = GroupPlaceholder {
            header: self.header.clone(),
            alignment: self.header_alignment,
            name: self.name.clone(),
            tag: self.tag.clone(),
        };
        let native_id = native.add_group_placeholder(&placeholder)?;
        self.native_id = Some(native_id);

        let record = self.to_native_record(env.image_list, false);
        native.set_group_info(native_id, &record)?;
        let status = self.apply_spacing(native, env.space_between_groups);
        log::trace!("bound group {:?} to native id {native_id}, spacing status {status}", self.header);
        Ok(())
    }

    /// Pushes the enumerated member rows onto the bound native group.
    pub fn set_items_old_style(&self, native: &mut impl NativeListView) {
        match self.native_id {
            Some(id) => native.add_items_to_group(id, &self.items),
            None => log::debug!("group {:?} is not bound; {} rows not assigned", self.header, self.items.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::group_record::GroupMask;
    use crate::ui::native::mock::MockListView;

    fn images() -> ImageList {
        ["pending", "done"].into_iter().collect()
    }

    #[test]
    fn test_ids_are_unique() {
        let a = OlvGroup::new("a");
        let b = OlvGroup::new("b");
        assert_ne!(a.id(), b.id());
        assert_eq!(a.group_id(), a.id());
        assert!(!a.is_bound());
    }

    #[test]
    fn test_minimal_record() {
        let g = OlvGroup::new("Fruit");
        let rec = g.to_native_record(None, false);
        assert_eq!(rec.mask(), GroupMask::HEADER | GroupMask::ALIGN | GroupMask::STATE);
        assert_eq!(rec.text(GroupField::Header), Some("Fruit"));
        assert_eq!(rec.align(), LVGA_HEADER_LEFT);
        assert_eq!(rec.group_id(), None);
    }

    #[test]
    fn test_full_record_mask_matches_fields() {
        let mut g = OlvGroup::new("Fruit");
        g.footer = "F".into();
        g.subtitle = "sub".into();
        g.task = "more".into();
        g.top_description = "top".into();
        g.bottom_description = "bottom".into();
        g.subset_title = "show all".into();
        g.title_image = "done".into();
        g.extended_image = 0.into();
        g.virtual_item_count = 42;

        let imgs = images();
        let rec = g.to_native_record(Some(&imgs), true);
        let expected = GroupMask::HEADER
            | GroupMask::ALIGN
            | GroupMask::STATE
            | GroupMask::GROUPID
            | GroupMask::FOOTER
            | GroupMask::SUBTITLE
            | GroupMask::TASK
            | GroupMask::DESCRIPTIONTOP
            | GroupMask::DESCRIPTIONBOTTOM
            | GroupMask::TITLEIMAGE
            | GroupMask::EXTENDEDIMAGE
            | GroupMask::SUBSET
            | GroupMask::ITEMS;
        assert_eq!(rec.mask(), expected);
        assert_eq!(rec.text(GroupField::Footer), Some("F"));
        assert_eq!(rec.title_image(), Some(1));
        assert_eq!(rec.extended_image(), Some(0));
        assert_eq!(rec.item_count(), Some(42));
        assert_eq!(rec.group_id(), Some(g.id()));
    }

    #[test]
    fn test_item_count_beyond_i32_keeps_items_bit() {
        let mut g = OlvGroup::new("huge");
        g.virtual_item_count = 3_000_000_000;
        let rec = g.to_native_record(None, false);
        assert_eq!(rec.item_count(), Some(3_000_000_000));
        rec.with_native(|native| assert_eq!(native.cItems, 3_000_000_000));

        g.virtual_item_count = 0;
        assert_eq!(g.to_native_record(None, false).item_count(), None);
    }

    #[test]
    fn test_unresolved_image_leaves_bit_clear() {
        let mut g = OlvGroup::new("x");
        g.title_image = "missing".into();
        g.extended_image = 3.into();
        let rec = g.to_native_record(None, false);
        assert!(!rec.mask().intersects(GroupMask::TITLEIMAGE | GroupMask::EXTENDEDIMAGE));

        let imgs = images();
        let rec = g.to_native_record(Some(&imgs), false);
        assert_eq!(rec.title_image(), None);
        assert_eq!(rec.extended_image(), Some(3));
    }

    #[test]
    fn test_state_flags_set_and_clear_one_bit() {
        let mut g = OlvGroup::new("x");
        g.set_collapsed(true);
        g.set_collapsible(true);
        assert!(g.is_collapsible());
        assert_eq!(g.state, GroupState::COLLAPSED | GroupState::COLLAPSIBLE);

        g.set_collapsible(false);
        assert!(!g.is_collapsible());
        assert!(g.is_collapsed());
        assert_eq!(g.state, GroupState::COLLAPSED);
        assert_eq!(g.state_mask, GroupState::COLLAPSED | GroupState::COLLAPSIBLE);

        g.set_subsetted(true);
        assert!(g.is_subsetted());
        g.set_subsetted(false);
        assert!(!g.is_subsetted());
        assert!(g.state_mask.contains(GroupState::SUBSETED));
    }

    #[test]
    fn test_spacing() {
        let mut native = MockListView::default();
        let g = OlvGroup::new("x");
        assert_eq!(g.apply_spacing(&mut native, 0), 0);
        assert_eq!(g.apply_spacing(&mut native, -4), 0);
        assert!(native.metrics.is_empty());

        assert_eq!(g.apply_spacing(&mut native, 12), 1);
        let (id, m) = native.metrics[0];
        assert_eq!(id, g.group_id());
        assert_eq!(m, GroupMetricsRecord::bottom_border(12));
    }

    #[test]
    fn test_insert_new_style() {
        let mut native = MockListView::default();
        let mut g = OlvGroup::new("Virtual");
        g.virtual_item_count = 10;
        let env = GroupEnv { image_list: None, space_between_groups: 8 };

        g.insert_new_style(&mut native, &env).unwrap();
        assert_eq!(native.inserted_groups.len(), 1);
        assert_eq!(native.inserted_groups[0].group_id(), Some(g.id()));
        assert_eq!(native.inserted_groups[0].item_count(), Some(10));
        assert_eq!(native.metrics.len(), 1);
        assert!(native.placeholders.is_empty());
        assert!(!g.is_bound());
    }

    #[test]
    fn test_insert_old_style_binds_native_id() {
        let mut native = MockListView::default();
        let mut g = OlvGroup::new("Enumerated");
        g.name = "enum".into();
        g.footer = "2 items".into();
        g.items = vec![0, 3];
        let env = GroupEnv::default();

        g.insert_old_style(&mut native, &env).unwrap();
        assert!(g.is_bound());
        assert_eq!(g.group_id(), 1001);
        assert_eq!(native.placeholders[0].header, "Enumerated");
        assert_eq!(native.placeholders[0].name, "enum");
        assert!(native.placeholders[0].tag.is_none());

        let (id, rec) = &native.group_infos[0];
        assert_eq!(*id, 1001);
        assert_eq!(rec.group_id(), None);
        assert_eq!(rec.text(GroupField::Footer), Some("2 items"));
        assert!(native.metrics.is_empty());

        g.set_items_old_style(&mut native);
        assert_eq!(native.group_members, vec![(1001, vec![0, 3])]);
    }

    #[test]
    fn test_insert_old_style_carries_tag_and_spacing() {
        let mut native = MockListView::default();
        let tag: Rc<dyn Any> = Rc::new(7u32);
        let mut g = OlvGroup::new("Tagged");
        g.tag = Some(Rc::clone(&tag));
        let env = GroupEnv { image_list: None, space_between_groups: 6 };

        g.insert_old_style(&mut native, &env).unwrap();
        let carried = native.placeholders[0].tag.as_ref().unwrap();
        assert!(Rc::ptr_eq(carried, &tag));
        assert_eq!(carried.downcast_ref::<u32>(), Some(&7));
        assert_eq!(native.metrics, vec![(g.group_id(), GroupMetricsRecord::bottom_border(6))]);
    }

    #[test]
    fn test_unbound_group_pushes_no_items() {
        let mut native = MockListView::default();
        let mut g = OlvGroup::new("x");
        g.items = vec![1];
        g.set_items_old_style(&mut native);
        assert!(native.group_members.is_empty());
    }
}
