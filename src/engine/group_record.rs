//! Table-driven projection of a group descriptor onto `LVGROUP`.
//!
//! The control reads a field only when its `LVGF_*` bit is set, so the mask is
//! never edited by hand: every write goes through [`GroupRecordBuilder::set`],
//! which looks the bit up in [`FIELD_BITS`].

use bitflags::bitflags;

use crate::types::*;
use crate::utils::to_wstring;

bitflags! {
    /// `LVGF_*` presence bits.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct GroupMask: u32 {
        const HEADER = LVGF_HEADER;
        const FOOTER = LVGF_FOOTER;
        const STATE = LVGF_STATE;
        const ALIGN = LVGF_ALIGN;
        const GROUPID = LVGF_GROUPID;
        const SUBTITLE = LVGF_SUBTITLE;
        const TASK = LVGF_TASK;
        const DESCRIPTIONTOP = LVGF_DESCRIPTIONTOP;
        const DESCRIPTIONBOTTOM = LVGF_DESCRIPTIONBOTTOM;
        const TITLEIMAGE = LVGF_TITLEIMAGE;
        const EXTENDEDIMAGE = LVGF_EXTENDEDIMAGE;
        const ITEMS = LVGF_ITEMS;
        const SUBSET = LVGF_SUBSET;
        const SUBSETITEMS = LVGF_SUBSETITEMS;
    }
}

bitflags! {
    /// `LVGMF_*` presence bits.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct GroupMetricsMask: u32 {
        const BORDERSIZE = LVGMF_BORDERSIZE;
        const BORDERCOLOR = LVGMF_BORDERCOLOR;
        const TEXTCOLOR = LVGMF_TEXTCOLOR;
    }
}

/// Fields of the native group record that can be written.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GroupField {
    Header,
    Footer,
    State,
    Align,
    GroupId,
    Subtitle,
    Task,
    DescriptionTop,
    DescriptionBottom,
    TitleImage,
    ExtendedImage,
    Items,
    SubsetTitle,
}

/// Which presence bit each field owns.
pub const FIELD_BITS: [(GroupField, GroupMask); 13] = [
    (GroupField::Header, GroupMask::HEADER),
    (GroupField::Footer, GroupMask::FOOTER),
    (GroupField::State, GroupMask::STATE),
    (GroupField::Align, GroupMask::ALIGN),
    (GroupField::GroupId, GroupMask::GROUPID),
    (GroupField::Subtitle, GroupMask::SUBTITLE),
    (GroupField::Task, GroupMask::TASK),
    (GroupField::DescriptionTop, GroupMask::DESCRIPTIONTOP),
    (GroupField::DescriptionBottom, GroupMask::DESCRIPTIONBOTTOM),
    (GroupField::TitleImage, GroupMask::TITLEIMAGE),
    (GroupField::ExtendedImage, GroupMask::EXTENDEDIMAGE),
    (GroupField::Items, GroupMask::ITEMS),
    (GroupField::SubsetTitle, GroupMask::SUBSET),
];

impl GroupField {
    pub fn bit(self) -> GroupMask {
        FIELD_BITS
            .iter()
            .find(|(field, _)| *field == self)
            .map(|(_, bit)| *bit)
            .unwrap_or(GroupMask::empty())
    }
}

/// Value written into one field.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Text(String),
    Int(i32),
    UInt(u32),
    Flags { state: u32, mask: u32 },
}

/// Owned, platform-neutral image of an `LVGROUP`.
///
/// Strings are kept as Rust strings and only turned into UTF-16 for the
/// duration of a native call, see [`NativeGroupRecord::with_native`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NativeGroupRecord {
    mask: GroupMask,
    header: String,
    footer: String,
    subtitle: String,
    task: String,
    description_top: String,
    description_bottom: String,
    subset_title: String,
    group_id: i32,
    state: u32,
    state_mask: u32,
    align: u32,
    title_image: i32,
    extended_image: i32,
    items: u32,
}

impl NativeGroupRecord {
    pub fn mask(&self) -> GroupMask {
        self.mask
    }

    pub fn has(&self, field: GroupField) -> bool {
        self.mask.contains(field.bit())
    }

    /// Text of a string field, or `None` when the field is not marked present.
    pub fn text(&self, field: GroupField) -> Option<&str> {
        if !self.has(field) {
            return None;
        }
        match field {
            GroupField::Header => Some(&self.header),
            GroupField::Footer => Some(&self.footer),
            GroupField::Subtitle => Some(&self.subtitle),
            GroupField::Task => Some(&self.task),
            GroupField::DescriptionTop => Some(&self.description_top),
            GroupField::DescriptionBottom => Some(&self.description_bottom),
            GroupField::SubsetTitle => Some(&self.subset_title),
            _ => None,
        }
    }

    pub fn group_id(&self) -> Option<i32> {
        self.has(GroupField::GroupId).then_some(self.group_id)
    }

    pub fn state(&self) -> (u32, u32) {
        (self.state, self.state_mask)
    }

    pub fn align(&self) -> u32 {
        self.align
    }

    pub fn title_image(&self) -> Option<i32> {
        self.has(GroupField::TitleImage).then_some(self.title_image)
    }

    pub fn extended_image(&self) -> Option<i32> {
        self.has(GroupField::ExtendedImage).then_some(self.extended_image)
    }

    pub fn item_count(&self) -> Option<u32> {
        self.has(GroupField::Items).then_some(self.items)
    }

    /// Builds the `LVGROUP` and hands it to `f`.
    ///
    /// The string pointers inside the record borrow buffers local to this call,
    /// so the record must not escape `f`.
    pub fn with_native<R>(&self, f: impl FnOnce(&mut LVGROUP) -> R) -> R {
        let header = to_wstring(&self.header);
        let footer = to_wstring(&self.footer);
        let subtitle = to_wstring(&self.subtitle);
        let task = to_wstring(&self.task);
        let top = to_wstring(&self.description_top);
        let bottom = to_wstring(&self.description_bottom);
        let subset = to_wstring(&self.subset_title);

        let mut group = LVGROUP {
            cbSize: std::mem::size_of::<LVGROUP>() as u32,
            mask: self.mask.bits(),
            iGroupId: self.group_id,
            stateMask: self.state_mask,
            state: self.state,
            uAlign: self.align,
            iTitleImage: self.title_image,
            iExtendedImage: self.extended_image,
            cItems: self.items,
            ..Default::default()
        };

        // The control never writes through these for insert/set calls.
        if self.has(GroupField::Header) {
            group.pszHeader = header.as_ptr() as *mut _;
            group.cchHeader = (header.len() - 1) as i32;
        }
        if self.has(GroupField::Footer) {
            group.pszFooter = footer.as_ptr() as *mut _;
            group.cchFooter = (footer.len() - 1) as i32;
        }
        if self.has(GroupField::Subtitle) {
            group.pszSubtitle = subtitle.as_ptr() as *mut _;
            group.cchSubtitle = (subtitle.len() - 1) as u32;
        }
        if self.has(GroupField::Task) {
            group.pszTask = task.as_ptr() as *mut _;
            group.cchTask = (task.len() - 1) as u32;
        }
        if self.has(GroupField::DescriptionTop) {
            group.pszDescriptionTop = top.as_ptr() as *mut _;
            group.cchDescriptionTop = (top.len() - 1) as u32;
        }
        if self.has(GroupField::DescriptionBottom) {
            group.pszDescriptionBottom = bottom.as_ptr() as *mut _;
            group.cchDescriptionBottom = (bottom.len() - 1) as u32;
        }
        if self.has(GroupField::SubsetTitle) {
            group.pszSubsetTitle = subset.as_ptr() as *mut _;
            group.cchSubsetTitle = (subset.len() - 1) as u32;
        }

        f(&mut group)
    }
}

/// Accumulates `(field, value)` writes and the matching presence bits.
#[derive(Debug, Default)]
pub struct GroupRecordBuilder {
    record: NativeGroupRecord,
}

impl GroupRecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes `value` into `field` and marks the field present.
    ///
    /// A value whose shape does not fit the field is ignored and leaves the bit clear.
    pub fn set(&mut self, field: GroupField, value: FieldValue) -> &mut Self {
        let r = &mut self.record;
        let accepted = match (field, value) {
            (GroupField::Header, FieldValue::Text(s)) => { r.header = s; true }
            (GroupField::Footer, FieldValue::Text(s)) => { r.footer = s; true }
            (GroupField::Subtitle, FieldValue::Text(s)) => { r.subtitle = s; true }
            (GroupField::Task, FieldValue::Text(s)) => { r.task = s; true }
            (GroupField::DescriptionTop, FieldValue::Text(s)) => { r.description_top = s; true }
            (GroupField::DescriptionBottom, FieldValue::Text(s)) => { r.description_bottom = s; true }
            (GroupField::SubsetTitle, FieldValue::Text(s)) => { r.subset_title = s; true }
            (GroupField::GroupId, FieldValue::Int(i)) => { r.group_id = i; true }
            (GroupField::Align, FieldValue::Int(i)) => { r.align = i as u32; true }
            (GroupField::TitleImage, FieldValue::Int(i)) => { r.title_image = i; true }
            (GroupField::ExtendedImage, FieldValue::Int(i)) => { r.extended_image = i; true }
            (GroupField::Items, FieldValue::UInt(n)) => { r.items = n; true }
            (GroupField::State, FieldValue::Flags { state, mask }) => {
                r.state = state;
                r.state_mask = mask;
                true
            }
            _ => false,
        };
        if accepted {
            r.mask |= field.bit();
        }
        self
    }

    /// Writes a text field only when `text` is non-empty.
    pub fn set_text_if_present(&mut self, field: GroupField, text: &str) -> &mut Self {
        if !text.is_empty() {
            self.set(field, FieldValue::Text(text.to_string()));
        }
        self
    }

    /// Writes an integer field only when `keep(value)` holds.
    pub fn set_int_if(&mut self, field: GroupField, value: i32, keep: impl FnOnce(i32) -> bool) -> &mut Self {
        if keep(value) {
            self.set(field, FieldValue::Int(value));
        }
        self
    }

    pub fn build(self) -> NativeGroupRecord {
        self.record
    }
}

/// Owned image of an `LVGROUPMETRICS`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GroupMetricsRecord {
    pub mask: GroupMetricsMask,
    pub bottom: u32,
}

impl GroupMetricsRecord {
    /// Metrics carrying only the bottom border inset.
    pub fn bottom_border(size: u32) -> Self {
        Self { mask: GroupMetricsMask::BORDERSIZE, bottom: size }
    }

    pub fn to_native(&self) -> LVGROUPMETRICS {
        LVGROUPMETRICS {
            cbSize: std::mem::size_of::<LVGROUPMETRICS>() as u32,
            mask: self.mask.bits(),
            Bottom: self.bottom,
            ..Default::default()
        }
    }
}
