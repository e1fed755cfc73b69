//! Column boundary object.
//!
//! Columns are produced elsewhere (attribute reflection, designer code); this
//! crate only needs an aspect accessor, a string formatter and a group key.

use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use super::image::ImageSelector;

/// Value of one aspect of a model object.
///
/// Aspects are totally ordered so they can serve as sort keys and group keys:
/// `Empty < Bool < Int/Float < Text`, numbers compare numerically across
/// `Int` and `Float`, floats use IEEE total ordering.
#[derive(Debug, Clone)]
pub enum Aspect {
    Empty,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Aspect {
    fn rank(&self) -> u8 {
        match self {
            Aspect::Empty => 0,
            Aspect::Bool(_) => 1,
            Aspect::Int(_) | Aspect::Float(_) => 2,
            Aspect::Text(_) => 3,
        }
    }
}

impl Ord for Aspect {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Aspect::Bool(a), Aspect::Bool(b)) => a.cmp(b),
            (Aspect::Int(a), Aspect::Int(b)) => a.cmp(b),
            (Aspect::Float(a), Aspect::Float(b)) => a.total_cmp(b),
            (Aspect::Int(a), Aspect::Float(b)) => cmp_int_float(*a, *b),
            (Aspect::Float(a), Aspect::Int(b)) => cmp_int_float(*b, *a).reverse(),
            (Aspect::Text(a), Aspect::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Exact comparison of an integer with a float, consistent with `f64::total_cmp`.
///
/// An integer equals a float only when the float holds exactly that value;
/// `-0.0` sorts just below `Int(0)` and NaNs sort beyond the infinities.
fn cmp_int_float(i: i64, f: f64) -> Ordering {
    const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;

    if f.is_nan() {
        return if f.is_sign_negative() { Ordering::Greater } else { Ordering::Less };
    }
    if f >= TWO_POW_63 {
        return Ordering::Less;
    }
    if f < -TWO_POW_63 {
        return Ordering::Greater;
    }

    // In range, so the truncated value converts without loss.
    let whole = f.trunc();
    match i.cmp(&(whole as i64)) {
        Ordering::Equal => {
            let frac = f - whole;
            if frac > 0.0 {
                Ordering::Less
            } else if frac < 0.0 || (f == 0.0 && f.is_sign_negative()) {
                Ordering::Greater
            } else {
                Ordering::Equal
            }
        }
        ord => ord,
    }
}

impl PartialOrd for Aspect {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Aspect {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Aspect {}

impl fmt::Display for Aspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Aspect::Empty => Ok(()),
            Aspect::Bool(b) => write!(f, "{b}"),
            Aspect::Int(i) => write!(f, "{i}"),
            Aspect::Float(x) => write!(f, "{x}"),
            Aspect::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Aspect {
    fn from(s: &str) -> Self { Aspect::Text(s.to_string()) }
}

impl From<String> for Aspect {
    fn from(s: String) -> Self { Aspect::Text(s) }
}

impl From<i64> for Aspect {
    fn from(i: i64) -> Self { Aspect::Int(i) }
}

impl From<f64> for Aspect {
    fn from(x: f64) -> Self { Aspect::Float(x) }
}

impl From<bool> for Aspect {
    fn from(b: bool) -> Self { Aspect::Bool(b) }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    None,
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    /// Next order for a repeated click on the same column.
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Descending => SortOrder::Ascending,
            _ => SortOrder::Descending,
        }
    }
}

type AspectGetter<M> = Rc<dyn Fn(&M) -> Aspect>;
type AspectFormatter = Rc<dyn Fn(&Aspect) -> String>;

/// A column of the list: how to pull a displayable value out of a model.
pub struct OlvColumn<M> {
    index: usize,
    text: String,
    aspect_name: String,
    aspect_getter: AspectGetter<M>,
    aspect_to_string: Option<AspectFormatter>,
    group_key_getter: Option<AspectGetter<M>>,
    group_key_to_title: Option<AspectFormatter>,
    image_getter: Option<Rc<dyn Fn(&M) -> ImageSelector>>,
}

impl<M> Clone for OlvColumn<M> {
    fn clone(&self) -> Self {
        Self {
            index: self.index,
            text: self.text.clone(),
            aspect_name: self.aspect_name.clone(),
            aspect_getter: self.aspect_getter.clone(),
            aspect_to_string: self.aspect_to_string.clone(),
            group_key_getter: self.group_key_getter.clone(),
            group_key_to_title: self.group_key_to_title.clone(),
            image_getter: self.image_getter.clone(),
        }
    }
}

impl<M> fmt::Debug for OlvColumn<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OlvColumn")
            .field("index", &self.index)
            .field("text", &self.text)
            .field("aspect_name", &self.aspect_name)
            .finish_non_exhaustive()
    }
}

impl<M> OlvColumn<M> {
    /// Creates a column titled `text` reading the aspect `aspect_name` via `getter`.
    pub fn new(
        text: impl Into<String>,
        aspect_name: impl Into<String>,
        getter: impl Fn(&M) -> Aspect + 'static,
    ) -> Self {
        Self {
            index: 0,
            text: text.into(),
            aspect_name: aspect_name.into(),
            aspect_getter: Rc::new(getter),
            aspect_to_string: None,
            group_key_getter: None,
            group_key_to_title: None,
            image_getter: None,
        }
    }

    pub fn with_formatter(mut self, f: impl Fn(&Aspect) -> String + 'static) -> Self {
        self.aspect_to_string = Some(Rc::new(f));
        self
    }

    /// Group key used when partitioning rows. Defaults to the aspect value.
    pub fn with_group_key(mut self, f: impl Fn(&M) -> Aspect + 'static) -> Self {
        self.group_key_getter = Some(Rc::new(f));
        self
    }

    pub fn with_group_title(mut self, f: impl Fn(&Aspect) -> String + 'static) -> Self {
        self.group_key_to_title = Some(Rc::new(f));
        self
    }

    pub fn with_image_getter(mut self, f: impl Fn(&M) -> ImageSelector + 'static) -> Self {
        self.image_getter = Some(Rc::new(f));
        self
    }

    /// Position of this column within its list view.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn aspect_name(&self) -> &str {
        &self.aspect_name
    }

    pub fn get_value(&self, model: &M) -> Aspect {
        (self.aspect_getter)(model)
    }

    /// Display text for `model`; an absent model renders as empty.
    pub fn get_string_value(&self, model: Option<&M>) -> String {
        let Some(model) = model else {
            return String::new();
        };
        let value = self.get_value(model);
        match &self.aspect_to_string {
            Some(f) => f(&value),
            None => value.to_string(),
        }
    }

    pub fn get_group_key(&self, model: &M) -> Aspect {
        match &self.group_key_getter {
            Some(f) => f(model),
            None => self.get_value(model),
        }
    }

    pub fn group_title(&self, key: &Aspect) -> String {
        match &self.group_key_to_title {
            Some(f) => f(key),
            None => key.to_string(),
        }
    }

    pub fn get_image(&self, model: &M) -> ImageSelector {
        match &self.image_getter {
            Some(f) => f(model),
            None => ImageSelector::None,
        }
    }
}
