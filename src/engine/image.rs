//! Image selectors and their resolution against an image list.

/// Native "no image" index.
pub const NO_IMAGE: i32 = -1;

/// Chooses an image either by position or by key.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ImageSelector {
    #[default]
    None,
    Index(i32),
    Key(String),
}

impl From<i32> for ImageSelector {
    fn from(i: i32) -> Self { ImageSelector::Index(i) }
}

impl From<&str> for ImageSelector {
    fn from(key: &str) -> Self { ImageSelector::Key(key.to_string()) }
}

impl From<String> for ImageSelector {
    fn from(key: String) -> Self { ImageSelector::Key(key) }
}

/// Keyed view of a native image list. Only the key to index mapping matters here.
#[derive(Clone, Debug, Default)]
pub struct ImageList {
    keys: Vec<String>,
}

impl ImageList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an image under `key` and returns its index.
    pub fn add(&mut self, key: impl Into<String>) -> i32 {
        self.keys.push(key.into());
        (self.keys.len() - 1) as i32
    }

    pub fn index_of_key(&self, key: &str) -> Option<usize> {
        self.keys.iter().position(|k| k == key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ImageList {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self { keys: iter.into_iter().map(Into::into).collect() }
    }
}

/// Resolve `selector` to a native image index.
///
/// Returns [`NO_IMAGE`] when there is no selector, no image list, or the key is unknown.
/// Numeric selectors are passed through untouched.
pub fn compute_image_index(selector: &ImageSelector, images: Option<&ImageList>) -> i32 {
    let Some(images) = images else {
        return NO_IMAGE;
    };
    match selector {
        ImageSelector::None => NO_IMAGE,
        ImageSelector::Index(i) => *i,
        ImageSelector::Key(key) => images
            .index_of_key(key)
            .map(|i| i as i32)
            .unwrap_or(NO_IMAGE),
    }
}
