use thiserror::Error;

/// Failure reported by the native list control.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NativeError {
    /// The control rejected an index or size it considers out of range.
    #[error("index or size out of range for the native control")]
    OutOfRange,
    /// The control has no backing window (destroyed or not yet created).
    #[error("native control has no window")]
    NullReference,
    /// A list-view message returned a failure code.
    #[error("list-view message {message:#06x} failed with {result}")]
    Rejected { message: u32, result: isize },
}

impl NativeError {
    /// Failures the control is known to raise transiently while resizing.
    pub fn is_benign_resize_failure(&self) -> bool {
        matches!(self, NativeError::OutOfRange | NativeError::NullReference)
    }
}

#[derive(Debug, Error)]
pub enum ListViewError {
    #[error(transparent)]
    Native(#[from] NativeError),
    /// The UI thread that owns the control is gone.
    #[error("the list view owning this handle has been dropped")]
    Disconnected,
    /// A remote handle was used on the UI thread, where it would wait on itself.
    #[error("remote handle called from the UI thread; call the list view directly")]
    ReentrantDispatch,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config i/o: {0}")]
    Io(#[from] std::io::Error),
    #[error("bad config magic {0:#010x}")]
    BadMagic(u32),
    #[error("unsupported config version {0}")]
    UnsupportedVersion(u32),
    #[error("config record truncated: {0} bytes")]
    Truncated(usize),
}

pub type Result<T, E = ListViewError> = std::result::Result<T, E>;
