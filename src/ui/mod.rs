pub mod dispatch;
pub mod native;
pub mod notify;

#[cfg(windows)]
pub mod list_view;
