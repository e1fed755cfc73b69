/* --- src/utils.rs --- */

/// Null-terminated UTF-16 for an ASCII string literal, built at compile time.
///
/// ```
/// let class = objectlistview::w!("SysListView32");
/// assert_eq!(class.len(), 14);
/// ```
#[macro_export]
macro_rules! w {
    ($s:literal) => {{
        const S: &[u8] = $s.as_bytes();
        const LEN: usize = S.len() + 1;
        const UTF16: [u16; LEN] = {
            let mut out = [0u16; LEN];
            let mut i = 0;
            while i < S.len() {
                assert!(S[i] < 0x80, "w! only accepts ASCII");
                out[i] = S[i] as u16;
                i += 1;
            }
            out
        };
        &UTF16[..]
    }};
}

/// Convert a Rust string to a null-terminated UTF-16 vector.
pub fn to_wstring(value: &str) -> Vec<u16> {
    value.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Read a null-terminated UTF-16 string.
///
/// # Safety
/// `ptr` must be null or point to a valid null-terminated UTF-16 buffer.
pub unsafe fn from_wide_ptr(ptr: *const u16) -> String {
    if ptr.is_null() {
        return String::new();
    }
    let mut len = 0usize;
    // SAFETY: caller guarantees a terminator exists.
    unsafe {
        while *ptr.add(len) != 0 {
            len += 1;
        }
        String::from_utf16_lossy(std::slice::from_raw_parts(ptr, len))
    }
}

/// Copies `value` into a caller-owned UTF-16 buffer, truncating so that the
/// terminator always fits. Returns the number of code units written (excluding null).
pub fn copy_to_wide_buffer(value: &str, buffer: &mut [u16]) -> usize {
    if buffer.is_empty() {
        return 0;
    }
    let max = buffer.len() - 1;
    let mut written = 0;
    for unit in value.encode_utf16().take(max) {
        buffer[written] = unit;
        written += 1;
    }
    buffer[written] = 0;
    written
}

/// Case-insensitive prefix test, independent of the current locale.
///
/// Both sides are folded char by char with Unicode simple lowercasing,
/// so "Straße" matches "STRA" but no culture-specific rules apply.
pub fn starts_with_ignore_case(haystack: &str, prefix: &str) -> bool {
    let mut hay = haystack.chars().flat_map(char::to_lowercase);
    for p in prefix.chars().flat_map(char::to_lowercase) {
        match hay.next() {
            Some(h) if h == p => {}
            _ => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_wstring() {
        assert_eq!(to_wstring("Hi"), vec![72, 105, 0]);
    }

    #[test]
    fn test_w_macro_matches_runtime_conversion() {
        assert_eq!(crate::w!("SysListView32"), to_wstring("SysListView32").as_slice());
    }

    #[test]
    fn test_copy_truncates() {
        let mut buf = [0xFFFFu16; 4];
        assert_eq!(copy_to_wide_buffer("banana", &mut buf), 3);
        assert_eq!(buf, [98, 97, 110, 0]);

        let mut empty: [u16; 0] = [];
        assert_eq!(copy_to_wide_buffer("x", &mut empty), 0);
    }

    #[test]
    fn test_from_wide_ptr() {
        let w = to_wstring("cherry");
        assert_eq!(unsafe { from_wide_ptr(w.as_ptr()) }, "cherry");
        assert_eq!(unsafe { from_wide_ptr(std::ptr::null()) }, "");
    }

    #[test]
    fn test_starts_with_ignore_case() {
        assert!(starts_with_ignore_case("Apple", "a"));
        assert!(starts_with_ignore_case("apple", "APP"));
        assert!(starts_with_ignore_case("anything", ""));
        assert!(!starts_with_ignore_case("ap", "apple"));
        assert!(!starts_with_ignore_case("cherry", "a"));
    }
}
