use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::types::COLORREF;
use crate::ui::native::View;

const CONFIG_MAGIC: u32 = 0x4356_4C4F; // "OLVC"
const CONFIG_VERSION: u32 = 1;
const RECORD_LEN: usize = 29;

/// LemonChiffon, as a COLORREF (0x00BBGGRR).
pub const DEFAULT_ALTERNATE_ROW_COLOR: COLORREF = 0x00CD_FAFF;
pub const DEFAULT_BACK_COLOR: COLORREF = 0x00FF_FFFF;

/// Behaviour switches of a virtual object list view.
///
/// Persisted as a fixed little-endian record. Changing the field order
/// requires a version bump and a migration arm in [`ListViewConfig::from_bytes`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListViewConfig {
    pub use_alternating_back_colors: bool,
    /// `None` means [`DEFAULT_ALTERNATE_ROW_COLOR`].
    pub alternate_row_back_color: Option<COLORREF>,
    pub back_color: COLORREF,
    /// Type-ahead searches the sort column instead of the first column.
    pub is_search_on_sort_column: bool,
    /// Bottom border given to every group; `<= 0` leaves the control's default.
    pub space_between_groups: i32,
    pub check_boxes: bool,
    pub view: View,
    pub log_level_mask: u8,
}

impl Default for ListViewConfig {
    fn default() -> Self {
        Self {
            use_alternating_back_colors: false,
            alternate_row_back_color: None,
            back_color: DEFAULT_BACK_COLOR,
            is_search_on_sort_column: false,
            space_between_groups: 0,
            check_boxes: false,
            view: View::Details,
            log_level_mask: 7, // Error | Warn | Info (1 | 2 | 4)
        }
    }
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn u8(&mut self) -> u8 {
        let v = self.bytes[self.pos];
        self.pos += 1;
        v
    }

    fn u32(&mut self) -> u32 {
        let mut b = [0u8; 4];
        b.copy_from_slice(&self.bytes[self.pos..self.pos + 4]);
        self.pos += 4;
        u32::from_le_bytes(b)
    }

    fn bool(&mut self) -> bool {
        self.u8() != 0
    }
}

impl ListViewConfig {
    pub fn alternate_row_back_color_or_default(&self) -> COLORREF {
        self.alternate_row_back_color.unwrap_or(DEFAULT_ALTERNATE_ROW_COLOR)
    }

    /// Pushes `log_level_mask` to the channel logger.
    pub fn apply_log_level(&self) {
        crate::logger::set_log_level(self.log_level_mask);
    }

    /// `objectlistview.dat` next to the running executable.
    pub fn default_path() -> PathBuf {
        let mut path = std::env::current_exe().unwrap_or_default();
        path.set_file_name("objectlistview.dat");
        path
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(RECORD_LEN);
        out.extend_from_slice(&CONFIG_MAGIC.to_le_bytes());
        out.extend_from_slice(&CONFIG_VERSION.to_le_bytes());
        out.push(self.use_alternating_back_colors as u8);
        out.push(self.alternate_row_back_color.is_some() as u8);
        out.extend_from_slice(&self.alternate_row_back_color.unwrap_or(0).to_le_bytes());
        out.extend_from_slice(&self.back_color.to_le_bytes());
        out.push(self.is_search_on_sort_column as u8);
        out.extend_from_slice(&self.space_between_groups.to_le_bytes());
        out.push(self.check_boxes as u8);
        out.extend_from_slice(&(self.view as u32).to_le_bytes());
        out.push(self.log_level_mask);
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        if bytes.len() < 8 {
            return Err(ConfigError::Truncated(bytes.len()));
        }
        let mut c = Cursor { bytes, pos: 0 };
        let magic = c.u32();
        if magic != CONFIG_MAGIC {
            return Err(ConfigError::BadMagic(magic));
        }
        let version = c.u32();
        if version != CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion(version));
        }
        if bytes.len() < RECORD_LEN {
            return Err(ConfigError::Truncated(bytes.len()));
        }

        let mut config = Self {
            use_alternating_back_colors: c.bool(),
            ..Self::default()
        };
        let has_alt = c.bool();
        let alt = c.u32();
        config.alternate_row_back_color = has_alt.then_some(alt);
        config.back_color = c.u32();
        config.is_search_on_sort_column = c.bool();
        config.space_between_groups = c.u32() as i32;
        config.check_boxes = c.bool();
        config.view = View::from_u32(c.u32());
        config.log_level_mask = c.u8();
        Ok(config)
    }

    pub fn try_load(path: &Path) -> Result<Self, ConfigError> {
        let mut file = File::open(path)?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        Self::from_bytes(&bytes)
    }

    /// Loads `path`, falling back to defaults when the file is missing or unreadable.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(config) => config,
            Err(e) => {
                log::debug!("using default list view config ({e})");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let mut file = File::create(path)?;
        file.write_all(&self.to_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ListViewConfig {
        ListViewConfig {
            use_alternating_back_colors: true,
            alternate_row_back_color: Some(0x00112233),
            back_color: 0x00000000,
            is_search_on_sort_column: true,
            space_between_groups: 12,
            check_boxes: true,
            view: View::List,
            log_level_mask: 15,
        }
    }

    #[test]
    fn test_record_size() {
        assert_eq!(ListViewConfig::default().to_bytes().len(), RECORD_LEN);
    }

    #[test]
    fn test_bytes_round_trip() {
        let c = sample();
        assert_eq!(ListViewConfig::from_bytes(&c.to_bytes()).unwrap(), c);
    }

    #[test]
    fn test_rejects_bad_records() {
        assert!(matches!(ListViewConfig::from_bytes(&[1, 2]), Err(ConfigError::Truncated(2))));

        let mut bytes = sample().to_bytes();
        bytes[0] = 0;
        assert!(matches!(ListViewConfig::from_bytes(&bytes), Err(ConfigError::BadMagic(_))));

        let mut bytes = sample().to_bytes();
        bytes[4..8].copy_from_slice(&9u32.to_le_bytes());
        assert!(matches!(ListViewConfig::from_bytes(&bytes), Err(ConfigError::UnsupportedVersion(9))));

        let bytes = sample().to_bytes();
        assert!(matches!(ListViewConfig::from_bytes(&bytes[..20]), Err(ConfigError::Truncated(20))));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("olv-config-{}.dat", std::process::id()));
        let c = sample();
        c.save(&path).unwrap();
        assert_eq!(ListViewConfig::load(&path), c);
        let _ = std::fs::remove_file(&path);

        assert_eq!(ListViewConfig::load(&path), ListViewConfig::default());
    }

    #[test]
    fn test_alternate_color_default() {
        assert_eq!(
            ListViewConfig::default().alternate_row_back_color_or_default(),
            DEFAULT_ALTERNATE_ROW_COLOR
        );
    }
}
