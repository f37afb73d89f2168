/// File classification by extension.
///
/// Maps a file name to the first category in a [`CategoryMap`] whose
/// extension set contains the file's extension, or to [`OTHERS`].
///
/// # Examples
///
/// ```
/// use sortdrop::config::CategoryMap;
/// use sortdrop::file_category::{classify, OTHERS};
///
/// let map = CategoryMap::default();
/// assert_eq!(classify("report.pdf", &map), "Documents");
/// assert_eq!(classify("photo.JPG", &map), "Images");
/// assert_eq!(classify("note", &map), OTHERS);
/// ```
use crate::config::CategoryMap;
use std::ffi::{OsStr, OsString};

/// Fallback category for files matching no rule.
pub const OTHERS: &str = "Others";

/// Returns the byte index of the dot that starts the extension, if any.
fn extension_start(file_name: &str) -> Option<usize> {
    match file_name.rfind('.') {
        Some(idx) if idx + 1 < file_name.len() => Some(idx),
        _ => None,
    }
}

/// Returns the lowercase extension of `file_name`, including the dot.
///
/// A name without a dot, or ending in a dot, has the empty extension.
///
/// ```
/// use sortdrop::file_category::extension_of;
///
/// assert_eq!(extension_of("archive.tar.GZ"), ".gz");
/// assert_eq!(extension_of("Makefile"), "");
/// assert_eq!(extension_of(".bashrc"), ".bashrc");
/// ```
pub fn extension_of(file_name: &str) -> String {
    extension_start(file_name)
        .map(|idx| file_name[idx..].to_lowercase())
        .unwrap_or_default()
}

/// Splits a file name into stem and extension, preserving case.
///
/// `stem + ext` always equals the input.
pub fn split_extension(file_name: &str) -> (&str, &str) {
    match extension_start(file_name) {
        Some(idx) => file_name.split_at(idx),
        None => (file_name, ""),
    }
}

/// Like [`split_extension`], but on a raw file name that may not be UTF-8.
///
/// The bytes of the name are kept as they are; nothing is replaced lossily.
pub fn split_os_extension(file_name: &OsStr) -> (OsString, OsString) {
    if let Some(name) = file_name.to_str() {
        let (stem, ext) = split_extension(name);
        return (stem.into(), ext.into());
    }
    split_raw_extension(file_name)
}

#[cfg(unix)]
fn split_raw_extension(file_name: &OsStr) -> (OsString, OsString) {
    use std::os::unix::ffi::OsStrExt;

    let bytes = file_name.as_bytes();
    match bytes.iter().rposition(|&b| b == b'.') {
        Some(idx) if idx + 1 < bytes.len() => (
            OsStr::from_bytes(&bytes[..idx]).to_os_string(),
            OsStr::from_bytes(&bytes[idx..]).to_os_string(),
        ),
        _ => (file_name.to_os_string(), OsString::new()),
    }
}

// Non-UTF-8 names outside unix are ill-formed UTF-16; treat them as having
// no extension rather than rewriting them.
#[cfg(not(unix))]
fn split_raw_extension(file_name: &OsStr) -> (OsString, OsString) {
    (file_name.to_os_string(), OsString::new())
}

/// Returns the category name for `file_name`.
///
/// Rules are scanned in map order and the first one containing the
/// extension wins. Files with an empty extension always fall to [`OTHERS`].
pub fn classify<'a>(file_name: &str, categories: &'a CategoryMap) -> &'a str {
    let ext = extension_of(file_name);
    if ext.is_empty() {
        return OTHERS;
    }

    categories
        .rules()
        .find(|rule| rule.matches(&ext))
        .map(|rule| rule.name.as_str())
        .unwrap_or(OTHERS)
}
