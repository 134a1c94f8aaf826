//! File-system abstraction and URL fetching for external mappers.

use std::io;

use crate::error::ConfigResult;

/// Opens mapper sources referenced by `resource="…"` or `url="file://…"`.
///
/// The loader never touches the disk directly; tests and embedders swap in
/// their own implementation.
pub trait FileSystem {
    /// Read the whole source at `path` as UTF-8 text.
    fn read_to_string(&self, path: &str) -> io::Result<String>;
}

/// The process-local file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl FileSystem for LocalFs {
    fn read_to_string(&self, path: &str) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// Fetch an `http://` or `https://` mapper source.
pub(crate) fn fetch_url(url: &str) -> ConfigResult<String> {
    let response = reqwest::blocking::get(url)?.error_for_status()?;
    Ok(response.text()?)
}
