//! Asset loading: the local assets directory first, a remote mirror with
//! retry/backoff second.

use crate::net::http::fetch_with_retry;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Load `name` from `local_dir`, falling back to `remote_base` when the
/// file is absent locally.
pub fn load_asset(name: &str, local_dir: &Path, remote_base: Option<&str>) -> io::Result<Vec<u8>> {
    if let Ok(bytes) = fs::read(local_dir.join(name)) {
        return Ok(bytes);
    }

    let Some(base) = remote_base.filter(|b| !b.is_empty()) else {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("asset {name} not found locally and no remote base configured"),
        ));
    };

    let url = format!("{}/{}", base.trim_end_matches('/'), name);
    let res = fetch_with_retry(&url)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
    let mut bytes = Vec::new();
    res.into_reader().read_to_end(&mut bytes)?;
    Ok(bytes)
}

/// Load a UTF-8 text asset.
pub fn load_text_asset(
    name: &str,
    local_dir: &Path,
    remote_base: Option<&str>,
) -> io::Result<String> {
    let bytes = load_asset(name, local_dir, remote_base)?;
    String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
