use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const OUTPUT_PREFIX: &str = "bw_";

/// Prefix the whole input path, directories included: `a/b.png` -> `bw_a/b.png`.
pub fn derive_output_path(input: &Path) -> PathBuf {
    let mut out = OsString::from(OUTPUT_PREFIX);
    out.push(input.as_os_str());
    PathBuf::from(out)
}
