//! Utility functions for remote path handling and local file naming

use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Percent-encode a value for use as a single URL path segment
///
/// GitLab expects namespaced project ids and file paths as one segment, so `/`
/// must be encoded along with everything outside the unreserved set.
///
/// # Examples
///
/// ```
/// use asset_mirror::utils::encode_path_segment;
///
/// assert_eq!(encode_path_segment("cable-mc/cobblemon-assets"), "cable-mc%2Fcobblemon-assets");
/// assert_eq!(encode_path_segment("gen 1/a.png"), "gen%201%2Fa.png");
/// ```
#[must_use]
pub fn encode_path_segment(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}

/// Last component of a `/`-separated remote path
///
/// Returns `None` when the path has no usable file name (empty, trailing slash,
/// `.` or `..`), which would otherwise escape or clobber the mirror directory.
/// On Windows a `\` is a separator, so names containing one are rejected there
/// too; elsewhere it is an ordinary file name character.
///
/// # Examples
///
/// ```
/// use asset_mirror::utils::base_name;
///
/// assert_eq!(base_name("blockbench/pokemon/gen1/bulbasaur.bbmodel"), Some("bulbasaur.bbmodel"));
/// assert_eq!(base_name("models/"), None);
/// assert_eq!(base_name(".."), None);
/// ```
#[must_use]
pub fn base_name(remote_path: &str) -> Option<&str> {
    let name = remote_path.rsplit('/').next()?;
    match name {
        "" | "." | ".." => None,
        name if cfg!(windows) && name.contains('\\') => None,
        name => Some(name),
    }
}

/// Whether a file name ends with the configured suffix
///
/// Matching is case-sensitive, like the remote repository's paths.
#[must_use]
pub fn matches_suffix(name: &str, suffix: &str) -> bool {
    name.ends_with(suffix)
}

/// Artifact path for a conversion input: `<output_dir>/<stem>.<extension>`
///
/// The stem is the file name with `suffix` removed, so distinct inputs matching
/// the same suffix always map to distinct outputs. Returns `None` when the name
/// does not end with `suffix` or nothing is left once it is removed. A leading
/// dot on `extension` is ignored.
///
/// # Examples
///
/// ```
/// use asset_mirror::utils::output_path_for;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(
///     output_path_for(Path::new("in/abra.bbmodel"), Path::new("gltf"), ".bbmodel", "glb"),
///     Some(PathBuf::from("gltf/abra.glb"))
/// );
/// ```
#[must_use]
pub fn output_path_for(
    input: &Path,
    output_dir: &Path,
    suffix: &str,
    extension: &str,
) -> Option<PathBuf> {
    let stem = input.file_name()?.to_str()?.strip_suffix(suffix)?;
    if stem.is_empty() {
        return None;
    }
    Some(output_dir.join(format!("{stem}.{}", extension.trim_start_matches('.'))))
}
