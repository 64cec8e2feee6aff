//! Filesystem assertions for mirror and conversion tests

use std::collections::BTreeMap;
use std::path::Path;

/// File name → contents for every regular file directly inside `dir`
pub fn dir_snapshot(dir: &Path) -> BTreeMap<String, Vec<u8>> {
    let mut snapshot = BTreeMap::new();
    let Ok(entries) = std::fs::read_dir(dir) else {
        return snapshot;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_file() {
            let name = entry.file_name().to_string_lossy().into_owned();
            let content = std::fs::read(&path).expect("Failed to read mirrored file");
            snapshot.insert(name, content);
        }
    }
    snapshot
}

/// Assert that `dir` holds exactly the named files
pub fn assert_dir_files(dir: &Path, expected: &[&str]) {
    let snapshot = dir_snapshot(dir);
    let actual: Vec<&str> = snapshot.keys().map(String::as_str).collect();
    let mut expected = expected.to_vec();
    expected.sort_unstable();
    assert_eq!(actual, expected, "unexpected files in {}", dir.display());
}
