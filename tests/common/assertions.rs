//! Custom assertions over the on-disk case layout

use std::path::Path;

/// Assert the output root holds exactly the directories `case-1..case-k`
pub fn assert_case_dirs(root: &Path, expected: u64) {
    let mut found: Vec<String> = std::fs::read_dir(root)
        .expect("output root must exist")
        .map(|entry| {
            entry
                .expect("readable entry")
                .file_name()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    found.sort();

    let mut want: Vec<String> = (1..=expected).map(|n| format!("case-{n}")).collect();
    want.sort();

    assert_eq!(found, want, "case directories must be gap-free from 1");
}

/// Read a committed case's metadata artifact
pub fn read_metadata(root: &Path, case: u64) -> String {
    let path = root.join(format!("case-{case}")).join("metadata.txt");
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("metadata must exist at {}: {e}", path.display()))
}

/// Assert a committed case holds `metadata.txt` plus exactly one document
pub fn assert_complete_case(root: &Path, case: u64, document_name: &str) {
    let dir = root.join(format!("case-{case}"));
    let mut names: Vec<String> = std::fs::read_dir(&dir)
        .unwrap_or_else(|e| panic!("case directory must exist at {}: {e}", dir.display()))
        .map(|entry| {
            entry
                .expect("readable entry")
                .file_name()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    names.sort();

    let mut want = vec![document_name.to_string(), "metadata.txt".to_string()];
    want.sort();

    assert_eq!(
        names, want,
        "case {case} must hold exactly the metadata artifact and its document"
    );
}

/// Snapshot every file under `root` with its content, for rerun comparisons
pub fn snapshot_tree(root: &Path) -> Vec<(String, Vec<u8>)> {
    let mut snapshot: Vec<(String, Vec<u8>)> = walkdir::WalkDir::new(root)
        .into_iter()
        .map(|entry| entry.expect("walkable entry"))
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| {
            let relative = entry
                .path()
                .strip_prefix(root)
                .expect("entry under root")
                .to_string_lossy()
                .into_owned();
            let content = std::fs::read(entry.path()).expect("readable file");
            (relative, content)
        })
        .collect();
    snapshot.sort();
    snapshot
}
