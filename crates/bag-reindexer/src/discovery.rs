//! Shard file discovery

use bag_db::SHARD_EXTENSION;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::ReindexError;

/// Find all shard files directly inside a bag directory
///
/// Only regular files (or links to them) with the `.db3` extension at depth
/// one are returned, sorted by file name so that the descriptor lists them
/// deterministically. Entries that are not shards are skipped even when they
/// are dangling links; a dangling `.db3` link is an error.
pub fn find_shard_files(dir: &Path) -> Result<Vec<PathBuf>, ReindexError> {
    if !dir.is_dir() {
        return Err(ReindexError::invalid_path(dir, "not a directory"));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            match e.into_io_error() {
                Some(io) => ReindexError::Io(io),
                None => ReindexError::invalid_path(path, "unreadable directory entry"),
            }
        })?;

        let path = entry.path();
        if !path.extension().is_some_and(|ext| ext == SHARD_EXTENSION) {
            continue;
        }

        // Follows links, so a dangling shard link surfaces here
        let metadata = fs::metadata(path)
            .map_err(|_| ReindexError::invalid_path(path, "shard file cannot be accessed"))?;
        if metadata.is_file() {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}

/// Express shard paths relative to the bag directory
///
/// Names are written verbatim into the descriptor, so a name that is not
/// valid UTF-8 is rejected instead of being converted lossily.
pub fn relative_paths(root: &Path, paths: &[PathBuf]) -> Result<Vec<String>, ReindexError> {
    paths
        .iter()
        .map(|p| {
            let rel = p.strip_prefix(root).unwrap_or(p);
            rel.to_str()
                .map(str::to_string)
                .ok_or_else(|| {
                    ReindexError::invalid_path(p.as_path(), "shard file name is not valid UTF-8")
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_shard_files_empty_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let files = find_shard_files(tmp.path()).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_find_shard_files_filters_and_sorts() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("bag_1.db3"), "").unwrap();
        fs::write(tmp.path().join("bag_0.db3"), "").unwrap();
        fs::write(tmp.path().join("metadata.yaml"), "").unwrap();
        fs::write(tmp.path().join("bag_2.db3.zstd"), "").unwrap();
        fs::write(tmp.path().join("bag_0.db3-shm"), "").unwrap();

        let nested = tmp.path().join("nested");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("other_0.db3"), "").unwrap();

        let files = find_shard_files(tmp.path()).unwrap();
        let names = relative_paths(tmp.path(), &files).unwrap();
        assert_eq!(names, vec!["bag_0.db3", "bag_1.db3"]);
    }

    #[test]
    fn test_directory_named_like_shard_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("odd.db3")).unwrap();

        let files = find_shard_files(tmp.path()).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_find_shard_files_nonexistent_dir() {
        let result = find_shard_files(Path::new("/nonexistent/bag"));
        assert!(matches!(result, Err(ReindexError::InvalidPath { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_link_that_is_not_a_shard_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("bag_0.db3"), "").unwrap();
        std::os::unix::fs::symlink(tmp.path().join("gone"), tmp.path().join("notes.txt"))
            .unwrap();

        let files = find_shard_files(tmp.path()).unwrap();
        assert_eq!(files, vec![tmp.path().join("bag_0.db3")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_linked_shard_is_found() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("store");
        fs::create_dir_all(&target).unwrap();
        fs::write(target.join("real.db3"), "").unwrap();
        std::os::unix::fs::symlink(target.join("real.db3"), tmp.path().join("bag_0.db3"))
            .unwrap();

        let files = find_shard_files(tmp.path()).unwrap();
        assert_eq!(files, vec![tmp.path().join("bag_0.db3")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_shard_link_names_the_path() {
        let tmp = tempfile::tempdir().unwrap();
        let link = tmp.path().join("bag_1.db3");
        std::os::unix::fs::symlink(tmp.path().join("gone.db3"), &link).unwrap();

        match find_shard_files(tmp.path()) {
            Err(ReindexError::InvalidPath { path, .. }) => assert_eq!(path, link),
            other => panic!("expected InvalidPath, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_shard_name_is_rejected() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let tmp = tempfile::tempdir().unwrap();
        let shard = tmp.path().join(OsStr::from_bytes(b"bag_\xff.db3"));

        let result = relative_paths(tmp.path(), &[shard.clone()]);
        match result {
            Err(ReindexError::InvalidPath { path, .. }) => assert_eq!(path, shard),
            other => panic!("expected InvalidPath, got {:?}", other),
        }
    }
}
