//! Blocking file helpers used by `FileStorage`.

use anyhow::{Context, Result};
use std::io::{ErrorKind, Write};
use std::path::Path;

pub(crate) fn create_dir_all(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    match std::fs::create_dir_all(path) {
        Ok(_) => Ok(()),
        Err(e) => match e.kind() {
            ErrorKind::AlreadyExists if path.is_dir() => Ok(()),
            _ => Err(e).context(format!("Unable to create directory {}", path.display())),
        },
    }
}

/// Writes `data` to `path` by way of a sibling temporary file, so a failed write never leaves a
/// truncated document behind.
pub(crate) fn replace(path: impl AsRef<Path>, data: impl AsRef<[u8]>) -> Result<()> {
    let path = path.as_ref();
    let tmp = path.with_extension("tmp");
    {
        let mut f = std::fs::File::create(&tmp)
            .context(format!("Unable to create file {}", tmp.display()))?;
        f.write_all(data.as_ref())
            .context(format!("Unable to write data to {}", tmp.display()))?;
        f.sync_all()
            .context(format!("Unable to flush data to {}", tmp.display()))?;
    }
    std::fs::rename(&tmp, path).with_context(|| {
        format!(
            "Unable to move '{}' to '{}'",
            tmp.to_string_lossy(),
            path.to_string_lossy()
        )
    })
}

/// Reads `path` to a `String`, returning `None` if there is no file.
pub(crate) fn read_optional(path: impl AsRef<Path>) -> Result<Option<String>> {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).context(format!("Unable to read file {}", path.display())),
    }
}

#[test]
fn replace_and_read_test() {
    let tempdir = tempfile::TempDir::new().unwrap();
    let path = tempdir.path().join("doc.json");
    assert_eq!(read_optional(&path).unwrap(), None);
    replace(&path, "first").unwrap();
    replace(&path, "second").unwrap();
    assert_eq!(read_optional(&path).unwrap().as_deref(), Some("second"));
    assert!(!path.with_extension("tmp").exists());
}

#[test]
fn create_dir_exists_test() {
    let tempdir = tempfile::TempDir::new().unwrap();
    let dir = tempdir.path().join("a").join("b");
    create_dir_all(&dir).unwrap();
    create_dir_all(&dir).unwrap();
    assert!(dir.is_dir());
}
