//! Atomic file writes.
//!
//! Content is written to `.{filename}.tmp` next to the target, synced, then
//! renamed over the target. `rename()` only replaces atomically when both
//! paths are on the same filesystem, which holding the temp file in the
//! target's directory guarantees. On Windows an existing target is replaced
//! with `MoveFileExW`.

use crate::error::{MalboxesError, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Atomically write bytes to a file, creating parent directories as needed.
///
/// # Example
///
/// ```no_run
/// use malboxes::fs::atomic_write;
/// use std::path::Path;
///
/// atomic_write(Path::new("Vagrantfile"), b"Vagrant.configure(2) do |config|\nend\n")?;
/// # Ok::<(), malboxes::error::MalboxesError>(())
/// ```
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;

    let temp_path = temp_path_for(path)?;
    write_and_sync(&temp_path, content)?;
    replace(&temp_path, path)?;

    tracing::debug!(path = %path.display(), bytes = content.len(), "wrote file");
    Ok(())
}

/// Atomically write a string to a file.
pub fn atomic_write_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    atomic_write(path, content.as_bytes())
}

/// Atomically write a string to a file that must not already exist.
///
/// Returns a [`MalboxesError::UserError`] naming the file when it does,
/// unless `overwrite` is set.
///
/// The target is claimed with `create_new` before any content is written, so
/// of two concurrent writers exactly one succeeds. The claimed file stays
/// empty until the synced temp file is renamed over it.
pub fn write_new_file<P: AsRef<Path>>(path: P, content: &str, overwrite: bool) -> Result<()> {
    let path = path.as_ref();
    if overwrite {
        return atomic_write_file(path, content);
    }

    ensure_parent(path)?;
    let temp_path = temp_path_for(path)?;

    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => MalboxesError::UserError(format!(
                "'{}' already exists; refusing to overwrite it",
                path.display()
            )),
            _ => MalboxesError::IoError(format!(
                "failed to create '{}': {}",
                path.display(),
                e
            )),
        })?;

    let written = write_and_sync(&temp_path, content.as_bytes())
        .and_then(|()| replace(&temp_path, path));
    if written.is_err() {
        let _ = fs::remove_file(path);
    }
    written?;

    tracing::debug!(path = %path.display(), bytes = content.len(), "wrote new file");
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| {
            MalboxesError::IoError(format!(
                "failed to create directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }
    Ok(())
}

fn temp_path_for(target: &Path) -> Result<PathBuf> {
    let parent = target.parent().unwrap_or(Path::new("."));
    let filename = target
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            MalboxesError::UserError(format!("invalid file path '{}'", target.display()))
        })?;

    Ok(parent.join(format!(".{}.tmp", filename)))
}

fn write_and_sync(path: &Path, content: &[u8]) -> Result<()> {
    let mut file = File::create(path).map_err(|e| {
        MalboxesError::IoError(format!(
            "failed to create temporary file '{}': {}",
            path.display(),
            e
        ))
    })?;

    file.write_all(content).map_err(|e| {
        let _ = fs::remove_file(path);
        MalboxesError::IoError(format!("failed to write temporary file: {}", e))
    })?;

    file.sync_all().map_err(|e| {
        let _ = fs::remove_file(path);
        MalboxesError::IoError(format!("failed to sync temporary file to disk: {}", e))
    })?;

    Ok(())
}

#[cfg(unix)]
fn replace(source: &Path, target: &Path) -> Result<()> {
    fs::rename(source, target).map_err(|e| {
        let _ = fs::remove_file(source);
        MalboxesError::IoError(format!(
            "failed to atomically replace '{}': {}",
            target.display(),
            e
        ))
    })?;

    // Persist the directory entry as well
    if let Some(parent) = target.parent()
        && let Ok(dir) = File::open(parent)
    {
        let _ = dir.sync_all();
    }

    Ok(())
}

#[cfg(windows)]
fn replace(source: &Path, target: &Path) -> Result<()> {
    use std::os::windows::ffi::OsStrExt;

    match fs::rename(source, target) {
        Ok(()) => return Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
        Err(e) => {
            let _ = fs::remove_file(source);
            return Err(MalboxesError::IoError(format!(
                "failed to atomically replace '{}': {}",
                target.display(),
                e
            )));
        }
    }

    const MOVEFILE_REPLACE_EXISTING: u32 = 0x1;
    const MOVEFILE_WRITE_THROUGH: u32 = 0x8;

    #[link(name = "kernel32")]
    unsafe extern "system" {
        fn MoveFileExW(existing: *const u16, new: *const u16, flags: u32) -> i32;
        fn GetLastError() -> u32;
    }

    let wide = |path: &Path| -> Vec<u16> {
        path.as_os_str()
            .encode_wide()
            .chain(std::iter::once(0))
            .collect()
    };
    let source_wide = wide(source);
    let target_wide = wide(target);

    // SAFETY: both buffers are NUL-terminated and outlive the call.
    let result = unsafe {
        MoveFileExW(
            source_wide.as_ptr(),
            target_wide.as_ptr(),
            MOVEFILE_REPLACE_EXISTING | MOVEFILE_WRITE_THROUGH,
        )
    };
    if result == 0 {
        let code = unsafe { GetLastError() };
        let _ = fs::remove_file(source);
        return Err(MalboxesError::IoError(format!(
            "failed to atomically replace '{}': Windows error code {}",
            target.display(),
            code
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write_new_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("Vagrantfile");

        atomic_write(&file_path, b"Vagrant.configure(2)").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "Vagrant.configure(2)");
    }

    #[test]
    fn test_atomic_write_replaces_existing() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("config.js");
        fs::write(&file_path, "{}").unwrap();

        atomic_write_file(&file_path, "{\"trial\": \"false\"}").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "{\"trial\": \"false\"}");
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir
            .path()
            .join("scripts")
            .join("user")
            .join("windows")
            .join("lab.ps1");

        atomic_write_file(&file_path, "cinst 'putty' -y\r\n").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "cinst 'putty' -y\r\n");
    }

    #[test]
    fn test_atomic_write_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("out.rb");

        atomic_write(&file_path, b"content").unwrap();

        assert!(!temp_dir.path().join(".out.rb.tmp").exists());
    }

    #[test]
    fn test_atomic_write_empty_content() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("empty.txt");

        atomic_write(&file_path, b"").unwrap();

        assert!(fs::read(&file_path).unwrap().is_empty());
    }

    #[test]
    fn test_temp_path_is_hidden_sibling() {
        let temp = temp_path_for(Path::new("/some/path/Vagrantfile")).unwrap();
        assert_eq!(temp, Path::new("/some/path/.Vagrantfile.tmp"));
    }

    #[test]
    fn test_write_new_file_refuses_existing() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("Vagrantfile");
        fs::write(&file_path, "original").unwrap();

        let err = write_new_file(&file_path, "replacement", false).unwrap_err();
        assert!(matches!(err, MalboxesError::UserError(_)));
        assert!(err.to_string().contains("already exists"));
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "original");

        write_new_file(&file_path, "replacement", true).unwrap();
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "replacement");
    }

    #[test]
    fn test_write_new_file_creates_parents_without_leftovers() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("vms").join("analyst").join("Vagrantfile");

        write_new_file(&file_path, "Vagrant.configure(2)", false).unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "Vagrant.configure(2)");
        let names: Vec<_> = fs::read_dir(file_path.parent().unwrap())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("Vagrantfile")]);
    }

    #[test]
    fn test_write_new_file_concurrent_writers_one_wins() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("Vagrantfile");

        let results: Vec<Result<()>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let path = &file_path;
                    scope.spawn(move || write_new_file(path, &format!("writer {}", i), false))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let winners = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(winners, 1);
        for err in results.iter().filter_map(|r| r.as_ref().err()) {
            assert!(matches!(err, MalboxesError::UserError(_)));
        }
        assert!(fs::read_to_string(&file_path).unwrap().starts_with("writer "));
    }
}
