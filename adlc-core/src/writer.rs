//! File Writer & Manifest (§4.6): idempotent, atomic writes under a
//! configured output root, with a running `path sha256` manifest.

use std::io::Write as _;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::error::AdlError;

pub struct FileWriter {
    root: PathBuf,
    no_overwrite: bool,
    manifest_path: Option<PathBuf>,
    manifest: Vec<(String, String)>,
}

impl FileWriter {
    pub fn new(root: PathBuf, no_overwrite: bool, manifest_path: Option<PathBuf>) -> Self {
        Self { root, no_overwrite, manifest_path, manifest: Vec::new() }
    }

    /// Writes `bytes` to `relative_path` under the output root, creating
    /// directories as needed. With `no_overwrite` set, a byte-identical
    /// existing file is left untouched (mtime preserved); otherwise the
    /// write goes to a sibling temp file and is renamed into place so a
    /// crash mid-write cannot leave a half-written file.
    pub fn write(&mut self, relative_path: &Path, bytes: &[u8]) -> Result<(), AdlError> {
        let target = self.root.join(relative_path);
        let digest = hex_sha256(bytes);

        if self.no_overwrite && file_matches(&target, bytes) {
            log::debug!("skipping unchanged file {}", target.display());
            self.manifest.push((relative_path.display().to_string(), digest));
            return Ok(());
        }

        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).map_err(|e| emit_error(&target, e))?;
        }

        let mut tmp_name = target.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        tmp_name.push(".tmp");
        let tmp_path = target.with_file_name(tmp_name);
        std::fs::write(&tmp_path, bytes).map_err(|e| emit_error(&tmp_path, e))?;
        std::fs::rename(&tmp_path, &target).map_err(|e| emit_error(&target, e))?;
        log::info!("wrote {}", target.display());

        self.manifest.push((relative_path.display().to_string(), digest));
        Ok(())
    }

    /// Flushes the accumulated manifest to the configured path, one
    /// `"<path> <sha256-hex>"` line per write, in call order.
    pub fn close(self) -> Result<(), AdlError> {
        let Some(manifest_path) = &self.manifest_path else { return Ok(()) };
        if let Some(parent) = manifest_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| emit_error(manifest_path, e))?;
        }
        let mut file = std::fs::File::create(manifest_path).map_err(|e| emit_error(manifest_path, e))?;
        for (path, digest) in &self.manifest {
            writeln!(file, "{path} {digest}").map_err(|e| emit_error(manifest_path, e))?;
        }
        Ok(())
    }
}

fn file_matches(path: &Path, bytes: &[u8]) -> bool {
    std::fs::read(path).map(|existing| existing == bytes).unwrap_or(false)
}

fn hex_sha256(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hasher.finalize().iter().map(|b| format!("{b:02x}")).collect()
}

fn emit_error(path: &Path, err: std::io::Error) -> AdlError {
    AdlError::EmitError { path: path.display().to_string(), message: err.to_string() }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn write_creates_parent_dirs_and_manifest_entry() {
        let dir = tempdir().unwrap();
        let manifest = dir.path().join("manifest.txt");
        let mut writer = FileWriter::new(dir.path().to_path_buf(), false, Some(manifest.clone()));

        writer.write(Path::new("pkg/mod.rs"), b"hello").unwrap();
        writer.close().unwrap();

        assert_eq!(std::fs::read(dir.path().join("pkg/mod.rs")).unwrap(), b"hello");
        let manifest_text = std::fs::read_to_string(&manifest).unwrap();
        assert!(manifest_text.contains("pkg/mod.rs"));
        assert_eq!(manifest_text.lines().count(), 1);
    }

    #[test]
    fn no_overwrite_skips_byte_identical_file() {
        let dir = tempdir().unwrap();
        let mut writer = FileWriter::new(dir.path().to_path_buf(), true, None);
        let target = dir.path().join("out.txt");
        std::fs::write(&target, b"same").unwrap();
        let before = std::fs::metadata(&target).unwrap().modified().unwrap();

        std::thread::sleep(std::time::Duration::from_millis(10));
        writer.write(Path::new("out.txt"), b"same").unwrap();

        let after = std::fs::metadata(&target).unwrap().modified().unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn no_overwrite_still_writes_changed_content() {
        let dir = tempdir().unwrap();
        let mut writer = FileWriter::new(dir.path().to_path_buf(), true, None);
        let target = dir.path().join("out.txt");
        std::fs::write(&target, b"old").unwrap();

        writer.write(Path::new("out.txt"), b"new").unwrap();

        assert_eq!(std::fs::read(&target).unwrap(), b"new");
    }
}
