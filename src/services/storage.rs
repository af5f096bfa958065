use crate::domain::models::InstallRecord;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Dropped into every directory boostkit materializes; removal refuses directories without it.
pub const MANAGED_MARKER: &str = ".boostkit-managed";

pub fn boost_dir(project_dir: &Path) -> PathBuf {
    project_dir.join(".boost")
}

pub fn packages_dir(project_dir: &Path) -> PathBuf {
    boost_dir(project_dir).join("packages")
}

pub fn bindings_dir(project_dir: &Path) -> PathBuf {
    boost_dir(project_dir).join("agents")
}

pub fn load_record(path: &Path) -> anyhow::Result<InstallRecord> {
    if !path.exists() {
        return Ok(InstallRecord::default());
    }
    let raw = std::fs::read_to_string(path)?;
    serde_json::from_str(&raw)
        .map_err(|e| anyhow::anyhow!("invalid install record {}: {}", path.display(), e))
}

pub fn save_record(path: &Path, record: &InstallRecord) -> anyhow::Result<()> {
    atomic_write(path, &format!("{}\n", serde_json::to_string_pretty(record)?))?;
    Ok(())
}

/// Temp file in the destination directory, renamed over `path`.
pub fn atomic_write(path: &Path, contents: &str) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

pub fn is_managed(dir: &Path) -> bool {
    dir.join(MANAGED_MARKER).is_file()
}

/// Replaces `dst` with a copy of `src` and marks it as managed.
pub fn materialize(src: &Path, dst: &Path) -> anyhow::Result<()> {
    if dst.exists() {
        if !is_managed(dst) {
            anyhow::bail!("refusing to overwrite unmanaged directory {}", dst.display());
        }
        std::fs::remove_dir_all(dst)?;
    }
    copy_dir_all(src, dst)?;
    std::fs::write(dst.join(MANAGED_MARKER), "managed-by=boostkit\n")?;
    Ok(())
}

fn copy_dir_all(src: &Path, dst: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dst)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let ty = entry.file_type()?;
        let to = dst.join(entry.file_name());
        if ty.is_dir() {
            copy_dir_all(&entry.path(), &to)?;
        } else {
            std::fs::copy(entry.path(), to)?;
        }
    }
    Ok(())
}
