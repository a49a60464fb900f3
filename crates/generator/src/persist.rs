use crate::error::AssemblyError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Replace the contents of `path` via a sibling temp file and a rename.
///
/// Symlinks are followed so the file they point at is the one replaced, and
/// an existing file keeps its permissions.
pub async fn write_atomic(path: &Path, contents: &str) -> Result<(), AssemblyError> {
    let write_err = |source| AssemblyError::Write {
        path: path.to_path_buf(),
        source,
    };

    let target = match tokio::fs::canonicalize(path).await {
        Ok(real) => real,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
            }
            path.to_path_buf()
        }
        Err(e) => return Err(write_err(e)),
    };
    let permissions = tokio::fs::metadata(&target).await.ok().map(|m| m.permissions());

    let tmp = temp_sibling(&target);
    tokio::fs::write(&tmp, contents).await.map_err(write_err)?;
    let replaced = match permissions {
        Some(permissions) => tokio::fs::set_permissions(&tmp, permissions).await,
        None => Ok(()),
    };
    if let Err(source) = replaced {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(write_err(source));
    }
    if let Err(source) = tokio::fs::rename(&tmp, &target).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(write_err(source));
    }
    Ok(())
}
