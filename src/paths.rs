//! Path normalisation and existence checks

use crate::{ThorError, ThorResult};
use std::fs::File;
use std::io::Read;
use std::path::{Component, Path, PathBuf};

/// Check if a file is gzip compressed
pub fn is_gzipped<P: AsRef<Path>>(path: P) -> ThorResult<bool> {
    let mut file = File::open(path)?;
    let mut buffer = [0; 2];

    match file.read_exact(&mut buffer) {
        Ok(()) => Ok(buffer == [0x1f, 0x8b]),
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Ok(false),
        Err(e) => Err(ThorError::Io(e)),
    }
}

/// Expand a leading `~`, make the path absolute and drop `.`/`..` components.
///
/// Purely lexical: symlinks are not resolved and the path need not exist.
pub fn normalize_path<P: AsRef<Path>>(path: P) -> ThorResult<PathBuf> {
    let path = expand_home(path.as_ref());
    let absolute = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()?.join(path)
    };
    Ok(clean(&absolute))
}

fn expand_home(path: &Path) -> PathBuf {
    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(first)) if first == "~" => match dirs::home_dir() {
            Some(home) => home.join(components.as_path()),
            None => path.to_path_buf(),
        },
        _ => path.to_path_buf(),
    }
}

fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` at the root stays at the root
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Fail with [`ThorError::MissingFile`] unless `path` is an existing regular file
pub fn require_file<P: AsRef<Path>>(path: P, kind: &'static str) -> ThorResult<()> {
    if !path.as_ref().is_file() {
        return Err(ThorError::MissingFile {
            kind,
            path: path.as_ref().display().to_string(),
        });
    }
    Ok(())
}

/// Normalise a path and require it to be an existing file
pub fn resolve_file<P: AsRef<Path>>(path: P, kind: &'static str) -> ThorResult<PathBuf> {
    let path = normalize_path(path)?;
    require_file(&path, kind)?;
    Ok(path)
}

/// Look up an executable on `PATH`
pub fn find_executable(name: &str) -> Option<PathBuf> {
    let search = std::env::var_os("PATH")?;
    std::env::split_paths(&search)
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
