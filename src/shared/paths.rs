use std::path::{Component, Path, PathBuf};

/// Collapses `.` and `..` components without touching the filesystem.
///
/// `..` at the root of an absolute path is dropped; leading `..` components
/// of a relative path are kept.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => normalized.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            Component::Normal(part) => normalized.push(part),
        }
    }

    if normalized.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        normalized
    }
}

/// Resolves a recipe or conanfile path against an optional working directory.
///
/// An absolute `path` ignores `work_dir`, matching `Path::join` semantics.
pub fn resolve_in_work_dir(work_dir: Option<&Path>, path: &str) -> PathBuf {
    let joined = match work_dir {
        Some(dir) => dir.join(path),
        None => PathBuf::from(path),
    };
    normalize_lexically(&joined)
}
