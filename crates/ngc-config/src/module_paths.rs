//! Resolution of the user's oword module path
//!
//! The module is named either by an absolute path or by a path relative to an
//! optional module directory. The result is always canonical: symlinks are
//! followed and the file must exist.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for module path resolution
#[derive(Error, Debug)]
pub enum ModulePathError {
    /// No module name was configured
    #[error("no module defined")]
    NoModule,

    /// The joined path could not be canonicalized
    #[error("can't resolve path to '{}': {source}", .path.display())]
    Unresolvable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The path resolved but does not name a regular file
    #[error("'{}' is not a file", .0.display())]
    NotAFile(PathBuf),
}

/// Join the module name onto the module directory without touching the filesystem
///
/// An absolute module path ignores the directory.
pub fn candidate_module_path(module: &str, module_dir: Option<&Path>) -> PathBuf {
    match module_dir {
        Some(dir) => dir.join(module),
        None => PathBuf::from(module),
    }
}

/// Resolve the module path to an absolute, canonical file path
///
/// # Arguments
///
/// * `module` - Module file name or path as configured
/// * `module_dir` - Optional directory relative module names are looked up in
pub fn resolve_module_path(
    module: &str,
    module_dir: Option<&Path>,
) -> Result<PathBuf, ModulePathError> {
    let module = module.trim();
    if module.is_empty() {
        return Err(ModulePathError::NoModule);
    }

    let candidate = candidate_module_path(module, module_dir);
    let resolved = fs::canonicalize(&candidate).map_err(|source| ModulePathError::Unresolvable {
        path: candidate.clone(),
        source,
    })?;

    if !resolved.is_file() {
        return Err(ModulePathError::NotAFile(resolved));
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_relative_module_joined_onto_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("remap.py"), "x = 1\n").unwrap();

        let resolved = resolve_module_path("remap.py", Some(dir.path())).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("remap.py"));
    }

    #[test]
    fn test_absolute_module_ignores_dir() {
        let dir = TempDir::new().unwrap();
        let script = dir.path().join("toolchange.py");
        fs::write(&script, "").unwrap();

        let other = TempDir::new().unwrap();
        let resolved =
            resolve_module_path(script.to_str().unwrap(), Some(other.path())).unwrap();
        assert_eq!(resolved, fs::canonicalize(&script).unwrap());
    }

    #[test]
    fn test_missing_module_is_unresolvable() {
        let dir = TempDir::new().unwrap();
        let err = resolve_module_path("missing.py", Some(dir.path())).unwrap_err();
        assert!(matches!(err, ModulePathError::Unresolvable { .. }));
        assert!(err.to_string().contains("missing.py"));
    }

    #[test]
    fn test_empty_module_name() {
        let err = resolve_module_path("   ", None).unwrap_err();
        assert!(matches!(err, ModulePathError::NoModule));
    }

    #[test]
    fn test_directory_is_not_a_module() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("pkg")).unwrap();
        let err = resolve_module_path("pkg", Some(dir.path())).unwrap_err();
        assert!(matches!(err, ModulePathError::NotAFile(_)));
    }
}
