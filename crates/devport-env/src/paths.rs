//! Workspace directory layout.

use std::path::{Path, PathBuf};

use crate::error::EnvError;

/// The directories a DevPort workspace lives in.
///
/// `root` is the directory containing the configuration file; the other
/// directories usually sit beneath it but may be absolute.
#[derive(Debug, Clone)]
pub struct Paths {
    pub root: PathBuf,
    pub data_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub projects_dir: PathBuf,
}

impl Paths {
    /// Conventional layout beneath a single root directory.
    pub fn under(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            data_dir: root.join("databases"),
            cache_dir: root.join("system"),
            projects_dir: root.join("projects"),
            root,
        }
    }

    /// Template directory used to reseed `data_dir` on reset.
    pub fn seed_dir(&self) -> PathBuf {
        self.root.join("empty_databases")
    }

    /// Wipe the mutable workspace state.
    ///
    /// Removes the data, cache, and projects directories, recreates an
    /// empty projects directory, and reseeds the data directory from
    /// [`Paths::seed_dir`] when the template exists.
    pub fn reset_workspace(&self) -> Result<(), EnvError> {
        for dir in [&self.data_dir, &self.cache_dir, &self.projects_dir] {
            if dir.exists() {
                std::fs::remove_dir_all(dir)?;
            }
        }
        std::fs::create_dir_all(&self.projects_dir)?;

        let seed = self.seed_dir();
        if seed.is_dir() {
            copy_dir(&seed, &self.data_dir)?;
        } else {
            std::fs::create_dir_all(&self.data_dir)?;
        }
        Ok(())
    }
}

fn copy_dir(src: &Path, dst: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dst)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let target = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir(&entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn under_lays_out_conventional_directories() {
        let paths = Paths::under("/work/dev");
        assert_eq!(paths.data_dir, PathBuf::from("/work/dev/databases"));
        assert_eq!(paths.cache_dir, PathBuf::from("/work/dev/system"));
        assert_eq!(paths.projects_dir, PathBuf::from("/work/dev/projects"));
    }

    #[test]
    fn reset_recreates_workspace_from_seed() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = Paths::under(tmp.path());

        // Dirty state: stale data, a checked-out project, cache noise.
        std::fs::create_dir_all(&paths.data_dir).unwrap();
        std::fs::write(paths.data_dir.join("stale.db"), b"old").unwrap();
        std::fs::create_dir_all(paths.projects_dir.join("demo")).unwrap();
        std::fs::create_dir_all(&paths.cache_dir).unwrap();

        // Seed template with a nested file.
        let seed = paths.seed_dir();
        std::fs::create_dir_all(seed.join("tables")).unwrap();
        std::fs::write(seed.join("tables/init.json"), b"{}").unwrap();

        paths.reset_workspace().unwrap();

        assert!(!paths.data_dir.join("stale.db").exists());
        assert!(!paths.projects_dir.join("demo").exists());
        assert!(!paths.cache_dir.exists());
        assert!(paths.projects_dir.is_dir());
        assert_eq!(
            std::fs::read(paths.data_dir.join("tables/init.json")).unwrap(),
            b"{}"
        );
    }

    #[test]
    fn reset_without_seed_creates_empty_data_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = Paths::under(tmp.path());

        paths.reset_workspace().unwrap();

        assert!(paths.data_dir.is_dir());
        assert_eq!(std::fs::read_dir(&paths.data_dir).unwrap().count(), 0);
    }
}
