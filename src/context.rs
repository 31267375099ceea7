// File: ./src/context.rs
//! Locations of the files quickplan reads and writes.
//!
//! Only two files exist: `config.toml` and, when file logging is enabled,
//! `quickplan.log`. Resolving a path never touches the disk; directories are
//! created by whoever writes into them.

use anyhow::Result;
use directories::ProjectDirs;
use std::fmt;
use std::path::PathBuf;

pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const LOG_FILE_NAME: &str = "quickplan.log";

/// No home directory could be determined for the per-user locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoHomeDir;

impl fmt::Display for NoHomeDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "No home directory to keep quickplan files in")
    }
}

impl std::error::Error for NoHomeDir {}

pub trait AppContext: Send + Sync + fmt::Debug {
    fn config_dir(&self) -> Result<PathBuf>;
    fn log_dir(&self) -> Result<PathBuf>;

    fn config_file_path(&self) -> Result<PathBuf> {
        Ok(self.config_dir()?.join(CONFIG_FILE_NAME))
    }

    fn log_file_path(&self) -> Result<PathBuf> {
        Ok(self.log_dir()?.join(LOG_FILE_NAME))
    }
}

/// Per-user locations, or everything under one directory given by `--root`.
#[derive(Clone, Debug)]
pub enum StandardContext {
    Root(PathBuf),
    User,
}

impl StandardContext {
    pub fn new(root: Option<PathBuf>) -> Self {
        match root {
            Some(path) => StandardContext::Root(path),
            None => StandardContext::User,
        }
    }

    fn project() -> Result<ProjectDirs> {
        ProjectDirs::from("com", "quickplan", "quickplan").ok_or_else(|| NoHomeDir.into())
    }
}

impl AppContext for StandardContext {
    fn config_dir(&self) -> Result<PathBuf> {
        match self {
            StandardContext::Root(root) => Ok(root.clone()),
            StandardContext::User => Ok(Self::project()?.config_dir().to_path_buf()),
        }
    }

    fn log_dir(&self) -> Result<PathBuf> {
        match self {
            StandardContext::Root(root) => Ok(root.join("logs")),
            StandardContext::User => Ok(Self::project()?.data_local_dir().to_path_buf()),
        }
    }
}

/// A throwaway root under the temp dir, deleted when dropped.
#[derive(Debug)]
pub struct TestContext {
    pub root: PathBuf,
}

impl TestContext {
    pub fn new() -> Self {
        let root = std::env::temp_dir().join(format!("quickplan_test_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&root).expect("failed to create TestContext temp dir");
        Self { root }
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl AppContext for TestContext {
    fn config_dir(&self) -> Result<PathBuf> {
        Ok(self.root.clone())
    }

    fn log_dir(&self) -> Result<PathBuf> {
        Ok(self.root.join("logs"))
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}
