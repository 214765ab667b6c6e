use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{Error, IoResultExt, Result};
use crate::index::clear_index;
use crate::state::RepoState;

/// name of the metadata directory inside the work tree
pub const META_DIR: &str = ".twig";

/// a twig repository: a work tree plus its metadata directory
pub struct Repo {
    root: PathBuf,
    path: PathBuf,
    config: Config,
}

impl Repo {
    /// create the metadata layout under `root`
    ///
    /// this only lays out directories and config; `ops::init` also writes the
    /// root commit and the initial state record.
    pub fn init(root: &Path) -> Result<Self> {
        Self::init_with_config(root, Config::default())
    }

    /// create the metadata layout with an explicit configuration
    pub fn init_with_config(root: &Path, config: Config) -> Result<Self> {
        let path = root.join(META_DIR);
        let config_path = path.join("config.toml");
        if config_path.exists() {
            return Err(Error::RepoExists(root.to_path_buf()));
        }

        // create directory structure
        std::fs::create_dir_all(path.join("objects/blobs")).with_path(&path)?;
        std::fs::create_dir_all(path.join("objects/commits")).with_path(&path)?;
        std::fs::create_dir_all(path.join("index")).with_path(&path)?;
        std::fs::create_dir_all(path.join("tmp")).with_path(&path)?;

        config.save(&config_path)?;

        Ok(Self {
            root: root.to_path_buf(),
            path,
            config,
        })
    }

    /// open an existing repository rooted at `root`
    pub fn open(root: &Path) -> Result<Self> {
        let path = root.join(META_DIR);
        let config_path = path.join("config.toml");
        if !config_path.exists() {
            return Err(Error::NoRepo(root.to_path_buf()));
        }

        let config = Config::load(&config_path)?;

        Ok(Self {
            root: root.to_path_buf(),
            path,
            config,
        })
    }

    /// run one command as a transaction over the repository state
    ///
    /// the state is loaded once, handed to `f`, and written back only if `f`
    /// succeeds. a failed command leaves the on-disk record untouched.
    /// staged entries discarded by `f` are deleted after the save.
    pub fn transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut RepoState) -> Result<T>,
    {
        let mut state = RepoState::load(self)?;
        let value = f(&mut state)?;
        state.save(self)?;

        if state.index_clear_pending() {
            clear_index(self)?;
        }
        Ok(value)
    }

    /// load the state record without the intent to modify it
    pub fn state(&self) -> Result<RepoState> {
        RepoState::load(self)
    }

    /// work tree root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// metadata directory path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// repository configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// path to config.toml
    pub fn config_path(&self) -> PathBuf {
        self.path.join("config.toml")
    }

    /// path to objects directory
    pub fn objects_path(&self) -> PathBuf {
        self.path.join("objects")
    }

    /// path to blobs directory
    pub fn blobs_path(&self) -> PathBuf {
        self.objects_path().join("blobs")
    }

    /// path to commits directory
    pub fn commits_path(&self) -> PathBuf {
        self.objects_path().join("commits")
    }

    /// path to the staging area
    pub fn index_path(&self) -> PathBuf {
        self.path.join("index")
    }

    /// path to the repository state record
    pub fn state_path(&self) -> PathBuf {
        self.path.join("state")
    }

    /// path to tmp directory (for atomic writes)
    pub fn tmp_path(&self) -> PathBuf {
        self.path.join("tmp")
    }
}
