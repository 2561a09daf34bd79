//! Named settings profiles.
//!
//! A profile is a command string produced by [`Command::command`], stored
//! under a name in a TOML file:
//!
//! ```toml
//! [profiles]
//! logo = "autotrace -color-count 4 -output-file -output-format svg"
//! sketch = "autotrace -centerline -output-file -output-format svg"
//! ```
//!
//! Applying a profile goes through [`Command::set_command`], so the file
//! values stored in a profile never leak into a new trace. The name
//! `default` always means the command's own defaults and is never stored.

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    command::{Command, CommandError},
    debug,
};

/// Profile name that resolves to the command's defaults.
pub const DEFAULT_PROFILE: &str = "default";

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("failed to access profile store `{0}`")]
    Io(PathBuf, #[source] io::Error),

    #[error("profile store is not valid TOML")]
    Toml(#[from] toml::de::Error),

    #[error("cannot serialize profiles")]
    Serialize(#[from] toml::ser::Error),

    #[error("profile `{DEFAULT_PROFILE}` is reserved")]
    Reserved,

    #[error("invalid profile name `{0}`")]
    InvalidName(String),

    #[error("no profile named `{0}`")]
    NotFound(String),

    #[error(transparent)]
    Command(#[from] CommandError),
}

/// On-disk layout.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ProfileFile {
    #[serde(default)]
    profiles: BTreeMap<String, String>,
}

/// Profiles loaded from one file. Changes stay in memory until [`flush`].
///
/// [`flush`]: ProfileStore::flush
#[derive(Debug)]
pub struct ProfileStore {
    path: PathBuf,
    profiles: BTreeMap<String, String>,
    dirty: bool,
}

impl ProfileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: &Path) -> Result<Self, ProfileError> {
        let profiles = match fs::read_to_string(path) {
            Ok(content) => toml::from_str::<ProfileFile>(&content)?.profiles,
            Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(ProfileError::Io(path.to_path_buf(), err)),
        };
        debug!("profile"; "loaded {} profiles from {}", profiles.len(), path.display());

        Ok(Self {
            path: path.to_path_buf(),
            profiles,
            dirty: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `default` first, then stored names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(DEFAULT_PROFILE).chain(self.profiles.keys().map(String::as_str))
    }

    /// Stored command string for `name`. `default` is never stored.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.profiles.get(name).map(String::as_str)
    }

    /// Store the current command string of `command` under `name`.
    ///
    /// Returns `true` when an existing profile was replaced.
    pub fn save(&mut self, name: &str, command: &Command) -> Result<bool, ProfileError> {
        check_name(name)?;
        let line = command.command()?;
        let replaced = self.profiles.insert(name.to_owned(), line).is_some();
        self.dirty = true;
        Ok(replaced)
    }

    pub fn delete(&mut self, name: &str) -> Result<(), ProfileError> {
        if name == DEFAULT_PROFILE {
            return Err(ProfileError::Reserved);
        }
        self.profiles
            .remove(name)
            .ok_or_else(|| ProfileError::NotFound(name.to_owned()))?;
        self.dirty = true;
        Ok(())
    }

    /// Load profile `name` into `command`.
    ///
    /// A stored string that no longer parses against the command leaves
    /// the command unchanged.
    pub fn apply(&self, name: &str, command: &mut Command) -> Result<(), ProfileError> {
        if name == DEFAULT_PROFILE {
            command.restore_defaults()?;
            return Ok(());
        }
        let line = self
            .get(name)
            .ok_or_else(|| ProfileError::NotFound(name.to_owned()))?;
        command.set_command(line)?;
        Ok(())
    }

    /// Write pending changes, creating parent directories as needed.
    pub fn flush(&mut self) -> Result<(), ProfileError> {
        if !self.dirty {
            return Ok(());
        }

        let io_err = |err| ProfileError::Io(self.path.clone(), err);
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let file = ProfileFile {
            profiles: self.profiles.clone(),
        };
        let content = toml::to_string_pretty(&file)?;
        fs::write(&self.path, content).map_err(io_err)?;

        self.dirty = false;
        debug!("profile"; "wrote {}", self.path.display());
        Ok(())
    }
}

fn check_name(name: &str) -> Result<(), ProfileError> {
    if name == DEFAULT_PROFILE {
        return Err(ProfileError::Reserved);
    }
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(ProfileError::InvalidName(name.to_owned()));
    }
    Ok(())
}
