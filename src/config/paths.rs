use std::fs;
use std::path::PathBuf;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use crate::error::Result;

/// Manages paths for bizflow configuration
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root configuration directory (~/.bizflow)
    pub root: PathBuf,
    /// Configuration file path (~/.bizflow/config.toml)
    pub config_file: PathBuf,
}

impl Paths {
    /// Create a new Paths instance using the user's home directory
    pub fn new() -> Result<Self> {
        let home = std::env::var("HOME")?;
        Ok(Self::under(PathBuf::from(home).join(".bizflow")))
    }

    /// Paths rooted at an explicit directory
    pub fn under(root: PathBuf) -> Self {
        Self {
            config_file: root.join("config.toml"),
            root,
        }
    }

    /// Ensure the configuration directory exists with owner-only permissions
    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(&self.root)?;

        #[cfg(unix)]
        {
            let perms = fs::Permissions::from_mode(0o700);
            fs::set_permissions(&self.root, perms)?;
        }

        Ok(())
    }

    /// Check if the config file exists
    pub fn config_exists(&self) -> bool {
        self.config_file.exists()
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self::new().unwrap_or_else(|_| Self::under(PathBuf::from(".bizflow")))
    }
}
