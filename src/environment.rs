use std::env;
use std::io;
use std::path::PathBuf;

use crate::path::SearchPath;

/// Process inputs read once at startup.
#[derive(Debug, Clone)]
pub struct Environment {
    pub path: SearchPath,
    /// Value of `$SHELL`.
    pub shell: Option<String>,
    pub home: Option<PathBuf>,
    pub cwd: PathBuf,
}

impl Environment {
    pub fn capture() -> io::Result<Self> {
        Ok(Self {
            path: SearchPath::parse(env::var_os("PATH").as_deref()),
            shell: env::var("SHELL").ok().filter(|s| !s.is_empty()),
            home: dirs::home_dir().filter(|p| !p.as_os_str().is_empty()),
            cwd: env::current_dir()?,
        })
    }

    /// `~/bin` when it already exists, `~/.local/bin` otherwise.
    pub fn default_install_dir(&self) -> Option<PathBuf> {
        let home = self.home.as_ref()?;
        let bin = home.join("bin");
        Some(if bin.is_dir() { bin } else { home.join(".local").join("bin") })
    }
}
