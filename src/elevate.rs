//! Privilege escalation for installs into directories the user cannot write.
//!
//! Every method is one separate escalation, so the user may be prompted for
//! credentials more than once.

use std::ffi::OsStr;
use std::io;
use std::path::Path;
#[cfg(unix)]
use std::process::Command;

pub trait Elevate {
    /// Create `dir` and its parents with elevated privileges.
    fn create_dir(&self, dir: &Path) -> io::Result<()>;
    /// Move `from` onto `to` with elevated privileges, replacing `to`.
    fn move_file(&self, from: &Path, to: &Path) -> io::Result<()>;
}

/// Escalates through `sudo`, inheriting the terminal so it can prompt.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sudo;

impl Sudo {
    #[cfg(unix)]
    fn run(&self, args: &[&OsStr]) -> io::Result<()> {
        let rendered = args.iter().map(|a| a.to_string_lossy()).collect::<Vec<_>>().join(" ");
        tracing::info!(command = %format!("sudo {rendered}"), "elevating");
        let status = Command::new("sudo").args(args).status()?;
        if status.success() {
            Ok(())
        } else {
            Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("`sudo {rendered}` exited with {status}"),
            ))
        }
    }

    #[cfg(not(unix))]
    fn run(&self, _args: &[&OsStr]) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "no privilege escalation mechanism is available on this platform",
        ))
    }
}

impl Elevate for Sudo {
    fn create_dir(&self, dir: &Path) -> io::Result<()> {
        self.run(&[OsStr::new("mkdir"), OsStr::new("-p"), dir.as_os_str()])
    }

    fn move_file(&self, from: &Path, to: &Path) -> io::Result<()> {
        self.run(&[OsStr::new("mv"), OsStr::new("-f"), from.as_os_str(), to.as_os_str()])
    }
}
