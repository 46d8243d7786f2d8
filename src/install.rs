//! Placing the downloaded binary on disk.

use std::fs;
use std::io::{self, Write};
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tempfile::{Builder, NamedTempFile};

use crate::elevate::Elevate;
use crate::error::{InstallError, Result};
use crate::path::normalize;

/// File name of the installed Bismuth CLI.
pub const BIN_NAME: &str = "biscli";

/// Absolute install directory and the binary path inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallTarget {
    directory: PathBuf,
    binary_path: PathBuf,
}

impl InstallTarget {
    /// Resolve `dir` against `cwd` and normalize it.
    pub fn new(cwd: &Path, dir: &Path) -> Self {
        let directory = normalize(cwd, dir);
        let binary_path = directory.join(BIN_NAME);
        Self { directory, binary_path }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn binary_path(&self) -> &Path {
        &self.binary_path
    }
}

/// How the binary ended up in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    /// Written with the user's own permissions.
    Direct,
    /// Written through the elevation mechanism.
    Elevated,
}

/// Decides whether the current user can write into a directory.
pub trait WriteProbe {
    fn can_write(&self, dir: &Path) -> bool;
}

/// Probes by creating and removing a temporary file in the nearest existing
/// ancestor of the directory. Nothing is created if the directory is missing.
#[derive(Debug, Default, Clone, Copy)]
pub struct TempFileProbe;

impl WriteProbe for TempFileProbe {
    fn can_write(&self, dir: &Path) -> bool {
        let Some(existing) = dir.ancestors().find(|p| p.is_dir()) else {
            return false;
        };
        match Builder::new().prefix(".bisup-probe-").tempfile_in(existing) {
            Ok(_) => true,
            Err(err) => {
                tracing::debug!(dir = %existing.display(), %err, "directory is not writable");
                false
            }
        }
    }
}

pub struct Installer<'a> {
    elevator: &'a dyn Elevate,
    probe: &'a dyn WriteProbe,
}

impl<'a> Installer<'a> {
    pub fn new(elevator: &'a dyn Elevate, probe: &'a dyn WriteProbe) -> Self {
        Self { elevator, probe }
    }

    /// Write `payload` to `target`, escalating only if the directory is not
    /// writable by the current user.
    pub fn install(&self, payload: &[u8], target: &InstallTarget) -> Result<InstallOutcome> {
        if self.probe.can_write(target.directory()) {
            tracing::debug!(dir = %target.directory().display(), "installing without elevation");
            write_direct(payload, target)?;
            Ok(InstallOutcome::Direct)
        } else {
            self.write_elevated(payload, target)?;
            Ok(InstallOutcome::Elevated)
        }
    }

    fn write_elevated(&self, payload: &[u8], target: &InstallTarget) -> Result<()> {
        let dir = target.directory();
        print_warn!(
            "You don't have permission to write to {}, asking for elevated permissions...",
            dir.display()
        );
        self.elevator.create_dir(dir).map_err(|err| InstallError::permission_denied(dir, err))?;

        // Staged at normal privilege so only the directory creation and the move run elevated.
        let mut staged = Builder::new()
            .prefix(".biscli-")
            .tempfile()
            .map_err(|err| InstallError::permission_denied(std::env::temp_dir(), err))?;
        write_executable(&mut staged, payload)
            .map_err(|err| InstallError::permission_denied(staged.path(), err))?;
        let staged = staged.into_temp_path();

        let bin = target.binary_path();
        self.elevator.move_file(&staged, bin).map_err(|err| InstallError::permission_denied(bin, err))?;
        // `staged` is removed on drop if the move did not happen.
        Ok(())
    }
}

/// Stage next to the destination, then rename over it, so a rerun replaces
/// the previous binary in one step.
fn write_direct(payload: &[u8], target: &InstallTarget) -> Result<()> {
    let dir = target.directory();
    fs::create_dir_all(dir).map_err(|err| InstallError::permission_denied(dir, err))?;
    let mut staged = Builder::new()
        .prefix(".biscli-install-")
        .tempfile_in(dir)
        .map_err(|err| InstallError::permission_denied(dir, err))?;
    write_executable(&mut staged, payload)
        .map_err(|err| InstallError::permission_denied(staged.path(), err))?;
    let bin = target.binary_path();
    staged.persist(bin).map_err(|err| InstallError::permission_denied(bin, err.error))?;
    Ok(())
}

fn write_executable(file: &mut NamedTempFile, payload: &[u8]) -> io::Result<()> {
    file.write_all(payload)?;
    file.as_file().sync_all()?;
    #[cfg(unix)]
    fs::set_permissions(file.path(), fs::Permissions::from_mode(0o755))?;
    Ok(())
}
