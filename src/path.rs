//! Search path membership and shell startup file updates.

use std::env;
use std::ffi::{OsStr, OsString};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use crate::environment::Environment;
use crate::install::{BIN_NAME, InstallTarget};

/// Make `path` absolute against `base` and fold `.` and `..` lexically.
/// Symlinks are not resolved.
pub fn normalize(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() { path.to_path_buf() } else { base.join(path) };
    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Executable search path for this run.
///
/// Updated copies are handed to the subprocesses the tour spawns; the process
/// environment itself is left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPath(Vec<PathBuf>);

impl SearchPath {
    pub fn parse(value: Option<&OsStr>) -> Self {
        Self(value.map(|v| env::split_paths(v).collect()).unwrap_or_default())
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.0
    }

    /// Whether `dir` is listed, comparing normalized forms.
    pub fn contains(&self, dir: &Path, cwd: &Path) -> bool {
        let wanted = normalize(cwd, dir);
        self.0.iter().any(|entry| normalize(cwd, entry) == wanted)
    }

    pub fn prepend(&mut self, dir: PathBuf) {
        self.0.insert(0, dir);
    }

    /// Join back into a `PATH` value.
    pub fn to_os_string(&self) -> io::Result<OsString> {
        env::join_paths(&self.0).map_err(io::Error::other)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shell {
    Zsh,
    Bash,
}

impl Shell {
    fn detect(shell: &str) -> Option<Self> {
        if shell.contains("zsh") {
            Some(Shell::Zsh)
        } else if shell.contains("bash") {
            Some(Shell::Bash)
        } else {
            None
        }
    }

    /// Candidates in order of preference, relative to the home directory.
    fn startup_files(self) -> &'static [&'static str] {
        match self {
            Shell::Zsh => &[".zshrc", ".zprofile"],
            Shell::Bash => &[".bashrc", ".bash_profile"],
        }
    }
}

/// What was done about the install directory missing from the search path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathAdvice {
    AlreadyOnPath,
    /// `rc_file` now exports the directory. `appended` is false when an
    /// identical export line was already there.
    Persisted { rc_file: PathBuf, appended: bool },
    UnrecognizedShell,
    NoStartupFile,
    WriteFailed { rc_file: PathBuf, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathReport {
    /// Whether the install directory was on the search path before this run.
    pub on_path: bool,
    pub advice: PathAdvice,
    /// Search path later steps of this run should hand to subprocesses.
    pub search_path: SearchPath,
    /// How later steps should invoke the installed binary.
    pub program: PathBuf,
}

pub fn export_line(dir: &Path) -> String {
    format!("export PATH=\"{}:$PATH\"", dir.display())
}

/// Check that the install directory is reachable through the search path and
/// persist it to the user's shell startup file when it is not.
///
/// Never fails: anything that cannot be done automatically becomes a warning.
pub fn advise(target: &InstallTarget, env: &Environment) -> PathReport {
    let dir = target.directory();
    let mut search_path = env.path.clone();
    if search_path.contains(dir, &env.cwd) {
        tracing::debug!(dir = %dir.display(), "install directory already on PATH");
        return PathReport {
            on_path: true,
            advice: PathAdvice::AlreadyOnPath,
            search_path,
            program: PathBuf::from(BIN_NAME),
        };
    }

    let advice = persist(dir, env);
    match &advice {
        PathAdvice::Persisted { rc_file, appended: true } => {
            print_success!("Updated $PATH in {}", rc_file.display());
            print_info!(
                "You'll need to close and reopen any existing terminals to use '{BIN_NAME}' in them."
            );
        }
        PathAdvice::Persisted { rc_file, appended: false } => {
            print_info!("{} already adds {} to $PATH.", rc_file.display(), dir.display());
            print_info!(
                "You'll need to close and reopen any existing terminals to use '{BIN_NAME}' in them."
            );
        }
        _ => print_warn!(
            "{} is not in your $PATH - you'll need to add it to your shell rc",
            dir.display()
        ),
    }

    search_path.prepend(dir.to_path_buf());
    PathReport {
        on_path: false,
        advice,
        search_path,
        program: target.binary_path().to_path_buf(),
    }
}

fn persist(dir: &Path, env: &Environment) -> PathAdvice {
    let Some(shell) = env.shell.as_deref().and_then(Shell::detect) else {
        tracing::debug!(shell = ?env.shell, "unrecognized shell");
        return PathAdvice::UnrecognizedShell;
    };
    let Some(home) = env.home.as_deref() else {
        return PathAdvice::NoStartupFile;
    };
    let Some(rc_file) =
        shell.startup_files().iter().map(|name| home.join(name)).find(|path| path.is_file())
    else {
        return PathAdvice::NoStartupFile;
    };
    match append_once(&rc_file, &export_line(dir)) {
        Ok(appended) => PathAdvice::Persisted { rc_file, appended },
        Err(err) => {
            tracing::warn!(rc_file = %rc_file.display(), %err, "could not update startup file");
            PathAdvice::WriteFailed { rc_file, reason: err.to_string() }
        }
    }
}

/// Append `line` unless the file already has it. Returns whether it wrote.
///
/// The file is compared as raw bytes; startup files are not required to be UTF-8.
fn append_once(rc_file: &Path, line: &str) -> io::Result<bool> {
    let contents = fs::read(rc_file)?;
    if contents.split(|&b| b == b'\n').any(|existing| existing.trim_ascii() == line.as_bytes()) {
        return Ok(false);
    }
    let mut file = OpenOptions::new().append(true).open(rc_file)?;
    write!(file, "\n{line}\n")?;
    Ok(true)
}
