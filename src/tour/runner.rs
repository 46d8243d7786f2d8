use std::borrow::Cow;
use std::fmt;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use super::TourError;
use crate::path::SearchPath;

/// A subprocess the tour wants to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    /// `PATH` for the child. `None` inherits ours.
    pub search_path: Option<SearchPath>,
}

impl Invocation {
    pub fn new<I, S>(program: impl Into<PathBuf>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { program: program.into(), args: args.into_iter().map(Into::into).collect(), search_path: None }
    }

    pub fn with_search_path(mut self, search_path: Option<SearchPath>) -> Self {
        self.search_path = search_path;
        self
    }
}

fn needs_quoting(arg: &str) -> bool {
    arg.is_empty()
        || !arg.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | ':' | '=' | '@' | '+' | ','))
}

/// Quote `word` for a POSIX shell if it has anything beyond plain path characters.
pub(crate) fn shell_word(word: &str) -> Cow<'_, str> {
    if needs_quoting(word) {
        Cow::Owned(format!("'{}'", word.replace('\'', r"'\''")))
    } else {
        Cow::Borrowed(word)
    }
}

/// Renders the way a user would type it into a POSIX shell.
impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let program = self.program.to_string_lossy();
        let words = std::iter::once(program.as_ref()).chain(self.args.iter().map(String::as_str));
        for (i, word) in words.enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(&shell_word(word))?;
        }
        Ok(())
    }
}

pub trait Runner {
    /// Run with the terminal attached and wait for it to exit.
    fn run(&mut self, invocation: &Invocation) -> Result<(), TourError>;
    /// Run and return what it wrote to stdout.
    fn capture(&mut self, invocation: &Invocation) -> Result<String, TourError>;
}

/// Spawns real processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl ProcessRunner {
    fn command(invocation: &Invocation) -> Result<Command, TourError> {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);
        if let Some(search_path) = &invocation.search_path {
            cmd.env("PATH", search_path.to_os_string()?);
        }
        Ok(cmd)
    }
}

impl Runner for ProcessRunner {
    fn run(&mut self, invocation: &Invocation) -> Result<(), TourError> {
        tracing::debug!(command = %invocation, "running");
        let status = Self::command(invocation)?
            .status()
            .map_err(|source| TourError::Spawn { command: invocation.to_string(), source })?;
        if status.success() {
            Ok(())
        } else {
            Err(TourError::CommandFailed { command: invocation.to_string(), code: status.code() })
        }
    }

    fn capture(&mut self, invocation: &Invocation) -> Result<String, TourError> {
        tracing::debug!(command = %invocation, "capturing");
        let output = Self::command(invocation)?
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|source| TourError::Spawn { command: invocation.to_string(), source })?;
        if !output.status.success() {
            return Err(TourError::CommandFailed {
                command: invocation.to_string(),
                code: output.status.code(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_quotes_only_when_needed() {
        let inv = Invocation::new("biscli", ["import", "/home/dev/my project", "--upload"]);
        assert_eq!(inv.to_string(), "biscli import '/home/dev/my project' --upload");

        let inv = Invocation::new("biscli", ["chat", "--repo", "/srv/it's"]);
        assert_eq!(inv.to_string(), r"biscli chat --repo '/srv/it'\''s'");
    }
}
