#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bisup::elevate::Elevate;
use bisup::environment::Environment;
use bisup::fetch::Fetch;
use bisup::install::WriteProbe;
use bisup::path::SearchPath;
use bisup::tour::{Invocation, Operator, Runner, TourError};
use bisup::{InstallError, Result};

/// Serves canned bodies and records every requested URL.
#[derive(Default)]
pub struct FakeFetcher {
    responses: HashMap<String, std::result::Result<Vec<u8>, String>>,
    requests: RefCell<Vec<String>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serve(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.responses.insert(url.to_owned(), Ok(body.into()));
        self
    }

    pub fn fail(mut self, url: &str, reason: &str) -> Self {
        self.responses.insert(url.to_owned(), Err(reason.to_owned()));
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl Fetch for FakeFetcher {
    fn get(&self, url: &str) -> Result<Vec<u8>> {
        self.requests.borrow_mut().push(url.to_owned());
        match self.responses.get(url) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(reason)) => {
                Err(InstallError::NetworkFailure { url: url.to_owned(), reason: reason.clone() })
            }
            None => Err(InstallError::NetworkFailure {
                url: url.to_owned(),
                reason: "HTTP status client error (404 Not Found)".to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Elevated {
    CreateDir(PathBuf),
    Move { from: PathBuf, to: PathBuf },
}

/// Performs elevated operations with normal privileges, or refuses them.
#[derive(Default)]
pub struct FakeElevator {
    calls: RefCell<Vec<Elevated>>,
    refuse_create: bool,
    refuse_move: bool,
}

impl FakeElevator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refusing_create() -> Self {
        Self { refuse_create: true, ..Self::default() }
    }

    pub fn refusing_move() -> Self {
        Self { refuse_move: true, ..Self::default() }
    }

    pub fn calls(&self) -> Vec<Elevated> {
        self.calls.borrow().clone()
    }
}

fn declined() -> io::Error {
    io::Error::new(io::ErrorKind::PermissionDenied, "user declined the password prompt")
}

impl Elevate for FakeElevator {
    fn create_dir(&self, dir: &Path) -> io::Result<()> {
        self.calls.borrow_mut().push(Elevated::CreateDir(dir.to_path_buf()));
        if self.refuse_create {
            return Err(declined());
        }
        fs::create_dir_all(dir)
    }

    fn move_file(&self, from: &Path, to: &Path) -> io::Result<()> {
        self.calls
            .borrow_mut()
            .push(Elevated::Move { from: from.to_path_buf(), to: to.to_path_buf() });
        if self.refuse_move {
            return Err(declined());
        }
        // The staging file may live on another filesystem than the target.
        fs::copy(from, to)?;
        fs::remove_file(from)
    }
}

pub struct Probe(pub bool);

impl WriteProbe for Probe {
    fn can_write(&self, _dir: &Path) -> bool {
        self.0
    }
}

/// Answers confirmations and questions from a queue. Pauses never block.
#[derive(Default)]
pub struct ScriptedOperator {
    answers: VecDeque<String>,
    pub transcript: Vec<String>,
}

impl ScriptedOperator {
    pub fn answering(answers: &[&str]) -> Self {
        Self { answers: answers.iter().map(|a| (*a).to_owned()).collect(), transcript: Vec::new() }
    }

    fn next(&mut self) -> std::result::Result<String, TourError> {
        self.answers.pop_front().ok_or(TourError::Interrupted)
    }

    pub fn said(&self, needle: &str) -> bool {
        self.transcript.iter().any(|line| line.contains(needle))
    }
}

impl Operator for ScriptedOperator {
    fn say(&mut self, text: &str) {
        self.transcript.push(text.to_owned());
    }

    fn pause(&mut self, prompt: &str) -> std::result::Result<(), TourError> {
        self.transcript.push(format!("[pause] {prompt}"));
        Ok(())
    }

    fn confirm(&mut self, question: &str, default: bool) -> std::result::Result<bool, TourError> {
        self.transcript.push(format!("[confirm] {question}"));
        Ok(match self.next()?.as_str() {
            "" => default,
            answer => answer == "y",
        })
    }

    fn ask(&mut self, question: &str) -> std::result::Result<String, TourError> {
        self.transcript.push(format!("[ask] {question}"));
        self.next()
    }
}

/// Records invocations instead of spawning anything.
pub struct RecordingRunner {
    pub runs: Vec<Invocation>,
    pub captures: Vec<Invocation>,
    credits: Option<String>,
    failing: Option<(&'static str, i32)>,
}

impl RecordingRunner {
    /// `credits` is what `billing credits-remaining` prints; `None` makes it fail.
    pub fn with_credits(credits: Option<&str>) -> Self {
        Self { runs: Vec::new(), captures: Vec::new(), credits: credits.map(str::to_owned), failing: None }
    }

    /// Make every run whose first argument is `subcommand` exit with `code`.
    pub fn failing_on(mut self, subcommand: &'static str, code: i32) -> Self {
        self.failing = Some((subcommand, code));
        self
    }

    pub fn subcommands(&self) -> Vec<String> {
        self.runs.iter().map(|inv| inv.args.first().cloned().unwrap_or_default()).collect()
    }
}

impl Runner for RecordingRunner {
    fn run(&mut self, invocation: &Invocation) -> std::result::Result<(), TourError> {
        self.runs.push(invocation.clone());
        match self.failing {
            Some((sub, code)) if invocation.args.first().is_some_and(|a| a == sub) => {
                Err(TourError::CommandFailed { command: invocation.to_string(), code: Some(code) })
            }
            _ => Ok(()),
        }
    }

    fn capture(&mut self, invocation: &Invocation) -> std::result::Result<String, TourError> {
        self.captures.push(invocation.clone());
        self.credits.clone().ok_or_else(|| TourError::CommandFailed {
            command: invocation.to_string(),
            code: Some(1),
        })
    }
}

pub fn environment(home: &Path, cwd: &Path, path: &str, shell: Option<&str>) -> Environment {
    Environment {
        path: SearchPath::parse(Some(OsStr::new(path))),
        shell: shell.map(str::to_owned),
        home: Some(home.to_path_buf()),
        cwd: cwd.to_path_buf(),
    }
}

pub fn git_repo(dir: &Path) -> PathBuf {
    fs::create_dir_all(dir.join(".git")).unwrap();
    dir.to_path_buf()
}

#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path).unwrap().permissions().mode() & 0o111 == 0o111
}

#[cfg(not(unix))]
pub fn is_executable(_path: &Path) -> bool {
    true
}
