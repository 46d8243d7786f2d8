//! The quickstart tour run after installing, or on its own via `bisup quickstart`.
//!
//! The tour moves through a handful of [`Stage`]s. Each stage plays static
//! [`script::Step`] lists through an [`Operator`] for prompts and a [`Runner`]
//! for subprocesses, so the whole flow can be driven by test doubles.

pub mod operator;
pub mod runner;
pub mod script;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub use operator::{Operator, Terminal};
pub use runner::{Invocation, ProcessRunner, Runner};
use script::{ScriptContext, Step};

use crate::path::{SearchPath, normalize};

pub const SAMPLE_NAME: &str = "quickstart-sample";
pub const SAMPLE_REPO_URL: &str = "https://github.com/BismuthCloud/quickstart-sample";

#[derive(Debug, thiserror::Error)]
pub enum TourError {
    #[error("`{command}` {}", describe_exit(.code))]
    CommandFailed { command: String, code: Option<i32> },

    #[error("Failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("Quickstart interrupted")]
    Interrupted,

    #[error(transparent)]
    Io(#[from] io::Error),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exited with code {code}"),
        None => "was terminated by a signal".to_owned(),
    }
}

impl TourError {
    pub fn exit_code(&self) -> i32 {
        match self {
            TourError::CommandFailed { code: Some(code), .. } => *code,
            _ => 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TourOptions {
    /// How to invoke the installed CLI: a bare name looked up on `PATH`, or a path.
    pub program: PathBuf,
    pub login: bool,
    /// Directory the sample is cloned into and relative paths resolve against.
    pub workdir: PathBuf,
    /// `PATH` for spawned tools, when it differs from ours.
    pub search_path: Option<SearchPath>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Login,
    ChooseProjectSource,
    SampleWalkthrough,
    OwnProjectWalkthrough,
    Chatting { repo: PathBuf },
    Done,
}

pub struct Tour<'a> {
    options: TourOptions,
    operator: &'a mut dyn Operator,
    runner: &'a mut dyn Runner,
    took_sample: bool,
}

impl<'a> Tour<'a> {
    pub fn new(options: TourOptions, operator: &'a mut dyn Operator, runner: &'a mut dyn Runner) -> Self {
        Self { options, operator, runner, took_sample: false }
    }

    pub fn run(mut self) -> Result<(), TourError> {
        let mut stage = if self.options.login { Stage::Login } else { Stage::ChooseProjectSource };
        while stage != Stage::Done {
            tracing::debug!(?stage, "tour stage");
            stage = self.advance(stage)?;
        }
        Ok(())
    }

    fn advance(&mut self, stage: Stage) -> Result<Stage, TourError> {
        Ok(match stage {
            Stage::Login => {
                self.login()?;
                Stage::ChooseProjectSource
            }
            Stage::ChooseProjectSource => {
                let sample = self.operator.confirm(
                    "Would you like to first go through a guided tour with a sample project (this will use about 50 credits of your initial 100 credits)?",
                    true,
                )?;
                if sample {
                    Stage::SampleWalkthrough
                } else {
                    self.operator.say("Let's import a project you'd like to work on.");
                    Stage::OwnProjectWalkthrough
                }
            }
            Stage::SampleWalkthrough => {
                self.sample()?;
                self.took_sample = true;
                Stage::OwnProjectWalkthrough
            }
            Stage::OwnProjectWalkthrough => Stage::Chatting { repo: self.choose_repository()? },
            Stage::Chatting { repo } => {
                self.chat(&repo)?;
                Stage::Done
            }
            Stage::Done => Stage::Done,
        })
    }

    fn play(&mut self, steps: &[Step], repo: Option<&Path>) -> Result<(), TourError> {
        let ctx = ScriptContext {
            program: &self.options.program,
            repo,
            search_path: self.options.search_path.as_ref(),
        };
        script::play(steps, &ctx, &mut *self.operator, &mut *self.runner)
    }

    fn login(&mut self) -> Result<(), TourError> {
        self.play(script::LOGIN_SCRIPT, None)?;
        match self.credits_remaining() {
            Some(0) => self.operator.say("You'll need to purchase credits to use Bismuth."),
            None => self.operator.say(
                "We couldn't check your credit balance. You may need to purchase credits to use Bismuth.",
            ),
            Some(credits) => {
                tracing::debug!(credits, "credits available");
                return Ok(());
            }
        }
        self.play(script::REFILL_SCRIPT, None)
    }

    /// `None` when the balance could not be read, as opposed to a zero balance.
    pub fn credits_remaining(&mut self) -> Option<u64> {
        let ctx = ScriptContext {
            program: &self.options.program,
            repo: None,
            search_path: self.options.search_path.as_ref(),
        };
        let invocation = ctx.render(script::CREDITS_REMAINING);
        match self.runner.capture(&invocation) {
            Ok(output) => output.trim().parse().ok(),
            Err(err) => {
                tracing::debug!(%err, "credit balance probe failed");
                None
            }
        }
    }

    fn sample(&mut self) -> Result<(), TourError> {
        self.operator.say("Great! You'll be able to import your own project after this tour.");
        self.operator.say("Cloning sample project...");
        let dir = self.options.workdir.join(SAMPLE_NAME);
        remove_path(&dir)?;
        let dest = dir.to_string_lossy().into_owned();
        let clone = Invocation::new("git", ["clone", "--quiet", SAMPLE_REPO_URL, dest.as_str()]);
        self.runner.run(&clone)?;
        self.operator.say("");
        self.operator.say(&format!("The sample project is in {}", dir.display()));
        self.play(script::SAMPLE_SCRIPT, Some(&dir))
    }

    fn choose_repository(&mut self) -> Result<PathBuf, TourError> {
        let cwd = self.options.workdir.clone();
        if is_git_repo(&cwd) && self.operator.confirm("Would you like to use the current directory?", true)? {
            return Ok(cwd);
        }
        loop {
            let answer = self.operator.ask("Path to repository:")?;
            let candidate = normalize(&cwd, Path::new(&answer));
            if is_git_repo(&candidate) {
                return Ok(candidate);
            }
            self.operator.say("Not a git repository");
        }
    }

    fn chat(&mut self, repo: &Path) -> Result<(), TourError> {
        self.play(script::IMPORT_SCRIPT, Some(repo))?;
        if !self.took_sample {
            self.operator.say("🚀 Now you can start chatting!");
        }
        self.play(script::CHAT_SCRIPT, Some(repo))
    }
}

pub fn is_git_repo(dir: &Path) -> bool {
    dir.join(".git").exists()
}

/// Remove whatever is at `path`. Symlinks are removed, never followed.
fn remove_path(path: &Path) -> io::Result<()> {
    let ft = match fs::symlink_metadata(path) {
        Ok(meta) => meta.file_type(),
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(err),
    };
    tracing::debug!(path = %path.display(), "removing existing sample project");
    if ft.is_dir() { fs::remove_dir_all(path) } else { fs::remove_file(path) }
}
