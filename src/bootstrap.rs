//! The `install` workflow from platform check to PATH advice.

use std::path::PathBuf;

use crate::elevate::Elevate;
use crate::environment::Environment;
use crate::error::Result;
use crate::fetch::{Endpoints, Fetch, fetch_artifact};
use crate::install::{InstallOutcome, InstallTarget, Installer, WriteProbe};
use crate::path::{PathReport, advise};
use crate::platform::{BuildTriple, PlatformKey};
use crate::tour::TourOptions;
use crate::version::resolve_version;

#[derive(Debug, Clone)]
pub struct InstallRequest {
    pub platform: PlatformKey,
    pub dir: PathBuf,
    pub version: String,
    pub endpoints: Endpoints,
}

/// The collaborators that touch the outside world.
pub struct Session<'a> {
    pub fetcher: &'a dyn Fetch,
    pub elevator: &'a dyn Elevate,
    pub probe: &'a dyn WriteProbe,
}

#[derive(Debug, Clone)]
pub struct InstallReport {
    pub version: String,
    pub target: InstallTarget,
    pub outcome: InstallOutcome,
    pub path: PathReport,
}

impl InstallReport {
    /// Options for a tour that uses the binary just installed.
    pub fn tour_options(&self, env: &Environment) -> TourOptions {
        TourOptions {
            program: self.path.program.clone(),
            login: true,
            workdir: env.cwd.clone(),
            search_path: Some(self.path.search_path.clone()),
        }
    }
}

impl Session<'_> {
    pub fn install(&self, request: &InstallRequest, env: &Environment) -> Result<InstallReport> {
        // Checked first so an unsupported host never reaches the network.
        let triple = BuildTriple::for_key(&request.platform)?;
        let version = resolve_version(&request.version, self.fetcher, &request.endpoints)?.into_owned();
        let target = InstallTarget::new(&env.cwd, &request.dir);
        print_info!("Installing Bismuth CLI {version} to {}", target.directory().display());

        let payload = fetch_artifact(self.fetcher, &request.endpoints, &version, &triple)?;
        let outcome = Installer::new(self.elevator, self.probe).install(&payload, &target)?;
        tracing::info!(?outcome, path = %target.binary_path().display(), "installed");
        print_success!("Installed Bismuth CLI to {}", target.binary_path().display());

        let path = advise(&target, env);
        Ok(InstallReport { version, target, outcome, path })
    }
}
