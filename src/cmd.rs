use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_cargo::style::CLAP_STYLING;

use crate::bootstrap::{InstallRequest, Session};
use crate::elevate::Sudo;
use crate::environment::Environment;
use crate::error::{InstallError, Result};
use crate::fetch::{DOWNLOAD_BASE, Endpoints, HttpFetcher, LATEST_URL};
use crate::install::{BIN_NAME, TempFileProbe};
use crate::platform::{PlatformKey, resolve_platform};
use crate::tour::{ProcessRunner, Terminal, Tour, TourOptions};
use crate::version::LATEST;

const LOGO: &str = r"
 ____  _                     _   _
| __ )(_)___ _ __ ___  _   _| |_| |__
|  _ \| / __| '_ ` _ \| | | | __| '_ \
| |_) | \__ \ | | | | | |_| | |_| | | |
|____/|_|___/_| |_| |_|\__,_|\__|_| |_|
";

fn banner() -> String {
    format!("\x1b[35m{LOGO}\x1b[0m")
}

#[derive(Debug, Parser)]
#[command(
    version,
    about = "Installer and quickstart for the Bismuth CLI",
    display_name = "bisup",
    styles = CLAP_STYLING
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Install the Bismuth CLI
    Install(InstallArgs),
    /// See how to use the Bismuth CLI
    Quickstart(QuickstartArgs),
}

#[derive(Debug, Args)]
struct InstallArgs {
    /// Directory to install the CLI [default: ~/bin if it exists, else ~/.local/bin]
    #[arg(long, env = "BISUP_INSTALL_DIR")]
    dir: Option<PathBuf>,
    /// Version to install
    #[arg(long, env = "BISUP_CLI_VERSION", default_value = LATEST)]
    cli_version: String,
    /// Skip the quickstart tour after installing
    #[arg(long)]
    no_quickstart: bool,
    #[command(flatten)]
    endpoints: EndpointArgs,
}

#[derive(Debug, Args)]
struct EndpointArgs {
    #[arg(long, env = "BISUP_LATEST_URL", default_value = LATEST_URL, hide = true)]
    latest_url: String,
    #[arg(long, env = "BISUP_DOWNLOAD_BASE", default_value = DOWNLOAD_BASE, hide = true)]
    download_base: String,
}

#[derive(Debug, Args)]
struct QuickstartArgs {
    /// Path to installed Bismuth CLI
    #[arg(long, default_value = BIN_NAME)]
    cli: PathBuf,
    /// Skip the login step
    #[arg(long)]
    no_login: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let env = Environment::capture()?;
    match cli.command {
        Commands::Install(args) => install(args, &env),
        Commands::Quickstart(args) => quickstart(args, &env),
    }
}

fn install(args: InstallArgs, env: &Environment) -> Result<()> {
    // Unsupported hosts stop here, before any directory or network work.
    let triple = resolve_platform()?;
    tracing::debug!(%triple, "host is supported");
    println!("{}", banner());
    let dir = match args.dir {
        Some(dir) => dir,
        None => env.default_install_dir().ok_or(InstallError::HomeDirUnavailable)?,
    };
    let request = InstallRequest {
        platform: PlatformKey::host(),
        dir,
        version: args.cli_version,
        endpoints: Endpoints {
            latest_url: args.endpoints.latest_url,
            download_base: args.endpoints.download_base,
        },
    };
    let fetcher = HttpFetcher::new()?;
    let session = Session { fetcher: &fetcher, elevator: &Sudo, probe: &TempFileProbe };
    let report = session.install(&request, env)?;

    if !args.no_quickstart {
        println!();
        let mut terminal = Terminal::new()?;
        Tour::new(report.tour_options(env), &mut terminal, &mut ProcessRunner).run()?;
    }
    Ok(())
}

fn quickstart(args: QuickstartArgs, env: &Environment) -> Result<()> {
    let options = TourOptions {
        program: args.cli,
        login: !args.no_login,
        workdir: env.cwd.clone(),
        search_path: None,
    };
    let mut terminal = Terminal::new()?;
    Tour::new(options, &mut terminal, &mut ProcessRunner).run()?;
    Ok(())
}

#[test]
fn verify_cli() {
    use clap::CommandFactory;
    Cli::command().debug_assert();
}

#[test]
fn install_defaults_to_latest_with_quickstart() {
    let cli = Cli::try_parse_from(["bisup", "install"]).unwrap();
    let Commands::Install(args) = cli.command else { panic!("expected install") };
    assert_eq!(args.cli_version, LATEST);
    assert!(!args.no_quickstart);
    assert_eq!(args.endpoints.latest_url, LATEST_URL);
}

#[test]
fn quickstart_accepts_cli_path_and_skip_login() {
    let cli =
        Cli::try_parse_from(["bisup", "quickstart", "--cli", "/opt/bin/biscli", "--no-login"]).unwrap();
    let Commands::Quickstart(args) = cli.command else { panic!("expected quickstart") };
    assert_eq!(args.cli, PathBuf::from("/opt/bin/biscli"));
    assert!(args.no_login);
}

#[test]
fn banner_is_the_magenta_logo() {
    let banner = banner();
    assert!(banner.starts_with("\x1b[35m") && banner.ends_with("\x1b[0m"));
    let rows: Vec<&str> = LOGO.lines().filter(|l| !l.is_empty()).collect();
    assert_eq!(rows.len(), 5);
    assert!(rows.iter().all(|row| banner.contains(row)));
    assert_eq!(rows[4], r"|____/|_|___/_| |_| |_|\__,_|\__|_| |_|");
}
