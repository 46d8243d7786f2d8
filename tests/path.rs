#![cfg(unix)]

use std::fs;
use std::path::Path;

use bisup::install::InstallTarget;
use bisup::path::{PathAdvice, advise, export_line};

mod common;
use crate::common::environment;

fn count_exports(rc: &Path, dir: &Path) -> usize {
    let line = export_line(dir);
    fs::read_to_string(rc).unwrap().lines().filter(|l| *l == line).count()
}

#[test]
fn directory_already_on_path_touches_nothing() {
    let home = tempfile::tempdir().unwrap();
    let rc = home.path().join(".zshrc");
    fs::write(&rc, "# zsh\n").unwrap();
    let dir = home.path().join(".local/bin");
    let path = format!("/usr/bin:{}/./", dir.display());
    let env = environment(home.path(), home.path(), &path, Some("/bin/zsh"));
    let target = InstallTarget::new(home.path(), &dir);

    let report = advise(&target, &env);

    assert!(report.on_path);
    assert_eq!(report.advice, PathAdvice::AlreadyOnPath);
    assert_eq!(report.search_path, env.path);
    assert_eq!(report.program, Path::new("biscli"));
    assert_eq!(fs::read_to_string(&rc).unwrap(), "# zsh\n");
}

#[test]
fn missing_directory_is_exported_once_in_zshrc() {
    let home = tempfile::tempdir().unwrap();
    let rc = home.path().join(".zshrc");
    fs::write(&rc, "alias ll='ls -l'\n").unwrap();
    fs::write(home.path().join(".zprofile"), "").unwrap();
    let dir = home.path().join("bin");
    let env = environment(home.path(), home.path(), "/usr/bin:/bin", Some("/usr/bin/zsh"));
    let target = InstallTarget::new(home.path(), &dir);

    let report = advise(&target, &env);

    assert!(!report.on_path);
    assert_eq!(report.advice, PathAdvice::Persisted { rc_file: rc.clone(), appended: true });
    assert_eq!(count_exports(&rc, &dir), 1);
    assert!(fs::read_to_string(&rc).unwrap().starts_with("alias ll='ls -l'\n"));
    assert_eq!(fs::read_to_string(home.path().join(".zprofile")).unwrap(), "");
    assert_eq!(report.search_path.entries()[0], dir);
    assert_eq!(report.program, target.binary_path());

    // A second run finds the line and leaves the file alone.
    let again = advise(&target, &env);
    assert_eq!(again.advice, PathAdvice::Persisted { rc_file: rc.clone(), appended: false });
    assert_eq!(count_exports(&rc, &dir), 1);
    assert_eq!(again.search_path.entries()[0], dir);
}

#[test]
fn non_utf8_startup_file_still_gets_the_export() {
    let home = tempfile::tempdir().unwrap();
    let rc = home.path().join(".bashrc");
    fs::write(&rc, b"# caf\xe9 alias\n").unwrap();
    let dir = home.path().join("bin");
    let env = environment(home.path(), home.path(), "/usr/bin", Some("/bin/bash"));
    let target = InstallTarget::new(home.path(), &dir);

    let report = advise(&target, &env);

    assert_eq!(report.advice, PathAdvice::Persisted { rc_file: rc.clone(), appended: true });
    let bytes = fs::read(&rc).unwrap();
    assert!(bytes.starts_with(b"# caf\xe9 alias\n"));
    assert!(bytes.ends_with(format!("\n{}\n", export_line(&dir)).as_bytes()));

    let again = advise(&target, &env);
    assert_eq!(again.advice, PathAdvice::Persisted { rc_file: rc.clone(), appended: false });
    assert_eq!(fs::read(&rc).unwrap(), bytes);
}

#[test]
fn bash_falls_back_to_bash_profile() {
    let home = tempfile::tempdir().unwrap();
    let profile = home.path().join(".bash_profile");
    fs::write(&profile, "").unwrap();
    let dir = home.path().join(".local/bin");
    let env = environment(home.path(), home.path(), "/usr/bin", Some("/bin/bash"));

    let report = advise(&InstallTarget::new(home.path(), &dir), &env);

    assert_eq!(report.advice, PathAdvice::Persisted { rc_file: profile.clone(), appended: true });
    assert_eq!(count_exports(&profile, &dir), 1);
    assert!(!home.path().join(".bashrc").exists());
}

#[test]
fn unknown_shell_only_warns() {
    let home = tempfile::tempdir().unwrap();
    fs::write(home.path().join(".bashrc"), "").unwrap();
    let dir = home.path().join("bin");
    let env = environment(home.path(), home.path(), "/usr/bin", Some("/usr/bin/fish"));

    let report = advise(&InstallTarget::new(home.path(), &dir), &env);

    assert_eq!(report.advice, PathAdvice::UnrecognizedShell);
    assert_eq!(fs::read_to_string(home.path().join(".bashrc")).unwrap(), "");
    // Still reachable for the rest of this run.
    assert_eq!(report.search_path.entries()[0], dir);
}

#[test]
fn known_shell_without_startup_file_only_warns() {
    let home = tempfile::tempdir().unwrap();
    let dir = home.path().join("bin");
    let env = environment(home.path(), home.path(), "/usr/bin", Some("/bin/zsh"));

    let report = advise(&InstallTarget::new(home.path(), &dir), &env);

    assert_eq!(report.advice, PathAdvice::NoStartupFile);
    assert!(!home.path().join(".zshrc").exists());
    assert!(!home.path().join(".zprofile").exists());
}
