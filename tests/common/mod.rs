// Shared helpers for integration tests.
//
// Provides a temporary home directory and confix root so each integration
// test can drive the `confix` binary in an isolated environment without
// repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;

/// An isolated environment backed by a [`tempfile::TempDir`].
///
/// Layout:
///
/// ```text
/// <tmp>/home    HOME for the spawned binary
/// <tmp>/root    --root-dir
/// <tmp>/cache   XDG_CACHE_HOME (log files)
/// ```
pub struct TestEnv {
    /// Temporary directory holding everything.
    pub dir: tempfile::TempDir,
}

impl TestEnv {
    /// Create a new environment with an empty home directory.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir_all(dir.path().join("home")).expect("create home dir");
        Self { dir }
    }

    /// Home directory seen by the binary.
    pub fn home(&self) -> PathBuf {
        self.dir.path().join("home")
    }

    /// Root directory passed with `--root-dir`.
    pub fn root(&self) -> PathBuf {
        self.dir.path().join("root")
    }

    /// Default repository inside the root.
    pub fn repo(&self) -> PathBuf {
        self.root().join("dotfiles")
    }

    /// Write `content` to `<home>/<rel>`, creating parents, and return the path.
    pub fn home_file(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.home().join(rel);
        std::fs::create_dir_all(path.parent().expect("parent")).expect("create parent");
        std::fs::write(&path, content).expect("write home file");
        path
    }

    /// Write an executable shell script exiting with `code` and return its path.
    #[cfg(unix)]
    pub fn script(&self, name: &str, code: i32) -> PathBuf {
        use std::os::unix::fs::PermissionsExt as _;
        let path = self.dir.path().join(name);
        std::fs::write(&path, format!("#!/bin/sh\nexit {code}\n")).expect("write script");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("chmod script");
        path
    }

    /// A `confix` command bound to this environment.
    pub fn confix(&self) -> assert_cmd::Command {
        self.confix_with_root("--root-dir", &self.root())
    }

    /// A `confix` command using `root` as root directory, passed with `flag`.
    pub fn confix_with_root(&self, flag: &str, root: &Path) -> assert_cmd::Command {
        let mut cmd = cargo_bin_cmd!("confix");
        cmd.arg(flag)
            .arg(root)
            .env("HOME", self.home())
            .env("XDG_CACHE_HOME", self.dir.path().join("cache"))
            .env_remove("XDG_CONFIG_HOME");
        cmd
    }
}

/// Whether `path` is a symlink.
pub fn is_symlink(path: &Path) -> bool {
    path.symlink_metadata().is_ok_and(|m| m.is_symlink())
}
