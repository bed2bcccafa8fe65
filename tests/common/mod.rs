// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed pair of config directories and a
// fluent builder so each integration test can set up both installations
// without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser as _;
use dtmerge::cli::Cli;
use dtmerge::logging::{Log, MemoryLog};
use dtmerge::platform::Platform;

/// Two config directories and an output directory backed by a
/// [`tempfile::TempDir`].
pub struct IntegrationTestContext {
    /// Temporary directory holding `linux/`, `windows/` and `out/`.
    pub root: tempfile::TempDir,
    /// Sink receiving every message of the runs made through [`Self::run`].
    pub log: Arc<MemoryLog>,
}

impl IntegrationTestContext {
    /// Create empty `linux/` and `windows/` config directories.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir_all(root.path().join("linux")).expect("create linux dir");
        std::fs::create_dir_all(root.path().join("windows")).expect("create windows dir");
        Self {
            root,
            log: Arc::new(MemoryLog::new()),
        }
    }

    /// Config directory of `platform`.
    pub fn config_dir(&self, platform: Platform) -> PathBuf {
        self.root.path().join(platform.to_string())
    }

    /// Separate output directory used with `--destination-directory`.
    pub fn out_dir(&self) -> PathBuf {
        self.root.path().join("out")
    }

    /// Read `name` from `dir`.
    pub fn read(&self, dir: &Path, name: &str) -> String {
        std::fs::read_to_string(dir.join(name)).expect("read output file")
    }

    /// Sorted names of every file in `dir`.
    pub fn files_in(&self, dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .map(|entries| {
                entries
                    .map(|e| e.expect("dir entry").file_name().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Parse `args` followed by `-l <linux> -w <windows>`.
    pub fn cli(&self, args: &[&str]) -> Cli {
        let linux = self.config_dir(Platform::Linux);
        let windows = self.config_dir(Platform::Windows);
        let mut argv: Vec<String> = vec!["dtmerge".to_string()];
        argv.extend(args.iter().map(ToString::to_string));
        argv.extend([
            "-l".to_string(),
            linux.display().to_string(),
            "-w".to_string(),
            windows.display().to_string(),
        ]);
        Cli::try_parse_from(argv).expect("parse arguments")
    }

    /// Run the merge command with `args` against this context.
    pub fn run(&self, args: &[&str]) -> anyhow::Result<()> {
        let cli = self.cli(args);
        dtmerge::commands::merge::run(&cli, Arc::clone(&self.log) as Arc<dyn Log>)
    }
}

/// Fluent builder for [`IntegrationTestContext`].
pub struct TestContextBuilder {
    ctx: IntegrationTestContext,
}

impl TestContextBuilder {
    /// Begin building a context with empty config directories.
    pub fn new() -> Self {
        Self {
            ctx: IntegrationTestContext::new(),
        }
    }

    /// Write `content` to `name` in `platform`'s config directory.
    pub fn with_file(self, platform: Platform, name: &str, content: &str) -> Self {
        let path = self.ctx.config_dir(platform).join(name);
        std::fs::write(path, content).expect("write config file");
        self
    }

    /// Write `content` to `name` at the context root (e.g. a profile).
    pub fn with_root_file(self, name: &str, content: &str) -> Self {
        std::fs::write(self.ctx.root.path().join(name), content).expect("write root file");
        self
    }

    /// Set the modification time of `name` in `platform`'s config directory
    /// to `secs` seconds after a fixed base time.
    pub fn with_mtime(self, platform: Platform, name: &str, secs: u64) -> Self {
        let base = std::time::SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(1_700_000_000);
        let file = std::fs::File::options()
            .write(true)
            .open(self.ctx.config_dir(platform).join(name))
            .expect("open file for mtime");
        file.set_modified(base + std::time::Duration::from_secs(secs))
            .expect("set mtime");
        self
    }

    /// Finish building and return the configured context.
    pub fn build(self) -> IntegrationTestContext {
        self.ctx
    }
}
