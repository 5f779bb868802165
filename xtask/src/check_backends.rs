//! Back-end build matrix
//!
//! The back-end is chosen by `cfg(target_feature)`, so a plain `cargo test`
//! only ever compiles one of them. This command builds and tests each
//! configuration in its own target directory:
//! - SSE2, the default x86_64 target, with the emulated SSE4.1 paths
//! - clippy with `-D warnings` on the default target
//! - AVX2 + SSE4.1 via `RUSTFLAGS`
//! - the scalar back-end via `force-scalar`
//! - the optional `serde` and `tracing` features
//! - NEON, type-checked for `aarch64-unknown-linux-gnu`
//! - the criterion benches

use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::Command;

const CROSS_TARGET: &str = "aarch64-unknown-linux-gnu";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Check,
    Clippy,
    Test,
}

/// One cell of the build matrix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub name: &'static str,
    pub verb: Verb,
    pub features: &'static [&'static str],
    pub rustflags: Option<&'static str>,
    pub target: Option<&'static str>,
    pub benches: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    pub no_cross: bool,
}

impl Options {
    pub fn parse(args: &[String]) -> Result<Self> {
        let mut options = Self::default();
        for arg in args {
            match arg.as_str() {
                "--no-cross" => options.no_cross = true,
                other => bail!("Unknown option for check-backends: {}", other),
            }
        }
        Ok(options)
    }
}

pub fn configs(options: Options) -> Vec<Config> {
    let mut configs = vec![
        Config {
            name: "sse2",
            verb: Verb::Test,
            features: &[],
            rustflags: None,
            target: None,
            benches: false,
        },
        Config {
            name: "clippy",
            verb: Verb::Clippy,
            features: &["serde", "tracing"],
            rustflags: None,
            target: None,
            benches: false,
        },
        Config {
            name: "avx2",
            verb: Verb::Test,
            features: &[],
            rustflags: Some("-C target-feature=+avx2,+sse4.1"),
            target: None,
            benches: false,
        },
        Config {
            name: "scalar",
            verb: Verb::Test,
            features: &["force-scalar", "serde", "tracing"],
            rustflags: None,
            target: None,
            benches: false,
        },
        Config {
            name: "serde-tracing",
            verb: Verb::Test,
            features: &["serde", "tracing"],
            rustflags: None,
            target: None,
            benches: false,
        },
        Config {
            name: "benches",
            verb: Verb::Check,
            features: &[],
            rustflags: None,
            target: None,
            benches: true,
        },
    ];

    if !options.no_cross {
        configs.push(Config {
            name: "neon",
            verb: Verb::Check,
            features: &["serde", "tracing"],
            rustflags: None,
            target: Some(CROSS_TARGET),
            benches: false,
        });
    }

    configs
}

/// Arguments passed to `cargo` for one configuration
pub fn cargo_args(config: &Config) -> Vec<String> {
    let mut args = vec![
        match config.verb {
            Verb::Check => "check",
            Verb::Clippy => "clippy",
            Verb::Test => "test",
        }
        .to_string(),
        "--package".to_string(),
        "rayo".to_string(),
    ];

    if config.benches {
        args.push("--benches".to_string());
    } else if config.verb != Verb::Test {
        args.push("--lib".to_string());
        args.push("--tests".to_string());
    }

    if !config.features.is_empty() {
        args.push("--features".to_string());
        args.push(config.features.join(","));
    }

    if let Some(target) = config.target {
        args.push("--target".to_string());
        args.push(target.to_string());
    }

    if config.verb == Verb::Clippy {
        args.extend(["--", "-D", "warnings"].map(String::from));
    }

    args
}

/// Main entry point for the back-end matrix
pub fn run(options: Options) -> Result<()> {
    println!("{}", "🔧 Checking every back-end configuration...".bold());
    println!();

    let project_root = get_project_root()?;
    let configs = configs(options);
    let mut results = MatrixResults::new(configs.len());

    for (index, config) in configs.iter().enumerate() {
        results.add_step(index + 1, config.name, || run_config(&project_root, config));
    }

    results.print_summary();

    if results.has_failures() {
        bail!("Back-end matrix failed");
    }

    Ok(())
}

fn get_project_root() -> Result<PathBuf> {
    let current = std::env::current_dir().context("Failed to get current directory")?;

    if current.join("xtask").is_dir() && current.join("Cargo.toml").exists() {
        return Ok(current);
    }

    if let Some(parent) = current.parent() {
        if parent.join("Cargo.toml").exists() {
            return Ok(parent.to_path_buf());
        }
    }

    bail!("Could not find project root (no Cargo.toml found)");
}

fn run_config(project_root: &Path, config: &Config) -> Result<()> {
    let mut command = Command::new("cargo");
    command
        .args(cargo_args(config))
        .arg("--quiet")
        .current_dir(project_root)
        // RUSTFLAGS changes invalidate the whole build, so each cell keeps its own cache
        .env(
            "CARGO_TARGET_DIR",
            project_root.join("target").join("xtask").join(config.name),
        );

    match config.rustflags {
        Some(flags) => command.env("RUSTFLAGS", flags),
        None => command.env_remove("RUSTFLAGS"),
    };

    let output = command
        .output()
        .with_context(|| format!("Failed to execute cargo for {}", config.name))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("{} failed:\n{}", config.name, stderr);
    }

    Ok(())
}

struct MatrixResults {
    total: usize,
    steps: Vec<(usize, String, bool)>,
}

impl MatrixResults {
    fn new(total: usize) -> Self {
        Self {
            total,
            steps: Vec::new(),
        }
    }

    fn add_step<F>(&mut self, number: usize, name: &str, f: F)
    where
        F: FnOnce() -> Result<()>,
    {
        print!("Step {}/{}: {}... ", number, self.total, name);

        let success = match f() {
            Ok(()) => {
                println!("{}", "✓".green());
                true
            }
            Err(e) => {
                println!("{}", "✗".red());
                eprintln!("  {}", format!("{}", e).red());
                false
            }
        };
        self.steps.push((number, name.to_string(), success));
    }

    fn has_failures(&self) -> bool {
        self.steps.iter().any(|(_, _, success)| !success)
    }

    fn print_summary(&self) {
        println!();
        println!("{}", "Summary".bold());

        let passed = self.steps.iter().filter(|(_, _, success)| *success).count();
        let failed = self.steps.len() - passed;

        for (number, name, success) in &self.steps {
            let status = if *success { "✓".green() } else { "✗".red() };
            println!("{} Step {}: {}", status, number, name);
        }

        println!();
        println!(
            "Total: {}, Passed: {}, Failed: {}",
            self.steps.len(),
            format!("{}", passed).green(),
            if failed > 0 {
                format!("{}", failed).red()
            } else {
                format!("{}", failed).green()
            }
        );
    }
}
