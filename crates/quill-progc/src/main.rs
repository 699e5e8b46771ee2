//! quill-progc: ahead-of-time compiler for the built-in mode programs.
//!
//! `build` lowers every built-in command table, runs the verifier, and
//! writes the binary program files the editor loads at startup. `verify`
//! re-checks an existing file (useful after copying programs between
//! installs).

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use quill_actions::tables::builtin_programs;
use quill_program::{verify, wire};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "quill-progc", about = "Compile and verify quill input programs")]
struct Cli {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Compile all built-in mode programs into the output directory.
    Build {
        /// Directory the program files are written under.
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Load a program file and run the static verifier over it.
    Verify {
        /// Path to a `.qvp` program file.
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    match Cli::parse().command {
        Cmd::Build { out_dir } => build(out_dir),
        Cmd::Verify { path } => verify_file(path),
    }
}

fn build(out_dir: PathBuf) -> Result<()> {
    for (rel, program) in builtin_programs() {
        verify(&program).with_context(|| format!("{rel}: built-in program failed verification"))?;
        let path = out_dir.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        wire::save(&program, &path).with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(target: "progc", path = %path.display(), insts = program.len(), "program written");
    }
    Ok(())
}

fn verify_file(path: PathBuf) -> Result<()> {
    let program =
        wire::load(&path).with_context(|| format!("loading {}", path.display()))?;
    verify(&program).with_context(|| format!("{} failed verification", path.display()))?;
    tracing::info!(target: "progc", path = %path.display(), insts = program.len(), "program ok");
    println!("{}: ok ({} instructions)", path.display(), program.len());
    Ok(())
}
