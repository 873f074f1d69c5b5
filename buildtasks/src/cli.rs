// Copyright 2026 the Map/Reduce Diagram Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Command line parsing and dispatch.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::error::Result;
use crate::pad::{DEFAULT_HOST, DEFAULT_PAD, DEFAULT_TEX, EtherpadFile, HttpFetcher};
use crate::pch::{PchArgs, run_pch};
use crate::typeset::{SystemRunner, clean, is_stale, typeset};

/// Command line of the `buildtasks` binary.
#[derive(Debug, Parser)]
#[command(
    name = "buildtasks",
    about = "Build helpers: precompiled headers for CDT makefiles and pad-to-PDF typesetting",
    version
)]
pub struct Cli {
    /// Task to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available tasks.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Patch the generated makefile for a precompiled header, then run make.
    Pch(PchArgs),

    /// Copy a pad to its local .tex file if it changed.
    Pad(PadArgs),

    /// Fetch the pad and typeset it to PDF.
    Pdf(PdfArgs),

    /// Remove .dvi, .aux and .log files.
    Clean(CleanArgs),
}

/// Which pad to mirror and where.
#[derive(Debug, Clone, Args)]
pub struct PadArgs {
    /// Etherpad host.
    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// Pad id.
    #[arg(long, default_value = DEFAULT_PAD)]
    pub pad: String,

    /// Local file the pad is written to.
    #[arg(long, default_value = DEFAULT_TEX)]
    pub tex: PathBuf,
}

/// Arguments for the `pdf` task.
#[derive(Debug, Clone, Args)]
pub struct PdfArgs {
    /// Pad to typeset.
    #[command(flatten)]
    pub pad: PadArgs,

    /// Typeset the local file without fetching the pad.
    #[arg(long)]
    pub offline: bool,

    /// Rebuild even if the PDF is newer than the source.
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `clean` task.
#[derive(Debug, Clone, Args)]
pub struct CleanArgs {
    /// Directory to clean.
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,
}

/// Parses the process arguments and runs the selected task.
pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}

/// Runs a parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Pch(args) => run_pch(args),
        Commands::Pad(args) => {
            sync_pad(&args)?;
            Ok(())
        }
        Commands::Pdf(args) => run_pdf(&args),
        Commands::Clean(args) => {
            for path in clean(&args.dir)? {
                eprintln!("rm {}", path.display());
            }
            Ok(())
        }
    }
}

fn sync_pad(args: &PadArgs) -> Result<bool> {
    let fetcher = HttpFetcher::new(args.host.as_str())?;
    EtherpadFile::new(&args.tex, args.pad.as_str(), fetcher).sync()
}

fn run_pdf(args: &PdfArgs) -> Result<()> {
    let changed = !args.offline && sync_pad(&args.pad)?;
    let pdf = args.pad.tex.with_extension("pdf");
    if !changed && !args.force && !is_stale(&pdf, &args.pad.tex)? {
        eprintln!("{} is up to date.", pdf.display());
        return Ok(());
    }
    typeset(&args.pad.tex, &mut SystemRunner)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use clap::Parser;

    use super::{CleanArgs, Cli, Commands, run};

    #[test]
    fn pch_forwards_trailing_make_arguments() {
        let cli = Cli::parse_from(["buildtasks", "pch", "--build-dir", "Debug", "all", "-j4"]);
        let Commands::Pch(args) = cli.command else {
            panic!("expected pch");
        };
        assert_eq!(args.header, "src/stdafx.h");
        assert_eq!(args.build_dir, Path::new("Debug"));
        assert_eq!(args.make_args, ["all", "-j4"]);
    }

    #[test]
    fn pdf_defaults_to_demo_pad() {
        let cli = Cli::parse_from(["buildtasks", "pdf", "--offline"]);
        let Commands::Pdf(args) = cli.command else {
            panic!("expected pdf");
        };
        assert!(args.offline);
        assert!(!args.force);
        assert_eq!(args.pad.host, "etherpad.com");
        assert_eq!(args.pad.pad, "iGkKC6cxGU");
        assert_eq!(args.pad.tex, Path::new("demo.tex"));
    }

    #[test]
    fn clean_command_dispatches_successfully() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("demo.log"), "x").unwrap();
        let result = run(Cli {
            command: Commands::Clean(CleanArgs {
                dir: dir.path().to_path_buf(),
            }),
        });
        assert!(result.is_ok());
        assert!(!dir.path().join("demo.log").exists());
    }

    #[test]
    fn unknown_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["buildtasks", "deploy"]).is_err());
    }
}
