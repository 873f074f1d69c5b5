// Copyright 2026 the Map/Reduce Diagram Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! LaTeX to PDF via DVI and PostScript.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{Result, TaskError};
use crate::util::require_command;

/// Extensions removed by [`clean`].
pub const CLEAN_EXTENSIONS: [&str; 3] = ["dvi", "aux", "log"];

/// Runs external programs.
pub trait Runner {
    /// Runs `program` with `args` inside `dir` and fails unless it exits
    /// successfully.
    fn run(&mut self, dir: &Path, program: &str, args: &[&str]) -> Result<()>;
}

/// Runs programs as child processes of this one.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl Runner for SystemRunner {
    fn run(&mut self, dir: &Path, program: &str, args: &[&str]) -> Result<()> {
        require_command(program)?;
        let status = Command::new(program)
            .args(args)
            .current_dir(dir)
            .status()?;
        if status.success() {
            return Ok(());
        }
        let mut command = program.to_string();
        for arg in args {
            command.push(' ');
            command.push_str(arg);
        }
        Err(TaskError::CommandFailed {
            command,
            exit_code: status.code().unwrap_or(1),
        })
    }
}

/// Produces `<stem>.pdf` from `tex`, returning the PDF path.
///
/// `latex` runs three times so cross references and the table of contents
/// settle before `dvips` and `ps2pdf`. Every tool runs in the directory
/// holding `tex`, since `latex` writes its output to the working directory.
pub fn typeset(tex: &Path, runner: &mut dyn Runner) -> Result<PathBuf> {
    let name = tex.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("not a file: {}", tex.display()),
        )
    })?;
    let dir = match tex.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let tex_name = Path::new(name);
    let dvi = tex_name.with_extension("dvi");
    let ps = tex_name.with_extension("ps");
    let pdf = tex_name.with_extension("pdf");
    let tex_arg = tex_name.to_string_lossy();
    let dvi_arg = dvi.to_string_lossy();
    let ps_arg = ps.to_string_lossy();
    let pdf_arg = pdf.to_string_lossy();

    for _ in 0..3 {
        runner.run(dir, "latex", &[tex_arg.as_ref()])?;
    }
    runner.run(dir, "dvips", &["-o", ps_arg.as_ref(), dvi_arg.as_ref()])?;
    runner.run(dir, "ps2pdf", &[ps_arg.as_ref(), pdf_arg.as_ref()])?;
    Ok(tex.with_extension("pdf"))
}

/// Whether `target` is missing or older than `source`.
pub fn is_stale(target: &Path, source: &Path) -> Result<bool> {
    if !target.exists() {
        return Ok(true);
    }
    let built = fs::metadata(target)?.modified()?;
    let edited = fs::metadata(source)?.modified()?;
    Ok(edited > built)
}

/// Removes LaTeX intermediates from `dir`. Returns the removed paths.
pub fn clean(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut removed = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| CLEAN_EXTENSIONS.contains(&ext));
        if matches && path.is_file() {
            fs::remove_file(&path)?;
            removed.push(path);
        }
    }
    removed.sort();
    Ok(removed)
}
