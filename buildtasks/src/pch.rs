// Copyright 2026 the Map/Reduce Diagram Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Precompiled-header support for Eclipse CDT generated makefiles.
//!
//! CDT regenerates `makefile` and `subdir.mk` on every build configuration
//! change, so the edits here are idempotent: running the patch on an already
//! patched makefile leaves it byte-for-byte unchanged.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::LazyLock;

use clap::Args;
use regex::Regex;

use crate::error::{Result, TaskError};

static DEP_FILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"-MF"[^"]*""#).expect("dep file regex"));
static DEP_TARGET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"-MT"[^"]*""#).expect("dep target regex"));

const OBJECTS_INCLUDE: &str = "-include objects.mk";
const MAKEFILE: &str = "makefile";

/// Arguments for the `pch` task.
#[derive(Debug, Clone, Args)]
pub struct PchArgs {
    /// Header to precompile, relative to the project root.
    #[arg(long, default_value = "src/stdafx.h")]
    pub header: String,

    /// Build directory holding the generated `makefile`.
    #[arg(long, default_value = ".")]
    pub build_dir: PathBuf,

    /// Arguments forwarded to `make`.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub make_args: Vec<String>,
}

/// Patches the makefile in `args.build_dir`, then runs `make` there.
pub fn run_pch(args: PchArgs) -> Result<()> {
    if patch_build_dir(&args.build_dir, &args.header)? {
        eprintln!("Patched {} for {}.gch", MAKEFILE, args.header);
    }

    crate::util::require_command("make")?;
    let status = Command::new("make")
        .args(&args.make_args)
        .current_dir(&args.build_dir)
        .status()?;
    if status.success() {
        Ok(())
    } else {
        let mut command = String::from("make");
        for arg in &args.make_args {
            command.push(' ');
            command.push_str(arg);
        }
        Err(TaskError::CommandFailed {
            command,
            exit_code: status.code().unwrap_or(1),
        })
    }
}

/// Reads, patches and (if anything changed) rewrites `<build_dir>/makefile`.
///
/// `subdir.mk` is read from the header's directory inside `build_dir`, and
/// only when the makefile still lacks the rule that builds the header.
pub fn patch_build_dir(build_dir: &Path, header: &str) -> Result<bool> {
    let makefile = build_dir.join(MAKEFILE);
    let text = fs::read_to_string(&makefile)?;
    let mut lines: Vec<String> = text.lines().map(str::to_owned).collect();

    let subdir_mk = subdir_mk_path(build_dir, header);
    let changed = patch_makefile(&mut lines, header, || {
        Ok(fs::read_to_string(&subdir_mk)?)
    })?;

    if changed {
        fs::write(&makefile, lines.join("\n"))?;
    }
    Ok(changed)
}

fn subdir_mk_path(build_dir: &Path, header: &str) -> PathBuf {
    let dir = Path::new(header).parent().unwrap_or_else(|| Path::new(""));
    build_dir.join(dir).join("subdir.mk")
}

/// Applies the precompiled-header edits to `lines` in place.
///
/// Returns whether anything changed. `subdir_mk` is called at most once, to
/// supply the compiler command for the header rule.
pub fn patch_makefile(
    lines: &mut Vec<String>,
    header: &str,
    subdir_mk: impl FnOnce() -> Result<String>,
) -> Result<bool> {
    let mut changed = false;

    // The dependency file can only be pulled in once objects.mk is.
    let dep_line = format!("CPP_DEPS += {header}.gch.d");
    let objects = lines
        .iter()
        .position(|l| l == OBJECTS_INCLUDE)
        .ok_or(TaskError::MissingLine {
            what: OBJECTS_INCLUDE,
        })?;
    if lines.get(objects + 1) != Some(&dep_line) {
        lines.insert(objects + 1, dep_line);
        changed = true;
    }

    let objects_rule = format!("$(OBJS):%.o:../{header}.gch");
    if !lines.contains(&objects_rule) {
        lines.extend([String::new(), objects_rule, String::new()]);
        changed = true;
    }

    let gch_rule = format!("../{header}.gch: ../{header} ../.cproject ../.project");
    if !lines.iter().any(|l| l.starts_with(&gch_rule)) {
        let source = subdir_mk()?;
        let command = compiler_command(&source, header)?;
        lines.extend([String::new(), gch_rule, command]);
        changed = true;
    }

    let clean = lines
        .iter()
        .position(|l| l.starts_with("clean:"))
        .ok_or(TaskError::MissingLine { what: "clean:" })?;
    let gch = format!("{header}.gch");
    if !lines.get(clean + 1).is_some_and(|l| l.contains(&gch)) {
        lines.insert(clean + 1, format!("\trm -f {header}.gch.d ../{header}.gch"));
        changed = true;
    }

    Ok(changed)
}

/// Takes the first `g++` recipe line from `subdir.mk` and points its
/// dependency output at the header's `.gch.d` file.
fn compiler_command(subdir_mk: &str, header: &str) -> Result<String> {
    let line = subdir_mk
        .lines()
        .find(|l| l.starts_with("\tg++"))
        .ok_or(TaskError::MissingCompilerCommand)?;
    let dep = format!("{header}.gch.d");
    let line = DEP_FILE_RE.replace_all(line, format!(r#"-MF"{dep}""#).as_str());
    let line = DEP_TARGET_RE.replace_all(&line, format!(r#"-MT"{dep}""#).as_str());
    Ok(line.into_owned())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use crate::error::TaskError;

    use super::{patch_build_dir, patch_makefile};

    const HEADER: &str = "src/stdafx.h";

    const MAKEFILE: &str = "\
-include ../makefile.init

RM := rm -rf

-include sources.mk
-include src/subdir.mk
-include subdir.mk
-include objects.mk

all: demo

demo: $(OBJS) $(USER_OBJS)
\tg++  -o\"demo\" $(OBJS) $(USER_OBJS) $(LIBS)

clean:
\t-$(RM) $(OBJS)$(C++_DEPS)$(EXECUTABLES) demo
\t-@echo ' '";

    const SUBDIR_MK: &str = "\
src/%.o: ../src/%.cpp
\t@echo 'Building file: $<'
\tg++ -O0 -g3 -Wall -c -fmessage-length=0 -MMD -MP -MF\"$(@:%.o=%.d)\" -MT\"$(@:%.o=%.d)\" -o\"$@\" \"$<\"
\t@echo 'Finished building: $<'";

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(str::to_owned).collect()
    }

    #[test]
    fn fresh_makefile_gets_all_four_edits() {
        let mut makefile = lines(MAKEFILE);
        let changed = patch_makefile(&mut makefile, HEADER, || Ok(SUBDIR_MK.to_string())).unwrap();
        assert!(changed);

        let objects = makefile.iter().position(|l| l == "-include objects.mk").unwrap();
        assert_eq!(makefile[objects + 1], "CPP_DEPS += src/stdafx.h.gch.d");
        assert!(makefile.contains(&"$(OBJS):%.o:../src/stdafx.h.gch".to_string()));

        let rule = makefile
            .iter()
            .position(|l| l == "../src/stdafx.h.gch: ../src/stdafx.h ../.cproject ../.project")
            .unwrap();
        assert_eq!(
            makefile[rule + 1],
            "\tg++ -O0 -g3 -Wall -c -fmessage-length=0 -MMD -MP \
             -MF\"src/stdafx.h.gch.d\" -MT\"src/stdafx.h.gch.d\" -o\"$@\" \"$<\""
        );

        let clean = makefile.iter().position(|l| l == "clean:").unwrap();
        assert_eq!(
            makefile[clean + 1],
            "\trm -f src/stdafx.h.gch.d ../src/stdafx.h.gch"
        );
    }

    #[test]
    fn second_patch_is_a_no_op() {
        let mut makefile = lines(MAKEFILE);
        patch_makefile(&mut makefile, HEADER, || Ok(SUBDIR_MK.to_string())).unwrap();
        let once = makefile.clone();

        let changed = patch_makefile(&mut makefile, HEADER, || {
            panic!("subdir.mk must not be read once the rule exists")
        })
        .unwrap();
        assert!(!changed);
        assert_eq!(makefile, once);
    }

    #[test]
    fn missing_objects_include_is_reported() {
        let mut makefile = lines("all: demo\n\nclean:\n\trm demo");
        let error = patch_makefile(&mut makefile, HEADER, || Ok(SUBDIR_MK.to_string()))
            .unwrap_err();
        assert!(matches!(
            error,
            TaskError::MissingLine {
                what: "-include objects.mk"
            }
        ));
    }

    #[test]
    fn missing_clean_rule_is_reported() {
        let mut makefile = lines("-include objects.mk\n\nall: demo");
        let error = patch_makefile(&mut makefile, HEADER, || Ok(SUBDIR_MK.to_string()))
            .unwrap_err();
        assert!(matches!(error, TaskError::MissingLine { what: "clean:" }));
    }

    #[test]
    fn subdir_mk_without_compiler_is_reported() {
        let mut makefile = lines(MAKEFILE);
        let error = patch_makefile(&mut makefile, HEADER, || {
            Ok("src/%.o: ../src/%.cpp\n\t@echo nothing".to_string())
        })
        .unwrap_err();
        assert!(matches!(error, TaskError::MissingCompilerCommand));
    }

    #[test]
    fn build_dir_is_rewritten_only_when_changed() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("makefile"), MAKEFILE).unwrap();
        fs::write(dir.path().join("src/subdir.mk"), SUBDIR_MK).unwrap();

        assert!(patch_build_dir(dir.path(), HEADER).unwrap());
        let patched = fs::read_to_string(dir.path().join("makefile")).unwrap();
        assert!(!patched.ends_with('\n'));
        assert!(patched.contains("CPP_DEPS += src/stdafx.h.gch.d"));

        // Without subdir.mk the second pass can only succeed by not needing it.
        fs::remove_file(dir.path().join("src/subdir.mk")).unwrap();
        assert!(!patch_build_dir(dir.path(), HEADER).unwrap());
        assert_eq!(
            fs::read_to_string(dir.path().join("makefile")).unwrap(),
            patched
        );
    }
}
