// Copyright 2026 the Map/Reduce Diagram Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `buildtasks` command line entry point.

#![forbid(unsafe_code)]

fn main() {
    if let Err(error) = buildtasks::run_from_env() {
        eprintln!("{error}");
        std::process::exit(error.exit_code());
    }
}
