// Copyright 2026 the Map/Reduce Diagram Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Build helpers that travel with the map/reduce diagram.
//!
//! - [`pch`]: patch an Eclipse CDT generated makefile so every object
//!   depends on a precompiled header, then run `make`
//! - [`pad`] and [`typeset`]: mirror a shared Etherpad into a `.tex` file
//!   and typeset it through `latex`, `dvips` and `ps2pdf`

#![forbid(unsafe_code)]

pub mod cli;
pub mod error;
pub mod pad;
pub mod pch;
pub mod typeset;
pub mod util;

pub use cli::{run, run_from_env};
pub use error::{Result, TaskError};
