// Copyright 2026 the Map/Reduce Diagram Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keeping a local `.tex` file in step with a shared Etherpad.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::Result;

/// Default Etherpad host.
pub const DEFAULT_HOST: &str = "etherpad.com";
/// Pad holding the demo document.
pub const DEFAULT_PAD: &str = "iGkKC6cxGU";
/// Local file the demo pad is written to.
pub const DEFAULT_TEX: &str = "demo.tex";

/// Plain-text export URL for the latest revision of `pad`.
#[must_use]
pub fn export_url(host: &str, pad: &str) -> String {
    format!("http://{host}/ep/pad/export/{pad}/latest?format=txt")
}

/// Source of pad contents.
pub trait PadFetcher {
    /// Returns the current text of `pad`.
    fn fetch(&self, pad: &str) -> Result<String>;
}

/// Fetches pads over HTTP from one Etherpad host.
#[derive(Debug)]
pub struct HttpFetcher {
    host: String,
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher for `host`.
    pub fn new(host: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            host: host.into(),
            client,
        })
    }
}

impl PadFetcher for HttpFetcher {
    fn fetch(&self, pad: &str) -> Result<String> {
        let url = export_url(&self.host, pad);
        eprint!("Getting {url}... ");
        let text = self
            .client
            .get(&url)
            .send()?
            .error_for_status()?
            .text()?;
        eprintln!("done.");
        Ok(text)
    }
}

/// A local file mirrored from a pad.
///
/// The remote text is fetched at most once per value, however many times
/// [`is_needed`](Self::is_needed) and [`sync`](Self::sync) are called.
#[derive(Debug)]
pub struct EtherpadFile<F> {
    path: PathBuf,
    pad: String,
    fetcher: F,
    remote: Option<String>,
}

impl<F: PadFetcher> EtherpadFile<F> {
    /// Mirrors `pad` into `path`.
    pub fn new(path: impl Into<PathBuf>, pad: impl Into<String>, fetcher: F) -> Self {
        Self {
            path: path.into(),
            pad: pad.into(),
            fetcher,
            remote: None,
        }
    }

    /// The pad's text with surrounding whitespace trimmed.
    pub fn remote(&mut self) -> Result<&str> {
        if self.remote.is_none() {
            let text = self.fetcher.fetch(&self.pad)?;
            self.remote = Some(text.trim().to_owned());
        }
        Ok(self.remote.as_deref().unwrap_or_default())
    }

    /// Whether the local file is missing or differs from the pad.
    pub fn is_needed(&mut self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(true);
        }
        let local = fs::read_to_string(&self.path)?;
        Ok(self.remote()? != local)
    }

    /// Writes the pad to the local file if needed. Returns whether it wrote.
    pub fn sync(&mut self) -> Result<bool> {
        if !self.is_needed()? {
            return Ok(false);
        }
        let text = self.remote()?.to_owned();
        fs::write(&self.path, text)?;
        eprintln!("Wrote pad {} to {}.", self.pad, self.path.display());
        Ok(true)
    }
}
