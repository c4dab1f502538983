//! Loading of the two shader text resources the aurora scene needs.
//!
//! Sources live next to each other under a root that is either a local
//! directory or an `http(s)` base URL. Both stages load independently and in
//! no particular order; [`SourceJoin`] collects them and only yields a
//! [`ShaderSources`] pair once both have arrived.

mod join;
mod location;

use std::fs;
use std::path::PathBuf;
use std::thread::{self, JoinHandle};

use crossbeam_channel::bounded;
use reqwest::blocking::Client;
use reqwest::Url;
use tracing::debug;

pub use join::{ShaderSources, SourceJoin};
pub use location::{SourceLocation, SourceSet};

/// The two programmable pipeline stages the scene loads source for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub const ALL: [ShaderStage; 2] = [ShaderStage::Vertex, ShaderStage::Fragment];

    /// Conventional file name under a source root.
    pub fn file_name(&self) -> &'static str {
        match self {
            ShaderStage::Vertex => "aurora.vert",
            ShaderStage::Fragment => "aurora.frag",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        }
    }
}

impl std::fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {stage} shader at {}: {source}", path.display())]
    Read {
        stage: ShaderStage,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to request {stage} shader from {url}: {source}")]
    Request {
        stage: ShaderStage,
        url: Url,
        #[source]
        source: reqwest::Error,
    },
    #[error("{stage} shader request to {url} returned status {status}")]
    Status {
        stage: ShaderStage,
        url: Url,
        status: reqwest::StatusCode,
    },
    #[error("invalid shader location '{0}'")]
    Location(String),
    #[error("failed to construct HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("failed to spawn shader loader thread: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("{0} shader loader exited without reporting a result")]
    Disconnected(ShaderStage),
}

/// Reads shader text from files or over HTTP.
#[derive(Debug, Clone, Default)]
pub struct SourceFetcher {
    http: Option<Client>,
}

impl SourceFetcher {
    /// Builds a fetcher able to serve every location in `set`.
    pub fn for_sources(set: &SourceSet) -> Result<Self, LoadError> {
        let needs_http = ShaderStage::ALL
            .iter()
            .any(|stage| set.location(*stage).is_remote());
        let http = if needs_http {
            Some(Client::builder().build().map_err(LoadError::Client)?)
        } else {
            None
        };
        Ok(Self { http })
    }

    /// Loads one resource as an opaque string.
    pub fn fetch(&self, stage: ShaderStage, location: &SourceLocation) -> Result<String, LoadError> {
        let text = match location {
            SourceLocation::File(path) => {
                fs::read_to_string(path).map_err(|source| LoadError::Read {
                    stage,
                    path: path.clone(),
                    source,
                })?
            }
            SourceLocation::Remote(url) => self.fetch_remote(stage, url)?,
        };
        debug!(%stage, %location, bytes = text.len(), "loaded shader source");
        Ok(text)
    }

    fn fetch_remote(&self, stage: ShaderStage, url: &Url) -> Result<String, LoadError> {
        let client = match &self.http {
            Some(client) => client.clone(),
            None => Client::builder().build().map_err(LoadError::Client)?,
        };
        let request_error = |source| LoadError::Request {
            stage,
            url: url.clone(),
            source,
        };
        let response = client.get(url.clone()).send().map_err(request_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                stage,
                url: url.clone(),
                status,
            });
        }
        response.text().map_err(request_error)
    }

    /// Loads one resource on a background thread and hands the outcome to `on_done`.
    pub fn spawn<F>(
        &self,
        stage: ShaderStage,
        location: SourceLocation,
        on_done: F,
    ) -> std::io::Result<JoinHandle<()>>
    where
        F: FnOnce(ShaderStage, Result<String, LoadError>) + Send + 'static,
    {
        let fetcher = self.clone();
        thread::Builder::new()
            .name(format!("aurora-{}-source", stage.label()))
            .spawn(move || {
                let result = fetcher.fetch(stage, &location);
                on_done(stage, result);
            })
    }

    /// Loads both stages concurrently and waits for the pair.
    ///
    /// The first failure is returned as soon as it is observed.
    pub fn fetch_pair(&self, set: &SourceSet) -> Result<ShaderSources, LoadError> {
        let (sender, receiver) = bounded(ShaderStage::ALL.len());
        for stage in ShaderStage::ALL {
            let sender = sender.clone();
            self.spawn(stage, set.location(stage).clone(), move |stage, result| {
                let _ = sender.send((stage, result));
            })
            .map_err(LoadError::Spawn)?;
        }
        drop(sender);

        let mut join = SourceJoin::new();
        loop {
            let Ok((stage, result)) = receiver.recv() else {
                let missing = join.pending().first().copied().unwrap_or(ShaderStage::Vertex);
                return Err(LoadError::Disconnected(missing));
            };
            if let Some(sources) = join.accept(stage, result?) {
                return Ok(sources);
            }
        }
    }
}
