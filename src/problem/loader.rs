use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rust_embed::Embed;
use serde::Deserialize;
use thiserror::Error;

use crate::problem::{Problem, ProblemSet};

pub const DEFAULT_SPECIFICATION: &str = "batch1.json";

#[derive(Embed)]
#[folder = "assets/problems/"]
struct ProblemAssets;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("request to {url} failed: {message}")]
    Http { url: String, message: String },
    #[error("server error {status} from {url}")]
    Status { url: String, status: u16 },
    #[error("{url} is a remote problem set but this build has no network support")]
    NetworkDisabled { url: String },
    #[error("invalid problem set JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("problem set has no \"problems\" array")]
    MissingProblems,
}

/// Where a problem set comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpecSource {
    Url(String),
    File(PathBuf),
}

impl SpecSource {
    pub fn parse(reference: &str) -> Self {
        let trimmed = reference.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            SpecSource::Url(trimmed.to_string())
        } else {
            SpecSource::File(PathBuf::from(trimmed))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            SpecSource::Url(url) => url.clone(),
            SpecSource::File(path) => path.display().to_string(),
        }
    }
}

#[derive(Deserialize)]
struct RawDocument {
    problems: Option<Vec<Problem>>,
}

/// Parse a problem-set document. Only the `problems` array is read; any other
/// top-level keys are ignored.
pub fn parse_problem_set(content: &str) -> Result<ProblemSet, LoadError> {
    let raw: RawDocument = serde_json::from_str(content)?;
    let problems = raw.problems.ok_or(LoadError::MissingProblems)?;
    Ok(ProblemSet { problems })
}

/// Resolve `reference` and load the problem set it names.
pub fn load_problem_set(reference: &str, timeout: Duration) -> Result<ProblemSet, LoadError> {
    let source = SpecSource::parse(reference);
    let content = match &source {
        SpecSource::Url(url) => fetch_url(url, timeout)?,
        SpecSource::File(path) => read_file(path)?,
    };
    let set = parse_problem_set(&content)?;
    tracing::info!(
        source = %source.describe(),
        problems = set.len(),
        "loaded problem set"
    );
    Ok(set)
}

fn read_file(path: &Path) -> Result<String, LoadError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(err) => bundled(path).ok_or(LoadError::Io {
            path: path.to_path_buf(),
            source: err,
        }),
    }
}

/// Bundled fallback for bare file names such as the default `batch1.json`.
fn bundled(path: &Path) -> Option<String> {
    if path.components().count() != 1 {
        return None;
    }
    let name = path.file_name()?.to_str()?;
    let file = ProblemAssets::get(name)?;
    tracing::debug!(name, "using bundled problem set");
    std::str::from_utf8(file.data.as_ref())
        .ok()
        .map(|s| s.to_string())
}

#[cfg(feature = "network")]
pub fn fetch_url(url: &str, timeout: Duration) -> Result<String, LoadError> {
    let http_err = |message: String| LoadError::Http {
        url: url.to_string(),
        message,
    };
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| http_err(e.to_string()))?;
    let response = client.get(url).send().map_err(|e| http_err(e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    response.text().map_err(|e| http_err(e.to_string()))
}

#[cfg(not(feature = "network"))]
pub fn fetch_url(url: &str, _timeout: Duration) -> Result<String, LoadError> {
    Err(LoadError::NetworkDisabled {
        url: url.to_string(),
    })
}
