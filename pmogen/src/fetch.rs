//! Lecture des documents de description, locaux ou distants.

use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result, anyhow};
use tracing::debug;
use ureq::Agent;
use url::Url;

/// Document lu avec l'URL d'où il provient, base des URL relatives qu'il
/// contient.
#[derive(Debug, Clone)]
pub struct Document {
    pub location: Url,
    pub text: String,
}

/// Interprète `source` comme une URL `http(s)`/`file` ou un chemin local.
pub fn source_url(source: &str) -> Result<Url> {
    if let Ok(url) = Url::parse(source) {
        if matches!(url.scheme(), "http" | "https" | "file") {
            return Ok(url);
        }
    }

    let path = Path::new(source);
    let absolute = fs::canonicalize(path).with_context(|| format!("Cannot open {source}"))?;
    Url::from_file_path(&absolute).map_err(|_| anyhow!("Invalid file path {}", absolute.display()))
}

/// Lit un document depuis une URL `http(s)` ou `file`.
pub fn read_url(url: &Url, timeout_secs: u64) -> Result<String> {
    match url.scheme() {
        "file" => {
            let path = url
                .to_file_path()
                .map_err(|_| anyhow!("Invalid file URL {url}"))?;
            debug!(path = %path.display(), "Reading description file");
            fs::read_to_string(&path).with_context(|| format!("Cannot read {}", path.display()))
        }
        "http" | "https" => {
            debug!(url = %url, "Fetching description");
            let config = Agent::config_builder()
                .timeout_global(Some(Duration::from_secs(timeout_secs)))
                .build();
            let agent: Agent = config.into();
            let mut response = agent
                .get(url.as_str())
                .call()
                .with_context(|| format!("HTTP error when fetching {url}"))?;
            response
                .body_mut()
                .read_to_string()
                .with_context(|| format!("Cannot read response body from {url}"))
        }
        scheme => Err(anyhow!("Unsupported URL scheme {scheme} for {url}")),
    }
}

/// Lit le document désigné par `source` (chemin ou URL).
pub fn read_document(source: &str, timeout_secs: u64) -> Result<Document> {
    let location = source_url(source)?;
    let text = read_url(&location, timeout_secs)?;
    Ok(Document { location, text })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_local_path_becomes_file_url() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("desc.xml");
        fs::write(&path, "<root/>").unwrap();

        let document = read_document(path.to_str().unwrap(), 1).unwrap();
        assert_eq!(document.location.scheme(), "file");
        assert_eq!(document.text, "<root/>");
    }

    #[test]
    fn test_relative_urls_resolve_next_to_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("desc.xml");
        fs::write(&path, "<root/>").unwrap();

        let location = source_url(path.to_str().unwrap()).unwrap();
        let scpd = location.join("xml/RenderingControl1.xml").unwrap();
        let expected = fs::canonicalize(dir.path())
            .unwrap()
            .join("xml/RenderingControl1.xml");
        assert_eq!(scpd.to_file_path().unwrap(), expected);
    }

    #[test]
    fn test_http_url_is_kept() {
        let url = source_url("http://192.168.1.20:1400/xml/device_description.xml").unwrap();
        assert_eq!(url.host_str(), Some("192.168.1.20"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(read_document("/nonexistent/pmogen/desc.xml", 1).is_err());
    }
}
