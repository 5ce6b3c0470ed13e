use crate::error::{LoadError, Result};
use crate::utils::constants::USER_AGENT;
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

/// Where a table's delimited text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Url(String),
}

impl DataSource {
    /// `http(s)://` locations are fetched; anything else is a file path.
    pub fn parse(location: &str) -> Self {
        let location = location.trim();
        let lower = location.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            DataSource::Url(location.to_string())
        } else {
            DataSource::File(PathBuf::from(location))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            DataSource::File(path) => path.display().to_string(),
            DataSource::Url(url) => url.clone(),
        }
    }

    /// Fetch the whole document and decode it to text.
    pub async fn read_text(&self, timeout: Duration) -> Result<String> {
        match self {
            DataSource::File(path) => {
                let bytes = tokio::fs::read(path).await?;
                debug!("Read {} bytes from {}", bytes.len(), path.display());
                decode_text(&bytes, &self.describe())
            }
            DataSource::Url(url) => {
                let bytes = fetch(url, timeout).await?;
                debug!("Fetched {} bytes from {}", bytes.len(), url);
                decode_text(&bytes, url)
            }
        }
    }
}

async fn fetch(url: &str, timeout: Duration) -> Result<Vec<u8>> {
    let to_load_error = |source: reqwest::Error| LoadError::Fetch {
        url: url.to_string(),
        source,
    };

    let client = Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(to_load_error)?;

    let response = client.get(url).send().await.map_err(to_load_error)?;
    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let bytes = response.bytes().await.map_err(to_load_error)?;
    Ok(bytes.to_vec())
}

/// Decode source bytes: BOM-declared encoding first, then strict UTF-8, then
/// Windows-1252 (what spreadsheet exports of these files typically use).
pub fn decode_text(bytes: &[u8], label: &str) -> Result<String> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, had_errors) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        if had_errors {
            return Err(LoadError::Encoding(label.to_string()));
        }
        return Ok(text.into_owned());
    }

    if let Some(text) = UTF_8.decode_without_bom_handling_and_without_replacement(bytes) {
        return Ok(text.into_owned());
    }

    warn!("{} is not valid UTF-8, decoding as Windows-1252", label);
    let (text, had_errors) = WINDOWS_1252.decode_without_bom_handling(bytes);
    if had_errors {
        return Err(LoadError::Encoding(label.to_string()));
    }
    Ok(text.into_owned())
}
