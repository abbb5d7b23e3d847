use crate::config::Config;
use crate::error::{InstallerError, Result};
use crate::page::catalog::{self, Catalog};
use scraper::Html;
use url::Url;

/// The parsed download page together with the address it was served from.
pub struct DownloadPage {
    url: Url,
    document: Html,
}

impl DownloadPage {
    pub fn parse(url: Url, html: &str) -> Self {
        Self {
            url,
            document: Html::parse_document(html),
        }
    }

    pub fn catalog(&self) -> Catalog<'_> {
        Catalog::new(&self.document)
    }

    /// Resolves the download link for a selection against the page address.
    pub fn download_url(&self, product: &str, language: &str, platform: &str) -> Result<Url> {
        let href = self
            .catalog()
            .download_href(product, language, platform)
            .ok_or_else(|| InstallerError::DownloadLinkNotFound {
                product: product.to_string(),
                platform: platform.to_string(),
                language: language.to_string(),
            })?;

        catalog::resolve_href(&self.url, &href)
    }
}

/// Client shared by the page request and the archive download.
///
/// The timeout bounds connecting and each wait for data, never the whole
/// transfer, so a slow archive download keeps going while bytes arrive.
pub fn build_client(config: &Config) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(config.source.user_agent.clone())
        .connect_timeout(config.timeout_duration())
        .read_timeout(config.timeout_duration())
        .build()
        .map_err(|e| InstallerError::Network {
            message: format!("Failed to build HTTP client: {}", e),
            source: Some(e),
        })
}

pub async fn fetch_download_page(client: &reqwest::Client, page_url: &str) -> Result<DownloadPage> {
    let url = Url::parse(page_url).map_err(|_| InstallerError::InvalidUrl {
        url: page_url.to_string(),
    })?;

    tracing::debug!(url = %url, "fetching download page");
    let response = client.get(url.clone()).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(InstallerError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    // Redirects land on the final address, which relative links are based on.
    let final_url = response.url().clone();
    let body = response.text().await?;
    tracing::debug!(bytes = body.len(), url = %final_url, "download page received");

    Ok(DownloadPage::parse(final_url, &body))
}
