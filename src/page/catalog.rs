//! Option and link extraction from the Mozilla download page.
//!
//! The page offers one `<select id="select-product">` listing products, and
//! per product a `select_<product>_platform` and `select_<product>_language`
//! list. Download anchors live under `ol[data-product] li[data-language]`.
//!
//! Values scraped from the page are compared in code rather than spliced
//! into CSS selectors.

use crate::error::{InstallerError, Result};
use scraper::{ElementRef, Html, Selector};
use url::Url;

pub const PRODUCT_PREFIX: &str = "desktop_";
pub const PLATFORM_PREFIX: &str = "linux";

pub struct Catalog<'a> {
    document: &'a Html,
}

impl<'a> Catalog<'a> {
    pub fn new(document: &'a Html) -> Self {
        Self { document }
    }

    /// Desktop products, in page order.
    pub fn product_options(&self) -> Vec<String> {
        self.options_of("select-product")
            .into_iter()
            .filter(|value| value.starts_with(PRODUCT_PREFIX))
            .collect()
    }

    /// Linux platforms offered for `product`.
    pub fn platform_options(&self, product: &str) -> Vec<String> {
        self.options_of(&format!("select_{}_platform", product))
            .into_iter()
            .filter(|value| value.starts_with(PLATFORM_PREFIX))
            .collect()
    }

    /// Every language offered for `product`.
    pub fn language_options(&self, product: &str) -> Vec<String> {
        self.options_of(&format!("select_{}_language", product))
    }

    /// First download anchor matching the selection, as written in the page.
    pub fn download_href(&self, product: &str, language: &str, platform: &str) -> Option<String> {
        let root = self.document.root_element();

        elements(root, "ol[data-product]")
            .into_iter()
            .filter(|ol| ol.value().attr("data-product") == Some(product))
            .flat_map(|ol| elements(ol, "li[data-language]"))
            .filter(|li| li.value().attr("data-language") == Some(language))
            .flat_map(|li| elements(li, "a"))
            .find_map(|a| {
                let element = a.value();
                let version_matches = element.attr("data-download-version") == Some(platform);
                let is_download = element.attr("data-link-type") == Some("download");
                match (version_matches, is_download, element.attr("href")) {
                    (true, true, Some(href)) => Some(href.to_string()),
                    _ => None,
                }
            })
    }

    fn options_of(&self, select_id: &str) -> Vec<String> {
        let root = self.document.root_element();

        elements(root, "select[id]")
            .into_iter()
            .filter(|select| select.value().attr("id") == Some(select_id))
            .flat_map(|select| elements(select, "option"))
            .filter_map(option_value)
            .collect()
    }
}

/// Value submitted for an `<option>`: its `value` attribute, else its text.
fn option_value(option: ElementRef<'_>) -> Option<String> {
    let value = match option.value().attr("value") {
        Some(value) => value.to_string(),
        None => option.text().collect::<String>().trim().to_string(),
    };

    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn elements<'a>(scope: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => scope.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

pub fn resolve_href(page_url: &Url, href: &str) -> Result<Url> {
    page_url.join(href.trim()).map_err(|e| {
        tracing::debug!(href, error = %e, "download link is not a valid URL");
        InstallerError::InvalidUrl {
            url: href.to_string(),
        }
    })
}
