use crate::page::channel::{self, ReleaseChannel};
use serde::{Deserialize, Serialize};

/// The three values picked from the download page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub product: String,
    pub platform: String,
    pub language: String,
}

impl Selection {
    pub fn new<S: Into<String>>(product: S, platform: S, language: S) -> Self {
        Self {
            product: product.into(),
            platform: platform.into(),
            language: language.into(),
        }
    }

    pub fn channel(&self) -> ReleaseChannel {
        ReleaseChannel::from_product(&self.product)
    }

    pub fn release_name(&self) -> &str {
        channel::release_name(&self.product)
    }

    pub fn display_summary(&self) -> String {
        format!(
            "Product: {}\nPlatform: {}\nLanguage: {}",
            self.product, self.platform, self.language
        )
    }
}
