use crate::page::catalog::PRODUCT_PREFIX;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Firefox release channel derived from a product option value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReleaseChannel {
    Release,
    Beta,
    Developer,
    Nightly,
    Esr,
    Other(String),
}

impl ReleaseChannel {
    pub fn from_product(product: &str) -> Self {
        match product {
            "desktop_release" => ReleaseChannel::Release,
            "desktop_beta" => ReleaseChannel::Beta,
            "desktop_developer" => ReleaseChannel::Developer,
            "desktop_nightly" => ReleaseChannel::Nightly,
            "desktop_esr" => ReleaseChannel::Esr,
            other => ReleaseChannel::Other(release_name(other).to_string()),
        }
    }

    /// Appended to "Firefox" in the launcher name.
    pub fn name_suffix(&self) -> String {
        match self {
            ReleaseChannel::Release => String::new(),
            ReleaseChannel::Beta => " Beta".to_string(),
            ReleaseChannel::Developer => " Developer Edition".to_string(),
            ReleaseChannel::Nightly => " Nightly".to_string(),
            ReleaseChannel::Esr => " ESR".to_string(),
            ReleaseChannel::Other(name) => format!(" {}", name),
        }
    }

    /// Window class the browser reports, so docks group its windows.
    pub fn wm_class(&self) -> &'static str {
        match self {
            ReleaseChannel::Developer => "Firefox Developer Edition",
            ReleaseChannel::Nightly => "Nightly",
            _ => "Firefox",
        }
    }
}

impl fmt::Display for ReleaseChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Firefox{}", self.name_suffix())
    }
}

/// `desktop_beta` -> `beta`; values without the prefix are returned as is.
pub fn release_name(product: &str) -> &str {
    product.strip_prefix(PRODUCT_PREFIX).unwrap_or(product)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_channels() {
        let cases = [
            ("desktop_release", "", "Firefox"),
            ("desktop_beta", " Beta", "Firefox"),
            ("desktop_developer", " Developer Edition", "Firefox Developer Edition"),
            ("desktop_nightly", " Nightly", "Nightly"),
            ("desktop_esr", " ESR", "Firefox"),
        ];

        for (product, suffix, wm_class) in cases {
            let channel = ReleaseChannel::from_product(product);
            assert_eq!(channel.name_suffix(), suffix, "suffix for {}", product);
            assert_eq!(channel.wm_class(), wm_class, "wm class for {}", product);
        }
    }

    #[test]
    fn test_unknown_channel() {
        let channel = ReleaseChannel::from_product("desktop_focus");
        assert_eq!(channel, ReleaseChannel::Other("focus".to_string()));
        assert_eq!(channel.name_suffix(), " focus");
        assert_eq!(channel.wm_class(), "Firefox");
        assert_eq!(channel.to_string(), "Firefox focus");
    }

    #[test]
    fn test_release_name() {
        assert_eq!(release_name("desktop_esr"), "esr");
        assert_eq!(release_name("esr"), "esr");
    }
}
