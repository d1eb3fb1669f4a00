//! Host-side pieces of the PIN authorization flow.
//!
//! The consent page is shown by the host (a web view, a browser tab, a
//! terminal prompt). The client only asks it to present a URL and to go away
//! again, and learns about page loads through
//! [`crate::TwitterClient::page_loaded`].

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::info;

/// Presents the authorization page.
pub trait ConsentSurface: Send + Sync {
    fn present(&self, url: &str);

    /// Must be a no-op when nothing is presented.
    fn dismiss(&self);
}

/// Finds the confirmation PIN in rendered consent page content.
pub trait PinExtractor: Send + Sync {
    fn extract_pin(&self, page_content: &str) -> Option<String>;
}

/// Surface that only logs the authorization URL; the user opens it and the
/// host reports the PIN through [`crate::TwitterClient::submit_pin`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSurface;

impl ConsentSurface for LogSurface {
    fn present(&self, url: &str) {
        info!(url, "Open this URL to authorize the application");
    }

    fn dismiss(&self) {}
}

static OAUTH_PIN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<div[^>]*\bid\s*=\s*["']?oauth_pin["']?[^>]*>(.*?)</div\s*>"#)
        .expect("static regex")
});

static TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("static regex"));

/// Reads the text of the `oauth_pin` element Twitter renders after the user
/// grants access.
#[derive(Debug, Clone, Copy, Default)]
pub struct OAuthPinExtractor;

impl PinExtractor for OAuthPinExtractor {
    fn extract_pin(&self, page_content: &str) -> Option<String> {
        let inner = OAUTH_PIN_REGEX.captures(page_content)?.get(1)?.as_str();
        let text = TAG_REGEX.replace_all(inner, " ");
        let pin = text.split_whitespace().collect::<Vec<_>>().join(" ");
        (!pin.is_empty()).then_some(pin)
    }
}
