//! URL helper functions

use crate::config::SiteConfig;

/// Generate a URL with the site root prepended
///
/// # Examples
/// ```ignore
/// url_for(&config, "/blog/my-post/") // -> "/blog/my-post/"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/contact/") // -> "https://example.com/contact/"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    let base = config.base_url.trim_end_matches('/');
    format!("{}{}", base, url_for(config, path))
}

/// Characters that must be percent-encoded in a URL path; keeps `/` and
/// unreserved slug characters readable
const PATH_ENCODE_SET: &percent_encoding::AsciiSet = &percent_encoding::CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`');

/// Percent-encode a URL path, preserving path separators
pub fn encode_url(path: &str) -> String {
    percent_encoding::utf8_percent_encode(path, PATH_ENCODE_SET).to_string()
}
