//! URL handling module
//!
//! This module provides link resolution, URL canonicalization and the
//! derivation of the site and page keys that index persisted content.

mod keys;
mod normalize;

use crate::UrlResult;
use url::Url;

// Re-export main functions
pub use keys::{page_key, site_key, HOME_PAGE_KEY};
pub use normalize::{canonicalize, normalize_url};

/// Resolves a link found on `base` into an absolute, canonical URL
///
/// Standard relative-reference resolution applies, so scheme-relative
/// (`//host/path`), absolute-path (`/path`), relative-path (`../path`),
/// query-only (`?q=1`) and fragment-only (`#top`) references are all
/// supported. The result is canonicalized with [`canonicalize`], so two
/// references that land on the same document yield equal URLs.
///
/// # Arguments
///
/// * `base` - The URL of the page the link was found on
/// * `href` - The raw, possibly relative, link target
///
/// # Returns
///
/// * `Ok(Url)` - The resolved URL
/// * `Err(UrlError)` - The reference is malformed or does not point at an
///   http(s) document
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitescrape::url::resolve;
///
/// let base = Url::parse("http://x.com/a/b").unwrap();
/// assert_eq!(resolve(&base, "../c").unwrap().as_str(), "http://x.com/c");
/// assert_eq!(resolve(&base, "http://y.com/z").unwrap().as_str(), "http://y.com/z");
/// ```
pub fn resolve(base: &Url, href: &str) -> UrlResult<Url> {
    let joined = base
        .join(href)
        .map_err(|e| crate::UrlError::Parse(e.to_string()))?;
    canonicalize(joined)
}
