use url::Url;

/// Page key used when a URL has no path beyond `/`
pub const HOME_PAGE_KEY: &str = "home";

/// Derives the site key for a URL
///
/// The site key is the host with every `.` replaced by `_`. It names the
/// aggregate file a page is persisted into. The port is not part of the key.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitescrape::url::site_key;
///
/// let url = Url::parse("https://x.example.com/path").unwrap();
/// assert_eq!(site_key(&url), "x_example_com");
/// ```
pub fn site_key(url: &Url) -> String {
    url.host_str().unwrap_or_default().replace('.', "_")
}

/// Derives the page key for a URL
///
/// Leading and trailing `/` are stripped from the path, the remaining `/`
/// become `_`, and an empty result becomes [`HOME_PAGE_KEY`]. Query and
/// fragment do not take part, so `/list?page=2` and `/list` share a key.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitescrape::url::page_key;
///
/// let url = Url::parse("https://example.com/a/b/").unwrap();
/// assert_eq!(page_key(&url), "a_b");
///
/// let url = Url::parse("https://example.com").unwrap();
/// assert_eq!(page_key(&url), "home");
/// ```
pub fn page_key(url: &Url) -> String {
    path_to_page_key(url.path())
}

fn path_to_page_key(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        HOME_PAGE_KEY.to_string()
    } else {
        trimmed.replace('/', "_")
    }
}
