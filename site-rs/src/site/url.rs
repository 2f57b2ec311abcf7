//! URL handling for site and resource prefixes, on top of the `url` crate.

use url::Url;

/// Resource prefix for a site: `base_path` (with a trailing slash) resolved against `base_url`.
///
/// An absolute `base_path` replaces the path of `base_url`, a relative one
/// is resolved against its last directory.
///
/// ```rust
/// use rdfsite_core::site::url::resource_prefix;
///
/// assert_eq!(resource_prefix("https://example.com", "/jinjardf").unwrap(), "https://example.com/jinjardf/");
/// assert!(resource_prefix("not a url", "/").is_err());
/// ```
pub fn resource_prefix(base_url: &str, base_path: &str) -> Result<String, url::ParseError> {
    let mut path = base_path.to_string();
    if !path.ends_with('/') {
        path.push('/');
    }
    Ok(Url::parse(base_url)?.join(&path)?.into())
}

/// Path component of `url`, or `None` when it is not an absolute URL.
///
/// ```rust
/// use rdfsite_core::site::url::path_of;
///
/// assert_eq!(path_of("http://localhost:8000/example/fido?x=1").as_deref(), Some("/example/fido"));
/// assert_eq!(path_of("https://example.com").as_deref(), Some("/"));
/// assert_eq!(path_of("/a/b"), None);
/// ```
pub fn path_of(url: &str) -> Option<String> {
    Url::parse(url).ok().map(|url| url.path().to_string())
}
