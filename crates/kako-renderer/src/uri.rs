//! Application URI construction.

/// Builds in-site links from route segments.
pub trait UriBuilder: Send + Sync {
    /// URI of the route made of `segments`, e.g. `["a", "thread", "1"]`.
    fn create(&self, segments: &[&str]) -> String;
}

/// Routes rooted at a base URL: `{base}/{segment}/.../`.
///
/// # Example
///
/// ```
/// use kako_renderer::{SiteUri, UriBuilder};
///
/// let uri = SiteUri::new("https://archive.example.org/");
/// assert_eq!(uri.create(&["a", "thread", "1"]), "https://archive.example.org/a/thread/1/");
/// assert_eq!(SiteUri::new("").create(&["a"]), "/a/");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteUri {
    base_url: String,
}

impl SiteUri {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl UriBuilder for SiteUri {
    fn create(&self, segments: &[&str]) -> String {
        let mut uri = self.base_url.clone();
        for segment in segments.iter().map(|s| s.trim_matches('/')).filter(|s| !s.is_empty()) {
            uri.push('/');
            uri.push_str(segment);
        }
        uri.push('/');
        uri
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create() {
        let uri = SiteUri::new("http://localhost");
        assert_eq!(uri.create(&["a", "post", "5_1"]), "http://localhost/a/post/5_1/");
        assert_eq!(uri.create(&[]), "http://localhost/");
    }

    #[test]
    fn test_multi_segment_method() {
        let uri = SiteUri::new("");
        assert_eq!(uri.create(&["a", "last/50", "1"]), "/a/last/50/1/");
    }
}
