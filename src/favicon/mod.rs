use crate::config::PanelConfig;

/// Shown when a url has no usable host or the icon fails to load.
pub(crate) const FALLBACK_ICON: &str = "data:image/svg+xml,<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"16\" height=\"16\" viewBox=\"0 0 16 16\"><path d=\"M4 2a2 2 0 0 0-2 2v8a2 2 0 0 0 2 2h8a2 2 0 0 0 2-2V4a2 2 0 0 0-2-2H4z\" fill=\"%23999\"/></svg>";

/// Resolves bookmark urls to icon sources through a hostname-keyed favicon service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct FaviconResolver {
    endpoint: String,
    size: u32,
}

impl FaviconResolver {
    pub fn new(config: &PanelConfig) -> Self {
        Self {
            endpoint: config.favicon_endpoint.clone(),
            size: config.favicon_size,
        }
    }

    pub fn resolve(&self, page_url: &str) -> String {
        match hostname(page_url) {
            Some(host) => format!(
                "{}?domain={}&sz={}",
                self.endpoint,
                urlencoding::encode(&host),
                self.size
            ),
            None => FALLBACK_ICON.to_string(),
        }
    }
}

pub(crate) fn hostname(page_url: &str) -> Option<String> {
    let parsed = url::Url::parse(page_url).ok()?;
    parsed
        .host_str()
        .filter(|h| !h.is_empty())
        .map(|h| h.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> FaviconResolver {
        FaviconResolver::new(&PanelConfig::default())
    }

    #[test]
    fn test_resolve_uses_hostname_only() {
        assert_eq!(
            resolver().resolve("https://doc.rust-lang.org/std/vec/struct.Vec.html?x=1"),
            "https://www.google.com/s2/favicons?domain=doc.rust-lang.org&sz=16"
        );
    }

    #[test]
    fn test_malformed_or_hostless_urls_fall_back() {
        assert_eq!(resolver().resolve("not a url"), FALLBACK_ICON);
        assert_eq!(resolver().resolve("javascript:alert(1)"), FALLBACK_ICON);
        assert_eq!(resolver().resolve("about:blank"), FALLBACK_ICON);
    }

    #[test]
    fn test_custom_endpoint_and_size() {
        let config = PanelConfig {
            favicon_endpoint: "https://icons.example/get".to_string(),
            favicon_size: 32,
            ..PanelConfig::default()
        };
        assert_eq!(
            FaviconResolver::new(&config).resolve("http://example.com:8080/a"),
            "https://icons.example/get?domain=example.com&sz=32"
        );
    }
}
