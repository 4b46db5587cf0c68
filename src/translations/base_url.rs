// Base URL resolution module
// Picks the root address translation files are downloaded from

/// Fallback when no source provides a base URL
pub const DEFAULT_BASE_URL: &str = "http://homeassistant.local:8123";

/// Every place a base URL can come from
///
/// Resolution order is the field order: entry data, entry options,
/// runtime data, internal URL, external URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseUrlSources {
    /// Value stored when the config entry was created
    pub entry_data: Option<String>,
    /// Value changed later through the entry's options
    pub entry_options: Option<String>,
    /// Value held by the running instance
    pub runtime: Option<String>,
    pub internal_url: Option<String>,
    pub external_url: Option<String>,
}

impl BaseUrlSources {
    fn candidates(&self) -> [Option<&str>; 5] {
        [
            self.entry_data.as_deref(),
            self.entry_options.as_deref(),
            self.runtime.as_deref(),
            self.internal_url.as_deref(),
            self.external_url.as_deref(),
        ]
    }
}

/// Resolve the base URL, first present source wins
pub fn resolve_base_url(sources: &BaseUrlSources) -> String {
    sources
        .candidates()
        .into_iter()
        .flatten()
        .find(|url| !url.trim().is_empty())
        .map_or_else(|| normalize_base_url(DEFAULT_BASE_URL), normalize_base_url)
}

/// Strip trailing slashes so paths can be appended with a single `/`
pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Normalize an optional value, treating blank strings as absent
pub fn normalize_optional(url: Option<&str>) -> Option<String> {
    url.map(normalize_base_url).filter(|u| !u.is_empty())
}
