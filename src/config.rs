//! Dashboard Configuration
//!
//! Compiled in at build time; the API base URL comes from `RENTDESK_API_URL`.

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_TOAST_TIMEOUT_MS: u32 = 4_000;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub api_base_url: String,
    pub page_size: u32,
    pub toast_timeout_ms: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            toast_timeout_ms: DEFAULT_TOAST_TIMEOUT_MS,
        }
    }
}

impl DashboardConfig {
    /// Read `RENTDESK_API_URL`, `RENTDESK_PAGE_SIZE` and `RENTDESK_TOAST_MS` as seen by the compiler
    pub fn from_build_env() -> Self {
        Self::from_values(
            option_env!("RENTDESK_API_URL"),
            option_env!("RENTDESK_PAGE_SIZE"),
            option_env!("RENTDESK_TOAST_MS"),
        )
    }

    pub fn from_values(api_url: Option<&str>, page_size: Option<&str>, toast_ms: Option<&str>) -> Self {
        let api_base_url = api_url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
            .to_string();
        Self {
            api_base_url,
            page_size: parse_positive(page_size).unwrap_or(DEFAULT_PAGE_SIZE),
            toast_timeout_ms: parse_positive(toast_ms).unwrap_or(DEFAULT_TOAST_TIMEOUT_MS),
        }
    }
}

fn parse_positive(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|value| *value > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_unset() {
        assert_eq!(DashboardConfig::from_values(None, None, None), DashboardConfig::default());
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = DashboardConfig::from_values(Some("https://api.rentdesk.io/v1/"), None, None);
        assert_eq!(config.api_base_url, "https://api.rentdesk.io/v1");
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let config = DashboardConfig::from_values(Some("  "), Some("0"), Some("soon"));
        assert_eq!(config.api_base_url, DEFAULT_API_URL);
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.toast_timeout_ms, DEFAULT_TOAST_TIMEOUT_MS);

        let config = DashboardConfig::from_values(None, Some(" 25 "), Some("1500"));
        assert_eq!(config.page_size, 25);
        assert_eq!(config.toast_timeout_ms, 1500);
    }
}
