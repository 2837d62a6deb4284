use crate::error::FetchError;

pub const DEFAULT_LIST_PATH: &str = "/outpass/all";

/// Where outpasses are fetched from, read from the environment.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub base_url: String,
    pub list_path: String,
    pub token: Option<String>,
}

impl SourceConfig {
    /// Reads `OUTPASS_API_URL` (required) and `OUTPASS_API_TOKEN` (optional).
    pub fn from_env(list_path: Option<&str>) -> Result<Self, FetchError> {
        let base_url = std::env::var("OUTPASS_API_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .ok_or(FetchError::MissingConfig("OUTPASS_API_URL"))?;
        let token = std::env::var("OUTPASS_API_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty());

        Ok(Self::new(base_url, list_path.unwrap_or(DEFAULT_LIST_PATH), token))
    }

    pub fn new(base_url: impl Into<String>, list_path: &str, token: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            list_path: list_path.to_string(),
            token,
        }
    }

    pub fn list_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.list_path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_base_and_path_with_single_slash() {
        let config = SourceConfig::new("https://api.example.edu/api/", "/outpass/all", None);
        assert_eq!(config.list_url(), "https://api.example.edu/api/outpass/all");

        let config = SourceConfig::new("https://api.example.edu", "admin/outpasses", None);
        assert_eq!(config.list_url(), "https://api.example.edu/admin/outpasses");
    }
}
