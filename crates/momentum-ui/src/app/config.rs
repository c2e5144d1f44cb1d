use momentum_shared::filters::DEFAULT_FILTER_KEY;
use serde::Deserialize;

const APP_CONFIG_TOML: &str =
  include_str!("../../assets/momentum.toml");
const DEFAULT_BASE_URL: &str =
  "https://momentum.redberryinternship.ge/api";

#[derive(Clone, PartialEq, Default, Deserialize)]
pub struct AppConfig {
  #[serde(default)]
  pub api:     ApiConfig,
  #[serde(default)]
  pub session: SessionConfig
}

#[derive(Clone, PartialEq, Deserialize)]
pub struct ApiConfig {
  #[serde(default = "default_base_url")]
  pub base_url: String,
  #[serde(default)]
  pub token:    String
}

#[derive(Clone, PartialEq, Deserialize)]
pub struct SessionConfig {
  #[serde(default = "default_filter_key")]
  pub filter_key: String
}

fn default_base_url() -> String {
  DEFAULT_BASE_URL.to_string()
}

fn default_filter_key() -> String {
  DEFAULT_FILTER_KEY.to_string()
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      base_url: default_base_url(),
      token:    String::new()
    }
  }
}

impl Default for SessionConfig {
  fn default() -> Self {
    Self {
      filter_key: default_filter_key()
    }
  }
}

impl ApiConfig {
  /// Every endpoint requires the bearer
  /// token; without it the app does not
  /// start its screens.
  pub fn has_token(&self) -> bool {
    !self.token.trim().is_empty()
  }
}

pub fn load_app_config() -> AppConfig {
  let config = with_token_override(
    parse_app_config(APP_CONFIG_TOML),
    option_env!("MOMENTUM_API_TOKEN")
  );
  if !config.api.has_token() {
    tracing::error!(
      "no API token configured; build with \
       MOMENTUM_API_TOKEN set"
    );
  }
  config
}

fn with_token_override(
  mut config: AppConfig,
  token: Option<&str>
) -> AppConfig {
  if let Some(token) = token
    .map(str::trim)
    .filter(|token| !token.is_empty())
  {
    config.api.token = token.to_string();
  }
  config
}

fn parse_app_config(raw: &str) -> AppConfig {
  match toml::from_str::<AppConfig>(raw) {
    | Ok(mut config) => {
      config.api.base_url = config
        .api
        .base_url
        .trim()
        .trim_end_matches('/')
        .to_string();
      if config.api.base_url.is_empty() {
        tracing::warn!(
          "empty API base url; using \
           fallback"
        );
        config.api.base_url =
          default_base_url();
      }
      if config
        .session
        .filter_key
        .trim()
        .is_empty()
      {
        config.session.filter_key =
          default_filter_key();
      }
      tracing::info!(
        base_url = %config.api.base_url,
        "loaded app config"
      );
      config
    }
    | Err(error) => {
      tracing::error!(%error, "failed to parse app config; using fallback config");
      AppConfig::default()
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn bundled_config_parses() {
    let config =
      parse_app_config(APP_CONFIG_TOML);
    assert_eq!(
      config.api.base_url,
      DEFAULT_BASE_URL
    );
    assert_eq!(
      config.session.filter_key,
      "momentum.filters"
    );
  }

  #[test]
  fn trailing_slash_and_blank_values_are_normalized(
  ) {
    let config = parse_app_config(
      "[api]\nbase_url = \"https://example.test/api/\"\n\
       [session]\nfilter_key = \"  \"\n"
    );
    assert_eq!(
      config.api.base_url,
      "https://example.test/api"
    );
    assert_eq!(
      config.session.filter_key,
      DEFAULT_FILTER_KEY
    );
  }

  #[test]
  fn broken_config_falls_back() {
    let config =
      parse_app_config("[api\nbase_url");
    assert_eq!(
      config.api.base_url,
      DEFAULT_BASE_URL
    );
    assert!(config.api.token.is_empty());
  }

  #[test]
  fn bundled_config_needs_a_build_token() {
    let bundled =
      parse_app_config(APP_CONFIG_TOML);
    assert!(!bundled.api.has_token());

    let built = with_token_override(
      bundled.clone(),
      Some(" abc123 ")
    );
    assert!(built.api.has_token());
    assert_eq!(built.api.token, "abc123");

    let blank =
      with_token_override(bundled, Some("  "));
    assert!(!blank.api.has_token());
  }
}
