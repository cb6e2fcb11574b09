use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::constants;

/// Contents of `config.toml` in the platform config directory.
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
pub struct Config {
  pub server: Option<String>,
  pub username: Option<String>,
  pub password: Option<String>,
  pub catalog: Option<PathBuf>,
  pub loader: Option<bool>,
}

impl Config {
  pub fn load() -> Self {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "studio") {
      let config_file = proj_dirs.config_dir().join("config.toml");
      if let Ok(content) = std::fs::read_to_string(&config_file) {
        match toml::from_str(&content) {
          Ok(config) => return config,
          Err(e) => warn!(err = %e, path = %config_file.display(), "config: ignoring invalid file"),
        }
      }
    }
    Self::default()
  }
}

/// Command-line values that override the config file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
  pub server: Option<String>,
  pub username: Option<String>,
  pub password: Option<String>,
  pub catalog: Option<PathBuf>,
  pub no_loader: bool,
}

/// Effective settings after merging CLI, config file and defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
  pub server: String,
  pub credentials: Option<(String, String)>,
  pub catalog: Option<PathBuf>,
  pub loader: bool,
}

impl Settings {
  pub fn resolve(cli: Overrides, file: Config) -> Self {
    let server = cli.server.or(file.server).unwrap_or_else(|| constants().default_server.clone());
    let username = cli.username.or(file.username).filter(|u| !u.is_empty());
    let password = cli.password.or(file.password).unwrap_or_default();
    Self {
      server,
      credentials: username.map(|u| (u, password)),
      catalog: cli.catalog.or(file.catalog),
      loader: !cli.no_loader && file.loader.unwrap_or(true),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_when_nothing_is_set() {
    let settings = Settings::resolve(Overrides::default(), Config::default());
    assert_eq!(settings.server, "http://127.0.0.1:5000");
    assert_eq!(settings.credentials, None);
    assert!(settings.loader);
  }

  #[test]
  fn cli_beats_config_file() {
    let file: Config = toml::from_str(
      r#"
        server = "http://file:5000"
        username = "manager"
        password = "secret"
        loader = false
      "#,
    )
    .unwrap();
    let cli = Overrides { server: Some("http://cli:8080".into()), ..Default::default() };
    let settings = Settings::resolve(cli, file);
    assert_eq!(settings.server, "http://cli:8080");
    assert_eq!(settings.credentials, Some(("manager".into(), "secret".into())));
    assert!(!settings.loader);
  }

  #[test]
  fn no_loader_flag_wins() {
    let file = Config { loader: Some(true), ..Default::default() };
    let cli = Overrides { no_loader: true, ..Default::default() };
    assert!(!Settings::resolve(cli, file).loader);
  }

  #[test]
  fn empty_username_means_no_login() {
    let cli = Overrides { username: Some(String::new()), password: Some("x".into()), ..Default::default() };
    assert_eq!(Settings::resolve(cli, Config::default()).credentials, None);
  }
}
