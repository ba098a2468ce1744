use std::{collections::BTreeMap, time::Duration};

use serde::Deserialize;

const DEFAULT_SERVICE: &str = "https://selectielijst.openzaak.nl/api/v1/";

/// Registry services the client may contact, keyed by a logical name.
#[derive(Debug, Clone, Deserialize)]
pub struct SelectielijstConfig {
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
  #[serde(default = "default_services")]
  pub services:     BTreeMap<String, String>,
}

impl SelectielijstConfig {
  pub fn timeout(&self) -> Duration { Duration::from_secs(self.timeout_secs) }
}

impl Default for SelectielijstConfig {
  fn default() -> Self {
    Self {
      timeout_secs: default_timeout_secs(),
      services:     default_services(),
    }
  }
}

fn default_timeout_secs() -> u64 { 10 }

fn default_services() -> BTreeMap<String, String> {
  BTreeMap::from([("selectielijst".to_owned(), DEFAULT_SERVICE.to_owned())])
}
