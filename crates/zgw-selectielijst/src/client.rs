use reqwest::{Client, header::ACCEPT};
use zgw_core::selectielijst::{
  ClassificationLookup, LookupError, ResourceKind, Selectielijstklasse,
};

use crate::SelectielijstConfig;

/// Async client for the configured Selectielijst services.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct SelectielijstClient {
  client:   Client,
  /// `(name, base URL)` pairs with trailing slashes removed.
  services: Vec<(String, String)>,
}

impl SelectielijstClient {
  pub fn new(config: &SelectielijstConfig) -> Result<Self, reqwest::Error> {
    let client = Client::builder().timeout(config.timeout()).build()?;
    let services = config
      .services
      .iter()
      .map(|(name, base)| (name.clone(), base.trim_end_matches('/').to_owned()))
      .collect();
    Ok(Self { client, services })
  }

  /// The name of the service `url` belongs to.
  fn service_for(&self, url: &str) -> Option<&str> {
    self
      .services
      .iter()
      .find(|(_, base)| {
        url
          .strip_prefix(base.as_str())
          .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
      })
      .map(|(name, _)| name.as_str())
  }
}

fn request_error(url: &str, err: reqwest::Error) -> LookupError {
  let url = url.to_owned();
  if err.is_timeout() {
    LookupError::Timeout { url }
  } else if err.is_decode() {
    LookupError::Decode { url, message: err.to_string() }
  } else {
    LookupError::Transport { url, message: err.to_string() }
  }
}

impl ClassificationLookup for SelectielijstClient {
  async fn fetch_classification(
    &self,
    kind: ResourceKind,
    url: &str,
  ) -> Result<Selectielijstklasse, LookupError> {
    let Some(service) = self.service_for(url) else {
      tracing::warn!(url, "no selectielijst service configured for url");
      return Err(LookupError::UnknownService { url: url.to_owned() });
    };
    tracing::debug!(service, %kind, url, "fetching classification");

    let resp = self
      .client
      .get(url)
      .header(ACCEPT, "application/json")
      .send()
      .await
      .map_err(|e| request_error(url, e))?;

    let status = resp.status();
    if !status.is_success() {
      tracing::warn!(service, url, %status, "selectielijst request failed");
      return Err(LookupError::Status {
        url:    url.to_owned(),
        status: status.as_u16(),
      });
    }

    resp
      .json::<Selectielijstklasse>()
      .await
      .map_err(|e| request_error(url, e))
  }
}
