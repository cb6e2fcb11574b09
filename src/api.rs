use std::collections::BTreeMap;

use anyhow::{Context, Result};
use reqwest::{Client, Url};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::constants::constants;
use crate::models::{ApiReply, DeleteRequest, Entity, InsertRequest, SearchItem, SearchResponse};

/// HTTP client for the catalog backend. Cheap to clone; clones share the session cookie.
#[derive(Clone)]
pub struct StudioClient {
  http: Client,
  base: Url,
}

impl StudioClient {
  pub fn new(server: &str) -> Result<Self> {
    let base = Url::parse(server).with_context(|| format!("Invalid server URL: {}", server))?;
    let http = Client::builder().cookie_store(true).build().context("Failed to build HTTP client")?;
    Ok(Self { http, base })
  }

  pub fn base(&self) -> &Url {
    &self.base
  }

  fn endpoint(&self, path: &str) -> Result<Url> {
    self.base.join(path).with_context(|| format!("Invalid endpoint path: {}", path))
  }

  /// `/search?q=<term>` with the term percent-encoded.
  pub fn search_url(&self, term: &str) -> Result<Url> {
    let mut url = self.endpoint(&constants().search_path)?;
    url.query_pairs_mut().append_pair("q", term);
    Ok(url)
  }

  /// Sign in through the login form. The session cookie lands in the client's store.
  /// Returns `false` when the server bounced us back to the login page.
  pub async fn login(&self, username: &str, password: &str) -> Result<bool> {
    let login_path = &constants().login_path;
    let url = self.endpoint(login_path)?;
    let response = self
      .http
      .post(url)
      .form(&[("username", username), ("password", password)])
      .send()
      .await
      .context("Login request failed")?;
    let signed_in = response.url().path() != login_path.as_str();
    info!(username = %username, signed_in, "api: login");
    Ok(signed_in)
  }

  pub async fn search(&self, term: &str) -> Result<Vec<SearchItem>> {
    let url = self.search_url(term)?;
    debug!(url = %url, "api: search");
    let response = self.http.get(url).send().await.context("Search request failed")?;
    let body: SearchResponse = response.json().await.context("Search response was not valid JSON")?;
    Ok(body.into_items())
  }

  pub async fn insert(&self, entity: Entity, data: &BTreeMap<String, String>) -> Result<ApiReply> {
    self.post_json(&constants().insert_path, &InsertRequest { entity, data }).await
  }

  pub async fn delete(&self, entity: Entity, id: &str) -> Result<ApiReply> {
    self.post_json(&constants().delete_path, &DeleteRequest { entity, id }).await
  }

  /// POST a JSON body and decode whatever JSON comes back, regardless of status code.
  async fn post_json<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<ApiReply> {
    let url = self.endpoint(path)?;
    debug!(url = %url, "api: post");
    let response = self.http.post(url).json(body).send().await.with_context(|| format!("POST {} failed", path))?;
    let status = response.status();
    let value: Value = response.json().await.with_context(|| format!("POST {} returned non-JSON ({})", path, status))?;
    Ok(ApiReply::from_value(&value))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn search_url_encodes_term() {
    let client = StudioClient::new("http://localhost:5000").unwrap();
    let url = client.search_url("rock & roll/ü").unwrap();
    assert_eq!(url.path(), "/search");
    let (_, q) = url.query_pairs().find(|(k, _)| k == "q").unwrap();
    assert_eq!(q, "rock & roll/ü");
    assert_eq!(url.query(), Some("q=rock+%26+roll%2F%C3%BC"));
  }

  #[test]
  fn endpoints_resolve_against_base() {
    let client = StudioClient::new("https://studio.example.com/").unwrap();
    assert_eq!(client.endpoint("/api/insert").unwrap().as_str(), "https://studio.example.com/api/insert");
    assert_eq!(client.endpoint("/api/delete").unwrap().as_str(), "https://studio.example.com/api/delete");
  }

  #[test]
  fn invalid_server_is_rejected() {
    assert!(StudioClient::new("not a server").is_err());
  }
}
