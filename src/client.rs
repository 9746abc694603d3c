use crate::admin::AdminClient;
use crate::admin::AdminError;
use crate::eab_key::EabKey;
use crate::eab_key::RawEabKey;
use crate::error::*;
use reqwest::RequestBuilder;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;
use tracing::field;
use tracing::instrument;
use tracing::Level;
use tracing::Span;

/// Configures and creates an [`HttpAdminClient`].
pub struct AdminClientBuilder {
  url: String,
  http_client: Option<reqwest::Client>,
  root_certificate: Option<PathBuf>,
  timeout: Option<Duration>,
  token: Option<String>,
  page_size: Option<u32>,
}

impl AdminClientBuilder {
  /// `url` is the base URL of the CA, e.g. `https://ca.example.com:9000`.
  pub fn new(url: String) -> Self {
    AdminClientBuilder {
      url,
      http_client: None,
      root_certificate: None,
      timeout: None,
      token: None,
      page_size: None,
    }
  }

  /// Use a preconfigured HTTP client instead of a default one.
  pub fn http_client(&mut self, http_client: reqwest::Client) -> &mut Self {
    self.http_client = Some(http_client);
    self
  }

  /// A PEM file with the CA root to trust. Ignored when a custom HTTP
  /// client is set.
  pub fn root_certificate(&mut self, path: PathBuf) -> &mut Self {
    self.root_certificate = Some(path);
    self
  }

  /// Give up on requests that take longer than `timeout`. Ignored when a
  /// custom HTTP client is set.
  pub fn timeout(&mut self, timeout: Duration) -> &mut Self {
    self.timeout = Some(timeout);
    self
  }

  /// The admin token sent in the `Authorization` header.
  pub fn token(&mut self, token: String) -> &mut Self {
    self.token = Some(token);
    self
  }

  /// How many keys to request per page when listing.
  pub fn page_size(&mut self, page_size: u32) -> &mut Self {
    self.page_size = Some(page_size);
    self
  }

  pub async fn build(&mut self) -> Result<HttpAdminClient, Error> {
    let base_url = map_transport_err(Url::parse(&self.url))?;
    if base_url.cannot_be_a_base() {
      return Err(Error::Validation("CA URL must be an http(s) URL"));
    }

    let http_client = match self.http_client.clone() {
      Some(http_client) => http_client,
      None => {
        let mut builder = reqwest::Client::builder();
        if let Some(path) = &self.root_certificate {
          let raw = map_transport_err(tokio::fs::read(path).await)?;
          let cert = reqwest::Certificate::from_pem(&raw)?;
          builder = builder.add_root_certificate(cert);
        }
        if let Some(timeout) = self.timeout {
          builder = builder.timeout(timeout);
        }
        builder.build()?
      }
    };

    Ok(HttpAdminClient {
      http_client,
      base_url,
      token: self.token.clone(),
      page_size: self.page_size,
    })
  }
}

/// An [`AdminClient`] talking JSON over HTTP to the CA admin API.
#[derive(Debug, Clone)]
pub struct HttpAdminClient {
  http_client: reqwest::Client,
  base_url: Url,
  token: Option<String>,
  page_size: Option<u32>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct EabKeyPage {
  #[serde(default)]
  eaks: Vec<RawEabKey>,
  #[serde(default)]
  next_cursor: String,
}

impl HttpAdminClient {
  fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
    let mut url = self.base_url.clone();
    url
      .path_segments_mut()
      .map_err(|_| Error::Validation("CA URL must be an http(s) URL"))?
      .pop_if_empty()
      .push("admin")
      .extend(segments);
    Ok(url)
  }

  async fn execute(&self, req: RequestBuilder) -> Result<Vec<u8>, Error> {
    let req = match &self.token {
      Some(token) => req.header(reqwest::header::AUTHORIZATION, token),
      None => req,
    };
    let resp = req.send().await?;
    let status = resp.status();
    let body = resp.bytes().await?;

    if !status.is_success() {
      let err = AdminError::from_response(status.as_u16(), &body);
      tracing::debug!(%status, kind = %err.kind, "admin API returned an error");
      return Err(err.into());
    }

    Ok(body.to_vec())
  }

  async fn request<R: DeserializeOwned>(
    &self,
    req: RequestBuilder,
  ) -> Result<R, Error> {
    let body = self.execute(req).await?;
    Ok(serde_json::from_slice(&body)?)
  }
}

impl AdminClient for HttpAdminClient {
  #[instrument(level = Level::INFO, name = "acme_eab::HttpAdminClient::list_eab_keys", err, skip(self), fields(pages = field::Empty))]
  async fn list_eab_keys(
    &self,
    provisioner: &str,
  ) -> Result<Vec<EabKey>, Error> {
    let url = self.endpoint(&["acme", "eab", provisioner])?;

    let mut keys = vec![];
    let mut cursor = String::new();
    let mut seen = HashSet::new();
    let mut pages = 0;

    loop {
      pages += 1;

      let mut query = vec![];
      if !cursor.is_empty() {
        query.push(("cursor", cursor.clone()));
      }
      if let Some(limit) = self.page_size {
        query.push(("limit", limit.to_string()));
      }

      let page: EabKeyPage = self
        .request(self.http_client.get(url.clone()).query(&query))
        .await?;
      for raw in page.eaks {
        keys.push(EabKey::try_from(raw)?);
      }

      if page.next_cursor.is_empty() {
        break;
      }
      if !seen.insert(page.next_cursor.clone()) {
        tracing::warn!(cursor = %page.next_cursor, "cursor repeated, stopping");
        break;
      }
      cursor = page.next_cursor;
    }

    Span::current().record("pages", pages);
    Ok(keys)
  }

  #[instrument(level = Level::INFO, name = "acme_eab::HttpAdminClient::create_eab_key", err, skip(self), fields(id = field::Empty))]
  async fn create_eab_key(
    &self,
    provisioner: &str,
    reference: &str,
  ) -> Result<EabKey, Error> {
    let url = self.endpoint(&["acme", "eab", provisioner])?;

    let raw: RawEabKey = self
      .request(
        self
          .http_client
          .post(url)
          .json(&json!({ "reference": reference })),
      )
      .await?;
    let key = EabKey::try_from(raw)?;

    Span::current().record("id", &field::display(&key.id));
    Ok(key)
  }

  #[instrument(level = Level::INFO, name = "acme_eab::HttpAdminClient::delete_eab_key", err, skip(self))]
  async fn delete_eab_key(&self, id: &str) -> Result<(), Error> {
    let url = self.endpoint(&["acme", "eab", id])?;
    self.execute(self.http_client.delete(url)).await?;
    Ok(())
  }
}
