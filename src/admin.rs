use crate::eab_key::EabKey;
use crate::error::Error;
use serde::Deserialize;

/// The operations a CA administrative endpoint offers for EAB keys.
///
/// Every call is a single round trip that resolves to either the
/// requested records or an [`Error`]. Errors that the CA reports in a
/// structured way are surfaced as [`Error::Admin`], possibly wrapped.
#[allow(async_fn_in_trait)]
pub trait AdminClient {
  /// Fetch every EAB key scoped to `provisioner`, in server order.
  async fn list_eab_keys(
    &self,
    provisioner: &str,
  ) -> Result<Vec<EabKey>, Error>;

  /// Ask the CA to mint a new EAB key for `provisioner`, labelled with
  /// `reference`.
  async fn create_eab_key(
    &self,
    provisioner: &str,
    reference: &str,
  ) -> Result<EabKey, Error>;

  /// Delete the EAB key identified by `id`.
  async fn delete_eab_key(&self, id: &str) -> Result<(), Error>;
}

/// The category of an [`AdminError`], decoded from the `type` field of
/// the admin API error body.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(from = "String")]
pub enum AdminErrorKind {
  NotFound,
  BadRequest,
  Unauthorized,
  Forbidden,
  NotImplemented,
  ServerInternal,
  Other(String),
}

impl AdminErrorKind {
  pub fn as_str(&self) -> &str {
    match self {
      AdminErrorKind::NotFound => "notFound",
      AdminErrorKind::BadRequest => "badRequest",
      AdminErrorKind::Unauthorized => "unauthorized",
      AdminErrorKind::Forbidden => "forbidden",
      AdminErrorKind::NotImplemented => "notImplemented",
      AdminErrorKind::ServerInternal => "serverInternalError",
      AdminErrorKind::Other(other) if other.is_empty() => "unknown",
      AdminErrorKind::Other(other) => other.as_str(),
    }
  }

  /// Best guess at the kind when the server did not send a decodable body.
  pub fn from_status(status: u16) -> Self {
    match status {
      400 => AdminErrorKind::BadRequest,
      401 => AdminErrorKind::Unauthorized,
      403 => AdminErrorKind::Forbidden,
      404 => AdminErrorKind::NotFound,
      501 => AdminErrorKind::NotImplemented,
      500..=599 => AdminErrorKind::ServerInternal,
      other => AdminErrorKind::Other(other.to_string()),
    }
  }
}

impl From<String> for AdminErrorKind {
  fn from(typ: String) -> Self {
    match typ.as_str() {
      "notFound" => AdminErrorKind::NotFound,
      "badRequest" => AdminErrorKind::BadRequest,
      "unauthorized" => AdminErrorKind::Unauthorized,
      "forbidden" => AdminErrorKind::Forbidden,
      "notImplemented" => AdminErrorKind::NotImplemented,
      "serverInternalError" => AdminErrorKind::ServerInternal,
      _ => AdminErrorKind::Other(typ),
    }
  }
}

impl Default for AdminErrorKind {
  fn default() -> Self {
    AdminErrorKind::Other(String::new())
  }
}

impl std::fmt::Display for AdminErrorKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// This is an error as returned by the CA admin API.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AdminError {
  /// The type of this error.
  #[serde(rename = "type", default)]
  pub kind: AdminErrorKind,
  /// The status code of this error.
  pub status: Option<u16>,
  /// The human readable extra description for this error.
  pub detail: Option<String>,
  /// The message the CA wants shown to the operator.
  pub message: Option<String>,
}

impl AdminError {
  pub fn new(kind: AdminErrorKind, message: impl Into<String>) -> Self {
    AdminError {
      kind,
      status: None,
      detail: None,
      message: Some(message.into()),
    }
  }

  /// Decode the body of a non-2xx response.
  pub(crate) fn from_response(status: u16, body: &[u8]) -> Self {
    match serde_json::from_slice::<AdminError>(body) {
      Ok(mut err) => {
        if err.status.is_none() {
          err.status = Some(status);
        }
        err
      }
      Err(_) => {
        let text = String::from_utf8_lossy(body).trim().to_string();
        AdminError {
          kind: AdminErrorKind::from_status(status),
          status: Some(status),
          detail: None,
          message: if text.is_empty() { None } else { Some(text) },
        }
      }
    }
  }
}

impl std::error::Error for AdminError {}

impl std::fmt::Display for AdminError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let text = self
      .message
      .as_deref()
      .or(self.detail.as_deref())
      .unwrap_or("no details given");
    match self.status {
      Some(status) => {
        write!(f, "AdminError({}, {}): {}", self.kind, status, text)
      }
      None => write!(f, "AdminError({}): {}", self.kind, text),
    }
  }
}
