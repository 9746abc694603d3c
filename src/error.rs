use crate::admin::AdminError;

/// The link operators are pointed to when the CA does not ship EAB
/// management.
pub const CERTIFICATE_MANAGER_URL: &str = "https://u.step.sm/cm";

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("validation error: {0}")]
  Validation(&'static str),

  #[error(transparent)]
  Admin(#[from] AdminError),

  #[error(
    "this functionality is currently only available in Certificate Manager: {} 🚀 🤩",
    CERTIFICATE_MANAGER_URL
  )]
  Unavailable,

  #[error("invalid EAB key record: {0}")]
  InvalidRecord(String),

  #[error("failed to write output: {0}")]
  Io(#[from] std::io::Error),

  #[error(transparent)]
  Transport(Box<dyn std::error::Error + Send + Sync>),

  #[error(transparent)]
  Other(Box<dyn std::error::Error + Send + Sync>),
}

pub fn map_transport_err<T, E: std::error::Error + Send + Sync + 'static>(
  res: Result<T, E>,
) -> Result<T, Error> {
  res.map_err(|err| Error::Transport(Box::new(err)))
}

impl From<reqwest::Error> for Error {
  fn from(err: reqwest::Error) -> Self {
    Self::Transport(Box::new(err))
  }
}

impl From<serde_json::Error> for Error {
  fn from(err: serde_json::Error) -> Self {
    Self::Transport(Box::new(err))
  }
}
