use crate::eab_key::EabKey;
use data_encoding::BASE64URL_NOPAD;
use serde::Serialize;
use time::macros::format_description;
use time::OffsetDateTime;

/// An [`EabKey`] projected into the strings shown to an operator.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct DisplayKey {
  pub id: String,
  pub provisioner: String,
  pub reference: String,
  pub key: String,
  pub created_at: String,
  pub bound_at: String,
  pub account: String,
}

impl From<&EabKey> for DisplayKey {
  fn from(eak: &EabKey) -> Self {
    DisplayKey {
      id: eak.id.clone(),
      provisioner: eak.provisioner.clone(),
      reference: eak.reference.clone(),
      key: encode_key(eak.hmac_key.as_bytes()),
      created_at: format_timestamp(eak.created_at),
      bound_at: eak.bound_at().map(format_timestamp).unwrap_or_default(),
      account: eak.account().to_string(),
    }
  }
}

/// Encode key material with the unpadded URL-safe base64 alphabet.
pub fn encode_key(key: &[u8]) -> String {
  BASE64URL_NOPAD.encode(key)
}

/// Format as `YYYY-MM-DD HH:MM:SS ±HH:MM` in the timestamp's own offset.
pub fn format_timestamp(at: OffsetDateTime) -> String {
  at.format(format_description!(
    "[year]-[month]-[day] [hour]:[minute]:[second] [offset_hour sign:mandatory]:[offset_minute]"
  ))
  .unwrap_or_default()
}

impl std::fmt::Display for DisplayKey {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let fields = [
      ("id", &self.id),
      ("provisioner", &self.provisioner),
      ("reference", &self.reference),
      ("key", &self.key),
      ("created_at", &self.created_at),
      ("bound_at", &self.bound_at),
      ("account", &self.account),
    ];
    for (i, (name, value)) in fields.iter().enumerate() {
      if i > 0 {
        f.write_str(" ")?;
      }
      if needs_quotes(value) {
        write!(f, "{}={:?}", name, value)?;
      } else {
        write!(f, "{}={}", name, value)?;
      }
    }
    Ok(())
  }
}

fn needs_quotes(value: &str) -> bool {
  value
    .chars()
    .any(|c| c.is_whitespace() || c.is_control() || c == '"' || c == '=')
}
