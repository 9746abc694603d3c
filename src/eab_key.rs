use crate::error::Error;
use data_encoding::BASE64;
use serde::Deserialize;
use time::OffsetDateTime;

/// Unix timestamp of `0001-01-01T00:00:00Z`, which the CA may send for a
/// timestamp that was never set.
const ZERO_TIME_UNIX: i64 = -62_135_596_800;

/// The raw HMAC secret of an EAB key. The bytes are never inspected.
#[derive(Clone, PartialEq, Eq)]
pub struct HmacKey(Vec<u8>);

impl HmacKey {
  pub fn as_bytes(&self) -> &[u8] {
    &self.0
  }
}

impl From<Vec<u8>> for HmacKey {
  fn from(bytes: Vec<u8>) -> Self {
    HmacKey(bytes)
  }
}

impl std::fmt::Debug for HmacKey {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "HmacKey([redacted; {}])", self.0.len())
  }
}

/// The ACME account an EAB key was consumed by, and when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
  account: String,
  bound_at: OffsetDateTime,
}

impl Binding {
  /// Returns `None` for an empty account, which means the key is unbound.
  pub fn new(
    account: impl Into<String>,
    bound_at: OffsetDateTime,
  ) -> Option<Self> {
    let account = account.into();
    if account.is_empty() {
      return None;
    }
    Some(Binding { account, bound_at })
  }

  pub fn account(&self) -> &str {
    &self.account
  }

  pub fn bound_at(&self) -> OffsetDateTime {
    self.bound_at
  }
}

/// An ACME External Account Binding key as stored by the CA.
///
/// Records are owned by the CA; this crate only ever reads them. The
/// account and bind time are held together in [`Binding`] so a record
/// can never carry one without the other.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(try_from = "RawEabKey")]
pub struct EabKey {
  /// The CA assigned identifier of this key.
  pub id: String,
  /// The ACME provisioner this key is scoped to.
  pub provisioner: String,
  /// The operator supplied label, possibly empty.
  pub reference: String,
  /// The shared secret handed to the ACME client.
  pub hmac_key: HmacKey,
  /// When the CA created this key.
  pub created_at: OffsetDateTime,
  /// Set once an ACME account has been created with this key.
  pub binding: Option<Binding>,
}

impl EabKey {
  /// The bind time, or `None` while the key is unused.
  pub fn bound_at(&self) -> Option<OffsetDateTime> {
    self.binding.as_ref().map(Binding::bound_at)
  }

  /// The bound account, or an empty string while the key is unused.
  pub fn account(&self) -> &str {
    self.binding.as_ref().map(Binding::account).unwrap_or_default()
  }
}

/// An EAB key exactly as the CA encodes it, before the key material and
/// binding are checked.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawEabKey {
  id: String,
  #[serde(default)]
  provisioner: String,
  #[serde(default)]
  reference: String,
  #[serde(default)]
  account: String,
  #[serde(default)]
  hmac_key: String,
  #[serde(with = "time::serde::rfc3339")]
  created_at: OffsetDateTime,
  #[serde(default, with = "time::serde::rfc3339::option")]
  bound_at: Option<OffsetDateTime>,
}

impl TryFrom<RawEabKey> for EabKey {
  type Error = Error;

  fn try_from(raw: RawEabKey) -> Result<Self, Self::Error> {
    let hmac_key = BASE64.decode(raw.hmac_key.as_bytes()).map_err(|err| {
      Error::InvalidRecord(format!("key {}: hmacKey: {}", raw.id, err))
    })?;

    let bound_at = raw
      .bound_at
      .filter(|at| at.unix_timestamp() != ZERO_TIME_UNIX);
    let binding = match (bound_at, raw.account.is_empty()) {
      (None, true) => None,
      (Some(bound_at), false) => Binding::new(raw.account, bound_at),
      (Some(_), true) => {
        return Err(Error::InvalidRecord(format!(
          "key {} is bound but has no account",
          raw.id
        )))
      }
      (None, false) => {
        return Err(Error::InvalidRecord(format!(
          "key {} has account {:?} but no bind time",
          raw.id, raw.account
        )))
      }
    };

    Ok(EabKey {
      id: raw.id,
      provisioner: raw.provisioner,
      reference: raw.reference,
      hmac_key: hmac_key.into(),
      created_at: raw.created_at,
      binding,
    })
  }
}
