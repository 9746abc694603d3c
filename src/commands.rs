use crate::admin::AdminClient;
use crate::capability::not_implemented;
use crate::display::DisplayKey;
use crate::error::Error;
use std::io::Write;
use tracing::instrument;
use tracing::Level;

/// How results are written to the output stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
  /// One `key=value` line per EAB key.
  #[default]
  Text,
  /// JSON objects, for scripting.
  Json,
}

fn required(value: &str, msg: &'static str) -> Result<(), Error> {
  if value.is_empty() {
    return Err(Error::Validation(msg));
  }
  Ok(())
}

/// Check the arguments of [`list`] without contacting the CA.
pub fn check_list(provisioner: &str) -> Result<(), Error> {
  required(provisioner, "provisioner name is required")
}

/// Check the arguments of [`add`] without contacting the CA.
pub fn check_add(provisioner: &str, reference: &str) -> Result<(), Error> {
  required(provisioner, "provisioner name is required")?;
  if reference.chars().any(char::is_control) {
    return Err(Error::Validation(
      "reference must not contain control characters",
    ));
  }
  Ok(())
}

/// Check the arguments of [`remove`] without contacting the CA.
pub fn check_remove(id: &str) -> Result<(), Error> {
  required(id, "key id is required")
}

fn write_keys(
  out: &mut impl Write,
  keys: &[DisplayKey],
  format: OutputFormat,
) -> Result<(), Error> {
  match format {
    OutputFormat::Text => {
      for key in keys {
        writeln!(out, "{}", key)?;
      }
    }
    OutputFormat::Json => {
      serde_json::to_writer_pretty(&mut *out, keys)?;
      writeln!(out)?;
    }
  }
  Ok(())
}

/// List the EAB keys of `provisioner` in the order the CA returns them.
#[instrument(level = Level::INFO, name = "acme_eab::list", err, skip(client, out))]
pub async fn list<C: AdminClient>(
  client: &C,
  out: &mut impl Write,
  provisioner: &str,
  format: OutputFormat,
) -> Result<(), Error> {
  check_list(provisioner)?;

  let keys = client
    .list_eab_keys(provisioner)
    .await
    .map_err(not_implemented)?;
  let keys: Vec<DisplayKey> = keys.iter().map(DisplayKey::from).collect();

  if keys.is_empty() && format == OutputFormat::Text {
    writeln!(out, "no keys found for provisioner {:?}", provisioner)?;
    return Ok(());
  }

  write_keys(out, &keys, format)
}

/// Create a new EAB key for `provisioner` and print it, key material
/// included. The CA does not hand the key out again.
#[instrument(level = Level::INFO, name = "acme_eab::add", err, skip(client, out))]
pub async fn add<C: AdminClient>(
  client: &C,
  out: &mut impl Write,
  provisioner: &str,
  reference: &str,
  format: OutputFormat,
) -> Result<(), Error> {
  check_add(provisioner, reference)?;

  let key = client
    .create_eab_key(provisioner, reference)
    .await
    .map_err(not_implemented)?;
  let key = DisplayKey::from(&key);

  match format {
    OutputFormat::Text => writeln!(out, "{}", key)?,
    OutputFormat::Json => {
      serde_json::to_writer_pretty(&mut *out, &key)?;
      writeln!(out)?;
    }
  }
  Ok(())
}

/// Delete the EAB key `id`.
#[instrument(level = Level::INFO, name = "acme_eab::remove", err, skip(client, out))]
pub async fn remove<C: AdminClient>(
  client: &C,
  out: &mut impl Write,
  id: &str,
) -> Result<(), Error> {
  check_remove(id)?;

  client.delete_eab_key(id).await.map_err(not_implemented)?;

  writeln!(out, "EAB key {:?} removed", id)?;
  Ok(())
}
