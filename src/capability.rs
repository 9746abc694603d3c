use crate::admin::AdminError;
use crate::admin::AdminErrorKind;
use crate::error::Error;

type DynError = dyn std::error::Error + 'static;

/// Find the first [`AdminError`] in the cause chain of `err`.
///
/// The transparent variants of [`Error`] hide their payload from
/// `source()`, so they are unwrapped explicitly before following the chain.
pub fn find_admin_error(err: &DynError) -> Option<&AdminError> {
  let mut current = Some(err);
  while let Some(err) = current {
    if let Some(admin) = err.downcast_ref::<AdminError>() {
      return Some(admin);
    }
    current = match err.downcast_ref::<Error>() {
      Some(Error::Admin(admin)) => return Some(admin),
      Some(Error::Transport(inner)) | Some(Error::Other(inner)) => {
        Some(&**inner as &DynError)
      }
      _ => err.source(),
    };
  }
  None
}

/// Rewrite an error signalling that the CA does not implement the
/// operation into [`Error::Unavailable`]. Every other error is returned
/// as is.
pub fn not_implemented(err: Error) -> Error {
  let unavailable = find_admin_error(&err)
    .map(|admin| admin.kind == AdminErrorKind::NotImplemented)
    .unwrap_or(false);
  if unavailable {
    tracing::debug!(error = %err, "operation not implemented by the CA");
    Error::Unavailable
  } else {
    err
  }
}
