//! Manage ACME External Account Binding (EAB) keys through the admin API
//! of a certificate authority.
//!
//! The [`commands`] module holds the three operations (list, add and
//! remove). They talk to the CA through an [`AdminClient`], of which
//! [`HttpAdminClient`] is the HTTP implementation.

mod admin;
mod capability;
pub mod commands;
mod client;
mod display;
mod eab_key;
mod error;

pub use admin::*;
pub use capability::*;
pub use client::*;
pub use commands::OutputFormat;
pub use display::*;
pub use eab_key::*;
pub use error::*;
