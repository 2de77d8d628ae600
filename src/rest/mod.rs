//! Generic resource model for AccountRight records.
//!
//! - **[`Model`]**: query, paginate, create, update and delete one kind of record
//! - **[`QueryParams`]**: OData `$orderby` / `$top` / `$skip` / `$filter` options
//! - **[`Record`]** and **[`FieldValue`]**: dynamically shaped records with
//!   date-aware serialization
//! - **[`ResourceRegistry`]** and **[`ResourceKind`]**: the names and routes of
//!   the resource kinds a [`Session`](crate::Session) can create models for
//! - **[`ModelError`]**: everything a model operation can fail with
//!
//! Responses are returned as [`serde_json::Value`]; AccountRight's payloads
//! vary by kind and API version, so no schema is imposed.
//!
//! # Example
//!
//! ```rust,ignore
//! use myob_api::rest::{QueryParams, Record};
//!
//! let mut accounts = session.model("Account")?;
//!
//! let params = QueryParams::new().filter_eq("Type", "Bank").orderby("Name");
//! let bank_accounts = accounts.all_items(Some(&params)).await?;
//!
//! let account = accounts.find("d5a9e4c1-...").await?;
//! let first = accounts.first(None).await?;
//! ```

mod errors;
mod model;
mod query;
mod record;
mod registry;

pub use errors::ModelError;
pub use model::Model;
pub use query::{QueryParams, QueryValue};
pub use record::{FieldValue, Record, ID_KEY};
pub use registry::{ResourceKind, ResourceRegistry, COMPANY_FILE_KIND};
