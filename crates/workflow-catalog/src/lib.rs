//! Catalog sourcing for the delivery status workflow.
//!
//! The workflow engine validates whatever catalog it is handed; this
//! crate is where catalogs come from. It ships the built-in delivery
//! status set and a TOML file format for deployments that maintain
//! their own. A failed load always surfaces to the caller — this crate
//! never substitutes a different catalog than the one requested.

mod defaults;

pub use defaults::{default_catalog, default_statuses};

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use workflow_types::{CatalogError, StatusCatalog, StatusDefinition};

/// Errors that can occur while loading a catalog file.
#[derive(Debug, Error)]
pub enum CatalogFileError {
	/// Error during file I/O.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error parsing the TOML document.
	#[error("catalog parse error: {0}")]
	Parse(String),
	/// The parsed definitions break a catalog invariant.
	#[error(transparent)]
	Invalid(#[from] CatalogError),
}

impl From<toml::de::Error> for CatalogFileError {
	fn from(err: toml::de::Error) -> Self {
		// Keep the parser's message without the input excerpt.
		CatalogFileError::Parse(err.message().to_string())
	}
}

/// TOML document carrying a status catalog.
///
/// ```toml
/// [[statuses]]
/// id = "1"
/// code = "PENDING"
/// name = "قيد الانتظار"
/// set_by_roles = ["admin", "merchant"]
///
/// [statuses.flow]
/// is_entry = true
/// next_codes = ["OUT_FOR_DELIVERY"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
	/// Status definitions in catalog order.
	pub statuses: Vec<StatusDefinition>,
}

impl CatalogFile {
	/// Validates the parsed definitions into a usable catalog.
	pub fn into_catalog(self) -> Result<StatusCatalog, CatalogError> {
		StatusCatalog::new(self.statuses)
	}

	/// Reads, parses, and validates a catalog from a TOML file.
	pub async fn load(path: impl AsRef<Path>) -> Result<StatusCatalog, CatalogFileError> {
		let path = path.as_ref();
		let content = tokio::fs::read_to_string(path).await?;
		let catalog = content.parse::<CatalogFile>()?.into_catalog()?;
		tracing::info!(
			path = %path.display(),
			statuses = catalog.len(),
			"Loaded status catalog"
		);
		Ok(catalog)
	}
}

impl FromStr for CatalogFile {
	type Err = CatalogFileError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(toml::from_str(s)?)
	}
}
