//! Validated status catalog.
//!
//! [`StatusCatalog`] is the immutable, insertion-ordered collection of
//! status definitions the workflow engine evaluates against.
//! Construction runs every catalog invariant and reports the complete
//! list of violations, so a broken catalog refuses to load instead of
//! silently dropping bad edges at evaluation time.

use crate::{StatusCode, StatusDefinition};
use std::collections::{HashMap, HashSet};
use std::fmt;
use thiserror::Error;

/// Which flow list of a definition a violation points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowList {
	/// The `next_codes` list.
	NextCodes,
	/// The `blocked_from` list.
	BlockedFrom,
}

impl fmt::Display for FlowList {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			FlowList::NextCodes => f.write_str("next_codes"),
			FlowList::BlockedFrom => f.write_str("blocked_from"),
		}
	}
}

/// A single broken catalog invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogViolation {
	/// Two definitions share a machine code.
	#[error("duplicate status code {0}")]
	DuplicateCode(StatusCode),
	/// Two definitions share an identifier.
	#[error("duplicate status id '{0}'")]
	DuplicateId(String),
	/// A definition carries a blank code.
	#[error("status id '{id}' has an empty code")]
	EmptyCode {
		/// Identifier of the offending definition.
		id: String,
	},
	/// A status lists itself in one of its own flow lists.
	#[error("status {code} lists itself in {list}")]
	SelfReference {
		/// Code of the offending definition.
		code: StatusCode,
		/// Flow list containing the self reference.
		list: FlowList,
	},
	/// A flow list references a code missing from the catalog.
	#[error("status {code} references unknown code {missing} in {list}")]
	UnknownReference {
		/// Code of the referencing definition.
		code: StatusCode,
		/// Flow list containing the dangling reference.
		list: FlowList,
		/// The code that does not exist.
		missing: StatusCode,
	},
	/// No active status carries the entry flag.
	#[error("catalog has no active entry status")]
	NoEntryStatus,
	/// More than one active status carries the entry flag.
	#[error("catalog has multiple active entry statuses: {}", format_codes(.0))]
	MultipleEntryStatuses(Vec<StatusCode>),
}

/// Errors raised by catalog construction, lookups, and maintenance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
	/// The referenced status code does not exist in the catalog.
	#[error("status not found: {0}")]
	NotFound(StatusCode),
	/// One or more catalog invariants are broken. Carries every
	/// violation found, not just the first.
	#[error("catalog validation failed: {}", format_violations(.0))]
	Validation(Vec<CatalogViolation>),
	/// The status is still referenced by other definitions' flow lists
	/// and cannot be removed until those references are dropped.
	#[error("status {code} is still referenced by: {}", format_codes(.referenced_by))]
	InUse {
		/// Code of the status that was to be removed.
		code: StatusCode,
		/// Codes whose flow lists still reference it.
		referenced_by: Vec<StatusCode>,
	},
}

fn format_codes(codes: &[StatusCode]) -> String {
	codes
		.iter()
		.map(StatusCode::as_str)
		.collect::<Vec<_>>()
		.join(", ")
}

fn format_violations(violations: &[CatalogViolation]) -> String {
	violations
		.iter()
		.map(|violation| violation.to_string())
		.collect::<Vec<_>>()
		.join("; ")
}

/// Validated, insertion-ordered collection of status definitions.
///
/// Instances are immutable after construction; catalog maintenance
/// builds a replacement catalog and publishes it wholesale, so readers
/// always observe a coherent rule set.
#[derive(Debug, Clone)]
pub struct StatusCatalog {
	/// Definitions in load order.
	statuses: Vec<StatusDefinition>,
	/// Code to position in `statuses`.
	index: HashMap<StatusCode, usize>,
	/// Position of the active entry status.
	entry: usize,
}

impl StatusCatalog {
	/// Validates `statuses` and builds the catalog.
	///
	/// Checks that codes are non-empty and unique, identifiers are
	/// unique, no definition references itself, every flow reference
	/// resolves, and exactly one active definition is flagged as the
	/// entry status. All violations found are reported together in
	/// [`CatalogError::Validation`].
	pub fn new(statuses: Vec<StatusDefinition>) -> Result<Self, CatalogError> {
		let mut violations = Vec::new();

		let mut index = HashMap::with_capacity(statuses.len());
		let mut seen_ids = HashSet::with_capacity(statuses.len());
		for (position, status) in statuses.iter().enumerate() {
			if status.code.is_empty() {
				violations.push(CatalogViolation::EmptyCode {
					id: status.id.clone(),
				});
			}
			if index.insert(status.code.clone(), position).is_some() {
				violations.push(CatalogViolation::DuplicateCode(status.code.clone()));
			}
			if !seen_ids.insert(status.id.clone()) {
				violations.push(CatalogViolation::DuplicateId(status.id.clone()));
			}
		}

		for status in &statuses {
			check_flow_list(
				&index,
				status,
				FlowList::NextCodes,
				&status.flow.next_codes,
				&mut violations,
			);
			check_flow_list(
				&index,
				status,
				FlowList::BlockedFrom,
				&status.flow.blocked_from,
				&mut violations,
			);
		}

		let entries: Vec<usize> = statuses
			.iter()
			.enumerate()
			.filter(|(_, status)| status.is_active && status.flow.is_entry)
			.map(|(position, _)| position)
			.collect();
		let entry = match entries.as_slice() {
			[single] => *single,
			[] => {
				violations.push(CatalogViolation::NoEntryStatus);
				0
			},
			many => {
				violations.push(CatalogViolation::MultipleEntryStatuses(
					many.iter().map(|&position| statuses[position].code.clone()).collect(),
				));
				0
			},
		};

		if !violations.is_empty() {
			return Err(CatalogError::Validation(violations));
		}

		Ok(StatusCatalog {
			statuses,
			index,
			entry,
		})
	}

	/// Looks up a definition by code.
	pub fn get(&self, code: &StatusCode) -> Option<&StatusDefinition> {
		self.index.get(code).map(|&position| &self.statuses[position])
	}

	/// Returns true when the catalog contains `code`.
	pub fn contains(&self, code: &StatusCode) -> bool {
		self.index.contains_key(code)
	}

	/// All definitions in catalog (load) order.
	pub fn statuses(&self) -> &[StatusDefinition] {
		&self.statuses
	}

	/// The status newly created orders start in.
	pub fn entry_status(&self) -> &StatusDefinition {
		&self.statuses[self.entry]
	}

	/// Codes of definitions whose flow lists reference `code`.
	pub fn referencing(&self, code: &StatusCode) -> Vec<StatusCode> {
		self.statuses
			.iter()
			.filter(|status| {
				status.flow.next_codes.contains(code) || status.flow.blocked_from.contains(code)
			})
			.map(|status| status.code.clone())
			.collect()
	}

	/// Number of definitions in the catalog.
	pub fn len(&self) -> usize {
		self.statuses.len()
	}

	/// Returns true when the catalog holds no definitions.
	pub fn is_empty(&self) -> bool {
		self.statuses.is_empty()
	}

	/// The definitions as an owned list, used as the base for building
	/// a modified catalog.
	pub fn to_definitions(&self) -> Vec<StatusDefinition> {
		self.statuses.clone()
	}
}

fn check_flow_list(
	index: &HashMap<StatusCode, usize>,
	status: &StatusDefinition,
	list: FlowList,
	codes: &[StatusCode],
	violations: &mut Vec<CatalogViolation>,
) {
	for code in codes {
		if *code == status.code {
			violations.push(CatalogViolation::SelfReference {
				code: status.code.clone(),
				list,
			});
		} else if !index.contains_key(code) {
			violations.push(CatalogViolation::UnknownReference {
				code: status.code.clone(),
				list,
				missing: code.clone(),
			});
		}
	}
}
