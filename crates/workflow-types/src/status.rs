//! Status definition types for the delivery workflow.
//!
//! A [`StatusDefinition`] describes one stage of an order's lifecycle:
//! who may assign it, which statuses it can move to, what evidence a
//! transition into it needs, and which side effects entering it
//! declares. Flow logic keys off the stable [`StatusCode`]; the
//! localized `name` is presentation-only and never compared.

use crate::ActorRole;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable machine key of a status (e.g. `OUT_FOR_DELIVERY`).
///
/// Codes are the only values transition rules compare. Display names
/// can be renamed freely without touching flow topology.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusCode(String);

impl StatusCode {
	/// Creates a status code from any string-like value.
	pub fn new(code: impl Into<String>) -> Self {
		StatusCode(code.into())
	}

	/// Returns the code as a string slice.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Returns true when the code is blank.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl fmt::Display for StatusCode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for StatusCode {
	fn from(code: &str) -> Self {
		StatusCode(code.to_string())
	}
}

impl From<String> for StatusCode {
	fn from(code: String) -> Self {
		StatusCode(code)
	}
}

/// One stage an order can occupy, together with all rules attached
/// to entering and leaving it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusDefinition {
	/// Opaque unique identifier, stable across renames.
	pub id: String,
	/// Stable machine key; every flow reference uses it.
	pub code: StatusCode,
	/// Localized display label shown to operators and customers.
	pub name: String,
	/// Whether this status may currently be assigned to orders.
	/// Deactivated statuses stay valid as historical values already
	/// recorded on orders.
	#[serde(default = "default_true")]
	pub is_active: bool,
	/// Canonical reason codes accepted when a reason is required.
	/// An empty list accepts any non-empty free text.
	#[serde(default)]
	pub reason_codes: Vec<String>,
	/// Roles permitted to directly assign this status to an order.
	#[serde(default)]
	pub set_by_roles: Vec<ActorRole>,
	/// Per-role read-path visibility. Never affects write permission.
	#[serde(default)]
	pub visible_to: RoleVisibility,
	/// Role-specific capability flags while an order sits in this
	/// status.
	#[serde(default)]
	pub permissions: StatusPermissions,
	/// Transition topology of this status.
	#[serde(default)]
	pub flow: StatusFlow,
	/// Side effects declared on entry to this status.
	#[serde(default)]
	pub triggers: StatusTriggers,
}

impl StatusDefinition {
	/// Returns true when `role` may directly assign this status.
	pub fn assignable_by(&self, role: ActorRole) -> bool {
		self.set_by_roles.contains(&role)
	}

	/// Returns true when `role` sees this status in read paths.
	pub fn is_visible_to(&self, role: ActorRole) -> bool {
		self.visible_to.for_role(role)
	}
}

/// Per-role visibility flags for a status value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleVisibility {
	/// Visible in back-office views.
	#[serde(default = "default_true")]
	pub admin: bool,
	/// Visible in the merchant portal.
	#[serde(default = "default_true")]
	pub merchant: bool,
	/// Visible in the driver app.
	#[serde(default = "default_true")]
	pub driver: bool,
}

impl RoleVisibility {
	/// Returns the visibility flag for the given role.
	pub fn for_role(&self, role: ActorRole) -> bool {
		match role {
			ActorRole::Admin => self.admin,
			ActorRole::Merchant => self.merchant,
			ActorRole::Driver => self.driver,
		}
	}
}

impl Default for RoleVisibility {
	fn default() -> Self {
		RoleVisibility {
			admin: true,
			merchant: true,
			driver: true,
		}
	}
}

/// Role-specific capability flags of a status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusPermissions {
	/// Driver capabilities.
	#[serde(default)]
	pub driver: DriverPermissions,
	/// Merchant-facing exposure.
	#[serde(default)]
	pub merchant: MerchantPermissions,
	/// Field locks applied on entry.
	#[serde(default)]
	pub admin: AdminPermissions,
}

/// Driver capabilities while an order is in a status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverPermissions {
	/// Mirrors driver membership of `set_by_roles`; carried as data
	/// for catalog fidelity. Authorization checks use `set_by_roles`.
	#[serde(default)]
	pub can_set: bool,
	/// Driver transitions into this status must attach proof of
	/// delivery (photo or signature).
	#[serde(default)]
	pub require_proof: bool,
	/// Cash-on-delivery capture is permitted in this status.
	#[serde(default)]
	pub allow_cod_collection: bool,
}

/// Merchant-facing exposure of a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerchantPermissions {
	/// Shown in merchant portal order views.
	#[serde(default = "default_true")]
	pub show_in_portal: bool,
	/// Included in merchant-facing reports.
	#[serde(default = "default_true")]
	pub show_in_reports: bool,
}

impl Default for MerchantPermissions {
	fn default() -> Self {
		MerchantPermissions {
			show_in_portal: true,
			show_in_reports: true,
		}
	}
}

/// Order fields that become immutable once an order enters a status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminPermissions {
	/// The order price can no longer be edited.
	#[serde(default)]
	pub lock_price_edit: bool,
	/// The delivery address can no longer be edited.
	#[serde(default)]
	pub lock_address_edit: bool,
}

/// Transition topology of a status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusFlow {
	/// True for the status newly created orders start in. Exactly one
	/// active status per catalog carries this flag.
	#[serde(default)]
	pub is_entry: bool,
	/// Advisory terminal marker. Declared `next_codes` still apply, so
	/// exceptional onward paths stay legal (e.g. a delivered order
	/// later recording that its cash was handed in).
	#[serde(default)]
	pub is_final: bool,
	/// Codes this status may transition to, in display order.
	#[serde(default)]
	pub next_codes: Vec<StatusCode>,
	/// Source codes vetoed from transitioning into this status, even
	/// when the source declares the edge in its `next_codes`.
	#[serde(default)]
	pub blocked_from: Vec<StatusCode>,
}

/// Side effects declared on entry to a status.
///
/// The workflow engine only reports these; carrying them out
/// (messaging, return records, ledger updates) belongs to downstream
/// collaborators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTriggers {
	/// Transitions into this status must carry a non-empty reason.
	#[serde(default)]
	pub requires_reason: bool,
	/// Entering this status creates a return record downstream.
	#[serde(default)]
	pub creates_return_task: bool,
	/// Entering this status sends the customer a notification.
	#[serde(default)]
	pub sends_customer_message: bool,
	/// Entering this status adjusts the driver's collected and
	/// outstanding balances.
	#[serde(default)]
	pub updates_driver_account: bool,
}

/// Partial update for an existing status definition.
///
/// `id` and `code` are not editable: the code is the referential key
/// every flow edge uses, so renames only ever touch the display
/// `name`. Nested sections, when present, replace the stored section
/// wholesale rather than merging field by field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusUpdate {
	/// New display label.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// New active flag.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub is_active: Option<bool>,
	/// Replacement reason code list.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub reason_codes: Option<Vec<String>>,
	/// Replacement role list.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub set_by_roles: Option<Vec<ActorRole>>,
	/// Replacement visibility flags.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub visible_to: Option<RoleVisibility>,
	/// Replacement permission flags.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub permissions: Option<StatusPermissions>,
	/// Replacement flow topology.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub flow: Option<StatusFlow>,
	/// Replacement trigger flags.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub triggers: Option<StatusTriggers>,
}

impl StatusUpdate {
	/// Applies every present field onto `definition`.
	pub fn apply_to(&self, definition: &mut StatusDefinition) {
		if let Some(name) = &self.name {
			definition.name = name.clone();
		}
		if let Some(is_active) = self.is_active {
			definition.is_active = is_active;
		}
		if let Some(reason_codes) = &self.reason_codes {
			definition.reason_codes = reason_codes.clone();
		}
		if let Some(set_by_roles) = &self.set_by_roles {
			definition.set_by_roles = set_by_roles.clone();
		}
		if let Some(visible_to) = self.visible_to {
			definition.visible_to = visible_to;
		}
		if let Some(permissions) = self.permissions {
			definition.permissions = permissions;
		}
		if let Some(flow) = &self.flow {
			definition.flow = flow.clone();
		}
		if let Some(triggers) = self.triggers {
			definition.triggers = triggers;
		}
	}
}

fn default_true() -> bool {
	true
}
