//! Built-in delivery status catalog.
//!
//! The status set the platform ships with. Codes are stable machine
//! keys; display names are the operator-facing Arabic labels and are
//! free to change without touching any flow logic. Deployments that
//! maintain their own catalog load it from TOML instead, see
//! [`CatalogFile`](crate::CatalogFile).

use workflow_types::{
	ActorRole, RoleVisibility, StatusCatalog, StatusCode, StatusDefinition, StatusFlow,
	StatusPermissions, StatusTriggers,
};

/// The built-in catalog, validated.
pub fn default_catalog() -> StatusCatalog {
	StatusCatalog::new(default_statuses()).expect("built-in status catalog is valid")
}

/// The built-in status definitions, in catalog order.
pub fn default_statuses() -> Vec<StatusDefinition> {
	vec![
		pending(),
		out_for_delivery(),
		delivered(),
		money_received(),
		postponed(),
		returned(),
		branch_returned(),
		cancelled(),
	]
}

fn base(id: &str, code: &str, name: &str) -> StatusDefinition {
	StatusDefinition {
		id: id.to_string(),
		code: StatusCode::new(code),
		name: name.to_string(),
		is_active: true,
		reason_codes: Vec::new(),
		set_by_roles: Vec::new(),
		visible_to: RoleVisibility::default(),
		permissions: StatusPermissions::default(),
		flow: StatusFlow::default(),
		triggers: StatusTriggers::default(),
	}
}

fn codes(codes: &[&str]) -> Vec<StatusCode> {
	codes.iter().map(|code| StatusCode::new(*code)).collect()
}

/// Entry status of every new order.
fn pending() -> StatusDefinition {
	let mut status = base("1", "PENDING", "قيد الانتظار");
	status.set_by_roles = vec![ActorRole::Admin, ActorRole::Merchant];
	status.flow.is_entry = true;
	status.flow.next_codes = codes(&["OUT_FOR_DELIVERY", "CANCELLED"]);
	status
}

/// Order handed to a driver; dispatching is a back-office action.
fn out_for_delivery() -> StatusDefinition {
	let mut status = base("2", "OUT_FOR_DELIVERY", "جاري التوصيل");
	status.set_by_roles = vec![ActorRole::Admin];
	status.flow.next_codes = codes(&["DELIVERED", "POSTPONED", "RETURNED"]);
	status.triggers.sends_customer_message = true;
	status.permissions.driver.allow_cod_collection = true;
	status
}

/// Delivery confirmed. Drivers must attach proof; the order's price
/// and address freeze.
fn delivered() -> StatusDefinition {
	let mut status = base("3", "DELIVERED", "تم التوصيل");
	status.set_by_roles = vec![ActorRole::Admin, ActorRole::Driver];
	status.flow.is_final = true;
	status.flow.next_codes = codes(&["MONEY_RECEIVED"]);
	status.triggers.sends_customer_message = true;
	status.permissions.driver.can_set = true;
	status.permissions.driver.require_proof = true;
	status.permissions.driver.allow_cod_collection = true;
	status.permissions.admin.lock_price_edit = true;
	status.permissions.admin.lock_address_edit = true;
	status
}

/// Collected cash handed in at the branch. Terminal in the UI, yet
/// reachable from DELIVERED as the declared exception path.
fn money_received() -> StatusDefinition {
	let mut status = base("4", "MONEY_RECEIVED", "تم استلام المبلغ");
	status.set_by_roles = vec![ActorRole::Admin];
	status.flow.is_final = true;
	status.triggers.updates_driver_account = true;
	status.visible_to.driver = false;
	status.permissions.merchant.show_in_portal = false;
	status.permissions.admin.lock_price_edit = true;
	status.permissions.admin.lock_address_edit = true;
	status
}

/// Delivery attempt deferred; the dispatcher retries later.
fn postponed() -> StatusDefinition {
	let mut status = base("5", "POSTPONED", "مؤجل");
	status.set_by_roles = vec![ActorRole::Admin, ActorRole::Driver];
	status.reason_codes = vec![
		"CUSTOMER_UNREACHABLE".to_string(),
		"CUSTOMER_POSTPONED".to_string(),
		"ADDRESS_INCORRECT".to_string(),
	];
	status.flow.next_codes = codes(&["OUT_FOR_DELIVERY", "RETURNED", "CANCELLED"]);
	status.triggers.requires_reason = true;
	status.triggers.sends_customer_message = true;
	status.permissions.driver.can_set = true;
	status
}

/// Customer refused or could not take the order; it travels back.
fn returned() -> StatusDefinition {
	let mut status = base("6", "RETURNED", "راجع");
	status.set_by_roles = vec![ActorRole::Admin, ActorRole::Driver];
	status.reason_codes = vec![
		"CUSTOMER_REFUSED".to_string(),
		"CUSTOMER_UNREACHABLE".to_string(),
		"WRONG_ITEM".to_string(),
		"DAMAGED_SHIPMENT".to_string(),
	];
	status.flow.is_final = true;
	status.flow.next_codes = codes(&["BRANCH_RETURNED"]);
	status.triggers.requires_reason = true;
	status.triggers.creates_return_task = true;
	status.permissions.driver.can_set = true;
	status.permissions.admin.lock_price_edit = true;
	status
}

/// Returned order received and shelved at the branch.
fn branch_returned() -> StatusDefinition {
	let mut status = base("7", "BRANCH_RETURNED", "راجع في الفرع");
	status.set_by_roles = vec![ActorRole::Admin];
	status.flow.is_final = true;
	status.triggers.updates_driver_account = true;
	status.permissions.admin.lock_price_edit = true;
	status.permissions.admin.lock_address_edit = true;
	status
}

/// Order called off before completion. Never legal once the order was
/// delivered or its cash handed in.
fn cancelled() -> StatusDefinition {
	let mut status = base("8", "CANCELLED", "ملغي");
	status.set_by_roles = vec![ActorRole::Admin, ActorRole::Merchant];
	status.flow.is_final = true;
	status.flow.blocked_from = codes(&["DELIVERED", "MONEY_RECEIVED"]);
	status.triggers.requires_reason = true;
	status.triggers.sends_customer_message = true;
	status
}
