//! Status workflow engine for the delivery system.
//!
//! This module evaluates order status transitions against a validated
//! status catalog and answers catalog queries for the dashboard, the
//! merchant portal, and the driver app. Evaluation is pure: the engine
//! holds no order state, performs no I/O, and dispatching the side
//! effects it reports belongs to the caller.
//!
//! Reads run against an atomically published catalog snapshot, so an
//! evaluation never observes a half-applied catalog change. Catalog
//! maintenance builds a replacement catalog, re-validates it, and
//! publishes it wholesale.

use arc_swap::ArcSwap;
use std::sync::{Arc, Mutex, PoisonError};
use workflow_types::{
	ActorRole, CatalogError, FieldLocks, StatusCatalog, StatusCode, StatusDefinition,
	StatusUpdate, TransitionError, TransitionRequest, TransitionResult,
};

/// Rule engine over a published [`StatusCatalog`].
///
/// Cheap to share behind an [`Arc`]; all methods take `&self`. Readers
/// load a coherent snapshot and are never blocked by catalog
/// maintenance, while mutations serialize on an internal writer lock.
pub struct StatusWorkflowEngine {
	/// Currently published catalog.
	catalog: ArcSwap<StatusCatalog>,
	/// Serializes catalog mutations. Readers never take it.
	write_lock: Mutex<()>,
}

impl StatusWorkflowEngine {
	/// Creates an engine over an already validated catalog.
	pub fn new(catalog: StatusCatalog) -> Self {
		StatusWorkflowEngine {
			catalog: ArcSwap::from_pointee(catalog),
			write_lock: Mutex::new(()),
		}
	}

	/// Validates `definitions` and creates an engine on success.
	pub fn from_definitions(definitions: Vec<StatusDefinition>) -> Result<Self, CatalogError> {
		Ok(Self::new(StatusCatalog::new(definitions)?))
	}

	/// Returns the currently published catalog snapshot.
	///
	/// The snapshot stays coherent for as long as the caller holds it,
	/// even across concurrent catalog maintenance.
	pub fn catalog(&self) -> Arc<StatusCatalog> {
		self.catalog.load_full()
	}

	/// Looks up a status definition by code.
	pub fn get_status(&self, code: &StatusCode) -> Result<StatusDefinition, CatalogError> {
		self.catalog
			.load()
			.get(code)
			.cloned()
			.ok_or_else(|| CatalogError::NotFound(code.clone()))
	}

	/// The status newly created orders start in.
	pub fn entry_status(&self) -> StatusDefinition {
		self.catalog.load().entry_status().clone()
	}

	/// Active statuses `role` may directly assign, in catalog order.
	pub fn list_assignable(&self, role: ActorRole) -> Vec<StatusDefinition> {
		self.catalog
			.load()
			.statuses()
			.iter()
			.filter(|status| status.is_active && status.assignable_by(role))
			.cloned()
			.collect()
	}

	/// Statuses `role` sees in read paths, in catalog order.
	///
	/// Deactivated statuses are included: they remain valid historical
	/// values on existing orders.
	pub fn list_visible(&self, role: ActorRole) -> Vec<StatusDefinition> {
		self.catalog
			.load()
			.statuses()
			.iter()
			.filter(|status| status.is_visible_to(role))
			.cloned()
			.collect()
	}

	/// Resolved definitions of a status's `next_codes`, in declared
	/// order.
	pub fn next_statuses(&self, code: &StatusCode) -> Result<Vec<StatusDefinition>, CatalogError> {
		let catalog = self.catalog.load();
		let status = catalog
			.get(code)
			.ok_or_else(|| CatalogError::NotFound(code.clone()))?;
		Ok(status
			.flow
			.next_codes
			.iter()
			.filter_map(|next| catalog.get(next))
			.cloned()
			.collect())
	}

	/// Evaluates whether `request` is a legal transition and which
	/// side effects and field locks it carries.
	///
	/// Unknown codes and role failures stop evaluation immediately;
	/// the topology, reason, and proof checks all run so a rejection
	/// lists every remaining blocking condition at once. Identical
	/// requests against the same catalog yield identical results.
	pub fn evaluate_transition(&self, request: &TransitionRequest) -> TransitionResult {
		let catalog = self.catalog.load();
		let result = evaluate(&catalog, request);
		tracing::debug!(
			current = %request.current,
			target = %request.target,
			role = %request.actor_role,
			allowed = result.allowed,
			errors = result.errors.len(),
			"Evaluated transition"
		);
		result
	}

	/// Returns true when `role` may capture cash-on-delivery for an
	/// order sitting in `code`.
	///
	/// Only drivers ever collect; for other roles this is false even
	/// when the status allows collection.
	pub fn can_collect_cod(
		&self,
		code: &StatusCode,
		role: ActorRole,
	) -> Result<bool, CatalogError> {
		let catalog = self.catalog.load();
		let status = catalog
			.get(code)
			.ok_or_else(|| CatalogError::NotFound(code.clone()))?;
		Ok(role == ActorRole::Driver && status.permissions.driver.allow_cod_collection)
	}

	/// Field locks in force while an order sits in `code`.
	pub fn field_lock_state(&self, code: &StatusCode) -> Result<FieldLocks, CatalogError> {
		let catalog = self.catalog.load();
		let status = catalog
			.get(code)
			.ok_or_else(|| CatalogError::NotFound(code.clone()))?;
		Ok(status.permissions.admin.into())
	}

	/// Adds a new status definition to the catalog.
	///
	/// The resulting catalog is validated before it is published; on
	/// any error the published catalog is unchanged.
	pub fn add_status(&self, definition: StatusDefinition) -> Result<(), CatalogError> {
		let code = definition.code.clone();
		self.mutate("add_status", &code, |definitions| {
			definitions.push(definition);
			Ok(())
		})
	}

	/// Merges `update` into the definition with `code`.
	///
	/// `id` and `code` are immutable; renames only ever touch the
	/// display name. The resulting catalog is validated before it is
	/// published.
	pub fn update_status(
		&self,
		code: &StatusCode,
		update: StatusUpdate,
	) -> Result<(), CatalogError> {
		self.mutate("update_status", code, |definitions| {
			let definition = definitions
				.iter_mut()
				.find(|definition| definition.code == *code)
				.ok_or_else(|| CatalogError::NotFound(code.clone()))?;
			update.apply_to(definition);
			Ok(())
		})
	}

	/// Removes the definition with `code` from the catalog.
	///
	/// Fails with [`CatalogError::InUse`] while other definitions
	/// still reference the code in their flow lists, and with a
	/// validation error when the remaining catalog would break an
	/// invariant (e.g. removing the entry status).
	pub fn remove_status(&self, code: &StatusCode) -> Result<(), CatalogError> {
		self.mutate("remove_status", code, |definitions| {
			let position = definitions
				.iter()
				.position(|definition| definition.code == *code)
				.ok_or_else(|| CatalogError::NotFound(code.clone()))?;
			let referenced_by: Vec<StatusCode> = definitions
				.iter()
				.filter(|definition| {
					definition.flow.next_codes.contains(code)
						|| definition.flow.blocked_from.contains(code)
				})
				.map(|definition| definition.code.clone())
				.collect();
			if !referenced_by.is_empty() {
				return Err(CatalogError::InUse {
					code: code.clone(),
					referenced_by,
				});
			}
			definitions.remove(position);
			Ok(())
		})
	}

	/// Runs `apply` on a copy of the current definitions, validates
	/// the result, and publishes it atomically. Readers keep the
	/// previous snapshot until the swap.
	fn mutate<F>(&self, operation: &str, code: &StatusCode, apply: F) -> Result<(), CatalogError>
	where
		F: FnOnce(&mut Vec<StatusDefinition>) -> Result<(), CatalogError>,
	{
		// The guard protects no data of its own, so a poisoned lock is
		// safe to recover.
		let _guard = self
			.write_lock
			.lock()
			.unwrap_or_else(PoisonError::into_inner);

		let mut definitions = self.catalog.load().to_definitions();
		apply(&mut definitions)?;
		let next = StatusCatalog::new(definitions)?;
		let statuses = next.len();
		self.catalog.store(Arc::new(next));
		tracing::info!(operation, code = %code, statuses, "Published catalog update");
		Ok(())
	}
}

/// Runs the transition checks against one catalog snapshot.
fn evaluate(catalog: &StatusCatalog, request: &TransitionRequest) -> TransitionResult {
	// Resolution failures are fatal: none of the later checks mean
	// anything without both definitions.
	let (current, target) = match (catalog.get(&request.current), catalog.get(&request.target)) {
		(Some(current), Some(target)) => (current, target),
		(current, target) => {
			let mut errors = Vec::new();
			if current.is_none() {
				errors.push(TransitionError::UnknownStatus(request.current.clone()));
			}
			if target.is_none() {
				errors.push(TransitionError::UnknownStatus(request.target.clone()));
			}
			return TransitionResult::rejected(errors);
		},
	};

	// Role authorization is fatal as well: an actor who may not set
	// the target gets no further diagnostics.
	if !target.assignable_by(request.actor_role) {
		return TransitionResult::rejected(vec![TransitionError::RoleNotPermitted {
			role: request.actor_role,
			target: target.code.clone(),
		}]);
	}

	let mut errors = Vec::new();

	// The edge must be declared by the current status, and the
	// target's blocked_from veto beats a declared edge. is_final adds
	// no extra block of its own: the onward paths out of a terminal
	// status are exactly its declared next codes.
	let declared = current.flow.next_codes.contains(&target.code);
	let vetoed = target.flow.blocked_from.contains(&current.code);
	if !declared || vetoed {
		errors.push(TransitionError::IllegalTransition {
			from: current.code.clone(),
			to: target.code.clone(),
		});
	}

	// Reason checks, with exact case-sensitive matching against the
	// declared codes when any exist.
	if target.triggers.requires_reason {
		match request.reason.as_deref() {
			None | Some("") => {
				errors.push(TransitionError::ReasonRequired {
					target: target.code.clone(),
				});
			},
			Some(reason) => {
				if !target.reason_codes.is_empty()
					&& !target.reason_codes.iter().any(|code| code == reason)
				{
					errors.push(TransitionError::InvalidReasonCode {
						target: target.code.clone(),
						reason: reason.to_string(),
					});
				}
			},
		}
	}

	// Proof applies to drivers only; admins correcting records are
	// exempt even on proof-requiring statuses.
	if request.actor_role == ActorRole::Driver
		&& target.permissions.driver.require_proof
		&& !request.proof_attached
	{
		errors.push(TransitionError::ProofRequired {
			target: target.code.clone(),
		});
	}

	if errors.is_empty() {
		TransitionResult::granted(target.triggers.into(), target.permissions.admin.into())
	} else {
		TransitionResult::rejected(errors)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use workflow_types::{RoleVisibility, StatusFlow, StatusTriggers};

	fn definition(id: &str, code: &str) -> StatusDefinition {
		StatusDefinition {
			id: id.to_string(),
			code: StatusCode::new(code),
			name: code.to_string(),
			is_active: true,
			reason_codes: Vec::new(),
			set_by_roles: vec![ActorRole::Admin],
			visible_to: Default::default(),
			permissions: Default::default(),
			flow: StatusFlow::default(),
			triggers: StatusTriggers::default(),
		}
	}

	/// NEW -> DISPATCHED -> {COMPLETED, FAILED}, with FAILED vetoing
	/// arrivals from NEW and COMPLETED demanding reason and proof.
	fn engine() -> StatusWorkflowEngine {
		let mut new = definition("1", "NEW");
		new.flow.is_entry = true;
		new.flow.next_codes = vec![StatusCode::new("DISPATCHED"), StatusCode::new("FAILED")];

		let mut dispatched = definition("2", "DISPATCHED");
		dispatched.set_by_roles = vec![ActorRole::Admin, ActorRole::Driver];
		dispatched.flow.next_codes = vec![StatusCode::new("COMPLETED"), StatusCode::new("FAILED")];

		let mut completed = definition("3", "COMPLETED");
		completed.set_by_roles = vec![ActorRole::Admin, ActorRole::Driver];
		completed.flow.is_final = true;
		completed.reason_codes = vec!["ON_TIME".to_string(), "LATE".to_string()];
		completed.triggers.requires_reason = true;
		completed.triggers.sends_customer_message = true;
		completed.permissions.driver.can_set = true;
		completed.permissions.driver.require_proof = true;
		completed.permissions.driver.allow_cod_collection = true;
		completed.permissions.admin.lock_price_edit = true;
		completed.permissions.admin.lock_address_edit = true;

		let mut failed = definition("4", "FAILED");
		failed.set_by_roles = vec![ActorRole::Admin, ActorRole::Driver];
		failed.flow.is_final = true;
		failed.flow.blocked_from = vec![StatusCode::new("NEW")];
		failed.triggers.requires_reason = true;

		StatusWorkflowEngine::from_definitions(vec![new, dispatched, completed, failed]).unwrap()
	}

	fn request(from: &str, to: &str, role: ActorRole) -> TransitionRequest {
		TransitionRequest {
			current: StatusCode::new(from),
			target: StatusCode::new(to),
			actor_role: role,
			reason: None,
			proof_attached: false,
		}
	}

	#[test]
	fn test_declared_transition_allowed() {
		let engine = engine();
		let result = engine.evaluate_transition(&request("NEW", "DISPATCHED", ActorRole::Admin));
		assert!(result.allowed);
		assert!(result.errors.is_empty());
	}

	#[test]
	fn test_unknown_codes_are_fatal_and_reported_together() {
		let engine = engine();
		let result = engine.evaluate_transition(&request("GHOST", "PHANTOM", ActorRole::Admin));
		assert_eq!(
			result.errors,
			vec![
				TransitionError::UnknownStatus(StatusCode::new("GHOST")),
				TransitionError::UnknownStatus(StatusCode::new("PHANTOM")),
			]
		);
	}

	#[test]
	fn test_role_failure_suppresses_later_checks() {
		let engine = engine();
		// Merchant may not set COMPLETED; the missing reason and proof
		// are not reported alongside.
		let result = engine.evaluate_transition(&request("NEW", "COMPLETED", ActorRole::Merchant));
		assert_eq!(
			result.errors,
			vec![TransitionError::RoleNotPermitted {
				role: ActorRole::Merchant,
				target: StatusCode::new("COMPLETED"),
			}]
		);
	}

	#[test]
	fn test_undeclared_edge_rejected() {
		let engine = engine();
		let mut attempt = request("NEW", "COMPLETED", ActorRole::Admin);
		attempt.reason = Some("ON_TIME".to_string());
		let result = engine.evaluate_transition(&attempt);
		assert_eq!(
			result.errors,
			vec![TransitionError::IllegalTransition {
				from: StatusCode::new("NEW"),
				to: StatusCode::new("COMPLETED"),
			}]
		);
	}

	#[test]
	fn test_blocked_from_vetoes_declared_edge() {
		let engine = engine();
		// NEW declares FAILED as a next code, but FAILED blocks
		// arrivals from NEW; the veto wins.
		let mut attempt = request("NEW", "FAILED", ActorRole::Admin);
		attempt.reason = Some("gave up".to_string());
		let result = engine.evaluate_transition(&attempt);
		assert_eq!(
			result.errors,
			vec![TransitionError::IllegalTransition {
				from: StatusCode::new("NEW"),
				to: StatusCode::new("FAILED"),
			}]
		);

		// The same target is reachable from DISPATCHED.
		let mut attempt = request("DISPATCHED", "FAILED", ActorRole::Admin);
		attempt.reason = Some("gave up".to_string());
		assert!(engine.evaluate_transition(&attempt).allowed);
	}

	#[test]
	fn test_missing_reason_rejected() {
		let engine = engine();
		let mut attempt = request("DISPATCHED", "COMPLETED", ActorRole::Admin);
		let result = engine.evaluate_transition(&attempt);
		assert_eq!(
			result.errors,
			vec![TransitionError::ReasonRequired {
				target: StatusCode::new("COMPLETED"),
			}]
		);

		// An empty string is as good as no reason.
		attempt.reason = Some(String::new());
		let result = engine.evaluate_transition(&attempt);
		assert_eq!(
			result.errors,
			vec![TransitionError::ReasonRequired {
				target: StatusCode::new("COMPLETED"),
			}]
		);
	}

	#[test]
	fn test_reason_must_match_declared_codes_exactly() {
		let engine = engine();
		let mut attempt = request("DISPATCHED", "COMPLETED", ActorRole::Admin);
		attempt.reason = Some("on_time".to_string());
		let result = engine.evaluate_transition(&attempt);
		assert_eq!(
			result.errors,
			vec![TransitionError::InvalidReasonCode {
				target: StatusCode::new("COMPLETED"),
				reason: "on_time".to_string(),
			}]
		);

		// Matching never trims; surrounding whitespace is a mismatch.
		attempt.reason = Some(" ON_TIME".to_string());
		assert!(!engine.evaluate_transition(&attempt).allowed);

		attempt.reason = Some("ON_TIME".to_string());
		assert!(engine.evaluate_transition(&attempt).allowed);
	}

	#[test]
	fn test_free_text_reason_accepted_without_declared_codes() {
		let engine = engine();
		// FAILED requires a reason but declares no codes.
		let mut attempt = request("DISPATCHED", "FAILED", ActorRole::Admin);
		attempt.reason = Some("customer moved abroad".to_string());
		assert!(engine.evaluate_transition(&attempt).allowed);
	}

	#[test]
	fn test_proof_required_for_drivers_only() {
		let engine = engine();
		let mut attempt = request("DISPATCHED", "COMPLETED", ActorRole::Driver);
		attempt.reason = Some("ON_TIME".to_string());
		let result = engine.evaluate_transition(&attempt);
		assert_eq!(
			result.errors,
			vec![TransitionError::ProofRequired {
				target: StatusCode::new("COMPLETED"),
			}]
		);

		attempt.proof_attached = true;
		assert!(engine.evaluate_transition(&attempt).allowed);

		// Admins correct records without proof.
		let mut attempt = request("DISPATCHED", "COMPLETED", ActorRole::Admin);
		attempt.reason = Some("LATE".to_string());
		assert!(engine.evaluate_transition(&attempt).allowed);
	}

	#[test]
	fn test_independent_failures_accumulate() {
		let engine = engine();
		// Driver skips the flow (NEW -> COMPLETED is undeclared),
		// brings no reason, and attaches no proof: all three surface
		// at once.
		let result = engine.evaluate_transition(&request("NEW", "COMPLETED", ActorRole::Driver));
		assert_eq!(
			result.errors,
			vec![
				TransitionError::IllegalTransition {
					from: StatusCode::new("NEW"),
					to: StatusCode::new("COMPLETED"),
				},
				TransitionError::ReasonRequired {
					target: StatusCode::new("COMPLETED"),
				},
				TransitionError::ProofRequired {
					target: StatusCode::new("COMPLETED"),
				},
			]
		);
	}

	#[test]
	fn test_evaluation_is_deterministic() {
		let engine = engine();
		let attempt = request("NEW", "COMPLETED", ActorRole::Driver);
		let first = engine.evaluate_transition(&attempt);
		let second = engine.evaluate_transition(&attempt);
		assert_eq!(first, second);
	}

	#[test]
	fn test_granted_result_carries_effects_and_locks() {
		let engine = engine();
		let mut attempt = request("DISPATCHED", "COMPLETED", ActorRole::Admin);
		attempt.reason = Some("ON_TIME".to_string());
		let result = engine.evaluate_transition(&attempt);
		assert!(result.allowed);
		assert!(result.effects.sends_customer_message);
		assert!(!result.effects.creates_return_task);
		assert!(result.field_locks.price_locked);
		assert!(result.field_locks.address_locked);
	}

	#[test]
	fn test_get_status() {
		let engine = engine();
		let status = engine.get_status(&StatusCode::new("DISPATCHED")).unwrap();
		assert_eq!(status.id, "2");
		assert_eq!(
			engine.get_status(&StatusCode::new("GHOST")).unwrap_err(),
			CatalogError::NotFound(StatusCode::new("GHOST"))
		);
	}

	#[test]
	fn test_entry_status() {
		let engine = engine();
		assert_eq!(engine.entry_status().code, StatusCode::new("NEW"));
	}

	#[test]
	fn test_list_assignable_filters_role_and_active() {
		let engine = engine();
		let driver_statuses = engine.list_assignable(ActorRole::Driver);
		let driver: Vec<&str> = driver_statuses
			.iter()
			.map(|status| status.code.as_str())
			.collect();
		assert_eq!(driver, vec!["DISPATCHED", "COMPLETED", "FAILED"]);

		// Deactivating a status removes it from assignment lists.
		engine
			.update_status(
				&StatusCode::new("FAILED"),
				StatusUpdate {
					is_active: Some(false),
					..Default::default()
				},
			)
			.unwrap();
		let driver_statuses = engine.list_assignable(ActorRole::Driver);
		let driver: Vec<&str> = driver_statuses
			.iter()
			.map(|status| status.code.as_str())
			.collect();
		assert_eq!(driver, vec!["DISPATCHED", "COMPLETED"]);
	}

	#[test]
	fn test_list_visible_respects_visibility_flags() {
		let engine = engine();
		assert_eq!(engine.list_visible(ActorRole::Driver).len(), 4);

		engine
			.update_status(
				&StatusCode::new("FAILED"),
				StatusUpdate {
					visible_to: Some(RoleVisibility {
						driver: false,
						..Default::default()
					}),
					..Default::default()
				},
			)
			.unwrap();

		let driver_statuses = engine.list_visible(ActorRole::Driver);
		let driver: Vec<&str> = driver_statuses
			.iter()
			.map(|status| status.code.as_str())
			.collect();
		assert_eq!(driver, vec!["NEW", "DISPATCHED", "COMPLETED"]);
		assert_eq!(engine.list_visible(ActorRole::Admin).len(), 4);
	}

	#[test]
	fn test_next_statuses_in_declared_order() {
		let engine = engine();
		let next_statuses = engine
			.next_statuses(&StatusCode::new("DISPATCHED"))
			.unwrap();
		let next: Vec<&str> = next_statuses
			.iter()
			.map(|status| status.code.as_str())
			.collect();
		assert_eq!(next, vec!["COMPLETED", "FAILED"]);
		assert!(engine.next_statuses(&StatusCode::new("GHOST")).is_err());
	}

	#[test]
	fn test_cod_collection_is_driver_only() {
		let engine = engine();
		let completed = StatusCode::new("COMPLETED");
		assert!(engine.can_collect_cod(&completed, ActorRole::Driver).unwrap());
		assert!(!engine.can_collect_cod(&completed, ActorRole::Admin).unwrap());
		assert!(!engine.can_collect_cod(&completed, ActorRole::Merchant).unwrap());
		assert!(!engine
			.can_collect_cod(&StatusCode::new("NEW"), ActorRole::Driver)
			.unwrap());
		assert!(engine
			.can_collect_cod(&StatusCode::new("GHOST"), ActorRole::Driver)
			.is_err());
	}

	#[test]
	fn test_field_lock_state() {
		let engine = engine();
		let locks = engine.field_lock_state(&StatusCode::new("COMPLETED")).unwrap();
		assert!(locks.price_locked && locks.address_locked);
		let locks = engine.field_lock_state(&StatusCode::new("NEW")).unwrap();
		assert!(!locks.price_locked && !locks.address_locked);
	}

	#[test]
	fn test_add_status_validates_before_publishing() {
		let engine = engine();

		// A definition referencing a missing code is rejected and the
		// published catalog stays as it was.
		let mut broken = definition("5", "ARCHIVED");
		broken.flow.next_codes = vec![StatusCode::new("GHOST")];
		assert!(matches!(
			engine.add_status(broken).unwrap_err(),
			CatalogError::Validation(_)
		));
		assert_eq!(engine.catalog().len(), 4);

		// A duplicate code is rejected the same way.
		assert!(matches!(
			engine.add_status(definition("5", "NEW")).unwrap_err(),
			CatalogError::Validation(_)
		));
		assert_eq!(engine.catalog().len(), 4);

		engine.add_status(definition("5", "ARCHIVED")).unwrap();
		assert_eq!(engine.catalog().len(), 5);
		assert!(engine.get_status(&StatusCode::new("ARCHIVED")).is_ok());
	}

	#[test]
	fn test_update_status_validates_before_publishing() {
		let engine = engine();
		assert!(matches!(
			engine
				.update_status(&StatusCode::new("GHOST"), StatusUpdate::default())
				.unwrap_err(),
			CatalogError::NotFound(_)
		));

		// Pointing a flow at a missing code is caught by revalidation.
		let error = engine
			.update_status(
				&StatusCode::new("DISPATCHED"),
				StatusUpdate {
					flow: Some(StatusFlow {
						next_codes: vec![StatusCode::new("GHOST")],
						..Default::default()
					}),
					..Default::default()
				},
			)
			.unwrap_err();
		assert!(matches!(error, CatalogError::Validation(_)));
		let unchanged = engine.get_status(&StatusCode::new("DISPATCHED")).unwrap();
		assert_eq!(unchanged.flow.next_codes.len(), 2);

		engine
			.update_status(
				&StatusCode::new("DISPATCHED"),
				StatusUpdate {
					name: Some("On the road".to_string()),
					..Default::default()
				},
			)
			.unwrap();
		assert_eq!(
			engine.get_status(&StatusCode::new("DISPATCHED")).unwrap().name,
			"On the road"
		);
	}

	#[test]
	fn test_remove_status_protects_referenced_codes() {
		let engine = engine();

		// COMPLETED is referenced by DISPATCHED's next codes.
		let error = engine.remove_status(&StatusCode::new("COMPLETED")).unwrap_err();
		assert_eq!(
			error,
			CatalogError::InUse {
				code: StatusCode::new("COMPLETED"),
				referenced_by: vec![StatusCode::new("DISPATCHED")],
			}
		);
		assert_eq!(engine.catalog().len(), 4);

		// Drop every edge pointing at FAILED and removal goes through.
		engine
			.update_status(
				&StatusCode::new("NEW"),
				StatusUpdate {
					flow: Some(StatusFlow {
						is_entry: true,
						next_codes: vec![StatusCode::new("DISPATCHED")],
						..Default::default()
					}),
					..Default::default()
				},
			)
			.unwrap();
		engine
			.update_status(
				&StatusCode::new("DISPATCHED"),
				StatusUpdate {
					flow: Some(StatusFlow {
						next_codes: vec![StatusCode::new("COMPLETED")],
						..Default::default()
					}),
					..Default::default()
				},
			)
			.unwrap();
		engine.remove_status(&StatusCode::new("FAILED")).unwrap();
		assert_eq!(engine.catalog().len(), 3);
		assert!(matches!(
			engine.remove_status(&StatusCode::new("FAILED")).unwrap_err(),
			CatalogError::NotFound(_)
		));

		// Nothing references NEW anymore, but removing it would leave
		// the catalog without an entry status; revalidation rejects
		// that and keeps the catalog intact.
		assert!(matches!(
			engine.remove_status(&StatusCode::new("NEW")).unwrap_err(),
			CatalogError::Validation(_)
		));
		assert_eq!(engine.catalog().len(), 3);
	}

	#[test]
	fn test_snapshots_survive_catalog_maintenance() {
		let engine = engine();
		let before = engine.catalog();

		engine.add_status(definition("5", "ARCHIVED")).unwrap();

		// The old snapshot still answers from the catalog it captured.
		assert_eq!(before.len(), 4);
		assert!(!before.contains(&StatusCode::new("ARCHIVED")));
		assert_eq!(engine.catalog().len(), 5);
	}
}
