//! Transition request and result types.
//!
//! A [`TransitionRequest`] proposes moving an order between two
//! statuses; the engine answers with a [`TransitionResult`]. Rejected
//! transitions are a routine outcome the caller must explain to the
//! user, so every blocking condition is reported together instead of
//! failing on the first one.

use crate::{ActorRole, AdminPermissions, StatusCode, StatusTriggers};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A proposed change of an order from one status to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRequest {
	/// Code of the status the order currently occupies.
	pub current: StatusCode,
	/// Code of the status the actor wants to move the order to.
	pub target: StatusCode,
	/// Role of the actor submitting the change.
	pub actor_role: ActorRole,
	/// Reason accompanying the change, canonical code or free text.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub reason: Option<String>,
	/// Whether the actor attached proof of delivery.
	#[serde(default)]
	pub proof_attached: bool,
}

/// Outcome of evaluating a [`TransitionRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionResult {
	/// True when every check passed.
	pub allowed: bool,
	/// Every blocking condition found; empty when allowed.
	pub errors: Vec<TransitionError>,
	/// Side effects the caller must dispatch when allowed.
	pub effects: TransitionEffects,
	/// Field locks the caller must apply to the order when allowed.
	pub field_locks: FieldLocks,
}

impl TransitionResult {
	/// Builds a passing result carrying the target's effects and locks.
	pub fn granted(effects: TransitionEffects, field_locks: FieldLocks) -> Self {
		TransitionResult {
			allowed: true,
			errors: Vec::new(),
			effects,
			field_locks,
		}
	}

	/// Builds a rejection carrying the given blocking conditions.
	pub fn rejected(errors: Vec<TransitionError>) -> Self {
		TransitionResult {
			allowed: false,
			errors,
			effects: TransitionEffects::default(),
			field_locks: FieldLocks::default(),
		}
	}
}

/// Side effects a granted transition requires the caller to carry out.
///
/// Copied verbatim from the target status's triggers; the engine
/// never dispatches them itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionEffects {
	/// A return record must be created.
	pub creates_return_task: bool,
	/// The customer must be notified.
	pub sends_customer_message: bool,
	/// The driver's balances must be adjusted.
	pub updates_driver_account: bool,
}

impl From<StatusTriggers> for TransitionEffects {
	fn from(triggers: StatusTriggers) -> Self {
		TransitionEffects {
			creates_return_task: triggers.creates_return_task,
			sends_customer_message: triggers.sends_customer_message,
			updates_driver_account: triggers.updates_driver_account,
		}
	}
}

/// Order fields frozen once the order enters a status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldLocks {
	/// The order price can no longer be edited.
	pub price_locked: bool,
	/// The delivery address can no longer be edited.
	pub address_locked: bool,
}

impl From<AdminPermissions> for FieldLocks {
	fn from(permissions: AdminPermissions) -> Self {
		FieldLocks {
			price_locked: permissions.lock_price_edit,
			address_locked: permissions.lock_address_edit,
		}
	}
}

/// A condition blocking a requested transition.
///
/// Returned as data inside [`TransitionResult::errors`]; a rejection
/// is an expected answer, not a failure of the evaluation call.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum TransitionError {
	/// A referenced status code does not exist in the catalog.
	#[error("unknown status code {0}")]
	UnknownStatus(StatusCode),
	/// The actor's role may not assign the target status.
	#[error("role {role} is not permitted to set status {target}")]
	RoleNotPermitted {
		/// Role that attempted the transition.
		role: ActorRole,
		/// Status the role may not assign.
		target: StatusCode,
	},
	/// The edge is not declared in the current status's flow, or the
	/// target vetoes it via `blocked_from`.
	#[error("transition {from} -> {to} is not part of the declared flow")]
	IllegalTransition {
		/// Status the order currently occupies.
		from: StatusCode,
		/// Status the transition targeted.
		to: StatusCode,
	},
	/// The target status requires a reason and none was supplied.
	#[error("status {target} requires a reason")]
	ReasonRequired {
		/// Status that demands the reason.
		target: StatusCode,
	},
	/// The supplied reason is not one of the target's declared codes.
	#[error("reason '{reason}' is not an accepted reason code of status {target}")]
	InvalidReasonCode {
		/// Status whose reason codes were consulted.
		target: StatusCode,
		/// Reason the actor supplied.
		reason: String,
	},
	/// Driver transitions into the target require attached proof.
	#[error("status {target} requires proof of delivery from drivers")]
	ProofRequired {
		/// Status that demands the proof.
		target: StatusCode,
	},
}
