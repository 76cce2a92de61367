//! Actor roles for the delivery workflow.
//!
//! Roles identify who is performing an operation: back-office staff,
//! the merchant that owns the order, or the driver carrying it. All
//! permission checks key off these values, never off display strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of the actor reading or mutating an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
	/// Back-office staff with full operational access.
	Admin,
	/// Merchant that created the order.
	Merchant,
	/// Driver assigned to deliver the order.
	Driver,
}

impl ActorRole {
	/// All roles, in a stable order.
	pub const ALL: [ActorRole; 3] = [ActorRole::Admin, ActorRole::Merchant, ActorRole::Driver];

	/// Returns the stable machine name of the role.
	pub fn as_str(&self) -> &'static str {
		match self {
			ActorRole::Admin => "admin",
			ActorRole::Merchant => "merchant",
			ActorRole::Driver => "driver",
		}
	}
}

impl fmt::Display for ActorRole {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for ActorRole {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"admin" => Ok(ActorRole::Admin),
			"merchant" => Ok(ActorRole::Merchant),
			"driver" => Ok(ActorRole::Driver),
			other => Err(format!("unknown actor role: {other}")),
		}
	}
}
