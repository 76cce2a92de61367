//! Operator tool for the delivery status workflow.
//!
//! This binary validates status catalogs, prints their flow topology,
//! and dry-runs transition evaluation, so catalog changes can be
//! checked before they are rolled out. It never touches order data.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use workflow_catalog::{default_catalog, CatalogFile, CatalogFileError};
use workflow_engine::StatusWorkflowEngine;
use workflow_types::{
	ActorRole, CatalogError, StatusCatalog, StatusCode, StatusDefinition, TransitionRequest,
};

/// Command-line arguments for the workflow tool.
#[derive(Parser, Debug)]
#[command(name = "workflow", version, about = "Delivery status workflow toolkit", long_about = None)]
struct Args {
	/// Path to a TOML catalog file; the built-in catalog is used when omitted
	#[arg(short, long, global = true)]
	catalog: Option<PathBuf>,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "warn", global = true)]
	log_level: String,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Validate the catalog and report every violation found
	Validate,
	/// Print the catalog's statuses and flow topology
	Show,
	/// List the statuses a role may assign
	Assignable {
		/// Acting role (admin, merchant, driver)
		#[arg(short, long)]
		role: ActorRole,
	},
	/// Evaluate a single transition and print the result as JSON
	Check {
		/// Current status code of the order
		#[arg(long)]
		from: String,
		/// Requested target status code
		#[arg(long)]
		to: String,
		/// Acting role (admin, merchant, driver)
		#[arg(short, long)]
		role: ActorRole,
		/// Reason accompanying the transition
		#[arg(long)]
		reason: Option<String>,
		/// Mark the transition as carrying attached proof
		#[arg(long)]
		proof: bool,
	},
}

#[tokio::main]
async fn main() -> ExitCode {
	let args = Args::parse();

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};

	let default_directive = args.log_level.to_string();
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	fmt().with_env_filter(env_filter).with_target(false).init();

	tracing::debug!(command = ?args.command, "Parsed arguments");

	match run(args).await {
		Ok(code) => code,
		Err(err) => {
			eprintln!("error: {err}");
			ExitCode::FAILURE
		},
	}
}

async fn run(args: Args) -> Result<ExitCode, Box<dyn std::error::Error>> {
	match args.command {
		Command::Validate => validate(args.catalog.as_deref()).await,
		Command::Show => {
			let catalog = load_catalog(args.catalog.as_deref()).await?;
			for status in catalog.statuses() {
				print_status(status);
			}
			Ok(ExitCode::SUCCESS)
		},
		Command::Assignable { role } => {
			let engine = engine(args.catalog.as_deref()).await?;
			for status in engine.list_assignable(role) {
				println!("{}\t{}", status.code, status.name);
			}
			Ok(ExitCode::SUCCESS)
		},
		Command::Check {
			from,
			to,
			role,
			reason,
			proof,
		} => {
			let engine = engine(args.catalog.as_deref()).await?;
			let request = TransitionRequest {
				current: StatusCode::new(from),
				target: StatusCode::new(to),
				actor_role: role,
				reason,
				proof_attached: proof,
			};
			let result = engine.evaluate_transition(&request);
			println!("{}", serde_json::to_string_pretty(&result)?);
			if result.allowed {
				Ok(ExitCode::SUCCESS)
			} else {
				Ok(ExitCode::FAILURE)
			}
		},
	}
}

/// Validates the chosen catalog, printing each violation on its own
/// line instead of one concatenated error.
async fn validate(path: Option<&Path>) -> Result<ExitCode, Box<dyn std::error::Error>> {
	match load_catalog(path).await {
		Ok(catalog) => {
			println!("catalog OK ({} statuses)", catalog.len());
			Ok(ExitCode::SUCCESS)
		},
		Err(CatalogFileError::Invalid(CatalogError::Validation(violations))) => {
			eprintln!("catalog invalid, {} violation(s):", violations.len());
			for violation in &violations {
				eprintln!("  - {violation}");
			}
			Ok(ExitCode::FAILURE)
		},
		Err(err) => Err(err.into()),
	}
}

async fn load_catalog(path: Option<&Path>) -> Result<StatusCatalog, CatalogFileError> {
	match path {
		Some(path) => CatalogFile::load(path).await,
		None => Ok(default_catalog()),
	}
}

async fn engine(path: Option<&Path>) -> Result<StatusWorkflowEngine, CatalogFileError> {
	Ok(StatusWorkflowEngine::new(load_catalog(path).await?))
}

fn print_status(status: &StatusDefinition) {
	let mut flags = Vec::new();
	if status.flow.is_entry {
		flags.push("entry");
	}
	if status.flow.is_final {
		flags.push("final");
	}
	if !status.is_active {
		flags.push("inactive");
	}
	let flags = if flags.is_empty() {
		String::new()
	} else {
		format!(" [{}]", flags.join(", "))
	};
	println!("{} ({}){}", status.code, status.name, flags);

	let roles: Vec<&str> = status
		.set_by_roles
		.iter()
		.map(ActorRole::as_str)
		.collect();
	println!("    set by: {}", roles.join(", "));
	if !status.flow.next_codes.is_empty() {
		println!("    next: {}", join_codes(&status.flow.next_codes));
	}
	if !status.flow.blocked_from.is_empty() {
		println!("    blocked from: {}", join_codes(&status.flow.blocked_from));
	}
	if !status.reason_codes.is_empty() {
		println!("    reasons: {}", status.reason_codes.join(", "));
	}
}

fn join_codes(codes: &[StatusCode]) -> String {
	codes
		.iter()
		.map(StatusCode::as_str)
		.collect::<Vec<_>>()
		.join(", ")
}

#[cfg(test)]
mod tests {
	use super::*;
	use clap::CommandFactory;

	#[test]
	fn test_cli_definition_is_consistent() {
		Args::command().debug_assert();
	}

	#[test]
	fn test_check_arguments_parse() {
		let args = Args::parse_from([
			"workflow", "check", "--from", "PENDING", "--to", "OUT_FOR_DELIVERY", "--role",
			"admin",
		]);
		let Command::Check {
			from,
			to,
			role,
			reason,
			proof,
		} = args.command
		else {
			panic!("expected check subcommand");
		};
		assert_eq!(from, "PENDING");
		assert_eq!(to, "OUT_FOR_DELIVERY");
		assert_eq!(role, ActorRole::Admin);
		assert!(reason.is_none());
		assert!(!proof);
	}

	#[test]
	fn test_catalog_flag_is_global() {
		let args = Args::parse_from(["workflow", "validate", "--catalog", "statuses.toml"]);
		assert_eq!(args.catalog, Some(PathBuf::from("statuses.toml")));
	}
}
