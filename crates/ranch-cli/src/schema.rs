//! # Schema Subcommand
//!
//! Prints the field schema an address form needs for one locale, as the
//! HTTP service returns it from `GET /address/{country}`.

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use ranch_address::{export, Address, AddressPart, RuleTable};

/// Arguments for the `ranch schema` subcommand.
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Country code to preset. Omit for the default locale.
    #[arg(long, short)]
    pub country: Option<String>,

    /// Print compact JSON instead of pretty-printed.
    #[arg(long)]
    pub compact: bool,
}

/// Execute the schema subcommand.
///
/// Returns exit code: 0 on success, 1 if the country code is rejected.
pub fn run_schema(args: &SchemaArgs, rules: &Arc<RuleTable>, out: &mut impl Write) -> Result<u8> {
    let mut address = Address::with_rules(Arc::clone(rules));
    if let Some(country) = &args.country {
        if let Err(e) = address.set_field(AddressPart::Country, country) {
            writeln!(out, "FAIL: {e}")?;
            return Ok(1);
        }
    }

    let schema = export(&address);
    let json = if args.compact {
        serde_json::to_string(&schema)
    } else {
        serde_json::to_string_pretty(&schema)
    }
    .context("failed to serialize schema")?;
    writeln!(out, "{json}")?;

    tracing::debug!(locale = address.locale().key(), fields = schema.len(), "printed schema");
    Ok(0)
}
