//! # Locales Subcommand
//!
//! Lists the locales of the active rule table. Running it with `--rules`
//! doubles as a check that a rule file loads.

use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use ranch_address::RuleTable;

/// Arguments for the `ranch locales` subcommand.
#[derive(Args, Debug)]
pub struct LocalesArgs {
    /// Also print each locale's significant and mandatory fields.
    #[arg(long)]
    pub fields: bool,
}

/// Execute the locales subcommand. Always returns exit code 0.
pub fn run_locales(args: &LocalesArgs, rules: &Arc<RuleTable>, out: &mut impl Write) -> Result<u8> {
    for rule in rules.locales() {
        writeln!(out, "{}  {}", rule.key(), rule.name())?;
        if args.fields {
            let fields: Vec<&str> = rule.significant_fields().iter().map(|p| p.as_str()).collect();
            let required: Vec<&str> = rule.required_fields().iter().map(|p| p.as_str()).collect();
            writeln!(out, "    fields:   {}", fields.join(", "))?;
            writeln!(out, "    required: {}", required.join(", "))?;
        }
    }
    writeln!(out, "\n{} locale(s)", rules.len())?;
    Ok(0)
}
