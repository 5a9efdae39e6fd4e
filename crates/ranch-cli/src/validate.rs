//! # Validate Subcommand
//!
//! Applies an address file to a fresh address in significance order and
//! reports the first rejected field. The file is a flat mapping of field
//! keys to string values, in JSON or (by `.yaml`/`.yml` extension) YAML.
//! `-` reads JSON from standard input.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use indexmap::IndexMap;
use ranch_address::{export, submit, Address, RuleTable};

/// Arguments for the `ranch validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Address file to validate, or `-` for standard input.
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Also require every mandatory field of the resulting locale.
    #[arg(long)]
    pub complete: bool,

    /// Print the resulting schema on success.
    #[arg(long)]
    pub schema: bool,
}

/// Execute the validate subcommand.
///
/// `stdin` is read only when the path is `-`. Returns exit code: 0 on
/// success, 1 on validation failure. Unreadable or unparseable input is an
/// `Err` (operational error).
pub fn run_validate(
    args: &ValidateArgs,
    rules: &Arc<RuleTable>,
    stdin: impl Read,
    out: &mut impl Write,
) -> Result<u8> {
    let pairs = read_pairs(&args.path, stdin)?;
    tracing::info!(path = %args.path.display(), fields = pairs.len(), "validating address");

    let mut address = Address::with_rules(Arc::clone(rules));
    if let Err(e) = submit(&mut address, pairs) {
        writeln!(out, "FAIL: {e}")?;
        return Ok(1);
    }

    if args.complete {
        if let Err(e) = address.check_complete() {
            let missing: Vec<&str> = address.missing_required().iter().map(|p| p.as_str()).collect();
            writeln!(out, "FAIL: {e}")?;
            writeln!(out, "  missing: {}", missing.join(", "))?;
            return Ok(1);
        }
    }

    writeln!(out, "OK: {} ({})", address.locale().name(), address.locale().key())?;
    if args.schema {
        let json = serde_json::to_string_pretty(&export(&address)).context("failed to serialize schema")?;
        writeln!(out, "{json}")?;
    }
    Ok(0)
}

/// Read a flat `key: value` mapping, preserving file order.
fn read_pairs(path: &Path, mut stdin: impl Read) -> Result<IndexMap<String, String>> {
    if path == Path::new("-") {
        let mut input = String::new();
        stdin
            .read_to_string(&mut input)
            .context("failed to read standard input")?;
        return serde_json::from_str(&input).context("standard input is not a JSON object of strings");
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    if is_yaml {
        serde_yaml::from_str(&content)
            .with_context(|| format!("{} is not a YAML mapping of strings", path.display()))
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("{} is not a JSON object of strings", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_file(name: &str, content: &str, complete: bool) -> Result<(u8, String)> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        let args = ValidateArgs {
            path,
            complete,
            schema: false,
        };
        let mut out = Vec::new();
        let code = run_validate(&args, &RuleTable::builtin(), std::io::empty(), &mut out)?;
        Ok((code, String::from_utf8(out).unwrap()))
    }

    fn run_stdin(input: &[u8], schema: bool) -> Result<(u8, String)> {
        let args = ValidateArgs {
            path: PathBuf::from("-"),
            complete: false,
            schema,
        };
        let mut out = Vec::new();
        let code = run_validate(&args, &RuleTable::builtin(), input, &mut out)?;
        Ok((code, String::from_utf8(out).unwrap()))
    }

    #[test]
    fn valid_json_address() {
        let (code, out) =
            run_file("a.json", r#"{"postal_code": "90210", "country": "US"}"#, false).unwrap();
        assert_eq!(code, 0);
        assert_eq!(out.trim(), "OK: United States (US)");
    }

    #[test]
    fn valid_yaml_address() {
        let yaml = "country: DE\nlocality: Oldenburg\nstreet_address: Hauptstr. 1\npostal_code: '26133'\n";
        let (code, _) = run_file("a.yaml", yaml, true).unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn invalid_value_fails() {
        let (code, out) = run_file("a.json", r#"{"postal_code": "ABCDE"}"#, false).unwrap();
        assert_eq!(code, 1);
        assert!(out.contains("postal_code"), "{out}");
    }

    #[test]
    fn unknown_field_fails() {
        let (code, out) = run_file("a.json", r#"{"zzzz": "1"}"#, false).unwrap();
        assert_eq!(code, 1);
        assert!(out.contains("unrecognized field"), "{out}");
    }

    #[test]
    fn incomplete_address_fails_with_complete() {
        let (code, out) = run_file("a.json", r#"{"country": "US"}"#, true).unwrap();
        assert_eq!(code, 1);
        assert!(out.contains("missing: administrative_area, locality, street_address, postal_code"));
    }

    #[test]
    fn malformed_file_is_operational_error() {
        assert!(run_file("a.json", "{not json", false).is_err());
        assert!(run_file("a.json", r#"{"postal_code": 90210}"#, false).is_err());
    }

    #[test]
    fn missing_file_is_operational_error() {
        let args = ValidateArgs {
            path: PathBuf::from("/nonexistent/address.json"),
            complete: false,
            schema: false,
        };
        let mut out = Vec::new();
        let err = run_validate(&args, &RuleTable::builtin(), std::io::empty(), &mut out).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read"));
    }

    #[test]
    fn dash_reads_json_from_stdin() {
        let (code, out) = run_stdin(br#"{"postal_code": "90210", "country": "US"}"#, true).unwrap();
        assert_eq!(code, 0);
        assert!(out.starts_with("OK: United States (US)"), "{out}");
        assert!(out.contains("\"postal_code\""), "{out}");

        let (code, out) = run_stdin(br#"{"postal_code": "ABCDE"}"#, false).unwrap();
        assert_eq!(code, 1);
        assert!(out.contains("postal_code"), "{out}");
    }

    #[test]
    fn dash_rejects_yaml_on_stdin() {
        let err = run_stdin(b"country: US\n", false).unwrap_err();
        assert!(format!("{err:#}").contains("standard input"), "{err:#}");
    }
}
