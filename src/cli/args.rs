// src/cli/args.rs
// Flag parsing for the atlas_demo binary
// RELEVANT FILES: src/cli/mod.rs, src/bin/atlas_demo.rs

use std::fmt;
use std::path::PathBuf;

use crate::atlas::ViewerRole;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliError {
    msg: String,
}

impl CliError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.msg.fmt(f)
    }
}

impl std::error::Error for CliError {}

pub const USAGE: &str = "usage: atlas_demo [--config FILE] [--claims FILE] [--region ID] \
[--district ID] [--layer ID] [--role user|officer|admin] [--no-container]";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DemoArgs {
    pub config: Option<PathBuf>,
    pub claims: Option<PathBuf>,
    pub region: Option<String>,
    pub district: Option<String>,
    pub layer: Option<String>,
    pub role: ViewerRole,
    /// Simulate a page without a map element.
    pub no_container: bool,
    pub help: bool,
}

fn value<'a>(args: &'a [String], idx: usize, flag: &str) -> Result<&'a str, CliError> {
    args.get(idx + 1)
        .map(String::as_str)
        .filter(|v| !v.starts_with("--"))
        .ok_or_else(|| CliError::new(format!("missing value for {flag}")))
}

impl DemoArgs {
    /// Parse a flat argument list (excluding argv[0]).
    pub fn parse(args: &[String]) -> Result<Self, CliError> {
        let mut out = DemoArgs::default();
        let mut i = 0usize;
        while i < args.len() {
            match args[i].as_str() {
                "--config" => {
                    out.config = Some(PathBuf::from(value(args, i, "--config")?));
                    i += 2;
                }
                "--claims" => {
                    out.claims = Some(PathBuf::from(value(args, i, "--claims")?));
                    i += 2;
                }
                "--region" => {
                    out.region = Some(value(args, i, "--region")?.to_string());
                    i += 2;
                }
                "--district" => {
                    out.district = Some(value(args, i, "--district")?.to_string());
                    i += 2;
                }
                "--layer" => {
                    out.layer = Some(value(args, i, "--layer")?.to_string());
                    i += 2;
                }
                "--role" => {
                    let raw = value(args, i, "--role")?;
                    out.role = ViewerRole::parse(raw).ok_or_else(|| {
                        CliError::new(format!(
                            "unknown --role value '{raw}'; expected one of user, officer, admin"
                        ))
                    })?;
                    i += 2;
                }
                "--no-container" => {
                    out.no_container = true;
                    i += 1;
                }
                "-h" | "--help" => {
                    out.help = true;
                    i += 1;
                }
                other => return Err(CliError::new(format!("unknown argument '{other}'"))),
            }
        }
        Ok(out)
    }
}
