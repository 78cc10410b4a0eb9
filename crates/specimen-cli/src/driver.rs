//! One CLI run: load the schema, pick the requested types, synthesize.

use anyhow::{Context, Result, bail};
use serde::Serialize;
use serde_json::{Map, Value as Json};
use specimen_synth::schema::declared_names;
use specimen_synth::{Diagnostics, Synthesizer, TypeId, TypeProvider, TypeUniverse, load_schema};
use std::path::Path;
use tracing::debug;

use crate::args::CliArgs;
use crate::config::resolve_config;

pub const EXIT_SUCCESS: i32 = 0;
/// A requested type failed, or a warning was recorded under `--deny-warnings`.
pub const EXIT_FAILURES: i32 = 1;
/// Bad arguments, unreadable files, invalid schema or configuration.
pub const EXIT_USAGE: i32 = 2;

/// Everything a run produced.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    /// Synthesized values by type name, in request order.
    pub values: Map<String, Json>,
    /// Names of the types that produced no value.
    pub failures: Vec<String>,
    #[serde(skip)]
    pub diagnostics: Diagnostics,
}

impl RunReport {
    pub fn exit_code(&self, deny_warnings: bool) -> i32 {
        if !self.failures.is_empty() || (deny_warnings && self.diagnostics.has_warnings()) {
            EXIT_FAILURES
        } else {
            EXIT_SUCCESS
        }
    }

    pub fn render(&self, pretty: bool) -> Result<String> {
        let text = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        text.context("failed to serialize output")
    }

    fn push(&mut self, name: String, value: Option<Json>) {
        match value {
            Some(value) => {
                self.values.insert(name, value);
            }
            None => self.failures.push(name),
        }
    }
}

pub fn run(args: &CliArgs, cwd: &Path) -> Result<RunReport> {
    let config = resolve_config(args, cwd)?;
    let db = load_schema_file(&cwd.join(&args.schema))?;
    let synth = Synthesizer::with_config(&db, config);
    let mut report = RunReport::default();

    if args.all {
        let types = bulk_types(&db);
        // Generic definitions are not requested but may still implement
        // the requested interfaces.
        let outcome = synth.synthesize_many_in(&types, &db.known_types());
        let mut values = outcome.values.into_iter().peekable();
        // Keep request order across successes and failures.
        for id in types {
            let value = match values.peek() {
                Some((ok, _)) if *ok == id => values.next().map(|(_, v)| v.to_json()),
                _ => None,
            };
            report.push(db.name_of(id), value);
        }
        report.diagnostics = outcome.diagnostics;
    } else {
        for (name, id) in requested_types(&db, &args.types)? {
            let synthesis = synth.synthesize(id);
            report.diagnostics.extend(synthesis.diagnostics);
            report.push(name, synthesis.value.map(|v| v.to_json()));
        }
    }

    debug!(
        succeeded = report.values.len(),
        failed = report.failures.len(),
        diagnostics = report.diagnostics.len(),
        "driver::run"
    );
    Ok(report)
}

pub fn load_schema_file(path: &Path) -> Result<TypeUniverse> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read schema {}", path.display()))?;
    load_schema(&source).with_context(|| format!("invalid schema {}", path.display()))
}

/// Every declared type that is not an open generic definition.
pub fn bulk_types(db: &TypeUniverse) -> Vec<TypeId> {
    db.known_types()
        .into_iter()
        .filter(|&id| {
            db.get(id)
                .is_some_and(|def| !def.as_object().is_some_and(|s| s.is_generic_definition()))
        })
        .collect()
}

/// Resolve `--type` names, rejecting unknown ones.
pub fn requested_types(db: &TypeUniverse, names: &[String]) -> Result<Vec<(String, TypeId)>> {
    if names.is_empty() {
        bail!("no types requested; pass --type NAME or --all");
    }
    names
        .iter()
        .map(|name| match db.lookup_name(name) {
            Some(id) => Ok((name.clone(), id)),
            None => bail!(
                "unknown type '{name}'; declared types: {}",
                declared_names(db).join(", ")
            ),
        })
        .collect()
}
