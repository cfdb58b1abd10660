//! CLI command implementations
//!
//! Every command follows the same sequence: load configuration, read the
//! event file, build the root collection, run the complexity search, score,
//! then answer one query as a JSON response on stdout.

use std::path::Path;
use std::sync::Arc;

use serde_json::{json, Value};

use crate::memory::Memory;
use crate::observability::{log_event_with_fields, LogEvent, ObservationScope};
use crate::scoring::SurpriseScorer;
use crate::search::{ComplexitySearch, SearchConfig};

use super::args::{Command, Source};
use super::errors::CliResult;
use super::io::{read_events, write_error, write_response};

/// Run a parsed command
pub fn run_command(command: Command) -> CliResult<()> {
    let result = match command {
        Command::Analyze { source } => analyze(&source),
        Command::Abduce { source, event } => abduce(&source, event),
        Command::Unusual { source, threshold } => unusual(&source, threshold),
    };

    match result {
        Ok(data) => write_response(data),
        Err(e) => {
            write_error(e.code_str(), e.message())?;
            Err(e)
        }
    }
}

/// Load configuration, or defaults when no file is given
fn load_config(path: Option<&Path>) -> CliResult<SearchConfig> {
    match path {
        Some(path) => Ok(SearchConfig::load(path)?),
        None => Ok(SearchConfig::default()),
    }
}

/// Build the collection, search it and score it
fn prepare(source: &Source) -> CliResult<SurpriseScorer> {
    let config = load_config(source.config.as_deref())?;
    let search = ComplexitySearch::new(config)?;

    let events = read_events(&source.events)?;
    let memory = Arc::new(Memory::from_events(events));
    log_event_with_fields(
        LogEvent::MemoryBuilt,
        &[
            ("events", &memory.len().to_string()),
            ("labels", &memory.labels().len().to_string()),
            ("days", &memory.days().len().to_string()),
        ],
    );

    let outcome = search.run(Arc::clone(&memory));
    Ok(SurpriseScorer::new(memory, outcome))
}

/// Open a scope around `prepare`, failing it when preparation fails
fn prepare_scoped(
    name: &'static str,
    source: &Source,
) -> CliResult<(ObservationScope<'static>, SurpriseScorer)> {
    let scope = ObservationScope::new(name);
    match prepare(source) {
        Ok(scorer) => Ok((scope, scorer)),
        Err(e) => {
            scope.fail(e.message());
            Err(e)
        }
    }
}

/// Finite floats as numbers, everything else as null
fn number_or_null(value: f64) -> Value {
    if value.is_finite() {
        json!(value)
    } else {
        Value::Null
    }
}

/// Per-event complexity, recipe and surprise
pub fn analyze(source: &Source) -> CliResult<Value> {
    let (scope, scorer) = prepare_scoped("ANALYZE", source)?;
    let outcome = scorer.outcome();

    let events: Vec<Value> = scorer
        .memory()
        .iter()
        .filter_map(|event| {
            let id = event.id()?;
            Some(json!({
                "id": id,
                "label": event.label().path(),
                "timestamp": event.timestamp(),
                "complexity": number_or_null(outcome.complexity(id).unwrap_or(f64::INFINITY)),
                "recipe": outcome.recipe(id),
                "surprise": scorer.surprises().get(&id).copied().map_or(Value::Null, number_or_null),
            }))
        })
        .collect();

    scope.complete_with_fields(&[("events", &events.len().to_string())]);

    Ok(json!({
        "events": events,
        "passes": outcome.passes(),
        "reachable": outcome.reachable_count(),
        "metrics": serde_json::from_str::<Value>(&outcome.metrics().to_json())?,
    }))
}

/// Ranked candidate explanations for one event
pub fn abduce(source: &Source, consequence: u64) -> CliResult<Value> {
    let (scope, scorer) = prepare_scoped("ABDUCE", source)?;
    let candidates = match scorer.abduction(consequence) {
        Ok(candidates) => candidates,
        Err(e) => {
            scope.fail(&e.to_string());
            return Err(e.into());
        }
    };

    let ranked: Vec<Value> = candidates
        .iter()
        .map(|(id, score)| json!({ "id": id, "score": number_or_null(*score) }))
        .collect();

    scope.complete_with_fields(&[("candidates", &ranked.len().to_string())]);

    Ok(json!({
        "consequence": consequence,
        "candidates": ranked,
    }))
}

/// Events whose surprise reaches the threshold
pub fn unusual(source: &Source, threshold: f64) -> CliResult<Value> {
    let (scope, scorer) = prepare_scoped("UNUSUAL", source)?;

    let flagged: Vec<Value> = scorer
        .detect_unusual(threshold)
        .into_iter()
        .filter_map(|id| scorer.explain(id).ok())
        .map(|explanation| {
            json!({
                "id": explanation.id,
                "surprise": explanation.surprise.map_or(Value::Null, number_or_null),
                "complexity": number_or_null(explanation.complexity),
                "recipe": explanation.recipe,
            })
        })
        .collect();

    scope.complete_with_fields(&[("flagged", &flagged.len().to_string())]);

    Ok(json!({
        "threshold": threshold,
        "events": flagged,
    }))
}
