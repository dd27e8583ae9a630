use crate::cli::ValueSources;
use polvar_resolve::Variables;
use polvar_values::{Overrides, ValuesDocument};
use serde_json::Value;
use std::path::Path;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "POLVAR_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

/// Install the stderr log subscriber. `POLVAR_LOG` takes an env-filter
/// directive such as `debug` or `polvar_resolve=debug`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

pub fn load_variables_or_exit(sources: &ValueSources) -> Variables {
    let document = sources.values_file.as_deref().map(load_document_or_exit);
    let overrides = Overrides::parse(&sources.set).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    });
    Variables::new(document, overrides)
}

fn load_document_or_exit(path: &str) -> ValuesDocument {
    let path = Path::new(path);
    let document = ValuesDocument::load_path(path).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    });
    tracing::debug!(
        path = %path.display(),
        policies = document.policies.len(),
        "loaded values document"
    );
    document
}

pub fn print_json_or_exit(payload: &Value, label: &str) {
    let rendered = serde_json::to_string_pretty(payload).unwrap_or_else(|err| {
        eprintln!("error: failed to render {label} json: {err}");
        std::process::exit(2);
    });
    println!("{rendered}");
}

/// One-line rendering of a value for text output.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
