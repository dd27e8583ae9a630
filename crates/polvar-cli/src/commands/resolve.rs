use crate::cli::ValueSources;
use crate::support::{display_value, load_variables_or_exit, print_json_or_exit};
use polvar_resolve::VariableQuery;
use polvar_store::Registry;
use serde_json::json;
use std::collections::BTreeSet;

pub struct Args {
    pub policy: String,
    pub resource: String,
    pub kind: String,
    pub check_kinds: Vec<String>,
    pub declared: Vec<String>,
    pub sources: ValueSources,
    pub json: bool,
}

pub fn run(args: Args) {
    let variables = load_variables_or_exit(&args.sources);

    // Rule values are published before any pair is resolved; the registry
    // then answers the guard's "are values registered" question.
    let registry = Registry::new();
    variables.publish(&registry);

    let in_scope_kinds: BTreeSet<String> = args.check_kinds.iter().cloned().collect();
    let query = VariableQuery {
        policy: &args.policy,
        resource: &args.resource,
        kind: &args.kind,
        in_scope_kinds: &in_scope_kinds,
        declared: &args.declared,
    };

    let resolved = variables
        .check_variable_for_policy(&query, &registry)
        .unwrap_or_else(|e| {
            eprintln!("error: {e}");
            std::process::exit(1);
        });

    if args.json {
        let payload = json!({
            "policy": args.policy,
            "resource": args.resource,
            "kind": args.kind,
            "values": resolved,
        });
        print_json_or_exit(&payload, "resolve");
        return;
    }

    println!("polvar resolve");
    println!("  Policy: {}", args.policy);
    println!("  Resource: {}", args.resource);
    if !args.kind.is_empty() {
        println!("  Kind: {}", args.kind);
    }
    println!("  Values: {}", resolved.len());
    for (name, value) in &resolved {
        println!("    {name} = {}", display_value(value));
    }
}
