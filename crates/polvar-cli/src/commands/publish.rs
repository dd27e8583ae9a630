use crate::cli::ValueSources;
use crate::support::{load_variables_or_exit, print_json_or_exit};
use polvar_store::{REGISTRY_KIND, REGISTRY_SCHEMA, Registry};

pub fn run(sources: ValueSources, json_output: bool) {
    let variables = load_variables_or_exit(&sources);
    let registry = Registry::new();
    variables.publish(&registry);

    if json_output {
        print_json_or_exit(&registry.snapshot_json(), "registry");
        return;
    }

    let policies = registry.policies();
    let rule_count: usize = policies.iter().map(|p| p.rules.len()).sum();
    println!("polvar publish");
    println!("  Schema: {REGISTRY_SCHEMA}");
    println!("  Registry kind: {REGISTRY_KIND}");
    println!("  Policies: {}", policies.len());
    println!("  Rules: {rule_count}");
    for policy in &policies {
        println!("    {}", policy.name);
        for rule in &policy.rules {
            println!(
                "      {} (values: {}, foreach: {})",
                rule.name,
                rule.values.len(),
                rule.foreach_values.len()
            );
        }
    }
}
