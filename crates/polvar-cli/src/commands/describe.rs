use crate::cli::ValueSources;
use crate::support::{load_variables_or_exit, print_json_or_exit};
use serde_json::json;

pub fn run(sources: ValueSources, json_output: bool) {
    let variables = load_variables_or_exit(&sources);

    let policy_names: Vec<&str> = variables
        .values()
        .map(|doc| doc.policies.iter().map(|p| p.name.as_str()).collect())
        .unwrap_or_default();
    let global_count = variables.values().map_or(0, |doc| doc.global_values.len());
    let namespace_selectors = variables.namespace_selectors().unwrap_or_default();
    let subresources = variables.subresources();

    if json_output {
        let payload = json!({
            "hasDocument": variables.values().is_some(),
            "globalValues": global_count,
            "policies": policy_names,
            "overrides": variables.overrides(),
            "namespaceSelectors": namespace_selectors,
            "subresources": subresources,
        });
        print_json_or_exit(&payload, "describe");
        return;
    }

    println!("polvar describe");
    println!(
        "  Document: {}",
        if variables.values().is_some() {
            "loaded"
        } else {
            "none"
        }
    );
    println!("  Global values: {global_count}");
    println!("  Policies: {}", policy_names.len());
    for name in &policy_names {
        println!("    {name}");
    }
    println!("  Overrides: {}", variables.overrides().len());
    println!("  Namespace selectors: {}", namespace_selectors.len());
    for (namespace, labels) in &namespace_selectors {
        let rendered: Vec<String> = labels.iter().map(|(k, v)| format!("{k}={v}")).collect();
        println!("    {namespace}: {}", rendered.join(","));
    }
    println!("  Subresources: {}", subresources.len());
    for sub in subresources {
        println!(
            "    {} ({}) -> {} ({})",
            sub.subresource.name,
            sub.subresource.kind,
            sub.parent_resource.name,
            sub.parent_resource.kind
        );
    }
}
