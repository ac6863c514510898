use crate::config::Settings;
use crate::support::{fail, print_json, yes_no};
use serde_json::json;
use tsirouters_registry::Registry;

pub fn run(settings: &Settings, json_output: bool) {
    let (registry, outcome) = Registry::init(&settings.data_dir).unwrap_or_else(|e| {
        fail(
            &format!("failed to initialize {}", settings.data_dir.display()),
            e,
        )
    });
    let paths = registry.paths();

    if json_output {
        print_json(&json!({
            "action": "init",
            "dataDir": paths.dir.display().to_string(),
            "relationsPath": paths.relations.display().to_string(),
            "exportDir": settings.export_dir.display().to_string(),
            "createdRelations": outcome.created_relations,
            "seeded": outcome.seeded,
        }));
    } else {
        println!("tsirouters init");
        println!();
        println!("  data dir: {}", paths.dir.display());
        println!("  relations: {}", paths.relations.display());
        println!("  export dir: {}", settings.export_dir.display());
        println!(
            "  created relations file: {}",
            yes_no(outcome.created_relations)
        );
        println!("  seeded default buildings: {}", yes_no(outcome.seeded > 0));
    }
}
