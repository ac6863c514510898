use crate::cli::ExportCommands;
use crate::config::Settings;
use crate::support::{fail, finish_with_notice, open_registry_or_exit, print_json};
use serde_json::json;
use tsirouters_export::{Artifact, Exporter};
use tsirouters_registry::{InputContext, Notice, parse_building_number};

pub fn run(settings: &Settings, target: ExportCommands, json_output: bool) {
    let registry = open_registry_or_exit(settings);
    let exporter = Exporter::new(&registry, &settings.export_dir).with_format(settings.format);

    let (action, artifact) = match target {
        ExportCommands::Master => (
            "export master",
            exporter
                .generate_master_list()
                .unwrap_or_else(|e| fail("failed to write master list", e)),
        ),

        ExportCommands::Single { number } => {
            let number = match parse_building_number(&number, InputContext::Export) {
                Ok(number) => number,
                Err(notice) => return finish_with_notice("export single", &notice, json_output),
            };
            let written = exporter
                .generate_peer_list(number)
                .unwrap_or_else(|e| fail(&format!("failed to write peer list {number}"), e));
            match written {
                Some(artifact) => ("export single", artifact),
                None => {
                    return finish_with_notice(
                        "export single",
                        &Notice::not_found(number),
                        json_output,
                    );
                }
            }
        }

        ExportCommands::All => (
            "export all",
            exporter
                .generate_bundle()
                .unwrap_or_else(|e| fail("failed to write peer-list bundle", e)),
        ),
    };

    report(action, &artifact, &exporter, json_output);
}

fn report(action: &str, artifact: &Artifact, exporter: &Exporter<'_>, json_output: bool) {
    if json_output {
        print_json(&json!({
            "action": action,
            "format": exporter.format().as_str(),
            "artifact": {
                "name": artifact.name,
                "path": artifact.path.display().to_string(),
                "sizeBytes": artifact.size_bytes,
                "entries": artifact.entries,
            }
        }));
    } else {
        println!(
            "tsirouters {action}\n  Wrote: {}\n  Format: {}\n  Entries: {}\n  Bytes: {}",
            artifact.path.display(),
            exporter.format(),
            artifact.entries,
            artifact.size_bytes
        );
    }
}
