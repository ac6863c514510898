use crate::config::Settings;
use crate::support::{fail, finish_with_notice, open_registry_or_exit, print_json};
use serde_json::json;
use tsirouters_registry::{InputContext, parse_building_number};

pub fn run_add(settings: &Settings, number: String, ip: String, json_output: bool) {
    let number = match parse_building_number(&number, InputContext::Add) {
        Ok(number) => number,
        Err(notice) => return finish_with_notice("add", &notice, json_output),
    };

    let registry = open_registry_or_exit(settings);
    let notice = registry
        .add(number, &ip)
        .unwrap_or_else(|e| fail(&format!("failed to add building {number}"), e));
    finish_with_notice("add", &notice, json_output);
}

pub fn run_remove(settings: &Settings, number: String, json_output: bool) {
    let number = match parse_building_number(&number, InputContext::Remove) {
        Ok(number) => number,
        Err(notice) => return finish_with_notice("remove", &notice, json_output),
    };

    let registry = open_registry_or_exit(settings);
    let notice = registry
        .remove(number)
        .unwrap_or_else(|e| fail(&format!("failed to remove building {number}"), e));
    finish_with_notice("remove", &notice, json_output);
}

pub fn run_list(settings: &Settings, json_output: bool) {
    let registry = open_registry_or_exit(settings);
    let buildings = registry
        .list_active()
        .unwrap_or_else(|e| fail("failed to list buildings", e));
    let last_update = registry
        .last_activity_timestamp()
        .unwrap_or_else(|e| fail("failed to read activity log", e));

    if json_output {
        let items = buildings
            .iter()
            .map(|b| {
                json!({
                    "buildingNumber": b.building_number,
                    "ipAddress": b.ip_address,
                    "status": b.status.as_str(),
                    "lastUpdated": b.last_updated.to_rfc3339(),
                })
            })
            .collect::<Vec<_>>();
        print_json(&json!({
            "action": "list",
            "buildingsPath": registry.paths().relations.display().to_string(),
            "lastUpdate": last_update.map(|ts| ts.to_rfc3339()),
            "count": items.len(),
            "items": items,
        }));
    } else {
        println!(
            "tsirouters list\n  Path: {}\n  Count: {}\n  Last update: {}",
            registry.paths().relations.display(),
            buildings.len(),
            last_update
                .map(|ts| ts.to_rfc3339())
                .unwrap_or_else(|| "never".to_string())
        );
        for b in &buildings {
            println!("  - {} {}", b.building_number, b.ip_address);
        }
    }
}

pub fn run_log(settings: &Settings, json_output: bool) {
    let registry = open_registry_or_exit(settings);
    let entries = registry
        .log_entries()
        .unwrap_or_else(|e| fail("failed to read activity log", e));

    if json_output {
        let items = entries
            .iter()
            .map(|entry| {
                json!({
                    "id": entry.id,
                    "buildingNumber": entry.building_number,
                    "action": entry.action.as_str(),
                    "timestamp": entry.timestamp.to_rfc3339(),
                })
            })
            .collect::<Vec<_>>();
        print_json(&json!({
            "action": "log",
            "logsPath": registry.paths().relations.display().to_string(),
            "count": items.len(),
            "items": items,
        }));
    } else {
        println!(
            "tsirouters log\n  Path: {}\n  Count: {}",
            registry.paths().relations.display(),
            entries.len()
        );
        for entry in &entries {
            println!(
                "  - {} building {} {}",
                entry.timestamp.to_rfc3339(),
                entry.building_number,
                entry.action
            );
        }
    }
}
