//! Item category resolution command

use anyhow::{bail, Result};
use itemscan::{ObjectRecord, ResolveError};
use serde_json::json;
use std::time::Duration;

use crate::deadline::run_with_deadline;
use crate::session::Target;

/// Handle `itemscan resolve <CATEGORY>`
pub fn handle(
    target: Target,
    category: String,
    timeout: Option<Duration>,
    json: bool,
) -> Result<()> {
    let key = target
        .catalog
        .get(&category)
        .map(|entry| entry.key.clone())
        .unwrap_or_else(|| category.clone());

    let result = run_with_deadline(timeout, move || target.resolver().resolve_record(&category))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&to_json(&key, &result))?);
    } else if let Ok(record) = &result {
        print_record(&key, record);
    }

    match result {
        Ok(_) => Ok(()),
        Err(e) => bail!("Could not resolve {}: {}", key, e),
    }
}

fn print_record(key: &str, record: &ObjectRecord) {
    println!("{} -> {}", key, record.handle);
    println!("  Name:  {}", record.name);
    if record.class_name.is_empty() {
        println!("  Class: {}", record.class_handle);
    } else {
        println!("  Class: {} ({})", record.class_name, record.class_handle);
    }
    println!("  Index: {}", record.index);
}

fn to_json(key: &str, result: &Result<ObjectRecord, ResolveError>) -> serde_json::Value {
    match result {
        Ok(record) => json!({
            "category": key,
            "handle": record.handle.to_string(),
            "name": record.name,
            "class": record.class_name,
            "class_handle": record.class_handle.to_string(),
            "index": record.index,
        }),
        Err(e) => json!({
            "category": key,
            "error": e.kind(),
            "message": e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itemscan::RemoteHandle;

    #[test]
    fn test_json_success() {
        let record = ObjectRecord {
            index: 65537,
            handle: RemoteHandle(0x2000_0100),
            name: "DA_Knife".to_string(),
            class_handle: RemoteHandle(0x2000_0200),
            class_name: "Data_Melee_C".to_string(),
        };
        let value = to_json("KNIFE", &Ok(record));
        assert_eq!(value["handle"], "0x20000100");
        assert_eq!(value["class"], "Data_Melee_C");
        assert_eq!(value["index"], 65537);
    }

    #[test]
    fn test_json_failure_carries_kind() {
        let err = ResolveError::NoObjectsFound {
            category: "FUSE".to_string(),
            fragment: "DA_Fuse".to_string(),
        };
        let value = to_json("FUSE", &Err(err));
        assert_eq!(value["error"], "NoObjectsFound");
        assert_eq!(
            value["message"],
            "No objects found for FUSE (searched for 'DA_Fuse')"
        );
    }
}
