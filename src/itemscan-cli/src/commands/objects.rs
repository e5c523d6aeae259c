//! Object lookup commands: `find`, `list` and `is-a`

use anyhow::{Context, Result};
use itemscan::{ClassRecord, ObjectRecord, RemoteHandle};
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;

use crate::deadline::run_with_deadline;
use crate::session::Target;

/// Handle `itemscan find <FRAGMENT>`
pub fn find(
    target: Target,
    fragment: String,
    limit: usize,
    timeout: Option<Duration>,
    json: bool,
) -> Result<()> {
    let pattern = fragment.clone();
    let records = run_with_deadline(timeout, move || target.scanner().find_objects(&pattern))?
        .with_context(|| format!("Scan for '{}' failed", fragment))?;

    let shown = &records[..records.len().min(limit)];

    if json {
        println!("{}", serde_json::to_string_pretty(shown)?);
        return Ok(());
    }

    println!(
        "Found {} object(s) matching '{}'",
        records.len(),
        fragment
    );
    for record in shown {
        println!("{}", format_record(record));
    }
    if records.len() > shown.len() {
        println!("... and {} more (use --limit)", records.len() - shown.len());
    }

    Ok(())
}

/// Handle `itemscan list`
pub fn list(
    target: Target,
    limit: usize,
    stats: bool,
    timeout: Option<Duration>,
    json: bool,
) -> Result<()> {
    let (total, shown, counts) = run_with_deadline(timeout, move || {
        let mut shown = Vec::new();
        let mut counts: HashMap<String, usize> = HashMap::new();

        let total = target.scanner().for_each_object(|record| {
            if stats {
                *counts.entry(record.class_name).or_default() += 1;
            } else if shown.len() < limit {
                shown.push(record);
            }
        })?;

        Ok::<_, itemscan::ScanError>((total, shown, counts))
    })?
    .context("GUObjectArray walk failed")?;

    if stats {
        let top = top_classes(counts, limit);
        if json {
            let value = json!({
                "total": total,
                "classes": top
                    .iter()
                    .map(|(name, count)| json!({ "class": name, "count": count }))
                    .collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        } else {
            println!("{} live objects", total);
            for (name, count) in &top {
                let label = if name.is_empty() { "(unknown)" } else { name.as_str() };
                println!("{:>8}  {}", count, label);
            }
        }
        return Ok(());
    }

    if json {
        let value = json!({ "total": total, "objects": shown });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{} live objects", total);
    for record in &shown {
        println!("{}", format_record(record));
    }

    Ok(())
}

/// Handle `itemscan is-a <ADDRESS> <CLASS>`
pub fn is_a(
    target: Target,
    address: usize,
    class: String,
    exact: bool,
    timeout: Option<Duration>,
    json: bool,
) -> Result<()> {
    let handle = RemoteHandle(address);
    let wanted = class.clone();
    let (matches, chain) = run_with_deadline(timeout, move || {
        let matcher = target.matcher();
        (matcher.is_a(handle, &wanted, exact), matcher.class_chain(handle))
    })?;

    if json {
        let value = json!({
            "handle": handle.to_string(),
            "class": class,
            "exact": exact,
            "matches": matches,
            "chain": chain.iter().map(chain_json).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let verdict = if matches { "yes" } else { "no" };
    let mode = if exact { "exactly" } else { "containing" };
    println!("{} derives from class {} '{}': {}", handle, mode, class, verdict);

    if chain.is_empty() {
        println!("  (class chain unreadable)");
    }
    for (depth, link) in chain.iter().enumerate() {
        println!("  {:>2}  {}  {}", depth, link.handle, link.name);
    }

    Ok(())
}

fn format_record(record: &ObjectRecord) -> String {
    format!(
        "{:>8}  {}  {}  [{}]",
        record.index, record.handle, record.name, record.class_name
    )
}

/// Most common classes first, ties by name
fn top_classes(counts: HashMap<String, usize>, limit: usize) -> Vec<(String, usize)> {
    let mut sorted: Vec<_> = counts.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted.truncate(limit);
    sorted
}

fn chain_json(link: &ClassRecord) -> serde_json::Value {
    json!({
        "handle": link.handle.to_string(),
        "name": link.name,
    })
}
