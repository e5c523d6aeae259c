//! `categories` command

use anyhow::Result;
use itemscan::ItemCatalog;

/// Handle `itemscan categories`
pub fn handle(catalog: &ItemCatalog, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(catalog.entries())?);
        return Ok(());
    }

    println!("{:<14} {:<16} {:<14} Fallbacks", "Category", "Fragment", "Base Class");
    println!("{}", "-".repeat(60));
    for entry in catalog.entries() {
        println!(
            "{:<14} {:<16} {:<14} {}",
            entry.key,
            entry.fragment,
            entry.base.class_name(),
            entry.fallbacks.join(", ")
        );
    }
    println!();
    println!("{} categories", catalog.len());

    Ok(())
}
