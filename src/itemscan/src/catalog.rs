//! Item category catalog
//!
//! Maps a category key ("KNIFE", "GAZ BOTTLE") to the name fragment its item
//! definition object carries, the base class that object must derive from,
//! and alternate fragments tried when the primary one finds nothing.

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Base classes item definitions derive from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseClass {
    Melee,
    Item,
    Gun,
}

impl BaseClass {
    pub fn class_name(self) -> &'static str {
        match self {
            BaseClass::Melee => "Data_Melee_C",
            BaseClass::Item => "Data_Item_C",
            BaseClass::Gun => "Data_Gun_C",
        }
    }
}

/// One category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Uppercase category key
    pub key: String,
    /// Substring the definition object's name must contain
    pub fragment: String,
    /// Required base class
    pub base: BaseClass,
    /// Fragments rescanned, in order, when `fragment` finds no objects
    #[serde(default)]
    pub fallbacks: Vec<String>,
}

impl CatalogEntry {
    pub fn new(key: &str, fragment: &str, base: BaseClass) -> Self {
        Self {
            key: normalize_key(key),
            fragment: fragment.to_string(),
            base,
            fallbacks: Vec::new(),
        }
    }

    pub fn with_fallbacks(mut self, fallbacks: &[&str]) -> Self {
        self.fallbacks = fallbacks.iter().map(|f| f.to_string()).collect();
        self
    }
}

/// (key, fragment, base class, fallbacks)
type DefaultEntry = (&'static str, &'static str, BaseClass, &'static [&'static str]);

const DEFAULT_ENTRIES: &[DefaultEntry] = &[
    ("SHORTY", "DA_Shorty", BaseClass::Gun, &[]),
    ("REVOLVER", "DA_Revolver", BaseClass::Gun, &[]),
    ("PISTOL", "DA_Pistol", BaseClass::Gun, &[]),
    ("SHOTGUN", "DA_Shotgun", BaseClass::Gun, &[]),
    ("SMG", "DA_SMG", BaseClass::Gun, &[]),
    ("RIFLE", "DA_Rifle", BaseClass::Gun, &[]),
    ("DETONATOR", "DA_Detonator", BaseClass::Melee, &["Detonator"]),
    ("C4", "DA_C4", BaseClass::Melee, &["C4"]),
    ("KNIFE", "DA_Knife", BaseClass::Melee, &["Knife"]),
    ("FUSE", "DA_Fuse", BaseClass::Melee, &[]),
    ("BATTERY", "DA_Battery", BaseClass::Item, &[]),
    ("GAZ BOTTLE", "DA_GazBottle", BaseClass::Item, &[]),
    ("VENT", "DA_Vent", BaseClass::Item, &[]),
    ("SCREW DRIVER", "DA_ScrewDriver", BaseClass::Item, &[]),
    ("CONTAINER", "DA_Container", BaseClass::Item, &[]),
    ("PIZZUSHI", "DA_Pizzushi", BaseClass::Item, &[]),
    ("CASSETTE", "DA_Cassette", BaseClass::Item, &[]),
    ("SAMPLE", "DA_Sample", BaseClass::Item, &[]),
    ("RICE", "DA_Rice", BaseClass::Item, &[]),
    ("PACKAGE", "DA_Package", BaseClass::Item, &[]),
];

/// Uppercase, whitespace-trimmed form of a category name
pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Category lookup table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemCatalog {
    entries: Vec<CatalogEntry>,
}

impl ItemCatalog {
    /// Build a catalog, normalizing keys and rejecting duplicates
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self, CatalogError> {
        let mut normalized: Vec<CatalogEntry> = Vec::with_capacity(entries.len());

        for mut entry in entries {
            entry.key = normalize_key(&entry.key);
            if entry.key.is_empty() {
                return Err(CatalogError::EmptyKey);
            }
            if entry.fragment.is_empty() {
                return Err(CatalogError::EmptyFragment(entry.key));
            }
            if normalized.iter().any(|e| e.key == entry.key) {
                return Err(CatalogError::DuplicateKey(entry.key));
            }
            normalized.push(entry);
        }

        Ok(Self {
            entries: normalized,
        })
    }

    /// Look up a category by raw (any case) name
    pub fn get(&self, category: &str) -> Option<&CatalogEntry> {
        let key = normalize_key(category);
        self.entries.iter().find(|e| e.key == key)
    }

    /// Entries in declaration order
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ItemCatalog {
    fn default() -> Self {
        Self {
            entries: DEFAULT_ENTRIES
                .iter()
                .map(|&(key, fragment, base, fallbacks)| {
                    CatalogEntry::new(key, fragment, base).with_fallbacks(fallbacks)
                })
                .collect(),
        }
    }
}
