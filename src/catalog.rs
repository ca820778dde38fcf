use std::collections::HashSet;
use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccentGroup {
    #[serde(rename = "green-200")]
    Green200,
    #[serde(rename = "blue-200")]
    Blue200,
    #[serde(rename = "pink-200")]
    Pink200,
    #[serde(rename = "purple-200")]
    Purple200,
    #[serde(rename = "indigo-200")]
    Indigo200,
    #[serde(rename = "blue-300")]
    Blue300,
    #[serde(rename = "cyan-200")]
    Cyan200,
    #[serde(rename = "purple-300")]
    Purple300,
    #[serde(rename = "emerald-200")]
    Emerald200,
    #[serde(rename = "orange-200")]
    Orange200,
    #[serde(rename = "cyan-300")]
    Cyan300,
    #[serde(rename = "green-300")]
    Green300,
}

impl AccentGroup {
    pub fn hex(self) -> &'static str {
        match self {
            AccentGroup::Green200 => "#BBF7D0",
            AccentGroup::Blue200 => "#BFDBFE",
            AccentGroup::Pink200 => "#FBCFE8",
            AccentGroup::Purple200 => "#E9D5FF",
            AccentGroup::Indigo200 => "#C7D2FE",
            AccentGroup::Blue300 => "#93C5FD",
            AccentGroup::Cyan200 => "#A5F3FC",
            AccentGroup::Purple300 => "#D8B4FE",
            AccentGroup::Emerald200 => "#A7F3D0",
            AccentGroup::Orange200 => "#FED7AA",
            AccentGroup::Cyan300 => "#67E8F9",
            AccentGroup::Green300 => "#86EFAC",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub accent: AccentGroup,
    #[serde(rename = "active", default)]
    pub initial_active: bool,
}

/// A live catalog row: the item plus its current activation flag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    pub item: Item,
    pub active: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    All,
    Active,
    Inactive,
}

impl Filter {
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Active, Filter::Inactive];

    pub fn matches(self, active: bool) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => active,
            Filter::Inactive => !active,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Filter::All => Filter::Active,
            Filter::Active => Filter::Inactive,
            Filter::Inactive => Filter::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Active => "active",
            Filter::Inactive => "inactive",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Active => "Active",
            Filter::Inactive => "Inactive",
        }
    }

    pub fn empty_message(self) -> String {
        format!("No {} extensions found.", self.label())
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("duplicate extension id `{0}`")]
    DuplicateId(String),
    #[error("extension `{0}` has an empty id")]
    EmptyId(String),
}

const SEED_CATALOG: &[(&str, &str, &str, &str, AccentGroup, bool)] = &[
    (
        "1",
        "DevLens",
        "Quickly inspect page layouts and visualize element boundaries.",
        "🔍",
        AccentGroup::Green200,
        true,
    ),
    (
        "2",
        "StyleSpy",
        "Instantly analyze and copy CSS from any webpage element.",
        "👁️",
        AccentGroup::Blue200,
        true,
    ),
    (
        "3",
        "SpeedBoost",
        "Optimizes browser resource usage to accelerate page loading.",
        "⚡",
        AccentGroup::Pink200,
        false,
    ),
    (
        "4",
        "JSONWizard",
        "Formats, validates, and prettifies JSON responses in-browser.",
        "🧙",
        AccentGroup::Purple200,
        true,
    ),
    (
        "5",
        "TabMaster Pro",
        "Organizes browser tabs into groups and sessions.",
        "📋",
        AccentGroup::Indigo200,
        true,
    ),
    (
        "6",
        "ViewportBuddy",
        "Simulates various screen resolutions directly within the browser.",
        "📱",
        AccentGroup::Blue300,
        false,
    ),
    (
        "7",
        "Markup Notes",
        "Enables annotation and notes directly onto webpages for collaborative debugging.",
        "📝",
        AccentGroup::Cyan200,
        true,
    ),
    (
        "8",
        "GridGuides",
        "Overlay customizable grids and alignment guides on any webpage.",
        "⚏",
        AccentGroup::Purple300,
        false,
    ),
    (
        "9",
        "Palette Picker",
        "Instantly extracts color palettes from any webpage.",
        "🎨",
        AccentGroup::Emerald200,
        true,
    ),
    (
        "10",
        "LinkChecker",
        "Scans and highlights broken links on any page.",
        "🔗",
        AccentGroup::Orange200,
        true,
    ),
    (
        "11",
        "DOM Snapshot",
        "Capture and export DOM structures quickly.",
        "📸",
        AccentGroup::Cyan300,
        false,
    ),
    (
        "12",
        "ConsolePlus",
        "Enhanced developer console with advanced filtering and logging.",
        "⌨️",
        AccentGroup::Green300,
        true,
    ),
];

pub fn seed_items() -> Vec<Item> {
    SEED_CATALOG
        .iter()
        .map(|(id, name, description, icon, accent, active)| Item {
            id: (*id).to_string(),
            name: (*name).to_string(),
            description: (*description).to_string(),
            icon: (*icon).to_string(),
            accent: *accent,
            initial_active: *active,
        })
        .collect()
}

/// Ordered id -> entry store. Each live id carries exactly one activation
/// flag, so the list and its activation map cannot drift apart.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    entries: Vec<Entry>,
}

impl Catalog {
    pub fn seeded() -> Self {
        Self::build(seed_items())
    }

    pub fn from_items(items: Vec<Item>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for item in &items {
            if item.id.trim().is_empty() {
                return Err(CatalogError::EmptyId(item.name.clone()));
            }
            if !seen.insert(item.id.as_str()) {
                return Err(CatalogError::DuplicateId(item.id.clone()));
            }
        }
        Ok(Self::build(items))
    }

    fn build(items: Vec<Item>) -> Self {
        let entries = items
            .into_iter()
            .map(|item| Entry {
                active: item.initial_active,
                item,
            })
            .collect();
        Catalog { entries }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.item.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.item.id == id)
    }

    /// Flips the flag for `id` and returns the new value. Absent ids are left
    /// alone.
    pub fn toggle(&mut self, id: &str) -> Option<bool> {
        let idx = self.position(id)?;
        let entry = &mut self.entries[idx];
        entry.active = !entry.active;
        Some(entry.active)
    }

    pub fn remove(&mut self, id: &str) -> Option<Item> {
        let idx = self.position(id)?;
        Some(self.entries.remove(idx).item)
    }

    /// Entries matching `filter`, in catalog order. The iterator is `Clone`,
    /// so a projection can be walked again without touching the store.
    pub fn list(&self, filter: Filter) -> impl Iterator<Item = &Entry> + Clone + '_ {
        self.entries
            .iter()
            .filter(move |entry| filter.matches(entry.active))
    }

    pub fn activations(&self) -> impl Iterator<Item = (&str, bool)> + '_ {
        self.entries
            .iter()
            .map(|entry| (entry.item.id.as_str(), entry.active))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids<'a>(entries: impl Iterator<Item = &'a Entry>) -> Vec<&'a str> {
        entries.map(|entry| entry.item.id.as_str()).collect()
    }

    fn assert_partition(catalog: &Catalog) {
        let all = ids(catalog.list(Filter::All));
        let active = ids(catalog.list(Filter::Active));
        let inactive = ids(catalog.list(Filter::Inactive));
        assert_eq!(all.len(), active.len() + inactive.len());
        for id in &all {
            assert!(active.contains(id) != inactive.contains(id), "id {id}");
        }
        let activations: Vec<&str> = catalog.activations().map(|(id, _)| id).collect();
        assert_eq!(activations, all);
    }

    #[test]
    fn seeded_catalog_splits_into_active_and_inactive() {
        let catalog = Catalog::seeded();
        assert_eq!(catalog.len(), 12);
        assert_eq!(
            ids(catalog.list(Filter::Active)),
            vec!["1", "2", "4", "5", "7", "9", "10", "12"]
        );
        assert_eq!(ids(catalog.list(Filter::Inactive)), vec!["3", "6", "8", "11"]);
        assert_eq!(
            ids(catalog.list(Filter::All)),
            (1..=12).map(|n| n.to_string()).collect::<Vec<_>>()
        );
        assert_partition(&catalog);
    }

    #[test]
    fn toggle_moves_item_between_projections() {
        let mut catalog = Catalog::seeded();
        assert_eq!(catalog.toggle("3"), Some(true));
        assert!(ids(catalog.list(Filter::Active)).contains(&"3"));
        assert!(!ids(catalog.list(Filter::Inactive)).contains(&"3"));
        assert_partition(&catalog);
    }

    #[test]
    fn toggling_twice_restores_the_flag() {
        let mut catalog = Catalog::seeded();
        for entry in Catalog::seeded().list(Filter::All) {
            let id = entry.item.id.as_str();
            catalog.toggle(id);
            catalog.toggle(id);
            assert_eq!(catalog.get(id).map(|entry| entry.active), Some(entry.active));
        }
    }

    #[test]
    fn remove_drops_item_and_its_flag() {
        let mut catalog = Catalog::seeded();
        let removed = catalog.remove("1").map(|item| item.name);
        assert_eq!(removed.as_deref(), Some("DevLens"));
        assert_eq!(catalog.len(), 11);
        assert!(!ids(catalog.list(Filter::All)).contains(&"1"));
        assert!(catalog.activations().all(|(id, _)| id != "1"));
        assert_eq!(catalog.get("1").map(|entry| entry.active), None);

        assert_eq!(catalog.toggle("1"), None);
        assert_eq!(catalog.remove("1"), None);
        assert_eq!(catalog.len(), 11);
        assert_partition(&catalog);
    }

    #[test]
    fn removing_every_inactive_item_empties_that_projection() {
        let mut catalog = Catalog::seeded();
        for id in ["3", "6", "8", "11"] {
            catalog.remove(id);
        }
        assert_eq!(catalog.list(Filter::Inactive).count(), 0);
        assert_eq!(catalog.list(Filter::Active).count(), 8);
        assert_eq!(
            Filter::Inactive.empty_message(),
            "No inactive extensions found."
        );
    }

    #[test]
    fn removing_everything_leaves_an_empty_catalog() {
        let mut catalog = Catalog::seeded();
        assert!(!catalog.is_empty());
        let ids: Vec<String> = catalog
            .list(Filter::All)
            .map(|entry| entry.item.id.clone())
            .collect();
        for id in &ids {
            assert!(catalog.remove(id).is_some());
        }
        assert!(catalog.is_empty());
        assert_eq!(catalog.list(Filter::All).count(), 0);
        assert_eq!(catalog.activations().count(), 0);
    }

    #[test]
    fn list_is_restartable() {
        let catalog = Catalog::seeded();
        let projection = catalog.list(Filter::Inactive);
        let first: Vec<_> = ids(projection.clone());
        let second: Vec<_> = ids(projection);
        assert_eq!(first, second);
    }

    #[test]
    fn partition_holds_across_mixed_operations() {
        let mut catalog = Catalog::seeded();
        let script = [
            ("toggle", "2"),
            ("remove", "5"),
            ("toggle", "11"),
            ("remove", "3"),
            ("toggle", "5"),
            ("toggle", "12"),
            ("remove", "12"),
        ];
        for (op, id) in script {
            match op {
                "toggle" => {
                    catalog.toggle(id);
                }
                _ => {
                    catalog.remove(id);
                }
            }
            assert_partition(&catalog);
        }
        assert_eq!(ids(catalog.list(Filter::All)).len(), 9);
        assert_eq!(catalog.get("2").map(|entry| entry.active), Some(false));
        assert_eq!(catalog.get("11").map(|entry| entry.active), Some(true));
    }

    #[test]
    fn from_items_rejects_duplicate_and_empty_ids() {
        let mut items = seed_items();
        items.push(items[0].clone());
        assert_eq!(
            Catalog::from_items(items).unwrap_err(),
            CatalogError::DuplicateId("1".into())
        );

        let mut items = seed_items();
        items[4].id = "  ".into();
        assert_eq!(
            Catalog::from_items(items).unwrap_err(),
            CatalogError::EmptyId("TabMaster Pro".into())
        );
    }

    #[test]
    fn filter_cycles_through_all_three_states() {
        assert_eq!(Filter::default(), Filter::All);
        assert_eq!(Filter::All.next(), Filter::Active);
        assert_eq!(Filter::Active.next(), Filter::Inactive);
        assert_eq!(Filter::Inactive.next(), Filter::All);
        assert_eq!(Filter::Active.to_string(), "active");
    }

    #[test]
    fn items_deserialize_with_accent_tags() {
        let json = r#"{"id":"x","name":"X","description":"d","icon":"*","accent":"emerald-200","active":true}"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.accent, AccentGroup::Emerald200);
        assert!(item.initial_active);
    }
}
