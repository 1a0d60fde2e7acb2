//! Default/Local Merge Reconciler for NavHub.
//!
//! Runs exactly once, at load time: given the locally persisted dataset and
//! the shipped defaults, produces a merged dataset that preserves every user
//! edit while healing placeholder fields and appending entries that shipped
//! after the user's snapshot was written.
//!
//! Merge is one-directional — defaults fill gaps, they never overwrite a
//! non-empty, non-placeholder user value — and idempotent: reconciling an
//! already reconciled dataset is a no-op.

use tracing::warn;
use uuid::Uuid;

use crate::types::nav::{NavDocument, Section};
use crate::types::search::{Category, SearchEngine, StoredCategories};

/// URL values that mean "not yet customized".
const URL_PLACEHOLDERS: &[&str] = &["", "#"];

/// Known-stale description strings healed from defaults.
///
/// A user value textually equal to one of these will be healed over on the
/// next load. Known limitation of sentinel matching — the list is kept short
/// on purpose.
const STALE_DESCRIPTIONS: &[&str] = &["待补充"];

/// Known-stale icon strings healed from defaults.
const STALE_ICONS: &[&str] = &["🔖"];

fn is_placeholder_url(url: &str) -> bool {
    URL_PLACEHOLDERS.contains(&url)
}

fn is_stale_description(description: &str) -> bool {
    description.is_empty() || STALE_DESCRIPTIONS.contains(&description)
}

fn is_stale_icon(icon: &str) -> bool {
    icon.is_empty() || STALE_ICONS.contains(&icon)
}

/// Normalizes persisted category data to the modern array shape.
///
/// The legacy shape is a name-keyed record of engine lists; migrated
/// categories receive fresh ids. Record entries whose engine list fails to
/// parse are dropped with a warning — the reconcile pass that follows will
/// re-add the shipped version of that category.
pub fn normalize_categories(stored: StoredCategories) -> Vec<Category> {
    match stored {
        StoredCategories::Modern(categories) => categories,
        StoredCategories::Legacy(record) => {
            let mut categories = Vec::with_capacity(record.len());
            for (name, value) in record {
                match serde_json::from_value::<Vec<SearchEngine>>(value) {
                    Ok(engines) => categories.push(Category {
                        id: Uuid::new_v4().to_string(),
                        name,
                        engines,
                    }),
                    Err(e) => {
                        warn!(category = %name, error = %e, "dropping unreadable legacy category");
                    }
                }
            }
            categories
        }
    }
}

/// Merges a locally persisted dataset against the shipped defaults.
///
/// Sections are keyed by `id`, categories by `name` (the historical key —
/// ids only exist in the modern shape). Pre-existing order is preserved;
/// healed-in entries are appended at the end of their parent's sequence.
pub fn reconcile(local: NavDocument, defaults: &NavDocument) -> NavDocument {
    NavDocument {
        sections: reconcile_sections(local.sections, &defaults.sections),
        categories: reconcile_categories(local.categories, &defaults.categories),
    }
}

fn reconcile_sections(mut local: Vec<Section>, defaults: &[Section]) -> Vec<Section> {
    for section in &mut local {
        if let Some(default_section) = defaults.iter().find(|d| d.id == section.id) {
            heal_section(section, default_section);
        }
        // No default counterpart: user-created, kept as-is.
    }

    for default_section in defaults {
        if !local.iter().any(|s| s.id == default_section.id) {
            local.push(default_section.clone());
        }
    }

    local
}

fn heal_section(section: &mut Section, default_section: &Section) {
    for default_item in &default_section.items {
        match section.items.iter_mut().find(|i| i.id == default_item.id) {
            Some(item) => {
                if is_placeholder_url(&item.url) {
                    item.url = default_item.url.clone();
                }
                if is_stale_description(&item.description) {
                    item.description = default_item.description.clone();
                }
                if is_stale_icon(&item.icon) {
                    item.icon = default_item.icon.clone();
                }
            }
            None => section.items.push(default_item.clone()),
        }
    }
}

fn reconcile_categories(mut local: Vec<Category>, defaults: &[Category]) -> Vec<Category> {
    for category in &mut local {
        if let Some(default_category) = defaults.iter().find(|d| d.name == category.name) {
            heal_category(category, default_category);
        }
    }

    for default_category in defaults {
        if !local.iter().any(|c| c.name == default_category.name) {
            local.push(default_category.clone());
        }
    }

    local
}

fn heal_category(category: &mut Category, default_category: &Category) {
    for default_engine in &default_category.engines {
        match category
            .engines
            .iter_mut()
            .find(|e| e.name == default_engine.name)
        {
            Some(engine) => {
                if is_placeholder_url(&engine.url) {
                    engine.url = default_engine.url.clone();
                }
                if engine.color.is_empty() {
                    engine.color = default_engine.color.clone();
                }
            }
            None => category.engines.push(default_engine.clone()),
        }
    }
}
