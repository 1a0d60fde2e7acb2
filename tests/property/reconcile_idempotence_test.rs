//! Property-based tests for the merge reconciler.
//!
//! Verifies, for arbitrary local and default datasets:
//! - reconciling twice equals reconciling once (idempotence);
//! - non-placeholder user values are never discarded;
//! - the merge is additive-only for structure (every id on either side
//!   survives into the result).

use navhub::services::reconciler::reconcile;
use navhub::types::nav::{LinkItem, NavDocument, Section};
use navhub::types::search::{Category, SearchEngine, SuggestionSource};
use proptest::prelude::*;

/// URLs including the placeholder sentinels, so healing paths are exercised.
fn arb_url() -> impl Strategy<Value = String> {
    prop_oneof![
        2 => Just(String::new()),
        2 => Just("#".to_string()),
        6 => "[a-z]{3,8}".prop_map(|host| format!("https://{}.example/", host)),
    ]
}

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        2 => Just(String::new()),
        6 => "[a-z ]{1,12}",
    ]
}

/// Item ids from a tiny alphabet so local and default datasets overlap.
fn arb_item() -> impl Strategy<Value = LinkItem> {
    ("[a-c][0-9]", arb_text(), arb_text(), arb_url()).prop_map(|(id, description, icon, url)| {
        LinkItem {
            id,
            title: "Card".to_string(),
            description,
            icon,
            url,
        }
    })
}

fn dedupe_items(items: Vec<LinkItem>) -> Vec<LinkItem> {
    let mut seen = std::collections::HashSet::new();
    items.into_iter().filter(|i| seen.insert(i.id.clone())).collect()
}

fn arb_section() -> impl Strategy<Value = Section> {
    ("[a-e]", proptest::collection::vec(arb_item(), 0..5)).prop_map(|(id, items)| Section {
        id,
        title: "Section".to_string(),
        icon: "📁".to_string(),
        items: dedupe_items(items),
    })
}

fn dedupe_sections(sections: Vec<Section>) -> Vec<Section> {
    let mut seen = std::collections::HashSet::new();
    sections.into_iter().filter(|s| seen.insert(s.id.clone())).collect()
}

fn arb_engine() -> impl Strategy<Value = SearchEngine> {
    ("[a-c]{2,5}", arb_text(), arb_url()).prop_map(|(name, color, url)| SearchEngine {
        name,
        color,
        url,
        suggestion_source: SuggestionSource::None,
    })
}

fn arb_category() -> impl Strategy<Value = Category> {
    ("[a-c]", proptest::collection::vec(arb_engine(), 0..4)).prop_map(|(name, engines)| {
        let mut seen = std::collections::HashSet::new();
        Category {
            id: format!("id-{}", name),
            name,
            engines: engines
                .into_iter()
                .filter(|e| seen.insert(e.name.clone()))
                .collect(),
        }
    })
}

fn dedupe_categories(categories: Vec<Category>) -> Vec<Category> {
    let mut seen = std::collections::HashSet::new();
    categories.into_iter().filter(|c| seen.insert(c.name.clone())).collect()
}

fn arb_document() -> impl Strategy<Value = NavDocument> {
    (
        proptest::collection::vec(arb_section(), 0..4),
        proptest::collection::vec(arb_category(), 0..3),
    )
        .prop_map(|(sections, categories)| NavDocument {
            sections: dedupe_sections(sections),
            categories: dedupe_categories(categories),
        })
}

fn is_placeholder(url: &str) -> bool {
    url.is_empty() || url == "#"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // reconcile(reconcile(L, D), D) == reconcile(L, D)
    #[test]
    fn reconcile_is_idempotent(local in arb_document(), defaults in arb_document()) {
        let once = reconcile(local, &defaults);
        let twice = reconcile(once.clone(), &defaults);
        prop_assert_eq!(once, twice);
    }

    // A non-placeholder user URL survives the merge verbatim.
    #[test]
    fn reconcile_never_discards_user_urls(local in arb_document(), defaults in arb_document()) {
        let merged = reconcile(local.clone(), &defaults);

        for local_section in &local.sections {
            for local_item in &local_section.items {
                if is_placeholder(&local_item.url) {
                    continue;
                }
                let merged_item = merged
                    .sections
                    .iter()
                    .find(|s| s.id == local_section.id)
                    .and_then(|s| s.items.iter().find(|i| i.id == local_item.id));
                prop_assert_eq!(
                    merged_item.map(|i| i.url.as_str()),
                    Some(local_item.url.as_str()),
                    "user URL for {}/{} must survive",
                    local_section.id,
                    local_item.id
                );
            }
        }
    }

    // Every section/category id present on either side is present afterwards.
    #[test]
    fn reconcile_is_additive_only(local in arb_document(), defaults in arb_document()) {
        let merged = reconcile(local.clone(), &defaults);

        for section in local.sections.iter().chain(defaults.sections.iter()) {
            prop_assert!(
                merged.sections.iter().any(|s| s.id == section.id),
                "section {} must survive the merge",
                section.id
            );
        }
        for category in local.categories.iter().chain(defaults.categories.iter()) {
            prop_assert!(
                merged.categories.iter().any(|c| c.name == category.name),
                "category {} must survive the merge",
                category.name
            );
        }
    }

    // Pre-existing local order is preserved as a prefix.
    #[test]
    fn reconcile_preserves_local_section_order(local in arb_document(), defaults in arb_document()) {
        let local_ids: Vec<String> = local.sections.iter().map(|s| s.id.clone()).collect();
        let merged = reconcile(local, &defaults);
        let merged_ids: Vec<String> = merged.sections.iter().map(|s| s.id.clone()).collect();
        prop_assert_eq!(&merged_ids[..local_ids.len()], &local_ids[..]);
    }
}
