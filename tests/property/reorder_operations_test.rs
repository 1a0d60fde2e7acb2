//! Property-based tests for drag-reorder operations.
//!
//! Reorders are index swaps applied atomically to the in-memory sequence:
//! they must never lose or duplicate entries, and swapping the same pair
//! twice must restore the original order.

use navhub::managers::section_manager::{NewItem, SectionManager, SectionManagerTrait};
use proptest::prelude::*;

fn build_manager(titles: &[String]) -> SectionManager {
    let mut mgr = SectionManager::new(Vec::new());
    for (i, title) in titles.iter().enumerate() {
        mgr.add_section(Some(&format!("s{}", i)), title, "📁").unwrap();
    }
    mgr
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn swap_preserves_the_id_set(
        titles in proptest::collection::vec("[a-z]{1,8}", 2..8),
        a in 0usize..8,
        b in 0usize..8,
    ) {
        let mut mgr = build_manager(&titles);
        let before: Vec<String> = mgr.sections().iter().map(|s| s.id.clone()).collect();

        let result = mgr.swap_sections(a, b);
        let after: Vec<String> = mgr.sections().iter().map(|s| s.id.clone()).collect();

        if a < titles.len() && b < titles.len() {
            prop_assert!(result.is_ok());
            let mut sorted_before = before.clone();
            let mut sorted_after = after.clone();
            sorted_before.sort();
            sorted_after.sort();
            prop_assert_eq!(sorted_before, sorted_after, "swap must not lose or duplicate ids");
            prop_assert_eq!(&after[a], &before[b]);
            prop_assert_eq!(&after[b], &before[a]);
        } else {
            // Out-of-bounds swaps are rejected and leave order untouched
            prop_assert!(result.is_err());
            prop_assert_eq!(before, after);
        }
    }

    #[test]
    fn swapping_twice_is_identity(
        titles in proptest::collection::vec("[a-z]{1,8}", 2..8),
        a in 0usize..8,
        b in 0usize..8,
    ) {
        let mut mgr = build_manager(&titles);
        let before: Vec<String> = mgr.sections().iter().map(|s| s.id.clone()).collect();

        if mgr.swap_sections(a, b).is_ok() {
            mgr.swap_sections(a, b).unwrap();
        }
        let after: Vec<String> = mgr.sections().iter().map(|s| s.id.clone()).collect();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn item_swap_preserves_content(
        urls in proptest::collection::vec("[a-z]{3,8}", 2..6),
        a in 0usize..6,
        b in 0usize..6,
    ) {
        let mut mgr = SectionManager::new(Vec::new());
        mgr.add_section(Some("grid"), "Grid", "🗂️").unwrap();
        for (i, host) in urls.iter().enumerate() {
            mgr.add_item(
                "grid",
                NewItem {
                    title: format!("Card {}", i),
                    url: format!("https://{}.example/", host),
                    ..Default::default()
                },
            )
            .unwrap();
        }

        let before: Vec<String> = mgr
            .get_section("grid").unwrap()
            .items.iter().map(|i| i.url.clone()).collect();

        let result = mgr.swap_items("grid", a, b);
        let after: Vec<String> = mgr
            .get_section("grid").unwrap()
            .items.iter().map(|i| i.url.clone()).collect();

        if a < urls.len() && b < urls.len() {
            prop_assert!(result.is_ok());
            prop_assert_eq!(&after[a], &before[b]);
            prop_assert_eq!(&after[b], &before[a]);
            prop_assert_eq!(after.len(), before.len());
        } else {
            prop_assert!(result.is_err());
            prop_assert_eq!(before, after);
        }
    }
}
