//! Unit tests for the Section Manager.

use navhub::managers::section_manager::{NewItem, SectionManager, SectionManagerTrait};

fn hn_item() -> NewItem {
    NewItem {
        title: "HN".to_string(),
        description: String::new(),
        icon: "🔗".to_string(),
        url: "https://news.ycombinator.com".to_string(),
    }
}

#[test]
fn test_add_section_then_add_item_scenario() {
    let mut mgr = SectionManager::new(Vec::new());

    let id = mgr.add_section(Some("news"), "News", "📰").unwrap();
    assert_eq!(id, "news");
    assert_eq!(mgr.get_section("news").unwrap().items.len(), 0);

    mgr.add_item("news", hn_item()).unwrap();

    let sections = mgr.sections();
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].id, "news");
    assert_eq!(sections[0].items.len(), 1);
    assert_eq!(sections[0].items[0].url, "https://news.ycombinator.com");
    assert_eq!(sections[0].items[0].icon, "🔗");
}

#[test]
fn test_add_section_generates_id_when_absent() {
    let mut mgr = SectionManager::new(Vec::new());
    let id = mgr.add_section(None, "Misc", "🗂️").unwrap();
    assert!(!id.is_empty());
    assert!(mgr.get_section(&id).is_some());
}

#[test]
fn test_duplicate_section_id_rejected() {
    let mut mgr = SectionManager::new(Vec::new());
    mgr.add_section(Some("news"), "News", "📰").unwrap();
    assert!(mgr.add_section(Some("news"), "Other", "🗞️").is_err());
    assert_eq!(mgr.sections().len(), 1);
}

#[test]
fn test_empty_title_blocks_section_add() {
    let mut mgr = SectionManager::new(Vec::new());
    assert!(mgr.add_section(Some("x"), "  ", "📰").is_err());
    assert!(mgr.sections().is_empty());
}

#[test]
fn test_empty_required_fields_block_item_add() {
    let mut mgr = SectionManager::new(Vec::new());
    mgr.add_section(Some("news"), "News", "📰").unwrap();

    let no_title = NewItem { title: String::new(), ..hn_item() };
    assert!(mgr.add_item("news", no_title).is_err());

    let no_url = NewItem { url: String::new(), ..hn_item() };
    assert!(mgr.add_item("news", no_url).is_err());

    // No partial state leaked into the section
    assert!(mgr.get_section("news").unwrap().items.is_empty());
}

#[test]
fn test_update_item_replaces_fields() {
    let mut mgr = SectionManager::new(Vec::new());
    mgr.add_section(Some("news"), "News", "📰").unwrap();
    let id = mgr.add_item("news", hn_item()).unwrap();

    mgr.update_item(
        "news",
        &id,
        NewItem {
            title: "Hacker News".to_string(),
            description: "front page".to_string(),
            icon: "📰".to_string(),
            url: "https://news.ycombinator.com/news".to_string(),
        },
    )
    .unwrap();

    let updated = &mgr.get_section("news").unwrap().items[0];
    assert_eq!(updated.id, id);
    assert_eq!(updated.title, "Hacker News");
    assert_eq!(updated.url, "https://news.ycombinator.com/news");
}

#[test]
fn test_remove_item_and_section() {
    let mut mgr = SectionManager::new(Vec::new());
    mgr.add_section(Some("news"), "News", "📰").unwrap();
    let id = mgr.add_item("news", hn_item()).unwrap();

    mgr.remove_item("news", &id).unwrap();
    assert!(mgr.get_section("news").unwrap().items.is_empty());

    mgr.remove_section("news").unwrap();
    assert!(mgr.get_section("news").is_none());
}

#[test]
fn test_remove_from_missing_section_fails() {
    let mut mgr = SectionManager::new(Vec::new());
    assert!(mgr.remove_item("ghost", "x").is_err());
    assert!(mgr.remove_section("ghost").is_err());
}

#[test]
fn test_swap_items_reorders_in_place() {
    let mut mgr = SectionManager::new(Vec::new());
    mgr.add_section(Some("news"), "News", "📰").unwrap();
    let a = mgr.add_item("news", hn_item()).unwrap();
    let b = mgr
        .add_item(
            "news",
            NewItem {
                title: "Lobsters".to_string(),
                url: "https://lobste.rs".to_string(),
                ..Default::default()
            },
        )
        .unwrap();

    mgr.swap_items("news", 0, 1).unwrap();

    let items = &mgr.get_section("news").unwrap().items;
    assert_eq!(items[0].id, b);
    assert_eq!(items[1].id, a);
}

#[test]
fn test_swap_with_out_of_bounds_index_fails() {
    let mut mgr = SectionManager::new(Vec::new());
    mgr.add_section(Some("news"), "News", "📰").unwrap();
    mgr.add_item("news", hn_item()).unwrap();

    assert!(mgr.swap_items("news", 0, 5).is_err());
    assert!(mgr.swap_sections(0, 3).is_err());
}
