//! NavHub — a personal start page engine with sectioned bookmarks,
//! multi-engine search and GitHub-backed sync.
//!
//! Entry point: runs an offline console walkthrough of the core components.
//! The real shell talks to the `navhub-rpc` binary instead.

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                 NavHub v{} — Demo Mode                    ║", env!("CARGO_PKG_VERSION"));
    println!("║      Start page engine with GitHub-backed data sync        ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    demo_database();
    demo_local_store();
    demo_defaults();
    demo_reconciler();
    demo_sections();
    demo_engines();
    demo_favicon();
    demo_suggest_parsing();
    demo_sync_gating();
    demo_app_core();

    println!();
    println!("═══════════════════════════════════════════════════════════════");
    println!("  ✅ All core components demonstrated successfully!");
    println!("  NavHub is ready for shell integration via navhub-rpc.");
    println!("═══════════════════════════════════════════════════════════════");
}

fn section(name: &str) {
    println!("───────────────────────────────────────────────────────────────");
    println!("  📦 {}", name);
    println!("───────────────────────────────────────────────────────────────");
}

fn demo_database() {
    use navhub::database::Database;
    section("Database Layer");

    let db = Database::open_in_memory().expect("Failed to open database");
    let tables: Vec<String> = {
        let conn = db.connection();
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap();
        stmt.query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect()
    };
    println!("  Created {} tables: {}", tables.len(), tables.join(", "));
    println!("  ✓ Database + migrations OK");
    println!();
}

fn demo_local_store() {
    use std::sync::Arc;
    use navhub::database::Database;
    use navhub::services::local_store::{LocalStore, LocalStoreTrait, KEY_SYNC_SETTINGS};
    use navhub::types::settings::SyncSettings;
    section("Local Store Adapter");

    let db = Arc::new(Database::open_in_memory().unwrap());
    let store = LocalStore::new(db);

    let missing: Option<SyncSettings> = store.get(KEY_SYNC_SETTINGS).unwrap();
    println!("  Missing key reads as: {:?}", missing);

    let settings = SyncSettings {
        token: "ghp_demo".to_string(),
        owner: "octocat".to_string(),
        repo: "MyNav".to_string(),
        enabled: true,
    };
    store.set(KEY_SYNC_SETTINGS, &settings).unwrap();
    let loaded: SyncSettings = store.get(KEY_SYNC_SETTINGS).unwrap().unwrap();
    println!("  Roundtrip: owner = {}, enabled = {}", loaded.owner, loaded.enabled);
    println!("  ✓ LocalStore OK");
    println!();
}

fn demo_defaults() {
    use navhub::services::defaults::default_dataset;
    section("Shipped Defaults");

    let doc = default_dataset().unwrap();
    println!("  Sections: {}", doc.sections.len());
    println!("  Categories: {}", doc.categories.len());
    let card_count: usize = doc.sections.iter().map(|s| s.items.len()).sum();
    println!("  Bookmark cards: {}", card_count);
    println!("  First section: {} {}", doc.sections[0].icon, doc.sections[0].title);
    println!("  ✓ Defaults OK");
    println!();
}

fn demo_reconciler() {
    use navhub::services::defaults::default_dataset;
    use navhub::services::reconciler::reconcile;
    use navhub::types::nav::NavDocument;
    section("Merge Reconciler");

    let defaults = default_dataset().unwrap();

    // Simulate a stale local snapshot: first section only, one healed URL
    let mut local = NavDocument {
        sections: vec![defaults.sections[0].clone()],
        categories: vec![defaults.categories[0].clone()],
    };
    local.sections[0].items[0].url = "#".to_string();

    let merged = reconcile(local, &defaults);
    println!("  Local had 1 section; merged has {}", merged.sections.len());
    println!("  Placeholder URL healed to: {}", merged.sections[0].items[0].url);

    let again = reconcile(merged.clone(), &defaults);
    println!("  Idempotent: {}", again == merged);
    println!("  ✓ Reconciler OK");
    println!();
}

fn demo_sections() {
    use navhub::managers::section_manager::{NewItem, SectionManager, SectionManagerTrait};
    section("Section Manager");

    let mut mgr = SectionManager::new(Vec::new());
    let news = mgr.add_section(Some("news"), "News", "📰").unwrap();
    println!("  Added section: {}", news);

    let item_id = mgr
        .add_item(
            &news,
            NewItem {
                title: "HN".to_string(),
                description: String::new(),
                icon: "🔗".to_string(),
                url: "https://news.ycombinator.com".to_string(),
            },
        )
        .unwrap();
    println!("  Added card ({}), count = {}", &item_id[..8], mgr.get_section(&news).unwrap().items.len());

    let rejected = mgr.add_item(&news, NewItem::default());
    println!("  Empty card rejected: {}", rejected.is_err());
    println!("  ✓ SectionManager OK");
    println!();
}

fn demo_engines() {
    use navhub::managers::engine_manager::{normalize_engine_url, EngineManager, EngineManagerTrait, NewEngine};
    use navhub::services::defaults::default_dataset;
    section("Engine Manager");

    let defaults = default_dataset().unwrap();
    let mut mgr = EngineManager::new(vec![defaults.categories[0].clone()]);

    println!("  Normalized bare URL: {}", normalize_engine_url("example.com"));

    mgr.add_engine(
        &defaults.categories[0].id,
        NewEngine {
            name: "Example".to_string(),
            color: "bg-zinc-500".to_string(),
            url: "example.com".to_string(),
            ..Default::default()
        },
    )
    .unwrap();
    println!("  Added engine, count = {}", mgr.categories()[0].engines.len());

    let guard = mgr.remove_category(&defaults.categories[0].id);
    println!("  Deleting the last category rejected: {}", guard.is_err());
    println!("  ✓ EngineManager OK");
    println!();
}

fn demo_favicon() {
    use navhub::services::favicon::{favicon_candidates, FaviconChain, IconView};
    section("Favicon Fallback Chain");

    let candidates = favicon_candidates("https://github.com/");
    println!("  Providers for github.com: {}", candidates.len());

    let mut chain = FaviconChain::new("https://github.com/icon.png", "https://github.com/");
    let mut hops = 0;
    while matches!(chain.current(), IconView::Image(_)) {
        chain.advance();
        hops += 1;
    }
    println!("  Exhausted after {} failures -> {:?}", hops, chain.current());

    let emoji = FaviconChain::new("🔍", "https://github.com/");
    println!("  Emoji icon renders as: {:?}", emoji.current());
    println!("  ✓ FaviconChain OK");
    println!();
}

fn demo_suggest_parsing() {
    use navhub::services::suggest::{parse_payload, strip_jsonp};
    use navhub::types::search::SuggestionSource;
    section("Suggestion Parsing");

    let baidu = strip_jsonp(r#"nav_cb_1({"q":"ru","s":["rust","rustup"]});"#, "nav_cb_1").unwrap();
    println!("  Baidu shape: {:?}", parse_payload(SuggestionSource::Baidu, &baidu));

    let google = strip_jsonp(r#"nav_cb_2(["ru",["rust lang","rust book"]])"#, "nav_cb_2").unwrap();
    println!("  Google shape: {:?}", parse_payload(SuggestionSource::Google, &google));

    let mismatch = strip_jsonp(r#"evil({"s":[]})"#, "nav_cb_3");
    println!("  Callback mismatch rejected: {}", mismatch.is_err());
    println!("  ✓ Suggest parsing OK");
    println!();
}

fn demo_sync_gating() {
    use navhub::services::sync_service::is_local_origin;
    use navhub::types::settings::SyncSettings;
    section("Sync Gating");

    println!("  localhost is local: {}", is_local_origin("localhost"));
    println!("  http://127.0.0.1:5173 is local: {}", is_local_origin("http://127.0.0.1:5173"));
    println!("  https://nav.example.com is local: {}", is_local_origin("https://nav.example.com"));

    let incomplete = SyncSettings {
        enabled: true,
        ..Default::default()
    };
    println!("  Enabled without credentials is configured: {}", incomplete.is_configured());
    println!("  ✓ Sync gating OK");
    println!();
}

fn demo_app_core() {
    use navhub::app::App;
    use navhub::managers::engine_manager::EngineManagerTrait;
    use navhub::managers::section_manager::SectionManagerTrait;
    section("App Core (full lifecycle)");

    let app = App::new(":memory:").unwrap();
    println!("  Loaded {} sections, {} categories from defaults",
        app.section_manager.sections().len(),
        app.engine_manager.categories().len());
    println!("  Origin: {} (sync active: {})", app.origin, app.sync_active());

    let doc = app.document();
    println!("  Canonical document: {} bytes", doc.to_canonical_json().unwrap().len());
    println!("  ✓ App Core OK");
}
