//! RPC method handler for the NavHub JSON-RPC protocol.
//!
//! Extracted from `rpc_server.rs` so it can be unit-tested independently.
//! `handle_method` dispatches JSON-RPC method calls to the managers and
//! services via the `App` struct.
//!
//! Mutating methods flush to the local store synchronously and, when sync
//! is active, spawn a detached push of the full document — fire-and-forget,
//! per the sync contract. Validation failures and guard-rail violations
//! come back as `Err(String)` so the shell can show them as notices.

use std::sync::Mutex;

use serde_json::{json, Value};

use crate::app::App;
use crate::managers::engine_manager::{EngineManagerTrait, NewEngine};
use crate::managers::section_manager::{NewItem, SectionManagerTrait};
use crate::services::favicon::favicon_candidates;
use crate::services::metadata_resolver::CancelToken;
use crate::services::sync_service::{self, GitHubContentStore};
use crate::types::search::SuggestionSource;
use crate::types::settings::SyncSettings;

fn str_param<'a>(params: &'a Value, key: &str) -> Result<&'a str, String> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("missing {}", key))
}

fn opt_str_param<'a>(params: &'a Value, key: &str) -> &'a str {
    params.get(key).and_then(|v| v.as_str()).unwrap_or_default()
}

fn index_param(params: &Value, key: &str) -> Result<usize, String> {
    params
        .get(key)
        .and_then(|v| v.as_u64())
        .map(|v| v as usize)
        .ok_or_else(|| format!("missing {}", key))
}

fn item_from_params(params: &Value) -> Result<NewItem, String> {
    Ok(NewItem {
        title: str_param(params, "title")?.to_string(),
        description: opt_str_param(params, "description").to_string(),
        icon: opt_str_param(params, "icon").to_string(),
        url: str_param(params, "url")?.to_string(),
    })
}

fn engine_from_params(params: &Value) -> Result<NewEngine, String> {
    let suggestion_source = match params.get("suggestion_source") {
        Some(value) => serde_json::from_value(value.clone())
            .map_err(|_| "invalid suggestion_source".to_string())?,
        None => SuggestionSource::None,
    };
    Ok(NewEngine {
        name: str_param(params, "name")?.to_string(),
        color: opt_str_param(params, "color").to_string(),
        url: str_param(params, "url")?.to_string(),
        suggestion_source,
    })
}

/// Flush after a mutation and, when sync is active, spawn a detached push.
///
/// Push failures never reach the shell — they are logged by `push_and_log`.
fn flush_and_push(app: &App, rt: &tokio::runtime::Handle) -> Result<(), String> {
    app.flush().map_err(|e| e.to_string())?;
    if app.sync_active() {
        let document = app.document();
        let settings = app.sync_settings.clone();
        let origin = app.origin.clone();
        rt.spawn(async move {
            let store = GitHubContentStore::from_settings(&settings);
            sync_service::push_and_log(&store, &document, &settings, &origin).await;
        });
    }
    Ok(())
}

/// Dispatch a JSON-RPC method call to the appropriate handler.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub fn handle_method(
    app: &Mutex<App>,
    rt: &tokio::runtime::Handle,
    method: &str,
    params: &Value,
) -> Result<Value, String> {
    match method {
        // ─── Sections & cards ───
        "section.list" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            serde_json::to_value(a.section_manager.sections()).map_err(|e| e.to_string())
        }
        "section.add" => {
            let title = str_param(params, "title")?;
            let icon = opt_str_param(params, "icon");
            let id = params.get("id").and_then(|v| v.as_str());
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let section_id = a
                .section_manager
                .add_section(id, title, icon)
                .map_err(|e| e.to_string())?;
            flush_and_push(&a, rt)?;
            Ok(json!({"id": section_id}))
        }
        "section.update" => {
            let id = str_param(params, "id")?;
            let title = str_param(params, "title")?;
            let icon = opt_str_param(params, "icon");
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.section_manager
                .update_section(id, title, icon)
                .map_err(|e| e.to_string())?;
            flush_and_push(&a, rt)?;
            Ok(json!({"ok": true}))
        }
        "section.delete" => {
            let id = str_param(params, "id")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.section_manager.remove_section(id).map_err(|e| e.to_string())?;
            flush_and_push(&a, rt)?;
            Ok(json!({"ok": true}))
        }
        "section.swap" => {
            let from = index_param(params, "a")?;
            let to = index_param(params, "b")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.section_manager.swap_sections(from, to).map_err(|e| e.to_string())?;
            flush_and_push(&a, rt)?;
            Ok(json!({"ok": true}))
        }
        "item.add" => {
            let section_id = str_param(params, "section_id")?;
            let item = item_from_params(params)?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let item_id = a
                .section_manager
                .add_item(section_id, item)
                .map_err(|e| e.to_string())?;
            flush_and_push(&a, rt)?;
            Ok(json!({"id": item_id}))
        }
        "item.update" => {
            let section_id = str_param(params, "section_id")?;
            let item_id = str_param(params, "id")?;
            let item = item_from_params(params)?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.section_manager
                .update_item(section_id, item_id, item)
                .map_err(|e| e.to_string())?;
            flush_and_push(&a, rt)?;
            Ok(json!({"ok": true}))
        }
        "item.delete" => {
            let section_id = str_param(params, "section_id")?;
            let item_id = str_param(params, "id")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.section_manager
                .remove_item(section_id, item_id)
                .map_err(|e| e.to_string())?;
            flush_and_push(&a, rt)?;
            Ok(json!({"ok": true}))
        }
        "item.swap" => {
            let section_id = str_param(params, "section_id")?;
            let from = index_param(params, "a")?;
            let to = index_param(params, "b")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.section_manager
                .swap_items(section_id, from, to)
                .map_err(|e| e.to_string())?;
            flush_and_push(&a, rt)?;
            Ok(json!({"ok": true}))
        }

        // ─── Categories & engines ───
        "category.list" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            serde_json::to_value(a.engine_manager.categories()).map_err(|e| e.to_string())
        }
        "category.add" => {
            let name = str_param(params, "name")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let id = a.engine_manager.add_category(name).map_err(|e| e.to_string())?;
            flush_and_push(&a, rt)?;
            Ok(json!({"id": id}))
        }
        "category.rename" => {
            let id = str_param(params, "id")?;
            let name = str_param(params, "name")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.engine_manager.rename_category(id, name).map_err(|e| e.to_string())?;
            flush_and_push(&a, rt)?;
            Ok(json!({"ok": true}))
        }
        "category.delete" => {
            let id = str_param(params, "id")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.engine_manager.remove_category(id).map_err(|e| e.to_string())?;
            flush_and_push(&a, rt)?;
            Ok(json!({"ok": true}))
        }
        "category.swap" => {
            let from = index_param(params, "a")?;
            let to = index_param(params, "b")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.engine_manager.swap_categories(from, to).map_err(|e| e.to_string())?;
            flush_and_push(&a, rt)?;
            Ok(json!({"ok": true}))
        }
        "engine.add" => {
            let category_id = str_param(params, "category_id")?;
            let engine = engine_from_params(params)?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.engine_manager.add_engine(category_id, engine).map_err(|e| e.to_string())?;
            flush_and_push(&a, rt)?;
            Ok(json!({"ok": true}))
        }
        "engine.update" => {
            let category_id = str_param(params, "category_id")?;
            let existing_name = str_param(params, "engine")?;
            let engine = engine_from_params(params)?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.engine_manager
                .update_engine(category_id, existing_name, engine)
                .map_err(|e| e.to_string())?;
            flush_and_push(&a, rt)?;
            Ok(json!({"ok": true}))
        }
        "engine.delete" => {
            let category_id = str_param(params, "category_id")?;
            let name = str_param(params, "name")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.engine_manager.remove_engine(category_id, name).map_err(|e| e.to_string())?;
            flush_and_push(&a, rt)?;
            Ok(json!({"ok": true}))
        }

        // ─── Search ───
        "search.url" => {
            let category_id = str_param(params, "category_id")?;
            let engine_name = str_param(params, "engine")?;
            let query = str_param(params, "query")?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let category = a
                .engine_manager
                .get_category(category_id)
                .ok_or_else(|| format!("category not found: {}", category_id))?;
            let engine = category
                .engines
                .iter()
                .find(|e| e.name == engine_name)
                .ok_or_else(|| format!("engine not found: {}", engine_name))?;
            let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
            Ok(json!({"url": engine.url.replace("{q}", &encoded)}))
        }
        "suggest.fetch" => {
            let query = str_param(params, "query")?;
            let source: SuggestionSource = match params.get("source") {
                Some(value) => serde_json::from_value(value.clone())
                    .map_err(|_| "invalid source".to_string())?,
                None => SuggestionSource::None,
            };
            let a = app.lock().map_err(|e| e.to_string())?;
            let suggestions = rt.block_on(a.suggest.fetch_suggestions(query, source));
            Ok(json!(suggestions))
        }

        // ─── Metadata & icons ───
        "metadata.resolve" => {
            let target = str_param(params, "url")?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let cancel = CancelToken::new();
            let resolved = rt
                .block_on(a.resolver.resolve(target, &cancel))
                .map_err(|e| e.to_string())?;
            match resolved {
                Some(metadata) => serde_json::to_value(metadata).map_err(|e| e.to_string()),
                None => Ok(Value::Null),
            }
        }
        "favicon.chain" => {
            let target = str_param(params, "url")?;
            Ok(json!(favicon_candidates(target)))
        }

        // ─── Sync ───
        "sync.settings.get" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            serde_json::to_value(&a.sync_settings).map_err(|e| e.to_string())
        }
        "sync.settings.set" => {
            let settings: SyncSettings =
                serde_json::from_value(params.clone()).map_err(|e| e.to_string())?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.set_sync_settings(settings).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "sync.push" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            let store = GitHubContentStore::from_settings(&a.sync_settings);
            let outcome = rt
                .block_on(sync_service::push(&store, &a.document(), &a.sync_settings, &a.origin))
                .map_err(|e| e.to_string())?;
            Ok(json!({"sha": outcome.sha, "created": outcome.created}))
        }
        "sync.pull" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            rt.block_on(a.startup_pull());
            serde_json::to_value(a.document()).map_err(|e| e.to_string())
        }

        // ─── Document ───
        "doc.export" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            serde_json::to_value(a.document()).map_err(|e| e.to_string())
        }

        // Dev-only: regenerate the shipped defaults asset from the live
        // dataset. Absent from release builds.
        #[cfg(debug_assertions)]
        "defaults.promote" => {
            let path = params
                .get("path")
                .and_then(|v| v.as_str())
                .unwrap_or("assets/defaults.json");
            let a = app.lock().map_err(|e| e.to_string())?;
            let content = a.document().to_canonical_json().map_err(|e| e.to_string())?;
            std::fs::write(path, content).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true, "path": path}))
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
