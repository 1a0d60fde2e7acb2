//! Engine Manager for NavHub.
//!
//! Implements `EngineManagerTrait` — CRUD operations for search categories
//! and their engines, with the delete-time guard rails: the dataset always
//! keeps at least one category, and every category keeps at least one
//! engine. Engine URL templates are normalized to contain the `{q}` query
//! placeholder at creation time.

use uuid::Uuid;

use crate::types::errors::CollectionError;
use crate::types::search::{Category, SearchEngine, SuggestionSource};

/// Trait defining category and engine operations.
pub trait EngineManagerTrait {
    fn add_category(&mut self, name: &str) -> Result<String, CollectionError>;
    fn rename_category(&mut self, id: &str, name: &str) -> Result<(), CollectionError>;
    /// Rejected with [`CollectionError::LastCategory`] when only one remains.
    fn remove_category(&mut self, id: &str) -> Result<(), CollectionError>;
    fn swap_categories(&mut self, a: usize, b: usize) -> Result<(), CollectionError>;
    fn add_engine(&mut self, category_id: &str, engine: NewEngine) -> Result<(), CollectionError>;
    fn update_engine(&mut self, category_id: &str, name: &str, engine: NewEngine) -> Result<(), CollectionError>;
    /// Rejected with [`CollectionError::LastEngine`] when it is the category's only engine.
    fn remove_engine(&mut self, category_id: &str, name: &str) -> Result<(), CollectionError>;
    fn get_category(&self, id: &str) -> Option<&Category>;
    fn categories(&self) -> &[Category];
}

/// Fields for an engine being added or edited.
#[derive(Debug, Clone, Default)]
pub struct NewEngine {
    pub name: String,
    pub color: String,
    pub url: String,
    pub suggestion_source: SuggestionSource,
}

/// Ensures an engine URL template carries the `{q}` placeholder.
///
/// A bare domain entered in the add-engine flow gets a conventional search
/// path appended: `example.com` becomes `example.com/search?q={q}`.
pub fn normalize_engine_url(url: &str) -> String {
    let url = url.trim();
    if url.contains("{q}") {
        url.to_string()
    } else {
        format!("{}/search?q={{q}}", url.trim_end_matches('/'))
    }
}

/// In-memory category/engine manager.
pub struct EngineManager {
    categories: Vec<Category>,
}

impl EngineManager {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// Consumes the manager, returning the owned categories.
    pub fn into_categories(self) -> Vec<Category> {
        self.categories
    }

    fn find_category_mut(&mut self, id: &str) -> Result<&mut Category, CollectionError> {
        self.categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| CollectionError::CategoryNotFound(id.to_string()))
    }
}

impl EngineManagerTrait for EngineManager {
    /// Adds a new category at the end of the sequence. Returns its generated ID.
    fn add_category(&mut self, name: &str) -> Result<String, CollectionError> {
        if name.trim().is_empty() {
            return Err(CollectionError::EmptyField("name"));
        }
        let id = Uuid::new_v4().to_string();
        self.categories.push(Category {
            id: id.clone(),
            name: name.to_string(),
            engines: Vec::new(),
        });
        Ok(id)
    }

    fn rename_category(&mut self, id: &str, name: &str) -> Result<(), CollectionError> {
        if name.trim().is_empty() {
            return Err(CollectionError::EmptyField("name"));
        }
        let category = self.find_category_mut(id)?;
        category.name = name.to_string();
        Ok(())
    }

    fn remove_category(&mut self, id: &str) -> Result<(), CollectionError> {
        let index = self
            .categories
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| CollectionError::CategoryNotFound(id.to_string()))?;
        if self.categories.len() == 1 {
            return Err(CollectionError::LastCategory);
        }
        self.categories.remove(index);
        Ok(())
    }

    fn swap_categories(&mut self, a: usize, b: usize) -> Result<(), CollectionError> {
        let len = self.categories.len();
        if a >= len {
            return Err(CollectionError::InvalidIndex(a));
        }
        if b >= len {
            return Err(CollectionError::InvalidIndex(b));
        }
        self.categories.swap(a, b);
        Ok(())
    }

    /// Adds an engine at the end of the category, normalizing the URL
    /// template first.
    fn add_engine(&mut self, category_id: &str, engine: NewEngine) -> Result<(), CollectionError> {
        if engine.name.trim().is_empty() {
            return Err(CollectionError::EmptyField("name"));
        }
        if engine.url.trim().is_empty() {
            return Err(CollectionError::EmptyField("url"));
        }
        let category = self.find_category_mut(category_id)?;
        if category.engines.iter().any(|e| e.name == engine.name) {
            return Err(CollectionError::AlreadyExists(engine.name));
        }

        category.engines.push(SearchEngine {
            name: engine.name,
            color: engine.color,
            url: normalize_engine_url(&engine.url),
            suggestion_source: engine.suggestion_source,
        });
        Ok(())
    }

    fn update_engine(
        &mut self,
        category_id: &str,
        name: &str,
        engine: NewEngine,
    ) -> Result<(), CollectionError> {
        if engine.name.trim().is_empty() {
            return Err(CollectionError::EmptyField("name"));
        }
        if engine.url.trim().is_empty() {
            return Err(CollectionError::EmptyField("url"));
        }
        let category = self.find_category_mut(category_id)?;
        let existing = category
            .engines
            .iter_mut()
            .find(|e| e.name == name)
            .ok_or_else(|| CollectionError::EngineNotFound(name.to_string()))?;

        existing.name = engine.name;
        existing.color = engine.color;
        existing.url = normalize_engine_url(&engine.url);
        existing.suggestion_source = engine.suggestion_source;
        Ok(())
    }

    fn remove_engine(&mut self, category_id: &str, name: &str) -> Result<(), CollectionError> {
        let category = self.find_category_mut(category_id)?;
        let index = category
            .engines
            .iter()
            .position(|e| e.name == name)
            .ok_or_else(|| CollectionError::EngineNotFound(name.to_string()))?;
        if category.engines.len() == 1 {
            return Err(CollectionError::LastEngine(category.name.clone()));
        }
        category.engines.remove(index);
        Ok(())
    }

    fn get_category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    fn categories(&self) -> &[Category] {
        &self.categories
    }
}
