//! Section Manager for NavHub.
//!
//! Implements `SectionManagerTrait` — CRUD and reorder operations for the
//! ordered section/card collection. The manager owns the in-memory data;
//! the app core flushes a snapshot to the local store after every mutation.

use uuid::Uuid;

use crate::types::errors::CollectionError;
use crate::types::nav::{LinkItem, Section};

/// Trait defining section and card operations.
pub trait SectionManagerTrait {
    fn add_section(&mut self, id: Option<&str>, title: &str, icon: &str) -> Result<String, CollectionError>;
    fn update_section(&mut self, id: &str, title: &str, icon: &str) -> Result<(), CollectionError>;
    fn remove_section(&mut self, id: &str) -> Result<(), CollectionError>;
    /// Drag reorder: swaps the sections at the two indices.
    fn swap_sections(&mut self, a: usize, b: usize) -> Result<(), CollectionError>;
    fn add_item(&mut self, section_id: &str, item: NewItem) -> Result<String, CollectionError>;
    fn update_item(&mut self, section_id: &str, item_id: &str, item: NewItem) -> Result<(), CollectionError>;
    fn remove_item(&mut self, section_id: &str, item_id: &str) -> Result<(), CollectionError>;
    /// Drag reorder: swaps the items at the two indices within a section.
    fn swap_items(&mut self, section_id: &str, a: usize, b: usize) -> Result<(), CollectionError>;
    fn get_section(&self, id: &str) -> Option<&Section>;
    fn sections(&self) -> &[Section];
}

/// Fields for a card being added or edited.
///
/// Title and URL are required; description and icon may be left for the
/// metadata resolver to fill in.
#[derive(Debug, Clone, Default)]
pub struct NewItem {
    pub title: String,
    pub description: String,
    pub icon: String,
    pub url: String,
}

/// In-memory section manager.
pub struct SectionManager {
    sections: Vec<Section>,
}

impl SectionManager {
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    /// Consumes the manager, returning the owned sections.
    pub fn into_sections(self) -> Vec<Section> {
        self.sections
    }

    fn find_section_mut(&mut self, id: &str) -> Result<&mut Section, CollectionError> {
        self.sections
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| CollectionError::SectionNotFound(id.to_string()))
    }
}

impl SectionManagerTrait for SectionManager {
    /// Adds a new section at the end of the sequence. Returns its ID —
    /// caller-provided (anchor-style ids like `news`) or generated.
    fn add_section(
        &mut self,
        id: Option<&str>,
        title: &str,
        icon: &str,
    ) -> Result<String, CollectionError> {
        if title.trim().is_empty() {
            return Err(CollectionError::EmptyField("title"));
        }
        let id = match id {
            Some(id) if !id.trim().is_empty() => id.to_string(),
            _ => Uuid::new_v4().to_string(),
        };
        if self.sections.iter().any(|s| s.id == id) {
            return Err(CollectionError::AlreadyExists(id));
        }

        self.sections.push(Section {
            id: id.clone(),
            title: title.to_string(),
            icon: icon.to_string(),
            items: Vec::new(),
        });
        Ok(id)
    }

    fn update_section(&mut self, id: &str, title: &str, icon: &str) -> Result<(), CollectionError> {
        if title.trim().is_empty() {
            return Err(CollectionError::EmptyField("title"));
        }
        let section = self.find_section_mut(id)?;
        section.title = title.to_string();
        section.icon = icon.to_string();
        Ok(())
    }

    fn remove_section(&mut self, id: &str) -> Result<(), CollectionError> {
        let index = self
            .sections
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| CollectionError::SectionNotFound(id.to_string()))?;
        self.sections.remove(index);
        Ok(())
    }

    fn swap_sections(&mut self, a: usize, b: usize) -> Result<(), CollectionError> {
        let len = self.sections.len();
        if a >= len {
            return Err(CollectionError::InvalidIndex(a));
        }
        if b >= len {
            return Err(CollectionError::InvalidIndex(b));
        }
        self.sections.swap(a, b);
        Ok(())
    }

    /// Adds a card at the end of the section. Returns the generated item ID.
    fn add_item(&mut self, section_id: &str, item: NewItem) -> Result<String, CollectionError> {
        if item.title.trim().is_empty() {
            return Err(CollectionError::EmptyField("title"));
        }
        if item.url.trim().is_empty() {
            return Err(CollectionError::EmptyField("url"));
        }
        let section = self.find_section_mut(section_id)?;

        let id = Uuid::new_v4().to_string();
        section.items.push(LinkItem {
            id: id.clone(),
            title: item.title,
            description: item.description,
            icon: item.icon,
            url: item.url,
        });
        Ok(id)
    }

    fn update_item(
        &mut self,
        section_id: &str,
        item_id: &str,
        item: NewItem,
    ) -> Result<(), CollectionError> {
        if item.title.trim().is_empty() {
            return Err(CollectionError::EmptyField("title"));
        }
        if item.url.trim().is_empty() {
            return Err(CollectionError::EmptyField("url"));
        }
        let section = self.find_section_mut(section_id)?;
        let existing = section
            .items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or_else(|| CollectionError::ItemNotFound(item_id.to_string()))?;

        existing.title = item.title;
        existing.description = item.description;
        existing.icon = item.icon;
        existing.url = item.url;
        Ok(())
    }

    fn remove_item(&mut self, section_id: &str, item_id: &str) -> Result<(), CollectionError> {
        let section = self.find_section_mut(section_id)?;
        let index = section
            .items
            .iter()
            .position(|i| i.id == item_id)
            .ok_or_else(|| CollectionError::ItemNotFound(item_id.to_string()))?;
        section.items.remove(index);
        Ok(())
    }

    fn swap_items(&mut self, section_id: &str, a: usize, b: usize) -> Result<(), CollectionError> {
        let section = self.find_section_mut(section_id)?;
        let len = section.items.len();
        if a >= len {
            return Err(CollectionError::InvalidIndex(a));
        }
        if b >= len {
            return Err(CollectionError::InvalidIndex(b));
        }
        section.items.swap(a, b);
        Ok(())
    }

    fn get_section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    fn sections(&self) -> &[Section] {
        &self.sections
    }
}
