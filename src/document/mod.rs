//! The editable resume document
//!
//! A [`Document`] has two subtrees: `config` (per-section toggles and
//! headings) and `data` (per-section ordered entry lists). Keys the editor
//! does not model are preserved so documents round-trip unchanged.

mod entry;
pub mod list;
pub mod path;
mod section;

pub use entry::{EducationEntry, Entry, Identified, SkillEntry};
pub use path::FieldPath;
pub use section::{FieldSpec, Section};

use crate::error::PathError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Display settings of one section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionConfig {
    pub enable: bool,
    pub heading: String,
    /// Section-specific display options
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SectionConfig {
    pub fn for_section(section: Section) -> Self {
        Self {
            enable: true,
            heading: section.default_heading().to_string(),
            extra: Map::new(),
        }
    }
}

impl Default for SectionConfig {
    fn default() -> Self {
        Self {
            enable: true,
            heading: String::new(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    pub education: SectionConfig,
    pub skills: SectionConfig,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            education: SectionConfig::for_section(Section::Education),
            skills: SectionConfig::for_section(Section::Skills),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentData {
    pub education: Vec<EducationEntry>,
    pub skills: Vec<SkillEntry>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The full editable resume state
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    pub config: DocumentConfig,
    pub data: DocumentData,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Document {
    pub fn section_config(&self, section: Section) -> &SectionConfig {
        match section {
            Section::Education => &self.config.education,
            Section::Skills => &self.config.skills,
        }
    }

    /// Number of entries in a section
    pub fn len(&self, section: Section) -> usize {
        match section {
            Section::Education => self.data.education.len(),
            Section::Skills => self.data.skills.len(),
        }
    }

    pub fn entry(&self, section: Section, index: usize) -> Option<Entry> {
        match section {
            Section::Education => self
                .data
                .education
                .get(index)
                .cloned()
                .map(Entry::Education),
            Section::Skills => self.data.skills.get(index).cloned().map(Entry::Skill),
        }
    }

    pub fn entries(&self, section: Section) -> Vec<Entry> {
        match section {
            Section::Education => self
                .data
                .education
                .iter()
                .cloned()
                .map(Entry::Education)
                .collect(),
            Section::Skills => self.data.skills.iter().cloned().map(Entry::Skill).collect(),
        }
    }

    /// Identifiers of a section in list order
    pub fn ids(&self, section: Section) -> Vec<&str> {
        match section {
            Section::Education => self.data.education.iter().map(|e| e.id()).collect(),
            Section::Skills => self.data.skills.iter().map(|e| e.id()).collect(),
        }
    }

    pub fn position(&self, section: Section, id: &str) -> Option<usize> {
        match section {
            Section::Education => list::position(&self.data.education, id),
            Section::Skills => list::position(&self.data.skills, id),
        }
    }

    /// Read back the value stored at `path`
    #[cfg(test)]
    pub fn value_at(&self, path: &FieldPath) -> Option<Value> {
        let tree = serde_json::to_value(self).ok()?;
        path::get(&tree, path).cloned()
    }

    /// Copy of this document with `value` stored at `path`.
    /// Missing intermediate structure is created.
    pub fn with_value(&self, path: &FieldPath, value: Value) -> Result<Document, PathError> {
        path::update_typed(self, path, value)
    }

    /// Give a fresh identifier to every entry whose identifier is empty or
    /// already used earlier in its section. Returns how many were repaired.
    pub fn ensure_ids(&mut self, next_id: &mut dyn FnMut() -> String) -> usize {
        repair_ids(&mut self.data.education, |e, id| e.id = id, next_id)
            + repair_ids(&mut self.data.skills, |s, id| s.id = id, next_id)
    }
}

fn repair_ids<T: Identified>(
    list: &mut [T],
    set_id: impl Fn(&mut T, String),
    next_id: &mut dyn FnMut() -> String,
) -> usize {
    let mut seen = HashSet::new();
    let mut repaired = 0;
    for item in list.iter_mut() {
        if item.id().is_empty() || seen.contains(item.id()) {
            let mut id = next_id();
            while seen.contains(&id) {
                id = next_id();
            }
            set_id(item, id);
            repaired += 1;
        }
        seen.insert(item.id().to_string());
    }
    repaired
}
