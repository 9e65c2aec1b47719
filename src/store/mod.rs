//! Document store: owner of the resume document
//!
//! Every mutation goes through [`DocumentStore::dispatch`], one action at a
//! time. Each action is applied atomically and bumps the revision when it
//! actually changed the document.

mod storage;

pub use storage::{DocumentStorage, JsonFileStorage};

#[cfg(test)]
pub use storage::MockDocumentStorage;

use crate::document::{
    list, Document, EducationEntry, Entry, FieldPath, Identified, Section, SkillEntry,
};
use crate::error::StoreError;
use serde_json::Value;

/// Source of identifiers for new entries
pub trait IdGenerator: Send {
    fn next_id(&mut self) -> String;
}

/// Random v4 UUIDs
#[derive(Debug, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Predictable identifiers (`<prefix>-1`, `<prefix>-2`, ...)
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

#[cfg(test)]
impl SequentialIds {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            next: 1,
        }
    }
}

#[cfg(test)]
impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

/// A mutation intent
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Write one value at a path (live field edit)
    SetField { path: FieldPath, value: Value },
    /// Append an entry to its section
    AddItem { entry: Entry },
    DeleteItem { section: Section, id: String },
    MoveItemUp { section: Section, id: String },
    MoveItemDown { section: Section, id: String },
    /// Swap in a whole document (reload)
    Replace(Document),
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::SetField { .. } => "set_field",
            Action::AddItem { .. } => "add_item",
            Action::DeleteItem { .. } => "delete_item",
            Action::MoveItemUp { .. } => "move_item_up",
            Action::MoveItemDown { .. } => "move_item_down",
            Action::Replace(_) => "replace",
        }
    }
}

/// Single owner of the document
pub struct DocumentStore {
    document: Document,
    revision: u64,
    ids: Box<dyn IdGenerator>,
}

impl DocumentStore {
    pub fn new(document: Document, ids: Box<dyn IdGenerator>) -> Self {
        let mut store = Self {
            document,
            revision: 0,
            ids,
        };
        store.repair_ids();
        store
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Number of applied mutations
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// A fresh identifier for a new entry or draft
    pub fn fresh_id(&mut self) -> String {
        self.ids.next_id()
    }

    pub fn contains(&self, section: Section, id: &str) -> bool {
        self.document.position(section, id).is_some()
    }

    /// Apply one action. Returns whether the document changed.
    pub fn dispatch(&mut self, action: Action) -> Result<bool, StoreError> {
        let name = action.name();
        let next = match action {
            Action::SetField { path, value } => {
                let mut next = self.document.with_value(&path, value)?;
                let repaired = next.ensure_ids(&mut || self.ids.next_id());
                if repaired > 0 {
                    tracing::warn!("Assigned {repaired} missing identifier(s) after writing {path}");
                }
                next
            }
            Action::AddItem { entry } => self.with_added(entry),
            Action::DeleteItem { section, id } => {
                self.with_list(section, |l| list::delete_item(l, &id), |l| list::delete_item(l, &id))
            }
            Action::MoveItemUp { section, id } => {
                self.with_list(section, |l| list::move_item_up(l, &id), |l| list::move_item_up(l, &id))
            }
            Action::MoveItemDown { section, id } => self.with_list(
                section,
                |l| list::move_item_down(l, &id),
                |l| list::move_item_down(l, &id),
            ),
            Action::Replace(document) => document,
        };

        if next == self.document {
            tracing::debug!("Action {name} left the document unchanged");
            return Ok(false);
        }

        self.document = next;
        self.repair_ids();
        self.revision += 1;
        tracing::debug!("Applied {name}, revision {}", self.revision);
        Ok(true)
    }

    fn with_added(&mut self, mut entry: Entry) -> Document {
        let section = entry.section();
        if entry.id().is_empty() || self.contains(section, entry.id()) {
            let id = self.ids.next_id();
            tracing::warn!(
                "Entry id {:?} is not unique in {}, using {id}",
                entry.id(),
                section.key()
            );
            entry.set_id(id);
        }
        let mut next = self.document.clone();
        match entry {
            Entry::Education(e) => next.data.education = list::add_item(&next.data.education, e),
            Entry::Skill(s) => next.data.skills = list::add_item(&next.data.skills, s),
        }
        next
    }

    fn with_list(
        &self,
        section: Section,
        education: impl FnOnce(&[EducationEntry]) -> Vec<EducationEntry>,
        skills: impl FnOnce(&[SkillEntry]) -> Vec<SkillEntry>,
    ) -> Document {
        let mut next = self.document.clone();
        match section {
            Section::Education => next.data.education = education(&self.document.data.education),
            Section::Skills => next.data.skills = skills(&self.document.data.skills),
        }
        next
    }

    fn repair_ids(&mut self) {
        let ids = &mut self.ids;
        let repaired = self.document.ensure_ids(&mut || ids.next_id());
        if repaired > 0 {
            tracing::warn!("Assigned {repaired} missing or duplicate identifier(s)");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn skill(id: &str, text: &str) -> Entry {
        Entry::Skill(SkillEntry {
            id: id.to_string(),
            skill: text.to_string(),
            ..Default::default()
        })
    }

    fn store_with_skills(skills: &[(&str, &str)]) -> DocumentStore {
        let mut document = Document::default();
        document.data.skills = skills
            .iter()
            .map(|(id, text)| SkillEntry {
                id: id.to_string(),
                skill: text.to_string(),
                ..Default::default()
            })
            .collect();
        DocumentStore::new(document, Box::new(SequentialIds::new("id")))
    }

    fn skill_texts(store: &DocumentStore) -> Vec<(String, String)> {
        store
            .document()
            .data
            .skills
            .iter()
            .map(|s| (s.id.clone(), s.skill.clone()))
            .collect()
    }

    mod identifiers {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_sequential_ids() {
            let mut ids = SequentialIds::new("x");
            assert_eq!(ids.next_id(), "x-1");
            assert_eq!(ids.next_id(), "x-2");
        }

        #[test]
        fn test_uuid_ids_are_unique() {
            let mut ids = UuidIds;
            assert_ne!(ids.next_id(), ids.next_id());
        }

        #[test]
        fn test_new_repairs_loaded_ids() {
            let store = store_with_skills(&[("", "Go"), ("", "Rust")]);
            assert_eq!(store.document().ids(Section::Skills), vec!["id-1", "id-2"]);
        }
    }

    mod dispatch {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_scenario_move_down_then_delete() {
            let mut store = store_with_skills(&[("a", "Go"), ("b", "Rust")]);

            store
                .dispatch(Action::MoveItemDown {
                    section: Section::Skills,
                    id: "a".to_string(),
                })
                .unwrap();
            assert_eq!(store.document().ids(Section::Skills), vec!["b", "a"]);

            store
                .dispatch(Action::DeleteItem {
                    section: Section::Skills,
                    id: "b".to_string(),
                })
                .unwrap();
            assert_eq!(
                skill_texts(&store),
                vec![("a".to_string(), "Go".to_string())]
            );
        }

        #[test]
        fn test_add_appends_and_bumps_revision() {
            let mut store = store_with_skills(&[("a", "Go")]);
            let changed = store.dispatch(Action::AddItem { entry: skill("b", "Rust") }).unwrap();
            assert!(changed);
            assert_eq!(store.revision(), 1);
            assert_eq!(store.document().ids(Section::Skills), vec!["a", "b"]);
        }

        #[test]
        fn test_add_with_taken_id_gets_fresh_one() {
            let mut store = store_with_skills(&[("a", "Go")]);
            store.dispatch(Action::AddItem { entry: skill("a", "Rust") }).unwrap();
            assert_eq!(store.document().ids(Section::Skills), vec!["a", "id-1"]);
        }

        #[test]
        fn test_edge_moves_do_not_change_revision() {
            let mut store = store_with_skills(&[("a", "Go"), ("b", "Rust")]);
            let up = store
                .dispatch(Action::MoveItemUp {
                    section: Section::Skills,
                    id: "a".to_string(),
                })
                .unwrap();
            let down = store
                .dispatch(Action::MoveItemDown {
                    section: Section::Skills,
                    id: "b".to_string(),
                })
                .unwrap();
            assert!(!up);
            assert!(!down);
            assert_eq!(store.revision(), 0);
            assert_eq!(store.document().ids(Section::Skills), vec!["a", "b"]);
        }

        #[test]
        fn test_delete_unknown_is_noop() {
            let mut store = store_with_skills(&[("a", "Go")]);
            let changed = store
                .dispatch(Action::DeleteItem {
                    section: Section::Skills,
                    id: "zzz".to_string(),
                })
                .unwrap();
            assert!(!changed);
            assert_eq!(store.document().len(Section::Skills), 1);
        }

        #[test]
        fn test_set_field_writes_through_path() {
            let mut store = store_with_skills(&[("a", "Go")]);
            let path = FieldPath::entry(Section::Skills, 0).key("skill");
            store
                .dispatch(Action::SetField {
                    path,
                    value: json!("Golang"),
                })
                .unwrap();
            assert_eq!(store.document().data.skills[0].skill, "Golang");
            assert_eq!(store.document().data.skills[0].id, "a");
        }

        #[test]
        fn test_set_field_upsert_gets_identifier() {
            let mut store = store_with_skills(&[("a", "Go")]);
            let path = FieldPath::entry(Section::Skills, 1).key("skill");
            store
                .dispatch(Action::SetField {
                    path,
                    value: json!("Rust"),
                })
                .unwrap();
            assert_eq!(store.document().ids(Section::Skills), vec!["a", "id-1"]);
        }

        #[test]
        fn test_set_field_schema_error_leaves_document() {
            let mut store = store_with_skills(&[("a", "Go")]);
            let before = store.document().clone();
            let result = store.dispatch(Action::SetField {
                path: FieldPath::config(Section::Skills).key("enable"),
                value: json!([1, 2]),
            });
            assert!(matches!(result, Err(StoreError::Path(_))));
            assert_eq!(store.document(), &before);
            assert_eq!(store.revision(), 0);
        }

        #[test]
        fn test_replace_swaps_document() {
            let mut store = store_with_skills(&[("a", "Go")]);
            assert!(store.dispatch(Action::Replace(Document::default())).unwrap());
            assert_eq!(store.document().len(Section::Skills), 0);
        }

        #[test]
        fn test_same_value_is_not_a_change() {
            let mut store = store_with_skills(&[("a", "Go")]);
            let changed = store
                .dispatch(Action::SetField {
                    path: FieldPath::entry(Section::Skills, 0).key("skill"),
                    value: json!("Go"),
                })
                .unwrap();
            assert!(!changed);
        }
    }
}
