//! Resume entries

use super::path::{self, FieldPath};
use super::Section;
use crate::error::PathError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Anything carrying a client-generated identifier
pub trait Identified {
    fn id(&self) -> &str;
}

/// One education record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationEntry {
    pub id: String,
    pub enable: bool,
    pub institution: String,
    pub location: String,
    pub major: String,
    pub start_date: String,
    pub end_date: String,
    pub gpa: String,
    pub description: String,
    /// Keys this editor does not know about, kept as loaded
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for EducationEntry {
    fn default() -> Self {
        Self {
            id: String::new(),
            enable: true,
            institution: String::new(),
            location: String::new(),
            major: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            gpa: String::new(),
            description: String::new(),
            extra: Map::new(),
        }
    }
}

/// One skill, a single free-text field
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillEntry {
    pub id: String,
    pub skill: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Identified for EducationEntry {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for SkillEntry {
    fn id(&self) -> &str {
        &self.id
    }
}

/// An entry of any section
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Education(EducationEntry),
    Skill(SkillEntry),
}

impl Entry {
    /// A blank entry for `section` carrying the given identifier
    pub fn blank(section: Section, id: String) -> Self {
        match section {
            Section::Education => Entry::Education(EducationEntry {
                id,
                ..Default::default()
            }),
            Section::Skills => Entry::Skill(SkillEntry {
                id,
                ..Default::default()
            }),
        }
    }

    pub fn section(&self) -> Section {
        match self {
            Entry::Education(_) => Section::Education,
            Entry::Skill(_) => Section::Skills,
        }
    }

    pub fn set_id(&mut self, id: String) {
        match self {
            Entry::Education(e) => e.id = id,
            Entry::Skill(s) => s.id = id,
        }
    }

    /// Text of the field named by its JSON key, empty for unknown names
    pub fn text(&self, name: &str) -> &str {
        match self {
            Entry::Education(e) => education_text(e, name),
            Entry::Skill(s) => match name {
                "skill" => &s.skill,
                _ => "",
            },
        }
    }

    /// Label shown when the entry is collapsed
    pub fn summary(&self) -> &str {
        match self {
            Entry::Education(e) => &e.institution,
            Entry::Skill(s) => &s.skill,
        }
    }

    /// Whether every required field of the section is filled in
    pub fn is_complete(&self) -> bool {
        self.missing_required().is_empty()
    }

    pub fn missing_required(&self) -> Vec<&'static str> {
        self.section()
            .fields()
            .iter()
            .filter(|f| f.is_required && self.text(f.name).is_empty())
            .map(|f| f.name)
            .collect()
    }

    /// Copy of this entry with `value` written at `path` (relative to the entry)
    pub fn with_value(&self, path: &FieldPath, value: Value) -> Result<Entry, PathError> {
        Ok(match self {
            Entry::Education(e) => Entry::Education(path::update_typed(e, path, value)?),
            Entry::Skill(s) => Entry::Skill(path::update_typed(s, path, value)?),
        })
    }

    /// Plain-text rendering used for clipboard copies
    pub fn to_plain_text(&self) -> String {
        match self {
            Entry::Skill(s) => s.skill.clone(),
            Entry::Education(e) => {
                let mut lines = vec![e.institution.clone()];
                let degree = [e.major.as_str(), e.gpa.as_str()]
                    .into_iter()
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
                    .join(", ");
                if !degree.is_empty() {
                    lines.push(degree);
                }
                let period = match (e.start_date.is_empty(), e.end_date.is_empty()) {
                    (false, false) => format!("{} - {}", e.start_date, e.end_date),
                    (false, true) => e.start_date.clone(),
                    (true, false) => e.end_date.clone(),
                    (true, true) => String::new(),
                };
                if !period.is_empty() {
                    lines.push(period);
                }
                if !e.location.is_empty() {
                    lines.push(e.location.clone());
                }
                if !e.description.is_empty() {
                    lines.push(e.description.clone());
                }
                lines.join("\n")
            }
        }
    }
}

impl Identified for Entry {
    fn id(&self) -> &str {
        match self {
            Entry::Education(e) => &e.id,
            Entry::Skill(s) => &s.id,
        }
    }
}

fn education_text<'a>(entry: &'a EducationEntry, name: &str) -> &'a str {
    match name {
        "institution" => &entry.institution,
        "location" => &entry.location,
        "major" => &entry.major,
        "startDate" => &entry.start_date,
        "endDate" => &entry.end_date,
        "gpa" => &entry.gpa,
        "description" => &entry.description,
        _ => "",
    }
}
