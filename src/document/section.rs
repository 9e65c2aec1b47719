//! Resume sections and their entry schemas

/// A named category of entries, each with its own config and data list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Section {
    #[default]
    Education,
    Skills,
}

/// Describes one editable field of an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// JSON key of the field inside the entry
    pub name: &'static str,
    /// Translation key of the field label
    pub label_key: &'static str,
    pub placeholder: &'static str,
    pub is_multiline: bool,
    /// Submit of the add-item form is ignored while this field is empty
    pub is_required: bool,
}

impl FieldSpec {
    /// The section heading in `config`, edited like an entry field
    pub const HEADING: FieldSpec = FieldSpec {
        name: "heading",
        label_key: "section.heading.label",
        placeholder: "",
        is_multiline: false,
        is_required: false,
    };
}

const EDUCATION_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "institution",
        label_key: "education.institution.label",
        placeholder: "Harvard University",
        is_multiline: false,
        is_required: true,
    },
    FieldSpec {
        name: "location",
        label_key: "education.location.label",
        placeholder: "NYC, NY",
        is_multiline: false,
        is_required: false,
    },
    FieldSpec {
        name: "major",
        label_key: "education.major.label",
        placeholder: "Masters in Computer Science",
        is_multiline: false,
        is_required: true,
    },
    FieldSpec {
        name: "gpa",
        label_key: "education.gpa.label",
        placeholder: "4.0 GPA",
        is_multiline: false,
        is_required: false,
    },
    FieldSpec {
        name: "startDate",
        label_key: "item.startDate.label",
        placeholder: "March 2018",
        is_multiline: false,
        is_required: false,
    },
    FieldSpec {
        name: "endDate",
        label_key: "item.endDate.label",
        placeholder: "June 2022",
        is_multiline: false,
        is_required: false,
    },
    FieldSpec {
        name: "description",
        label_key: "item.description.label",
        placeholder: "",
        is_multiline: true,
        is_required: false,
    },
];

const SKILL_FIELDS: &[FieldSpec] = &[FieldSpec {
    name: "skill",
    label_key: "skills.skill.label",
    placeholder: "Team Building & Training",
    is_multiline: false,
    is_required: true,
}];

impl Section {
    pub const ALL: [Section; 2] = [Section::Education, Section::Skills];

    /// Key of the section inside `config` and `data`
    pub fn key(self) -> &'static str {
        match self {
            Self::Education => "education",
            Self::Skills => "skills",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.key() == key)
    }

    /// Heading used when the document does not provide one
    pub fn default_heading(self) -> &'static str {
        match self {
            Self::Education => "Education",
            Self::Skills => "Skills",
        }
    }

    pub fn fields(self) -> &'static [FieldSpec] {
        match self {
            Self::Education => EDUCATION_FIELDS,
            Self::Skills => SKILL_FIELDS,
        }
    }

    pub fn field(self, index: usize) -> Option<&'static FieldSpec> {
        self.fields().get(index)
    }

    /// Single-field entries are edited inline on their list row
    pub fn is_single_field(self) -> bool {
        self.fields().len() == 1
    }

    /// Whether the add-item form stays open after a successful submit.
    /// Skills are typically entered in quick succession.
    pub fn keeps_form_open_after_add(self) -> bool {
        match self {
            Self::Education => false,
            Self::Skills => true,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::Education => 0,
            Self::Skills => 1,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_round_trip() {
        for section in Section::ALL {
            assert_eq!(Section::from_key(section.key()), Some(section));
        }
        assert_eq!(Section::from_key("awards"), None);
    }

    #[test]
    fn test_index_round_trip() {
        for section in Section::ALL {
            assert_eq!(Section::from_index(section.index()), Some(section));
        }
        assert_eq!(Section::from_index(2), None);
    }

    #[test]
    fn test_education_required_fields() {
        let required: Vec<_> = Section::Education
            .fields()
            .iter()
            .filter(|f| f.is_required)
            .map(|f| f.name)
            .collect();
        assert_eq!(required, vec!["institution", "major"]);
    }

    #[test]
    fn test_only_description_is_multiline() {
        let multiline: Vec<_> = Section::Education
            .fields()
            .iter()
            .filter(|f| f.is_multiline)
            .map(|f| f.name)
            .collect();
        assert_eq!(multiline, vec!["description"]);
    }

    #[test]
    fn test_skills_are_single_field() {
        assert!(Section::Skills.is_single_field());
        assert!(!Section::Education.is_single_field());
    }

    #[test]
    fn test_post_submit_policy() {
        assert!(Section::Skills.keeps_form_open_after_add());
        assert!(!Section::Education.keeps_form_open_after_add());
    }
}
