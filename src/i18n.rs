//! Label lookup for form fields and section chrome

/// Translate a label key. Unknown keys are returned unchanged.
pub fn t(key: &str) -> &str {
    match key {
        "education.institution.label" => "Institution",
        "education.location.label" => "Location",
        "education.major.label" => "Major",
        "education.gpa.label" => "Grade / GPA",
        "skills.skill.label" => "Skill",
        "item.startDate.label" => "Start Date",
        "item.endDate.label" => "End Date",
        "item.description.label" => "Description",
        "item.add" => "Add",
        "item.enable" => "Show in resume",
        "section.heading.label" => "Heading",
        "section.enable.label" => "Show section",
        "section.add.title" => "Add",
        other => other,
    }
}
