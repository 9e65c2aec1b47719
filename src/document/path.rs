//! Typed field paths into the document tree
//!
//! A [`FieldPath`] is a sequence of object keys and array indices. Paths are
//! normally built from typed constructors (`FieldPath::entry(section, 2).key("major")`)
//! but also parse from and display as the dotted form `data.education[2].major`.
//!
//! Writes are upserts: missing intermediate objects and arrays are created.

use super::Section;
use crate::error::PathError;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// One step of a field path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => write!(f, "{key}"),
            Segment::Index(index) => write!(f, "[{index}]"),
        }
    }
}

/// Locator of a single value inside a document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    /// The empty path, addressing the whole tree
    pub fn root() -> Self {
        Self::default()
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.segments.push(Segment::Key(key.into()));
        self
    }

    pub fn index(mut self, index: usize) -> Self {
        self.segments.push(Segment::Index(index));
        self
    }

    /// `config.<section>`
    pub fn config(section: Section) -> Self {
        Self::root().key("config").key(section.key())
    }

    /// `data.<section>`
    pub fn data(section: Section) -> Self {
        Self::root().key("data").key(section.key())
    }

    /// `data.<section>[index]`
    pub fn entry(section: Section, index: usize) -> Self {
        Self::data(section).index(index)
    }

    /// Append `other` to this path
    pub fn join(&self, other: &FieldPath) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    fn prefix(&self, len: usize) -> FieldPath {
        FieldPath {
            segments: self.segments[..len].to_vec(),
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(key) if position > 0 => write!(f, ".{key}")?,
                other => write!(f, "{other}")?,
            }
        }
        Ok(())
    }
}

impl FromStr for FieldPath {
    type Err = PathError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let err = |reason: &str| PathError::Parse {
            path: input.to_string(),
            reason: reason.to_string(),
        };

        let mut segments = Vec::new();
        let mut key = String::new();
        let mut chars = input.chars();
        // Set at the start and after `.`: a key has to follow
        let mut expect_key = true;
        // Set after `]`: only `.` or `[` may follow
        let mut after_index = false;

        while let Some(c) = chars.next() {
            match c {
                '.' => {
                    if !key.is_empty() {
                        segments.push(Segment::Key(std::mem::take(&mut key)));
                    } else if !after_index {
                        return Err(err("empty key"));
                    }
                    expect_key = true;
                    after_index = false;
                }
                '[' => {
                    if !key.is_empty() {
                        segments.push(Segment::Key(std::mem::take(&mut key)));
                    } else if expect_key && !segments.is_empty() {
                        return Err(err("empty key"));
                    }
                    let mut digits = String::new();
                    let mut closed = false;
                    for d in chars.by_ref() {
                        if d == ']' {
                            closed = true;
                            break;
                        }
                        digits.push(d);
                    }
                    if !closed {
                        return Err(err("unclosed `[`"));
                    }
                    let index = digits
                        .trim()
                        .parse::<usize>()
                        .map_err(|_| err("index must be a non-negative integer"))?;
                    segments.push(Segment::Index(index));
                    expect_key = false;
                    after_index = true;
                }
                ']' => return Err(err("unexpected `]`")),
                c => {
                    if after_index {
                        return Err(err("expected `.` or `[` after `]`"));
                    }
                    key.push(c);
                    expect_key = false;
                }
            }
        }

        if !key.is_empty() {
            segments.push(Segment::Key(key));
        } else if expect_key && !input.is_empty() {
            return Err(err("empty key"));
        }

        Ok(Self { segments })
    }
}

/// Read the value at `path`, if every segment exists
#[cfg(test)]
pub fn get<'a>(tree: &'a Value, path: &FieldPath) -> Option<&'a Value> {
    path.segments.iter().try_fold(tree, |node, segment| match segment {
        Segment::Key(key) => node.as_object()?.get(key),
        Segment::Index(index) => node.as_array()?.get(*index),
    })
}

/// Store `value` at `path` inside a tree the caller owns
pub fn write(tree: &mut Value, path: &FieldPath, value: Value) -> Result<(), PathError> {
    let fill = fill_for(None, &value);
    let mut node = tree;
    for (position, segment) in path.segments.iter().enumerate() {
        let next_fill = match path.segments.get(position + 1) {
            Some(next) => fill_for(Some(next), &value),
            None => fill.clone(),
        };
        node = descend(node, segment, next_fill, path, position)?;
    }
    *node = value;
    Ok(())
}

/// Serialize `value`, write `new_value` at `path`, and read it back as `T`
pub fn update_typed<T>(value: &T, path: &FieldPath, new_value: Value) -> Result<T, PathError>
where
    T: Serialize + DeserializeOwned,
{
    let mut tree = serde_json::to_value(value).map_err(PathError::Serialize)?;
    write(&mut tree, path, new_value)?;
    serde_json::from_value(tree).map_err(|source| PathError::Schema {
        path: path.to_string(),
        source,
    })
}

fn descend<'a>(
    node: &'a mut Value,
    segment: &Segment,
    fill: Value,
    path: &FieldPath,
    position: usize,
) -> Result<&'a mut Value, PathError> {
    match segment {
        Segment::Key(key) => {
            if node.is_null() {
                *node = Value::Object(Map::new());
            }
            match node {
                Value::Object(map) => Ok(map.entry(key.clone()).or_insert(fill)),
                other => Err(not_a_container(path, position, segment, other)),
            }
        }
        Segment::Index(index) => {
            if node.is_null() {
                *node = Value::Array(Vec::new());
            }
            match node {
                Value::Array(items) => {
                    while items.len() <= *index {
                        items.push(fill.clone());
                    }
                    Ok(&mut items[*index])
                }
                other => Err(not_a_container(path, position, segment, other)),
            }
        }
    }
}

/// Shape of a value created to fill a gap: implied by the next segment,
/// or by the written value itself at the end of the path
fn fill_for(next: Option<&Segment>, value: &Value) -> Value {
    match next {
        Some(Segment::Key(_)) => Value::Object(Map::new()),
        Some(Segment::Index(_)) => Value::Array(Vec::new()),
        None => match value {
            Value::Object(_) => Value::Object(Map::new()),
            Value::Array(_) => Value::Array(Vec::new()),
            _ => Value::Null,
        },
    }
}

fn not_a_container(path: &FieldPath, position: usize, segment: &Segment, found: &Value) -> PathError {
    PathError::NotAContainer {
        path: path.prefix(position).to_string(),
        segment: segment.to_string(),
        found: type_name(found),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(input: &str) -> FieldPath {
        input.parse().unwrap()
    }

    mod parsing {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_parse_dotted_and_indexed() {
            let path = parse("data.education[2].major");
            assert_eq!(
                path.segments(),
                &[
                    Segment::Key("data".to_string()),
                    Segment::Key("education".to_string()),
                    Segment::Index(2),
                    Segment::Key("major".to_string()),
                ]
            );
        }

        #[test]
        fn test_parse_matches_typed_constructor() {
            assert_eq!(
                parse("data.education[2].major"),
                FieldPath::entry(Section::Education, 2).key("major")
            );
            assert_eq!(
                parse("config.skills.enable"),
                FieldPath::config(Section::Skills).key("enable")
            );
        }

        #[test]
        fn test_parse_nested_indices() {
            let path = parse("grid[1][3]");
            assert_eq!(
                path.segments(),
                &[
                    Segment::Key("grid".to_string()),
                    Segment::Index(1),
                    Segment::Index(3),
                ]
            );
        }

        #[test]
        fn test_parse_leading_index() {
            let path = parse("[0].skill");
            assert_eq!(
                path.segments(),
                &[Segment::Index(0), Segment::Key("skill".to_string())]
            );
        }

        #[test]
        fn test_empty_string_is_root() {
            assert!(parse("").segments().is_empty());
        }

        #[test]
        fn test_display_round_trip() {
            for input in ["data.education[2].major", "config.skills.heading", "[0].a[1]"] {
                assert_eq!(parse(input).to_string(), input);
            }
        }

        #[test]
        fn test_rejects_malformed_paths() {
            for input in [".", "a.", "a..b", "a.[0]", "a[", "a[x]", "a[-1]", "a[]", "a]", "a[0]b"] {
                let result = input.parse::<FieldPath>();
                assert!(
                    matches!(result, Err(PathError::Parse { .. })),
                    "expected parse error for {input:?}"
                );
            }
        }

        #[test]
        fn test_join_appends_segments() {
            let prefix = FieldPath::entry(Section::Skills, 1);
            let relative = FieldPath::root().key("skill");
            assert_eq!(prefix.join(&relative).to_string(), "data.skills[1].skill");
        }
    }

    mod reading_and_writing {
        use super::*;
        use pretty_assertions::assert_eq;

        fn set(tree: &Value, path: &FieldPath, value: Value) -> Result<Value, PathError> {
            let mut updated = tree.clone();
            write(&mut updated, path, value)?;
            Ok(updated)
        }

        #[test]
        fn test_set_then_get_returns_value() {
            let tree = json!({"data": {"education": [{"major": "Art"}]}});
            let path = parse("data.education[0].major");
            let updated = set(&tree, &path, json!("Physics")).unwrap();
            assert_eq!(get(&updated, &path), Some(&json!("Physics")));
        }

        #[test]
        fn test_set_leaves_original_untouched() {
            let tree = json!({"config": {"skills": {"enable": true}}});
            let updated = set(&tree, &parse("config.skills.enable"), json!(false)).unwrap();
            assert_eq!(tree, json!({"config": {"skills": {"enable": true}}}));
            assert_eq!(updated, json!({"config": {"skills": {"enable": false}}}));
        }

        #[test]
        fn test_set_preserves_siblings() {
            let tree = json!({
                "config": {"skills": {"enable": true, "heading": "Skills"}},
                "data": {"skills": [{"id": "a", "skill": "Go"}]}
            });
            let updated = set(&tree, &parse("config.skills.heading"), json!("Abilities")).unwrap();
            assert_eq!(
                updated,
                json!({
                    "config": {"skills": {"enable": true, "heading": "Abilities"}},
                    "data": {"skills": [{"id": "a", "skill": "Go"}]}
                })
            );
        }

        #[test]
        fn test_upsert_creates_objects_and_arrays() {
            let tree = json!({});
            let updated = set(&tree, &parse("data.awards[1].title"), json!("Best")).unwrap();
            assert_eq!(
                updated,
                json!({"data": {"awards": [{}, {"title": "Best"}]}})
            );
        }

        #[test]
        fn test_upsert_pads_with_shape_of_written_value() {
            let tree = json!({"list": []});
            let updated = set(&tree, &parse("list[2]"), json!({"id": "x"})).unwrap();
            assert_eq!(updated, json!({"list": [{}, {}, {"id": "x"}]}));

            let updated = set(&tree, &parse("list[1]"), json!(3)).unwrap();
            assert_eq!(updated, json!({"list": [null, 3]}));
        }

        #[test]
        fn test_upsert_replaces_null_intermediate() {
            let tree = json!({"config": null});
            let updated = set(&tree, &parse("config.skills.enable"), json!(true)).unwrap();
            assert_eq!(updated, json!({"config": {"skills": {"enable": true}}}));
        }

        #[test]
        fn test_descending_into_scalar_fails() {
            let tree = json!({"config": {"skills": {"heading": "Skills"}}});
            let result = set(&tree, &parse("config.skills.heading.text"), json!("x"));
            match result {
                Err(PathError::NotAContainer { path, segment, found }) => {
                    assert_eq!(path, "config.skills.heading");
                    assert_eq!(segment, "text");
                    assert_eq!(found, "string");
                }
                other => panic!("unexpected result: {other:?}"),
            }
        }

        #[test]
        fn test_index_into_object_fails() {
            let tree = json!({"data": {"skills": {}}});
            let result = set(&tree, &parse("data.skills[0]"), json!({}));
            assert!(matches!(result, Err(PathError::NotAContainer { found: "object", .. })));
        }

        #[test]
        fn test_root_path_replaces_tree() {
            let tree = json!({"a": 1});
            let updated = set(&tree, &FieldPath::root(), json!({"b": 2})).unwrap();
            assert_eq!(updated, json!({"b": 2}));
        }

        #[test]
        fn test_get_missing_returns_none() {
            let tree = json!({"data": {"skills": []}});
            assert_eq!(get(&tree, &parse("data.skills[0]")), None);
            assert_eq!(get(&tree, &parse("data.education")), None);
            assert_eq!(get(&tree, &parse("data.skills.length")), None);
        }
    }

    mod typed_updates {
        use super::*;
        use pretty_assertions::assert_eq;
        use serde::Deserialize;

        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        struct Item {
            name: String,
            count: u32,
        }

        #[test]
        fn test_update_typed_writes_field() {
            let item = Item {
                name: "a".to_string(),
                count: 1,
            };
            let updated = update_typed(&item, &parse("count"), json!(5)).unwrap();
            assert_eq!(updated.count, 5);
            assert_eq!(item.count, 1);
        }

        #[test]
        fn test_update_typed_rejects_schema_mismatch() {
            let item = Item {
                name: "a".to_string(),
                count: 1,
            };
            let result = update_typed(&item, &parse("count"), json!("many"));
            assert!(matches!(result, Err(PathError::Schema { ref path, .. }) if path == "count"));
        }
    }
}
