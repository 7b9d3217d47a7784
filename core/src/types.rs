//! Records returned by the jservice API.
//!
//! # Design
//! Both records decode leniently: every field goes through `crate::lenient`
//! and is `#[serde(default)]`, so decoding a JSON object into either type
//! cannot fail. A missing or mistyped field reads as `0` or `""`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::lenient;

/// A trivia category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default, deserialize_with = "lenient::int")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
    /// Number of clues the API holds for this category.
    #[serde(rename = "clues", default, deserialize_with = "lenient::int")]
    pub clue_count: i64,
}

/// A single clue: question, answer and point value.
///
/// `category_id` is a back-reference only; the category it names may never
/// have been fetched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clue {
    #[serde(default, deserialize_with = "lenient::int")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::int")]
    pub category_id: i64,
    #[serde(default, deserialize_with = "lenient::int")]
    pub value: i64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub question: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub answer: String,
}

impl Category {
    pub fn from_json(value: &Value) -> Self {
        lenient::record(value)
    }
}

impl Clue {
    pub fn from_json(value: &Value) -> Self {
        lenient::record(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn category_reads_clue_count_from_clues_field() {
        let category = Category::from_json(&json!({"id": 1, "title": "Science", "clues": 5}));
        assert_eq!(
            category,
            Category {
                id: 1,
                title: "Science".to_string(),
                clue_count: 5,
            }
        );
    }

    #[test]
    fn category_serializes_with_wire_names() {
        let category = Category {
            id: 3,
            title: "Potpourri".to_string(),
            clue_count: 10,
        };
        let json = serde_json::to_value(&category).unwrap();
        assert_eq!(json, json!({"id": 3, "title": "Potpourri", "clues": 10}));
    }

    #[test]
    fn clue_tolerates_null_and_missing_fields() {
        let clue = Clue::from_json(&json!({"id": "17", "value": null, "question": "Q"}));
        assert_eq!(clue.id, 17);
        assert_eq!(clue.category_id, 0);
        assert_eq!(clue.value, 0);
        assert_eq!(clue.question, "Q");
        assert_eq!(clue.answer, "");
    }

    #[test]
    fn non_object_elements_become_zero_records() {
        assert_eq!(Clue::from_json(&json!(42)), Clue::default());
        assert_eq!(Category::from_json(&json!([1, "x", 2])), Category::default());
        assert_eq!(Category::from_json(&json!(null)), Category::default());
    }

    #[test]
    fn clue_keeps_negative_values() {
        let clue = Clue::from_json(&json!({"id": 1, "category_id": 2, "value": -2000}));
        assert_eq!(clue.value, -2000);
    }
}
