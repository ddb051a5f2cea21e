//! Field validation against the static per-table schema.
//!
//! Checks run in a fixed order and errors are reported in that order:
//! required fields (schema order), email format, website URL, then length
//! limits (fixed field order).

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::models::content::ContentItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSchema {
    pub required: &'static [&'static str],
    pub optional: &'static [&'static str],
}

const EMPTY_SCHEMA: TableSchema = TableSchema {
    required: &[],
    optional: &[],
};

const SCHEMAS: &[(&str, TableSchema)] = &[
    (
        "project_of",
        TableSchema {
            required: &["title", "description"],
            optional: &["technologies", "github_url", "live_url", "image_url"],
        },
    ),
    (
        "organizations",
        TableSchema {
            required: &["name", "description"],
            optional: &["website", "email", "location", "logo_url"],
        },
    ),
    (
        "profiles",
        TableSchema {
            required: &["name", "email"],
            optional: &["bio", "website", "skills", "location", "avatar_url"],
        },
    ),
    (
        "creative_skills",
        TableSchema {
            required: &["name"],
            optional: &["description", "category", "level"],
        },
    ),
    (
        "interview_questions",
        TableSchema {
            required: &["question"],
            optional: &["answer", "category", "difficulty"],
        },
    ),
    (
        "feedback",
        TableSchema {
            required: &["message"],
            optional: &["name", "email", "rating"],
        },
    ),
    (
        "user_activities",
        TableSchema {
            required: &["user_id", "activity_type"],
            optional: &["details"],
        },
    ),
    (
        "user_selection",
        TableSchema {
            required: &["user_id", "selection"],
            optional: &["details"],
        },
    ),
];

/// Maximum lengths in characters, checked in this order.
const MAX_LENGTHS: &[(&str, usize)] = &[
    ("title", 200),
    ("name", 100),
    ("description", 5000),
    ("bio", 1000),
    ("message", 2000),
];

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.\S+$").expect("valid email regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

/// Schema for `table`. Unknown tables get an empty schema, not an error.
pub fn schema_for(table: &str) -> TableSchema {
    SCHEMAS
        .iter()
        .find(|(name, _)| *name == table)
        .map(|(_, schema)| *schema)
        .unwrap_or(EMPTY_SCHEMA)
}

pub fn validate(item: &ContentItem, table: &str) -> ValidationResult {
    let mut errors = Vec::new();

    for &field in schema_for(table).required {
        let present = item.get(field).map(|v| !v.trim().is_empty()).unwrap_or(false);
        if !present {
            errors.push(format!("Missing required field: {field}"));
        }
    }

    if let Some(email) = item.text("email") {
        if !EMAIL.is_match(email) {
            errors.push("Invalid email format".to_string());
        }
    }

    if let Some(website) = item.text("website") {
        if Url::parse(website).is_err() {
            errors.push("Invalid website URL".to_string());
        }
    }

    for &(field, max) in MAX_LENGTHS {
        if let Some(value) = item.get(field) {
            if value.chars().count() > max {
                errors.push(format!("Field {field} exceeds maximum length of {max} characters"));
            }
        }
    }

    ValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}
