//! Duplicate detection against records already in the store.
//!
//! Best-effort: a failing lookup is logged and treated as "no duplicates" so
//! that saving content is never blocked by this check.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::StoreError;
use crate::models::content::ContentItem;
use crate::moderation::similarity::similarity;
use crate::store::{value_as_id, Filter, Row, Store};

/// Columns fetched for each existing record.
pub const CANDIDATE_COLUMNS: &[&str] = &["id", "title", "name", "description"];
/// Descriptions must both be longer than this (in characters) to be compared.
pub const MIN_DESCRIPTION_LEN: usize = 50;
/// Description similarity above this marks a duplicate.
pub const SIMILARITY_THRESHOLD: f64 = 0.8;

/// Projection of an existing record used for comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateCandidate {
    pub id: Option<String>,
    pub title: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl DuplicateCandidate {
    pub fn from_row(row: &Row) -> Self {
        let text = |key: &str| row.get(key).and_then(|v| v.as_str()).map(str::to_string);
        Self {
            id: row.get("id").and_then(value_as_id),
            title: text("title"),
            name: text("name"),
            description: text("description"),
        }
    }

    fn title_or_name(&self) -> Option<&str> {
        self.title
            .as_deref()
            .filter(|t| !t.is_empty())
            .or(self.name.as_deref().filter(|n| !n.is_empty()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchReason {
    SameTitle,
    SimilarDescription { score: f64 },
}

/// Why `candidate` duplicates `item`, if it does. Title equality is checked
/// first; description similarity only when both descriptions are long enough.
pub fn match_reason(item: &ContentItem, candidate: &DuplicateCandidate) -> Option<MatchReason> {
    let normalise = |s: &str| s.trim().to_lowercase();

    if let (Some(new_title), Some(existing_title)) = (item.title_or_name(), candidate.title_or_name())
    {
        let new_title = normalise(new_title);
        if !new_title.is_empty() && new_title == normalise(existing_title) {
            return Some(MatchReason::SameTitle);
        }
    }

    if let (Some(new_desc), Some(existing_desc)) =
        (item.text("description"), candidate.description.as_deref())
    {
        if new_desc.chars().count() > MIN_DESCRIPTION_LEN
            && existing_desc.chars().count() > MIN_DESCRIPTION_LEN
        {
            let score = similarity(&new_desc.to_lowercase(), &existing_desc.to_lowercase());
            if score > SIMILARITY_THRESHOLD {
                return Some(MatchReason::SimilarDescription { score });
            }
        }
    }

    None
}

#[derive(Clone)]
pub struct DuplicateDetector {
    store: Arc<dyn Store>,
}

impl DuplicateDetector {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Fallible lookup. `exclude_id` drops the record being edited from the
    /// candidate set.
    pub async fn try_find_duplicates(
        &self,
        item: &ContentItem,
        table: &str,
        exclude_id: Option<&str>,
    ) -> Result<Vec<DuplicateCandidate>, StoreError> {
        let filters: Vec<Filter> = exclude_id
            .map(|id| Filter::neq("id", id))
            .into_iter()
            .collect();
        let rows = self.store.select(table, CANDIDATE_COLUMNS, &filters).await?;

        let duplicates: Vec<DuplicateCandidate> = rows
            .iter()
            .map(DuplicateCandidate::from_row)
            .filter(|candidate| match match_reason(item, candidate) {
                Some(reason) => {
                    debug!("Duplicate in {table}: {:?} ({reason:?})", candidate.id);
                    true
                }
                None => false,
            })
            .collect();

        Ok(duplicates)
    }

    /// Same as [`try_find_duplicates`](Self::try_find_duplicates), but a store
    /// failure yields an empty list.
    pub async fn find_duplicates(
        &self,
        item: &ContentItem,
        table: &str,
        exclude_id: Option<&str>,
    ) -> Vec<DuplicateCandidate> {
        match self.try_find_duplicates(item, table, exclude_id).await {
            Ok(duplicates) => duplicates,
            Err(e) => {
                warn!("Duplicate check on {table} failed, continuing without it: {e}");
                vec![]
            }
        }
    }
}
