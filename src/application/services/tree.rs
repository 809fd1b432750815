//! Question-tree service
//!
//! Loads raw documents from a content store and turns them into trees.
//! Every failure on the way surfaces as `ApplicationError::NotFound`.

use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt, NotFoundCause};
use crate::domain::{TransformReport, TreeDocument, TreeTransformer};
use crate::infrastructure::traits::ContentStore;

/// Shape statistics of one transformed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeSummary {
    pub node_count: usize,
    pub depth: usize,
    pub report: TransformReport,
}

/// Result of checking one stored document.
#[derive(Debug)]
pub struct CheckOutcome {
    pub id: String,
    pub result: ApplicationResult<TreeSummary>,
}

impl CheckOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Service for loading hierarchical question trees.
pub struct TreeService {
    store: Arc<dyn ContentStore>,
    transformer: TreeTransformer,
}

impl TreeService {
    /// Create a new tree service.
    pub fn new(store: Arc<dyn ContentStore>, transformer: TreeTransformer) -> Self {
        Self { store, transformer }
    }

    /// Load and transform the document stored under `id`.
    pub fn load_tree(&self, id: &str) -> ApplicationResult<TreeDocument> {
        self.load_tree_with_report(id).map(|(document, _)| document)
    }

    /// Like `load_tree`, also returning what was dropped during the transform.
    pub fn load_tree_with_report(
        &self,
        id: &str,
    ) -> ApplicationResult<(TreeDocument, TransformReport)> {
        debug!("load_tree: id={}", id);

        let value = match self.store.load(id) {
            Ok(Some(value)) => value,
            Ok(None) => {
                info!("load_tree: {}: nothing stored", id);
                return Err(ApplicationError::not_found(id, NotFoundCause::Missing));
            }
            Err(e) => {
                info!("load_tree: {}: unreadable: {}", id, e);
                return Err(ApplicationError::not_found(id, NotFoundCause::Unreadable(e)));
            }
        };

        let (document, report) = self.transformer.transform_with_report(&value).map_err(|e| {
            info!("load_tree: {}: {}", id, e);
            ApplicationError::not_found(id, NotFoundCause::Untransformable(e))
        })?;

        debug!(
            "load_tree: {}: {} nodes, {} dropped",
            id,
            document.root.node_count(),
            report.dropped.len()
        );
        Ok((document, report))
    }

    /// All ids available in the content store.
    pub fn list_ids(&self) -> ApplicationResult<Vec<String>> {
        self.store.list().with_context("list content ids")
    }

    /// Transform every stored document.
    ///
    /// Outcomes are returned in id order.
    pub fn check_all(&self) -> ApplicationResult<Vec<CheckOutcome>> {
        let ids = self.list_ids()?;
        Ok(self.check_ids(ids))
    }

    /// Transform the documents stored under `ids`, in parallel.
    pub fn check_ids(&self, ids: Vec<String>) -> Vec<CheckOutcome> {
        debug!("check_ids: {} documents", ids.len());

        ids.into_par_iter()
            .map(|id| {
                let result = self
                    .load_tree_with_report(&id)
                    .map(|(document, report)| TreeSummary {
                        node_count: document.root.node_count(),
                        depth: document.root.depth(),
                        report,
                    });
                CheckOutcome { id, result }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;
    use crate::infrastructure::traits::MemoryContentStore;
    use serde_json::json;

    fn service(store: MemoryContentStore) -> TreeService {
        TreeService::new(Arc::new(store), TreeTransformer::new())
    }

    #[test]
    fn test_missing_and_malformed_share_message() {
        let store = MemoryContentStore::new().with("empty", json!({"branches": []}));
        let svc = service(store);

        let missing = svc.load_tree("nope").unwrap_err();
        let malformed = svc.load_tree("empty").unwrap_err();

        assert_eq!(missing.to_string(), "content not found: nope");
        assert_eq!(malformed.to_string(), "content not found: empty");
        assert!(matches!(missing.not_found_cause(), Some(NotFoundCause::Missing)));
        assert!(matches!(
            malformed.not_found_cause(),
            Some(NotFoundCause::Untransformable(DomainError::ContentShape { .. }))
        ));
    }

    #[test]
    fn test_check_all_keeps_id_order() {
        let store = MemoryContentStore::new()
            .with("b", json!({"questions": [{"id": "q1", "q": "?"}]}))
            .with("a", json!({"title": "no items"}));
        let outcomes = service(store).check_all().unwrap();

        let ids: Vec<_> = outcomes.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert!(!outcomes[0].is_ok());
        assert!(outcomes[1].is_ok());
    }
}
