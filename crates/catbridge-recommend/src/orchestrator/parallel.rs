use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use uuid::Uuid;

use super::pool::GroupKey;
use super::{dedup_ids, recommend_for, Progress, RecommendationOrchestrator};
use crate::error::RecommendError;
use crate::types::{BatchReport, RecommendationResult, RunMode};

impl RecommendationOrchestrator<'_> {
    /// Batch mode with groups scored on blocking worker threads.
    ///
    /// Preload and enrichment run as in [`run_batch`](Self::run_batch).
    /// Each group then goes to a `spawn_blocking` task holding an `Arc` to
    /// the shared index, with at most `max_concurrent_groups` in flight.
    /// Progress fires once per finished group and cancellation is checked
    /// after each one. When every id is a cache hit or unknown, progress
    /// fires once at the end. Results come back in input order.
    ///
    /// # Errors
    ///
    /// Returns [`RecommendError::Source`] if any of the bulk reads fails.
    pub async fn run_batch_parallel(
        &self,
        ids: &[String],
        progress: Progress<'_>,
    ) -> Result<BatchReport, RecommendError> {
        let started_at = Utc::now();
        let run_id = Uuid::new_v4();
        let ids = dedup_ids(ids);
        let total = ids.len();
        tracing::info!(
            %run_id,
            mode = %RunMode::Parallel,
            ids = total,
            "recommendation run started"
        );

        let index = Arc::new(self.preload()?);
        let config = Arc::new(self.config.clone());

        let mut slots: Vec<Option<RecommendationResult>> = vec![None; total];
        let mut groups: BTreeMap<GroupKey, Vec<(usize, String)>> = BTreeMap::new();
        for (slot, id) in ids.iter().enumerate() {
            if let Some(hit) = self.cached(id) {
                slots[slot] = Some(hit);
                continue;
            }
            match index.get(id) {
                Some(source) => groups
                    .entry(GroupKey::of(source))
                    .or_default()
                    .push((slot, id.clone())),
                None => {
                    let err = RecommendError::RecordNotFound { id: id.clone() };
                    slots[slot] = Some(self.settle(RecommendationResult::failed(id.as_str(), err)));
                }
            }
        }
        tracing::debug!(groups = groups.len(), "dispatching groups");
        let dispatched = !groups.is_empty();

        let mut processed = slots.iter().filter(|s| s.is_some()).count();
        let mut cancelled = false;

        let mut finished = stream::iter(groups.into_values())
            .map(|members| {
                let index = Arc::clone(&index);
                let config = Arc::clone(&config);
                let work = members.clone();
                async move {
                    let joined = tokio::task::spawn_blocking(move || {
                        work.into_iter()
                            .filter_map(|(slot, id)| {
                                index
                                    .get(&id)
                                    .map(|source| (slot, recommend_for(source, &index, &config)))
                            })
                            .collect::<Vec<_>>()
                    })
                    .await;
                    (members, joined)
                }
            })
            .buffer_unordered(self.options.max_concurrent_groups.max(1));

        while let Some((members, joined)) = finished.next().await {
            match joined {
                Ok(results) => {
                    for (slot, result) in results {
                        slots[slot] = Some(self.settle(result));
                    }
                }
                Err(err) => {
                    tracing::error!(error = %err, members = members.len(), "group worker failed");
                    for (slot, id) in &members {
                        let failure = RecommendError::Worker(err.to_string());
                        let failed = RecommendationResult::failed(id.as_str(), failure);
                        slots[*slot] = Some(self.settle(failed));
                    }
                }
            }
            processed += members.len();
            let first = members.first().map_or("", |(_, id)| id.as_str());
            progress(processed, total, &format!("scored group of {first}"));

            if self.options.is_cancelled() {
                tracing::info!(processed, total, "recommendation run cancelled");
                cancelled = true;
                break;
            }
        }
        drop(finished);

        if !dispatched && total > 0 {
            progress(processed, total, "resolved without scoring");
        }

        let results = slots.into_iter().flatten().collect();
        Ok(self.finish(run_id, started_at, RunMode::Parallel, cancelled, results))
    }
}
