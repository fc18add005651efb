//! Cache-based deduplication of incoming rows by sample id.

use std::collections::{BTreeSet, HashSet};

use respat_model::Table;
use respat_model::schema::SAMPLE_ID;
use tracing::info;

/// Sample ids already present in the cache table.
#[derive(Debug, Clone, Default)]
pub struct SeenSamples {
    ids: HashSet<String>,
}

impl SeenSamples {
    pub fn from_table(cache: &Table) -> Self {
        let ids = cache
            .column(SAMPLE_ID)
            .map(|values| {
                values
                    .into_iter()
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        Self { ids }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Result of filtering one file's rows against the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupOutcome {
    /// Every sample in the file was processed before; nothing to do.
    AllSeen { samples: usize },
    /// Some samples are new; previously seen rows were removed.
    Fresh { seen: usize, new: usize },
}

impl DedupOutcome {
    pub fn is_all_seen(&self) -> bool {
        matches!(self, DedupOutcome::AllSeen { .. })
    }

    /// `(seen, new)` sample counts.
    pub fn counts(&self) -> (usize, usize) {
        match *self {
            DedupOutcome::AllSeen { samples } => (samples, 0),
            DedupOutcome::Fresh { seen, new } => (seen, new),
        }
    }
}

/// Drop rows whose `sample_id` is already in `seen`.
///
/// When every distinct sample id of a non-empty table is already known, the
/// table is emptied and [`DedupOutcome::AllSeen`] is returned.
pub fn filter_unseen(table: &mut Table, seen: &SeenSamples, layout: &str) -> DedupOutcome {
    let unique: BTreeSet<String> = table
        .column(SAMPLE_ID)
        .map(|values| values.into_iter().map(str::to_string).collect())
        .unwrap_or_default();
    let already: usize = unique.iter().filter(|id| seen.contains(id)).count();

    if !unique.is_empty() && already == unique.len() {
        info!(layout, samples = already, "all samples were already previously processed");
        table.rows.clear();
        return DedupOutcome::AllSeen { samples: already };
    }

    let new = unique.len() - already;
    if already > 0 {
        info!(
            layout,
            seen = already,
            total = unique.len(),
            "some samples were already previously processed"
        );
        if let Some(idx) = table.column_index(SAMPLE_ID) {
            table.retain_rows(|row| !seen.contains(&row[idx]));
        }
    }
    info!(layout, new, "processing new samples");
    DedupOutcome::Fresh { seen: already, new }
}
