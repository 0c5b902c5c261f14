//! Routes visualization descriptors into chart buckets.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::types::{ChartKind, VisualizationDescriptor};

/// Stable partition of descriptors, borrowed from the snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VisualizationBuckets<'a> {
    /// `bar` descriptors, in input order.
    pub categorical: Vec<&'a VisualizationDescriptor>,
    /// `scatter` descriptors, in input order.
    pub numerical: Vec<&'a VisualizationDescriptor>,
    /// Descriptors with a kind this client does not draw.
    pub dropped: usize,
}

impl VisualizationBuckets<'_> {
    /// Number of descriptors routed to a bucket.
    pub fn len(&self) -> usize {
        self.categorical.len() + self.numerical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categorical.is_empty() && self.numerical.is_empty()
    }

    /// Detach the buckets from the snapshot they borrow from.
    pub fn into_owned(self) -> ChartSet {
        ChartSet {
            categorical: self.categorical.into_iter().cloned().collect(),
            numerical: self.numerical.into_iter().cloned().collect(),
        }
    }
}

/// Owned chart buckets, as carried by a report view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSet {
    pub categorical: Vec<VisualizationDescriptor>,
    pub numerical: Vec<VisualizationDescriptor>,
}

impl ChartSet {
    pub fn is_empty(&self) -> bool {
        self.categorical.is_empty() && self.numerical.is_empty()
    }
}

/// Split descriptors by declared kind in a single pass.
///
/// `bar` goes to `categorical`, `scatter` to `numerical`; anything else is
/// counted in `dropped` and otherwise ignored. No point data is inspected.
pub fn partition(visualizations: &[VisualizationDescriptor]) -> VisualizationBuckets<'_> {
    let mut buckets = VisualizationBuckets::default();

    for viz in visualizations {
        match viz.kind {
            ChartKind::Bar => buckets.categorical.push(viz),
            ChartKind::Scatter => buckets.numerical.push(viz),
            ChartKind::Unsupported => {
                trace!("Skipping unsupported chart for column '{}'", viz.column);
                buckets.dropped += 1;
            }
        }
    }

    debug!(
        "Partitioned {} visualizations: {} categorical, {} numerical, {} dropped",
        visualizations.len(),
        buckets.categorical.len(),
        buckets.numerical.len(),
        buckets.dropped
    );

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viz(kind: ChartKind, column: &str) -> VisualizationDescriptor {
        VisualizationDescriptor {
            kind,
            column: column.to_string(),
            data: Vec::new(),
        }
    }

    fn columns(bucket: &[&VisualizationDescriptor]) -> Vec<String> {
        bucket.iter().map(|v| v.column.clone()).collect()
    }

    #[test]
    fn test_empty_input() {
        let buckets = partition(&[]);
        assert!(buckets.is_empty());
        assert_eq!(buckets.dropped, 0);
    }

    #[test]
    fn test_partition_preserves_relative_order() {
        let input = vec![
            viz(ChartKind::Scatter, "age"),
            viz(ChartKind::Bar, "city"),
            viz(ChartKind::Scatter, "fare"),
            viz(ChartKind::Bar, "sex"),
            viz(ChartKind::Bar, "deck"),
        ];
        let buckets = partition(&input);

        assert_eq!(columns(&buckets.categorical), vec!["city", "sex", "deck"]);
        assert_eq!(columns(&buckets.numerical), vec!["age", "fare"]);
    }

    #[test]
    fn test_unknown_kinds_are_dropped_and_counted() {
        let input = vec![
            viz(ChartKind::Unsupported, "grid"),
            viz(ChartKind::Bar, "city"),
            viz(ChartKind::Unsupported, "map"),
        ];
        let buckets = partition(&input);

        assert_eq!(buckets.dropped, 2);
        assert_eq!(buckets.len() + buckets.dropped, input.len());
        assert_eq!(columns(&buckets.categorical), vec!["city"]);
    }

    #[test]
    fn test_partition_is_total() {
        let kinds = [ChartKind::Bar, ChartKind::Scatter, ChartKind::Unsupported];
        for n in 0..12 {
            let input: Vec<_> = (0..n)
                .map(|i| viz(kinds[(i * 7 + n) % 3], &format!("c{i}")))
                .collect();
            let buckets = partition(&input);
            assert_eq!(
                buckets.categorical.len() + buckets.numerical.len() + buckets.dropped,
                input.len()
            );
        }
    }

    #[test]
    fn test_into_owned() {
        let input = vec![viz(ChartKind::Bar, "city"), viz(ChartKind::Scatter, "age")];
        let charts = partition(&input).into_owned();
        assert_eq!(charts.categorical, vec![input[0].clone()]);
        assert_eq!(charts.numerical, vec![input[1].clone()]);
    }
}
