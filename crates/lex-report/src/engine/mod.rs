//! Snapshot reconciliation and visualization preparation.
//!
//! Pure, synchronous transformations over already-resolved snapshots:
//!
//! - [`OutlierIndex`] - membership test over flagged (row, column) cells
//! - [`classify`] - display classification of a single cell
//! - [`project`] - classified grid of the active snapshot's preview
//! - [`partition`] - categorical / numerical chart buckets
//!
//! Nothing here computes statistics or touches the network.

mod buckets;
mod classifier;
mod outliers;
mod projector;

pub use buckets::{ChartSet, VisualizationBuckets, partition};
pub use classifier::{CellClass, CellContext, classify, values_differ};
pub use outliers::OutlierIndex;
pub use projector::{Grid, GridCell, GridRow, project};
