//! Operation counters for the policy cores (feature `metrics`).
//!
//! Recording is split from reading: cores own a [`CacheMetrics`] and bump it
//! through [`CoreMetricsRecorder`]; callers read an immutable
//! [`CacheMetricsSnapshot`] through [`MetricsSnapshotProvider`].

pub mod metrics_impl;
pub mod snapshot;
pub mod traits;

pub use metrics_impl::CacheMetrics;
pub use snapshot::CacheMetricsSnapshot;
pub use traits::{CoreMetricsRecorder, MetricsSnapshotProvider};
