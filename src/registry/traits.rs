//! Registry abstraction.

use async_trait::async_trait;

use crate::core::value::PointUpdate;

/// Sink for point state transitions.
///
/// The engines call [`publish`](Registry::publish) after every poll attempt
/// and every successful write, including transitions to unknown; a registry
/// always sees the current truth for every active point.
#[async_trait]
pub trait Registry: Send + Sync {
    async fn publish(&self, update: PointUpdate);

    /// Latest update for a point, if any update was published.
    fn latest(&self, point_id: &str) -> Option<PointUpdate>;
}
