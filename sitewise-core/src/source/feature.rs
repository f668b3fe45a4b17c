//! Feature database access.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::{FeatureCount, FeatureQuery};

use super::error::FeatureQueryError;

/// Execute feature queries and return deduplicated matches.
///
/// Implementations must check `cancel` before each network attempt and
/// while waiting between retries, returning
/// [`FeatureQueryError::Cancelled`] once it fires. Empty queries must return
/// [`FeatureCount::empty`] without contacting the service.
#[async_trait]
pub trait FeatureSource: Send + Sync {
    /// Run `query` and count distinct matching elements.
    async fn fetch(
        &self,
        query: &FeatureQuery,
        cancel: &CancellationToken,
    ) -> Result<FeatureCount, FeatureQueryError>;
}
