//! Zone catalog source abstraction.

use async_trait::async_trait;

use crate::config::zones::ZoneConfig;
use crate::result::AppResult;

/// Supplies zone records once at startup.
///
/// The realtime engine builds an immutable catalog from whatever this
/// returns; refreshing the catalog means restarting the process.
#[async_trait]
pub trait ZoneSource: Send + Sync + std::fmt::Debug + 'static {
    /// Human-readable name of the source, used in logs.
    fn name(&self) -> &str;

    /// Load every zone record.
    async fn load(&self) -> AppResult<Vec<ZoneConfig>>;
}
