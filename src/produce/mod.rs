//! Strategies that turn a revision range into a release notes body.
//!
//! Both strategies sit behind [`NotesProducer`] so the noter resolves the
//! range once and hands it to whichever one is configured.

pub mod external;
pub mod gatherer;

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::ProduceError;
use crate::git::RevisionRange;

pub use external::{ExternalToolProducer, RELNOTES_BIN, WRAPPER_SCRIPT};
pub use gatherer::GathererProducer;

/// Per-run inputs shared by every strategy.
#[derive(Debug, Clone, Default)]
pub struct ProduceContext {
    /// Repository working copy the notes are gathered from.
    pub work_dir: PathBuf,
    pub github_token: Option<String>,
}

/// Produces the release notes body for a range.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotesProducer: Send + Sync {
    async fn produce(
        &self,
        range: &RevisionRange,
        ctx: &ProduceContext,
    ) -> Result<String, ProduceError>;
}
