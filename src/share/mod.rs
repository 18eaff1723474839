//! Share integration for publishing a finished result
//!
//! Mirrors a platform share sheet: the platform is asked whether it can
//! share the result's media type before the handoff, and refusal degrades to
//! a visible message instead of an error path.

pub mod local;
pub mod mock;

pub use local::LocalShareClient;
pub use mock::MockShareClient;

use crate::Result;
use async_trait::async_trait;

pub const SHARE_TITLE: &str = "My AI Creation!";
pub const SHARE_TEXT: &str = "Check out this photo I made with Pairpose!";

#[async_trait]
pub trait ShareService: Send + Sync {
    /// Whether this platform can hand off a file of the given media type.
    fn can_share(&self, media_type: &str) -> bool;

    async fn share(
        &self,
        file_name: &str,
        data: &[u8],
        media_type: &str,
        title: &str,
        text: &str,
    ) -> Result<()>;
}
