pub mod queue;
pub mod spool;

pub use queue::QueuedGenerationService;
pub use spool::{Spool, SpoolError};

use serde::{Deserialize, Serialize};

use crate::course_key::CourseKey;
use crate::user_directory::UserRecord;

/// Accepts certificate generation requests for one (user, course) pair.
///
/// Requests are fire-and-forget: implementations schedule the work and
/// report their own failures, callers observe nothing.
pub trait CertificateGenerationService {
    fn request(&self, user: &UserRecord, course_key: &CourseKey);
}

/// A scheduled certificate generation, as handed to the downstream pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationTask {
    pub user_id: u64,
    pub username: String,
    pub course_key: String,
    /// Milliseconds since the Unix epoch.
    pub requested_at: i64,
}

impl GenerationTask {
    pub fn new(user: &UserRecord, course_key: &CourseKey) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            course_key: course_key.to_string(),
            requested_at: chrono::Utc::now().timestamp_millis(),
        }
    }
}
