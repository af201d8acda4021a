use crate::course_key::{CourseKey, CourseKeyError, CourseKeyParser};
use crate::generation::CertificateGenerationService;
use crate::user_directory::UserDirectory;

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("You must specify a list of users")]
    MissingUsers,
    #[error("You must specify a course-key")]
    MissingCourseKey,
    #[error("You must specify a valid course-key")]
    InvalidCourseKey(#[source] CourseKeyError),
}

/// Arguments that passed validation, ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub user_ids: Vec<String>,
    pub course_key: CourseKey,
}

/// Requests certificate generation for a batch of users in one course run.
pub struct Dispatcher<'a> {
    parser: &'a dyn CourseKeyParser,
    directory: &'a dyn UserDirectory,
    service: &'a dyn CertificateGenerationService,
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        parser: &'a dyn CourseKeyParser,
        directory: &'a dyn UserDirectory,
        service: &'a dyn CertificateGenerationService,
    ) -> Self {
        Self {
            parser,
            directory,
            service,
        }
    }

    /// Validates, then dispatches one request per user that can be resolved.
    pub fn run(
        &self,
        user_ids: &[String],
        course_key: Option<&str>,
    ) -> Result<(), ConfigurationError> {
        let request = validate(self.parser, user_ids, course_key)?;
        self.dispatch(&request);
        Ok(())
    }

    /// Unknown users are logged and skipped; the batch always completes.
    pub fn dispatch(&self, request: &ValidatedRequest) {
        for user_id in &request.user_ids {
            match self.directory.lookup(user_id) {
                Ok(user) => {
                    log::info!(
                        "[DISPATCH] Requesting certificate generation for {} : {}",
                        user.id,
                        request.course_key
                    );
                    self.service.request(&user, &request.course_key);
                }
                Err(e) => log::warn!("[DISPATCH] {}", e),
            }
        }
    }
}

/// Checks the invocation arguments in order: users, course key presence,
/// course key syntax. The first failure wins.
pub fn validate(
    parser: &dyn CourseKeyParser,
    user_ids: &[String],
    course_key: Option<&str>,
) -> Result<ValidatedRequest, ConfigurationError> {
    if user_ids.is_empty() {
        return Err(ConfigurationError::MissingUsers);
    }

    let course_key = match course_key {
        Some(key) if !key.is_empty() => key,
        _ => return Err(ConfigurationError::MissingCourseKey),
    };

    let course_key = parser
        .parse(course_key)
        .map_err(ConfigurationError::InvalidCourseKey)?;

    Ok(ValidatedRequest {
        user_ids: user_ids.to_vec(),
        course_key,
    })
}
