pub mod cli;
pub mod config;
pub mod course_key;
pub mod dispatcher;
pub mod generation;
pub mod user_directory;

pub use course_key::{CourseKey, CourseKeyError, CourseKeyParser, OpaqueCourseKeyParser};
pub use dispatcher::{validate, ConfigurationError, Dispatcher, ValidatedRequest};
pub use generation::{CertificateGenerationService, GenerationTask, QueuedGenerationService, Spool};
pub use user_directory::{InMemoryUserDirectory, UserDirectory, UserNotFound, UserRecord};
