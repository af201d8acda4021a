use std::fmt;

const CURRENT_PREFIX: &str = "course-v1:";
const CURRENT_SEPARATOR: char = '+';
const DEPRECATED_SEPARATOR: char = '/';

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CourseKeyError {
    #[error("Empty course key")]
    Empty,
    #[error("Course key '{0}' must have exactly three segments (org, course, run)")]
    SegmentCount(String),
    #[error("Course key '{0}' has an empty segment")]
    EmptySegment(String),
    #[error("Course key '{key}' contains illegal character {found:?}")]
    IllegalCharacter { key: String, found: char },
}

/// Structured form of a course run identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CourseKey {
    org: String,
    course: String,
    run: String,
    deprecated: bool,
}

impl CourseKey {
    pub fn new(org: &str, course: &str, run: &str) -> Self {
        Self {
            org: org.to_string(),
            course: course.to_string(),
            run: run.to_string(),
            deprecated: false,
        }
    }

    pub fn org(&self) -> &str {
        &self.org
    }

    pub fn course(&self) -> &str {
        &self.course
    }

    pub fn run(&self) -> &str {
        &self.run
    }

    /// True when parsed from the old `org/course/run` form.
    pub fn is_deprecated(&self) -> bool {
        self.deprecated
    }
}

impl fmt::Display for CourseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.deprecated {
            write!(f, "{}/{}/{}", self.org, self.course, self.run)
        } else {
            write!(
                f,
                "{}{}+{}+{}",
                CURRENT_PREFIX, self.org, self.course, self.run
            )
        }
    }
}

/// Turns a course identifier string into a [`CourseKey`].
pub trait CourseKeyParser {
    fn parse(&self, serialized: &str) -> Result<CourseKey, CourseKeyError>;
}

/// Accepts `course-v1:ORG+COURSE+RUN` and the deprecated `ORG/COURSE/RUN`.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpaqueCourseKeyParser;

impl CourseKeyParser for OpaqueCourseKeyParser {
    fn parse(&self, serialized: &str) -> Result<CourseKey, CourseKeyError> {
        if serialized.is_empty() {
            return Err(CourseKeyError::Empty);
        }

        let (body, separator, deprecated) = match serialized.strip_prefix(CURRENT_PREFIX) {
            Some(body) => (body, CURRENT_SEPARATOR, false),
            None => (serialized, DEPRECATED_SEPARATOR, true),
        };

        let segments: Vec<&str> = body.split(separator).collect();
        let [org, course, run] = segments.as_slice() else {
            return Err(CourseKeyError::SegmentCount(serialized.to_string()));
        };

        for segment in [org, course, run] {
            if segment.is_empty() {
                return Err(CourseKeyError::EmptySegment(serialized.to_string()));
            }
            if let Some(found) = segment.chars().find(|c| !is_allowed_id_char(*c)) {
                return Err(CourseKeyError::IllegalCharacter {
                    key: serialized.to_string(),
                    found,
                });
            }
        }

        Ok(CourseKey {
            org: org.to_string(),
            course: course.to_string(),
            run: run.to_string(),
            deprecated,
        })
    }
}

fn is_allowed_id_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '~' | '.' | ':')
}
