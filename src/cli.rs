use clap::Parser;
use std::path::PathBuf;

/// Generate course certificates for one or more users in a given course run.
///
/// Example: cert-generation -u 123 456 -c course-v1:edX+DemoX+Demo_Course
#[derive(Debug, Parser)]
#[command(name = "cert-generation", version, infer_long_args = true)]
pub struct Cli {
    #[arg(
        short = 'u',
        long = "user",
        value_name = "USER",
        num_args = 1..,
        required = true,
        help = "user_id or space-separated list of user_ids for whom to generate course certificates"
    )]
    pub users: Vec<String>,

    #[arg(
        short = 'c',
        long = "course-key",
        value_name = "COURSE_KEY",
        help = "course run key"
    )]
    pub course_key: String,

    #[arg(
        long = "settings",
        value_name = "PATH",
        help = "Config file (default: ~/cert-generation/config.toml)"
    )]
    pub settings: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn parses_multiple_users() {
        let cli = Cli::try_parse_from([
            "cert-generation",
            "-u",
            "123",
            "456",
            "-c",
            "course-v1:edX+DemoX+Demo_Course",
        ])
        .unwrap();
        assert_eq!(cli.users, vec!["123", "456"]);
        assert_eq!(cli.course_key, "course-v1:edX+DemoX+Demo_Course");
        assert_eq!(cli.settings, None);
    }

    #[test]
    fn accepts_abbreviated_long_flags() {
        let cli = Cli::try_parse_from(["cert-generation", "--u", "7", "--c", "blah"]).unwrap();
        assert_eq!(cli.users, vec!["7"]);
        assert_eq!(cli.course_key, "blah");
    }

    #[test]
    fn settings_path_is_optional() {
        let cli = Cli::try_parse_from([
            "cert-generation",
            "-u",
            "1",
            "-c",
            "course-v1:a+b+c",
            "--settings",
            "/etc/cert-generation.toml",
        ])
        .unwrap();
        assert_eq!(cli.settings, Some(PathBuf::from("/etc/cert-generation.toml")));
    }

    #[test]
    fn missing_course_key_is_rejected() {
        let err = Cli::try_parse_from(["cert-generation", "--u", "7"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn missing_users_are_rejected() {
        let err = Cli::try_parse_from(["cert-generation", "-c", "course-v1:a+b+c"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn config_flag_is_spelled_settings() {
        let err = Cli::try_parse_from([
            "cert-generation",
            "-u",
            "1",
            "-c",
            "course-v1:a+b+c",
            "--config",
            "/x.toml",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn user_flag_needs_a_value() {
        assert!(Cli::try_parse_from(["cert-generation", "-c", "course-v1:a+b+c", "-u"]).is_err());
    }
}
