use thiserror::Error;

/// Invalid or incomplete decorator configuration
///
/// Always raised before any request is sent.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Neither a user slug nor a project key was configured
    #[error(
        "property user_slug (for /users repositories) or project_key (for /projects repositories) needs to be set"
    )]
    MissingRepositoryOwner,

    /// A required property is blank
    #[error("required property {0} is not set")]
    MissingProperty(&'static str),

    /// A property has a value the decorator cannot use
    #[error("property {name} is invalid: {reason}")]
    InvalidProperty { name: &'static str, reason: String },
}
