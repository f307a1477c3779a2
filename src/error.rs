use thiserror::Error;

pub type LocationResult<T> = Result<T, LocationError>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum LocationError {
    /// The input is neither an http(s) nor an ssh location.
    #[error("Unsupported factory location: \"{0}\"")]
    UnsupportedLocation(String),
    /// The host does not belong to any known git provider.
    #[error("Provider not supported: {0}")]
    UnsupportedProvider(String),
    /// Provider specific operations need an absolute url.
    #[error("Not a valid Url: {0}")]
    InvalidUrl(String),
    /// The `remotes` attribute could not be turned into a list of remotes.
    #[error("{kind}")]
    InvalidRemotesSyntax {
        input: String,
        kind: RemotesErrorKind,
    },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemotesErrorKind {
    /// The value does not follow the `{...}` grammar at all.
    #[error("Unable to parse remotes attribute. {0}")]
    Syntax(String),
    /// The value is well formed, but mixes urls and pairs or has pairs of the wrong arity.
    #[error("Malformed remotes provided: {0}")]
    Malformed(String),
}

impl LocationError {
    pub(crate) fn remotes_syntax(input: &str, detail: impl Into<String>) -> Self {
        Self::InvalidRemotesSyntax {
            input: input.to_owned(),
            kind: RemotesErrorKind::Syntax(detail.into()),
        }
    }

    pub(crate) fn remotes_malformed(input: &str) -> Self {
        Self::InvalidRemotesSyntax {
            input: input.to_owned(),
            kind: RemotesErrorKind::Malformed(input.to_owned()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_the_offending_input() {
        assert_eq!(
            LocationError::UnsupportedLocation("dummy.git".into()).to_string(),
            "Unsupported factory location: \"dummy.git\""
        );
        assert_eq!(
            LocationError::UnsupportedProvider("not-supported.com".into()).to_string(),
            "Provider not supported: not-supported.com"
        );
        assert_eq!(
            LocationError::remotes_malformed("{{origin}}").to_string(),
            "Malformed remotes provided: {{origin}}"
        );
        assert_eq!(
            LocationError::remotes_syntax("{", "unexpected end of input").to_string(),
            "Unable to parse remotes attribute. unexpected end of input"
        );
    }
}
