//! Error results that can be returned from the commentq crates

use thiserror::Error;

/// Serious errors and errors from third-party libraries
#[derive(Debug, Error)]
pub enum Error {
    #[error("unexpected number of arguments: {0}")]
    ArgumentCount(usize),

    #[error("markup error: {0}")]
    Markup(String),

    #[error("io error: {0}")]
    IO(#[from] std::io::Error),

    #[error("there was a problem: {0}")]
    Generic(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            Error::ArgumentCount(4).to_string(),
            "unexpected number of arguments: 4"
        );
        assert_eq!(Error::Markup("oops".into()).to_string(), "markup error: oops");

        let err: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert_eq!(err.to_string(), "io error: gone");
    }
}
