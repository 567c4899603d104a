//! Error types for smsgate

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SSH error: {0}")]
    Ssh(#[from] ssh2::Error),

    #[error("Host key verification failed: {0}")]
    HostVerification(String),

    #[error("Credentials error: {0}")]
    Credentials(String),

    #[error("Pub/Sub error: {0}")]
    PubSub(String),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Config("CHAR_LIMIT must be an integer".to_string());
        assert!(err.to_string().contains("CHAR_LIMIT"));

        let err = Error::HostVerification("host key for 10.0.0.1 changed".to_string());
        assert!(err.to_string().contains("10.0.0.1"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
