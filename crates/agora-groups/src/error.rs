//! Group service error types.

use agora_core::error::AgoraError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GroupError {
    #[error("invalid mail address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("mail transport error: {0}")]
    MailTransport(String),

    #[error("message catalog {locale}/{category} is malformed: {reason}")]
    Catalog {
        locale: String,
        category: String,
        reason: String,
    },
}

impl From<GroupError> for AgoraError {
    fn from(err: GroupError) -> Self {
        match err {
            GroupError::InvalidAddress { .. } | GroupError::MailTransport(_) => {
                AgoraError::Mail(err.to_string())
            }
            GroupError::Catalog { .. } => AgoraError::Configuration(err.to_string()),
        }
    }
}
