//! Discovery error types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscoveryError {
    #[error("Discovery controller has shut down")]
    Closed,

    #[error("Discovery controller mailbox is full")]
    MailboxFull,
}

pub type DiscoveryResult<T> = Result<T, DiscoveryError>;
