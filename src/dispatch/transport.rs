use crate::domain::RecipientEmail;
use async_trait::async_trait;

/// One email out, one call in. No batching: a malformed address can only
/// fail its own delivery.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(
        &self,
        to: &RecipientEmail,
        subject: &str,
        body: &str,
    ) -> Result<(), TransportError>;
}

/// A delivery failure as reported by the transport.
///
/// The engine never inspects the cause; it stringifies it into the
/// attempt log and moves on to the next recipient.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct TransportError(#[from] anyhow::Error);
