use super::{MailTransport, MailingStore, NewAttempt};
use crate::{
    authorization::{self, Actor},
    domain::{Mailing, MailingStatus},
};
use time::OffsetDateTime;
use uuid::Uuid;

/// Outcome of one dispatch cycle for one mailing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchSummary {
    pub mailing_id: Uuid,
    pub delivered: u64,
    pub failed: u64,
}

/// Outcome of one scheduled scan.
#[derive(Debug)]
pub struct ScanSummary {
    pub processed: usize,
    pub outcomes: Vec<DispatchSummary>,
}

#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("Mailing not found.")]
    NotFound,
    #[error("The mailing is blocked and cannot be launched.")]
    Inactive,
    #[error("You are not allowed to launch this mailing.")]
    Unauthorized,
    #[error("The mailing is already launched.")]
    AlreadyLaunched,
    #[error("The mailing cannot be launched in its current status.")]
    NotEligible,
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

/// On-demand launch of a single mailing on behalf of `actor`.
///
/// Rejections leave the mailing untouched; a mailing that is already in
/// flight is reported as [`LaunchError::AlreadyLaunched`] rather than sent
/// twice, which makes double-clicks harmless.
#[tracing::instrument(skip(store, transport), fields(actor_id = %actor.user_id))]
pub async fn launch<S, T>(
    store: &S,
    transport: &T,
    mailing_id: Uuid,
    actor: &Actor,
    now: OffsetDateTime,
) -> Result<DispatchSummary, LaunchError>
where
    S: MailingStore + ?Sized,
    T: MailTransport + ?Sized,
{
    let mailing = store
        .find_mailing(mailing_id)
        .await?
        .ok_or(LaunchError::NotFound)?;

    if !mailing.is_active {
        tracing::warn!("Attempt to launch a blocked mailing");
        return Err(LaunchError::Inactive);
    }

    if !authorization::can_trigger(actor, mailing.owner) {
        tracing::warn!("Actor tried to launch a mailing they do not own");
        return Err(LaunchError::Unauthorized);
    }

    match mailing.status {
        MailingStatus::Launched => return Err(LaunchError::AlreadyLaunched),
        MailingStatus::Created => {}
        MailingStatus::Completed => {
            // A completed mailing may only go out again once its window
            // has lapsed.
            if matches!(mailing.end_time, Some(end_time) if end_time >= now) {
                tracing::warn!("Mailing cannot be launched before its window lapses");
                return Err(LaunchError::NotEligible);
            }
        }
    }

    // The conditional update is the authority; losing it means someone
    // else launched the mailing between our read and now.
    if !store.claim_launch(mailing.id).await? {
        return Err(LaunchError::AlreadyLaunched);
    }
    tracing::info!("Mailing launched manually");

    let summary = run_dispatch_cycle(store, transport, &mailing).await?;
    Ok(summary)
}

/// Scheduled scan: claim and dispatch every mailing due at `now`.
///
/// No actor, no access check. Mailings are processed one after another;
/// one that another dispatcher claims first is skipped silently.
#[tracing::instrument(skip(store, transport))]
pub async fn scan_and_dispatch<S, T>(
    store: &S,
    transport: &T,
    now: OffsetDateTime,
) -> Result<ScanSummary, anyhow::Error>
where
    S: MailingStore + ?Sized,
    T: MailTransport + ?Sized,
{
    let due = store.due_mailings(now).await?;
    tracing::info!(due = due.len(), "Scanned for mailings due for dispatch");

    let mut outcomes = Vec::with_capacity(due.len());
    for mailing in due {
        if !store.claim_launch(mailing.id).await? {
            tracing::info!(
                mailing_id = %mailing.id,
                "Mailing was claimed by another dispatcher. Skipping."
            );
            continue;
        }
        tracing::info!(mailing_id = %mailing.id, "Mailing launched on schedule");

        let summary = run_dispatch_cycle(store, transport, &mailing).await?;
        outcomes.push(summary);
    }

    Ok(ScanSummary {
        processed: outcomes.len(),
        outcomes,
    })
}

/// The send loop for one claimed mailing, from `Launched` to `Completed`.
///
/// Each recipient is attempted independently: a transport failure is logged
/// into the attempt log and counted, never propagated. `Completed` means
/// "the cycle finished", even when every single send failed.
#[tracing::instrument(skip_all, fields(mailing_id = %mailing.id))]
async fn run_dispatch_cycle<S, T>(
    store: &S,
    transport: &T,
    mailing: &Mailing,
) -> Result<DispatchSummary, anyhow::Error>
where
    S: MailingStore + ?Sized,
    T: MailTransport + ?Sized,
{
    let recipients = store.recipients(mailing.id).await?;
    if recipients.is_empty() {
        tracing::info!("Mailing has no recipients. Completing without sending.");
        store.mark_completed(mailing.id).await?;
        return Ok(DispatchSummary {
            mailing_id: mailing.id,
            delivered: 0,
            failed: 0,
        });
    }

    let message = store.message_content(mailing.message_id).await?;

    let mut delivered = 0;
    let mut failed = 0;
    for recipient in &recipients {
        match transport
            .send(&recipient.email, message.subject.as_ref(), &message.body)
            .await
        {
            Ok(()) => {
                store
                    .append_attempt(NewAttempt::successful(mailing.id))
                    .await?;
                tracing::info!(recipient = %recipient.email, "Message delivered");
                delivered += 1;
            }
            Err(e) => {
                let diagnostic =
                    format!("Failed to deliver message to {}: {e}", recipient.email);
                tracing::error!(
                    error_cause_chain = ?e,
                    error.message = %e,
                    recipient = %recipient.email,
                    "Failed to deliver message to a recipient. Skipping."
                );
                store
                    .append_attempt(NewAttempt::failed(mailing.id, diagnostic))
                    .await?;
                failed += 1;
            }
        }
    }

    store.mark_completed(mailing.id).await?;
    tracing::info!(delivered, failed, "Mailing dispatch cycle finished");

    Ok(DispatchSummary {
        mailing_id: mailing.id,
        delivered,
        failed,
    })
}
