use crate::{
    configuration::Settings,
    dispatch::{scan_and_dispatch, ScanSummary},
    email_client::EmailClient,
    startup::get_pg_connection_pool,
    storage::PgMailingStore,
};
use std::time::Duration;
use time::OffsetDateTime;

pub async fn run_worker_until_stopped(config: Settings) -> Result<(), anyhow::Error> {
    let store = PgMailingStore::new(get_pg_connection_pool(&config.database));
    let email_client = config.email_client.client()?;
    worker_loop(&store, &email_client, config.dispatcher.poll_interval()).await
}

async fn worker_loop(
    store: &PgMailingStore,
    email_client: &EmailClient,
    poll_interval: Duration,
) -> Result<(), anyhow::Error> {
    loop {
        match scan_and_dispatch(store, email_client, OffsetDateTime::now_utc()).await {
            Ok(summary) => {
                report_run(&summary);
                tokio::time::sleep(poll_interval).await;
            }
            Err(e) => {
                tracing::error!(
                    error_cause_chain = ?e,
                    error.message = %e,
                    "Scheduled dispatch run failed"
                );
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
        }
    }
}

fn report_run(summary: &ScanSummary) {
    if summary.processed == 0 {
        tracing::debug!("No mailings due for dispatch.");
        return;
    }

    for outcome in &summary.outcomes {
        tracing::info!(
            mailing_id = %outcome.mailing_id,
            delivered = outcome.delivered,
            failed = outcome.failed,
            "Mailing dispatched on schedule"
        );
    }
    tracing::info!(
        processed = summary.processed,
        "Finished scheduled dispatch run"
    );
}
