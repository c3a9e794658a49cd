use chrono::Utc;
use log::*;
use sente_payment_engine::{
    poller::{PollDecision, PollQueue},
    PaymentFlowApi,
    SqliteDatabase,
};
use tokio::task::JoinHandle;

use crate::integrations::MomoProvider;

/// Starts the status poll worker. Do not await the returned JoinHandle, as it runs indefinitely.
///
/// Entries taken from the queue are checked sequentially; an entry stays tracked while its check
/// runs, so there is never more than one outstanding check per reference id.
pub fn start_status_poller(
    api: PaymentFlowApi<SqliteDatabase, MomoProvider>,
    queue: PollQueue,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut timer = tokio::time::interval(std::time::Duration::from_secs(1));
        info!("⏱️ Mobile money status poller started");
        loop {
            timer.tick().await;
            let due = queue.take_due(Utc::now()).await;
            for entry in due {
                let reference_id = entry.reference_id.clone();
                match api.check_in_flight(entry).await {
                    PollDecision::Reschedule(next) => queue.reschedule(next).await,
                    PollDecision::Settled(row) => {
                        info!("⏱️ Transaction #{} settled as {} [{reference_id}]", row.id, row.status);
                        queue.finish(&reference_id).await;
                    },
                    PollDecision::Finished => queue.finish(&reference_id).await,
                }
            }
        }
    })
}
