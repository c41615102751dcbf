use std::time::Duration;
use tokio::time::interval;

use crate::common::AppState;
use crate::sync::worker;

/// Run the VRM installation sync task on a schedule.
pub async fn run_vrm_sync(state: AppState) {
    let interval_secs = state.config.vrm_sync_interval_seconds;
    let retry_delay_secs = state.config.sync_retry_delay_seconds;
    let max_retries = state.config.sync_retry_max;

    tracing::info!(interval_secs, "Starting VRM installation sync scheduler");

    let mut ticker = interval(Duration::from_secs(interval_secs));

    // Run initial sync immediately
    ticker.tick().await;

    loop {
        tracing::debug!("Running VRM installation sync...");

        let mut retries = 0;
        loop {
            match worker::sync_installations(&state.db, &state.vrm_client).await {
                Ok(()) => {
                    tracing::debug!("VRM installation sync completed successfully");
                    break;
                }
                Err(e) => {
                    retries += 1;
                    if e.to_string().contains("Rate limited") && retries <= max_retries {
                        tracing::warn!(
                            retry = retries,
                            max_retries,
                            delay_secs = retry_delay_secs,
                            "VRM sync rate limited, retrying"
                        );
                        tokio::time::sleep(Duration::from_secs(retry_delay_secs)).await;
                    } else if retries <= max_retries {
                        tracing::error!(
                            error = %e,
                            retry = retries,
                            max_retries,
                            "VRM sync failed, retrying"
                        );
                        tokio::time::sleep(Duration::from_secs(retry_delay_secs)).await;
                    } else {
                        tracing::error!(
                            error = %e,
                            max_retries,
                            "VRM sync failed after max retries"
                        );
                        break;
                    }
                }
            }
        }

        // Wait for next tick
        ticker.tick().await;
    }
}
