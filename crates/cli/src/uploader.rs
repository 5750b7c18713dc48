//! Sequential batch upload of a material list.

use crate::api_client::ApiClient;
use crate::progress::Reporter;
use atelier_core::{BatchPayload, Envelope, Error, MaterialItem, Result, Site, UploadOutcome, upload::plan_batches};

/// Upload `items` to `site` in consecutive batches of `batch_size`.
///
/// Exactly one request is in flight at a time, so progress is monotonic and
/// the remote sees a bounded request rate. The first failing batch aborts
/// the run: its per-item rejections are reported, and items in later batches
/// are neither sent nor reported as failures.
pub async fn upload(
    client: &ApiClient,
    site: &Site,
    items: &[MaterialItem],
    batch_size: usize,
    reporter: &dyn Reporter,
) -> Result<UploadOutcome> {
    let batches = plan_batches(items, batch_size)?;
    let total = items.len();
    reporter.sync_started(&site.upload_endpoint, total);

    let mut processed = 0usize;
    for batch in batches {
        let payload = BatchPayload::from_items(batch);
        let envelope = match client.upload_materials(&site.upload_endpoint, &payload).await {
            Ok(envelope) => envelope,
            Err(err) => {
                reporter.sync_failed();
                return Err(err);
            }
        };
        match envelope {
            Envelope::Success { .. } => {
                // Advance by the batch's actual length: the final batch may
                // be short of batch_size.
                processed += batch.len();
                reporter.batch_uploaded(processed, total);
            }
            Envelope::Failure { data, .. } => {
                let failures = data.unwrap_or_default();
                for failure in &failures {
                    reporter.item_failed(&failure.package, &failure.reason);
                }
                reporter.sync_failed();
                return Err(Error::BatchUploadFailed { failures });
            }
        }
    }

    reporter.sync_succeeded(&site.upload_endpoint);
    Ok(UploadOutcome::success())
}
