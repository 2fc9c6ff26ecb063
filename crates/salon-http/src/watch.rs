//! Polling collection watch for the hosted store.
//!
//! The REST API exposes no change feed, so the watch re-lists the
//! collection on an interval and yields a snapshot whenever the payload
//! actually changed. Dropping the stream stops the polling.

use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use futures_util::Stream;

use salon_core::Result;
use salon_core::documents::{Snapshot, SortSpec};
use salon_core::error::{Error, SubscriptionError};
use salon_core::types::Collection;

use crate::backend::HttpBackend;
use crate::client::ApiClient;

/// How often the hosted store is re-listed.
const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Polling snapshot stream for one hosted collection.
pub struct HttpWatch {
    inner: Pin<Box<dyn Stream<Item = Result<Snapshot>> + Send>>,
}

impl HttpWatch {
    pub(crate) fn new(client: ApiClient, collection: Collection, order: SortSpec) -> Self {
        let stream = async_stream::stream! {
            let mut interval = tokio::time::interval(POLL_INTERVAL);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            let mut last_payload: Option<String> = None;

            loop {
                interval.tick().await;

                match HttpBackend::list_collection(&client, &collection, &order, None).await {
                    Ok(records) => {
                        let payload = serde_json::to_string(&records).unwrap_or_default();
                        if last_payload.as_deref() != Some(payload.as_str()) {
                            last_payload = Some(payload);
                            yield Ok(records);
                        }
                    }
                    Err(e) => {
                        // Surface the failure and keep polling; the next
                        // successful list re-emits a snapshot.
                        last_payload = None;
                        yield Err(Error::Subscription(SubscriptionError {
                            collection: collection.as_str().to_string(),
                            message: e.to_string(),
                        }));
                    }
                }
            }
        };

        Self {
            inner: Box::pin(stream),
        }
    }
}

impl Stream for HttpWatch {
    type Item = Result<Snapshot>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}
