//! Live collection subscription for the file-backed store.

use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;

use futures_util::Stream;
use notify::{RecursiveMode, Watcher};
use tokio::sync::mpsc;

use salon_core::Result;
use salon_core::documents::{Snapshot, SortSpec};
use salon_core::error::{Error, SubscriptionError};
use salon_core::types::Collection;

use crate::store::{ChangeLogEvent, FileStore};

/// Live snapshot stream for one collection of the file-backed store.
///
/// A change-log watcher (plus a poll fallback) triggers a re-list of the
/// collection; each trigger yields the full ordered record list. Dropping
/// the stream stops the watcher and the poll task.
pub struct FileWatch {
    inner: Pin<Box<dyn Stream<Item = Result<Snapshot>> + Send>>,
}

impl FileWatch {
    pub(crate) fn from_store(
        store: FileStore,
        collection: Collection,
        order: SortSpec,
    ) -> Result<Self> {
        let store_dir = store.store_dir();
        let changes_path = store.changes_path();

        std::fs::create_dir_all(&store_dir).map_err(|e| {
            Error::Subscription(SubscriptionError {
                collection: collection.as_str().to_string(),
                message: format!("failed to create store directory: {}", e),
            })
        })?;

        // Ticks, not data: every tick means "this collection changed,
        // re-list it". Coalescing drops are harmless.
        let (tx, mut rx) = mpsc::channel::<()>(16);

        let initial_pos = std::fs::metadata(&changes_path)
            .map(|m| m.len())
            .unwrap_or(0);

        let position = Arc::new(Mutex::new(initial_pos));
        let position_watcher = position.clone();
        let changes_path_watcher = changes_path.clone();
        let collection_watcher = collection.clone();
        let tx_watcher = tx.clone();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            if let Ok(event) = res {
                if !matches!(
                    event.kind,
                    notify::EventKind::Modify(_) | notify::EventKind::Create(_)
                ) {
                    return;
                }

                let is_change_log = event
                    .paths
                    .iter()
                    .any(|p| p.file_name().is_some_and(|n| n == "changes.jsonl"));

                if !is_change_log {
                    return;
                }

                notify_on_new_changes(
                    &changes_path_watcher,
                    &position_watcher,
                    &collection_watcher,
                    &tx_watcher,
                );
            }
        })
        .map_err(|e| {
            Error::Subscription(SubscriptionError {
                collection: collection.as_str().to_string(),
                message: format!("failed to create file watcher: {}", e),
            })
        })?;

        watcher
            .watch(&store_dir, RecursiveMode::NonRecursive)
            .map_err(|e| {
                Error::Subscription(SubscriptionError {
                    collection: collection.as_str().to_string(),
                    message: format!("failed to watch store directory: {}", e),
                })
            })?;

        // Poll fallback for filesystems where notify is unreliable. The
        // task owns the watcher; both stop once the stream is dropped.
        let changes_path_poll = changes_path.clone();
        let collection_poll = collection.clone();
        let tx_poll = tx.clone();
        tokio::spawn(async move {
            let _watcher = watcher;
            let mut interval = tokio::time::interval(Duration::from_millis(500));

            loop {
                interval.tick().await;
                if tx_poll.is_closed() {
                    break;
                }
                notify_on_new_changes(&changes_path_poll, &position, &collection_poll, &tx_poll);
            }
        });

        let stream = async_stream::stream! {
            yield list_snapshot(&store, &collection, &order).await;

            while rx.recv().await.is_some() {
                yield list_snapshot(&store, &collection, &order).await;
            }
        };

        Ok(Self {
            inner: Box::pin(stream),
        })
    }
}

impl Stream for FileWatch {
    type Item = Result<Snapshot>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

async fn list_snapshot(
    store: &FileStore,
    collection: &Collection,
    order: &SortSpec,
) -> Result<Snapshot> {
    store
        .list_records(collection, order)
        .await
        .map_err(|e| {
            Error::Subscription(SubscriptionError {
                collection: collection.as_str().to_string(),
                message: e.to_string(),
            })
        })
}

/// Read change-log lines past `position` and tick the channel when any of
/// them touch the watched collection.
fn notify_on_new_changes(
    changes_path: &PathBuf,
    position: &Arc<Mutex<u64>>,
    collection: &Collection,
    tx: &mpsc::Sender<()>,
) {
    let Ok(mut file) = File::open(changes_path) else {
        return;
    };

    let Ok(mut pos) = position.lock() else {
        return;
    };

    if file.seek(SeekFrom::Start(*pos)).is_err() {
        return;
    }

    let mut relevant = false;
    let reader = BufReader::new(&file);
    for line in reader.lines().map_while(|line| line.ok()) {
        if line.trim().is_empty() {
            continue;
        }
        if let Ok(event) = serde_json::from_str::<ChangeLogEvent>(&line)
            && event.collection == collection.as_str()
        {
            relevant = true;
        }
    }

    if let Ok(new_pos) = file.stream_position() {
        *pos = new_pos;
    }

    if relevant {
        let _ = tx.try_send(());
    }
}
