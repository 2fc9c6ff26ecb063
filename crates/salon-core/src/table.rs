//! Generic resource table.
//!
//! UI-agnostic presentation state for one live collection: column
//! descriptors, a global free-text filter, pagination, column visibility,
//! an edit pointer and the optimistic delete flow. The table owns no data
//! of record; the store does. Snapshots replace the row set wholesale.

use crate::Result;
use crate::documents::Resource;
use crate::error::Error;
use crate::traits::Session;
use crate::types::RecordId;

/// Column text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// Left-aligned (names, labels).
    Left,
    /// Right-aligned (prices, durations).
    Right,
}

/// A column descriptor: header label plus a cell renderer.
pub struct Column<T> {
    /// Header label.
    pub header: &'static str,
    /// Renders one cell from a row.
    pub accessor: fn(&T) -> String,
    /// Cell alignment.
    pub align: Align,
    /// Whether the column is currently shown.
    pub visible: bool,
}

impl<T> Column<T> {
    /// A visible left-aligned column.
    pub fn new(header: &'static str, accessor: fn(&T) -> String) -> Self {
        Self {
            header,
            accessor,
            align: Align::Left,
            visible: true,
        }
    }

    /// A visible right-aligned column (numeric cells).
    pub fn numeric(header: &'static str, accessor: fn(&T) -> String) -> Self {
        Self {
            header,
            accessor,
            align: Align::Right,
            visible: true,
        }
    }
}

/// Presentation state for a live collection of `T`.
pub struct ResourceTable<T: Resource> {
    columns: Vec<Column<T>>,
    /// `None` until the first snapshot arrives (loading state).
    rows: Option<Vec<T>>,
    filter: String,
    page: usize,
    page_size: usize,
    editing: Option<RecordId>,
    error: Option<String>,
}

impl<T: Resource> ResourceTable<T> {
    /// Create a table in the loading state.
    pub fn new(columns: Vec<Column<T>>, page_size: usize) -> Self {
        Self {
            columns,
            rows: None,
            filter: String::new(),
            page: 0,
            page_size: page_size.max(1),
            editing: None,
            error: None,
        }
    }

    /// True until the first snapshot has been applied.
    ///
    /// Renderers show a structural skeleton while loading instead of an
    /// empty table.
    pub fn is_loading(&self) -> bool {
        self.rows.is_none()
    }

    /// The current subscription error, if the stream degraded.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Replace the row set wholesale from a fresh snapshot.
    pub fn apply_snapshot(&mut self, rows: Vec<T>) {
        self.rows = Some(rows);
        self.error = None;
        self.clamp_page();
    }

    /// Degrade to an empty list plus a visible error state.
    ///
    /// Subscription failures never crash the view; they surface here and
    /// through the caller's notice channel.
    pub fn subscription_failed(&mut self, message: impl Into<String>) {
        self.rows = Some(Vec::new());
        self.error = Some(message.into());
        self.page = 0;
    }

    /// Set the global free-text filter and reset to the first page.
    pub fn set_filter(&mut self, text: impl Into<String>) {
        self.filter = text.into();
        self.page = 0;
    }

    /// All rows passing the free-text filter, in snapshot order.
    pub fn visible_rows(&self) -> Vec<&T> {
        let needle = self.filter.to_lowercase();
        self.rows
            .as_deref()
            .unwrap_or_default()
            .iter()
            .filter(|row| {
                needle.is_empty() || row.filter_haystack().to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Number of pages for the current filter (at least 1).
    pub fn page_count(&self) -> usize {
        let rows = self.visible_rows().len();
        rows.div_ceil(self.page_size).max(1)
    }

    /// Zero-based current page.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Jump to a page, clamped to the valid range.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.min(self.page_count() - 1);
    }

    /// Advance one page if possible.
    pub fn next_page(&mut self) {
        self.set_page(self.page + 1);
    }

    /// Go back one page if possible.
    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    /// Rows of the current page.
    pub fn page_rows(&self) -> Vec<&T> {
        let rows = self.visible_rows();
        rows.into_iter()
            .skip(self.page * self.page_size)
            .take(self.page_size)
            .collect()
    }

    /// The currently visible columns.
    pub fn visible_columns(&self) -> Vec<&Column<T>> {
        self.columns.iter().filter(|c| c.visible).collect()
    }

    /// Show or hide a column by header label.
    pub fn set_column_visible(&mut self, header: &str, visible: bool) {
        for column in &mut self.columns {
            if column.header.eq_ignore_ascii_case(header) {
                column.visible = visible;
            }
        }
    }

    /// Restrict visibility to the named columns.
    pub fn retain_columns(&mut self, headers: &[&str]) {
        for column in &mut self.columns {
            column.visible = headers
                .iter()
                .any(|h| column.header.eq_ignore_ascii_case(h));
        }
    }

    /// Point the edit form at a row.
    ///
    /// Only the id is held (a weak reference): the row data is read at
    /// open time via [`editing_row`](Self::editing_row), so the form sees
    /// whatever the latest snapshot says. Saves are last-write-wins.
    pub fn begin_edit(&mut self, id: RecordId) {
        self.editing = Some(id);
    }

    /// The row the edit pointer currently resolves to.
    pub fn editing_row(&self) -> Option<&T> {
        let id = self.editing.as_ref()?;
        self.rows
            .as_deref()?
            .iter()
            .find(|row| row.id() == id)
    }

    /// Drop the edit pointer.
    pub fn clear_edit(&mut self) {
        self.editing = None;
    }

    /// Total row count (unfiltered).
    pub fn len(&self) -> usize {
        self.rows.as_deref().map(<[T]>::len).unwrap_or(0)
    }

    /// True when the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Optimistically remove a row, returning it with its index so a
    /// failed delete can roll back.
    pub fn take_row(&mut self, id: &RecordId) -> Option<(usize, T)> {
        let rows = self.rows.as_mut()?;
        let index = rows.iter().position(|row| row.id() == id)?;
        Some((index, rows.remove(index)))
    }

    /// Put back a row removed by [`take_row`](Self::take_row).
    pub fn restore_row(&mut self, index: usize, row: T) {
        if let Some(rows) = self.rows.as_mut() {
            let index = index.min(rows.len());
            rows.insert(index, row);
        }
    }

    fn clamp_page(&mut self) {
        self.page = self.page.min(self.page_count() - 1);
    }
}

/// Result of one delete interaction.
#[derive(Debug)]
pub enum DeleteOutcome {
    /// The row was removed and the store confirmed the delete.
    Deleted,
    /// The user declined the confirmation; nothing changed.
    Cancelled,
    /// The store rejected the delete; the optimistic removal was rolled
    /// back. Distinct from cancellation.
    Failed(Error),
}

/// Run the confirm → optimistic remove → store delete flow.
///
/// The row disappears from the table before the adapter call resolves;
/// if the adapter then fails, the row is restored at its old position and
/// the failure is reported separately from user cancellation.
pub async fn delete_record<T, S>(
    session: &S,
    table: &mut ResourceTable<T>,
    id: &RecordId,
    confirmed: bool,
) -> DeleteOutcome
where
    T: Resource,
    S: Session,
{
    if !confirmed {
        return DeleteOutcome::Cancelled;
    }

    let removed = table.take_row(id);

    match session.delete(&T::collection(), id).await {
        Ok(()) => DeleteOutcome::Deleted,
        Err(e) => {
            if let Some((index, row)) = removed {
                table.restore_row(index, row);
            }
            DeleteOutcome::Failed(e)
        }
    }
}

/// Fetch a collection once and populate a table with it.
pub async fn load_into<T, S>(
    session: &S,
    table: &mut ResourceTable<T>,
) -> Result<()>
where
    T: Resource,
    S: Session,
{
    let records = session.list(&T::collection(), &T::default_order()).await?;
    let rows = crate::documents::decode_all(&records)?;
    table.apply_snapshot(rows);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::{RawRecord, SortSpec};
    use crate::error::AdapterError;
    use crate::types::{AccessToken, Collection, Fields, StoreUrl};
    use async_trait::async_trait;
    use serde::{Deserialize, Serialize};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct Pad {
        id: RecordId,
        name: String,
    }

    impl Pad {
        fn new(id: &str, name: &str) -> Self {
            Self {
                id: RecordId::new(id).unwrap(),
                name: name.to_string(),
            }
        }
    }

    impl Resource for Pad {
        fn collection() -> Collection {
            Collection::new("pads").expect("static collection name")
        }

        fn id(&self) -> &RecordId {
            &self.id
        }

        fn label(&self) -> &str {
            &self.name
        }

        fn filter_haystack(&self) -> String {
            self.name.clone()
        }
    }

    fn columns() -> Vec<Column<Pad>> {
        vec![
            Column::new("Name", |p: &Pad| p.name.clone()),
            Column::new("Id", |p: &Pad| p.id.to_string()),
        ]
    }

    struct DeletingSession {
        fail: bool,
        deletes: AtomicUsize,
    }

    impl DeletingSession {
        fn new(fail: bool) -> Self {
            Self {
                fail,
                deletes: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Session for DeletingSession {
        fn uid(&self) -> &RecordId {
            static UID: std::sync::OnceLock<RecordId> = std::sync::OnceLock::new();
            UID.get_or_init(|| RecordId::new("admin").unwrap())
        }

        fn store_url(&self) -> &StoreUrl {
            static URL: std::sync::OnceLock<StoreUrl> = std::sync::OnceLock::new();
            URL.get_or_init(|| StoreUrl::new("file:///tmp/test-store").unwrap())
        }

        fn access_token(&self) -> AccessToken {
            AccessToken::new("test")
        }

        async fn list(&self, _: &Collection, _: &SortSpec) -> Result<Vec<RawRecord>> {
            Ok(Vec::new())
        }

        async fn get(&self, _: &Collection, id: &RecordId) -> Result<RawRecord> {
            Err(AdapterError::NotFound {
                what: id.to_string(),
            }
            .into())
        }

        async fn create(&self, _: &Collection, _: Fields) -> Result<RecordId> {
            RecordId::new("x")
        }

        async fn update(&self, _: &Collection, _: &RecordId, _: Fields, _: bool) -> Result<()> {
            Ok(())
        }

        async fn delete(&self, _: &Collection, _: &RecordId) -> Result<()> {
            self.deletes.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(AdapterError::Network {
                    message: "connection reset".to_string(),
                }
                .into())
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn starts_loading_until_first_snapshot() {
        let mut table = ResourceTable::new(columns(), 10);
        assert!(table.is_loading());

        table.apply_snapshot(vec![Pad::new("a", "Alpha")]);
        assert!(!table.is_loading());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn snapshot_replaces_rows_wholesale() {
        let mut table = ResourceTable::new(columns(), 10);
        table.apply_snapshot(vec![Pad::new("a", "Alpha"), Pad::new("b", "Beta")]);
        table.apply_snapshot(vec![Pad::new("c", "Gamma")]);

        let names: Vec<String> = table.visible_rows().iter().map(|p| p.name.clone()).collect();
        assert_eq!(names, vec!["Gamma"]);
    }

    #[test]
    fn free_text_filter_is_case_insensitive() {
        let mut table = ResourceTable::new(columns(), 10);
        table.apply_snapshot(vec![
            Pad::new("a", "Balayage"),
            Pad::new("b", "Cut"),
            Pad::new("c", "Root balayage touch-up"),
        ]);

        table.set_filter("BALAYAGE");
        let names: Vec<&str> = table.visible_rows().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Balayage", "Root balayage touch-up"]);
    }

    #[test]
    fn pagination_pages_and_clamps() {
        let mut table = ResourceTable::new(columns(), 2);
        table.apply_snapshot(vec![
            Pad::new("a", "one"),
            Pad::new("b", "two"),
            Pad::new("c", "three"),
            Pad::new("d", "four"),
            Pad::new("e", "five"),
        ]);

        assert_eq!(table.page_count(), 3);
        assert_eq!(table.page_rows().len(), 2);

        table.set_page(99);
        assert_eq!(table.page(), 2);
        assert_eq!(table.page_rows().len(), 1);

        table.prev_page();
        assert_eq!(table.page(), 1);
    }

    #[test]
    fn column_visibility_toggles() {
        let mut table = ResourceTable::new(columns(), 10);
        table.apply_snapshot(vec![Pad::new("a", "Alpha")]);

        assert_eq!(table.visible_columns().len(), 2);
        table.set_column_visible("id", false);
        assert_eq!(table.visible_columns().len(), 1);

        table.retain_columns(&["Id"]);
        let headers: Vec<&str> = table.visible_columns().iter().map(|c| c.header).collect();
        assert_eq!(headers, vec!["Id"]);
    }

    #[test]
    fn edit_pointer_reads_current_data() {
        let mut table = ResourceTable::new(columns(), 10);
        table.apply_snapshot(vec![Pad::new("a", "Old name")]);
        table.begin_edit(RecordId::new("a").unwrap());

        // Another client renames the record; the next snapshot arrives.
        table.apply_snapshot(vec![Pad::new("a", "New name")]);

        assert_eq!(table.editing_row().map(|p| p.name.as_str()), Some("New name"));

        // The record disappears entirely: the weak reference dangles.
        table.apply_snapshot(vec![]);
        assert!(table.editing_row().is_none());
    }

    #[test]
    fn subscription_failure_degrades_to_empty_plus_error() {
        let mut table = ResourceTable::new(columns(), 10);
        table.apply_snapshot(vec![Pad::new("a", "Alpha")]);

        table.subscription_failed("permission denied");

        assert!(!table.is_loading());
        assert_eq!(table.len(), 0);
        assert_eq!(table.error(), Some("permission denied"));

        // A later healthy snapshot clears the error.
        table.apply_snapshot(vec![Pad::new("a", "Alpha")]);
        assert!(table.error().is_none());
    }

    #[test]
    fn take_row_removes_immediately() {
        let mut table = ResourceTable::new(columns(), 10);
        table.apply_snapshot(vec![Pad::new("a", "Alpha"), Pad::new("b", "Beta")]);

        let taken = table.take_row(&RecordId::new("a").unwrap());

        assert!(taken.is_some());
        assert_eq!(table.len(), 1);
    }

    #[tokio::test]
    async fn cancelled_delete_touches_nothing() {
        let session = DeletingSession::new(false);
        let mut table = ResourceTable::new(columns(), 10);
        table.apply_snapshot(vec![Pad::new("a", "Alpha")]);

        let outcome =
            delete_record(&session, &mut table, &RecordId::new("a").unwrap(), false).await;

        assert!(matches!(outcome, DeleteOutcome::Cancelled));
        assert_eq!(table.len(), 1);
        assert_eq!(session.deletes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn confirmed_delete_removes_and_confirms() {
        let session = DeletingSession::new(false);
        let mut table = ResourceTable::new(columns(), 10);
        table.apply_snapshot(vec![Pad::new("a", "Alpha"), Pad::new("b", "Beta")]);

        let outcome =
            delete_record(&session, &mut table, &RecordId::new("a").unwrap(), true).await;

        assert!(matches!(outcome, DeleteOutcome::Deleted));
        assert_eq!(table.len(), 1);
        assert_eq!(session.deletes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_delete_rolls_back_at_the_old_position() {
        let session = DeletingSession::new(true);
        let mut table = ResourceTable::new(columns(), 10);
        table.apply_snapshot(vec![
            Pad::new("a", "Alpha"),
            Pad::new("b", "Beta"),
            Pad::new("c", "Gamma"),
        ]);

        let outcome =
            delete_record(&session, &mut table, &RecordId::new("b").unwrap(), true).await;

        assert!(matches!(outcome, DeleteOutcome::Failed(_)));
        let names: Vec<&str> = table.visible_rows().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Beta", "Gamma"]);
    }
}
