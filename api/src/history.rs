use crate::db::repository::HistoryDb;
use crate::domain::request::ApiRequest;

/// FIFO window over the combined stream of compared requests.
pub const MAX_HISTORY_ENTRIES: usize = 5;

/// Insertion-ordered log of past requests, most recent last, capped at
/// [`MAX_HISTORY_ENTRIES`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HistoryLog {
    entries: Vec<ApiRequest>,
}

impl HistoryLog {
    pub fn new(entries: Vec<ApiRequest>) -> Self {
        let mut log = HistoryLog { entries };
        log.truncate_to_cap();
        log
    }

    /// Pushes both sides of a comparison, then drops the oldest entries
    /// until the cap holds again.
    pub fn append_comparison(&mut self, request1: ApiRequest, request2: ApiRequest) {
        self.entries.push(request1);
        self.entries.push(request2);
        self.truncate_to_cap();
    }

    /// Removes by stored position. Field-identical entries are distinct
    /// rows, so deletion is by index rather than value equality;
    /// out-of-range is a no-op.
    pub fn remove(&mut self, index: usize) -> Option<ApiRequest> {
        if index < self.entries.len() {
            Some(self.entries.remove(index))
        } else {
            None
        }
    }

    pub fn entries(&self) -> &[ApiRequest] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn truncate_to_cap(&mut self) {
        if self.entries.len() > MAX_HISTORY_ENTRIES {
            let excess = self.entries.len() - MAX_HISTORY_ENTRIES;
            self.entries.drain(..excess);
        }
    }
}

/// In-memory log paired with its durable copy. Loaded once at startup;
/// every mutation persists immediately so the stored log never lags by
/// more than one operation.
pub struct HistoryStore {
    pub db: HistoryDb,
    log: HistoryLog,
}

impl HistoryStore {
    pub async fn open(db_url: &str) -> anyhow::Result<Self> {
        let mut db = HistoryDb::connect(db_url).await?;
        let log = db.load().await?;
        Ok(HistoryStore { db, log })
    }

    pub async fn append_comparison(
        &mut self,
        request1: ApiRequest,
        request2: ApiRequest,
    ) -> anyhow::Result<()> {
        self.log.append_comparison(request1, request2);
        self.db.persist(&self.log).await
    }

    pub async fn remove(&mut self, index: usize) -> anyhow::Result<Option<ApiRequest>> {
        let removed = self.log.remove(index);
        if removed.is_some() {
            self.db.persist(&self.log).await?;
        }
        Ok(removed)
    }

    pub fn log(&self) -> &HistoryLog {
        &self.log
    }
}

/// The two editable request slots of the frontend.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComparisonForm {
    pub request1: ApiRequest,
    pub request2: ApiRequest,
}

impl ComparisonForm {
    /// Copies a history entry into the first slot and resets the second
    /// to an empty default. A projection only; the log is untouched.
    pub fn load_entry(&mut self, entry: &ApiRequest) {
        self.request1 = entry.clone();
        self.request2 = ApiRequest::default();
    }
}
