//! Per-user dashboard state: the uploaded file, its prepared table, and the
//! active filter. Everything the views render is derived from here.

use std::collections::VecDeque;
use std::sync::Arc;

use sha2::{Digest, Sha256};
use time::OffsetDateTime;
use tracing::{debug, info};

use super::config::DashboardConfig;
use super::error::LoadError;
use super::filter::{FilterOptions, ViewFilter};
use super::ingest::{load_upload, UploadFormat};
use super::metrics::TableMetrics;
use super::prepare::{prepare, PreparedTable};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadInfo {
    pub name: String,
    pub size: usize,
    /// Lowercase hex SHA-256 of the file bytes.
    pub digest: String,
    pub loaded_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CacheKey {
    digest: [u8; 32],
    format: UploadFormat,
}

/// Most recently used entries at the back.
#[derive(Debug, Default)]
struct ParseCache {
    capacity: usize,
    entries: VecDeque<(CacheKey, Arc<PreparedTable>)>,
}

impl ParseCache {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    fn get(&mut self, key: &CacheKey) -> Option<Arc<PreparedTable>> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        let entry = self.entries.remove(pos)?;
        let table = Arc::clone(&entry.1);
        self.entries.push_back(entry);
        Some(table)
    }

    fn insert(&mut self, key: CacheKey, table: Arc<PreparedTable>) {
        if self.capacity == 0 {
            return;
        }
        self.entries.retain(|(k, _)| k != &key);
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back((key, table));
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[derive(Debug)]
pub struct Session {
    config: DashboardConfig,
    upload: Option<UploadInfo>,
    table: Option<Arc<PreparedTable>>,
    filter: ViewFilter,
    view: Option<Arc<PreparedTable>>,
    metrics: Option<TableMetrics>,
    cache: ParseCache,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DashboardConfig::default())
    }
}

impl Session {
    pub fn new(config: DashboardConfig) -> Self {
        let cache = ParseCache::new(config.cache_capacity);
        Self {
            config,
            upload: None,
            table: None,
            filter: ViewFilter::default(),
            view: None,
            metrics: None,
            cache,
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn upload_info(&self) -> Option<&UploadInfo> {
        self.upload.as_ref()
    }

    /// Replace the current dataset. On error the session keeps whatever it
    /// held before.
    pub fn upload(&mut self, file_name: &str, bytes: &[u8]) -> Result<(), LoadError> {
        let format = UploadFormat::detect(file_name)?;
        let digest: [u8; 32] = Sha256::digest(bytes).into();
        let key = CacheKey { digest, format };

        let table = match self.cache.get(&key) {
            Some(table) => {
                debug!(file = file_name, "reusing prepared table for identical upload");
                table
            }
            None => {
                let raw = load_upload(file_name, bytes)?;
                let table = Arc::new(prepare(&raw, &self.config));
                self.cache.insert(key, Arc::clone(&table));
                table
            }
        };

        self.upload = Some(UploadInfo {
            name: file_name.to_string(),
            size: bytes.len(),
            digest: hex(&digest),
            loaded_at: OffsetDateTime::now_utc(),
        });
        self.table = Some(table);
        self.filter = ViewFilter::default();
        self.refresh_view();
        info!(file = file_name, size = bytes.len(), "upload ready");
        Ok(())
    }

    pub fn filter(&self) -> &ViewFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: ViewFilter) {
        if filter == self.filter {
            return;
        }
        debug!(?filter, "filter changed");
        self.filter = filter;
        self.refresh_view();
    }

    /// The unfiltered prepared table.
    pub fn table(&self) -> Option<&PreparedTable> {
        self.table.as_deref()
    }

    /// The prepared table with the active filter applied.
    pub fn view(&self) -> Option<&PreparedTable> {
        self.view.as_deref()
    }

    /// Metrics of the filtered view.
    pub fn metrics(&self) -> Option<&TableMetrics> {
        self.metrics.as_ref()
    }

    /// Filter choices always come from the unfiltered table.
    pub fn filter_options(&self) -> Option<FilterOptions> {
        self.table().map(FilterOptions::from_table)
    }

    /// Forget the current upload; cached tables are kept.
    pub fn clear(&mut self) {
        self.upload = None;
        self.table = None;
        self.view = None;
        self.metrics = None;
        self.filter = ViewFilter::default();
    }

    fn refresh_view(&mut self) {
        let Some(table) = &self.table else {
            self.view = None;
            self.metrics = None;
            return;
        };
        let view = if self.filter.is_active() {
            Arc::new(self.filter.apply(table))
        } else {
            Arc::clone(table)
        };
        self.metrics = Some(TableMetrics::from_table(&view, &self.config));
        self.view = Some(view);
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|byte| format!("{byte:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::Selection;

    const CSV: &str = "Cliente,Prioridade,Já registradas h\nAcme,Alta,10\nGlobex,Baixa,5\nAcme,Baixa,1\n";

    #[test]
    fn upload_prepares_table_and_metrics() {
        let mut session = Session::default();
        session.upload("tasks.csv", CSV.as_bytes()).unwrap();
        assert_eq!(session.table().unwrap().len(), 3);
        let metrics = session.metrics().unwrap();
        assert_eq!(metrics.total_rows, 3);
        assert_eq!(metrics.total_logged_hours, 16.0);
        let info = session.upload_info().unwrap();
        assert_eq!(info.size, CSV.len());
        assert_eq!(info.digest.len(), 64);
    }

    #[test]
    fn identical_bytes_hit_the_cache() {
        let mut session = Session::default();
        session.upload("a.csv", CSV.as_bytes()).unwrap();
        let first = Arc::clone(session.table.as_ref().unwrap());
        session.upload("b.csv", CSV.as_bytes()).unwrap();
        let second = session.table.as_ref().unwrap();
        assert!(Arc::ptr_eq(&first, second));
        assert_eq!(session.cache.len(), 1);
        assert_eq!(session.upload_info().unwrap().name, "b.csv");
    }

    #[test]
    fn cache_is_bounded() {
        let config = DashboardConfig {
            cache_capacity: 2,
            ..DashboardConfig::default()
        };
        let mut session = Session::new(config);
        for n in 0..5 {
            let csv = format!("Cliente\nC{n}\n");
            session.upload("t.csv", csv.as_bytes()).unwrap();
        }
        assert_eq!(session.cache.len(), 2);
    }

    #[test]
    fn filter_narrows_view_but_not_table() {
        let mut session = Session::default();
        session.upload("tasks.csv", CSV.as_bytes()).unwrap();
        session.set_filter(ViewFilter {
            client: Selection::Only("Acme".into()),
            ..ViewFilter::default()
        });
        assert_eq!(session.view().unwrap().len(), 2);
        assert_eq!(session.table().unwrap().len(), 3);
        assert_eq!(session.metrics().unwrap().total_logged_hours, 11.0);
        let options = session.filter_options().unwrap();
        assert_eq!(options.clients.unwrap().len(), 2);
    }

    #[test]
    fn new_upload_resets_filter() {
        let mut session = Session::default();
        session.upload("tasks.csv", CSV.as_bytes()).unwrap();
        session.set_filter(ViewFilter {
            priority: Selection::Only("Alta".into()),
            ..ViewFilter::default()
        });
        session.upload("tasks.csv", CSV.as_bytes()).unwrap();
        assert!(!session.filter().is_active());
        assert_eq!(session.view().unwrap().len(), 3);
    }

    #[test]
    fn failed_upload_keeps_previous_state() {
        let mut session = Session::default();
        session.upload("tasks.csv", CSV.as_bytes()).unwrap();
        assert!(session.upload("notes.pdf", b"%PDF").is_err());
        assert!(session.upload("empty.csv", b"").is_err());
        assert_eq!(session.upload_info().unwrap().name, "tasks.csv");
        assert_eq!(session.table().unwrap().len(), 3);
    }

    #[test]
    fn digest_is_lowercase_hex() {
        assert_eq!(hex(&[0x00, 0x0f, 0xab, 0xff]), "000fabff");
        let mut session = Session::default();
        session.upload("tasks.csv", CSV.as_bytes()).unwrap();
        let digest = &session.upload_info().unwrap().digest;
        assert!(digest
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn clear_forgets_upload() {
        let mut session = Session::default();
        session.upload("tasks.csv", CSV.as_bytes()).unwrap();
        session.clear();
        assert!(session.table().is_none());
        assert!(session.metrics().is_none());
        assert!(session.upload_info().is_none());
    }
}
