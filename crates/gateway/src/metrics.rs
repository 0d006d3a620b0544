use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use reviewer::{Analysis, InsightSource};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Request counters for the gateway.
#[derive(Clone)]
pub struct GatewayMetrics {
    inner: Arc<GatewayMetricsInner>,
}

#[derive(Default)]
struct GatewayMetricsInner {
    started_at: DateTime<Utc>,

    /// Uploads that produced an analysis
    analyses: AtomicU64,

    /// Entries parsed across all analyses
    entries_parsed: AtomicU64,

    llm_insights: AtomicU64,
    heuristic_insights: AtomicU64,

    /// Rejected uploads keyed by error code
    rejected_uploads: RwLock<HashMap<&'static str, u64>>,

    searches: AtomicU64,
    failed_searches: AtomicU64,
}

#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub started_at: DateTime<Utc>,
    pub uptime_secs: i64,
    pub analyses: u64,
    pub entries_parsed: u64,
    pub insights: InsightCounts,
    pub rejected_uploads: HashMap<&'static str, u64>,
    pub rejected_total: u64,
    pub searches: SearchCounts,
}

#[derive(Debug, Serialize)]
pub struct InsightCounts {
    pub llm: u64,
    pub heuristic: u64,
}

#[derive(Debug, Serialize)]
pub struct SearchCounts {
    pub total: u64,
    pub failed: u64,
}

impl GatewayMetrics {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(GatewayMetricsInner {
                started_at: Utc::now(),
                ..GatewayMetricsInner::default()
            }),
        }
    }

    pub fn analysis_completed(&self, analysis: &Analysis) {
        self.inner.analyses.fetch_add(1, Ordering::Relaxed);
        self.inner
            .entries_parsed
            .fetch_add(analysis.entries.len() as u64, Ordering::Relaxed);

        let counter = match analysis.insights.source {
            InsightSource::Llm => &self.inner.llm_insights,
            InsightSource::Heuristic => &self.inner.heuristic_insights,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn upload_rejected(&self, code: &'static str) {
        *self.inner.rejected_uploads.write().entry(code).or_insert(0) += 1;
        tracing::debug!(code, "Upload rejected");
    }

    pub fn search_completed(&self, succeeded: bool) {
        self.inner.searches.fetch_add(1, Ordering::Relaxed);
        if !succeeded {
            self.inner.failed_searches.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn analyses(&self) -> u64 {
        self.inner.analyses.load(Ordering::Relaxed)
    }

    pub fn rejected_total(&self) -> u64 {
        self.inner.rejected_uploads.read().values().sum()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let started_at = self.inner.started_at;
        MetricsSnapshot {
            started_at,
            uptime_secs: (Utc::now() - started_at).num_seconds(),
            analyses: self.analyses(),
            entries_parsed: self.inner.entries_parsed.load(Ordering::Relaxed),
            insights: InsightCounts {
                llm: self.inner.llm_insights.load(Ordering::Relaxed),
                heuristic: self.inner.heuristic_insights.load(Ordering::Relaxed),
            },
            rejected_uploads: self.inner.rejected_uploads.read().clone(),
            rejected_total: self.rejected_total(),
            searches: SearchCounts {
                total: self.inner.searches.load(Ordering::Relaxed),
                failed: self.inner.failed_searches.load(Ordering::Relaxed),
            },
        }
    }
}
