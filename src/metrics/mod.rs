//! In-process metrics for the vessel risk engine
//!
//! Counters and latency histograms, exported as JSON or Prometheus text at
//! `/metrics`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

/// Process-wide metrics registry
pub struct MetricsRegistry {
    counters: RwLock<HashMap<String, Arc<AtomicU64>>>,
    histograms: RwLock<HashMap<String, Arc<Histogram>>>,
    start_time: Instant,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self {
            counters: RwLock::new(HashMap::new()),
            histograms: RwLock::new(HashMap::new()),
            start_time: Instant::now(),
        }
    }

    /// Increment a counter
    pub async fn inc_counter(&self, name: &str) {
        self.add_counter(name, 1).await;
    }

    /// Add to a counter
    pub async fn add_counter(&self, name: &str, value: u64) {
        let counters = self.counters.read().await;
        if let Some(counter) = counters.get(name) {
            counter.fetch_add(value, Ordering::Relaxed);
            return;
        }
        drop(counters);

        let mut counters = self.counters.write().await;
        let counter = counters
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(AtomicU64::new(0)));
        counter.fetch_add(value, Ordering::Relaxed);
    }

    pub async fn get_counter(&self, name: &str) -> u64 {
        let counters = self.counters.read().await;
        counters
            .get(name)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Record a histogram observation
    pub async fn observe_histogram(&self, name: &str, value: f64) {
        let histograms = self.histograms.read().await;
        if let Some(histogram) = histograms.get(name) {
            histogram.observe(value);
            return;
        }
        drop(histograms);

        let mut histograms = self.histograms.write().await;
        let histogram = histograms
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Histogram::default()));
        histogram.observe(value);
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// All metrics as JSON
    pub async fn to_json(&self) -> serde_json::Value {
        let counters = self.counters.read().await;
        let histograms = self.histograms.read().await;

        let counter_values: HashMap<String, u64> = counters
            .iter()
            .map(|(k, v)| (k.clone(), v.load(Ordering::Relaxed)))
            .collect();
        let histogram_values: HashMap<String, serde_json::Value> = histograms
            .iter()
            .map(|(k, h)| (k.clone(), h.to_json()))
            .collect();

        serde_json::json!({
            "uptime_seconds": self.uptime_seconds(),
            "counters": counter_values,
            "histograms": histogram_values,
        })
    }

    /// Prometheus text exposition
    pub async fn to_prometheus(&self) -> String {
        let counters = self.counters.read().await;
        let histograms = self.histograms.read().await;

        let mut output = String::new();
        output.push_str("# HELP vessel_risk_uptime_seconds Time since service start\n");
        output.push_str("# TYPE vessel_risk_uptime_seconds gauge\n");
        output.push_str(&format!(
            "vessel_risk_uptime_seconds {}\n\n",
            self.uptime_seconds()
        ));

        let mut names: Vec<_> = counters.keys().collect();
        names.sort();
        for name in names {
            let prometheus_name = prometheus_name(name);
            output.push_str(&format!("# TYPE {} counter\n", prometheus_name));
            output.push_str(&format!(
                "{} {}\n",
                prometheus_name,
                counters[name].load(Ordering::Relaxed)
            ));
        }

        for (name, histogram) in histograms.iter() {
            output.push_str(&histogram.to_prometheus(name));
        }

        output
    }
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn prometheus_name(name: &str) -> String {
    name.replace(['.', '-'], "_")
}

/// Fixed-bucket histogram
pub struct Histogram {
    buckets: Vec<f64>,
    counts: Vec<AtomicU64>,
    /// Sum in milliseconds
    sum_millis: AtomicU64,
    count: AtomicU64,
}

impl Histogram {
    pub fn new(buckets: Vec<f64>) -> Self {
        let counts = buckets.iter().map(|_| AtomicU64::new(0)).collect();
        Self {
            buckets,
            counts,
            sum_millis: AtomicU64::new(0),
            count: AtomicU64::new(0),
        }
    }

    pub fn observe(&self, value: f64) {
        self.sum_millis
            .fetch_add((value * 1000.0) as u64, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);

        if let Some(i) = self.buckets.iter().position(|b| value <= *b) {
            self.counts[i].fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    fn sum(&self) -> f64 {
        self.sum_millis.load(Ordering::Relaxed) as f64 / 1000.0
    }

    pub fn to_json(&self) -> serde_json::Value {
        let bucket_counts: Vec<u64> = self
            .counts
            .iter()
            .map(|c| c.load(Ordering::Relaxed))
            .collect();

        serde_json::json!({
            "buckets": self.buckets,
            "counts": bucket_counts,
            "sum": self.sum(),
            "count": self.count(),
        })
    }

    pub fn to_prometheus(&self, name: &str) -> String {
        let prometheus_name = prometheus_name(name);
        let mut output = format!("# TYPE {} histogram\n", prometheus_name);

        let mut cumulative = 0u64;
        for (bucket, count) in self.buckets.iter().zip(&self.counts) {
            cumulative += count.load(Ordering::Relaxed);
            output.push_str(&format!(
                "{}_bucket{{le=\"{}\"}} {}\n",
                prometheus_name, bucket, cumulative
            ));
        }
        output.push_str(&format!(
            "{}_bucket{{le=\"+Inf\"}} {}\n",
            prometheus_name,
            self.count()
        ));
        output.push_str(&format!("{}_sum {}\n", prometheus_name, self.sum()));
        output.push_str(&format!("{}_count {}\n", prometheus_name, self.count()));

        output
    }
}

impl Default for Histogram {
    fn default() -> Self {
        // Aggregations wait on provider calls with 60-120s timeouts.
        Self::new(vec![
            0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0,
        ])
    }
}

/// Metric names
pub mod metric_names {
    pub const AGGREGATIONS: &str = "vessel_risk.aggregations.completed";
    pub const AGGREGATIONS_NO_DATA: &str = "vessel_risk.aggregations.no_data";
    pub const PROVIDER_ERRORS: &str = "vessel_risk.errors.provider";
    pub const PROVIDER_AUTH_ERRORS: &str = "vessel_risk.errors.provider_auth";
    pub const PERSISTENCE_FAILURES: &str = "vessel_risk.errors.persistence";
    pub const ENTITY_CLASSIFICATIONS: &str = "vessel_risk.entities.classified";

    pub const AGGREGATE_LATENCY: &str = "vessel_risk.aggregate.latency_seconds";
}

/// Time an async operation into a histogram
pub async fn timed<F, T>(metrics: &MetricsRegistry, metric_name: &str, f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    let start = Instant::now();
    let result = f.await;
    metrics
        .observe_histogram(metric_name, start.elapsed().as_secs_f64())
        .await;
    result
}
