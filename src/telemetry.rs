use std::collections::VecDeque;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::Serialize;
use tokio::sync::Mutex;

use crate::types::Classification;

const MAX_RECENT_PREDICTIONS: usize = 50;

#[derive(Debug, Clone, Serialize)]
pub struct ApiPrediction {
    pub timestamp: u64,
    pub prediction: u8,
    pub confidence: f32,
    pub class_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    pub predictions: u64,
    pub samples_generated: u64,
    pub rejected_inputs: u64,
    pub uptime: String,
}

#[derive(Debug, Default)]
struct StatsCounters {
    predictions: u64,
    samples_generated: u64,
    rejected_inputs: u64,
}

pub struct TelemetryStore {
    start_time: SystemTime,
    stats: Mutex<StatsCounters>,
    recent: Mutex<VecDeque<ApiPrediction>>,
}

impl TelemetryStore {
    pub fn new() -> Self {
        TelemetryStore {
            start_time: SystemTime::now(),
            stats: Mutex::new(StatsCounters::default()),
            recent: Mutex::new(VecDeque::with_capacity(MAX_RECENT_PREDICTIONS)),
        }
    }

    pub async fn snapshot_stats(&self) -> StatsSnapshot {
        let stats = self.stats.lock().await;
        StatsSnapshot {
            predictions: stats.predictions,
            samples_generated: stats.samples_generated,
            rejected_inputs: stats.rejected_inputs,
            uptime: format_uptime(
                SystemTime::now()
                    .duration_since(self.start_time)
                    .unwrap_or(Duration::from_secs(0)),
            ),
        }
    }

    pub async fn recent_predictions(&self) -> Vec<ApiPrediction> {
        let recent = self.recent.lock().await;
        recent.iter().cloned().collect()
    }

    pub async fn record_prediction(&self, result: &Classification) {
        {
            let mut stats = self.stats.lock().await;
            stats.predictions = stats.predictions.saturating_add(1);
        }

        let mut recent = self.recent.lock().await;
        recent.push_front(ApiPrediction {
            timestamp: epoch_seconds(SystemTime::now()),
            prediction: result.class.as_id(),
            confidence: result.confidence,
            class_name: result.class.label().to_string(),
        });
        while recent.len() > MAX_RECENT_PREDICTIONS {
            recent.pop_back();
        }
    }

    pub async fn record_sample(&self) {
        let mut stats = self.stats.lock().await;
        stats.samples_generated = stats.samples_generated.saturating_add(1);
    }

    pub async fn record_rejected(&self) {
        let mut stats = self.stats.lock().await;
        stats.rejected_inputs = stats.rejected_inputs.saturating_add(1);
    }
}

fn epoch_seconds(timestamp: SystemTime) -> u64 {
    timestamp
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::from_secs(0))
        .as_secs()
}

fn format_uptime(duration: Duration) -> String {
    let total_minutes = duration.as_secs() / 60;
    let days = total_minutes / (24 * 60);
    let hours = (total_minutes / 60) % 24;
    let minutes = total_minutes % 60;
    format!("{}d {}h {}m", days, hours, minutes)
}
