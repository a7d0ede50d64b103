use crate::model::Entity;
use serde::Serialize;

pub const BUCKETS: usize = 8;
pub const BUCKET_WIDTH: f64 = 12.5;
/// Height of the tallest bar, in percent of the plot area.
const MAX_BAR_PCT: f64 = 90.0;

/// Heuristic score in `[0, 100]`: `min(100, txCount * uniqueSenders * 2)`.
pub fn risk_score(entity: &Entity) -> f64 {
    (entity.tx_count as f64 * entity.unique_senders as f64 * 2.0).min(100.0)
}

pub fn bucket_index(score: f64) -> usize {
    // NaN and negatives saturate to 0 in the cast.
    ((score / BUCKET_WIDTH).floor() as usize).min(BUCKETS - 1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BarTone {
    Muted,
    Info,
    Warning,
    Danger,
}

impl BarTone {
    fn for_bucket(index: usize) -> Self {
        match index {
            i if i > 6 => BarTone::Danger,
            i if i > 4 => BarTone::Warning,
            i if i > 2 => BarTone::Info,
            _ => BarTone::Muted,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramBar {
    pub count: usize,
    pub height_pct: f64,
    pub tone: BarTone,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskHistogram {
    pub entity_count: usize,
    pub bars: Vec<HistogramBar>,
}

impl RiskHistogram {
    pub fn counts(&self) -> Vec<usize> {
        self.bars.iter().map(|b| b.count).collect()
    }
}

pub fn risk_histogram(entities: &[&Entity]) -> RiskHistogram {
    let mut counts = [0usize; BUCKETS];
    for entity in entities {
        counts[bucket_index(risk_score(entity))] += 1;
    }
    let max = counts.iter().copied().max().unwrap_or(0).max(1) as f64;

    let bars = counts
        .iter()
        .enumerate()
        .map(|(i, &count)| HistogramBar {
            count,
            height_pct: count as f64 / max * MAX_BAR_PCT,
            tone: BarTone::for_bucket(i),
        })
        .collect();

    RiskHistogram {
        entity_count: entities.len(),
        bars,
    }
}
