//! Ingestion: turn raw provider/file bars into a clean, strictly ordered
//! series clipped to the requested window.

use chrono::NaiveDate;
use swinglab_core::domain::Bar;

/// Clean bars plus counts of what was removed.
#[derive(Debug, Clone, PartialEq)]
pub struct Ingested {
    pub bars: Vec<Bar>,
    /// Non-finite or non-positive prices.
    pub dropped_invalid: usize,
    /// Repeated dates (first occurrence kept).
    pub dropped_duplicates: usize,
    /// Outside `[start, end)`.
    pub clipped: usize,
}

/// Drop invalid bars, sort by date, drop duplicate dates keeping the first,
/// then clip to `[start, end)`.
pub fn ingest(raw: Vec<Bar>, start: NaiveDate, end: NaiveDate) -> Ingested {
    let total = raw.len();
    let mut bars: Vec<Bar> = raw.into_iter().filter(is_tradable).collect();
    let dropped_invalid = total - bars.len();

    // Stable sort keeps input order among equal dates.
    bars.sort_by_key(|b| b.date);
    let before_dedup = bars.len();
    bars.dedup_by_key(|b| b.date);
    let dropped_duplicates = before_dedup - bars.len();

    let before_clip = bars.len();
    bars.retain(|b| b.date >= start && b.date < end);
    let clipped = before_clip - bars.len();

    Ingested {
        bars,
        dropped_invalid,
        dropped_duplicates,
        clipped,
    }
}

fn is_tradable(bar: &Bar) -> bool {
    !bar.is_void() && bar.open > 0.0 && bar.high > 0.0 && bar.low > 0.0 && bar.close > 0.0
}
