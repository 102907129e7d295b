//! Retention Module
//!
//! Exponential forgetting curve (Ebbinghaus, 1885) with a half-life that
//! depends on how complex the learned material is.
//!
//! ## Core Formulas:
//! - Elapsed: t = max(0, now - learned_at) in hours
//! - Retention: R = 100 * 0.5^(t / h)
//! - Time to threshold: t = h * log2(100 / R)
//!
//! ## Half-life by complexity:
//!
//! | Complexity | Half-life | Description    |
//! |------------|-----------|----------------|
//! | 1          | 72h       | Very simple    |
//! | 2          | 48h       | Simple         |
//! | 3          | 36h       | Moderate       |
//! | 4          | 24h       | Complex        |
//! | 5          | 18h       | Very complex   |
//!
//! Scores are derived on every read and never stored, so a displayed score
//! always reflects the current time.

// ============================================================================
// CONSTANTS
// ============================================================================

/// Milliseconds in one hour
pub const MS_PER_HOUR: f64 = 3_600_000.0;

/// Half-life used for complexities outside the table
pub const DEFAULT_HALF_LIFE_HOURS: f64 = 36.0;

/// Retention right after learning
pub const MAX_RETENTION: f64 = 100.0;

/// Half-life in hours for a complexity rating
#[inline]
pub fn half_life_hours(complexity: u8) -> f64 {
    match complexity {
        1 => 72.0,
        2 => 48.0,
        3 => 36.0,
        4 => 24.0,
        5 => 18.0,
        _ => DEFAULT_HALF_LIFE_HOURS,
    }
}

/// Hours between `learned_at` and `now` (both ms since epoch)
///
/// Clock skew or future-dated imports can put `learned_at` after `now`;
/// that counts as zero elapsed time.
#[inline]
pub fn elapsed_hours(learned_at: i64, now: i64) -> f64 {
    (now.saturating_sub(learned_at) as f64 / MS_PER_HOUR).max(0.0)
}

/// Retention score in [0, 100]
pub fn retention(complexity: u8, learned_at: i64, now: i64) -> f64 {
    let elapsed = elapsed_hours(learned_at, now);
    let score = MAX_RETENTION * 0.5_f64.powf(elapsed / half_life_hours(complexity));
    score.clamp(0.0, MAX_RETENTION)
}

/// Hours after learning at which retention falls to `threshold`
///
/// Returns `None` for thresholds outside (0, 100].
pub fn hours_until(complexity: u8, threshold: f64) -> Option<f64> {
    if !(threshold > 0.0 && threshold <= MAX_RETENTION) {
        return None;
    }
    Some(half_life_hours(complexity) * (MAX_RETENTION / threshold).log2())
}

/// Hours left from `now` before retention falls to `threshold` (0 if already below)
pub fn hours_remaining(complexity: u8, learned_at: i64, now: i64, threshold: f64) -> Option<f64> {
    hours_until(complexity, threshold)
        .map(|total| (total - elapsed_hours(learned_at, now)).max(0.0))
}

// ============================================================================
// DECAYING ITEMS
// ============================================================================

/// Anything with a complexity and a learning timestamp decays the same way.
///
/// Implemented by both top-level entries and subtopics.
pub trait Decaying {
    /// Complexity rating (1-5)
    fn complexity(&self) -> u8;

    /// Capture time in milliseconds since the Unix epoch
    fn learned_at(&self) -> i64;

    /// Retention score at `now`
    fn retention_at(&self, now: i64) -> f64 {
        retention(self.complexity(), self.learned_at(), now)
    }
}

// ============================================================================
// TESTS
// ============================================================================
