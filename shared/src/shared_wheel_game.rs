use serde::{Serialize, Deserialize};
use rand::Rng;

/// One weighted prize slot on the wheel. A segment's position in the table is
/// its identity: rotation math and results refer to segments by index.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Segment {
    pub amount: f64,
    pub weight: u32,
}

/// The production wheel layout: eight slots, total weight 905.
pub const DEFAULT_SEGMENTS: [Segment; 8] = [
    Segment { amount: 2.0, weight: 200 },
    Segment { amount: 50.0, weight: 76 },
    Segment { amount: 500.0, weight: 12 },
    Segment { amount: 2.0, weight: 200 },
    Segment { amount: 100.0, weight: 62 },
    Segment { amount: 50.0, weight: 81 },
    Segment { amount: 2.0, weight: 200 },
    Segment { amount: 75.0, weight: 74 },
];

/// Ways a segment table can be unusable for a spin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    EmptyTable,
    ZeroWeight(usize),
    BadAmount(usize),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::EmptyTable => write!(f, "segment table is empty"),
            ConfigError::ZeroWeight(i) => write!(f, "segment {} has zero weight", i),
            ConfigError::BadAmount(i) => {
                write!(f, "segment {} has a negative or non-finite amount", i)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Checks the invariants every segment table must hold: at least one segment,
/// every weight positive, every amount non-negative and finite.
pub fn validate_segments(segments: &[Segment]) -> Result<(), ConfigError> {
    if segments.is_empty() {
        return Err(ConfigError::EmptyTable);
    }
    for (i, segment) in segments.iter().enumerate() {
        if segment.weight == 0 {
            return Err(ConfigError::ZeroWeight(i));
        }
        if !segment.amount.is_finite() || segment.amount < 0.0 {
            return Err(ConfigError::BadAmount(i));
        }
    }
    Ok(())
}

/// Draws one winning index from the table, each segment selected with
/// probability `weight / total_weight`. Consumes exactly one value from `rng`.
pub fn select_weighted<R: Rng + ?Sized>(
    segments: &[Segment],
    rng: &mut R,
) -> Result<usize, ConfigError> {
    validate_segments(segments)?;
    let total: f64 = segments.iter().map(|s| f64::from(s.weight)).sum();
    let draw = rng.gen_range(0.0..total);
    Ok(segment_for_draw(segments, draw))
}

/// Maps a draw in `[0, total_weight)` onto the segment owning that slice of
/// the cumulative weight line. A draw landing exactly on a boundary belongs to
/// the lower-indexed segment.
fn segment_for_draw(segments: &[Segment], draw: f64) -> usize {
    let mut cumulative = 0.0;
    for (i, segment) in segments.iter().enumerate() {
        cumulative += f64::from(segment.weight);
        if draw <= cumulative {
            return i;
        }
    }
    // Rounding can nudge a near-total draw past the final cumulative sum; that
    // draw still borders the last slice.
    segments.len() - 1
}

/// Absolute rotation, in degrees, that parks the winning segment's angular
/// center under the pointer. The wheel always travels forward by at least
/// `min_turns` full revolutions from `current_rotation`, never backward.
pub fn target_rotation(
    current_rotation: f64,
    winning_index: usize,
    segment_count: usize,
    min_turns: f64,
) -> f64 {
    let segment_angle = 360.0 / segment_count as f64;
    let center = winning_index as f64 * segment_angle + segment_angle / 2.0;
    let normalized = current_rotation.rem_euclid(360.0);
    let adjustment = (center - normalized).rem_euclid(360.0);
    current_rotation + min_turns * 360.0 + adjustment
}

/// Represents the result of a completed wheel spin
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SpinResult {
    pub winning_index: usize,
    pub amount: f64,
}

/// Represents the current state of the wheel game
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WheelGame {
    pub is_spinning: bool,
    pub last_result: Option<SpinResult>,
}

impl WheelGame {
    pub fn new() -> Self {
        Self {
            is_spinning: false,
            last_result: None,
        }
    }

    pub fn start_spin(&mut self) {
        self.is_spinning = true;
        self.last_result = None;
    }

    pub fn complete_spin(&mut self, result: SpinResult) {
        log::info!(
            "Wheel landed on segment {} for {}",
            result.winning_index,
            result.amount
        );
        self.is_spinning = false;
        self.last_result = Some(result);
    }

    /// Returns the wheel to idle without recording a result, for spins the
    /// animation layer failed to finish.
    pub fn abort_spin(&mut self) {
        log::info!("Spin aborted before completion, returning wheel to idle.");
        self.is_spinning = false;
    }
}

/// Command handed to the animation layer: where to stop, how long to take,
/// which curve to follow. Completion is the only signal the core waits on.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct SpinAnimation {
    pub target_rotation: f64,
    pub duration_ms: u32,
    pub easing: Easing,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
    EaseOut,
}

pub fn ease_out_cubic(t: f64) -> f64 {
    // Modified ease-out: 1 - (1-t)^4
    1.0 - (1.0 - t).powi(4)
}

// Constants for frontend animation
pub const SPIN_DURATION_MS: u32 = 5000; // Duration of spin animation in milliseconds
pub const MIN_SPINS: f64 = 5.0;         // Minimum number of full rotations
