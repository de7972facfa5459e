//! Static tuning supplied to the world and systems at construction.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Aggregated tuning knobs controlling every adjustable aspect of a wave.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    /// Grid of units generated when the world is built.
    pub layout: FormationLayout,
    /// Step and fire cadence extremes forming the difficulty curve.
    pub cadence: CadenceTuning,
    /// Distances covered by a single formation step.
    pub motion: MotionTuning,
    /// Horizontal extent of the play-field.
    pub field: FieldBounds,
    /// Launch timing and placement of the bonus target.
    pub bonus: BonusTuning,
    /// Points awarded for kills.
    pub scoring: ScoreTuning,
    /// Fixed-rate simulation clock.
    pub timing: TimingTuning,
    /// Seed for every random draw made by the world and systems.
    pub rng_seed: u64,
}

impl WaveConfig {
    /// Rejects tuning values the simulation cannot honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let cadence = &self.cadence;
        positive("step_interval_slow", cadence.step_interval_slow)?;
        positive("step_interval_fast", cadence.step_interval_fast)?;
        positive("fire_interval_slow", cadence.fire_interval_slow)?;
        positive("fire_interval_fast", cadence.fire_interval_fast)?;
        ordered("step_interval", cadence.step_interval_slow, cadence.step_interval_fast)?;
        ordered("fire_interval", cadence.fire_interval_slow, cadence.fire_interval_fast)?;
        let multiplier = cadence.last_unit_multiplier;
        if multiplier.is_nan() || multiplier <= 0.0 {
            return Err(ConfigError::NonPositiveMultiplier(multiplier));
        }

        positive("step_horizontal_distance", self.motion.step_horizontal_distance)?;
        non_negative("step_vertical_distance", self.motion.step_vertical_distance)?;
        non_negative("unit_width", self.layout.unit_width)?;
        non_negative("column_spacing", self.layout.column_spacing)?;
        non_negative("row_spacing", self.layout.row_spacing)?;

        let field = &self.field;
        if field.left.is_nan() || field.right.is_nan() || field.left >= field.right {
            return Err(ConfigError::InvertedField {
                left: self.field.left,
                right: self.field.right,
            });
        }

        let layout = &self.layout;
        let width =
            layout.columns.saturating_sub(1) as f32 * layout.column_spacing + layout.unit_width;
        if width > field.right - field.left {
            return Err(ConfigError::FormationWiderThanField {
                width,
                field: field.right - field.left,
            });
        }

        non_negative("bonus.min_delay", self.bonus.min_delay)?;
        non_negative("bonus.launch_height_range", self.bonus.launch_height_range)?;
        if self.bonus.max_delay.is_nan() || self.bonus.min_delay > self.bonus.max_delay {
            return Err(ConfigError::InvertedBonusDelay {
                min: self.bonus.min_delay,
                max: self.bonus.max_delay,
            });
        }

        positive("timing.fixed_step", self.timing.fixed_step)?;
        Ok(())
    }
}

/// Grid arrangement of the formation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormationLayout {
    /// Number of columns, laid out left to right.
    pub columns: u32,
    /// Units per column, stacked bottom to top.
    pub rows: u32,
    /// Horizontal distance between neighbouring column centres.
    pub column_spacing: f32,
    /// Vertical distance between neighbouring unit centres.
    pub row_spacing: f32,
    /// Width of a single unit; half of it pads the formation edge.
    pub unit_width: f32,
    /// World position of the bottom unit of the leftmost column at round start.
    pub origin: Vec2,
}

impl Default for FormationLayout {
    fn default() -> Self {
        Self {
            columns: 11,
            rows: 5,
            column_spacing: 1.0,
            row_spacing: 0.75,
            unit_width: 0.8,
            origin: Vec2::new(-5.0, 1.0),
        }
    }
}

/// Slow and fast extremes of the difficulty curve, in seconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CadenceTuning {
    /// Time between steps while the formation is full.
    pub step_interval_slow: f32,
    /// Time between steps once the formation is nearly empty.
    pub step_interval_fast: f32,
    /// Time between shots while the formation is full.
    pub fire_interval_slow: f32,
    /// Time between shots once the formation is nearly empty.
    pub fire_interval_fast: f32,
    /// Divides the fast step interval once a single unit survives.
    pub last_unit_multiplier: f32,
}

impl Default for CadenceTuning {
    fn default() -> Self {
        Self {
            step_interval_slow: 1.5,
            step_interval_fast: 0.15,
            fire_interval_slow: 1.5,
            fire_interval_fast: 0.04,
            last_unit_multiplier: 2.0,
        }
    }
}

/// Distances covered by one formation step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionTuning {
    /// Sideways distance per step.
    pub step_horizontal_distance: f32,
    /// Descent applied on the step that reverses direction.
    pub step_vertical_distance: f32,
}

impl Default for MotionTuning {
    fn default() -> Self {
        Self {
            step_horizontal_distance: 0.5,
            step_vertical_distance: 0.5,
        }
    }
}

/// Horizontal limits the formation bounces between.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldBounds {
    /// World x coordinate of the left edge.
    pub left: f32,
    /// World x coordinate of the right edge.
    pub right: f32,
}

impl Default for FieldBounds {
    fn default() -> Self {
        Self {
            left: -8.0,
            right: 8.0,
        }
    }
}

/// Launch cadence and placement of the flying bonus target.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BonusTuning {
    /// Shortest wait before a launch, in seconds.
    pub min_delay: f32,
    /// Longest wait before a launch, in seconds.
    pub max_delay: f32,
    /// Height of the band, centred on the launch origin, a launch may start from.
    pub launch_height_range: f32,
    /// Centre of the launch band.
    pub launch_origin: Vec2,
}

impl Default for BonusTuning {
    fn default() -> Self {
        Self {
            min_delay: 8.0,
            max_delay: 20.0,
            launch_height_range: 1.0,
            launch_origin: Vec2::new(-9.0, 5.5),
        }
    }
}

/// Points awarded per kill.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreTuning {
    /// Points for each formation unit destroyed.
    pub per_unit: u32,
    /// Points for each bonus target shot down.
    pub per_bonus: u32,
}

impl Default for ScoreTuning {
    fn default() -> Self {
        Self {
            per_unit: 10,
            per_bonus: 100,
        }
    }
}

/// Fixed-rate simulation clock settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingTuning {
    /// Length of one fixed simulation step, in seconds.
    pub fixed_step: f32,
    /// Upper bound on fixed steps replayed for a single slow frame.
    pub max_catch_up_steps: u32,
}

impl Default for TimingTuning {
    fn default() -> Self {
        Self {
            fixed_step: 0.02,
            max_catch_up_steps: 8,
        }
    }
}

/// Reasons a [`WaveConfig`] is rejected.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// A duration that must be strictly positive was not.
    #[error("`{name}` must be greater than zero, got {value}")]
    NonPositive {
        /// Name of the offending field.
        name: &'static str,
        /// Value supplied for the field.
        value: f32,
    },
    /// A distance that must not be negative was.
    #[error("`{name}` must not be negative, got {value}")]
    Negative {
        /// Name of the offending field.
        name: &'static str,
        /// Value supplied for the field.
        value: f32,
    },
    /// The fast extreme of a cadence is slower than the slow extreme.
    #[error("`{name}_fast` ({fast}) must not exceed `{name}_slow` ({slow})")]
    InvertedCadence {
        /// Cadence family that is inverted.
        name: &'static str,
        /// Configured slow extreme.
        slow: f32,
        /// Configured fast extreme.
        fast: f32,
    },
    /// The last-unit multiplier would stall or reverse the final unit.
    #[error("`last_unit_multiplier` must be greater than zero, got {0}")]
    NonPositiveMultiplier(f32),
    /// The left field boundary is not left of the right boundary.
    #[error("field left boundary {left} must be less than right boundary {right}")]
    InvertedField {
        /// Configured left boundary.
        left: f32,
        /// Configured right boundary.
        right: f32,
    },
    /// The formation cannot fit between the field boundaries.
    #[error("formation width {width} exceeds field width {field}")]
    FormationWiderThanField {
        /// Distance from the outer edge of the first column to the last.
        width: f32,
        /// Distance between the field boundaries.
        field: f32,
    },
    /// The bonus launch window is empty.
    #[error("bonus `min_delay` {min} must not exceed `max_delay` {max}")]
    InvertedBonusDelay {
        /// Configured minimum delay.
        min: f32,
        /// Configured maximum delay.
        max: f32,
    },
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}

fn ordered(name: &'static str, slow: f32, fast: f32) -> Result<(), ConfigError> {
    if fast <= slow {
        Ok(())
    } else {
        Err(ConfigError::InvertedCadence { name, slow, fast })
    }
}
