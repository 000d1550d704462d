//! Grid construction and search settings.
//!
//! Both sections derive serde with container defaults, so a caller can embed
//! them in its own configuration file and omit any field.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Average channel intensity below which a source pixel becomes blocked.
pub const DEFAULT_THRESHOLD: u8 = 128;
/// Free cells added on every side of the source image.
pub const DEFAULT_PADDING: usize = 20;
/// Cartesian distance covered by one expansion step.
pub const DEFAULT_STEP: f64 = 20.0;
/// Distance below which a successor counts as having reached the goal.
pub const DEFAULT_GOAL_THRESHOLD: f64 = 10.0;
/// Obstacle-free radius, in cells, required around every accepted node.
pub const DEFAULT_CLEARANCE: usize = 10;

/// Settings for turning a source image into an [OccupancyGrid](crate::OccupancyGrid).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Monochrome threshold applied to the mean RGB intensity
    pub threshold: u8,

    /// Free border width in cells
    pub padding: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            padding: DEFAULT_PADDING,
        }
    }
}

impl GridConfig {
    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_padding(mut self, padding: usize) -> Self {
        self.padding = padding;
        self
    }
}

/// Settings for a single path query.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Step length per expansion (cells)
    pub step: f64,

    /// Goal is reached once a successor is closer than this
    pub goal_threshold: f64,

    /// Clearance radius in cells
    pub clearance: usize,

    /// Stop after this many node expansions
    pub max_expansions: Option<usize>,

    /// Stop once this much wall-clock time has passed
    pub time_budget: Option<Duration>,

    /// Allow a final step straight onto the goal from any expanded node whose
    /// move square contains it, and end every path exactly at the goal.
    pub snap_to_goal: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            step: DEFAULT_STEP,
            goal_threshold: DEFAULT_GOAL_THRESHOLD,
            clearance: DEFAULT_CLEARANCE,
            max_expansions: None,
            time_budget: None,
            snap_to_goal: true,
        }
    }
}

impl SearchConfig {
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    pub fn with_goal_threshold(mut self, goal_threshold: f64) -> Self {
        self.goal_threshold = goal_threshold;
        self
    }

    pub fn with_clearance(mut self, clearance: usize) -> Self {
        self.clearance = clearance;
        self
    }

    pub fn with_max_expansions(mut self, max_expansions: usize) -> Self {
        self.max_expansions = Some(max_expansions);
        self
    }

    pub fn with_time_budget(mut self, time_budget: Duration) -> Self {
        self.time_budget = Some(time_budget);
        self
    }

    pub fn with_snap_to_goal(mut self, snap_to_goal: bool) -> Self {
        self.snap_to_goal = snap_to_goal;
        self
    }

    /// Rejects a non-positive or non-finite step or goal threshold.
    pub fn validate(&self) -> Result<()> {
        if !self.step.is_finite() || self.step <= 0.0 {
            return Err(Error::InvalidParameter {
                name: "step",
                value: self.step,
            });
        }
        if !self.goal_threshold.is_finite() || self.goal_threshold <= 0.0 {
            return Err(Error::InvalidParameter {
                name: "goal_threshold",
                value: self.goal_threshold,
            });
        }
        Ok(())
    }
}
