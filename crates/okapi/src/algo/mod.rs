pub mod grid;
pub mod hierarchical;
pub mod organic;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Layout mode selected by the dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Algorithm {
    /// Spring relaxation snapped onto a collision-free grid.
    Organic(OrganicOptions),
    /// Row-major fill that ignores topology.
    Grid(GridOptions),
    /// Layered layout delegated to an external backend.
    Hierarchical(HierarchicalOptions),
}

impl Default for Algorithm {
    fn default() -> Self {
        Self::Organic(OrganicOptions::default())
    }
}

impl Algorithm {
    /// Parses a JSON layout config such as `{"mode": "organic", "randomSeed": 7}`.
    ///
    /// Fields that are left out keep their defaults.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let algorithm: Algorithm = serde_json::from_str(text)?;
        algorithm.validate()?;
        Ok(algorithm)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Organic(_) => "organic",
            Algorithm::Grid(_) => "grid",
            Algorithm::Hierarchical(_) => "hierarchical",
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Algorithm::Organic(opts) => opts.validate(),
            Algorithm::Grid(opts) => opts.cell.validate(),
            Algorithm::Hierarchical(opts) => opts.validate(),
        }
    }
}

/// Display size of one grid cell. Chosen to exceed a rendered node plus its top/bottom anchors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CellSize {
    pub width: f64,
    pub height: f64,
}

impl Default for CellSize {
    fn default() -> Self {
        Self {
            width: 220.0,
            height: 160.0,
        }
    }
}

impl CellSize {
    pub fn validate(&self) -> Result<()> {
        ensure_positive("cell.width", self.width)?;
        ensure_positive("cell.height", self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrganicOptions {
    /// Seed for the initial ring jitter. Equal seeds give equal layouts.
    pub random_seed: u64,
    pub spring: SpringOptions,
    pub cell: CellSize,
    /// Largest Chebyshev radius the collision search visits before giving up.
    pub max_search_radius: u32,
}

impl Default for OrganicOptions {
    fn default() -> Self {
        Self {
            random_seed: 1,
            spring: SpringOptions::default(),
            cell: CellSize::default(),
            max_search_radius: 100,
        }
    }
}

impl OrganicOptions {
    pub fn validate(&self) -> Result<()> {
        self.spring.validate()?;
        self.cell.validate()
    }
}

/// Force constants and schedule for the spring simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpringOptions {
    pub iterations: usize,
    /// Linear spring stiffness applied along every edge.
    pub spring_constant: f64,
    /// Pull of every node towards the origin.
    pub centering_constant: f64,
    /// Pull of every node towards its component's live centroid.
    pub cohesion_constant: f64,
    pub initial_temperature: f64,
    /// Geometric cooling factor applied to the temperature after each iteration.
    pub cooling_rate: f64,
    /// Velocity cap per unit of temperature.
    pub velocity_cap_factor: f64,
    /// Fraction of velocity kept after each integration step.
    pub damping: f64,
    /// Initial ring radius grows by this much per `sqrt(linked node count)`.
    pub ring_scale: f64,
    /// Initial ring radius floor.
    pub ring_base: f64,
    /// Maximum initial jitter per coordinate.
    pub jitter: f64,
    /// Stop early once the summed speed of all points drops below this value.
    pub settle_threshold: Option<f64>,
}

impl Default for SpringOptions {
    fn default() -> Self {
        Self {
            iterations: 100,
            spring_constant: 0.25,
            centering_constant: 0.1,
            cohesion_constant: 0.05,
            initial_temperature: 4.0,
            cooling_rate: 0.96,
            velocity_cap_factor: 50.0,
            damping: 0.3,
            ring_scale: 390.0,
            ring_base: 3500.0,
            jitter: 100.0,
            settle_threshold: None,
        }
    }
}

impl SpringOptions {
    pub fn validate(&self) -> Result<()> {
        for (name, v) in [
            ("spring.springConstant", self.spring_constant),
            ("spring.centeringConstant", self.centering_constant),
            ("spring.cohesionConstant", self.cohesion_constant),
            ("spring.initialTemperature", self.initial_temperature),
            ("spring.coolingRate", self.cooling_rate),
            ("spring.velocityCapFactor", self.velocity_cap_factor),
            ("spring.damping", self.damping),
            ("spring.ringScale", self.ring_scale),
            ("spring.ringBase", self.ring_base),
            ("spring.jitter", self.jitter),
        ] {
            ensure_non_negative(name, v)?;
        }
        if let Some(t) = self.settle_threshold {
            ensure_non_negative("spring.settleThreshold", t)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridOptions {
    pub cell: CellSize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RankDir {
    #[default]
    #[serde(rename = "LR")]
    LeftRight,
    #[serde(rename = "TB")]
    TopBottom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HierarchicalOptions {
    pub node_width: f64,
    pub node_height: f64,
    pub node_sep: f64,
    pub rank_sep: f64,
    pub rank_dir: RankDir,
}

impl Default for HierarchicalOptions {
    fn default() -> Self {
        Self {
            node_width: 180.0,
            node_height: 80.0,
            node_sep: 50.0,
            rank_sep: 100.0,
            rank_dir: RankDir::default(),
        }
    }
}

impl HierarchicalOptions {
    pub fn validate(&self) -> Result<()> {
        ensure_positive("nodeWidth", self.node_width)?;
        ensure_positive("nodeHeight", self.node_height)?;
        ensure_non_negative("nodeSep", self.node_sep)?;
        ensure_non_negative("rankSep", self.rank_sep)
    }
}

fn ensure_positive(name: &str, v: f64) -> Result<()> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidOptions {
            message: format!("{name} must be a positive finite number, got {v}"),
        })
    }
}

fn ensure_non_negative(name: &str, v: f64) -> Result<()> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidOptions {
            message: format!("{name} must be a non-negative finite number, got {v}"),
        })
    }
}
