//! Analysis options

use serde::{Deserialize, Serialize};

use crate::error::{TmmError, TmmResult};

/// Largest accepted number of doublings; `2^M` must stay representable
pub const MAX_SQUARINGS: u32 = 64;

/// Options for the transfer matrix integrator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationOptions {
    /// Number of doublings `M` in scaling-and-squaring (sub-step is `L / 2^M`)
    pub squarings: u32,
    /// Sample count for position-dependent elements without distributed load
    pub samples: usize,
    /// Sample count for position-dependent elements carrying a distributed load
    pub loaded_samples: usize,
}

impl Default for IntegrationOptions {
    fn default() -> Self {
        Self {
            squarings: 12,
            samples: 3,
            loaded_samples: 10,
        }
    }
}

impl IntegrationOptions {
    /// Set the number of doublings
    pub fn with_squarings(mut self, squarings: u32) -> Self {
        self.squarings = squarings;
        self
    }

    /// Set both sample counts of the sampled path
    pub fn with_samples(mut self, samples: usize, loaded_samples: usize) -> Self {
        self.samples = samples.max(1);
        self.loaded_samples = loaded_samples.max(1);
        self
    }

    /// Reject a doubling count above [`MAX_SQUARINGS`]
    pub fn validate(&self) -> TmmResult<()> {
        if self.squarings > MAX_SQUARINGS {
            return Err(TmmError::InvalidOptions(format!(
                "squarings must not exceed {}, got {}",
                MAX_SQUARINGS, self.squarings
            )));
        }
        Ok(())
    }

    /// Sample count for an element, depending on whether it carries a load
    pub fn sample_count(&self, loaded: bool) -> usize {
        if loaded {
            self.loaded_samples.max(1)
        } else {
            self.samples.max(1)
        }
    }
}

/// Options for the dense linear solve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverOptions {
    /// Pivot magnitude (after row equilibration) below which the system is singular
    pub pivot_tolerance: f64,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            pivot_tolerance: 1e-10,
        }
    }
}

/// Options for global assembly
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblyOptions {
    /// Compute element contributions on the rayon thread pool
    pub parallel: bool,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self { parallel: true }
    }
}

/// Complete set of options used by an [`Assembly`](crate::assembly::Assembly)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    pub integration: IntegrationOptions,
    pub solver: SolverOptions,
    pub assembly: AssemblyOptions,
}

impl AnalysisOptions {
    /// Default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> TmmResult<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Check value ranges that the type system does not enforce
    pub fn validate(&self) -> TmmResult<()> {
        self.integration.validate()?;
        let tol = self.solver.pivot_tolerance;
        if !tol.is_finite() || tol < 0.0 {
            return Err(TmmError::InvalidOptions(format!(
                "pivot tolerance must be finite and non-negative, got {}",
                tol
            )));
        }
        Ok(())
    }

    /// Serialize options to pretty JSON
    pub fn to_json(&self) -> TmmResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Set integration options
    pub fn with_integration(mut self, integration: IntegrationOptions) -> Self {
        self.integration = integration;
        self
    }

    /// Set the singular pivot tolerance
    pub fn with_pivot_tolerance(mut self, tol: f64) -> Self {
        self.solver.pivot_tolerance = tol;
        self
    }

    /// Compute element contributions sequentially
    pub fn sequential(mut self) -> Self {
        self.assembly.parallel = false;
        self
    }
}
