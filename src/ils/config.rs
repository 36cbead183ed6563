//! ILS configuration.

/// Configuration for the Iterated Local Search driver.
///
/// Defaults follow the parameter set of Mendes & Alvelos (2022).
///
/// # Examples
///
/// ```
/// use fireline::ils::IlsConfig;
///
/// let config = IlsConfig::default()
///     .with_multistarts(20)
///     .with_max_no_improvements(30)
///     .with_seed(42);
/// assert_eq!(config.multistarts, 20);
/// assert_eq!(config.seed, Some(42));
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IlsConfig {
    /// Number of constructive starts the multistart selector evaluates.
    pub multistarts: usize,

    /// Candidate-pool cap of the constructive heuristic: only the first
    /// `max_candidates` soonest-burning eligible nodes are drawn from.
    pub max_candidates: usize,

    /// Neighborhood cap of the local search and the relocation walk: only
    /// the first `max_neighbours` soonest-burning candidates are tried.
    pub max_neighbours: usize,

    /// Successful relocations after which the random-walk perturbation
    /// stops.
    pub max_modifications: usize,

    /// Consecutive infeasible attempts after which the random-walk
    /// perturbation gives up.
    pub max_failures: usize,

    /// Outer iterations without improvement before the driver stops.
    pub max_no_improvements: usize,

    /// Probability of the drop-latest perturbation (forced to 0 while
    /// nothing is placed).
    pub p_drop: f64,

    /// Probability of the add-one perturbation (forced to 0 while no spare
    /// capacity remains). The residual `1 - p_drop - p_add` selects the
    /// random relocation walk.
    pub p_add: f64,

    /// Random seed (None for the default seed).
    pub seed: Option<u64>,
}

impl Default for IlsConfig {
    fn default() -> Self {
        Self {
            multistarts: 50,
            max_candidates: 5,
            max_neighbours: 20,
            max_modifications: 5,
            max_failures: 100,
            max_no_improvements: 50,
            p_drop: 0.075,
            p_add: 0.025,
            seed: None,
        }
    }
}

impl IlsConfig {
    pub fn with_multistarts(mut self, n: usize) -> Self {
        self.multistarts = n;
        self
    }

    pub fn with_max_candidates(mut self, n: usize) -> Self {
        self.max_candidates = n;
        self
    }

    pub fn with_max_neighbours(mut self, n: usize) -> Self {
        self.max_neighbours = n;
        self
    }

    pub fn with_max_modifications(mut self, n: usize) -> Self {
        self.max_modifications = n;
        self
    }

    pub fn with_max_failures(mut self, n: usize) -> Self {
        self.max_failures = n;
        self
    }

    pub fn with_max_no_improvements(mut self, n: usize) -> Self {
        self.max_no_improvements = n;
        self
    }

    pub fn with_perturbation_probabilities(mut self, p_drop: f64, p_add: f64) -> Self {
        self.p_drop = p_drop;
        self.p_add = p_add;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.multistarts == 0 {
            return Err("multistarts must be positive".into());
        }
        if self.max_candidates == 0 {
            return Err("max_candidates must be positive".into());
        }
        if self.max_neighbours == 0 {
            return Err("max_neighbours must be positive".into());
        }
        if self.max_no_improvements == 0 {
            return Err("max_no_improvements must be positive".into());
        }
        if !(0.0..=1.0).contains(&self.p_drop) {
            return Err(format!("p_drop must be in [0, 1], got {}", self.p_drop));
        }
        if !(0.0..=1.0).contains(&self.p_add) {
            return Err(format!("p_add must be in [0, 1], got {}", self.p_add));
        }
        if self.p_drop + self.p_add > 1.0 {
            return Err(format!(
                "p_drop + p_add must not exceed 1, got {}",
                self.p_drop + self.p_add
            ));
        }
        Ok(())
    }
}
