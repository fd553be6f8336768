//! Configuration for the adaptive breadth-first search.

use crate::error::{GraphError, Result};

/// How the traversal chooses between push and pull steps.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum DirectionPolicy {
    /// Switch between push and pull using the frontier heuristics.
    #[default]
    Adaptive,
    /// Always expand the frontier along its outgoing edges.
    PushOnly,
}

/// Heuristic thresholds for direction switching.
///
/// `alpha` controls the push→pull switch while no pull has happened yet:
/// the traversal pulls once the frontier's outgoing edges exceed
/// `1 / alpha` of the edges not yet explored. After a pull has happened, a
/// growing push frontier larger than `n / beta1` switches to pull again, and
/// a shrinking pull frontier no larger than `n / beta2` switches back to push.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TraversalConfig {
    alpha: usize,
    beta1: usize,
    beta2: usize,
    policy: DirectionPolicy,
}

impl TraversalConfig {
    /// Creates a configuration with explicit thresholds and adaptive switching.
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidParameters`] when any threshold is zero.
    ///
    /// # Examples
    /// ```
    /// use frontera_core::TraversalConfig;
    ///
    /// let config = TraversalConfig::new(14, 24, 512).expect("thresholds must be positive");
    /// assert_eq!(config.alpha(), 14);
    /// ```
    pub fn new(alpha: usize, beta1: usize, beta2: usize) -> Result<Self> {
        for (name, value) in [("alpha", alpha), ("beta1", beta1), ("beta2", beta2)] {
            if value == 0 {
                return Err(GraphError::parameters(format!(
                    "{name} must be greater than zero"
                )));
            }
        }
        Ok(Self {
            alpha,
            beta1,
            beta2,
            policy: DirectionPolicy::Adaptive,
        })
    }

    /// Overrides the direction policy.
    #[must_use]
    pub fn with_policy(mut self, policy: DirectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Edge-ratio threshold for the first push→pull switch.
    #[must_use]
    #[rustfmt::skip]
    pub fn alpha(&self) -> usize { self.alpha }

    /// Frontier-size divisor for later push→pull switches.
    #[must_use]
    #[rustfmt::skip]
    pub fn beta1(&self) -> usize { self.beta1 }

    /// Frontier-size divisor for pull→push switches.
    #[must_use]
    #[rustfmt::skip]
    pub fn beta2(&self) -> usize { self.beta2 }

    /// Direction policy.
    #[must_use]
    #[rustfmt::skip]
    pub fn policy(&self) -> DirectionPolicy { self.policy }
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            alpha: 8,
            beta1: 8,
            beta2: 512,
            policy: DirectionPolicy::Adaptive,
        }
    }
}

/// Which outputs a traversal should produce.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct TraversalRequest {
    level: bool,
    parent: bool,
}

impl TraversalRequest {
    /// Only the level of each vertex.
    pub const LEVELS: Self = Self::new(true, false);
    /// Only the parent of each vertex.
    pub const PARENTS: Self = Self::new(false, true);
    /// Both levels and parents.
    pub const LEVELS_AND_PARENTS: Self = Self::new(true, true);

    /// Creates a request from explicit flags.
    #[must_use]
    pub const fn new(level: bool, parent: bool) -> Self {
        Self { level, parent }
    }

    /// Whether levels are requested.
    #[must_use]
    #[rustfmt::skip]
    pub const fn level(&self) -> bool { self.level }

    /// Whether parents are requested.
    #[must_use]
    #[rustfmt::skip]
    pub const fn parent(&self) -> bool { self.parent }

    /// Whether any output is requested.
    #[must_use]
    pub const fn any(&self) -> bool {
        self.level || self.parent
    }
}
