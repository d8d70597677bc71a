//! Ordered set composition over category aggregates.
//!
//! A composition is a list of [`CompositionStep`]s processed in config order.
//! A running region `R` starts undefined. For every step, and for every
//! category of that step that has an aggregate (visited in the aggregates'
//! insertion order), `R` is updated:
//!
//! - if `R` is undefined it becomes that aggregate, whatever the step's
//!   operator;
//! - otherwise `R := R op aggregate`.
//!
//! The seeding rule means a category listed first under `difference` becomes
//! the starting area instead of being subtracted from nothing.
//!
//! Categories without an aggregate impose no constraint: they are skipped,
//! never treated as an empty set.

use std::fmt;
use std::str::FromStr;

use geo::{BooleanOps, MultiPolygon};
use tracing::debug;

use crate::aggregate::CategoryAggregates;
use crate::config::ConfigError;

/// Boolean operator of a composition step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetOperator {
    Union,
    Intersection,
    Difference,
}

impl SetOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            SetOperator::Union => "union",
            SetOperator::Intersection => "intersection",
            SetOperator::Difference => "difference",
        }
    }

    /// Applies the operator to two regions.
    pub fn apply(&self, lhs: &MultiPolygon<f64>, rhs: &MultiPolygon<f64>) -> MultiPolygon<f64> {
        match self {
            SetOperator::Union => lhs.union(rhs),
            SetOperator::Intersection => lhs.intersection(rhs),
            SetOperator::Difference => lhs.difference(rhs),
        }
    }
}

impl fmt::Display for SetOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SetOperator {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "union" => Ok(SetOperator::Union),
            "intersection" => Ok(SetOperator::Intersection),
            "difference" => Ok(SetOperator::Difference),
            _ => Err(ConfigError::UnknownOperator(s.to_string())),
        }
    }
}

/// One named step of the composition.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositionStep {
    pub name: String,
    pub operator: SetOperator,
    pub categories: Vec<String>,
}

impl CompositionStep {
    pub fn new(name: impl Into<String>, operator: SetOperator, categories: Vec<String>) -> Self {
        Self {
            name: name.into(),
            operator,
            categories,
        }
    }

    /// Parses a step from its logic name.
    ///
    /// The name is either the operator itself (`"intersection"`) or the
    /// operator followed by `:` and a label (`"difference:noise"`), which
    /// lets a config use the same operator in several steps.
    pub fn parse(name: &str, categories: Vec<String>) -> Result<Self, ConfigError> {
        let operator_part = name.split_once(':').map_or(name, |(op, _)| op);
        let operator = operator_part
            .parse()
            .map_err(|_| ConfigError::UnknownOperator(name.to_string()))?;
        Ok(Self::new(name, operator, categories))
    }

    fn includes(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }
}

/// Result of a composition run.
#[derive(Debug, Clone)]
pub struct Composition {
    /// The final region, or `None` when no step matched any aggregate.
    pub final_region: Option<MultiPolygon<f64>>,

    /// The aggregates the composition was computed from, untouched.
    pub aggregates: CategoryAggregates,
}

/// Folds the aggregates through the steps.
pub fn compose(
    steps: &[CompositionStep],
    aggregates: &CategoryAggregates,
) -> Option<MultiPolygon<f64>> {
    let mut result: Option<MultiPolygon<f64>> = None;

    for step in steps {
        for (category, aggregate) in aggregates.iter() {
            if !step.includes(category) {
                continue;
            }
            result = Some(match result {
                None => {
                    debug!(step = %step.name, category, "Seeding composition");
                    aggregate.clone()
                }
                Some(current) => {
                    debug!(step = %step.name, category, operator = %step.operator, "Applying step");
                    step.operator.apply(&current, aggregate)
                }
            });
        }
    }

    result
}

/// Composes and bundles the result with its inputs.
pub fn compose_all(steps: &[CompositionStep], aggregates: CategoryAggregates) -> Composition {
    let final_region = compose(steps, &aggregates);
    Composition {
        final_region,
        aggregates,
    }
}
