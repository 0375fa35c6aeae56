use super::error::EngineError;
use crate::core::models::result::ClassificationResult;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Model,
    Registry,
    Keyword,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Model => write!(f, "model"),
            Tier::Registry => write!(f, "registry"),
            Tier::Keyword => write!(f, "keyword"),
        }
    }
}

/// What one tier did with a document.
#[derive(Debug)]
pub enum TierOutcome {
    /// The tier produced the final result.
    Resolved(ClassificationResult),
    /// The tier produced a result that a higher-precedence tier replaced.
    Overruled(ClassificationResult),
    /// The tier ran and found nothing.
    Unresolved,
    /// The tier had no artifact to run with.
    Skipped,
    /// The tier failed and the cascade moved on.
    Failed(EngineError),
}

impl TierOutcome {
    pub fn is_resolved(&self) -> bool {
        matches!(self, TierOutcome::Resolved(_))
    }
}

impl fmt::Display for TierOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TierOutcome::Resolved(result) => write!(
                f,
                "resolved as {} ({:.2})",
                result.classification(),
                result.confidence()
            ),
            TierOutcome::Overruled(result) => {
                write!(f, "overruled ({})", result.classification())
            }
            TierOutcome::Unresolved => write!(f, "unresolved"),
            TierOutcome::Skipped => write!(f, "skipped"),
            TierOutcome::Failed(error) => write!(f, "failed: {}", error),
        }
    }
}

/// The tiers a cascade run visited, in order. A completed run holds exactly
/// one resolved entry.
#[derive(Debug, Default)]
pub struct CascadeTrace {
    steps: Vec<(Tier, TierOutcome)>,
}

impl CascadeTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, tier: Tier, outcome: TierOutcome) {
        self.steps.push((tier, outcome));
    }

    pub fn steps(&self) -> &[(Tier, TierOutcome)] {
        &self.steps
    }

    pub fn outcome(&self, tier: Tier) -> Option<&TierOutcome> {
        self.steps
            .iter()
            .find(|(visited, _)| *visited == tier)
            .map(|(_, outcome)| outcome)
    }

    pub fn resolved_by(&self) -> Option<Tier> {
        self.steps
            .iter()
            .find(|(_, outcome)| outcome.is_resolved())
            .map(|(tier, _)| *tier)
    }

    pub fn failures(&self) -> impl Iterator<Item = (Tier, &EngineError)> {
        self.steps.iter().filter_map(|(tier, outcome)| match outcome {
            TierOutcome::Failed(error) => Some((*tier, error)),
            _ => None,
        })
    }
}

impl fmt::Display for CascadeTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .steps
            .iter()
            .map(|(tier, outcome)| format!("{}: {}", tier, outcome))
            .collect();
        write!(f, "{}", parts.join(" -> "))
    }
}
