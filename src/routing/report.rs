//! Per-source results of a mode switch.

use std::collections::BTreeMap;

use crate::graph::NodeId;
use crate::{RoutingError, RoutingMode, Wiring};

/// What happened to one source during a mode switch.
#[derive(Debug)]
pub enum RewireOutcome {
    /// The source was reconnected.
    Rewired(Wiring),
    /// The source could not be rewired and is currently silent.
    Failed(RoutingError),
}

impl RewireOutcome {
    /// Returns true if the source was reconnected.
    pub fn is_rewired(&self) -> bool {
        matches!(self, Self::Rewired(_))
    }
}

/// Result of [`RoutingEngine::set_mode()`](crate::RoutingEngine::set_mode).
///
/// Maps every source tracked at the time of the switch to its outcome.
/// A failed source does not stop the others from being rewired.
#[derive(Debug)]
#[must_use]
pub struct RewireReport {
    previous: RoutingMode,
    current: RoutingMode,
    outcomes: BTreeMap<NodeId, RewireOutcome>,
}

impl RewireReport {
    pub(crate) fn new(previous: RoutingMode, current: RoutingMode) -> Self {
        Self {
            previous,
            current,
            outcomes: BTreeMap::new(),
        }
    }

    pub(crate) fn record(&mut self, source: NodeId, outcome: RewireOutcome) {
        self.outcomes.insert(source, outcome);
    }

    /// Mode before the switch.
    pub fn previous(&self) -> RoutingMode {
        self.previous
    }

    /// Mode after the switch.
    pub fn current(&self) -> RoutingMode {
        self.current
    }

    /// Outcome for one source, if it was tracked.
    pub fn outcome(&self, source: NodeId) -> Option<&RewireOutcome> {
        self.outcomes.get(&source)
    }

    /// All outcomes in node id order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &RewireOutcome)> {
        self.outcomes.iter().map(|(id, outcome)| (*id, outcome))
    }

    /// Sources that were reconnected.
    pub fn rewired(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.iter()
            .filter(|(_, outcome)| outcome.is_rewired())
            .map(|(id, _)| id)
    }

    /// Sources that failed, with their errors.
    pub fn failed(&self) -> impl Iterator<Item = (NodeId, &RoutingError)> {
        self.iter().filter_map(|(id, outcome)| match outcome {
            RewireOutcome::Failed(e) => Some((id, e)),
            RewireOutcome::Rewired(_) => None,
        })
    }

    /// Returns true if every source was reconnected.
    pub fn is_clean(&self) -> bool {
        self.outcomes.values().all(RewireOutcome::is_rewired)
    }

    /// Number of sources covered by this report.
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Returns true if no sources were tracked during the switch.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConnectionError;

    #[test]
    fn test_report_splits_outcomes() {
        let mut report = RewireReport::new(RoutingMode::Default, RoutingMode::StereoPanner);
        report.record(NodeId::from(2), RewireOutcome::Rewired(Wiring::ThroughPan));
        report.record(
            NodeId::from(3),
            RewireOutcome::Failed(
                ConnectionError::UnknownNode {
                    node: NodeId::from(3),
                }
                .into(),
            ),
        );

        assert_eq!(report.len(), 2);
        assert!(!report.is_clean());
        assert_eq!(report.rewired().collect::<Vec<_>>(), vec![NodeId::from(2)]);
        assert_eq!(
            report.failed().map(|(id, _)| id).collect::<Vec<_>>(),
            vec![NodeId::from(3)]
        );
        assert_eq!(report.previous(), RoutingMode::Default);
        assert_eq!(report.current(), RoutingMode::StereoPanner);
    }

    #[test]
    fn test_empty_report_is_clean() {
        let report = RewireReport::new(RoutingMode::Hrtf, RoutingMode::Hrtf);
        assert!(report.is_empty());
        assert!(report.is_clean());
    }
}
