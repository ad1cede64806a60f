use crate::gameplay::bridge::registry::NodeId;
use crate::gameplay::bridge::BridgeAction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TutorialStep {
    SelectNode,
    ConnectNode,
    Launch,
    Done,
}

impl TutorialStep {
    pub fn hint(self) -> Option<&'static str> {
        match self {
            Self::SelectNode => Some("Click this node to select it"),
            Self::ConnectNode => Some("Click another node to lay a plank\nRight click cancels"),
            Self::Launch => Some("Press Space to send the car across"),
            Self::Done => None,
        }
    }
}

// Survives level reloads; only a passed level ends it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tutorial {
    step: TutorialStep,
}

impl Tutorial {
    pub fn new(enabled: bool) -> Self {
        Self {
            step: if enabled {
                TutorialStep::SelectNode
            } else {
                TutorialStep::Done
            },
        }
    }

    pub fn step(&self) -> TutorialStep {
        self.step
    }

    pub fn is_active(&self) -> bool {
        self.step != TutorialStep::Done
    }

    // `first_node` is the node the opening hint points at.
    pub fn observe(
        &mut self,
        action: BridgeAction,
        first_node: Option<NodeId>,
    ) -> Option<TutorialStep> {
        let next = match (self.step, action) {
            (TutorialStep::SelectNode, BridgeAction::Selected(id)) if Some(id) == first_node => {
                TutorialStep::ConnectNode
            }
            (TutorialStep::ConnectNode, BridgeAction::Built(_)) => TutorialStep::Launch,
            (TutorialStep::ConnectNode, BridgeAction::Cancelled) => TutorialStep::SelectNode,
            _ => return None,
        };
        self.step = next;
        Some(next)
    }

    pub fn finish(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.step = TutorialStep::Done;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gameplay::bridge::registry::{EntityRegistry, Node};
    use bevy::math::Vec2;

    fn two_nodes() -> (NodeId, NodeId) {
        let mut registry = EntityRegistry::new();
        let first = registry.add_node(Node::new(Vec2::ZERO, Vec2::ONE));
        let second = registry.add_node(Node::new(Vec2::splat(50.0), Vec2::ONE));
        (first, second)
    }

    #[test]
    fn selecting_the_first_node_then_building_walks_the_hints() {
        let (first, _) = two_nodes();
        let mut tutorial = Tutorial::new(true);

        assert_eq!(
            tutorial.observe(BridgeAction::Selected(first), Some(first)),
            Some(TutorialStep::ConnectNode)
        );
        assert_eq!(
            tutorial.observe(BridgeAction::Built(0), Some(first)),
            Some(TutorialStep::Launch)
        );
        assert_eq!(tutorial.observe(BridgeAction::Cancelled, Some(first)), None);
        assert_eq!(tutorial.step(), TutorialStep::Launch);
    }

    #[test]
    fn other_nodes_and_rejected_planks_do_not_advance() {
        let (first, second) = two_nodes();
        let mut tutorial = Tutorial::new(true);

        assert_eq!(tutorial.observe(BridgeAction::Selected(second), Some(first)), None);
        assert_eq!(tutorial.step(), TutorialStep::SelectNode);

        tutorial.observe(BridgeAction::Selected(first), Some(first));
        assert_eq!(tutorial.observe(BridgeAction::Rejected, Some(first)), None);
        assert_eq!(tutorial.step(), TutorialStep::ConnectNode);
    }

    #[test]
    fn cancelling_a_selection_goes_back_one_hint() {
        let (first, _) = two_nodes();
        let mut tutorial = Tutorial::new(true);
        tutorial.observe(BridgeAction::Selected(first), Some(first));

        assert_eq!(
            tutorial.observe(BridgeAction::Cancelled, Some(first)),
            Some(TutorialStep::SelectNode)
        );
    }

    #[test]
    fn finishing_hides_hints_for_good() {
        let (first, _) = two_nodes();
        let mut tutorial = Tutorial::new(true);
        assert!(tutorial.finish());
        assert!(!tutorial.finish());
        assert_eq!(tutorial.step().hint(), None);
        assert_eq!(tutorial.observe(BridgeAction::Selected(first), Some(first)), None);

        assert!(!Tutorial::new(false).is_active());
    }
}
