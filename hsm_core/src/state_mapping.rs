//! This file contains the logic for how states are grouped together.
//! Using this info, the entire tree of states can be resolved without the
//! engine knowing anything about the concrete state objects.
use std::collections::HashMap;

use crate::{
    errors::{HsmError, HsmResult},
    events::EventConstraint,
    state::{HandlerRef, StateConstraint, StateNode, Target},
};

/// The state tree, keyed by the consumer's state enum. The engine-owned root
/// is implicit: it is the parent of every state registered without one and
/// sits at level 0.
pub(crate) struct StateMapping<S: StateConstraint, E: EventConstraint, P: 'static> {
    nodes: HashMap<S, StateNode<S, E, P>>,
}

impl<S: StateConstraint, E: EventConstraint, P: 'static> StateMapping<S, E, P> {
    pub(crate) fn new() -> Self {
        Self {
            nodes: HashMap::new(),
        }
    }

    /// Register a state under `parent`. The parent must already be known so
    /// that levels stay consistent with the path to the root.
    pub(crate) fn add_state(
        &mut self,
        state: S,
        handler: HandlerRef<S, E, P>,
        parent: Option<S>,
    ) -> HsmResult<()> {
        if self.nodes.contains_key(&state) {
            return Err(HsmError::DuplicateState(state.to_string()));
        }
        let level = match &parent {
            None => 1,
            Some(parent_state) => match self.nodes.get(parent_state) {
                Some(parent_node) => parent_node.level + 1,
                None => {
                    return Err(HsmError::InvalidParent {
                        state: state.to_string(),
                        parent: parent_state.to_string(),
                    })
                }
            },
        };
        let node = StateNode {
            level,
            parent,
            handler,
        };
        self.nodes.insert(state, node);
        Ok(())
    }

    pub(crate) fn contains(&self, state: &S) -> bool {
        self.nodes.contains_key(state)
    }

    pub(crate) fn handler_of(&self, addr: &Target<S>) -> Option<HandlerRef<S, E, P>> {
        match addr {
            Target::Root => None,
            Target::State(state) => self.nodes.get(state).map(|node| node.handler.clone()),
        }
    }

    pub(crate) fn level_of(&self, addr: &Target<S>) -> u32 {
        match addr {
            Target::Root => 0,
            Target::State(state) => self.nodes.get(state).map(|node| node.level).unwrap_or(0),
        }
    }

    /// One step up the tree. The root is its own fixpoint, which keeps the
    /// chain walks below total.
    pub(crate) fn parent_of(&self, addr: &Target<S>) -> Target<S> {
        match addr {
            Target::Root => Target::Root,
            Target::State(state) => match self.nodes.get(state).and_then(|n| n.parent.clone()) {
                Some(parent) => Target::State(parent),
                None => Target::Root,
            },
        }
    }

    /// Exit and entry chains for a transition from `from` to `to`, bounded by
    /// their least common ancestor (which appears in neither chain).
    ///
    /// The exit chain is ordered deepest-first, ready to walk as-is. The
    /// entry chain is also collected deepest-first; callers enter in reverse.
    pub(crate) fn chains(
        &self,
        from: &Target<S>,
        to: &Target<S>,
    ) -> (Vec<Target<S>>, Vec<Target<S>>) {
        let mut exits = Vec::new();
        let mut entries = Vec::new();
        let mut src = from.clone();
        let mut dst = to.clone();

        // Equalize the levels
        while self.level_of(&src) > self.level_of(&dst) {
            exits.push(src.clone());
            src = self.parent_of(&src);
        }
        while self.level_of(&dst) > self.level_of(&src) {
            entries.push(dst.clone());
            dst = self.parent_of(&dst);
        }
        // Ascend in lock-step until the paths meet
        while src != dst {
            exits.push(src.clone());
            entries.push(dst.clone());
            src = self.parent_of(&src);
            dst = self.parent_of(&dst);
        }

        (exits, entries)
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::{events::Event, state_engine::HsmEngine};

    #[derive(Clone, PartialEq, Eq, Hash, Debug, strum::Display)]
    enum MapStates {
        Top,
        A1,
        B1,
        A2,
    }
    impl StateConstraint for MapStates {}

    #[derive(Debug, strum::Display)]
    enum MapEvents {
        Tick,
    }
    impl EventConstraint for MapEvents {}

    fn noop_handler() -> HandlerRef<MapStates, MapEvents, ()> {
        Rc::new(
            |_: &HsmEngine<MapStates, MapEvents, ()>,
             _: &Event<MapEvents>,
             _: Option<&()>|
             -> Option<MapEvents> { None },
        )
    }

    fn build_mapping() -> StateMapping<MapStates, MapEvents, ()> {
        let mut mapping = StateMapping::new();
        mapping
            .add_state(MapStates::Top, noop_handler(), None)
            .unwrap();
        mapping
            .add_state(MapStates::A1, noop_handler(), Some(MapStates::Top))
            .unwrap();
        mapping
            .add_state(MapStates::B1, noop_handler(), Some(MapStates::Top))
            .unwrap();
        mapping
            .add_state(MapStates::A2, noop_handler(), Some(MapStates::A1))
            .unwrap();
        mapping
    }

    #[test]
    fn parent_links_and_levels() {
        let mapping = build_mapping();

        assert_eq!(mapping.level_of(&Target::Root), 0);
        assert_eq!(mapping.level_of(&MapStates::Top.into()), 1);
        assert_eq!(mapping.level_of(&MapStates::A1.into()), 2);
        assert_eq!(mapping.level_of(&MapStates::B1.into()), 2);
        assert_eq!(mapping.level_of(&MapStates::A2.into()), 3);

        assert_eq!(mapping.parent_of(&MapStates::Top.into()), Target::Root);
        assert_eq!(
            mapping.parent_of(&MapStates::A2.into()),
            Target::State(MapStates::A1)
        );
        assert_eq!(mapping.parent_of(&Target::Root), Target::Root);

        assert!(mapping.contains(&MapStates::B1));
    }

    #[test]
    fn add_state_rejects_bad_input() {
        let mut mapping = build_mapping();

        let duplicate = mapping.add_state(MapStates::A1, noop_handler(), Some(MapStates::Top));
        assert_eq!(
            duplicate.unwrap_err(),
            HsmError::DuplicateState("A1".to_string())
        );

        let mut fresh = StateMapping::<MapStates, MapEvents, ()>::new();
        let orphan = fresh.add_state(MapStates::A2, noop_handler(), Some(MapStates::A1));
        assert_eq!(
            orphan.unwrap_err(),
            HsmError::InvalidParent {
                state: "A2".to_string(),
                parent: "A1".to_string(),
            }
        );
    }

    #[test]
    fn chains_are_bounded_by_the_lca() {
        let mapping = build_mapping();

        // A2 -> B1: up through A1, down into B1; Top is the LCA and shows up
        // in neither chain.
        let (exits, entries) =
            mapping.chains(&MapStates::A2.into(), &MapStates::B1.into());
        assert_eq!(
            exits,
            vec![Target::State(MapStates::A2), Target::State(MapStates::A1)]
        );
        assert_eq!(entries, vec![Target::State(MapStates::B1)]);

        // Descending only: nothing to exit, entries collected deepest-first.
        let (exits, entries) =
            mapping.chains(&MapStates::Top.into(), &MapStates::A2.into());
        assert!(exits.is_empty());
        assert_eq!(
            entries,
            vec![Target::State(MapStates::A2), Target::State(MapStates::A1)]
        );
    }

    #[test]
    fn chain_to_root_exits_every_ancestor() {
        let mapping = build_mapping();

        let (exits, entries) = mapping.chains(&MapStates::A2.into(), &Target::Root);
        assert_eq!(
            exits,
            vec![
                Target::State(MapStates::A2),
                Target::State(MapStates::A1),
                Target::State(MapStates::Top),
            ]
        );
        assert!(entries.is_empty());
    }

    #[test]
    fn self_transition_has_empty_chains() {
        let mapping = build_mapping();

        let (exits, entries) =
            mapping.chains(&MapStates::A2.into(), &MapStates::A2.into());
        assert!(exits.is_empty());
        assert!(entries.is_empty());
    }
}
