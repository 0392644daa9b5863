//! This file contains the logic for a state engine comprised of many
//! composable states
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::{
    errors::{HsmError, HsmResult},
    events::{Event, EventConstraint},
    logger::{DebugMask, HsmLogger},
    state::{HandlerRef, StateConstraint, StateHandler, Target},
    state_mapping::StateMapping,
};

/// Called when an event falls past the root unhandled, after the drop has
/// been logged. Lets consumers escalate instead of silently dropping.
pub type UnhandledHook<E, P> = Box<dyn Fn(&E, Option<&P>)>;

/// Runs the orchestration of the state machine while considering its
/// hierarchy.
///
/// Every operation takes `&self`: the engine relies on interior mutability so
/// that handlers, which receive the engine by reference, can call back into
/// `tran` while an event is being dispatched. One instance must only ever be
/// driven from a single thread.
pub struct HsmEngine<S: StateConstraint, E: EventConstraint, P: 'static> {
    name: String,
    mapping: RefCell<StateMapping<S, E, P>>,
    current: RefCell<Target<S>>,
    /// Set for the duration of the EXIT/ENTRY phases of a transition.
    /// Transitions are rejected while it is held.
    lock: Cell<bool>,
    logger: HsmLogger,
    unhandled_hook: RefCell<Option<UnhandledHook<E, P>>>,
}

impl<S: StateConstraint, E: EventConstraint, P: 'static> HsmEngine<S, E, P> {
    /// Create an engine. States are attached afterwards with `add_state`,
    /// and the machine starts at the root until `set_initial` is called.
    pub fn new(name: impl Into<String>) -> Self {
        HsmEngine {
            name: name.into(),
            mapping: RefCell::new(StateMapping::new()),
            current: RefCell::new(Target::Root),
            lock: Cell::new(false),
            logger: HsmLogger::new(),
            unhandled_hook: RefCell::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register `state` under `parent`. Parentless states nest directly under
    /// the engine-owned root. States must be registered before the first
    /// `run` and are immutable afterwards.
    pub fn add_state(
        &self,
        state: S,
        handler: impl StateHandler<S, E, P> + 'static,
        parent: Option<S>,
    ) -> HsmResult<()> {
        self.mapping
            .borrow_mut()
            .add_state(state, Rc::new(handler), parent)
    }

    /// Set the starting state. On error the current state is left untouched.
    pub fn set_initial(&self, state: S) -> HsmResult<()> {
        if !self.mapping.borrow().contains(&state) {
            return Err(HsmError::NotAState(state.to_string()));
        }
        *self.current.borrow_mut() = Target::State(state);
        Ok(())
    }

    pub fn current(&self) -> Target<S> {
        self.current.borrow().clone()
    }

    /// True when `state` is the current state or an ancestor of it
    /// (the root is an ancestor of everything).
    pub fn is_in(&self, state: impl Into<Target<S>>) -> bool {
        let wanted = state.into();
        let mapping = self.mapping.borrow();
        let mut addr = self.current.borrow().clone();
        loop {
            if addr == wanted {
                return true;
            }
            match addr {
                Target::Root => return false,
                Target::State(_) => addr = mapping.parent_of(&addr),
            }
        }
    }

    /// Select which debug categories print for this machine.
    pub fn set_debug(&self, mask: DebugMask) {
        self.logger.set_mask(mask);
    }

    /// Drop `mask` from the debug output of the next `run` only; the
    /// configured mask is restored when that run returns.
    pub fn suppress_debug(&self, mask: DebugMask) {
        self.logger.suppress(mask);
    }

    /// Prefix placed in front of every debug line of this machine.
    pub fn set_prefix(&self, prefix: &str) {
        self.logger.set_prefix(prefix);
    }

    /// Override what happens when an event falls past the root unhandled.
    /// The engine still logs and consumes the event either way.
    pub fn set_unhandled_hook(&self, hook: UnhandledHook<E, P>) {
        *self.unhandled_hook.borrow_mut() = Some(hook);
    }

    /// Deliver `event` to the current state and forward it up the parent
    /// chain until some handler consumes it. Events nobody wants are dropped
    /// by the root with a diagnostic.
    pub fn run(&self, event: E, param: Option<&P>) {
        if self.lock.get() {
            log::error!(
                "Illegal call of run({}) on {} in ENTRY or EXIT handler",
                event,
                self.name
            );
            return;
        }
        let mut addr = self.current();
        self.logger.show(
            DebugMask::RUN,
            format_args!("Run {}[{}](evt:{})", self.name, addr, event),
        );

        let mut pending = Some(event);
        while let Some(event) = pending.take() {
            if matches!(addr, Target::Root) {
                self.drop_event(&event, param);
                break;
            }
            let handler = match self.handler_at(&addr) {
                Some(handler) => handler,
                None => break,
            };
            let wrapped = Event::User(event);
            if let Some(next) = handler.on_event(self, &wrapped, param) {
                addr = self.mapping.borrow().parent_of(&addr);
                self.logger.show(
                    DebugMask::RUN,
                    format_args!(
                        "  evt:{} unhandled, passing to {}[{}]",
                        next, self.name, addr
                    ),
                );
                pending = Some(next);
            }
        }

        // One-shot suppression only covers the run that just finished.
        self.logger.restore();
    }

    /// Transition to `target`, delivering EXIT events bottom-up from the
    /// current state to (but not including) the least common ancestor, then
    /// ENTRY events top-down to the target, then INIT on the target.
    ///
    /// Legal from user-event handlers and from INIT handlers (that is how a
    /// composite state drives into its default child); never from ENTRY or
    /// EXIT handlers.
    pub fn tran(&self, target: impl Into<Target<S>>, param: Option<&P>) {
        self.tran_impl(target.into(), param, None)
    }

    /// Like `tran`, with `action` invoked between the last EXIT and the
    /// first ENTRY.
    pub fn tran_with(
        &self,
        target: impl Into<Target<S>>,
        param: Option<&P>,
        action: &dyn Fn(Option<&P>),
    ) {
        self.tran_impl(target.into(), param, Some(action))
    }

    fn tran_impl(&self, target: Target<S>, param: Option<&P>, action: Option<&dyn Fn(Option<&P>)>) {
        let source = self.current();
        if self.lock.get() {
            log::error!(
                "Illegal call of tran {}[{} -> {}] in ENTRY or EXIT handler",
                self.name,
                source,
                target
            );
            return;
        }
        if let Target::State(state) = &target {
            if !self.mapping.borrow().contains(state) {
                log::error!(
                    "Cannot tran {}[{} -> {}]: target is not a state of this machine",
                    self.name,
                    source,
                    target
                );
                return;
            }
        }
        self.lock.set(true);
        self.logger.show(
            DebugMask::TRAN,
            format_args!("Tran {}[{} -> {}]", self.name, source, target),
        );

        let (exits, entries) = self.mapping.borrow().chains(&source, &target);

        for addr in &exits {
            self.logger.show(
                DebugMask::INTACT,
                format_args!("  {}[{}](EXIT)", self.name, addr),
            );
            self.dispatch_pseudo(addr, &Event::Exit, param);
        }

        if let Some(action) = action {
            action(param);
        }

        for addr in entries.iter().rev() {
            self.logger.show(
                DebugMask::INTACT,
                format_args!("  {}[{}](ENTRY)", self.name, addr),
            );
            self.dispatch_pseudo(addr, &Event::Entry, param);
        }

        *self.current.borrow_mut() = target.clone();
        self.lock.set(false);

        // INIT runs after the commit with the lock released: an INIT handler
        // is allowed to tran again, recursing this whole procedure to drive
        // a composite state into its default child.
        self.logger.show(
            DebugMask::INTACT,
            format_args!("  {}[{}](INIT)", self.name, target),
        );
        self.dispatch_pseudo(&target, &Event::Init, param);
    }

    /// Deliver a pseudo-event. Handler return values are ignored here; the
    /// root has no handler and swallows everything.
    fn dispatch_pseudo(&self, addr: &Target<S>, event: &Event<E>, param: Option<&P>) {
        if let Some(handler) = self.handler_at(addr) {
            let _ = handler.on_event(self, event, param);
        }
    }

    fn handler_at(&self, addr: &Target<S>) -> Option<HandlerRef<S, E, P>> {
        self.mapping.borrow().handler_of(addr)
    }

    fn drop_event(&self, event: &E, param: Option<&P>) {
        log::warn!(
            "Event:{} dropped, No Parent handling of {}[{}]",
            event,
            self.name,
            self.current.borrow()
        );
        if let Some(hook) = self.unhandled_hook.borrow().as_ref() {
            hook(event, param);
        }
    }
}
