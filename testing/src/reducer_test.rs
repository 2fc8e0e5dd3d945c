//! Given-When-Then harness for reducers.

#![allow(clippy::module_name_repetitions)]

use showmaster_core::{effect::Effect, reducer::Reducer};

type StateAssertion<S> = Box<dyn FnOnce(&S)>;
type EffectAssertion<A> = Box<dyn FnOnce(&[Effect<A>])>;

/// Runs one action through a reducer and checks the outcome.
///
/// # Example
///
/// ```ignore
/// use showmaster_testing::{ReducerTest, assertions};
///
/// ReducerTest::new(BookingReducer::new())
///     .with_env(env)
///     .given_state(BookingState::default())
///     .when_action(BookingAction::ToggleSeat { seat: "A1".into() })
///     .then_state(|state| assert!(state.selection.is_empty()))
///     .then_effects(assertions::assert_no_effects)
///     .run();
/// ```
pub struct ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    reducer: R,
    environment: Option<E>,
    initial_state: Option<S>,
    actions: Vec<A>,
    state_assertions: Vec<StateAssertion<S>>,
    effect_assertions: Vec<EffectAssertion<A>>,
}

impl<R, S, A, E> ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    /// Start a test for `reducer`.
    #[must_use]
    pub const fn new(reducer: R) -> Self {
        Self {
            reducer,
            environment: None,
            initial_state: None,
            actions: Vec::new(),
            state_assertions: Vec::new(),
            effect_assertions: Vec::new(),
        }
    }

    /// Environment handed to the reducer.
    #[must_use]
    pub fn with_env(mut self, env: E) -> Self {
        self.environment = Some(env);
        self
    }

    /// Given: the starting state.
    #[must_use]
    pub fn given_state(mut self, state: S) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// Given: actions applied before the one under test. Their effects are
    /// discarded.
    #[must_use]
    pub fn given_actions(mut self, actions: impl IntoIterator<Item = A>) -> Self {
        let mut history: Vec<A> = actions.into_iter().collect();
        history.append(&mut self.actions);
        self.actions = history;
        self
    }

    /// When: the action under test.
    #[must_use]
    pub fn when_action(mut self, action: A) -> Self {
        self.actions.push(action);
        self
    }

    /// Then: a check on the final state.
    #[must_use]
    pub fn then_state<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&S) + 'static,
    {
        self.state_assertions.push(Box::new(assertion));
        self
    }

    /// Then: a check on the effects of the last action.
    #[must_use]
    pub fn then_effects<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&[Effect<A>]) + 'static,
    {
        self.effect_assertions.push(Box::new(assertion));
        self
    }

    /// Run the reducer and every assertion.
    ///
    /// # Panics
    ///
    /// Panics if state, action, or environment is missing, or if an
    /// assertion fails.
    #[allow(clippy::panic, clippy::expect_used)]
    pub fn run(self) {
        let mut state = self
            .initial_state
            .expect("Initial state must be set with given_state()");
        let env = self
            .environment
            .expect("Environment must be set with with_env()");
        assert!(!self.actions.is_empty(), "Action must be set with when_action()");

        let mut effects = Vec::new();
        for action in self.actions {
            effects = self.reducer.reduce(&mut state, action, &env).into_vec();
        }

        for assertion in self.state_assertions {
            assertion(&state);
        }
        for assertion in self.effect_assertions {
            assertion(&effects);
        }
    }
}

/// Helper assertions for effects
pub mod assertions {
    use showmaster_core::effect::Effect;

    /// Assert that there are no effects (an empty list or a lone `Effect::None`).
    ///
    /// # Panics
    ///
    /// Panics if any real effect is present.
    #[allow(clippy::panic)]
    pub fn assert_no_effects<A: std::fmt::Debug>(effects: &[Effect<A>]) {
        assert!(
            effects.is_empty() || matches!(effects, [Effect::None]),
            "Expected no effects, but found {}: {:?}",
            effects.len(),
            effects
        );
    }

    /// Assert the number of effects.
    ///
    /// # Panics
    ///
    /// Panics if the count differs.
    #[allow(clippy::panic)]
    pub fn assert_effects_count<A>(effects: &[Effect<A>], expected: usize) {
        assert_eq!(
            effects.len(),
            expected,
            "Expected {expected} effects, but found {}",
            effects.len()
        );
    }

    /// Assert that at least one effect is a remote call (`Effect::Future`).
    ///
    /// # Panics
    ///
    /// Panics if none is found.
    #[allow(clippy::panic)]
    pub fn assert_has_future_effect<A>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().any(|e| matches!(e, Effect::Future(_))),
            "Expected at least one Future effect, but none found"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use showmaster_core::{SmallVec, smallvec};

    #[derive(Clone, Debug)]
    struct Tally {
        count: i32,
    }

    #[derive(Clone, Debug)]
    enum TallyAction {
        Add,
        AddRemotely,
    }

    struct TallyReducer;

    impl Reducer for TallyReducer {
        type State = Tally;
        type Action = TallyAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Tally,
            action: TallyAction,
            (): &(),
        ) -> SmallVec<[Effect<TallyAction>; 4]> {
            match action {
                TallyAction::Add => {
                    state.count += 1;
                    smallvec![Effect::None]
                },
                TallyAction::AddRemotely => {
                    smallvec![Effect::future(async { Some(TallyAction::Add) })]
                },
            }
        }
    }

    #[test]
    fn given_actions_are_applied_first() {
        ReducerTest::new(TallyReducer)
            .with_env(())
            .given_state(Tally { count: 0 })
            .given_actions([TallyAction::Add, TallyAction::Add])
            .when_action(TallyAction::Add)
            .then_state(|s| assert_eq!(s.count, 3))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn future_effects_are_reported() {
        ReducerTest::new(TallyReducer)
            .with_env(())
            .given_state(Tally { count: 0 })
            .when_action(TallyAction::AddRemotely)
            .then_state(|s| assert_eq!(s.count, 0))
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_future_effect(effects);
            })
            .run();
    }
}
