use crate::error::AppError;
use crate::observable::{PropertyChange, PropertyObservers, SubscriptionId};
use std::fmt;
use tracing::debug;

pub type Action<C, P> = Box<dyn Fn(&mut C, &P)>;
pub type Predicate<C, P> = Box<dyn Fn(&C, &P) -> bool>;

/// Property reported to enablement listeners.
pub const CAN_EXECUTE: &str = "can_execute";

/// A named, enablement-aware action over a context `C`.
///
/// The presentation layer only ever sees `can_execute` / `execute`; what the
/// action does to the context stays with whoever built the command.
/// Enablement changes are pushed explicitly through
/// [`Command::notify_can_execute_changed`] by the code that knows the inputs
/// of the predicate changed.
pub struct Command<C, P = ()> {
    name: &'static str,
    action: Action<C, P>,
    predicate: Option<Predicate<C, P>>,
    observers: PropertyObservers,
}

impl<C, P> Command<C, P> {
    pub fn new<F>(name: &'static str, action: F) -> Self
    where
        F: Fn(&mut C, &P) + 'static,
    {
        Self {
            name,
            action: Box::new(action),
            predicate: None,
            observers: PropertyObservers::new(),
        }
    }

    /// Builds a command from optional parts. The action is mandatory; a
    /// missing predicate means the command is always enabled.
    pub fn from_parts(
        name: &'static str,
        action: Option<Action<C, P>>,
        predicate: Option<Predicate<C, P>>,
    ) -> Result<Self, AppError> {
        let action = action.ok_or_else(|| {
            AppError::invalid_input(format!("command '{name}' requires an action"))
        })?;

        Ok(Self {
            name,
            action,
            predicate,
            observers: PropertyObservers::new(),
        })
    }

    pub fn with_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&C, &P) -> bool + 'static,
    {
        self.predicate = Some(Box::new(predicate));
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn can_execute(&self, context: &C, parameter: &P) -> bool {
        match self.predicate.as_ref() {
            Some(predicate) => predicate(context, parameter),
            None => true,
        }
    }

    /// Runs the action when the command is enabled. A disabled command is a
    /// no-op; the return value says whether the action ran.
    pub fn execute(&self, context: &mut C, parameter: &P) -> bool {
        if !self.can_execute(context, parameter) {
            debug!(command = self.name, "skipping disabled command");
            return false;
        }

        debug!(command = self.name, "executing command");
        (self.action)(context, parameter);
        true
    }

    pub fn subscribe_can_execute_changed<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&PropertyChange) + 'static,
    {
        self.observers.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn notify_can_execute_changed(&mut self) {
        self.observers.notify_changed(CAN_EXECUTE);
    }
}

impl<C, P> fmt::Debug for Command<C, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("has_predicate", &self.predicate.is_some())
            .field("observers", &self.observers)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{Action, CAN_EXECUTE, Command, Predicate};
    use crate::observable::testing::recorder;

    #[derive(Default)]
    struct Counter {
        value: i32,
        locked: bool,
    }

    fn increment() -> Command<Counter, Option<i32>> {
        Command::new("increment", |counter: &mut Counter, step: &Option<i32>| {
            counter.value += step.unwrap_or(1);
        })
        .with_predicate(|counter: &Counter, _: &Option<i32>| !counter.locked)
    }

    #[test]
    fn command_without_predicate_is_always_enabled() {
        let command: Command<Counter> =
            Command::new("reset", |counter: &mut Counter, _: &()| counter.value = 0);
        let mut counter = Counter {
            value: 5,
            locked: true,
        };

        assert!(command.can_execute(&counter, &()));
        assert!(command.execute(&mut counter, &()));
        assert_eq!(counter.value, 0);
    }

    #[test]
    fn execute_passes_parameter_to_action() {
        let command = increment();
        let mut counter = Counter::default();

        assert!(command.execute(&mut counter, &Some(4)));
        assert!(command.execute(&mut counter, &None));
        assert_eq!(counter.value, 5);
    }

    #[test]
    fn disabled_command_is_a_no_op() {
        let command = increment();
        let mut counter = Counter {
            value: 1,
            locked: true,
        };

        assert!(!command.can_execute(&counter, &Some(2)));
        assert!(!command.execute(&mut counter, &Some(2)));
        assert_eq!(counter.value, 1);
    }

    #[test]
    fn from_parts_rejects_missing_action() {
        let predicate: Predicate<Counter, ()> = Box::new(|_: &Counter, _: &()| true);
        let err = Command::from_parts("broken", None, Some(predicate)).unwrap_err();

        assert_eq!(err.code(), "invalid_input");
        assert!(err.message().contains("broken"));
    }

    #[test]
    fn from_parts_accepts_missing_predicate() {
        let action: Action<Counter, ()> =
            Box::new(|counter: &mut Counter, _: &()| counter.value += 10);
        let command = Command::from_parts("bump", Some(action), None).unwrap();
        let mut counter = Counter {
            value: 0,
            locked: true,
        };

        assert_eq!(command.name(), "bump");
        assert!(command.execute(&mut counter, &()));
        assert_eq!(counter.value, 10);
    }

    #[test]
    fn notify_can_execute_changed_reaches_listeners() {
        let mut command = increment();
        let (seen, listener) = recorder();
        let id = command.subscribe_can_execute_changed(listener);

        command.notify_can_execute_changed();
        assert!(command.unsubscribe(id));
        command.notify_can_execute_changed();

        assert_eq!(*seen.borrow(), vec![CAN_EXECUTE]);
    }
}
