use crate::context::Context;
use crate::predicate::Predicate;
use std::fmt;
use std::sync::Arc;

/// Side effect fired when a rule's predicate holds
pub type Action = Arc<dyn Fn(&Context) + Send + Sync>;

/// A compiled predicate, optionally paired with an action
#[derive(Clone)]
pub struct Rule {
    predicate: Predicate,
    action: Option<Action>,
}

impl Rule {
    pub fn new(predicate: Predicate) -> Self {
        Self {
            predicate,
            action: None,
        }
    }

    /// Attach an action, replacing any previous one
    pub fn with_action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    pub fn has_action(&self) -> bool {
        self.action.is_some()
    }

    /// Evaluate without firing the action
    pub fn evaluate(&self, ctx: &Context) -> bool {
        self.predicate.evaluate(ctx)
    }

    /// Evaluate and fire the action when the predicate holds
    pub fn execute(&self, ctx: &Context) -> bool {
        let fired = self.evaluate(ctx);
        if fired {
            if let Some(action) = &self.action {
                action(ctx);
            }
        }
        fired
    }
}

impl From<Predicate> for Rule {
    fn from(predicate: Predicate) -> Self {
        Self::new(predicate)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("predicate", &self.predicate)
            .field("has_action", &self.has_action())
            .finish()
    }
}
