use crate::{TriggerBinding, TriggerIdentity};

/// The pair of configured triggers.
///
/// `push_to_talk` is `None` when the user has not configured a separate
/// push-to-talk key, in which case the toggle key does both jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerBindings {
    /// The tap-to-toggle trigger.
    pub toggle: TriggerBinding,
    /// The hold-to-talk trigger, if distinct from the toggle.
    pub push_to_talk: Option<TriggerBinding>,
}

impl TriggerBindings {
    /// Create a binding pair.
    pub fn new(toggle: TriggerBinding, push_to_talk: Option<TriggerBinding>) -> Self {
        Self {
            toggle,
            push_to_talk,
        }
    }

    /// True when one physical key serves both triggers.
    pub fn is_shared(&self) -> bool {
        self.push_to_talk
            .is_none_or(|ptt| ptt.shares_keys_with(&self.toggle))
    }

    /// Classify the bindings into the OS registrations they need.
    ///
    /// One entry tagged [`TriggerIdentity::Shared`] when the bindings coincide,
    /// otherwise one entry per exclusive trigger.
    pub fn classify(&self) -> Vec<(TriggerBinding, TriggerIdentity)> {
        match self.push_to_talk {
            Some(ptt) if !ptt.shares_keys_with(&self.toggle) => vec![
                (self.toggle, TriggerIdentity::ToggleOnly),
                (ptt, TriggerIdentity::PushToTalkOnly),
            ],
            _ => vec![(self.toggle, TriggerIdentity::Shared)],
        }
    }
}
