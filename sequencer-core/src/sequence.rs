//! Sequences: ordered, fixed-capacity lists of actions.

use crate::action::{Action, ActionKind, ValidationError};
use heapless::Vec;

/// Capacity of [`Sequence`] when none is given.
pub const DEFAULT_CAPACITY: usize = 32;

/// The sequence has no room for another action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SequenceFull;

impl core::fmt::Display for SequenceFull {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "sequence capacity exceeded")
    }
}

/// An action in a sequence failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidAction {
    pub index: usize,
    pub kind: ActionKind,
    pub error: ValidationError,
}

impl core::fmt::Display for InvalidAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "action {} ({}): {}", self.index, self.kind, self.error)
    }
}

/// Ordered list of actions. Insertion order is execution order.
///
/// The sequencer borrows a sequence immutably for the whole run, so it
/// cannot change once execution begins.
///
/// # Example
///
/// ```
/// use sequencer_core::{Action, Button, Sequence, Stick};
///
/// let mut seq: Sequence = Sequence::new();
/// seq.push(Action::press(Button::A, 0.1).then_wait(0.5)).unwrap();
/// seq.push(Action::stick(Stick::Left, 1.0, 0.0).then_wait(1.0)).unwrap();
/// assert_eq!(seq.len(), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Sequence<const N: usize = DEFAULT_CAPACITY> {
    actions: Vec<Action, N>,
}

impl<const N: usize> Sequence<N> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            actions: Vec::new(),
        }
    }

    /// Build a sequence from a slice of actions.
    ///
    /// # Errors
    ///
    /// [`SequenceFull`] if the slice is longer than `N`.
    pub fn from_actions(actions: &[Action]) -> Result<Self, SequenceFull> {
        let mut seq = Self::new();
        for &action in actions {
            seq.push(action)?;
        }
        Ok(seq)
    }

    /// Append an action.
    ///
    /// # Errors
    ///
    /// [`SequenceFull`] if the sequence already holds `N` actions.
    pub fn push(&mut self, action: Action) -> Result<(), SequenceFull> {
        self.actions.push(action).map_err(|_| SequenceFull)
    }

    /// Add `seconds` to the post-delay of the last action.
    ///
    /// Returns `false` when the sequence is empty.
    pub fn extend_last_delay(&mut self, seconds: f32) -> bool {
        match self.actions.last_mut() {
            Some(last) => {
                last.post_delay += seconds;
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Action> {
        self.actions.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Maximum number of actions.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Validate every action up front.
    ///
    /// The sequencer validates each action again right before dispatching
    /// it; this lets callers reject a bad sequence before anything is sent.
    ///
    /// # Errors
    ///
    /// The first invalid action, with its index.
    pub fn validate(&self) -> Result<(), InvalidAction> {
        for (index, action) in self.actions.iter().enumerate() {
            action.validate().map_err(|error| InvalidAction {
                index,
                kind: action.kind(),
                error,
            })?;
        }
        Ok(())
    }
}

impl<'a, const N: usize> IntoIterator for &'a Sequence<N> {
    type Item = &'a Action;
    type IntoIter = core::slice::Iter<'a, Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
