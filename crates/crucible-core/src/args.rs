//! Raw and typed argument bindings.
//!
//! [`RawArguments`] is the argument parsers' output: per-parameter text
//! fragments, created transiently per parse attempt and discarded on
//! failure. [`Arguments`] is the binder's output: the same slots filled
//! with type-parsed values, ready for the handler.

use std::any::Any;
use std::sync::Arc;

use crate::command::Command;

/// The fragments bound to one parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawArgument {
    /// One text fragment.
    Single(String),
    /// Ordered fragments of a multi-value parameter, or the pieces of a
    /// remainder/greedy value before flattening.
    Many(Vec<String>),
}

/// Mapping from parameter (by declaration index) to raw text fragments.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawArguments {
    values: Vec<Option<RawArgument>>,
}

impl RawArguments {
    /// Creates an empty binding with one slot per command parameter.
    pub fn for_command(command: &Command) -> Self {
        Self {
            values: vec![None; command.parameters().len()],
        }
    }

    /// Appends a fragment to the parameter at `index`. With `multiple`, the
    /// slot accumulates an ordered list; otherwise it holds one fragment.
    pub(crate) fn push(&mut self, index: usize, fragment: String, multiple: bool) {
        match &mut self.values[index] {
            Some(RawArgument::Many(list)) => list.push(fragment),
            slot => {
                *slot = Some(if multiple {
                    RawArgument::Many(vec![fragment])
                } else {
                    RawArgument::Single(fragment)
                });
            }
        }
    }

    /// Joins an accumulated fragment list into one fragment with single
    /// spaces. Used for remainder parameters and greedy string options.
    pub(crate) fn flatten(&mut self, index: usize) {
        if let Some(RawArgument::Many(list)) = &self.values[index] {
            self.values[index] = Some(RawArgument::Single(list.join(" ")));
        }
    }

    pub fn get(&self, index: usize) -> Option<&RawArgument> {
        self.values.get(index).and_then(Option::as_ref)
    }

    pub fn is_bound(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over bound slots as `(parameter index, fragments)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &RawArgument)> {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.as_ref().map(|v| (i, v)))
    }
}

/// A type-parsed value, produced by a [`TypeParser`](crate::TypeParser).
pub type ArgumentValue = Box<dyn Any + Send + Sync>;

/// The typed values bound to one parameter.
pub enum BoundValue {
    Single(ArgumentValue),
    Many(Vec<ArgumentValue>),
}

/// Typed arguments for one command invocation, queried by parameter name.
pub struct Arguments {
    command: Arc<Command>,
    values: Vec<Option<BoundValue>>,
}

impl Arguments {
    /// An empty binding; every lookup misses.
    pub fn empty(command: Arc<Command>) -> Self {
        let len = command.parameters().len();
        Self {
            command,
            values: (0..len).map(|_| None).collect(),
        }
    }

    /// Assembles the binder's output. `values` must be parallel to the
    /// command's parameter list.
    pub fn new(command: Arc<Command>, values: Vec<Option<BoundValue>>) -> Self {
        debug_assert_eq!(values.len(), command.parameters().len());
        Self { command, values }
    }

    /// The single value bound to the named parameter, downcast to `T`.
    pub fn get<T: 'static>(&self, name: &str) -> Option<&T> {
        match self.slot(name)? {
            BoundValue::Single(value) => value.downcast_ref(),
            BoundValue::Many(_) => None,
        }
    }

    /// All values bound to the named multi-value parameter, downcast to `T`.
    pub fn get_all<T: 'static>(&self, name: &str) -> Option<Vec<&T>> {
        match self.slot(name)? {
            BoundValue::Many(values) => values.iter().map(|v| v.downcast_ref()).collect(),
            BoundValue::Single(_) => None,
        }
    }

    /// Whether the named parameter received any value.
    pub fn is_bound(&self, name: &str) -> bool {
        self.slot(name).is_some()
    }

    fn slot(&self, name: &str) -> Option<&BoundValue> {
        let index = self.command.parameter_index(name)?;
        self.values.get(index).and_then(Option::as_ref)
    }
}
