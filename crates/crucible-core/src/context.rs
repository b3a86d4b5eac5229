//! Per-invocation context handed to type parsers, checks, and handlers.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::args::{Arguments, RawArguments};
use crate::command::Command;

/// Caller-supplied state visible to type parsers, checks, cooldown key
/// providers, and handlers.
///
/// Hosts stash whatever identifies the invocation here (user id, channel
/// id, a protocol session handle) before executing, and read it back by
/// type. Entries are immutable once inserted.
#[derive(Clone, Default)]
pub struct StateMap {
    entries: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl StateMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, replacing any previous value of the same type.
    pub fn insert<T: Send + Sync + 'static>(&mut self, value: T) {
        self.entries.insert(TypeId::of::<T>(), Arc::new(value));
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with<T: Send + Sync + 'static>(mut self, value: T) -> Self {
        self.insert(value);
        self
    }

    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.entries
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref())
    }
}

impl fmt::Debug for StateMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMap")
            .field("len", &self.entries.len())
            .finish()
    }
}

/// Everything a matched invocation knows about itself: the chosen command,
/// the alias path it was matched under, the raw fragments, the typed
/// arguments once bound, and the host's [`StateMap`].
pub struct CommandContext {
    command: Arc<Command>,
    path: Vec<String>,
    raw_arguments: RawArguments,
    arguments: Arguments,
    state: StateMap,
}

impl CommandContext {
    pub fn new(
        command: Arc<Command>,
        path: Vec<String>,
        raw_arguments: RawArguments,
        state: StateMap,
    ) -> Self {
        let arguments = Arguments::empty(command.clone());
        Self {
            command,
            path,
            raw_arguments,
            arguments,
            state,
        }
    }

    pub fn command(&self) -> &Arc<Command> {
        &self.command
    }

    /// The alias path segments the command was matched under.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub fn raw_arguments(&self) -> &RawArguments {
        &self.raw_arguments
    }

    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    /// Installs the binder's output. Called once, between parsing and check
    /// evaluation.
    pub fn set_arguments(&mut self, arguments: Arguments) {
        self.arguments = arguments;
    }

    pub fn state<T: 'static>(&self) -> Option<&T> {
        self.state.get()
    }

    pub fn state_map(&self) -> &StateMap {
        &self.state
    }
}
