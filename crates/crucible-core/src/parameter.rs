//! Parameter model: positional and option parameters attached to a command.

use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

use crate::typeparse::TypeParser;

/// Compile-time identity of a parameter's declared value type.
///
/// Captured at build time so signature identifiers and switch detection work
/// without any runtime reflection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeMeta {
    id: TypeId,
    name: &'static str,
}

impl TypeMeta {
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is<T: 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

/// How many value fragments a parameter consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cardinality {
    /// Exactly one fragment; required unless a default is declared.
    #[default]
    Single,
    /// Zero or one fragment.
    Optional,
    /// Any number of fragments, collected in order.
    Multiple,
    /// Absorbs all remaining raw text as one fragment. Positional only.
    Remainder,
}

/// Names and behavior of an option parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionData {
    short_names: Vec<char>,
    long_names: Vec<String>,
    group: Option<String>,
    greedy: bool,
    switch: bool,
}

impl OptionData {
    pub(crate) fn new(
        short_names: Vec<char>,
        long_names: Vec<String>,
        group: Option<String>,
        greedy: bool,
        switch: bool,
    ) -> Self {
        Self {
            short_names,
            long_names,
            group,
            greedy,
            switch,
        }
    }

    /// Single-character aliases (`-r`).
    pub fn short_names(&self) -> &[char] {
        &self.short_names
    }

    /// Multi-character aliases (`--reason`).
    pub fn long_names(&self) -> &[String] {
        &self.long_names
    }

    /// Mutual-exclusion group tag, if any.
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// Whether the option keeps consuming value tokens until the next flag.
    pub fn is_greedy(&self) -> bool {
        self.greedy
    }

    /// Whether the option is a zero-argument switch (boolean defaulting to
    /// `false`, set by mere presence).
    pub fn is_switch(&self) -> bool {
        self.switch
    }

    /// The name used in diagnostics: the first long name, else the first
    /// short name.
    pub fn display_name(&self) -> String {
        if let Some(long) = self.long_names.first() {
            long.clone()
        } else {
            self.short_names
                .first()
                .map(char::to_string)
                .unwrap_or_default()
        }
    }
}

/// A positional or option parameter. Immutable once attached to a command;
/// owned by exactly one command.
pub struct Parameter {
    name: String,
    ty: TypeMeta,
    cardinality: Cardinality,
    option: Option<OptionData>,
    default: Option<String>,
    parser: Arc<dyn TypeParser>,
}

impl Parameter {
    pub(crate) fn new(
        name: String,
        ty: TypeMeta,
        cardinality: Cardinality,
        option: Option<OptionData>,
        default: Option<String>,
        parser: Arc<dyn TypeParser>,
    ) -> Self {
        Self {
            name,
            ty,
            cardinality,
            option,
            default,
            parser,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &TypeMeta {
        &self.ty
    }

    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    /// Option metadata; `None` for positional parameters.
    pub fn option(&self) -> Option<&OptionData> {
        self.option.as_ref()
    }

    pub fn is_option(&self) -> bool {
        self.option.is_some()
    }

    pub fn is_remainder(&self) -> bool {
        matches!(self.cardinality, Cardinality::Remainder)
    }

    pub fn is_multiple(&self) -> bool {
        matches!(self.cardinality, Cardinality::Multiple)
    }

    pub fn is_greedy(&self) -> bool {
        self.option.as_ref().is_some_and(OptionData::is_greedy)
    }

    pub fn is_switch(&self) -> bool {
        self.option.as_ref().is_some_and(OptionData::is_switch)
    }

    /// Raw default text, fed through the type parser when the parameter is
    /// left unsatisfied.
    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// The type parser converting raw fragments into typed values.
    pub fn parser(&self) -> &Arc<dyn TypeParser> {
        &self.parser
    }

    /// Whether the binder must fail when no fragment was bound.
    ///
    /// Options are never required; a positional is required when it takes
    /// exactly one fragment (or the remainder) and declares no default.
    pub fn is_required(&self) -> bool {
        !self.is_option()
            && self.default.is_none()
            && matches!(self.cardinality, Cardinality::Single | Cardinality::Remainder)
    }
}

impl fmt::Debug for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parameter")
            .field("name", &self.name)
            .field("ty", &self.ty.name())
            .field("cardinality", &self.cardinality)
            .field("option", &self.option)
            .field("default", &self.default)
            .finish_non_exhaustive()
    }
}
