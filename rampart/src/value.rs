//! Typed values for the generator variables the inspector edits.
//!
//! Every variable carries a runtime type tag ([`ValueKind`]); edits arrive
//! as text and go through [`parse`], which reports failures as errors
//! instead of panicking. List-typed variables are append-only from the
//! inspector's point of view: one successful edit adds one element.

use std::fmt;
use std::num::IntErrorKind;

use rustc_hash::FxHashMap;
use thiserror::Error;

/// The scalar type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    Int,
    Float,
    Text,
}

/// The full type tag of a variable: a scalar, or a list of one scalar kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Scalar(ScalarKind),
    List(ScalarKind),
}

/// A single scalar value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    pub fn kind(&self) -> ScalarKind {
        match self {
            Scalar::Bool(_) => ScalarKind::Bool,
            Scalar::Int(_) => ScalarKind::Int,
            Scalar::Float(_) => ScalarKind::Float,
            Scalar::Text(_) => ScalarKind::Text,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::Text(s) => write!(f, "{s}"),
        }
    }
}

/// A variable's value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(Scalar),
    List { elem: ScalarKind, items: Vec<Scalar> },
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Scalar(s) => ValueKind::Scalar(s.kind()),
            Value::List { elem, .. } => ValueKind::List(*elem),
        }
    }

    /// Empty list of the given element kind.
    pub fn empty_list(elem: ScalarKind) -> Self {
        Value::List {
            elem,
            items: Vec::new(),
        }
    }

    pub fn int(i: i64) -> Self {
        Value::Scalar(Scalar::Int(i))
    }

    pub fn float(x: f64) -> Self {
        Value::Scalar(Scalar::Float(x))
    }

    pub fn bool(b: bool) -> Self {
        Value::Scalar(Scalar::Bool(b))
    }

    pub fn text(s: impl Into<String>) -> Self {
        Value::Scalar(Scalar::Text(s.into()))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(s) => s.fmt(f),
            Value::List { items, .. } => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    item.fmt(f)?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Why a text literal could not become a [`Scalar`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueParseError {
    #[error("malformed {kind:?} literal {input:?}")]
    Malformed { kind: ScalarKind, input: String },
    #[error("{kind:?} value out of range: {input:?}")]
    OutOfRange { kind: ScalarKind, input: String },
}

/// Parse a text literal into a scalar of the requested kind.
///
/// Bools accept exactly `true`/`false`; ints are `i64` with overflow
/// reported separately from malformed digits; text never fails.
pub fn parse(kind: ScalarKind, input: &str) -> Result<Scalar, ValueParseError> {
    let trimmed = input.trim();
    match kind {
        ScalarKind::Bool => match trimmed {
            "true" => Ok(Scalar::Bool(true)),
            "false" => Ok(Scalar::Bool(false)),
            _ => Err(ValueParseError::Malformed {
                kind,
                input: input.to_owned(),
            }),
        },
        ScalarKind::Int => trimmed.parse::<i64>().map(Scalar::Int).map_err(|err| {
            match err.kind() {
                IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                    ValueParseError::OutOfRange {
                        kind,
                        input: input.to_owned(),
                    }
                }
                _ => ValueParseError::Malformed {
                    kind,
                    input: input.to_owned(),
                },
            }
        }),
        ScalarKind::Float => trimmed
            .parse::<f64>()
            .map(Scalar::Float)
            .map_err(|_| ValueParseError::Malformed {
                kind,
                input: input.to_owned(),
            }),
        ScalarKind::Text => Ok(Scalar::Text(input.to_owned())),
    }
}

/// Errors from writing into a [`ValueStore`].
#[derive(Debug, Error)]
pub enum ValueError {
    #[error("no variable named {0:?}")]
    UnknownName(String),
    #[error("type mismatch for {name:?}: expected {expected:?}, got {got:?}")]
    TypeMismatch {
        name: String,
        expected: ValueKind,
        got: ValueKind,
    },
    #[error("{0:?} is not a list variable")]
    NotAList(String),
    #[error(transparent)]
    Parse(#[from] ValueParseError),
}

/// The generator seam: named, typed variables plus named functions.
///
/// Listing order is the browsing order; indices `0..variable_names().len()`
/// are variables, everything after is functions.
pub trait ValueStore {
    fn variable_names(&self) -> Vec<String>;
    fn function_names(&self) -> Vec<String>;
    fn kind(&self, name: &str) -> Option<ValueKind>;
    fn value(&self, name: &str) -> Option<Value>;
    fn set(&mut self, name: &str, value: Value) -> Result<(), ValueError>;
    fn append(&mut self, name: &str, item: Scalar) -> Result<(), ValueError>;
    fn invoke(&mut self, name: &str) -> Option<Value>;
}

type StoreFn = Box<dyn FnMut() -> Value>;

/// An insertion-ordered [`ValueStore`] usable stand-alone.
///
/// Variables keep their registration order for stable browsing; functions
/// are boxed callbacks whose return value becomes the inspector's response
/// line.
#[derive(Default)]
pub struct Registry {
    var_order: Vec<String>,
    vars: FxHashMap<String, Value>,
    fn_order: Vec<String>,
    funcs: FxHashMap<String, StoreFn>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace a variable. First registration fixes its
    /// position in the browsing order.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> &mut Self {
        let name = name.into();
        if !self.vars.contains_key(&name) {
            self.var_order.push(name.clone());
        }
        self.vars.insert(name, value);
        self
    }

    /// Register or replace a function.
    pub fn insert_fn(
        &mut self,
        name: impl Into<String>,
        func: impl FnMut() -> Value + 'static,
    ) -> &mut Self {
        let name = name.into();
        if !self.funcs.contains_key(&name) {
            self.fn_order.push(name.clone());
        }
        self.funcs.insert(name, Box::new(func));
        self
    }
}

impl ValueStore for Registry {
    fn variable_names(&self) -> Vec<String> {
        self.var_order.clone()
    }

    fn function_names(&self) -> Vec<String> {
        self.fn_order.clone()
    }

    fn kind(&self, name: &str) -> Option<ValueKind> {
        self.vars.get(name).map(Value::kind)
    }

    fn value(&self, name: &str) -> Option<Value> {
        self.vars.get(name).cloned()
    }

    fn set(&mut self, name: &str, value: Value) -> Result<(), ValueError> {
        let current = self
            .vars
            .get_mut(name)
            .ok_or_else(|| ValueError::UnknownName(name.to_owned()))?;
        if current.kind() != value.kind() {
            return Err(ValueError::TypeMismatch {
                name: name.to_owned(),
                expected: current.kind(),
                got: value.kind(),
            });
        }
        *current = value;
        Ok(())
    }

    fn append(&mut self, name: &str, item: Scalar) -> Result<(), ValueError> {
        let current = self
            .vars
            .get_mut(name)
            .ok_or_else(|| ValueError::UnknownName(name.to_owned()))?;
        match current {
            Value::List { elem, items } => {
                if item.kind() != *elem {
                    return Err(ValueError::TypeMismatch {
                        name: name.to_owned(),
                        expected: ValueKind::List(*elem),
                        got: ValueKind::Scalar(item.kind()),
                    });
                }
                items.push(item);
                Ok(())
            }
            _ => Err(ValueError::NotAList(name.to_owned())),
        }
    }

    fn invoke(&mut self, name: &str) -> Option<Value> {
        self.funcs.get_mut(name).map(|f| f())
    }
}
