use std::{borrow::Cow, collections::HashMap, fmt::Display};

/// Names derived during resolution, never taken from the process environment
///
/// Windows matches environment variable names case insensitively, so without this `$path$` would
/// silently pick up `PATH` wherever the derived value was not (yet) in scope.
pub const DERIVED_VARIABLES: [&str; 7] = [
    "drive",
    "path",
    "src_drive",
    "dst_drive",
    "src_path",
    "dst_path",
    "timestamp",
];

/// Keeps track of variables and provides access to definitions from earlier stages
///
/// Each stage of resolution pushes a frame on top of the frames it was computed from: the
/// environment, then an endpoint's own `$drive$` and `$path$`, then the job wide variables.
/// A frame can only see its parents, so a value computed for one stage can never depend on a
/// later one.
pub struct StackFrame<'p> {
    parent: Option<&'p StackFrame<'p>>,

    /// Collection of variables and values at this level of the stack
    variables: VariableSource,
}

impl<'p> StackFrame<'p> {
    /// Starts a new stack
    pub fn stack(variables: VariableSource) -> Self {
        StackFrame {
            parent: None,
            variables,
        }
    }

    /// Starts a new stack over the process environment
    pub fn environment() -> Self {
        StackFrame::stack(VariableSource::Environment)
    }

    /// Adds a frame whose variables shadow those of this one
    pub fn push(&self, variables: VariableSource) -> StackFrame<'_> {
        StackFrame {
            parent: Some(self),
            variables,
        }
    }

    pub fn variables(&self) -> &VariableSource {
        &self.variables
    }

    /// Finds the value of a variable, searching from this frame down to the first
    pub fn lookup(&self, name: &str) -> Option<Cow<'_, str>> {
        self.variables
            .get(name)
            .or_else(|| self.parent.and_then(|parent| parent.lookup(name)))
    }
}

/// Where the variables of a [`StackFrame`] come from
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum VariableSource {
    #[default]
    Empty,
    /// The process environment, read at the time of lookup (except [`DERIVED_VARIABLES`])
    Environment,
    /// A fixed set of variables
    Map(HashMap<String, String>),
}

impl VariableSource {
    fn get(&self, name: &str) -> Option<Cow<'_, str>> {
        match self {
            VariableSource::Empty => None,
            VariableSource::Environment => {
                if DERIVED_VARIABLES.contains(&name) {
                    None
                } else {
                    std::env::var(name).ok().map(Cow::Owned)
                }
            }
            VariableSource::Map(map) => map.get(name).map(|value| Cow::Borrowed(value.as_str())),
        }
    }
}

impl From<HashMap<String, String>> for VariableSource {
    fn from(map: HashMap<String, String>) -> Self {
        VariableSource::Map(map)
    }
}

impl Display for StackFrame<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.variables {
            VariableSource::Empty => write!(f, "(no variables)")?,
            VariableSource::Environment => write!(f, "Process environment")?,
            VariableSource::Map(map) => {
                write!(f, "Variable map:")?;
                let mut keys: Vec<&String> = map.keys().collect();
                keys.sort();
                for key in keys {
                    write!(f, "\n  ${key}$ = \"{}\"", map[key])?;
                }
            }
        }
        if let Some(parent) = self.parent {
            write!(f, "\n{parent}")?;
        }
        Ok(())
    }
}
