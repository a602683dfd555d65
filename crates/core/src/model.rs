//! Model database abstraction.
//!
//! The translation core never owns model data. It reads compiled machines
//! and contexts through the [`ModelDatabase`] trait, one lookup at a time,
//! and wraps any failure into a `ModelAccessError` at its boundary.
//! [`InMemoryDatabase`] serves tests and the command-line driver; it can be
//! filled from a JSON [`ModelSnapshot`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::DatabaseError;
use crate::types::Type;

// ──────────────────────────────────────────────
// Compiled model elements
// ──────────────────────────────────────────────

/// A declared name with its type: a variable, parameter or constant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Type,
}

impl Identifier {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Identifier {
            name: name.into(),
            ty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledEvent {
    pub label: String,
    #[serde(default)]
    pub parameters: Vec<Identifier>,
    /// Labels of the abstract events this event refines.
    #[serde(default)]
    pub refines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledMachine {
    pub name: String,
    #[serde(default)]
    pub variables: Vec<Identifier>,
    #[serde(default)]
    pub events: Vec<CompiledEvent>,
    /// The abstract machine, if this machine is a refinement.
    #[serde(default)]
    pub refines: Option<String>,
    /// Contexts whose sets and constants are visible in this machine.
    #[serde(default)]
    pub sees: Vec<String>,
}

impl CompiledMachine {
    pub fn event(&self, label: &str) -> Option<&CompiledEvent> {
        self.events.iter().find(|e| e.label == label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledContext {
    pub name: String,
    /// Carrier sets; each set `S` is declared with type ℙ(S).
    #[serde(default)]
    pub sets: Vec<String>,
    #[serde(default)]
    pub constants: Vec<Identifier>,
    #[serde(default)]
    pub extends: Vec<String>,
}

// ──────────────────────────────────────────────
// Model roots
// ──────────────────────────────────────────────

/// The model unit a formula is written against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ModelRoot {
    Machine(String),
    CompiledMachine(String),
    Context(String),
    CompiledContext(String),
}

impl ModelRoot {
    pub fn name(&self) -> &str {
        match self {
            ModelRoot::Machine(n)
            | ModelRoot::CompiledMachine(n)
            | ModelRoot::Context(n)
            | ModelRoot::CompiledContext(n) => n,
        }
    }
}

impl fmt::Display for ModelRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            ModelRoot::Machine(_) => "machine",
            ModelRoot::CompiledMachine(_) => "sc-machine",
            ModelRoot::Context(_) => "context",
            ModelRoot::CompiledContext(_) => "sc-context",
        };
        write!(f, "{}:{}", kind, self.name())
    }
}

/// Parses the `kind:name` form produced by `Display`.
impl FromStr for ModelRoot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, name) = s
            .split_once(':')
            .ok_or_else(|| format!("expected KIND:NAME, got '{}'", s))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(format!("missing model name in '{}'", s));
        }
        let name = name.to_owned();
        match kind.trim() {
            "machine" => Ok(ModelRoot::Machine(name)),
            "sc-machine" => Ok(ModelRoot::CompiledMachine(name)),
            "context" => Ok(ModelRoot::Context(name)),
            "sc-context" => Ok(ModelRoot::CompiledContext(name)),
            other => Err(format!(
                "unknown model kind '{}'; expected machine, sc-machine, context or sc-context",
                other
            )),
        }
    }
}

// ──────────────────────────────────────────────
// Database trait
// ──────────────────────────────────────────────

/// Read access to compiled model state.
///
/// Source roots resolve to their compiled form through the same lookups;
/// compilation itself happens elsewhere.
pub trait ModelDatabase {
    fn compiled_machine(&self, name: &str) -> Result<CompiledMachine, DatabaseError>;

    fn compiled_context(&self, name: &str) -> Result<CompiledContext, DatabaseError>;
}

/// Map-backed database.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDatabase {
    machines: HashMap<String, CompiledMachine>,
    contexts: HashMap<String, CompiledContext>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_machine(mut self, machine: CompiledMachine) -> Self {
        self.add_machine(machine);
        self
    }

    pub fn with_context(mut self, context: CompiledContext) -> Self {
        self.add_context(context);
        self
    }

    pub fn add_machine(&mut self, machine: CompiledMachine) {
        self.machines.insert(machine.name.clone(), machine);
    }

    pub fn add_context(&mut self, context: CompiledContext) {
        self.contexts.insert(context.name.clone(), context);
    }

    pub fn from_snapshot(snapshot: ModelSnapshot) -> Self {
        let mut db = Self::new();
        for m in snapshot.machines {
            db.add_machine(m);
        }
        for c in snapshot.contexts {
            db.add_context(c);
        }
        db
    }
}

impl ModelDatabase for InMemoryDatabase {
    fn compiled_machine(&self, name: &str) -> Result<CompiledMachine, DatabaseError> {
        self.machines
            .get(name)
            .cloned()
            .ok_or_else(|| DatabaseError::MachineNotFound(name.to_owned()))
    }

    fn compiled_context(&self, name: &str) -> Result<CompiledContext, DatabaseError> {
        self.contexts
            .get(name)
            .cloned()
            .ok_or_else(|| DatabaseError::ContextNotFound(name.to_owned()))
    }
}

// ──────────────────────────────────────────────
// Snapshots
// ──────────────────────────────────────────────

/// JSON description of compiled model state.
///
/// ```json
/// {
///   "contexts": [{ "name": "C0", "sets": ["S"], "constants": [{ "name": "c", "type": "S" }] }],
///   "machines": [{ "name": "M0", "sees": ["C0"],
///                  "variables": [{ "name": "x", "type": "ℤ" }],
///                  "events": [{ "label": "inc", "parameters": [{ "name": "d", "type": "INT" }] }] }]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSnapshot {
    #[serde(default)]
    pub machines: Vec<CompiledMachine>,
    #[serde(default)]
    pub contexts: Vec<CompiledContext>,
}

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("could not read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse model snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

impl ModelSnapshot {
    pub fn from_json_str(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let content = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_kind_name_round_trip() {
        for root in [
            ModelRoot::Machine("M0".into()),
            ModelRoot::CompiledMachine("M0".into()),
            ModelRoot::Context("C0".into()),
            ModelRoot::CompiledContext("C0".into()),
        ] {
            let text = root.to_string();
            assert_eq!(text.parse::<ModelRoot>().unwrap(), root);
        }
    }

    #[test]
    fn root_parse_rejects_unknown_kind() {
        let err = "theory:T".parse::<ModelRoot>().unwrap_err();
        assert!(err.contains("unknown model kind"));
    }

    #[test]
    fn in_memory_lookup_reports_missing_elements() {
        let db = InMemoryDatabase::new();
        assert_eq!(
            db.compiled_machine("M9").unwrap_err(),
            DatabaseError::MachineNotFound("M9".into())
        );
        assert_eq!(
            db.compiled_context("C9").unwrap_err(),
            DatabaseError::ContextNotFound("C9".into())
        );
    }

    #[test]
    fn snapshot_parses_types_in_either_notation() {
        let snap = ModelSnapshot::from_json_str(
            r#"{
                "machines": [{
                    "name": "M0",
                    "variables": [{ "name": "x", "type": "INT" },
                                  { "name": "r", "type": "POW(S ** BOOL)" }],
                    "events": [{ "label": "go" }]
                }]
            }"#,
        )
        .unwrap();
        let m = &snap.machines[0];
        assert_eq!(m.variables[0].ty, Type::Integer);
        assert_eq!(
            m.variables[1].ty,
            Type::relation(Type::Given("S".into()), Type::Boolean)
        );
        assert!(m.event("go").is_some());
        assert!(m.refines.is_none());
    }

    #[test]
    fn snapshot_with_bad_type_is_rejected() {
        let err = ModelSnapshot::from_json_str(
            r#"{ "contexts": [{ "name": "C", "constants": [{ "name": "c", "type": "POW(" }] }] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, SnapshotError::Json(_)));
    }
}
