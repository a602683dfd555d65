//! Symbol environment construction from model state.
//!
//! Present-state environments:
//! - a machine sees its own variables (abstract machine variables are not
//!   merged) plus the sets and constants of the contexts it sees;
//! - a context sees its own sets and constants plus those of every context
//!   it extends, transitively.
//!
//! Transition environments additionally get the event's parameters and the
//! primed variables of the whole abstraction chain; see
//! [`add_event_parameters`] and [`add_post_state_variables`].

use std::collections::HashSet;

use tracing::debug;

use crate::error::ModelAccessError;
use crate::model::{CompiledEvent, CompiledMachine, Identifier, ModelDatabase, ModelRoot};
use crate::types::{Type, TypeEnvironment};

/// Suffix marking a post-state variable.
pub const PRIME: &str = "'";

pub fn build_environment<D: ModelDatabase + ?Sized>(
    db: &D,
    root: &ModelRoot,
) -> Result<TypeEnvironment, ModelAccessError> {
    let mut env = TypeEnvironment::new();
    let mut visited: HashSet<String> = HashSet::new();

    match root {
        ModelRoot::Machine(name) | ModelRoot::CompiledMachine(name) => {
            let machine = db.compiled_machine(name)?;
            add_identifiers(&mut env, &machine.variables, "");
            for context in &machine.sees {
                add_context(db, context, &mut env, &mut visited)?;
            }
        }
        ModelRoot::Context(name) | ModelRoot::CompiledContext(name) => {
            add_context(db, name, &mut env, &mut visited)?;
        }
    }

    debug!(root = %root, names = env.len(), "built type environment");
    Ok(env)
}

/// Add each identifier as `name + postfix`, skipping names already bound.
pub fn add_identifiers(env: &mut TypeEnvironment, ids: &[Identifier], postfix: &str) {
    for id in ids {
        env.add_if_absent(format!("{}{}", id.name, postfix), id.ty.clone());
    }
}

/// Depth-first over the `extends` graph; each context is read once.
fn add_context<D: ModelDatabase + ?Sized>(
    db: &D,
    name: &str,
    env: &mut TypeEnvironment,
    visited: &mut HashSet<String>,
) -> Result<(), ModelAccessError> {
    if !visited.insert(name.to_owned()) {
        return Ok(());
    }
    let context = db.compiled_context(name)?;
    for set in &context.sets {
        env.add_if_absent(set.clone(), Type::power(Type::Given(set.clone())));
    }
    add_identifiers(env, &context.constants, "");
    for parent in &context.extends {
        add_context(db, parent, env, visited)?;
    }
    Ok(())
}

/// Add the event's own parameters, unprimed.
///
/// Parameters of the abstract events it refines are not added: the
/// consuming engine cannot resolve abstract parameters yet.
pub fn add_event_parameters(env: &mut TypeEnvironment, event: &CompiledEvent) {
    add_identifiers(env, &event.parameters, "");
}

/// Add `v'` for every variable of `machine` and of each machine above it in
/// the refinement chain.
pub fn add_post_state_variables<D: ModelDatabase + ?Sized>(
    db: &D,
    machine: &CompiledMachine,
    env: &mut TypeEnvironment,
) -> Result<(), ModelAccessError> {
    let mut visited: HashSet<String> = HashSet::new();
    visited.insert(machine.name.clone());
    add_identifiers(env, &machine.variables, PRIME);

    let mut next = machine.refines.clone();
    while let Some(name) = next {
        if !visited.insert(name.clone()) {
            break;
        }
        let abstract_machine = db.compiled_machine(&name)?;
        add_identifiers(env, &abstract_machine.variables, PRIME);
        next = abstract_machine.refines;
    }
    Ok(())
}
