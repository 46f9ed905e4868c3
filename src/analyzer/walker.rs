//! Dependency closure walk.
//!
//! Explicit work-list over `(unit key, package)` pairs instead of recursion:
//! cycles across units terminate through each unit's processed set, and deep
//! import chains cannot overflow the stack. The closure does not depend on the
//! order items are taken off the list, because a package is contributed at
//! most once per unit and contributions are sorted at the end.

use tracing::debug;

use super::build_unit::{BuildUnit, ImportStep};
use super::context::ResolutionContext;
use crate::core::GosrcsError;
use crate::graph::{PackageGraph, PackageId};

/// Walks every root of `graph` from the entry unit of `ctx`.
///
/// # Errors
///
/// The first failure of any unit; nothing after it is processed.
pub fn walk(graph: &PackageGraph, ctx: &mut ResolutionContext) -> Result<(), GosrcsError> {
    let entry = ctx.entry_key().to_string();
    let mut pending: Vec<(String, PackageId)> = graph.roots().iter().rev().map(|&id| (entry.clone(), id)).collect();

    while let Some((key, id)) = pending.pop() {
        let unit = ctx.units.get_mut(&key).ok_or_else(|| GosrcsError::Other {
            message: format!("build unit {key} was never loaded"),
        })?;
        let steps = unit.process_package(id, graph, &mut ctx.files)?;

        // Reverse so the first import is visited first.
        for step in steps.into_iter().rev() {
            match step {
                ImportStep::SameUnit(dep) => pending.push((key.clone(), dep)),
                ImportStep::EntryUnit(dep) => pending.push((entry.clone(), dep)),
                ImportStep::Override {
                    package,
                    target,
                } => {
                    if !ctx.units.contains_key(&target.old_path) {
                        let parent = ctx.unit(&key).ok_or_else(|| GosrcsError::Other {
                            message: format!("build unit {key} was never loaded"),
                        })?;
                        let unit = BuildUnit::for_override(&target, parent)?;
                        debug!("Entering override unit {} (declares {})", unit.key(), unit.module_path());
                        unit.add_manifest_files(&mut ctx.files)?;
                        ctx.units.insert(target.old_path.clone(), unit);
                    }
                    pending.push((target.old_path, package));
                }
            }
        }
    }

    debug!("Walk finished: {} unit(s), {} file record(s)", ctx.units.len(), ctx.files.len());
    Ok(())
}
