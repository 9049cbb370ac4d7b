//! Verifies that the registry's fixed sequence is a valid topological
//! order over the declared formula inputs.
//!
//! The registry is hand-ordered data. Rather than relying on that order
//! incidentally holding, this check rebuilds the dependency graph from
//! the declared inputs and fails loudly (in tests and debug builds) if a
//! formula would read a derived field that has not been produced yet.

use std::collections::HashMap;

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};

use super::registry::FormulaDef;

pub fn verify(registry: &[FormulaDef]) -> Result<(), String> {
    // Position of each derived output in the evaluation sequence.
    let mut produced_at: HashMap<&str, usize> = HashMap::new();
    for (idx, def) in registry.iter().enumerate() {
        if produced_at.insert(def.fields.derived, idx).is_some() {
            return Err(format!("derived field '{}' is produced twice", def.fields.derived));
        }
    }

    // 1. Sequence check: every derived input must be produced earlier.
    for (idx, def) in registry.iter().enumerate() {
        for &input in def.inputs {
            if let Some(&dep_idx) = produced_at.get(input) {
                if dep_idx >= idx {
                    return Err(format!(
                        "formula '{}' reads '{}' before it is produced (position {} >= {})",
                        def.fields.derived, input, dep_idx, idx
                    ));
                }
            }
        }
    }

    // 2. Structural check: the declared dependency graph must be acyclic.
    let mut graph: DiGraph<&str, ()> = DiGraph::new();
    let mut nodes: HashMap<&str, NodeIndex> = HashMap::new();
    for def in registry {
        let out = node_for(&mut graph, &mut nodes, def.fields.derived);
        for &input in def.inputs {
            let inp = node_for(&mut graph, &mut nodes, input);
            graph.add_edge(inp, out, ());
        }
    }
    toposort(&graph, None)
        .map_err(|cycle| format!("cycle detected involving field '{}'", graph[cycle.node_id()]))?;

    Ok(())
}

fn node_for<'g>(
    graph: &mut DiGraph<&'g str, ()>,
    nodes: &mut HashMap<&'g str, NodeIndex>,
    name: &'g str,
) -> NodeIndex {
    *nodes.entry(name).or_insert_with(|| graph.add_node(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::registry::{registry, FieldPair};
    use crate::numeric::ArithmeticError;

    fn passthrough(a: &[f64]) -> Result<f64, ArithmeticError> {
        Ok(a[0])
    }

    fn def(
        reported: &'static str,
        derived: &'static str,
        inputs: &'static [&'static str],
    ) -> FormulaDef {
        FormulaDef { fields: FieldPair { reported, derived }, inputs, eval: passthrough }
    }

    #[test]
    fn test_registry_order_is_topological() {
        verify(registry()).expect("registry order must respect declared dependencies");
    }

    #[test]
    fn test_out_of_order_dependency_is_rejected() {
        // B reads RC_A, but RC_A is produced after B.
        let defs = [def("B", "RC_B", &["RC_A"]), def("A", "RC_A", &["X"])];
        let err = verify(&defs).unwrap_err();
        assert!(err.contains("before it is produced"), "msg: {err}");
    }

    #[test]
    fn test_duplicate_output_is_rejected() {
        let defs = [def("A", "RC_A", &["X"]), def("A", "RC_A", &["Y"])];
        let err = verify(&defs).unwrap_err();
        assert!(err.contains("produced twice"), "msg: {err}");
    }
}
