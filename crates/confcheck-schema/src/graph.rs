//! # Dependency Graph
//!
//! Cross-field dependencies of one mapping, held as an explicit directed
//! graph: an edge `a -> b` means field `a` depends on sibling `b`.
//!
//! The graph is built once when a [`FieldSet`](crate::FieldSet) is
//! constructed. Cycle detection is a depth-first three-colour pass restricted
//! to a caller-chosen node subset. Cycles through required fields are
//! rejected at construction. Mutual pairs of optional fields
//! (`targetUsername <-> targetPassword`) are legal because activation only
//! looks at raw sibling presence.

use indexmap::IndexMap;

use crate::spec::FieldSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Directed dependency graph over the fields of one mapping, in declaration
/// order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DependencyGraph {
    edges: IndexMap<String, Vec<String>>,
}

impl DependencyGraph {
    pub(crate) fn from_fields(fields: &IndexMap<String, FieldSpec>) -> Self {
        let edges = fields
            .iter()
            .map(|(name, spec)| (name.clone(), spec.dependencies().to_vec()))
            .collect();
        Self { edges }
    }

    /// Fields that `field` depends on, in declared order.
    pub fn dependencies_of(&self, field: &str) -> &[String] {
        self.edges.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Fields that depend on `field`, in declaration order.
    pub fn dependents_of(&self, field: &str) -> Vec<&str> {
        self.edges
            .iter()
            .filter(|(_, deps)| deps.iter().any(|d| d == field))
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }

    /// Find one cycle whose nodes all satisfy `include`.
    ///
    /// Returns the cycle as a path with the first node repeated at the end
    /// (`[a, b, a]`), or `None` if the included subgraph is acyclic. Nodes are
    /// visited in declaration order, so the result is deterministic.
    pub fn find_cycle(&self, include: impl Fn(&str) -> bool) -> Option<Vec<String>> {
        let mut marks: IndexMap<&str, Mark> = self
            .edges
            .keys()
            .filter(|name| include(name))
            .map(|name| (name.as_str(), Mark::Unvisited))
            .collect();

        let roots: Vec<&str> = marks.keys().copied().collect();
        let mut stack = Vec::new();
        for root in roots {
            if marks.get(root) == Some(&Mark::Unvisited) {
                if let Some(cycle) = self.visit(root, &mut marks, &mut stack) {
                    return Some(cycle);
                }
            }
        }
        None
    }

    fn visit<'a>(
        &'a self,
        node: &'a str,
        marks: &mut IndexMap<&'a str, Mark>,
        stack: &mut Vec<&'a str>,
    ) -> Option<Vec<String>> {
        marks.insert(node, Mark::InProgress);
        stack.push(node);

        for dep in self.dependencies_of(node) {
            match marks.get(dep.as_str()).copied() {
                // Excluded from the subgraph.
                None | Some(Mark::Done) => continue,
                Some(Mark::InProgress) => {
                    let start = stack.iter().position(|n| *n == dep.as_str()).unwrap_or(0);
                    let mut cycle: Vec<String> =
                        stack[start..].iter().map(|n| n.to_string()).collect();
                    cycle.push(dep.clone());
                    return Some(cycle);
                }
                Some(Mark::Unvisited) => {
                    if let Some(cycle) = self.visit(dep, marks, stack) {
                        return Some(cycle);
                    }
                }
            }
        }

        stack.pop();
        marks.insert(node, Mark::Done);
        None
    }
}
