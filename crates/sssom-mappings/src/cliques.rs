//! Splitting a mapping set into cliques of entities that mutually entail each
//! other through their mappings.
//!
//! Each row contributes directed edges between its subject and object by
//! [`PredicateClass`]: a subclass row points from the object to the subject,
//! a superclass row from the subject to the object, an equivalence both ways,
//! and a sibling row adds no edge. The cliques are the strongly connected
//! components of that graph.

use std::collections::HashMap;

use crate::mapping::Mapping;
use crate::ptable::PredicateClass;
use crate::table::MappingSetTable;

/// Entity graph over the subjects and objects of `rows`, nodes numbered in
/// order of first appearance.
struct EntityGraph<'a> {
    nodes: Vec<&'a str>,
    index: HashMap<&'a str, usize>,
    out_adj: Vec<Vec<usize>>,
    in_adj: Vec<Vec<usize>>,
}

impl<'a> EntityGraph<'a> {
    fn build(rows: &'a [Mapping]) -> Self {
        let mut graph = Self {
            nodes: Vec::new(),
            index: HashMap::new(),
            out_adj: Vec::new(),
            in_adj: Vec::new(),
        };
        for row in rows {
            let s = graph.node(&row.subject_id);
            let o = graph.node(&row.object_id);
            match PredicateClass::of(&row.predicate_id) {
                Some(PredicateClass::SubClass) => graph.edge(o, s),
                Some(PredicateClass::SuperClass) => graph.edge(s, o),
                Some(PredicateClass::Equivalent) => {
                    graph.edge(s, o);
                    graph.edge(o, s);
                }
                Some(PredicateClass::Sibling) | None => {}
            }
        }
        graph
    }

    fn node(&mut self, id: &'a str) -> usize {
        if let Some(&at) = self.index.get(id) {
            return at;
        }
        let at = self.nodes.len();
        self.nodes.push(id);
        self.index.insert(id, at);
        self.out_adj.push(Vec::new());
        self.in_adj.push(Vec::new());
        at
    }

    fn edge(&mut self, from: usize, to: usize) {
        self.out_adj[from].push(to);
        self.in_adj[to].push(from);
    }

    /// Component id per node. Ids are dense and numbered by the first node
    /// of each component.
    fn strongly_connected_components(&self) -> Vec<usize> {
        let n = self.nodes.len();
        let mut visited = vec![false; n];
        let mut order: Vec<usize> = Vec::with_capacity(n);

        // Iterative DFS for finishing order.
        for start in 0..n {
            if visited[start] {
                continue;
            }
            let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
            visited[start] = true;
            while let Some((node, idx)) = stack.pop() {
                if idx < self.out_adj[node].len() {
                    stack.push((node, idx + 1));
                    let next = self.out_adj[node][idx];
                    if !visited[next] {
                        visited[next] = true;
                        stack.push((next, 0));
                    }
                } else {
                    order.push(node);
                }
            }
        }

        // Reverse graph in reverse finishing order.
        let mut component = vec![usize::MAX; n];
        let mut next_component = 0usize;
        for &start in order.iter().rev() {
            if component[start] != usize::MAX {
                continue;
            }
            let mut stack = vec![start];
            component[start] = next_component;
            while let Some(node) = stack.pop() {
                for &prev in &self.in_adj[node] {
                    if component[prev] == usize::MAX {
                        component[prev] = next_component;
                        stack.push(prev);
                    }
                }
            }
            next_component += 1;
        }

        let mut dense: HashMap<usize, usize> = HashMap::new();
        component
            .iter()
            .map(|id| {
                let next = dense.len();
                *dense.entry(*id).or_insert(next)
            })
            .collect()
    }
}

/// Rows grouped by the clique of their subject, largest clique first.
///
/// Every subject and object is a node, so rows whose predicate adds no edge
/// land in their subject's singleton clique. Cliques of equal size keep the
/// order of their first entity; cliques holding no subject yield no group.
pub fn split_into_cliques(rows: &[Mapping]) -> Vec<Vec<Mapping>> {
    let graph = EntityGraph::build(rows);
    let component = graph.strongly_connected_components();

    let component_count = component.iter().max().map_or(0, |max| max + 1);
    let mut sizes = vec![0usize; component_count];
    for &id in &component {
        sizes[id] += 1;
    }
    let mut groups: Vec<Vec<Mapping>> = vec![Vec::new(); component_count];
    for row in rows {
        let subject = graph.index[row.subject_id.as_str()];
        groups[component[subject]].push(row.clone());
    }

    let mut ranked: Vec<(usize, Vec<Mapping>)> = sizes.into_iter().zip(groups).collect();
    ranked.sort_by(|a, b| b.0.cmp(&a.0));
    tracing::debug!(
        entities = graph.nodes.len(),
        cliques = component_count,
        "split mapping rows into cliques"
    );
    ranked
        .into_iter()
        .map(|(_, rows)| rows)
        .filter(|rows| !rows.is_empty())
        .collect()
}

impl MappingSetTable {
    /// One derived table per clique; see [`split_into_cliques`]. Each keeps
    /// this table's prefix map and metadata.
    pub fn split_into_cliques(&self) -> Vec<MappingSetTable> {
        split_into_cliques(&self.rows)
            .into_iter()
            .map(|rows| self.derive(rows))
            .collect()
    }
}
