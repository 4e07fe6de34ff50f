//! Recursion detection over the call graph.
//!
//! Nodes are the functions registered in the global scope, in program
//! order. Edges are call sites in source order, resolved through the
//! caller's scope; calls that do not resolve to a function add no edge.
//!
//! A depth-first search runs from every function in program order. Within
//! one search each function is expanded once; an edge leading back onto
//! the current path closes a cycle, the path suffix from that function.
//! Once its search finishes a start function is retired: every cycle
//! through it has been represented, so later searches do not enter it.
//! The work is `O(functions * (functions + call sites))`.
//!
//! Cycles are keyed by their sorted member names, so the same cycle found
//! again (or through a rotated path) is reported once. Each newly found
//! cycle yields one diagnostic per call site along it, all carrying the
//! same chain. Every strongly connected group of functions that contains
//! a cycle gets at least one report.
//!
//! # Example
//!
//! `f -> g -> h -> f` yields three diagnostics with the chain
//! `["f", "g", "h", "f"]`, one at each of the three call sites.

use compita_core::ast::visitor::{self, Visitor};
use compita_core::ast::{CallExpr, Function, NodeId};
use compita_core::{SemanticError, Site};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::context::CompilationContext;

/// A resolved call site.
#[derive(Debug, Clone, Copy)]
struct Edge {
    callee: usize,
    site: NodeId,
}

/// Functions and their outgoing call sites.
struct CallGraph<'ast> {
    names: Vec<&'ast str>,
    edges: Vec<Vec<Edge>>,
}

struct CallSites<'ast> {
    calls: Vec<&'ast CallExpr<'ast>>,
}

impl<'ast> Visitor<'ast> for CallSites<'ast> {
    fn visit_call(&mut self, expr: &'ast CallExpr<'ast>) {
        self.calls.push(expr);
        visitor::walk_call(self, expr);
    }
}

impl<'ast> CallGraph<'ast> {
    fn build(ctx: CompilationContext<'_, 'ast>) -> Self {
        let functions: Vec<Function<'ast>> = ctx
            .table
            .symbols(ctx.table.global())
            .iter()
            .filter_map(|s| s.as_function())
            .collect();
        let index: FxHashMap<&'ast str, usize> = functions
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name(), i))
            .collect();

        let edges = functions
            .iter()
            .map(|&function| {
                let scope = ctx.scope_of(function);
                let mut sites = CallSites { calls: Vec::new() };
                visitor::walk_body(&mut sites, function.body());
                sites
                    .calls
                    .iter()
                    .filter_map(|call| {
                        let callee = ctx.resolve(scope, call.name)?.as_function()?;
                        Some(Edge {
                            callee: *index.get(callee.name())?,
                            site: call.id,
                        })
                    })
                    .collect()
            })
            .collect();

        Self {
            names: functions.iter().map(|f| f.name()).collect(),
            edges,
        }
    }
}

struct CycleSearch<'g, 'ast> {
    graph: &'g CallGraph<'ast>,
    path: Vec<usize>,
    /// Call site taken out of each path entry
    sites: Vec<NodeId>,
    on_path: Vec<bool>,
    /// Expanded during the current search
    visited: Vec<bool>,
    /// Start functions whose search has finished
    retired: Vec<bool>,
    seen: FxHashSet<Vec<&'ast str>>,
    errors: Vec<SemanticError>,
}

impl<'g, 'ast> CycleSearch<'g, 'ast> {
    fn new(graph: &'g CallGraph<'ast>) -> Self {
        let count = graph.names.len();
        Self {
            graph,
            path: Vec::new(),
            sites: Vec::new(),
            on_path: vec![false; count],
            visited: vec![false; count],
            retired: vec![false; count],
            seen: FxHashSet::default(),
            errors: Vec::new(),
        }
    }

    fn run(&mut self, start: usize) {
        self.visited.fill(false);
        self.search(start);
        self.retired[start] = true;
    }

    fn search(&mut self, node: usize) {
        self.visited[node] = true;
        self.path.push(node);
        self.on_path[node] = true;

        let graph = self.graph;
        for &edge in &graph.edges[node] {
            if self.retired[edge.callee] {
                continue;
            }
            if self.on_path[edge.callee] {
                self.close_cycle(edge);
            } else if !self.visited[edge.callee] {
                self.sites.push(edge.site);
                self.search(edge.callee);
                self.sites.pop();
            }
        }

        self.on_path[node] = false;
        self.path.pop();
    }

    fn close_cycle(&mut self, edge: Edge) {
        let Some(start) = self.path.iter().position(|&n| n == edge.callee) else {
            return;
        };
        let members = &self.path[start..];

        let mut key: Vec<&'ast str> = members.iter().map(|&n| self.graph.names[n]).collect();
        key.sort_unstable();
        if !self.seen.insert(key) {
            return;
        }

        let chain: Vec<String> = members
            .iter()
            .chain(std::iter::once(&edge.callee))
            .map(|&n| self.graph.names[n].to_string())
            .collect();
        log::debug!("recursive cycle: {}", chain.join(" -> "));

        let sites = self.sites[start..].iter().copied().chain(std::iter::once(edge.site));
        for site in sites {
            self.errors.push(SemanticError::RecursiveCall {
                chain: chain.clone(),
                site: Site::Node(site),
            });
        }
    }
}

#[cfg_attr(feature = "profiling", profiling::function)]
pub fn no_recursion(ctx: CompilationContext<'_, '_>) -> Vec<SemanticError> {
    let graph = CallGraph::build(ctx);
    let mut search = CycleSearch::new(&graph);
    for start in 0..graph.names.len() {
        search.run(start);
    }
    search.errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::Check;
    use crate::checks::test_support::run_check;
    use bumpalo::Bump;
    use compita_core::VarType;
    use compita_core::ast::AstBuilder;

    fn chains(errors: &[SemanticError]) -> Vec<Vec<String>> {
        errors
            .iter()
            .map(|e| match e {
                SemanticError::RecursiveCall { chain, .. } => chain.clone(),
                other => panic!("unexpected {other:?}"),
            })
            .collect()
    }

    #[test]
    fn self_recursion_once() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let call = b.call_stmt("f", &[]);
        let f = b.function("f", &[], VarType::Void, &[], &[call]);
        let main = b.main_function(&[], &[b.call_stmt("f", &[])]);
        let program = b.program("p", &[], &[main, f]);

        let errors = run_check(program, Check::NoRecursion);
        assert_eq!(
            errors,
            vec![SemanticError::RecursiveCall {
                chain: vec!["f".into(), "f".into()],
                site: Site::Node(call.id()),
            }]
        );
    }

    #[test]
    fn three_cycle_once_per_call_site() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let f_to_g = b.call_stmt("g", &[]);
        let g_to_h = b.call_stmt("h", &[]);
        let h_to_f = b.call_stmt("f", &[]);
        let f = b.function("f", &[], VarType::Void, &[], &[f_to_g]);
        let g = b.function("g", &[], VarType::Void, &[], &[g_to_h]);
        let h = b.function("h", &[], VarType::Void, &[], &[h_to_f]);
        let main = b.main_function(&[], &[b.call_stmt("h", &[]), b.call_stmt("g", &[])]);
        // main first, so the search enters the cycle at h and g before f
        let program = b.program("p", &[], &[main, f, g, h]);

        let errors = run_check(program, Check::NoRecursion);
        assert_eq!(errors.len(), 3);
        let all = chains(&errors);
        let first = &all[0];
        assert!(all.iter().all(|c| c == first));
        assert_eq!(first.len(), 4);
        assert_eq!(first.first(), first.last());

        let mut sites: Vec<_> = errors.iter().map(|e| e.site()).collect();
        sites.sort_by_key(|s| s.first());
        let mut expected = vec![
            Site::Node(f_to_g.id()),
            Site::Node(g_to_h.id()),
            Site::Node(h_to_f.id()),
        ];
        expected.sort_by_key(|s| s.first());
        assert_eq!(sites, expected);
    }

    #[test]
    fn calls_inside_arguments_are_edges() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let inner = b.call("f", &[b.int(1)]);
        let f = b.function(
            "f",
            &[b.scalar("n", VarType::Int)],
            VarType::Int,
            &[],
            &[b.ret(Some(b.call("g", &[inner])))],
        );
        let g = b.function("g", &[b.scalar("n", VarType::Int)], VarType::Int, &[], &[b.ret(Some(b.var("n")))]);
        let program = b.program("p", &[], &[f, g, b.main_function(&[], &[])]);

        assert_eq!(chains(&run_check(program, Check::NoRecursion)), vec![vec!["f".to_string(), "f".to_string()]]);
    }

    #[test]
    fn densely_connected_functions_finish_quickly() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let names: Vec<String> = (0..12).map(|i| format!("f{i}")).collect();
        let mut functions: Vec<_> = names
            .iter()
            .map(|name| {
                let calls: Vec<_> = names
                    .iter()
                    .filter(|other| *other != name)
                    .map(|other| b.call_stmt(other, &[]))
                    .collect();
                b.function(name, &[], VarType::Void, &[], &calls)
            })
            .collect();
        functions.push(b.main_function(&[], &[b.call_stmt("f0", &[])]));
        let program = b.program("p", &[], &functions);

        let started = std::time::Instant::now();
        let errors = run_check(program, Check::NoRecursion);
        assert!(started.elapsed() < std::time::Duration::from_secs(2));

        assert!(!errors.is_empty());
        let mut keys: Vec<_> = chains(&errors)
            .into_iter()
            .map(|mut chain| {
                assert_eq!(chain.first(), chain.last());
                chain.pop();
                chain.sort();
                chain
            })
            .collect();
        // consecutive diagnostics of one cycle share a key
        keys.dedup();
        let total = keys.len();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), total, "no cycle is reported twice");
    }

    #[test]
    fn separate_cycles_are_each_reported() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let functions = [
            b.function("a", &[], VarType::Void, &[], &[b.call_stmt("b", &[])]),
            b.function("b", &[], VarType::Void, &[], &[b.call_stmt("a", &[]), b.call_stmt("c", &[])]),
            b.function("c", &[], VarType::Void, &[], &[b.call_stmt("d", &[])]),
            b.function("d", &[], VarType::Void, &[], &[b.call_stmt("c", &[])]),
            b.main_function(&[], &[b.call_stmt("a", &[])]),
        ];
        let program = b.program("p", &[], &functions);

        let all = chains(&run_check(program, Check::NoRecursion));
        assert_eq!(
            all,
            vec![
                vec!["a".to_string(), "b".into(), "a".into()],
                vec!["a".to_string(), "b".into(), "a".into()],
                vec!["c".to_string(), "d".into(), "c".into()],
                vec!["c".to_string(), "d".into(), "c".into()],
            ]
        );
    }

    #[test]
    fn acyclic_and_shadowed_calls() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        // inside g, 'f' names a local variable, so g -> f is no edge
        let f = b.function("f", &[], VarType::Void, &[], &[b.call_stmt("g", &[])]);
        let g = b.function(
            "g",
            &[],
            VarType::Void,
            &[b.declaration(b.scalar("f", VarType::Int))],
            &[b.call_stmt("f", &[])],
        );
        let main = b.main_function(&[], &[b.call_stmt("f", &[])]);
        let program = b.program("p", &[], &[f, g, main]);

        assert!(run_check(program, Check::NoRecursion).is_empty());
    }
}
