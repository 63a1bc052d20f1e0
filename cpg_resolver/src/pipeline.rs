//! Topological scheduling over the registered passes (`spec.md` §9's design
//! note: "dependency declarations ... modelled as a DAG with topological
//! sort at startup; passes self-describe their dependencies").

use rustc_hash::{FxHashMap, FxHashSet};

use crate::pass::{Pass, PassContext};

/// Order `passes` so every pass runs after everything named in its
/// `depends_on`, then run each in order against `ctx`. Panics only on a
/// malformed pipeline (unknown dependency name, or a cycle) — both are
/// programmer errors in how passes are registered, not data the resolver
/// could ever receive from a real project.
#[tracing::instrument(level = "debug", skip_all)]
pub fn run(ctx: &mut PassContext<'_>, passes: Vec<Box<dyn Pass>>) {
    for mut pass in topological_order(passes) {
        tracing::debug!(pass = pass.name(), "running resolver pass");
        pass.run(ctx);
    }
}

fn topological_order(passes: Vec<Box<dyn Pass>>) -> Vec<Box<dyn Pass>> {
    let index_of: FxHashMap<&'static str, usize> = passes.iter().enumerate().map(|(i, p)| (p.name(), i)).collect();

    let mut in_degree = vec![0usize; passes.len()];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); passes.len()];
    for (i, pass) in passes.iter().enumerate() {
        for dep_name in pass.depends_on() {
            let &dep_idx = index_of
                .get(dep_name)
                .unwrap_or_else(|| panic!("pass {:?} depends on unregistered pass {dep_name:?}", pass.name()));
            dependents[dep_idx].push(i);
            in_degree[i] += 1;
        }
    }

    let mut ready: Vec<usize> = (0..passes.len()).filter(|&i| in_degree[i] == 0).collect();
    ready.sort_unstable();
    let mut order = Vec::with_capacity(passes.len());
    let mut visited = FxHashSet::default();

    while let Some(i) = ready.pop() {
        if !visited.insert(i) {
            continue;
        }
        order.push(i);
        let mut newly_ready = Vec::new();
        for &dependent in &dependents[i] {
            in_degree[dependent] -= 1;
            if in_degree[dependent] == 0 {
                newly_ready.push(dependent);
            }
        }
        newly_ready.sort_unstable();
        ready.extend(newly_ready);
        ready.sort_unstable();
    }

    assert_eq!(order.len(), passes.len(), "resolver pipeline has a dependency cycle");

    let mut slots: Vec<Option<Box<dyn Pass>>> = passes.into_iter().map(Some).collect();
    order.into_iter().map(|i| slots[i].take().expect("each index appears once in a topological order")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Stub {
        name: &'static str,
        deps: &'static [&'static str],
        log: std::rc::Rc<std::cell::RefCell<Vec<&'static str>>>,
    }

    impl Pass for Stub {
        fn name(&self) -> &'static str {
            self.name
        }
        fn depends_on(&self) -> &'static [&'static str] {
            self.deps
        }
        fn run(&mut self, _ctx: &mut PassContext<'_>) {
            self.log.borrow_mut().push(self.name);
        }
    }

    #[test]
    fn dependencies_run_before_dependents() {
        let log = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let passes: Vec<Box<dyn Pass>> = vec![
            Box::new(Stub { name: "c", deps: &["b"], log: log.clone() }),
            Box::new(Stub { name: "a", deps: &[], log: log.clone() }),
            Box::new(Stub { name: "b", deps: &["a"], log: log.clone() }),
        ];
        let ordered = topological_order(passes);
        let names: Vec<_> = ordered.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    #[should_panic(expected = "dependency cycle")]
    fn cycle_panics() {
        let log = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let passes: Vec<Box<dyn Pass>> = vec![
            Box::new(Stub { name: "x", deps: &["y"], log: log.clone() }),
            Box::new(Stub { name: "y", deps: &["x"], log: log.clone() }),
        ];
        topological_order(passes);
    }
}
