//! Property-based tests for the hierarchy resolver.
//!
//! Random DAGs are generated by only ever drawing parent edges from a type
//! to a strictly smaller index, which rules out cycles while still
//! producing diamonds.

use appsearch_schema::SchemaCache;
use appsearch_types::{create_prefix, SchemaTypeConfig};
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

const PREFIX_PKG: &str = "prop.pkg";
const PREFIX_DB: &str = "db";

fn type_name(prefix: &str, index: usize) -> String {
    format!("{prefix}T{index}")
}

/// A random DAG as adjacency lists: `parents[i]` holds indices < i.
fn dag_strategy() -> impl Strategy<Value = Vec<Vec<usize>>> {
    (2usize..10).prop_flat_map(|n| {
        prop::collection::vec((1..n, 0usize..8), 0..24).prop_map(move |edges| {
            let mut parents = vec![Vec::new(); n];
            for (child, raw) in edges {
                let parent = raw % child;
                if !parents[child].contains(&parent) {
                    parents[child].push(parent);
                }
            }
            parents
        })
    })
}

fn build_cache(parents: &[Vec<usize>]) -> (SchemaCache, String) {
    let prefix = create_prefix(PREFIX_PKG, PREFIX_DB);
    let mut cache = SchemaCache::new(true);
    for (i, parent_list) in parents.iter().enumerate() {
        let mut config = SchemaTypeConfig::new(type_name(&prefix, i));
        for &p in parent_list {
            config = config.with_parent(type_name(&prefix, p));
        }
        cache.add_to_schema_map(&prefix, config);
    }
    cache.rebuild_cache_for_prefix(&prefix).unwrap();
    (cache, prefix)
}

/// Expected ancestor index set of `i`, by naive transitive closure.
fn naive_ancestors(parents: &[Vec<usize>], i: usize) -> HashSet<usize> {
    let mut out = HashSet::new();
    let mut stack: Vec<usize> = parents[i].clone();
    while let Some(a) = stack.pop() {
        if out.insert(a) {
            stack.extend(parents[a].iter().copied());
        }
    }
    out
}

proptest! {
    /// Every ancestor appears exactly once, and every type precedes all of
    /// its own ancestors in the returned list.
    #[test]
    fn topological_order_holds(parents in dag_strategy()) {
        let (cache, prefix) = build_cache(&parents);
        for i in 0..parents.len() {
            let ancestors = cache
                .transitive_unprefixed_parent_types(&prefix, &type_name(&prefix, i))
                .unwrap();

            let expected = naive_ancestors(&parents, i);
            let got: HashSet<usize> = ancestors
                .iter()
                .map(|name| name[1..].parse::<usize>().unwrap())
                .collect();
            prop_assert_eq!(got.len(), ancestors.len(), "duplicate ancestor");
            prop_assert_eq!(&got, &expected);

            // child-before-parent: position of each emitted type precedes
            // the positions of all of that type's own ancestors.
            let position: HashMap<usize, usize> = ancestors
                .iter()
                .enumerate()
                .map(|(pos, name)| (name[1..].parse::<usize>().unwrap(), pos))
                .collect();
            for &a in &got {
                for &higher in &naive_ancestors(&parents, a) {
                    prop_assert!(position[&a] < position[&higher]);
                }
            }
        }
    }

    /// The descendant closure is a fixed point.
    #[test]
    fn descendant_closure_idempotent(parents in dag_strategy(), seed in 0usize..10) {
        let (cache, prefix) = build_cache(&parents);
        let start = seed % parents.len();
        let mut input = HashSet::new();
        input.insert(type_name(&prefix, start));

        let once = cache.schema_types_with_descendants(&prefix, &input);
        let twice = cache.schema_types_with_descendants(&prefix, &once);
        prop_assert_eq!(once, twice);
    }
}
