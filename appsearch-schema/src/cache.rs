//! In-memory index over the prefixed schema-type registry.

use crate::error::{SchemaError, SchemaResult};
use appsearch_types::prefix::remove_prefix;
use appsearch_types::SchemaTypeConfig;
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::debug;

/// Cache of registered schema types plus derived hierarchy maps.
///
/// Owned state, mutated only through `&mut self`. The derived maps
/// (`parent_to_children_map` and, when enabled, the transitive-ancestor map)
/// go stale on every `add_to_schema_map`/`remove_from_schema_map` and are
/// recomputed only by an explicit [`rebuild_cache`](Self::rebuild_cache) or
/// [`rebuild_cache_for_prefix`](Self::rebuild_cache_for_prefix) call.
#[derive(Debug, Default)]
pub struct SchemaCache {
    /// prefix -> (prefixed schema type -> config).
    schema_map: HashMap<String, HashMap<String, SchemaTypeConfig>>,
    /// prefix -> (prefixed parent type -> direct children). Derived.
    parent_to_children_map: HashMap<String, HashMap<String, Vec<String>>>,
    /// prefix -> (prefixed child type -> unprefixed transitive ancestors in
    /// child-before-parent order). Derived; populated only when
    /// `cache_transitive_parents` is set.
    child_to_transitive_unprefixed_parents_map: HashMap<String, HashMap<String, Vec<String>>>,
    cache_transitive_parents: bool,
}

impl SchemaCache {
    /// Creates an empty cache.
    ///
    /// `cache_transitive_parents` mirrors the platform gate for ancestor
    /// caching: when false, [`transitive_unprefixed_parent_types`]
    /// (Self::transitive_unprefixed_parent_types) recomputes on demand
    /// instead of reading the derived map.
    #[must_use]
    pub fn new(cache_transitive_parents: bool) -> Self {
        Self {
            cache_transitive_parents,
            ..Self::default()
        }
    }

    /// Returns the config of one schema type, if registered.
    #[must_use]
    pub fn schema_config(&self, prefix: &str, prefixed_type: &str) -> Option<&SchemaTypeConfig> {
        self.schema_map.get(prefix)?.get(prefixed_type)
    }

    /// Returns the full type map registered under a prefix.
    #[must_use]
    pub fn schema_map_for_prefix(
        &self,
        prefix: &str,
    ) -> Option<&HashMap<String, SchemaTypeConfig>> {
        self.schema_map.get(prefix)
    }

    /// Returns all prefixed type names registered under a prefix.
    /// An unknown prefix yields an empty vector.
    #[must_use]
    pub fn schema_types_for_prefix(&self, prefix: &str) -> Vec<&str> {
        self.schema_map
            .get(prefix)
            .map(|types| types.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Returns all prefixes with at least one registered type.
    #[must_use]
    pub fn prefixes(&self) -> Vec<&str> {
        self.schema_map.keys().map(String::as_str).collect()
    }

    // ── Mutation (phase one of the two-phase protocol) ───────────────

    /// Registers or replaces a schema type. O(1); leaves derived maps stale
    /// until the next rebuild.
    pub fn add_to_schema_map(&mut self, prefix: &str, config: SchemaTypeConfig) {
        self.schema_map
            .entry(prefix.to_string())
            .or_default()
            .insert(config.schema_type.clone(), config);
    }

    /// Removes a schema type. O(1); leaves derived maps stale until the next
    /// rebuild. Removing an unknown type is a no-op.
    pub fn remove_from_schema_map(&mut self, prefix: &str, prefixed_type: &str) {
        if let Some(types) = self.schema_map.get_mut(prefix) {
            types.remove(prefixed_type);
            if types.is_empty() {
                self.schema_map.remove(prefix);
            }
        }
    }

    // ── Rebuild (phase two) ──────────────────────────────────────────

    /// Recomputes derived maps for every registered prefix.
    pub fn rebuild_cache(&mut self) -> SchemaResult<()> {
        self.parent_to_children_map.clear();
        self.child_to_transitive_unprefixed_parents_map.clear();
        let prefixes: Vec<String> = self.schema_map.keys().cloned().collect();
        for prefix in prefixes {
            self.rebuild_cache_for_prefix(&prefix)?;
        }
        Ok(())
    }

    /// Recomputes derived maps for one prefix.
    ///
    /// Direct parent→children edges come from scanning every type's declared
    /// parent list. When ancestor caching is enabled, every type with at
    /// least one parent additionally gets its full transitive ancestor list
    /// in child-before-parent order (see [`compute_transitive_parents`]).
    pub fn rebuild_cache_for_prefix(&mut self, prefix: &str) -> SchemaResult<()> {
        self.parent_to_children_map.remove(prefix);
        self.child_to_transitive_unprefixed_parents_map
            .remove(prefix);

        let Some(types) = self.schema_map.get(prefix) else {
            return Ok(());
        };

        let mut children_map: HashMap<String, Vec<String>> = HashMap::new();
        for (name, config) in types {
            for parent in &config.parent_types {
                children_map
                    .entry(parent.clone())
                    .or_default()
                    .push(name.clone());
            }
        }

        if self.cache_transitive_parents {
            let mut ancestor_map: HashMap<String, Vec<String>> = HashMap::new();
            for (name, config) in types {
                if config.parent_types.is_empty() {
                    continue;
                }
                let ancestors = compute_transitive_parents(prefix, types, name)?;
                ancestor_map.insert(name.clone(), ancestors);
            }
            if !ancestor_map.is_empty() {
                self.child_to_transitive_unprefixed_parents_map
                    .insert(prefix.to_string(), ancestor_map);
            }
        }

        if !children_map.is_empty() {
            self.parent_to_children_map
                .insert(prefix.to_string(), children_map);
        }
        debug!(prefix, types = types.len(), "rebuilt schema hierarchy maps");
        Ok(())
    }

    // ── Hierarchy queries (valid only after a rebuild) ───────────────

    /// Expands a set of prefixed types to include every registered
    /// descendant, i.e. closes the set under "is-a".
    ///
    /// Used to widen a search filter naming a supertype to all of its
    /// subtypes. Unknown prefixes or types simply contribute nothing.
    #[must_use]
    pub fn schema_types_with_descendants(
        &self,
        prefix: &str,
        types: &HashSet<String>,
    ) -> HashSet<String> {
        let Some(children_map) = self.parent_to_children_map.get(prefix) else {
            return types.clone();
        };

        // Visited-set BFS; the visited set also terminates diamond walks.
        let mut visited: HashSet<String> = types.clone();
        let mut frontier: VecDeque<String> = types.iter().cloned().collect();
        while let Some(current) = frontier.pop_front() {
            if let Some(children) = children_map.get(&current) {
                for child in children {
                    if visited.insert(child.clone()) {
                        frontier.push_back(child.clone());
                    }
                }
            }
        }
        visited
    }

    /// Returns the unprefixed transitive ancestors of a type in
    /// child-before-parent order.
    ///
    /// Reads the derived map when ancestor caching is enabled; otherwise
    /// recomputes on demand. A type with no parents (or an unknown
    /// prefix/type) yields an empty list.
    pub fn transitive_unprefixed_parent_types(
        &self,
        prefix: &str,
        prefixed_type: &str,
    ) -> SchemaResult<Vec<String>> {
        if self.cache_transitive_parents {
            return Ok(self
                .child_to_transitive_unprefixed_parents_map
                .get(prefix)
                .and_then(|m| m.get(prefixed_type))
                .cloned()
                .unwrap_or_default());
        }

        let Some(types) = self.schema_map.get(prefix) else {
            return Ok(Vec::new());
        };
        match types.get(prefixed_type) {
            Some(config) if !config.parent_types.is_empty() => {
                compute_transitive_parents(prefix, types, prefixed_type)
            }
            _ => Ok(Vec::new()),
        }
    }
}

/// Computes the transitive ancestors of `start` in topological
/// (child-before-parent) order, restricted to the subgraph reachable from
/// `start` via parent edges.
///
/// Kahn's algorithm over the reachable subgraph: a node's in-degree counts
/// its children *within the subgraph*, so a diamond ancestor is emitted
/// exactly once, after every descendant of it has been emitted. Declared
/// parent order makes the result deterministic.
fn compute_transitive_parents(
    prefix: &str,
    types: &HashMap<String, SchemaTypeConfig>,
    start: &str,
) -> SchemaResult<Vec<String>> {
    let lookup = |name: &str| -> SchemaResult<&SchemaTypeConfig> {
        types.get(name).ok_or_else(|| SchemaError::MissingSchemaType {
            prefix: prefix.to_string(),
            schema_type: name.to_string(),
        })
    };

    // Reachable ancestor subgraph, `start` included.
    let mut reachable: HashSet<&str> = HashSet::new();
    let mut stack: Vec<&str> = vec![start];
    reachable.insert(start);
    while let Some(current) = stack.pop() {
        for parent in &lookup(current)?.parent_types {
            if reachable.insert(parent.as_str()) {
                stack.push(parent.as_str());
            }
        }
    }

    // In-degree within the subgraph (number of children also reachable).
    let mut in_degree: HashMap<&str, usize> =
        reachable.iter().map(|name| (*name, 0)).collect();
    for name in &reachable {
        for parent in &lookup(name)?.parent_types {
            if let Some(count) = in_degree.get_mut(parent.as_str()) {
                *count += 1;
            }
        }
    }

    // Only `start` can begin at in-degree zero; anything else at zero here
    // means the graph was not reachable-from-start, which the construction
    // above rules out.
    let mut queue: VecDeque<&str> = in_degree
        .iter()
        .filter(|(_, count)| **count == 0)
        .map(|(name, _)| *name)
        .collect();

    let mut emitted = 0usize;
    let mut ancestors: Vec<String> = Vec::with_capacity(reachable.len() - 1);
    while let Some(current) = queue.pop_front() {
        emitted += 1;
        if current != start {
            ancestors.push(remove_prefix(current)?.to_string());
        }
        for parent in &lookup(current)?.parent_types {
            let count = in_degree
                .get_mut(parent.as_str())
                .ok_or_else(|| SchemaError::MissingSchemaType {
                    prefix: prefix.to_string(),
                    schema_type: parent.clone(),
                })?;
            *count -= 1;
            if *count == 0 {
                queue.push_back(parent.as_str());
            }
        }
    }

    // The queue drained before covering the subgraph: some node never hit
    // in-degree zero, which only happens on a cycle.
    if emitted != reachable.len() {
        return Err(SchemaError::CyclicInheritance {
            prefix: prefix.to_string(),
            schema_type: start.to_string(),
        });
    }
    Ok(ancestors)
}
