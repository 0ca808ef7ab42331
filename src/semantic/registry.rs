//! The measure registry: named formulas with a validated dependency graph.

use std::collections::HashMap;

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};

use super::error::RegistryError;
use super::measure::Measure;

/// Mapping from measure name to its compiled expression, built once at load
/// time and never mutated afterwards.
///
/// Building the registry validates every cross-measure reference and rejects
/// dependency cycles, so evaluation can recurse through `MeasureRef` nodes
/// without re-checking.
#[derive(Debug, Clone, Default)]
pub struct MeasureRegistry {
    measures: HashMap<String, Measure>,
    /// Definition order, for stable listings.
    order: Vec<String>,
}

impl MeasureRegistry {
    /// Build a registry from measure definitions.
    ///
    /// Fails on duplicate names, references to unregistered measures, and
    /// cyclic dependencies (detected with Tarjan's strongly-connected
    /// components over the reference graph).
    pub fn build(measures: Vec<Measure>) -> Result<Self, RegistryError> {
        let mut registry = MeasureRegistry::default();

        for measure in measures {
            if registry.measures.contains_key(&measure.name) {
                return Err(RegistryError::DuplicateMeasure(measure.name));
            }
            registry.order.push(measure.name.clone());
            registry.measures.insert(measure.name.clone(), measure);
        }

        registry.validate_references()?;
        registry.validate_acyclic()?;
        Ok(registry)
    }

    fn validate_references(&self) -> Result<(), RegistryError> {
        for name in &self.order {
            let measure = &self.measures[name];
            for dep in measure.expr.dependencies() {
                if !self.measures.contains_key(&dep) {
                    return Err(RegistryError::UnknownMeasure {
                        measure: name.clone(),
                        referenced: dep,
                    });
                }
            }
        }
        Ok(())
    }

    fn validate_acyclic(&self) -> Result<(), RegistryError> {
        let mut graph: DiGraph<&str, ()> = DiGraph::new();
        let mut index: HashMap<&str, NodeIndex> = HashMap::new();

        for name in &self.order {
            let idx = graph.add_node(name.as_str());
            index.insert(name.as_str(), idx);
        }
        for name in &self.order {
            let from = index[name.as_str()];
            for dep in self.measures[name].expr.dependencies() {
                graph.add_edge(from, index[dep.as_str()], ());
            }
        }

        for scc in tarjan_scc(&graph) {
            let is_cycle = scc.len() > 1
                || graph.edges_connecting(scc[0], scc[0]).next().is_some();
            if is_cycle {
                let cycle = scc.iter().map(|idx| graph[*idx].to_string()).collect();
                return Err(RegistryError::CyclicDependency(cycle));
            }
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Measure> {
        self.measures.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.measures.contains_key(name)
    }

    /// Measure names in definition order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|n| n.as_str())
    }

    /// Measures in definition order.
    pub fn iter(&self) -> impl Iterator<Item = &Measure> {
        self.order.iter().map(|n| &self.measures[n])
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
