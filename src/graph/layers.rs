//! Layered-architecture analysis: detects imports that cross a declared layer boundary in the
//! illegal (lower-to-higher) direction, and reports them as compressed witnesses.

use crate::errors::{AnalysisError, AnalysisResult};
use crate::graph::{ExtendWithDescendants, Graph, ModuleToken};
use itertools::Itertools;
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use tap::Conv;

/// A witness of one or more illegal import chains sharing the same interior waypoints.
///
/// Every combination of a head, the (ordered) middle, and a tail describes an actual chain of
/// direct imports in the graph: `head -> middle[0] -> ... -> middle[-1] -> tail`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Route {
    pub heads: BTreeSet<String>,
    pub middle: Vec<String>,
    pub tails: BTreeSet<String>,
}

/// All the illegal routes found for a single (upstream, downstream) layer pair.
///
/// `downstream` illegally imports `upstream`, violating the declared layering.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PackageDependency {
    pub upstream: String,
    pub downstream: String,
    pub routes: BTreeSet<Route>,
}

struct TokenRoute {
    heads: FxHashSet<ModuleToken>,
    middle: Vec<ModuleToken>,
    tails: FxHashSet<ModuleToken>,
}

struct TokenPackageDependency {
    upstream: ModuleToken,
    downstream: ModuleToken,
    routes: Vec<TokenRoute>,
}

impl Graph {
    /// Finds all illegal dependencies implied by a layered architecture.
    ///
    /// `layers` is ordered from highest to lowest. For every pair of present layers `(Li, Lj)`
    /// with `i < j`, an import from (a descendant of) `Lj` into (a descendant of) `Li` is
    /// illegal, since `Lj` is lower than `Li`. If `containers` is non-empty, each layer name is
    /// resolved relative to every container (`container.layer`); otherwise layer names are
    /// treated as absolute module names. A missing container fails the whole call; a missing
    /// layer is silently skipped.
    pub fn find_illegal_dependencies_for_layers(
        &self,
        layers: &[&str],
        containers: &HashSet<&str>,
    ) -> AnalysisResult<HashSet<PackageDependency>> {
        let containers = self.validate_containers(containers)?;

        let layer_lists: Vec<Vec<ModuleToken>> = containers
            .iter()
            .map(|container| self.resolve_layer_packages(layers, *container))
            .collect();

        log::debug!(
            "resolved layer package lists for {} container(s)",
            layer_lists.len().max(1),
        );

        let dependencies = layer_lists
            .into_iter()
            .par_bridge()
            .try_fold(
                Vec::new,
                |mut v: Vec<TokenPackageDependency>, layer_list| -> AnalysisResult<_> {
                    v.extend(self.find_illegal_dependencies_for_layer_list(&layer_list)?);
                    Ok(v)
                },
            )
            .try_reduce(Vec::new, |mut v, deps| {
                v.extend(deps);
                Ok(v)
            })?;

        Ok(dependencies
            .into_iter()
            .map(|dep| self.token_dependency_to_strings(dep))
            .collect())
    }

    fn validate_containers<'a>(
        &self,
        containers: &HashSet<&'a str>,
    ) -> AnalysisResult<Vec<Option<&'a str>>> {
        if containers.is_empty() {
            return Ok(vec![None]);
        }

        containers
            .iter()
            .map(|name| match self.get_module_by_name(name) {
                Some(module) if !module.is_invisible() => Ok(Some(*name)),
                _ => Err(AnalysisError::NoSuchContainer((*name).to_owned())),
            })
            .collect()
    }

    fn resolve_layer_packages(&self, layers: &[&str], container: Option<&str>) -> Vec<ModuleToken> {
        layers
            .iter()
            .map(|layer| match container {
                Some(container) => format!("{container}.{layer}"),
                None => (*layer).to_owned(),
            })
            .filter_map(|name| {
                self.get_module_by_name(&name)
                    .filter(|m| !m.is_invisible())
                    .map(|m| m.token())
            })
            .collect()
    }

    fn find_illegal_dependencies_for_layer_list(
        &self,
        layer_list: &[ModuleToken],
    ) -> AnalysisResult<Vec<TokenPackageDependency>> {
        // Built fresh per container: a layer package from a *different* container must never
        // exclude an interior waypoint from this container's search (see
        // `find_illegal_dependency`'s cross-container waypoint handling).
        let all_layer_modules: FxHashSet<ModuleToken> = layer_list
            .iter()
            .cloned()
            .flat_map(|m| m.conv::<FxHashSet<_>>().with_descendants(self))
            .collect();

        generate_layer_pairs(layer_list)
            .into_par_iter()
            .try_fold(
                Vec::new,
                |mut v: Vec<TokenPackageDependency>, (downstream, upstream)| -> AnalysisResult<_> {
                    if let Some(dep) = self.find_illegal_dependency(
                        downstream,
                        upstream,
                        &all_layer_modules,
                    )? {
                        v.push(dep);
                    }
                    Ok(v)
                },
            )
            .try_reduce(Vec::new, |mut v, deps| {
                v.extend(deps);
                Ok(v)
            })
    }

    fn find_illegal_dependency(
        &self,
        downstream_layer: ModuleToken,
        upstream_layer: ModuleToken,
        all_layer_modules: &FxHashSet<ModuleToken>,
    ) -> AnalysisResult<Option<TokenPackageDependency>> {
        // Shortcut the detailed search in the common case of no chains at all.
        if !self.chain_exists(downstream_layer, upstream_layer, true)? {
            return Ok(None);
        }

        let downstream_bundle = downstream_layer.conv::<FxHashSet<_>>().with_descendants(self);
        let upstream_bundle = upstream_layer.conv::<FxHashSet<_>>().with_descendants(self);

        // Chains through other layers' subtrees belong to a different pair.
        let excluded_modules = all_layer_modules - &(&downstream_bundle | &upstream_bundle);

        let mut excluded_imports = FxHashMap::default();

        let mut direct_imports = vec![];
        let mut middles = vec![];
        loop {
            let chain = self.find_shortest_chain_with_excluded_modules_and_imports(
                &downstream_bundle,
                &upstream_bundle,
                &excluded_modules,
                &excluded_imports,
            )?;

            let Some(chain) = chain else { break };

            for (importer, imported) in chain.iter().tuple_windows() {
                excluded_imports
                    .entry(*importer)
                    .or_insert_with(FxHashSet::default)
                    .insert(*imported);
            }

            match split_chain(&chain) {
                (_, Some(middle), _) => middles.push(middle),
                (head, None, tail) => direct_imports.push((head, tail)),
            }
        }

        let mut routes = vec![];
        for (head, tail) in direct_imports {
            routes.push(TokenRoute {
                heads: FxHashSet::from_iter([head]),
                middle: vec![],
                tails: FxHashSet::from_iter([tail]),
            });
        }
        for middle in middles {
            let first = *middle.first().unwrap();
            let last = *middle.last().unwrap();
            let heads = downstream_bundle
                .iter()
                .filter(|importer| {
                    self.direct_import_exists(**importer, first, false).unwrap()
                })
                .cloned()
                .collect::<FxHashSet<_>>();
            let tails = upstream_bundle
                .iter()
                .filter(|imported| self.direct_import_exists(last, **imported, false).unwrap())
                .cloned()
                .collect::<FxHashSet<_>>();
            routes.push(TokenRoute {
                heads,
                middle,
                tails,
            });
        }

        log::debug!("found {} route(s) for one illegal layer pair", routes.len());

        match routes.is_empty() {
            true => Ok(None),
            false => Ok(Some(TokenPackageDependency {
                upstream: upstream_layer,
                downstream: downstream_layer,
                routes,
            })),
        }
    }

    fn token_dependency_to_strings(&self, dep: TokenPackageDependency) -> PackageDependency {
        PackageDependency {
            upstream: self.get_module(dep.upstream).unwrap().name(),
            downstream: self.get_module(dep.downstream).unwrap().name(),
            routes: dep
                .routes
                .into_iter()
                .map(|route| Route {
                    heads: route
                        .heads
                        .iter()
                        .map(|m| self.get_module(*m).unwrap().name())
                        .collect(),
                    middle: route
                        .middle
                        .iter()
                        .map(|m| self.get_module(*m).unwrap().name())
                        .collect(),
                    tails: route
                        .tails
                        .iter()
                        .map(|m| self.get_module(*m).unwrap().name())
                        .collect(),
                })
                .collect(),
        }
    }
}

/// For an ordered, present layer list `[L0, ..., Lk-1]` (high to low), every pair `(Lj, Li)`
/// with `i < j` is a (downstream, upstream) pair that must not import the other way round.
fn generate_layer_pairs(layer_list: &[ModuleToken]) -> Vec<(ModuleToken, ModuleToken)> {
    let mut pairs = vec![];
    for (i, upstream) in layer_list.iter().enumerate() {
        for downstream in &layer_list[i + 1..] {
            pairs.push((*downstream, *upstream));
        }
    }
    pairs
}

fn split_chain(chain: &[ModuleToken]) -> (ModuleToken, Option<Vec<ModuleToken>>, ModuleToken) {
    if chain.len() == 2 {
        return (chain[0], None, chain[1]);
    }
    (
        chain[0],
        Some(chain[1..chain.len() - 1].to_vec()),
        chain[chain.len() - 1],
    )
}
