// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::error::CiteError;
use crate::store::ReferenceStore;
use citekit_io::{Cluster, ClusterId};
use fnv::{FnvHashMap, FnvHashSet};

/// The set of citation clusters in the document, plus their total order.
#[derive(Default)]
pub(crate) struct ClusterGraph {
    clusters: FnvHashMap<ClusterId, Cluster>,
    order: Vec<ClusterId>,
}

impl ClusterGraph {
    /// Replaces the full set of clusters. Every cite must point at a known
    /// reference; on failure the graph is left untouched. The provided
    /// sequence becomes the initial order, until `set_order` says otherwise.
    pub fn init(
        &mut self,
        clusters: Vec<Cluster>,
        store: &ReferenceStore,
    ) -> Result<(), CiteError> {
        for cluster in &clusters {
            for cite in &cluster.cites {
                if !store.contains(&cite.ref_id) {
                    return Err(CiteError::UnknownReference(cite.ref_id.clone()));
                }
            }
        }
        self.clusters.clear();
        self.order.clear();
        for cluster in clusters {
            let id = cluster.id;
            if self.clusters.insert(id, cluster).is_some() {
                warn!("init_clusters: duplicate cluster id {}, last one wins", id);
            } else {
                self.order.push(id);
            }
        }
        Ok(())
    }

    /// Defines the total order over cluster ids. The list must be a
    /// bijection with the existing ids: each exactly once, no strangers.
    /// On failure the previous order stays in place.
    pub fn set_order(&mut self, ids: &[ClusterId]) -> Result<(), CiteError> {
        let mut seen = FnvHashSet::default();
        for id in ids {
            if !self.clusters.contains_key(id) {
                return Err(CiteError::OrderMismatch(format!(
                    "cluster {} does not exist",
                    id
                )));
            }
            if !seen.insert(*id) {
                return Err(CiteError::OrderMismatch(format!(
                    "cluster {} appears more than once",
                    id
                )));
            }
        }
        if seen.len() != self.clusters.len() {
            let missing: Vec<ClusterId> = self
                .clusters
                .keys()
                .filter(|id| !seen.contains(id))
                .cloned()
                .collect();
            return Err(CiteError::OrderMismatch(format!(
                "clusters missing from the order: {:?}",
                missing
            )));
        }
        self.order = ids.to_vec();
        Ok(())
    }

    pub fn get(&self, id: ClusterId) -> Option<&Cluster> {
        self.clusters.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cluster> {
        self.clusters.values()
    }

    pub fn order(&self) -> &[ClusterId] {
        &self.order
    }
}
