// Simultaneity Clusters - Groups of onsets treated as one instant
// Shared by linear coordination, the playability validator and micro-timing

use serde::{Deserialize, Serialize};

use super::beat::Beat;

/// Indices of beats (into a sorted beat slice) that sound together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    /// Position of the cluster's first (anchor) beat
    pub position: f64,

    /// Indices into the beat slice the cluster was built from, ascending
    pub indices: Vec<usize>,
}

impl Cluster {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Resolve the member beats against the slice the cluster came from
    pub fn beats<'a>(&'a self, beats: &'a [Beat]) -> impl Iterator<Item = &'a Beat> + 'a {
        self.indices.iter().filter_map(move |&idx| beats.get(idx))
    }
}

/// Group sorted beats into simultaneity clusters
///
/// A beat joins the current cluster when it lies within `tolerance` beats of
/// the cluster's anchor (its first beat); otherwise it opens a new cluster.
/// Anchoring keeps a run of evenly spaced notes from chaining into one cluster.
pub fn group_clusters(beats: &[Beat], tolerance: f64) -> Vec<Cluster> {
    if beats.is_empty() {
        return Vec::new();
    }

    let tolerance = tolerance.max(0.0);
    let mut clusters = Vec::new();
    let mut current = Cluster {
        position: beats[0].position(),
        indices: vec![0],
    };

    for (i, beat) in beats.iter().enumerate().skip(1) {
        if beat.position() - current.position <= tolerance {
            current.indices.push(i);
        } else {
            let next = Cluster {
                position: beat.position(),
                indices: vec![i],
            };
            clusters.push(std::mem::replace(&mut current, next));
        }
    }

    clusters.push(current);
    clusters
}
