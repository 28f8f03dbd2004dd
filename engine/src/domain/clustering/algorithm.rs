//! Screen-space grouping algorithms.

use std::fmt;

use crate::domain::geometry::ScreenPoint;

/// Groups projected points that sit close together on screen.
pub trait ClusterAlgorithm: Send + Sync + fmt::Debug {
    /// Partition `points` into groups of indices into `points`.
    ///
    /// Every index appears in exactly one group. Groups keep input order.
    fn group(&self, points: &[ScreenPoint], radius_px: f64) -> Vec<Vec<usize>>;
}

/// Greedy grid-free distance clustering.
///
/// Points are visited in input order. Each joins the nearest existing group
/// whose anchor, the group's first point, lies within the radius; otherwise
/// it starts a new group.
#[derive(Debug, Clone, Copy, Default)]
pub struct DistanceClusterAlgorithm;

impl ClusterAlgorithm for DistanceClusterAlgorithm {
    fn group(&self, points: &[ScreenPoint], radius_px: f64) -> Vec<Vec<usize>> {
        let mut anchors: Vec<ScreenPoint> = Vec::new();
        let mut groups: Vec<Vec<usize>> = Vec::new();

        for (index, point) in points.iter().enumerate() {
            let nearest = anchors
                .iter()
                .enumerate()
                .map(|(group, anchor)| (group, anchor.distance_to(point)))
                .filter(|(_, distance)| *distance <= radius_px)
                .min_by(|left, right| left.1.total_cmp(&right.1));

            match nearest.and_then(|(group, _)| groups.get_mut(group)) {
                Some(members) => members.push(index),
                None => {
                    anchors.push(*point);
                    groups.push(vec![index]);
                }
            }
        }
        groups
    }
}
