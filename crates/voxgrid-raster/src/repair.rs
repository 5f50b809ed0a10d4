//! Loop reconstruction from an unordered slice-segment soup.
//!
//! Slicing leaves small floating-point gaps between endpoints that
//! should coincide, so segments are connected primarily by quantized
//! coordinate equality and otherwise by the nearest unmatched endpoint
//! within a stitch tolerance. This is a greedy best-effort heal, not an
//! exact reconstruction: upstream slicing error is expected and must
//! not abort a conversion.

use serde::{Deserialize, Serialize};
use voxgrid_math::{are_close, Point2, PointKey, EPS_GEOM};

use crate::error::{RasterError, Result};
use crate::path::{LineSegment, SliceLoop};

/// What to do with an edge that has no partner within tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OrphanPolicy {
    /// Drop the edge with a warning and keep converting.
    #[default]
    Skip,
    /// Fail the whole layer.
    Fail,
}

/// Result of one repair call.
#[derive(Debug, Clone, Default)]
pub struct RepairOutcome {
    /// Closed loops covering the connectable input edges.
    pub loops: Vec<SliceLoop>,
    /// Orphan edges dropped under [`OrphanPolicy::Skip`].
    pub dropped: usize,
    /// Zero-length edges discarded before stitching.
    pub degenerate: usize,
}

impl RepairOutcome {
    /// Total edge count across all output loops.
    pub fn edge_total(&self) -> usize {
        self.loops.iter().map(SliceLoop::edge_count).sum()
    }
}

/// Stitch an unordered segment set into closed loops.
///
/// Walks the endpoint graph greedily: a chain is extended from its
/// current free end to the connected (or nearest-within-`tolerance`)
/// edge until it returns to its starting point, emitting one loop;
/// this repeats until every segment is consumed. A chain that dead-ends
/// after consuming more than one edge is closed back to its own start,
/// accepting a small residual error rather than failing the layer.
///
/// Empty input yields an empty outcome.
pub fn repair_loops(
    segments: &[LineSegment],
    tolerance: f64,
    policy: OrphanPolicy,
) -> Result<RepairOutcome> {
    let mut remaining: Vec<LineSegment> = Vec::with_capacity(segments.len());
    let mut degenerate = 0usize;
    for seg in segments {
        if seg.is_degenerate(tolerance) {
            degenerate += 1;
        } else {
            remaining.push(*seg);
        }
    }

    let mut outcome = RepairOutcome {
        degenerate,
        ..Default::default()
    };

    while !remaining.is_empty() {
        let seed = remaining.remove(0);
        let mut chain = vec![seed.a, seed.b];
        let mut reversed = false;

        loop {
            let head = chain[chain.len() - 1];
            let start = chain[0];

            if chain.len() >= 3 && are_close(&head, &start, tolerance) {
                // Snap the closing endpoint onto the start so the loop
                // is exactly closed.
                let last = chain.len() - 1;
                chain[last] = start;
                outcome.loops.push(SliceLoop::new(chain));
                break;
            }

            if let Some(next) = take_connected(&mut remaining, &head, tolerance) {
                chain.push(next);
                continue;
            }

            // Dead end. A single-edge chain gets one chance to grow from
            // its other endpoint before it counts as an orphan.
            if chain.len() == 2 {
                if !reversed {
                    chain.reverse();
                    reversed = true;
                    continue;
                }
                match policy {
                    OrphanPolicy::Skip => {
                        log::warn!(
                            "dropping orphan edge ({:.4}, {:.4})-({:.4}, {:.4}): no partner within {}",
                            chain[0].x, chain[0].y, chain[1].x, chain[1].y, tolerance
                        );
                        outcome.dropped += 1;
                    }
                    OrphanPolicy::Fail => {
                        return Err(RasterError::UnrepairableGeometry { unmatched: 1 });
                    }
                }
                break;
            }

            // Leftover unmatched endpoint: close the chain back to its
            // start with a small residual edge so voxelization stays
            // total on slightly non-manifold input.
            log::debug!(
                "closing open chain of {} edges back to its start",
                chain.len() - 1
            );
            chain.push(start);
            outcome.loops.push(SliceLoop::new(chain));
            break;
        }
    }

    Ok(outcome)
}

/// Remove from `remaining` the segment connected to `head` and return
/// its far endpoint. Quantized-equal endpoints win over merely-near
/// ones; among near ones the closest within `tolerance` is taken.
fn take_connected(
    remaining: &mut Vec<LineSegment>,
    head: &Point2,
    tolerance: f64,
) -> Option<Point2> {
    let head_key = PointKey::from_point(head, EPS_GEOM);
    let mut exact: Option<(usize, bool)> = None;
    for (i, seg) in remaining.iter().enumerate() {
        if PointKey::from_point(&seg.a, EPS_GEOM) == head_key {
            exact = Some((i, true));
            break;
        }
        if PointKey::from_point(&seg.b, EPS_GEOM) == head_key {
            exact = Some((i, false));
            break;
        }
    }
    if let Some((i, from_a)) = exact {
        let seg = remaining.remove(i);
        return Some(if from_a { seg.b } else { seg.a });
    }

    let tol2 = tolerance * tolerance;
    let mut best: Option<(usize, bool, f64)> = None;
    for (i, seg) in remaining.iter().enumerate() {
        let da = (seg.a - *head).norm_squared();
        if da <= tol2 && best.map_or(true, |(_, _, d)| da < d) {
            best = Some((i, true, da));
        }
        let db = (seg.b - *head).norm_squared();
        if db <= tol2 && best.map_or(true, |(_, _, d)| db < d) {
            best = Some((i, false, db));
        }
    }
    best.map(|(i, from_a, _)| {
        let seg = remaining.remove(i);
        if from_a { seg.b } else { seg.a }
    })
}
