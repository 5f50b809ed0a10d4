//! Even-odd scanline fill of a segment set into a pixel grid.
//!
//! An x-ordered sweep keeps the set of segments straddling the current
//! integer column and, per column, sorts their interpolated y crossings
//! and toggles inside/outside state between them. A geometrically
//! closed, non-self-intersecting boundary crosses every column an even
//! number of times; odd counts come from unrepaired or tangential
//! geometry and are collapsed to the nearest-duplicate pair rather than
//! aborting the layer.

use std::cmp::Ordering;

use crate::error::{RasterError, Result};
use crate::grid::PixelGrid;
use crate::path::LineSegment;

/// Whether an event opens or closes a segment's x-span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EventKind {
    Start,
    End,
}

/// A sweep record: segment `segment` enters or leaves at `x`.
#[derive(Debug, Clone, Copy)]
struct Event {
    x: f64,
    kind: EventKind,
    segment: usize,
}

/// A non-fatal column repair applied during the sweep.
///
/// Emitted when a column's crossing count was odd and the two closest
/// crossings were collapsed into one; carries the resolved (even) count
/// for observability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnFix {
    /// The affected sweep column.
    pub column: i64,
    /// Crossing count after the collapse.
    pub crossings: usize,
}

/// Fill all pixels interior to `segments` into `grid`.
///
/// Accepts loop edges or raw segments; the grid is mutated in place and
/// never written outside its bounds. Vertical segments contribute no
/// crossings: a zero x-extent spans no sweep interval, so they are
/// skipped at event generation. That exclusion is part of the contract,
/// not an accident of the event ordering.
///
/// Returns the column repairs applied; invariant violations in the
/// active-set bookkeeping or fill parity are fatal for the layer.
pub fn fill_segments(segments: &[LineSegment], grid: &mut PixelGrid) -> Result<Vec<ColumnFix>> {
    let events = generate_events(segments);
    let width = grid.width() as i64;

    let mut active: Vec<usize> = Vec::new();
    let mut fixes: Vec<ColumnFix> = Vec::new();
    let mut x: i64 = 0;

    for event in events {
        // Paint every column the sweep passes before this event takes
        // effect. A segment covers the closed x-span between its
        // endpoints, so columns strictly before a start are painted
        // without it, while the column at an end is painted with the
        // segment still active. Ends sort before starts on equal x, so
        // at a vertex where one edge hands off to another on an integer
        // column the crossing is counted once, not twice.
        loop {
            let covered = match event.kind {
                EventKind::Start => (x as f64) < event.x,
                EventKind::End => (x as f64) <= event.x,
            };
            if !covered {
                break;
            }
            if x >= width {
                // Nothing right of the grid can be painted; skip ahead.
                x = event.x.floor() as i64 + 1;
                break;
            }
            paint_column(segments, &active, grid, x, &mut fixes)?;
            x += 1;
        }

        match event.kind {
            EventKind::Start => {
                if active.contains(&event.segment) {
                    return Err(RasterError::DuplicateStart {
                        segment: event.segment,
                        x: event.x,
                    });
                }
                active.push(event.segment);
            }
            EventKind::End => {
                match active.iter().position(|&s| s == event.segment) {
                    Some(pos) => {
                        active.swap_remove(pos);
                    }
                    None => {
                        return Err(RasterError::MissingEnd {
                            segment: event.segment,
                            x: event.x,
                        });
                    }
                }
            }
        }
    }

    Ok(fixes)
}

/// Build the sorted event list: one start at the smaller-x endpoint and
/// one end at the larger, per non-vertical segment. Ends order before
/// starts on equal x: when a column lands exactly on a vertex shared by
/// an incoming and an outgoing edge, the column is painted with only
/// the incoming edge active, so the vertex contributes one crossing.
fn generate_events(segments: &[LineSegment]) -> Vec<Event> {
    let mut events = Vec::with_capacity(segments.len() * 2);
    for (i, seg) in segments.iter().enumerate() {
        if seg.is_vertical() {
            log::debug!("segment {i} is vertical at x={}; no crossings", seg.a.x);
            continue;
        }
        let (first, second) = seg.endpoints_by_x();
        events.push(Event {
            x: first.x,
            kind: EventKind::Start,
            segment: i,
        });
        events.push(Event {
            x: second.x,
            kind: EventKind::End,
            segment: i,
        });
    }
    events.sort_by(|a, b| {
        a.x.partial_cmp(&b.x)
            .unwrap_or(Ordering::Equal)
            .then_with(|| match (a.kind, b.kind) {
                (EventKind::End, EventKind::Start) => Ordering::Less,
                (EventKind::Start, EventKind::End) => Ordering::Greater,
                _ => Ordering::Equal,
            })
    });
    events
}

/// Paint one column: interpolate a y crossing for every active segment,
/// restore even parity if needed, then fill between crossing pairs.
fn paint_column(
    segments: &[LineSegment],
    active: &[usize],
    grid: &mut PixelGrid,
    x: i64,
    fixes: &mut Vec<ColumnFix>,
) -> Result<()> {
    if active.is_empty() {
        return Ok(());
    }

    let xf = x as f64;
    let mut rows: Vec<i64> = active
        .iter()
        .map(|&i| segments[i].y_at(xf) as i64)
        .collect();
    rows.sort_unstable();

    if rows.len() % 2 == 1 {
        collapse_nearest(&mut rows);
        log::warn!(
            "odd crossing count at column {x}; collapsed to {} crossings",
            rows.len()
        );
        fixes.push(ColumnFix {
            column: x,
            crossings: rows.len(),
        });
    }

    let mut inside = false;
    let mut span_start = 0i64;
    for &row in &rows {
        if inside {
            grid.fill_column(x, span_start, row);
        }
        // Boundary pixels are painted as well as interior ones.
        grid.set(x, row);
        inside = !inside;
        span_start = row;
    }

    if inside {
        return Err(RasterError::ParityLeak { column: x });
    }
    Ok(())
}

/// Drop the crossing at the boundary of the smallest adjacent gap: the
/// two crossings closest together are treated as a degenerate
/// near-duplicate and collapsed to one. Ties resolve to the later gap.
/// A lone crossing has no gap and is dropped outright.
fn collapse_nearest(rows: &mut Vec<i64>) {
    if rows.len() < 2 {
        rows.clear();
        return;
    }
    let mut min_idx = 0;
    let mut min_gap = i64::MAX;
    for i in 0..rows.len() - 1 {
        let gap = rows[i + 1] - rows[i];
        if gap <= min_gap {
            min_gap = gap;
            min_idx = i;
        }
    }
    rows.remove(min_idx);
}
