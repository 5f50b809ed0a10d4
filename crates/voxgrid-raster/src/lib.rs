#![warn(missing_docs)]

//! Slice cross-sections to voxel layers.
//!
//! This crate converts the 2D line segments produced by slicing a
//! triangle mesh at a fixed height into a filled boolean pixel grid of
//! the slice interior. Two components run in sequence per layer: loop
//! repair stitches the numerically imperfect segment soup into closed
//! loops, and an even-odd scanline sweep rasterizes their edges into
//! the caller's grid. Repair can be bypassed for already-closed input;
//! both stages operate on the same [`LineSegment`] primitive.
//!
//! Layers are mutually independent: each call reads one layer's
//! segments and writes one caller-owned grid, so callers are free to
//! process layers on their own worker threads. The batch driver here is
//! deliberately sequential.
//!
//! # Example
//!
//! ```ignore
//! use voxgrid_raster::{voxelize_layer, LayerSegments, PixelGrid, VoxelizeSettings};
//!
//! let layer: LayerSegments = // ... segments from the slicer
//! let mut grid = PixelGrid::new(256, 256);
//! let report = voxelize_layer(&layer, &mut grid, &VoxelizeSettings::default())?;
//!
//! println!("loops: {}", report.loop_count);
//! println!("column repairs: {}", report.column_fixes.len());
//! ```

pub mod error;
pub mod grid;
pub mod path;
pub mod repair;
pub mod scanline;

pub use error::{RasterError, Result};
pub use grid::PixelGrid;
pub use path::{LineSegment, SliceLoop};
pub use repair::{repair_loops, OrphanPolicy, RepairOutcome};
pub use scanline::{fill_segments, ColumnFix};

use serde::{Deserialize, Serialize};
use voxgrid_math::EPS_STITCH;

/// Voxelization parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoxelizeSettings {
    /// Allowed gap between endpoints stitched as the same point.
    pub repair_tolerance: f64,
    /// Handling of edges that cannot be connected within tolerance.
    pub orphan_policy: OrphanPolicy,
    /// Run loop repair before the scanline fill. Disable for input that
    /// is known to form exact closed loops.
    pub repair: bool,
}

impl Default for VoxelizeSettings {
    fn default() -> Self {
        Self {
            repair_tolerance: EPS_STITCH,
            orphan_policy: OrphanPolicy::Skip,
            repair: true,
        }
    }
}

impl VoxelizeSettings {
    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if !self.repair_tolerance.is_finite() || self.repair_tolerance <= 0.0 {
            return Err(RasterError::InvalidSettings(
                "repair_tolerance must be positive and finite".into(),
            ));
        }
        Ok(())
    }
}

/// One layer's raw input from the slicer.
#[derive(Debug, Clone)]
pub struct LayerSegments {
    /// Z height of this layer.
    pub z: f64,
    /// Layer index (0 = first layer).
    pub index: usize,
    /// Cross-section segments at this height.
    pub segments: Vec<LineSegment>,
}

impl LayerSegments {
    /// Create a layer record.
    pub fn new(z: f64, index: usize, segments: Vec<LineSegment>) -> Self {
        Self { z, index, segments }
    }
}

/// Diagnostics from voxelizing one layer.
#[derive(Debug, Clone, Default)]
pub struct LayerReport {
    /// Closed loops reconstructed by repair (0 when repair is bypassed).
    pub loop_count: usize,
    /// Orphan edges dropped under [`OrphanPolicy::Skip`].
    pub dropped_edges: usize,
    /// Zero-length edges discarded before stitching.
    pub degenerate_edges: usize,
    /// Odd-crossing repairs applied during the sweep.
    pub column_fixes: Vec<ColumnFix>,
}

/// Voxelize one layer's segments into a caller-owned grid.
///
/// The grid is only mutated within its bounds; an empty segment set
/// yields an empty report and leaves the grid untouched.
pub fn voxelize_layer(
    layer: &LayerSegments,
    grid: &mut PixelGrid,
    settings: &VoxelizeSettings,
) -> Result<LayerReport> {
    settings.validate()?;

    if layer.segments.is_empty() {
        return Ok(LayerReport::default());
    }

    let mut report = LayerReport::default();
    let edges: Vec<LineSegment> = if settings.repair {
        let outcome = repair_loops(
            &layer.segments,
            settings.repair_tolerance,
            settings.orphan_policy,
        )?;
        report.loop_count = outcome.loops.len();
        report.dropped_edges = outcome.dropped;
        report.degenerate_edges = outcome.degenerate;
        outcome.loops.iter().flat_map(|lp| lp.edges()).collect()
    } else {
        layer.segments.clone()
    };

    report.column_fixes = fill_segments(&edges, grid)?;
    Ok(report)
}

/// One completed layer of a batch conversion.
#[derive(Debug, Clone)]
pub struct VoxelLayer {
    /// Z height of the layer.
    pub z: f64,
    /// Layer index.
    pub index: usize,
    /// The filled grid, ready for volume assembly.
    pub grid: PixelGrid,
    /// Per-layer diagnostics.
    pub report: LayerReport,
}

/// A layer that failed fatally during batch conversion.
#[derive(Debug)]
pub struct LayerFailure {
    /// Layer index.
    pub index: usize,
    /// Z height of the layer.
    pub z: f64,
    /// The error that stopped this layer.
    pub error: RasterError,
}

/// Result of a batch conversion.
///
/// A fatal error in one layer does not abort the run: the layer is
/// recorded in `failures` and the remaining layers are still processed,
/// each into its own grid.
#[derive(Debug, Default)]
pub struct BatchResult {
    /// Successfully voxelized layers, in input order.
    pub layers: Vec<VoxelLayer>,
    /// Layers that failed, with their errors.
    pub failures: Vec<LayerFailure>,
}

impl BatchResult {
    /// Every layer converted without a fatal error.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Voxelize a batch of layers, each into a fresh `width` x `height` grid.
pub fn voxelize_layers(
    layers: &[LayerSegments],
    width: usize,
    height: usize,
    settings: &VoxelizeSettings,
) -> Result<BatchResult> {
    settings.validate()?;

    let mut result = BatchResult::default();
    for layer in layers {
        let mut grid = PixelGrid::new(width, height);
        match voxelize_layer(layer, &mut grid, settings) {
            Ok(report) => result.layers.push(VoxelLayer {
                z: layer.z,
                index: layer.index,
                grid,
                report,
            }),
            Err(error) => {
                log::warn!("layer {} (z={}) failed: {error}", layer.index, layer.z);
                result.failures.push(LayerFailure {
                    index: layer.index,
                    z: layer.z,
                    error,
                });
            }
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_layer(z: f64, index: usize) -> LayerSegments {
        LayerSegments::new(
            z,
            index,
            vec![
                LineSegment::from_coords(0.0, 0.0, 10.0, 0.0),
                LineSegment::from_coords(10.0, 0.0, 10.0, 10.0),
                LineSegment::from_coords(10.0, 10.0, 0.0, 10.0),
                LineSegment::from_coords(0.0, 10.0, 0.0, 0.0),
            ],
        )
    }

    #[test]
    fn test_voxelize_layer_square() {
        let layer = square_layer(0.2, 0);
        let mut grid = PixelGrid::new(16, 16);
        let report = voxelize_layer(&layer, &mut grid, &VoxelizeSettings::default()).unwrap();

        assert_eq!(report.loop_count, 1);
        assert_eq!(report.dropped_edges, 0);
        assert!(report.column_fixes.is_empty());
        assert_eq!(grid.filled_count(), 11 * 11);
    }

    #[test]
    fn test_empty_layer_yields_unfilled_grid() {
        let layer = LayerSegments::new(0.2, 0, Vec::new());
        let mut grid = PixelGrid::new(8, 8);
        let report = voxelize_layer(&layer, &mut grid, &VoxelizeSettings::default()).unwrap();
        assert_eq!(report.loop_count, 0);
        assert!(grid.is_empty());
    }

    #[test]
    fn test_repair_bypass_on_closed_input() {
        let layer = square_layer(0.2, 0);
        let settings = VoxelizeSettings {
            repair: false,
            ..Default::default()
        };
        let mut grid = PixelGrid::new(16, 16);
        let report = voxelize_layer(&layer, &mut grid, &settings).unwrap();
        assert_eq!(report.loop_count, 0);
        assert_eq!(grid.filled_count(), 11 * 11);
    }

    #[test]
    fn test_invalid_settings() {
        let settings = VoxelizeSettings {
            repair_tolerance: -1.0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
        let layer = square_layer(0.0, 0);
        let mut grid = PixelGrid::new(4, 4);
        assert!(voxelize_layer(&layer, &mut grid, &settings).is_err());
    }

    #[test]
    fn test_batch_continues_past_failed_layer() {
        // Middle layer holds an orphan edge and a fail-layer policy
        // error; its neighbors must still convert.
        let mut bad = square_layer(0.4, 1);
        bad.segments
            .push(LineSegment::from_coords(50.0, 50.0, 55.0, 50.0));
        let layers = vec![square_layer(0.2, 0), bad, square_layer(0.6, 2)];
        let settings = VoxelizeSettings {
            orphan_policy: OrphanPolicy::Fail,
            ..Default::default()
        };

        let result = voxelize_layers(&layers, 16, 16, &settings).unwrap();
        assert!(!result.is_complete());
        assert_eq!(result.layers.len(), 2);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].index, 1);
        assert!(matches!(
            result.failures[0].error,
            RasterError::UnrepairableGeometry { .. }
        ));
        for layer in &result.layers {
            assert_eq!(layer.grid.filled_count(), 11 * 11);
        }
    }

    #[test]
    fn test_batch_reports_dropped_edges_under_skip() {
        let mut noisy = square_layer(0.2, 0);
        noisy
            .segments
            .push(LineSegment::from_coords(50.0, 50.0, 55.0, 50.0));
        let result = voxelize_layers(&[noisy], 16, 16, &VoxelizeSettings::default()).unwrap();
        assert!(result.is_complete());
        assert_eq!(result.layers[0].report.dropped_edges, 1);
        assert_eq!(result.layers[0].grid.filled_count(), 11 * 11);
    }
}
