//! Traversability engine: owns the pipeline and the published snapshot.
//!
//! Computation cycles are serialized; each runs to completion before its grid
//! is published. Queries read the latest snapshot and never wait for a cycle
//! in progress.

pub mod snapshot;

pub use snapshot::{SnapshotStore, TraversabilitySnapshot};

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use glam::DVec2;
use log::{debug, info, warn};
use parking_lot::{Mutex, RwLock};

use crate::config::EngineConfig;
use crate::grid::LayeredGrid;
use crate::pipeline::FilterPipeline;
use crate::query::{
    FootprintPath, FootprintVerdict, PathVerdict, check_footprint_path, check_inclination,
    query_footprint,
};
use crate::types::{ConfigError, Polygon, TraversabilityError};

/// Configuration and the pipeline built from it, swapped together.
struct EngineState {
    config: Arc<EngineConfig>,
    /// `None` after a failed reconfiguration: computing is refused until fixed.
    pipeline: Option<Arc<FilterPipeline>>,
}

pub struct TraversabilityEngine {
    state: RwLock<EngineState>,
    snapshots: SnapshotStore,
    /// Held for the duration of a cycle; stores the ticket of the last published cycle.
    cycle: Mutex<u64>,
    requested: AtomicU64,
}

impl TraversabilityEngine {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        let pipeline = FilterPipeline::from_config(&config.pipeline, config.traversability_default)?;
        Ok(Self::with_pipeline(config, pipeline))
    }

    /// Engine with a hand-built pipeline, e.g. one using custom stages.
    pub fn with_pipeline(config: EngineConfig, pipeline: FilterPipeline) -> Self {
        Self {
            state: RwLock::new(EngineState {
                config: Arc::new(config),
                pipeline: Some(Arc::new(pipeline)),
            }),
            snapshots: SnapshotStore::new(),
            cycle: Mutex::new(0),
            requested: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> Arc<EngineConfig> {
        Arc::clone(&self.state.read().config)
    }

    pub fn is_configured(&self) -> bool {
        self.state.read().pipeline.is_some()
    }

    /// Replace configuration and pipeline.
    ///
    /// On failure the engine stops computing until a later call succeeds; the
    /// previous configuration and the last published snapshot stay available
    /// to queries.
    pub fn reconfigure(&self, config: EngineConfig) -> Result<(), ConfigError> {
        match FilterPipeline::from_config(&config.pipeline, config.traversability_default) {
            Ok(pipeline) => {
                info!(
                    "pipeline reconfigured: [{}]",
                    pipeline.stage_names().collect::<Vec<_>>().join(", ")
                );
                *self.state.write() = EngineState {
                    config: Arc::new(config),
                    pipeline: Some(Arc::new(pipeline)),
                };
                Ok(())
            }
            Err(err) => {
                warn!("pipeline reconfiguration failed, computation disabled: {err}");
                self.state.write().pipeline = None;
                Err(err)
            }
        }
    }

    /// Run the pipeline on `elevation` and publish the result.
    ///
    /// If a request issued after this one has already published, its snapshot
    /// is returned instead of recomputing stale input. On error nothing is
    /// published.
    pub fn compute_traversability(
        &self,
        elevation: &LayeredGrid,
    ) -> Result<Arc<TraversabilitySnapshot>, TraversabilityError> {
        let ticket = self.next_ticket();
        self.compute_for_ticket(ticket, elevation)
    }

    fn next_ticket(&self) -> u64 {
        self.requested.fetch_add(1, Ordering::AcqRel) + 1
    }

    fn compute_for_ticket(
        &self,
        ticket: u64,
        elevation: &LayeredGrid,
    ) -> Result<Arc<TraversabilitySnapshot>, TraversabilityError> {
        let pipeline = self
            .state
            .read()
            .pipeline
            .clone()
            .ok_or(TraversabilityError::NotConfigured)?;

        let mut last_published = self.cycle.lock();
        if *last_published > ticket
            && let Some(current) = self.snapshots.current()
        {
            debug!("request {ticket} superseded by {}", *last_published);
            return Ok(current);
        }

        let grid = pipeline.run(elevation)?;
        let snapshot = self.snapshots.publish(grid);
        *last_published = ticket;
        debug!(
            "request {ticket} published as generation {}",
            snapshot.generation
        );
        Ok(snapshot)
    }

    pub fn snapshot(&self) -> Option<Arc<TraversabilitySnapshot>> {
        self.snapshots.current()
    }

    /// Generation of the latest snapshot, 0 if nothing was published.
    pub fn generation(&self) -> u64 {
        self.snapshots.generation()
    }

    /// Aggregate the footprint over the latest snapshot. Without a snapshot the
    /// region is not traversable and scores the default.
    pub fn query_footprint(&self, polygon: &Polygon) -> FootprintVerdict {
        let params = self.config().footprint_params();
        match self.snapshot() {
            Some(snapshot) => query_footprint(polygon, &snapshot.grid, &params),
            None => FootprintVerdict {
                is_traversable: false,
                mean: params.default_traversability,
            },
        }
    }

    /// Inclination check over the latest snapshot. Without a snapshot only
    /// coincident points are feasible.
    pub fn check_path(&self, start: DVec2, end: DVec2) -> bool {
        let params = self.config().inclination_params();
        match self.snapshot() {
            Some(snapshot) => check_inclination(start, end, &snapshot.grid, &params),
            None => start == end,
        }
    }

    pub fn check_footprint_path(&self, path: &FootprintPath) -> PathVerdict {
        let config = self.config();
        let footprint = config.footprint_params();
        match self.snapshot() {
            Some(snapshot) => check_footprint_path(
                path,
                &snapshot.grid,
                &footprint,
                &config.inclination_params(),
                config.footprint.circle_segments,
            ),
            None => PathVerdict {
                is_safe: false,
                traversability: footprint.default_traversability,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::UVec2;

    use super::*;
    use crate::filters::{FilterConfig, PipelineConfig, SlopeConfig};
    use crate::types::{LAYER_ELEVATION, LAYER_TRAVERSABILITY, MapInfo};

    fn flat() -> LayeredGrid {
        let mut grid = LayeredGrid::new(MapInfo::square(10, 0.1)).unwrap();
        grid.add_layer_filled(LAYER_ELEVATION, 0.0).unwrap();
        grid
    }

    fn slope_only(input: &str) -> EngineConfig {
        EngineConfig {
            pipeline: PipelineConfig {
                filters: vec![FilterConfig::Slope(SlopeConfig {
                    name: "slope".into(),
                    input: input.into(),
                    output: "slope".into(),
                    critical_value: 0.5,
                    estimation_radius: 0.15,
                })],
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn compute_publishes_increasing_generations() {
        let engine = TraversabilityEngine::new(slope_only(LAYER_ELEVATION)).unwrap();
        assert_eq!(engine.generation(), 0);
        let first = engine.compute_traversability(&flat()).unwrap();
        let second = engine.compute_traversability(&flat()).unwrap();
        assert_eq!(first.generation, 1);
        assert_eq!(second.generation, 2);
        assert_eq!(
            second.grid.value(LAYER_TRAVERSABILITY, UVec2::new(5, 5)),
            1.0
        );
    }

    #[test]
    fn queries_without_snapshot_are_conservative() {
        let engine = TraversabilityEngine::new(slope_only(LAYER_ELEVATION)).unwrap();
        let verdict = engine.query_footprint(&Polygon::rectangle(0.3, 0.3));
        assert!(!verdict.is_traversable);
        assert!(!engine.check_path(DVec2::ZERO, DVec2::X));
        assert!(engine.check_path(DVec2::X, DVec2::X));
    }

    #[test]
    fn failed_reconfigure_refuses_compute_but_keeps_snapshot() {
        let engine = TraversabilityEngine::new(slope_only(LAYER_ELEVATION)).unwrap();
        engine.compute_traversability(&flat()).unwrap();

        let err = engine.reconfigure(slope_only("lidar_height")).unwrap_err();
        assert!(matches!(err, ConfigError::UnconfiguredInput { .. }));
        assert!(!engine.is_configured());
        assert!(matches!(
            engine.compute_traversability(&flat()),
            Err(TraversabilityError::NotConfigured)
        ));
        assert_eq!(engine.generation(), 1);

        engine.reconfigure(slope_only(LAYER_ELEVATION)).unwrap();
        assert_eq!(engine.compute_traversability(&flat()).unwrap().generation, 2);
    }

    #[test]
    fn older_request_returns_newer_snapshot_without_publishing() {
        let engine = TraversabilityEngine::new(slope_only(LAYER_ELEVATION)).unwrap();
        let older = engine.next_ticket();
        let newer = engine.next_ticket();

        let mut raised = flat();
        raised.add_layer_filled(LAYER_ELEVATION, 1.0).unwrap();
        let published = engine.compute_for_ticket(newer, &raised).unwrap();
        assert_eq!(published.generation, 1);

        let stale = engine.compute_for_ticket(older, &flat()).unwrap();
        assert!(Arc::ptr_eq(&stale, &published));
        assert_eq!(engine.generation(), 1);
        assert_eq!(
            engine
                .snapshot()
                .unwrap()
                .grid
                .value(LAYER_ELEVATION, UVec2::new(5, 5)),
            1.0
        );

        // A fresh request is newer than everything published so far.
        assert_eq!(engine.compute_traversability(&flat()).unwrap().generation, 2);
    }

    #[test]
    fn reconfigure_swaps_config_with_pipeline() {
        let engine = TraversabilityEngine::new(slope_only(LAYER_ELEVATION)).unwrap();
        let mut config = slope_only(LAYER_ELEVATION);
        config.traversability_default = 0.2;
        engine.reconfigure(config).unwrap();
        assert_eq!(engine.config().traversability_default, 0.2);

        let mut unknown = flat();
        unknown.add_layer_filled(LAYER_ELEVATION, f64::NAN).unwrap();
        let snapshot = engine.compute_traversability(&unknown).unwrap();
        assert_eq!(
            snapshot.grid.value(LAYER_TRAVERSABILITY, UVec2::new(5, 5)),
            engine.config().traversability_default
        );

        let mut broken = slope_only("lidar_height");
        broken.traversability_default = 0.9;
        assert!(engine.reconfigure(broken).is_err());
        assert_eq!(engine.config().traversability_default, 0.2);
    }

    #[test]
    fn failed_run_does_not_publish() {
        let engine = TraversabilityEngine::new(slope_only(LAYER_ELEVATION)).unwrap();
        let empty = LayeredGrid::new(MapInfo::square(4, 0.1)).unwrap();
        assert!(matches!(
            engine.compute_traversability(&empty),
            Err(TraversabilityError::MissingLayer(_))
        ));
        assert!(engine.snapshot().is_none());
    }

    #[test]
    fn engine_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TraversabilityEngine>();
    }
}
