//! Filter pipeline: ordered stages followed by the combination rule.
//!
//! A pipeline is validated once when it is built. Every stage input must be a
//! base layer or the output of an earlier stage, so a pipeline that builds can
//! always run on a grid that carries the base layers. Running never mutates
//! the source grid; each run derives a fresh [`LayeredGrid`].

pub mod combine;

pub use combine::combine_min;

use std::collections::HashSet;
use std::time::Instant;

use log::{debug, info};

use crate::filters::{Filter, PipelineConfig};
use crate::grid::LayeredGrid;
use crate::types::{ConfigError, DEFAULT_TRAVERSABILITY, LAYER_TRAVERSABILITY, TraversabilityError};

/// How stage outputs are reduced into the composite layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Combination {
    /// Layers to reduce. `None` means every stage output, in stage order.
    pub risk_layers: Option<Vec<String>>,
    pub output_layer: String,
    /// Value for cells where every risk layer is unknown.
    pub default_traversability: f64,
}

impl Default for Combination {
    fn default() -> Self {
        Self {
            risk_layers: None,
            output_layer: LAYER_TRAVERSABILITY.to_string(),
            default_traversability: DEFAULT_TRAVERSABILITY,
        }
    }
}

pub struct FilterPipeline {
    base_layers: Vec<String>,
    stages: Vec<Box<dyn Filter>>,
    risk_layers: Vec<String>,
    output_layer: String,
    default_traversability: f64,
}

impl std::fmt::Debug for FilterPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterPipeline")
            .field("base_layers", &self.base_layers)
            .field(
                "stages",
                &self.stages.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .field("risk_layers", &self.risk_layers)
            .field("output_layer", &self.output_layer)
            .finish()
    }
}

impl FilterPipeline {
    /// Validate stage ordering and the combination settings.
    pub fn new(
        base_layers: Vec<String>,
        stages: Vec<Box<dyn Filter>>,
        combination: Combination,
    ) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&combination.default_traversability) {
            return Err(ConfigError::InvalidParameter {
                stage: combination.output_layer,
                reason: format!(
                    "default traversability must be in [0, 1], got {}",
                    combination.default_traversability
                ),
            });
        }

        let mut names = HashSet::new();
        for stage in &stages {
            if !names.insert(stage.name()) {
                return Err(ConfigError::DuplicateStage(stage.name().to_string()));
            }
        }

        let mut available: HashSet<&str> = base_layers.iter().map(String::as_str).collect();
        for (i, stage) in stages.iter().enumerate() {
            for input in stage.inputs() {
                if available.contains(input) {
                    continue;
                }
                let produced_later = stages[i..].iter().any(|s| s.output() == input);
                let layer = input.to_string();
                let stage = stage.name().to_string();
                return Err(if produced_later {
                    ConfigError::CyclicDependency { stage, layer }
                } else {
                    ConfigError::UnconfiguredInput { stage, layer }
                });
            }
            available.insert(stage.output());
        }

        let risk_layers = match combination.risk_layers {
            Some(layers) => {
                if let Some(missing) = layers.iter().find(|l| !available.contains(l.as_str())) {
                    return Err(ConfigError::UnknownRiskLayer(missing.clone()));
                }
                layers
            }
            None => {
                let mut layers: Vec<String> = Vec::with_capacity(stages.len());
                for stage in &stages {
                    if !layers.iter().any(|l| l == stage.output()) {
                        layers.push(stage.output().to_string());
                    }
                }
                layers
            }
        };
        if risk_layers.is_empty() {
            return Err(ConfigError::NoRiskLayers);
        }

        Ok(Self {
            base_layers,
            stages,
            risk_layers,
            output_layer: combination.output_layer,
            default_traversability: combination.default_traversability,
        })
    }

    /// Build the configured stages and validate the result.
    pub fn from_config(
        config: &PipelineConfig,
        default_traversability: f64,
    ) -> Result<Self, ConfigError> {
        let stages = config
            .filters
            .iter()
            .map(|f| f.build())
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(
            config.base_layers.clone(),
            stages,
            Combination {
                risk_layers: config.risk_layers.clone(),
                output_layer: config.output_layer.clone(),
                default_traversability,
            },
        )
    }

    pub fn base_layers(&self) -> &[String] {
        &self.base_layers
    }

    pub fn stage_names(&self) -> impl Iterator<Item = &str> {
        self.stages.iter().map(|s| s.name())
    }

    pub fn risk_layers(&self) -> &[String] {
        &self.risk_layers
    }

    pub fn output_layer(&self) -> &str {
        &self.output_layer
    }

    pub fn default_traversability(&self) -> f64 {
        self.default_traversability
    }

    /// Run every stage in order on a copy of `source`, then combine.
    ///
    /// The returned grid holds the source layers, one layer per stage output,
    /// and the composite output layer.
    pub fn run(&self, source: &LayeredGrid) -> Result<LayeredGrid, TraversabilityError> {
        for base in &self.base_layers {
            source.require_layer(base)?;
        }

        let started = Instant::now();
        let mut grid = source.clone();
        for stage in &self.stages {
            let stage_started = Instant::now();
            let layer = stage.apply(&grid)?;
            grid.add_layer(stage.output(), layer)?;
            debug!(
                "stage '{}' -> '{}' in {:?}",
                stage.name(),
                stage.output(),
                stage_started.elapsed()
            );
        }

        let combined = combine_min(&grid, &self.risk_layers, self.default_traversability)?;
        grid.add_layer(self.output_layer.as_str(), combined)?;

        info!(
            "traversability computed for {}x{} grid ({} stages) in {:?}",
            grid.width(),
            grid.height(),
            self.stages.len(),
            started.elapsed()
        );
        Ok(grid)
    }
}
