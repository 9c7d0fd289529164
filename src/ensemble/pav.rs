//! PAV ensemble backend

use crate::calibration::{IsotonicFitter, MonotonicFitter};
use crate::calibrator::Calibrator;
use crate::config::{PavConfig, SourceSpec};
use crate::corpus::DocumentCorpus;
use crate::error::Result;
use crate::hit::{merge_hits, AnalysisResult, WeightedHits};
use crate::project::{ProjectRegistry, SubjectProject};
use crate::store::ModelStore;
use crate::trainer::{PavTrainer, TrainingReport};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Ensemble backend that calibrates and merges weighted source suggestions
///
/// Calibration models are read from `datadir`, one artifact per source, and
/// cached for the lifetime of the backend. They are only created by
/// [`load_corpus`](Self::load_corpus); inference never trains implicitly.
pub struct PavBackend<F: MonotonicFitter = IsotonicFitter> {
    config: PavConfig,
    registry: Arc<dyn ProjectRegistry>,
    calibrator: Calibrator<F::Model>,
    trainer: PavTrainer<F>,
    datadir: PathBuf,
}

impl PavBackend<IsotonicFitter> {
    /// Create a backend using isotonic regression for calibration
    pub fn new(
        config: PavConfig,
        registry: Arc<dyn ProjectRegistry>,
        datadir: impl Into<PathBuf>,
    ) -> Result<Self> {
        Self::with_fitter(config, registry, datadir, IsotonicFitter)
    }
}

impl<F: MonotonicFitter> PavBackend<F> {
    /// Create a backend with a custom regressor fitter
    pub fn with_fitter(
        config: PavConfig,
        registry: Arc<dyn ProjectRegistry>,
        datadir: impl Into<PathBuf>,
        fitter: F,
    ) -> Result<Self> {
        config.validate()?;
        let datadir = datadir.into();
        let store = Arc::new(ModelStore::new(datadir.clone()));
        Ok(Self {
            config,
            registry,
            calibrator: Calibrator::new(store),
            trainer: PavTrainer::new(fitter, datadir.clone()),
            datadir,
        })
    }

    pub fn config(&self) -> &PavConfig {
        &self.config
    }

    pub fn datadir(&self) -> &Path {
        &self.datadir
    }

    /// Shared model cache of this backend
    pub fn store(&self) -> &ModelStore<F::Model> {
        self.calibrator.store()
    }

    /// Calibrated hits of every source, each paired with its weight
    pub fn analyze_with_sources(
        &self,
        text: &str,
        sources: &[SourceSpec],
        project: &dyn SubjectProject,
    ) -> Result<Vec<WeightedHits>> {
        let mut hits_from_sources = Vec::with_capacity(sources.len());
        for spec in sources {
            let source = self.registry.get_project(&spec.project_id)?;
            let hits = source.analyze(text)?;
            debug!(source = %spec.project_id, hits = hits.len(), "got hits from source");
            let calibrated = self.calibrator.apply(&hits, source.as_ref(), project)?;
            debug!(source = %spec.project_id, hits = calibrated.len(), "hits after PAV");
            hits_from_sources.push(WeightedHits::new(calibrated, spec.weight));
        }
        Ok(hits_from_sources)
    }

    /// Merge calibrated suggestions of `sources` over the project vocabulary
    pub fn analyze_sources(
        &self,
        text: &str,
        sources: &[SourceSpec],
        project: &dyn SubjectProject,
    ) -> Result<AnalysisResult> {
        let hits_from_sources = self.analyze_with_sources(text, sources, project)?;
        let merged = merge_hits(&hits_from_sources, project.subjects());
        debug!(project = project.project_id(), hits = merged.len(), "hits after merging");
        Ok(merged)
    }

    /// Suggest subjects for `text` using the configured sources
    ///
    /// The merged result is cut to the configured `limit` and `threshold`.
    pub fn analyze(&self, text: &str, project: &dyn SubjectProject) -> Result<AnalysisResult> {
        let merged = self.analyze_sources(text, &self.config.sources, project)?;
        Ok(merged.filter(self.config.limit, self.config.threshold))
    }

    /// Train calibration models for every configured source
    ///
    /// Sources are trained in configuration order; the first failure aborts
    /// and leaves that source's previous artifact in place. Cached models of
    /// retrained sources are evicted so the next analysis loads the new ones.
    pub fn load_corpus(
        &self,
        corpus: &dyn DocumentCorpus,
        project: &dyn SubjectProject,
    ) -> Result<Vec<TrainingReport>> {
        info!(project = project.project_id(), sources = self.config.sources.len(), "creating PAV models");

        let mut reports = Vec::with_capacity(self.config.sources.len());
        for spec in &self.config.sources {
            let source = self.registry.get_project(&spec.project_id)?;
            let report = self.trainer.train(source.as_ref(), corpus, self.config.min_docs)?;
            self.store().evict(&spec.project_id);
            reports.push(report);
        }
        Ok(reports)
    }
}
