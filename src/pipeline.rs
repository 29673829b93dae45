//! Curation pipeline orchestration.
//!
//! A [`CurationPipeline`] runs the stages in a fixed order, each consuming
//! the corpus the previous one produced:
//!
//! 1. modifiers ([`Sequential`])
//! 2. quality filters ([`FilterChain`])
//! 3. classification collaborators, in registration order
//! 4. id assignment ([`IdAssigner`])
//! 5. exact deduplication ([`ExactDeduplicator`])
//! 6. fuzzy deduplication ([`FuzzyDeduplicator`])
//!
//! Partition stages run on a dedicated rayon pool. A document that fails is
//! dropped and counted; a partition that fails is emptied and reported in
//! [`PipelineReport::failures`]; configuration and consistency errors abort
//! the run, wrapped in [`CuratorError::Stage`] when a stage and partition are
//! known.
//!
//! # Examples
//!
//! ```
//! use curator::document::Corpus;
//! use curator::pipeline::CurationPipeline;
//! use curator::pipeline::config::PipelineConfig;
//!
//! # fn main() -> curator::error::Result<()> {
//! let config = PipelineConfig::from_json(r#"{
//!     "modifiers": [{"type": "whitespace"}, {"type": "lowercase"}],
//!     "filters": [{"type": "word_count", "min_words": 2}]
//! }"#)?;
//! let pipeline = CurationPipeline::from_config(&config)?;
//!
//! let corpus = Corpus::from_texts(
//!     ["Hello   World", "hello world", "tiny", "Something else entirely"],
//!     2,
//! );
//! let report = pipeline.run(corpus)?;
//!
//! assert_eq!(report.corpus.ids(), vec!["doc-0000000000", "doc-0000000002"]);
//! assert_eq!(report.stage("filter").map(|s| s.dropped()), Some(1));
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{info, warn};

use crate::classify::{ClassificationStage, PiiRedactionStage};
use crate::dedup::exact::ExactDeduplicator;
use crate::dedup::fuzzy::FuzzyDeduplicator;
use crate::document::corpus::{Corpus, Partition};
use crate::document::ids::IdAssigner;
use crate::error::{CuratorError, Result};
use crate::filter::chain::FilterChain;
use crate::filter::config::FilterConfig;
use crate::modifier::config::ModifierConfig;
use crate::modifier::sequential::Sequential;
use crate::pipeline::config::PipelineConfig;
use crate::pipeline::report::{PartitionFailure, PipelineReport, StageReport, Timer};
use crate::stage::PartitionStage;

pub mod config;
pub mod report;

/// The linear sequence of curation stages.
pub struct CurationPipeline {
    modifiers: Sequential,
    filters: FilterChain,
    collaborators: Vec<Arc<dyn PartitionStage>>,
    id_assigner: Option<IdAssigner>,
    exact: Option<ExactDeduplicator>,
    fuzzy: Option<FuzzyDeduplicator>,
    thread_pool: Arc<ThreadPool>,
}

impl CurationPipeline {
    /// Build a pipeline from a validated configuration.
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        config.validate()?;

        let thread_pool_size = config.thread_pool_size.unwrap_or_else(num_cpus::get);
        let thread_pool = ThreadPoolBuilder::new()
            .num_threads(thread_pool_size)
            .thread_name(|i| format!("curator-worker-{i}"))
            .build()
            .map_err(|e| CuratorError::ThreadPool(format!("Failed to create thread pool: {e}")))?;

        Ok(CurationPipeline {
            modifiers: ModifierConfig::build_sequential(&config.modifiers)?,
            filters: FilterConfig::build_chain(&config.filters, config.filter_mode)?
                .record_scores(config.record_filter_scores),
            collaborators: Vec::new(),
            id_assigner: config.ids.as_ref().map(IdAssigner::from_config).transpose()?,
            exact: config.exact_dedup.clone().map(ExactDeduplicator::new),
            fuzzy: config
                .fuzzy_dedup
                .clone()
                .map(FuzzyDeduplicator::new)
                .transpose()?,
            thread_pool: Arc::new(thread_pool),
        })
    }

    /// Replace the modifier stage.
    pub fn with_modifiers(mut self, modifiers: Sequential) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Replace the filter stage.
    pub fn with_filters(mut self, filters: FilterChain) -> Self {
        self.filters = filters;
        self
    }

    /// Append a classification stage.
    pub fn with_classification(self, stage: ClassificationStage) -> Self {
        self.with_stage(Arc::new(stage))
    }

    /// Append a PII redaction stage.
    pub fn with_pii_redaction(self, stage: PiiRedactionStage) -> Self {
        self.with_stage(Arc::new(stage))
    }

    /// Append any partition stage after filtering.
    pub fn with_stage(mut self, stage: Arc<dyn PartitionStage>) -> Self {
        self.collaborators.push(stage);
        self
    }

    /// Run every stage over the corpus.
    pub fn run(&self, corpus: Corpus) -> Result<PipelineReport> {
        self.thread_pool.install(|| self.run_stages(corpus))
    }

    fn run_stages(&self, corpus: Corpus) -> Result<PipelineReport> {
        self.filters.validate()?;
        let mut report = PipelineReport::default();
        let mut corpus = corpus;

        if !self.modifiers.is_empty() {
            corpus = self.run_partition_stage(&self.modifiers, corpus, &mut report)?;
        }
        if !self.filters.filters().is_empty() {
            corpus = self.run_partition_stage(&self.filters, corpus, &mut report)?;
        }
        for stage in &self.collaborators {
            corpus = self.run_partition_stage(stage.as_ref(), corpus, &mut report)?;
        }

        if let Some(assigner) = &self.id_assigner {
            let timer = Timer::start();
            let documents = corpus.len();
            corpus = assigner.assign(corpus)?;
            report.stages.push(StageReport {
                name: "assign_ids".to_string(),
                documents_in: documents,
                documents_out: documents,
                transform_failures: 0,
                elapsed: timer.stop(),
            });
        }
        if let Some((partition, error)) = corpus.find_id_violation() {
            return Err(CuratorError::stage("ensure_unique_ids", partition, error));
        }

        if let Some(exact) = &self.exact {
            let timer = Timer::start();
            let documents_in = corpus.len();
            let (deduplicated, result) = exact.remove_duplicates(corpus)?;
            corpus = deduplicated;
            report.stages.push(Self::stage_report("exact_dedup", documents_in, &corpus, timer));
            report.exact_dedup = Some(result);
        }

        if let Some(fuzzy) = &self.fuzzy {
            let timer = Timer::start();
            let documents_in = corpus.len();
            let (deduplicated, result) = fuzzy.remove_duplicates(corpus)?;
            corpus = deduplicated;
            report.stages.push(Self::stage_report("fuzzy_dedup", documents_in, &corpus, timer));
            report.fuzzy_dedup = Some(result);
        }

        for stage in &report.stages {
            info!(
                stage = %stage.name,
                documents_in = stage.documents_in,
                documents_out = stage.documents_out,
                transform_failures = stage.transform_failures,
                elapsed_ms = stage.elapsed.as_millis() as u64,
                "stage finished"
            );
        }
        report.corpus = corpus;
        Ok(report)
    }

    /// Run a partition stage on every partition in parallel.
    ///
    /// A failed partition is replaced by an empty one so partition indexes
    /// stay stable for later stages and reports.
    fn run_partition_stage(
        &self,
        stage: &dyn PartitionStage,
        corpus: Corpus,
        report: &mut PipelineReport,
    ) -> Result<Corpus> {
        let timer = Timer::start();
        let documents_in = corpus.len();

        let outcomes: Vec<_> = corpus
            .partitions()
            .par_iter()
            .enumerate()
            .map(|(index, partition)| stage.process(index, partition))
            .collect();

        let mut partitions = Vec::with_capacity(outcomes.len());
        let mut transform_failures = 0;
        for (index, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                Ok(outcome) => {
                    transform_failures += outcome.failures.len();
                    partitions.push(outcome.partition);
                }
                Err(error) if error.is_fatal() => {
                    return Err(CuratorError::stage(stage.name(), index, error));
                }
                Err(error) => {
                    warn!(stage = stage.name(), partition = index, %error, "dropping partition");
                    report.failures.push(PartitionFailure {
                        stage: stage.name().to_string(),
                        partition: index,
                        error,
                    });
                    partitions.push(Partition::default());
                }
            }
        }

        let corpus = Corpus::new(partitions);
        let mut stage_report = Self::stage_report(stage.name(), documents_in, &corpus, timer);
        stage_report.transform_failures = transform_failures;
        report.stages.push(stage_report);
        Ok(corpus)
    }

    fn stage_report(name: &str, documents_in: usize, corpus: &Corpus, timer: Timer) -> StageReport {
        StageReport {
            name: name.to_string(),
            documents_in,
            documents_out: corpus.len(),
            transform_failures: 0,
            elapsed: timer.stop(),
        }
    }
}

impl std::fmt::Debug for CurationPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurationPipeline")
            .field("modifiers", &self.modifiers)
            .field("filters", &self.filters)
            .field(
                "collaborators",
                &self.collaborators.iter().map(|s| s.name().to_string()).collect::<Vec<_>>(),
            )
            .field("id_assigner", &self.id_assigner)
            .field("exact", &self.exact)
            .field("fuzzy", &self.fuzzy)
            .field("threads", &self.thread_pool.current_num_threads())
            .finish()
    }
}
