use std::collections::BTreeSet;
use std::sync::Arc;

use curator::classify::{ClassificationStage, Classifier, PiiRedactionStage, SpanDetector};
use curator::dedup::exact::ExactDeduplicator;
use curator::dedup::fuzzy::{FuzzyDedupConfig, FuzzyDeduplicator};
use curator::document::{Corpus, Document, MetaValue, Partition, Span};
use curator::error::{CuratorError, Result};
use curator::filter::FilterConfig;
use curator::modifier::config::ModifierConfig;
use curator::pipeline::CurationPipeline;
use curator::pipeline::config::PipelineConfig;

const ARTICLE: &str = "Deduplication keeps the same article from being seen many times by a \
    model during training. Pages copied across mirrors often differ only in a footer, a \
    timestamp or a tracking parameter, which is why near duplicate detection matters.";

fn corpus_with_ids(partitions: Vec<Vec<(&str, &str)>>) -> Corpus {
    Corpus::new(
        partitions
            .into_iter()
            .map(|docs| {
                Partition::new(
                    docs.into_iter()
                        .map(|(id, text)| Document::new(id, text))
                        .collect(),
                )
            })
            .collect(),
    )
}

struct AlwaysEnglish;

impl Classifier for AlwaysEnglish {
    fn classify_batch(&self, texts: &[&str]) -> Result<Vec<String>> {
        Ok(vec!["en".to_string(); texts.len()])
    }

    fn name(&self) -> &str {
        "always_english"
    }
}

/// Fails on any batch containing the word "poison".
struct FlakyClassifier;

impl Classifier for FlakyClassifier {
    fn classify_batch(&self, texts: &[&str]) -> Result<Vec<String>> {
        if texts.iter().any(|t| t.contains("poison")) {
            return Err(CuratorError::other("inference server returned 503"));
        }
        Ok(vec!["ok".to_string(); texts.len()])
    }

    fn name(&self) -> &str {
        "flaky"
    }
}

/// Marks every occurrence of "Alice" as a person.
struct NameDetector;

impl SpanDetector for NameDetector {
    fn detect_batch(&self, texts: &[&str]) -> Result<Vec<Vec<Span>>> {
        Ok(texts
            .iter()
            .map(|text| {
                text.match_indices("Alice")
                    .map(|(start, m)| Span::new(start, start + m.len(), "PERSON"))
                    .collect()
            })
            .collect())
    }

    fn name(&self) -> &str {
        "names"
    }
}

#[test]
fn test_normalized_texts_are_exact_duplicates() -> Result<()> {
    let config = PipelineConfig {
        modifiers: vec![ModifierConfig::Whitespace, ModifierConfig::Lowercase],
        fuzzy_dedup: None,
        thread_pool_size: Some(2),
        ..Default::default()
    };
    let pipeline = CurationPipeline::from_config(&config)?;

    let corpus = Corpus::from_texts(
        [
            "The Quick  Brown Fox",
            "unrelated text",
            "the quick brown fox",
            "  THE QUICK\tBROWN FOX  ",
        ],
        2,
    );
    let report = pipeline.run(corpus)?;

    let exact = report.exact_dedup.as_ref().unwrap();
    assert_eq!(exact.clusters.len(), 1);
    assert_eq!(exact.clusters[0].representative, "doc-0000000000");
    assert_eq!(exact.clusters[0].len(), 3);
    assert_eq!(
        report.corpus.ids(),
        vec!["doc-0000000000", "doc-0000000001"]
    );
    Ok(())
}

#[test]
fn test_repetition_filter_example() -> Result<()> {
    let config = PipelineConfig {
        filters: vec![FilterConfig::RepeatingNgram {
            n: 2,
            max_ratio: 0.20,
        }],
        ids: None,
        exact_dedup: None,
        fuzzy_dedup: None,
        thread_pool_size: Some(1),
        ..Default::default()
    };
    let pipeline = CurationPipeline::from_config(&config)?;
    let corpus = corpus_with_ids(vec![vec![
        ("A", "The cat sat. The cat sat. The cat sat."),
        ("B", "A unique sentence with no repeats here today."),
    ]]);

    let report = pipeline.run(corpus)?;
    assert_eq!(report.corpus.ids(), vec!["B"]);
    Ok(())
}

#[test]
fn test_near_duplicates_removed_across_partitions() -> Result<()> {
    let config = PipelineConfig {
        exact_dedup: None,
        fuzzy_dedup: Some(FuzzyDedupConfig {
            shingle_width: 5,
            ..Default::default()
        }),
        ids: None,
        thread_pool_size: Some(4),
        ..Default::default()
    };
    let pipeline = CurationPipeline::from_config(&config)?;

    let mirrored = ARTICLE.replace("a footer", "the footer");
    let corpus = corpus_with_ids(vec![
        vec![("m-2", mirrored.as_str()), ("x-1", "Gardening tips for small balconies.")],
        vec![("m-1", ARTICLE)],
    ]);
    let report = pipeline.run(corpus)?;

    let fuzzy = report.fuzzy_dedup.as_ref().unwrap();
    assert_eq!(fuzzy.clusters.len(), 1);
    assert_eq!(fuzzy.clusters[0].representative, "m-1");
    assert_eq!(report.corpus.ids(), vec!["x-1", "m-1"]);
    Ok(())
}

#[test]
fn test_dedup_independent_of_partition_order() -> Result<()> {
    let docs = vec![
        ("a", ARTICLE),
        ("b", "A completely different paragraph about river ecology and fish."),
        ("c", ARTICLE),
        ("d", "A completely different paragraph about river ecology and fish."),
        ("e", "Standalone."),
    ];
    let layouts = vec![
        corpus_with_ids(vec![docs.clone()]),
        corpus_with_ids(vec![docs[3..].to_vec(), docs[..3].to_vec()]),
        corpus_with_ids(docs.iter().rev().map(|d| vec![*d]).collect()),
    ];

    let exact = ExactDeduplicator::default();
    let fuzzy = FuzzyDeduplicator::new(FuzzyDedupConfig::default())?;
    let mut exact_results = Vec::new();
    let mut fuzzy_results = Vec::new();
    for corpus in &layouts {
        exact_results.push(exact.find_duplicates(corpus)?);
        fuzzy_results.push(fuzzy.find_duplicates(corpus)?);
    }

    assert!(exact_results.windows(2).all(|w| w[0] == w[1]));
    assert!(fuzzy_results.windows(2).all(|w| w[0] == w[1]));
    let expected: BTreeSet<String> = ["c", "d"].iter().map(|s| s.to_string()).collect();
    assert_eq!(exact_results[0].duplicates, expected);
    assert_eq!(fuzzy_results[0].duplicates, expected);
    Ok(())
}

#[test]
fn test_collaborators_annotate_and_redact() -> Result<()> {
    let config = PipelineConfig {
        thread_pool_size: Some(2),
        ..Default::default()
    };
    let pipeline = CurationPipeline::from_config(&config)?
        .with_pii_redaction(PiiRedactionStage::new(Arc::new(NameDetector)))
        .with_classification(ClassificationStage::new(Arc::new(AlwaysEnglish), "language")?);

    let corpus = Corpus::from_texts(["Alice wrote to Bob.", "Nobody here."], 1);
    let report = pipeline.run(corpus)?;

    let first = &report.corpus.partitions()[0].documents()[0];
    assert_eq!(first.text(), "[PERSON] wrote to Bob.");
    assert_eq!(first.get_meta("language"), Some(&MetaValue::Text("en".to_string())));
    assert_eq!(
        first.get_meta("pii_spans").and_then(|v| v.as_spans()).map(|s| s.len()),
        Some(1)
    );

    let names: Vec<_> = report.stages.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["pii_redaction", "classify_language", "assign_ids", "exact_dedup", "fuzzy_dedup"]
    );
    Ok(())
}

#[test]
fn test_collaborator_failure_drops_only_its_partition() -> Result<()> {
    let config = PipelineConfig {
        thread_pool_size: Some(3),
        ..Default::default()
    };
    let pipeline = CurationPipeline::from_config(&config)?
        .with_classification(ClassificationStage::new(Arc::new(FlakyClassifier), "quality")?);

    let corpus = Corpus::from_texts(["fine one", "fine two", "poison pill", "fine three"], 1);
    let report = pipeline.run(corpus)?;

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].stage, "classify_quality");
    assert_eq!(report.failures[0].partition, 2);
    assert!(matches!(
        report.failures[0].error,
        CuratorError::Collaborator { .. }
    ));
    assert_eq!(report.corpus.len(), 3);
    assert_eq!(report.stage("classify_quality").map(|s| s.documents_out), Some(3));
    Ok(())
}

#[test]
fn test_recorded_scores_survive_a_second_run() -> Result<()> {
    let config = PipelineConfig::from_json(
        r#"{
            "filters": [
                {"type": "word_count", "min_words": 2},
                {"type": "terminal_punctuation"}
            ],
            "record_filter_scores": true,
            "thread_pool_size": 2
        }"#,
    )?;
    let pipeline = CurationPipeline::from_config(&config)?;
    let corpus = Corpus::from_texts(
        ["Short one here.", "Another kept sentence.", "no", "Missing the stop"],
        2,
    );

    let first = pipeline.run(corpus)?;
    assert_eq!(first.corpus.len(), 2);
    let second = pipeline.run(first.corpus.clone())?;

    assert_eq!(second.corpus, first.corpus);
    assert!(second.failures.is_empty());
    assert_eq!(second.stage("filter").map(|s| s.transform_failures), Some(0));
    assert_eq!(
        second.corpus.documents().next().and_then(|d| d.get_meta("word_count_score")),
        Some(&MetaValue::Float(3.0))
    );
    Ok(())
}

#[test]
fn test_invalid_configuration_is_rejected_up_front() {
    let result = PipelineConfig::from_json(
        r#"{"modifiers": [{"type": "pattern_replace", "pattern": "(", "replacement": ""}]}"#,
    );
    assert!(matches!(result, Err(CuratorError::Configuration(_))));

    let result = PipelineConfig::from_json(r#"{"filters": [{"type": "word_count", "min": 3}]}"#);
    assert!(matches!(result, Err(CuratorError::Configuration(_))));
}
