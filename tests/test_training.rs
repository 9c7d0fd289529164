//! Integration test: calibration training end-to-end

mod common;

use common::ScriptedProject;
use pav_ensemble::prelude::*;
use pav_ensemble::persistence::load_json;
use std::io::Write;
use std::sync::Arc;

fn registry() -> Arc<dyn ProjectRegistry> {
    Arc::new(
        StaticProjectRegistry::new()
            .with_project(ScriptedProject::shared("tfidf", &["x", "y", "z"]))
            .with_project(ScriptedProject::shared("fasttext", &["x", "y"])),
    )
}

/// Ten documents; `x` is the true subject of the first `x_positives`,
/// `y` of the first `y_positives`. Scores rise with the document number.
fn corpus(x_positives: usize, y_positives: usize) -> ListCorpus {
    let mut corpus = ListCorpus::default();
    for i in 0..10 {
        let score = i as f64 / 10.0;
        let text = format!("x={} y={} z=0.5", 1.0 - score, score);
        let mut uris = Vec::new();
        if i < x_positives {
            uris.push("x");
        }
        if i < y_positives {
            uris.push("y");
        }
        corpus.push(Document::new(text, SubjectSet::from_uris(uris)));
    }
    corpus
}

fn target() -> ScriptedProject {
    ScriptedProject::new("pav-en", &["x", "y", "z"])
}

#[test]
fn test_load_corpus_trains_every_source() {
    let dir = tempfile::tempdir().unwrap();
    let config = PavConfig::new(parse_sources("tfidf:1,fasttext:1").unwrap()).with_min_docs(2);
    let backend = PavBackend::new(config, registry(), dir.path()).unwrap();

    let reports = backend.load_corpus(&corpus(5, 5), &target()).unwrap();

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].source_project_id, "tfidf");
    assert_eq!(reports[0].documents, 10);
    assert_eq!(reports[0].concepts_total, 3);
    // "z" has no positive documents
    assert_eq!(reports[0].concepts_calibrated, 2);
    assert_eq!(reports[1].concepts_total, 2);
    assert!(dir.path().join("pav-model-tfidf").exists());
    assert!(dir.path().join("pav-model-fasttext").exists());
}

#[test]
fn test_min_docs_boundary() {
    let dir = tempfile::tempdir().unwrap();
    let config = PavConfig::new(parse_sources("tfidf").unwrap()).with_min_docs(5);
    let backend = PavBackend::new(config, registry(), dir.path()).unwrap();

    // x has exactly 5 positive documents, y exactly 4
    backend.load_corpus(&corpus(5, 4), &target()).unwrap();

    let model = backend.store().get_model("tfidf", "pav-en").unwrap();
    assert!(model.regressor("x").is_some());
    assert!(model.regressor("y").is_none());
    assert!(model.regressor("z").is_none());
    assert_eq!(model.min_docs, 5);
}

#[test]
fn test_trained_calibration_follows_labels() {
    let dir = tempfile::tempdir().unwrap();
    let config = PavConfig::new(parse_sources("tfidf").unwrap()).with_min_docs(1);
    let backend = PavBackend::new(config, registry(), dir.path()).unwrap();
    backend.load_corpus(&corpus(5, 5), &target()).unwrap();

    let model = backend.store().get_model("tfidf", "pav-en").unwrap();
    // y is positive exactly for the low-scoring half of the corpus, so the
    // best non-decreasing fit is the flat base rate
    let y = model.regressor("y").unwrap();
    for raw in [-3.0, 0.0, 0.45, 0.9, 3.0] {
        assert_eq!(y.predict(raw), 0.5);
    }

    let x = model.regressor("x").unwrap();
    assert_eq!(x.predict(1.0), 1.0);
    assert_eq!(x.predict(0.1), 0.0);
}

#[test]
fn test_backend_failure_keeps_previous_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let config = PavConfig::new(parse_sources("tfidf").unwrap()).with_min_docs(1);
    let backend = PavBackend::new(config, registry(), dir.path()).unwrap();
    backend.load_corpus(&corpus(5, 5), &target()).unwrap();

    let artifact = dir.path().join("pav-model-tfidf");
    let before = std::fs::read(&artifact).unwrap();

    let mut failing = corpus(2, 2);
    failing.push(Document::new("boom", SubjectSet::from_uris(["x"])));
    let err = backend.load_corpus(&failing, &target()).unwrap_err();
    assert!(matches!(err, PavError::BackendError { .. }));

    assert_eq!(std::fs::read(&artifact).unwrap(), before);
    let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(leftovers, 1);
}

#[test]
fn test_unknown_source_fails_training() {
    let dir = tempfile::tempdir().unwrap();
    let config = PavConfig::new(parse_sources("tfidf,omikuji").unwrap()).with_min_docs(1);
    let backend = PavBackend::new(config, registry(), dir.path()).unwrap();

    let err = backend.load_corpus(&corpus(5, 5), &target()).unwrap_err();
    assert!(matches!(err, PavError::ProjectNotFound(id) if id == "omikuji"));
}

#[test]
fn test_training_from_tsv_corpus() {
    let dir = tempfile::tempdir().unwrap();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    for i in 0..8 {
        let subjects = if i >= 4 { "<x>" } else { "<y>" };
        writeln!(file, "x={} y=0.2\t{}", i as f64 / 8.0, subjects).unwrap();
    }
    file.flush().unwrap();

    let config = PavConfig::new(parse_sources("fasttext").unwrap()).with_min_docs(3);
    let backend = PavBackend::new(config, registry(), dir.path()).unwrap();
    let reports = backend
        .load_corpus(&TsvDocumentCorpus::new(file.path()), &target())
        .unwrap();

    assert_eq!(reports[0].documents, 8);
    assert_eq!(reports[0].concepts_calibrated, 2);

    let model: CalibrationModel<IsotonicRegression> = load_json(&reports[0].artifact_path).unwrap();
    assert_eq!(model.source_project_id, "fasttext");
    assert_eq!(model.regressor("x").unwrap().predict(0.9), 1.0);
}

#[test]
fn test_retraining_evicts_cached_model() {
    let dir = tempfile::tempdir().unwrap();
    let config = PavConfig::new(parse_sources("tfidf").unwrap()).with_min_docs(5);
    let backend = PavBackend::new(config, registry(), dir.path()).unwrap();

    backend.load_corpus(&corpus(4, 4), &target()).unwrap();
    let first = backend.store().get_model("tfidf", "pav-en").unwrap();
    assert!(first.is_empty());

    backend.load_corpus(&corpus(6, 6), &target()).unwrap();
    assert!(!backend.store().is_loaded("tfidf"));
    let second = backend.store().get_model("tfidf", "pav-en").unwrap();
    assert_eq!(second.len(), 2);
}
