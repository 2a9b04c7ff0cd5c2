//! End-to-end pipeline tests: synthesize, train, persist, load, predict

use orientar::predict::{Predictor, ScoreBand};
use orientar::profile::ProfileInput;
use orientar::registry::{self, ContextCache, InferenceContext};
use orientar::synth::DatasetSynthesizer;
use orientar::train::{ModelTrainer, TrainerConfig};
use orientar::Error;
use std::sync::Arc;

fn profile(json: &str) -> ProfileInput {
    serde_json::from_str(json).expect("profile JSON should parse")
}

fn trained_predictor() -> Predictor {
    let corpus = DatasetSynthesizer::new(42).generate(240);
    let ensemble = ModelTrainer::new(TrainerConfig::fast())
        .train(&corpus)
        .expect("training should succeed");
    Predictor::new(Arc::new(InferenceContext::from_ensemble(ensemble)))
        .expect("context should be usable")
}

#[test]
fn test_full_pipeline_through_disk() {
    let dir = tempfile::tempdir().unwrap();

    let corpus = DatasetSynthesizer::new(42).generate(240);
    let ensemble = ModelTrainer::new(TrainerConfig::fast()).train(&corpus).unwrap();
    registry::save(dir.path(), &ensemble).unwrap();

    let cache = ContextCache::new();
    let ctx = cache.get_or_load(dir.path()).unwrap();
    let predictor = Predictor::new(ctx).unwrap();

    let result = predictor
        .predict(&profile(
            r#"{"profession": "Data Analyst", "years_experience": 5,
                "objective": "Update Career", "study_hours": 20,
                "skills": ["Python", "SQL", "Statistics"], "motivation": 9}"#,
        ))
        .unwrap();

    assert_eq!(result.classification.len(), 2);
    assert_eq!(result.regression.len(), 2);

    let rec = &result.recommendation;
    assert!((0.0..=100.0).contains(&rec.score));
    assert!((1..=2).contains(&rec.consensus));
    assert!(!rec.area.is_empty());

    for vote in &result.classification {
        assert_eq!(vote.top_areas.len(), 3);
        assert!((0.0..=1.0).contains(&vote.confidence));
        // Ranking is descending in probability
        for pair in vote.top_areas.windows(2) {
            assert!(pair[0].probability >= pair[1].probability);
        }
        assert!(vote.top_areas[0].percent.ends_with('%'));
    }

    for estimate in &result.regression {
        assert!((0.0..=100.0).contains(&estimate.score));
        assert_eq!(estimate.band, ScoreBand::from_score(estimate.score));
    }
}

#[test]
fn test_result_serializes_to_nested_document() {
    let predictor = trained_predictor();
    let result = predictor
        .predict(&profile(
            r#"{"profession": "Developer", "years_experience": 3,
                "objective": "Relocate Career", "study_hours": 10,
                "skills": "Docker, Git"}"#,
        ))
        .unwrap();

    let json = serde_json::to_value(&result).unwrap();
    assert!(json["classification"].is_array());
    assert!(json["regression"].is_array());
    assert!(json["recommendation"]["area"].is_string());
    assert!(json["recommendation"]["score"].is_number());
    assert!(json["recommendation"]["band"].is_string());
    assert!(json["recommendation"]["consensus"].is_number());
}

#[test]
fn test_scenario_junior_tier_from_one_year() {
    // years_experience=1 must encode as Junior; the codebook round-trips it
    let input = profile(
        r#"{"profession": "Developer", "years_experience": 1,
            "objective": "Update Career", "study_hours": 10, "skills": []}"#,
    );
    assert_eq!(input.tier().as_str(), "Junior");

    let predictor = trained_predictor();
    assert!(predictor.predict(&input).is_ok());
}

#[test]
fn test_scenario_senior_tier_from_ten_years() {
    let input = profile(
        r#"{"profession": "Developer", "years_experience": 10,
            "objective": "Update Career", "study_hours": 10, "skills": []}"#,
    );
    assert_eq!(input.tier().as_str(), "Senior");
}

#[test]
fn test_scenario_unseen_profession_predicts_without_error() {
    let predictor = trained_predictor();
    let result = predictor
        .predict(&profile(
            r#"{"profession": "Astronaut", "years_experience": 6,
                "objective": "Relocate Career", "study_hours": "15 hours",
                "skills": ["Orbital Mechanics"]}"#,
        ))
        .unwrap();

    assert!((0.0..=100.0).contains(&result.recommendation.score));
    assert!(!result.recommendation.area.is_empty());
}

#[test]
fn test_scenario_unseen_objective_predicts_without_error() {
    let predictor = trained_predictor();
    let result = predictor.predict(&profile(
        r#"{"profession": "Developer", "years_experience": 2,
            "objective": "Sabbatical", "study_hours": 5, "skills": []}"#,
    ));
    assert!(result.is_ok());
}

#[test]
fn test_predictor_requires_models() {
    let ctx = InferenceContext {
        encoder: None,
        scaler: None,
        classifiers: Vec::new(),
        regressors: Vec::new(),
        metrics: Default::default(),
    };
    let err = Predictor::new(Arc::new(ctx)).unwrap_err();
    assert!(matches!(err, Error::NotReady(_)));
}

#[test]
fn test_predictor_requires_regressors() {
    let corpus = DatasetSynthesizer::new(42).generate(160);
    let ensemble = ModelTrainer::new(TrainerConfig::fast()).train(&corpus).unwrap();

    let mut ctx = InferenceContext::from_ensemble(ensemble);
    ctx.regressors.clear();
    let err = Predictor::new(Arc::new(ctx)).unwrap_err();
    match err {
        Error::NotReady(reason) => assert!(reason.contains("regressor")),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_prediction_is_deterministic() {
    let predictor = trained_predictor();
    let input = profile(
        r#"{"profession": "QA Tester", "years_experience": 8,
            "objective": "Relocate Career", "study_hours": 25,
            "skills": ["Linux", "CI/CD"], "motivation": 6}"#,
    );

    let a = predictor.predict(&input).unwrap();
    let b = predictor.predict(&input).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_concurrent_inference_shares_context() {
    let predictor = trained_predictor();
    let predictor = Arc::new(predictor);

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let predictor = Arc::clone(&predictor);
            std::thread::spawn(move || {
                let input = profile(&format!(
                    r#"{{"profession": "DBA", "years_experience": {},
                        "objective": "Update Career", "study_hours": 10,
                        "skills": ["SQL"]}}"#,
                    i + 1
                ));
                predictor.predict(&input).unwrap()
            })
        })
        .collect();

    for handle in handles {
        let result = handle.join().unwrap();
        assert!((0.0..=100.0).contains(&result.recommendation.score));
    }
}

#[test]
fn test_reload_discards_cache() {
    let dir = tempfile::tempdir().unwrap();
    let corpus = DatasetSynthesizer::new(42).generate(160);
    let ensemble = ModelTrainer::new(TrainerConfig::fast()).train(&corpus).unwrap();
    registry::save(dir.path(), &ensemble).unwrap();

    let cache = ContextCache::new();
    let first = cache.get_or_load(dir.path()).unwrap();

    // Retrain with another seed and persist over the same directory
    let retrained = ModelTrainer::new(TrainerConfig {
        seed: 7,
        ..TrainerConfig::fast()
    })
    .train(&corpus)
    .unwrap();
    registry::save(dir.path(), &retrained).unwrap();

    // The cache still serves the old context until an explicit reload
    let cached = cache.get_or_load(dir.path()).unwrap();
    assert!(Arc::ptr_eq(&first, &cached));

    let reloaded = cache.reload(dir.path()).unwrap();
    assert!(!Arc::ptr_eq(&first, &reloaded));
}
