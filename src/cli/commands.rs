//! CLI command handlers

use super::logging::{log, LogLevel};
use super::{Cli, Command, GenerateArgs, InfoArgs, PredictArgs, TrainArgs};
use crate::error::{Error, Result};
use crate::eval::{classification_report, ConfusionMatrix};
use crate::predict::Predictor;
use crate::profile::ProfileInput;
use crate::registry;
use crate::synth::{DatasetSynthesizer, TrainingCorpus};
use crate::train::{MetricsBundle, ModelTrainer, TrainerConfig};
use std::fs;

/// Dispatch one parsed invocation
pub fn run_command(cli: Cli) -> Result<()> {
    let level = LogLevel::from_flags(cli.quiet, cli.verbose);
    match cli.command {
        Command::Generate(args) => run_generate(&args, level),
        Command::Train(args) => run_train(&args, level),
        Command::Predict(args) => run_predict(&args, level),
        Command::Info(args) => run_info(&args, level),
    }
}

fn run_generate(args: &GenerateArgs, level: LogLevel) -> Result<()> {
    let corpus = DatasetSynthesizer::new(args.seed).generate(args.samples);
    corpus.save_csv(&args.output)?;

    log(
        level,
        LogLevel::Normal,
        &format!(
            "Wrote {} records to {}",
            corpus.len(),
            args.output.display()
        ),
    );
    log(level, LogLevel::Verbose, &corpus.summary().to_string());
    Ok(())
}

fn run_train(args: &TrainArgs, level: LogLevel) -> Result<()> {
    let corpus = TrainingCorpus::load_csv(&args.corpus)?;
    log(
        level,
        LogLevel::Normal,
        &format!("Loaded {} records from {}", corpus.len(), args.corpus.display()),
    );

    let trainer = ModelTrainer::new(TrainerConfig {
        seed: args.seed,
        ..TrainerConfig::default()
    });
    let ensemble = trainer.train(&corpus)?;

    print_metrics(&ensemble.metrics, level);

    let area_names = ensemble.encoder.area_codebook().classes().to_vec();
    for (name, report) in &ensemble.metrics.classification.models {
        let cm = ConfusionMatrix::from_rows(report.confusion_matrix.clone());
        log(
            level,
            LogLevel::Verbose,
            &format!("{name} hold-out report:\n{}", classification_report(&cm, &area_names)),
        );
    }

    registry::save(&args.models, &ensemble)?;
    log(
        level,
        LogLevel::Normal,
        &format!("Artifacts saved to {}", args.models.display()),
    );
    Ok(())
}

fn run_predict(args: &PredictArgs, level: LogLevel) -> Result<()> {
    let text = fs::read_to_string(&args.profile)?;
    let input: ProfileInput = serde_json::from_str(&text)
        .map_err(|e| Error::Serialization(format!("{}: {e}", args.profile.display())))?;

    let ctx = registry::global_cache().get_or_load(&args.models)?;
    let predictor = Predictor::new(ctx)?;
    let result = predictor.predict(&input)?;

    log(
        level,
        LogLevel::Verbose,
        &format!(
            "Ensemble: {} classifiers, {} regressors",
            result.classification.len(),
            result.regression.len()
        ),
    );

    let rendered = serde_json::to_string_pretty(&result)
        .map_err(|e| Error::Serialization(e.to_string()))?;
    println!("{rendered}");
    Ok(())
}

fn run_info(args: &InfoArgs, level: LogLevel) -> Result<()> {
    let ctx = registry::load(&args.models)?;

    log(
        level,
        LogLevel::Normal,
        &format!(
            "Classifiers: {}\nRegressors:  {}",
            ctx.classifier_names().join(", "),
            ctx.regressor_names().join(", ")
        ),
    );

    if ctx.metrics.is_empty() {
        log(level, LogLevel::Normal, "No stored metrics.");
        return Ok(());
    }
    print_metrics(&ctx.metrics, level);
    Ok(())
}

fn print_metrics(metrics: &MetricsBundle, level: LogLevel) {
    for (name, report) in &metrics.classification.models {
        log(
            level,
            LogLevel::Normal,
            &format!(
                "[clf] {name}: accuracy {:.4}, precision {:.4}, recall {:.4}, f1 {:.4}, cv {:.4} (+/- {:.4})",
                report.accuracy,
                report.precision,
                report.recall,
                report.f1_score,
                report.cv_mean,
                report.cv_std
            ),
        );
    }
    for (name, report) in &metrics.regression {
        log(
            level,
            LogLevel::Normal,
            &format!(
                "[reg] {name}: rmse {:.4}, mae {:.4}, r2 {:.4}, cv {:.4} (+/- {:.4})",
                report.rmse, report.mae, report.r2_score, report.cv_mean, report.cv_std
            ),
        );
    }
    if !metrics.classification.feature_importance.is_empty() {
        log(level, LogLevel::Verbose, "Feature importance:");
        for entry in &metrics.classification.feature_importance {
            log(
                level,
                LogLevel::Verbose,
                &format!("  {:<18} {:.4}", entry.feature, entry.importance),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_generate_then_train_then_predict() {
        let dir = tempfile::tempdir().unwrap();
        let corpus_path = dir.path().join("corpus.csv");
        let models_dir = dir.path().join("models");
        let profile_path = dir.path().join("profile.json");

        // Small corpus via the generate command
        let cli = Cli::parse_from([
            "orientar",
            "--quiet",
            "generate",
            "--output",
            corpus_path.to_str().unwrap(),
            "--samples",
            "150",
        ]);
        run_command(cli).unwrap();
        assert!(corpus_path.exists());

        // Full-size training via the CLI default config is slow in debug
        // builds, so drive the trainer directly with the fast profile
        let corpus = TrainingCorpus::load_csv(&corpus_path).unwrap();
        let ensemble = ModelTrainer::new(TrainerConfig::fast()).train(&corpus).unwrap();
        registry::save(&models_dir, &ensemble).unwrap();

        fs::write(
            &profile_path,
            r#"{"profession": "Developer", "years_experience": 4,
                "objective": "Update Career", "study_hours": 15,
                "skills": ["React", "Node.js"]}"#,
        )
        .unwrap();

        let cli = Cli::parse_from([
            "orientar",
            "--quiet",
            "predict",
            profile_path.to_str().unwrap(),
            "--models",
            models_dir.to_str().unwrap(),
        ]);
        run_command(cli).unwrap();

        // Info over the same artifacts
        let cli = Cli::parse_from([
            "orientar",
            "--quiet",
            "info",
            "--models",
            models_dir.to_str().unwrap(),
        ]);
        run_command(cli).unwrap();
    }

    #[test]
    fn test_train_missing_corpus_fails() {
        let cli = Cli::parse_from(["orientar", "--quiet", "train", "/nonexistent/corpus.csv"]);
        assert!(run_command(cli).is_err());
    }

    #[test]
    fn test_info_empty_dir_is_not_ready() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::parse_from([
            "orientar",
            "--quiet",
            "info",
            "--models",
            dir.path().to_str().unwrap(),
        ]);
        assert!(matches!(run_command(cli), Err(Error::NotReady(_))));
    }
}
