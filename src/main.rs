//! BSO DDoS Core - Demo Entry Point
//!
//! Trains the hybrid model on generated labelled windows, evaluates it on a
//! held-out set, classifies one live window and prints a JSON report.

use bso_ddos_core::constants::{self, APP_NAME, APP_VERSION};
use bso_ddos_core::logic::features::FeatureSealer;
use bso_ddos_core::logic::model::EvaluationReport;
use bso_ddos_core::logic::validation;
use bso_ddos_core::{
    ClassificationResult, DetectionEngine, DetectorConfig, EngineStatus, ModelError, ModelInfo,
    SyntheticTrafficGenerator, TrafficClass,
};
use serde::Serialize;

#[derive(Serialize)]
struct DemoReport {
    app: &'static str,
    version: &'static str,
    config: DetectorConfig,
    model: ModelInfo,
    evaluation: EvaluationReport,
    metric_warnings: Vec<String>,
    live: ClassificationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    sealed_features: Option<String>,
    status: EngineStatus,
}

fn run(config: DetectorConfig) -> Result<DemoReport, ModelError> {
    let engine = DetectionEngine::from_config(&config)?;
    let mut generator = SyntheticTrafficGenerator::new(config.seed);
    let now_ms = chrono::Utc::now().timestamp_millis();

    log::info!(
        "Generating {} training and {} test windows ({}s each)",
        config.training_windows,
        config.test_windows,
        config.window_secs
    );
    let train = generator.generate_training_set(config.training_windows, now_ms, engine.extractor());
    let test = generator.generate_training_set(config.test_windows, now_ms, engine.extractor());

    engine.train(&train)?;
    let weights = config.bso_weights()?;
    engine.set_bso_weights(&weights.as_array())?;

    let evaluation = engine.evaluate(&test)?;
    let checks = validation::validate_metrics(&evaluation.metrics);
    for warning in &checks.warnings {
        log::warn!("Metrics: {}", warning);
    }

    engine.ingest_batch(generator.generate_window(TrafficClass::Ddos, now_ms, config.window_secs));
    let live = engine.analyze(now_ms)?;

    let sealed_features = match constants::get_seal_key() {
        Some(key) => match FeatureSealer::new(&key).seal(&live.features) {
            Ok(sealed) => Some(sealed),
            Err(e) => {
                log::warn!("Could not seal live features: {}", e);
                None
            }
        },
        None => None,
    };

    Ok(DemoReport {
        app: APP_NAME,
        version: APP_VERSION,
        config,
        model: engine.model_info(),
        evaluation,
        metric_warnings: checks.warnings,
        live,
        sealed_features,
        status: engine.status(),
    })
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting {} v{}...", APP_NAME, APP_VERSION);

    let config = DetectorConfig::from_env();
    let report = match run(config) {
        Ok(report) => report,
        Err(e) => {
            log::error!("Detection run failed: {}", e);
            std::process::exit(1);
        }
    };

    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Failed to serialize report: {}", e);
            std::process::exit(1);
        }
    }
}
