use opentelemetry::{
    global,
    metrics::{Counter, Histogram, MeterProvider},
    KeyValue,
};
use opentelemetry_sdk::metrics::SdkMeterProvider;
use prometheus::Registry;

const DURATION_BOUNDARIES_MS: [f64; 12] = [
    5.0, 10.0, 20.0, 30.0, 50.0, 75.0, 100.0, 150.0, 250.0, 500.0, 1000.0, 2500.0,
];

pub struct Metrics {
    prediction_counter: Counter<u64>,
    prediction_duration: Histogram<u64>,
    _provider: SdkMeterProvider,
    pub registry: Registry,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();
        let exporter = opentelemetry_prometheus::exporter()
            .with_registry(registry.clone())
            .build()?;

        let provider = SdkMeterProvider::builder().with_reader(exporter).build();

        let meter = provider.meter("diagnosis_service");
        global::set_meter_provider(provider.clone());

        let prediction_counter = meter
            .u64_counter("predictions")
            .with_description("Number of classification requests by task and outcome")
            .build();

        let prediction_duration = meter
            .u64_histogram("prediction_duration_ms")
            .with_boundaries(DURATION_BOUNDARIES_MS.to_vec())
            .with_description("Time spent storing, preprocessing and classifying an upload")
            .build();

        Ok(Metrics {
            prediction_counter,
            prediction_duration,
            _provider: provider,
            registry,
        })
    }

    pub fn record_prediction(&self, task: &str, outcome: &str, duration_ms: u64) {
        let attributes = [
            KeyValue::new("task", task.to_string()),
            KeyValue::new("outcome", outcome.to_string()),
        ];
        self.prediction_counter.add(1, &attributes);
        self.prediction_duration.record(duration_ms, &attributes[..1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorded_predictions_are_exported() {
        let metrics = Metrics::new().unwrap();
        metrics.record_prediction("skin", "success", 12);
        metrics.record_prediction("tumor", "error", 40);

        let names: Vec<String> = metrics
            .registry
            .gather()
            .iter()
            .map(|family| family.get_name().to_string())
            .collect();

        assert!(names.iter().any(|name| name.starts_with("predictions")));
        assert!(names
            .iter()
            .any(|name| name.starts_with("prediction_duration_ms")));
    }
}
