use prometheus::HistogramVec;
use std::time::{Duration, Instant};

/// Result labels for `revcast_prediction_latency_seconds`
pub const INFERENCE_OK: &str = "ok";
pub const INFERENCE_ERROR: &str = "error";
pub const INFERENCE_PANICKED: &str = "panicked";

pub const INFERENCE_RESULTS: [&str; 3] = [INFERENCE_OK, INFERENCE_ERROR, INFERENCE_PANICKED];

/// Stopwatch around a single model call. The caller closes it with the
/// call's result so slow failures can be told apart from slow successes.
#[must_use = "an unfinished timer records nothing"]
pub struct InferenceTimer {
    start: Instant,
    latency: HistogramVec,
}

impl InferenceTimer {
    pub fn start(latency: &HistogramVec) -> Self {
        Self {
            start: Instant::now(),
            latency: latency.clone(),
        }
    }

    /// Records the elapsed time under `result` and returns it.
    pub fn finish(self, result: &str) -> Duration {
        let elapsed = self.start.elapsed();
        self.latency
            .with_label_values(&[result])
            .observe(elapsed.as_secs_f64());
        elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus::HistogramOpts;

    fn latency() -> HistogramVec {
        HistogramVec::new(HistogramOpts::new("test_inference_latency", "test"), &["result"])
            .unwrap()
    }

    #[test]
    fn test_finish_records_under_result_label() {
        let latency = latency();

        let timer = InferenceTimer::start(&latency);
        std::thread::sleep(Duration::from_millis(5));
        let took = timer.finish(INFERENCE_ERROR);

        assert!(took >= Duration::from_millis(5));
        let errors = latency.with_label_values(&[INFERENCE_ERROR]);
        assert_eq!(errors.get_sample_count(), 1);
        assert!(errors.get_sample_sum() >= 0.005);
        assert_eq!(
            latency.with_label_values(&[INFERENCE_OK]).get_sample_count(),
            0
        );
    }
}
