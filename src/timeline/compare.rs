use crate::models::{ExecutionRecord, ExecutionStatus};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// The original failed and the re-run succeeded.
    Recovered,
    /// The original succeeded and the re-run failed.
    Regressed,
    Consistent,
    Diverged,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub original: ExecutionRecord,
    pub derived: ExecutionRecord,
    pub status_changed: bool,
    pub duration_delta_ms: i64,
    pub speedup_percent: Option<u32>,
    pub output_matches: bool,
    pub verdict: Verdict,
}

impl Comparison {
    pub fn between(original: ExecutionRecord, derived: ExecutionRecord) -> Self {
        let duration_delta_ms = derived.duration as i64 - original.duration as i64;
        let speedup_percent = (original.duration > 0 && derived.duration < original.duration)
            .then(|| {
                let ratio = derived.duration as f64 / original.duration as f64;
                ((1.0 - ratio) * 100.0).round() as u32
            });
        let output_matches = original.output == derived.output;

        let verdict = match (original.status, derived.status) {
            (ExecutionStatus::Failed, ExecutionStatus::Success) => Verdict::Recovered,
            (ExecutionStatus::Success, ExecutionStatus::Failed) => Verdict::Regressed,
            (a, b) if a == b && output_matches => Verdict::Consistent,
            _ => Verdict::Diverged,
        };

        Self {
            status_changed: original.status != derived.status,
            duration_delta_ms,
            speedup_percent,
            output_matches,
            verdict,
            original,
            derived,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExecutionStatus::{Failed, Success};
    use crate::models::ExecutionType::{Replay, Shadow};
    use crate::timeline::fixtures::{normal, record};
    use serde_json::json;

    #[test]
    fn failed_then_successful_replay_is_recovered() {
        let mut original = normal(1003, "sendNotification", Failed, 12 * 60);
        original.duration = 523;
        let mut replay = record(1013, "sendNotification", Success, Replay, Some(1003), 600);
        replay.duration = 98;

        let comparison = Comparison::between(original, replay);
        assert_eq!(comparison.verdict, Verdict::Recovered);
        assert!(comparison.status_changed);
        assert_eq!(comparison.duration_delta_ms, -425);
        assert_eq!(comparison.speedup_percent, Some(81));
    }

    #[test]
    fn shadow_with_same_output_is_consistent() {
        let output = json!({"success": true}).as_object().cloned().unwrap();
        let mut original = normal(1006, "processPayment", Success, 22 * 60);
        original.duration = 195;
        original.output = output.clone();
        let mut shadow = record(1016, "processPayment", Success, Shadow, Some(1006), 21 * 60);
        shadow.duration = 203;
        shadow.output = output;

        let comparison = Comparison::between(original, shadow);
        assert_eq!(comparison.verdict, Verdict::Consistent);
        assert_eq!(comparison.speedup_percent, None);
        assert_eq!(comparison.duration_delta_ms, 8);
    }

    #[test]
    fn same_status_with_different_output_diverges() {
        let original = normal(1, "processPayment", Success, 60);
        let mut shadow = record(2, "processPayment", Success, Shadow, Some(1), 30);
        shadow.output = json!({"transactionId": "txn_xyz790"}).as_object().cloned().unwrap();

        let comparison = Comparison::between(original, shadow);
        assert!(!comparison.output_matches);
        assert_eq!(comparison.verdict, Verdict::Diverged);
    }
}
