// Evaluation report for a binary classifier on held-out data.
//
// Per-class precision, recall, F1 and support for the non-toxic (0) and
// toxic (1) classes, plus accuracy and macro / support-weighted averages.
// A metric whose denominator is zero is reported as 0.0.

use std::fmt;

use serde::Serialize;

/// Metrics for one class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationReport {
    pub non_toxic: ClassMetrics,
    pub toxic: ClassMetrics,
    pub accuracy: f64,
    pub macro_avg: ClassMetrics,
    pub weighted_avg: ClassMetrics,
}

impl ClassificationReport {
    /// Compare predictions against ground truth. Both slices must be the
    /// same length.
    pub fn compute(actual: &[bool], predicted: &[bool]) -> Self {
        debug_assert_eq!(actual.len(), predicted.len());

        let mut tp = 0usize;
        let mut tn = 0usize;
        let mut fp = 0usize;
        let mut fn_ = 0usize;
        for (&a, &p) in actual.iter().zip(predicted) {
            match (a, p) {
                (true, true) => tp += 1,
                (false, false) => tn += 1,
                (false, true) => fp += 1,
                (true, false) => fn_ += 1,
            }
        }

        let toxic = class_metrics(tp, fp, fn_);
        let non_toxic = class_metrics(tn, fn_, fp);
        let total = actual.len();

        let macro_avg = ClassMetrics {
            precision: (toxic.precision + non_toxic.precision) / 2.0,
            recall: (toxic.recall + non_toxic.recall) / 2.0,
            f1: (toxic.f1 + non_toxic.f1) / 2.0,
            support: total,
        };
        let weighted = |f: fn(&ClassMetrics) -> f64| {
            ratio(
                f(&toxic) * toxic.support as f64 + f(&non_toxic) * non_toxic.support as f64,
                total as f64,
            )
        };
        let weighted_avg = ClassMetrics {
            precision: weighted(|m| m.precision),
            recall: weighted(|m| m.recall),
            f1: weighted(|m| m.f1),
            support: total,
        };

        Self {
            non_toxic,
            toxic,
            accuracy: ratio((tp + tn) as f64, total as f64),
            macro_avg,
            weighted_avg,
        }
    }
}

/// Metrics for the class whose true positives are `hits`.
fn class_metrics(hits: usize, false_alarms: usize, misses: usize) -> ClassMetrics {
    let precision = ratio(hits as f64, (hits + false_alarms) as f64);
    let recall = ratio(hits as f64, (hits + misses) as f64);
    ClassMetrics {
        precision,
        recall,
        f1: ratio(2.0 * precision * recall, precision + recall),
        support: hits + misses,
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>14} {:>10} {:>10} {:>10} {:>10}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;
        for (label, m) in [("0", &self.non_toxic), ("1", &self.toxic)] {
            writeln!(
                f,
                "{:>14} {:>10.2} {:>10.2} {:>10.2} {:>10}",
                label, m.precision, m.recall, m.f1, m.support
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>14} {:>10} {:>10} {:>10.2} {:>10}",
            "accuracy", "", "", self.accuracy, self.macro_avg.support
        )?;
        for (label, m) in [("macro avg", &self.macro_avg), ("weighted avg", &self.weighted_avg)] {
            writeln!(
                f,
                "{:>14} {:>10.2} {:>10.2} {:>10.2} {:>10}",
                label, m.precision, m.recall, m.f1, m.support
            )?;
        }
        Ok(())
    }
}
