//! Classification metrics
//!
//! Confusion matrix plus per-class and averaged precision/recall/F1,
//! matching the reference sklearn semantics for weighted averaging.

use std::fmt;

/// Averaging strategy for multi-class metrics
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Average {
    /// Unweighted mean over classes
    Macro,
    /// Mean weighted by class support
    Weighted,
}

/// Confusion matrix; element `[i][j]` counts samples with true class `i`
/// predicted as class `j`.
#[derive(Clone, Debug)]
pub struct ConfusionMatrix {
    matrix: Vec<Vec<usize>>,
    n_classes: usize,
}

impl ConfusionMatrix {
    /// Build from predictions with an explicit class count, so classes
    /// absent from a small hold-out still occupy their row and column.
    pub fn from_predictions(y_pred: &[usize], y_true: &[usize], n_classes: usize) -> Self {
        assert_eq!(
            y_pred.len(),
            y_true.len(),
            "predictions and targets must have same length"
        );

        let mut matrix = vec![vec![0; n_classes]; n_classes];
        for (&pred, &truth) in y_pred.iter().zip(y_true.iter()) {
            if pred < n_classes && truth < n_classes {
                matrix[truth][pred] += 1;
            }
        }

        Self { matrix, n_classes }
    }

    /// Rebuild from stored counts, e.g. a persisted metrics report
    pub fn from_rows(matrix: Vec<Vec<usize>>) -> Self {
        let n_classes = matrix.len();
        Self { matrix, n_classes }
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn get(&self, true_class: usize, predicted_class: usize) -> usize {
        self.matrix[true_class][predicted_class]
    }

    /// The raw counts, row = true class
    pub fn rows(&self) -> &[Vec<usize>] {
        &self.matrix
    }

    pub fn true_positives(&self, class: usize) -> usize {
        self.matrix[class][class]
    }

    pub fn false_positives(&self, class: usize) -> usize {
        (0..self.n_classes)
            .filter(|&i| i != class)
            .map(|i| self.matrix[i][class])
            .sum()
    }

    pub fn false_negatives(&self, class: usize) -> usize {
        (0..self.n_classes)
            .filter(|&j| j != class)
            .map(|j| self.matrix[class][j])
            .sum()
    }

    /// Count of true instances of a class
    pub fn support(&self, class: usize) -> usize {
        self.matrix[class].iter().sum()
    }

    pub fn total(&self) -> usize {
        self.matrix.iter().flatten().sum()
    }

    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let correct: usize = (0..self.n_classes).map(|i| self.matrix[i][i]).sum();
        correct as f64 / total as f64
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Confusion Matrix:")?;
        write!(f, "      ")?;
        for j in 0..self.n_classes {
            write!(f, "Pred {j} ")?;
        }
        writeln!(f)?;
        for i in 0..self.n_classes {
            write!(f, "True {i}")?;
            for j in 0..self.n_classes {
                write!(f, "{:>6} ", self.matrix[i][j])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Per-class precision/recall/F1 with averaging helpers
#[derive(Clone, Debug)]
pub struct ClassMetrics {
    pub precision: Vec<f64>,
    pub recall: Vec<f64>,
    pub f1: Vec<f64>,
    pub support: Vec<usize>,
}

impl ClassMetrics {
    pub fn from_confusion_matrix(cm: &ConfusionMatrix) -> Self {
        let n = cm.n_classes();
        let mut precision = Vec::with_capacity(n);
        let mut recall = Vec::with_capacity(n);
        let mut f1 = Vec::with_capacity(n);
        let mut support = Vec::with_capacity(n);

        for class in 0..n {
            let tp = cm.true_positives(class) as f64;
            let fp = cm.false_positives(class) as f64;
            let fn_ = cm.false_negatives(class) as f64;

            let p = if tp + fp > 0.0 { tp / (tp + fp) } else { 0.0 };
            let r = if tp + fn_ > 0.0 { tp / (tp + fn_) } else { 0.0 };
            let f = if p + r > 0.0 { 2.0 * p * r / (p + r) } else { 0.0 };

            precision.push(p);
            recall.push(r);
            f1.push(f);
            support.push(cm.support(class));
        }

        Self {
            precision,
            recall,
            f1,
            support,
        }
    }

    pub fn precision_avg(&self, average: Average) -> f64 {
        self.average(&self.precision, average)
    }

    pub fn recall_avg(&self, average: Average) -> f64 {
        self.average(&self.recall, average)
    }

    pub fn f1_avg(&self, average: Average) -> f64 {
        self.average(&self.f1, average)
    }

    fn average(&self, values: &[f64], average: Average) -> f64 {
        match average {
            Average::Macro => {
                if values.is_empty() {
                    0.0
                } else {
                    values.iter().sum::<f64>() / values.len() as f64
                }
            }
            Average::Weighted => {
                let total: usize = self.support.iter().sum();
                if total == 0 {
                    return 0.0;
                }
                values
                    .iter()
                    .zip(self.support.iter())
                    .map(|(&v, &s)| v * s as f64)
                    .sum::<f64>()
                    / total as f64
            }
        }
    }
}

/// Formatted per-class report with named classes, in the layout of an
/// sklearn classification report.
pub fn classification_report(cm: &ConfusionMatrix, class_names: &[String]) -> String {
    let metrics = ClassMetrics::from_confusion_matrix(cm);
    let width = class_names
        .iter()
        .map(String::len)
        .max()
        .unwrap_or(12)
        .max(12);

    let mut report = String::new();
    report.push_str(&format!(
        "{:>w$} {:>10} {:>10} {:>10} {:>10}\n",
        "",
        "precision",
        "recall",
        "f1-score",
        "support",
        w = width
    ));
    report.push_str(&"-".repeat(width + 44));
    report.push('\n');

    for class in 0..cm.n_classes() {
        let name = class_names.get(class).map_or("?", String::as_str);
        report.push_str(&format!(
            "{:>w$} {:>10.2} {:>10.2} {:>10.2} {:>10}\n",
            name,
            metrics.precision[class],
            metrics.recall[class],
            metrics.f1[class],
            metrics.support[class],
            w = width
        ));
    }

    report.push_str(&"-".repeat(width + 44));
    report.push('\n');
    report.push_str(&format!(
        "{:>w$} {:>10.2} {:>10.2} {:>10.2} {:>10}\n",
        "weighted avg",
        metrics.precision_avg(Average::Weighted),
        metrics.recall_avg(Average::Weighted),
        metrics.f1_avg(Average::Weighted),
        cm.total(),
        w = width
    ));
    report.push_str(&format!("\nAccuracy: {:.4}\n", cm.accuracy()));
    report
}
