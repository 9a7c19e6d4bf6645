use serde::{Deserialize, Serialize};

use super::vectorizer::SparseVector;

/// Settings for [`LogisticRegression::fit`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingOptions {
    /// Inverse regularisation strength; smaller values shrink weights harder.
    pub c: f64,
    pub learning_rate: f64,
    pub max_iterations: usize,
    /// Training stops once no gradient component exceeds this.
    pub tolerance: f64,
}

impl Default for TrainingOptions {
    fn default() -> Self {
        Self {
            c: 1.0,
            learning_rate: 1.0,
            max_iterations: 2000,
            tolerance: 1e-6,
        }
    }
}

/// Multinomial logistic regression over sparse feature rows.
///
/// Weights start at zero and are fitted with full-batch gradient descent on the
/// L2-penalised cross-entropy, so the same data always yields the same model.
/// The intercepts are not penalised.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogisticRegression {
    weights: Vec<Vec<f64>>,
    intercepts: Vec<f64>,
}

impl LogisticRegression {
    /// Fits `n_classes` weight vectors; `labels[i]` is the class index of `rows[i]`.
    pub fn fit(
        rows: &[SparseVector],
        labels: &[usize],
        n_features: usize,
        n_classes: usize,
        options: TrainingOptions,
    ) -> Self {
        let mut model = Self {
            weights: vec![vec![0.0; n_features]; n_classes],
            intercepts: vec![0.0; n_classes],
        };
        if rows.is_empty() || n_classes == 0 {
            return model;
        }

        let n = rows.len() as f64;
        let penalty = 1.0 / (options.c * n);

        for iteration in 0..options.max_iterations {
            let mut grad_w = vec![vec![0.0; n_features]; n_classes];
            let mut grad_b = vec![0.0; n_classes];

            for (row, &label) in rows.iter().zip(labels) {
                let probabilities = softmax(&model.logits(row));
                for (class, p) in probabilities.iter().enumerate() {
                    let residual = p - if class == label { 1.0 } else { 0.0 };
                    grad_b[class] += residual / n;
                    for &(feature, value) in row {
                        grad_w[class][feature] += residual * value / n;
                    }
                }
            }

            let mut largest: f64 = 0.0;
            for class in 0..n_classes {
                for feature in 0..n_features {
                    let g = grad_w[class][feature] + penalty * model.weights[class][feature];
                    largest = largest.max(g.abs());
                    model.weights[class][feature] -= options.learning_rate * g;
                }
                largest = largest.max(grad_b[class].abs());
                model.intercepts[class] -= options.learning_rate * grad_b[class];
            }

            if largest < options.tolerance {
                tracing::debug!(iteration, "logistic regression converged");
                break;
            }
        }
        model
    }

    pub fn n_classes(&self) -> usize {
        self.intercepts.len()
    }

    /// Raw linear score per class.
    pub fn logits(&self, row: &SparseVector) -> Vec<f64> {
        self.weights
            .iter()
            .zip(&self.intercepts)
            .map(|(weights, intercept)| {
                intercept
                    + row
                        .iter()
                        .filter_map(|&(feature, value)| weights.get(feature).map(|w| w * value))
                        .sum::<f64>()
            })
            .collect()
    }

    pub fn probabilities(&self, row: &SparseVector) -> Vec<f64> {
        softmax(&self.logits(row))
    }

    /// Index of the highest-scoring class; the lowest index wins exact ties.
    pub fn predict(&self, row: &SparseVector) -> Option<usize> {
        let logits = self.logits(row);
        let mut best: Option<(usize, f64)> = None;
        for (class, score) in logits.into_iter().enumerate() {
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((class, score)),
            }
        }
        best.map(|(class, _)| class)
    }
}

fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|l| (l - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_rows() -> (Vec<SparseVector>, Vec<usize>) {
        // feature 0 marks class 0, feature 1 marks class 1, feature 2 is shared
        let rows = vec![
            vec![(0, 0.8), (2, 0.6)],
            vec![(0, 1.0)],
            vec![(1, 0.8), (2, 0.6)],
            vec![(1, 1.0)],
        ];
        (rows, vec![0, 0, 1, 1])
    }

    #[test]
    fn separates_linearly_separable_classes() {
        let (rows, labels) = toy_rows();
        let model = LogisticRegression::fit(&rows, &labels, 3, 2, TrainingOptions::default());
        assert_eq!(model.predict(&vec![(0, 1.0)]), Some(0));
        assert_eq!(model.predict(&vec![(1, 1.0)]), Some(1));
    }

    #[test]
    fn probabilities_sum_to_one() {
        let (rows, labels) = toy_rows();
        let model = LogisticRegression::fit(&rows, &labels, 3, 2, TrainingOptions::default());
        let probabilities = model.probabilities(&vec![(2, 1.0)]);
        assert!((probabilities.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn fitting_is_deterministic() {
        let (rows, labels) = toy_rows();
        let first = LogisticRegression::fit(&rows, &labels, 3, 2, TrainingOptions::default());
        let second = LogisticRegression::fit(&rows, &labels, 3, 2, TrainingOptions::default());
        assert_eq!(first, second);
    }

    #[test]
    fn ties_go_to_the_first_class() {
        let model = LogisticRegression {
            weights: vec![vec![0.0], vec![0.0]],
            intercepts: vec![0.0, 0.0],
        };
        assert_eq!(model.predict(&Vec::new()), Some(0));
    }
}
