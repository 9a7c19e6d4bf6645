use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::errors::ClassifierError;
use crate::ledger::KnownCategory;

use super::logistic::{LogisticRegression, TrainingOptions};
use super::vectorizer::TfidfVectorizer;

/// A labeled description used to fit the classifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrainingExample {
    pub description: String,
    pub category: KnownCategory,
}

impl TrainingExample {
    pub fn new(description: impl Into<String>, category: KnownCategory) -> Self {
        Self {
            description: description.into(),
            category,
        }
    }
}

/// Fitted vectorizer and classifier, applied together to raw descriptions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassifierPipeline {
    vectorizer: TfidfVectorizer,
    model: LogisticRegression,
    classes: Vec<KnownCategory>,
}

impl ClassifierPipeline {
    pub fn train(examples: &[TrainingExample]) -> Result<Self, ClassifierError> {
        Self::train_with(examples, TrainingOptions::default())
    }

    /// Fits the pipeline on the categories present in `examples`.
    pub fn train_with(
        examples: &[TrainingExample],
        options: TrainingOptions,
    ) -> Result<Self, ClassifierError> {
        if examples.is_empty() {
            return Err(ClassifierError::EmptyTrainingSet);
        }
        let classes: Vec<KnownCategory> = examples
            .iter()
            .map(|example| example.category)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if classes.len() < 2 {
            return Err(ClassifierError::InsufficientClasses(classes.len()));
        }

        let descriptions: Vec<&str> = examples.iter().map(|e| e.description.as_str()).collect();
        let vectorizer = TfidfVectorizer::fit(&descriptions);
        let rows: Vec<_> = descriptions
            .iter()
            .map(|description| vectorizer.transform(description))
            .collect();
        let labels: Vec<usize> = examples
            .iter()
            .filter_map(|example| classes.iter().position(|c| *c == example.category))
            .collect();

        let model = LogisticRegression::fit(
            &rows,
            &labels,
            vectorizer.vocabulary_len(),
            classes.len(),
            options,
        );
        tracing::debug!(
            examples = examples.len(),
            vocabulary = vectorizer.vocabulary_len(),
            classes = classes.len(),
            "classifier fitted"
        );
        Ok(Self {
            vectorizer,
            model,
            classes,
        })
    }

    pub fn classes(&self) -> &[KnownCategory] {
        &self.classes
    }

    /// The single most likely category for `description`.
    pub fn predict(&self, description: &str) -> Result<KnownCategory, ClassifierError> {
        let row = self.vectorizer.transform(description);
        self.model
            .predict(&row)
            .and_then(|index| self.classes.get(index).copied())
            .ok_or_else(|| ClassifierError::ModelUnavailable("model has no categories".into()))
    }

    /// Every category with its probability, most likely first.
    pub fn rank(&self, description: &str) -> Vec<(KnownCategory, f64)> {
        let row = self.vectorizer.transform(description);
        let mut ranked: Vec<_> = self
            .classes
            .iter()
            .copied()
            .zip(self.model.probabilities(&row))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::default_examples;

    #[test]
    fn rejects_empty_and_single_class_sets() {
        assert!(matches!(
            ClassifierPipeline::train(&[]),
            Err(ClassifierError::EmptyTrainingSet)
        ));
        let single = [
            TrainingExample::new("pizza", KnownCategory::Food),
            TrainingExample::new("burger", KnownCategory::Food),
        ];
        assert!(matches!(
            ClassifierPipeline::train(&single),
            Err(ClassifierError::InsufficientClasses(1))
        ));
    }

    #[test]
    fn classes_are_the_labels_seen_in_training() {
        let pipeline = ClassifierPipeline::train(&default_examples()).unwrap();
        assert!(pipeline.classes().contains(&KnownCategory::Food));
        assert!(!pipeline.classes().contains(&KnownCategory::Others));
    }

    #[test]
    fn predicts_training_descriptions() {
        let pipeline = ClassifierPipeline::train(&default_examples()).unwrap();
        assert_eq!(
            pipeline.predict("Bought pizza for dinner").unwrap(),
            KnownCategory::Food
        );
        assert_eq!(
            pipeline.predict("Uber ride to office").unwrap(),
            KnownCategory::Transport
        );
        assert_eq!(
            pipeline.predict("Paid electricity bill").unwrap(),
            KnownCategory::Bills
        );
    }

    #[test]
    fn rank_is_sorted_and_led_by_prediction() {
        let pipeline = ClassifierPipeline::train(&default_examples()).unwrap();
        let ranked = pipeline.rank("Flight ticket to NYC");
        assert_eq!(ranked.len(), pipeline.classes().len());
        assert_eq!(ranked[0].0, KnownCategory::Travel);
        assert!(ranked.windows(2).all(|pair| pair[0].1 >= pair[1].1));
    }
}
