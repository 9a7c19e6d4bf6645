//! Suggests a spending category from a free-text expense description.
//!
//! The pipeline is TF-IDF term weighting followed by multinomial logistic
//! regression. It is trained once on a small labeled set, persisted through
//! [`ModelStore`], and loaded again for each prediction.

pub mod logistic;
pub mod pipeline;
pub mod store;
pub mod vectorizer;

use crate::ledger::KnownCategory;

pub use logistic::{LogisticRegression, TrainingOptions};
pub use pipeline::{ClassifierPipeline, TrainingExample};
pub use store::{ModelArtifact, ModelStore, MODEL_SCHEMA_VERSION};
pub use vectorizer::TfidfVectorizer;

/// The fixed labeled corpus the shipped model is trained on.
pub fn default_examples() -> Vec<TrainingExample> {
    [
        ("Bought pizza for dinner", KnownCategory::Food),
        ("Uber ride to office", KnownCategory::Transport),
        ("Paid electricity bill", KnownCategory::Bills),
        ("Netflix subscription", KnownCategory::Entertainment),
        ("Grocery shopping at Walmart", KnownCategory::Shopping),
        ("Dinner at restaurant", KnownCategory::Food),
        ("Flight ticket to NYC", KnownCategory::Travel),
        ("Gym membership renewal", KnownCategory::Health),
    ]
    .into_iter()
    .map(|(description, category)| TrainingExample::new(description, category))
    .collect()
}
