use super::classify::{CascadeReport, classify_with_trace};
use crate::engine::context::ClassifierContext;
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A document to classify together with the name it is reported under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedDocument {
    pub name: String,
    pub text: String,
}

impl NamedDocument {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// Classifies every document. Reports come back in input order.
#[instrument(skip_all, name = "batch_workflow", fields(documents = documents.len()))]
pub fn classify_batch(
    context: &ClassifierContext,
    documents: &[NamedDocument],
    reporter: &ProgressReporter,
) -> Vec<CascadeReport> {
    reporter.report(Progress::BatchStart {
        total_documents: documents.len() as u64,
    });

    let classify_one = |document: &NamedDocument| {
        let report = classify_with_trace(context, &document.text, Some(&document.name));
        reporter.report(Progress::DocumentClassified);
        report
    };

    #[cfg(not(feature = "parallel"))]
    let reports: Vec<CascadeReport> = documents.iter().map(classify_one).collect();

    #[cfg(feature = "parallel")]
    let reports: Vec<CascadeReport> = documents.par_iter().map(classify_one).collect();

    reporter.report(Progress::BatchFinish);
    info!("Classified {} document(s).", reports.len());
    reports
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::result::{Category, Provenance};
    use crate::engine::registry::{RegistrySnapshot, StaticRegistry};
    use std::sync::Mutex;

    #[test]
    fn batch_preserves_order_and_reports_progress() {
        let snapshot = RegistrySnapshot::new(["1RUB"], Vec::<&str>::new()).unwrap();
        let context = ClassifierContext::new().with_registry(StaticRegistry::new(snapshot));
        let documents = vec![
            NamedDocument::new("1rub.pdb", ""),
            NamedDocument::new("empty.pdb", ""),
            NamedDocument::new("title.pdb", "TITLE     LIGASE AND HYDROLASE ACTIVITY\n"),
        ];

        let events = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            events.lock().unwrap().push(event);
        }));
        let reports = classify_batch(&context, &documents, &reporter);
        drop(reporter);

        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0].result.source(), Provenance::Database);
        assert_eq!(reports[1].result.source(), Provenance::Keywords);
        assert_eq!(reports[1].result.classification(), Category::NonMurzyme);
        assert_eq!(reports[2].result.classification(), Category::Murzyme);

        let events = events.into_inner().unwrap();
        assert_eq!(events.first(), Some(&Progress::BatchStart { total_documents: 3 }));
        assert_eq!(events.last(), Some(&Progress::BatchFinish));
        assert_eq!(
            events
                .iter()
                .filter(|event| **event == Progress::DocumentClassified)
                .count(),
            3
        );
    }

    #[test]
    fn empty_batch_still_starts_and_finishes() {
        let reports = classify_batch(&ClassifierContext::new(), &[], &ProgressReporter::new());
        assert!(reports.is_empty());
    }
}
