use crate::core::features::builder::FeatureSet;
use crate::core::models::record::ParsedDocument;
use crate::core::models::result::{ClassificationResult, Provenance};
use crate::core::utils::identifiers::{is_accession_like, normalize_identifier};
use crate::engine::context::ClassifierContext;
use crate::engine::error::EngineError;
use crate::engine::registry::{MatchKind, RegistryQuery, match_registry};
use crate::engine::tier::{CascadeTrace, Tier, TierOutcome};
use std::path::Path;
use tracing::{debug, instrument, warn};

pub const DATABASE_NOTE: &str = "Classification based on known database entry";
pub const KEYWORD_NOTE: &str = "Classification based on PDB keywords analysis";
pub const MODEL_NOTE: &str = "Classification based on trained model";

/// The result of one cascade run together with the tiers it visited.
#[derive(Debug)]
pub struct CascadeReport {
    pub result: ClassificationResult,
    pub trace: CascadeTrace,
}

/// Classifies one document. Never fails: the keyword tier always resolves.
pub fn classify(context: &ClassifierContext, text: &str) -> ClassificationResult {
    classify_with_trace(context, text, None).result
}

/// Like [`classify`], with the name the document was uploaded under. When
/// the document itself carries no identifier, an accession-like file stem
/// (`1rub.pdb`) stands in for it.
pub fn classify_named(
    context: &ClassifierContext,
    text: &str,
    source_name: &str,
) -> ClassificationResult {
    classify_with_trace(context, text, Some(source_name)).result
}

#[instrument(skip_all, name = "classify_workflow", fields(source = source_name.unwrap_or("-")))]
pub fn classify_with_trace(
    context: &ClassifierContext,
    text: &str,
    source_name: Option<&str>,
) -> CascadeReport {
    let document = context.reader.parse(text);
    for anomaly in &document.anomalies {
        debug!("Recovered from malformed record at {}", anomaly);
    }
    classify_document(context, &document, source_name)
}

/// Runs the cascade over an already parsed document.
///
/// The model tier runs first and the registry tier second. A registry match
/// outranks a model result, which outranks the keyword tier; the keyword tier
/// only runs when neither of the others resolved.
pub fn classify_document(
    context: &ClassifierContext,
    document: &ParsedDocument,
    source_name: Option<&str>,
) -> CascadeReport {
    let identifier = document
        .header
        .identifier
        .clone()
        .or_else(|| source_name.and_then(identifier_from_source_name));
    let features = context.features.build(document);
    let mut trace = CascadeTrace::new();

    let model = model_tier(context, &features, identifier.as_deref());
    debug!("{} tier {}", Tier::Model, model);
    let registry = registry_tier(context, document, identifier.as_deref());
    debug!("{} tier {}", Tier::Registry, registry);

    let resolved = match (model, registry) {
        (model, TierOutcome::Resolved(result)) => {
            let model = match model {
                TierOutcome::Resolved(overruled) => TierOutcome::Overruled(overruled),
                other => other,
            };
            trace.record(Tier::Model, model);
            trace.record(Tier::Registry, TierOutcome::Resolved(result.clone()));
            Some(result)
        }
        (TierOutcome::Resolved(result), registry) => {
            trace.record(Tier::Model, TierOutcome::Resolved(result.clone()));
            trace.record(Tier::Registry, registry);
            Some(result)
        }
        (model, registry) => {
            trace.record(Tier::Model, model);
            trace.record(Tier::Registry, registry);
            None
        }
    };
    if let Some(result) = resolved {
        return CascadeReport { result, trace };
    }

    let result = keyword_tier(context, document, &features, identifier);
    debug!(
        "{} tier resolved as {} ({:.2})",
        Tier::Keyword,
        result.classification(),
        result.confidence()
    );
    trace.record(Tier::Keyword, TierOutcome::Resolved(result.clone()));
    CascadeReport { result, trace }
}

fn model_tier(
    context: &ClassifierContext,
    features: &FeatureSet,
    identifier: Option<&str>,
) -> TierOutcome {
    let Some(model) = &context.model else {
        return TierOutcome::Skipped;
    };

    match model.evaluate(&features.summarize()) {
        Ok(verdict) => TierOutcome::Resolved(
            ClassificationResult::new(verdict.category, verdict.confidence, Provenance::Model)
                .with_pdb_id(identifier.map(str::to_string))
                .with_note(format!(
                    "{} (decision value {:.3})",
                    MODEL_NOTE, verdict.decision
                )),
        ),
        Err(e) => {
            warn!("Model classification failed, falling through: {}", e);
            TierOutcome::Failed(EngineError::from(e))
        }
    }
}

fn registry_tier(
    context: &ClassifierContext,
    document: &ParsedDocument,
    identifier: Option<&str>,
) -> TierOutcome {
    let Some(registry) = &context.registry else {
        return TierOutcome::Skipped;
    };

    let snapshot = match registry.snapshot() {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!("Registry unavailable, falling through: {}", e);
            return TierOutcome::Failed(EngineError::from(e));
        }
    };

    let text = document.header.registry_text();
    let query = RegistryQuery {
        identifier,
        text: &text,
        mentions: &document.identifier_mentions,
    };

    match match_registry(&snapshot, &query) {
        Some(hit) => {
            debug!("Registry match on {} ({})", hit.identifier, hit.kind);
            // A mention names a different entry than the document's own code.
            let pdb_id = match (hit.kind, identifier) {
                (MatchKind::Mention, _) | (_, None) => hit.identifier,
                (_, Some(identifier)) => identifier.to_string(),
            };
            TierOutcome::Resolved(
                ClassificationResult::new(
                    hit.category,
                    context.registry_confidence,
                    Provenance::Database,
                )
                .with_pdb_id(Some(pdb_id))
                .with_note(DATABASE_NOTE),
            )
        }
        None => TierOutcome::Unresolved,
    }
}

fn keyword_tier(
    context: &ClassifierContext,
    document: &ParsedDocument,
    features: &FeatureSet,
    identifier: Option<String>,
) -> ClassificationResult {
    let verdict = context
        .keywords
        .evaluate(&document.header, &features.atom_type_counts);
    let detail = if verdict.matched_terms.is_empty() {
        "no vocabulary terms matched".to_string()
    } else {
        format!("matched: {}", verdict.matched_terms.join(", "))
    };

    ClassificationResult::new(verdict.category, verdict.confidence, Provenance::Keywords)
        .with_pdb_id(identifier)
        .with_note(format!("{} ({})", KEYWORD_NOTE, detail))
}

/// Accession code implied by a file name such as `uploads/1rub.pdb`.
pub fn identifier_from_source_name(source_name: &str) -> Option<String> {
    let file_name = Path::new(source_name).file_name()?.to_str()?;
    normalize_identifier(file_name).filter(|stem| is_accession_like(stem))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::features::vector::SUMMARY_FEATURE_LEN;
    use crate::core::models::result::Category;
    use crate::engine::model::{ModelTier, StandardScaler, SupportVectorClassifier};
    use crate::engine::registry::{
        CsvRegistry, RegistryError, RegistryProvider, RegistrySnapshot, StaticRegistry,
    };
    use std::borrow::Cow;

    const RUBISCO: &str = "\
HEADER    LYASE CARBON DIOXIDE FIXATION ENZYME COMPLEX FROM SPINACH 12-JAN-98   1RUB
TITLE     RIBULOSE-1,5-BISPHOSPHATE CARBOXYLASE
ATOM      1  N   MET A   1      27.340  24.430   2.614  1.00  9.67           N
ATOM      2  CA  MET A   1      26.266  25.413   2.842  1.00 10.38           C
ATOM      3  C   MET A   1      26.913  26.639   3.531  1.00  9.62           C
HELIX    1   1 SER A   12  ALA A   20  1
";

    const OXIDOREDUCTASE: &str = "\
TITLE     CATALYTIC DOMAIN OF A HEME OXIDOREDUCTASE
ATOM      1  N   GLY A   1      10.000  10.000  10.000  1.00  9.67           N
";

    fn registry() -> StaticRegistry {
        StaticRegistry::new(RegistrySnapshot::new(["1RUB", "3HMX"], ["4W59"]).unwrap())
    }

    fn model(intercept: f64) -> ModelTier {
        ModelTier::new(
            StandardScaler::identity(),
            SupportVectorClassifier::Linear {
                weights: vec![0.0; SUMMARY_FEATURE_LEN],
                intercept,
            },
        )
    }

    #[derive(Debug)]
    struct BrokenRegistry;

    impl RegistryProvider for BrokenRegistry {
        fn snapshot(&self) -> Result<Cow<'_, RegistrySnapshot>, RegistryError> {
            Err(RegistryError::InvalidIdentifier {
                value: String::new(),
            })
        }
    }

    #[test]
    fn registry_identifier_resolves_with_database_confidence() {
        let context = ClassifierContext::new().with_registry(registry());
        let result = classify(&context, RUBISCO);
        assert_eq!(result.classification(), Category::Murzyme);
        assert_eq!(result.confidence(), 95.0);
        assert_eq!(result.source(), Provenance::Database);
        assert_eq!(result.pdb_id(), Some("1RUB"));
        assert_eq!(result.note(), Some(DATABASE_NOTE));
    }

    #[test]
    fn two_vocabulary_terms_resolve_by_keywords() {
        let context = ClassifierContext::new().with_registry(registry());
        let result = classify(&context, OXIDOREDUCTASE);
        assert_eq!(result.source(), Provenance::Keywords);
        assert_eq!(result.classification(), Category::Murzyme);
        assert!((55.0..=95.0).contains(&result.confidence()));
        assert_eq!(result.confidence(), 70.0);
        assert_eq!(result.pdb_id(), None);
        assert_eq!(
            result.note(),
            Some("Classification based on PDB keywords analysis (matched: OXIDOREDUCTASE, CATALYTIC)")
        );
    }

    #[test]
    fn empty_document_falls_back_to_keyword_floor() {
        let context = ClassifierContext::new()
            .with_registry(registry())
            .with_model(model(1.0));
        let report = classify_with_trace(&ClassifierContext::new().with_registry(registry()), "", None);
        assert_eq!(report.result.classification(), Category::NonMurzyme);
        assert_eq!(report.result.confidence(), 60.0);
        assert_eq!(report.result.source(), Provenance::Keywords);
        assert_eq!(report.result.pdb_id(), None);
        assert!(matches!(report.trace.outcome(Tier::Model), Some(TierOutcome::Skipped)));
        assert!(matches!(
            report.trace.outcome(Tier::Registry),
            Some(TierOutcome::Unresolved)
        ));

        // With a model loaded, the all-zero feature vector still goes to the model.
        let result = classify(&context, "");
        assert_eq!(result.source(), Provenance::Model);
    }

    #[test]
    fn model_tier_runs_first_when_loaded() {
        let context = ClassifierContext::new().with_model(model(2.0));
        let result = classify(&context, OXIDOREDUCTASE);
        assert_eq!(result.source(), Provenance::Model);
        assert_eq!(result.classification(), Category::Murzyme);
        assert_eq!(result.confidence(), 88.08);
    }

    #[test]
    fn registry_outranks_a_disagreeing_model() {
        let model_only = classify(&ClassifierContext::new().with_model(model(-3.0)), RUBISCO);
        assert_eq!(model_only.source(), Provenance::Model);
        assert_eq!(model_only.classification(), Category::NonMurzyme);

        let context = ClassifierContext::new()
            .with_model(model(-3.0))
            .with_registry(registry());
        let report = classify_with_trace(&context, RUBISCO, None);
        assert_eq!(report.result.source(), Provenance::Database);
        assert_eq!(report.result.classification(), Category::Murzyme);
        assert_eq!(report.result.confidence(), 95.0);
        assert!(matches!(
            report.trace.outcome(Tier::Model),
            Some(TierOutcome::Overruled(_))
        ));
        assert_eq!(report.trace.resolved_by(), Some(Tier::Registry));
        assert!(report.trace.outcome(Tier::Keyword).is_none());
    }

    #[test]
    fn model_failure_falls_through_to_registry() {
        let broken_model = ModelTier::new(
            StandardScaler::identity(),
            SupportVectorClassifier::Linear {
                weights: vec![0.0; 3],
                intercept: 0.0,
            },
        );
        let context = ClassifierContext::new()
            .with_model(broken_model)
            .with_registry(registry());
        let report = classify_with_trace(&context, RUBISCO, None);
        assert_eq!(report.result.source(), Provenance::Database);
        assert!(matches!(
            report.trace.outcome(Tier::Model),
            Some(TierOutcome::Failed(EngineError::Model { .. }))
        ));
    }

    #[test]
    fn unresolved_registry_keeps_the_model_result() {
        let context = ClassifierContext::new()
            .with_model(model(-3.0))
            .with_registry(registry());
        let report = classify_with_trace(&context, OXIDOREDUCTASE, None);
        assert_eq!(report.result.source(), Provenance::Model);
        assert_eq!(report.trace.resolved_by(), Some(Tier::Model));
        assert!(matches!(
            report.trace.outcome(Tier::Registry),
            Some(TierOutcome::Unresolved)
        ));
    }

    #[test]
    fn registry_failure_falls_through_to_keywords() {
        let context = ClassifierContext::new().with_registry(BrokenRegistry);
        let report = classify_with_trace(&context, RUBISCO, None);
        assert_eq!(report.result.source(), Provenance::Keywords);
        assert!(matches!(
            report.trace.outcome(Tier::Registry),
            Some(TierOutcome::Failed(EngineError::Registry { .. }))
        ));
        assert_eq!(report.trace.failures().count(), 1);
    }

    #[test]
    fn registry_matches_header_text_and_mentions() {
        let snapshot = RegistrySnapshot::new(["RUBISCO"], ["1A8H"]).unwrap();
        let context = ClassifierContext::new().with_registry(StaticRegistry::new(snapshot));

        let text_hit = classify(&context, "TITLE     ACTIVATED RUBISCO\n");
        assert_eq!(text_hit.source(), Provenance::Database);
        assert_eq!(text_hit.pdb_id(), Some("RUBISCO"));

        let mention_hit = classify(&context, "REMARK 900 RELATED PDB ENTRY 1a8h\n");
        assert_eq!(mention_hit.classification(), Category::NonMurzyme);
        assert_eq!(mention_hit.pdb_id(), Some("1A8H"));
    }

    #[test]
    fn mention_hit_reports_the_mentioned_identifier() {
        let snapshot = RegistrySnapshot::new(Vec::<&str>::new(), ["1A8H"]).unwrap();
        let context = ClassifierContext::new().with_registry(StaticRegistry::new(snapshot));
        let text = "\
HEADER    OXIDOREDUCTASE HEME ENZYME FROM BOVINE HEART MUSCLE 12-JAN-98   9ZZZ
REMARK 900 RELATED PDB ENTRY 1A8H
";
        let document = context.reader.parse(text);
        assert_eq!(document.header.identifier.as_deref(), Some("9ZZZ"));

        let result = classify(&context, text);
        assert_eq!(result.source(), Provenance::Database);
        assert_eq!(result.classification(), Category::NonMurzyme);
        assert_eq!(result.pdb_id(), Some("1A8H"));
    }

    #[test]
    fn seed_registry_resolves_reference_entries() {
        let context = ClassifierContext::new().with_registry(StaticRegistry::seed().unwrap());

        let by_name = classify_named(&context, OXIDOREDUCTASE, "3HMX.pdb");
        assert_eq!(by_name.source(), Provenance::Database);
        assert_eq!(by_name.classification(), Category::Murzyme);
        assert_eq!(by_name.pdb_id(), Some("3HMX"));

        let by_title = classify(
            &context,
            "TITLE     CRYSTAL STRUCTURE OF USTEKINUMAB FAB/IL-12 COMPLEX\n",
        );
        assert_eq!(by_title.source(), Provenance::Database);
        assert_eq!(by_title.classification(), Category::Murzyme);
        assert_eq!(by_title.pdb_id(), Some("USTEKINUMAB"));
    }

    #[test]
    fn file_name_stands_in_for_missing_identifier() {
        let context = ClassifierContext::new().with_registry(registry());
        let result = classify_named(&context, OXIDOREDUCTASE, "uploads/3hmx.pdb");
        assert_eq!(result.source(), Provenance::Database);
        assert_eq!(result.pdb_id(), Some("3HMX"));

        let unnamed = classify_named(&context, OXIDOREDUCTASE, "my_protein.pdb");
        assert_eq!(unnamed.source(), Provenance::Keywords);
    }

    #[test]
    fn document_identifier_wins_over_file_name() {
        let context = ClassifierContext::new().with_registry(registry());
        let result = classify_named(&context, RUBISCO, "4w59.pdb");
        assert_eq!(result.pdb_id(), Some("1RUB"));
        assert_eq!(result.classification(), Category::Murzyme);
    }

    #[test]
    fn short_header_yields_no_identifier() {
        let context = ClassifierContext::new().with_registry(registry());
        let result = classify(&context, "HEADER    LYASE 12-JAN-98 1RUB\n");
        // "1RUB" still reaches the registry as header text.
        assert_eq!(result.source(), Provenance::Database);
        assert_eq!(result.pdb_id(), Some("1RUB"));

        let document = context.reader.parse("HEADER    LYASE 12-JAN-98 1RUB\n");
        assert_eq!(document.header.identifier, None);
    }

    #[test]
    fn classification_is_deterministic() {
        let context = ClassifierContext::new()
            .with_registry(registry())
            .with_model(model(0.7));
        for text in [RUBISCO, OXIDOREDUCTASE, "", "garbage\u{0}\n\n"] {
            assert_eq!(classify(&context, text), classify(&context, text));
        }
    }

    #[test]
    fn csv_registry_changes_are_seen_by_the_next_call() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry.csv");
        std::fs::write(&path, "pdb_id,category\n4W59,non-murzyme\n").unwrap();
        let context = ClassifierContext::new().with_registry(CsvRegistry::new(&path));

        assert_eq!(classify(&context, RUBISCO).source(), Provenance::Keywords);

        std::fs::write(&path, "pdb_id,category\n1RUB,murzyme\n").unwrap();
        assert_eq!(classify(&context, RUBISCO).source(), Provenance::Database);
    }

    #[test]
    fn source_name_identifier_requires_accession_shape() {
        assert_eq!(identifier_from_source_name("1rub.pdb"), Some("1RUB".into()));
        assert_eq!(identifier_from_source_name("/tmp/x/4W59.ent.gz"), Some("4W59".into()));
        assert_eq!(identifier_from_source_name("rubisco.pdb"), None);
        assert_eq!(identifier_from_source_name(""), None);
    }
}
