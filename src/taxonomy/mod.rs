pub mod analyzer;
pub mod model;
pub mod seed;
pub mod store;

pub use self::analyzer::{AnalysisInput, AnalysisResult, TaggedConcept, TextAnalyzer};
pub use self::model::{
    validate_slug, Concept, ConceptDraft, ConceptScheme, ConceptSchemeDraft, ImportedConcept,
    PlainLiterals, Project, Relationship, SchemeImport,
};
pub use self::seed::{load_taxonomy, ImportSummary, SeedReader, SeedRecord};
pub use self::store::Taxonomy;
