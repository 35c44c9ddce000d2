use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::taxonomy::model::Concept;
use crate::taxonomy::Taxonomy;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisInput {
    pub text: String,
    #[serde(default)]
    pub project_id: Option<String>,
}

impl AnalysisInput {
    pub fn new(text: &str) -> Self {
        AnalysisInput {
            text: text.to_string(),
            project_id: None,
        }
    }

    pub fn in_project(mut self, project: &str) -> Self {
        self.project_id = Some(project.to_string());
        self
    }
}

/// A concept found in a document and the byte spans it was found at.
#[derive(Debug, Clone, Serialize)]
pub struct TaggedConcept {
    #[serde(flatten)]
    pub concept: Concept,
    /// `"begin:end"` byte offsets into the analysed text.
    pub extents: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalysisResult {
    pub members: Vec<TaggedConcept>,
}

pub struct TextAnalyzer<'a> {
    taxonomy: &'a Taxonomy,
}

impl<'a> TextAnalyzer<'a> {
    pub fn new(taxonomy: &'a Taxonomy) -> Self {
        TextAnalyzer { taxonomy }
    }

    /// Tags the document with every concept whose labels occur in it, ordered
    /// by first occurrence.
    pub fn tag_document(&self, input: &AnalysisInput) -> Result<AnalysisResult> {
        let index = self.taxonomy.index();
        let matches = match &input.project_id {
            Some(project) => {
                self.taxonomy.get_project(project)?;
                index.match_in_scope(project, &input.text)
            }
            None => index.match_text(&input.text),
        };
        tracing::debug!(
            chars = input.text.len(),
            matches = matches.len(),
            "tagged document"
        );

        let mut positions: HashMap<Uuid, usize> = HashMap::new();
        let mut members: Vec<TaggedConcept> = Vec::new();
        for term in matches {
            let extent = format!("{}:{}", term.begin(), term.end());
            if let Some(&pos) = positions.get(term.id()) {
                let extents = &mut members[pos].extents;
                if !extents.contains(&extent) {
                    extents.push(extent);
                }
                continue;
            }
            let concept = match self.taxonomy.get_concept(term.id()) {
                Ok(concept) => concept.clone(),
                Err(err) => {
                    tracing::warn!(%err, "index refers to a missing concept");
                    continue;
                }
            };
            positions.insert(concept.id, members.len());
            members.push(TaggedConcept {
                concept,
                extents: vec![extent],
            });
        }
        Ok(AnalysisResult { members })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::taxonomy::model::{ConceptDraft, Project};
    use crate::tokenize::{Language, NlpWordTokenizer};
    use std::sync::Arc;

    fn create() -> Taxonomy {
        let tokenizer = Arc::new(NlpWordTokenizer::create("en").unwrap());
        let mut taxonomy = Taxonomy::new(tokenizer, Language::English);
        taxonomy.create_project(Project::new("metals")).unwrap();
        taxonomy.create_project(Project::new("fertilizers")).unwrap();
        taxonomy
    }

    fn extent<'t>(text: &'t str, extent: &str) -> &'t str {
        let (begin, end) = extent.split_once(':').unwrap();
        &text[begin.parse::<usize>().unwrap()..end.parse::<usize>().unwrap()]
    }

    #[test]
    fn test_extents_slice_text() {
        let mut taxonomy = create();
        let steel = taxonomy
            .create_concept("metals", ConceptDraft::preferred("en", "finished steel"))
            .unwrap();
        let text = "Prices of Finished Steel rose; finished steel is scarce.";

        let result = TextAnalyzer::new(&taxonomy)
            .tag_document(&AnalysisInput::new(text))
            .unwrap();
        assert_eq!(result.members.len(), 1);
        let member = &result.members[0];
        assert_eq!(member.concept.id, steel.id);
        assert_eq!(member.extents.len(), 2);
        assert_eq!(extent(text, &member.extents[0]), "Finished Steel");
        assert_eq!(extent(text, &member.extents[1]), "finished steel");
    }

    #[test]
    fn test_members_in_order_of_first_occurrence() {
        let mut taxonomy = create();
        let steel = taxonomy
            .create_concept("metals", ConceptDraft::preferred("en", "steel"))
            .unwrap();
        let nitrate = taxonomy
            .create_concept("fertilizers", ConceptDraft::preferred("en", "ammonium nitrate"))
            .unwrap();

        let result = TextAnalyzer::new(&taxonomy)
            .tag_document(&AnalysisInput::new("ammonium nitrate in steel drums"))
            .unwrap();
        let ids: Vec<Uuid> = result.members.iter().map(|m| m.concept.id).collect();
        assert_eq!(ids, vec![nitrate.id, steel.id]);
    }

    #[test]
    fn test_project_scope() {
        let mut taxonomy = create();
        taxonomy
            .create_concept("metals", ConceptDraft::preferred("en", "steel"))
            .unwrap();
        let nitrate = taxonomy
            .create_concept("fertilizers", ConceptDraft::preferred("en", "ammonium nitrate"))
            .unwrap();

        let input = AnalysisInput::new("ammonium nitrate in steel drums").in_project("fertilizers");
        let result = TextAnalyzer::new(&taxonomy).tag_document(&input).unwrap();
        assert_eq!(result.members.len(), 1);
        assert_eq!(result.members[0].concept.id, nitrate.id);
    }

    #[test]
    fn test_other_projects_do_not_hide_matches() {
        let mut taxonomy = create();
        let finished = taxonomy
            .create_concept("metals", ConceptDraft::preferred("en", "finished steel"))
            .unwrap();
        let steel = taxonomy
            .create_concept("fertilizers", ConceptDraft::preferred("en", "steel"))
            .unwrap();

        let text = "finished steel";
        let result = TextAnalyzer::new(&taxonomy)
            .tag_document(&AnalysisInput::new(text).in_project("fertilizers"))
            .unwrap();
        assert_eq!(result.members.len(), 1);
        assert_eq!(result.members[0].concept.id, steel.id);
        assert_eq!(extent(text, &result.members[0].extents[0]), "steel");

        let result = TextAnalyzer::new(&taxonomy)
            .tag_document(&AnalysisInput::new(text))
            .unwrap();
        assert_eq!(result.members.len(), 1);
        assert_eq!(result.members[0].concept.id, finished.id);
    }

    #[test]
    fn test_unknown_project() {
        let taxonomy = create();
        let input = AnalysisInput::new("steel").in_project("unknown");
        let err = TextAnalyzer::new(&taxonomy).tag_document(&input).unwrap_err();
        assert!(matches!(err, Error::ProjectNotFound(_)));
    }

    #[test]
    fn test_result_json() {
        let mut taxonomy = create();
        taxonomy
            .create_concept("metals", ConceptDraft::preferred("en", "steel"))
            .unwrap();
        let result = TextAnalyzer::new(&taxonomy)
            .tag_document(&AnalysisInput::new("steel"))
            .unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["members"][0]["project"], "metals");
        assert_eq!(json["members"][0]["extents"][0], "0:5");
    }
}
