// In-memory projects, concepts and concept schemes, kept in sync with a scoped
// term index.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::index::ScopedTermIndex;
use crate::taxonomy::model::{
    validate_slug, Concept, ConceptDraft, ConceptScheme, ConceptSchemeDraft, Project,
    Relationship, SchemeImport,
};
use crate::tokenize::{Language, WordTokenizer};

pub struct Taxonomy {
    language: Language,
    projects: BTreeMap<String, Project>,
    concepts: HashMap<Uuid, Concept>,
    schemes: HashMap<Uuid, ConceptScheme>,
    index: ScopedTermIndex<String, Uuid>,
}

impl Taxonomy {
    /// Concept labels in `language` are indexed with `tokenizer`.
    pub fn new(tokenizer: Arc<dyn WordTokenizer>, language: Language) -> Self {
        Taxonomy {
            language,
            projects: BTreeMap::new(),
            concepts: HashMap::new(),
            schemes: HashMap::new(),
            index: ScopedTermIndex::new(tokenizer),
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn index(&self) -> &ScopedTermIndex<String, Uuid> {
        &self.index
    }

    pub fn create_project(&mut self, project: Project) -> Result<Project> {
        validate_slug(&project.slug)?;
        if self.projects.contains_key(&project.slug) {
            return Err(Error::ProjectAlreadyExists(project.slug));
        }
        tracing::debug!(slug = %project.slug, "created project");
        self.projects.insert(project.slug.clone(), project.clone());
        Ok(project)
    }

    pub fn get_project(&self, slug: &str) -> Result<&Project> {
        self.projects
            .get(slug)
            .ok_or_else(|| Error::ProjectNotFound(slug.to_string()))
    }

    pub fn list_projects(&self) -> Vec<&Project> {
        self.projects.values().collect()
    }

    /// Replaces the project's title. The slug is fixed at creation.
    pub fn update_project(&mut self, slug: &str, update: Project) -> Result<()> {
        let project = self
            .projects
            .get_mut(slug)
            .ok_or_else(|| Error::ProjectNotFound(slug.to_string()))?;
        project.title = update.title;
        Ok(())
    }

    /// Deletes the project together with its concepts and schemes.
    pub fn delete_project(&mut self, slug: &str) -> Result<Project> {
        let project = self
            .projects
            .remove(slug)
            .ok_or_else(|| Error::ProjectNotFound(slug.to_string()))?;
        let removed: HashSet<Uuid> = self
            .concepts
            .values()
            .filter(|concept| concept.project == slug)
            .map(|concept| concept.id)
            .collect();
        self.concepts.retain(|id, _| !removed.contains(id));
        self.schemes.retain(|_, scheme| scheme.project != slug);
        self.forget_concepts(&removed);
        self.index.remove_scope(&project.slug);
        tracing::debug!(slug, concepts = removed.len(), "deleted project");
        Ok(project)
    }

    pub fn create_concept(&mut self, project: &str, draft: ConceptDraft) -> Result<Concept> {
        self.insert_concept(Concept::new(Uuid::new_v4(), project, draft))
    }

    /// Stores a concept under its own id, replacing any concept with that id.
    pub fn insert_concept(&mut self, concept: Concept) -> Result<Concept> {
        self.validate_concept(&concept)?;
        self.store_concept(concept.clone());
        Ok(concept)
    }

    pub fn get_concept(&self, id: &Uuid) -> Result<&Concept> {
        self.concepts.get(id).ok_or(Error::ConceptNotFound(*id))
    }

    pub fn concepts_in(&self, project: &str) -> Vec<&Concept> {
        self.concepts
            .values()
            .filter(|concept| concept.project == project)
            .collect()
    }

    pub fn update_concept(&mut self, id: &Uuid, draft: ConceptDraft) -> Result<Concept> {
        let project = self.get_concept(id)?.project.clone();
        self.insert_concept(Concept::new(*id, &project, draft))
    }

    /// Deletes the concept and every reference other concepts and schemes
    /// hold to it.
    pub fn delete_concept(&mut self, id: &Uuid) -> Result<Concept> {
        let concept = self.concepts.remove(id).ok_or(Error::ConceptNotFound(*id))?;
        self.index.remove(id);
        self.forget_concepts(&HashSet::from([*id]));
        Ok(concept)
    }

    /// Concepts reachable from `id` under `kind`, nearest first. Links are
    /// followed in both directions, so a concept listing `id` as its broader
    /// concept is narrower than `id` even if `id` does not say so. Related
    /// concepts are never followed past the first step.
    pub fn find_related(
        &self,
        id: &Uuid,
        kind: Relationship,
        depth: usize,
    ) -> Result<Vec<&Concept>> {
        let origin = self.get_concept(id)?;
        let depth = if kind.is_transitive() { depth.max(1) } else { 1 };

        let mut seen = HashSet::from([origin.id]);
        let mut frontier = vec![origin];
        let mut found = Vec::new();
        for _ in 0..depth {
            let mut next = Vec::new();
            for concept in frontier {
                for neighbour in self.neighbours(concept, kind) {
                    if seen.insert(neighbour.id) {
                        found.push(neighbour);
                        next.push(neighbour);
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
        }
        Ok(found)
    }

    /// Concepts whose preferred label in `language` starts with `partial`,
    /// ignoring case, ordered by that label.
    pub fn find_by_partial_label(&self, partial: &str, language: &str) -> Vec<&Concept> {
        let prefix = partial.trim().to_lowercase();
        let mut matches: Vec<(String, &Concept)> = self
            .concepts
            .values()
            .filter_map(|concept| {
                let label = concept.pref_label.get(language)?.to_lowercase();
                label.starts_with(&prefix).then_some((label, concept))
            })
            .collect();
        matches.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.id.cmp(&b.1.id)));
        matches.into_iter().map(|(_, concept)| concept).collect()
    }

    pub fn create_scheme(
        &mut self,
        project: &str,
        draft: ConceptSchemeDraft,
    ) -> Result<ConceptScheme> {
        let scheme = ConceptScheme {
            id: Uuid::new_v4(),
            project: project.to_string(),
            title: draft.title,
            top_concepts: draft.top_concepts,
        };
        self.insert_scheme(scheme)
    }

    pub fn get_scheme(&self, id: &Uuid) -> Result<&ConceptScheme> {
        self.schemes.get(id).ok_or(Error::ConceptSchemeNotFound(*id))
    }

    pub fn schemes_in(&self, project: &str) -> Vec<&ConceptScheme> {
        let mut schemes: Vec<&ConceptScheme> = self
            .schemes
            .values()
            .filter(|scheme| scheme.project == project)
            .collect();
        schemes.sort_by_key(|scheme| scheme.id);
        schemes
    }

    pub fn update_scheme(&mut self, id: &Uuid, draft: ConceptSchemeDraft) -> Result<ConceptScheme> {
        let project = self.get_scheme(id)?.project.clone();
        self.insert_scheme(ConceptScheme {
            id: *id,
            project,
            title: draft.title,
            top_concepts: draft.top_concepts,
        })
    }

    /// Deletes the scheme. Its concepts stay in the project.
    pub fn delete_scheme(&mut self, id: &Uuid) -> Result<ConceptScheme> {
        self.schemes.remove(id).ok_or(Error::ConceptSchemeNotFound(*id))
    }

    /// The scheme's top concepts followed by everything narrower than them.
    pub fn scheme_members(&self, id: &Uuid) -> Result<Vec<&Concept>> {
        let scheme = self.get_scheme(id)?;
        let mut seen = HashSet::new();
        let mut members = Vec::new();
        for top in &scheme.top_concepts {
            if let Some(concept) = self.concepts.get(top) {
                if seen.insert(concept.id) {
                    members.push(concept);
                }
            }
        }
        let mut pos = 0;
        while pos < members.len() {
            for neighbour in self.neighbours(members[pos], Relationship::Narrower) {
                if seen.insert(neighbour.id) {
                    members.push(neighbour);
                }
            }
            pos += 1;
        }
        Ok(members)
    }

    /// Creates a scheme and its concepts from one document. Nothing is stored
    /// unless the whole document is valid.
    pub fn import_scheme(&mut self, project: &str, import: SchemeImport) -> Result<ConceptScheme> {
        self.get_project(project)?;

        let mut ids: HashMap<&str, Uuid> = HashMap::new();
        let mut assigned = Vec::with_capacity(import.concepts.len());
        for imported in &import.concepts {
            let id = Uuid::new_v4();
            if ids.insert(imported.key.as_str(), id).is_some() {
                return Err(Error::DuplicateKey(imported.key.clone()));
            }
            assigned.push(id);
        }
        let resolve = |property: &'static str, keys: &[String]| -> Result<Vec<Uuid>> {
            keys.iter()
                .map(|key| {
                    ids.get(key.as_str())
                        .copied()
                        .ok_or_else(|| Error::InvalidReference {
                            property,
                            target: key.clone(),
                        })
                })
                .collect()
        };

        let mut concepts = Vec::with_capacity(assigned.len());
        for (imported, id) in import.concepts.iter().zip(assigned) {
            let draft = ConceptDraft {
                pref_label: imported.pref_label.clone(),
                alt_label: imported.alt_label.clone(),
                broader: resolve("broader", &imported.broader)?,
                narrower: resolve("narrower", &imported.narrower)?,
                related: resolve("related", &imported.related)?,
            };
            let concept = Concept::new(id, project, draft);
            if !concept.has_preferred_label() {
                return Err(Error::MissingPreferredLabel);
            }
            for kind in Relationship::ALL {
                if concept.relations(kind).contains(&id) {
                    return Err(Error::SelfReference(kind.as_str()));
                }
            }
            concepts.push(concept);
        }
        let top_concepts = resolve("top_concepts", &import.top_concepts)?;

        let count = concepts.len();
        for concept in concepts {
            self.store_concept(concept);
        }
        let scheme = ConceptScheme {
            id: Uuid::new_v4(),
            project: project.to_string(),
            title: import.title,
            top_concepts,
        };
        self.schemes.insert(scheme.id, scheme.clone());
        tracing::debug!(project, scheme = %scheme.id, concepts = count, "imported scheme");
        Ok(scheme)
    }

    fn validate_concept(&self, concept: &Concept) -> Result<()> {
        self.get_project(&concept.project)?;
        if !concept.has_preferred_label() {
            return Err(Error::MissingPreferredLabel);
        }
        for kind in Relationship::ALL {
            for target in concept.relations(kind) {
                if *target == concept.id {
                    return Err(Error::SelfReference(kind.as_str()));
                }
                if !self.concepts.contains_key(target) {
                    return Err(Error::InvalidReference {
                        property: kind.as_str(),
                        target: target.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    fn store_concept(&mut self, concept: Concept) {
        if self.concepts.contains_key(&concept.id) {
            self.index.remove(&concept.id);
        }
        self.index_concept(&concept);
        self.concepts.insert(concept.id, concept);
    }

    fn insert_scheme(&mut self, scheme: ConceptScheme) -> Result<ConceptScheme> {
        self.get_project(&scheme.project)?;
        for top in &scheme.top_concepts {
            if !self.concepts.contains_key(top) {
                return Err(Error::InvalidReference {
                    property: "top_concepts",
                    target: top.to_string(),
                });
            }
        }
        self.schemes.insert(scheme.id, scheme.clone());
        Ok(scheme)
    }

    /// Stored links under `kind`, then concepts that link back under the
    /// inverse relationship.
    fn neighbours(&self, concept: &Concept, kind: Relationship) -> Vec<&Concept> {
        let mut ids: Vec<Uuid> = concept.relations(kind).to_vec();
        let mut inverse: Vec<Uuid> = self
            .concepts
            .values()
            .filter(|other| other.relations(kind.inverse()).contains(&concept.id))
            .map(|other| other.id)
            .collect();
        inverse.sort();
        for id in inverse {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids.iter().filter_map(|id| self.concepts.get(id)).collect()
    }

    fn forget_concepts(&mut self, removed: &HashSet<Uuid>) {
        if removed.is_empty() {
            return;
        }
        for concept in self.concepts.values_mut() {
            for id in removed {
                concept.forget(id);
            }
        }
        for scheme in self.schemes.values_mut() {
            scheme.top_concepts.retain(|id| !removed.contains(id));
        }
    }

    fn index_concept(&mut self, concept: &Concept) {
        let labels = concept
            .labels(self.language.code())
            .map(|label| (concept.id, label));
        self.index.add_all(concept.project.clone(), labels);
    }
}
