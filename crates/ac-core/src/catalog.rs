//! Category reference data and name lookup.
//!
//! Categories are immutable reference data loaded once at startup. Lookup is
//! case-insensitive and two-phase: exact match first, then first substring
//! match as a fallback for the loose names the registration forms produce.

use serde::{Deserialize, Serialize};

use crate::rule::CreditRule;
use crate::types::{BaseUnit, CurriculumPolicy, ValidationError};

/// A named activity classification carrying one credit rule per curriculum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    /// Rule applied to students under the old curriculum.
    pub old: CreditRule,
    /// Rule applied to students under the new curriculum.
    pub new: CreditRule,
}

impl Category {
    #[must_use]
    pub fn new(name: impl Into<String>, old: CreditRule, new: CreditRule) -> Self {
        Self {
            name: name.into(),
            old,
            new,
        }
    }

    /// Returns the rule governing the given curriculum policy.
    #[must_use]
    pub const fn rule_for(&self, policy: CurriculumPolicy) -> &CreditRule {
        match policy {
            CurriculumPolicy::Old => &self.old,
            CurriculumPolicy::New => &self.new,
        }
    }
}

/// The fixed list of categories the calculator resolves activity references
/// against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCatalog {
    categories: Vec<Category>,
}

impl CategoryCatalog {
    /// Builds a catalog from externally supplied categories, validating every
    /// rule's invariants.
    pub fn new(categories: Vec<Category>) -> Result<Self, ValidationError> {
        for category in &categories {
            if category.name.is_empty() {
                return Err(ValidationError::Empty {
                    field: "category name",
                });
            }
            category.old.validate(&category.name)?;
            category.new.validate(&category.name)?;
        }
        Ok(Self { categories })
    }

    /// Looks a category up by name.
    ///
    /// Phase one is a case-insensitive exact match. Phase two falls back to
    /// the first case-insensitive substring match; when more than one
    /// category matches the substring, the ambiguity is logged so typos in
    /// the input data stay discoverable.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Category> {
        let needle = name.to_lowercase();

        if let Some(category) = self
            .categories
            .iter()
            .find(|c| c.name.to_lowercase() == needle)
        {
            return Some(category);
        }

        let mut matches = self
            .categories
            .iter()
            .filter(|c| c.name.to_lowercase().contains(&needle));
        let first = matches.next()?;
        if let Some(second) = matches.next() {
            tracing::warn!(
                query = name,
                first = first.name,
                also = second.name,
                "ambiguous category lookup, using first substring match"
            );
        }
        Some(first)
    }

    /// All categories, in catalog order.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// The institutional reference catalog.
    ///
    /// Static trusted data; rule literals are kept in sync with the
    /// published AC tables for both curricula.
    #[must_use]
    pub fn builtin() -> Self {
        use BaseUnit::{Hours, Lectures, MiniCourses, OrganizedEvents, Presentations, Years};

        let categories = vec![
            Category::new(
                "Hackathon",
                CreditRule::proportional(4.0, Hours, 1.0, 17.0),
                CreditRule::proportional(4.0, Hours, 2.0, 34.0),
            ),
            Category::new(
                "Iniciação à Docência",
                CreditRule::proportional(1.0, Years, 34.0, 34.0),
                CreditRule::proportional(1.0, Years, 30.0, 60.0),
            ),
            Category::new(
                "Iniciação Científica",
                CreditRule::proportional(1.0, Years, 34.0, 68.0),
                CreditRule::proportional(1.0, Years, 30.0, 60.0),
            ),
            Category::new(
                "Estágio Extracurricular",
                CreditRule::proportional(34.0, Hours, 17.0, 34.0),
                CreditRule::proportional(30.0, Hours, 15.0, 60.0),
            ),
            Category::new(
                "Monitoria",
                CreditRule::proportional(1.0, Years, 17.0, 34.0),
                CreditRule::proportional(1.0, Years, 15.0, 30.0),
            ),
            Category::new(
                "Curso de Extensão",
                CreditRule::proportional(2.0, Hours, 1.0, 34.0),
                CreditRule::proportional(2.0, Hours, 1.0, 40.0),
            ),
            Category::new(
                "Palestra",
                CreditRule::proportional(1.0, Lectures, 2.0, 17.0),
                CreditRule::proportional(1.0, Lectures, 2.0, 20.0),
            ),
            Category::new(
                "Minicurso",
                CreditRule::proportional(1.0, MiniCourses, 4.0, 17.0),
                CreditRule::proportional(1.0, MiniCourses, 4.0, 20.0),
            ),
            Category::new(
                "Organização de Eventos",
                CreditRule::proportional(1.0, OrganizedEvents, 8.0, 17.0),
                CreditRule::proportional(1.0, OrganizedEvents, 10.0, 30.0),
            ),
            Category::new(
                "Apresentação de Trabalho",
                CreditRule::proportional(1.0, Presentations, 5.0, 17.0),
                CreditRule::proportional(1.0, Presentations, 6.0, 24.0),
            ),
            Category::new(
                "Representação Estudantil",
                CreditRule::committee(17.0),
                CreditRule::committee(20.0),
            ),
            Category::new(
                "Atividades Culturais",
                CreditRule::committee(8.0),
                CreditRule::committee(10.0),
            ),
        ];
        Self { categories }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CalculationKind;

    #[test]
    fn builtin_catalog_validates() {
        let catalog = CategoryCatalog::builtin();
        assert!(CategoryCatalog::new(catalog.categories().to_vec()).is_ok());
    }

    #[test]
    fn find_exact_case_insensitive() {
        let catalog = CategoryCatalog::builtin();
        let category = catalog.find("hackathon").unwrap();
        assert_eq!(category.name, "Hackathon");
    }

    #[test]
    fn find_substring_fallback() {
        let catalog = CategoryCatalog::builtin();
        let category = catalog.find("docência").unwrap();
        assert_eq!(category.name, "Iniciação à Docência");
    }

    #[test]
    fn find_exact_preferred_over_substring() {
        // "Monitoria" must not be shadowed by a substring match elsewhere.
        let catalog = CategoryCatalog::new(vec![
            Category::new("Monitoria Especial", CreditRule::committee(1.0), CreditRule::committee(1.0)),
            Category::new("Monitoria", CreditRule::committee(2.0), CreditRule::committee(2.0)),
        ])
        .unwrap();
        let category = catalog.find("monitoria").unwrap();
        assert_eq!(category.name, "Monitoria");
    }

    #[test]
    fn find_ambiguous_substring_returns_first() {
        let catalog = CategoryCatalog::builtin();
        // "iniciação" prefixes two categories; first catalog entry wins.
        let category = catalog.find("iniciação").unwrap();
        assert_eq!(category.name, "Iniciação à Docência");
    }

    #[test]
    fn find_unknown_returns_none() {
        let catalog = CategoryCatalog::builtin();
        assert!(catalog.find("esporte eletrônico").is_none());
    }

    #[test]
    fn new_rejects_invalid_rule() {
        let bad = Category::new(
            "Broken",
            CreditRule::proportional(-1.0, BaseUnit::Hours, 1.0, 10.0),
            CreditRule::committee(1.0),
        );
        assert!(CategoryCatalog::new(vec![bad]).is_err());
    }

    #[test]
    fn new_rejects_empty_name() {
        let bad = Category::new("", CreditRule::committee(1.0), CreditRule::committee(1.0));
        assert!(CategoryCatalog::new(vec![bad]).is_err());
    }

    #[test]
    fn rule_for_selects_policy() {
        let catalog = CategoryCatalog::builtin();
        let hackathon = catalog.find("Hackathon").unwrap();
        let new_rule = hackathon.rule_for(CurriculumPolicy::New);
        assert_eq!(new_rule.kind, CalculationKind::Proportional);
        assert_eq!(new_rule.credited_amount, Some(2.0));
        let old_rule = hackathon.rule_for(CurriculumPolicy::Old);
        assert_eq!(old_rule.credited_amount, Some(1.0));
    }

    #[test]
    fn catalog_serde_roundtrip() {
        let catalog = CategoryCatalog::builtin();
        let json = serde_json::to_string(&catalog).unwrap();
        let parsed: CategoryCatalog = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, catalog);
    }
}
