//! Credit conversion rules, one per (category, curriculum policy) pair.

use serde::{Deserialize, Serialize};

use crate::types::{BaseUnit, CalculationKind, ValidationError};

/// How one category converts activity records into credited hours under one
/// curriculum policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditRule {
    /// Which formula applies.
    pub kind: CalculationKind,

    /// Denominator unit count for proportional rules (e.g. 34 hours taken,
    /// 1 year, 1 presentation).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_amount: Option<f64>,

    /// Unit the base amount is denominated in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_unit: Option<BaseUnit>,

    /// Credited hours granted per `base_amount` units, or the flat amount
    /// for fixed rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credited_amount: Option<f64>,

    /// Hard cap on credited hours this rule may contribute.
    pub max_credited_hours: f64,
}

impl CreditRule {
    /// A flat-amount rule.
    #[must_use]
    pub const fn fixed(credited_amount: f64, max_credited_hours: f64) -> Self {
        Self {
            kind: CalculationKind::Fixed,
            base_amount: None,
            base_unit: None,
            credited_amount: Some(credited_amount),
            max_credited_hours,
        }
    }

    /// A proportional rule: `credited_amount` hours per `base_amount` units.
    #[must_use]
    pub const fn proportional(
        base_amount: f64,
        base_unit: BaseUnit,
        credited_amount: f64,
        max_credited_hours: f64,
    ) -> Self {
        Self {
            kind: CalculationKind::Proportional,
            base_amount: Some(base_amount),
            base_unit: Some(base_unit),
            credited_amount: Some(credited_amount),
            max_credited_hours,
        }
    }

    /// A committee-discretion rule. The cap is informational only; the
    /// computed value is always 0.
    #[must_use]
    pub const fn committee(max_credited_hours: f64) -> Self {
        Self {
            kind: CalculationKind::CommitteeDiscretion,
            base_amount: None,
            base_unit: None,
            credited_amount: None,
            max_credited_hours,
        }
    }

    /// Checks the rule invariants for externally supplied catalog data.
    ///
    /// `category` names the owning category in error messages.
    pub fn validate(&self, category: &str) -> Result<(), ValidationError> {
        if self.max_credited_hours < 0.0 {
            return Err(ValidationError::NegativeCap {
                value: self.max_credited_hours,
            });
        }
        if self.kind == CalculationKind::Proportional {
            let base = self.base_amount.ok_or(ValidationError::MissingProportionalField {
                category: category.to_string(),
                field: "base_amount",
            })?;
            if base <= 0.0 {
                return Err(ValidationError::NonPositiveBase { value: base });
            }
            if self.base_unit.is_none() {
                return Err(ValidationError::MissingProportionalField {
                    category: category.to_string(),
                    field: "base_unit",
                });
            }
            if self.credited_amount.is_none() {
                return Err(ValidationError::MissingProportionalField {
                    category: category.to_string(),
                    field: "credited_amount",
                });
            }
        }
        Ok(())
    }
}
