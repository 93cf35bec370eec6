//! The ordered matcher rules of the field resolver.
//!
//! Each matcher is a pure function from a source column to an optional
//! [`Candidate`]. The resolver runs all of them and keeps the candidate
//! with the highest confidence; ties go to the matcher listed first in
//! [`MATCHERS`].

use crate::catalog::ComponentCatalog;
use crate::models::{BaseField, ComponentDefinition, RuleCategory, TargetField};

use super::base_fields::{
    AGGREGATE_WORDS, STATUTORY_INSURANCE_WORDS, exact_base_field, keyword_base_field,
    normalize_field_name,
};

/// Confidence of an exact label, code or detail-key match.
pub const EXACT_CONFIDENCE: f64 = 0.95;
/// Confidence of a component display-name match.
pub const COMPONENT_NAME_CONFIDENCE: f64 = 0.9;
/// Confidence of a base-field keyword match.
pub const KEYWORD_CONFIDENCE: f64 = 0.8;
/// Confidence of the statutory-insurance ignore heuristic.
pub const STATUTORY_IGNORE_CONFIDENCE: f64 = 0.8;
/// Confidence of an aggregate column mapped to gross or net pay.
pub const AGGREGATE_CONFIDENCE: f64 = 0.7;
/// Confidence of an aggregate column with no inferable target.
pub const AGGREGATE_IGNORE_CONFIDENCE: f64 = 0.6;
/// Confidence of the fallback.
pub const DEFAULT_CONFIDENCE: f64 = 0.1;

/// Matcher precedence, highest first. Used only to break confidence ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RulePriority {
    /// Base label, component code or explicit detail key.
    Exact,
    /// Base-field keyword.
    Keyword,
    /// Summary-word heuristic.
    Aggregate,
    /// Statutory-insurance heuristic.
    Deduction,
    /// Component display-name substring.
    ComponentName,
    /// Nothing matched.
    Default,
}

/// A proposed mapping for one column.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Proposed target.
    pub target: TargetField,
    /// Confidence in `0.0..=1.0`.
    pub confidence: f64,
    /// Reporting category.
    pub category: RuleCategory,
    /// Rationale shown to the operator.
    pub reason: String,
    /// The matcher that produced it.
    pub priority: RulePriority,
}

/// The column being resolved.
#[derive(Debug, Clone, Copy)]
pub struct SourceColumn<'a> {
    /// As received.
    pub raw: &'a str,
    /// After whitespace stripping and lowercasing.
    pub normalized: &'a str,
}

/// A matcher rule.
pub type Matcher = fn(SourceColumn<'_>, &ComponentCatalog) -> Option<Candidate>;

/// All matchers in priority order.
pub const MATCHERS: &[(RulePriority, Matcher)] = &[
    (RulePriority::Exact, match_exact_base_label),
    (RulePriority::Exact, match_detail_key),
    (RulePriority::Exact, match_component_code),
    (RulePriority::Keyword, match_keyword),
    (RulePriority::Aggregate, match_aggregate),
    (RulePriority::Deduction, match_statutory_insurance),
    (RulePriority::ComponentName, match_component_name),
    (RulePriority::Default, match_default),
];

fn base_candidate(
    field: BaseField,
    confidence: f64,
    priority: RulePriority,
    reason: String,
) -> Candidate {
    Candidate {
        target: TargetField::Base(field),
        confidence,
        category: field.rule_category(),
        reason,
        priority,
    }
}

/// Maps a column to a component, keeping derived components out of every sum.
fn component_candidate(
    component: &ComponentDefinition,
    confidence: f64,
    priority: RulePriority,
    how: &str,
) -> Candidate {
    match component.detail_key() {
        Some(target) => Candidate {
            category: if matches!(target, TargetField::Earning(_)) {
                RuleCategory::Earning
            } else {
                RuleCategory::Deduction
            },
            target,
            confidence,
            reason: format!("{} '{}' ({})", how, component.name, component.code),
            priority,
        },
        None => Candidate {
            target: TargetField::Ignore,
            confidence,
            category: RuleCategory::Calculated,
            reason: format!(
                "{} '{}' ({}), a {:?} component that is never summed",
                how, component.name, component.code, component.category
            ),
            priority,
        },
    }
}

/// Exact canonical label of a base field.
pub fn match_exact_base_label(column: SourceColumn<'_>, _: &ComponentCatalog) -> Option<Candidate> {
    exact_base_field(column.normalized).map(|field| {
        base_candidate(
            field,
            EXACT_CONFIDENCE,
            RulePriority::Exact,
            format!("exact label for {}", field.key()),
        )
    })
}

/// A column literally named `earnings_details.<code>.amount` or
/// `deductions_details.<code>.amount`.
pub fn match_detail_key(column: SourceColumn<'_>, catalog: &ComponentCatalog) -> Option<Candidate> {
    let target: TargetField = column.raw.trim().parse().ok()?;
    let code = match &target {
        TargetField::Earning(code) | TargetField::Deduction(code) => code,
        TargetField::Base(_) | TargetField::Ignore => return None,
    };

    if let Some(component) = catalog.get(code) {
        return Some(component_candidate(
            component,
            EXACT_CONFIDENCE,
            RulePriority::Exact,
            "explicit detail key for",
        ));
    }

    let category = if matches!(target, TargetField::Earning(_)) {
        RuleCategory::Earning
    } else {
        RuleCategory::Deduction
    };
    Some(Candidate {
        reason: format!("explicit detail key for uncatalogued code {}", code),
        target,
        confidence: EXACT_CONFIDENCE,
        category,
        priority: RulePriority::Exact,
    })
}

/// The column contains a component code (case-insensitive). The longest
/// matching code wins.
pub fn match_component_code(column: SourceColumn<'_>, catalog: &ComponentCatalog) -> Option<Candidate> {
    catalog
        .components()
        .iter()
        .filter(|c| c.code.chars().count() >= 2)
        .filter(|c| column.normalized.contains(&c.code.to_lowercase()))
        .fold(None::<&ComponentDefinition>, |best, c| match best {
            Some(b) if b.code.len() >= c.code.len() => Some(b),
            _ => Some(c),
        })
        .map(|component| {
            component_candidate(
                component,
                EXACT_CONFIDENCE,
                RulePriority::Exact,
                "component code of",
            )
        })
}

/// Curated keywords per base field.
pub fn match_keyword(column: SourceColumn<'_>, _: &ComponentCatalog) -> Option<Candidate> {
    keyword_base_field(column.normalized).map(|(field, word)| {
        base_candidate(
            field,
            KEYWORD_CONFIDENCE,
            RulePriority::Keyword,
            format!("keyword '{}' suggests {}", word, field.key()),
        )
    })
}

/// Summary words mark user-supplied totals. They map to gross or net pay
/// when that is inferable and are ignored otherwise, so they never double
/// count against component-derived totals.
pub fn match_aggregate(column: SourceColumn<'_>, _: &ComponentCatalog) -> Option<Candidate> {
    let word = AGGREGATE_WORDS
        .iter()
        .find(|word| column.normalized.contains(*word))?;

    let inferred = if column.normalized.contains("应发") {
        Some(BaseField::GrossPay)
    } else if column.normalized.contains("实发") {
        Some(BaseField::NetPay)
    } else {
        None
    };

    Some(match inferred {
        Some(field) => Candidate {
            target: TargetField::Base(field),
            confidence: AGGREGATE_CONFIDENCE,
            category: RuleCategory::Calculated,
            reason: format!("summary word '{}' treated as {}", word, field.key()),
            priority: RulePriority::Aggregate,
        },
        None => Candidate {
            target: TargetField::Ignore,
            confidence: AGGREGATE_IGNORE_CONFIDENCE,
            category: RuleCategory::Calculated,
            reason: format!("summary word '{}' with no specific target", word),
            priority: RulePriority::Aggregate,
        },
    })
}

/// Statutory insurance lines are computed by the payroll system, not
/// supplied by the operator, unless a component claims the column.
pub fn match_statutory_insurance(column: SourceColumn<'_>, _: &ComponentCatalog) -> Option<Candidate> {
    STATUTORY_INSURANCE_WORDS
        .iter()
        .find(|word| column.normalized.contains(*word))
        .map(|word| Candidate {
            target: TargetField::Ignore,
            confidence: STATUTORY_IGNORE_CONFIDENCE,
            category: RuleCategory::Ignore,
            reason: format!(
                "statutory insurance keyword '{}' with no component match, system-computed",
                word
            ),
            priority: RulePriority::Deduction,
        })
}

/// The column contains a component's display name. The longest name wins.
pub fn match_component_name(column: SourceColumn<'_>, catalog: &ComponentCatalog) -> Option<Candidate> {
    catalog
        .components()
        .iter()
        .map(|c| (c, normalize_field_name(&c.name)))
        .filter(|(_, name)| !name.is_empty() && column.normalized.contains(name.as_str()))
        .fold(None::<(&ComponentDefinition, String)>, |best, (c, name)| match best {
            Some((b, best_name)) if best_name.chars().count() >= name.chars().count() => {
                Some((b, best_name))
            }
            _ => Some((c, name)),
        })
        .map(|(component, _)| {
            component_candidate(
                component,
                COMPONENT_NAME_CONFIDENCE,
                RulePriority::ComponentName,
                "component name",
            )
        })
}

/// Fallback when nothing else matched.
pub fn match_default(_: SourceColumn<'_>, _: &ComponentCatalog) -> Option<Candidate> {
    Some(default_candidate())
}

/// The unrecognized-column candidate.
pub fn default_candidate() -> Candidate {
    Candidate {
        target: TargetField::Ignore,
        confidence: DEFAULT_CONFIDENCE,
        category: RuleCategory::Ignore,
        reason: "unrecognized — manual mapping required".to_string(),
        priority: RulePriority::Default,
    }
}

/// Picks the winner: highest confidence, ties to the earlier matcher.
pub fn best_candidate(candidates: impl IntoIterator<Item = Candidate>) -> Option<Candidate> {
    candidates.into_iter().fold(None, |best: Option<Candidate>, c| match best {
        Some(b) if b.confidence > c.confidence => Some(b),
        Some(b) if b.confidence == c.confidence && b.priority <= c.priority => Some(b),
        _ => Some(c),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ComponentCategory;

    fn catalog() -> ComponentCatalog {
        ComponentCatalog::new(vec![
            ComponentDefinition::new("BASIC_SALARY", "基本工资", ComponentCategory::Earning),
            ComponentDefinition::new("PENSION_PERSONAL", "养老保险", ComponentCategory::Deduction),
            ComponentDefinition::new("ANNUAL_TOTAL", "年度累计", ComponentCategory::Statistic),
            ComponentDefinition::new("SOCIAL", "社保", ComponentCategory::Deduction),
        ])
    }

    fn run(matcher: Matcher, raw: &str) -> Option<Candidate> {
        let normalized = normalize_field_name(raw);
        matcher(
            SourceColumn {
                raw,
                normalized: &normalized,
            },
            &catalog(),
        )
    }

    #[test]
    fn test_exact_base_label() {
        let c = run(match_exact_base_label, "姓名").unwrap();
        assert_eq!(c.target, TargetField::Base(BaseField::FullName));
        assert_eq!(c.confidence, EXACT_CONFIDENCE);
        assert_eq!(c.category, RuleCategory::Base);
    }

    #[test]
    fn test_detail_key_known_and_unknown_code() {
        let known = run(match_detail_key, "earnings_details.BASIC_SALARY.amount").unwrap();
        assert_eq!(known.target, TargetField::Earning("BASIC_SALARY".to_string()));

        let unknown = run(match_detail_key, "deductions_details.UNION_FEE.amount").unwrap();
        assert_eq!(unknown.target, TargetField::Deduction("UNION_FEE".to_string()));
        assert_eq!(unknown.category, RuleCategory::Deduction);

        assert!(run(match_detail_key, "gross_pay").is_none());
    }

    #[test]
    fn test_detail_key_for_statistic_code_is_ignored() {
        let c = run(match_detail_key, "earnings_details.ANNUAL_TOTAL.amount").unwrap();
        assert_eq!(c.target, TargetField::Ignore);
        assert_eq!(c.category, RuleCategory::Calculated);
    }

    #[test]
    fn test_component_code_substring_is_case_insensitive() {
        let c = run(match_component_code, "basic_salary(元)").unwrap();
        assert_eq!(c.target, TargetField::Earning("BASIC_SALARY".to_string()));
        assert_eq!(c.confidence, EXACT_CONFIDENCE);
    }

    #[test]
    fn test_keyword_match() {
        let c = run(match_keyword, "身份证").unwrap();
        assert_eq!(c.target, TargetField::Base(BaseField::IdNumber));
        assert_eq!(c.confidence, KEYWORD_CONFIDENCE);
    }

    #[test]
    fn test_aggregate_gross_net_and_ignore() {
        let gross = run(match_aggregate, "本月应发").unwrap();
        assert_eq!(gross.target, TargetField::Base(BaseField::GrossPay));
        assert_eq!(gross.confidence, AGGREGATE_CONFIDENCE);
        assert_eq!(gross.category, RuleCategory::Calculated);

        let net = run(match_aggregate, "实发数").unwrap();
        assert_eq!(net.target, TargetField::Base(BaseField::NetPay));

        let other = run(match_aggregate, "补贴合计").unwrap();
        assert_eq!(other.target, TargetField::Ignore);
        assert_eq!(other.confidence, AGGREGATE_IGNORE_CONFIDENCE);
    }

    #[test]
    fn test_statutory_insurance_ignored() {
        let c = run(match_statutory_insurance, "失业保险").unwrap();
        assert_eq!(c.target, TargetField::Ignore);
        assert_eq!(c.confidence, STATUTORY_IGNORE_CONFIDENCE);
        assert!(run(match_statutory_insurance, "基本工资").is_none());
    }

    #[test]
    fn test_component_name_substring() {
        let c = run(match_component_name, "养老保险(个人)").unwrap();
        assert_eq!(c.target, TargetField::Deduction("PENSION_PERSONAL".to_string()));
        assert_eq!(c.confidence, COMPONENT_NAME_CONFIDENCE);
        assert_eq!(c.category, RuleCategory::Deduction);
    }

    #[test]
    fn test_statistic_component_name_always_ignored() {
        let c = run(match_component_name, "年度累计").unwrap();
        assert_eq!(c.target, TargetField::Ignore);
        assert_eq!(c.confidence, COMPONENT_NAME_CONFIDENCE);
    }

    #[test]
    fn test_default_rule() {
        let c = run(match_default, "xyz").unwrap();
        assert_eq!(c.target, TargetField::Ignore);
        assert_eq!(c.confidence, DEFAULT_CONFIDENCE);
        assert!(c.reason.contains("manual mapping required"));
    }

    #[test]
    fn test_best_candidate_breaks_ties_by_priority() {
        let keyword = Candidate {
            target: TargetField::Base(BaseField::FullName),
            confidence: 0.8,
            category: RuleCategory::Base,
            reason: "k".to_string(),
            priority: RulePriority::Keyword,
        };
        let deduction = Candidate {
            target: TargetField::Ignore,
            confidence: 0.8,
            category: RuleCategory::Ignore,
            reason: "d".to_string(),
            priority: RulePriority::Deduction,
        };

        let best = best_candidate(vec![deduction.clone(), keyword.clone()]).unwrap();
        assert_eq!(best.priority, RulePriority::Keyword);

        let best = best_candidate(vec![keyword, deduction]).unwrap();
        assert_eq!(best.priority, RulePriority::Keyword);
    }

    #[test]
    fn test_best_candidate_prefers_confidence_over_priority() {
        let aggregate = Candidate {
            target: TargetField::Ignore,
            confidence: 0.6,
            category: RuleCategory::Calculated,
            reason: "a".to_string(),
            priority: RulePriority::Aggregate,
        };
        let name = Candidate {
            target: TargetField::Ignore,
            confidence: 0.9,
            category: RuleCategory::Calculated,
            reason: "n".to_string(),
            priority: RulePriority::ComponentName,
        };
        let best = best_candidate(vec![aggregate, name]).unwrap();
        assert_eq!(best.priority, RulePriority::ComponentName);
    }
}
