//! Field semantics resolution.
//!
//! Turns a set of raw column names into [`FieldMappingRule`]s, once per
//! import session, and indexes them into a [`MappingPlan`] that the
//! normalizer applies identically to every row.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::catalog::ComponentCatalog;
use crate::models::{FieldMappingRule, RuleCategory, TargetField};

use super::base_fields::normalize_field_name;
use super::rules::{Candidate, MATCHERS, SourceColumn, best_candidate, default_candidate};

/// Confidence assigned to operator-pinned mappings.
pub const MANUAL_CONFIDENCE: f64 = 1.0;

/// Operator-pinned mappings, keyed by raw source column.
pub type MappingOverrides = BTreeMap<String, TargetField>;

/// Resolves one column against every matcher.
pub fn resolve_field(source_field: &str, catalog: &ComponentCatalog) -> FieldMappingRule {
    let normalized = normalize_field_name(source_field);
    let column = SourceColumn {
        raw: source_field,
        normalized: &normalized,
    };

    let candidates = MATCHERS.iter().filter_map(|(priority, matcher)| {
        matcher(column, catalog).map(|mut candidate| {
            candidate.priority = *priority;
            candidate
        })
    });

    let Candidate {
        target,
        confidence,
        category,
        reason,
        ..
    } = best_candidate(candidates).unwrap_or_else(default_candidate);

    FieldMappingRule {
        source_field: source_field.to_string(),
        target_field: target,
        confidence,
        category,
        reason,
    }
}

/// Proposes a mapping for each distinct source column, sorted by
/// descending confidence. Equal confidences keep input order, so the same
/// input always yields the same output.
///
/// # Example
///
/// ```
/// use payroll_import::catalog::ComponentCatalog;
/// use payroll_import::mapping::map_fields;
/// use payroll_import::models::{BaseField, TargetField};
///
/// let rules = map_fields(&["姓名".to_string(), "奇怪的列".to_string()], &ComponentCatalog::empty());
/// assert_eq!(rules[0].target_field, TargetField::Base(BaseField::FullName));
/// assert_eq!(rules[1].target_field, TargetField::Ignore);
/// ```
pub fn map_fields(source_fields: &[String], catalog: &ComponentCatalog) -> Vec<FieldMappingRule> {
    map_fields_with_overrides(source_fields, catalog, &MappingOverrides::new())
}

/// Like [`map_fields`], but columns present in `overrides` take the pinned
/// target at full confidence instead of being resolved.
pub fn map_fields_with_overrides(
    source_fields: &[String],
    catalog: &ComponentCatalog,
    overrides: &MappingOverrides,
) -> Vec<FieldMappingRule> {
    let mut seen: Vec<&str> = Vec::with_capacity(source_fields.len());
    let mut rules: Vec<FieldMappingRule> = Vec::with_capacity(source_fields.len());

    for field in source_fields {
        if seen.contains(&field.as_str()) {
            continue;
        }
        seen.push(field);

        let rule = match overrides.get(field) {
            Some(target) => manual_rule(field, target.clone()),
            None => resolve_field(field, catalog),
        };
        debug!(
            source = %rule.source_field,
            target = %rule.target_field,
            confidence = rule.confidence,
            "Resolved field mapping"
        );
        rules.push(rule);
    }

    rules.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    rules
}

fn manual_rule(source_field: &str, target: TargetField) -> FieldMappingRule {
    let category = match &target {
        TargetField::Base(field) => field.rule_category(),
        TargetField::Earning(_) => RuleCategory::Earning,
        TargetField::Deduction(_) => RuleCategory::Deduction,
        TargetField::Ignore => RuleCategory::Ignore,
    };
    FieldMappingRule {
        source_field: source_field.to_string(),
        target_field: target,
        confidence: MANUAL_CONFIDENCE,
        category,
        reason: "manual mapping".to_string(),
    }
}

/// Mapping rules indexed by raw source column.
#[derive(Debug, Clone, Default)]
pub struct MappingPlan {
    rules: Vec<FieldMappingRule>,
    by_source: HashMap<String, usize>,
}

impl MappingPlan {
    /// Indexes a rule list. If a column appears twice, the first rule wins.
    pub fn new(rules: Vec<FieldMappingRule>) -> Self {
        let mut by_source = HashMap::with_capacity(rules.len());
        for (i, rule) in rules.iter().enumerate() {
            by_source.entry(rule.source_field.clone()).or_insert(i);
        }
        Self { rules, by_source }
    }

    /// The rule for a raw column, if one was resolved.
    pub fn rule_for(&self, source_field: &str) -> Option<&FieldMappingRule> {
        self.by_source.get(source_field).map(|&i| &self.rules[i])
    }

    /// The target for a raw column. Unknown columns are ignored.
    pub fn target_for(&self, source_field: &str) -> &TargetField {
        const IGNORE: &TargetField = &TargetField::Ignore;
        self.rule_for(source_field)
            .map(|rule| &rule.target_field)
            .unwrap_or(IGNORE)
    }

    /// All rules, in resolver order.
    pub fn rules(&self) -> &[FieldMappingRule] {
        &self.rules
    }

    /// Columns whose confidence is below `threshold`, in resolver order.
    pub fn ambiguous_fields(&self, threshold: f64) -> Vec<String> {
        self.rules
            .iter()
            .filter(|rule| rule.is_ambiguous(threshold))
            .map(|rule| rule.source_field.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::rules::{
        AGGREGATE_CONFIDENCE, AGGREGATE_IGNORE_CONFIDENCE, COMPONENT_NAME_CONFIDENCE,
        DEFAULT_CONFIDENCE, EXACT_CONFIDENCE, KEYWORD_CONFIDENCE, STATUTORY_IGNORE_CONFIDENCE,
    };
    use crate::models::{BaseField, ComponentCategory, ComponentDefinition};

    fn catalog() -> ComponentCatalog {
        ComponentCatalog::new(vec![
            ComponentDefinition::new("BASIC_SALARY", "基本工资", ComponentCategory::Earning),
            ComponentDefinition::new("PENSION_PERSONAL", "养老保险", ComponentCategory::Deduction),
            ComponentDefinition::new("PERSONAL_INCOME_TAX", "个人所得税", ComponentCategory::Deduction),
            ComponentDefinition::new("ANNUAL_TOTAL", "年度绩效累计", ComponentCategory::Statistic),
        ])
    }

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn rule<'a>(rules: &'a [FieldMappingRule], source: &str) -> &'a FieldMappingRule {
        rules.iter().find(|r| r.source_field == source).unwrap()
    }

    #[test]
    fn test_scenario_a_headers() {
        let rules = map_fields(
            &fields(&["姓名", "身份证", "应发合计", "养老保险", "个人所得税", "实发合计", "人员身份"]),
            &catalog(),
        );

        assert_eq!(rule(&rules, "姓名").target_field, TargetField::Base(BaseField::FullName));
        assert_eq!(rule(&rules, "身份证").target_field, TargetField::Base(BaseField::IdNumber));
        assert_eq!(rule(&rules, "身份证").confidence, KEYWORD_CONFIDENCE);
        assert_eq!(rule(&rules, "应发合计").target_field, TargetField::Base(BaseField::GrossPay));
        assert_eq!(rule(&rules, "应发合计").confidence, EXACT_CONFIDENCE);
        assert_eq!(
            rule(&rules, "养老保险").target_field,
            TargetField::Deduction("PENSION_PERSONAL".to_string())
        );
        assert_eq!(rule(&rules, "养老保险").confidence, COMPONENT_NAME_CONFIDENCE);
        assert_eq!(
            rule(&rules, "个人所得税").target_field,
            TargetField::Deduction("PERSONAL_INCOME_TAX".to_string())
        );
        assert_eq!(rule(&rules, "实发合计").target_field, TargetField::Base(BaseField::NetPay));
        assert_eq!(
            rule(&rules, "人员身份").target_field,
            TargetField::Base(BaseField::PersonnelIdentity)
        );
    }

    #[test]
    fn test_statutory_column_without_component_is_ignored() {
        let rules = map_fields(&fields(&["医疗保险"]), &catalog());
        assert_eq!(rules[0].target_field, TargetField::Ignore);
        assert_eq!(rules[0].confidence, STATUTORY_IGNORE_CONFIDENCE);
    }

    #[test]
    fn test_statistic_component_is_ignored_even_with_summary_word() {
        let rules = map_fields(&fields(&["年度绩效累计"]), &catalog());
        assert_eq!(rules[0].target_field, TargetField::Ignore);
        assert_eq!(rules[0].confidence, COMPONENT_NAME_CONFIDENCE);
        assert_eq!(rules[0].category, RuleCategory::Calculated);
    }

    #[test]
    fn test_aggregate_heuristics() {
        let rules = map_fields(&fields(&["本月应发数", "补贴合计"]), &ComponentCatalog::empty());
        assert_eq!(
            rule(&rules, "本月应发数").target_field,
            TargetField::Base(BaseField::GrossPay)
        );
        assert_eq!(rule(&rules, "本月应发数").confidence, AGGREGATE_CONFIDENCE);
        assert_eq!(rule(&rules, "补贴合计").target_field, TargetField::Ignore);
        assert_eq!(rule(&rules, "补贴合计").confidence, AGGREGATE_IGNORE_CONFIDENCE);
    }

    #[test]
    fn test_whitespace_insensitive_aliases() {
        let rules = map_fields(&fields(&["姓 名", " 姓名"]), &catalog());
        assert_eq!(rules.len(), 2);
        assert!(
            rules
                .iter()
                .all(|r| r.target_field == TargetField::Base(BaseField::FullName))
        );
    }

    #[test]
    fn test_duplicate_columns_resolved_once() {
        let rules = map_fields(&fields(&["姓名", "姓名"]), &catalog());
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn test_unrecognized_column_defaults_to_ignore() {
        let rules = map_fields(&fields(&["xyz"]), &catalog());
        assert_eq!(rules[0].target_field, TargetField::Ignore);
        assert_eq!(rules[0].confidence, DEFAULT_CONFIDENCE);
        assert_eq!(rules[0].category, RuleCategory::Ignore);
    }

    #[test]
    fn test_sorted_by_descending_confidence() {
        let rules = map_fields(&fields(&["xyz", "身份证", "姓名", "养老保险"]), &catalog());
        let confidences: Vec<f64> = rules.iter().map(|r| r.confidence).collect();
        let mut sorted = confidences.clone();
        sorted.sort_by(|a, b| b.total_cmp(a));
        assert_eq!(confidences, sorted);
        assert_eq!(rules[0].source_field, "姓名");
    }

    #[test]
    fn test_mapping_is_deterministic() {
        let input = fields(&["姓名", "身份证", "基本工资", "补贴合计", "xyz", "养老保险"]);
        assert_eq!(map_fields(&input, &catalog()), map_fields(&input, &catalog()));
    }

    #[test]
    fn test_empty_catalog_maps_base_fields_only() {
        let rules = map_fields(&fields(&["姓名", "基本工资"]), &ComponentCatalog::empty());
        assert_eq!(rule(&rules, "姓名").target_field, TargetField::Base(BaseField::FullName));
        assert_eq!(rule(&rules, "基本工资").target_field, TargetField::Ignore);
    }

    #[test]
    fn test_overrides_pin_target() {
        let mut overrides = MappingOverrides::new();
        overrides.insert("xyz".to_string(), TargetField::Earning("BONUS".to_string()));

        let rules = map_fields_with_overrides(&fields(&["xyz", "姓名"]), &catalog(), &overrides);
        let pinned = rule(&rules, "xyz");
        assert_eq!(pinned.target_field, TargetField::Earning("BONUS".to_string()));
        assert_eq!(pinned.confidence, MANUAL_CONFIDENCE);
        assert_eq!(pinned.category, RuleCategory::Earning);
        assert_eq!(rules[0].source_field, "xyz");
    }

    #[test]
    fn test_plan_lookup_and_ambiguity() {
        let plan = MappingPlan::new(map_fields(&fields(&["姓名", "xyz"]), &catalog()));
        assert_eq!(plan.target_for("姓名"), &TargetField::Base(BaseField::FullName));
        assert_eq!(plan.target_for("not-a-column"), &TargetField::Ignore);
        assert_eq!(plan.ambiguous_fields(0.5), vec!["xyz".to_string()]);
    }
}
