//! Draft construction from one raw record.

use rust_decimal::Decimal;
use serde_json::Value;
use tracing::debug;

use crate::catalog::ComponentCatalog;
use crate::ingest::{DEDUCTIONS_DETAILS_KEY, EARNINGS_DETAILS_KEY};
use crate::mapping::MappingPlan;
use crate::models::{BaseField, LineItem, PayrollEntryDraft, RawRecord, TargetField};

use super::amount::{ParsedAmount, coerce_amount, parse_amount};
use super::name::{compose_full_name, split_full_name};
use super::personnel::classify_personnel;

#[derive(Debug, Clone, Copy)]
enum LineKind {
    Earning,
    Deduction,
}

/// Source-supplied aggregates. `None` means the column was absent or blank.
#[derive(Debug, Default)]
struct SourceAggregates {
    gross_pay: Option<Decimal>,
    total_deductions: Option<Decimal>,
    net_pay: Option<Decimal>,
}

impl SourceAggregates {
    fn slot(&mut self, field: BaseField) -> Option<&mut Option<Decimal>> {
        match field {
            BaseField::GrossPay => Some(&mut self.gross_pay),
            BaseField::TotalDeductions => Some(&mut self.total_deductions),
            BaseField::NetPay => Some(&mut self.net_pay),
            _ => None,
        }
    }
}

/// Builds a canonical draft from one raw record.
///
/// Every column is routed through `plan`; nested `earnings_details` /
/// `deductions_details` objects are folded in by component code. Earnings
/// that come to exactly zero are dropped, deductions are always kept.
/// Aggregates prefer non-zero source values and are derived otherwise.
pub fn build_draft(
    record: &RawRecord,
    plan: &MappingPlan,
    catalog: &ComponentCatalog,
    original_index: usize,
) -> PayrollEntryDraft {
    let mut draft = PayrollEntryDraft::empty(original_index);
    let mut aggregates = SourceAggregates::default();
    let mut identity = String::new();

    for (key, value) in record {
        if key == EARNINGS_DETAILS_KEY {
            fold_details(&mut draft, LineKind::Earning, value, catalog);
            continue;
        }
        if key == DEDUCTIONS_DETAILS_KEY {
            fold_details(&mut draft, LineKind::Deduction, value, catalog);
            continue;
        }

        match plan.target_for(key) {
            TargetField::Ignore => {}
            TargetField::Earning(code) => {
                let name = catalog.name_of(code).unwrap_or(key);
                add_line(&mut draft, LineKind::Earning, code, coerce_amount(value), name);
            }
            TargetField::Deduction(code) => {
                let name = catalog.name_of(code).unwrap_or(key);
                add_line(&mut draft, LineKind::Deduction, code, coerce_amount(value), name);
            }
            TargetField::Base(field) if field.is_aggregate() => {
                apply_aggregate(&mut draft, &mut aggregates, *field, value);
            }
            TargetField::Base(field) => {
                if let Some(text) = text_of(value) {
                    apply_text(&mut draft, &mut identity, *field, text);
                }
            }
        }
    }

    draft.earnings.retain(|_, item| !item.amount.is_zero());
    fill_names(&mut draft);
    draft.personnel_type = classify_personnel(&identity);
    derive_aggregates(&mut draft, &aggregates, catalog);

    debug!(
        row = original_index,
        personnel_type = ?draft.personnel_type,
        earnings = draft.earnings.len(),
        deductions = draft.deductions.len(),
        gross_pay = %draft.gross_pay,
        net_pay = %draft.net_pay,
        "Built payroll entry draft"
    );
    draft
}

/// Builds one draft per record, preserving source order.
pub fn build_drafts(
    records: &[RawRecord],
    plan: &MappingPlan,
    catalog: &ComponentCatalog,
) -> Vec<PayrollEntryDraft> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| build_draft(record, plan, catalog, index))
        .collect()
}

fn add_line(draft: &mut PayrollEntryDraft, kind: LineKind, code: &str, amount: Decimal, name: &str) {
    let lines = match kind {
        LineKind::Earning => &mut draft.earnings,
        LineKind::Deduction => &mut draft.deductions,
    };
    lines
        .entry(code.to_string())
        .and_modify(|item| item.amount += amount)
        .or_insert_with(|| LineItem::new(amount, name));
}

/// Folds a nested `{code: amount}` or `{code: {amount, name}}` object.
fn fold_details(
    draft: &mut PayrollEntryDraft,
    kind: LineKind,
    details: &Value,
    catalog: &ComponentCatalog,
) {
    let Value::Object(entries) = details else {
        return;
    };

    for (code, entry) in entries {
        let (amount, supplied_name) = match entry {
            Value::Object(fields) => (
                fields.get("amount").map(coerce_amount).unwrap_or(Decimal::ZERO),
                fields
                    .get("name")
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|name| !name.is_empty()),
            ),
            other => (coerce_amount(other), None),
        };
        let name = supplied_name
            .or_else(|| catalog.name_of(code))
            .unwrap_or(code);
        add_line(draft, kind, code, amount, name);
    }
}

fn apply_aggregate(
    draft: &mut PayrollEntryDraft,
    aggregates: &mut SourceAggregates,
    field: BaseField,
    value: &Value,
) {
    let amount = match parse_amount(value) {
        ParsedAmount::Value(amount) => amount,
        ParsedAmount::Blank => return,
        ParsedAmount::Unparseable => {
            if !draft.unparsed_fields.contains(&field) {
                draft.unparsed_fields.push(field);
            }
            Decimal::ZERO
        }
    };

    if let Some(slot) = aggregates.slot(field) {
        // A later non-zero column replaces an earlier zero one.
        if slot.is_none_or(|current| current.is_zero()) {
            *slot = Some(amount);
        }
    }
}

fn apply_text(draft: &mut PayrollEntryDraft, identity: &mut String, field: BaseField, text: String) {
    fn set_once(slot: &mut String, text: String) {
        if slot.is_empty() {
            *slot = text;
        }
    }

    match field {
        BaseField::EmployeeCode => {
            draft.employee_code.get_or_insert(text);
        }
        BaseField::FullName => set_once(&mut draft.full_name, text),
        BaseField::LastName => set_once(&mut draft.last_name, text),
        BaseField::FirstName => set_once(&mut draft.first_name, text),
        BaseField::IdNumber => set_once(&mut draft.id_number, text),
        BaseField::PersonnelIdentity => set_once(identity, text),
        BaseField::Remarks => {
            draft.remarks.get_or_insert(text);
        }
        BaseField::StatusId => {
            draft.status_id.get_or_insert(text);
        }
        BaseField::GrossPay | BaseField::TotalDeductions | BaseField::NetPay => {}
    }
}

fn text_of(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn fill_names(draft: &mut PayrollEntryDraft) {
    let has_parts = !draft.last_name.is_empty() || !draft.first_name.is_empty();
    if !draft.full_name.is_empty() && !has_parts {
        let (last, first) = split_full_name(&draft.full_name);
        draft.last_name = last;
        draft.first_name = first;
    } else if draft.full_name.is_empty() && has_parts {
        draft.full_name = compose_full_name(&draft.last_name, &draft.first_name);
    }
}

fn derive_aggregates(
    draft: &mut PayrollEntryDraft,
    aggregates: &SourceAggregates,
    catalog: &ComponentCatalog,
) {
    let supplied = |value: Option<Decimal>| value.filter(|amount| !amount.is_zero());

    draft.gross_pay = supplied(aggregates.gross_pay).unwrap_or_else(|| {
        draft
            .earnings
            .iter()
            .filter(|(code, _)| !catalog.is_derived(code))
            .map(|(_, item)| item.amount)
            .sum()
    });
    draft.total_deductions =
        supplied(aggregates.total_deductions).unwrap_or_else(|| draft.deductions_sum());
    draft.net_pay =
        supplied(aggregates.net_pay).unwrap_or(draft.gross_pay - draft.total_deductions);
}
