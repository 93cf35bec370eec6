//! Static label and keyword tables for the fixed entry fields.
//!
//! Labels are compared after [`normalize_field_name`]; keywords are
//! substring tests on the same normalized form.

use crate::models::BaseField;

/// Exact labels per base field, already normalized.
pub const EXACT_LABELS: &[(BaseField, &[&str])] = &[
    (
        BaseField::EmployeeCode,
        &["employee_code", "employeecode", "工号", "员工编号", "人员编号", "职工编号"],
    ),
    (BaseField::FullName, &["full_name", "fullname", "name", "姓名", "员工姓名"]),
    (BaseField::LastName, &["last_name", "lastname", "surname", "姓"]),
    (BaseField::FirstName, &["first_name", "firstname", "given_name", "名"]),
    (
        BaseField::IdNumber,
        &["id_number", "idnumber", "身份证号", "身份证号码", "证件号码"],
    ),
    (
        BaseField::PersonnelIdentity,
        &["personnel_identity", "人员身份", "人员类别", "人员类型", "身份类别"],
    ),
    (
        BaseField::GrossPay,
        &["gross_pay", "grosspay", "应发合计", "应发工资", "应发金额"],
    ),
    (
        BaseField::TotalDeductions,
        &[
            "total_deductions",
            "totaldeductions",
            "扣款合计",
            "扣发合计",
            "应扣合计",
            "代扣合计",
        ],
    ),
    (
        BaseField::NetPay,
        &["net_pay", "netpay", "实发合计", "实发工资", "实发金额"],
    ),
    (BaseField::Remarks, &["remarks", "remark", "备注"]),
    (BaseField::StatusId, &["status_id", "statusid", "状态"]),
];

/// Keyword sets per base field, evaluated top to bottom.
///
/// ID number comes before personnel identity because "身份证" contains "身份".
pub const KEYWORDS: &[(BaseField, &[&str])] = &[
    (BaseField::IdNumber, &["身份证", "证件号", "idcard", "idno"]),
    (
        BaseField::EmployeeCode,
        &["工号", "员工编号", "人员编号", "职工编号", "employee_id", "staff_no"],
    ),
    (BaseField::PersonnelIdentity, &["身份", "编制", "identity"]),
    (BaseField::LastName, &["姓氏", "family_name"]),
    (BaseField::FirstName, &["given"]),
    (
        BaseField::FullName,
        &["姓名", "名字", "fullname", "full_name", "employee_name", "staff_name"],
    ),
    (BaseField::Remarks, &["备注", "说明", "note"]),
    (BaseField::StatusId, &["状态", "status"]),
];

/// Summary words marking a column as a user-supplied total.
pub const AGGREGATE_WORDS: &[&str] = &["合计", "总计", "应发", "实发", "统计", "累计"];

/// Statutory insurance words. Such lines are normally system-computed.
pub const STATUTORY_INSURANCE_WORDS: &[&str] = &[
    "养老", "医疗", "医保", "失业", "工伤", "生育", "公积金", "职业年金", "社保",
];

/// Lowercases and strips all whitespace, including full-width spaces.
pub fn normalize_field_name(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// The base field whose exact label equals the normalized name.
pub fn exact_base_field(normalized: &str) -> Option<BaseField> {
    EXACT_LABELS
        .iter()
        .find(|(_, labels)| labels.contains(&normalized))
        .map(|(field, _)| *field)
}

/// The first base field with a keyword contained in the normalized name,
/// together with the keyword that matched.
pub fn keyword_base_field(normalized: &str) -> Option<(BaseField, &'static str)> {
    KEYWORDS.iter().find_map(|(field, words)| {
        words
            .iter()
            .find(|word| normalized.contains(*word))
            .map(|word| (*field, *word))
    })
}
