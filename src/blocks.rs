use std::collections::{BTreeMap, HashMap};

use crate::config::{CategoryConfig, FieldEntry};
use crate::error::Error;
use crate::labels::LabelResolver;
use crate::model::{FieldValue, Line, PassFail, Record, Section, field_value};

const PASS_SUFFIX: &str = "_pass";
const COMMENT_SUFFIX: &str = "_comment";

pub const NO_DATA_KEY: &str = "pdf.assessments.no_data";
pub const YES_KEY: &str = "shared.yes";
pub const NO_KEY: &str = "shared.no";

/// The fields that together make up one displayed line: the base value, its
/// pass/fail status and its free-text comment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub base: String,
    pub value_field: Option<String>,
    pub pass_field: Option<String>,
    pub comment_field: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GroupedEntry {
    Header(String),
    Field(FieldDescriptor),
}

/// Strip a `_pass` or `_comment` suffix.
pub fn base_name(field: &str) -> &str {
    field
        .strip_suffix(PASS_SUFFIX)
        .or_else(|| field.strip_suffix(COMMENT_SUFFIX))
        .filter(|base| !base.is_empty())
        .unwrap_or(field)
}

/// Group field names by base name. Groups keep the position of their first
/// member; sub-headers keep their own position.
pub fn group_fields(entries: &[FieldEntry]) -> Vec<GroupedEntry> {
    let mut grouped: Vec<GroupedEntry> = Vec::new();
    let mut index_of: HashMap<String, usize> = HashMap::new();

    for entry in entries {
        let name = match entry {
            FieldEntry::Header { header } => {
                grouped.push(GroupedEntry::Header(header.clone()));
                continue;
            }
            FieldEntry::Field(name) => name,
        };
        let base = base_name(name);
        let idx = *index_of.entry(base.to_string()).or_insert_with(|| {
            grouped.push(GroupedEntry::Field(FieldDescriptor {
                base: base.to_string(),
                ..FieldDescriptor::default()
            }));
            grouped.len() - 1
        });
        let GroupedEntry::Field(desc) = &mut grouped[idx] else {
            continue;
        };
        if name.len() > base.len() && name.ends_with(PASS_SUFFIX) {
            desc.pass_field = Some(name.clone());
        } else if name.len() > base.len() && name.ends_with(COMMENT_SUFFIX) {
            desc.comment_field = Some(name.clone());
        } else {
            desc.value_field = Some(name.clone());
        }
    }
    grouped
}

/// Build one Section per configured category, in configured order.
/// Categories without a record still produce a placeholder Section.
pub fn build_sections(
    categories: &[CategoryConfig],
    assessments: &BTreeMap<String, Record>,
    labels: &dyn LabelResolver,
) -> Result<Vec<Section>, Error> {
    for key in assessments.keys() {
        if !categories.iter().any(|c| &c.key == key) {
            log::debug!("assessment '{key}' has no category config, skipping");
        }
    }
    categories
        .iter()
        .map(|cat| build_section(cat, assessments.get(&cat.key), labels))
        .collect()
}

pub fn build_section(
    category: &CategoryConfig,
    record: Option<&Record>,
    labels: &dyn LabelResolver,
) -> Result<Section, Error> {
    let title = labels.translate(&format!("{}.title", category.key))?;
    let mut lines: Vec<Line> = Vec::new();

    if let Some(record) = record {
        let mut pending_header: Option<String> = None;
        for entry in group_fields(&category.fields) {
            match entry {
                GroupedEntry::Header(key) => {
                    pending_header = Some(labels.translate(&key)?);
                }
                GroupedEntry::Field(desc) => {
                    let field_lines = lines_for_field(&category.key, &desc, record, labels)?;
                    if field_lines.is_empty() {
                        continue;
                    }
                    if let Some(header) = pending_header.take() {
                        lines.push(Line::header(header));
                    }
                    lines.extend(field_lines);
                }
            }
        }
    }

    if lines.is_empty() {
        lines.push(Line::placeholder(labels.translate(NO_DATA_KEY)?));
    }

    Ok(Section { title, lines })
}

fn lines_for_field(
    category: &str,
    desc: &FieldDescriptor,
    record: &Record,
    labels: &dyn LabelResolver,
) -> Result<Vec<Line>, Error> {
    let base_value = lookup(record, desc.value_field.as_deref());
    let pass_value = lookup(record, desc.pass_field.as_deref());
    let pass_fail = desc.pass_field.as_deref().map(|f| {
        PassFail::from_value(record.get(f).and_then(Option::as_ref))
    });

    let mut out = Vec::new();
    if base_value.is_some() || pass_value.is_some() {
        let label = labels.translate(&format!("{category}.fields.{}", desc.base))?;
        match (base_value, pass_value) {
            (Some(value), _) => {
                out.push(Line::value(
                    Some(label),
                    Some(display_value(value, labels)?),
                    pass_fail,
                ));
            }
            (None, Some(value)) => {
                let status = PassFail::from_value(Some(value));
                out.push(Line::status(label, status_text(status).to_string(), status));
            }
            (None, None) => {}
        }
    }

    if let Some(comment) = lookup(record, desc.comment_field.as_deref()) {
        out.push(Line::comment(raw_text(comment)));
    }
    Ok(out)
}

fn lookup<'a>(record: &'a Record, field: Option<&str>) -> Option<&'a FieldValue> {
    field.and_then(|f| field_value(record, f))
}

fn status_text(status: PassFail) -> &'static str {
    match status {
        PassFail::Pass => "pass",
        PassFail::Fail => "fail",
        PassFail::NotApplicable => "n/a",
    }
}

fn display_value(value: &FieldValue, labels: &dyn LabelResolver) -> Result<String, Error> {
    match value {
        FieldValue::Bool(true) => labels.translate(YES_KEY),
        FieldValue::Bool(false) => labels.translate(NO_KEY),
        other => Ok(raw_text(other)),
    }
}

fn raw_text(value: &FieldValue) -> String {
    match value {
        FieldValue::Bool(b) => b.to_string(),
        FieldValue::Integer(i) => i.to_string(),
        FieldValue::Float(f) => f.to_string(),
        FieldValue::Text(s) => s.trim().to_string(),
    }
}
