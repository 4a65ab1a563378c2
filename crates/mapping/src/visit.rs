//! Static traversal of field tables.
//!
//! Used for table sanity checks and for enriching descriptions from field
//! metadata.

use std::collections::BTreeSet;

use crate::error::SpecDefect;
use crate::path::join;
use crate::spec::{Discriminator, FieldKind, FieldSpec};

/// Visitor over a field table.
pub trait FieldVisitor {
    /// Called once for every sibling group, before its fields.
    fn visit_siblings(&mut self, _parent: &str, _fields: &[FieldSpec]) {}

    /// Called for every field, parents before children.
    fn visit_field(&mut self, _path: &str, _field: &FieldSpec) {}
}

/// Walk `fields` depth first.
pub fn walk<V: FieldVisitor + ?Sized>(fields: &[FieldSpec], visitor: &mut V) {
    walk_at("", fields, visitor);
}

fn walk_at<V: FieldVisitor + ?Sized>(parent: &str, fields: &[FieldSpec], visitor: &mut V) {
    visitor.visit_siblings(parent, fields);
    for field in fields {
        let path = join(parent, field.config_key);
        visitor.visit_field(&path, field);
        let children = field.children();
        if !children.is_empty() {
            walk_at(&path, children, visitor);
        }
    }
}

/// Description of `field` with its valid values and default appended.
#[must_use]
pub fn describe(field: &FieldSpec) -> String {
    let mut out = field.description.to_string();
    if !field.valid_values.is_empty() {
        let values = field
            .valid_values
            .iter()
            .map(|v| format!("`{v}`"))
            .collect::<Vec<_>>()
            .join(", ");
        push_sentence(&mut out, &format!("Valid values are {values}."));
    }
    if let Some(default) = field.default {
        push_sentence(&mut out, &format!("Defaults to `{}`.", default.render()));
    }
    out
}

fn push_sentence(out: &mut String, sentence: &str) {
    if !out.is_empty() {
        out.push(' ');
    }
    out.push_str(sentence);
}

/// Collects every defect in a table.
#[derive(Debug, Default)]
struct DefectCollector {
    defects: Vec<SpecDefect>,
}

impl FieldVisitor for DefectCollector {
    fn visit_siblings(&mut self, parent: &str, fields: &[FieldSpec]) {
        let mut seen = BTreeSet::new();
        for field in fields {
            if !seen.insert(field.config_key) {
                self.defects.push(SpecDefect::DuplicateKey {
                    parent: parent.to_string(),
                    key: field.config_key,
                });
            }
        }
    }

    fn visit_field(&mut self, path: &str, field: &FieldSpec) {
        if field.field_type().is_nested() && field.children().is_empty() {
            self.defects.push(SpecDefect::EmptyChildren {
                field: path.to_string(),
            });
        }
        let FieldKind::OneOf { children, .. } = field.kind else {
            for child in field.children().iter().filter(|c| c.is_variant()) {
                self.defects.push(SpecDefect::StrayDiscriminator {
                    field: join(path, child.config_key),
                });
            }
            return;
        };

        let variants: Vec<&FieldSpec> = children.iter().filter(|c| c.is_variant()).collect();
        if variants.is_empty() {
            self.defects.push(SpecDefect::NoVariants {
                field: path.to_string(),
            });
        }
        let defaults = variants
            .iter()
            .filter(|v| v.variant == Some(Discriminator::Default))
            .count();
        if defaults > 1 {
            self.defects.push(SpecDefect::MultipleDefaultVariants {
                field: path.to_string(),
            });
        }
        let mut exact = BTreeSet::new();
        for variant in &variants {
            if !matches!(variant.kind, FieldKind::Block(_)) {
                self.defects.push(SpecDefect::NonBlockVariant {
                    field: path.to_string(),
                    variant: variant.config_key,
                });
            }
            if let Some(Discriminator::Exact(value)) = variant.variant {
                if !exact.insert(value) {
                    self.defects.push(SpecDefect::ConflictingDiscriminators {
                        field: path.to_string(),
                        value,
                    });
                }
            }
        }
    }
}

/// Every defect in `fields`.
#[must_use]
pub fn check_fields(fields: &[FieldSpec]) -> Vec<SpecDefect> {
    let mut collector = DefectCollector::default();
    walk(fields, &mut collector);
    for field in fields.iter().filter(|f| f.is_variant()) {
        collector.defects.push(SpecDefect::StrayDiscriminator {
            field: field.config_key.to_string(),
        });
    }
    collector.defects
}

/// Panic on the first defect in `fields`.
///
/// # Panics
///
/// When the table is malformed. Tables are static, so this is a programming
/// error that shows up the first time the table is used in a test.
#[allow(clippy::panic)]
pub fn assert_valid_fields(fields: &[FieldSpec]) {
    if let Some(defect) = check_fields(fields).into_iter().next() {
        panic!("invalid field table: {defect}");
    }
}
