// Shape Diagnostics
//
// Reports the properties the inline assets pass skips because their value does not
// have the shape it can rewrite. The pass itself never reports anything; this lint
// only backs the opt-in strict mode of the pipeline.

use std::fmt;

use oxc_ast::ast::*;
use oxc_ast_visit::{walk, Visit};
use oxc_span::{GetSpan, Span};

use super::inline_assets::{rule_for_property, ValueRewrite};

/// Why a matched property (or one of its elements) is not inlined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MismatchKind {
    /// `templateUrl` whose value is not a string literal.
    NotStringLiteral,
    /// `styleUrls` whose value is not an array literal.
    NotArrayLiteral,
    /// A `styleUrls` element that is not a string literal and gets dropped.
    DroppedElement,
}

/// A single skipped property or element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeMismatch {
    pub property: &'static str,
    pub kind: MismatchKind,
    pub span: Span,
}

impl ShapeMismatch {
    /// 1-based line and column of the mismatch inside `source`. Offsets past the end or
    /// inside a character are moved back to the closest character boundary.
    pub fn location(&self, source: &str) -> (usize, usize) {
        let mut offset = (self.span.start as usize).min(source.len());
        while !source.is_char_boundary(offset) {
            offset -= 1;
        }
        let before = &source[..offset];
        let line = before.matches('\n').count() + 1;
        let column = match before.rfind('\n') {
            Some(idx) => before[idx + 1..].chars().count() + 1,
            None => before.chars().count() + 1,
        };
        (line, column)
    }

    /// `path:line:column: message`
    pub fn format(&self, path: &str, source: &str) -> String {
        let (line, column) = self.location(source);
        format!("{}:{}:{}: {}", path, line, column, self)
    }
}

impl fmt::Display for ShapeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            MismatchKind::NotStringLiteral => {
                write!(f, "`{}` is not a string literal and will not be inlined", self.property)
            }
            MismatchKind::NotArrayLiteral => {
                write!(f, "`{}` is not an array literal and will not be inlined", self.property)
            }
            MismatchKind::DroppedElement => write!(
                f,
                "element of `{}` is not a string literal and will be dropped",
                self.property
            ),
        }
    }
}

/// Collect every shape mismatch in `program`, in source order.
pub fn find_shape_mismatches(program: &Program<'_>) -> Vec<ShapeMismatch> {
    let mut collector = MismatchCollector::default();
    collector.visit_program(program);
    collector.mismatches
}

#[derive(Default)]
struct MismatchCollector {
    mismatches: Vec<ShapeMismatch>,
}

impl MismatchCollector {
    fn check_property(&mut self, prop: &ObjectProperty<'_>) {
        let Some(rule) = rule_for_property(prop) else {
            return;
        };

        match (rule.rewrite, &prop.value) {
            (ValueRewrite::Single, Expression::StringLiteral(_)) => {}
            (ValueRewrite::Single, value) => self.mismatches.push(ShapeMismatch {
                property: rule.source_name,
                kind: MismatchKind::NotStringLiteral,
                span: value.span(),
            }),
            (ValueRewrite::ElementWise, Expression::ArrayExpression(array)) => {
                for element in &array.elements {
                    if !matches!(element, ArrayExpressionElement::StringLiteral(_)) {
                        self.mismatches.push(ShapeMismatch {
                            property: rule.source_name,
                            kind: MismatchKind::DroppedElement,
                            span: element.span(),
                        });
                    }
                }
            }
            (ValueRewrite::ElementWise, value) => self.mismatches.push(ShapeMismatch {
                property: rule.source_name,
                kind: MismatchKind::NotArrayLiteral,
                span: value.span(),
            }),
        }
    }
}

impl<'a> Visit<'a> for MismatchCollector {
    fn visit_object_property(&mut self, it: &ObjectProperty<'a>) {
        self.check_property(it);
        walk::walk_object_property(self, it);
    }
}
