//! Inline assets transformer
//!
//! Rewrites component metadata so it no longer points at external resource files:
//! - `templateUrl: './a.html'` becomes `template: require('./a.html').default`
//! - `styleUrls: ['./a.css']` becomes `styles: [require('./a.css').default]`
//!
//! Test runners cannot resolve `templateUrl`/`styleUrls` the way a bundler does, so the
//! resources are loaded eagerly by the module loader instead. Any matching property
//! anywhere in the file is rewritten, not only the ones inside `@Component(...)`.

use oxc_allocator::{Allocator, CloneIn};
use oxc_ast::ast::*;
use oxc_ast::AstBuilder;
use oxc_ast_visit::{walk_mut, VisitMut};
use oxc_span::{GetSpan, SPAN};

use super::api::AstTransformer;

/// Component decorator property holding the template path.
pub const TEMPLATE_URL: &str = "templateUrl";
/// Component decorator property holding the style paths.
pub const STYLE_URLS: &str = "styleUrls";
/// Component decorator property holding the inline template.
pub const TEMPLATE: &str = "template";
/// Component decorator property holding the inline styles.
pub const STYLES: &str = "styles";

const REQUIRE: &str = "require";
const EXPORT_DEFAULT: &str = "default";

/// Stable name of this pass, used by hosts to key cached output.
pub const NAME: &str = "inline-assets-transformer";

/// Increment this each time the rewrite rules change.
pub const VERSION: u32 = 1;

/// How the value of a matched property is rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueRewrite {
    /// The value must be a string literal path.
    Single,
    /// The value must be an array literal; each string literal element is rewritten
    /// and every other element is dropped.
    ElementWise,
}

/// A single entry of the rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformRule {
    pub source_name: &'static str,
    pub target_name: &'static str,
    pub rewrite: ValueRewrite,
}

/// Property names anywhere in a component source to transform.
pub const TRANSFORM_RULES: &[TransformRule] = &[
    TransformRule {
        source_name: TEMPLATE_URL,
        target_name: TEMPLATE,
        rewrite: ValueRewrite::Single,
    },
    TransformRule {
        source_name: STYLE_URLS,
        target_name: STYLES,
        rewrite: ValueRewrite::ElementWise,
    },
];

/// Look up the rule for a property name.
pub fn find_rule(name: &str) -> Option<&'static TransformRule> {
    TRANSFORM_RULES.iter().find(|rule| rule.source_name == name)
}

/// Returns the rule that applies to `prop`, if it is a plain `name: value` assignment
/// whose identifier key is in the rule table.
///
/// Quoted keys, computed keys, shorthand properties, accessors and methods never match.
pub fn rule_for_property(prop: &ObjectProperty<'_>) -> Option<&'static TransformRule> {
    if prop.kind != PropertyKind::Init || prop.method || prop.shorthand || prop.computed {
        return None;
    }
    match &prop.key {
        PropertyKey::StaticIdentifier(id) => find_rule(id.name.as_str()),
        _ => None,
    }
}

/// Run the pass over `program` and return the rewritten tree.
///
/// The input is left untouched: it is cloned into `allocator` first and only the clone
/// is rewritten.
pub fn inline_assets<'a>(allocator: &'a Allocator, program: &Program<'a>) -> Program<'a> {
    let mut output = program.clone_in(allocator);
    InlineAssetsVisitor::new(allocator).visit_program(&mut output);
    output
}

/// [`AstTransformer`] handle for the inline assets pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineAssetsTransformer;

impl AstTransformer for InlineAssetsTransformer {
    fn name(&self) -> &'static str {
        NAME
    }

    fn version(&self) -> u32 {
        VERSION
    }

    fn transform<'a>(&self, allocator: &'a Allocator, program: &Program<'a>) -> Program<'a> {
        inline_assets(allocator, program)
    }
}

struct InlineAssetsVisitor<'a> {
    ast: AstBuilder<'a>,
}

impl<'a> InlineAssetsVisitor<'a> {
    fn new(allocator: &'a Allocator) -> Self {
        Self {
            ast: AstBuilder::new(allocator),
        }
    }

    /// Rewrite the key and value of a matched property in place.
    /// Leaves the property alone when the value has an unexpected shape.
    fn transform_property(&self, rule: &TransformRule, prop: &mut ObjectProperty<'a>) {
        let value = match (rule.rewrite, &prop.value) {
            (ValueRewrite::Single, Expression::StringLiteral(literal)) => {
                Some(self.create_default_require_call(literal))
            }
            (ValueRewrite::ElementWise, Expression::ArrayExpression(array)) => {
                Some(self.create_require_array(array))
            }
            _ => None,
        };

        if let Some(value) = value {
            prop.key = self
                .ast
                .property_key_static_identifier(prop.key.span(), rule.target_name);
            prop.value = value;
        }
    }

    /// `require(<literal>).default`
    fn create_default_require_call(&self, literal: &StringLiteral<'a>) -> Expression<'a> {
        let callee = Expression::Identifier(
            self.ast
                .alloc(self.ast.identifier_reference(SPAN, REQUIRE)),
        );
        let arguments = self.ast.vec1(Argument::StringLiteral(
            self.ast.alloc(literal.clone_in(self.ast.allocator)),
        ));
        let call = self.ast.call_expression(
            literal.span,
            callee,
            None::<oxc_allocator::Box<TSTypeParameterInstantiation>>,
            arguments,
            false,
        );

        self.ast
            .member_expression_static(
                literal.span,
                Expression::CallExpression(self.ast.alloc(call)),
                self.ast.identifier_name(SPAN, EXPORT_DEFAULT),
                false,
            )
            .into()
    }

    fn create_require_array(&self, array: &ArrayExpression<'a>) -> Expression<'a> {
        let elements = oxc_allocator::Vec::from_iter_in(
            array.elements.iter().filter_map(|element| match element {
                ArrayExpressionElement::StringLiteral(literal) => Some(
                    ArrayExpressionElement::from(self.create_default_require_call(literal)),
                ),
                _ => None,
            }),
            self.ast.allocator,
        );

        Expression::ArrayExpression(
            self.ast
                .alloc(self.ast.array_expression(array.span, elements)),
        )
    }
}

impl<'a> VisitMut<'a> for InlineAssetsVisitor<'a> {
    fn visit_object_property(&mut self, it: &mut ObjectProperty<'a>) {
        if let Some(rule) = rule_for_property(it) {
            self.transform_property(rule, it);
        }

        // look for matching assignments inside the (possibly rewritten) node too
        walk_mut::walk_object_property(self, it);
    }
}
