//! Inline assets transformer tests
//!
//! Rewritten metadata is checked on the syntax tree; whole-file comparisons print both
//! trees with the same code generator.

use ng_cute_devkit::transformers::inline_assets::{inline_assets, NAME, TRANSFORM_RULES, VERSION};
use oxc_allocator::Allocator;
use oxc_ast::ast::*;
use oxc_ast_visit::{walk, Visit};
use oxc_codegen::Codegen;
use oxc_parser::Parser;
use oxc_span::SourceType;

fn parse<'a>(allocator: &'a Allocator, source: &'a str) -> Program<'a> {
    let ret = Parser::new(allocator, source, SourceType::ts()).parse();
    assert!(ret.errors.is_empty(), "Parser errors: {:?}", ret.errors);
    ret.program
}

fn print(program: &Program<'_>) -> String {
    Codegen::new().build(program).code
}

/// Run the pass over `source` and print the result.
fn transform(source: &str) -> String {
    let allocator = Allocator::default();
    let program = parse(&allocator, source);
    print(&inline_assets(&allocator, &program))
}

/// Print `source` without transforming it.
fn reprint(source: &str) -> String {
    let allocator = Allocator::default();
    print(&parse(&allocator, source))
}

/// Shape of a property value, as far as these tests care.
#[derive(Debug, Clone, PartialEq)]
enum Value {
    /// `require("<path>").default`
    Require(String),
    Str(String),
    Ident(String),
    Array(Vec<Value>),
    Other,
}

fn describe_require(member: &StaticMemberExpression<'_>) -> Value {
    if member.property.name != "default" {
        return Value::Other;
    }
    let Expression::CallExpression(call) = &member.object else {
        return Value::Other;
    };
    let is_require = matches!(&call.callee, Expression::Identifier(id) if id.name == "require");
    match call.arguments.first() {
        Some(Argument::StringLiteral(path)) if is_require && call.arguments.len() == 1 => {
            Value::Require(path.value.to_string())
        }
        _ => Value::Other,
    }
}

fn describe(expr: &Expression<'_>) -> Value {
    match expr {
        Expression::StaticMemberExpression(member) => describe_require(member),
        Expression::StringLiteral(lit) => Value::Str(lit.value.to_string()),
        Expression::Identifier(id) => Value::Ident(id.name.to_string()),
        Expression::ArrayExpression(array) => Value::Array(
            array
                .elements
                .iter()
                .map(|element| match element {
                    ArrayExpressionElement::StaticMemberExpression(member) => {
                        describe_require(member)
                    }
                    ArrayExpressionElement::StringLiteral(lit) => Value::Str(lit.value.to_string()),
                    ArrayExpressionElement::Identifier(id) => Value::Ident(id.name.to_string()),
                    _ => Value::Other,
                })
                .collect(),
        ),
        _ => Value::Other,
    }
}

/// Every `identifier: value` property in the tree, in source order.
#[derive(Default)]
struct PropertyCollector {
    properties: Vec<(String, Value)>,
}

impl<'a> Visit<'a> for PropertyCollector {
    fn visit_object_property(&mut self, it: &ObjectProperty<'a>) {
        if let PropertyKey::StaticIdentifier(id) = &it.key {
            self.properties.push((id.name.to_string(), describe(&it.value)));
        }
        walk::walk_object_property(self, it);
    }
}

fn properties(program: &Program<'_>) -> Vec<(String, Value)> {
    let mut collector = PropertyCollector::default();
    collector.visit_program(program);
    collector.properties
}

fn transformed_properties(source: &str) -> Vec<(String, Value)> {
    let allocator = Allocator::default();
    let program = parse(&allocator, source);
    properties(&inline_assets(&allocator, &program))
}

fn require(path: &str) -> Value {
    Value::Require(path.to_string())
}

#[test]
fn test_non_matching_input_is_unchanged() {
    let source = r#"
        import { Component } from '@angular/core';

        @Component({
            selector: 'app-plain',
            template: '<div></div>',
            styles: ['div { color: red; }'],
        })
        export class PlainComponent {
            templateUrls = ['not', 'matched'];
            styleUrl = './single.css';
        }
    "#;

    assert_eq!(transform(source), reprint(source));
}

#[test]
fn test_template_url_identifier_is_unchanged() {
    let source = "const meta = { templateUrl: someIdentifier };";

    assert_eq!(
        transformed_properties(source),
        vec![("templateUrl".to_string(), Value::Ident("someIdentifier".to_string()))]
    );
    assert_eq!(transform(source), reprint(source));
}

#[test]
fn test_style_urls_string_is_unchanged() {
    let source = r#"const meta = { styleUrls: "not-an-array" };"#;

    assert_eq!(
        transformed_properties(source),
        vec![("styleUrls".to_string(), Value::Str("not-an-array".to_string()))]
    );
    assert_eq!(transform(source), reprint(source));
}

#[test]
fn test_other_template_url_shapes_are_unchanged() {
    let sources = [
        "const meta = { templateUrl: `./a.html` };",
        "const meta = { templateUrl: './' + name + '.html' };",
        "const meta = { templateUrl: ('./a.html') };",
        "const meta = { styleUrls: STYLES };",
        "const meta = { styleUrls: getStyles() };",
    ];

    for source in sources {
        assert_eq!(transform(source), reprint(source), "{}", source);
    }
}

#[test]
fn test_single_template_rewrite() {
    let properties = transformed_properties("const meta = { templateUrl: './a.html' };");

    assert_eq!(properties, vec![("template".to_string(), require("./a.html"))]);
}

#[test]
fn test_style_list_rewrite_with_filtering() {
    let properties =
        transformed_properties(r#"const meta = { styleUrls: ["./a.css", someExpr, "./b.css"] };"#);

    assert_eq!(
        properties,
        vec![(
            "styles".to_string(),
            Value::Array(vec![require("./a.css"), require("./b.css")])
        )]
    );
}

#[test]
fn test_style_list_drops_every_non_literal_element() {
    let properties = transformed_properties(
        "const meta = { styleUrls: [`./t.css`, , ...more, './ok.css', 42, other.css] };",
    );

    assert_eq!(
        properties,
        vec![("styles".to_string(), Value::Array(vec![require("./ok.css")]))]
    );
}

#[test]
fn test_empty_style_list() {
    let properties = transformed_properties("const meta = { styleUrls: [] };");

    assert_eq!(properties, vec![("styles".to_string(), Value::Array(vec![]))]);
}

#[test]
fn test_component_decorator_rewrite() {
    let source = r#"
        import { Component } from '@angular/core';

        @Component({
            selector: 'app-image',
            templateUrl: './image.component.html',
            styleUrls: ['./image.component.css', './theme.css'],
        })
        export class ImageComponent {
            constructor() {}
        }
    "#;
    let expected = r#"
        import { Component } from '@angular/core';

        @Component({
            selector: 'app-image',
            template: require('./image.component.html').default,
            styles: [require('./image.component.css').default, require('./theme.css').default],
        })
        export class ImageComponent {
            constructor() {}
        }
    "#;

    assert_eq!(transform(source), reprint(expected));
    assert_eq!(
        transformed_properties(source),
        vec![
            ("selector".to_string(), Value::Str("app-image".to_string())),
            ("template".to_string(), require("./image.component.html")),
            (
                "styles".to_string(),
                Value::Array(vec![require("./image.component.css"), require("./theme.css")])
            ),
        ]
    );
}

#[test]
fn test_depth_independence() {
    let source = r#"
        export function setup() {
            return wrap({
                outer: {
                    middle: [{ inner: { templateUrl: './deep.html', keep: 1 } }],
                },
                sibling: 'untouched',
            });
        }
        const top = { templateUrl: './deep.html' };
    "#;
    let expected = r#"
        export function setup() {
            return wrap({
                outer: {
                    middle: [{ inner: { template: require('./deep.html').default, keep: 1 } }],
                },
                sibling: 'untouched',
            });
        }
        const top = { template: require('./deep.html').default };
    "#;

    assert_eq!(transform(source), reprint(expected));

    let properties = transformed_properties(source);
    let templates: Vec<_> = properties
        .iter()
        .filter(|(name, _)| name == "template")
        .map(|(_, value)| value.clone())
        .collect();
    assert_eq!(templates, vec![require("./deep.html"), require("./deep.html")]);
}

#[test]
fn test_descends_into_skipped_property() {
    let source = "const meta = { templateUrl: { nested: { templateUrl: './x.html' } } };";
    let expected = "const meta = { templateUrl: { nested: { template: require('./x.html').default } } };";

    assert_eq!(transform(source), reprint(expected));
}

#[test]
fn test_non_identifier_keys_are_unchanged() {
    let source = r#"
        const templateUrl = './b.html';
        const a = { 'templateUrl': './a.html' };
        const b = { ['styleUrls']: ['./a.css'] };
        const c = { [templateUrl]: './a.html' };
        const d = { templateUrl };
        const e = { templateUrl() { return './a.html'; } };
        const f = { get styleUrls() { return ['./a.css']; } };
    "#;

    assert_eq!(transform(source), reprint(source));
}

#[test]
fn test_class_fields_are_not_property_assignments() {
    let source = "class A { templateUrl = './a.html'; static styleUrls = ['./a.css']; }";

    assert_eq!(transform(source), reprint(source));
}

#[test]
fn test_determinism() {
    let source = r#"
        @Component({ templateUrl: './a.html', styleUrls: ['./a.css', x, './b.css'] })
        class A {}
    "#;

    let allocator = Allocator::default();
    let program = parse(&allocator, source);
    let first = inline_assets(&allocator, &program);
    let second = inline_assets(&allocator, &program);

    assert_eq!(print(&first), print(&second));
    assert_eq!(properties(&first), properties(&second));
    assert_eq!(transform(source), transform(source));
}

#[test]
fn test_input_is_not_mutated() {
    let source = r#"
        @Component({ templateUrl: './a.html', styleUrls: ['./a.css'] })
        class A {}
    "#;

    let allocator = Allocator::default();
    let program = parse(&allocator, source);
    let before = properties(&program);
    let _ = inline_assets(&allocator, &program);

    assert_eq!(properties(&program), before);
    assert_eq!(print(&program), reprint(source));
}

#[test]
fn test_identity_constants() {
    assert_eq!(NAME, "inline-assets-transformer");
    assert_eq!(VERSION, 1);
    assert_eq!(
        TRANSFORM_RULES
            .iter()
            .map(|rule| (rule.source_name, rule.target_name))
            .collect::<Vec<_>>(),
        vec![("templateUrl", "template"), ("styleUrls", "styles")]
    );
}
