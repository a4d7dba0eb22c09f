use crate::compiler::compile_node;
use crate::context::CompilerContext;
use crate::node::{Attribute, AttributeValue};
use crate::path::Path;
use marionette_common::{Diagnostic, DiagnosticKind};
use serde_json::{Number, Value};

/// Render one attribute in its markup form.
///
/// Returns an empty string when the attribute has no form; component-reference
/// attributes that cannot be evaluated also record a diagnostic. `level` is
/// the indentation of the attribute's own line, used to align the closing
/// brace of nested nodes. `path` locates the owning node.
pub fn serialize_attribute(
    attribute: &Attribute,
    ctx: &mut CompilerContext,
    level: usize,
    path: &Path,
) -> String {
    let name = attribute.name.as_str();

    match &attribute.value {
        AttributeValue::ComponentRef(component) if ctx.registry().contains(component) => {
            format!("{}={{{}}}", name, component)
        }
        AttributeValue::ComponentRef(_) | AttributeValue::Unevaluable => {
            report_unevaluable(ctx, name, path);
            String::new()
        }
        AttributeValue::NestedNode(node) => {
            let inner = compile_node(node, ctx, level + 1, &path.child(name));
            if inner.is_empty() {
                // compile_node already reported the missing component
                return String::new();
            }
            format!("{}={{\n{}\n{}}}", name, inner, ctx.indentation(level))
        }
        AttributeValue::Boolean(true) => name.to_string(),
        AttributeValue::Boolean(false) => format!("{}={{false}}", name),
        AttributeValue::Number(number) => format!("{}={{{}}}", name, number_literal(number)),
        AttributeValue::Null => format!("{}={{null}}", name),
        AttributeValue::PlainObject(map) => {
            format!("{}={{{}}}", name, Value::Object(map.clone()))
        }
        AttributeValue::String(text) => format!("{}=\"{}\"", name, escape(text)),
        AttributeValue::Unsupported => String::new(),
    }
}

fn report_unevaluable(ctx: &mut CompilerContext, name: &str, path: &Path) {
    ctx.report(
        Diagnostic::warning(
            DiagnosticKind::UnevaluableAttribute,
            format!("Unable to evaluate element prop `{}`", name),
        )
        .at(path.to_string()),
    );
}

/// Whole floats print without a fraction, so `1.0` is written as `1`
fn number_literal(number: &Number) -> String {
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

    match number.as_f64() {
        Some(float)
            if number.is_f64() && float.fract() == 0.0 && float.abs() <= MAX_SAFE_INTEGER =>
        {
            format!("{}", float as i64)
        }
        _ => number.to_string(),
    }
}

/// Escape text for a double-quoted attribute value
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\u{2028}' => escaped.push_str("\\u2028"),
            '\u{2029}' => escaped.push_str("\\u2029"),
            c => escaped.push(c),
        }
    }
    escaped
}
