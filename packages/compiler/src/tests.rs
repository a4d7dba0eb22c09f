use crate::{
    build_markup, compile, CompileOptions, DiagnosticKind, HostComponent, NodeDefinition,
    Registry, ROOT_ADAPTER_NAME,
};
use serde_json::{json, Map, Value};

fn compile_tree(tree: Value, registry: Registry) -> crate::CompiledMarkup {
    let registry = registry.flatten().expect("registry should flatten");
    compile(
        &NodeDefinition::from_value(&tree),
        &registry,
        &CompileOptions::default(),
    )
}

#[test]
fn test_self_closing_without_attributes() {
    let result = compile_tree(json!({ "_": "Box" }), Registry::new().with_host("Box"));

    assert_eq!(result.markup, "<Box/>");
    assert!(result.diagnostics.is_empty());
}

#[test]
fn test_attributes_one_per_line() {
    let result = compile_tree(
        json!({ "_": "Box", "padding": true, "visible": false, "title": "Hi \"there\"" }),
        Registry::new().with_host("Box"),
    );

    assert_eq!(
        result.markup,
        "<Box\n  padding\n  visible={false}\n  title=\"Hi \\\"there\\\"\"\n/>"
    );
}

#[test]
fn test_container_with_nested_children() {
    let tree = json!({
        "_": "List",
        "gap": 4,
        "$": [
            { "_": "Item", "$": [{ "_": "Text", "value": "a" }] },
            { "_": "Item" }
        ]
    });
    let registry = Registry::new()
        .with_host("List")
        .with_host("Item")
        .with_host("Text");

    let result = compile_tree(tree, registry);

    let expected = [
        "<List",
        "  gap={4}",
        ">",
        "  <Item>",
        "    <Text",
        "      value=\"a\"",
        "    />",
        "  </Item>",
        "  <Item/>",
        "</List>",
    ]
    .join("\n");
    assert_eq!(result.markup, expected);
}

#[test]
fn test_missing_child_is_skipped_with_one_diagnostic() {
    let result = compile_tree(
        json!({ "component": "List", "children": [{ "component": "Item" }, { "component": "Ghost" }] }),
        Registry::new().with_host("List").with_host("Item"),
    );

    assert_eq!(result.markup, "<List>\n  <Item/>\n</List>");
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].kind, DiagnosticKind::UnresolvedComponent);
    assert_eq!(
        result.diagnostics[0].message,
        "Unable to find definition of `Ghost`; ignored"
    );
    assert_eq!(result.diagnostics[0].path.as_deref(), Some("children[1]"));
}

#[test]
fn test_siblings_after_missing_child_still_compile() {
    let result = compile_tree(
        json!({ "_": "List", "$": [{ "_": "Ghost" }, { "_": "Item", "n": 1 }, "junk"] }),
        Registry::new().with_host("List").with_host("Item"),
    );

    assert_eq!(result.markup, "<List>\n  <Item\n    n={1}\n  />\n</List>");
    assert_eq!(result.diagnostics.len(), 2);
    assert_eq!(result.diagnostics[1].path.as_deref(), Some("$[2]"));
}

#[test]
fn test_all_children_missing_keeps_container() {
    let result = compile_tree(
        json!({ "_": "List", "$": [{ "_": "Ghost" }] }),
        Registry::new().with_host("List"),
    );

    assert_eq!(result.markup, "<List>\n</List>");
}

#[test]
fn test_missing_root_yields_empty_markup() {
    let result = compile_tree(json!({ "_": "Ghost", "title": "x" }), Registry::new().with_host("Box"));

    assert_eq!(result.markup, "");
    assert_eq!(result.diagnostics.len(), 1);
}

#[test]
fn test_defaults_fill_gaps_but_never_override() {
    let registry = Registry::new().with_component(
        "Button",
        HostComponent::new("Button")
            .with_default("kind", json!("primary"))
            .with_default("style", json!({ "color": "blue", "margin": 2 }))
            .with_default("disabled", json!(false))
            .handle(),
    );

    let result = compile_tree(
        json!({ "_": "Button", "kind": "danger", "style": { "color": "red" } }),
        registry,
    );

    assert_eq!(
        result.markup,
        "<Button\n  kind=\"danger\"\n  style={{\"color\":\"red\"}}\n  disabled={false}\n/>"
    );
}

#[test]
fn test_component_reference_attributes() {
    let tree = json!({
        "_": "Card",
        "Icon": "Star",
        "Missing": "Moon",
        "Header": { "_": "Title", "text": "Hello" }
    });
    let registry = Registry::new()
        .with_host("Card")
        .with_host("Star")
        .with_host("Title");

    let result = compile_tree(tree, registry);

    let expected = [
        "<Card",
        "  Icon={Star}",
        "  Header={",
        "    <Title",
        "      text=\"Hello\"",
        "    />",
        "  }",
        "/>",
    ]
    .join("\n");
    assert_eq!(result.markup, expected);
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].kind, DiagnosticKind::UnevaluableAttribute);
}

#[test]
fn test_namespaced_components() {
    let registry = Registry::new()
        .with_host("Form")
        .with_namespace("Fields", Registry::new().with_host("Text"));

    let result = compile_tree(
        json!({ "_": "Form", "$": [{ "_": "Fields.Text", "Label": "Fields.Text" }] }),
        registry,
    );

    assert_eq!(
        result.markup,
        "<Form>\n  <Fields.Text\n    Label={Fields.Text}\n  />\n</Form>"
    );
}

#[test]
fn test_custom_indent() {
    let registry = Registry::new().with_host("A").with_host("B").flatten().unwrap();
    let options = CompileOptions {
        indent: "\t".to_string(),
        ..CompileOptions::default()
    };

    let result = compile(
        &NodeDefinition::from_value(&json!({ "_": "A", "$": [{ "_": "B", "x": 1 }] })),
        &registry,
        &options,
    );

    assert_eq!(result.markup, "<A>\n\t<B\n\t\tx={1}\n\t/>\n</A>");
}

#[test]
fn test_build_markup_wraps_root() {
    let registry = Registry::new().with_host("Panel").with_host("Text");
    let tree = json!({ "_": "Panel", "title": "Hi", "$": [{ "_": "Text" }] });

    let compilation = build_markup(&tree, &registry, &Value::Null, &Map::new(), &CompileOptions::default());

    assert_eq!(
        compilation.markup,
        "<RootAdapter\n  title=\"Hi\"\n>\n  <Text/>\n</RootAdapter>"
    );
    assert!(compilation.registry.contains(ROOT_ADAPTER_NAME));
    assert!(compilation.registry.contains("Panel"));
    assert!(compilation.diagnostics.is_empty());
}

#[test]
fn test_build_markup_applies_root_defaults_through_adapter() {
    let registry = Registry::new().with_component(
        "Panel",
        HostComponent::new("Panel").with_default("padding", json!(8)).handle(),
    );

    let compilation = build_markup(
        &json!({ "_": "Panel" }),
        &registry,
        &json!({}),
        &Map::new(),
        &CompileOptions::default(),
    );

    assert_eq!(compilation.markup, "<RootAdapter\n  padding={8}\n/>");
}

#[test]
fn test_build_markup_applies_aliases() {
    let registry = Registry::new().with_host("Card").with_host("Text");
    let tree = json!({
        "_": "Card",
        "heading": "Welcome",
        "$": [{ "_": "Text", "body": "Hello" }]
    });
    let aliases = json!({ "heading": "title", "$": [{ "body": "$[0].value" }] });

    let compilation = build_markup(&tree, &registry, &aliases, &Map::new(), &CompileOptions::default());

    assert_eq!(
        compilation.markup,
        "<RootAdapter\n  title=\"Welcome\"\n>\n  <Text\n    value=\"Hello\"\n  />\n</RootAdapter>"
    );
}

#[test]
fn test_build_markup_ignores_out_of_range_alias_targets() {
    let registry = Registry::new().with_host("Box");
    let tree = json!({ "_": "Box", "title": "x", "size": 2 });
    let aliases = json!({
        "title": format!("items[{}]", usize::MAX),
        "size": "items[100000000]"
    });

    let compilation = build_markup(&tree, &registry, &aliases, &Map::new(), &CompileOptions::default());

    assert_eq!(
        compilation.markup,
        "<RootAdapter\n  title=\"x\"\n  size={2}\n/>"
    );
    assert!(compilation.diagnostics.is_empty());
}

#[test]
fn test_build_markup_rejects_malformed_input() {
    let registry = Registry::new().with_host("Box");
    let options = CompileOptions::default();

    for tree in [Value::Null, json!("Box"), json!({ "title": "no component" }), json!({ "_": 3 })] {
        let compilation = build_markup(&tree, &registry, &json!({}), &Map::new(), &options);
        assert!(compilation.is_empty());
        assert_eq!(compilation.diagnostics.len(), 1);
        assert_eq!(compilation.diagnostics[0].kind, DiagnosticKind::MalformedInput);
    }
}

#[test]
fn test_build_markup_rejects_delimiter_collisions() {
    let registry = Registry::new().with_host("Box");
    let options = CompileOptions::default();

    let compilation = build_markup(
        &json!({ "_": "Box", "data.id": 1 }),
        &registry,
        &json!({}),
        &Map::new(),
        &options,
    );
    assert!(compilation.is_empty());

    let bad_registry = Registry::new().with_host("Box").with_host("My.Box");
    let compilation = build_markup(&json!({ "_": "Box" }), &bad_registry, &json!({}), &Map::new(), &options);
    assert!(compilation.is_empty());
    assert!(compilation.diagnostics[0].is_error());
}

#[test]
fn test_build_markup_rejects_empty_keys() {
    let registry = Registry::new().with_host("Box");

    let compilation = build_markup(
        &json!({ "_": "Box", "style": { "": 1 } }),
        &registry,
        &json!({}),
        &Map::new(),
        &CompileOptions::default(),
    );

    assert!(compilation.is_empty());
    assert_eq!(compilation.diagnostics.len(), 1);
    assert_eq!(compilation.diagnostics[0].kind, DiagnosticKind::MalformedInput);
}

#[test]
fn test_build_markup_is_idempotent() {
    let registry = Registry::new().with_host("List").with_host("Item");
    let tree = json!({
        "_": "List",
        "style": { "gap": 2 },
        "$": [{ "_": "Item", "n": 1 }, { "_": "Ghost" }, { "_": "Item", "n": 2 }]
    });
    let options = CompileOptions::default();

    let first = build_markup(&tree, &registry, &json!({}), &Map::new(), &options);
    let second = build_markup(&tree, &registry, &json!({}), &Map::new(), &options);

    assert_eq!(first.markup, second.markup);
    assert_eq!(first.diagnostics, second.diagnostics);
    assert_eq!(
        first.registry.names().collect::<Vec<_>>(),
        second.registry.names().collect::<Vec<_>>()
    );
}
