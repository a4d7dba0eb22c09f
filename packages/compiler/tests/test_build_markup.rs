//! End-to-end compilation of data trees

use marionette_compiler::{
    build_markup, flatten, unflatten, CompileOptions, DiagnosticKind, HostComponent, Registry,
    ROOT_ADAPTER_NAME,
};
use serde_json::{json, Map, Value};

fn ambient(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}

#[test]
fn test_boolean_and_escaped_string_attributes() {
    let registry = Registry::new().with_host("Box");
    let tree = json!({
        "component": "Box",
        "padding": true,
        "visible": false,
        "title": "Hi \"there\""
    });

    let compilation = build_markup(&tree, &registry, &json!({}), &Map::new(), &CompileOptions::default());

    let lines: Vec<&str> = compilation.markup.lines().collect();
    assert_eq!(
        lines,
        vec![
            "<RootAdapter",
            "  padding",
            "  visible={false}",
            r#"  title="Hi \"there\"""#,
            "/>",
        ]
    );
    assert!(compilation.diagnostics.is_empty());
}

#[test]
fn test_unknown_child_is_dropped() {
    let registry = Registry::new().with_host("List").with_host("Item");
    let tree = json!({
        "component": "List",
        "children": [{ "component": "Item" }, { "component": "Ghost" }]
    });

    let compilation = build_markup(&tree, &registry, &json!({}), &Map::new(), &CompileOptions::default());

    assert_eq!(compilation.markup, "<RootAdapter>\n  <Item/>\n</RootAdapter>");
    assert_eq!(compilation.markup.matches("<Item").count(), 1);
    assert!(!compilation.markup.contains("Ghost"));
    assert_eq!(compilation.diagnostics.len(), 1);
    assert_eq!(compilation.diagnostics[0].kind, DiagnosticKind::UnresolvedComponent);
    assert!(compilation.diagnostics[0].message.contains("Ghost"));
}

#[test]
fn test_ambient_attributes_reach_the_root() {
    let registry = Registry::new().with_host("Panel");
    let options = CompileOptions::default();

    let compilation = build_markup(
        &json!({ "_": "Panel" }),
        &registry,
        &json!({}),
        &ambient(json!({ "theme": "dark" })),
        &options,
    );

    // ambient values stay out of the markup and are merged at render time
    assert_eq!(compilation.markup, "<RootAdapter/>");
    let rendered = compilation
        .registry
        .render(ROOT_ADAPTER_NAME, Map::new())
        .expect("adapter should be registered");
    assert_eq!(rendered.component, "Panel");
    assert_eq!(rendered.attributes["theme"], json!("dark"));
}

#[test]
fn test_explicit_root_attribute_beats_ambient() {
    let registry = Registry::new().with_host("Panel");

    let compilation = build_markup(
        &json!({ "_": "Panel", "theme": "light" }),
        &registry,
        &json!({}),
        &ambient(json!({ "theme": "dark" })),
        &CompileOptions::default(),
    );

    assert_eq!(compilation.markup, "<RootAdapter\n  theme=\"light\"\n/>");
    // what the renderer passes after reading the markup
    let rendered = compilation
        .registry
        .render(ROOT_ADAPTER_NAME, ambient(json!({ "theme": "light" })))
        .unwrap();
    assert_eq!(rendered.attributes["theme"], json!("light"));
}

#[test]
fn test_reserved_name_collision_is_overridden() {
    let registry = Registry::new()
        .with_host("Panel")
        .with_component(ROOT_ADAPTER_NAME, HostComponent::new("Impostor").handle());

    let compilation = build_markup(
        &json!({ "_": "Panel" }),
        &registry,
        &json!({}),
        &Map::new(),
        &CompileOptions::default(),
    );

    assert_eq!(compilation.markup, "<RootAdapter/>");
    assert_eq!(compilation.diagnostics.len(), 1);
    assert_eq!(compilation.diagnostics[0].kind, DiagnosticKind::ReservedNameCollision);
    let rendered = compilation.registry.render(ROOT_ADAPTER_NAME, Map::new()).unwrap();
    assert_eq!(rendered.component, "Panel");
}

#[test]
fn test_custom_adapter_name_avoids_collision() {
    let registry = Registry::new()
        .with_host("Panel")
        .with_host(ROOT_ADAPTER_NAME);
    let options = CompileOptions {
        root_adapter_name: "Stage".to_string(),
        ..CompileOptions::default()
    };

    let compilation = build_markup(&json!({ "_": "Panel" }), &registry, &json!({}), &Map::new(), &options);

    assert_eq!(compilation.markup, "<Stage/>");
    assert!(compilation.diagnostics.is_empty());
}

#[test]
fn test_unknown_root_reports_the_real_name() {
    let registry = Registry::new().with_host("Panel");

    let compilation = build_markup(
        &json!({ "_": "Dashboard", "$": [{ "_": "Panel" }] }),
        &registry,
        &json!({}),
        &Map::new(),
        &CompileOptions::default(),
    );

    assert_eq!(compilation.markup, "");
    assert_eq!(compilation.diagnostics.len(), 1);
    assert!(compilation.diagnostics[0].message.contains("`Dashboard`"));
    assert!(!compilation.registry.contains(ROOT_ADAPTER_NAME));
}

#[test]
fn test_registry_from_manifest_end_to_end() {
    let manifest = json!({
        "Layout": {
            "Stack": { "defaultAttributes": { "direction": "column", "gap": 4 } },
            "Spacer": true
        },
        "Text": null
    });
    let registry = Registry::from_manifest(&manifest).unwrap();
    let tree = json!({
        "_": "Layout.Stack",
        "gap": 8,
        "$": [
            { "_": "Text", "value": "top" },
            { "_": "Layout.Spacer" },
            { "_": "Text", "value": "bottom" }
        ]
    });

    let compilation = build_markup(&tree, &registry, &json!({}), &Map::new(), &CompileOptions::default());

    let expected = [
        "<RootAdapter",
        "  gap={8}",
        "  direction=\"column\"",
        ">",
        "  <Text",
        "    value=\"top\"",
        "  />",
        "  <Layout.Spacer/>",
        "  <Text",
        "    value=\"bottom\"",
        "  />",
        "</RootAdapter>",
    ]
    .join("\n");
    assert_eq!(compilation.markup, expected);
}

#[test]
fn test_path_codec_round_trip_on_realistic_tree() {
    let tree = json!({
        "_": "Page",
        "meta": { "title": "Home", "tags": ["a", "b"], "flags": {} },
        "$": [
            { "_": "Header", "Logo": { "_": "Image", "src": "/logo.png" } },
            { "_": "Grid", "columns": [1, 2, 3], "$": [] }
        ]
    });
    let map = tree.as_object().unwrap();

    let flat = flatten(map).unwrap();
    assert!(flat.contains_key("$[0].Logo.src"));
    assert!(flat.contains_key("meta.tags[1]"));
    assert_eq!(flat["meta.flags"], json!({}));
    assert_eq!(&unflatten(&flat).unwrap(), map);
}
