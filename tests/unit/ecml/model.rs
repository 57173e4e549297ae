use super::*;
use serde_json::json;

#[test]
fn documented_fields_are_typed_and_unknown_fields_pass_through() {
    let parsed = EcmlNode::parse(json!({
        "id": "n1",
        "x": 10, "y": "20.5", "w": 30, "h": 40, "rotate": 0,
        "visible": true, "editable": "false",
        "fill": "#ff0000",
        "z-index": 3
    }));
    assert!(parsed.is_clean());
    let node = parsed.value;
    assert_eq!(node.id.as_deref(), Some("n1"));
    assert_eq!(node.geometry, Geometry::new(10.0, 20.5, 30.0, 40.0, 0.0));
    assert_eq!(node.visible, Some(true));
    assert_eq!(node.editable, Some(false));
    assert_eq!(node.extra.get("fill"), Some(&json!("#ff0000")));
    assert_eq!(node.extra.get("z-index"), Some(&json!(3)));
}

#[test]
fn ill_shaped_fields_are_reported_not_fatal() {
    let parsed = EcmlNode::parse(json!({
        "x": "left",
        "w": "NaN",
        "visible": 3,
        "event": "click",
        "param": [{ "name": "a", "value": 1 }, { "value": 2 }, 7],
        "asset": { "id": "img" }
    }));
    let fields: Vec<&str> = parsed.issues.iter().map(|i| i.field.as_str()).collect();
    assert_eq!(fields, ["x", "w", "visible", "event", "param", "param", "asset"]);
    assert!(parsed.issues.iter().all(|i| i.kind == IssueKind::Ignored));
    assert_eq!(parsed.value.geometry.x, None);
    assert_eq!(
        parsed.value.param,
        Some(vec![EcmlParam {
            name: "a".to_string(),
            value: Some(json!(1))
        }])
    );
    assert!(parsed.clone().into_strict().is_err());
}

#[test]
fn text_block_wrapper_is_detected_only_for_string_cdata() {
    assert_eq!(
        EcmlBlock::from_value(json!({ "__cdata": "{\"a\":1}" })),
        EcmlBlock::Text("{\"a\":1}".to_string())
    );
    assert_eq!(
        EcmlBlock::from_value(json!({ "__cdata": 5 })),
        EcmlBlock::Value(json!({ "__cdata": 5 }))
    );
    assert_eq!(
        EcmlBlock::from_value(json!({ "__cdata": "" })),
        EcmlBlock::Value(json!({ "__cdata": "" }))
    );
    assert_eq!(
        EcmlBlock::from_value(json!({ "a": 1 })).decode().unwrap(),
        json!({ "a": 1 })
    );
    assert!(EcmlBlock::Text("{oops".to_string()).decode().is_err());
}

#[test]
fn single_event_and_param_objects_become_lists() {
    let parsed = EcmlNode::parse(json!({
        "event": { "type": "click" },
        "param": { "name": "score", "value": 10 }
    }));
    assert!(parsed.is_clean());
    assert_eq!(parsed.value.event, Some(vec![json!({ "type": "click" })]));
    assert_eq!(parsed.value.param.unwrap()[0].name, "score");
}

#[test]
fn serialization_is_sparse_and_skips_legacy_events() {
    let node = EcmlNode {
        id: Some("n1".to_string()),
        geometry: Geometry {
            x: Some(50.0),
            ..Geometry::default()
        },
        config: Some(EcmlBlock::text(&json!({ "opacity": 100 }))),
        legacy_events: Some(json!([{ "type": "old" }])),
        ..EcmlNode::default()
    };
    assert_eq!(
        node.to_value().unwrap(),
        json!({
            "id": "n1",
            "x": 50.0,
            "config": { "__cdata": "{\"opacity\":100}" }
        })
    );
}

#[test]
fn null_documented_fields_are_absent_but_unknown_nulls_are_kept() {
    let parsed = EcmlNode::parse(json!({ "data": null, "x": null, "custom": null }));
    assert!(parsed.is_clean());
    assert_eq!(parsed.value.data, None);
    assert_eq!(parsed.value.geometry.x, None);
    assert_eq!(parsed.value.extra.get("custom"), Some(&Value::Null));
}

#[test]
fn non_object_tree_is_reported() {
    let parsed = EcmlNode::parse(json!([1, 2]));
    assert_eq!(parsed.issues.len(), 1);
    assert_eq!(parsed.value, EcmlNode::default());
}

#[test]
fn deserialize_goes_through_permissive_parse() {
    let node: EcmlNode = serde_json::from_str(r#"{"x":"12","w":"wide","legacy":1}"#).unwrap();
    assert_eq!(node.geometry.x, Some(12.0));
    assert_eq!(node.geometry.w, None);
    assert_eq!(node.extra.get("legacy"), Some(&json!(1)));
}
