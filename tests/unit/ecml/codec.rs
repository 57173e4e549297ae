use super::*;
use crate::ecml::model::{IssueKind, Media};
use crate::foundation::core::{Geometry, NodeId};
use crate::manifest::model::Manifest;
use crate::session::registry::MediaRegistry;
use serde_json::json;

fn node(id: &str) -> NodeState {
    NodeState::new(Manifest::named("org.ekstep.shape"), Some(NodeId::from(id)), None)
}

fn tree(value: Value) -> EcmlNode {
    let parsed = EcmlNode::parse(value);
    assert!(parsed.is_clean(), "{:?}", parsed.issues);
    parsed.value
}

#[test]
fn shape_in_pixels_serializes_to_percent() {
    let mut state = node("shape1");
    let patch = json!({ "x": 360, "y": 202.5, "w": 72, "h": 40.5, "rotate": 0 });
    let Value::Object(patch) = patch else {
        unreachable!()
    };
    assert!(state.set_attributes(patch).is_empty());

    let out = state.to_ecml();
    assert_eq!(out.id.as_deref(), Some("shape1"));
    assert_eq!(out.geometry, Geometry::new(50.0, 50.0, 10.0, 10.0, 0.0));
    assert!(out.data.is_none());
    assert!(out.event.is_none());
    assert!(out.param.is_none());

    let config = out.config.as_ref().unwrap().decode().unwrap();
    assert_eq!(config["opacity"], json!(100));
    assert_eq!(config["stroke"], json!("rgba(255, 255, 255, 0)"));

    let value = out.to_value().unwrap();
    assert!(value["config"]["__cdata"].is_string());
    assert!(value.get("data").is_none());
    assert!(value.get("event").is_none());
}

#[test]
fn hydration_decodes_blocks_and_converts_to_pixels() {
    let mut media = MediaRegistry::new();
    media.insert(Media::new("img1", "assets/img1.png"));

    let mut state = node("n1");
    let issues = state.from_ecml(
        tree(json!({
            "id": "ignored",
            "x": 10, "y": 20, "w": 50, "h": 40,
            "asset": "img1",
            "fill": "#00ff00",
            "data": { "__cdata": "{\"words\":[\"cat\",\"dog\"]}" },
            "config": { "__cdata": "{\"opacity\":60}" },
            "events": [{ "type": "legacy" }],
            "event": [{ "type": "click", "action": [] }],
            "param": [{ "name": "b", "value": 2 }, { "name": "a", "value": 1 }]
        })),
        &media,
    );
    assert!(issues.is_empty());

    assert_eq!(state.id().as_str(), "n1");
    let g = state.attributes().geometry;
    assert!((g.x.unwrap() - 72.0).abs() < 1e-9);
    assert!((g.y.unwrap() - 81.0).abs() < 1e-9);
    assert!((g.w.unwrap() - 360.0).abs() < 1e-9);
    assert!((g.h.unwrap() - 162.0).abs() < 1e-9);

    assert_eq!(state.data(), Some(&json!({ "words": ["cat", "dog"] })));
    assert_eq!(state.config().unwrap().get("opacity"), Some(&json!(60)));
    assert!(state.config().unwrap().get("stroke").is_none());
    assert_eq!(state.events().unwrap().len(), 1);
    assert_eq!(state.attribute("fill"), Some(json!("#00ff00")));
    assert_eq!(state.attribute("events"), None);

    let names: Vec<&str> = state.params().unwrap().keys().map(String::as_str).collect();
    assert_eq!(names, ["b", "a"]);
    assert_eq!(
        state.media().unwrap()["img1"].src.as_deref(),
        Some("assets/img1.png")
    );
}

#[test]
fn structured_blocks_are_used_as_is() {
    let mut state = node("n1");
    let issues = state.from_ecml(
        tree(json!({ "data": [1, 2, 3], "config": { "color": "red" } })),
        &MediaRegistry::new(),
    );
    assert!(issues.is_empty());
    assert_eq!(state.data(), Some(&json!([1, 2, 3])));
    assert_eq!(state.config().unwrap().get("color"), Some(&json!("red")));
}

#[test]
fn inline_asset_media_wins_and_stays_in_attributes() {
    let mut media = MediaRegistry::new();
    media.insert(Media::new("img1", "registry.png"));

    let mut state = node("n1");
    state.from_ecml(
        tree(json!({
            "asset": "img1",
            "assetMedia": { "id": "img1", "src": "inline.png", "type": "image" }
        })),
        &media,
    );
    let m = &state.media().unwrap()["img1"];
    assert_eq!(m.src.as_deref(), Some("inline.png"));
    assert_eq!(m.kind.as_deref(), Some("image"));
    assert!(state.attributes().asset_media.is_some());

    let out = state.to_ecml();
    assert_eq!(out.asset_media.and_then(|m| m.src).as_deref(), Some("inline.png"));
}

#[test]
fn unknown_asset_adds_no_media() {
    let mut state = node("n1");
    state.from_ecml(tree(json!({ "asset": "nowhere" })), &MediaRegistry::new());
    assert!(state.media().is_none());
    assert_eq!(state.attribute("asset"), Some(json!("nowhere")));
}

#[test]
fn broken_text_blocks_keep_defaults() {
    let mut state = node("n1");
    let issues = state.from_ecml(
        tree(json!({
            "data": { "__cdata": "{not json" },
            "config": { "__cdata": "[1]" }
        })),
        &MediaRegistry::new(),
    );
    let fields: Vec<&str> = issues.iter().map(|i| i.field.as_str()).collect();
    assert_eq!(fields, ["data", "config"]);
    assert!(issues.iter().all(|i| i.kind == IssueKind::Defaulted));
    assert!(state.data().is_none());
    assert_eq!(state.config().unwrap().get("opacity"), Some(&json!(100)));
}

#[test]
fn hydrate_then_serialize_reproduces_the_tree() {
    let input = tree(json!({
        "id": "q1",
        "x": 12.5, "y": 33.33, "w": 25, "h": 10, "rotate": 45,
        "visible": true,
        "editable": false,
        "font": "Verdana",
        "data": { "__cdata": "{\"q\":\"2+2\"}" },
        "config": { "__cdata": "{\"autoplay\":true}" },
        "event": [{ "type": "click" }],
        "param": [{ "name": "score", "value": 4 }, { "name": "attempts", "value": 1 }]
    }));

    let mut state = node("q1");
    state.from_ecml(input.clone(), &MediaRegistry::new());
    let out = state.to_ecml();

    assert_eq!(out.id, input.id);
    assert_eq!(out.visible, input.visible);
    assert_eq!(out.editable, input.editable);
    assert_eq!(out.extra, input.extra);
    assert_eq!(out.data, input.data);
    assert_eq!(out.config, input.config);
    assert_eq!(out.event, input.event);
    assert_eq!(out.param, input.param);
    for key in Geometry::FIELDS {
        let (a, b) = (out.geometry.get(key).unwrap(), input.geometry.get(key).unwrap());
        assert!((a - b).abs() <= 0.01, "{key}: {a} vs {b}");
    }
}

#[test]
fn params_replay_in_order_and_deleted_params_disappear() {
    let mut state = node("n1");
    state.add_param("first", json!(1));
    state.add_param("second", json!({ "nested": true }));
    state.add_param("third", json!("x"));
    state.delete_param("second");

    let out = state.to_ecml();
    let names: Vec<&str> = out
        .param
        .as_ref()
        .unwrap()
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(names, ["first", "third"]);

    let mut copy = node("n2");
    copy.from_ecml(out, &MediaRegistry::new());
    assert_eq!(copy.params(), state.params());
}

#[test]
fn surface_keys_stay_out_of_serialized_tree() {
    let mut state = node("p1");
    state.from_ecml(
        tree(json!({
            "x": 10, "y": 10, "w": 10, "h": 10,
            "left": 5, "top": 7, "width": 3, "height": 4,
            "fill": "red"
        })),
        &MediaRegistry::new(),
    );

    let out = state.to_ecml();
    for key in ["left", "top", "width", "height"] {
        assert!(!out.extra.contains_key(key), "{key} leaked into ECML");
    }
    assert_eq!(out.extra.get("fill"), Some(&json!("red")));
    let json = serde_json::to_value(&out).unwrap();
    assert!(json.get("left").is_none());
    assert!(json.get("top").is_none());
}

#[test]
fn valueless_param_is_written_without_value() {
    let mut state = node("p1");
    state.from_ecml(
        tree(json!({ "param": [{ "name": "a" }, { "name": "b", "value": 2 }] })),
        &MediaRegistry::new(),
    );

    let out = state.to_ecml();
    let json = serde_json::to_value(&out).unwrap();
    assert_eq!(
        json["param"],
        json!([{ "name": "a" }, { "name": "b", "value": 2 }])
    );
}

#[test]
fn empty_cdata_block_is_kept_as_object() {
    let mut state = node("p1");
    let issues = state.from_ecml(
        tree(json!({ "data": { "__cdata": "" } })),
        &MediaRegistry::new(),
    );
    assert!(issues.is_empty(), "{issues:?}");
    assert_eq!(state.data(), Some(&json!({ "__cdata": "" })));
}
