use super::*;
use serde_json::json;

#[test]
fn ecml_names_gain_surface_aliases() {
    let data = json!({ "x": 10, "y": 20, "w": 30, "h": 40, "radius": 5, "color": "#f00", "rotate": 45 });
    let props = to_surface_props(data.as_object().unwrap());
    assert_eq!(props.get("left"), Some(&json!(10)));
    assert_eq!(props.get("top"), Some(&json!(20)));
    assert_eq!(props.get("width"), Some(&json!(30)));
    assert_eq!(props.get("height"), Some(&json!(40)));
    assert_eq!(props.get("rx"), Some(&json!(5)));
    assert_eq!(props.get("fill"), Some(&json!("#f00")));
    assert_eq!(props.get("angle"), Some(&json!(45)));
    assert_eq!(props.get("x"), Some(&json!(10)));
}

#[test]
fn falsy_values_are_not_aliased() {
    let data = json!({ "x": 0, "color": "", "rotate": 0 });
    let props = to_surface_props(data.as_object().unwrap());
    assert!(!props.contains_key("left"));
    assert!(!props.contains_key("fill"));
    assert!(!props.contains_key("angle"));
}

#[test]
fn bounds_follow_pixel_geometry() {
    let b = bounds_from_geometry(&Geometry::new(10.0, 20.0, 30.0, 40.0, 90.0));
    assert_eq!(b.rect, kurbo::Rect::new(10.0, 20.0, 40.0, 60.0));
    assert_eq!(b.angle, 90.0);
}
