use super::*;

fn names(props: &[ConfigProperty]) -> Vec<&str> {
    props.iter().map(|p| p.property_name.as_str()).collect()
}

#[test]
fn duplicate_names_collapse_to_one_entry() {
    let type_level = vec![ConfigProperty::new("opacity", "slider")];
    let instance = vec![
        ConfigProperty::new("opacity", "slider"),
        ConfigProperty::new("stroke", "colorpicker"),
    ];
    let merged = merge_config_manifest(&type_level, Some(&instance), false);
    assert_eq!(names(&merged), ["opacity", "stroke"]);
}

#[test]
fn instance_descriptor_wins_in_place() {
    let type_level = vec![
        ConfigProperty::new("color", "colorpicker"),
        ConfigProperty::new("opacity", "slider").with_title("type"),
    ];
    let instance = vec![ConfigProperty::new("opacity", "slider").with_title("instance")];
    let merged = merge_config_manifest(&type_level, Some(&instance), false);
    assert_eq!(names(&merged), ["color", "opacity"]);
    assert_eq!(merged[1].title.as_deref(), Some("instance"));
}

#[test]
fn autoplay_is_stripped_for_non_playable_types() {
    let type_level = vec![ConfigProperty::new(AUTOPLAY, "checkbox")];
    let merged = merge_config_manifest(&type_level, Some(&base_config_manifest()), false);
    assert!(!names(&merged).contains(&AUTOPLAY));

    let merged = merge_config_manifest(&[], Some(&base_config_manifest()), false);
    assert_eq!(names(&merged), ["opacity", "strokeWidth", "stroke", "visible"]);
}

#[test]
fn autoplay_is_kept_for_playable_types() {
    let type_level = vec![ConfigProperty::new(AUTOPLAY, "checkbox")];
    let merged = merge_config_manifest(&type_level, None, true);
    assert_eq!(names(&merged), [AUTOPLAY]);

    let merged = merge_config_manifest(&[], Some(&base_config_manifest()), true);
    assert_eq!(merged.iter().filter(|p| p.property_name == AUTOPLAY).count(), 1);
}

#[test]
fn duplicates_within_type_level_keep_first() {
    let type_level = vec![
        ConfigProperty::new("opacity", "slider").with_title("first"),
        ConfigProperty::new("opacity", "slider").with_title("second"),
    ];
    let merged = merge_config_manifest(&type_level, None, false);
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].title.as_deref(), Some("first"));
}
