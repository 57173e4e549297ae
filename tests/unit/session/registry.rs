use super::*;
use crate::manifest::model::SubMenuItem;
use serde_json::json;

struct Prefixed;

impl PluginResources for Prefixed {
    fn resolve_url(&self, manifest: &Manifest, src: &str) -> String {
        format!("/plugins/{}/{src}", manifest.id)
    }

    fn load(&self, manifest: &Manifest, src: &str) -> anyhow::Result<String> {
        if manifest.id == "org.ekstep.text" && src == SIDEBAR_TEMPLATE {
            Ok("<div>text sidebar</div>".to_string())
        } else {
            anyhow::bail!("no resource {src}")
        }
    }
}

fn manifest_with_menus(id: &str) -> Manifest {
    let mut m = Manifest::named(id);
    m.ver = "1.0".to_string();
    m.editor.menu = vec![
        MenuItem {
            id: Some("add".to_string()),
            category: Some("main".to_string()),
            icon_image: Some("assets/add.png".to_string()),
            submenu: vec![SubMenuItem {
                icon_image: Some("assets/sub.png".to_string()),
                ..SubMenuItem::default()
            }],
            ..MenuItem::default()
        },
        MenuItem {
            id: Some("ctx".to_string()),
            category: Some("context".to_string()),
            ..MenuItem::default()
        },
        MenuItem {
            id: Some("orphan".to_string()),
            ..MenuItem::default()
        },
    ];
    m.editor.sidebar_menu = vec![json!({ "id": "settings" })];
    m.editor.header = vec![json!({ "id": "title" })];
    m
}

#[test]
fn register_splits_menus_by_category() {
    let mut menus = MenuRegistry::default();
    let mut m = manifest_with_menus("org.ekstep.text");
    menus.register(&mut m, &Prefixed);

    assert_eq!(menus.toolbar.len(), 1);
    assert_eq!(menus.context.len(), 1);
    assert_eq!(menus.toolbar[0].id.as_deref(), Some("add"));
    assert_eq!(menus.context[0].id.as_deref(), Some("ctx"));
    assert_eq!(menus.sidebar, vec![("org.ekstep.text".to_string(), json!({ "id": "settings" }))]);
    assert_eq!(menus.header.len(), 1);
    assert_eq!(
        menus.templates.get("org.ekstep.text").map(String::as_str),
        Some("<div>text sidebar</div>")
    );
}

#[test]
fn register_resolves_icons_and_stamps_submenus() {
    let mut menus = MenuRegistry::default();
    let mut m = manifest_with_menus("org.ekstep.shape");
    menus.register(&mut m, &Prefixed);

    let item = &m.editor.menu[0];
    assert_eq!(
        item.icon_image.as_deref(),
        Some("/plugins/org.ekstep.shape/assets/add.png")
    );
    let sub = &item.submenu[0];
    assert_eq!(
        sub.icon_image.as_deref(),
        Some("/plugins/org.ekstep.shape/assets/sub.png")
    );
    assert_eq!(sub.plugin_id.as_deref(), Some("org.ekstep.shape"));
    assert_eq!(sub.plugin_ver.as_deref(), Some("1.0"));
    assert_eq!(menus.toolbar[0], *item);
    assert!(m.editor.menu[1].icon_image.is_none());
    assert!(menus.templates.is_empty());
}

#[test]
fn media_registry_resolves_by_id() {
    let mut media = MediaRegistry::new();
    assert!(media.is_empty());
    media.insert(Media::new("img1", "assets/one.png"));
    media.insert(Media::new("img1", "assets/two.png"));
    assert_eq!(media.len(), 1);
    assert_eq!(
        media.resolve("img1").and_then(|m| m.src),
        Some("assets/two.png".to_string())
    );
    assert!(media.resolve("missing").is_none());
}

#[test]
fn dir_resources_load_from_plugin_dir() {
    let root = PathBuf::from("target").join("unit_dir_resources");
    let plugin = root.join("org.ekstep.help-1.0");
    std::fs::create_dir_all(&plugin).unwrap();
    std::fs::write(plugin.join("help.md"), "Draw a shape.").unwrap();

    let mut m = Manifest::named("org.ekstep.help");
    m.ver = "1.0".to_string();
    let res = DirResources::new(&root);

    assert_eq!(res.load(&m, "help.md").unwrap(), "Draw a shape.");
    assert!(res.load(&m, "missing.md").is_err());
    assert!(res.resolve_url(&m, "help.md").ends_with("help.md"));
}

#[test]
fn editor_event_holds_payload() {
    let ev = EditorEvent::new("object:modified", json!({ "id": "n1" }));
    assert_eq!(ev.name, "object:modified");
    assert_eq!(ev.payload["id"], "n1");
}
