use super::*;

fn boxed(x: f64, y: f64, w: f64, h: f64) -> ObjectProps {
    ObjectProps {
        bounds: Some(ObjectBounds {
            rect: Rect::new(x, y, x + w, y + h),
            angle: 0.0,
        }),
        ..ObjectProps::default()
    }
}

#[test]
fn events_are_only_queued_for_subscribed_objects() {
    let mut s = SceneSurface::new();
    let quiet = s.create_object(ObjectProps::default());
    let loud = s.create_object(ObjectProps::default());
    s.subscribe(loud, &SurfaceEventKind::ALL);

    s.add(quiet);
    s.add(loud);
    s.add(loud);
    assert_eq!(s.display_list(), [quiet, loud]);
    assert_eq!(
        s.poll_events(),
        vec![SurfaceEvent::new(SurfaceEventKind::Added, loud)]
    );
    assert!(s.poll_events().is_empty());
}

#[test]
fn removal_fires_once_and_only_for_listed_objects() {
    let mut s = SceneSurface::new();
    let h = s.create_object(ObjectProps::default());
    s.subscribe(h, &[SurfaceEventKind::Removed]);
    s.remove(h);
    assert!(s.poll_events().is_empty());

    s.add(h);
    s.remove(h);
    s.remove(h);
    assert_eq!(
        s.poll_events(),
        vec![SurfaceEvent::new(SurfaceEventKind::Removed, h)]
    );
    assert!(!s.contains(h));
}

#[test]
fn interactions_update_bounds_then_report_modified() {
    let mut s = SceneSurface::new();
    let h = s.create_object(boxed(10.0, 10.0, 50.0, 20.0));
    s.subscribe(h, &SurfaceEventKind::ALL);

    s.drag_to(h, 100.0, 40.0);
    s.resize_to(h, 80.0, 30.0);
    s.rotate_to(h, 15.0);

    let kinds: Vec<_> = s.poll_events().into_iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        [
            SurfaceEventKind::Moving,
            SurfaceEventKind::Modified,
            SurfaceEventKind::Scaling,
            SurfaceEventKind::Modified,
            SurfaceEventKind::Rotating,
            SurfaceEventKind::Modified,
        ]
    );
    let b = s.bounds(h).unwrap();
    assert_eq!(b.rect, Rect::new(100.0, 40.0, 180.0, 70.0));
    assert_eq!(b.angle, 15.0);
}

#[test]
fn object_state_round_trips() {
    let mut s = SceneSurface::new();
    let h = s.create_object(ObjectProps::default());
    assert!(!s.is_visible(h));
    s.set_visible(h, true);
    s.set_rotatable(h, true);
    s.set_object_id(h, &NodeId::from("n1"));
    s.set_style(h, "fill", Value::from("#fff"));
    assert!(s.is_visible(h));
    assert!(s.is_rotatable(h));
    assert_eq!(s.object_id(h), Some(NodeId::from("n1")));
    assert_eq!(s.style(h, "fill"), Some(Value::from("#fff")));

    s.destroy_object(h);
    assert_eq!(s.object_count(), 0);
    assert_eq!(s.object_id(h), None);
}
