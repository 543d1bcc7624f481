use std::error::Error;

use tabela_kit::zone::{ScrollDirection, ScrollSettings, ZoneContent, ZoneLayout};

fn assert_normalized(layout: &ZoneLayout) {
    let total: f32 = layout.zones().iter().map(|zone| zone.width_percent).sum();
    assert!((total - 100.0).abs() < 1e-3, "widths sum to {total}");
    for (index, zone) in layout.zones().iter().enumerate() {
        assert_eq!(zone.index, index);
        assert!(zone.width_percent > 0.0);
    }
}

#[test]
fn default_layout_is_one_full_zone() {
    let layout = ZoneLayout::default();
    assert_eq!(layout.len(), 1);
    assert_eq!(layout.zones()[0].width_percent, 100.0);
}

#[test]
fn adding_zones_keeps_widths_normalized() {
    let mut layout = ZoneLayout::default();
    assert!(layout.add_zone(50.0, ZoneContent::Clock));
    assert!(layout.add_zone(25.0, ZoneContent::Date));
    assert_eq!(layout.len(), 3);
    assert_normalized(&layout);
    assert_eq!(layout.zones()[1].content, ZoneContent::Clock);
}

#[test]
fn non_positive_widths_are_rejected() {
    let mut layout = ZoneLayout::default();
    assert!(!layout.add_zone(0.0, ZoneContent::Text));
    assert!(!layout.add_zone(-5.0, ZoneContent::Text));
    assert!(!layout.add_zone(f32::NAN, ZoneContent::Text));
    assert!(!layout.set_zone_width(0, 0.0));
    assert_eq!(layout.len(), 1);
}

#[test]
fn removing_zones_reindexes() {
    let mut layout = ZoneLayout::default();
    assert!(layout.add_zone(100.0, ZoneContent::Clock));
    assert!(layout.add_zone(100.0, ZoneContent::Date));
    assert!(!layout.remove_zone(3));
    assert!(layout.remove_zone(0));
    assert_eq!(layout.len(), 2);
    assert_normalized(&layout);
    assert_eq!(layout.zones()[0].content, ZoneContent::Clock);
    assert!(layout.remove_zone(0));
    assert!(!layout.remove_zone(0), "the last zone must stay");
    assert_normalized(&layout);
}

#[test]
fn set_zone_width_rescales_the_others() {
    let mut layout = ZoneLayout::default();
    assert!(layout.add_zone(100.0, ZoneContent::Clock));
    assert!(layout.set_zone_width(0, 30.0));
    assert!((layout.zones()[0].width_percent - 30.0).abs() < 1e-3);
    assert!((layout.zones()[1].width_percent - 70.0).abs() < 1e-3);
    assert!(!layout.set_zone_width(0, 100.0));
    assert!(!layout.set_zone_width(5, 10.0));
    assert_normalized(&layout);
}

#[test]
fn pixel_spans_tile_the_panel() {
    let mut layout = ZoneLayout::default();
    assert!(layout.add_zone(100.0, ZoneContent::Clock));
    assert!(layout.add_zone(100.0, ZoneContent::Date));
    let spans = layout.zone_pixel_spans(97);
    assert_eq!(spans.len(), 3);
    let mut next_start = 0;
    for (start, width) in &spans {
        assert_eq!(*start, next_start);
        next_start += width;
    }
    assert_eq!(next_start, 97);
}

#[test]
fn marquee_offsets_cycle() {
    let scroll = ScrollSettings {
        enabled: true,
        direction: ScrollDirection::Left,
        speed: 10.0,
    };
    assert_eq!(scroll.offset_at(0.0, 20, 50), Some(50));
    assert_eq!(scroll.offset_at(1.0, 20, 50), Some(40));
    assert_eq!(scroll.offset_at(7.0, 20, 50), Some(50));

    let right = ScrollSettings {
        direction: ScrollDirection::Right,
        ..scroll
    };
    assert_eq!(right.offset_at(0.0, 20, 50), Some(-20));

    assert_eq!(ScrollSettings::default().offset_at(1.0, 20, 50), None);
}

#[test]
fn deserialized_layout_is_normalized() -> Result<(), Box<dyn Error>> {
    let layout: ZoneLayout =
        serde_json::from_str(r#"[{"widthPercent": 30.0}, {"widthPercent": 30.0, "content": "Clock"}]"#)?;
    assert_normalized(&layout);
    assert!((layout.zones()[0].width_percent - 50.0).abs() < 1e-3);

    let empty: ZoneLayout = serde_json::from_str("[]")?;
    assert_eq!(empty.len(), 1);
    Ok(())
}
