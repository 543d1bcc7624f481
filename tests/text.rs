use std::collections::BTreeMap;

use tabela_kit::color::{GREEN, RED, RGB8, WHITE};
use tabela_kit::font::{BitmapFont, Glyph};
use tabela_kit::raster::{RasterImage, opaque};
use tabela_kit::text::{
    HorizontalAlign, TextLayout, TextSegment, TextStyle, VerticalAlign, align_2d,
    apply_text_style, horizontal_position, render_line, render_multiline, render_segments,
    split_lines, vertical_position,
};

const BLUE: RGB8 = RGB8::new(0, 0, 255);

/// Two solid 4×16 glyphs, 'A' and 'B', each advancing 5 pixels.
fn block_font() -> BitmapFont {
    let glyph = |id: char, x: u32| Glyph {
        id: u32::from(id),
        x,
        y: 0,
        width: 4,
        height: 16,
        x_offset: 0,
        y_offset: 0,
        x_advance: 5,
    };
    let glyphs = BTreeMap::from([(65, glyph('A', 0)), (66, glyph('B', 4))]);
    BitmapFont {
        name: "blocks".to_owned(),
        line_height: 16,
        base: 12,
        atlas: Some(RasterImage::filled(8, 16, opaque(WHITE))),
        atlas_file: None,
        glyphs,
    }
}

#[test]
fn line_width_follows_advances_and_spacing() {
    let font = block_font();
    let image = render_line(&font, "AB", RED, 0);
    assert_eq!((image.width(), image.height()), (10, 16));
    assert_eq!(image.pixel(0, 0), Some(opaque(RED)));
    assert_eq!(image.pixel(4, 0).map(|pixel| pixel[3]), Some(0));

    assert_eq!(render_line(&font, "AB", RED, 2).width(), 12);
    assert_eq!(render_line(&font, "AB", RED, -2).width(), 8);
}

#[test]
fn empty_and_unknown_text_yield_a_placeholder() {
    let font = block_font();
    for text in ["", "\u{e9}\u{e9}", " "] {
        let image = render_line(&font, text, RED, 0);
        assert_eq!((image.width(), image.height()), (1, 16), "{text:?}");
    }
    assert_eq!(render_line(&font, "A\u{e9}B", RED, 0).width(), 10);
}

#[test]
fn segments_keep_their_colors() {
    let font = block_font();
    let segments = [TextSegment::new("A", GREEN), TextSegment::new("B", BLUE)];
    let image = render_segments(&font, &segments, 1);
    assert_eq!(image.width(), render_line(&font, "AB", WHITE, 1).width());
    assert_eq!(image.pixel(1, 3), Some(opaque(GREEN)));
    assert_eq!(image.pixel(7, 3), Some(opaque(BLUE)));
}

#[test]
fn line_breaks_count_once_each() {
    assert_eq!(split_lines("a\r\nb\nc\rd"), ["a", "b", "c", "d"]);
    assert_eq!(split_lines("\r\r"), ["", "", ""]);
    assert_eq!(split_lines(""), [""]);
}

#[test]
fn multiline_height_and_overflow_warning() {
    let font = block_font();
    let layout = TextLayout {
        line_spacing: 4,
        ..TextLayout::default()
    };
    let block = render_multiline(&font, "A\nAB\nB", RED, &layout, 16);
    assert_eq!(block.line_count, 3);
    assert_eq!((block.image.width(), block.image.height()), (10, 56));
    assert!(block.warning.is_some());

    let fits = render_multiline(&font, "A\nAB\nB", RED, &layout, 64);
    assert_eq!(fits.image, block.image);
    assert!(fits.warning.is_none());
}

#[test]
fn multiline_lines_align_inside_the_widest() {
    let font = block_font();
    let mut layout = TextLayout {
        line_spacing: 4,
        align: HorizontalAlign::Center,
        ..TextLayout::default()
    };
    let centered = render_multiline(&font, "AB\nA", RED, &layout, 64).image;
    assert_eq!(centered.pixel(1, 20).map(|pixel| pixel[3]), Some(0));
    assert_eq!(centered.pixel(2, 20), Some(opaque(RED)));

    layout.align = HorizontalAlign::Right;
    let right = render_multiline(&font, "AB\nA", RED, &layout, 64).image;
    assert_eq!(right.pixel(4, 20).map(|pixel| pixel[3]), Some(0));
    assert_eq!(right.pixel(5, 20), Some(opaque(RED)));
}

#[test]
fn alignment_helpers() {
    assert_eq!(horizontal_position(HorizontalAlign::Left, 100, 30), 0);
    assert_eq!(horizontal_position(HorizontalAlign::Center, 100, 31), 34);
    assert_eq!(horizontal_position(HorizontalAlign::Right, 100, 30), 70);
    assert_eq!(horizontal_position(HorizontalAlign::Center, 10, 15), -2);
    assert_eq!(vertical_position(VerticalAlign::Bottom, 16, 10), 6);
    assert_eq!(
        align_2d(HorizontalAlign::Right, VerticalAlign::Middle, (96, 16), (40, 10)),
        (56, 3)
    );
}

#[test]
fn stroke_grows_and_outlines() {
    let font = block_font();
    let text = render_line(&font, "A", RED, 0);
    let mut style = TextStyle {
        has_stroke: true,
        stroke_width: 2,
        stroke_color: BLUE,
        ..TextStyle::default()
    };

    let stroked = apply_text_style(&text, &style);
    assert_eq!((stroked.width(), stroked.height()), (9, 20));
    assert_eq!(stroked.pixel(2, 2), Some(opaque(RED)));
    assert_eq!(stroked.pixel(0, 0), Some(opaque(BLUE)));
    assert_eq!(stroked.pixel(8, 19).map(|pixel| pixel[3]), Some(0));

    style.has_background = true;
    style.background_color = GREEN;
    let boxed = apply_text_style(&text, &style);
    assert_eq!(boxed.pixel(8, 19), Some(opaque(GREEN)));

    style.stroke_width = 7;
    let clamped = apply_text_style(&text, &style);
    assert_eq!((clamped.width(), clamped.height()), (11, 22));
}

#[test]
fn style_without_stroke_keeps_size() {
    let text = render_line(&block_font(), "AB", RED, 0);
    let style = TextStyle {
        has_background: true,
        background_color: GREEN,
        ..TextStyle::default()
    };
    let styled = apply_text_style(&text, &style);
    assert_eq!((styled.width(), styled.height()), (10, 16));
    assert_eq!(styled.pixel(4, 0), Some(opaque(GREEN)));
    assert_eq!(styled.pixel(0, 0), Some(opaque(RED)));

    let mut narrow = TextStyle::default();
    narrow.set_stroke_width(0);
    assert_eq!(narrow.stroke_width, 1);
}
