use std::error::Error;
use std::fs;
use std::path::PathBuf;

use tabela_kit::Error as TabelaError;
use tabela_kit::font::{
    BitmapFont, BuiltinFont, FontEncoding, Glyph, load_font, save_font, validate_font,
};
use tabela_kit::raster::RasterImage;

const TEXT_DESCRIPTOR: &str = "\
info face=\"Route Sign\" size=16 bold=0
common lineHeight=16 base=12 scaleW=16 scaleH=16 pages=1
page id=0 file=\"route_0.png\"
chars count=2
char id=65 x=0 y=0 width=4 height=16 xoffset=0 yoffset=0 xadvance=5 page=0 chnl=15
char id=66 x=4 y=0 width=4 height=16 xoffset=1 yoffset=-1 xadvance=5 page=0 chnl=15
kernings count=0
";

const XML_DESCRIPTOR: &str = r#"<?xml version="1.0"?>
<font>
  <info face="Route Sign" size="16"/>
  <common lineHeight="16" base="12" scaleW="16" scaleH="16" pages="1"/>
  <pages>
    <page id="0" file="route_0.png"/>
  </pages>
  <chars count="2">
    <char id="65" x="0" y="0" width="4" height="16" xoffset="0" yoffset="0" xadvance="5"/>
    <char id="66" x="4" y="0" width="4" height="16" xoffset="1" yoffset="-1" xadvance="5"/>
  </chars>
</font>
"#;

fn temp_output_path(name: &str) -> Result<(tempfile::TempDir, PathBuf), Box<dyn Error>> {
    let temp_dir = tempfile::tempdir()?;
    let path = temp_dir.path().join(name);
    Ok((temp_dir, path))
}

#[test]
fn builtin_font_is_ready_to_draw() -> Result<(), Box<dyn Error>> {
    let font = BitmapFont::builtin(BuiltinFont::default());
    assert_eq!(font.line_height, 14);
    let glyph = font.glyph('A').ok_or("builtin font lacks 'A'")?;
    assert_eq!((glyph.width, glyph.height, glyph.x_advance), (7, 14, 7));
    assert!(font.glyph('\u{e9}').is_none());
    validate_font(&font)?;

    let image = font.glyph_image(glyph).ok_or("builtin font has no atlas")?;
    assert!(image.pixels().iter().any(|pixel| pixel[3] == 255));
    Ok(())
}

#[test]
fn both_encodings_parse_to_the_same_font() -> Result<(), Box<dyn Error>> {
    assert_eq!(FontEncoding::detect(TEXT_DESCRIPTOR), FontEncoding::Text);
    assert_eq!(FontEncoding::detect(XML_DESCRIPTOR), FontEncoding::Xml);
    assert_eq!(FontEncoding::detect("\u{feff}  <font/>"), FontEncoding::Xml);

    let text = BitmapFont::parse(TEXT_DESCRIPTOR)?;
    let xml = BitmapFont::parse(XML_DESCRIPTOR)?;
    assert_eq!(text, xml);

    assert_eq!(text.name, "Route Sign");
    assert_eq!((text.line_height, text.base), (16, 12));
    assert_eq!(text.atlas_file.as_deref(), Some("route_0.png"));
    assert_eq!(
        text.glyph('B').copied(),
        Some(Glyph {
            id: 66,
            x: 4,
            y: 0,
            width: 4,
            height: 16,
            x_offset: 1,
            y_offset: -1,
            x_advance: 5,
        })
    );
    Ok(())
}

#[test]
fn descriptors_survive_reencoding() -> Result<(), Box<dyn Error>> {
    let font = BitmapFont::parse(TEXT_DESCRIPTOR)?;
    for encoding in [FontEncoding::Text, FontEncoding::Xml] {
        let reparsed = BitmapFont::parse(&font.to_descriptor(encoding))?;
        assert_eq!(reparsed, font, "{encoding:?}");
    }
    Ok(())
}

#[test]
fn saved_fonts_load_with_their_atlas() -> Result<(), Box<dyn Error>> {
    let mut font = BitmapFont::parse(TEXT_DESCRIPTOR)?;
    font.atlas_file = None;
    let mut atlas = RasterImage::new(8, 16);
    atlas.fill([255, 255, 255, 255]);
    atlas.set_pixel(0, 0, [0, 0, 0, 0]);
    font.atlas = Some(atlas);

    for (name, encoding) in [("text.fnt", FontEncoding::Text), ("xml.fnt", FontEncoding::Xml)] {
        let (_temp_dir, path) = temp_output_path(name)?;
        save_font(&font, &path, encoding)?;
        let loaded = load_font(&path)?;
        assert_eq!(loaded.glyphs, font.glyphs);
        assert_eq!(loaded.atlas, font.atlas);
        assert!(loaded.atlas_file.is_some_and(|file| file.ends_with("_0.png")));
    }
    Ok(())
}

#[test]
fn text_descriptors_refuse_quoted_names() -> Result<(), Box<dyn Error>> {
    let mut font = BitmapFont::parse(TEXT_DESCRIPTOR)?;
    font.name = "Route \"12\"".to_owned();

    let (_temp_dir, path) = temp_output_path("quoted.fnt")?;
    assert!(matches!(
        save_font(&font, &path, FontEncoding::Text),
        Err(TabelaError::InvalidFont { .. })
    ));
    assert!(!path.exists());

    save_font(&font, &path, FontEncoding::Xml)?;
    let descriptor = fs::read_to_string(&path)?;
    assert_eq!(BitmapFont::parse(&descriptor)?.name, font.name);
    Ok(())
}

#[test]
fn missing_files_are_reported() -> Result<(), Box<dyn Error>> {
    let (_temp_dir, path) = temp_output_path("route.fnt")?;
    assert!(matches!(
        load_font(&path),
        Err(TabelaError::FontNotFound { .. })
    ));

    fs::write(&path, TEXT_DESCRIPTOR)?;
    match load_font(&path) {
        Err(TabelaError::FontNotFound { path: missing }) => {
            assert!(missing.ends_with("route_0.png"));
        }
        other => panic!("expected missing atlas, got {other:?}"),
    }
    Ok(())
}

#[test]
fn malformed_descriptors_are_rejected() {
    let duplicate = "common lineHeight=8\nchar id=65 x=0\nchar id=65 x=1\n";
    assert!(matches!(
        BitmapFont::parse(duplicate),
        Err(TabelaError::DuplicateGlyph { id: 65 })
    ));

    let negative = "common lineHeight=8\nchar id=65 width=-3\n";
    assert!(matches!(
        BitmapFont::parse(negative),
        Err(TabelaError::FontParse { line: 2, .. })
    ));

    let no_common = "info face=x\nchar id=65\n";
    assert!(matches!(
        BitmapFont::parse(no_common),
        Err(TabelaError::FontParse { line: 0, .. })
    ));

    let unterminated = "info face=\"Route\ncommon lineHeight=8\n";
    assert!(matches!(
        BitmapFont::parse(unterminated),
        Err(TabelaError::FontParse { line: 1, .. })
    ));

    assert!(BitmapFont::parse("<font><common lineHeight=\"8\"></font>").is_err());
}

#[test]
fn validation_requires_atlas_and_glyphs() -> Result<(), Box<dyn Error>> {
    let font = BitmapFont::parse(TEXT_DESCRIPTOR)?;
    assert!(matches!(
        validate_font(&font),
        Err(TabelaError::InvalidFont { .. })
    ));

    let empty = BitmapFont {
        atlas: Some(RasterImage::new(1, 1)),
        ..BitmapFont::default()
    };
    assert!(matches!(
        validate_font(&empty),
        Err(TabelaError::InvalidFont { .. })
    ));
    Ok(())
}
