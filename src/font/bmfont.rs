//! The two descriptor encodings of a bitmap font.
//!
//! Both carry the same information:
//!
//! ```text
//! info face="Tabela" size=16
//! common lineHeight=16 base=12 scaleW=128 scaleH=96 pages=1
//! page id=0 file="tabela_0.png"
//! chars count=1
//! char id=65 x=0 y=0 width=7 height=14 xoffset=0 yoffset=0 xadvance=7 page=0 chnl=15
//! ```
//!
//! ```xml
//! <font>
//!   <info face="Tabela" size="16"/>
//!   <common lineHeight="16" base="12" scaleW="128" scaleH="96" pages="1"/>
//!   <pages><page id="0" file="tabela_0.png"/></pages>
//!   <chars count="1">
//!     <char id="65" x="0" y="0" width="7" height="14" xoffset="0" yoffset="0" xadvance="7"/>
//!   </chars>
//! </font>
//! ```
//!
//! Unknown tags and attributes (kerning pairs, channel info) are ignored.

use itertools::Itertools;
use quick_xml::{Reader, escape::escape, events::Event};

use super::{BitmapFont, Glyph};
use crate::{Error, Result};

/// Which descriptor encoding a font file uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FontEncoding {
    /// Line-oriented `key=value` text.
    #[default]
    Text,
    /// Tag-based XML.
    Xml,
}

impl FontEncoding {
    /// XML when the first non-blank character is `<`, text otherwise.
    #[must_use]
    pub fn detect(descriptor: &str) -> Self {
        if descriptor
            .trim_start_matches('\u{feff}')
            .trim_start()
            .starts_with('<')
        {
            Self::Xml
        } else {
            Self::Text
        }
    }
}

type Attributes = Vec<(String, String)>;

/// Parse the key-value text encoding.
///
/// # Errors
///
/// Returns [`Error::FontParse`] for malformed lines or a missing `common` line,
/// and [`Error::DuplicateGlyph`] when a codepoint repeats.
pub fn parse_text(descriptor: &str) -> Result<BitmapFont> {
    let mut builder = FontBuilder::default();
    for (index, line) in descriptor.lines().enumerate() {
        let line_number = index + 1;
        let Some((tag, rest)) = split_tag(line) else {
            continue;
        };
        let attributes = tokenize(rest, line_number)?;
        builder.apply(tag, &attributes, line_number)?;
    }
    builder.finish()
}

/// Parse the XML encoding.
///
/// # Errors
///
/// Returns [`Error::Xml`] or [`Error::XmlAttribute`] for malformed XML, and the
/// same semantic errors as [`parse_text`].
pub fn parse_xml(descriptor: &str) -> Result<BitmapFont> {
    let mut reader = Reader::from_str(descriptor);
    let mut builder = FontBuilder::default();
    loop {
        match reader.read_event()? {
            Event::Start(element) | Event::Empty(element) => {
                let tag = String::from_utf8_lossy(element.name().as_ref()).into_owned();
                let mut attributes = Attributes::new();
                for attribute in element.attributes() {
                    let attribute = attribute?;
                    let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
                    let value = attribute.unescape_value()?.into_owned();
                    attributes.push((key, value));
                }
                builder.apply(&tag, &attributes, 0)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }
    builder.finish()
}

/// Serialize to the key-value text encoding.
///
/// Quoted values cannot contain `"`; any in the face name or atlas file are
/// written as `'`.
#[must_use]
pub fn write_text(font: &BitmapFont) -> String {
    let (scale_width, scale_height) = atlas_size(font);
    let mut lines = vec![
        format!(
            "info face=\"{}\" size={}",
            font.name.replace('"', "'"),
            font.line_height
        ),
        format!(
            "common lineHeight={} base={} scaleW={scale_width} scaleH={scale_height} pages={}",
            font.line_height,
            font.base,
            usize::from(font.atlas_file.is_some())
        ),
    ];
    if let Some(file) = font.atlas_file.as_deref() {
        lines.push(format!("page id=0 file=\"{}\"", file.replace('"', "'")));
    }
    lines.push(format!("chars count={}", font.glyphs.len()));
    lines.extend(font.glyphs.values().map(|glyph| {
        format!(
            "char id={} x={} y={} width={} height={} xoffset={} yoffset={} xadvance={} page=0 chnl=15",
            glyph.id,
            glyph.x,
            glyph.y,
            glyph.width,
            glyph.height,
            glyph.x_offset,
            glyph.y_offset,
            glyph.x_advance
        )
    }));
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// Serialize to the XML encoding.
#[must_use]
pub fn write_xml(font: &BitmapFont) -> String {
    let (scale_width, scale_height) = atlas_size(font);
    let pages = font
        .atlas_file
        .as_deref()
        .map(|file| format!("    <page id=\"0\" file=\"{}\"/>\n", escape(file)))
        .unwrap_or_default();
    let chars = font
        .glyphs
        .values()
        .map(|glyph| {
            format!(
                "    <char id=\"{}\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" xoffset=\"{}\" yoffset=\"{}\" xadvance=\"{}\" page=\"0\" chnl=\"15\"/>",
                glyph.id,
                glyph.x,
                glyph.y,
                glyph.width,
                glyph.height,
                glyph.x_offset,
                glyph.y_offset,
                glyph.x_advance
            )
        })
        .join("\n");
    format!(
        "<?xml version=\"1.0\"?>\n<font>\n  <info face=\"{name}\" size=\"{line_height}\"/>\n  <common lineHeight=\"{line_height}\" base=\"{base}\" scaleW=\"{scale_width}\" scaleH=\"{scale_height}\" pages=\"{page_count}\"/>\n  <pages>\n{pages}  </pages>\n  <chars count=\"{count}\">\n{chars}\n  </chars>\n</font>\n",
        name = escape(font.name.as_str()),
        line_height = font.line_height,
        base = font.base,
        page_count = usize::from(font.atlas_file.is_some()),
        count = font.glyphs.len(),
    )
}

fn atlas_size(font: &BitmapFont) -> (u32, u32) {
    font.atlas
        .as_ref()
        .map_or((0, 0), |atlas| (atlas.width(), atlas.height()))
}

#[derive(Default)]
struct FontBuilder {
    font: BitmapFont,
    saw_common: bool,
}

impl FontBuilder {
    fn apply(&mut self, tag: &str, attributes: &Attributes, line: usize) -> Result<()> {
        match tag {
            "info" => {
                if let Some(face) = lookup(attributes, "face") {
                    face.clone_into(&mut self.font.name);
                }
            }
            "common" => {
                self.font.line_height = unsigned(attributes, "lineHeight", line)?;
                self.font.base = optional_unsigned(attributes, "base", line)?.unwrap_or(0);
                self.saw_common = true;
            }
            "page" => {
                // Only the first page is used; glyphs on other pages are not drawable.
                if self.font.atlas_file.is_none() {
                    self.font.atlas_file = lookup(attributes, "file").map(str::to_owned);
                }
            }
            "char" => {
                let glyph = Glyph {
                    id: unsigned(attributes, "id", line)?,
                    x: optional_unsigned(attributes, "x", line)?.unwrap_or(0),
                    y: optional_unsigned(attributes, "y", line)?.unwrap_or(0),
                    width: optional_unsigned(attributes, "width", line)?.unwrap_or(0),
                    height: optional_unsigned(attributes, "height", line)?.unwrap_or(0),
                    x_offset: optional_signed(attributes, "xoffset", line)?.unwrap_or(0),
                    y_offset: optional_signed(attributes, "yoffset", line)?.unwrap_or(0),
                    x_advance: optional_signed(attributes, "xadvance", line)?.unwrap_or(0),
                };
                if self.font.glyphs.insert(glyph.id, glyph).is_some() {
                    return Err(Error::DuplicateGlyph { id: glyph.id });
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn finish(self) -> Result<BitmapFont> {
        if !self.saw_common {
            return Err(Error::FontParse {
                line: 0,
                message: "missing common entry with lineHeight".to_owned(),
            });
        }
        Ok(self.font)
    }
}

fn split_tag(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    Some(line.split_once(char::is_whitespace).unwrap_or((line, "")))
}

/// Split `key=value key="quoted value"` pairs.
fn tokenize(text: &str, line: usize) -> Result<Attributes> {
    let mut attributes = Attributes::new();
    let mut rest = text.trim_start();
    while !rest.is_empty() {
        let Some((key, after_key)) = rest.split_once('=') else {
            return Err(Error::FontParse {
                line,
                message: format!("expected key=value, found {rest:?}"),
            });
        };
        let key = key.trim();
        let (value, remainder) = if let Some(quoted) = after_key.strip_prefix('"') {
            let Some((value, remainder)) = quoted.split_once('"') else {
                return Err(Error::FontParse {
                    line,
                    message: format!("unterminated quote in {key}"),
                });
            };
            (value, remainder)
        } else {
            after_key
                .split_once(char::is_whitespace)
                .unwrap_or((after_key, ""))
        };
        attributes.push((key.to_owned(), value.to_owned()));
        rest = remainder.trim_start();
    }
    Ok(attributes)
}

fn lookup<'a>(attributes: &'a Attributes, key: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.as_str())
}

fn optional_signed(attributes: &Attributes, key: &str, line: usize) -> Result<Option<i32>> {
    lookup(attributes, key)
        .map(|value| {
            value.trim().parse::<i32>().map_err(|error| Error::FontParse {
                line,
                message: format!("{key}={value:?}: {error}"),
            })
        })
        .transpose()
}

fn optional_unsigned(attributes: &Attributes, key: &str, line: usize) -> Result<Option<u32>> {
    lookup(attributes, key)
        .map(|value| {
            value.trim().parse::<u32>().map_err(|error| Error::FontParse {
                line,
                message: format!("{key}={value:?} must be a non-negative integer: {error}"),
            })
        })
        .transpose()
}

fn unsigned(attributes: &Attributes, key: &str, line: usize) -> Result<u32> {
    optional_unsigned(attributes, key, line)?.ok_or_else(|| Error::FontParse {
        line,
        message: format!("missing {key}"),
    })
}
