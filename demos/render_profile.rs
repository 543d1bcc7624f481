#![allow(missing_docs)]
//! Render a profile to a looping APNG preview.
//!
//! Usage: `demo_render_profile [PROFILE.json] [OUTPUT.png] [SECONDS]`
//!
//! Without a profile a two-program demo with a rotating stop list is used.

use std::env;
use std::path::PathBuf;

use tabela_kit::{
    Result, Signboard,
    encoder::{FrameEncoder, PngEncoder},
    font::{BitmapFont, BuiltinFont},
    profile::Profile,
    program::{ItemKind, StopAnimation, TabelaItem, TabelaProgram, TransitionKind},
    text::VerticalAlign,
};
use time::OffsetDateTime;

const FPS: u16 = 10;

fn main() {
    if let Err(err) = inner_main() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn inner_main() -> Result<()> {
    let mut args = env::args().skip(1);
    let profile = match args.next() {
        Some(path) => Profile::from_file(path)?,
        None => demo_profile(),
    };
    let output = args
        .next()
        .map_or_else(|| PathBuf::from("tabela_preview.png"), PathBuf::from);
    let seconds: usize = args.next().and_then(|text| text.parse().ok()).unwrap_or(12);

    let mut signboard = Signboard::new(profile, BitmapFont::builtin(BuiltinFont::Font7x14))?;
    let frames = signboard.record(seconds * usize::from(FPS), FPS, OffsetDateTime::now_utc());
    PngEncoder.write_animation(&frames, FPS, &output)?;
    println!("wrote {} frames to {}", frames.len(), output.display());
    Ok(())
}

fn demo_profile() -> Profile {
    let mut route = TabelaProgram::new(1, "Route");
    route.set_duration_seconds(6);
    let mut stops = TabelaItem::text(1, "");
    stops.stops.is_enabled = true;
    stops.stops.stops = vec!["Central".to_owned(), "Harbour".to_owned(), "Airport".to_owned()];
    stops.stops.auto_calculate_duration = true;
    stops.stops.animation = StopAnimation::SlideUp;
    route.items.push(stops);

    let mut clock = TabelaProgram::new(2, "Clock");
    clock.set_duration_seconds(6);
    clock.transition = TransitionKind::SlideLeft;
    clock.items.push(TabelaItem {
        kind: ItemKind::Clock,
        v_align: VerticalAlign::Middle,
        ..TabelaItem::text(1, "")
    });

    Profile {
        name: "Demo".to_owned(),
        programs: vec![route, clock],
        ..Profile::default()
    }
}
