use embedded_graphics::{
    Drawable,
    pixelcolor::{Rgb888, RgbColor},
    prelude::{OriginDimensions, Point, Primitive, Size},
    primitives::{PrimitiveStyle, Rectangle},
};
use tabela_kit::color::{RED, RGB8, WHITE};
use tabela_kit::matrix::LedMatrix;
use tabela_kit::raster::RasterImage;

#[test]
fn drawing_lights_and_clears_cells() {
    let mut matrix = LedMatrix::new(6, 4);
    assert_eq!(matrix.size(), Size::new(6, 4));

    Rectangle::new(Point::zero(), Size::new(3, 2))
        .into_styled(PrimitiveStyle::with_fill(Rgb888::RED))
        .draw(&mut matrix)
        .expect("drawing into a matrix cannot fail");
    assert_eq!(matrix.lit_count(), 6);
    assert_eq!(matrix.color(1, 1), RED);

    Rectangle::new(Point::new(1, 0), Size::new(1, 2))
        .into_styled(PrimitiveStyle::with_fill(Rgb888::BLACK))
        .draw(&mut matrix)
        .expect("drawing into a matrix cannot fail");
    assert_eq!(matrix.lit_count(), 4);
    assert!(!matrix.is_lit(1, 0));

    // Off-panel drawing is clipped.
    Rectangle::new(Point::new(-2, -2), Size::new(3, 3))
        .into_styled(PrimitiveStyle::with_fill(Rgb888::GREEN))
        .draw(&mut matrix)
        .expect("drawing into a matrix cannot fail");
    assert_eq!(matrix.color(0, 0), RGB8::new(0, 255, 0));
}

#[test]
fn from_rows_pads_short_rows() {
    let matrix = LedMatrix::from_rows(&[vec![true, false, true], vec![true]]);
    assert_eq!((matrix.width(), matrix.height()), (3, 2));
    assert!(matrix[(2, 0)]);
    assert!(!matrix[(2, 1)]);
    assert_eq!(matrix.lit_count(), 3);
}

#[test]
fn index_mut_toggles_cells() {
    let mut matrix = LedMatrix::new(2, 2);
    matrix[(1, 1)] = true;
    assert!(matrix.is_lit(1, 1));
    assert!(!matrix.is_lit(5, 5));
    assert_eq!(matrix.color(5, 5), WHITE);
    matrix.clear();
    assert_eq!(matrix.lit_count(), 0);
}

#[test]
fn overlay_copies_only_lit_cells() {
    let mut target = LedMatrix::from_rows(&[[true, true, true], [true, true, true]]);
    let mut source = LedMatrix::new(2, 1);
    source.set_color(1, 0, RED);
    target.clear();
    target.set(0, 1, true);

    target.overlay(&source, 1, 1);
    assert!(target.is_lit(0, 1));
    assert!(!target.is_lit(1, 1));
    assert!(target.is_lit(2, 1));
    assert_eq!(target.color(2, 1), RED);

    target.overlay(&source, -1, 0);
    assert!(target.is_lit(0, 0));
}

#[test]
fn crop_reads_outside_as_unlit() {
    let mut matrix = LedMatrix::new(4, 4);
    matrix.set_color(0, 0, RED);
    matrix.set(3, 3, true);

    let cropped = matrix.crop(-1, -1, 3, 3);
    assert_eq!((cropped.width(), cropped.height()), (3, 3));
    assert!(cropped.is_lit(1, 1));
    assert_eq!(cropped.color(1, 1), RED);
    assert_eq!(cropped.lit_count(), 1);

    assert_eq!(matrix.crop(2, 2, 4, 4).lit_count(), 1);
}

#[test]
fn blit_raster_respects_alpha_and_clip() {
    let mut image = RasterImage::filled(4, 2, [200, 10, 10, 255]);
    image.set_pixel(0, 0, [255, 255, 255, 40]);

    let mut matrix = LedMatrix::new(8, 4);
    matrix.blit_raster(&image, 1, 1, (0, 0, 3, 8));
    assert!(!matrix.is_lit(1, 1), "low alpha stays unlit");
    assert!(matrix.is_lit(2, 1));
    assert!(matrix.is_lit(2, 2));
    assert!(!matrix.is_lit(3, 1), "clipped by the zone width");
    assert_eq!(matrix.color(2, 2), RGB8::new(200, 10, 10));
}
