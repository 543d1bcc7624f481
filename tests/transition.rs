use tabela_kit::color::RED;
use tabela_kit::matrix::LedMatrix;
use tabela_kit::program::TransitionKind;
use tabela_kit::transition::compose;

const ALL_KINDS: [TransitionKind; 7] = [
    TransitionKind::None,
    TransitionKind::Fade,
    TransitionKind::SlideLeft,
    TransitionKind::SlideRight,
    TransitionKind::SlideUp,
    TransitionKind::SlideDown,
    TransitionKind::Wipe,
];

fn lit(width: usize, height: usize) -> LedMatrix {
    let mut matrix = LedMatrix::new(width, height);
    for y_index in 0..height {
        for x_index in 0..width {
            matrix.set_color(x_index, y_index, RED);
        }
    }
    matrix
}

fn lit_columns(matrix: &LedMatrix) -> Vec<usize> {
    (0..matrix.width())
        .filter(|x_index| (0..matrix.height()).all(|y_index| matrix.is_lit(*x_index, y_index)))
        .collect()
}

#[test]
fn endpoints_show_from_then_to() {
    let from = lit(8, 4);
    let to = LedMatrix::new(8, 4);
    for kind in ALL_KINDS {
        assert_eq!(compose(&from, &to, kind, 0.0), from, "{kind:?} at 0");
        assert_eq!(compose(&from, &to, kind, 1.0), to, "{kind:?} at 1");
        assert_eq!(compose(&from, &to, kind, 7.0), to, "{kind:?} clamps");
    }
}

#[test]
fn slide_left_pushes_from_the_right() {
    let half = compose(&lit(4, 2), &LedMatrix::new(4, 2), TransitionKind::SlideLeft, 0.5);
    assert_eq!(lit_columns(&half), [0, 1]);

    let half = compose(&lit(4, 2), &LedMatrix::new(4, 2), TransitionKind::SlideRight, 0.5);
    assert_eq!(lit_columns(&half), [2, 3]);
}

#[test]
fn wipe_reveals_left_to_right() {
    let half = compose(&LedMatrix::new(4, 2), &lit(4, 2), TransitionKind::Wipe, 0.5);
    assert_eq!(lit_columns(&half), [0, 1]);
    assert_eq!(half.color(0, 0), RED);
}

#[test]
fn fade_dissolves_evenly() {
    let from = LedMatrix::new(4, 4);
    let to = lit(4, 4);
    assert_eq!(compose(&from, &to, TransitionKind::Fade, 0.5).lit_count(), 8);
    assert_eq!(compose(&from, &to, TransitionKind::Fade, 0.25).lit_count(), 4);

    let mut previous = 0;
    for step in 0..=16 {
        let count = compose(&from, &to, TransitionKind::Fade, step as f32 / 16.0).lit_count();
        assert!(count >= previous);
        previous = count;
    }
}

#[test]
fn output_takes_the_incoming_size() {
    let frame = compose(&lit(2, 2), &LedMatrix::new(5, 3), TransitionKind::None, 0.2);
    assert_eq!((frame.width(), frame.height()), (5, 3));
    assert_eq!(frame.lit_count(), 4);
}
