use crate::{
    foundation::color::Color,
    foundation::error::ScenegridResult,
    grid::model::Grid,
    scene::dsl::{MatrixBuilder, SceneBuilder},
    scene::model::{Arrangement, MatrixNode, Scene, UNIT_PX},
};

/// Entry colors of the interleaved matrix, by flat index modulo 4.
const INTERLEAVED_PALETTE: [Color; 4] = [Color::WHITE, Color::RED, Color::GREEN, Color::BLUE];

fn plane(rows: [[i64; 2]; 2], tint: Option<Color>) -> ScenegridResult<MatrixNode> {
    let mut m = MatrixBuilder::new(Grid::from_rows(rows)?).h_buff(UNIT_PX);
    if let Some(c) = tint {
        m = m.tint(c);
    }
    m.build()
}

/// Four separate R, G, B, A planes merging into one interleaved pixel matrix.
pub(super) fn channel_interleave() -> ScenegridResult<Scene> {
    let interleaved = Grid::from_rows([
        [255, 0, 4, 8, 255, 2, 6, 10],
        [255, 1, 5, 9, 255, 3, 7, 11],
    ])?;

    SceneBuilder::new("channel_interleave")
        .matrix("red", plane([[0, 1], [2, 3]], Some(Color::RED))?)?
        .matrix("green", plane([[4, 5], [6, 7]], Some(Color::GREEN))?)?
        .matrix("blue", plane([[8, 9], [10, 11]], Some(Color::BLUE))?)?
        .matrix("alpha", plane([[255, 255], [255, 255]], None)?)?
        .arrange(
            "planes",
            ["red", "green", "blue", "alpha"],
            Arrangement::Row,
            UNIT_PX,
        )?
        .matrix(
            "interleaved",
            MatrixBuilder::new(interleaved)
                .cycle(INTERLEAVED_PALETTE)
                .build()?,
        )?
        .appear("planes")
        .wait(1.0)
        .morph("planes", "interleaved")
        .wait(1.0)
        .disappear("interleaved")
        .build()
}
