use crate::{
    foundation::color::Color,
    foundation::error::ScenegridResult,
    grid::highlight::Selection,
    grid::model::Grid,
    scene::dsl::{MatrixBuilder, SceneBuilder},
    scene::model::{Arrangement, ArrowNode, Scene, UNIT_PX},
};

fn three_by_three() -> ScenegridResult<Grid> {
    Grid::from_rows([[1, 2, 3], [4, 5, 6], [7, 8, 9]])
}

/// `A` with its first column outlined and `B = Aᵀ` with its first row outlined.
fn outlined_pair(b: SceneBuilder) -> ScenegridResult<SceneBuilder> {
    let a = three_by_three()?;
    let t = a.transpose();
    b.matrix(
        "A",
        MatrixBuilder::new(a)
            .outline(Selection::Column(0), Color::RED)
            .build()?,
    )?
    .matrix(
        "B",
        MatrixBuilder::new(t)
            .outline(Selection::Row(0), Color::RED)
            .build()?,
    )
}

pub(super) fn simple_transposition() -> ScenegridResult<Scene> {
    outlined_pair(SceneBuilder::new("simple_transposition"))?
        .arrow("arrow", ArrowNode::horizontal())?
        .arrange("row", ["A", "arrow", "B"], Arrangement::Grid { cols: 3 }, UNIT_PX)?
        .root("row")
        .add("row")
        .build()
}

pub(super) fn intro_transposition() -> ScenegridResult<Scene> {
    outlined_pair(SceneBuilder::new("intro_transposition"))?
        .appear("A")
        .wait(1.0)
        .morph("A", "B")
        .wait(1.0)
        .disappear("B")
        .build()
}

pub(super) fn larger_transposition() -> ScenegridResult<Scene> {
    let a = Grid::sequential(6, 6, 0)?;
    let t = a.transpose();
    let spaced = |g: Grid| {
        MatrixBuilder::new(g)
            .h_buff(0.8 * UNIT_PX)
            .v_buff(0.9 * UNIT_PX)
            .font_size(30.0)
    };

    let mut source = spaced(a);
    for start in [3, 9, 15] {
        source = source.highlight(start, start + 3, Color::RED);
    }
    let mut transposed = spaced(t);
    for start in [18, 24, 30] {
        transposed = transposed.highlight(start, start + 3, Color::YELLOW);
    }

    SceneBuilder::new("larger_transposition")
        .matrix("A", source.build()?)?
        .arrow(
            "arrow",
            ArrowNode {
                length: 1.5 * UNIT_PX,
                ..ArrowNode::horizontal()
            },
        )?
        .matrix("B", transposed.build()?)?
        .arrange("row", ["A", "arrow", "B"], Arrangement::Grid { cols: 3 }, UNIT_PX)?
        .root("row")
        .add("row")
        .build()
}
