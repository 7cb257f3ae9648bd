use crate::{
    foundation::error::ScenegridResult,
    grid::model::Grid,
    scene::dsl::SceneBuilder,
    scene::model::{Arrangement, LabelNode, MatrixNode, Scene, UNIT_PX},
};

/// Byte order produced by the shuffle mask.
const SHUFFLED: [i64; 16] = [15, 7, 14, 6, 13, 5, 12, 4, 11, 3, 10, 2, 9, 1, 8, 0];

fn register(values: impl IntoIterator<Item = i64>) -> ScenegridResult<MatrixNode> {
    let mut m = MatrixNode::new(Grid::from_rows([values.into_iter().collect::<Vec<_>>()])?);
    m.h_buff = 0.85 * UNIT_PX;
    Ok(m)
}

fn caption(text: &str) -> LabelNode {
    LabelNode {
        font_size: 24.0,
        ..LabelNode::new(text)
    }
}

pub(super) fn pshufb_instruction() -> ScenegridResult<Scene> {
    SceneBuilder::new("pshufb_instruction")
        .label("source_caption", caption("SSE register"))?
        .matrix("source", register(0..16)?)?
        .label("shuffled_caption", caption("SSE register 2"))?
        .matrix("shuffled", register(SHUFFLED)?)?
        .matrix("result", register(SHUFFLED)?)?
        .arrange(
            "column",
            [
                "source_caption",
                "source",
                "shuffled_caption",
                "shuffled",
                "result",
            ],
            Arrangement::Column,
            UNIT_PX,
        )?
        .root("column")
        .add("column")
        .build()
}
