//! Built-in diagram scenes.
//!
//! Each scene is plain data assembled with [`SceneBuilder`](crate::scene::dsl::SceneBuilder)
//! or [`construct`](crate::scene::dsl::construct); [`build`] looks one up by name.

mod architecture;
mod channels;
mod pshufb;
mod transposition;

use crate::{
    foundation::error::{ScenegridError, ScenegridResult},
    scene::model::Scene,
};

type SceneFn = fn() -> ScenegridResult<Scene>;

const CATALOG: &[(&str, SceneFn)] = &[
    ("simple_transposition", transposition::simple_transposition),
    ("intro_transposition", transposition::intro_transposition),
    ("larger_transposition", transposition::larger_transposition),
    ("pshufb_instruction", pshufb::pshufb_instruction),
    ("channel_interleave", channels::channel_interleave),
    ("overall_architecture", architecture::overall_architecture),
];

/// Names of every built-in scene, in catalog order.
pub fn names() -> Vec<&'static str> {
    CATALOG.iter().map(|(name, _)| *name).collect()
}

/// Build the built-in scene called `name`.
pub fn build(name: &str) -> ScenegridResult<Scene> {
    let Some((_, f)) = CATALOG.iter().find(|(n, _)| *n == name) else {
        return Err(ScenegridError::validation(format!(
            "unknown catalog scene '{name}' (known: {})",
            names().join(", ")
        )));
    };
    f()
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/mod.rs"]
mod tests;
