use crate::{
    foundation::error::ScenegridResult,
    scene::dsl::SceneBuilder,
    scene::model::{
        Anchor, AnchorRef, Arrangement, ArrowNode, BoxNode, LabelNode, Scene, UNIT_PX,
    },
};

const BOX_SIDE: f64 = 1.8 * UNIT_PX;
const STACK_GAP: f64 = 0.5 * UNIT_PX;
const LAYER_GAP: f64 = 2.0 * UNIT_PX;

fn component(title: &str, subtitle: &str) -> BoxNode {
    BoxNode::new(
        BOX_SIDE,
        vec![
            LabelNode {
                font_size: 18.0,
                ..LabelNode::new(title)
            },
            LabelNode {
                font_size: 15.0,
                ..LabelNode::new(subtitle)
            },
        ],
    )
}

fn link(from: &str, to: &str) -> ArrowNode {
    ArrowNode {
        buff: 0.1 * UNIT_PX,
        ..ArrowNode::between(
            AnchorRef::node(from, Anchor::Right),
            AnchorRef::node(to, Anchor::Left),
        )
    }
}

/// Platform backends feeding a JNI layer, an image interface and two frontends.
pub(super) fn overall_architecture() -> ScenegridResult<Scene> {
    let mut b = SceneBuilder::new("overall_architecture")
        .boxed("windows", component("zune-image", "x86-64 Windows"))?
        .boxed("linux", component("zune-image", "x86-64 Linux"))?
        .arrange("backends", ["windows", "linux"], Arrangement::Column, STACK_GAP)?
        .boxed("jni", component("JNI layer", "Kotlin"))?
        .arrange("native", ["backends", "jni"], Arrangement::Row, LAYER_GAP)?
        .boxed("interface", component("ZilImageInterface", "Image interface"))?
        .arrange("core", ["native", "interface"], Arrangement::Row, LAYER_GAP)?
        .boxed("android", component("ZilAndroidBitmap", "Android"))?
        .boxed("desktop", component("ZilBitmap", "Desktop"))?
        .arrange(
            "frontends",
            ["android", "desktop"],
            Arrangement::Column,
            STACK_GAP,
        )?
        .arrange("diagram", ["core", "frontends"], Arrangement::Row, LAYER_GAP)?
        .root("diagram")
        .add("diagram");

    for (id, from, to) in [
        ("windows_to_jni", "windows", "jni"),
        ("linux_to_jni", "linux", "jni"),
        ("jni_to_interface", "jni", "interface"),
        ("interface_to_android", "interface", "android"),
        ("interface_to_desktop", "interface", "desktop"),
    ] {
        b = b.arrow(id, link(from, to))?.add(id);
    }
    b.build()
}
