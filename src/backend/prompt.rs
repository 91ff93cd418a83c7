//! Instruction text sent alongside the two source images

use crate::studio::types::{AspectRatio, BackgroundStyle};

pub fn build_instruction(
    scene: &str,
    background: BackgroundStyle,
    aspect_ratio: AspectRatio,
) -> String {
    format!(
        "Create a professional, ultra-realistic 4K advertising photograph by seamlessly combining the provided model and product images.

Scene description: \"{scene}\"

Key requirements:
- The final image must be photorealistic with natural skin textures and cinematic lighting.
- Background Style: {background}.
- Aspect Ratio: {aspect_ratio}.
- The model should be holding or interacting with the product naturally.
- The product must be clearly visible, true to its original form, and not distorted.
- The final output resolution must be 4K.

Analyze the model and product images, then generate the composite advertising image based on these instructions.",
        scene = scene,
        background = background.value(),
        aspect_ratio = aspect_ratio.value(),
    )
}
