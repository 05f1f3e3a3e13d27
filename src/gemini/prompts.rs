//! Prompt text sent to the generation service
//!
//! All prompts are deterministic functions of their inputs.

use crate::store::ClothingItem;

/// Asks the text model for one clothing item description
pub const DESCRIPTION_PROMPT: &str = "Describe a single, common, and stylish clothing item for a photorealistic image generation model. Be specific about the type and color. For example: 'a black leather biker jacket' or 'a pair of classic blue jeans' or 'a stylish white linen summer dress'.";

/// Instruction for dressing the model in the given items
pub fn styled_image_prompt(items: &[ClothingItem]) -> String {
    let item_names = items
        .iter()
        .map(|item| item.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "**TASK:** Your sole task is to photorealistically dress the model in the provided base image with the clothing items from the reference images.\n\
         \n\
         **STRICT RULES:**\n\
         - **DO NOT CHANGE THE MODEL:** The model's pose, body shape, skin tone, facial features, and position MUST remain completely unchanged.\n\
         - **DO NOT CHANGE THE BACKGROUND:** The background of the base image must be preserved exactly.\n\
         - **DO NOT CHANGE THE LIGHTING:** Maintain the original lighting of the base image.\n\
         - **USE REFERENCE IMAGES:** Each clothing item must match its reference image in style, color, and texture as closely as possible.\n\
         - **FINAL IMAGE:** The output should be a single image of the model wearing the specified clothes: {item_names}."
    )
}

/// Product-shot prompt for a single clothing item
pub fn item_image_prompt(description: &str) -> String {
    format!(
        "{description}, on a plain white background, studio lighting, photorealistic. The image should be a PNG with a transparent background."
    )
}

/// Clean up a model-written description: trim and drop double quotes
pub fn clean_description(raw: &str) -> String {
    raw.trim().replace('"', "").trim().to_string()
}

/// Upper-case the first character for display
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
