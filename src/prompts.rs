use crate::models::{BackgroundPreset, PoseAction};

pub const POSE_HUG: &str = include_str!("../data/prompts/pose_hug.txt");
pub const POSE_KISS: &str = include_str!("../data/prompts/pose_kiss.txt");
pub const OUTFIT_NEW: &str = include_str!("../data/prompts/outfit_new.txt");
pub const OUTFIT_SAME: &str = include_str!("../data/prompts/outfit_same.txt");

/// Replace `{{key}}` placeholders in a template string.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}

/// Render the full generation instruction for one attempt.
///
/// Pure and deterministic: the same selections always yield the identical
/// string. The background fragment is appended verbatim from the preset.
pub fn build_instruction(
    background: BackgroundPreset,
    new_outfits: bool,
    pose: PoseAction,
) -> String {
    let template = match pose {
        PoseAction::Hug => POSE_HUG,
        PoseAction::Kiss => POSE_KISS,
    };

    let outfit = if new_outfits {
        OUTFIT_NEW.trim_end()
    } else {
        OUTFIT_SAME.trim_end()
    };

    render(
        template.trim_end(),
        &[
            ("outfit", outfit),
            ("background", background.instruction_fragment()),
        ],
    )
}
