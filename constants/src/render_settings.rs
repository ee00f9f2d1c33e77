use bevy::color::Color;

/// Focus square colour while the estimate comes from sparse features.
pub const FOCUS_OPEN_COLOUR: Color = Color::srgb(1.0, 0.83, 0.2);

/// Focus square colour once snapped to a detected plane.
pub const FOCUS_CLOSED_COLOUR: Color = Color::srgb(1.0, 0.93, 0.6);

/// Focus square colour on the first visit of a plane.
pub const FOCUS_FLASH_COLOUR: Color = Color::WHITE;

/// Placeholder colour for emoji objects without a model.
pub const EMOJI_PLACEHOLDER_COLOUR: Color = Color::srgb(1.0, 0.8, 0.1);

/// Colour of 3D text blocks.
pub const TEXT_COLOUR: Color = Color::srgb(0.95, 0.95, 0.95);

/// Colour of the selected object's highlight.
pub const SELECTED_COLOUR: Color = Color::srgb(1.0, 0.0, 0.0);

/// Status line font size.
pub const STATUS_FONT_SIZE: f32 = 18.0;
