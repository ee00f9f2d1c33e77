/// Seconds an immediate status message stays visible.
pub const MESSAGE_DISPLAY_SECS: f32 = 6.0;

/// Delay before prompting the user to find a surface after a session reset.
pub const PLANE_ESTIMATION_DELAY_SECS: f32 = 3.5;

/// Delay before prompting the user to move while no surface is found.
pub const FOCUS_SQUARE_DELAY_SECS: f32 = 5.0;

pub const FIND_SURFACE_MESSAGE: &str = "FIND A SURFACE TO PLACE AN OBJECT";

pub const TRY_MOVING_MESSAGE: &str = "TRY MOVING LEFT OR RIGHT";

pub const CANNOT_PLACE_MESSAGE: &str = "CANNOT PLACE OBJECT\nTry moving left or right.";

pub const LOAD_FAILED_MESSAGE: &str = "COULD NOT LOAD OBJECT";

/// Delay before a tracking problem escalates to a reset suggestion.
pub const TRACKING_ESCALATION_DELAY_SECS: f32 = 3.0;

/// Delay before prompting to place content once a surface is found.
pub const CONTENT_PLACEMENT_DELAY_SECS: f32 = 7.5;

pub const TRACKING_UNAVAILABLE_MESSAGE: &str = "TRACKING UNAVAILABLE";

pub const TRACKING_LIMITED_MESSAGE: &str = "TRACKING LIMITED\nMove the device more slowly.";

pub const RESET_SUGGESTION: &str = "Try resetting the session.";

pub const SURFACE_DETECTED_MESSAGE: &str = "SURFACE DETECTED";

pub const TAP_TO_PLACE_MESSAGE: &str = "TAP + TO PLACE AN OBJECT";
