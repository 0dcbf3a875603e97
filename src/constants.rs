//! Tuning constants shared by the focus and character systems.
//!
//! Distances are world units (centimetres); angles are radians unless the
//! name says otherwise.

/// Maximum distance at which a target can be acquired or kept.
pub const FOCUS_SEARCH_RADIUS: f32 = 3000.0;
/// Half extent of the cube swept during acquisition.
pub const PROBE_HALF_EXTENT: f32 = 500.0;
/// Distance ahead of the viewer where the acquisition sweep begins.
pub const SWEEP_START_OFFSET: f32 = 800.0;
/// Exponential smoothing speed of the aim while focused.
pub const FOCUS_INTERP_SPEED: f32 = 10.0;
/// Screen-space nudge applied to the focus indicator, in logical pixels.
pub const INDICATOR_OFFSET_X: f32 = 0.0;
/// Vertical part of the indicator nudge.
pub const INDICATOR_OFFSET_Y: f32 = -15.0;
/// Lifetime of the sweep debug shapes.
pub const DEBUG_DRAW_SECONDS: f32 = 1.0;
/// Pixel-unit wheel travel that counts as one target step.
pub const SCROLL_PIXELS_PER_STEP: f32 = 100.0;

/// Walking speed in units per second.
pub const MOVE_SPEED: f32 = 600.0;
/// Character turn rate while facing the movement direction.
pub const ROTATION_RATE_DEGREES: f32 = 500.0;
/// Radians of aim per unit of mouse motion.
pub const LOOK_SENSITIVITY: f32 = 0.0025;
/// Free-look pitch stays strictly inside the vertical to keep yaw defined.
pub const PITCH_LIMIT_DEGREES: f32 = 89.0;
/// Distance from the pivot to the camera.
pub const ARM_LENGTH: f32 = 400.0;
/// Height of the camera pivot above the character origin.
pub const PIVOT_HEIGHT: f32 = 60.0;
