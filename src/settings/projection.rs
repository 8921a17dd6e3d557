use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Projection", inline)]
#[serde(default)]
/// Initial perspective projection parameters.
pub struct ProjectionSettings {
    /// Viewport aspect ratio (width / height).
    #[schemars(title = "Aspect Ratio", range(min = 0.1, max = 10.0))]
    pub aspect_ratio: f32,
    /// Vertical field of view in degrees.
    #[schemars(
        title = "Field of View",
        range(min = 1.0, max = 179.0),
        extend("step" = 1.0)
    )]
    pub fov: f32,
    /// Near clipping plane distance.
    #[schemars(title = "Near Plane")]
    pub near: f32,
    /// Far clipping plane distance.
    #[schemars(title = "Far Plane")]
    pub far: f32,
}

impl Default for ProjectionSettings {
    fn default() -> Self {
        Self {
            aspect_ratio: 9.0 / 16.0,
            fov: 75.0,
            near: 1.0,
            far: 100.0,
        }
    }
}
