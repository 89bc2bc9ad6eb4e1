//! Visions domain state

use crate::VisionController;

/// Application state for the Visions domain
#[derive(Clone)]
pub struct VisionsState {
    pub controller: VisionController,
    #[cfg(feature = "mock-image")]
    pub mock_image: Option<horizon_imagegen::mock::MockImageService>,
}

impl VisionsState {
    pub fn new(controller: VisionController) -> Self {
        Self {
            controller,
            #[cfg(feature = "mock-image")]
            mock_image: None,
        }
    }
}
