pub mod detector;
pub mod keypoint;

pub use detector::PoseDetector;
pub use keypoint::{Keypoint, KeypointIndex, Pose};
