pub mod aggregate;
pub mod features;
pub mod landmarks;
pub mod metrics;

pub use aggregate::SwingAggregator;
pub use features::{FeatureExtractor, FrameFeatures};
pub use landmarks::{Point2, SwingLandmarks};
pub use metrics::{SwingMetrics, ANALYSIS_VERSION};
