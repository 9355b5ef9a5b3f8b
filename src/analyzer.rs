use anyhow::Result;
use opencv::core::Mat;
use std::path::Path;

use crate::config::Config;
use crate::error::AnalysisError;
use crate::pose::PoseDetector;
use crate::swing::{FeatureExtractor, FrameFeatures, SwingAggregator, SwingLandmarks, SwingMetrics};
use crate::video::VideoFile;

/// 動画ファイル1本をスイングメトリクスに変換するパイプライン
///
/// デコード → 姿勢検出 → 特徴量抽出 → 集約の直列実行。
/// モデルの読み込みは構築時に一度だけ。解析同士は状態を共有しない。
pub struct SwingAnalyzer {
    config: Config,
    detector: PoseDetector,
}

impl SwingAnalyzer {
    pub fn new(config: Config) -> Result<Self> {
        let detector = PoseDetector::new(&config.detector.model_path)?;
        Ok(Self { config, detector })
    }

    /// 動画ファイルを解析する
    pub fn analyze_file<P: AsRef<Path>>(&mut self, path: P) -> Result<SwingMetrics, AnalysisError> {
        let mut video = VideoFile::open(path, self.config.video.fallback_fps)
            .map_err(|e| AnalysisError::VideoUnreadable(format!("{:#}", e)))?;

        let fps = video.fps();
        let total_frames = video.total_frames();

        let mut extractor = FeatureExtractor::new(self.config.analysis.dominant_side, fps);
        let mut frames: Vec<FrameFeatures> = Vec::new();
        let mut frame_count: u32 = 0;

        while let Some(frame) = video.next_frame() {
            frame_count += 1;
            if let Some(landmarks) = self.detect_landmarks(&frame) {
                frames.push(extractor.extract(frame_count, &landmarks));
            }
        }

        let aggregator = SwingAggregator::from_config(&self.config);
        aggregator.aggregate(&frames, fps, frame_count, total_frames)
    }

    /// 1フレーム分の検出。失敗はフレームスキップ扱い
    fn detect_landmarks(&mut self, frame: &Mat) -> Option<SwingLandmarks> {
        let pose = self.detector.detect(frame).ok()?;
        SwingLandmarks::from_pose(&pose, self.config.detector.min_confidence)
    }
}
