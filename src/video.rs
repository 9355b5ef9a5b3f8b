use anyhow::{Context, Result};
use opencv::{
    core::Mat,
    prelude::*,
    videoio::{self, VideoCapture, VideoCaptureAPIs, VideoCaptureTrait},
};
use std::path::Path;

/// OpenCVを使用した動画ファイルリーダー
///
/// フレームは先頭から順に読み出す。途中での読み込み失敗は
/// ストリーム終端として扱う。
pub struct VideoFile {
    capture: VideoCapture,
    fps: f32,
    total_frames: u32,
}

impl VideoFile {
    /// 動画ファイルを開く
    ///
    /// コンテナのFPSが取得できない場合 (0以下/NaN) は fallback_fps を使う。
    pub fn open<P: AsRef<Path>>(path: P, fallback_fps: f32) -> Result<Self> {
        let path = path.as_ref();
        let path_str = path
            .to_str()
            .with_context(|| format!("Invalid video path: {}", path.display()))?;

        let capture = VideoCapture::from_file(path_str, VideoCaptureAPIs::CAP_ANY as i32)
            .with_context(|| format!("Failed to open video: {}", path.display()))?;

        if !capture.is_opened()? {
            anyhow::bail!("Video {} is not readable", path.display());
        }

        let raw_fps = capture.get(videoio::CAP_PROP_FPS)? as f32;
        let fps = if raw_fps.is_finite() && raw_fps > 0.0 {
            raw_fps
        } else {
            fallback_fps
        };

        // コンテナによっては負値や0が返る
        let raw_count = capture.get(videoio::CAP_PROP_FRAME_COUNT)?;
        let total_frames = if raw_count.is_finite() && raw_count > 0.0 {
            raw_count as u32
        } else {
            0
        };

        Ok(Self {
            capture,
            fps,
            total_frames,
        })
    }

    /// 実効FPS (フォールバック適用済み)
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// コンテナメタデータ上の総フレーム数 (不明なら0)
    pub fn total_frames(&self) -> u32 {
        self.total_frames
    }

    /// 次のフレームを読み込む (BGR形式)。終端でNone。
    pub fn next_frame(&mut self) -> Option<Mat> {
        let mut frame = Mat::default();
        match self.capture.read(&mut frame) {
            Ok(true) if !frame.empty() => Some(frame),
            _ => None,
        }
    }
}
