use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// 利き手側。腕角度・手首追跡に使う関節の選択
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DominantSide {
    Left,
    #[default]
    Right,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub video: VideoConfig,
    #[serde(default)]
    pub detector: DetectorConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub validity: ValidityConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct VideoConfig {
    /// コンテナからFPSが取れない場合のフォールバック
    #[serde(default = "default_fallback_fps")]
    pub fallback_fps: f32,
}

fn default_fallback_fps() -> f32 { 30.0 }

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            fallback_fps: default_fallback_fps(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DetectorConfig {
    /// MoveNet ONNXモデルのパス
    #[serde(default = "default_model_path")]
    pub model_path: String,
    /// キーポイント採用の信頼度閾値
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f32,
}

fn default_model_path() -> String { "models/movenet_lightning.onnx".to_string() }
fn default_min_confidence() -> f32 { 0.5 }

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            min_confidence: default_min_confidence(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub dominant_side: DominantSide,
}

/// スイングと認めるための最小基準 (妥当性ゲート)
#[derive(Debug, Deserialize, Clone)]
pub struct ValidityConfig {
    /// バックスイング最大角度の最小基準 (度)
    #[serde(default = "default_min_backswing_angle")]
    pub min_backswing_angle: f32,
    /// 肩回転範囲の最小基準 (度)
    #[serde(default = "default_min_shoulder_rotation")]
    pub min_shoulder_rotation: f32,
    /// 腰回転範囲の最小基準 (度)
    #[serde(default = "default_min_hip_rotation")]
    pub min_hip_rotation: f32,
    /// 肩幅の最小比率。画面内の被写体サイズフィルタ
    #[serde(default = "default_min_shoulder_span")]
    pub min_shoulder_span: f32,
}

fn default_min_backswing_angle() -> f32 { 60.0 }
fn default_min_shoulder_rotation() -> f32 { 25.0 }
fn default_min_hip_rotation() -> f32 { 10.0 }
fn default_min_shoulder_span() -> f32 { 0.1 }

impl Default for ValidityConfig {
    fn default() -> Self {
        Self {
            min_backswing_angle: default_min_backswing_angle(),
            min_shoulder_rotation: default_min_shoulder_rotation(),
            min_hip_rotation: default_min_hip_rotation(),
            min_shoulder_span: default_min_shoulder_span(),
        }
    }
}

/// 総合スコアの重みと理想値
#[derive(Debug, Deserialize, Clone)]
pub struct ScoringConfig {
    #[serde(default = "default_tempo_weight")]
    pub tempo_weight: f32,
    #[serde(default = "default_head_weight")]
    pub head_weight: f32,
    #[serde(default = "default_balance_weight")]
    pub balance_weight: f32,
    #[serde(default = "default_rotation_weight")]
    pub rotation_weight: f32,
    /// 理想のバックスイング:ダウンスイング時間比
    #[serde(default = "default_ideal_tempo_ratio")]
    pub ideal_tempo_ratio: f32,
    /// 理想の肩:腰回転範囲比
    #[serde(default = "default_ideal_rotation_ratio")]
    pub ideal_rotation_ratio: f32,
}

fn default_tempo_weight() -> f32 { 0.3 }
fn default_head_weight() -> f32 { 0.2 }
fn default_balance_weight() -> f32 { 0.2 }
fn default_rotation_weight() -> f32 { 0.3 }
fn default_ideal_tempo_ratio() -> f32 { 3.0 }
fn default_ideal_rotation_ratio() -> f32 { 2.0 }

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            tempo_weight: default_tempo_weight(),
            head_weight: default_head_weight(),
            balance_weight: default_balance_weight(),
            rotation_weight: default_rotation_weight(),
            ideal_tempo_ratio: default_ideal_tempo_ratio(),
            ideal_rotation_ratio: default_ideal_rotation_ratio(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// 設定ファイルが無い/壊れている場合はデフォルト値で動く
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path.as_ref()) {
            Ok(config) => config,
            Err(e) => {
                eprintln!(
                    "Config {} not loaded ({}), using defaults",
                    path.as_ref().display(),
                    e
                );
                Self::default()
            }
        }
    }
}
