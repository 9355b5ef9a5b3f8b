use super::features::FrameFeatures;
use super::metrics::{round2, SwingMetrics};
use crate::config::{Config, ScoringConfig, ValidityConfig};
use crate::error::{AnalysisError, RejectionReason};

/// テンポスコアの傾き: 理想比から1離れるごとに30点減
const TEMPO_SCORE_SLOPE: f32 = 30.0;
/// 頭部ブレスコアの傾き: 1%ごとに3点減
const HEAD_SCORE_SLOPE: f32 = 3.0;
/// 回転効率が0点になる理想比からの距離
const EFFICIENCY_FALLOFF: f32 = 2.0;

/// 特徴量シーケンスをスイングメトリクスに集約する
///
/// シーケンスとメタデータの純関数。ゲート棄却と空シーケンスだけが
/// エラーで、それ以外は未定義メトリクスをNoneにしたレコードを返す。
pub struct SwingAggregator {
    validity: ValidityConfig,
    scoring: ScoringConfig,
}

/// テンポ計算の途中結果
struct Tempo {
    backswing_time_sec: Option<f32>,
    downswing_time_sec: Option<f32>,
    tempo_ratio: Option<f32>,
}

const TEMPO_UNDEFINED: Tempo = Tempo {
    backswing_time_sec: None,
    downswing_time_sec: None,
    tempo_ratio: None,
};

impl SwingAggregator {
    pub fn new(validity: ValidityConfig, scoring: ScoringConfig) -> Self {
        Self { validity, scoring }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.validity.clone(), config.scoring.clone())
    }

    /// シーケンス全体をメトリクスに畳み込む
    ///
    /// frames_analyzed はデコードできた全フレーム数 (姿勢の有無は問わない)。
    /// 妥当性ゲートは丸め済みの値で判定する。
    pub fn aggregate(
        &self,
        frames: &[FrameFeatures],
        fps: f32,
        frames_analyzed: u32,
        total_frames: u32,
    ) -> Result<SwingMetrics, AnalysisError> {
        if frames.is_empty() {
            return Err(AnalysisError::NoPoseDetected);
        }

        // 基本メトリクス
        let backswing_angle = round2(fold_max(frames.iter().map(|f| f.backswing_angle)));
        let follow_through_angle = round2(fold_max(frames.iter().map(|f| f.follow_through_angle)));
        let impact_speed = match frames.iter().filter_map(|f| f.wrist_speed).fold(None, fold_max_opt) {
            Some(max) => round2(max),
            None => 0.0,
        };
        let balance_mean = frames.iter().map(|f| f.balance).sum::<f32>() / frames.len() as f32;
        let balance_score = round2(balance_mean.clamp(0.0, 1.0));

        let tempo = detect_tempo(frames, fps);
        let head_movement_pct = Some(head_movement(frames));

        let shoulder_rotation_range = angle_range(frames.iter().map(|f| f.shoulder_line_angle));
        let hip_rotation_range = angle_range(frames.iter().map(|f| f.hip_line_angle));

        // 妥当性ゲート。被写体サイズ棄却の方が具体的な診断なので先に判定する
        let max_shoulder_span = fold_max(frames.iter().map(|f| f.shoulder_span));
        if max_shoulder_span < self.validity.min_shoulder_span {
            return Err(AnalysisError::SwingNotRecognized(
                RejectionReason::SubjectTooSmall,
            ));
        }
        let motion_too_small = backswing_angle < self.validity.min_backswing_angle
            && shoulder_rotation_range.map_or(true, |r| r < self.validity.min_shoulder_rotation)
            && hip_rotation_range.map_or(true, |r| r < self.validity.min_hip_rotation);
        if motion_too_small {
            return Err(AnalysisError::SwingNotRecognized(
                RejectionReason::InsufficientMotion,
            ));
        }

        let rotation_efficiency =
            self.rotation_efficiency(shoulder_rotation_range, hip_rotation_range);
        let overall_score = self.compose_overall(
            tempo.tempo_ratio,
            head_movement_pct,
            Some(balance_score),
            rotation_efficiency,
        );

        Ok(SwingMetrics {
            backswing_angle,
            impact_speed,
            follow_through_angle,
            balance_score,
            tempo_ratio: tempo.tempo_ratio,
            backswing_time_sec: tempo.backswing_time_sec,
            downswing_time_sec: tempo.downswing_time_sec,
            head_movement_pct,
            shoulder_rotation_range,
            hip_rotation_range,
            rotation_efficiency,
            overall_score,
            frames_analyzed,
            total_frames,
        })
    }

    /// 肩:腰回転比を理想値と比べた効率スコア (0〜100)
    ///
    /// どちらかの範囲が未定義、または腰の範囲が0なら未定義。
    fn rotation_efficiency(
        &self,
        shoulder_range: Option<f32>,
        hip_range: Option<f32>,
    ) -> Option<u32> {
        let (shoulder, hip) = match (shoulder_range, hip_range) {
            (Some(s), Some(h)) if h != 0.0 => (s, h),
            _ => return None,
        };

        let diff = (shoulder / hip - self.scoring.ideal_rotation_ratio).abs();
        let score = if diff >= EFFICIENCY_FALLOFF {
            0.0
        } else {
            (1.0 - diff / EFFICIENCY_FALLOFF) * 100.0
        };
        Some(score.clamp(0.0, 100.0).round() as u32)
    }

    /// 定義済みコンポーネントの重み付き平均 (0〜100)
    ///
    /// 未定義コンポーネントの重みは除外し、残りで再正規化する。
    /// 全コンポーネントが未定義なら None。
    fn compose_overall(
        &self,
        tempo_ratio: Option<f32>,
        head_movement_pct: Option<f32>,
        balance_score: Option<f32>,
        rotation_efficiency: Option<u32>,
    ) -> Option<u32> {
        let mut weighted_sum = 0.0f32;
        let mut total_weight = 0.0f32;

        if let Some(tempo) = tempo_ratio {
            let diff = (tempo - self.scoring.ideal_tempo_ratio).abs();
            let score = (100.0 - diff * TEMPO_SCORE_SLOPE).max(0.0);
            weighted_sum += score * self.scoring.tempo_weight;
            total_weight += self.scoring.tempo_weight;
        }
        if let Some(head) = head_movement_pct {
            let score = (100.0 - head * HEAD_SCORE_SLOPE).max(0.0);
            weighted_sum += score * self.scoring.head_weight;
            total_weight += self.scoring.head_weight;
        }
        if let Some(balance) = balance_score {
            let score = balance.clamp(0.0, 1.0) * 100.0;
            weighted_sum += score * self.scoring.balance_weight;
            total_weight += self.scoring.balance_weight;
        }
        if let Some(efficiency) = rotation_efficiency {
            weighted_sum += efficiency as f32 * self.scoring.rotation_weight;
            total_weight += self.scoring.rotation_weight;
        }

        if total_weight > 0.0 {
            Some((weighted_sum / total_weight).round() as u32)
        } else {
            None
        }
    }
}

/// テンポ検出
///
/// トップ = 手首yが最小のレコード (同値なら最初)。インパクト = トップ以降で
/// 手首のステップ移動が最大になる区間の終端レコード (同値なら最初)。
/// 開始 < トップ < インパクト がフレーム番号で厳密に成立する場合のみ定義。
fn detect_tempo(frames: &[FrameFeatures], fps: f32) -> Tempo {
    if frames.len() < 3 || fps <= 0.0 {
        return TEMPO_UNDEFINED;
    }

    let mut top_idx = 0;
    for (i, f) in frames.iter().enumerate() {
        if f.wrist.y < frames[top_idx].wrist.y {
            top_idx = i;
        }
    }

    let start_frame = frames[0].frame_no;
    let top_frame = frames[top_idx].frame_no;

    if top_idx + 1 >= frames.len() {
        return TEMPO_UNDEFINED;
    }
    let mut max_speed = -1.0f32;
    let mut max_step = top_idx;
    for j in top_idx..frames.len() - 1 {
        let speed = frames[j].wrist.distance_to(frames[j + 1].wrist) * fps;
        if speed > max_speed {
            max_speed = speed;
            max_step = j;
        }
    }
    let impact_frame = frames[max_step + 1].frame_no;

    if !(start_frame < top_frame && top_frame < impact_frame) {
        return TEMPO_UNDEFINED;
    }

    let backswing_time_sec = round2((top_frame - start_frame) as f32 / fps);
    let downswing_time_sec = round2((impact_frame - top_frame) as f32 / fps);
    let tempo_ratio = if downswing_time_sec > 0.0 {
        Some(round2(backswing_time_sec / downswing_time_sec))
    } else {
        None
    };

    Tempo {
        backswing_time_sec: Some(backswing_time_sec),
        downswing_time_sec: Some(downswing_time_sec),
        tempo_ratio,
    }
}

/// 初期頭位置からの最大移動距離 × 100
fn head_movement(frames: &[FrameFeatures]) -> f32 {
    let base = frames[0].head;
    let mut max_dist = 0.0f32;
    for f in frames {
        let dist = base.distance_to(f.head);
        if dist > max_dist {
            max_dist = dist;
        }
    }
    round2(max_dist * 100.0)
}

/// 角度列の max - min。サンプルが2未満なら未定義
fn angle_range(values: impl Iterator<Item = f32>) -> Option<f32> {
    let mut count = 0usize;
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for v in values {
        count += 1;
        min = min.min(v);
        max = max.max(v);
    }
    if count < 2 {
        return None;
    }
    Some(round2(max - min))
}

fn fold_max(values: impl Iterator<Item = f32>) -> f32 {
    values.fold(0.0f32, f32::max)
}

fn fold_max_opt(acc: Option<f32>, v: f32) -> Option<f32> {
    match acc {
        Some(max) if max >= v => Some(max),
        _ => Some(v),
    }
}
