use serde::{Deserialize, Serialize};

/// 解析アルゴリズムのバージョン識別子。レポートに添付される
pub const ANALYSIS_VERSION: &str = "v2";

/// 小数2桁への丸め
pub fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

/// スイング1本分の解析結果
///
/// 前提条件を満たせなかったメトリクスは None (JSONではnull)。
/// 0や-1のような番兵値は使わない。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwingMetrics {
    /// 肩-肘-手首角度の最大値 (度)
    pub backswing_angle: f32,
    /// 手首速度の最大値。速度サンプルが無ければ0.0
    pub impact_speed: f32,
    /// 腰-肩-肘角度の最大値 (度)
    pub follow_through_angle: f32,
    /// フレーム平均のバランス値 (0〜1)
    pub balance_score: f32,
    /// バックスイング時間 / ダウンスイング時間
    pub tempo_ratio: Option<f32>,
    pub backswing_time_sec: Option<f32>,
    pub downswing_time_sec: Option<f32>,
    /// 初期頭位置からの最大移動距離 × 100
    pub head_movement_pct: Option<f32>,
    /// 肩ライン角度の max - min (度)
    pub shoulder_rotation_range: Option<f32>,
    /// 腰ライン角度の max - min (度)
    pub hip_rotation_range: Option<f32>,
    /// 肩:腰回転比の理想値への近さ (0〜100)
    pub rotation_efficiency: Option<u32>,
    /// 重み付き総合スコア (0〜100)
    pub overall_score: Option<u32>,
    /// デコードできたフレーム数 (姿勢の有無は問わない)
    pub frames_analyzed: u32,
    /// コンテナメタデータ上の総フレーム数
    pub total_frames: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.234), 1.23);
        assert_eq!(round2(1.236), 1.24);
        assert_eq!(round2(-0.066666), -0.07);
        assert_eq!(round2(0.1), 0.1);
    }

    #[test]
    fn test_undefined_metrics_serialize_as_null() {
        let metrics = SwingMetrics {
            backswing_angle: 95.5,
            impact_speed: 2.41,
            follow_through_angle: 48.2,
            balance_score: 0.97,
            tempo_ratio: None,
            backswing_time_sec: None,
            downswing_time_sec: None,
            head_movement_pct: Some(4.2),
            shoulder_rotation_range: Some(61.3),
            hip_rotation_range: Some(28.9),
            rotation_efficiency: Some(94),
            overall_score: Some(88),
            frames_analyzed: 142,
            total_frames: 150,
        };

        let value = serde_json::to_value(&metrics).unwrap();
        assert!(value["tempo_ratio"].is_null());
        assert_eq!(value["rotation_efficiency"], 94);
        assert_eq!(value["frames_analyzed"], 142);

        let back: SwingMetrics = serde_json::from_value(value).unwrap();
        assert_eq!(back, metrics);
    }
}
