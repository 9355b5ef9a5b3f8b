use super::landmarks::{Point2, SwingLandmarks};
use crate::config::DominantSide;

/// 1フレーム分の特徴量レコード
///
/// frame_no はデコード順の1始まり連番。検出失敗フレームは
/// レコード自体が作られないため欠番になる。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameFeatures {
    pub frame_no: u32,
    /// 肩-肘-手首の内角 (度)。利き手側
    pub backswing_angle: f32,
    /// 腰-肩-肘の内角 (度)。利き手側
    pub follow_through_angle: f32,
    /// 1 - |左腰y - 右腰y|。1に近いほど腰が水平
    pub balance: f32,
    /// 右肩→左肩ベクトルの符号付き角度 (度)
    pub shoulder_line_angle: f32,
    /// 右腰→左腰ベクトルの符号付き角度 (度)
    pub hip_line_angle: f32,
    /// |左肩x - 右肩x|。被写体の画面上の大きさの推定値
    pub shoulder_span: f32,
    /// 利き手側の手首位置
    pub wrist: Point2,
    /// 頭 (鼻) の位置
    pub head: Point2,
    /// 直前レコードからの手首移動距離 × fps。最初のレコードではNone
    pub wrist_speed: Option<f32>,
}

/// 3点 a-b-c が頂点bに作る内角 (度, 0〜180)
pub fn joint_angle_deg(a: Point2, b: Point2, c: Point2) -> f32 {
    let angle = ((c.y - b.y).atan2(c.x - b.x) - (a.y - b.y).atan2(a.x - b.x))
        .to_degrees()
        .abs();
    if angle > 180.0 {
        360.0 - angle
    } else {
        angle
    }
}

/// from→to ベクトルの符号付き角度 (度, -180〜180]
pub fn line_angle_deg(from: Point2, to: Point2) -> f32 {
    (to.y - from.y).atan2(to.x - from.x).to_degrees()
}

/// ランドマークセットから1フレーム分の特徴量を計算する
///
/// 状態は直前レコードの手首位置だけ。検出失敗フレームを挟んでも
/// リセットされず、速度はギャップをまたいで計算される。
pub struct FeatureExtractor {
    side: DominantSide,
    fps: f32,
    prev_wrist: Option<Point2>,
}

impl FeatureExtractor {
    pub fn new(side: DominantSide, fps: f32) -> Self {
        Self {
            side,
            fps,
            prev_wrist: None,
        }
    }

    pub fn extract(&mut self, frame_no: u32, lm: &SwingLandmarks) -> FrameFeatures {
        let shoulder = lm.shoulder(self.side);
        let elbow = lm.elbow(self.side);
        let wrist = lm.wrist(self.side);
        let hip = lm.hip(self.side);

        let wrist_speed = self.prev_wrist.map(|prev| prev.distance_to(wrist) * self.fps);
        self.prev_wrist = Some(wrist);

        FrameFeatures {
            frame_no,
            backswing_angle: joint_angle_deg(shoulder, elbow, wrist),
            follow_through_angle: joint_angle_deg(hip, shoulder, elbow),
            balance: 1.0 - (lm.left_hip.y - lm.right_hip.y).abs(),
            shoulder_line_angle: line_angle_deg(lm.right_shoulder, lm.left_shoulder),
            hip_line_angle: line_angle_deg(lm.right_hip, lm.left_hip),
            shoulder_span: (lm.left_shoulder.x - lm.right_shoulder.x).abs(),
            wrist,
            head: lm.nose,
            wrist_speed,
        }
    }

    /// 手首の状態を破棄する。別の動画を続けて処理する場合に呼ぶ
    pub fn reset(&mut self) {
        self.prev_wrist = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32, eps: f32) -> bool {
        (a - b).abs() < eps
    }

    fn p(x: f32, y: f32) -> Point2 {
        Point2::new(x, y)
    }

    /// アドレス姿勢に近い素朴なランドマーク配置
    fn make_landmarks() -> SwingLandmarks {
        SwingLandmarks {
            nose: p(0.50, 0.20),
            left_shoulder: p(0.60, 0.35),
            right_shoulder: p(0.40, 0.35),
            left_elbow: p(0.63, 0.45),
            right_elbow: p(0.37, 0.45),
            left_wrist: p(0.58, 0.55),
            right_wrist: p(0.42, 0.55),
            left_hip: p(0.57, 0.60),
            right_hip: p(0.43, 0.60),
        }
    }

    #[test]
    fn test_joint_angle_straight_line() {
        // bがaとcの間にある一直線 → 180度
        let angle = joint_angle_deg(p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0));
        assert!(approx_eq(angle, 180.0, 1e-4), "angle = {}", angle);
    }

    #[test]
    fn test_joint_angle_folded() {
        // aとcが同じ点 → 0度
        let angle = joint_angle_deg(p(1.0, 1.0), p(0.0, 0.0), p(1.0, 1.0));
        assert!(approx_eq(angle, 0.0, 1e-4), "angle = {}", angle);
    }

    #[test]
    fn test_joint_angle_right_angle() {
        let angle = joint_angle_deg(p(1.0, 0.0), p(0.0, 0.0), p(0.0, 1.0));
        assert!(approx_eq(angle, 90.0, 1e-4), "angle = {}", angle);
    }

    #[test]
    fn test_joint_angle_symmetry() {
        let a = p(0.2, 0.8);
        let b = p(0.5, 0.4);
        let c = p(0.9, 0.7);
        assert!(approx_eq(
            joint_angle_deg(a, b, c),
            joint_angle_deg(c, b, a),
            1e-4
        ));
    }

    #[test]
    fn test_joint_angle_reflex_wraps_to_interior() {
        // atan2の差が340度になる配置。内角20度に折り返される
        let up = 170.0f32.to_radians();
        let down = (-170.0f32).to_radians();
        let angle = joint_angle_deg(
            p(down.cos(), down.sin()),
            p(0.0, 0.0),
            p(up.cos(), up.sin()),
        );
        assert!(approx_eq(angle, 20.0, 1e-3), "angle = {}", angle);
    }

    #[test]
    fn test_line_angle_axes() {
        // 画面座標系: yは下向きに増える
        assert!(approx_eq(line_angle_deg(p(0.0, 0.0), p(1.0, 0.0)), 0.0, 1e-4));
        assert!(approx_eq(line_angle_deg(p(0.0, 0.0), p(0.0, 1.0)), 90.0, 1e-4));
        assert!(approx_eq(
            line_angle_deg(p(0.0, 0.0), p(-1.0, 0.0)),
            180.0,
            1e-4
        ));
    }

    #[test]
    fn test_first_record_has_no_speed() {
        let mut extractor = FeatureExtractor::new(DominantSide::Right, 30.0);
        let record = extractor.extract(1, &make_landmarks());
        assert!(record.wrist_speed.is_none());
    }

    #[test]
    fn test_wrist_speed_scales_with_fps() {
        let mut extractor = FeatureExtractor::new(DominantSide::Right, 30.0);
        let mut lm = make_landmarks();
        extractor.extract(1, &lm);

        lm.right_wrist = p(lm.right_wrist.x + 0.1, lm.right_wrist.y);
        let record = extractor.extract(2, &lm);
        let speed = record.wrist_speed.unwrap();
        assert!(approx_eq(speed, 3.0, 1e-4), "speed = {}", speed);
    }

    #[test]
    fn test_wrist_speed_spans_detection_gap() {
        // フレーム2〜4が検出失敗でも、フレーム5の速度は
        // フレーム1の手首位置から計算される
        let mut extractor = FeatureExtractor::new(DominantSide::Right, 30.0);
        let mut lm = make_landmarks();
        extractor.extract(1, &lm);

        lm.right_wrist = p(lm.right_wrist.x, lm.right_wrist.y - 0.2);
        let record = extractor.extract(5, &lm);
        assert!(approx_eq(record.wrist_speed.unwrap(), 6.0, 1e-4));
    }

    #[test]
    fn test_balance_level_hips() {
        let mut extractor = FeatureExtractor::new(DominantSide::Right, 30.0);
        let record = extractor.extract(1, &make_landmarks());
        assert!(approx_eq(record.balance, 1.0, 1e-6));

        let mut tilted = make_landmarks();
        tilted.left_hip = p(0.57, 0.65);
        extractor.reset();
        let record = extractor.extract(1, &tilted);
        assert!(approx_eq(record.balance, 0.95, 1e-5));
    }

    #[test]
    fn test_shoulder_span() {
        let mut extractor = FeatureExtractor::new(DominantSide::Right, 30.0);
        let record = extractor.extract(1, &make_landmarks());
        assert!(approx_eq(record.shoulder_span, 0.2, 1e-6));
    }

    #[test]
    fn test_dominant_side_left_selects_left_joints() {
        let lm = make_landmarks();
        let mut extractor = FeatureExtractor::new(DominantSide::Left, 30.0);
        let record = extractor.extract(1, &lm);
        assert_eq!(record.wrist, lm.left_wrist);

        let mut right = FeatureExtractor::new(DominantSide::Right, 30.0);
        let record = right.extract(1, &lm);
        assert_eq!(record.wrist, lm.right_wrist);
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let frames = [make_landmarks(), make_landmarks(), make_landmarks()];
        let mut extractor = FeatureExtractor::new(DominantSide::Right, 30.0);

        let first: Vec<FrameFeatures> = frames
            .iter()
            .enumerate()
            .map(|(i, lm)| extractor.extract(i as u32 + 1, lm))
            .collect();

        extractor.reset();
        let second: Vec<FrameFeatures> = frames
            .iter()
            .enumerate()
            .map(|(i, lm)| extractor.extract(i as u32 + 1, lm))
            .collect();

        assert_eq!(first, second);
    }
}
