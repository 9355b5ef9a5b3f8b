use crate::config::DominantSide;
use crate::pose::{KeypointIndex, Pose};

/// 正規化フレーム座標上の2D点 (x, y ∈ 0.0〜1.0, 原点は左上)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl Point2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// ユークリッド距離
    pub fn distance_to(&self, other: Point2) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// スイング解析に使う9関節のランドマークセット
///
/// 信頼度は持たない。検出境界 (from_pose) で閾値判定を済ませ、
/// 解析側には座標だけを渡す。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwingLandmarks {
    pub nose: Point2,
    pub left_shoulder: Point2,
    pub right_shoulder: Point2,
    pub left_elbow: Point2,
    pub right_elbow: Point2,
    pub left_wrist: Point2,
    pub right_wrist: Point2,
    pub left_hip: Point2,
    pub right_hip: Point2,
}

impl SwingLandmarks {
    /// 検出結果からランドマークセットを構築する
    ///
    /// 9関節すべてが閾値以上の信頼度を持つフレームのみ採用。
    /// 1つでも欠ければそのフレームは検出失敗としてスキップされる。
    pub fn from_pose(pose: &Pose, min_confidence: f32) -> Option<Self> {
        use KeypointIndex::*;

        const REQUIRED: [KeypointIndex; 9] = [
            Nose,
            LeftShoulder,
            RightShoulder,
            LeftElbow,
            RightElbow,
            LeftWrist,
            RightWrist,
            LeftHip,
            RightHip,
        ];

        if REQUIRED
            .iter()
            .any(|&idx| !pose.get(idx).is_valid(min_confidence))
        {
            return None;
        }

        let point = |idx: KeypointIndex| {
            let kp = pose.get(idx);
            Point2::new(kp.x, kp.y)
        };

        Some(Self {
            nose: point(Nose),
            left_shoulder: point(LeftShoulder),
            right_shoulder: point(RightShoulder),
            left_elbow: point(LeftElbow),
            right_elbow: point(RightElbow),
            left_wrist: point(LeftWrist),
            right_wrist: point(RightWrist),
            left_hip: point(LeftHip),
            right_hip: point(RightHip),
        })
    }

    pub fn shoulder(&self, side: DominantSide) -> Point2 {
        match side {
            DominantSide::Left => self.left_shoulder,
            DominantSide::Right => self.right_shoulder,
        }
    }

    pub fn elbow(&self, side: DominantSide) -> Point2 {
        match side {
            DominantSide::Left => self.left_elbow,
            DominantSide::Right => self.right_elbow,
        }
    }

    pub fn wrist(&self, side: DominantSide) -> Point2 {
        match side {
            DominantSide::Left => self.left_wrist,
            DominantSide::Right => self.right_wrist,
        }
    }

    pub fn hip(&self, side: DominantSide) -> Point2 {
        match side {
            DominantSide::Left => self.left_hip,
            DominantSide::Right => self.right_hip,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::Keypoint;

    fn make_pose(confidence: f32) -> Pose {
        let mut keypoints = [Keypoint::default(); KeypointIndex::COUNT];
        for (i, kp) in keypoints.iter_mut().enumerate() {
            *kp = Keypoint::new(0.1 * i as f32, 0.05 * i as f32, confidence);
        }
        Pose::new(keypoints)
    }

    #[test]
    fn test_distance_to() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(0.3, 0.4);
        assert!((a.distance_to(b) - 0.5).abs() < 1e-6);
        assert!((b.distance_to(a) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_from_pose_accepts_confident_joints() {
        let pose = make_pose(0.9);
        let lm = SwingLandmarks::from_pose(&pose, 0.5).unwrap();

        let nose = pose.get(KeypointIndex::Nose);
        assert_eq!(lm.nose, Point2::new(nose.x, nose.y));
        let rw = pose.get(KeypointIndex::RightWrist);
        assert_eq!(lm.right_wrist, Point2::new(rw.x, rw.y));
    }

    #[test]
    fn test_from_pose_rejects_weak_joint() {
        let mut pose = make_pose(0.9);
        pose.keypoints[KeypointIndex::LeftElbow as usize].confidence = 0.2;
        assert!(SwingLandmarks::from_pose(&pose, 0.5).is_none());
    }

    #[test]
    fn test_from_pose_ignores_unused_joints() {
        // 目・耳・膝などはセットに含まれないので信頼度が低くてもよい
        let mut pose = make_pose(0.9);
        pose.keypoints[KeypointIndex::LeftEye as usize].confidence = 0.0;
        pose.keypoints[KeypointIndex::RightEar as usize].confidence = 0.0;
        pose.keypoints[KeypointIndex::LeftKnee as usize].confidence = 0.0;
        pose.keypoints[KeypointIndex::RightAnkle as usize].confidence = 0.0;
        assert!(SwingLandmarks::from_pose(&pose, 0.5).is_some());
    }

    #[test]
    fn test_side_selection() {
        let pose = make_pose(0.9);
        let lm = SwingLandmarks::from_pose(&pose, 0.5).unwrap();
        assert_eq!(lm.wrist(DominantSide::Left), lm.left_wrist);
        assert_eq!(lm.wrist(DominantSide::Right), lm.right_wrist);
        assert_ne!(lm.left_wrist, lm.right_wrist);
    }
}
