use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

/// 妥当性ゲートによる棄却の内部理由コード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectionReason {
    /// スイングと呼べるだけの動きがない
    InsufficientMotion,
    /// 被写体が画面に対して小さすぎる
    SubjectTooSmall,
}

/// 解析1回の失敗アウトカム
///
/// フレーム単位の検出失敗はエラーではなくスキップ。メトリクス単位の
/// 未定義もエラーではなくNone。ここに来るのは実行全体の失敗だけ。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AnalysisError {
    /// 動画ファイルを開けなかった
    VideoUnreadable(String),
    /// 全フレームで姿勢を検出できなかった
    NoPoseDetected,
    /// ゲートによる棄却。業務上は正常系に近い失敗
    SwingNotRecognized(RejectionReason),
}

impl AnalysisError {
    /// ワイヤ/ログ用の安定した理由コード
    pub fn code(&self) -> &'static str {
        match self {
            Self::VideoUnreadable(_) => "video_unreadable",
            Self::NoPoseDetected => "no_pose_detected",
            Self::SwingNotRecognized(RejectionReason::InsufficientMotion) => "insufficient_motion",
            Self::SwingNotRecognized(RejectionReason::SubjectTooSmall) => "subject_too_small",
        }
    }
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VideoUnreadable(cause) => write!(f, "video unreadable: {}", cause),
            Self::NoPoseDetected => write!(f, "no pose detected in any frame"),
            Self::SwingNotRecognized(RejectionReason::InsufficientMotion) => {
                write!(f, "swing not recognized: not enough swing motion")
            }
            Self::SwingNotRecognized(RejectionReason::SubjectTooSmall) => {
                write!(f, "swing not recognized: subject too small in frame")
            }
        }
    }
}

impl Error for AnalysisError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(AnalysisError::VideoUnreadable("x".into()).code(), "video_unreadable");
        assert_eq!(AnalysisError::NoPoseDetected.code(), "no_pose_detected");
        assert_eq!(
            AnalysisError::SwingNotRecognized(RejectionReason::InsufficientMotion).code(),
            "insufficient_motion"
        );
        assert_eq!(
            AnalysisError::SwingNotRecognized(RejectionReason::SubjectTooSmall).code(),
            "subject_too_small"
        );
    }

    #[test]
    fn test_display_describes_outcome() {
        let e = AnalysisError::VideoUnreadable("no such file".into());
        assert_eq!(e.to_string(), "video unreadable: no such file");
        assert_eq!(
            AnalysisError::NoPoseDetected.to_string(),
            "no pose detected in any frame"
        );
    }
}
