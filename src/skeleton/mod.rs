pub mod bones;
pub mod joint;
pub mod select;

pub use bones::{ScanAxis, MEASURED_SEGMENTS};
pub use joint::{Joint, JointTrackingState, JointType};
pub use select::{select_subject, SubjectSelector, TrackingId};

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// スケルトン全体の追跡状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SkeletonTrackingState {
    Tracked,
    PositionOnly,
    #[default]
    NotTracked,
}

/// 1人分のスケルトン（関節は JointType 順に固定長）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skeleton {
    /// 0 は未割り当て
    pub tracking_id: TrackingId,
    pub tracking_state: SkeletonTrackingState,
    /// 体の中心位置（被写体選択の奥行き比較に使う）
    pub position: Point3<f32>,
    pub joints: [Joint; JointType::COUNT],
}

impl Skeleton {
    /// 全関節 NotTracked の空スケルトン
    pub fn new(tracking_id: TrackingId, tracking_state: SkeletonTrackingState) -> Self {
        let joints = JointType::ALL.map(|joint_type| {
            Joint::new(joint_type, Point3::origin(), JointTrackingState::NotTracked)
        });
        Self {
            tracking_id,
            tracking_state,
            position: Point3::origin(),
            joints,
        }
    }

    pub fn get(&self, joint_type: JointType) -> &Joint {
        &self.joints[joint_type as usize]
    }

    pub fn set_joint(&mut self, joint_type: JointType, position: Point3<f32>, state: JointTrackingState) {
        self.joints[joint_type as usize] = Joint::new(joint_type, position, state);
    }

    pub fn is_tracked(&self) -> bool {
        self.tracking_state == SkeletonTrackingState::Tracked
    }

    /// 骨を測定に使えるか
    ///
    /// どちらかが NotTracked、または両方 Inferred の骨は使わない。
    pub fn bone_usable(&self, a: JointType, b: JointType) -> bool {
        let ja = self.get(a);
        let jb = self.get(b);
        if ja.is_missing() || jb.is_missing() {
            return false;
        }
        ja.is_tracked() || jb.is_tracked()
    }
}
