use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// センサーが追跡する 20 関節のインデックス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(usize)]
pub enum JointType {
    Head = 0,
    ShoulderCenter = 1,
    ShoulderLeft = 2,
    ShoulderRight = 3,
    ElbowLeft = 4,
    ElbowRight = 5,
    WristLeft = 6,
    WristRight = 7,
    HandLeft = 8,
    HandRight = 9,
    Spine = 10,
    HipCenter = 11,
    HipLeft = 12,
    HipRight = 13,
    KneeLeft = 14,
    KneeRight = 15,
    AnkleLeft = 16,
    AnkleRight = 17,
    FootLeft = 18,
    FootRight = 19,
}

impl JointType {
    pub const COUNT: usize = 20;

    pub const ALL: [JointType; JointType::COUNT] = [
        JointType::Head,
        JointType::ShoulderCenter,
        JointType::ShoulderLeft,
        JointType::ShoulderRight,
        JointType::ElbowLeft,
        JointType::ElbowRight,
        JointType::WristLeft,
        JointType::WristRight,
        JointType::HandLeft,
        JointType::HandRight,
        JointType::Spine,
        JointType::HipCenter,
        JointType::HipLeft,
        JointType::HipRight,
        JointType::KneeLeft,
        JointType::KneeRight,
        JointType::AnkleLeft,
        JointType::AnkleRight,
        JointType::FootLeft,
        JointType::FootRight,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// 関節の追跡信頼度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JointTrackingState {
    Tracked,
    Inferred,
    #[default]
    NotTracked,
}

/// 単一関節（センサー座標系、メートル）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Joint {
    pub joint_type: JointType,
    pub position: Point3<f32>,
    #[serde(default)]
    pub tracking_state: JointTrackingState,
}

impl Joint {
    pub fn new(joint_type: JointType, position: Point3<f32>, tracking_state: JointTrackingState) -> Self {
        Self {
            joint_type,
            position,
            tracking_state,
        }
    }

    pub fn is_tracked(&self) -> bool {
        self.tracking_state == JointTrackingState::Tracked
    }

    pub fn is_missing(&self) -> bool {
        self.tracking_state == JointTrackingState::NotTracked
    }
}
