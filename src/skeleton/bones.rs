use super::JointType;

/// 幅を測るときの走査方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanAxis {
    /// 骨の中点から骨に垂直に走査（四肢・首・胸）
    Perpendicular,
    /// 骨の中点から骨に沿って走査（左右の腰を結ぶ線 → 胴回り）
    AlongBone,
}

/// 幅を測定する骨 (開始関節, 終了関節, 走査方向)
pub const MEASURED_SEGMENTS: [(JointType, JointType, ScanAxis); 11] = [
    // 左腕
    (JointType::ShoulderLeft, JointType::ElbowLeft, ScanAxis::Perpendicular),
    (JointType::ElbowLeft, JointType::WristLeft, ScanAxis::Perpendicular),
    // 右腕
    (JointType::ShoulderRight, JointType::ElbowRight, ScanAxis::Perpendicular),
    (JointType::ElbowRight, JointType::WristRight, ScanAxis::Perpendicular),
    // 左脚
    (JointType::HipLeft, JointType::KneeLeft, ScanAxis::Perpendicular),
    (JointType::KneeLeft, JointType::AnkleLeft, ScanAxis::Perpendicular),
    // 右脚
    (JointType::HipRight, JointType::KneeRight, ScanAxis::Perpendicular),
    (JointType::KneeRight, JointType::AnkleRight, ScanAxis::Perpendicular),
    // 胴体
    (JointType::Head, JointType::ShoulderCenter, ScanAxis::Perpendicular),
    (JointType::ShoulderCenter, JointType::Spine, ScanAxis::Perpendicular),
    (JointType::HipLeft, JointType::HipRight, ScanAxis::AlongBone),
];

/// 四肢・胴体の長さを測る関節チェーン
pub const LEFT_ARM_CHAIN: [JointType; 4] = [
    JointType::ShoulderLeft,
    JointType::ElbowLeft,
    JointType::WristLeft,
    JointType::HandLeft,
];
pub const RIGHT_ARM_CHAIN: [JointType; 4] = [
    JointType::ShoulderRight,
    JointType::ElbowRight,
    JointType::WristRight,
    JointType::HandRight,
];
pub const LEFT_LEG_CHAIN: [JointType; 4] = [
    JointType::HipLeft,
    JointType::KneeLeft,
    JointType::AnkleLeft,
    JointType::FootLeft,
];
pub const RIGHT_LEG_CHAIN: [JointType; 4] = [
    JointType::HipRight,
    JointType::KneeRight,
    JointType::AnkleRight,
    JointType::FootRight,
];
pub const TORSO_CHAIN: [JointType; 3] = [JointType::ShoulderCenter, JointType::Spine, JointType::HipCenter];
