use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::geometry::distance_3d;
use crate::skeleton::JointType;

/// 値が設定されていない
pub const UNSET: f64 = 0.0;
/// この方向からは測定できない（N/A）
pub const NOT_APPLICABLE: f64 = -1.0;

pub const NOT_ENOUGH_INFORMATION: &str = "Not enough information";

/// 被写体に対するカメラの向き
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewDirection {
    Front,
    Left,
    Back,
    Right,
}

impl ViewDirection {
    pub const ALL: [ViewDirection; 4] = [
        ViewDirection::Front,
        ViewDirection::Left,
        ViewDirection::Back,
        ViewDirection::Right,
    ];

    /// ViewProfile のスロット番号
    pub fn slot(self) -> usize {
        match self {
            ViewDirection::Front => 0,
            ViewDirection::Left => 1,
            ViewDirection::Back => 2,
            ViewDirection::Right => 3,
        }
    }
}

impl fmt::Display for ViewDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViewDirection::Front => "Front",
            ViewDirection::Left => "Left",
            ViewDirection::Back => "Back",
            ViewDirection::Right => "Right",
        };
        f.write_str(name)
    }
}

/// 体の左右
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// 測定値の格納先
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(usize)]
pub enum Segment {
    ArmLeftUpper = 0,
    ArmLeftLower = 1,
    ArmRightUpper = 2,
    ArmRightLower = 3,
    LegLeftUpper = 4,
    LegLeftLower = 5,
    LegRightUpper = 6,
    LegRightLower = 7,
    Neck = 8,
    Chest = 9,
    Waist = 10,
}

impl Segment {
    pub const COUNT: usize = 11;

    pub const ALL: [Segment; Segment::COUNT] = [
        Segment::ArmLeftUpper,
        Segment::ArmLeftLower,
        Segment::ArmRightUpper,
        Segment::ArmRightLower,
        Segment::LegLeftUpper,
        Segment::LegLeftLower,
        Segment::LegRightUpper,
        Segment::LegRightLower,
        Segment::Neck,
        Segment::Chest,
        Segment::Waist,
    ];

    /// 表示ラベル
    pub fn label(self) -> &'static str {
        match self {
            Segment::ArmLeftUpper => "Upper Left Arm",
            Segment::ArmLeftLower => "Lower Left Arm",
            Segment::ArmRightUpper => "Upper Right Arm",
            Segment::ArmRightLower => "Lower Right Arm",
            Segment::LegLeftUpper => "Upper Left Leg",
            Segment::LegLeftLower => "Lower Left Leg",
            Segment::LegRightUpper => "Upper Right Leg",
            Segment::LegRightLower => "Lower Right Leg",
            Segment::Neck => "Neck",
            Segment::Chest => "Chest",
            Segment::Waist => "Waist",
        }
    }

    /// 左右のある部位なら Some
    pub fn side(self) -> Option<Side> {
        match self {
            Segment::ArmLeftUpper | Segment::ArmLeftLower | Segment::LegLeftUpper | Segment::LegLeftLower => {
                Some(Side::Left)
            }
            Segment::ArmRightUpper | Segment::ArmRightLower | Segment::LegRightUpper | Segment::LegRightLower => {
                Some(Side::Right)
            }
            Segment::Neck | Segment::Chest | Segment::Waist => None,
        }
    }

    /// 左右反転した部位（左右のない部位はそのまま）
    pub fn mirrored(self) -> Segment {
        match self {
            Segment::ArmLeftUpper => Segment::ArmRightUpper,
            Segment::ArmLeftLower => Segment::ArmRightLower,
            Segment::ArmRightUpper => Segment::ArmLeftUpper,
            Segment::ArmRightLower => Segment::ArmLeftLower,
            Segment::LegLeftUpper => Segment::LegRightUpper,
            Segment::LegLeftLower => Segment::LegRightLower,
            Segment::LegRightUpper => Segment::LegLeftUpper,
            Segment::LegRightLower => Segment::LegLeftLower,
            other => other,
        }
    }

    /// 関節ペア（順不同）から格納先を引く。表にないペアは None
    pub fn for_joint_pair(a: JointType, b: JointType) -> Option<Segment> {
        JOINT_PAIR_SEGMENTS
            .iter()
            .find(|(j0, j1, _)| (*j0 == a && *j1 == b) || (*j0 == b && *j1 == a))
            .map(|(_, _, segment)| *segment)
    }
}

/// 関節ペア → 格納先
const JOINT_PAIR_SEGMENTS: [(JointType, JointType, Segment); Segment::COUNT] = [
    (JointType::ShoulderLeft, JointType::ElbowLeft, Segment::ArmLeftUpper),
    (JointType::ElbowLeft, JointType::WristLeft, Segment::ArmLeftLower),
    (JointType::ShoulderRight, JointType::ElbowRight, Segment::ArmRightUpper),
    (JointType::ElbowRight, JointType::WristRight, Segment::ArmRightLower),
    (JointType::HipLeft, JointType::KneeLeft, Segment::LegLeftUpper),
    (JointType::KneeLeft, JointType::AnkleLeft, Segment::LegLeftLower),
    (JointType::HipRight, JointType::KneeRight, Segment::LegRightUpper),
    (JointType::KneeRight, JointType::AnkleRight, Segment::LegRightLower),
    (JointType::Head, JointType::ShoulderCenter, Segment::Neck),
    (JointType::ShoulderCenter, JointType::Spine, Segment::Chest),
    (JointType::HipLeft, JointType::HipRight, Segment::Waist),
];

/// メートル → センチメートル（小数2桁に丸め）
pub fn to_cm(meters: f64) -> f64 {
    (meters * 100.0 * 100.0).round() / 100.0
}

/// 表示用のセンチメートル文字列（"42.43cm", "50.0cm"）。0以下は情報不足
pub fn format_cm(meters: f64) -> String {
    if meters <= 0.0 {
        return NOT_ENOUGH_INFORMATION.to_string();
    }
    let cm = to_cm(meters);
    if cm.fract() == 0.0 {
        format!("{:.1}cm", cm)
    } else {
        format!("{}cm", cm)
    }
}

/// 1方向・1キャプチャ分の部位ごとの測定値（メートル）
///
/// 0 は未設定、-1 はこの方向では N/A。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    values: [f64; Segment::COUNT],
    /// この記録を作った方向（方向補正で設定）
    view: Option<ViewDirection>,
}

impl MeasurementRecord {
    pub fn new() -> Self {
        Self {
            values: [UNSET; Segment::COUNT],
            view: None,
        }
    }

    /// 2点間の距離を関節ペアに対応する部位に記録する
    ///
    /// 表にない関節ペアは黙って無視する。
    pub fn add_measurement(&mut self, a: &Point3<f32>, b: &Point3<f32>, joint_a: JointType, joint_b: JointType) {
        if let Some(segment) = Segment::for_joint_pair(joint_a, joint_b) {
            self.values[segment as usize] = distance_3d(a, b);
        }
    }

    /// 測定方向に応じた補正（全 add_measurement の後に1回だけ呼ぶ）
    ///
    /// - Left: 右側の部位は N/A
    /// - Right: 左側の部位は N/A
    /// - Back: 背面から見ると左右が反転するので腕・脚の左右を入れ替える
    pub fn compensate_for_view_direction(&mut self, view: ViewDirection) {
        match view {
            ViewDirection::Front => {}
            ViewDirection::Left => self.mask_side(Side::Right),
            ViewDirection::Right => self.mask_side(Side::Left),
            ViewDirection::Back => self.swap_sides(),
        }
        self.view = Some(view);
    }

    fn mask_side(&mut self, side: Side) {
        for segment in Segment::ALL {
            if segment.side() == Some(side) {
                self.values[segment as usize] = NOT_APPLICABLE;
            }
        }
    }

    fn swap_sides(&mut self) {
        for segment in Segment::ALL {
            if segment.side() == Some(Side::Left) {
                self.values.swap(segment as usize, segment.mirrored() as usize);
            }
        }
    }

    pub fn get(&self, segment: Segment) -> f64 {
        self.values[segment as usize]
    }

    pub fn set(&mut self, segment: Segment, meters: f64) {
        self.values[segment as usize] = meters;
    }

    pub fn view(&self) -> Option<ViewDirection> {
        self.view
    }

    pub fn arm_left_upper(&self) -> f64 { self.get(Segment::ArmLeftUpper) }
    pub fn arm_left_lower(&self) -> f64 { self.get(Segment::ArmLeftLower) }
    pub fn arm_right_upper(&self) -> f64 { self.get(Segment::ArmRightUpper) }
    pub fn arm_right_lower(&self) -> f64 { self.get(Segment::ArmRightLower) }
    pub fn leg_left_upper(&self) -> f64 { self.get(Segment::LegLeftUpper) }
    pub fn leg_left_lower(&self) -> f64 { self.get(Segment::LegLeftLower) }
    pub fn leg_right_upper(&self) -> f64 { self.get(Segment::LegRightUpper) }
    pub fn leg_right_lower(&self) -> f64 { self.get(Segment::LegRightLower) }
    pub fn neck(&self) -> f64 { self.get(Segment::Neck) }
    pub fn chest(&self) -> f64 { self.get(Segment::Chest) }
    pub fn waist(&self) -> f64 { self.get(Segment::Waist) }

    /// "Upper Left Arm: 42.43cm" 形式
    pub fn to_string_segment(&self, segment: Segment) -> String {
        format!("{}: {}", segment.label(), format_cm(self.get(segment)))
    }

    pub fn to_string_arm_left_upper(&self) -> String { self.to_string_segment(Segment::ArmLeftUpper) }
    pub fn to_string_arm_left_lower(&self) -> String { self.to_string_segment(Segment::ArmLeftLower) }
    pub fn to_string_arm_right_upper(&self) -> String { self.to_string_segment(Segment::ArmRightUpper) }
    pub fn to_string_arm_right_lower(&self) -> String { self.to_string_segment(Segment::ArmRightLower) }
    pub fn to_string_leg_left_upper(&self) -> String { self.to_string_segment(Segment::LegLeftUpper) }
    pub fn to_string_leg_left_lower(&self) -> String { self.to_string_segment(Segment::LegLeftLower) }
    pub fn to_string_leg_right_upper(&self) -> String { self.to_string_segment(Segment::LegRightUpper) }
    pub fn to_string_leg_right_lower(&self) -> String { self.to_string_segment(Segment::LegRightLower) }
    pub fn to_string_neck(&self) -> String { self.to_string_segment(Segment::Neck) }
    pub fn to_string_chest(&self) -> String { self.to_string_segment(Segment::Chest) }
    pub fn to_string_waist(&self) -> String { self.to_string_segment(Segment::Waist) }

    /// 測定中の方向に合わせた表示行（部位ごと）
    ///
    /// 右方向の測定中は左側の部位を、左方向の測定中は右側の部位を N/A 表示にする。
    pub fn readout_for_view(&self, view: ViewDirection) -> Vec<(Segment, String)> {
        Segment::ALL
            .iter()
            .map(|&segment| {
                let text = match (view, segment.side()) {
                    (ViewDirection::Right, Some(Side::Left)) => "N/A in Right Mode".to_string(),
                    (ViewDirection::Left, Some(Side::Right)) => "N/A in Left Mode".to_string(),
                    _ => self.to_string_segment(segment),
                };
                (segment, text)
            })
            .collect()
    }
}

impl Default for MeasurementRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MeasurementRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = Segment::ALL.iter().map(|&s| self.to_string_segment(s)).collect();
        f.write_str(&lines.join("\n"))
    }
}
