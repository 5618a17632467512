use std::f64::consts::{PI, SQRT_2};
use std::fmt;

use crate::measure::{format_cm, MeasurementRecord, Segment, ViewDirection, NOT_ENOUGH_INFORMATION};

/// 周囲長を出せなかったときの値
pub const INSUFFICIENT: f64 = -1.0;

/// 2方向の読み値の平均（片方が0以下ならもう片方をそのまま使う）
pub fn average(v1: f64, v2: f64) -> f64 {
    if v1 <= 0.0 {
        v2
    } else if v2 <= 0.0 {
        v1
    } else {
        (v1 + v2) / 2.0
    }
}

/// 直交する2つの読み値を軸とする楕円の周囲長（近似）
///
/// 大きい方を a、小さい方を b として
/// `e2 = (a²-b²)/a²`, `h = 2(a-b)/π + b/√2`, `C = 2π·sqrt(b² + e2·h²)`。
/// どちらかが0以下なら INSUFFICIENT。
pub fn ellipse_circumference(r1: f64, r2: f64) -> f64 {
    if r1 <= 0.0 || r2 <= 0.0 {
        return INSUFFICIENT;
    }
    let (a, b) = if r1 > r2 { (r1, r2) } else { (r2, r1) };
    let e2 = (a * a - b * b) / (a * a);
    let h = 2.0 * (a - b) / PI + b / SQRT_2;
    2.0 * PI * (b * b + e2 * h * h).sqrt()
}

/// 4方向の測定から求めた周囲長（メートル、INSUFFICIENT は情報不足）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circumferences {
    pub arm_left_upper: f64,
    pub arm_left_lower: f64,
    pub arm_right_upper: f64,
    pub arm_right_lower: f64,
    pub leg_left_upper: f64,
    pub leg_left_lower: f64,
    pub leg_right_upper: f64,
    pub leg_right_lower: f64,
    pub chest: f64,
    pub waist: f64,
}

impl Circumferences {
    /// views はスロット順（ViewDirection::slot）に並んだ方向補正済みの記録
    pub fn compute(views: &[MeasurementRecord; 4]) -> Self {
        let front = &views[ViewDirection::Front.slot()];
        let left = &views[ViewDirection::Left.slot()];
        let back = &views[ViewDirection::Back.slot()];
        let right = &views[ViewDirection::Right.slot()];

        // 四肢: 正面軸 = 前後の平均、側面軸 = その側から見た読み値
        let limb = |segment: Segment, side: &MeasurementRecord| {
            ellipse_circumference(average(front.get(segment), back.get(segment)), side.get(segment))
        };
        // 胸・腰: 側面軸 = 左右の平均
        let major = |segment: Segment| {
            ellipse_circumference(
                average(front.get(segment), back.get(segment)),
                average(left.get(segment), right.get(segment)),
            )
        };

        Self {
            arm_left_upper: limb(Segment::ArmLeftUpper, left),
            arm_left_lower: limb(Segment::ArmLeftLower, left),
            arm_right_upper: limb(Segment::ArmRightUpper, right),
            arm_right_lower: limb(Segment::ArmRightLower, right),
            leg_left_upper: limb(Segment::LegLeftUpper, left),
            leg_left_lower: limb(Segment::LegLeftLower, left),
            leg_right_upper: limb(Segment::LegRightUpper, right),
            leg_right_lower: limb(Segment::LegRightLower, right),
            chest: major(Segment::Chest),
            waist: major(Segment::Waist),
        }
    }

    /// 部位の周囲長。首は対象外で None
    pub fn for_segment(&self, segment: Segment) -> Option<f64> {
        let value = match segment {
            Segment::ArmLeftUpper => self.arm_left_upper,
            Segment::ArmLeftLower => self.arm_left_lower,
            Segment::ArmRightUpper => self.arm_right_upper,
            Segment::ArmRightLower => self.arm_right_lower,
            Segment::LegLeftUpper => self.leg_left_upper,
            Segment::LegLeftLower => self.leg_left_lower,
            Segment::LegRightUpper => self.leg_right_upper,
            Segment::LegRightLower => self.leg_right_lower,
            Segment::Chest => self.chest,
            Segment::Waist => self.waist,
            Segment::Neck => return None,
        };
        Some(value)
    }

    pub fn to_string_single(circumference: f64) -> String {
        if circumference <= 0.0 {
            NOT_ENOUGH_INFORMATION.to_string()
        } else {
            format_cm(circumference)
        }
    }

    /// 全周囲長の表示（胸・腰・腕・脚の順）
    pub fn to_string_all(&self) -> String {
        let rows: [(&str, f64); 10] = [
            ("Chest: \t\t", self.chest),
            ("Waist: \t\t", self.waist),
            ("Upper Left Arm: \t", self.arm_left_upper),
            ("Lower Left Arm: \t", self.arm_left_lower),
            ("Upper Right Arm: \t", self.arm_right_upper),
            ("Lower Right Arm: \t", self.arm_right_lower),
            ("Upper Left Leg: \t", self.leg_left_upper),
            ("Lower Left Leg: \t", self.leg_left_lower),
            ("Upper Right Leg: \t", self.leg_right_upper),
            ("Lower Right Leg: \t", self.leg_right_lower),
        ];
        rows.iter()
            .map(|(label, value)| format!("{}{}", label, Self::to_string_single(*value)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for Circumferences {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_all())
    }
}
