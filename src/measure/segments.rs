use log::debug;
use std::fmt;

use super::record::{format_cm, MeasurementRecord, ViewDirection};
use super::scanner::BoundaryScanner;
use crate::frame::{ForegroundMask, ProjectionMapper, SkeletonPointField};
use crate::geometry::{distance_3d, line_gradient, midpoint, perpendicular_gradient};
use crate::skeleton::bones::{LEFT_ARM_CHAIN, LEFT_LEG_CHAIN, RIGHT_ARM_CHAIN, RIGHT_LEG_CHAIN, TORSO_CHAIN};
use crate::skeleton::{JointType, ScanAxis, Skeleton, MEASURED_SEGMENTS};

/// 1フレーム分の入力から部位ごとの幅を測る
pub struct SegmentMeasurer {
    scanner: BoundaryScanner,
}

impl SegmentMeasurer {
    pub fn new(scanner: BoundaryScanner) -> Self {
        Self { scanner }
    }

    /// 1本の骨の幅（メートル）を測る
    ///
    /// 骨の中点から ScanAxis の方向にシルエット境界を探し、両端の境界ピクセルを
    /// 3D点に戻して距離を record に書く。書けたら true。
    #[allow(clippy::too_many_arguments)]
    pub fn measure_bone(
        &self,
        skeleton: &Skeleton,
        joint_a: JointType,
        joint_b: JointType,
        axis: ScanAxis,
        mask: &ForegroundMask,
        points: &SkeletonPointField,
        projection: &dyn ProjectionMapper,
        record: &mut MeasurementRecord,
    ) -> bool {
        if !skeleton.bone_usable(joint_a, joint_b) {
            return false;
        }
        let projected = (
            projection.project(&skeleton.get(joint_a).position),
            projection.project(&skeleton.get(joint_b).position),
        );
        let (Some(a), Some(b)) = projected else {
            debug!("{:?}-{:?}: joint cannot be projected", joint_a, joint_b);
            return false;
        };
        let pivot = midpoint(a, b);
        let gradient = match axis {
            ScanAxis::Perpendicular => perpendicular_gradient(a, b),
            ScanAxis::AlongBone => line_gradient(a, b),
        };

        let Some((start, end)) = self.scanner.find_boundaries(mask, pivot, gradient) else {
            return false;
        };
        let (Some(p_start), Some(p_end)) = (points.lookup(start), points.lookup(end)) else {
            debug!("{:?}-{:?}: no 3D point at {:?} / {:?}", joint_a, joint_b, start, end);
            return false;
        };
        record.add_measurement(&p_start, &p_end, joint_a, joint_b);
        true
    }

    /// スケルトンの全測定部位を測り、方向補正済みの記録を返す
    pub fn measure(
        &self,
        skeleton: &Skeleton,
        view: ViewDirection,
        mask: &ForegroundMask,
        points: &SkeletonPointField,
        projection: &dyn ProjectionMapper,
    ) -> MeasurementRecord {
        let mut record = MeasurementRecord::new();
        let mut measured = 0;
        for (joint_a, joint_b, axis) in MEASURED_SEGMENTS {
            if self.measure_bone(skeleton, joint_a, joint_b, axis, mask, points, projection, &mut record) {
                measured += 1;
            }
        }
        debug!("{} view: measured {}/{} segments", view, measured, MEASURED_SEGMENTS.len());
        record.compensate_for_view_direction(view);
        record
    }
}

impl Default for SegmentMeasurer {
    fn default() -> Self {
        Self::new(BoundaryScanner::default())
    }
}

/// 関節チェーンに沿った四肢・胴体の長さ（メートル、0 は未計測）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LimbLengths {
    pub left_arm: f64,
    pub right_arm: f64,
    pub left_leg: f64,
    pub right_leg: f64,
    pub torso: f64,
}

impl LimbLengths {
    pub fn from_skeleton(skeleton: &Skeleton) -> Self {
        Self {
            left_arm: chain_length(skeleton, &LEFT_ARM_CHAIN),
            right_arm: chain_length(skeleton, &RIGHT_ARM_CHAIN),
            left_leg: chain_length(skeleton, &LEFT_LEG_CHAIN),
            right_leg: chain_length(skeleton, &RIGHT_LEG_CHAIN),
            torso: chain_length(skeleton, &TORSO_CHAIN),
        }
    }
}

/// チェーン上の隣接関節間距離の合計。追跡されていない関節を含めば 0
fn chain_length(skeleton: &Skeleton, chain: &[JointType]) -> f64 {
    if chain.iter().any(|&j| skeleton.get(j).is_missing()) {
        return 0.0;
    }
    chain
        .windows(2)
        .map(|pair| distance_3d(&skeleton.get(pair[0]).position, &skeleton.get(pair[1]).position))
        .sum()
}

impl fmt::Display for LimbLengths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Left Arm: \t{}", format_cm(self.left_arm))?;
        writeln!(f, "Right Arm: \t{}", format_cm(self.right_arm))?;
        writeln!(f, "Left Leg: \t{}", format_cm(self.left_leg))?;
        writeln!(f, "Right Leg: \t{}", format_cm(self.right_leg))?;
        write!(f, "Torso: \t{}", format_cm(self.torso))
    }
}
