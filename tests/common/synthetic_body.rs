use body_measure::frame::{ForegroundMask, FrameBatch, PinholeProjection, SkeletonPointField};
use body_measure::geometry::PixelPoint;
use body_measure::skeleton::{JointTrackingState, JointType, Skeleton, SkeletonTrackingState};
use nalgebra::{Point3, Vector2};

/// 合成被写体のカメラからの距離（メートル）
pub const DEPTH_M: f32 = 2.5;

/// 関節位置 (x, y)、メートル。すべて z = DEPTH_M の平面上
const JOINTS: [(JointType, f32, f32); JointType::COUNT] = [
    (JointType::Head, 0.0, 0.72),
    (JointType::ShoulderCenter, 0.0, 0.50),
    (JointType::ShoulderLeft, -0.18, 0.48),
    (JointType::ShoulderRight, 0.18, 0.48),
    (JointType::ElbowLeft, -0.40, 0.30),
    (JointType::ElbowRight, 0.40, 0.30),
    (JointType::WristLeft, -0.58, 0.12),
    (JointType::WristRight, 0.58, 0.12),
    (JointType::HandLeft, -0.63, 0.07),
    (JointType::HandRight, 0.63, 0.07),
    (JointType::Spine, 0.0, 0.20),
    (JointType::HipCenter, 0.0, 0.0),
    (JointType::HipLeft, -0.10, -0.02),
    (JointType::HipRight, 0.10, -0.02),
    (JointType::KneeLeft, -0.16, -0.42),
    (JointType::KneeRight, 0.16, -0.42),
    (JointType::AnkleLeft, -0.20, -0.82),
    (JointType::AnkleRight, 0.20, -0.82),
    (JointType::FootLeft, -0.22, -0.88),
    (JointType::FootRight, 0.22, -0.88),
];

/// 手足のカプセル: (関節, 関節, 半径 m)
pub const CAPSULES: [(JointType, JointType, f32); 13] = [
    (JointType::Head, JointType::ShoulderCenter, 0.06),
    (JointType::ShoulderLeft, JointType::ElbowLeft, 0.05),
    (JointType::ElbowLeft, JointType::WristLeft, 0.04),
    (JointType::WristLeft, JointType::HandLeft, 0.04),
    (JointType::ShoulderRight, JointType::ElbowRight, 0.05),
    (JointType::ElbowRight, JointType::WristRight, 0.04),
    (JointType::WristRight, JointType::HandRight, 0.04),
    (JointType::HipLeft, JointType::KneeLeft, 0.08),
    (JointType::KneeLeft, JointType::AnkleLeft, 0.06),
    (JointType::AnkleLeft, JointType::FootLeft, 0.05),
    (JointType::HipRight, JointType::KneeRight, 0.08),
    (JointType::KneeRight, JointType::AnkleRight, 0.06),
    (JointType::AnkleRight, JointType::FootRight, 0.05),
];

/// 胴の箱: x は ±TORSO_HALF_WIDTH、y は TORSO_BOTTOM..=TORSO_TOP
pub const TORSO_HALF_WIDTH: f32 = 0.17;
const TORSO_BOTTOM: f32 = -0.05;
const TORSO_TOP: f32 = 0.50;
const HEAD_RADIUS: f32 = 0.10;

fn joint_xy(joint: JointType) -> Vector2<f32> {
    let (_, x, y) = JOINTS[joint as usize];
    Vector2::new(x, y)
}

fn segment_distance(p: Vector2<f32>, a: Vector2<f32>, b: Vector2<f32>) -> f32 {
    let ab = b - a;
    let t = ((p - a).dot(&ab) / ab.norm_squared()).clamp(0.0, 1.0);
    (p - (a + ab * t)).norm()
}

fn inside_body(p: Vector2<f32>) -> bool {
    if p.x.abs() <= TORSO_HALF_WIDTH && p.y >= TORSO_BOTTOM && p.y <= TORSO_TOP {
        return true;
    }
    if (p - joint_xy(JointType::Head)).norm() <= HEAD_RADIUS {
        return true;
    }
    CAPSULES
        .iter()
        .any(|&(a, b, radius)| segment_distance(p, joint_xy(a), joint_xy(b)) <= radius)
}

/// DEPTH_M に立つ全関節追跡済みのスケルトン（手足を開いた姿勢）
pub fn body_skeleton(tracking_id: u32) -> Skeleton {
    let mut skeleton = Skeleton::new(tracking_id, SkeletonTrackingState::Tracked);
    skeleton.position = Point3::new(0.0, 0.0, DEPTH_M);
    for (joint, x, y) in JOINTS {
        skeleton.set_joint(joint, Point3::new(x, y, DEPTH_M), JointTrackingState::Tracked);
    }
    skeleton
}

/// `body_skeleton` のシルエットを `projection` で描いたマスク
pub fn body_mask(projection: &PinholeProjection) -> ForegroundMask {
    let width = projection.width as usize;
    let height = projection.height as usize;
    let mut mask = ForegroundMask::empty(width, height);
    for v in 0..height {
        for u in 0..width {
            let p = projection.unproject(u as f32, v as f32, DEPTH_M);
            if inside_body(Vector2::new(p.x, p.y)) {
                mask.fill_rect(u, v, 1, 1);
            }
        }
    }
    mask
}

pub fn body_frame(projection: &PinholeProjection, tracking_id: u32) -> FrameBatch {
    FrameBatch {
        skeletons: vec![body_skeleton(tracking_id)],
        mask: body_mask(projection),
        points: SkeletonPointField::at_depth(projection, DEPTH_M),
    }
}

/// キャプチャファイル形式の '#'/'.' 行
pub fn mask_rows(mask: &ForegroundMask) -> Vec<String> {
    (0..mask.height() as i32)
        .map(|y| {
            (0..mask.width() as i32)
                .map(|x| if mask.is_foreground(PixelPoint::new(x, y)) { '#' } else { '.' })
                .collect()
        })
        .collect()
}
