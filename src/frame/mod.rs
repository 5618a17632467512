pub mod mask;
pub mod point_field;
pub mod projection;

pub use mask::ForegroundMask;
pub use point_field::SkeletonPointField;
pub use projection::{PinholeProjection, ProjectionMapper};

use anyhow::Result;

use crate::skeleton::Skeleton;

/// 1フレーム分の入力（スケルトン一覧 + 前景マスク + 3D点フィールド）
///
/// 測定パスはこの単位で最後まで処理してから次を受け取る。
#[derive(Debug, Clone)]
pub struct FrameBatch {
    pub skeletons: Vec<Skeleton>,
    pub mask: ForegroundMask,
    pub points: SkeletonPointField,
}

/// センサー側の供給元
///
/// None はストリーム終端。一時的なセンサー障害の再試行は供給元の責務。
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<Option<FrameBatch>>;
}
