use log::debug;

use super::Skeleton;

/// センサーが割り当てる追跡ID（0 は未割り当て）
pub type TrackingId = u32;

/// 測定対象のスケルトンを選ぶ（スティッキー追跡）
///
/// - 前回の対象が Tracked のまま見えていれば維持
/// - 見えなければ Tracked のうち最も手前（Z最小）を新しい対象にする
/// - Tracked が1人もいなければ前回の値をそのまま返す
pub fn select_subject(previous: Option<TrackingId>, skeletons: &[Skeleton]) -> Option<TrackingId> {
    let mut nearest: Option<(f32, TrackingId)> = None;

    for skeleton in skeletons.iter().filter(|s| s.is_tracked()) {
        if previous == Some(skeleton.tracking_id) {
            return previous;
        }
        if skeleton.tracking_id == 0 {
            continue;
        }
        let z = skeleton.position.z;
        if nearest.map_or(true, |(nearest_z, _)| z < nearest_z) {
            nearest = Some((z, skeleton.tracking_id));
        }
    }

    match nearest {
        Some((_, id)) => Some(id),
        None => previous,
    }
}

/// フレームごとに対象IDを更新する状態機械
#[derive(Debug, Default)]
pub struct SubjectSelector {
    current: Option<TrackingId>,
}

impl SubjectSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<TrackingId> {
        self.current
    }

    /// 新しいスケルトン一覧で対象を更新し、今フレームの対象を返す
    ///
    /// 対象IDが一覧に Tracked で存在しない場合は None。
    pub fn update<'a>(&mut self, skeletons: &'a [Skeleton]) -> Option<&'a Skeleton> {
        let selected = select_subject(self.current, skeletons);
        if selected != self.current {
            debug!("subject changed: {:?} -> {:?}", self.current, selected);
        }
        self.current = selected;
        let id = selected?;
        skeletons.iter().find(|s| s.tracking_id == id && s.is_tracked())
    }

    pub fn reset(&mut self) {
        self.current = None;
    }
}
