use log::info;

use super::estimate::Circumferences;
use crate::measure::{MeasurementRecord, ViewDirection};

/// 方向ごとの測定記録（前・左・後・右の4スロット）
///
/// 4スロットがそろった時点で周囲長を1回だけ計算して保持する。
#[derive(Debug, Clone, Default)]
pub struct ViewProfile {
    slots: [Option<MeasurementRecord>; 4],
    result: Option<Circumferences>,
}

impl ViewProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// 記録のコピーをその方向のスロットに入れる（既存の記録は上書き）
    ///
    /// 上書きするかどうかは呼び出し側が決める。MeasurementSession は空の
    /// スロットにしか入れない。
    pub fn add_view_measurement(&mut self, record: &MeasurementRecord, view: ViewDirection) {
        self.slots[view.slot()] = Some(record.clone());
        // 記録が変わったので計算済みの結果は無効
        self.result = None;
    }

    /// その方向のスロットを空にする（計算済みの結果も捨てる）
    pub fn clear_view(&mut self, view: ViewDirection) {
        self.slots[view.slot()] = None;
        self.result = None;
    }

    pub fn has_view(&self, view: ViewDirection) -> bool {
        self.slots[view.slot()].is_some()
    }

    pub fn view(&self, view: ViewDirection) -> Option<&MeasurementRecord> {
        self.slots[view.slot()].as_ref()
    }

    /// 4方向そろっていれば true。そろった直後の呼び出しで周囲長を計算する
    pub fn all_views_ready(&mut self) -> bool {
        let [Some(front), Some(left), Some(back), Some(right)] = &self.slots else {
            return false;
        };
        if self.result.is_none() {
            let views = [front.clone(), left.clone(), back.clone(), right.clone()];
            self.result = Some(Circumferences::compute(&views));
            info!("all four views captured, circumferences computed");
        }
        true
    }

    /// 計算済みの周囲長（all_views_ready が true を返した後）
    pub fn circumferences(&self) -> Option<&Circumferences> {
        self.result.as_ref()
    }

    /// 新しい被写体のために全スロットを空にする
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
