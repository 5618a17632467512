use log::{debug, info};

use crate::circumference::{Circumferences, ViewProfile};
use crate::config::Config;
use crate::frame::{FrameBatch, ProjectionMapper};
use crate::measure::{BoundaryScanner, LimbLengths, MeasurementRecord, Segment, SegmentMeasurer, ViewDirection};
use crate::skeleton::{SubjectSelector, TrackingId};

/// 1人分の測定セッション
///
/// 測定方向を切り替えながらフレームを流し込む。各方向の最初の記録だけが
/// ViewProfile のスロットに入り、以降のフレームは表示用の latest だけを更新する。
/// 4方向そろうと周囲長が出る。
pub struct MeasurementSession {
    start_view: ViewDirection,
    view: ViewDirection,
    selector: SubjectSelector,
    measurer: SegmentMeasurer,
    profile: ViewProfile,
    latest: Option<MeasurementRecord>,
    lengths: LimbLengths,
}

impl MeasurementSession {
    pub fn new(config: &Config) -> Self {
        let start_view = config.session.start_view;
        Self {
            start_view,
            view: start_view,
            selector: SubjectSelector::new(),
            measurer: SegmentMeasurer::new(BoundaryScanner::from_config(&config.scanner)),
            profile: ViewProfile::new(),
            latest: None,
            lengths: LimbLengths::default(),
        }
    }

    pub fn view(&self) -> ViewDirection {
        self.view
    }

    /// 測定方向を切り替える（記録済みのスロットはそのまま）
    pub fn set_view(&mut self, view: ViewDirection) {
        if view != self.view {
            info!("measuring {} view", view);
        }
        self.view = view;
    }

    pub fn subject(&self) -> Option<TrackingId> {
        self.selector.current()
    }

    /// 1フレーム分を処理する。この方向のスロットが空なら記録を入れる
    ///
    /// 対象のスケルトンがいなければ何もせず None。
    pub fn process_frame(&mut self, batch: &FrameBatch, projection: &dyn ProjectionMapper) -> Option<MeasurementRecord> {
        let Some(skeleton) = self.selector.update(&batch.skeletons) else {
            debug!("no tracked subject in frame ({} skeletons)", batch.skeletons.len());
            return None;
        };

        let record = self.measurer.measure(skeleton, self.view, &batch.mask, &batch.points, projection);
        // 関節チェーンの長さは正面から見たときだけ更新
        if self.view == ViewDirection::Front {
            self.lengths = LimbLengths::from_skeleton(skeleton);
        }

        // 埋まったスロットは reset か recapture_view まで変えない
        if !self.profile.has_view(self.view) {
            info!("{} view captured", self.view);
            self.profile.add_view_measurement(&record, self.view);
            if self.profile.all_views_ready() {
                debug!("circumferences available after {} view", self.view);
            }
        }

        self.latest = Some(record.clone());
        Some(record)
    }

    /// 直近のフレームの記録
    pub fn latest(&self) -> Option<&MeasurementRecord> {
        self.latest.as_ref()
    }

    /// 直近の記録を今の測定方向に合わせた表示行にする
    pub fn readout(&self) -> Vec<(Segment, String)> {
        let empty = MeasurementRecord::new();
        self.latest.as_ref().unwrap_or(&empty).readout_for_view(self.view)
    }

    pub fn lengths(&self) -> &LimbLengths {
        &self.lengths
    }

    pub fn profile(&self) -> &ViewProfile {
        &self.profile
    }

    pub fn is_complete(&self) -> bool {
        self.profile.circumferences().is_some()
    }

    pub fn circumferences(&self) -> Option<&Circumferences> {
        self.profile.circumferences()
    }

    /// その方向のスロットを空けて、次のフレームで取り直す
    pub fn recapture_view(&mut self, view: ViewDirection) {
        info!("recapturing {} view", view);
        self.profile.clear_view(view);
    }

    /// 測定終了: 記録を捨てて開始方向に戻る
    pub fn reset(&mut self) {
        info!("session reset");
        self.profile.reset();
        self.selector.reset();
        self.latest = None;
        self.lengths = LimbLengths::default();
        self.view = self.start_view;
    }
}
