use anyhow::{bail, Context, Result};
use log::{debug, info};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::frame::{ForegroundMask, FrameBatch, FrameSource, PinholeProjection, SkeletonPointField};
use crate::measure::ViewDirection;
use crate::skeleton::{JointTrackingState, JointType, Skeleton, SkeletonTrackingState, TrackingId};

// --- データ構造 ---

/// 記録済みの測定セッション（方向ごとのフレーム列）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCapture {
    /// 記録時のカメラ。なければ設定ファイルの値を使う
    #[serde(default)]
    pub camera: Option<PinholeProjection>,
    pub views: Vec<ViewCapture>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewCapture {
    pub view: ViewDirection,
    pub frames: Vec<FrameCapture>,
}

/// 1フレーム
///
/// 3D点は depth_mm（ミリメートル深度、行優先）があればそこから、なければ
/// 人物の平均奥行き average_depth_m の平面として復元する。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameCapture {
    pub skeletons: Vec<SkeletonCapture>,
    /// '#' = 前景、'.' = 背景
    pub mask: Vec<String>,
    #[serde(default)]
    pub depth_mm: Option<Vec<u16>>,
    #[serde(default)]
    pub average_depth_m: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkeletonCapture {
    pub tracking_id: TrackingId,
    #[serde(default = "default_skeleton_state")]
    pub tracking_state: SkeletonTrackingState,
    pub position: Point3<f32>,
    /// 記録されていない関節は NotTracked
    pub joints: Vec<JointCapture>,
}

fn default_skeleton_state() -> SkeletonTrackingState { SkeletonTrackingState::Tracked }

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JointCapture {
    pub joint: JointType,
    pub position: Point3<f32>,
    #[serde(default = "default_joint_state")]
    pub state: JointTrackingState,
}

fn default_joint_state() -> JointTrackingState { JointTrackingState::Tracked }

impl SkeletonCapture {
    pub fn to_skeleton(&self) -> Skeleton {
        let mut skeleton = Skeleton::new(self.tracking_id, self.tracking_state);
        skeleton.position = self.position;
        for joint in &self.joints {
            skeleton.set_joint(joint.joint, joint.position, joint.state);
        }
        skeleton
    }
}

impl FrameCapture {
    /// 投影空間に合わせて FrameBatch を組み立てる
    pub fn to_batch(&self, projection: &PinholeProjection) -> Result<FrameBatch> {
        let mask = ForegroundMask::from_rows(&self.mask)?;
        let (width, height) = (projection.width as usize, projection.height as usize);
        if mask.width() != width || mask.height() != height {
            bail!(
                "mask is {}x{}, camera is {}x{}",
                mask.width(),
                mask.height(),
                width,
                height
            );
        }

        let points = match (&self.depth_mm, self.average_depth_m) {
            (Some(depth), _) => SkeletonPointField::from_depth_mm(depth, projection)?,
            (None, Some(depth_m)) if depth_m > 0.0 => SkeletonPointField::at_depth(projection, depth_m),
            _ => bail!("frame has neither depth_mm nor a positive average_depth_m"),
        };

        Ok(FrameBatch {
            skeletons: self.skeletons.iter().map(SkeletonCapture::to_skeleton).collect(),
            mask,
            points,
        })
    }
}

// --- Save / Load ---

pub fn save_capture<P: AsRef<Path>>(path: P, capture: &SessionCapture) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(capture)?;
    fs::write(path, json).with_context(|| format!("Failed to write capture file {}", path.display()))?;
    Ok(())
}

pub fn load_capture<P: AsRef<Path>>(path: P) -> Result<SessionCapture> {
    let path = path.as_ref();
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read capture file {}", path.display()))?;
    let capture: SessionCapture = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse capture file {}", path.display()))?;
    info!(
        "loaded capture {}: {} views, {} frames",
        path.display(),
        capture.views.len(),
        capture.views.iter().map(|v| v.frames.len()).sum::<usize>()
    );
    Ok(capture)
}

// --- 再生 ---

/// キャプチャを方向順・フレーム順に流す FrameSource
pub struct CaptureReplay {
    capture: SessionCapture,
    projection: PinholeProjection,
    view_index: usize,
    frame_index: usize,
    current_view: Option<ViewDirection>,
}

impl CaptureReplay {
    /// capture にカメラが記録されていればそちらを優先する
    pub fn new(capture: SessionCapture, fallback: PinholeProjection) -> Self {
        let projection = capture.camera.unwrap_or(fallback);
        Self {
            capture,
            projection,
            view_index: 0,
            frame_index: 0,
            current_view: None,
        }
    }

    pub fn projection(&self) -> &PinholeProjection {
        &self.projection
    }

    /// 直前に返したフレームの測定方向
    pub fn current_view(&self) -> Option<ViewDirection> {
        self.current_view
    }
}

impl FrameSource for CaptureReplay {
    fn next_frame(&mut self) -> Result<Option<FrameBatch>> {
        while let Some(view) = self.capture.views.get(self.view_index) {
            if let Some(frame) = view.frames.get(self.frame_index) {
                let batch = frame.to_batch(&self.projection).with_context(|| {
                    format!("{} view, frame {}", view.view, self.frame_index)
                })?;
                debug!("replaying {} view frame {}", view.view, self.frame_index);
                self.current_view = Some(view.view);
                self.frame_index += 1;
                return Ok(Some(batch));
            }
            self.view_index += 1;
            self.frame_index = 0;
        }
        Ok(None)
    }
}
