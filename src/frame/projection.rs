use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::config::CameraConfig;
use crate::geometry::PixelPoint;

/// スケルトン座標（メートル）→ 投影空間ピクセルへの写像
///
/// 関節位置をマスク上のピクセルに変換するのに使う。カメラの後ろなど
/// 投影できない点は None。
pub trait ProjectionMapper {
    fn project(&self, point: &Point3<f32>) -> Option<PixelPoint>;
}

/// ピンホールカメラモデル
///
/// センサー座標系: X 右、Y 上、Z 前方（カメラから被写体へ）。画像座標系は Y 下向き。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PinholeProjection {
    pub width: u32,
    pub height: u32,
    pub fx: f32,
    pub fy: f32,
    pub cx: f32,
    pub cy: f32,
}

impl PinholeProjection {
    pub fn from_config(config: &CameraConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            fx: config.fx,
            fy: config.fy,
            cx: config.cx,
            cy: config.cy,
        }
    }

    /// ピクセル中心と奥行き（メートル）から3D点を復元
    pub fn unproject(&self, u: f32, v: f32, depth_m: f32) -> Point3<f32> {
        let x = (u - self.cx) * depth_m / self.fx;
        let y = (self.cy - v) * depth_m / self.fy;
        Point3::new(x, y, depth_m)
    }
}

impl Default for PinholeProjection {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

impl ProjectionMapper for PinholeProjection {
    fn project(&self, point: &Point3<f32>) -> Option<PixelPoint> {
        // Z<=0 はカメラの後ろ
        if point.z <= 0.0 || !point.z.is_finite() {
            return None;
        }
        let u = self.fx * point.x / point.z + self.cx;
        let v = self.cy - self.fy * point.y / point.z;
        if !u.is_finite() || !v.is_finite() {
            return None;
        }
        Some(PixelPoint::new(u.round() as i32, v.round() as i32))
    }
}
