use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// 投影空間のピクセル座標（整数）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

impl PixelPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// 2点間のユークリッド距離（メートル）
pub fn distance_3d(p1: &Point3<f32>, p2: &Point3<f32>) -> f64 {
    let dx = (p1.x - p2.x) as f64;
    let dy = (p1.y - p2.y) as f64;
    let dz = (p1.z - p2.z) as f64;
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// 直線の傾き dy/dx
///
/// p1.x == p2.x のとき無限大（dy も 0 なら NaN）になる。
pub fn line_gradient(p1: PixelPoint, p2: PixelPoint) -> f32 {
    (p2.y as f32 - p1.y as f32) / (p2.x as f32 - p1.x as f32)
}

/// 直線に垂直な傾き
///
/// 水平な骨（dy=0）では無限大、両端が一致すると NaN。呼び出し側で `is_finite` を確認すること。
pub fn perpendicular_gradient(p1: PixelPoint, p2: PixelPoint) -> f32 {
    -1.0 / line_gradient(p1, p2)
}

/// 中点（最も近いピクセルに丸め）
pub fn midpoint(p1: PixelPoint, p2: PixelPoint) -> PixelPoint {
    let x = (p1.x as f64 + p2.x as f64) / 2.0;
    let y = (p1.y as f64 + p2.y as f64) / 2.0;
    PixelPoint::new(x.round() as i32, y.round() as i32)
}

/// pivot を通る傾き gradient の直線上で x = target_x の点
pub fn point_at(pivot: PixelPoint, gradient: f32, target_x: i32) -> PixelPoint {
    let y = gradient * (target_x - pivot.x) as f32 + pivot.y as f32;
    PixelPoint::new(target_x, y.round() as i32)
}
