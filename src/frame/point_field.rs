use anyhow::{bail, Result};
use nalgebra::Point3;

use super::projection::PinholeProjection;
use crate::geometry::PixelPoint;

/// 投影空間の各ピクセルに対応する3D点（投影の近似逆写像）
///
/// 奥行きが無効なピクセルは None。
#[derive(Debug, Clone)]
pub struct SkeletonPointField {
    width: usize,
    height: usize,
    points: Vec<Option<Point3<f32>>>,
}

impl SkeletonPointField {
    /// ミリメートル深度バッファから構築（0 は無効）
    pub fn from_depth_mm(depth: &[u16], projection: &PinholeProjection) -> Result<Self> {
        let width = projection.width as usize;
        let height = projection.height as usize;
        if depth.len() != width * height {
            bail!("depth buffer has {} samples, expected {}x{}", depth.len(), width, height);
        }
        let points = depth
            .iter()
            .enumerate()
            .map(|(i, &mm)| {
                if mm == 0 {
                    return None;
                }
                let u = (i % width) as f32;
                let v = (i / width) as f32;
                Some(projection.unproject(u, v, mm as f32 / 1000.0))
            })
            .collect();
        Ok(Self { width, height, points })
    }

    /// 全ピクセルを同じ奥行きの平面とみなして構築
    ///
    /// 深度バッファがなく、人物の平均奥行きしか分からない場合に使う。
    pub fn at_depth(projection: &PinholeProjection, depth_m: f32) -> Self {
        let width = projection.width as usize;
        let height = projection.height as usize;
        let points = (0..width * height)
            .map(|i| {
                let u = (i % width) as f32;
                let v = (i / width) as f32;
                Some(projection.unproject(u, v, depth_m))
            })
            .collect();
        Self { width, height, points }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// 最も近いピクセルの3D点（範囲外・無効は None）
    pub fn lookup(&self, pixel: PixelPoint) -> Option<Point3<f32>> {
        if pixel.x < 0 || pixel.y < 0 {
            return None;
        }
        let (x, y) = (pixel.x as usize, pixel.y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        self.points[y * self.width + x]
    }
}
