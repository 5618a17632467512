use anyhow::{bail, Result};

use crate::geometry::PixelPoint;

/// BGRA ピクセルのバイト数
const BGRA_BYTES: usize = 4;

/// この幅未満で背景に挟まれた前景の断片はノイズとみなす
const SPECKLE_SPAN: usize = 4;

/// 前景シルエット（非0 = 前景、0 = 背景）
///
/// 投影空間と 1:1 で対応する。1測定パスの間は変更しない。
#[derive(Debug, Clone, PartialEq)]
pub struct ForegroundMask {
    width: usize,
    height: usize,
    /// 1行のバイト数
    stride: usize,
    data: Vec<u8>,
}

impl ForegroundMask {
    pub fn new(data: Vec<u8>, width: usize, height: usize, stride: usize) -> Result<Self> {
        if stride < width {
            bail!("mask stride {} is smaller than width {}", stride, width);
        }
        if height > 0 && data.len() < stride * (height - 1) + width {
            bail!(
                "mask buffer too small: {} bytes for {}x{} (stride {})",
                data.len(),
                width,
                height,
                stride
            );
        }
        Ok(Self {
            width,
            height,
            stride,
            data,
        })
    }

    /// 全面背景のマスク
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            stride: width,
            data: vec![0; width * height],
        }
    }

    /// 背景除去済み BGRA フレームのアルファチャネルからマスクを作る
    ///
    /// 各行で、背景に挟まれた幅 SPECKLE_SPAN 未満の前景の断片は背景に落とす
    /// （境界付近のスペックル除去）。
    pub fn from_bgra(pixels: &[u8], width: usize, height: usize, stride: usize) -> Result<Self> {
        if stride < width * BGRA_BYTES {
            bail!("BGRA stride {} is smaller than {} pixels", stride, width);
        }
        if pixels.len() < stride * height {
            bail!("BGRA buffer too small: {} bytes for {} rows of {}", pixels.len(), height, stride);
        }

        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            let row = &pixels[y * stride..y * stride + width * BGRA_BYTES];
            let alpha: Vec<u8> = row.chunks_exact(BGRA_BYTES).map(|px| px[3]).collect();
            data.extend(despeckle(&alpha));
        }
        Ok(Self {
            width,
            height,
            stride: width,
            data,
        })
    }

    /// '#' を前景、それ以外を背景とする行文字列から作る（キャプチャファイル・テスト用）
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.as_ref().chars().count());
        let mut data = Vec::with_capacity(width * height);
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.chars().count() != width {
                bail!("mask row {} has {} columns, expected {}", y, row.chars().count(), width);
            }
            data.extend(row.chars().map(|c| if c == '#' { 255u8 } else { 0u8 }));
        }
        Ok(Self {
            width,
            height,
            stride: width,
            data,
        })
    }

    /// 矩形領域を前景で塗る（範囲外は切り詰め）
    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize) {
        let x_end = (x + w).min(self.width);
        let y_end = (y + h).min(self.height);
        for row in y.min(self.height)..y_end {
            let start = row * self.stride;
            self.data[start + x.min(x_end)..start + x_end].fill(255);
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn contains(&self, point: PixelPoint) -> bool {
        point.x >= 0 && point.y >= 0 && (point.x as usize) < self.width && (point.y as usize) < self.height
    }

    /// ピクセル値（範囲外は背景 = 0）
    pub fn value_at(&self, point: PixelPoint) -> u8 {
        if !self.contains(point) {
            return 0;
        }
        self.data[point.y as usize * self.stride + point.x as usize]
    }

    pub fn is_foreground(&self, point: PixelPoint) -> bool {
        self.value_at(point) != 0
    }

    /// 前景ピクセル数
    pub fn foreground_count(&self) -> usize {
        (0..self.height)
            .map(|y| {
                let start = y * self.stride;
                self.data[start..start + self.width].iter().filter(|&&v| v != 0).count()
            })
            .sum()
    }
}

/// 0 の値が SPECKLE_SPAN 前にも 0 なら、その間を 0 で埋める
///
/// 先頭から SPECKLE_SPAN 以内の 0 はそれ以前をすべて 0 にする。
fn despeckle(pixels: &[u8]) -> Vec<u8> {
    let mut out = vec![0u8; pixels.len()];
    for i in 0..pixels.len() {
        if pixels[i] != 0 {
            out[i] = pixels[i];
            continue;
        }
        match i.checked_sub(SPECKLE_SPAN) {
            None => out[..i].fill(0),
            Some(previous_zero) if pixels[previous_zero] == 0 => {
                out[previous_zero + 1..i].fill(0);
            }
            Some(_) => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows() {
        let mask = ForegroundMask::from_rows(&["..#", "###"]).unwrap();
        assert_eq!(mask.width(), 3);
        assert_eq!(mask.height(), 2);
        assert!(mask.is_foreground(PixelPoint::new(2, 0)));
        assert!(!mask.is_foreground(PixelPoint::new(0, 0)));
        assert_eq!(mask.foreground_count(), 4);
    }

    #[test]
    fn test_from_rows_ragged() {
        assert!(ForegroundMask::from_rows(&["..#", "##"]).is_err());
    }

    #[test]
    fn test_out_of_bounds_is_background() {
        let mut mask = ForegroundMask::empty(4, 4);
        mask.fill_rect(0, 0, 4, 4);
        assert_eq!(mask.value_at(PixelPoint::new(-1, 0)), 0);
        assert_eq!(mask.value_at(PixelPoint::new(0, 4)), 0);
        assert_eq!(mask.value_at(PixelPoint::new(4, 0)), 0);
        assert_eq!(mask.value_at(PixelPoint::new(3, 3)), 255);
    }

    #[test]
    fn test_stride_padding() {
        // 幅2、stride 3（行末に1バイトのパディング）
        let data = vec![0, 9, 7, 5, 0, 7];
        let mask = ForegroundMask::new(data, 2, 2, 3).unwrap();
        assert!(mask.is_foreground(PixelPoint::new(1, 0)));
        assert!(mask.is_foreground(PixelPoint::new(0, 1)));
        assert!(!mask.is_foreground(PixelPoint::new(1, 1)));
        assert_eq!(mask.foreground_count(), 2);
    }

    #[test]
    fn test_new_rejects_small_buffer() {
        assert!(ForegroundMask::new(vec![0; 5], 3, 2, 3).is_err());
        assert!(ForegroundMask::new(vec![0; 6], 3, 2, 2).is_err());
    }

    #[test]
    fn test_from_bgra_uses_alpha() {
        // 3ピクセル: 透明, 不透明, 不透明
        let pixels = vec![
            10, 20, 30, 0, //
            10, 20, 30, 255, //
            10, 20, 30, 255,
        ];
        let mask = ForegroundMask::from_bgra(&pixels, 3, 1, 12).unwrap();
        assert!(!mask.is_foreground(PixelPoint::new(0, 0)));
        assert!(mask.is_foreground(PixelPoint::new(1, 0)));
        assert!(mask.is_foreground(PixelPoint::new(2, 0)));
    }

    #[test]
    fn test_despeckle_fills_short_runs() {
        // index 4 と 8 が 0 → 5..8 は 0 に落ちる
        let pixels = [1, 1, 1, 1, 0, 9, 9, 9, 0, 1];
        let out = despeckle(&pixels);
        assert_eq!(out, vec![1, 1, 1, 1, 0, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_despeckle_leading_zero_clears_prefix() {
        let pixels = [5, 5, 0, 5];
        let out = despeckle(&pixels);
        assert_eq!(out, vec![0, 0, 0, 5]);
    }

    fn bgra_row(alpha: &[u8]) -> Vec<u8> {
        alpha.iter().flat_map(|&a| [10, 20, 30, a]).collect()
    }

    #[test]
    fn test_from_bgra_drops_speckle() {
        let alpha = [0, 0, 0, 0, 0, 255, 0, 0, 0, 0];
        let pixels = bgra_row(&alpha);
        let mask = ForegroundMask::from_bgra(&pixels, alpha.len(), 1, pixels.len()).unwrap();
        assert_eq!(mask.foreground_count(), 0);
    }

    #[test]
    fn test_from_bgra_keeps_wide_run() {
        let alpha = [0, 0, 0, 0, 0, 255, 255, 255, 255, 0, 0, 0, 0, 0];
        let pixels = bgra_row(&alpha);
        let mask = ForegroundMask::from_bgra(&pixels, alpha.len(), 1, pixels.len()).unwrap();
        assert_eq!(mask.foreground_count(), 4);
        assert!(mask.is_foreground(PixelPoint::new(5, 0)));
        assert!(mask.is_foreground(PixelPoint::new(8, 0)));
    }

    #[test]
    fn test_from_bgra_rows_are_independent() {
        let mut pixels = bgra_row(&[0, 255, 255, 255, 255, 255]);
        pixels.extend(bgra_row(&[255, 255, 255, 255, 255, 255]));
        let mask = ForegroundMask::from_bgra(&pixels, 6, 2, 24).unwrap();
        assert_eq!(mask.foreground_count(), 11);
    }
}
