use log::debug;

use crate::config::ScannerConfig;
use crate::frame::ForegroundMask;
use crate::geometry::{point_at, PixelPoint};

/// 走査の向き（x の増減）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanDirection {
    /// x 減少
    Start,
    /// x 増加
    End,
}

impl ScanDirection {
    fn sign(self) -> i32 {
        match self {
            ScanDirection::Start => -1,
            ScanDirection::End => 1,
        }
    }
}

/// 片方向の走査結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// 確定したシルエット境界（最後の前景側ピクセル）
    Edge(PixelPoint),
    /// 境界を確定する前に画像外へ出た
    Exited,
}

/// シルエット境界スキャナ
///
/// pivot から傾き gradient の直線に沿って1列ずつ外側へ進み、前景から背景へ
/// 変わる点を探す。背景ヒットの後 confirm_width 列すべて背景なら境界と確定し、
/// 途中に前景があればノイズとみなしてそこから走査を続ける。
#[derive(Debug, Clone)]
pub struct BoundaryScanner {
    confirm_width: i32,
    back_off: i32,
}

impl BoundaryScanner {
    pub fn new(confirm_width: u32, back_off: u32) -> Self {
        Self {
            confirm_width: confirm_width as i32,
            back_off: back_off as i32,
        }
    }

    pub fn from_config(config: &ScannerConfig) -> Self {
        Self::new(config.confirm_width, config.back_off)
    }

    /// 片方向に走査（pivot が画像外なら走査せず Exited）
    pub fn scan(&self, mask: &ForegroundMask, pivot: PixelPoint, gradient: f32, direction: ScanDirection) -> ScanOutcome {
        if !gradient.is_finite() || !mask.contains(pivot) {
            return ScanOutcome::Exited;
        }
        let sign = direction.sign();
        let at = |step: i32| point_at(pivot, gradient, pivot.x + sign * step);

        let mut step = 1;
        loop {
            let candidate = at(step);
            if !mask.contains(candidate) {
                return ScanOutcome::Exited;
            }
            if mask.is_foreground(candidate) {
                step += 1;
                continue;
            }

            // 背景ヒット: 外側 confirm_width 列で確認（画像外は背景）
            let noise = (1..=self.confirm_width).find(|&k| mask.is_foreground(at(step + k)));
            match noise {
                None => return ScanOutcome::Edge(at(step - self.back_off)),
                Some(k) => {
                    debug!("speckle at {:?} ({} px), continuing", candidate, k);
                    step += k;
                }
            }
        }
    }

    /// 両方向に走査して (Start 側, End 側) の境界を返す
    ///
    /// 傾きが有限でない、pivot が画像外、またはどちらかが画像外へ出た場合は None。
    pub fn find_boundaries(&self, mask: &ForegroundMask, pivot: PixelPoint, gradient: f32) -> Option<(PixelPoint, PixelPoint)> {
        if !gradient.is_finite() {
            debug!("non-finite gradient at {:?}", pivot);
            return None;
        }
        let start = self.scan(mask, pivot, gradient, ScanDirection::Start);
        let end = self.scan(mask, pivot, gradient, ScanDirection::End);
        match (start, end) {
            (ScanOutcome::Edge(a), ScanOutcome::Edge(b)) => Some((a, b)),
            _ => {
                debug!("scan from {:?} left the image: {:?} / {:?}", pivot, start, end);
                None
            }
        }
    }
}

impl Default for BoundaryScanner {
    fn default() -> Self {
        Self::from_config(&ScannerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 40x40 の中央に x:10..=29, y:12..=27 の前景矩形
    fn rect_mask() -> ForegroundMask {
        let mut mask = ForegroundMask::empty(40, 40);
        mask.fill_rect(10, 12, 20, 16);
        mask
    }

    #[test]
    fn test_horizontal_scan_hits_rect_edges() {
        let mask = rect_mask();
        let scanner = BoundaryScanner::default();
        let pivot = PixelPoint::new(20, 20);
        let (a, b) = scanner.find_boundaries(&mask, pivot, 0.0).unwrap();
        assert_eq!(a, PixelPoint::new(10, 20));
        assert_eq!(b, PixelPoint::new(29, 20));
    }

    #[test]
    fn test_steep_scan_hits_top_and_bottom_edges() {
        // 傾き 4: x が1進むごとに y が4進む → 上下の辺で止まる
        let mask = rect_mask();
        let scanner = BoundaryScanner::default();
        let pivot = PixelPoint::new(20, 20);
        let (a, b) = scanner.find_boundaries(&mask, pivot, 4.0).unwrap();
        assert_eq!(a, PixelPoint::new(18, 12));
        assert_eq!(b, PixelPoint::new(21, 24));
        assert!(mask.is_foreground(a) && mask.is_foreground(b));
    }

    #[test]
    fn test_diagonal_scan_hits_rect_edges() {
        // 傾き 1: 上辺 y=12 と下辺 y=27 で止まる
        let mask = rect_mask();
        let scanner = BoundaryScanner::default();
        let pivot = PixelPoint::new(20, 20);
        let (a, b) = scanner.find_boundaries(&mask, pivot, 1.0).unwrap();
        assert_eq!(a, PixelPoint::new(12, 12));
        assert_eq!(b, PixelPoint::new(27, 27));
    }

    #[test]
    fn test_speckle_is_skipped() {
        // 前景の中に2ピクセル幅の背景の穴
        let mut mask = rect_mask();
        let mut rows = Vec::new();
        for y in 0..40 {
            let row: String = (0..40)
                .map(|x| {
                    let fg = mask.is_foreground(PixelPoint::new(x, y)) && !(y == 20 && (x == 24 || x == 25));
                    if fg { '#' } else { '.' }
                })
                .collect();
            rows.push(row);
        }
        mask = ForegroundMask::from_rows(&rows).unwrap();

        let scanner = BoundaryScanner::default();
        let (_, b) = scanner.find_boundaries(&mask, PixelPoint::new(20, 20), 0.0).unwrap();
        assert_eq!(b, PixelPoint::new(29, 20));
    }

    #[test]
    fn test_gap_wider_than_confirm_width_is_boundary() {
        // 前景 x:0..=9 と x:20..=29、間に10列の背景
        let row: String = (0..40).map(|x| if x < 10 || (20..30).contains(&x) { '#' } else { '.' }).collect();
        let rows = vec![".".repeat(40), row, ".".repeat(40)];
        let mask = ForegroundMask::from_rows(&rows).unwrap();
        let scanner = BoundaryScanner::default();
        let outcome = scanner.scan(&mask, PixelPoint::new(5, 1), 0.0, ScanDirection::End);
        assert_eq!(outcome, ScanOutcome::Edge(PixelPoint::new(9, 1)));

        // 確認幅を広げると隙間はノイズ扱いになる
        let wide = BoundaryScanner::new(12, 1);
        let outcome = wide.scan(&mask, PixelPoint::new(5, 1), 0.0, ScanDirection::End);
        assert_eq!(outcome, ScanOutcome::Edge(PixelPoint::new(29, 1)));
    }

    #[test]
    fn test_foreground_touching_image_edge_exits() {
        let mut mask = ForegroundMask::empty(20, 5);
        mask.fill_rect(0, 0, 20, 5);
        let scanner = BoundaryScanner::default();
        let pivot = PixelPoint::new(10, 2);
        assert_eq!(scanner.scan(&mask, pivot, 0.0, ScanDirection::Start), ScanOutcome::Exited);
        assert!(scanner.find_boundaries(&mask, pivot, 0.0).is_none());
    }

    #[test]
    fn test_confirmation_near_image_edge() {
        // 前景が右端から2列手前で終わる: 確認列は画像外（背景）なので境界確定
        let mut mask = ForegroundMask::empty(20, 3);
        mask.fill_rect(5, 0, 13, 3);
        let scanner = BoundaryScanner::default();
        let outcome = scanner.scan(&mask, PixelPoint::new(10, 1), 0.0, ScanDirection::End);
        assert_eq!(outcome, ScanOutcome::Edge(PixelPoint::new(17, 1)));
    }

    #[test]
    fn test_pivot_outside_image_is_not_scanned() {
        let mask = rect_mask();
        let scanner = BoundaryScanner::default();
        for pivot in [PixelPoint::new(-5, 20), PixelPoint::new(i32::MAX, 20), PixelPoint::new(i32::MIN, i32::MIN)] {
            assert_eq!(scanner.scan(&mask, pivot, 0.5, ScanDirection::End), ScanOutcome::Exited);
            assert!(scanner.find_boundaries(&mask, pivot, 0.5).is_none());
        }
    }

    #[test]
    fn test_non_finite_gradient_short_circuits() {
        let mask = rect_mask();
        let scanner = BoundaryScanner::default();
        let pivot = PixelPoint::new(20, 20);
        assert!(scanner.find_boundaries(&mask, pivot, f32::INFINITY).is_none());
        assert!(scanner.find_boundaries(&mask, pivot, f32::NEG_INFINITY).is_none());
        assert!(scanner.find_boundaries(&mask, pivot, f32::NAN).is_none());
    }
}
