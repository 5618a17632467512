use anyhow::{Context, Result};
use log::warn;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::measure::ViewDirection;

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub scanner: ScannerConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScannerConfig {
    /// 背景ヒットを境界と確定するのに必要な連続背景ピクセル数
    #[serde(default = "default_confirm_width")]
    pub confirm_width: u32,
    /// 確定した境界から中心側へ戻すピクセル数
    #[serde(default = "default_back_off")]
    pub back_off: u32,
}

fn default_confirm_width() -> u32 { 5 }
fn default_back_off() -> u32 { 1 }

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            confirm_width: default_confirm_width(),
            back_off: default_back_off(),
        }
    }
}

/// 投影空間の解像度と内部パラメータ（既定値は 640x480 深度カメラ）
#[derive(Debug, Deserialize, Clone)]
pub struct CameraConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_fx")]
    pub fx: f32,
    #[serde(default = "default_fy")]
    pub fy: f32,
    #[serde(default = "default_cx")]
    pub cx: f32,
    #[serde(default = "default_cy")]
    pub cy: f32,
}

fn default_width() -> u32 { 640 }
fn default_height() -> u32 { 480 }
fn default_fx() -> f32 { 594.21 }
fn default_fy() -> f32 { 591.04 }
fn default_cx() -> f32 { 339.5 }
fn default_cy() -> f32 { 242.7 }

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            fx: default_fx(),
            fy: default_fy(),
            cx: default_cx(),
            cy: default_cy(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    /// セッション開始時（およびリセット後）の測定方向
    #[serde(default = "default_start_view")]
    pub start_view: ViewDirection,
}

fn default_start_view() -> ViewDirection { ViewDirection::Front }

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            start_view: default_start_view(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// 読み込めなければ既定値で続行する
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!("{:#}; using defaults", e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.scanner.confirm_width, 5);
        assert_eq!(config.scanner.back_off, 1);
        assert_eq!(config.camera.width, 640);
        assert_eq!(config.camera.height, 480);
        assert_eq!(config.session.start_view, ViewDirection::Front);
    }

    #[test]
    fn test_partial_toml() {
        let config: Config = toml::from_str(
            r#"
            [scanner]
            confirm_width = 10

            [session]
            start_view = "back"
            "#,
        )
        .unwrap();
        assert_eq!(config.scanner.confirm_width, 10);
        assert_eq!(config.scanner.back_off, 1);
        assert_eq!(config.camera.fx, 594.21);
        assert_eq!(config.session.start_view, ViewDirection::Back);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[camera]\nwidth = 320\nheight = 240").unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.camera.width, 320);
        assert_eq!(config.camera.height, 240);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = Config::load_or_default("/nonexistent/body_measure/config.toml");
        assert_eq!(config.scanner.confirm_width, 5);
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[scanner\nconfirm_width = ").unwrap();
        assert!(Config::load(file.path()).is_err());
    }
}
