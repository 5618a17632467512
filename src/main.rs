use anyhow::{bail, Result};
use log::{info, warn};

use body_measure::capture::{load_capture, CaptureReplay};
use body_measure::config::Config;
use body_measure::frame::{FrameSource, PinholeProjection};
use body_measure::measure::ViewDirection;
use body_measure::session::MeasurementSession;

const CONFIG_PATH: &str = "config.toml";

fn parse_args() -> Result<(String, String)> {
    let args: Vec<String> = std::env::args().collect();
    // Usage: body_measure <capture.json> [config.toml]
    match args.len() {
        2 => Ok((args[1].clone(), CONFIG_PATH.to_string())),
        3 => Ok((args[1].clone(), args[2].clone())),
        _ => bail!("usage: {} <capture.json> [config.toml]", args.first().map_or("body_measure", |s| s.as_str())),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let (capture_path, config_path) = parse_args()?;
    let config = Config::load_or_default(&config_path);

    println!("=== Body Measure ({}) ===", env!("GIT_VERSION"));
    println!("キャプチャ: {}", capture_path);
    println!("開始方向: {}", config.session.start_view);
    println!(
        "スキャナ: 確認幅 {}px, 戻り {}px",
        config.scanner.confirm_width, config.scanner.back_off
    );
    println!();

    let capture = load_capture(&capture_path)?;
    let mut replay = CaptureReplay::new(capture, PinholeProjection::from_config(&config.camera));
    let projection = *replay.projection();
    let mut session = MeasurementSession::new(&config);

    let mut frames = 0usize;
    let mut measured = 0usize;
    while let Some(batch) = replay.next_frame()? {
        if let Some(view) = replay.current_view() {
            session.set_view(view);
        }
        frames += 1;
        if session.process_frame(&batch, &projection).is_some() {
            measured += 1;
        }
    }
    info!("{} frames replayed, {} with a tracked subject", frames, measured);

    if session.latest().is_some() {
        println!("--- 最終フレーム ({}) ---", session.view());
        for (_, line) in session.readout() {
            println!("{}", line);
        }
        println!();
    }

    println!("--- 長さ ---");
    println!("{}", session.lengths());
    println!();

    println!("--- 周囲長 ---");
    match session.circumferences() {
        Some(circumferences) => println!("{}", circumferences.to_string_all()),
        None => {
            let missing: Vec<String> = ViewDirection::ALL
                .iter()
                .filter(|v| !session.profile().has_view(**v))
                .map(|v| v.to_string())
                .collect();
            warn!("not all views captured, missing: {}", missing.join(", "));
            println!("4方向の測定がそろっていません");
        }
    }

    Ok(())
}
