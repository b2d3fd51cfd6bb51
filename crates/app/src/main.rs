//! Entry point: logging + command-line configuration, then the render loop.

use std::path::PathBuf;

use anyhow::Result;
use platform::{RunConfig, SceneKind};

fn parse_flag(args: &[String], name: &str) -> Option<bool> {
    // --name[=on|off]
    let mut value = None;
    for arg in args {
        if arg == &format!("--{name}") {
            value = Some(true);
        } else if let Some(v) = arg.strip_prefix(&format!("--{name}=")) {
            value = Some(matches!(
                v.to_ascii_lowercase().as_str(),
                "1" | "true" | "on" | "yes"
            ));
        }
    }
    value
}

fn parse_value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    let prefix = format!("--{name}=");
    args.iter().rev().find_map(|arg| arg.strip_prefix(&prefix))
}

fn parse_size_args(args: &[String], default: (u32, u32)) -> (u32, u32) {
    let mut w: Option<u32> = None;
    let mut h: Option<u32> = None;

    for arg in args {
        if let Some(v) = arg.strip_prefix("--size=") {
            if let Some((sw, sh)) = v.split_once('x').or_else(|| v.split_once('X')) {
                if let (Ok(pw), Ok(ph)) = (sw.parse::<u32>(), sh.parse::<u32>()) {
                    w = Some(pw);
                    h = Some(ph);
                }
            }
        } else if let Some(v) = arg.strip_prefix("--width=") {
            if let Ok(pw) = v.parse::<u32>() {
                w = Some(pw);
            }
        } else if let Some(v) = arg.strip_prefix("--height=") {
            if let Ok(ph) = v.parse::<u32>() {
                h = Some(ph);
            }
        }
    }

    (w.unwrap_or(default.0).max(1), h.unwrap_or(default.1).max(1))
}

fn parse_gl_version(value: &str) -> Option<(u8, u8)> {
    let (major, minor) = value.split_once('.')?;
    Some((major.parse().ok()?, minor.parse().ok()?))
}

fn parse_config(args: &[String]) -> RunConfig {
    let mut config = RunConfig::default();

    let (width, height) = parse_size_args(args, (config.window.width, config.window.height));
    config.window.width = width;
    config.window.height = height;

    if let Some(title) = parse_value(args, "title") {
        config.window.title = title.to_string();
    }
    if let Some(v) = parse_value(args, "gl-version") {
        match parse_gl_version(v) {
            Some(version) => config.window.gl_version = version,
            None => log::warn!("Unknown GL version '{v}', using {:?}.", config.window.gl_version),
        }
    }
    if let Some(v) = parse_flag(args, "vsync") {
        config.window.vsync = v;
    }
    if let Some(v) = parse_value(args, "scene") {
        match SceneKind::parse(v) {
            Some(scene) => config.scene = scene,
            None => log::warn!("Unknown scene '{v}', falling back to {}.", config.scene),
        }
    }
    if let Some(dir) = parse_value(args, "shader-dir") {
        config.shader_dir = PathBuf::from(dir);
    }
    if let Some(v) = parse_flag(args, "show-fps") {
        config.show_fps = v;
    }
    if let Some(v) = parse_flag(args, "capture-cursor") {
        config.capture_cursor = v;
    }
    config
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = parse_config(&args);
    log::info!(
        "Starting hello-opengl. Scene: {}, window_size={}x{}, GL {}.{}, vsync={}, show_fps={}",
        config.scene,
        config.window.width,
        config.window.height,
        config.window.gl_version.0,
        config.window.gl_version.1,
        config.window.vsync,
        config.show_fps
    );

    platform::run_with_renderer(config)?;

    log::info!("Graceful shutdown. Bye!");
    Ok(())
}
