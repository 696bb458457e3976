use std::{env, fs, path::PathBuf};

use image::ImageReader;
use log::LevelFilter;
use rover_vision::convert::{rgb_view, to_image_rgb, worldmap_to_image};
use rover_vision::core::init_from_env;
use rover_vision::{MapChannel, PerceptionConfig, RoverPose};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
struct ExampleConfig {
    image_path: String,
    pose: RoverPose,
    #[serde(default)]
    vision_path: Option<String>,
    #[serde(default)]
    worldmap_path: Option<String>,
    #[serde(default)]
    report_path: Option<String>,
    #[serde(default)]
    perception: PerceptionConfig,
}

#[derive(Debug, Serialize)]
struct Report {
    image_path: String,
    width: usize,
    height: usize,
    pose: RoverPose,
    rectifier: [[f64; 3]; 3],
    nav_pixels: usize,
    mean_bearing_deg: Option<f32>,
    mean_distance: Option<f32>,
    coverage_obstacle: usize,
    coverage_sample: usize,
    coverage_navigable: usize,
}

fn mean(v: &[f32]) -> Option<f32> {
    (!v.is_empty()).then(|| v.iter().sum::<f32>() / v.len() as f32)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_from_env(LevelFilter::Debug)?;

    let config_path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .ok_or("usage: perceive_frame <config.json>")?;
    let cfg: ExampleConfig = serde_json::from_str(&fs::read_to_string(&config_path)?)?;

    let frame = ImageReader::open(&cfg.image_path)?.decode()?.to_rgb8();
    let view = rgb_view(&frame);

    let pipeline = cfg.perception.build_pipeline()?;
    let mut map = cfg.perception.new_world_map();
    let out = pipeline.step(&view, &cfg.pose, &mut map)?;

    if let Some(path) = &cfg.vision_path {
        if let Some(img) = to_image_rgb(&out.vision) {
            img.save(path)?;
            log::info!("vision image written to {path}");
        }
    }
    if let Some(path) = &cfg.worldmap_path {
        worldmap_to_image(&map).save(path)?;
        log::info!("world map written to {path}");
    }

    let report = Report {
        image_path: cfg.image_path.clone(),
        width: view.width,
        height: view.height,
        pose: cfg.pose,
        rectifier: pipeline.rectifier().to_array(),
        nav_pixels: out.nav.len(),
        mean_bearing_deg: mean(&out.nav.bearings).map(f32::to_degrees),
        mean_distance: mean(&out.nav.distances),
        coverage_obstacle: map.coverage(MapChannel::Obstacle),
        coverage_sample: map.coverage(MapChannel::Sample),
        coverage_navigable: map.coverage(MapChannel::Navigable),
    };
    let json = serde_json::to_string_pretty(&report)?;
    match &cfg.report_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
