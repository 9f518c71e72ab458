// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Runs the eye-dome lighting filter against the headless backend.
//!
//! Usage: `sandbox [settings.json|settings.ron] [width] [height]`

use anyhow::{bail, Context, Result};
use dome_core::math::Extent2D;
use dome_core::renderer::{ProjectionMode, ScreenFilter, TextureFormat, ViewportParameters};
use dome_infra::{HeadlessCommand, HeadlessContext};
use dome_lanes::edl_lane::shaders;
use dome_lanes::{EdlFilter, EdlSettings, ResultStage};
use std::path::Path;

fn load_settings(path: &Path) -> Result<EdlSettings> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading settings from {}", path.display()))?;
    let settings = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => EdlSettings::from_json(&text)?,
        Some("ron") => EdlSettings::from_ron(&text)?,
        _ => bail!("unsupported settings format: {}", path.display()),
    };
    Ok(settings)
}

fn parse_dimension(arg: Option<String>, default: u32) -> Result<u32> {
    match arg {
        Some(value) => value
            .parse()
            .with_context(|| format!("invalid dimension '{value}'")),
        None => Ok(default),
    }
}

fn run_frame(
    filter: &mut EdlFilter,
    ctx: &mut HeadlessContext,
    size: Extent2D,
    viewport: &ViewportParameters,
) {
    let depth = ctx.import_texture("scene depth", size, TextureFormat::Depth32Float);
    let color = ctx.import_texture("scene color", size, TextureFormat::Rgba8Unorm);

    ctx.take_commands();
    filter.shade(ctx, depth, color, viewport);
    let commands = ctx.take_commands();

    let draws = commands.iter().filter(|c| c.is_draw()).count();
    let smooths = commands
        .iter()
        .filter(|c| matches!(c, HeadlessCommand::Smooth { .. }))
        .count();
    log::info!(
        "Frame {}x{} ({:?}): {} commands, {} draws, {} smoothing passes, composite {:?}",
        size.width,
        size.height,
        viewport.projection,
        commands.len(),
        draws,
        smooths,
        filter.texture()
    );
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => load_settings(Path::new(&path))?,
        None => EdlSettings::default(),
    };
    let width = parse_dimension(args.next(), 1280)?;
    let height = parse_dimension(args.next(), 720)?;
    let size = Extent2D::new(width, height);

    let mut ctx = HeadlessContext::new();
    let mut filter = EdlFilter::with_settings(&settings);
    log::info!("{}", filter.description());

    filter
        .initialize_default(&mut ctx, size, &shaders::bundled_location())
        .context("initializing the EDL filter")?;
    log::info!(
        "Cascade ready: {} live textures, {} bytes",
        ctx.live_texture_count(),
        ctx.allocated_bytes()
    );

    run_frame(&mut filter, &mut ctx, size, &ViewportParameters::default());

    let ortho = ViewportParameters {
        projection: ProjectionMode::Orthographic,
        zoom: 1.5,
        ..Default::default()
    };
    run_frame(&mut filter, &mut ctx, size, &ortho);

    // Resize in place, as a window resize would.
    let resized = Extent2D::new(width / 2 + 1, height / 2 + 1);
    filter
        .initialize_default(&mut ctx, resized, &shaders::bundled_location())
        .context("resizing the EDL filter")?;
    run_frame(&mut filter, &mut ctx, resized, &ViewportParameters::default());

    for index in 0..7 {
        if let Some(stage) = ResultStage::from_index(index) {
            log::info!("{:?}: {:?}", stage, filter.result_texture(stage));
        }
    }

    filter.reset();
    log::info!(
        "Released: {} live textures, {} live programs",
        ctx.live_texture_count(),
        ctx.live_program_count()
    );
    Ok(())
}
