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

use dome_core::math::Extent2D;
use dome_core::renderer::{
    FilterMode, GlVersion, ProjectionMode, RenderError, ScreenFilter, ShaderSourceLocation,
    SmoothingParams, TextureFormat, TextureId, TextureUnit, ViewportParameters,
};
use dome_infra::{HeadlessCommand, HeadlessContext, HeadlessFaults};
use dome_lanes::edl_lane::shaders::{self, MIX_PROGRAM, SHADE_PROGRAM};
use dome_lanes::edl_lane::{Resolution, EDL_DESCRIPTION};
use dome_lanes::{EdlFilter, EdlSettings, ResultStage};

fn bundled_shaders() -> ShaderSourceLocation {
    shaders::bundled_location()
}

/// Registers the scene depth and color buffers the filter reads.
fn scene(ctx: &HeadlessContext, size: Extent2D) -> (TextureId, TextureId) {
    let depth = ctx.import_texture("scene depth", size, TextureFormat::Depth32Float);
    let color = ctx.import_texture("scene color", size, TextureFormat::Rgba8Unorm);
    (depth, color)
}

fn initialized(ctx: &mut HeadlessContext, settings: &EdlSettings, size: Extent2D) -> EdlFilter {
    let mut filter = EdlFilter::with_settings(settings);
    filter
        .initialize_default(ctx, size, &bundled_shaders())
        .expect("initialization should succeed");
    filter
}

fn all_results(filter: &EdlFilter) -> Vec<Option<TextureId>> {
    (0..7).map(|i| filter.result_texture_at(i)).collect()
}

/// The texture bindings issued after the mix program was bound.
fn composite_bindings(commands: &[HeadlessCommand]) -> Vec<(TextureUnit, Option<TextureId>)> {
    let start = commands
        .iter()
        .position(|c| *c == HeadlessCommand::BindProgram(MIX_PROGRAM.to_string()))
        .expect("the mix program should be bound");
    commands[start..]
        .iter()
        .filter_map(|c| match c {
            HeadlessCommand::BindTexture { unit, texture } => Some((*unit, *texture)),
            _ => None,
        })
        .collect()
}

#[test]
fn test_initialize_allocates_the_cascade() {
    for (width, height) in [(4, 4), (100, 100), (101, 37), (1920, 1080)] {
        let mut ctx = HeadlessContext::new();
        let size = Extent2D::new(width, height);
        let filter = initialized(&mut ctx, &EdlSettings::default(), size);

        assert!(filter.is_initialized());
        assert_eq!(filter.screen_size(), size);
        assert_eq!(filter.level_size(Resolution::Full), Some(size));
        assert_eq!(
            filter.level_size(Resolution::Half),
            Some(Extent2D::new(width >> 1, height >> 1))
        );
        assert_eq!(
            filter.level_size(Resolution::Quarter),
            Some(Extent2D::new(width >> 2, height >> 2))
        );
        assert_eq!(filter.composite_size(), Some(size));
        assert_eq!(ctx.live_program_count(), 2);

        // Smoothing sub-filters run at their level's resolution.
        let smoothed = filter
            .result_texture(ResultStage::Smoothed(Resolution::Quarter))
            .unwrap();
        assert_eq!(
            ctx.texture(smoothed).unwrap().size,
            Extent2D::new(width >> 2, height >> 2)
        );
    }
}

#[test]
fn test_targets_share_format_and_filter() {
    let mut ctx = HeadlessContext::new();
    let mut filter = EdlFilter::new();
    filter
        .initialize(
            &mut ctx,
            Extent2D::new(64, 32),
            TextureFormat::Rgba16Float,
            FilterMode::Nearest,
            &bundled_shaders(),
        )
        .unwrap();

    for stage in all_results(&filter).into_iter().flatten() {
        let texture = ctx.texture(stage).unwrap();
        assert_eq!(texture.format, TextureFormat::Rgba16Float);
        assert_eq!(texture.filter, FilterMode::Nearest);
    }
}

#[test]
fn test_reinitialize_resizes_without_leaking() {
    let mut ctx = HeadlessContext::new();
    let mut filter = initialized(&mut ctx, &EdlSettings::default(), Extent2D::new(64, 64));
    let textures = ctx.live_texture_count();
    let results = all_results(&filter);

    filter
        .initialize_default(&mut ctx, Extent2D::new(200, 100), &bundled_shaders())
        .unwrap();

    assert_eq!(ctx.live_texture_count(), textures);
    assert_eq!(ctx.live_program_count(), 2);
    assert_eq!(all_results(&filter), results);
    assert_eq!(
        filter.level_size(Resolution::Half),
        Some(Extent2D::new(100, 50))
    );
    let composite = filter.texture().unwrap();
    assert_eq!(ctx.texture(composite).unwrap().size, Extent2D::new(200, 100));
}

#[test]
fn test_reset_releases_everything() {
    let mut ctx = HeadlessContext::new();
    let _scene = scene(&ctx, Extent2D::new(32, 32));
    let baseline = ctx.live_texture_count();

    let mut filter = initialized(&mut ctx, &EdlSettings::default(), Extent2D::new(32, 32));
    assert!(ctx.live_texture_count() > baseline);

    filter.reset();
    assert!(all_results(&filter).iter().all(Option::is_none));
    assert_eq!(filter.screen_size(), Extent2D::ZERO);
    assert_eq!(ctx.live_texture_count(), baseline);
    assert_eq!(ctx.live_program_count(), 0);

    // Idempotent.
    filter.reset();
    assert_eq!(ctx.live_texture_count(), baseline);
}

#[test]
fn test_drop_releases_everything() {
    let mut ctx = HeadlessContext::new();
    {
        let _filter = initialized(&mut ctx, &EdlSettings::default(), Extent2D::new(16, 16));
        assert!(ctx.live_texture_count() > 0);
    }
    assert_eq!(ctx.live_texture_count(), 0);
    assert_eq!(ctx.live_program_count(), 0);
}

#[test]
fn test_smoothing_failure_disables_only_that_level() {
    let faults = HeadlessFaults::default().failing_smoothing_at(Extent2D::new(50, 50));
    let mut ctx = HeadlessContext::with_faults(faults);
    let size = Extent2D::new(100, 100);
    let (depth, color) = scene(&ctx, size);
    let mut filter = initialized(&mut ctx, &EdlSettings::default(), size);

    assert!(!filter.smoothing(Resolution::Half).enabled());
    assert!(!filter.smoothing(Resolution::Half).is_active());
    assert!(filter.smoothing(Resolution::Quarter).is_active());
    assert_eq!(
        filter.result_texture(ResultStage::Smoothed(Resolution::Half)),
        None
    );

    // The composite falls back to the raw half-resolution output.
    filter.shade(&mut ctx, depth, color, &ViewportParameters::default());
    let raw_half = filter
        .result_texture(ResultStage::Shaded(Resolution::Half))
        .unwrap();
    let bindings = composite_bindings(&ctx.commands());
    assert!(bindings.contains(&(TextureUnit(1), Some(raw_half))));

    // A disabled level stays disabled even once the backend recovers.
    ctx.set_faults(HeadlessFaults::default());
    filter
        .initialize_default(&mut ctx, size, &bundled_shaders())
        .unwrap();
    assert!(!filter.smoothing(Resolution::Half).enabled());
}

#[test]
fn test_shader_failure_leaves_nothing_alive() {
    let mut ctx = HeadlessContext::with_faults(HeadlessFaults::default().failing_program(MIX_PROGRAM));
    let mut filter = EdlFilter::new();

    let err = filter
        .initialize_default(&mut ctx, Extent2D::new(64, 64), &bundled_shaders())
        .unwrap_err();
    assert!(matches!(err, RenderError::Shader(_)));
    assert!(!filter.is_initialized());
    assert_eq!(ctx.live_texture_count(), 0);
    assert_eq!(ctx.live_program_count(), 0);

    ctx.set_faults(HeadlessFaults::default());
    filter
        .initialize_default(&mut ctx, Extent2D::new(64, 64), &bundled_shaders())
        .unwrap();
    assert!(filter.texture().is_some());
}

#[test]
fn test_missing_shader_sources_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    let mut ctx = HeadlessContext::new();
    let mut filter = EdlFilter::new();

    let err = filter
        .initialize_default(
            &mut ctx,
            Extent2D::new(8, 8),
            &ShaderSourceLocation::new(dir.path()),
        )
        .unwrap_err();
    assert!(err.to_string().contains("edl_shade"));
    assert_eq!(ctx.live_texture_count(), 0);
}

#[test]
fn test_render_target_failure_is_fatal_and_retryable() {
    // Allocation #2 is the quarter-resolution level.
    let mut ctx = HeadlessContext::with_faults(HeadlessFaults::default().failing_allocation(2));
    let mut filter = EdlFilter::new();

    match filter.initialize_default(&mut ctx, Extent2D::new(64, 64), &bundled_shaders()) {
        Err(RenderError::RenderTargetFailed { label, .. }) => assert_eq!(label, "EDL 1:4"),
        other => panic!("expected a render target failure, got {other:?}"),
    }
    assert!(all_results(&filter).iter().all(Option::is_none));
    assert_eq!(ctx.live_texture_count(), 0);
    assert_eq!(ctx.live_program_count(), 0);

    filter
        .initialize_default(&mut ctx, Extent2D::new(64, 64), &bundled_shaders())
        .unwrap();
    assert!(filter.is_initialized());
}

#[test]
fn test_empty_viewport_is_rejected() {
    let mut ctx = HeadlessContext::new();
    let mut filter = EdlFilter::new();
    let err = filter
        .initialize_default(&mut ctx, Extent2D::new(0, 10), &bundled_shaders())
        .unwrap_err();
    assert!(matches!(err, RenderError::InvalidSize(_)));
    assert_eq!(ctx.live_texture_count(), 0);
}

#[test]
fn test_unsupported_context_is_rejected() {
    let faults = HeadlessFaults::default().with_gl_version(GlVersion::GL_2_1);
    let mut ctx = HeadlessContext::with_faults(faults);
    let mut filter = EdlFilter::new();

    match filter.initialize_default(&mut ctx, Extent2D::new(64, 64), &bundled_shaders()) {
        Err(RenderError::UnsupportedContext { required, found }) => {
            assert_eq!(required, GlVersion::GL_3_0);
            assert_eq!(found, GlVersion::GL_2_1);
        }
        other => panic!("expected an unsupported context, got {other:?}"),
    }
    assert_eq!(ctx.live_texture_count(), 0);
}

#[test]
fn test_frame_is_skipped_below_the_frame_feature_level() {
    let mut ctx = HeadlessContext::new();
    let size = Extent2D::new(32, 32);
    let (depth, color) = scene(&ctx, size);
    let mut filter = initialized(&mut ctx, &EdlSettings::default(), size);

    ctx.set_faults(HeadlessFaults::default().with_gl_version(GlVersion::new(2, 0)));
    ctx.take_commands();
    filter.shade(&mut ctx, depth, color, &ViewportParameters::default());
    assert!(ctx.commands().is_empty());
}

#[test]
fn test_degenerate_viewport_records_nothing() {
    let mut ctx = HeadlessContext::new();
    let size = Extent2D::new(3, 3);
    let (depth, color) = scene(&ctx, size);
    let mut filter = initialized(&mut ctx, &EdlSettings::default(), size);
    let before = all_results(&filter);

    ctx.take_commands();
    filter.shade(&mut ctx, depth, color, &ViewportParameters::default());

    assert!(ctx.commands().is_empty());
    assert_eq!(all_results(&filter), before);
}

#[test]
fn test_uninitialized_filter_does_not_render() {
    let mut ctx = HeadlessContext::new();
    let mut filter = EdlFilter::new();
    filter.shade(
        &mut ctx,
        TextureId(0),
        TextureId(1),
        &ViewportParameters::default(),
    );
    assert!(ctx.commands().is_empty());
    assert_eq!(filter.texture(), None);
}

#[test]
fn test_end_to_end_without_smoothing() {
    let mut ctx = HeadlessContext::new();
    let size = Extent2D::new(100, 100);
    let (depth, color) = scene(&ctx, size);
    let settings = EdlSettings::default().without_smoothing();
    let mut filter = initialized(&mut ctx, &settings, size);
    ctx.take_commands();

    filter.shade(&mut ctx, depth, color, &ViewportParameters::default());

    assert!(filter.texture().is_some());
    for index in 1..=3 {
        assert!(filter.result_texture_at(index).is_some());
    }
    for index in 4..=6 {
        assert_eq!(filter.result_texture_at(index), None);
    }

    let commands = ctx.commands();
    assert_eq!(commands.first(), Some(&HeadlessCommand::PushState));
    assert_eq!(commands.get(1), Some(&HeadlessCommand::ScreenProjection(size)));
    assert_eq!(commands.last(), Some(&HeadlessCommand::PopState));
    assert_eq!(ctx.state_depth(), 0);
    assert_eq!(ctx.bound_unit_count(), 0);

    let draws: Vec<_> = commands
        .iter()
        .filter_map(|c| match c {
            HeadlessCommand::DrawQuad { rect, source } => Some((rect.size, *source)),
            _ => None,
        })
        .collect();
    let raw_full = filter.result_texture_at(1);
    assert_eq!(
        draws,
        vec![
            (Extent2D::new(100, 100), Some(depth)),
            (Extent2D::new(50, 50), Some(depth)),
            (Extent2D::new(25, 25), Some(depth)),
            (Extent2D::new(100, 100), raw_full),
        ]
    );
}

#[test]
fn test_shading_uniforms_per_level() {
    let mut ctx = HeadlessContext::new();
    let size = Extent2D::new(100, 60);
    let (depth, color) = scene(&ctx, size);
    let mut filter = initialized(&mut ctx, &EdlSettings::default().without_smoothing(), size);
    filter.set_strength(250.0);

    let viewport = ViewportParameters {
        z_near: 0.5,
        z_far: 40.0,
        ..Default::default()
    };
    filter.shade(&mut ctx, depth, color, &viewport);

    let writes = |name: &str| ctx.uniform_writes(SHADE_PROGRAM, name);
    assert_eq!(writes("Pix_scale"), vec![vec![1.0], vec![2.0], vec![4.0]]);
    assert_eq!(writes("Sx"), vec![vec![100.0], vec![50.0], vec![25.0]]);
    assert_eq!(writes("Sy"), vec![vec![60.0], vec![30.0], vec![15.0]]);
    assert_eq!(writes("Zoom"), vec![vec![3.0]; 3]);
    assert_eq!(writes("PerspectiveMode"), vec![vec![1.0]; 3]);
    assert_eq!(writes("Exp_scale"), vec![vec![250.0]; 3]);
    assert_eq!(writes("Zm"), vec![vec![0.5]; 3]);
    assert_eq!(writes("ZM"), vec![vec![40.0]; 3]);
    assert_eq!(writes("s1_color"), vec![vec![1.0]; 3]);
    assert_eq!(writes("s2_depth"), vec![vec![0.0]; 3]);
    assert!(writes("Neigh_pos_2D").iter().all(|value| value.len() == 16));

    let mix = |name: &str| ctx.uniform_writes(MIX_PROGRAM, name);
    assert_eq!(mix("A0"), vec![vec![1.0]]);
    assert_eq!(mix("A1"), vec![vec![0.5]]);
    assert_eq!(mix("A2"), vec![vec![0.25]]);
    assert_eq!(mix("s2_D"), vec![vec![3.0]]);
    assert_eq!(mix("absorb"), vec![vec![1.0]]);
}

#[test]
fn test_orthographic_modulation_reaches_the_shader() {
    let mut ctx = HeadlessContext::new();
    let size = Extent2D::new(16, 16);
    let (depth, color) = scene(&ctx, size);
    let mut filter = initialized(&mut ctx, &EdlSettings::default(), size);

    let viewport = ViewportParameters {
        projection: ProjectionMode::Orthographic,
        zoom: 2.0,
        ..Default::default()
    };
    filter.shade(&mut ctx, depth, color, &viewport);

    assert_eq!(
        ctx.uniform_writes(SHADE_PROGRAM, "Zoom"),
        vec![vec![2.0]; 3]
    );
    assert_eq!(
        ctx.uniform_writes(SHADE_PROGRAM, "PerspectiveMode"),
        vec![vec![0.0]; 3]
    );
}

#[test]
fn test_composite_binds_smoothed_outputs_in_order() {
    let mut ctx = HeadlessContext::new();
    let size = Extent2D::new(64, 64);
    let (depth, color) = scene(&ctx, size);
    let mut filter = initialized(&mut ctx, &EdlSettings::default(), size);

    filter.shade(&mut ctx, depth, color, &ViewportParameters::default());

    let raw_full = filter.result_texture(ResultStage::Shaded(Resolution::Full));
    let smooth_half = filter.result_texture(ResultStage::Smoothed(Resolution::Half));
    let smooth_quarter = filter.result_texture(ResultStage::Smoothed(Resolution::Quarter));
    assert!(smooth_half.is_some() && smooth_quarter.is_some());

    assert_eq!(
        composite_bindings(&ctx.commands()),
        vec![
            (TextureUnit(3), Some(depth)),
            (TextureUnit(2), smooth_quarter),
            (TextureUnit(1), smooth_half),
            (TextureUnit(0), raw_full),
            (TextureUnit(0), None),
            (TextureUnit(1), None),
            (TextureUnit(2), None),
            (TextureUnit(3), None),
        ]
    );
    assert_eq!(ctx.bound_unit_count(), 0);
    assert_eq!(ctx.state_depth(), 0);
}

#[test]
fn test_smoothing_runs_with_the_level_kernel() {
    let mut ctx = HeadlessContext::new();
    let size = Extent2D::new(64, 64);
    let (depth, color) = scene(&ctx, size);
    let mut filter = initialized(&mut ctx, &EdlSettings::default(), size);
    ctx.take_commands();

    filter.shade(&mut ctx, depth, color, &ViewportParameters::default());
    let commands = ctx.commands();

    let smooths: Vec<_> = commands
        .iter()
        .filter_map(|c| match c {
            HeadlessCommand::Smooth { input, params, .. } => Some((*input, *params)),
            _ => None,
        })
        .collect();
    let kernel = SmoothingParams {
        half_size: 2,
        sigma: 2.0,
        sigma_z: 0.4,
    };
    assert_eq!(
        smooths,
        vec![
            (filter.result_texture_at(2).unwrap(), kernel),
            (filter.result_texture_at(3).unwrap(), kernel),
        ]
    );

    // Sub-filters reuse the frame's viewport instead of saving state again.
    let pushes = commands
        .iter()
        .filter(|c| **c == HeadlessCommand::PushState)
        .count();
    assert_eq!(pushes, 1);
}

#[test]
fn test_all_levels_are_shaded_before_smoothing() {
    let mut ctx = HeadlessContext::new();
    let size = Extent2D::new(64, 64);
    let (depth, color) = scene(&ctx, size);
    let mut filter = initialized(&mut ctx, &EdlSettings::default(), size);
    ctx.take_commands();

    filter.shade(&mut ctx, depth, color, &ViewportParameters::default());
    let commands = ctx.commands();

    let shading_draws: Vec<usize> = commands
        .iter()
        .enumerate()
        .filter(|(_, c)| {
            matches!(c, HeadlessCommand::DrawQuad { source, .. } if *source == Some(depth))
        })
        .map(|(i, _)| i)
        .collect();
    let smooths: Vec<usize> = commands
        .iter()
        .enumerate()
        .filter(|(_, c)| matches!(c, HeadlessCommand::Smooth { .. }))
        .map(|(i, _)| i)
        .collect();

    assert_eq!(shading_draws.len(), 3);
    assert_eq!(smooths.len(), 2);
    assert!(shading_draws.last() < smooths.first());
}

#[test]
fn test_inactive_uniforms_are_skipped() {
    let faults = HeadlessFaults::default().omitting_uniform("Light_dir");
    let mut ctx = HeadlessContext::with_faults(faults);
    let size = Extent2D::new(16, 16);
    let (depth, color) = scene(&ctx, size);
    let mut filter = initialized(&mut ctx, &EdlSettings::default(), size);

    filter.shade(&mut ctx, depth, color, &ViewportParameters::default());
    assert!(ctx.uniform_writes(SHADE_PROGRAM, "Light_dir").is_empty());
    assert_eq!(ctx.uniform_writes(SHADE_PROGRAM, "Exp_scale").len(), 3);
}

#[test]
fn test_light_direction_reaches_the_shader() {
    let mut ctx = HeadlessContext::new();
    let size = Extent2D::new(16, 16);
    let (depth, color) = scene(&ctx, size);
    let mut filter = initialized(&mut ctx, &EdlSettings::default(), size);
    filter.set_light_direction(0.0, 0.0);

    filter.shade(&mut ctx, depth, color, &ViewportParameters::default());
    let writes = ctx.uniform_writes(SHADE_PROGRAM, "Light_dir");
    assert_eq!(writes.len(), 3);
    assert_eq!(writes[0], vec![0.0, 1.0, 0.0]);
}

#[test]
fn test_filter_behind_the_screen_filter_trait() {
    let mut ctx = HeadlessContext::new();
    let size = Extent2D::new(32, 32);
    let (depth, color) = scene(&ctx, size);
    let mut source = EdlFilter::new();
    source.set_strength(5.0);

    let mut filter: Box<dyn ScreenFilter> = source.clone_filter();
    assert_eq!(filter.description(), EDL_DESCRIPTION);
    assert_eq!(filter.texture(), None);

    filter
        .initialize_default(&mut ctx, size, &bundled_shaders())
        .unwrap();
    filter.shade(&mut ctx, depth, color, &ViewportParameters::default());
    assert_eq!(
        ctx.uniform_writes(SHADE_PROGRAM, "Exp_scale"),
        vec![vec![5.0]; 3]
    );

    filter.reset();
    assert_eq!(filter.texture(), None);
    assert_eq!(ctx.live_texture_count(), 2);
}
