use layout_raster::prelude::*;
use layout_raster::renderer::DrawCall;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn run(commands: &[RenderCommand<'_>]) -> (FrameStats, RecordingBackend) {
    init_logging();
    let mut backend = RecordingBackend::new();
    let stats = Renderer::default()
        .render(&mut backend, commands)
        .expect("frame should render");
    (stats, backend)
}

#[test]
fn test_nested_scissors_return_to_zero_depth() {
    let outer = BoundingBox::new(0.0, 0.0, 200.0, 200.0);
    let inner = BoundingBox::new(10.0, 10.0, 50.0, 50.0);
    let commands = [
        RenderCommand::scissor_start(outer),
        RenderCommand::rectangle(outer, Color::BLACK, 0.0),
        RenderCommand::scissor_start(inner),
        RenderCommand::text(inner, b"clipped", 10.0, 1.0, Color::WHITE),
        RenderCommand::scissor_end(),
        RenderCommand::scissor_end(),
        RenderCommand::scissor_start(inner),
        RenderCommand::scissor_end(),
    ];

    let (stats, backend) = run(&commands);
    assert_eq!(stats.clip_depth, 0);
    assert_eq!(stats.max_clip_depth, 2);
    assert_eq!(stats.clips_pushed, 3);
    assert_eq!(stats.clips_popped, 3);
    assert_eq!(backend.clip_depth(), 0);
    assert_eq!(backend.max_clip_depth(), 2);
}

#[test]
fn test_unbalanced_scissors_are_forwarded_as_is() {
    let bb = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
    let (stats, backend) = run(&[RenderCommand::scissor_start(bb)]);
    assert_eq!(stats.clip_depth, 1);
    assert_eq!(backend.clip_depth(), 1);
}

#[test]
fn test_square_rectangle_is_plain_fill() {
    let bb = BoundingBox::new(5.0, 7.0, 100.0, 50.0);
    let (_, backend) = run(&[RenderCommand::rectangle(bb, Color::RED, 0.0)]);
    assert_eq!(
        backend.calls(),
        &[DrawCall::FillRect {
            rect: IntRect::new(5, 7, 100, 50),
            color: Rgba8::new(255, 0, 0, 255),
        }]
    );
}

#[test]
fn test_rounded_rectangle_roundness() {
    let bb = BoundingBox::new(0.0, 0.0, 100.0, 50.0);
    let radius = CornerRadius::new(10.0, 0.0, 0.0, 0.0);
    let (stats, backend) = run(&[RenderCommand::rectangle(bb, Color::RED, radius)]);

    assert_eq!(stats.rectangles, 1);
    match &backend.calls()[0] {
        DrawCall::FillRoundedRect {
            rect,
            roundness,
            segments,
            ..
        } => {
            assert_eq!(*rect, bb);
            assert_eq!(*roundness, 0.4);
            assert_eq!(*segments, 8);
        }
        other => panic!("expected a rounded fill, got {:?}", other),
    }
}

#[test]
fn test_rounded_rect_segments_follow_config() {
    let bb = BoundingBox::new(0.0, 0.0, 40.0, 40.0);
    let mut backend = RecordingBackend::new();
    let mut renderer = Renderer::new(RendererConfig::default().rounded_rect_segments(3));
    let commands = [RenderCommand::rectangle(bb, Color::RED, 4.0)];
    renderer.render(&mut backend, &commands).unwrap();
    assert!(matches!(
        backend.calls()[0],
        DrawCall::FillRoundedRect { segments: 3, .. }
    ));
}

#[test]
fn test_image_tint_sentinel_becomes_white() {
    let texture = TextureHandle::new(7, 32, 16);
    let bb = BoundingBox::new(0.0, 0.0, 64.0, 32.0);
    let (stats, backend) = run(&[
        RenderCommand::image(bb, texture, Color::TRANSPARENT),
        RenderCommand::image(bb, texture, Color::rgba(0.0, 0.0, 0.0, 1.0)),
    ]);

    assert_eq!(stats.images, 2);
    let tints: Vec<Rgba8> = backend
        .calls()
        .iter()
        .map(|call| match call {
            DrawCall::DrawTexture {
                tint,
                source,
                dest,
                ..
            } => {
                assert_eq!(*source, BoundingBox::new(0.0, 0.0, 32.0, 16.0));
                assert_eq!(*dest, bb);
                *tint
            }
            other => panic!("expected a texture draw, got {:?}", other),
        })
        .collect();
    assert_eq!(
        tints,
        vec![Rgba8::new(255, 255, 255, 255), Rgba8::new(0, 0, 0, 1)]
    );
}

#[test]
fn test_unknown_tag_reports_unhandled_command() {
    let err = RenderCommandType::try_from(200u8).unwrap_err();
    assert_eq!(err, RenderError::UnknownCommandType { tag: 200 });
    assert!(err.to_string().contains("Unhandled Render Command"));
}

#[test]
fn test_none_command_stops_the_frame() {
    init_logging();
    let bb = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
    let commands = [
        RenderCommand::rectangle(bb, Color::RED, 0.0),
        RenderCommand::new(bb, RenderData::None),
        RenderCommand::rectangle(bb, Color::BLACK, 0.0),
    ];

    let mut backend = RecordingBackend::new();
    let err = Renderer::default()
        .render(&mut backend, &commands)
        .unwrap_err();

    assert_eq!(
        err,
        RenderError::UnhandledCommand {
            index: 1,
            command_type: RenderCommandType::None
        }
    );
    assert!(err.to_string().contains("Unhandled Render Command"));
    // Only the command before the failure was drawn.
    assert_eq!(backend.calls().len(), 1);
}

#[test]
fn test_custom_commands_follow_policy() {
    init_logging();
    let bb = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
    let commands = [
        RenderCommand::custom(
            bb,
            CustomRenderData {
                background_color: Color::RED,
                corner_radius: CornerRadius::default(),
                user_data: 42,
            },
        ),
        RenderCommand::rectangle(bb, Color::RED, 0.0),
    ];

    let mut backend = RecordingBackend::new();
    let stats = Renderer::default().render(&mut backend, &commands).unwrap();
    assert_eq!(stats.custom_skipped, 1);
    assert_eq!(stats.commands, 2);
    assert_eq!(backend.calls().len(), 1);

    let mut backend = RecordingBackend::new();
    let config = RendererConfig::default().custom_commands(CustomCommandPolicy::Reject);
    let mut strict = Renderer::new(config);
    assert_eq!(
        strict.render(&mut backend, &commands),
        Err(RenderError::CustomCommandRejected { index: 0 })
    );
    assert!(backend.calls().is_empty());
}

#[test]
fn test_bounding_box_rounded_once() {
    let bb = BoundingBox::new(10.4, 10.6, 99.5, 49.5);
    let (_, backend) = run(&[
        RenderCommand::rectangle(bb, Color::RED, 0.0),
        RenderCommand::scissor_start(bb),
        RenderCommand::scissor_end(),
    ]);

    assert_eq!(
        backend.calls()[0],
        DrawCall::FillRect {
            rect: IntRect::new(10, 11, 100, 50),
            color: Rgba8::new(255, 0, 0, 255),
        }
    );
    assert_eq!(
        backend.calls()[1],
        DrawCall::PushClip(IntRect::new(10, 11, 100, 50))
    );
}

#[test]
fn test_rounded_box_feeds_radius_math() {
    // 49.5 rounds to 50 before the roundness division.
    let bb = BoundingBox::new(0.0, 0.0, 99.5, 49.5);
    let (_, backend) = run(&[RenderCommand::rectangle(bb, Color::RED, 10.0)]);
    assert!(matches!(
        backend.calls()[0],
        DrawCall::FillRoundedRect { roundness, .. } if roundness == 0.4
    ));
}

#[test]
fn test_text_is_staged_and_positioned() {
    let bb = BoundingBox::new(12.4, 30.6, 80.0, 24.0);
    let (stats, backend) = run(&[
        RenderCommand::text(bb, b"Sample text", 24.0, 2.0, Color::RED),
        RenderCommand::text(bb, b"CChat", 24.0, 0.0, Color::BLACK),
    ]);

    assert_eq!(stats.texts, 2);
    assert_eq!(
        backend.calls()[0],
        DrawCall::DrawText {
            text: c"Sample text".to_owned(),
            x: 12,
            y: 31,
            font_size: 24.0,
            spacing: 2.0,
            color: Rgba8::new(255, 0, 0, 255),
        }
    );
    assert!(matches!(
        &backend.calls()[1],
        DrawCall::DrawText { text, .. } if text.as_bytes() == b"CChat"
    ));
}

#[test]
fn test_border_with_radius_draws_sides_then_corners() {
    let bb = BoundingBox::new(0.0, 0.0, 100.0, 60.0);
    let radius = CornerRadius::all(8.0);
    let border = RenderCommand::border(bb, BorderWidth::all(2), Color::BLACK, radius);
    let (stats, backend) = run(&[border]);

    assert_eq!(stats.borders, 1);
    let calls = backend.calls();
    assert_eq!(calls.len(), 8);
    let (sides, rings) = calls.split_at(4);
    assert!(sides.iter().all(|c| matches!(c, DrawCall::FillRect { .. })));
    assert!(rings.iter().all(|c| matches!(
        c,
        DrawCall::FillRing {
            inner_radius,
            outer_radius,
            segments: 10,
            ..
        } if *inner_radius == 6.0 && *outer_radius == 8.0
    )));
}

#[test]
fn test_empty_frame() {
    let (stats, backend) = run(&[]);
    assert_eq!(stats, FrameStats::default());
    assert!(backend.calls().is_empty());
}

#[test]
fn test_renderer_reusable_after_shutdown() {
    init_logging();
    let bb = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
    let long_text = [b'x'; 64];
    let mut renderer = Renderer::default();
    let mut backend = RecordingBackend::new();

    let commands = [RenderCommand::text(bb, &long_text, 10.0, 0.0, Color::BLACK)];
    renderer.render(&mut backend, &commands).unwrap();
    assert_eq!(renderer.scratch().capacity(), 65);

    renderer.shutdown();
    assert_eq!(renderer.scratch().capacity(), 0);

    let commands = [RenderCommand::text(bb, b"ok", 10.0, 0.0, Color::BLACK)];
    renderer.render(&mut backend, &commands).unwrap();
    assert_eq!(renderer.scratch().capacity(), 3);
}

#[test]
fn test_measured_text_renders_on_software_backend() {
    init_logging();
    let measurer = TextMeasurer::default();
    let size = measurer.measure(b"CChat", 24.0, 0.0).unwrap();
    assert_eq!(size.height, 24.0);

    let bb = BoundingBox::new(4.0, 4.0, size.width, size.height);
    let commands = [RenderCommand::text(bb, b"CChat", 24.0, 0.0, Color::BLACK)];
    let mut backend = SoftwareBackend::new(200, 40).unwrap();
    let mut renderer = Renderer::default();
    renderer.render(&mut backend, &commands).unwrap();

    let image = backend.to_image();
    let inked = image.pixels().filter(|p| p.0[0] < 255).count();
    assert!(inked > 0);
}

const EXIT_CHILD_ENV: &str = "LAYOUT_RASTER_RENDER_OR_EXIT_CHILD";

#[test]
fn test_render_or_exit_terminates_on_unhandled_command() {
    let commands = [
        RenderCommand::rectangle(BoundingBox::new(0.0, 0.0, 4.0, 4.0), Color::RED, 0.0),
        RenderCommand::new(BoundingBox::default(), RenderData::None),
    ];

    // Child: the process must end inside render_or_exit.
    if std::env::var_os(EXIT_CHILD_ENV).is_some() {
        Renderer::default().render_or_exit(&mut RecordingBackend::new(), &commands);
        return;
    }

    let output = std::process::Command::new(std::env::current_exe().unwrap())
        .args([
            "test_render_or_exit_terminates_on_unhandled_command",
            "--exact",
            "--nocapture",
            "--test-threads=1",
        ])
        .env(EXIT_CHILD_ENV, "1")
        .output()
        .unwrap();

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(1), "stderr: {}", stderr);
    assert!(
        stderr.contains("Error: Unhandled Render Command: None at index 1"),
        "stderr: {}",
        stderr
    );
}

#[test]
fn test_render_or_exit_returns_stats_for_valid_frame() {
    init_logging();
    let bb = BoundingBox::new(0.0, 0.0, 4.0, 4.0);
    let commands = [RenderCommand::rectangle(bb, Color::RED, 0.0)];
    let stats = Renderer::default().render_or_exit(&mut RecordingBackend::new(), &commands);
    assert_eq!(stats.commands, 1);
}
