use glam::Vec2;
use instant::Instant;
use winit::{
    event::*,
    event_loop::EventLoop,
    keyboard::{Key, NamedKey},
    window::WindowBuilder,
};

use wheel_core::{
    key_command, DeltaMode, DragMapper, WheelDirector, WheelGestureMapper, WheelSample, WheelSeed,
    WheelState,
};
use wheel_gpu::Renderer;

/// Pointer and gesture state owned by the event loop.
struct NativeInput {
    cursor: Vec2,
    wheel: WheelGestureMapper,
    drag: DragMapper,
}

fn key_name(key: &Key) -> Option<&str> {
    match key {
        Key::Named(NamedKey::ArrowUp) => Some("ArrowUp"),
        Key::Named(NamedKey::ArrowDown) => Some("ArrowDown"),
        Key::Named(NamedKey::ArrowLeft) => Some("ArrowLeft"),
        Key::Named(NamedKey::ArrowRight) => Some("ArrowRight"),
        Key::Named(NamedKey::Space) => Some(" "),
        Key::Named(NamedKey::Enter) => Some("Enter"),
        Key::Character(s) => Some(s.as_str()),
        _ => None,
    }
}

fn wheel_sample(delta: MouseScrollDelta, now: Instant) -> WheelSample {
    // winit reports scroll-up as positive; DOM deltas are the other way round.
    match delta {
        MouseScrollDelta::LineDelta(_, y) => WheelSample::new(-y, DeltaMode::Line, now),
        MouseScrollDelta::PixelDelta(p) => WheelSample::new(-p.y as f32, DeltaMode::Pixel, now),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    // Optional share query as the first argument, e.g. `w=450&c=0a1b...`
    let query = std::env::args().nth(1);
    let mut rng = rand::thread_rng();
    let seed = WheelSeed::from_query_or_random(query.as_deref(), &mut rng);
    log::info!("[seed] {}", seed.to_query());

    let mut store = WheelState::new(seed);
    let mut director = WheelDirector::new(&store);

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Color Wheel (native)")
        .build(&event_loop)?;
    let window = &window;
    let size = window.inner_size();

    let instance = wgpu::Instance::default();
    let surface = instance.create_surface(window)?;
    let mut renderer = pollster::block_on(Renderer::new(&instance, surface, size.width, size.height))?;
    director.set_viewport(size.width, size.height);

    let mut input = NativeInput {
        cursor: Vec2::ZERO,
        wheel: WheelGestureMapper::default(),
        drag: DragMapper::new(size.height as f32),
    };

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::Resized(size) => {
                renderer.resize(size.width, size.height);
                director.set_viewport(size.width, size.height);
                input.drag.set_viewport_height(size.height as f32);
            }
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::MouseWheel { delta, .. } => {
                let now = Instant::now();
                let sample = wheel_sample(delta, now);
                if let Some(step) = input.wheel.on_wheel(&sample, store.is_open()) {
                    store.step(step, now);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                input.cursor = Vec2::new(position.x as f32, position.y as f32);
                let now = Instant::now();
                if let Some(step) = input.drag.on_move(input.cursor.y, now, store.is_open()) {
                    store.step(step, now);
                }
            }
            WindowEvent::CursorLeft { .. } => {
                input.wheel.end_gesture();
                input.drag.cancel();
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => input.drag.begin(input.cursor.y, Instant::now()),
                ElementState::Released => {
                    if !input.drag.end() {
                        let (w, h) = renderer.size();
                        if let Some(hit) = director.click(&mut store, input.cursor, w as f32, h as f32) {
                            log::debug!("[wheel] click {:?}", hit);
                        }
                    }
                }
            },
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                if let Some(cmd) = key_name(&event.logical_key).and_then(key_command) {
                    cmd.apply(&mut store, Instant::now(), &mut rng);
                    log::info!("[seed] {}", store.seed().to_query());
                }
            }
            _ => {}
        },
        Event::AboutToWait => {
            director.frame(&mut store, Instant::now());
            let reflection = director.reflection_camera();
            match renderer.render(director.scene(), director.camera(), &reflection) {
                Ok(_) => window.request_redraw(),
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => renderer.reconfigure(),
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("[gpu] out of memory");
                    elwt.exit();
                }
                Err(e) => log::warn!("[gpu] frame skipped: {:?}", e),
            }
        }
        _ => {}
    })?;
    Ok(())
}
