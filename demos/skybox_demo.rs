//! Skybox demo
//!
//! Run with:
//!   cargo run --example skybox_demo
//!   cargo run --example skybox_demo -- --day sky_day.dds --evening sky_evening.dds
//!   cargo run --example skybox_demo -- --headless 300
//!
//! Controls:
//!   WASD     - Move camera (FreeFly) / nothing (Orbit)
//!   QE       - Move down/up
//!   Shift    - Sprint (2x speed)
//!   Mouse    - Look around / orbit (hold right mouse button)
//!   Scroll   - Adjust speed (FreeFly) or zoom (Orbit)
//!   Tab      - Switch camera mode (Orbit / FreeFly)
//!   [ ]      - Move time of day towards day / evening
//!   Escape   - Exit

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use skybox_scene::{
    backend::GraphicsBackend,
    resources::CubeMapData,
    scene::CameraInput,
    skybox::{CubeMapSource, DEFAULT_CUBE_MAP_PATH},
    Engine, EngineConfig, HeadlessBackend, SkyboxConfig, WgpuBackend, Window,
};
use winit::{
    event::{DeviceEvent, ElementState, Event, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget},
    keyboard::{KeyCode, PhysicalKey},
};

const DAY_PROGRESS_STEP: f32 = 0.05;

/// Rotating day/evening skybox.
#[derive(Parser, Debug)]
#[command(name = "skybox_demo", about = "Rotating day/evening skybox")]
struct Args {
    /// Run without a window for the given number of frames.
    #[arg(long, num_args = 0..=1, default_missing_value = "120", value_name = "FRAMES")]
    headless: Option<u32>,

    /// Day cube map (DDS).
    #[arg(long, default_value = DEFAULT_CUBE_MAP_PATH)]
    day: PathBuf,

    /// Evening cube map (DDS). Defaults to the day cube map.
    #[arg(long)]
    evening: Option<PathBuf>,

    /// Initial time of day, 0 = day, 1 = evening.
    #[arg(long, default_value_t = 0.0)]
    day_progress: f32,

    /// Disable vsync.
    #[arg(long)]
    no_vsync: bool,
}

impl Args {
    fn engine_config(&self) -> EngineConfig {
        let evening = self.evening.clone().unwrap_or_else(|| self.day.clone());
        let skybox = SkyboxConfig::new()
            .with_cube_maps(CubeMapSource::File(self.day.clone()), CubeMapSource::File(evening));

        EngineConfig {
            vsync: !self.no_vsync,
            ..EngineConfig::default()
        }
        .with_skybox(skybox)
        .with_day_progress(self.day_progress)
    }
}

/// Application state for input handling
struct AppState {
    camera_input: CameraInput,
    last_frame: Instant,
}

fn main() {
    env_logger::init();

    let args = Args::parse();
    let config = args.engine_config();

    match args.headless {
        Some(frames) => run_headless(config, frames),
        None => run_windowed(config),
    }
}

fn run_headless(mut config: EngineConfig, frames: u32) {
    if let CubeMapSource::File(path) = &config.skybox.day_cube_map {
        if !path.exists() {
            log::warn!("{} not found, using generated cube maps", path.display());
            config.skybox = config.skybox.with_cube_maps(
                CubeMapSource::Data(CubeMapData::solid_color([90, 150, 235, 255], 16, "day")),
                CubeMapSource::Data(CubeMapData::solid_color([230, 120, 60, 255], 16, "evening")),
            );
        }
    }

    let backend = HeadlessBackend::new(config.width, config.height);
    let mut engine = match Engine::new(backend, config) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Failed to create scene: {}", e);
            std::process::exit(1);
        }
    };

    let input = CameraInput::default();
    let dt = 1.0 / 60.0;
    for _ in 0..frames {
        engine.update(dt, &input);
        if let Err(e) = engine.render() {
            eprintln!("Render error: {}", e);
            break;
        }
    }

    let angle = engine.skybox().angle();
    let backend = engine.shutdown();
    println!(
        "Rendered {} frames headless: {} draws, final angle {:.2}",
        frames,
        backend.draw_count(),
        angle
    );
}

fn run_windowed(config: EngineConfig) {
    println!("Controls:");
    println!("  WASD        - Move camera");
    println!("  Q/E         - Move down/up");
    println!("  Right Mouse - Look around / orbit");
    println!("  Scroll      - Adjust speed/zoom");
    println!("  Tab         - Switch camera mode");
    println!("  [ / ]       - Time of day");
    println!("  Escape      - Exit");
    println!();

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            eprintln!("Failed to create event loop: {}", e);
            return;
        }
    };

    let mut window = match Window::new(&event_loop, &config.title, config.width, config.height) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("Failed to create window: {}", e);
            return;
        }
    };

    let backend = match WgpuBackend::new(window.window_arc(), config.vsync) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Failed to create backend: {}", e);
            return;
        }
    };

    let engine = match Engine::new(backend, config) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Failed to create scene: {}", e);
            return;
        }
    };

    let mut state = AppState {
        camera_input: CameraInput::default(),
        last_frame: Instant::now(),
    };
    let mut engine = Some(engine_with_title(engine, &window));

    let result = event_loop.run(move |event, elwt: &EventLoopWindowTarget<()>| {
        elwt.set_control_flow(ControlFlow::Poll);

        if let Event::LoopExiting = event {
            if let Some(scene) = engine.take() {
                scene.shutdown();
            }
            return;
        }

        let Some(scene) = engine.as_mut() else {
            return;
        };

        match event {
            Event::WindowEvent { event, .. } => {
                window.handle_event(&event);
                handle_window_event(&event, &mut state, scene, &mut window, elwt);
            }
            Event::DeviceEvent { event, .. } => {
                handle_device_event(&event, &mut state);
            }
            Event::AboutToWait => {
                let now = Instant::now();
                let dt = (now - state.last_frame).as_secs_f32();
                state.last_frame = now;

                if window.take_resized() {
                    let (width, height) = window.dimensions();
                    if let Err(e) = scene.resize(width, height) {
                        eprintln!("Resize error: {}", e);
                    }
                }

                scene.update(dt, &state.camera_input);
                state.camera_input.reset_deltas();
                window.request_redraw();
            }
            _ => {}
        }
    });

    if let Err(e) = result {
        eprintln!("Event loop failed: {}", e);
    }
}

fn engine_with_title<B: GraphicsBackend>(engine: Engine<B>, window: &Window) -> Engine<B> {
    window.set_status(&status_line(&engine));
    engine
}

fn status_line<B: GraphicsBackend>(engine: &Engine<B>) -> String {
    format!("day progress {:.2}", engine.skybox().day_progress())
}

fn handle_window_event<B: GraphicsBackend>(
    event: &WindowEvent,
    state: &mut AppState,
    engine: &mut Engine<B>,
    window: &mut Window,
    elwt: &EventLoopWindowTarget<()>,
) {
    match event {
        WindowEvent::CloseRequested => {
            println!("Close requested, shutting down...");
            elwt.exit();
        }
        WindowEvent::RedrawRequested => {
            if let Err(e) = engine.render() {
                eprintln!("Render error: {}", e);
            }
        }
        WindowEvent::KeyboardInput { event, .. } => {
            let pressed = event.state == ElementState::Pressed;

            if let PhysicalKey::Code(key) = event.physical_key {
                match key {
                    KeyCode::Escape => {
                        elwt.exit();
                    }
                    KeyCode::Tab if pressed && !event.repeat => {
                        let name = engine.switch_camera_controller();
                        window.set_status(&format!("{} camera, {}", name, status_line(engine)));
                    }
                    KeyCode::BracketLeft if pressed => {
                        engine.adjust_day_progress(-DAY_PROGRESS_STEP);
                        window.set_status(&status_line(engine));
                    }
                    KeyCode::BracketRight if pressed => {
                        engine.adjust_day_progress(DAY_PROGRESS_STEP);
                        window.set_status(&status_line(engine));
                    }
                    KeyCode::KeyW => state.camera_input.forward = pressed,
                    KeyCode::KeyS => state.camera_input.backward = pressed,
                    KeyCode::KeyA => state.camera_input.left = pressed,
                    KeyCode::KeyD => state.camera_input.right = pressed,
                    KeyCode::KeyQ => state.camera_input.down = pressed,
                    KeyCode::KeyE => state.camera_input.up = pressed,
                    KeyCode::ShiftLeft | KeyCode::ShiftRight => {
                        state.camera_input.sprint = pressed
                    }
                    _ => {}
                }
            }
        }
        WindowEvent::MouseInput { state: btn_state, button, .. } => {
            if *button == MouseButton::Right {
                let pressed = *btn_state == ElementState::Pressed;
                state.camera_input.mouse_look_active = pressed;
                window.set_cursor_grabbed(pressed);
            }
        }
        WindowEvent::MouseWheel { delta, .. } => {
            let scroll = match delta {
                MouseScrollDelta::LineDelta(_, y) => *y,
                MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
            };
            state.camera_input.scroll_delta += scroll;
        }
        WindowEvent::Focused(false) => {
            state.camera_input = CameraInput::default();
            window.set_cursor_grabbed(false);
        }
        _ => {}
    }
}

fn handle_device_event(event: &DeviceEvent, state: &mut AppState) {
    if let DeviceEvent::MouseMotion { delta } = event {
        if state.camera_input.mouse_look_active {
            state.camera_input.mouse_delta.x += delta.0 as f32;
            state.camera_input.mouse_delta.y += delta.1 as f32;
        }
    }
}
