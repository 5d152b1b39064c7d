//! Winit window driver.

use std::time::{Duration, Instant};

use pixels::{Pixels, SurfaceTexture};
use winit::dpi::LogicalSize;
use winit::event::{Event, VirtualKeyCode};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};
use winit_input_helper::WinitInputHelper;

use crate::emulator::{EmulationState, Emulator};
use crate::errors::EmuResult;
use crate::peripherals::input::{Key, KeyEvent};

use super::pixels_driver::PixelsDisplayDriver;
use super::{
    DisplayInterface, WindowInterface, DISPLAY_HEIGHT, DISPLAY_WIDTH, WINDOW_HEIGHT, WINDOW_TITLE,
    WINDOW_WIDTH,
};

/// Interval between interrupt requests: two per displayed frame (~120 Hz).
const IRQ_INTERVAL: Duration = Duration::from_micros(8_333);
/// Upper bound on instructions executed per event-loop pass.
const STEPS_PER_PASS: usize = 4_000;

/// Host keys the cabinet listens to.
const KEY_MAP: [(VirtualKeyCode, Key); 9] = [
    (VirtualKeyCode::Space, Key::Space),
    (VirtualKeyCode::LControl, Key::Control),
    (VirtualKeyCode::RControl, Key::Control),
    (VirtualKeyCode::Left, Key::Left),
    (VirtualKeyCode::Right, Key::Right),
    (VirtualKeyCode::Key5, Key::Five),
    (VirtualKeyCode::Key1, Key::One),
    (VirtualKeyCode::Key2, Key::Two),
    (VirtualKeyCode::Escape, Key::Escape),
];

/// Window driver for winit.
#[derive(Default)]
pub struct WinitWindowDriver;

impl WinitWindowDriver {
    /// Creates new driver.
    pub fn new() -> Self {
        Default::default()
    }

    fn create_window(&mut self) -> EmuResult<(EventLoop<()>, Window)> {
        let event_loop = EventLoop::new();
        let size = LogicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT);
        let window = WindowBuilder::new()
            .with_title(WINDOW_TITLE)
            .with_inner_size(size)
            .with_min_inner_size(size)
            .build(&event_loop)?;

        Ok((event_loop, window))
    }
}

impl WindowInterface for WinitWindowDriver {
    fn run_emulator(&mut self, mut emulator: Emulator) -> EmuResult {
        let (event_loop, window) = self.create_window()?;

        let mut pixels = {
            let window_size = window.inner_size();
            let surface_texture =
                SurfaceTexture::new(window_size.width, window_size.height, &window);
            Pixels::new(DISPLAY_WIDTH, DISPLAY_HEIGHT, surface_texture)?
        };

        // The host clock side of the interrupt handshake.
        let irq_line = emulator.cpu.irq_line();
        let mut next_irq = Instant::now() + IRQ_INTERVAL;

        let mut input = WinitInputHelper::new();

        event_loop.run(move |event, _, control_flow| {
            *control_flow = ControlFlow::Poll;

            if let Event::RedrawRequested(_) = event {
                let mut display = PixelsDisplayDriver::new(pixels.get_frame());
                if let Err(error) = display.refresh(emulator.cpu.memory.vram()) {
                    error!("display refresh failed: {}", error);
                    *control_flow = ControlFlow::Exit;
                    return;
                }

                if let Err(error) = pixels.render() {
                    error!("render failed: {}", error);
                    *control_flow = ControlFlow::Exit;
                    return;
                }
            }

            if input.update(&event) {
                if input.quit() {
                    emulator.cpu.request_halt();
                }

                for (code, key) in KEY_MAP.iter() {
                    if input.key_pressed(*code) {
                        emulator.key_event(*key, KeyEvent::Pressed);
                    }
                    if input.key_released(*code) {
                        emulator.key_event(*key, KeyEvent::Released);
                    }
                }

                // Two interrupt requests per frame, paced by wall clock.
                let now = Instant::now();
                while now >= next_irq {
                    irq_line.raise();
                    next_irq += IRQ_INTERVAL;
                }

                for _ in 0..STEPS_PER_PASS {
                    match emulator.step() {
                        EmulationState::Running => {}
                        EmulationState::EndOfFrame => {
                            window.request_redraw();
                            break;
                        }
                        EmulationState::Stopped(reason) => {
                            info!("CPU stopped: {:?}", reason);
                            println!("*** 8080 CPU HALTED ***");
                            *control_flow = ControlFlow::Exit;
                            break;
                        }
                    }
                }
            }
        });
    }
}
