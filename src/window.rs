//! SDL2 presentation surface and keyboard state.

use std::time::Duration;

use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::rect::Rect;

use crate::render::framebuffer::pixels_as_bytes;
use crate::render::FrameSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    None,
    Quit,
}

/// Movement keys currently held down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputState {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl InputState {
    fn set(&mut self, keycode: Keycode, pressed: bool) {
        match keycode {
            Keycode::W => self.forward = pressed,
            Keycode::S => self.back = pressed,
            Keycode::A => self.left = pressed,
            Keycode::D => self.right = pressed,
            Keycode::Space => self.up = pressed,
            Keycode::LShift | Keycode::RShift => self.down = pressed,
            _ => {}
        }
    }

    /// Each axis is -1, 0 or 1: x right, y up, z forward.
    pub fn direction(&self) -> (f32, f32, f32) {
        let axis = |positive: bool, negative: bool| positive as i8 as f32 - negative as i8 as f32;
        (
            axis(self.right, self.left),
            axis(self.up, self.down),
            axis(self.forward, self.back),
        )
    }
}

/// Number of frames averaged by [`FrameTimer`].
pub const DELTA_SAMPLES: usize = 5;

/// Rolling average of the last [`DELTA_SAMPLES`] frame times.
#[derive(Debug, Clone, Default)]
pub struct FrameTimer {
    deltas: [Duration; DELTA_SAMPLES],
    next: usize,
    recorded: usize,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one frame's time, replacing the oldest sample once full.
    pub fn record(&mut self, delta: Duration) {
        self.deltas[self.next] = delta;
        self.next = (self.next + 1) % DELTA_SAMPLES;
        self.recorded = (self.recorded + 1).min(DELTA_SAMPLES);
    }

    /// Mean of the recorded samples, zero before the first frame.
    pub fn average(&self) -> Duration {
        if self.recorded == 0 {
            return Duration::ZERO;
        }
        self.deltas[..self.recorded].iter().sum::<Duration>() / self.recorded as u32
    }

    /// Frames per second implied by the average frame time.
    pub fn fps(&self) -> f32 {
        let average = self.average().as_secs_f32();
        if average > 0.0 {
            1.0 / average
        } else {
            0.0
        }
    }
}

pub struct Window {
    canvas: sdl2::render::Canvas<sdl2::video::Window>,
    // Declared before the creator so it is dropped first.
    texture: sdl2::render::Texture<'static>,
    _texture_creator: Box<sdl2::render::TextureCreator<sdl2::video::WindowContext>>,
    event_pump: sdl2::EventPump,
    input: InputState,
    width: u32,
    height: u32,
}

impl Window {
    pub fn new(title: &str, width: u32, height: u32) -> Result<Self, String> {
        let sdl_context = sdl2::init()?;
        let video_subsystem = sdl_context.video()?;

        let window = video_subsystem
            .window(title, width, height)
            .position_centered()
            .build()
            .map_err(|e| e.to_string())?;

        let canvas = window
            .into_canvas()
            .present_vsync()
            .build()
            .map_err(|e| e.to_string())?;
        let texture_creator = Box::new(canvas.texture_creator());
        let event_pump = sdl_context.event_pump()?;

        // SAFETY: texture_creator is heap-allocated and owned by Window, and
        // the texture field is dropped before it.
        let texture_creator_ref: &'static sdl2::render::TextureCreator<sdl2::video::WindowContext> =
            unsafe { &*(texture_creator.as_ref() as *const _) };
        let texture = texture_creator_ref
            .create_texture_streaming(PixelFormatEnum::ARGB8888, width, height)
            .map_err(|e| e.to_string())?;

        log::info!("opened {}x{} window \"{}\"", width, height, title);

        Ok(Self {
            canvas,
            texture,
            _texture_creator: texture_creator,
            event_pump,
            input: InputState::default(),
            width,
            height,
        })
    }

    /// Drains pending events, updating the held-key state.
    pub fn poll_events(&mut self) -> WindowEvent {
        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => return WindowEvent::Quit,
                Event::KeyDown {
                    keycode: Some(keycode),
                    ..
                } => self.input.set(keycode, true),
                Event::KeyUp {
                    keycode: Some(keycode),
                    ..
                } => self.input.set(keycode, false),
                _ => {}
            }
        }
        WindowEvent::None
    }

    pub fn set_title(&mut self, title: &str) -> Result<(), String> {
        self.canvas
            .window_mut()
            .set_title(title)
            .map_err(|e| e.to_string())
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl FrameSink for Window {
    type Error = String;

    fn present(&mut self, pixels: &[u32], width: u32, height: u32) -> Result<(), String> {
        if width != self.width || height != self.height {
            return Err(format!(
                "frame is {}x{}, window is {}x{}",
                width, height, self.width, self.height
            ));
        }

        self.texture
            .update(None, pixels_as_bytes(pixels), (width * 4) as usize)
            .map_err(|e| e.to_string())?;

        self.canvas.clear();
        self.canvas
            .copy(&self.texture, None, Some(Rect::new(0, 0, width, height)))?;
        self.canvas.present();
        Ok(())
    }
}
