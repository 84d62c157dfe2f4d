//! Monitor application state and logic.
//!
//! The monitor is a small state machine over two modes. In manual mode it
//! blocks on the next key and steps on Enter; in automatic mode every loop
//! iteration executes one instruction, then the inter-cycle delay doubles
//! as the window for an interrupting key. A key is only ever needed to
//! interrupt automatic mode, never to advance it.

use crate::cpu::execute::Emulator;
use crate::cpu::machine::MEMORY_SIZE;
use crate::render::{mnemonic, parse_input_value, DisplayMode};
use std::time::Duration;

/// Execution mode of the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// One instruction per Enter press.
    Manual,
    /// One instruction per delay tick, until interrupted.
    Auto,
}

/// Monitor application state.
pub struct MonitorApp {
    /// The CPU being driven.
    pub emu: Emulator,
    /// Original program image, kept for reset.
    pub image: [u8; MEMORY_SIZE],
    /// Current execution mode. Starts manual.
    pub mode: Mode,
    /// Inter-cycle delay in automatic mode.
    pub delay: Duration,
    /// Presentation of 4-bit values.
    pub display: DisplayMode,
    /// Memory-dump panel visibility.
    pub show_memory: bool,
    /// Help panel visibility.
    pub show_help: bool,
    /// Pending input-port value being typed, when the prompt is open.
    pub input_buffer: Option<String>,
    /// Should we quit?
    pub should_quit: bool,
    /// Status message to display.
    pub status: String,
}

impl MonitorApp {
    /// Create a monitor with a loaded program.
    pub fn new(image: [u8; MEMORY_SIZE], delay: Duration, display: DisplayMode) -> Self {
        Self {
            emu: Emulator::with_image(&image),
            image,
            mode: Mode::Manual,
            delay,
            display,
            show_memory: false,
            show_help: true,
            input_buffer: None,
            should_quit: false,
            status: "Ready. Enter steps, 'a' runs, 'h' toggles help, 'q' quits.".into(),
        }
    }

    /// Execute one instruction and report it in the status line.
    pub fn step(&mut self) {
        let pc = self.emu.machine.pc;
        let byte = self.emu.machine.fetch();
        self.emu.step();
        self.status = format!("PC={:X}: {}", pc, mnemonic(byte, self.display));
    }

    /// One automatic-mode iteration: execute one instruction, unless the
    /// input prompt is open - the machine holds still under the
    /// operator's typing.
    pub fn tick(&mut self) {
        if self.mode == Mode::Auto && self.input_buffer.is_none() {
            self.step();
        }
    }

    /// Reset the CPU, reload the original image, zero the cycle counter.
    pub fn reset(&mut self) {
        self.emu.reset();
        self.emu.machine.load_image(&self.image);
        self.mode = Mode::Manual;
        self.status = "Processor reset, program reloaded.".into();
    }

    /// Try to latch a typed value onto the input port.
    fn apply_input(&mut self, text: &str) {
        match parse_input_value(text) {
            Some(value) => {
                self.emu.machine.set_input(value);
                self.status = format!("Input port set to {} ({:04b}).", value, value);
            }
            None => {
                self.status = format!(
                    "Invalid input value '{}' (want 4 binary digits or decimal 0-15).",
                    text
                );
            }
        }
    }

    /// Apply one keyed command. The single entry point for all input, so
    /// the whole command surface is testable without a terminal.
    pub fn handle_key(&mut self, key: Key) {
        // The input prompt captures every key until Enter or Esc.
        if self.input_buffer.is_some() {
            match key {
                Key::Enter => {
                    let text = self.input_buffer.take().unwrap_or_default();
                    self.apply_input(&text);
                }
                Key::Esc => {
                    self.input_buffer = None;
                    self.status = "Input unchanged.".into();
                }
                Key::Backspace => {
                    if let Some(buffer) = self.input_buffer.as_mut() {
                        buffer.pop();
                    }
                }
                Key::Char(c) => {
                    if let Some(buffer) = self.input_buffer.as_mut() {
                        buffer.push(c);
                    }
                }
            }
            return;
        }

        match key {
            Key::Enter => {
                if self.mode == Mode::Manual {
                    self.step();
                }
            }
            Key::Char(c) => match c.to_ascii_lowercase() {
                'a' => {
                    self.mode = Mode::Auto;
                    self.status = format!("Automatic mode, {} ms per cycle.", self.delay.as_millis());
                }
                'm' => {
                    self.mode = Mode::Manual;
                    self.status = "Manual mode. Enter steps.".into();
                }
                's' => {
                    self.show_memory = !self.show_memory;
                }
                'i' => {
                    self.input_buffer = Some(String::new());
                    self.status = format!(
                        "Current input port: {}. Type a new value, Enter to apply, Esc to cancel.",
                        self.emu.machine.in_line
                    );
                }
                'r' => self.reset(),
                'h' => {
                    self.show_help = !self.show_help;
                }
                'b' => {
                    self.display = self.display.toggle();
                }
                'q' => self.should_quit = true,
                _ => {} // unrecognized keys are ignored
            },
            Key::Esc | Key::Backspace => {}
        }
    }
}

/// The keys the monitor reacts to, decoupled from the terminal backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Esc,
    Backspace,
    Char(char),
}

/// Run the interactive monitor over a loaded program image.
pub fn run_monitor(
    image: [u8; MEMORY_SIZE],
    delay: Duration,
    display: DisplayMode,
) -> std::io::Result<()> {
    use crossterm::{
        event::{self, Event, KeyCode, KeyEventKind},
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
        ExecutableCommand,
    };
    use ratatui::prelude::*;
    use std::io::stdout;

    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut app = MonitorApp::new(image, delay, display);

    let translate = |code: KeyCode| -> Option<Key> {
        match code {
            KeyCode::Enter => Some(Key::Enter),
            KeyCode::Esc => Some(Key::Esc),
            KeyCode::Backspace => Some(Key::Backspace),
            KeyCode::Char(c) => Some(Key::Char(c)),
            _ => None,
        }
    };

    loop {
        terminal.draw(|frame| {
            super::ui::draw(frame, &app);
        })?;

        match app.mode {
            Mode::Manual => {
                // Block until the operator presses something.
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        if let Some(k) = translate(key.code) {
                            app.handle_key(k);
                        }
                    }
                }
            }
            Mode::Auto => {
                app.tick();
                terminal.draw(|frame| {
                    super::ui::draw(frame, &app);
                })?;
                // The delay is also the window for an interrupting key.
                if event::poll(app.delay)? {
                    if let Event::Key(key) = event::read()? {
                        if key.kind == KeyEventKind::Press {
                            if let Some(k) = translate(key.code) {
                                app.handle_key(k);
                            }
                        }
                    }
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    Ok(())
}
