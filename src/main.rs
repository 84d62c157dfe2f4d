//! TD4 Emulator - CLI Entry Point
//!
//! Commands:
//! - `td4-emu run <program>` - Run a program image for a fixed cycle count
//! - `td4-emu debug <program>` - Interactive monitor (step/auto modes)
//! - `td4-emu dump <program>` - Disassemble a program image

use clap::{Parser, Subcommand};
use td4::render::DisplayMode;

#[derive(Parser)]
#[command(name = "td4-emu")]
#[command(version = "0.1.0")]
#[command(about = "An emulator of the TD4, a 4-bit educational CPU")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a program for a fixed number of cycles, tracing each one
    Run {
        /// Path to the binary program image (up to 16 bytes)
        program: String,
        /// Number of cycles to run (the TD4 has no halt instruction)
        #[arg(short, long, default_value = "32")]
        max_cycles: u64,
        /// Initial value of the input port (0-15)
        #[arg(short, long, default_value = "0")]
        input: u8,
        /// Show 4-bit values in binary instead of decimal
        #[arg(short, long)]
        binary: bool,
    },
    /// Interactive monitor with manual and automatic stepping
    #[cfg(feature = "tui")]
    Debug {
        /// Path to the binary program image
        program: String,
        /// Automatic-mode delay between cycles, in milliseconds
        #[arg(short, long, default_value = "1000")]
        delay: u64,
        /// Show 4-bit values in binary instead of decimal
        #[arg(short, long)]
        binary: bool,
    },
    /// Disassemble a program image
    Dump {
        /// Path to the binary program image
        program: String,
        /// Show immediates in binary instead of decimal
        #[arg(short, long)]
        binary: bool,
    },
}

fn display_mode(binary: bool) -> DisplayMode {
    if binary {
        DisplayMode::Binary
    } else {
        DisplayMode::Decimal
    }
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Run { program, max_cycles, input, binary }) => {
            run_program(&program, max_cycles, input, display_mode(binary));
        }
        #[cfg(feature = "tui")]
        Some(Commands::Debug { program, delay, binary }) => {
            debug_program(&program, delay, display_mode(binary));
        }
        Some(Commands::Dump { program, binary }) => {
            dump_program(&program, display_mode(binary));
        }
        None => {
            println!("TD4 Emulator v0.1.0");
            println!("16 bytes of memory, two 4-bit registers, one carry flag");
            println!();
            println!("Use --help for available commands");
        }
    }
}

fn load_image_or_exit(path: &str) -> [u8; td4::MEMORY_SIZE] {
    match td4::load_rom(path) {
        Ok(image) => image,
        Err(e) => {
            eprintln!("Failed to load program: {}", e);
            std::process::exit(1);
        }
    }
}

fn run_program(path: &str, max_cycles: u64, input: u8, mode: DisplayMode) {
    use td4::{status_line, Emulator};

    let image = load_image_or_exit(path);
    let mut emu = Emulator::with_image(&image);
    emu.machine.set_input(input);

    println!("Running: {} ({} cycles)", path, max_cycles);
    println!();

    for _ in 0..max_cycles {
        println!("{}", status_line(&emu, mode));
        emu.step();
    }

    println!();
    println!("Final state:");
    println!("{}", status_line(&emu, mode));
    println!("{}", td4::memory_dump(&emu.machine));
}

#[cfg(feature = "tui")]
fn debug_program(path: &str, delay_ms: u64, mode: DisplayMode) {
    use std::time::Duration;
    use td4::run_monitor;

    let image = load_image_or_exit(path);

    if let Err(e) = run_monitor(image, Duration::from_millis(delay_ms), mode) {
        eprintln!("Monitor error: {}", e);
        std::process::exit(1);
    }
}

fn dump_program(path: &str, mode: DisplayMode) {
    let image = load_image_or_exit(path);
    print!("{}", td4::render::listing(&image, mode));
}
