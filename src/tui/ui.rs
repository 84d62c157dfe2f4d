//! UI rendering for the monitor.

use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use super::app::{Mode, MonitorApp};
use crate::cpu::machine::MEMORY_SIZE;
use crate::render::{format_nibble, memory_dump, mnemonic};

/// Main draw function.
pub fn draw(frame: &mut Frame, app: &MonitorApp) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(frame.area());

    let left_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),
            Constraint::Length(6),
            Constraint::Length(4),
        ])
        .split(chunks[0]);

    draw_program(frame, left_chunks[0], app);
    draw_registers(frame, left_chunks[1], app);
    draw_status(frame, left_chunks[2], app);

    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(6)])
        .split(chunks[1]);

    if app.show_memory {
        draw_memory(frame, right_chunks[0], app);
    }
    if app.show_help {
        draw_help(frame, right_chunks[1]);
    }

    if app.input_buffer.is_some() {
        draw_input_prompt(frame, app);
    }
}

/// Program listing with the current PC highlighted.
fn draw_program(frame: &mut Frame, area: Rect, app: &MonitorApp) {
    let items: Vec<ListItem> = (0..MEMORY_SIZE)
        .map(|addr| {
            let byte = app.emu.machine.read(addr);
            let is_current = addr == app.emu.machine.pc as usize;
            let prefix = if is_current { "▶" } else { " " };
            let text = format!(
                "{} {:X}: {:02X}  {}",
                prefix,
                addr,
                byte,
                mnemonic(byte, app.display)
            );

            let style = if is_current {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else if byte != 0 {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::DarkGray)
            };

            ListItem::new(text).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(" Program ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    frame.render_widget(list, area);
}

/// Register and port state.
fn draw_registers(frame: &mut Frame, area: Rect, app: &MonitorApp) {
    let m = &app.emu.machine;
    let mode_label = match app.mode {
        Mode::Manual => Span::styled("MANUAL", Style::default().fg(Color::Green)),
        Mode::Auto => Span::styled("AUTO", Style::default().fg(Color::Red)),
    };

    let content = vec![
        Line::from(vec![
            Span::raw("A: "),
            Span::styled(format_nibble(m.a, app.display), Style::default().fg(Color::White)),
            Span::raw("   B: "),
            Span::styled(format_nibble(m.b, app.display), Style::default().fg(Color::White)),
            Span::raw("   C: "),
            Span::styled(
                format!("{}", m.carry),
                if m.carry == 1 {
                    Style::default().fg(Color::Red)
                } else {
                    Style::default().fg(Color::Gray)
                },
            ),
            Span::raw("   PC: "),
            Span::styled(format!("{:X}", m.pc), Style::default().fg(Color::Yellow)),
        ]),
        Line::from(vec![
            Span::raw("IN: "),
            Span::styled(format_nibble(m.in_line, app.display), Style::default().fg(Color::Cyan)),
            Span::raw("   OUT: "),
            Span::styled(format_nibble(m.out_line, app.display), Style::default().fg(Color::Magenta)),
        ]),
        Line::from(vec![
            Span::raw("Cycles: "),
            Span::styled(format!("{}", app.emu.cycles), Style::default().fg(Color::Cyan)),
            Span::raw("   Mode: "),
            mode_label,
        ]),
    ];

    let paragraph = Paragraph::new(content).block(
        Block::default()
            .title(" Registers ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green)),
    );

    frame.render_widget(paragraph, area);
}

/// Status bar.
fn draw_status(frame: &mut Frame, area: Rect, app: &MonitorApp) {
    let status = Paragraph::new(app.status.clone())
        .style(Style::default().fg(Color::White))
        .block(Block::default().title(" Status ").borders(Borders::ALL));

    frame.render_widget(status, area);
}

/// Memory dump panel (toggled with 's').
fn draw_memory(frame: &mut Frame, area: Rect, app: &MonitorApp) {
    let dump = memory_dump(&app.emu.machine);
    let paragraph = Paragraph::new(dump).block(
        Block::default()
            .title(" Memory ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta)),
    );

    frame.render_widget(paragraph, area);
}

/// Help panel (toggled with 'h').
fn draw_help(frame: &mut Frame, area: Rect) {
    let help = Paragraph::new(vec![
        Line::from("Enter: step (manual)  a: auto  m: manual"),
        Line::from("s: memory  i: set input  b: binary/decimal"),
        Line::from("r: reset  h: help  q: quit"),
    ])
    .style(Style::default().fg(Color::DarkGray))
    .block(Block::default().title(" Help ").borders(Borders::ALL));

    frame.render_widget(help, area);
}

/// Input prompt overlay for the 'i' command.
fn draw_input_prompt(frame: &mut Frame, app: &MonitorApp) {
    let typed = app.input_buffer.as_deref().unwrap_or("");
    let area = centered_line(frame.area());
    let prompt = Paragraph::new(format!("New input value (0-15 or 4 binary digits): {}", typed))
        .style(Style::default().fg(Color::Yellow))
        .block(
            Block::default()
                .title(" Set Input ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        );

    frame.render_widget(prompt, area);
}

/// A single centered line across the middle of the screen.
fn centered_line(area: Rect) -> Rect {
    let height = 3.min(area.height);
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect {
        x: area.x + 2,
        y,
        width: area.width.saturating_sub(4),
        height,
    }
}
