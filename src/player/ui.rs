use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph},
};

use super::app::App;
use super::timer_dialog::{TimerDialog, TimerField};
use crate::session::{AudioBackend, SessionState, format_remaining};

pub fn draw<B: AudioBackend>(f: &mut Frame, app: &App<B>) {
    let size = f.area();

    draw_main_ui(f, app);

    if let Some(ref dialog) = app.timer_dialog {
        draw_timer_dialog(f, size, dialog);
    }
}

fn draw_main_ui<B: AudioBackend>(f: &mut Frame, app: &App<B>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // App title
            Constraint::Min(3),    // Sound title + state
            Constraint::Length(3), // Volume
            Constraint::Length(3), // Sleep timer
            Constraint::Length(1), // Status line
            Constraint::Length(2), // Controls
        ])
        .split(f.area());

    let title = Paragraph::new("🌙 SoundNest")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    draw_now_playing(f, chunks[1], app);
    draw_volume(f, chunks[2], app);
    draw_timer(f, chunks[3], app);

    if let Some(ref message) = app.status_message {
        let status = Paragraph::new(message.as_str())
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center);
        f.render_widget(status, chunks[4]);
    }

    draw_controls(f, chunks[5], app);
}

fn draw_now_playing<B: AudioBackend>(f: &mut Frame, area: Rect, app: &App<B>) {
    let state = app.session.state();
    let (icon, color) = match state {
        SessionState::Playing => ("▶", Color::Green),
        SessionState::Loading => ("…", Color::Yellow),
        SessionState::Paused => ("⏸", Color::White),
        SessionState::Stopped => ("■", Color::Red),
        SessionState::Idle => ("○", Color::DarkGray),
    };

    let mut lines = vec![Line::from(Span::styled(
        app.title.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    if let Some(entry) = app.session.active_entry() {
        lines.push(Line::from(Span::styled(
            format!("{} {}", entry.category.icon(), entry.category),
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines.push(Line::from(vec![
        Span::styled(icon, Style::default().fg(color)),
        Span::raw(format!(" {state}")),
    ]));

    let widget = Paragraph::new(lines).alignment(Alignment::Center);
    f.render_widget(widget, area);
}

fn draw_volume<B: AudioBackend>(f: &mut Frame, area: Rect, app: &App<B>) {
    let volume = app.session.volume();
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" Volume "))
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::Black))
        .ratio(f64::from(volume).clamp(0.0, 1.0))
        .label(format!("{:.0}%", volume * 100.0));
    f.render_widget(gauge, area);
}

fn draw_timer<B: AudioBackend>(f: &mut Frame, area: Rect, app: &App<B>) {
    let text = if app.session.timer_armed() {
        Line::from(vec![
            Span::raw("Stops in "),
            Span::styled(
                format_remaining(app.session.timer_remaining()),
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ),
        ])
    } else {
        Line::from(Span::styled("Off", Style::default().fg(Color::DarkGray)))
    };

    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" Sleep timer "));
    f.render_widget(widget, area);
}

fn draw_controls<B: AudioBackend>(f: &mut Frame, area: Rect, app: &App<B>) {
    let playing = app.session.is_playing();
    let controls = vec![
        if playing {
            Span::styled("[space]", Style::default().fg(Color::Yellow))
        } else {
            Span::styled("[space]", Style::default().fg(Color::Green))
        },
        Span::raw(if playing { " pause  " } else { " play  " }),
        Span::styled("[←→]", Style::default().fg(Color::Magenta)),
        Span::raw(" volume  "),
        Span::styled("[t]", Style::default().fg(Color::Cyan)),
        Span::raw(" timer  "),
        Span::styled("[c]", Style::default().fg(Color::Yellow)),
        Span::raw(" cancel timer  "),
        Span::styled("[q]", Style::default().fg(Color::Red)),
        Span::raw(" back"),
    ];

    let border_widget = Block::default().borders(Borders::TOP);
    f.render_widget(border_widget, area);

    let inner = Rect {
        y: area.y + 1,
        height: area.height.saturating_sub(1),
        ..area
    };
    let widget = Paragraph::new(Line::from(controls)).alignment(Alignment::Center);
    f.render_widget(widget, inner);
}

fn draw_timer_dialog(f: &mut Frame, area: Rect, dialog: &TimerDialog) {
    // Create a centered modal
    let modal_width = 36.min(area.width.saturating_sub(4));
    let modal_height = 8.min(area.height.saturating_sub(4));

    let modal_area = Rect {
        x: (area.width - modal_width) / 2,
        y: (area.height - modal_height) / 2,
        width: modal_width,
        height: modal_height,
    };

    f.render_widget(Clear, modal_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(" Sleep Timer ")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(block, modal_area);

    let inner_area = modal_area.inner(Margin {
        horizontal: 1,
        vertical: 1,
    });

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Labels
            Constraint::Length(2), // Fields
            Constraint::Min(1),    // Controls
        ])
        .split(inner_area);

    let labels = Paragraph::new("hours   min   sec")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(labels, chunks[0]);

    let field = |value: u64, which: TimerField| {
        let style = if dialog.focus == which {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        Span::styled(format!(" {value:02} "), style)
    };
    let fields = Line::from(vec![
        field(dialog.duration.hours, TimerField::Hours),
        Span::raw("  :  "),
        field(dialog.duration.minutes, TimerField::Minutes),
        Span::raw("  :  "),
        field(dialog.duration.seconds, TimerField::Seconds),
    ]);
    f.render_widget(Paragraph::new(fields).alignment(Alignment::Center), chunks[1]);

    let controls = Line::from(vec![
        Span::styled("[↑↓]", Style::default().fg(Color::Magenta)),
        Span::raw(" set  "),
        Span::styled("[⏎]", Style::default().fg(Color::Green)),
        Span::raw(" start  "),
        Span::styled("[esc]", Style::default().fg(Color::Red)),
        Span::raw(" close"),
    ]);
    f.render_widget(
        Paragraph::new(controls).alignment(Alignment::Center),
        chunks[2],
    );
}
