use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, AppState};
use crate::models::{Subject, ELIGIBILITY_THRESHOLD, MAX_SUBJECTS};

use super::styles;

/// Width of the attendance bar in cells
const BAR_WIDTH: usize = 40;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(10),   // Subject list
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_subjects(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);

    // Render overlays
    match app.state {
        AppState::AddingSubject => render_add_overlay(frame, app),
        AppState::ConfirmingDelete => render_delete_overlay(frame, app),
        AppState::ShowingHelp => render_help_overlay(frame),
        AppState::Normal => {}
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  Rollcall";
    let stats = format!("Avg {}%  |  Subjects {}", app.average, app.subject_count());
    let help_hint = "[?] Help  ";

    let padding = (area.width as usize)
        .saturating_sub(title.len() + stats.len() + help_hint.len() + 3);
    let left_pad = padding / 2;
    let right_pad = padding - left_pad;

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(left_pad)),
        Span::styled(stats, styles::highlight_style()),
        Span::raw(" ".repeat(right_pad)),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_subjects(frame: &mut Frame, app: &App, area: Rect) {
    if app.tracker.is_empty() {
        render_empty_state(frame, area);
        return;
    }

    let mut lines: Vec<Line> = vec![Line::from("")];
    for (index, subject) in app.tracker.subjects().iter().enumerate() {
        let selected = index == app.selected;
        lines.extend(subject_card(subject, selected));
        lines.push(Line::from(""));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::NONE)
            .border_style(styles::muted_style()),
    );
    frame.render_widget(paragraph, area);
}

/// Three lines per subject: name row, attendance bar, counters row.
fn subject_card(subject: &Subject, selected: bool) -> Vec<Line<'static>> {
    let percentage = subject.percentage();
    let eligible = subject.is_eligible();

    let marker = if selected { "▸ " } else { "  " };
    let name_style = if selected {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let status = if eligible {
        Span::styled("✓ ELIGIBLE", styles::eligible_style())
    } else {
        Span::styled(
            format!("⚠ Need {} more", subject.classes_needed()),
            styles::not_eligible_style(),
        )
    };

    let name_line = Line::from(vec![
        Span::styled(format!("{}{:<30}", marker, subject.name), name_style),
        Span::raw("  "),
        status,
    ]);

    // Bar with a marker at the eligibility threshold
    let filled = (percentage.min(100) as usize * BAR_WIDTH) / 100;
    let threshold_cell = (ELIGIBILITY_THRESHOLD as usize * BAR_WIDTH) / 100;
    let mut bar = String::with_capacity(BAR_WIDTH * 3);
    for cell in 0..BAR_WIDTH {
        if cell == threshold_cell {
            bar.push('┊');
        } else if cell < filled {
            bar.push('█');
        } else {
            bar.push('░');
        }
    }
    let bar_style = if eligible {
        styles::eligible_style()
    } else {
        styles::not_eligible_style()
    };
    let bar_line = Line::from(vec![
        Span::raw("    "),
        Span::styled(bar, bar_style),
        Span::styled(format!(" {:>3}%", percentage), styles::highlight_style()),
    ]);

    let info_line = Line::from(vec![
        Span::raw("    "),
        Span::styled(
            format!("Attended {}/{} classes", subject.attended, subject.total),
            styles::muted_style(),
        ),
    ]);

    vec![name_line, bar_line, info_line]
}

fn render_empty_state(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled("   No subjects yet", styles::highlight_style())),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "   Add up to {} subjects to track your attendance and stay",
                MAX_SUBJECTS
            ),
            styles::muted_style(),
        )),
        Line::from(Span::styled(
            "   eligible for exams. Press [a] to add your first subject.",
            styles::muted_style(),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = "[a]dd | [p]resent | [x] absent | [d]elete | [q]uit";

    let left_text = if let Some(ref msg) = app.status_message {
        format!(" {} ", msg)
    } else {
        String::from(" ")
    };
    let left_style = if app.status_message.is_some() {
        styles::error_style()
    } else {
        styles::muted_style()
    };
    let right_text = format!(" {} ", shortcuts);

    let padding = (area.width as usize)
        .saturating_sub(left_text.len())
        .saturating_sub(right_text.len());
    let status_line = Line::from(vec![
        Span::styled(left_text, left_style),
        Span::raw(" ".repeat(padding)),
        Span::styled(right_text, styles::muted_style()),
    ]);

    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn render_add_overlay(frame: &mut Frame, app: &App) {
    let height = if app.status_message.is_some() { 9 } else { 7 };
    let area = centered_rect_fixed(44, height, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled("  Add a subject", styles::title_style())),
        Line::from(""),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("Name: [", styles::muted_style()),
            Span::styled(
                format!("{:<30}", format!("{}▌", app.name_input)),
                styles::selected_style(),
            ),
            Span::styled("]", styles::muted_style()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Enter", styles::help_key_style()),
            Span::styled(" save   ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" cancel", styles::muted_style()),
        ]),
    ];

    if let Some(ref msg) = app.status_message {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {}", msg),
            styles::error_style(),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_delete_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(46, 8, frame.area());
    frame.render_widget(Clear, area);

    let name = app
        .tracker
        .get(app.selected)
        .map(|s| s.name.as_str())
        .unwrap_or("this subject");

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  Delete \"{}\"?", name),
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "  All attendance for it will be lost.",
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to delete, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(50, 17, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled("  Rollcall", styles::title_style())),
        Line::from(Span::styled(
            format!("  version {}", version),
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        Line::from(vec![
            Span::styled("  ↑/↓ or j/k ", styles::help_key_style()),
            Span::styled("Select subject", styles::help_desc_style()),
        ]),
        Line::from(""),
        Line::from(Span::styled(" Actions", styles::highlight_style())),
        Line::from(vec![
            Span::styled("  a          ", styles::help_key_style()),
            Span::styled("Add a subject (max 7)", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  p          ", styles::help_key_style()),
            Span::styled("Mark present for today's class", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  x          ", styles::help_key_style()),
            Span::styled("Mark absent for today's class", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  d          ", styles::help_key_style()),
            Span::styled("Delete the selected subject", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  q          ", styles::help_key_style()),
            Span::styled("Quit", styles::help_desc_style()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());
    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}
