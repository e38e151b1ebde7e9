use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use nv_engine::{ContinueAction, EngineState};

use super::app::PlayApp;

pub fn draw(frame: &mut Frame, app: &PlayApp) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Chapter bar
            Constraint::Min(5),    // Text
            Constraint::Length(choice_rows(app)),
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0]);
    draw_text(frame, app, chunks[1]);
    draw_choices(frame, app, chunks[2]);
    draw_status_bar(frame, app, chunks[3]);

    if app.show_help {
        draw_help_popup(frame);
    }

    // A flash effect inverts everything drawn this frame.
    if app.flash_ms > 0 {
        let area = frame.area();
        frame
            .buffer_mut()
            .set_style(area, Style::default().add_modifier(Modifier::REVERSED));
    }
}

fn choice_rows(app: &PlayApp) -> u16 {
    let count = app.view.as_ref().map_or(0, |v| v.choices.len());
    u16::try_from(count).unwrap_or(u16::MAX).saturating_add(2)
}

fn draw_header(frame: &mut Frame, app: &PlayApp, area: Rect) {
    let step = app.view.as_ref().map_or(0, |v| v.step_count);
    let scene = app
        .view
        .as_ref()
        .map(|v| format!("{} / {}", v.background_tag, v.character_tag))
        .unwrap_or_default();

    let line = Line::from(vec![
        Span::styled(app.chapter().to_string(), Style::default().bold()),
        Span::raw(format!("  |  step {step}  ")),
        Span::styled(scene, Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_text(frame: &mut Frame, app: &PlayApp, area: Rect) {
    let title = app
        .view
        .as_ref()
        .and_then(|v| v.speaker_name.as_deref())
        .map(|name| format!(" {name} "))
        .unwrap_or_default();

    let mut lines: Vec<Line> = app.visible_text().lines().map(Line::from).collect();
    if app.view.as_ref().is_some_and(|v| v.is_ending) && app.state() == EngineState::Terminal {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "The End",
            Style::default().fg(Color::Magenta).italic(),
        )));
    }

    let text = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue)),
        );
    frame.render_widget(text, area);
}

fn draw_choices(frame: &mut Frame, app: &PlayApp, area: Rect) {
    let Some(view) = &app.view else {
        return;
    };

    let mut lines: Vec<Line> = Vec::new();
    if app.settled() {
        for (i, choice) in view.choices.iter().enumerate() {
            lines.push(Line::from(vec![
                Span::styled(format!("[{}] ", i + 1), Style::default().fg(Color::Yellow)),
                Span::raw(choice.label.clone()),
            ]));
        }
        if let Some(action) = view.continue_action {
            let color = match action {
                ContinueAction::Continue => Color::Green,
                ContinueAction::Restart => Color::Magenta,
            };
            lines.push(Line::from(Span::styled(
                format!("[Enter] {}", action.label()),
                Style::default().fg(color),
            )));
        }
    }

    let block = Block::default().borders(Borders::TOP);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_status_bar(frame: &mut Frame, app: &PlayApp, area: Rect) {
    let status = match &app.notice {
        Some(notice) => notice.clone(),
        None => match app.state() {
            EngineState::Revealing => "Enter:skip r:restart ?:help q:quit".to_string(),
            _ => "1-9:choose Enter:continue r:restart ?:help q:quit".to_string(),
        },
    };

    let bar = Paragraph::new(status).style(Style::default().fg(Color::Black).bg(Color::White));
    frame.render_widget(bar, area);
}

fn draw_help_popup(frame: &mut Frame) {
    let area = centered_rect(50, 50, frame.area());

    let help_text = vec![
        Line::from("Keyboard Shortcuts").style(Style::default().bold()),
        Line::from(""),
        Line::from("  1-9           Pick a choice"),
        Line::from("  Enter / Space Skip text, or continue"),
        Line::from("  r             Restart the chapter"),
        Line::from("  ?             Toggle this help"),
        Line::from("  q / Esc       Quit"),
        Line::from("  Ctrl+C        Force quit"),
    ];

    let popup = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .style(Style::default().fg(Color::White));

    frame.render_widget(Clear, area);
    frame.render_widget(popup, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use nv_engine::{EngineConfig, NarrativeEngine};
    use ratatui::backend::TestBackend;

    use super::*;

    fn rendered(app: &PlayApp) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn settled_node_shows_speaker_and_choices() {
        let engine = NarrativeEngine::new(
            nv_core::demo::script().unwrap(),
            EngineConfig::default().with_typewriter(false),
        );
        let mut app = PlayApp::new(engine);
        app.start().unwrap();

        let screen = rendered(&app);
        assert!(screen.contains("Chapter 1 - The Library Diary"));
        assert!(screen.contains(" You "));
        assert!(screen.contains("[1] Read the diary closely"));
        assert!(screen.contains("[2] Put it back and leave the library"));
    }

    #[test]
    fn choices_hidden_while_revealing() {
        let engine = NarrativeEngine::new(nv_core::demo::script().unwrap(), EngineConfig::default());
        let mut app = PlayApp::new(engine);
        app.start().unwrap();

        let screen = rendered(&app);
        assert!(!screen.contains("[1]"));
        assert!(screen.contains("Enter:skip"));
    }
}
