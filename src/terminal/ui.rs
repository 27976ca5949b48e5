use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Paragraph, Wrap},
};

use crate::review::reply::ReplyState;
use crate::review::training::TrainingSession;
use crate::session::{LoginForm, LoginStep};
use crate::terminal::state::AppState;

const BANNER: &str = r"
██████╗ ██╗      █████╗ ██╗███╗   ██╗
██╔══██╗██║     ██╔══██╗██║████╗  ██║
██████╔╝██║     ███████║██║██╔██╗ ██║
██╔═══╝ ██║     ██╔══██║██║██║╚██╗██║
██║     ███████╗██║  ██║██║██║ ╚████║
╚═╝     ╚══════╝╚═╝  ╚═╝╚═╝╚═╝  ╚═══╝
";

const ACCENT: Color = Color::Green;

pub fn render(f: &mut Frame, state: &AppState) {
    if let Some(form) = state.session.form() {
        render_login(f, form);
        return;
    }
    match &state.training {
        Some(training) => render_training(f, training),
        None => render_mail(f, state),
    }
}

fn render_login(f: &mut Frame, form: &LoginForm) {
    let mut lines: Vec<Line> = BANNER
        .lines()
        .map(|l| Line::styled(l.to_string(), Style::default().fg(ACCENT)))
        .collect();
    lines.push(Line::styled(
        format!("v{}", env!("CARGO_PKG_VERSION")),
        Style::default().fg(Color::DarkGray),
    ));
    lines.push(Line::raw("Do less email. Plain and simple."));
    lines.push(Line::raw(""));

    match form.step {
        LoginStep::Email => {
            lines.push(Line::raw("Enter your email address to login:"));
            lines.push(input_line(&form.email));
        }
        LoginStep::Password => {
            lines.push(Line::raw(format!("Email: {}", form.email)));
            lines.push(Line::raw("Password:"));
            lines.push(input_line(&"*".repeat(form.password.chars().count())));
        }
    }

    if let Some(err) = &form.error {
        lines.push(Line::styled(err.to_string(), Style::default().fg(Color::Red)));
    }
    lines.push(Line::raw(""));
    let esc = match form.step {
        LoginStep::Email => "Clear",
        LoginStep::Password => "Back",
    };
    lines.push(Line::styled(
        format!("ESC: {esc}"),
        Style::default().fg(Color::DarkGray),
    ));

    let [area] = Layout::vertical([Constraint::Fill(1)])
        .margin(1)
        .areas(f.area());
    f.render_widget(Paragraph::new(Text::from(lines)), area);
}

fn input_line(value: &str) -> Line<'static> {
    Line::from(vec![
        Span::raw(value.to_string()),
        Span::styled("█", Style::default().fg(ACCENT)),
    ])
}

fn render_mail(f: &mut Frame, state: &AppState) {
    let [title, controls, details, list] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(
            u16::try_from(state.settings.window_size)
                .unwrap_or(u16::MAX)
                .saturating_add(2),
        ),
    ])
    .margin(1)
    .areas(f.area());

    f.render_widget(
        Paragraph::new(Span::styled(
            "PLAIN",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        title,
    );

    let mut hint = vec![
        Span::styled("↑↓", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" navigate · "),
        Span::styled("R", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" reply · "),
        Span::styled("D", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" delete · "),
        Span::styled("T", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" train · "),
        Span::styled("Q", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" quit"),
    ];
    if state.is_loading() {
        hint.push(Span::styled(" · Loading...", Style::default().fg(Color::Yellow)));
    }
    if state.pending() > 0 {
        hint.push(Span::styled(
            format!(" · {} pending", state.pending()),
            Style::default().fg(Color::Yellow),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(hint)), controls);

    render_details(f, state, details);
    render_list(f, state, list);

    match &state.reply {
        ReplyState::Confirming { .. } => render_modal(
            f,
            "What would you like to do with your reply?",
            "ESC - discard · ENTER - send · SPACE - keep editing",
        ),
        ReplyState::Sending { .. } => render_modal(f, "Sent.", ""),
        _ => {}
    }
}

fn render_details(f: &mut Frame, state: &AppState, area: Rect) {
    let Some(email) = state.mailbox.current() else {
        return;
    };
    let border = if state.mailbox.is_expanded() {
        ACCENT
    } else {
        Color::DarkGray
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));

    let text = match state.reply.draft() {
        Some(draft) => Text::from(vec![Line::from(vec![
            Span::raw(draft.to_string()),
            Span::styled("█", Style::default().fg(ACCENT)),
        ])]),
        None => {
            let shown = if state.mailbox.is_expanded() {
                &email.body
            } else {
                &email.summary
            };
            let mut lines = vec![
                Line::raw(format!("From: {}", email.from_line())),
                Line::raw(format!("Subject: {}", email.subject)),
                Line::styled(
                    "─".repeat(area.width.saturating_sub(2) as usize),
                    Style::default().fg(Color::DarkGray),
                ),
            ];
            lines.extend(shown.lines().map(|l| Line::raw(l.to_string())));
            Text::from(lines)
        }
    };

    f.render_widget(
        Paragraph::new(text).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn render_list(f: &mut Frame, state: &AppState, area: Rect) {
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(Color::DarkGray));

    if state.mailbox.is_empty() {
        f.render_widget(Paragraph::new("No emails to display").block(block), area);
        return;
    }

    let window = state
        .mailbox
        .window(state.settings.window_size, state.settings.window_lead);
    let current = state.mailbox.current_index();

    let items: Vec<ListItem> = state.mailbox.emails()[window.clone()]
        .iter()
        .zip(window)
        .map(|(e, idx)| {
            let marker = if e.read_status { "  " } else { "► " };
            let line = Line::from(vec![
                Span::styled(marker, Style::default().fg(ACCENT)),
                Span::raw(format!("{} ", e.sender_name)),
                Span::styled(
                    format!("<{}>", e.received),
                    Style::default().fg(Color::DarkGray),
                ),
            ]);
            let style = if Some(idx) == current {
                Style::default().fg(Color::Black).bg(ACCENT)
            } else {
                Style::default()
            };
            ListItem::new(line).style(style)
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}

fn render_training(f: &mut Frame, training: &TrainingSession) {
    let [title, controls, details, score] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(3),
    ])
    .margin(1)
    .areas(f.area());

    f.render_widget(
        Paragraph::new(Span::styled(
            "TRAIN",
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        )),
        title,
    );
    f.render_widget(
        Paragraph::new("+ increase · - decrease · ENTER next · ESC quit"),
        controls,
    );

    let email = training.current();
    let mut lines = vec![
        Line::raw(format!("From: {}", email.from_line())),
        Line::raw(format!("Subject: {}", email.subject)),
        Line::raw(""),
    ];
    lines.extend(email.summary.lines().map(|l| Line::raw(l.to_string())));
    f.render_widget(
        Paragraph::new(Text::from(lines))
            .block(Block::default().borders(Borders::ALL))
            .wrap(Wrap { trim: false }),
        details,
    );

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" less ")
                .title_bottom(Line::from(" more ").right_aligned()),
        )
        .gauge_style(Style::default().fg(Color::Magenta))
        .ratio(training.score_fraction())
        .label(format!(
            "{} ({}/{})",
            email.user_score,
            training.index() + 1,
            training.emails().len()
        ));
    f.render_widget(gauge, score);

    if training.is_complete() {
        render_modal(f, "Training queued.", "Press ENTER to return to Plain mode");
    }
}

fn render_modal(f: &mut Frame, message: &str, options: &str) {
    let area = centered(f.area(), 60, 5);
    let text = Text::from(vec![
        Line::raw(message.to_string()),
        Line::styled(options.to_string(), Style::default().fg(Color::DarkGray)),
    ]);
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(ACCENT)),
            )
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    cell
}
