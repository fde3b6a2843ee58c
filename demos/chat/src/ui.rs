use crate::app::App;
use chainpad::chat::{BlockSnapshot, ChatMessage, render::display_time};
use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation},
};

pub fn ui(f: &mut ratatui::Frame, app: &App) {
    render_chat(f, app);
}

fn render_chat(f: &mut ratatui::Frame, app: &App) {
    let mut constraints = vec![
        Constraint::Length(3), // Mode bar
        Constraint::Min(0),    // Messages
        Constraint::Length(3), // Input
    ];

    // Add space for status message if present
    if app.status_message.is_some() {
        constraints.insert(1, Constraint::Length(2)); // Status message
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(f.area());

    let mode_bar = Paragraph::new(format!(
        "{} | keyword: {} | server: {}",
        app.mode().label(),
        app.mode().keyword(),
        app.server
    ))
    .style(
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    )
    .alignment(ratatui::layout::Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("Feature (Tab to switch)")
            .style(Style::default().fg(Color::Yellow)),
    );
    f.render_widget(mode_bar, chunks[0]);

    let mut message_chunk_index = 1;

    // Status message (if present)
    if let Some(status_msg) = &app.status_message {
        let status = Paragraph::new(status_msg.as_str())
            .style(Style::default().fg(Color::Cyan))
            .alignment(ratatui::layout::Alignment::Center)
            .block(Block::default().borders(Borders::NONE));
        f.render_widget(status, chunks[1]);
        message_chunk_index = 2;
    }

    // Messages on the left, newest block on the right
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(68), Constraint::Percentage(32)])
        .split(chunks[message_chunk_index]);
    let messages_area = body[0];
    render_block_panel(f, body[1], latest_block(app));

    let messages: Vec<ListItem> = app.messages().iter().map(message_item).collect();

    let messages_list = List::new(messages).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Messages ({}) - ESC to quit", app.messages().len()))
            .style(Style::default().fg(Color::White)),
    );

    f.render_widget(messages_list, messages_area);

    // Render scrollbar
    let scrollbar = Scrollbar::default()
        .orientation(ScrollbarOrientation::VerticalRight)
        .begin_symbol(None)
        .end_symbol(None);
    let scrollbar_area = messages_area.inner(Margin {
        horizontal: 0,
        vertical: 1,
    });
    f.render_stateful_widget(scrollbar, scrollbar_area, &mut app.scroll_state.clone());

    // Input area
    let input_chunk_index = if app.status_message.is_some() { 3 } else { 2 };
    let input = Paragraph::new(app.input.as_str())
        .style(Style::default().fg(Color::Yellow))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("{} ... (Enter to send)", app.mode().keyword())),
        );
    f.render_widget(input, chunks[input_chunk_index]);

    // Set cursor position
    f.set_cursor_position((
        chunks[input_chunk_index].x + app.input.chars().count() as u16 + 1,
        chunks[input_chunk_index].y + 1,
    ));
}

fn message_item(m: &ChatMessage) -> ListItem<'_> {
    let timestamp = m.timestamp.with_timezone(&Local).format("%H:%M:%S");
    let (author, color) = if m.is_user() {
        ("you", Color::Green)
    } else {
        ("chainpad", Color::Magenta)
    };

    let mut body = m.text.lines();
    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!("[{timestamp}] "),
            Style::default().fg(Color::Yellow),
        ),
        Span::styled(
            format!("{author}: "),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::raw(body.next().unwrap_or_default()),
    ])];
    lines.extend(body.map(|line| Line::from(format!("    {line}"))));

    if let Some(block) = &m.block {
        lines.push(Line::from(Span::styled(
            format!(
                "    block {} captured {}",
                block.block_number,
                display_time(&block.timestamp)
            ),
            Style::default().fg(Color::DarkGray),
        )));
    }

    ListItem::new(lines)
}

fn latest_block(app: &App) -> Option<&BlockSnapshot> {
    app.messages().iter().rev().find_map(|m| m.block.as_ref())
}

fn render_block_panel(f: &mut ratatui::Frame, area: Rect, block: Option<&BlockSnapshot>) {
    let label = Style::default().fg(Color::DarkGray);
    let field = |name: &'static str, value: String| {
        Line::from(vec![Span::styled(format!("{name:<7}"), label), Span::raw(value)])
    };

    let lines = match block {
        None => vec![Line::from(Span::styled("no block fetched yet", label))],
        Some(block) => {
            let info = block.block_info.as_ref();
            let text = |key: &str| {
                info.and_then(|i| i.get(key))
                    .and_then(|v| v.as_str())
                    .unwrap_or("-")
                    .to_string()
            };
            let tx_count = info
                .and_then(|i| i.get("transactions"))
                .and_then(|t| t.as_array())
                .map_or(0, Vec::len);
            vec![
                field("tag", block.block_number.clone()),
                field("number", text("number")),
                field("hash", text("hash")),
                field("miner", text("miner")),
                field("gas", text("gasUsed")),
                field("txs", tx_count.to_string()),
                field("fetched", display_time(&block.timestamp)),
            ]
        }
    };

    let panel = Paragraph::new(lines)
        .wrap(ratatui::widgets::Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Latest block"));
    f.render_widget(panel, area);
}
