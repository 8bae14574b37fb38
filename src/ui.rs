use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
};
use crate::app::App;
use crate::models::{DetailView, Document, Popup};
use crate::utils::format_size;

const HELP: &str = "↑/↓ or j/k Move | <Space> Select | a All/None | d Delete | r Reload | <Enter> Details | c Copy names | ? Help | q Quit";

/// Renders the document list view.
pub fn render(f: &mut Frame, app: &App) {
    let theme = &app.theme;
    let ctrl = &app.controller;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3), Constraint::Length(3)])
        .split(f.area());

    // Header: counts and loading state
    let mut header = vec![Span::styled(
        format!("Documents – {} of {} selected", ctrl.selected_documents().len(), ctrl.documents().len()),
        theme.header,
    )];
    if ctrl.is_loading() {
        header.push(Span::styled("  loading…", theme.loading));
    }
    f.render_widget(Paragraph::new(Line::from(header)), chunks[0]);

    // Table: checkbox, name, size, upload date
    let all_mark = if ctrl.documents().is_empty() {
        "[ ]"
    } else if ctrl.is_all_selected() {
        "[x]"
    } else if ctrl.selection().is_empty() {
        "[ ]"
    } else {
        "[-]"
    };
    let column_header = Row::new(vec![
        Cell::from(all_mark),
        Cell::from("Name"),
        Cell::from("Size"),
        Cell::from("Uploaded"),
    ])
    .style(theme.column_header);

    let rows: Vec<Row> = ctrl
        .documents()
        .iter()
        .map(|doc| {
            let (mark, mark_style) = if ctrl.is_selected(&doc.id) {
                ("[x]", theme.checked)
            } else {
                ("[ ]", theme.unchecked)
            };
            Row::new(vec![
                Cell::from(Span::styled(mark, mark_style)),
                Cell::from(Span::styled(doc.name.clone(), Style::default().fg(theme.text))),
                Cell::from(Span::styled(format_size(doc.size), theme.doc_size)),
                Cell::from(Span::styled(doc.upload_date.format("%Y-%m-%d").to_string(), theme.doc_date)),
            ])
        })
        .collect();

    let empty = rows.is_empty();
    let table = Table::new(
        rows,
        [Constraint::Length(4), Constraint::Min(20), Constraint::Length(10), Constraint::Length(12)],
    )
    .header(column_header)
    .block(Block::default().title("Document list").borders(Borders::ALL).style(Style::default().fg(theme.border)))
    .highlight_style(Style::default().bg(theme.cursor_bg).add_modifier(Modifier::BOLD))
    .highlight_symbol("→ ");
    let mut state = TableState::default();
    if !empty {
        state.select(Some(app.cursor));
    }
    f.render_stateful_widget(table, chunks[1], &mut state);

    // Placeholder goes on the row below the column header, inside the border.
    let inner = Block::default().borders(Borders::ALL).inner(chunks[1]);
    if empty && !ctrl.is_loading() && inner.height >= 2 {
        let line = Rect { y: inner.y + 1, height: 1, ..inner }.intersection(inner);
        let placeholder = Paragraph::new("No documents. Press r to reload.")
            .alignment(Alignment::Center)
            .style(theme.unchecked);
        f.render_widget(placeholder, line);
    }

    // Footer: errors win over status, status over help
    let footer = if let Some(err) = ctrl.last_error() {
        Paragraph::new(format!("Error: {}", err)).style(theme.error)
    } else if let Some(status) = &app.status {
        Paragraph::new(status.as_str()).style(Style::default().fg(theme.text))
    } else {
        Paragraph::new(HELP).style(theme.footer)
    };
    f.render_widget(footer.block(Block::default().borders(Borders::ALL)), chunks[2]);

    match app.popup {
        Popup::Details => render_details(f, app),
        Popup::Help => render_help(f, app),
        Popup::None => {}
    }
}

fn render_details(f: &mut Frame, app: &App) {
    let theme = &app.theme;
    let lines = match app.controller.details() {
        Some(DetailView::Loading(id)) => vec![Line::from(Span::styled(format!("Loading document {}…", id), theme.loading))],
        Some(DetailView::NotFound(id)) => vec![Line::from(Span::styled(format!("Document {} not found.", id), theme.error))],
        Some(DetailView::Found(doc)) => detail_lines(doc, app),
        None => vec![Line::from("No details.")],
    };
    let area = centered_rect(50, 40, f.area());
    f.render_widget(Clear, area);
    let para = Paragraph::new(lines)
        .block(Block::default().title("Details").borders(Borders::ALL).style(theme.popup_border))
        .wrap(Wrap { trim: true })
        .style(theme.popup_text);
    f.render_widget(para, area);
}

fn detail_lines(doc: &Document, app: &App) -> Vec<Line<'static>> {
    let theme = &app.theme;
    let field = |label: &str, value: String| {
        Line::from(vec![Span::styled(format!("{:<10}", label), theme.popup_label), Span::raw(value)])
    };
    vec![
        field("Id", doc.id.clone()),
        field("Name", doc.name.clone()),
        field("Size", format!("{} ({} bytes)", format_size(doc.size), doc.size)),
        field("Uploaded", doc.upload_date.format("%Y-%m-%d").to_string()),
        field("Selected", if app.controller.is_selected(&doc.id) { "yes".into() } else { "no".into() }),
    ]
}

fn render_help(f: &mut Frame, app: &App) {
    let area = centered_rect(60, 50, f.area());
    f.render_widget(Clear, area);
    let lines: Vec<Line> = HELP.split(" | ").map(Line::from).collect();
    let para = Paragraph::new(lines)
        .block(Block::default().title("Keys").borders(Borders::ALL).style(app.theme.popup_border))
        .style(app.theme.popup_text);
    f.render_widget(para, area);
}

/// Centers a rectangle within another rectangle.
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default().direction(Direction::Vertical)
        .constraints([Constraint::Percentage((100-percent_y)/2), Constraint::Percentage(percent_y), Constraint::Percentage((100-percent_y)/2)]).split(r)[1];
    Layout::default().direction(Direction::Horizontal)
        .constraints([Constraint::Percentage((100-percent_x)/2), Constraint::Percentage(percent_x), Constraint::Percentage((100-percent_x)/2)]).split(vertical)[1]
}
