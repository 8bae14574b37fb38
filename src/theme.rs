use ratatui::style::{Color, Modifier, Style};

pub struct Theme {
    pub border: Color,
    pub text: Color,
    pub cursor_bg: Color,

    // Specific components
    pub header: Style,
    pub column_header: Style,
    pub checked: Style,
    pub unchecked: Style,
    pub doc_size: Style,
    pub doc_date: Style,
    pub loading: Style,
    pub error: Style,
    pub footer: Style,
    pub popup_border: Style,
    pub popup_label: Style,
    pub popup_text: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            border: Color::Cyan,
            text: Color::White,
            cursor_bg: Color::DarkGray,

            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            column_header: Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            checked: Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            unchecked: Style::default().fg(Color::DarkGray),
            doc_size: Style::default().fg(Color::Blue),
            doc_date: Style::default().fg(Color::Magenta),
            loading: Style::default().fg(Color::Yellow).add_modifier(Modifier::ITALIC),
            error: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            footer: Style::default().fg(Color::Gray).add_modifier(Modifier::DIM),
            popup_border: Style::default().fg(Color::Magenta).bg(Color::Black),
            popup_label: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            popup_text: Style::default().fg(Color::White),
        }
    }
}
