//! src/view/components/movie_table.rs

use crate::view::{components::error_overlay::ErrorOverlay, snapshots::MovieSnapshot, theme};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, HighlightSpacing, Paragraph, Row, Table, TableState},
};

pub struct MovieTable;

impl MovieTable {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame<'_>, movies: &MovieSnapshot, selected: usize, area: Rect) {
        if movies.movies.is_empty() {
            if let Some(err) = &movies.list_error {
                ErrorOverlay::new(err).render(frame, area);
            } else {
                self.render_empty(frame, movies, area);
            }
            return;
        }

        let header = Row::new(vec!["Title", "Year", "Format", "Actors"])
            .style(theme::header_style())
            .bottom_margin(1);

        let rows: Vec<Row> = movies
            .movies
            .iter()
            .map(|movie| {
                Row::new(vec![
                    Cell::from(movie.title.clone()),
                    Cell::from(movie.year.to_string()),
                    Cell::from(movie.format.as_str()).style(theme::format_style(movie.format)),
                    Cell::from(movie.actors.join(", ")).style(theme::muted_style()),
                ])
                .style(Style::default().fg(theme::FOREGROUND))
            })
            .collect();

        let widths = [
            Constraint::Percentage(40),
            Constraint::Length(6),
            Constraint::Length(9),
            Constraint::Fill(1),
        ];

        let mut table_state = TableState::default().with_selected(Some(selected));

        let table = Table::new(rows, widths)
            .header(header)
            .block(self.block(movies))
            .row_highlight_style(theme::highlight_style())
            .highlight_symbol("▶ ")
            .highlight_spacing(HighlightSpacing::Always);

        frame.render_stateful_widget(table, area, &mut table_state);
    }

    fn block(&self, movies: &MovieSnapshot) -> Block<'static> {
        let title = if movies.loading {
            " Movies (loading…) ".to_string()
        } else {
            format!(" Movies ({}) ", movies.total)
        };
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .title_style(theme::title_style())
            .border_style(theme::muted_style())
            .style(theme::base_style())
    }

    fn render_empty(&self, frame: &mut Frame<'_>, movies: &MovieSnapshot, area: Rect) {
        let message = if !movies.initialized || movies.loading {
            "Loading movies…"
        } else if !movies.filters.is_empty() {
            "No movies match the current search. Press x to clear it."
        } else {
            "No movies yet. Press a to add one or i to import a file."
        };
        let paragraph = Paragraph::new(Line::from(Span::styled(message, theme::muted_style())))
            .alignment(Alignment::Center)
            .block(self.block(movies));
        frame.render_widget(paragraph, area);
    }
}

impl Default for MovieTable {
    fn default() -> Self {
        Self::new()
    }
}
