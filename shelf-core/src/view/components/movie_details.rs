//! src/view/components/movie_details.rs

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::util::humanize::{format_actors, format_timestamp};
use crate::view::snapshots::MovieSnapshot;
use crate::view::theme;

pub struct MovieDetailsOverlay;

impl MovieDetailsOverlay {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame<'_>, movies: &MovieSnapshot, title: &str, area: Rect) {
        frame.render_widget(Clear, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {title} "))
            .title_style(theme::title_style())
            .border_style(theme::border_style())
            .style(theme::base_style());

        let lines = match (&movies.details, &movies.details_error) {
            (Some(movie), _) => {
                let row = |label: &'static str, value: String| {
                    Line::from(vec![
                        Span::styled(format!("{label:<10}"), theme::muted_style()),
                        Span::raw(value),
                    ])
                };
                vec![
                    Line::from(Span::styled(movie.title.clone(), theme::header_style())),
                    Line::from(""),
                    row("Year", movie.year.to_string()),
                    Line::from(vec![
                        Span::styled(format!("{:<10}", "Format"), theme::muted_style()),
                        Span::styled(movie.format.as_str(), theme::format_style(movie.format)),
                    ]),
                    row("Actors", format_actors(&movie.actors)),
                    Line::from(""),
                    row("Added", format_timestamp(movie.created_at.as_ref())),
                    row("Updated", format_timestamp(movie.updated_at.as_ref())),
                    Line::from(""),
                    Line::from(Span::styled(
                        "e edit · d delete · Esc close",
                        theme::muted_style(),
                    )),
                ]
            }
            (None, Some(err)) => vec![
                Line::from(Span::styled(err.message.clone(), theme::error_style())),
                Line::from(""),
                Line::from(Span::styled("Esc close", theme::muted_style())),
            ],
            (None, None) => vec![Line::from(Span::styled(
                "Loading…",
                theme::muted_style(),
            ))],
        };

        frame.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
            area,
        );
    }
}

impl Default for MovieDetailsOverlay {
    fn default() -> Self {
        Self::new()
    }
}
