use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{app::App, scorer::Classification, session::RoundReport};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;
const POPUP_WIDTH: u16 = 32;
const POPUP_HEIGHT: u16 = 6;

pub const TITLE: &str = "Type-A-Thon";

/// Header line above the words
pub fn timer_text(seconds_remaining: Option<u32>) -> String {
    match seconds_remaining {
        Some(secs) => format!("Time remaining: {secs} seconds"),
        None => String::from("Press any key to start"),
    }
}

pub fn report_text(report: &RoundReport) -> String {
    format!(
        "Game Over!\nAccuracy: {:.2}%\nWPM: {:.2}",
        report.accuracy(),
        report.wpm()
    )
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let view = &self.view;
        // styles
        let bold_style = Style::default().add_modifier(Modifier::BOLD);

        let green_bold_style = Style::default().patch(bold_style).fg(Color::Green);
        let red_bold_style = Style::default().patch(bold_style).fg(Color::Red);

        let dim_bold_style = Style::default()
            .patch(bold_style)
            .add_modifier(Modifier::DIM);

        let underlined_dim_bold_style = Style::default()
            .patch(dim_bold_style)
            .add_modifier(Modifier::UNDERLINED);

        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let prompt = view.target.flatten();
        let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
        let prompt_occupied_lines = if prompt.width() <= max_chars_per_line as usize {
            1
        } else {
            ((prompt.width() as f64 / max_chars_per_line as f64).ceil() + 1.0) as u16
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1), // title
                Constraint::Min(0),
                Constraint::Length(2), // timer
                Constraint::Length(prompt_occupied_lines),
                Constraint::Length(1),
                Constraint::Length(3), // input
                Constraint::Min(0),
                Constraint::Length(1), // legend
            ])
            .split(area);

        Paragraph::new(Span::styled(TITLE, bold_style))
            .alignment(Alignment::Center)
            .render(chunks[0], buf);

        Paragraph::new(Span::styled(
            timer_text(view.seconds_remaining),
            dim_bold_style,
        ))
        .alignment(Alignment::Center)
        .render(chunks[2], buf);

        let cursor = view.input.chars().count();
        let spans = prompt
            .chars()
            .zip(view.classifications.iter())
            .enumerate()
            .map(|(idx, (expected, class))| match class {
                Classification::Correct => Span::styled(expected.to_string(), green_bold_style),
                Classification::Incorrect => Span::styled(
                    match expected {
                        ' ' => "·".to_owned(),
                        c => c.to_string(),
                    },
                    red_bold_style,
                ),
                Classification::Pending if idx == cursor => {
                    Span::styled(expected.to_string(), underlined_dim_bold_style)
                }
                Classification::Pending => Span::styled(expected.to_string(), dim_bold_style),
            })
            .collect::<Vec<Span>>();

        Paragraph::new(Line::from(spans))
            .alignment(if prompt_occupied_lines == 1 {
                // when the prompt is small enough to fit on one line
                // centering the text gives a nice zen feeling
                Alignment::Center
            } else {
                Alignment::Left
            })
            .wrap(Wrap { trim: true })
            .render(chunks[3], buf);

        let input_style = if view.input_enabled {
            bold_style
        } else {
            dim_bold_style
        };
        Paragraph::new(Span::styled(view.input.as_str(), input_style))
            .block(Block::default().borders(Borders::ALL))
            .render(chunks[5], buf);

        Paragraph::new(Span::styled("(esc)ape / (ctrl+w) delete word", italic_style))
            .render(chunks[7], buf);

        if let Some(report) = &view.last_report {
            let popup = centered(area, POPUP_WIDTH, POPUP_HEIGHT);
            Clear.render(popup, buf);
            Paragraph::new(Text::from(report_text(report)))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(format!(" Round {} ", report.round)),
                )
                .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
                .alignment(Alignment::Center)
                .render(popup, buf);
        }
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    popup
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::round_stats::RoundStats;
    use crate::runtime::Metronome;
    use crate::session::SessionConfig;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::Duration;

    fn app() -> App {
        App::with_parts(
            vec!["cat".to_string()],
            SessionConfig::new(2, 10).unwrap(),
            StdRng::seed_from_u64(1),
            Metronome::new(Duration::from_secs(1)),
        )
        .unwrap()
    }

    fn rendered(app: &App) -> String {
        let area = Rect::new(0, 0, 60, 20);
        let mut buf = Buffer::empty(area);
        app.render(area, &mut buf);
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn timer_text_idle_and_running() {
        assert_eq!(timer_text(None), "Press any key to start");
        assert_eq!(timer_text(Some(7)), "Time remaining: 7 seconds");
    }

    #[test]
    fn report_text_has_two_decimals() {
        let report = RoundReport {
            round: 1,
            stats: RoundStats {
                total_characters: 3,
                correct_characters: 2,
                accuracy: 200.0 / 3.0,
                wpm: 3.6,
            },
            duration_secs: 10,
        };
        assert_eq!(report_text(&report), "Game Over!\nAccuracy: 66.67%\nWPM: 3.60");
    }

    #[test]
    fn idle_screen_shows_words_and_prompt() {
        let screen = rendered(&app());
        assert!(screen.contains(TITLE));
        assert!(screen.contains("Press any key to start"));
        assert!(screen.contains("cat cat"));
    }

    #[test]
    fn incorrect_space_is_made_visible() {
        let mut app = app();
        for c in "catx".chars() {
            app.on_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
                .unwrap();
        }
        let screen = rendered(&app);
        assert!(screen.contains("cat·cat"));
        assert!(screen.contains("Time remaining: 10 seconds"));
    }

    #[test]
    fn report_popup_after_round() {
        let mut app = app();
        app.on_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE))
            .unwrap();
        for _ in 0..10 {
            app.on_tick().unwrap();
        }
        let screen = rendered(&app);
        assert!(screen.contains("Game Over!"));
        assert!(screen.contains("Round 1"));
    }
}
