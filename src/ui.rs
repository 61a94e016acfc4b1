use chrono::Local;
use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::celebration::CelebrationAnimation;
use crate::classify::{display_text, MASK};
use crate::config::PracticeMode;
use crate::session::PracticeSession;
use crate::App;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match &self.session {
            None => render_idle(area, buf),
            Some(session) if session.is_complete() => render_complete(self, session, area, buf),
            Some(session) => render_active(self, session, area, buf),
        }

        if self.celebration.is_active {
            render_celebration_particles(&self.celebration, area, buf);
        }
    }
}

fn render_idle(area: Rect, buf: &mut Buffer) {
    let message = Paragraph::new(Span::styled(
        "No round in progress - (n) to practice again or (esc) to quit",
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD | Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });

    message.render(area, buf);
}

fn render_active(app: &App, session: &PracticeSession, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_bold_style = Style::default()
        .patch(bold_style)
        .add_modifier(Modifier::DIM);
    let dim_italic_style = Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    let (position, total) = session.progress();
    let noun = match app.settings.mode {
        PracticeMode::SpellingBee => "Word",
        PracticeMode::MathGeneral => "Item",
    };

    let shown = display_text(session.current_item(), app.settings.mode, session.is_revealed());
    let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2) as usize;
    let item_lines = if shown.width() > max_chars_per_line {
        2
    } else {
        1
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1), // progress header
            Constraint::Length(1),
            Constraint::Length(item_lines),
            Constraint::Length(1), // countdown
            Constraint::Length(1),
            Constraint::Length(3), // definition panel
            Constraint::Min(1),
            Constraint::Length(1), // legend
        ])
        .split(area);

    let header = Paragraph::new(Span::styled(
        format!("{noun} {position} of {total}"),
        dim_bold_style,
    ))
    .alignment(Alignment::Center);
    header.render(chunks[1], buf);

    let item_style = if session.is_revealed() {
        Style::default().patch(bold_style).fg(Color::Green)
    } else if shown == MASK {
        Style::default().patch(bold_style).fg(Color::DarkGray)
    } else {
        bold_style
    };
    let item = Paragraph::new(Span::styled(shown, item_style))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    item.render(chunks[3], buf);

    if let Some(countdown) = &app.countdown {
        let pending = Paragraph::new(Span::styled(
            format!("revealing in {}", countdown.seconds_left()),
            dim_italic_style,
        ))
        .alignment(Alignment::Center);
        pending.render(chunks[4], buf);
    }

    if session.definition_visible() {
        let text = match &app.definition {
            Some(Ok(definition)) => format!("definition: {definition}"),
            Some(Err(error)) => error.to_string(),
            None => String::new(),
        };
        let panel = Paragraph::new(Span::styled(
            text,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
        panel.render(chunks[6], buf);
    }

    let legend = match app.settings.mode {
        PracticeMode::SpellingBee => "(space) hear it / (r)eveal / (d)efinition / (n)ext / (esc)ape",
        PracticeMode::MathGeneral => "(space) hear it / (r)eveal / (n)ext / (esc)ape",
    };
    let legend_widget =
        Paragraph::new(Span::styled(legend, italic_style)).alignment(Alignment::Center);
    legend_widget.render(chunks[8], buf);
}

fn render_complete(app: &App, session: &PracticeSession, area: Rect, buf: &mut Buffer) {
    let dim_bold_style = Style::default().add_modifier(Modifier::DIM | Modifier::BOLD);
    let dim_style = Style::default().add_modifier(Modifier::DIM);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1), // title
            Constraint::Length(1),
            Constraint::Length(2), // items recap
            Constraint::Length(1), // run summary
            Constraint::Length(1), // previous run
            Constraint::Length(1),
            Constraint::Length(3), // settings info box
            Constraint::Min(1),
            Constraint::Length(1), // legend
        ])
        .split(area);

    let title = Paragraph::new(Span::styled(
        "Test complete!",
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center);
    title.render(chunks[1], buf);

    let recap = Paragraph::new(Span::styled(
        session.items().iter().join(", "),
        dim_bold_style,
    ))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    recap.render(chunks[3], buf);

    let summary = Paragraph::new(Span::styled(
        format!(
            "{} items practiced from {}",
            session.items().len(),
            app.source_label
        ),
        italic_style,
    ))
    .alignment(Alignment::Center);
    summary.render(chunks[4], buf);

    if let Some(previous) = &app.last_practiced {
        let when = previous
            .finished_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M");
        let line = Paragraph::new(Span::styled(
            format!("last practiced {when} ({} items)", previous.item_count),
            dim_style,
        ))
        .alignment(Alignment::Center);
        line.render(chunks[5], buf);
    }

    let settings_text = format!(
        "Settings: Max items: {} | Shuffle: {} | Auto-reveal: {} ({}s)\nMode: {}\n(1) Shuffle (2) Auto-reveal (3) Mode",
        app.settings.max_items,
        if app.settings.randomize { "ON" } else { "OFF" },
        if app.settings.auto_reveal { "ON" } else { "OFF" },
        app.settings.reveal_delay_secs,
        app.settings.mode,
    );
    let settings_widget = Paragraph::new(settings_text)
        .style(
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    settings_widget.render(chunks[7], buf);

    let legend = Paragraph::new(Span::styled(
        "(n) practice again / (esc)ape",
        italic_style,
    ))
    .alignment(Alignment::Center);
    legend.render(chunks[9], buf);
}

fn render_celebration_particles(
    celebration: &CelebrationAnimation,
    area: Rect,
    buf: &mut Buffer,
) {
    let colors = [
        Color::Yellow,
        Color::Magenta,
        Color::Cyan,
        Color::Green,
        Color::Red,
        Color::Blue,
        Color::LightYellow,
    ];

    for particle in &celebration.particles {
        let x = particle.x as u16;
        let y = particle.y as u16;

        if x < area.width && y < area.height {
            let color = colors[particle.color_index % colors.len()];

            // fade with age
            let alpha = 1.0 - (particle.age / particle.max_age);
            let style = if alpha > 0.7 {
                Style::default().fg(color).add_modifier(Modifier::BOLD)
            } else if alpha > 0.3 {
                Style::default().fg(color)
            } else {
                Style::default().fg(color).add_modifier(Modifier::DIM)
            };

            if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
                cell.set_symbol(&particle.symbol.to_string());
                cell.set_style(style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, ConfigStore};
    use crate::dictionary::{DefinitionProvider, LookupError};
    use crate::speech::{AudioClip, AudioPlayer, SpeechError, SpeechSynthesizer};
    use crate::wordlist::WordList;
    use crate::Services;

    struct SilentSpeech;

    impl SpeechSynthesizer for SilentSpeech {
        fn synthesize(&self, _text: &str) -> Result<AudioClip, SpeechError> {
            Ok(AudioClip(Vec::new()))
        }
    }

    struct NoopPlayer;

    impl AudioPlayer for NoopPlayer {
        fn play(&self, _clip: AudioClip) {}
    }

    struct CannedDictionary;

    impl DefinitionProvider for CannedDictionary {
        fn define(&self, _word: &str) -> Result<String, LookupError> {
            Ok("a canned definition".into())
        }
    }

    struct NullConfigStore;

    impl ConfigStore for NullConfigStore {
        fn load(&self) -> Config {
            Config::default()
        }

        fn save(&self, _config: &Config) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn create_test_app(lines: &[&str], settings: Config) -> App {
        let services = Services {
            speech: Box::new(SilentSpeech),
            player: Box::new(NoopPlayer),
            dictionary: Box::new(CannedDictionary),
        };

        App::new(
            WordList::from_lines(lines.iter().copied()),
            "week12.png".to_string(),
            settings,
            services,
            Box::new(NullConfigStore),
            None,
        )
        .unwrap()
    }

    fn in_order() -> Config {
        Config {
            randomize: false,
            ..Config::default()
        }
    }

    fn rendered_text(app: &App) -> String {
        let area = Rect::new(0, 0, 80, 24);
        let mut buffer = Buffer::empty(area);

        app.render(area, &mut buffer);

        buffer
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    #[test]
    fn active_screen_masks_the_current_word() {
        let app = create_test_app(&["magnificent", "onomatopoeia"], in_order());

        let rendered = rendered_text(&app);

        assert!(rendered.contains("Word 1 of 2"));
        assert!(rendered.contains("????"));
        assert!(!rendered.contains("magnificent"));
    }

    #[test]
    fn revealed_word_is_shown_in_full() {
        let mut app = create_test_app(&["magnificent", "onomatopoeia"], in_order());
        app.reveal();

        let rendered = rendered_text(&app);

        assert!(rendered.contains("magnificent"));
        assert!(!rendered.contains("????"));
    }

    #[test]
    fn countdown_line_appears_while_a_reveal_is_pending() {
        let settings = Config {
            auto_reveal: true,
            reveal_delay_secs: 3,
            ..in_order()
        };
        let mut app = create_test_app(&["magnificent"], settings);
        app.read_aloud();

        let rendered = rendered_text(&app);

        assert!(rendered.contains("revealing in 3"));
    }

    #[test]
    fn definition_panel_shows_the_fetched_definition() {
        let mut app = create_test_app(&["magnificent"], in_order());
        app.toggle_definition();

        let rendered = rendered_text(&app);

        assert!(rendered.contains("definition: a canned definition"));
    }

    #[test]
    fn math_mode_hides_only_the_answer() {
        let settings = Config {
            mode: PracticeMode::MathGeneral,
            ..in_order()
        };
        let app = create_test_app(&["7 x 8 = 56"], settings);

        let rendered = rendered_text(&app);

        assert!(rendered.contains("Item 1 of 1"));
        assert!(rendered.contains("7 x 8 = ?"));
        assert!(!rendered.contains("56"));
    }

    #[test]
    fn complete_screen_recaps_the_round() {
        let mut app = create_test_app(&["cat", "dog"], in_order());
        app.advance();
        app.advance();

        let rendered = rendered_text(&app);

        assert!(rendered.contains("Test complete!"));
        assert!(rendered.contains("cat, dog"));
        assert!(rendered.contains("2 items practiced from week12.png"));
        assert!(rendered.contains("(1) Shuffle (2) Auto-reveal (3) Mode"));
        assert!(rendered.contains("Mode: SpellingBee"));
    }

    #[test]
    fn cleared_session_renders_the_idle_hint() {
        let mut app = create_test_app(&["cat"], in_order());
        app.clear_session();

        let rendered = rendered_text(&app);

        assert!(rendered.contains("No round in progress"));
    }

    #[test]
    fn celebration_particles_render_on_the_complete_screen() {
        let mut app = create_test_app(&["cat"], in_order());
        app.advance();

        assert!(app.celebration.is_active);
        assert!(!app.celebration.particles.is_empty());

        let area = Rect::new(0, 0, 80, 24);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);

        assert!(*buffer.area() == area);
    }

    #[test]
    fn tiny_areas_render_without_panicking() {
        let app = create_test_app(&["magnificent"], in_order());

        let area = Rect::new(0, 0, 12, 4);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);

        assert!(*buffer.area() == area);
    }

    #[test]
    fn long_items_wrap_instead_of_clipping() {
        let long_line = "an uncommonly long practice item that should wrap across the display area";
        let settings = Config {
            mode: PracticeMode::MathGeneral,
            ..in_order()
        };
        let app = create_test_app(&[long_line], settings);

        let area = Rect::new(0, 0, 40, 20);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);

        let rendered = buffer
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>();
        assert!(rendered.contains("uncommonly"));
    }
}
