//! Board rendering with half-block pixels.
//!
//! Each tile maps to one colored pixel; pairs of vertical pixels are packed
//! into a single terminal row via `▀` (fg = top tile, bg = bottom tile), so
//! the square board keeps a roughly square aspect ratio.

use super::{create_game_layout, render_overlay, render_status_bar};
use crate::game::{GameState, TickEvent};
use crate::leaderboard::Leaderboard;
use crate::theme::Theme;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const HALF_TOP: char = '\u{2580}'; // ▀
const FULL_BLOCK: char = '\u{2588}'; // █

/// Read-only data the scene needs for one frame.
pub struct GameView<'a> {
    pub state: &'a GameState,
    pub theme: Theme,
    pub player_name: &'a str,
    /// Most-recent-last message log; the tail is shown in the info panel.
    pub log: &'a [String],
    pub leaderboard: &'a Leaderboard,
    /// Splash text shown before the first steering input.
    pub banner: Option<&'a str>,
    pub motd: &'a str,
    /// True until the first steering input of the run.
    pub waiting_for_input: bool,
}

/// Render the full game scene.
pub fn render_game_scene(frame: &mut Frame, area: Rect, view: &GameView) {
    let colors = view.theme.colors();

    let layout = create_game_layout(frame, area, " Serpent's Path ", colors.border, 26);

    render_board(frame, layout.content, view);
    render_status(frame, layout.status_bar, view);
    render_info_panel(frame, layout.info_panel, view);

    if view.state.is_over() {
        render_game_over(frame, area, view);
    } else if view.waiting_for_input {
        render_start_overlay(frame, layout.content, view);
    } else if view.state.paused {
        render_overlay(
            frame,
            layout.content,
            " Paused ",
            colors.border,
            vec![Line::from("The serpent rests."), Line::from("[P] Resume")],
        );
    }
}

/// Paint the board. Two grid rows share one terminal row through `▀`.
fn render_board(frame: &mut Frame, area: Rect, view: &GameView) {
    let state = view.state;
    let colors = view.theme.colors();
    let n = state.tile_count as usize;

    let mut pixels: Vec<Vec<Color>> = vec![vec![colors.background; n]; n];

    let paint = |pixels: &mut Vec<Vec<Color>>, x: i16, y: i16, color: Color| {
        let (x, y) = (x as usize, y as usize);
        if x < n && y < n {
            pixels[y][x] = color;
        }
    };

    for obstacle in &state.obstacles {
        paint(&mut pixels, obstacle.x, obstacle.y, colors.obstacle);
    }
    for apple in &state.apples {
        paint(&mut pixels, apple.pos.x, apple.pos.y, colors.apple(apple.kind));
    }
    for npc in &state.npcs {
        for (i, seg) in npc.body.iter().enumerate() {
            let color = if i == 0 { colors.npc_head } else { colors.npc };
            paint(&mut pixels, seg.x, seg.y, color);
        }
    }
    let player_len = state.snake.len();
    for (i, seg) in state.snake.iter().enumerate() {
        let color = if i == 0 {
            colors.player_head
        } else {
            colors.player_body(i, player_len)
        };
        paint(&mut pixels, seg.x, seg.y, color);
    }

    // bordered board, centered in the content area
    let board_w = (n as u16 + 2).min(area.width);
    let board_h = (n as u16).div_ceil(2) + 2;
    let board_h = board_h.min(area.height);
    let x_off = area.x + area.width.saturating_sub(board_w) / 2;
    let board_area = Rect::new(x_off, area.y, board_w, board_h);

    let block = Block::default()
        .title(format!(" Score: {} ", state.score))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.border));
    let inner = block.inner(board_area);
    frame.render_widget(block, board_area);

    for term_row in 0..inner.height as usize {
        let top_row = term_row * 2;
        let bottom_row = top_row + 1;
        if top_row >= n {
            break;
        }

        let mut spans: Vec<Span> = Vec::with_capacity(n);
        for x in 0..n.min(inner.width as usize) {
            let fg = pixels[top_row][x];
            let bg = if bottom_row < n {
                pixels[bottom_row][x]
            } else {
                colors.background
            };
            spans.push(Span::styled(
                HALF_TOP.to_string(),
                Style::default().fg(fg).bg(bg),
            ));
        }

        let row_rect = Rect::new(inner.x, inner.y + term_row as u16, inner.width, 1);
        frame.render_widget(Paragraph::new(Line::from(spans)), row_rect);
    }
}

fn render_status(frame: &mut Frame, area: Rect, view: &GameView) {
    if view.state.is_over() {
        render_status_bar(
            frame,
            area,
            "The run is over.",
            Color::Red,
            &[("[Enter]", "New run"), ("[Q]", "Quit")],
        );
    } else if view.waiting_for_input {
        render_status_bar(
            frame,
            area,
            "Ready",
            Color::LightGreen,
            &[
                ("[Arrows]", "Slither"),
                ("[D]", "Difficulty"),
                ("[T]", "Theme"),
                ("[Q]", "Quit"),
            ],
        );
    } else {
        render_status_bar(
            frame,
            area,
            "Slither!",
            Color::Green,
            &[("[Arrows]", "Steer"), ("[P]", "Pause"), ("[Q]", "Quit")],
        );
    }
}

fn render_info_panel(frame: &mut Frame, area: Rect, view: &GameView) {
    let state = view.state;
    let colors = view.theme.colors();

    let block = Block::default()
        .title(" Info ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default().fg(Color::White);

    let difficulty_text = if state.auto_difficulty {
        format!("{} (auto)", state.difficulty.name())
    } else {
        state.difficulty.name().to_string()
    };

    let mut lines: Vec<Line> = vec![
        Line::from(vec![
            Span::styled("Player: ", label),
            Span::styled(view.player_name.to_string(), value),
        ]),
        Line::from(vec![
            Span::styled("Difficulty: ", label),
            Span::styled(difficulty_text, Style::default().fg(Color::Cyan)),
        ]),
        Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(
                state.score.to_string(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("Best: ", label),
            Span::styled(
                view.leaderboard
                    .best(state.difficulty)
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                value,
            ),
        ]),
        Line::from(vec![
            Span::styled("Length: ", label),
            Span::styled(state.snake.len().to_string(), value),
        ]),
        Line::from(vec![
            Span::styled("Speed: ", label),
            Span::styled(format!("{}ms", state.effective_delay_ms()), value),
        ]),
        Line::from(vec![
            Span::styled("Rivals: ", label),
            Span::styled(state.npcs.len().to_string(), value),
        ]),
    ];

    if state.speed_ticks > 0 {
        lines.push(Line::from(Span::styled(
            format!("Boost: {} ticks", state.speed_ticks),
            Style::default().fg(colors.apple_speed),
        )));
    }
    if state.ghost_ticks > 0 {
        lines.push(Line::from(Span::styled(
            format!("Ghost: {} ticks", state.ghost_ticks),
            Style::default().fg(colors.apple_ghost),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(format!(" {FULL_BLOCK} "), Style::default().fg(colors.apple_normal)),
        Span::styled("Apple  ", label),
        Span::styled(format!("{FULL_BLOCK} "), Style::default().fg(colors.apple_gold)),
        Span::styled("Gold", label),
    ]));
    lines.push(Line::from(vec![
        Span::styled(format!(" {FULL_BLOCK} "), Style::default().fg(colors.apple_speed)),
        Span::styled("Speed  ", label),
        Span::styled(format!("{FULL_BLOCK} "), Style::default().fg(colors.apple_ghost)),
        Span::styled("Ghost", label),
    ]));
    lines.push(Line::from(vec![
        Span::styled(format!(" {FULL_BLOCK} "), Style::default().fg(colors.npc)),
        Span::styled("Rival  ", label),
        Span::styled(format!("{FULL_BLOCK} "), Style::default().fg(colors.obstacle)),
        Span::styled("Stone", label),
    ]));

    if !view.motd.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            view.motd.to_string(),
            Style::default().fg(Color::Yellow),
        )));
    }

    lines.push(Line::from(""));
    let log_rows = (inner.height as usize).saturating_sub(lines.len());
    let tail_start = view.log.len().saturating_sub(log_rows);
    for message in &view.log[tail_start..] {
        lines.push(Line::from(Span::styled(message.clone(), label)));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_start_overlay(frame: &mut Frame, area: Rect, view: &GameView) {
    let colors = view.theme.colors();
    let mut lines: Vec<Line> = Vec::new();

    if let Some(banner) = view.banner {
        for row in banner.lines() {
            lines.push(Line::from(Span::styled(
                row.to_string(),
                Style::default().fg(colors.player_head),
            )));
        }
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        "Press an arrow key to slither",
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    )));

    render_overlay(frame, area, "", colors.border, lines);
}

fn render_game_over(frame: &mut Frame, area: Rect, view: &GameView) {
    let state = view.state;
    let colors = view.theme.colors();
    let cause = state.over.expect("game-over overlay needs a cause");

    let mut lines = vec![
        Line::from(Span::styled(
            cause.message(),
            Style::default().fg(Color::Red),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Final score: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                state.score.to_string(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            format!("Top scores: {}", state.difficulty.name()),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
    ];

    let top = view.leaderboard.top(state.difficulty);
    if top.is_empty() {
        lines.push(Line::from(Span::styled(
            "No scores recorded yet.",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for (i, entry) in top.iter().enumerate() {
        lines.push(Line::from(Span::styled(
            format!("{:>2}. {:<12} {:>5}  {}", i + 1, entry.name, entry.score, entry.date),
            Style::default().fg(Color::Gray),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "[Enter] New run   [Q] Quit",
        Style::default().fg(Color::White),
    )));

    render_overlay(frame, area, " Serpent Down ", colors.border, lines);
}

/// Translate a tick's events into log lines. Lives beside the scene so the
/// host's loop stays free of presentation strings.
pub fn describe_events(events: &[TickEvent]) -> Vec<String> {
    let mut messages = Vec::new();
    for event in events {
        match event {
            TickEvent::AppleEaten { kind, score } => {
                messages.push(format!("~ Ate a {} ({} pts)", kind.name(), score));
            }
            TickEvent::NpcAppleEaten { .. } => {}
            TickEvent::NpcDied { recycled } => {
                messages.push(format!("~ A rival fell; {} apples scattered", recycled));
            }
            TickEvent::NpcSpawned => {
                messages.push("~ A new rival slithers in".to_string());
            }
            TickEvent::NpcSpawnSkipped => {}
            TickEvent::DifficultyEscalated { tier } => {
                messages.push(format!("~ The path steepens: {}", tier.name()));
            }
            TickEvent::GameOver { cause } => {
                messages.push(format!("~ {}", cause.message()));
            }
        }
    }
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{AppleKind, Difficulty, GameOverCause};

    #[test]
    fn test_describe_events_covers_the_loud_ones() {
        let events = vec![
            TickEvent::AppleEaten {
                kind: AppleKind::Gold,
                score: 12,
            },
            TickEvent::NpcDied { recycled: 3 },
            TickEvent::NpcSpawned,
            TickEvent::DifficultyEscalated {
                tier: Difficulty::Hard,
            },
            TickEvent::GameOver {
                cause: GameOverCause::HitSelf,
            },
        ];

        let messages = describe_events(&events);

        assert_eq!(messages.len(), 5);
        assert!(messages[0].contains("golden apple"));
        assert!(messages[0].contains("12"));
        assert!(messages[1].contains("3 apples"));
        assert!(messages[3].contains("Hard"));
    }

    #[test]
    fn test_describe_events_is_quiet_about_npc_meals() {
        let events = vec![TickEvent::NpcAppleEaten {
            kind: AppleKind::Normal,
        }];
        assert!(describe_events(&events).is_empty());
    }
}
