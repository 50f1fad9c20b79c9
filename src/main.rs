//! Terminal front end: raw-mode lifecycle, input mapping, and the tick
//! scheduling loop. The loop is the only driver of the simulation: one
//! step per frame-delay interval, never overlapping.

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::{backend::CrosstermBackend, Terminal};
use serpent::build_info;
use serpent::game::{step, Difficulty, Direction, GameState, StepOutcome};
use serpent::leaderboard::Leaderboard;
use serpent::net::assets::load_text_asset;
use serpent::net::remote_config::{self, RemoteConfig};
use serpent::net::scores;
use serpent::profile::Profile;
use serpent::save_manager::SaveManager;
use serpent::ui::game_scene::{describe_events, render_game_scene, GameView};
use std::io;
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

/// Message log lines kept for the info panel.
const MAX_LOG: usize = 40;

const ASSET_DIR: &str = "assets";
const BANNER_FILE: &str = "banner.txt";

fn main() -> io::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 {
        match args[1].as_str() {
            "--version" | "-v" => {
                println!(
                    "serpent {} ({})",
                    build_info::BUILD_DATE,
                    build_info::BUILD_COMMIT
                );
                return Ok(());
            }
            "--help" | "-h" => {
                println!("Serpent's Path - Terminal Snake Arcade\n");
                println!("Usage: serpent [--version | --help]\n");
                println!("Steer with the arrow keys. Gold apples score five,");
                println!("speed apples hasten you, ghost apples let you pass");
                println!("through anything for a while. Mind the rivals.");
                return Ok(());
            }
            other => {
                eprintln!("Unknown option: {}", other);
                eprintln!("Run 'serpent --help' for usage.");
                std::process::exit(1);
            }
        }
    }

    // Remote config and any missing banner resolve in the background;
    // defaults apply until the channel delivers.
    let (config_tx, config_rx) = mpsc::channel();
    let config_url = remote_config::config_url();
    thread::spawn(move || {
        let config =
            remote_config::load_remote_config(&RemoteConfig::default(), config_url.as_deref());
        let banner = load_text_asset(
            BANNER_FILE,
            Path::new(ASSET_DIR),
            Some(&config.asset_base_url),
        )
        .ok();
        let _ = config_tx.send((config, banner));
    });

    let save_manager = SaveManager::new()?;

    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let result = run(&mut terminal, &save_manager, config_rx);

    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    save_manager: &SaveManager,
    config_rx: mpsc::Receiver<(RemoteConfig, Option<String>)>,
) -> io::Result<()> {
    let mut rng = rand::thread_rng();
    let mut profile = Profile::load();
    let mut leaderboard = Leaderboard::load();
    let mut config = RemoteConfig::default();
    let mut flushed_queue = false;

    let mut banner = load_text_asset(BANNER_FILE, Path::new(ASSET_DIR), None).ok();

    // resume a checkpoint if one was left behind, paused so the player is
    // not ambushed mid-slither
    let mut state = match save_manager.load() {
        Ok(mut resumed) => {
            resumed.paused = true;
            resumed
        }
        Err(_) => GameState::new(profile.difficulty, profile.auto_difficulty, &mut rng),
    };
    let mut waiting_for_input = state.velocity.is_none();
    let mut log: Vec<String> = Vec::new();
    let mut last_tick = Instant::now();

    // network results arrive here as ready-made log lines
    let (net_tx, net_rx) = mpsc::channel::<String>();

    loop {
        if let Ok((fetched, remote_banner)) = config_rx.try_recv() {
            if banner.is_none() {
                banner = remote_banner;
            }
            // first sight of a leaderboard URL: drain the offline queue and
            // peek at the online table
            if !fetched.high_score_api_url.is_empty() && !flushed_queue {
                flushed_queue = true;
                let url = fetched.high_score_api_url.clone();
                let tx = net_tx.clone();
                thread::spawn(move || {
                    let delivered = scores::flush_unsent(&url);
                    if delivered > 0 {
                        let _ = tx.send(format!("~ Delivered {} queued scores", delivered));
                    }
                    if let Ok(top) = scores::fetch_top_scores(&url) {
                        if let Some(best) = top.first() {
                            let _ =
                                tx.send(format!("~ Online best: {} by {}", best.score, best.name));
                        }
                    }
                });
            }
            config = fetched;
        }

        while let Ok(message) = net_rx.try_recv() {
            log.push(message);
        }

        terminal.draw(|frame| {
            let view = GameView {
                state: &state,
                theme: profile.theme,
                player_name: &profile.name,
                log: &log,
                leaderboard: &leaderboard,
                banner: banner.as_deref(),
                motd: &config.motd,
                waiting_for_input,
            };
            render_game_scene(frame, frame.size(), &view);
        })?;

        let delay = Duration::from_millis(state.effective_delay_ms());
        let timeout = delay.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                        // a live run is checkpointed for next launch
                        if !state.is_over() && !waiting_for_input {
                            let _ = save_manager.save(&state);
                        }
                        let _ = profile.save();
                        return Ok(());
                    }
                    KeyCode::Up => steer(&mut state, Direction::Up, &mut waiting_for_input),
                    KeyCode::Down => steer(&mut state, Direction::Down, &mut waiting_for_input),
                    KeyCode::Left => steer(&mut state, Direction::Left, &mut waiting_for_input),
                    KeyCode::Right => steer(&mut state, Direction::Right, &mut waiting_for_input),
                    KeyCode::Char('p') | KeyCode::Char('P') => state.toggle_pause(),
                    KeyCode::Char('t') | KeyCode::Char('T') => {
                        profile.theme = profile.theme.next();
                    }
                    KeyCode::Char('d') | KeyCode::Char('D') if waiting_for_input => {
                        let idx = Difficulty::ALL
                            .iter()
                            .position(|t| *t == profile.difficulty)
                            .unwrap_or(0);
                        profile.difficulty =
                            Difficulty::from_index((idx + 1) % Difficulty::ALL.len());
                        state =
                            GameState::new(profile.difficulty, profile.auto_difficulty, &mut rng);
                    }
                    KeyCode::Enter if state.is_over() => {
                        state =
                            GameState::new(profile.difficulty, profile.auto_difficulty, &mut rng);
                        waiting_for_input = true;
                        log.clear();
                    }
                    _ => {}
                }
            }
        }

        if last_tick.elapsed() >= delay {
            last_tick = Instant::now();
            if !state.is_over() && !waiting_for_input {
                let report = step(&mut state, &mut rng);
                log.extend(describe_events(&report.events));
                if log.len() > MAX_LOG {
                    let excess = log.len() - MAX_LOG;
                    log.drain(..excess);
                }
                if matches!(report.outcome, StepOutcome::GameOver(_)) {
                    finalize_run(&mut leaderboard, &profile, &state, &config, save_manager);
                }
            }
        }
    }
}

fn steer(state: &mut GameState, dir: Direction, waiting_for_input: &mut bool) {
    state.set_direction(dir);
    state.paused = false;
    *waiting_for_input = false;
}

/// Record the finished run locally, then hand the submission to the network
/// on its own thread; a failed delivery lands in the offline queue.
fn finalize_run(
    leaderboard: &mut Leaderboard,
    profile: &Profile,
    state: &GameState,
    config: &RemoteConfig,
    save_manager: &SaveManager,
) {
    leaderboard.record_score(&profile.name, state.score, state.difficulty);
    let _ = leaderboard.save();
    let _ = save_manager.delete();

    if !config.high_score_api_url.is_empty() {
        let url = config.high_score_api_url.clone();
        let entry = scores::ScoreSubmission::new(&profile.name, state.score, state.difficulty);
        thread::spawn(move || {
            scores::submit_or_queue(&url, entry);
        });
    }
}
