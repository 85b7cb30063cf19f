use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use log::LevelFilter;
use suite_core::{update, AppState, Msg};
use suite_logging::{suite_info, suite_warn};

use super::config::{self, AppConfig};
use super::effects::EffectRunner;
use super::input::{self, UserCommand};
use super::render::TerminalRenderer;

pub fn run_app() -> anyhow::Result<()> {
    let config_path = config::config_path_from_args(std::env::args());
    let loaded = config::read_config(&config_path);
    let config = match &loaded {
        Ok(Some(config)) => config.clone(),
        _ => AppConfig::default(),
    }
    .with_env_overrides(|key| std::env::var(key).ok());

    suite_logging::initialize(config.log_destination(), LevelFilter::Info);
    match loaded {
        Ok(Some(_)) => suite_info!("Loaded config from {:?}", config_path),
        Ok(None) => suite_info!("No config at {:?}, using defaults", config_path),
        Err(err) => suite_warn!("{}; using defaults", err),
    }
    suite_info!("Generation service at {}", config.base_url);

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let quit = Arc::new(AtomicBool::new(false));
    let runner = EffectRunner::new(config.client_settings(), msg_tx.clone());

    spawn_input_reader(msg_tx.clone(), quit.clone());

    // Background tick to throttle rendering and notice shutdown.
    thread::spawn(move || {
        let interval = Duration::from_millis(75);
        while msg_tx.send(Msg::Tick).is_ok() {
            thread::sleep(interval);
        }
    });

    let mut stdout = io::stdout();
    writeln!(stdout, "What can I help you build?\n{}", input::HELP)?;

    let mut state = AppState::new();
    let mut renderer = TerminalRenderer::default();
    while let Ok(msg) = msg_rx.recv() {
        if quit.load(Ordering::Relaxed) {
            break;
        }
        let (next, effects) = update(state, msg);
        state = next;
        runner.enqueue(effects);

        if state.consume_dirty() {
            for line in renderer.render(&state.view()) {
                writeln!(stdout, "{line}")?;
            }
            stdout.flush()?;
        }
    }

    // Release anything still held before the client thread goes away.
    let (_state, effects) = update(state, Msg::ResetClicked);
    runner.enqueue(effects);
    suite_info!("Shutting down");
    Ok(())
}

fn spawn_input_reader(msg_tx: mpsc::Sender<Msg>, quit: Arc<AtomicBool>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            match input::parse_line(&line) {
                UserCommand::Dispatch(msgs) => {
                    for msg in msgs {
                        if msg_tx.send(msg).is_err() {
                            return;
                        }
                    }
                }
                UserCommand::Help => println!("{}", input::HELP),
                UserCommand::Invalid(reason) => println!("{reason}"),
                UserCommand::Quit => break,
            }
        }
        quit.store(true, Ordering::Relaxed);
    });
}
