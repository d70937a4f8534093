use log::{debug, info};
use tokio::io::{AsyncBufReadExt, BufReader};

use quiz_core::QuizPhase;
use services::{Clock, QuizConfig, QuizController, SessionView};
use ui::vm::format_countdown;
use ui::{HELP, IntentOutcome, apply_intent, parse_command, render_screen, screen_from_view};

/// Countdown values announced while the question screen is idle.
const ANNOUNCE_AT_SECS: [u32; 3] = [300, 60, 10];

fn print_view(view: &SessionView) {
    println!("\n{}", render_screen(&screen_from_view(view)));
}

fn phase_of(view: &SessionView) -> Option<QuizPhase> {
    match view {
        SessionView::Loaded(snapshot) => Some(snapshot.phase),
        SessionView::Loading | SessionView::LoadFailed { .. } => None,
    }
}

fn announced_time_left(view: &SessionView) -> Option<u32> {
    match view {
        SessionView::Loaded(snapshot)
            if snapshot.phase == QuizPhase::InProgress
                && ANNOUNCE_AT_SECS.contains(&snapshot.time_left_secs) =>
        {
            Some(snapshot.time_left_secs)
        }
        _ => None,
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = QuizConfig::from_env();
    info!(
        "question bank at {}, {}s per test",
        config.api_base_url, config.duration_secs
    );

    let controller = QuizController::from_config(&config, Clock::default());
    let mut views = controller.subscribe();

    print_view(&controller.view());
    if let Err(err) = controller.load().await {
        debug!("initial load failed: {err}");
    }
    print_view(&views.borrow_and_update());
    println!("Type `help` for the list of commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut shown_phase = phase_of(&controller.view());

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if line.trim().eq_ignore_ascii_case("help") {
                    println!("{HELP}");
                    continue;
                }

                let intent = match parse_command(&line) {
                    Ok(intent) => intent,
                    Err(err) => {
                        println!("{err}");
                        continue;
                    }
                };
                match apply_intent(&controller, intent).await {
                    Ok(IntentOutcome::Quit) => break,
                    Ok(IntentOutcome::Updated(_)) => {}
                    Err(err) => println!("{err}"),
                }

                let view = views.borrow_and_update().clone();
                shown_phase = phase_of(&view);
                print_view(&view);
            }
            changed = views.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = views.borrow_and_update().clone();
                let phase = phase_of(&view);
                if phase != shown_phase {
                    shown_phase = phase;
                    print_view(&view);
                } else if let Some(secs) = announced_time_left(&view) {
                    println!("Time left {}", format_countdown(secs));
                }
            }
        }
    }

    controller.flush_report().await;
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
