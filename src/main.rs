//! Poker tournament blind clock built with Yew.
//! Wires the reducer, the one-second ticker, persistence and the views.

use blind_clock::config::TICK_MS;
use blind_clock::metrics::format_clock;
use blind_clock::persistence::{self, BrowserStorage};
use blind_clock::TimerEvent;
use gloo_timers::callback::Interval;
use log::{info, warn};
use yew::prelude::*;

mod components;
mod hooks;
mod state;
mod utils;

use components::{
    render_message, render_prize_board, render_stats, render_timer, DisplayPanel, LevelEditor,
    PlayerPanel, PrizeEditor, SnapshotPanel,
};
use state::{Action, AppState};

#[function_component(Main)]
fn main_component() -> Html {
    let state = use_reducer(AppState::restore);
    let dispatch = {
        let dispatcher = state.dispatcher();
        Callback::from(move |action: Action| dispatcher.dispatch(action))
    };

    // One interval while running; dropping it on pause cancels the tick.
    {
        let dispatcher = state.dispatcher();
        use_effect_with(state.store.is_running(), move |&running| {
            let interval = running.then(|| {
                Interval::new(TICK_MS, move || dispatcher.dispatch(Action::Tick))
            });
            move || drop(interval)
        });
    }

    // Persist after every reduction
    {
        let state = state.clone();
        use_effect_with(state.revision, move |_| {
            if let Err(e) = persistence::save(&BrowserStorage, &state.store) {
                warn!("Failed to persist tournament: {}", e);
            }
            || ()
        });
    }

    {
        let state = state.clone();
        use_effect_with(state.event_seq, move |_| {
            match state.last_event {
                Some(TimerEvent::LevelExpired { level_index, final_level }) => {
                    let display = state.store.display();
                    if display.sound_enabled {
                        info!(
                            "Level {} finished, playing '{}'",
                            level_index + 1,
                            display.warning_sound_type.id()
                        );
                    }
                    if final_level {
                        info!("Final level finished; clock holds at 00:00");
                    }
                }
                Some(TimerEvent::LevelAdvanced { from, to }) => {
                    if state.store.display().sound_enabled {
                        info!(
                            "Advanced from level {} to {}, playing '{}'",
                            from + 1,
                            to + 1,
                            state.store.display().level_change_sound_type.id()
                        );
                    }
                }
                None => {}
            }
            || ()
        });
    }

    {
        let title = format!(
            "{} · {}",
            format_clock(state.store.remaining_seconds() as u64),
            state.store.display_name()
        );
        use_effect_with(title, |title| {
            gloo_utils::document().set_title(title);
            || ()
        });
    }

    let store = &state.store;
    let display = store.display();

    html! {
        <div class="app" style={display.page_style()}>
            if let Some(image_style) = display.image_style() {
                <div class="background-image" style={image_style}></div>
            }
            <header>
                <h1>{ store.display_name() }</h1>
            </header>
            { render_message(&state.message, &dispatch) }
            <main class="board">
                <section class="side">
                    { render_stats(store) }
                    { render_prize_board(store) }
                </section>
                <section class="center">
                    { render_timer(store, &dispatch) }
                </section>
            </main>
            <details class="settings">
                <summary>{ "Settings" }</summary>
                <LevelEditor
                    levels={store.levels().as_slice().to_vec()}
                    current_index={store.current_level_index()}
                    dispatch={dispatch.clone()} />
                <SnapshotPanel
                    tournament_name={store.tournament_name().to_string()}
                    snapshots={store.snapshots().to_vec()}
                    dispatch={dispatch.clone()} />
                <PlayerPanel players={*store.players()} dispatch={dispatch.clone()} />
                <PrizeEditor prizes={store.prizes().to_vec()} dispatch={dispatch.clone()} />
                <DisplayPanel settings={display.clone()} dispatch={dispatch.clone()} />
            </details>
        </div>
    }
}

#[function_component]
pub fn App() -> Html {
    html! { <Main /> }
}

/// Entry point: installs the panic hook and logger, then renders the app.
fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
    yew::Renderer::<App>::new().render();
}
