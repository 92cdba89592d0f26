//! Yew view components for the blind clock.
//!
//! The `render_*` functions are stateless views of the store. The panels
//! below them hold local input state and talk to the store only by emitting
//! [`Action`]s.

use crate::hooks::use_validated_input;
use crate::state::{Action, StatusMessage};
use crate::utils::{parse_duration_minutes, validate_chips, validate_player_count};
use blind_clock::display::{BackgroundImageOptions, DisplaySettings, DisplaySettingsPatch, SoundType};
use blind_clock::level::Level;
use blind_clock::metrics::{format_clock, format_next_break, group_thousands, PlayerState, PlayerStatePatch};
use blind_clock::prizes::{
    dominant_prize_type, format_prize, ordinal, prize_pool_total, PrizeAmount, PrizeEntry, PrizeType,
};
use blind_clock::snapshot::TournamentSnapshot;
use blind_clock::TournamentStore;
use std::rc::Rc;
use wasm_bindgen::JsValue;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

/// Click handler that emits a fixed action.
fn emit_on_click(dispatch: &Callback<Action>, action: Action) -> Callback<MouseEvent> {
    let dispatch = dispatch.clone();
    Callback::from(move |_| dispatch.emit(action.clone()))
}

fn confirm(message: &str) -> bool {
    gloo_utils::window()
        .confirm_with_message(message)
        .unwrap_or(false)
}

fn format_timestamp(ms: u64) -> String {
    let date = js_sys::Date::new(&JsValue::from_f64(ms as f64));
    String::from(date.to_locale_string("default", &JsValue::UNDEFINED))
}

/// Renders the level heading, the countdown, stakes and the transport buttons.
pub fn render_timer(store: &TournamentStore, dispatch: &Callback<Action>) -> Html {
    let level = store.current_level();
    let index = store.current_level_index();
    let at_end = index >= store.levels().last_index();
    let remaining = store.remaining_seconds();

    let heading = if level.is_break {
        "Break".to_string()
    } else {
        format!("Level {}", index + 1)
    };
    let upcoming = store
        .upcoming_level()
        .map(Level::stakes_label)
        .unwrap_or_else(|| "Tournament End".to_string());

    html! {
        <div class={classes!("timer", (remaining == 0).then_some("expired"))}>
            <div class="level-heading">{ heading }</div>
            <div class="clock">{ format_clock(remaining as u64) }</div>
            if level.is_break {
                <div class="stakes break">{ "Break Time" }</div>
            } else {
                <>
                    <div class="stakes-label">{ "Blinds" }</div>
                    <div class="stakes">
                        { format!("{} / {}", level.small_blind, level.big_blind) }
                    </div>
                    if level.ante > 0 {
                        <div class="stakes-label">{ "Ante" }</div>
                        <div class="ante">{ level.ante }</div>
                    }
                </>
            }
            <div class="next-level">
                <div class="stakes-label">{ "Next Level" }</div>
                <div class="next-stakes">{ upcoming }</div>
            </div>
            <div class="controls">
                <button class="round" disabled={index == 0}
                    onclick={emit_on_click(dispatch, Action::PreviousLevel)}>{ "⏮" }</button>
                <button class={classes!("round", "primary", store.is_running().then_some("running"))}
                    onclick={emit_on_click(dispatch, Action::ToggleRunning)}>
                    { if store.is_running() { "⏸" } else { "▶" } }
                </button>
                <button class="round" disabled={at_end}
                    onclick={emit_on_click(dispatch, Action::NextLevel)}>{ "⏭" }</button>
                <button class="round"
                    onclick={emit_on_click(dispatch, Action::ResetTimer)}>{ "↺" }</button>
            </div>
        </div>
    }
}

/// Player counts, average stack and the next-break countdown.
pub fn render_stats(store: &TournamentStore) -> Html {
    let stats = store.player_stats();
    let rows = [
        ("Players", format!("{} / {}", stats.current_players, stats.total_players)),
        ("Average Stack", group_thousands(stats.average_stack)),
        ("Next Break", format_next_break(store.next_break())),
    ];

    html! {
        <div class="stats">
            { rows.into_iter().map(|(label, value)| html! {
                <div class="stat">
                    <div class="stat-label">{ label }</div>
                    <div class="stat-value">{ value }</div>
                </div>
            }).collect::<Html>() }
        </div>
    }
}

/// Prize ranking with a total in the most common prize type.
pub fn render_prize_board(store: &TournamentStore) -> Html {
    let prizes = store.prizes();
    let dominant = dominant_prize_type(prizes);
    let total: f64 = prizes.iter().filter_map(|p| p.amount.as_number()).sum();

    html! {
        <div class="prize-board">
            { prizes.iter().map(|prize| html! {
                <div class="prize-row" key={prize.position}>
                    <span class="prize-rank">{ ordinal(prize.position) }</span>
                    <span class="prize-amount">{ prize.display_amount() }</span>
                </div>
            }).collect::<Html>() }
            <div class="prize-total">
                <span>{ "Total" }</span>
                <span>{ format_prize(total, dominant) }</span>
            </div>
        </div>
    }
}

pub fn render_message(message: &Option<StatusMessage>, dispatch: &Callback<Action>) -> Html {
    let Some(message) = message else {
        return html! {};
    };
    let (class, text) = match message {
        StatusMessage::Success(text) => ("status success", text.clone()),
        StatusMessage::Error(text) => ("status error", text.clone()),
    };
    html! {
        <div class={class}>
            <span>{ text }</span>
            <button class="dismiss" onclick={emit_on_click(dispatch, Action::DismissMessage)}>{ "×" }</button>
        </div>
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Level structure

#[derive(Debug, Clone, Copy, PartialEq)]
enum LevelField {
    SmallBlind,
    BigBlind,
    Ante,
    Duration,
}

impl LevelField {
    fn label(self) -> &'static str {
        match self {
            LevelField::SmallBlind => "Small blind",
            LevelField::BigBlind => "Big blind",
            LevelField::Ante => "Ante",
            LevelField::Duration => "Duration",
        }
    }

    fn parse(self, input: &str) -> Result<u64, String> {
        match self {
            LevelField::Duration => parse_duration_minutes(input).map(u64::from),
            _ => validate_chips(input, self.label()),
        }
    }

    fn apply(self, level: &mut Level, value: u64) {
        match self {
            LevelField::SmallBlind => level.small_blind = value,
            LevelField::BigBlind => level.big_blind = value,
            LevelField::Ante => level.ante = value,
            LevelField::Duration => level.duration_minutes = value.min(u32::MAX as u64) as u32,
        }
    }

    fn read(self, level: &Level) -> u64 {
        match self {
            LevelField::SmallBlind => level.small_blind,
            LevelField::BigBlind => level.big_blind,
            LevelField::Ante => level.ante,
            LevelField::Duration => level.duration_minutes as u64,
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct LevelRowProps {
    pub level: Level,
    pub is_current: bool,
    pub is_last: bool,
    pub dispatch: Callback<Action>,
}

#[function_component(LevelRow)]
pub fn level_row(props: &LevelRowProps) -> Html {
    let index = props.level.id;

    let field_input = |field: LevelField| {
        let level = props.level.clone();
        let dispatch = props.dispatch.clone();
        let onchange = Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            match field.parse(&input.value()) {
                Ok(value) => {
                    let mut updated = level.clone();
                    field.apply(&mut updated, value);
                    dispatch.emit(Action::UpdateLevel(index, updated));
                }
                Err(msg) => dispatch.emit(Action::ReportError(msg)),
            }
        });
        html! {
            <input type="text" class={classes!("level-field", format!("{:?}", field).to_lowercase())}
                aria-label={field.label()}
                value={field.read(&props.level).to_string()}
                {onchange} />
        }
    };

    let on_toggle_break = {
        let level = props.level.clone();
        let dispatch = props.dispatch.clone();
        Callback::from(move |_: Event| {
            let mut updated = level.clone();
            updated.is_break = !updated.is_break;
            dispatch.emit(Action::UpdateLevel(index, updated));
        })
    };

    let on_delete = {
        let dispatch = props.dispatch.clone();
        Callback::from(move |_: MouseEvent| dispatch.emit(Action::DeleteLevel(index)))
    };

    html! {
        <div class={classes!("level-row", props.is_current.then_some("current"), props.level.is_break.then_some("break"))}>
            <span class="level-number">{ if props.level.is_break { "Break".to_string() } else { format!("Lv {}", index + 1) } }</span>
            if !props.level.is_break {
                <>
                    { field_input(LevelField::SmallBlind) }
                    { field_input(LevelField::BigBlind) }
                    { field_input(LevelField::Ante) }
                </>
            }
            { field_input(LevelField::Duration) }
            <label class="break-toggle">
                <input type="checkbox" checked={props.level.is_break} onchange={on_toggle_break} />
                { "Break" }
            </label>
            <button disabled={index == 0}
                onclick={emit_on_click(&props.dispatch, Action::MoveLevel { from: index, to: index.saturating_sub(1) })}>{ "↑" }</button>
            <button disabled={props.is_last}
                onclick={emit_on_click(&props.dispatch, Action::MoveLevel { from: index, to: index + 1 })}>{ "↓" }</button>
            <button class="danger" onclick={on_delete}>{ "Delete" }</button>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct LevelEditorProps {
    pub levels: Vec<Level>,
    pub current_index: usize,
    pub dispatch: Callback<Action>,
}

/// Blind structure editor: per-level fields, reordering, bulk duration.
#[function_component(LevelEditor)]
pub fn level_editor(props: &LevelEditorProps) -> Html {
    let bulk_text = use_state(String::new);

    let on_bulk_input = {
        let bulk_text = bulk_text.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            bulk_text.set(input.value());
        })
    };

    let on_bulk_apply = {
        let bulk_text = bulk_text.clone();
        let dispatch = props.dispatch.clone();
        Callback::from(move |_: MouseEvent| match parse_duration_minutes(&bulk_text) {
            Ok(minutes) => dispatch.emit(Action::SetAllDurations(minutes)),
            Err(msg) => dispatch.emit(Action::ReportError(msg)),
        })
    };

    let on_reset = {
        let dispatch = props.dispatch.clone();
        Callback::from(move |_: MouseEvent| {
            if confirm("Reset all blind levels?") {
                dispatch.emit(Action::ResetLevels);
            }
        })
    };

    let last = props.levels.len().saturating_sub(1);

    html! {
        <section class="panel level-editor">
            <h3>{ "Blind Settings" }</h3>
            <div class="level-list">
                { props.levels.iter().map(|level| html! {
                    <LevelRow key={level.id}
                        level={level.clone()}
                        is_current={level.id == props.current_index}
                        is_last={level.id == last}
                        dispatch={props.dispatch.clone()} />
                }).collect::<Html>() }
            </div>
            <div class="button-row">
                <button onclick={emit_on_click(&props.dispatch, Action::AddLevel)}>{ "Add Blind Level" }</button>
                <button onclick={emit_on_click(&props.dispatch, Action::AddBreak)}>{ "Add Break" }</button>
                <button class="danger" onclick={on_reset}>{ "Reset" }</button>
            </div>
            <div class="bulk-time">
                <label for="bulk-time">{ "Bulk Time Setting" }</label>
                <input id="bulk-time" type="text" placeholder="20"
                    value={(*bulk_text).clone()} oninput={on_bulk_input} />
                <button onclick={on_bulk_apply}>{ "Apply to All" }</button>
            </div>
        </section>
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Saved tournaments

#[derive(Properties, PartialEq)]
pub struct SnapshotPanelProps {
    pub tournament_name: String,
    pub snapshots: Vec<TournamentSnapshot>,
    pub dispatch: Callback<Action>,
}

#[function_component(SnapshotPanel)]
pub fn snapshot_panel(props: &SnapshotPanelProps) -> Html {
    let on_name_input = {
        let dispatch = props.dispatch.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            dispatch.emit(Action::SetTournamentName(input.value()));
        })
    };

    let on_save = {
        let dispatch = props.dispatch.clone();
        let name = props.tournament_name.clone();
        Callback::from(move |_: MouseEvent| dispatch.emit(Action::SaveSnapshot(name.clone())))
    };

    html! {
        <section class="panel snapshots">
            <h3>{ "Saved Tournaments" }</h3>
            <div class="form-group">
                <label for="tournament-name">{ "Tournament Name" }</label>
                <input id="tournament-name" type="text" placeholder="Enter tournament name"
                    value={props.tournament_name.clone()} oninput={on_name_input} />
                <button onclick={on_save}>{ "Save" }</button>
            </div>
            if props.snapshots.is_empty() {
                <p class="empty">{ "No saved tournaments" }</p>
            } else {
                <ul class="snapshot-list">
                    { props.snapshots.iter().map(|snapshot| {
                        let id = snapshot.id.clone();
                        let on_delete = {
                            let dispatch = props.dispatch.clone();
                            let id = id.clone();
                            Callback::from(move |_: MouseEvent| {
                                if confirm("Delete this saved tournament?") {
                                    dispatch.emit(Action::DeleteSnapshot(id.clone()));
                                }
                            })
                        };
                        html! {
                            <li key={snapshot.id.clone()}>
                                <span class="snapshot-name">{ &snapshot.name }</span>
                                <span class="snapshot-meta">
                                    { format!("{} levels · {}", snapshot.levels.len(), format_timestamp(snapshot.created_at)) }
                                </span>
                                <button onclick={emit_on_click(&props.dispatch, Action::LoadSnapshot(id))}>{ "Load" }</button>
                                <button class="danger" onclick={on_delete}>{ "Delete" }</button>
                            </li>
                        }
                    }).collect::<Html>() }
                </ul>
            }
        </section>
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Players

#[derive(Properties, PartialEq)]
pub struct NumberFieldProps {
    pub label: AttrValue,
    pub value: u64,
    pub on_valid: Callback<u64>,
    /// Validate as a head count instead of a chip amount.
    #[prop_or_default]
    pub players: bool,
}

#[function_component(NumberField)]
pub fn number_field(props: &NumberFieldProps) -> Html {
    let label = props.label.to_string();
    let players = props.players;
    let parse: Rc<dyn Fn(&str) -> Result<u64, String>> = Rc::new(move |input: &str| {
        if players {
            validate_player_count(input, &label)
        } else {
            validate_chips(input, &label)
        }
    });
    let field = use_validated_input(props.value, parse, props.on_valid.clone());

    let onchange = {
        let on_commit = field.on_commit.clone();
        Callback::from(move |_: Event| on_commit.emit(()))
    };
    let onkeydown = {
        let on_commit = field.on_commit.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" {
                on_commit.emit(());
            }
        })
    };

    html! {
        <div class="form-group">
            <label>{ props.label.clone() }</label>
            <input type="text" inputmode="numeric"
                value={field.text.clone()}
                oninput={field.on_text_input.clone()}
                {onchange}
                {onkeydown} />
            if let Some(err) = &field.error {
                <div class="error-message">{ err }</div>
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct PlayerPanelProps {
    pub players: PlayerState,
    pub dispatch: Callback<Action>,
}

#[function_component(PlayerPanel)]
pub fn player_panel(props: &PlayerPanelProps) -> Html {
    let patch_with = |make: fn(u64) -> PlayerStatePatch| {
        let dispatch = props.dispatch.clone();
        Callback::from(move |value: u64| dispatch.emit(Action::UpdatePlayers(make(value))))
    };
    let stats = props.players.stats();

    html! {
        <section class="panel players">
            <h3>{ "Player Management" }</h3>
            <NumberField label="Initial Players" players=true value={props.players.initial_players}
                on_valid={patch_with(|v| PlayerStatePatch { initial_players: Some(v), ..Default::default() })} />
            <NumberField label="Rebuys" players=true value={props.players.rebuys}
                on_valid={patch_with(|v| PlayerStatePatch { rebuys: Some(v), ..Default::default() })} />
            <NumberField label="Players Out" players=true value={props.players.players_out}
                on_valid={patch_with(|v| PlayerStatePatch { players_out: Some(v), ..Default::default() })} />
            <NumberField label="Initial Stack" value={props.players.initial_stack}
                on_valid={patch_with(|v| PlayerStatePatch { initial_stack: Some(v), ..Default::default() })} />
            <p class="summary">
                { format!("Remaining {} of {} · Average stack {}",
                    stats.current_players, stats.total_players, group_thousands(stats.average_stack)) }
            </p>
        </section>
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Prizes

#[derive(Properties, PartialEq)]
pub struct PrizeEditorProps {
    pub prizes: Vec<PrizeEntry>,
    pub dispatch: Callback<Action>,
}

#[function_component(PrizeEditor)]
pub fn prize_editor(props: &PrizeEditorProps) -> Html {
    let row = |prize: &PrizeEntry| {
        let position = prize.position;
        let on_type = {
            let dispatch = props.dispatch.clone();
            Callback::from(move |e: Event| {
                let select: HtmlSelectElement = e.target_unchecked_into();
                if let Some(prize_type) = PrizeType::from_code(&select.value()) {
                    dispatch.emit(Action::SetPrizeType(position, prize_type));
                }
            })
        };
        let on_amount = {
            let dispatch = props.dispatch.clone();
            Callback::from(move |e: Event| {
                let input: HtmlInputElement = e.target_unchecked_into();
                dispatch.emit(Action::SetPrizeAmount(position, PrizeAmount::Text(input.value())));
            })
        };
        let amount_text = match &prize.amount {
            PrizeAmount::Number(n) => n.to_string(),
            PrizeAmount::Text(t) => t.clone(),
        };
        let placeholder = if prize.prize_type == PrizeType::Item { "Prize item" } else { "0" };

        html! {
            <div class="prize-row" key={position}>
                <span class="prize-rank">{ ordinal(position) }</span>
                <select onchange={on_type}>
                    { PrizeType::ALL.into_iter().map(|t| html! {
                        <option value={t.code()} selected={t == prize.prize_type}>{ t.code() }</option>
                    }).collect::<Html>() }
                </select>
                <input type="text" placeholder={placeholder} value={amount_text} onchange={on_amount} />
                <button class="danger"
                    onclick={emit_on_click(&props.dispatch, Action::DeletePrize(position))}>{ "Delete" }</button>
            </div>
        }
    };

    let totals = PrizeType::ALL
        .into_iter()
        .filter(|t| *t != PrizeType::Item && props.prizes.iter().any(|p| p.prize_type == *t))
        .map(|t| format_prize(prize_pool_total(&props.prizes, t), t))
        .collect::<Vec<_>>()
        .join(" + ");

    html! {
        <section class="panel prizes">
            <h3>{ "Prize Pool" }</h3>
            { props.prizes.iter().map(row).collect::<Html>() }
            <div class="button-row">
                <button onclick={emit_on_click(&props.dispatch, Action::AddPrize)}>{ "Add Prize" }</button>
                <button class="danger" onclick={emit_on_click(&props.dispatch, Action::ResetPrizes)}>{ "Reset" }</button>
            </div>
            if !totals.is_empty() {
                <p class="summary">{ format!("Total: {}", totals) }</p>
            }
        </section>
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Display

#[derive(Properties, PartialEq)]
pub struct DisplayPanelProps {
    pub settings: DisplaySettings,
    pub dispatch: Callback<Action>,
}

#[function_component(DisplayPanel)]
pub fn display_panel(props: &DisplayPanelProps) -> Html {
    let settings = &props.settings;

    let text_patch = |make: fn(String) -> DisplaySettingsPatch| {
        let dispatch = props.dispatch.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            dispatch.emit(Action::UpdateDisplay(make(input.value())));
        })
    };

    let image_option = |make: fn(BackgroundImageOptions, f64) -> BackgroundImageOptions| {
        let dispatch = props.dispatch.clone();
        let current = settings.background_image_options;
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let value = input.value_as_number();
            if value.is_finite() {
                dispatch.emit(Action::UpdateDisplay(DisplaySettingsPatch {
                    background_image_options: Some(make(current, value)),
                    ..Default::default()
                }));
            }
        })
    };

    let on_sound_toggle = {
        let dispatch = props.dispatch.clone();
        let enabled = settings.sound_enabled;
        Callback::from(move |_: Event| {
            dispatch.emit(Action::UpdateDisplay(DisplaySettingsPatch {
                sound_enabled: Some(!enabled),
                ..Default::default()
            }))
        })
    };

    let sound_select = |selected: SoundType, warning: bool| {
        let dispatch = props.dispatch.clone();
        let (current_warning, current_change) =
            (settings.warning_sound_type, settings.level_change_sound_type);
        let onchange = Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            if let Some(sound) = SoundType::from_id(&select.value()) {
                let action = if warning {
                    Action::UpdateSound(sound, current_change)
                } else {
                    Action::UpdateSound(current_warning, sound)
                };
                dispatch.emit(action);
            }
        });
        html! {
            <select {onchange}>
                { SoundType::ALL.into_iter().map(|s| html! {
                    <option value={s.id()} selected={s == selected}>{ s.id() }</option>
                }).collect::<Html>() }
            </select>
        }
    };

    html! {
        <section class="panel display">
            <h3>{ "Display Settings" }</h3>
            <div class="form-group">
                <label>{ "Background Color" }</label>
                <input type="color" value={settings.background_color.clone()}
                    onchange={text_patch(|v| DisplaySettingsPatch { background_color: Some(v), ..Default::default() })} />
            </div>
            <div class="form-group">
                <label>{ "Text Color" }</label>
                <input type="color" value={settings.text_color.clone()}
                    onchange={text_patch(|v| DisplaySettingsPatch { text_color: Some(v), ..Default::default() })} />
            </div>
            <div class="form-group">
                <label>{ "Background Image URL" }</label>
                <input type="text" value={settings.background_image.clone()}
                    onchange={text_patch(|v| DisplaySettingsPatch { background_image: Some(v), ..Default::default() })} />
            </div>
            <div class="form-group">
                <label>{ format!("Image Opacity ({:.1})", settings.background_image_options.opacity) }</label>
                <input type="range" min="0" max="1" step="0.1"
                    value={settings.background_image_options.opacity.to_string()}
                    onchange={image_option(|o, v| BackgroundImageOptions { opacity: v, ..o })} />
            </div>
            <div class="form-group">
                <label>{ format!("Image Blur ({}px)", settings.background_image_options.blur) }</label>
                <input type="range" min="0" max="20" step="1"
                    value={settings.background_image_options.blur.to_string()}
                    onchange={image_option(|o, v| BackgroundImageOptions { blur: v, ..o })} />
            </div>
            <div class="form-group">
                <label>
                    <input type="checkbox" checked={settings.sound_enabled} onchange={on_sound_toggle} />
                    { "Sound enabled" }
                </label>
            </div>
            <div class="form-group">
                <label>{ "Level end sound" }</label>
                { sound_select(settings.warning_sound_type, true) }
            </div>
            <div class="form-group">
                <label>{ "Level change sound" }</label>
                { sound_select(settings.level_change_sound_type, false) }
            </div>
        </section>
    }
}
