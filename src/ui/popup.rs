/// Popup UI for Tab Yard extension

use std::rc::Rc;

use patternfly_yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::link_data::LinkEntry;
use crate::operations::{capture_open_tabs, import_files, messages};
use crate::picker::{visit, CardState, OsRandom};
use crate::storage::{LinkPool, PoolSnapshot};
use crate::ui::bridge::{read_selected_files, ChromeStorage, ChromeTabs};
use crate::ui::components::{CounterBar, LinkCard};

type Pool = Rc<LinkPool<ChromeStorage>>;

#[derive(Clone, PartialEq)]
enum AppState {
    Idle,
    Loading(String),
    Error(String),
}

#[function_component(App)]
pub fn app() -> Html {
    let pool: Pool = use_memo((), |_| LinkPool::new(ChromeStorage, js_sys::Date::now));
    let state = use_state(|| AppState::Loading("Loading saved links...".to_string()));
    let snapshot = use_state(PoolSnapshot::default);
    let card = use_state(|| CardState::Idle);
    let status = use_state(|| None::<String>);
    let import_input = use_node_ref();

    // Load pool on mount
    {
        let pool = pool.clone();
        let state = state.clone();
        let snapshot = snapshot.clone();

        use_effect_with((), move |_| {
            spawn_local(async move {
                match pool.load().await {
                    Ok(data) => {
                        snapshot.set(data);
                        state.set(AppState::Idle);
                    }
                    Err(e) => {
                        state.set(AppState::Error(format!("Failed to load: {}", e)));
                    }
                }
            });
            || ()
        });
    }

    // Capture tabs handler
    let on_capture = {
        let pool = pool.clone();
        let state = state.clone();
        let snapshot = snapshot.clone();
        let status = status.clone();
        let card = card.clone();

        Callback::from(move |_| {
            let pool = pool.clone();
            let state = state.clone();
            let snapshot = snapshot.clone();
            let status = status.clone();
            let card = card.clone();

            state.set(AppState::Loading("Capturing tabs...".to_string()));

            spawn_local(async move {
                let result = capture_open_tabs(&*pool, &ChromeTabs).await;
                snapshot.set(pool.snapshot());
                match result {
                    Ok(added) => {
                        card.set(CardState::Idle);
                        status.set(Some(messages::captured(added)));
                        state.set(AppState::Idle);
                    }
                    Err(e) => {
                        state.set(AppState::Error(format!("Capture failed: {}", e)));
                    }
                }
            });
        })
    };

    // Import button opens the hidden file input
    let on_import_click = {
        let import_input = import_input.clone();
        Callback::from(move |_| {
            if let Some(input) = import_input.cast::<HtmlInputElement>() {
                input.click();
            }
        })
    };

    // Import files handler
    let on_import_change = {
        let pool = pool.clone();
        let state = state.clone();
        let snapshot = snapshot.clone();
        let status = status.clone();
        let card = card.clone();

        Callback::from(move |e: Event| {
            let Some(input) = e.target_dyn_into::<HtmlInputElement>() else {
                return;
            };
            if input.files().map_or(0, |files| files.length()) == 0 {
                return;
            }

            let pool = pool.clone();
            let state = state.clone();
            let snapshot = snapshot.clone();
            let status = status.clone();
            let card = card.clone();

            state.set(AppState::Loading("Importing...".to_string()));

            spawn_local(async move {
                let result = match read_selected_files(&input).await {
                    Ok(files) => import_files(&*pool, &files).await.map_err(|e| e.to_string()),
                    Err(e) => Err(e),
                };
                input.set_value("");
                snapshot.set(pool.snapshot());

                match result {
                    Ok(report) => {
                        card.set(CardState::Idle);
                        status.set(Some(messages::imported(report.added)));
                        state.set(AppState::Idle);
                    }
                    Err(e) => {
                        state.set(AppState::Error(format!("Import failed: {}", e)));
                    }
                }
            });
        })
    };

    // Random card handler, also used for "Next random"
    let on_random = {
        let pool = pool.clone();
        let card = card.clone();
        let status = status.clone();

        Callback::from(move |_: ()| {
            let next = CardState::draw(&pool.snapshot().entries, &mut OsRandom);
            if next == CardState::Exhausted {
                status.set(Some(messages::NOTHING_SAVED.to_string()));
            } else {
                status.set(None);
            }
            card.set(next);
        })
    };

    // Visit handler: remove from storage first, then open
    let on_visit = {
        let pool = pool.clone();
        let state = state.clone();
        let snapshot = snapshot.clone();
        let status = status.clone();
        let card = card.clone();

        Callback::from(move |entry: LinkEntry| {
            let pool = pool.clone();
            let state = state.clone();
            let snapshot = snapshot.clone();
            let status = status.clone();
            let card = card.clone();

            state.set(AppState::Loading("Opening...".to_string()));

            spawn_local(async move {
                let result = visit(&*pool, &ChromeTabs, &entry, &mut OsRandom).await;
                let current = pool.snapshot();
                if !current.contains(&entry.url) {
                    card.set(CardState::Idle);
                }
                snapshot.set(current);

                match result {
                    Ok(next) => {
                        if next == CardState::Exhausted {
                            status.set(Some(messages::ALL_VISITED.to_string()));
                        }
                        card.set(next);
                        state.set(AppState::Idle);
                    }
                    Err(e) => {
                        state.set(AppState::Error(format!("Visit failed: {}", e)));
                    }
                }
            });
        })
    };

    let is_busy = matches!(*state, AppState::Loading(_));

    html! {
        <div class="padding-20">
            <h1 class="popup-title">{"Tab Yard"}</h1>

            <CounterBar snapshot={(*snapshot).clone()} />

            <div class="flex-column-gap">
                <Button onclick={on_capture} disabled={is_busy} variant={ButtonVariant::Secondary} block={true}>
                    {"Capture Tabs"}
                </Button>
                <Button onclick={on_import_click} disabled={is_busy} variant={ButtonVariant::Secondary} block={true}>
                    {"Import Tabs"}
                </Button>
                <input
                    ref={import_input}
                    type="file"
                    accept=".json,application/json"
                    multiple={true}
                    hidden={true}
                    onchange={on_import_change}
                />
                <Button onclick={on_random.reform(|_| ())} disabled={is_busy} variant={ButtonVariant::Primary} block={true}>
                    {"Random Card"}
                </Button>
            </div>

            // Status display
            {match &*state {
                AppState::Loading(msg) => html! {
                    <div class="loading-text-center">
                        <Spinner />
                        <p class="loading-text">{msg}</p>
                    </div>
                },
                AppState::Error(err) => html! {
                    <div class="message-top-margin">
                        <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                            {err.clone()}
                        </Alert>
                    </div>
                },
                AppState::Idle => html! {}
            }}

            // Result area
            <div id="result" class="result">
                {match (card.card(), (*status).clone()) {
                    (Some(entry), _) => html! {
                        <LinkCard
                            key={entry.url.clone()}
                            entry={entry.clone()}
                            on_visit={on_visit.clone()}
                            on_next={on_random.clone()}
                            disabled={is_busy}
                        />
                    },
                    (None, Some(text)) => html! { <p class="message-text">{text}</p> },
                    (None, None) => html! {},
                }}
            </div>
        </div>
    }
}
