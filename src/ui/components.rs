/// Reusable UI components

use patternfly_yew::prelude::*;
use yew::prelude::*;

use crate::link_data::LinkEntry;
use crate::storage::PoolSnapshot;

#[derive(Properties, PartialEq)]
pub struct CounterBarProps {
    pub snapshot: PoolSnapshot,
}

#[function_component(CounterBar)]
pub fn counter_bar(props: &CounterBarProps) -> Html {
    let counts = props.snapshot.counts;

    html! {
        <div class="counter-bar">
            <span class="counter">{"Saved "}<strong>{props.snapshot.total()}</strong></span>
            <span class="counter">{"Imported "}<strong>{counts.imported}</strong></span>
            <span class="counter">{"Captured "}<strong>{counts.captured}</strong></span>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct LinkCardProps {
    pub entry: LinkEntry,
    pub on_visit: Callback<LinkEntry>,
    pub on_next: Callback<()>,
    #[prop_or(false)]
    pub disabled: bool,
}

/// One saved link with Visit / Next buttons
#[function_component(LinkCard)]
pub fn link_card(props: &LinkCardProps) -> Html {
    let favicon_failed = use_state(|| false);
    let entry = &props.entry;

    let on_favicon_error = {
        let favicon_failed = favicon_failed.clone();
        Callback::from(move |_: Event| favicon_failed.set(true))
    };

    let favicon = match entry.favicon_url() {
        Some(src) if !*favicon_failed => html! {
            <img class="card-favicon" src={src} alt="" onerror={on_favicon_error} />
        },
        _ => html! {},
    };

    html! {
        <div class="card">
            <div class="card-title">
                {favicon}
                <span>{&entry.title}</span>
            </div>
            <div class="site-host">{entry.host()}</div>
            <div class="btn-row">
                <Button
                    onclick={props.on_visit.reform({
                        let entry = entry.clone();
                        move |_| entry.clone()
                    })}
                    disabled={props.disabled}
                    variant={ButtonVariant::Primary}
                >
                    {"Visit page"}
                </Button>
                <Button
                    onclick={props.on_next.reform(|_| ())}
                    disabled={props.disabled}
                    variant={ButtonVariant::Secondary}
                >
                    {"Next random"}
                </Button>
            </div>
        </div>
    }
}
