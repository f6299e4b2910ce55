//! Application settings built on `PubSub`.
//!
//! Run with `RUST_LOG=debug` to see the subscription log.

use serde::Serialize;
use state_pubsub::{Handler, InterestSet, Observable, PubSub, PubSubConfig, SubscriptionManager};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Message {
    SetTheme,
    SetFont,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
enum Font {
    Monospaced,
    Serif,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
enum Theme {
    Light,
    Dark,
}

#[derive(Clone, Debug, Serialize)]
struct State {
    font: Font,
    theme: Theme,
}

/// Settings store. Callers may subscribe; only the named setters publish.
struct Settings {
    hub: PubSub<Message, State>,
}

impl Settings {
    fn new(initial: State) -> Self {
        let config = PubSubConfig {
            name: "settings".to_string(),
            ..Default::default()
        };
        Self {
            hub: PubSub::with_config(initial, config),
        }
    }

    fn set_light_theme(&self) -> usize {
        self.hub.publish_with(Message::SetTheme, |prev| State {
            theme: Theme::Light,
            ..prev.clone()
        })
    }

    fn set_monospaced_font(&self) -> usize {
        self.hub.publish_with(Message::SetFont, |prev| State {
            font: Font::Monospaced,
            ..prev.clone()
        })
    }

    fn current(&self) -> State {
        (*self.hub.latest_state()).clone()
    }
}

impl Observable<Message, State> for Settings {
    fn subscriptions(&self) -> &SubscriptionManager<Message, State> {
        self.hub.subscriptions()
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    let settings = Settings::new(State {
        font: Font::Serif,
        theme: Theme::Dark,
    });

    let on_theme_changed = Handler::new(|state: &State, _: &Message| {
        info!(theme = ?state.theme, "theme changed");
    });
    let on_any_change = Handler::new(|state: &State, message: &Message| {
        info!(?message, ?state, "settings changed");
    });

    let theme_sub = settings.subscribe(Some(Message::SetTheme), &on_theme_changed);
    settings.subscribe(InterestSet::all(), &on_any_change);

    settings.set_light_theme();
    settings.set_monospaced_font();

    settings.unsubscribe(theme_sub)?;
    let state = serde_json::to_string(&settings.current())?;
    info!(remaining = settings.subscription_count(), %state, "done");

    Ok(())
}
