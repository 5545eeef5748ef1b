// SPDX-License-Identifier: MIT
//
// Blattwerk — desktop image-to-PDF binder.
//
// Entry point. Initialises logging, the service layer, app state, and
// launches the single-page Dioxus UI.

mod pages;
mod services;
mod state;
mod theme;

use dioxus::prelude::*;

use pages::convert::Convert;
use services::app_services::AppServices;
use state::AppState;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Blattwerk starting");

    dioxus::launch(app);
}

/// Root component. One page, no routing.
fn app() -> Element {
    let svc = use_hook(AppServices::init);

    use_context_provider(|| svc.clone());
    use_context_provider(|| Signal::new(AppState::new(&svc)));

    rsx! {
        Convert {}
    }
}
