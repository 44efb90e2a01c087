mod api;
mod config;
mod library;
mod logger;
mod router;
mod services;
mod storage;
mod videos;

use crate::config::APP_CONFIG;
use crate::logger::init_logger;
use crate::router::{switch, Route};
use crate::services::LibraryServices;
use yew::prelude::*;
use yew_router::prelude::*;

#[function_component(App)]
pub fn app() -> Html {
    let services = use_state(|| LibraryServices::new(&APP_CONFIG.api_base_url));

    html! {
        <ContextProvider<LibraryServices> context={(*services).clone()}>
            <BrowserRouter>
                <Switch<Route> render={switch} />
            </BrowserRouter>
        </ContextProvider<LibraryServices>>
    }
}

fn main() {
    init_logger(APP_CONFIG.debug_mode);

    log::info!(
        "NAME: \"{}\", API: \"{}\" DEBUG: \"{}\"",
        APP_CONFIG.app_name,
        APP_CONFIG.api_base_url,
        APP_CONFIG.debug_mode
    );

    yew::Renderer::<App>::new().render();
}
