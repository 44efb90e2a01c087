use crate::library::LibraryPage;
use crate::videos::VideosPage;
use yew::prelude::*;
use yew_router::prelude::*;

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Library,
    #[at("/favorites")]
    Favorites,
    #[at("/videos")]
    Videos,
    #[not_found]
    #[at("/404")]
    NotFound,
}

pub fn switch(routes: Route) -> Html {
    match routes {
        // Keys force a fresh page (and controller) when switching variants.
        Route::Library => html! { <LibraryPage key="all" favorites_only={false} /> },
        Route::Favorites => html! { <LibraryPage key="favorites" favorites_only={true} /> },
        Route::Videos => html! { <VideosPage /> },
        Route::NotFound => html! {
            <div class="min-h-screen flex items-center justify-center bg-gray-700">
                <div class="bg-white p-8 rounded-lg shadow-lg text-center">
                    <h1 class="text-2xl font-bold text-gray-800 mb-4">{"404 - Page Not Found"}</h1>
                    <Link<Route> to={Route::Library} classes="text-blue-600 hover:underline">
                        {"Go back to the library"}
                    </Link<Route>>
                </div>
            </div>
        },
    }
}

#[derive(Properties, PartialEq)]
pub struct NavBarProps {
    pub active: Route,
}

#[function_component(NavBar)]
pub fn nav_bar(props: &NavBarProps) -> Html {
    let link = |route: Route, label: &'static str| {
        let classes = if route == props.active {
            "px-3 py-2 rounded bg-blue-600 text-white"
        } else {
            "px-3 py-2 rounded text-blue-600 hover:underline"
        };
        html! {
            <Link<Route> to={route} classes={classes}>{label}</Link<Route>>
        }
    };

    html! {
        <nav class="flex gap-2 mb-6">
            { link(Route::Library, "All clips") }
            { link(Route::Favorites, "Favorites") }
            { link(Route::Videos, "Videos") }
        </nav>
    }
}
