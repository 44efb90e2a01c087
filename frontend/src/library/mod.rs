pub mod components;
pub mod filters;

use crate::library::components::{ClipDetail, ClipGrid};
use crate::library::filters::FilterPanel;
use crate::router::{NavBar, Route};
use crate::services::LibraryServices;
use clip_library::controller::Phase;
use clip_library::filter::{ClipFilter, SortMode, TagFacet};
use clip_library::format::format_clip_count;
use clip_library::models::{ClipType, ViewVariant};
use log::info;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct LibraryPageProps {
    pub favorites_only: bool,
}

#[function_component(LibraryPage)]
pub fn library_page(props: &LibraryPageProps) -> Html {
    let services = use_context::<LibraryServices>().expect("LibraryServices context missing");
    let variant = ViewVariant::from_favorites_only(props.favorites_only);
    let force_update = use_force_update();

    // The controller lives as long as the page; every state change re-renders.
    let session = {
        let services = services.clone();
        let force_update = force_update.clone();
        use_state(move || services.session(variant, Rc::new(move || force_update.force_update())))
    };
    let filter = use_state(ClipFilter::default);
    let sort = use_state(SortMode::default);

    {
        let session = (*session).clone();
        use_effect_with((), move |_| {
            let runner = session.clone();
            spawn_local(async move {
                runner.start().await;
            });
            move || session.guard().unmount()
        });
    }

    let on_select = {
        let session = (*session).clone();
        let force_update = force_update.clone();
        Callback::from(move |clip_id: String| {
            if session.controller().borrow_mut().select_clip(&clip_id) {
                force_update.force_update();
            }
        })
    };

    let on_dismiss = {
        let session = (*session).clone();
        let force_update = force_update.clone();
        Callback::from(move |_| {
            session.controller().borrow_mut().dismiss_favorite_error();
            force_update.force_update();
        })
    };

    let on_close = {
        let session = (*session).clone();
        let force_update = force_update.clone();
        Callback::from(move |_| {
            session.controller().borrow_mut().clear_selection();
            force_update.force_update();
        })
    };

    let on_toggle_favorite = {
        let session = (*session).clone();
        Callback::from(move |clip_id: String| {
            let session = session.clone();
            spawn_local(async move {
                if session.toggle_favorite(&clip_id).await.is_none() {
                    info!("Ignored favorite toggle for {clip_id}");
                }
            });
        })
    };

    let on_retry = {
        let session = (*session).clone();
        Callback::from(move |_| {
            let session = session.clone();
            spawn_local(async move {
                session.retry().await;
            });
        })
    };

    let on_search = {
        let filter = filter.clone();
        Callback::from(move |search: String| {
            filter.set(ClipFilter {
                search,
                ..(*filter).clone()
            });
        })
    };

    let on_toggle_type = {
        let filter = filter.clone();
        Callback::from(move |clip_type: ClipType| {
            let mut next = (*filter).clone();
            next.toggle_type(clip_type);
            filter.set(next);
        })
    };

    let on_toggle_tag = {
        let filter = filter.clone();
        Callback::from(move |(facet, value): (TagFacet, String)| {
            let mut next = (*filter).clone();
            next.toggle_tag(facet, &value);
            filter.set(next);
        })
    };

    let on_sort_change = {
        let sort = sort.clone();
        Callback::from(move |mode: SortMode| sort.set(mode))
    };

    let on_clear = {
        let filter = filter.clone();
        Callback::from(move |_| filter.set(ClipFilter::default()))
    };

    let controller = session.controller().borrow();
    let visible: Vec<_> = controller
        .visible_clips(&filter, *sort)
        .into_iter()
        .cloned()
        .collect();
    let pending: Vec<String> = controller.pending_favorites().map(str::to_string).collect();
    let phase = controller.phase();
    let loaded = controller.clips().len();

    let (title, active) = if props.favorites_only {
        ("Favorites", Route::Favorites)
    } else {
        ("Clip Library", Route::Library)
    };

    let status = match phase {
        Phase::Uninitialized | Phase::HydratingFromCache | Phase::LoadingFirstPage => {
            html! { <p class="text-gray-600">{ "Loading clips..." }</p> }
        }
        _ => html! {
            <p class="text-sm text-gray-600">
                { format!("Showing {} of {}", visible.len(), format_clip_count(loaded)) }
                {
                    if phase == Phase::LoadingMore {
                        html! { <span class="ml-2 italic">{ "Loading more..." }</span> }
                    } else if controller.has_more() {
                        html! { <span class="ml-2 italic">{ "More available" }</span> }
                    } else {
                        html! {}
                    }
                }
            </p>
        },
    };

    // Page failures need a retry; a failed favorite toggle only needs dismissing.
    let error = match (controller.page_error(), controller.favorite_error()) {
        (Some(message), _) => html! {
            <div class="p-3 mb-4 bg-red-100 text-red-700 rounded flex justify-between items-center">
                <span>{ message }</span>
                <button class="ml-4 underline" onclick={on_retry}>{ "Retry" }</button>
            </div>
        },
        (None, Some(message)) => html! {
            <div class="p-3 mb-4 bg-yellow-100 text-yellow-800 rounded flex justify-between items-center">
                <span>{ message }</span>
                <button class="ml-4 underline" onclick={on_dismiss}>{ "Dismiss" }</button>
            </div>
        },
        (None, None) => html! {},
    };

    let detail = match controller.selected_clip() {
        Some(clip) => html! {
            <ClipDetail
                clip={clip.clone()}
                stream_url={services.endpoints().clip_stream_url(&clip.id)}
                pending={pending.contains(&clip.id)}
                on_close={on_close}
                on_toggle_favorite={on_toggle_favorite.clone()}
            />
        },
        None => html! {},
    };

    let options = controller.options().clone();
    let show_grid = phase != Phase::LoadingFirstPage && phase != Phase::Error;
    drop(controller);

    html! {
        <div class="min-h-screen bg-gray-100 p-4">
            <div class="max-w-6xl mx-auto">
                <NavBar {active} />
                <h1 class="text-3xl font-bold text-gray-800 mb-4">{ title }</h1>
                { error }
                <div class="flex gap-6">
                    <div class="w-64 shrink-0">
                        <FilterPanel
                            filter={(*filter).clone()}
                            sort={*sort}
                            {options}
                            {on_search}
                            {on_toggle_type}
                            {on_toggle_tag}
                            {on_sort_change}
                            {on_clear}
                        />
                    </div>
                    <div class="flex-grow space-y-4">
                        { status }
                        {
                            if show_grid {
                                html! {
                                    <ClipGrid
                                        clips={visible}
                                        {pending}
                                        {on_select}
                                        {on_toggle_favorite}
                                    />
                                }
                            } else {
                                html! {}
                            }
                        }
                    </div>
                </div>
            </div>
            { detail }
        </div>
    }
}
