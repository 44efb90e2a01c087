use clip_library::format::{format_duration, format_iso8601_date};
use clip_library::models::Clip;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct FavoriteButtonProps {
    pub clip_id: AttrValue,
    pub is_favorite: bool,
    pub pending: bool,
    pub on_toggle: Callback<String>,
}

#[function_component(FavoriteButton)]
pub fn favorite_button(props: &FavoriteButtonProps) -> Html {
    let onclick = {
        let on_toggle = props.on_toggle.clone();
        let clip_id = props.clip_id.to_string();
        Callback::from(move |e: MouseEvent| {
            // Cards are clickable too.
            e.stop_propagation();
            on_toggle.emit(clip_id.clone());
        })
    };

    html! {
        <button
            class="text-xl disabled:opacity-50"
            title={if props.is_favorite { "Remove from favorites" } else { "Add to favorites" }}
            disabled={props.pending}
            {onclick}
        >
            { if props.is_favorite { "★" } else { "☆" } }
        </button>
    }
}

#[derive(Properties, PartialEq)]
pub struct ClipCardProps {
    pub clip: Clip,
    pub pending: bool,
    pub on_select: Callback<String>,
    pub on_toggle_favorite: Callback<String>,
}

#[function_component(ClipCard)]
pub fn clip_card(props: &ClipCardProps) -> Html {
    let clip = &props.clip;
    let onclick = {
        let on_select = props.on_select.clone();
        let clip_id = clip.id.clone();
        Callback::from(move |_| on_select.emit(clip_id.clone()))
    };

    html! {
        <div class="bg-white rounded-lg shadow p-4 cursor-pointer hover:shadow-md" {onclick}>
            {
                if let Some(thumbnail) = &clip.thumbnail_url {
                    html! { <img src={thumbnail.clone()} alt={clip.title.clone()} class="w-full rounded mb-2" loading="lazy" /> }
                } else {
                    html! {}
                }
            }
            <div class="flex justify-between items-start gap-2">
                <h3 class="font-semibold text-gray-800">{ &clip.title }</h3>
                <FavoriteButton
                    clip_id={clip.id.clone()}
                    is_favorite={clip.is_favorite}
                    pending={props.pending}
                    on_toggle={props.on_toggle_favorite.clone()}
                />
            </div>
            <p class="text-xs text-gray-500 mt-1">
                { format!("{} · {}", clip.clip_type.display_name(), format_duration(clip.duration)) }
            </p>
            <div class="flex flex-wrap gap-1 mt-2">
                { for clip.main_tags.iter().map(|tag| html! {
                    <span class="px-2 py-0.5 text-xs rounded-full bg-gray-200 text-gray-700">{ tag }</span>
                }) }
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ClipGridProps {
    pub clips: Vec<Clip>,
    pub pending: Vec<String>,
    pub on_select: Callback<String>,
    pub on_toggle_favorite: Callback<String>,
}

#[function_component(ClipGrid)]
pub fn clip_grid(props: &ClipGridProps) -> Html {
    if props.clips.is_empty() {
        return html! {
            <p class="text-gray-600 italic">{ "No clips match the current filters." }</p>
        };
    }

    html! {
        <div class="grid gap-4 grid-cols-1 sm:grid-cols-2 lg:grid-cols-3">
            {
                for props.clips.iter().map(|clip| html! {
                    <ClipCard
                        key={clip.id.clone()}
                        clip={clip.clone()}
                        pending={props.pending.contains(&clip.id)}
                        on_select={props.on_select.clone()}
                        on_toggle_favorite={props.on_toggle_favorite.clone()}
                    />
                })
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ClipDetailProps {
    pub clip: Clip,
    pub stream_url: AttrValue,
    pub pending: bool,
    pub on_close: Callback<()>,
    pub on_toggle_favorite: Callback<String>,
}

/// Modal with the clip player and its metadata.
#[function_component(ClipDetail)]
pub fn clip_detail(props: &ClipDetailProps) -> Html {
    let clip = &props.clip;
    let on_close = {
        let on_close = props.on_close.clone();
        Callback::from(move |_| on_close.emit(()))
    };

    let tag_row = |label: &'static str, tags: &[String]| {
        if tags.is_empty() {
            return html! {};
        }
        html! {
            <p class="text-sm"><span class="font-semibold">{ label }{ ": " }</span>{ tags.join(", ") }</p>
        }
    };

    html! {
        <div class="fixed inset-0 bg-black bg-opacity-60 flex items-center justify-center z-50">
            <div class="bg-white rounded-lg shadow-lg max-w-3xl w-full p-6 space-y-3">
                <div class="flex justify-between items-start gap-2">
                    <h2 class="text-xl font-bold text-gray-800">{ &clip.title }</h2>
                    <div class="flex items-center gap-3">
                        <FavoriteButton
                            clip_id={clip.id.clone()}
                            is_favorite={clip.is_favorite}
                            pending={props.pending}
                            on_toggle={props.on_toggle_favorite.clone()}
                        />
                        <button class="text-gray-600 hover:text-gray-900" onclick={on_close}>{ "✕" }</button>
                    </div>
                </div>
                <video class="w-full rounded" controls=true preload="none" src={props.stream_url.clone()} />
                <p class="text-gray-700">{ &clip.summary }</p>
                <div class="text-sm text-gray-600 flex flex-wrap gap-4">
                    <span>{ clip.clip_type.display_name() }</span>
                    <span>{ format!("{} - {}", clip.timestamp_start, clip.timestamp_end) }</span>
                    <span>{ format_duration(clip.duration) }</span>
                    {
                        if let Some(position) = &clip.position {
                            html! { <span>{ position }</span> }
                        } else {
                            html! {}
                        }
                    }
                    {
                        if !clip.source_course.is_empty() {
                            html! { <span>{ &clip.source_course }</span> }
                        } else {
                            html! {}
                        }
                    }
                    <span>{ format_iso8601_date(&clip.created_at) }</span>
                </div>
                { tag_row("Main tags", &clip.main_tags) }
                { tag_row("Video tags", &clip.video_tags) }
                { tag_row("Sub tags", &clip.sub_tags) }
                { tag_row("Tags", &clip.tags) }
            </div>
        </div>
    }
}
