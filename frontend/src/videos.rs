use crate::router::{NavBar, Route};
use crate::services::LibraryServices;
use clip_library::api::LibraryApi;
use clip_library::format::{format_clip_count, format_iso8601_date};
use clip_library::models::VideoItem;
use clip_library::session::MountGuard;
use yew::prelude::*;

#[function_component(VideosPage)]
pub fn videos_page() -> Html {
    let services = use_context::<LibraryServices>().expect("LibraryServices context missing");
    let videos = use_state(Vec::<VideoItem>::new);
    let loading = use_state(|| false);
    let error_message = use_state(|| None::<String>);
    let playing = use_state(|| None::<String>);

    // Load videos on component mount
    {
        let api = services.api().clone();
        let videos = videos.clone();
        let loading = loading.clone();
        let error_message = error_message.clone();

        use_effect_with((), move |_| {
            let guard = MountGuard::new();
            let task_guard = guard.clone();
            loading.set(true);
            wasm_bindgen_futures::spawn_local(async move {
                let result = api.fetch_videos().await;
                if !task_guard.is_mounted() {
                    return;
                }
                match result {
                    Ok(video_list) => videos.set(video_list),
                    Err(e) => error_message.set(Some(e.to_string())),
                }
                loading.set(false);
            });
            move || guard.unmount()
        });
    }

    let on_play = {
        let playing = playing.clone();
        Callback::from(move |video_id: String| {
            let next = if playing.as_deref() == Some(video_id.as_str()) {
                None
            } else {
                Some(video_id)
            };
            playing.set(next);
        })
    };

    html! {
        <div class="min-h-screen bg-gray-100 p-4">
            <div class="max-w-6xl mx-auto">
                <NavBar active={Route::Videos} />
                <div class="bg-white rounded-lg shadow-lg p-8">
                    <h1 class="text-3xl font-bold text-gray-800 mb-6">{"Videos"}</h1>

                    {
                        if let Some(msg) = &*error_message {
                            html! {
                                <div class="bg-red-100 border border-red-400 text-red-700 px-4 py-3 rounded mb-4">
                                    { msg }
                                </div>
                            }
                        } else {
                            html! {}
                        }
                    }

                    {
                        if *loading {
                            html! {
                                <div class="text-center py-8">
                                    <p>{"Loading videos..."}</p>
                                </div>
                            }
                        } else if videos.is_empty() && error_message.is_none() {
                            html! { <p class="text-gray-600 italic">{"No videos yet."}</p> }
                        } else {
                            html! {
                                <div class="overflow-x-auto">
                                    <table class="min-w-full bg-white border border-gray-300">
                                        <thead class="bg-gray-50">
                                            <tr>
                                                <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase tracking-wider">{"Title"}</th>
                                                <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase tracking-wider">{"Clips"}</th>
                                                <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase tracking-wider">{"Tags"}</th>
                                                <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase tracking-wider">{"Added"}</th>
                                                <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase tracking-wider"></th>
                                            </tr>
                                        </thead>
                                        <tbody class="bg-white divide-y divide-gray-200">
                                            {
                                                videos.iter().map(|video| {
                                                    let is_playing = playing.as_deref() == Some(video.id.as_str());
                                                    html! {
                                                        <>
                                                            <tr>
                                                                <td class="px-6 py-4 text-sm text-gray-900">
                                                                    <div class="max-w-xs truncate" title={video.summary.clone()}>{&video.title}</div>
                                                                </td>
                                                                <td class="px-6 py-4 whitespace-nowrap text-sm text-gray-900">
                                                                    {format_clip_count(video.clip_count as usize)}
                                                                </td>
                                                                <td class="px-6 py-4 text-sm text-gray-900">
                                                                    {video.main_tags.join(", ")}
                                                                </td>
                                                                <td class="px-6 py-4 whitespace-nowrap text-sm text-gray-900">
                                                                    {format_iso8601_date(&video.created_at)}
                                                                </td>
                                                                <td class="px-6 py-4 whitespace-nowrap text-sm font-medium">
                                                                    <button
                                                                        onclick={
                                                                            let video_id = video.id.clone();
                                                                            let on_play = on_play.clone();
                                                                            Callback::from(move |_| on_play.emit(video_id.clone()))
                                                                        }
                                                                        class="text-blue-600 hover:text-blue-900"
                                                                    >
                                                                        { if is_playing { "Close" } else { "Play" } }
                                                                    </button>
                                                                </td>
                                                            </tr>
                                                            {
                                                                // Only the opened row gets a player so nothing streams eagerly.
                                                                if is_playing {
                                                                    html! {
                                                                        <tr>
                                                                            <td colspan="5" class="px-6 py-4">
                                                                                <video class="w-full rounded" controls=true preload="none"
                                                                                    src={services.endpoints().video_stream_url(&video.id)} />
                                                                            </td>
                                                                        </tr>
                                                                    }
                                                                } else {
                                                                    html! {}
                                                                }
                                                            }
                                                        </>
                                                    }
                                                }).collect::<Html>()
                                            }
                                        </tbody>
                                    </table>
                                </div>
                            }
                        }
                    }
                </div>
            </div>
        </div>
    }
}
