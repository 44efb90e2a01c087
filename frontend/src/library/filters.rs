use clip_library::filter::{ClipFilter, SortMode, TagFacet};
use clip_library::models::ClipType;
use clip_library::tag_options::{FacetOptions, TagOptions};
use js_sys::Reflect;
use std::collections::BTreeSet;
use wasm_bindgen::JsValue;
use web_sys::{Event, HtmlInputElement};
use yew::prelude::*;

// Helper to read "value" from any event target without HtmlSelectElement.
fn event_value(e: &Event) -> Option<String> {
    let target = e.target()?;
    let js_value = Reflect::get(target.as_ref(), &JsValue::from_str("value")).ok()?;
    js_value.as_string()
}

#[derive(Properties, PartialEq)]
pub struct FilterPanelProps {
    pub filter: ClipFilter,
    pub sort: SortMode,
    pub options: FacetOptions,
    pub on_search: Callback<String>,
    pub on_toggle_type: Callback<ClipType>,
    pub on_toggle_tag: Callback<(TagFacet, String)>,
    pub on_sort_change: Callback<SortMode>,
    pub on_clear: Callback<()>,
}

#[function_component(FilterPanel)]
pub fn filter_panel(props: &FilterPanelProps) -> Html {
    let on_input = {
        let on_search = props.on_search.clone();
        Callback::from(move |e: InputEvent| {
            let value = e.target_unchecked_into::<HtmlInputElement>().value();
            on_search.emit(value);
        })
    };

    let on_sort_change = {
        let on_sort_change = props.on_sort_change.clone();
        Callback::from(move |e: Event| {
            if let Some(sort) = event_value(&e).as_deref().and_then(SortMode::from_key) {
                on_sort_change.emit(sort);
            }
        })
    };

    let on_clear = {
        let on_clear = props.on_clear.clone();
        Callback::from(move |_| on_clear.emit(()))
    };

    html! {
        <aside class="space-y-4">
            <input
                type="search"
                class="w-full p-2 border border-gray-300 rounded focus:outline-none focus:ring-2 focus:ring-blue-500"
                placeholder="Search titles, summaries, tags..."
                value={props.filter.search.clone()}
                oninput={on_input}
            />

            <label class="block text-sm text-gray-700">
                { "Sort" }
                <select class="ml-2" onchange={on_sort_change}>
                    {
                        for SortMode::all_variants().into_iter().map(|mode| html! {
                            <option value={mode.key()} selected={mode == props.sort}>
                                { mode.display_name() }
                            </option>
                        })
                    }
                </select>
            </label>

            <fieldset>
                <legend class="font-semibold text-gray-800">{ "Type" }</legend>
                {
                    for ClipType::all_variants().into_iter().map(|clip_type| {
                        let on_toggle_type = props.on_toggle_type.clone();
                        html! {
                            <label class="flex items-center gap-2 text-sm">
                                <input
                                    type="checkbox"
                                    checked={props.filter.types.contains(&clip_type)}
                                    onchange={Callback::from(move |_| on_toggle_type.emit(clip_type))}
                                />
                                { clip_type.display_name() }
                            </label>
                        }
                    })
                }
            </fieldset>

            <FacetGroup facet={TagFacet::Main} options={props.options.main_tags.clone()}
                selected={props.filter.selected(TagFacet::Main).clone()} on_toggle={props.on_toggle_tag.clone()} />
            <FacetGroup facet={TagFacet::Video} options={props.options.video_tags.clone()}
                selected={props.filter.selected(TagFacet::Video).clone()} on_toggle={props.on_toggle_tag.clone()} />
            <FacetGroup facet={TagFacet::Sub} options={props.options.sub_tags.clone()}
                selected={props.filter.selected(TagFacet::Sub).clone()} on_toggle={props.on_toggle_tag.clone()} />
            <FacetGroup facet={TagFacet::Position} options={props.options.positions.clone()}
                selected={props.filter.selected(TagFacet::Position).clone()} on_toggle={props.on_toggle_tag.clone()} />

            <button
                class="text-sm text-blue-600 hover:underline disabled:opacity-50"
                disabled={props.filter.is_empty()}
                onclick={on_clear}
            >
                { "Clear filters" }
            </button>
        </aside>
    }
}

#[derive(Properties, PartialEq)]
pub struct FacetGroupProps {
    pub facet: TagFacet,
    pub options: TagOptions,
    pub selected: BTreeSet<String>,
    pub on_toggle: Callback<(TagFacet, String)>,
}

#[function_component(FacetGroup)]
pub fn facet_group(props: &FacetGroupProps) -> Html {
    if props.options.is_empty() {
        return html! {};
    }

    html! {
        <fieldset>
            <legend class="font-semibold text-gray-800">{ props.facet.display_name() }</legend>
            <div class="flex flex-wrap gap-2 mt-1">
                {
                    for props.options.iter().map(|value| {
                        let facet = props.facet;
                        let on_toggle = props.on_toggle.clone();
                        let emitted = value.clone();
                        let active = props.selected.contains(value);
                        html! {
                            <button
                                class={if active {
                                    "px-2 py-1 text-xs rounded-full bg-blue-600 text-white"
                                } else {
                                    "px-2 py-1 text-xs rounded-full bg-gray-200 text-gray-800"
                                }}
                                onclick={Callback::from(move |_| on_toggle.emit((facet, emitted.clone())))}
                            >
                                { value }
                            </button>
                        }
                    })
                }
            </div>
        </fieldset>
    }
}
