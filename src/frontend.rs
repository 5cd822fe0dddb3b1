use crate::{
    catalog::Catalog,
    config::PageConfig,
    dom,
    effects,
    gallery::{
        CardView, Filter, FilterChoice, GalleryAction, GalleryState, ModalState, PlayerMount,
        EMBED_ALLOW,
    },
    logging::{log_event, LogLevel},
};
use gloo_net::http::Request;
use serde_json::json;
use std::rc::Rc;
use wasm_bindgen::{closure::Closure, JsCast};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, KeyboardEvent, MouseEvent};
use yew::{create_portal, prelude::*};

const GRID_ID: &str = "projects-grid";
const FILTERS_ID: &str = "project-filters";
const MODAL_ID: &str = "video-modal";
const PLAYER_HOST_ID: &str = "video-wrapper";
const MODAL_TITLE_ID: &str = "modal-title";
const MODAL_DESC_ID: &str = "modal-desc";
const INLINE_CATALOG_ID: &str = "projects-data";
const CATALOG_SRC_ATTR: &str = "data-catalog-src";

impl Reducible for GalleryState {
    type Action = GalleryAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        if next.apply(action) {
            Rc::new(next)
        } else {
            self
        }
    }
}

/// The modal markup the page provides; the player host and overlay are required.
#[derive(Clone, PartialEq)]
struct ModalHosts {
    overlay: Element,
    player: Element,
    title: Option<Element>,
    description: Option<Element>,
}

impl ModalHosts {
    fn find(document: &Document) -> Option<Self> {
        Some(Self {
            overlay: document.get_element_by_id(MODAL_ID)?,
            player: document.get_element_by_id(PLAYER_HOST_ID)?,
            title: document.get_element_by_id(MODAL_TITLE_ID),
            description: document.get_element_by_id(MODAL_DESC_ID),
        })
    }

    fn sync(&self, modal: &ModalState) {
        let open = modal.is_open();
        dom::toggle_class(&self.overlay, "open", open);
        let _ = self
            .overlay
            .set_attribute("aria-hidden", if open { "false" } else { "true" });

        if let ModalState::Open {
            title, description, ..
        } = modal
        {
            if let Some(element) = &self.title {
                element.set_text_content(Some(title.as_str()));
            }
            if let Some(element) = &self.description {
                element.set_text_content(Some(description.as_str()));
            }
        }
    }
}

/// Document-level close triggers: `data-action="close-modal"` clicks and Escape.
struct CloseListeners {
    document: Document,
    click: Closure<dyn FnMut(MouseEvent)>,
    keydown: Closure<dyn FnMut(KeyboardEvent)>,
}

impl CloseListeners {
    fn attach(dispatcher: UseReducerDispatcher<GalleryState>, config: PageConfig) -> Option<Self> {
        let document = dom::document()?;

        let click = {
            let dispatcher = dispatcher.clone();
            Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
                let action = event
                    .target()
                    .and_then(|target| target.dyn_into::<Element>().ok())
                    .and_then(|element| element.get_attribute("data-action"));
                if let Some(close) = GalleryAction::from_click_action(action.as_deref()) {
                    log_event(&config, LogLevel::Debug, "modal_close", json!({ "trigger": "click" }));
                    dispatcher.dispatch(close);
                }
            })
        };

        let keydown = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
            if let Some(close) = GalleryAction::from_key(&event.key()) {
                log_event(&config, LogLevel::Debug, "modal_close", json!({ "trigger": "escape" }));
                dispatcher.dispatch(close);
            }
        });

        document
            .add_event_listener_with_callback("click", click.as_ref().unchecked_ref())
            .ok()?;
        document
            .add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref())
            .ok()?;

        Some(Self {
            document,
            click,
            keydown,
        })
    }
}

impl Drop for CloseListeners {
    fn drop(&mut self) {
        let _ = self
            .document
            .remove_event_listener_with_callback("click", self.click.as_ref().unchecked_ref());
        let _ = self
            .document
            .remove_event_listener_with_callback("keydown", self.keydown.as_ref().unchecked_ref());
    }
}

#[derive(Properties, PartialEq)]
struct ProjectCardProps {
    card: CardView,
    on_play: Callback<AttrValue>,
}

#[function_component(ProjectCard)]
fn project_card(props: &ProjectCardProps) -> Html {
    let card = &props.card;

    let onclick = {
        let on_play = props.on_play.clone();
        let id = AttrValue::from(card.id.clone());
        Callback::from(move |_: MouseEvent| on_play.emit(id.clone()))
    };

    html! {
        <article
            class="project-card"
            data-id={card.id.clone()}
            data-badges={card.badge_list()}
            style={(!card.visible).then_some("display: none;")}
        >
            <div class="project-thumb" style={card.thumb.css()}>
                <button
                    class="play-btn"
                    type="button"
                    title="Watch video"
                    data-project-id={card.id.clone()}
                    onclick={onclick}
                >
                    <svg width="24" height="24" viewBox="0 0 24 24" fill="none" xmlns="http://www.w3.org/2000/svg">
                        <path d="M8 5v14l11-7L8 5z" fill="white" />
                    </svg>
                </button>
            </div>
            <div class="project-body">
                <div class="project-title">{card.title.clone()}</div>
                <div class="project-summary">{card.summary.clone()}</div>
                <div class="badges">
                    { for card.badges.iter().map(|badge| html! { <span class="badge">{badge.clone()}</span> }) }
                </div>
                <div class="tags">
                    { for card.tags.iter().map(|tag| html! { <span class="tag">{tag.clone()}</span> }) }
                </div>
                <div class="project-objective" style="margin-top: 0.6rem; color: var(--muted-text);">
                    {card.objective.clone()}
                </div>
            </div>
        </article>
    }
}

#[derive(Properties, PartialEq)]
struct FilterBarProps {
    choices: Vec<FilterChoice>,
    on_select: Callback<Filter>,
}

#[function_component(FilterBar)]
fn filter_bar(props: &FilterBarProps) -> Html {
    let buttons = props.choices.iter().map(|choice| {
        let value = choice.filter.value().to_string();
        let onclick = {
            let on_select = props.on_select.clone();
            let filter = choice.filter.clone();
            Callback::from(move |_: MouseEvent| on_select.emit(filter.clone()))
        };

        html! {
            <button
                key={value.clone()}
                type="button"
                class={classes!("project-filter", choice.active.then_some("active"))}
                data-filter={value}
                onclick={onclick}
            >
                {choice.filter.label().to_string()}
            </button>
        }
    });

    html! { <>{ for buttons }</> }
}

fn player_view(player: &PlayerMount, mount_key: u64) -> Html {
    let key = mount_key.to_string();
    match player {
        PlayerMount::Embedded { src } => html! {
            <iframe
                key={key}
                src={src.clone()}
                width="100%"
                height="100%"
                allow={EMBED_ALLOW}
                allowfullscreen=true
                style="border: 0;"
            />
        },
        PlayerMount::File { src } => html! {
            <video
                key={key}
                src={src.clone()}
                controls=true
                autoplay=true
                playsinline=true
                style="width: 100%; height: 100%;"
            />
        },
    }
}

#[derive(Properties, PartialEq)]
struct GalleryProps {
    catalog: Rc<Catalog>,
    config: PageConfig,
    filters_host: Option<Element>,
    modal_hosts: Option<ModalHosts>,
}

#[function_component(Gallery)]
fn gallery(props: &GalleryProps) -> Html {
    let state = use_reducer({
        let catalog = Rc::clone(&props.catalog);
        move || GalleryState::new(catalog)
    });

    {
        let dispatcher = state.dispatcher();
        let config = props.config;
        use_effect_with((), move |_| {
            let listeners = CloseListeners::attach(dispatcher, config);
            move || drop(listeners)
        });
    }

    {
        let hosts = props.modal_hosts.clone();
        use_effect_with(state.modal.clone(), move |modal| {
            if let Some(hosts) = hosts.as_ref() {
                hosts.sync(modal);
            }
            || ()
        });
    }

    let on_play = {
        let dispatcher = state.dispatcher();
        let config = props.config;
        Callback::from(move |id: AttrValue| {
            log_event(&config, LogLevel::Debug, "modal_open", json!({ "projectId": id.as_str() }));
            dispatcher.dispatch(GalleryAction::Play(id.to_string()));
        })
    };

    let on_select = {
        let dispatcher = state.dispatcher();
        let config = props.config;
        Callback::from(move |filter: Filter| {
            log_event(&config, LogLevel::Debug, "filter_selected", json!({ "filter": filter.value() }));
            dispatcher.dispatch(GalleryAction::SelectFilter(filter));
        })
    };

    let cards = state.cards().into_iter().map(|card| {
        let key = card.id.clone();
        html! { <ProjectCard key={key} card={card} on_play={on_play.clone()} /> }
    });

    let filters = props.filters_host.clone().map(|host| {
        create_portal(
            html! { <FilterBar choices={state.filter_choices()} on_select={on_select} /> },
            host,
        )
    });

    let player = match (&state.modal, props.modal_hosts.as_ref()) {
        (
            ModalState::Open {
                player, mount_key, ..
            },
            Some(hosts),
        ) => Some(create_portal(player_view(player, *mount_key), hosts.player.clone())),
        _ => None,
    };

    html! {
        <>
            <>{ for cards }</>
            { for filters }
            { for player }
        </>
    }
}

fn page_config(document: &Document) -> PageConfig {
    let root = document.document_element();
    PageConfig::from_attributes(|name| root.as_ref().and_then(|root| root.get_attribute(name)))
}

async fn fetch_catalog(src: &str) -> Option<Catalog> {
    let response = Request::get(src).send().await.ok()?;
    if !response.ok() {
        return None;
    }

    let raw = response.text().await.ok()?;
    Catalog::from_json(&raw).ok()
}

/// Inline `<script id="projects-data">`, then `data-catalog-src`, then the bundled fixture.
async fn resolve_catalog(document: &Document, grid: &Element, config: &PageConfig) -> Option<Catalog> {
    if let Some(raw) = document
        .get_element_by_id(INLINE_CATALOG_ID)
        .and_then(|element| element.text_content())
    {
        match Catalog::from_json(&raw) {
            Ok(catalog) => {
                log_event(config, LogLevel::Debug, "catalog_loaded", json!({ "source": "inline" }));
                return Some(catalog);
            }
            Err(error) => log_event(
                config,
                LogLevel::Debug,
                "catalog_rejected",
                json!({ "source": "inline", "error": error.to_string() }),
            ),
        }
    }

    if let Some(src) = grid.get_attribute(CATALOG_SRC_ATTR) {
        if let Some(catalog) = fetch_catalog(&src).await {
            log_event(config, LogLevel::Debug, "catalog_loaded", json!({ "source": src }));
            return Some(catalog);
        }
        log_event(config, LogLevel::Debug, "catalog_rejected", json!({ "source": src }));
    }

    match Catalog::builtin() {
        Ok(catalog) => Some(catalog),
        Err(error) => {
            log_event(
                config,
                LogLevel::Debug,
                "catalog_rejected",
                json!({ "source": "builtin", "error": error.to_string() }),
            );
            None
        }
    }
}

fn mount_gallery(document: &Document, grid: Element, catalog: Catalog, config: PageConfig) {
    grid.set_inner_html("");

    let filters_host = document.get_element_by_id(FILTERS_ID);
    if let Some(host) = &filters_host {
        host.set_inner_html("");
    }

    let modal_hosts = ModalHosts::find(document);
    if let Some(hosts) = &modal_hosts {
        hosts.player.set_inner_html("");
    }

    yew::Renderer::<Gallery>::with_root_and_props(
        grid,
        GalleryProps {
            catalog: Rc::new(catalog),
            config,
            filters_host,
            modal_hosts,
        },
    )
    .render();
}

fn start() {
    let Some(document) = dom::document() else {
        return;
    };

    let config = page_config(&document);
    let effect_count = effects::install(&document, &config);

    let Some(grid) = document.get_element_by_id(GRID_ID) else {
        log_event(
            &config,
            LogLevel::Info,
            "landing_ready",
            json!({ "projects": 0, "effects": effect_count }),
        );
        return;
    };

    spawn_local(async move {
        let catalog = resolve_catalog(&document, &grid, &config).await;
        let project_count = catalog.as_ref().map_or(0, Catalog::len);

        if let Some(catalog) = catalog {
            mount_gallery(&document, grid, catalog, config);
        }

        log_event(
            &config,
            LogLevel::Info,
            "landing_ready",
            json!({ "projects": project_count, "effects": effect_count }),
        );
    });
}

pub fn run() {
    dom::when_ready(start);
}
