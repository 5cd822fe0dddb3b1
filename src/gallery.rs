//! Gallery state and the pure views the components render from it.
//!
//! Everything here is plain data: the frontend turns `CardView`, `FilterChoice`
//! and `PlayerMount` into DOM nodes, and routes clicks back as `GalleryAction`s.

use crate::catalog::{Catalog, ProjectRecord, VideoType};
use std::rc::Rc;
use url::Url;

pub const ALL_FILTER: &str = "all";
pub const ALL_FILTER_LABEL: &str = "All";
pub const PLACEHOLDER_GRADIENT: &str =
    "linear-gradient(135deg, rgba(99,102,241,0.12), rgba(236,72,153,0.08))";
pub const EMBED_ALLOW: &str =
    "accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture";
/// `data-action` value that closes the modal when clicked.
pub const CLOSE_ACTION: &str = "close-modal";
const CLOSE_KEY: &str = "Escape";
const EMBED_QUERY: [(&str, &str); 3] = [("autoplay", "1"), ("rel", "0"), ("showinfo", "0")];

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Badge(String),
}

impl Filter {
    pub fn from_value(value: &str) -> Self {
        if value == ALL_FILTER {
            Self::All
        } else {
            Self::Badge(value.to_string())
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Self::All => ALL_FILTER,
            Self::Badge(badge) => badge,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::All => ALL_FILTER_LABEL,
            Self::Badge(badge) => badge,
        }
    }

    pub fn matches(&self, project: &ProjectRecord) -> bool {
        match self {
            Self::All => true,
            Self::Badge(badge) => project.has_badge(badge),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterChoice {
    pub filter: Filter,
    pub active: bool,
}

/// The filter bar: a leading "all" control, then one control per distinct badge.
pub fn filter_choices(catalog: &Catalog, active: &Filter) -> Vec<FilterChoice> {
    std::iter::once(Filter::All)
        .chain(catalog.badge_union().into_iter().map(Filter::from_value))
        .map(|filter| FilterChoice {
            active: &filter == active,
            filter,
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ThumbStyle {
    Image(String),
    Placeholder,
}

impl ThumbStyle {
    pub fn css(&self) -> String {
        match self {
            Self::Image(src) => format!("background-image: url({src});"),
            Self::Placeholder => format!("background: {PLACEHOLDER_GRADIENT};"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardView {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub objective: String,
    pub badges: Vec<String>,
    pub tags: Vec<String>,
    pub thumb: ThumbStyle,
    pub visible: bool,
}

impl CardView {
    pub fn from_record(project: &ProjectRecord, filter: &Filter) -> Self {
        Self {
            id: project.id.clone(),
            title: project.title.clone(),
            summary: project.summary.clone(),
            objective: project.objective.clone(),
            badges: project.badges.clone(),
            tags: project.tags.clone(),
            thumb: project
                .thumb_url()
                .map(|src| ThumbStyle::Image(src.to_string()))
                .unwrap_or(ThumbStyle::Placeholder),
            visible: filter.matches(project),
        }
    }

    /// Value of the card's `data-badges` attribute.
    pub fn badge_list(&self) -> String {
        self.badges.join(",")
    }
}

/// One card per project in catalog order; filtered-out cards stay, hidden.
pub fn card_views(catalog: &Catalog, filter: &Filter) -> Vec<CardView> {
    catalog
        .projects()
        .iter()
        .map(|project| CardView::from_record(project, filter))
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlayerMount {
    Embedded { src: String },
    File { src: String },
}

impl PlayerMount {
    pub fn for_record(project: &ProjectRecord) -> Self {
        match project.video_type {
            VideoType::Embedded => Self::Embedded {
                src: embed_src(&project.video_url),
            },
            VideoType::File => Self::File {
                src: project.video_url.clone(),
            },
        }
    }
}

fn embed_src(video_url: &str) -> String {
    if let Ok(mut url) = Url::parse(video_url) {
        url.query_pairs_mut().extend_pairs(EMBED_QUERY);
        return url.to_string();
    }

    let query = EMBED_QUERY
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");
    let separator = if video_url.contains('?') { '&' } else { '?' };
    format!("{video_url}{separator}{query}")
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum ModalState {
    #[default]
    Closed,
    Open {
        project_id: String,
        title: String,
        description: String,
        player: PlayerMount,
        /// Changes on every open so the player element is rebuilt, never reused.
        mount_key: u64,
    },
}

impl ModalState {
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. })
    }

    #[cfg(test)]
    pub fn player(&self) -> Option<&PlayerMount> {
        match self {
            Self::Open { player, .. } => Some(player),
            Self::Closed => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GalleryAction {
    SelectFilter(Filter),
    Play(String),
    Close,
}

impl GalleryAction {
    /// Maps a document keydown to an action. Only Escape does anything.
    pub fn from_key(key: &str) -> Option<Self> {
        (key == CLOSE_KEY).then_some(Self::Close)
    }

    /// Maps the `data-action` of a clicked element to an action.
    pub fn from_click_action(action: Option<&str>) -> Option<Self> {
        (action == Some(CLOSE_ACTION)).then_some(Self::Close)
    }
}

#[derive(Clone, Debug)]
pub struct GalleryState {
    pub catalog: Rc<Catalog>,
    pub filter: Filter,
    pub modal: ModalState,
    mounts: u64,
}

impl GalleryState {
    pub fn new(catalog: Rc<Catalog>) -> Self {
        Self {
            catalog,
            filter: Filter::All,
            modal: ModalState::Closed,
            mounts: 0,
        }
    }

    /// Applies an action in place. Returns false when nothing changed.
    pub fn apply(&mut self, action: GalleryAction) -> bool {
        match action {
            GalleryAction::SelectFilter(filter) => {
                if self.filter == filter {
                    return false;
                }
                self.filter = filter;
                true
            }
            GalleryAction::Play(id) => self.open(&id),
            GalleryAction::Close => {
                if !self.modal.is_open() {
                    return false;
                }
                self.modal = ModalState::Closed;
                true
            }
        }
    }

    fn open(&mut self, id: &str) -> bool {
        let Some(project) = self.catalog.find(id) else {
            return false;
        };

        self.mounts += 1;
        self.modal = ModalState::Open {
            project_id: project.id.clone(),
            title: project.title.clone(),
            description: project.summary.clone(),
            player: PlayerMount::for_record(project),
            mount_key: self.mounts,
        };
        true
    }

    pub fn cards(&self) -> Vec<CardView> {
        card_views(&self.catalog, &self.filter)
    }

    pub fn filter_choices(&self) -> Vec<FilterChoice> {
        filter_choices(&self.catalog, &self.filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::record;

    fn sample_catalog() -> Rc<Catalog> {
        Rc::new(
            Catalog::new(vec![
                record("p1", &["Python", "RPA"], VideoType::Embedded),
                record("p2", &["Node.js"], VideoType::File),
                record("p3", &["Python", "Pandas"], VideoType::File),
            ])
            .expect("valid catalog"),
        )
    }

    fn visible_ids(cards: &[CardView]) -> Vec<&str> {
        cards
            .iter()
            .filter(|card| card.visible)
            .map(|card| card.id.as_str())
            .collect()
    }

    #[test]
    fn filter_bar_has_all_first_then_each_badge_once() {
        let catalog = sample_catalog();
        let choices = filter_choices(&catalog, &Filter::All);

        assert_eq!(choices.len(), catalog.badge_union().len() + 1);
        assert_eq!(choices[0].filter, Filter::All);
        let labels: Vec<&str> = choices.iter().map(|c| c.filter.label()).collect();
        assert_eq!(labels, vec!["All", "Python", "RPA", "Node.js", "Pandas"]);
        assert_eq!(choices.iter().filter(|c| c.active).count(), 1);
        assert!(choices[0].active);
    }

    #[test]
    fn selecting_a_badge_moves_the_active_marker() {
        let mut state = GalleryState::new(sample_catalog());
        assert!(state.apply(GalleryAction::SelectFilter(Filter::from_value("RPA"))));

        let choices = state.filter_choices();
        let active: Vec<&str> = choices
            .iter()
            .filter(|c| c.active)
            .map(|c| c.filter.value())
            .collect();
        assert_eq!(active, vec!["RPA"]);
        assert!(!choices[0].active);
    }

    #[test]
    fn badge_filter_shows_only_matching_cards() {
        let catalog = sample_catalog();

        let cards = card_views(&catalog, &Filter::from_value("Python"));
        assert_eq!(cards.len(), 3);
        assert_eq!(visible_ids(&cards), vec!["p1", "p3"]);

        let cards = card_views(&catalog, &Filter::from_value("Node.js"));
        assert_eq!(visible_ids(&cards), vec!["p2"]);
    }

    #[test]
    fn all_filter_shows_every_card_in_catalog_order() {
        let cards = card_views(&sample_catalog(), &Filter::from_value(ALL_FILTER));
        assert_eq!(visible_ids(&cards), vec!["p1", "p2", "p3"]);
    }

    #[test]
    fn rendering_twice_yields_the_same_cards() {
        let state = GalleryState::new(sample_catalog());
        assert_eq!(state.cards(), state.cards());
        assert_eq!(state.cards().len(), 3);
    }

    #[test]
    fn card_view_carries_badges_tags_and_placeholder() {
        let catalog = sample_catalog();
        let card = CardView::from_record(&catalog.projects()[0], &Filter::All);

        assert_eq!(card.badge_list(), "Python,RPA");
        assert_eq!(card.tags, vec!["Ops".to_string()]);
        assert_eq!(card.thumb, ThumbStyle::Placeholder);
        assert!(card.thumb.css().contains(PLACEHOLDER_GRADIENT));
    }

    #[test]
    fn card_view_uses_thumbnail_when_present() {
        let mut project = record("p9", &["Go"], VideoType::File);
        project.thumb = Some("img/p9.png".to_string());

        let card = CardView::from_record(&project, &Filter::All);
        assert_eq!(card.thumb.css(), "background-image: url(img/p9.png);");
    }

    #[test]
    fn play_opens_modal_with_record_text_and_matching_player() {
        let mut state = GalleryState::new(sample_catalog());
        assert!(state.apply(GalleryAction::Play("p1".to_string())));

        match &state.modal {
            ModalState::Open {
                project_id,
                title,
                description,
                player,
                ..
            } => {
                assert_eq!(project_id, "p1");
                assert_eq!(title, "Title p1");
                assert_eq!(description, "Summary p1");
                assert!(matches!(player, PlayerMount::Embedded { .. }));
            }
            ModalState::Closed => panic!("modal should be open"),
        }

        assert!(state.apply(GalleryAction::Play("p2".to_string())));
        assert_eq!(
            state.modal.player(),
            Some(&PlayerMount::File {
                src: "videos/demo.mp4".to_string()
            })
        );
    }

    #[test]
    fn unknown_project_id_leaves_modal_closed() {
        let mut state = GalleryState::new(sample_catalog());
        assert!(!state.apply(GalleryAction::Play("nope".to_string())));
        assert_eq!(state.modal, ModalState::Closed);
    }

    #[test]
    fn reopening_replaces_the_player_with_a_fresh_mount() {
        let mut state = GalleryState::new(sample_catalog());
        state.apply(GalleryAction::Play("p1".to_string()));
        let first_key = match &state.modal {
            ModalState::Open { mount_key, .. } => *mount_key,
            ModalState::Closed => panic!("modal should be open"),
        };

        state.apply(GalleryAction::Play("p1".to_string()));
        match &state.modal {
            ModalState::Open { mount_key, .. } => assert_ne!(*mount_key, first_key),
            ModalState::Closed => panic!("modal should be open"),
        }
        assert!(state.modal.player().is_some());
    }

    #[test]
    fn close_unmounts_the_player() {
        let mut state = GalleryState::new(sample_catalog());
        state.apply(GalleryAction::Play("p3".to_string()));
        assert!(state.apply(GalleryAction::Close));

        assert!(!state.modal.is_open());
        assert!(state.modal.player().is_none());
        assert!(!state.apply(GalleryAction::Close));
    }

    #[test]
    fn open_close_sequences_never_mount_more_than_one_player() {
        let mut state = GalleryState::new(sample_catalog());
        let actions = [
            GalleryAction::Play("p1".to_string()),
            GalleryAction::Play("p2".to_string()),
            GalleryAction::Close,
            GalleryAction::Close,
            GalleryAction::Play("p3".to_string()),
            GalleryAction::Play("missing".to_string()),
        ];

        for action in actions {
            state.apply(action);
            assert!(state.modal.player().into_iter().count() <= 1);
        }
        assert!(matches!(&state.modal, ModalState::Open { project_id, .. } if project_id == "p3"));
    }

    #[test]
    fn filter_changes_do_not_touch_the_modal() {
        let mut state = GalleryState::new(sample_catalog());
        state.apply(GalleryAction::Play("p2".to_string()));
        state.apply(GalleryAction::SelectFilter(Filter::from_value("Python")));

        assert!(state.modal.is_open());
        assert!(!state.apply(GalleryAction::SelectFilter(Filter::from_value("Python"))));
    }

    #[test]
    fn embed_src_appends_autoplay_query() {
        assert_eq!(
            embed_src("https://www.youtube.com/embed/dQw4w9WgXcQ"),
            "https://www.youtube.com/embed/dQw4w9WgXcQ?autoplay=1&rel=0&showinfo=0"
        );
        assert_eq!(
            embed_src("https://player.example.com/v/1?t=5"),
            "https://player.example.com/v/1?t=5&autoplay=1&rel=0&showinfo=0"
        );
        assert_eq!(
            embed_src("/embed/local"),
            "/embed/local?autoplay=1&rel=0&showinfo=0"
        );
    }

    #[test]
    fn only_escape_and_close_action_clicks_close_the_modal() {
        assert_eq!(GalleryAction::from_key("Escape"), Some(GalleryAction::Close));
        assert_eq!(GalleryAction::from_key("Esc"), None);
        assert_eq!(GalleryAction::from_key("Enter"), None);

        assert_eq!(
            GalleryAction::from_click_action(Some("close-modal")),
            Some(GalleryAction::Close)
        );
        assert_eq!(GalleryAction::from_click_action(Some("open-modal")), None);
        assert_eq!(GalleryAction::from_click_action(None), None);
    }

    #[test]
    fn escape_on_a_closed_modal_changes_nothing() {
        let mut state = GalleryState::new(sample_catalog());
        let action = GalleryAction::from_key("Escape").expect("escape closes");

        assert!(!state.apply(action));
        assert!(!state.modal.is_open());
    }
}
