use crate::gallery::ALL_FILTER;
use serde::Deserialize;
use std::collections::HashSet;
use thiserror::Error;

const BUILTIN_CATALOG: &str = include_str!("../assets/projects.json");

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoType {
    #[serde(alias = "youtube")]
    Embedded,
    #[serde(alias = "mp4")]
    File,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub objective: String,
    pub badges: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub video_type: VideoType,
    pub video_url: String,
    #[serde(default)]
    pub thumb: Option<String>,
}

impl ProjectRecord {
    /// Thumbnail URL, treating an empty string the same as a missing one.
    pub fn thumb_url(&self) -> Option<&str> {
        self.thumb.as_deref().map(str::trim).filter(|value| !value.is_empty())
    }

    pub fn has_badge(&self, badge: &str) -> bool {
        self.badges.iter().any(|value| value == badge)
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog contains no projects")]
    Empty,
    #[error("project at position {0} has an empty id")]
    EmptyId(usize),
    #[error("project id `{0}` appears more than once")]
    DuplicateId(String),
    #[error("project `{0}` has no badges")]
    NoBadges(String),
    #[error("project `{0}` uses the reserved badge `all`")]
    ReservedBadge(String),
}

/// Ordered, immutable list of projects shown in the gallery.
#[derive(Clone, Debug, PartialEq)]
pub struct Catalog {
    projects: Vec<ProjectRecord>,
}

impl Catalog {
    pub fn new(projects: Vec<ProjectRecord>) -> Result<Self, CatalogError> {
        validate(&projects)?;
        Ok(Self { projects })
    }

    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let projects: Vec<ProjectRecord> = serde_json::from_str(raw)?;
        Self::new(projects)
    }

    /// The fixture bundled with the page, validated by the tests below.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn projects(&self) -> &[ProjectRecord] {
        &self.projects
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn find(&self, id: &str) -> Option<&ProjectRecord> {
        self.projects.iter().find(|project| project.id == id)
    }

    /// Distinct badges across all projects, in first-seen order.
    pub fn badge_union(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.projects
            .iter()
            .flat_map(|project| project.badges.iter().map(String::as_str))
            .filter(|badge| seen.insert(*badge))
            .collect()
    }
}

fn validate(projects: &[ProjectRecord]) -> Result<(), CatalogError> {
    if projects.is_empty() {
        return Err(CatalogError::Empty);
    }

    let mut seen = HashSet::new();
    for (index, project) in projects.iter().enumerate() {
        if project.id.trim().is_empty() {
            return Err(CatalogError::EmptyId(index));
        }
        if !seen.insert(project.id.as_str()) {
            return Err(CatalogError::DuplicateId(project.id.clone()));
        }
        if project.badges.is_empty() {
            return Err(CatalogError::NoBadges(project.id.clone()));
        }
        if project.has_badge(ALL_FILTER) {
            return Err(CatalogError::ReservedBadge(project.id.clone()));
        }
    }

    Ok(())
}

#[cfg(test)]
pub(crate) fn record(id: &str, badges: &[&str], video_type: VideoType) -> ProjectRecord {
    ProjectRecord {
        id: id.to_string(),
        title: format!("Title {id}"),
        summary: format!("Summary {id}"),
        objective: format!("Objective {id}"),
        badges: badges.iter().map(|badge| badge.to_string()).collect(),
        tags: vec!["Ops".to_string()],
        video_type,
        video_url: match video_type {
            VideoType::Embedded => "https://www.youtube.com/embed/abc".to_string(),
            VideoType::File => "videos/demo.mp4".to_string(),
        },
        thumb: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = Catalog::builtin().expect("bundled catalog parses");

        assert_eq!(catalog.len(), 6);
        assert_eq!(catalog.projects()[0].id, "p1");
        assert_eq!(catalog.find("p3").map(|p| p.video_type), Some(VideoType::File));
    }

    #[test]
    fn legacy_video_type_names_are_accepted() {
        let raw = r#"[
            {"id":"a","title":"A","summary":"s","objective":"o","badges":["Rust"],
             "videoType":"youtube","videoUrl":"https://www.youtube.com/embed/x"},
            {"id":"b","title":"B","summary":"s","objective":"o","badges":["Go"],
             "videoType":"mp4","videoUrl":"videos/b.mp4","thumb":"img/b.png"}
        ]"#;

        let catalog = Catalog::from_json(raw).expect("legacy aliases parse");
        assert_eq!(catalog.projects()[0].video_type, VideoType::Embedded);
        assert_eq!(catalog.projects()[1].video_type, VideoType::File);
        assert!(catalog.projects()[0].tags.is_empty());
        assert_eq!(catalog.projects()[1].thumb_url(), Some("img/b.png"));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let result = Catalog::new(vec![
            record("p1", &["Python"], VideoType::File),
            record("p1", &["RPA"], VideoType::File),
        ]);

        assert!(matches!(result, Err(CatalogError::DuplicateId(id)) if id == "p1"));
    }

    #[test]
    fn projects_without_badges_are_rejected() {
        let result = Catalog::new(vec![record("p1", &[], VideoType::File)]);
        assert!(matches!(result, Err(CatalogError::NoBadges(_))));
    }

    #[test]
    fn badge_named_like_the_all_filter_is_rejected() {
        let result = Catalog::new(vec![
            record("p1", &["all", "Go"], VideoType::File),
            record("p2", &["Rust"], VideoType::File),
        ]);

        assert!(matches!(result, Err(CatalogError::ReservedBadge(id)) if id == "p1"));
    }

    #[test]
    fn empty_and_malformed_catalogs_are_rejected() {
        assert!(matches!(Catalog::from_json("[]"), Err(CatalogError::Empty)));
        assert!(matches!(Catalog::from_json("{"), Err(CatalogError::Parse(_))));
        assert!(matches!(
            Catalog::new(vec![record(" ", &["Go"], VideoType::File)]),
            Err(CatalogError::EmptyId(0))
        ));
    }

    #[test]
    fn badge_union_keeps_first_seen_order() {
        let catalog = Catalog::new(vec![
            record("p1", &["Python", "RPA"], VideoType::File),
            record("p2", &["Node.js", "Python"], VideoType::File),
            record("p3", &["RPA", "CI"], VideoType::File),
        ])
        .expect("valid catalog");

        assert_eq!(catalog.badge_union(), vec!["Python", "RPA", "Node.js", "CI"]);
    }

    #[test]
    fn empty_thumb_counts_as_missing() {
        let mut project = record("p1", &["Python"], VideoType::File);
        project.thumb = Some("  ".to_string());
        assert_eq!(project.thumb_url(), None);
    }

    #[test]
    fn unknown_id_lookup_returns_none() {
        let catalog = Catalog::builtin().expect("bundled catalog parses");
        assert!(catalog.find("missing").is_none());
    }
}
