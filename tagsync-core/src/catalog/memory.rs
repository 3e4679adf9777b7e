use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tagsync_model::{
    Gallery, LocalTag, MediaKind, MediaRef, MediaUpdate, Performer, Scene,
    SceneMarker, TagId, TagRef,
};

use super::{CatalogRepository, TagCreate, TagUpdate};
use crate::error::{Result, SyncError};

/// Process-local catalog with Stash's lookup, uniqueness and merge rules.
///
/// Backs the pipeline tests and can stand in for a real catalog when
/// rehearsing a run against a seeded data set.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    next_id: u64,
    tags: Vec<LocalTag>,
    scenes: Vec<Scene>,
    galleries: Vec<Gallery>,
    performers: Vec<Performer>,
    markers: Vec<SceneMarker>,
    writes: usize,
    failing_tag_updates: HashSet<TagId>,
}

/// Name-keyed view of the catalog, independent of id assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSnapshot {
    /// Tag name to its sorted aliases.
    pub tags: BTreeMap<String, Vec<String>>,
    /// `"<kind>:<id>"` to the names of the tags it carries.
    pub media: BTreeMap<String, BTreeSet<String>>,
}

impl State {
    fn allocate_id(&mut self) -> String {
        self.next_id += 1;
        self.next_id.to_string()
    }

    fn tag(&self, id: &TagId) -> Result<&LocalTag> {
        self.tags
            .iter()
            .find(|tag| &tag.id == id)
            .ok_or_else(|| SyncError::TagNotFound(id.to_string()))
    }

    fn tag_refs(&self, ids: &[TagId]) -> Result<Vec<TagRef>> {
        let mut refs: Vec<TagRef> = Vec::with_capacity(ids.len());
        for id in ids {
            if refs.iter().any(|existing| &existing.id == id) {
                continue;
            }
            refs.push(self.tag(id)?.to_ref());
        }
        Ok(refs)
    }

    /// Tag other than `except` already answering to `value`.
    fn claimed_by(&self, value: &str, except: Option<&TagId>) -> Option<&LocalTag> {
        self.tags
            .iter()
            .filter(|tag| Some(&tag.id) != except)
            .find(|tag| tag.answers_to(value))
    }

    fn media_refs_mut(&mut self) -> Vec<&mut Vec<TagRef>> {
        let State {
            scenes,
            galleries,
            performers,
            markers,
            ..
        } = self;
        scenes
            .iter_mut()
            .map(|s| &mut s.tags)
            .chain(galleries.iter_mut().map(|g| &mut g.tags))
            .chain(performers.iter_mut().map(|p| &mut p.tags))
            .chain(markers.iter_mut().map(|m| &mut m.tags))
            .collect()
    }
}

fn rejected(message: String) -> SyncError {
    SyncError::GraphQl(vec![message])
}

impl InMemoryCatalog {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Seed a tag directly, bypassing uniqueness checks.
    pub fn seed_tag(&self, name: &str, aliases: &[&str]) -> LocalTag {
        let mut state = self.lock();
        let tag = LocalTag {
            id: TagId::new(state.allocate_id()),
            name: name.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            description: None,
        };
        state.tags.push(tag.clone());
        tag
    }

    pub fn seed_scene(&self, title: &str, tags: &[&LocalTag]) -> String {
        let mut state = self.lock();
        let id = state.allocate_id();
        state.scenes.push(Scene {
            id: id.clone(),
            title: Some(title.to_string()),
            tags: tags.iter().map(|t| t.to_ref()).collect(),
        });
        id
    }

    pub fn seed_gallery(&self, title: &str, tags: &[&LocalTag]) -> String {
        let mut state = self.lock();
        let id = state.allocate_id();
        state.galleries.push(Gallery {
            id: id.clone(),
            title: Some(title.to_string()),
            tags: tags.iter().map(|t| t.to_ref()).collect(),
        });
        id
    }

    pub fn seed_performer(&self, name: &str, tags: &[&LocalTag]) -> String {
        let mut state = self.lock();
        let id = state.allocate_id();
        state.performers.push(Performer {
            id: id.clone(),
            name: name.to_string(),
            tags: tags.iter().map(|t| t.to_ref()).collect(),
        });
        id
    }

    pub fn seed_marker(
        &self,
        title: &str,
        seconds: f64,
        scene_id: &str,
        primary: &LocalTag,
        tags: &[&LocalTag],
    ) -> String {
        let mut state = self.lock();
        let id = state.allocate_id();
        state.markers.push(SceneMarker {
            id: id.clone(),
            title: title.to_string(),
            seconds,
            scene_id: scene_id.to_string(),
            primary_tag_id: primary.id.clone(),
            tags: tags.iter().map(|t| t.to_ref()).collect(),
        });
        id
    }

    /// Make the next `update_tag` call for `id` fail, once.
    pub fn fail_next_tag_update(&self, id: &TagId) {
        self.lock().failing_tag_updates.insert(id.clone());
    }

    /// Successful mutations applied so far.
    pub fn writes(&self) -> usize {
        self.lock().writes
    }

    pub fn tag_named(&self, name: &str) -> Option<LocalTag> {
        self.lock().tags.iter().find(|t| t.name == name).cloned()
    }

    pub fn tags(&self) -> Vec<LocalTag> {
        self.lock().tags.clone()
    }

    pub fn media(&self, kind: MediaKind, id: &str) -> Option<MediaRef> {
        let state = self.lock();
        match kind {
            MediaKind::Scene => state
                .scenes
                .iter()
                .find(|s| s.id == id)
                .cloned()
                .map(MediaRef::Scene),
            MediaKind::Gallery => state
                .galleries
                .iter()
                .find(|g| g.id == id)
                .cloned()
                .map(MediaRef::Gallery),
            MediaKind::Performer => state
                .performers
                .iter()
                .find(|p| p.id == id)
                .cloned()
                .map(MediaRef::Performer),
            MediaKind::Marker => state
                .markers
                .iter()
                .find(|m| m.id == id)
                .cloned()
                .map(MediaRef::Marker),
        }
    }

    pub fn snapshot(&self) -> CatalogSnapshot {
        let state = self.lock();
        let tags = state
            .tags
            .iter()
            .map(|tag| {
                let mut aliases = tag.aliases.clone();
                aliases.sort();
                (tag.name.clone(), aliases)
            })
            .collect();

        let names = |refs: &[TagRef]| -> BTreeSet<String> {
            refs.iter().map(|r| r.name.clone()).collect()
        };
        let mut media = BTreeMap::new();
        for scene in &state.scenes {
            media.insert(format!("scene:{}", scene.id), names(scene.tags.as_slice()));
        }
        for gallery in &state.galleries {
            media.insert(format!("gallery:{}", gallery.id), names(gallery.tags.as_slice()));
        }
        for performer in &state.performers {
            media.insert(
                format!("performer:{}", performer.id),
                names(performer.tags.as_slice()),
            );
        }
        for marker in &state.markers {
            media.insert(format!("marker:{}", marker.id), names(marker.tags.as_slice()));
        }

        CatalogSnapshot { tags, media }
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalog {
    async fn find_tag(&self, name: &str) -> Result<Option<LocalTag>> {
        let state = self.lock();
        let by_name = state.tags.iter().find(|tag| tag.name == name);
        Ok(by_name
            .or_else(|| state.tags.iter().find(|tag| tag.has_alias(name)))
            .cloned())
    }

    async fn create_tag(&self, input: &TagCreate) -> Result<LocalTag> {
        let mut state = self.lock();
        if let Some(existing) = state.claimed_by(&input.name, None) {
            return Err(rejected(format!(
                "tag with name '{}' already exists as '{}'",
                input.name, existing.name
            )));
        }
        let tag = LocalTag {
            id: TagId::new(state.allocate_id()),
            name: input.name.clone(),
            aliases: Vec::new(),
            description: input.description.clone(),
        };
        state.tags.push(tag.clone());
        state.writes += 1;
        Ok(tag)
    }

    async fn update_tag(&self, input: &TagUpdate) -> Result<()> {
        let mut state = self.lock();
        if state.failing_tag_updates.remove(&input.id) {
            return Err(SyncError::Internal(format!(
                "injected failure updating tag {}",
                input.id
            )));
        }
        let current = state.tag(&input.id)?.clone();

        if let Some(aliases) = &input.aliases {
            let mut seen = HashSet::new();
            for alias in aliases {
                if alias == &current.name || !seen.insert(alias.as_str()) {
                    return Err(rejected(format!(
                        "duplicate alias '{alias}' on tag '{}'",
                        current.name
                    )));
                }
                if let Some(owner) = state.claimed_by(alias, Some(&current.id)) {
                    return Err(rejected(format!(
                        "alias '{alias}' is already used by tag '{}'",
                        owner.name
                    )));
                }
            }
        }

        let tag = state
            .tags
            .iter_mut()
            .find(|tag| tag.id == input.id)
            .ok_or_else(|| SyncError::TagNotFound(input.id.to_string()))?;
        if let Some(aliases) = &input.aliases {
            tag.aliases = aliases.clone();
        }
        if let Some(description) = &input.description {
            tag.description = Some(description.clone());
        }
        state.writes += 1;
        Ok(())
    }

    async fn merge_tags(&self, source: &TagId, destination: &TagId) -> Result<()> {
        let mut state = self.lock();
        if source == destination {
            return Err(rejected("cannot merge a tag into itself".into()));
        }
        let source_tag = state.tag(source)?.clone();
        let destination_ref = state.tag(destination)?.to_ref();

        for tags in state.media_refs_mut() {
            if let Some(pos) = tags.iter().position(|t| &t.id == source) {
                tags.remove(pos);
                if !tags.iter().any(|t| &t.id == destination) {
                    tags.push(destination_ref.clone());
                }
            }
        }
        for marker in &mut state.markers {
            if &marker.primary_tag_id == source {
                marker.primary_tag_id = destination.clone();
            }
        }

        state.tags.retain(|tag| &tag.id != source);
        if let Some(target) = state.tags.iter_mut().find(|t| &t.id == destination) {
            for alias in std::iter::once(&source_tag.name).chain(&source_tag.aliases) {
                if alias != &target.name && !target.has_alias(alias) {
                    target.aliases.push(alias.clone());
                }
            }
        }
        state.writes += 1;
        Ok(())
    }

    async fn find_media_by_tag(
        &self,
        kind: MediaKind,
        tag: &TagId,
    ) -> Result<Vec<MediaRef>> {
        let state = self.lock();
        let carries = |tags: &[TagRef]| tags.iter().any(|t| &t.id == tag);
        let found = match kind {
            MediaKind::Scene => state
                .scenes
                .iter()
                .filter(|s| carries(s.tags.as_slice()))
                .cloned()
                .map(MediaRef::Scene)
                .collect(),
            MediaKind::Gallery => state
                .galleries
                .iter()
                .filter(|g| carries(g.tags.as_slice()))
                .cloned()
                .map(MediaRef::Gallery)
                .collect(),
            MediaKind::Performer => state
                .performers
                .iter()
                .filter(|p| carries(p.tags.as_slice()))
                .cloned()
                .map(MediaRef::Performer)
                .collect(),
            MediaKind::Marker => state
                .markers
                .iter()
                .filter(|m| carries(m.tags.as_slice()))
                .cloned()
                .map(MediaRef::Marker)
                .collect(),
        };
        Ok(found)
    }

    async fn update_media(&self, update: &MediaUpdate) -> Result<()> {
        let mut state = self.lock();
        let refs = state.tag_refs(update.tag_ids())?;
        let missing = || {
            SyncError::InvalidResponse(format!(
                "{} {} does not exist",
                update.kind(),
                update.id()
            ))
        };

        match update {
            MediaUpdate::Scene { id, .. } => {
                let scene = state
                    .scenes
                    .iter_mut()
                    .find(|s| &s.id == id)
                    .ok_or_else(missing)?;
                scene.tags = refs;
            }
            MediaUpdate::Gallery { id, .. } => {
                let gallery = state
                    .galleries
                    .iter_mut()
                    .find(|g| &g.id == id)
                    .ok_or_else(missing)?;
                gallery.tags = refs;
            }
            MediaUpdate::Performer { id, .. } => {
                let performer = state
                    .performers
                    .iter_mut()
                    .find(|p| &p.id == id)
                    .ok_or_else(missing)?;
                performer.tags = refs;
            }
            MediaUpdate::Marker(payload) => {
                let marker = state
                    .markers
                    .iter_mut()
                    .find(|m| m.id == payload.id)
                    .ok_or_else(missing)?;
                marker.tags = refs;
                marker.title = payload.title.clone();
                marker.seconds = payload.seconds;
                marker.scene_id = payload.scene_id.clone();
                marker.primary_tag_id = payload.primary_tag_id.clone();
            }
        }
        state.writes += 1;
        Ok(())
    }
}
