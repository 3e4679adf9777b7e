use std::fmt::{Display, Formatter};

use crate::{ids::TagId, tag::TagRef};

/// Catalog entity kinds that can carry tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MediaKind {
    Scene,
    Gallery,
    Performer,
    Marker,
}

impl MediaKind {
    /// Every kind, in the order alias migration walks them.
    pub const ALL: [MediaKind; 4] = [
        MediaKind::Scene,
        MediaKind::Gallery,
        MediaKind::Performer,
        MediaKind::Marker,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Scene => "scene",
            MediaKind::Gallery => "gallery",
            MediaKind::Performer => "performer",
            MediaKind::Marker => "marker",
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            MediaKind::Scene => "scenes",
            MediaKind::Gallery => "galleries",
            MediaKind::Performer => "performers",
            MediaKind::Marker => "markers",
        }
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub id: String,
    pub title: Option<String>,
    pub tags: Vec<TagRef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Gallery {
    pub id: String,
    pub title: Option<String>,
    pub tags: Vec<TagRef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Performer {
    pub id: String,
    pub name: String,
    pub tags: Vec<TagRef>,
}

/// A scene marker. Stash requires the full marker payload on every update,
/// so the fields needed to rebuild it travel with the reference.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneMarker {
    pub id: String,
    pub title: String,
    pub seconds: f64,
    pub scene_id: String,
    pub primary_tag_id: TagId,
    pub tags: Vec<TagRef>,
}

/// Any catalog entity that carries tags.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaRef {
    Scene(Scene),
    Gallery(Gallery),
    Performer(Performer),
    Marker(SceneMarker),
}

impl MediaRef {
    pub fn kind(&self) -> MediaKind {
        match self {
            MediaRef::Scene(_) => MediaKind::Scene,
            MediaRef::Gallery(_) => MediaKind::Gallery,
            MediaRef::Performer(_) => MediaKind::Performer,
            MediaRef::Marker(_) => MediaKind::Marker,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            MediaRef::Scene(scene) => &scene.id,
            MediaRef::Gallery(gallery) => &gallery.id,
            MediaRef::Performer(performer) => &performer.id,
            MediaRef::Marker(marker) => &marker.id,
        }
    }

    pub fn tags(&self) -> &[TagRef] {
        match self {
            MediaRef::Scene(scene) => &scene.tags,
            MediaRef::Gallery(gallery) => &gallery.tags,
            MediaRef::Performer(performer) => &performer.tags,
            MediaRef::Marker(marker) => &marker.tags,
        }
    }

    /// Human readable label used in log lines.
    pub fn label(&self) -> String {
        match self {
            MediaRef::Scene(Scene { id, title, .. })
            | MediaRef::Gallery(Gallery { id, title, .. }) => title
                .as_deref()
                .filter(|t| !t.trim().is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("#{id}")),
            MediaRef::Performer(performer) => performer.name.clone(),
            MediaRef::Marker(marker) => format!("#{}", marker.id),
        }
    }

    pub fn tag_ids(&self) -> Vec<TagId> {
        self.tags().iter().map(|tag| tag.id.clone()).collect()
    }

    pub fn has_tag(&self, id: &TagId) -> bool {
        self.tags().iter().any(|tag| &tag.id == id)
    }

    /// Build the full tag-set update for this entity with `tag_ids` as the
    /// new tag list.
    pub fn update_with(&self, tag_ids: Vec<TagId>) -> MediaUpdate {
        match self {
            MediaRef::Scene(scene) => MediaUpdate::Scene {
                id: scene.id.clone(),
                tag_ids,
            },
            MediaRef::Gallery(gallery) => MediaUpdate::Gallery {
                id: gallery.id.clone(),
                tag_ids,
            },
            MediaRef::Performer(performer) => MediaUpdate::Performer {
                id: performer.id.clone(),
                tag_ids,
            },
            MediaRef::Marker(marker) => MediaUpdate::Marker(MarkerPayload {
                id: marker.id.clone(),
                tag_ids,
                title: marker.title.clone(),
                seconds: marker.seconds,
                scene_id: marker.scene_id.clone(),
                primary_tag_id: marker.primary_tag_id.clone(),
            }),
        }
    }
}

/// Complete marker update payload.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerPayload {
    pub id: String,
    pub tag_ids: Vec<TagId>,
    pub title: String,
    pub seconds: f64,
    pub scene_id: String,
    pub primary_tag_id: TagId,
}

/// Full tag-set update for one media entity.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaUpdate {
    Scene { id: String, tag_ids: Vec<TagId> },
    Gallery { id: String, tag_ids: Vec<TagId> },
    Performer { id: String, tag_ids: Vec<TagId> },
    Marker(MarkerPayload),
}

impl MediaUpdate {
    pub fn kind(&self) -> MediaKind {
        match self {
            MediaUpdate::Scene { .. } => MediaKind::Scene,
            MediaUpdate::Gallery { .. } => MediaKind::Gallery,
            MediaUpdate::Performer { .. } => MediaKind::Performer,
            MediaUpdate::Marker(_) => MediaKind::Marker,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            MediaUpdate::Scene { id, .. }
            | MediaUpdate::Gallery { id, .. }
            | MediaUpdate::Performer { id, .. } => id,
            MediaUpdate::Marker(payload) => &payload.id,
        }
    }

    pub fn tag_ids(&self) -> &[TagId] {
        match self {
            MediaUpdate::Scene { tag_ids, .. }
            | MediaUpdate::Gallery { tag_ids, .. }
            | MediaUpdate::Performer { tag_ids, .. } => tag_ids,
            MediaUpdate::Marker(payload) => &payload.tag_ids,
        }
    }
}
