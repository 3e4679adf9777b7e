use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use tagsync_model::{
    Gallery, LocalTag, MediaKind, MediaRef, MediaUpdate, Performer, Scene,
    SceneMarker, TagId, TagRef,
};
use tracing::debug;
use url::Url;

use super::{CatalogRepository, TagCreate, TagUpdate};
use crate::{error::Result, graphql::GraphQlClient};

const TAG_FIELDS: &str = "id name aliases description";

const FIND_TAGS: &str = r#"
query FindTags($tag_filter: TagFilterType) {
  findTags(tag_filter: $tag_filter, filter: { per_page: -1 }) {
    tags { id name aliases description }
  }
}"#;

const FIND_SCENES: &str = r#"
query FindScenes($scene_filter: SceneFilterType) {
  findScenes(scene_filter: $scene_filter, filter: { per_page: -1, sort: "title", direction: ASC }) {
    scenes { id title tags { id name } }
  }
}"#;

const FIND_GALLERIES: &str = r#"
query FindGalleries($gallery_filter: GalleryFilterType) {
  findGalleries(gallery_filter: $gallery_filter, filter: { per_page: -1, sort: "title", direction: ASC }) {
    galleries { id title tags { id name } }
  }
}"#;

const FIND_PERFORMERS: &str = r#"
query FindPerformers($performer_filter: PerformerFilterType) {
  findPerformers(performer_filter: $performer_filter, filter: { per_page: -1, sort: "name", direction: ASC }) {
    performers { id name tags { id name } }
  }
}"#;

const FIND_MARKERS: &str = r#"
query FindSceneMarkers($scene_marker_filter: SceneMarkerFilterType) {
  findSceneMarkers(scene_marker_filter: $scene_marker_filter, filter: { per_page: -1 }) {
    scene_markers { id title seconds scene { id } primary_tag { id } tags { id name } }
  }
}"#;

/// Stash GraphQL client implementing the catalog port.
#[derive(Debug, Clone)]
pub struct StashClient {
    client: GraphQlClient,
}

#[derive(Deserialize)]
struct FindTagsData {
    #[serde(rename = "findTags")]
    find_tags: TagList,
}

#[derive(Deserialize)]
struct TagList {
    tags: Vec<LocalTag>,
}

#[derive(Deserialize)]
struct IdOnly {
    id: String,
}

#[derive(Deserialize)]
struct WireScene {
    id: String,
    title: Option<String>,
    #[serde(default)]
    tags: Vec<TagRef>,
}

#[derive(Deserialize)]
struct WireGallery {
    id: String,
    title: Option<String>,
    #[serde(default)]
    tags: Vec<TagRef>,
}

#[derive(Deserialize)]
struct WirePerformer {
    id: String,
    name: String,
    #[serde(default)]
    tags: Vec<TagRef>,
}

#[derive(Deserialize)]
struct WireMarker {
    id: String,
    #[serde(default)]
    title: String,
    seconds: f64,
    scene: IdOnly,
    primary_tag: IdOnly,
    #[serde(default)]
    tags: Vec<TagRef>,
}

#[derive(Deserialize)]
struct FindScenesData {
    #[serde(rename = "findScenes")]
    result: ScenesPage,
}

#[derive(Deserialize)]
struct ScenesPage {
    scenes: Vec<WireScene>,
}

#[derive(Deserialize)]
struct FindGalleriesData {
    #[serde(rename = "findGalleries")]
    result: GalleriesPage,
}

#[derive(Deserialize)]
struct GalleriesPage {
    galleries: Vec<WireGallery>,
}

#[derive(Deserialize)]
struct FindPerformersData {
    #[serde(rename = "findPerformers")]
    result: PerformersPage,
}

#[derive(Deserialize)]
struct PerformersPage {
    performers: Vec<WirePerformer>,
}

#[derive(Deserialize)]
struct FindMarkersData {
    #[serde(rename = "findSceneMarkers")]
    result: MarkersPage,
}

#[derive(Deserialize)]
struct MarkersPage {
    scene_markers: Vec<WireMarker>,
}

impl From<WireScene> for MediaRef {
    fn from(w: WireScene) -> Self {
        MediaRef::Scene(Scene {
            id: w.id,
            title: w.title,
            tags: w.tags,
        })
    }
}

impl From<WireGallery> for MediaRef {
    fn from(w: WireGallery) -> Self {
        MediaRef::Gallery(Gallery {
            id: w.id,
            title: w.title,
            tags: w.tags,
        })
    }
}

impl From<WirePerformer> for MediaRef {
    fn from(w: WirePerformer) -> Self {
        MediaRef::Performer(Performer {
            id: w.id,
            name: w.name,
            tags: w.tags,
        })
    }
}

impl From<WireMarker> for MediaRef {
    fn from(w: WireMarker) -> Self {
        MediaRef::Marker(SceneMarker {
            id: w.id,
            title: w.title,
            seconds: w.seconds,
            scene_id: w.scene.id,
            primary_tag_id: TagId::new(w.primary_tag.id),
            tags: w.tags,
        })
    }
}

/// `{tags: {value: [id], modifier: INCLUDES}}` filter shared by every
/// media query.
fn tag_filter(tag: &TagId) -> Value {
    json!({
        "tags": {
            "value": [tag.as_str()],
            "modifier": "INCLUDES",
        }
    })
}

fn tag_update_input(input: &TagUpdate) -> Value {
    let mut body = json!({ "id": input.id.as_str() });
    if let Some(aliases) = &input.aliases {
        body["aliases"] = json!(aliases);
    }
    if let Some(description) = &input.description {
        body["description"] = json!(description);
    }
    body
}

fn media_update_input(update: &MediaUpdate) -> Value {
    let ids: Vec<&str> = update.tag_ids().iter().map(TagId::as_str).collect();
    match update {
        MediaUpdate::Marker(payload) => json!({
            "id": payload.id,
            "tag_ids": ids,
            "title": payload.title,
            "seconds": payload.seconds,
            "scene_id": payload.scene_id,
            "primary_tag_id": payload.primary_tag_id.as_str(),
        }),
        other => json!({
            "id": other.id(),
            "tag_ids": ids,
        }),
    }
}

fn media_mutation(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Scene => {
            "mutation SceneUpdate($input: SceneUpdateInput!) { sceneUpdate(input: $input) { id } }"
        }
        MediaKind::Gallery => {
            "mutation GalleryUpdate($input: GalleryUpdateInput!) { galleryUpdate(input: $input) { id } }"
        }
        MediaKind::Performer => {
            "mutation PerformerUpdate($input: PerformerUpdateInput!) { performerUpdate(input: $input) { id } }"
        }
        MediaKind::Marker => {
            "mutation SceneMarkerUpdate($input: SceneMarkerUpdateInput!) { sceneMarkerUpdate(input: $input) { id } }"
        }
    }
}

impl StashClient {
    pub fn new(endpoint: Url, api_key: Option<String>) -> Result<Self> {
        Ok(Self {
            client: GraphQlClient::new(endpoint, api_key)?,
        })
    }

    async fn find_tags_where(&self, criterion: &str, value: &str) -> Result<Vec<LocalTag>> {
        let variables = json!({
            "tag_filter": {
                criterion: { "value": value, "modifier": "EQUALS" }
            }
        });
        let data: FindTagsData = self.client.execute(FIND_TAGS, &variables).await?;
        Ok(data.find_tags.tags)
    }
}

#[async_trait]
impl CatalogRepository for StashClient {
    async fn find_tag(&self, name: &str) -> Result<Option<LocalTag>> {
        // Stash compares case-insensitively; narrow to exact matches here.
        let by_name = self.find_tags_where("name", name).await?;
        if let Some(tag) = by_name.into_iter().find(|t| t.name == name) {
            return Ok(Some(tag));
        }
        let by_alias = self.find_tags_where("aliases", name).await?;
        Ok(by_alias.into_iter().find(|t| t.has_alias(name)))
    }

    async fn create_tag(&self, input: &TagCreate) -> Result<LocalTag> {
        #[derive(Deserialize)]
        struct Data {
            #[serde(rename = "tagCreate")]
            tag: LocalTag,
        }
        let query = format!(
            "mutation TagCreate($input: TagCreateInput!) {{ tagCreate(input: $input) {{ {TAG_FIELDS} }} }}"
        );
        let mut body = json!({ "name": input.name });
        if let Some(description) = &input.description {
            body["description"] = json!(description);
        }
        let data: Data = self
            .client
            .execute(&query, &json!({ "input": body }))
            .await?;
        Ok(data.tag)
    }

    async fn update_tag(&self, input: &TagUpdate) -> Result<()> {
        let query = "mutation TagUpdate($input: TagUpdateInput!) { tagUpdate(input: $input) { id } }";
        let _: Value = self
            .client
            .execute(query, &json!({ "input": tag_update_input(input) }))
            .await?;
        Ok(())
    }

    async fn merge_tags(&self, source: &TagId, destination: &TagId) -> Result<()> {
        let query = "mutation TagsMerge($input: TagsMergeInput!) { tagsMerge(input: $input) { id } }";
        let variables = json!({
            "input": {
                "source": [source.as_str()],
                "destination": destination.as_str(),
            }
        });
        let _: Value = self.client.execute(query, &variables).await?;
        Ok(())
    }

    async fn find_media_by_tag(
        &self,
        kind: MediaKind,
        tag: &TagId,
    ) -> Result<Vec<MediaRef>> {
        let filter = tag_filter(tag);
        let found: Vec<MediaRef> = match kind {
            MediaKind::Scene => {
                let data: FindScenesData = self
                    .client
                    .execute(FIND_SCENES, &json!({ "scene_filter": filter }))
                    .await?;
                data.result.scenes.into_iter().map(Into::into).collect()
            }
            MediaKind::Gallery => {
                let data: FindGalleriesData = self
                    .client
                    .execute(FIND_GALLERIES, &json!({ "gallery_filter": filter }))
                    .await?;
                data.result.galleries.into_iter().map(Into::into).collect()
            }
            MediaKind::Performer => {
                let data: FindPerformersData = self
                    .client
                    .execute(FIND_PERFORMERS, &json!({ "performer_filter": filter }))
                    .await?;
                data.result.performers.into_iter().map(Into::into).collect()
            }
            MediaKind::Marker => {
                let data: FindMarkersData = self
                    .client
                    .execute(FIND_MARKERS, &json!({ "scene_marker_filter": filter }))
                    .await?;
                data.result.scene_markers.into_iter().map(Into::into).collect()
            }
        };
        debug!(kind = %kind, tag = %tag, count = found.len(), "queried media by tag");
        Ok(found)
    }

    async fn update_media(&self, update: &MediaUpdate) -> Result<()> {
        let _: Value = self
            .client
            .execute(
                media_mutation(update.kind()),
                &json!({ "input": media_update_input(update) }),
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagsync_model::MarkerPayload;

    #[test]
    fn marker_input_carries_required_fields() {
        let update = MediaUpdate::Marker(MarkerPayload {
            id: "12".into(),
            tag_ids: vec![TagId::from("3"), TagId::from("8")],
            title: "Intro".into(),
            seconds: 42.0,
            scene_id: "5".into(),
            primary_tag_id: TagId::from("3"),
        });
        let input = media_update_input(&update);
        assert_eq!(
            input,
            json!({
                "id": "12",
                "tag_ids": ["3", "8"],
                "title": "Intro",
                "seconds": 42.0,
                "scene_id": "5",
                "primary_tag_id": "3",
            })
        );
    }

    #[test]
    fn scene_input_is_id_and_tags_only() {
        let update = MediaUpdate::Scene {
            id: "1".into(),
            tag_ids: vec![TagId::from("2")],
        };
        assert_eq!(
            media_update_input(&update),
            json!({ "id": "1", "tag_ids": ["2"] })
        );
    }

    #[test]
    fn tag_update_only_sends_present_fields() {
        let update = TagUpdate::aliases(TagId::from("4"), vec!["Foot Fetish".into()]);
        assert_eq!(
            tag_update_input(&update),
            json!({ "id": "4", "aliases": ["Foot Fetish"] })
        );
    }

    #[test]
    fn marker_wire_shape_flattens_nested_ids() {
        let wire: WireMarker = serde_json::from_value(json!({
            "id": "9",
            "title": "Kiss",
            "seconds": 61.5,
            "scene": { "id": "4" },
            "primary_tag": { "id": "7" },
            "tags": [{ "id": "7", "name": "Kissing" }]
        }))
        .unwrap();
        let MediaRef::Marker(marker) = MediaRef::from(wire) else {
            panic!("expected marker");
        };
        assert_eq!(marker.scene_id, "4");
        assert_eq!(marker.primary_tag_id, TagId::from("7"));
        assert_eq!(marker.tags[0].name, "Kissing");
    }
}
