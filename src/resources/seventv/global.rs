//! 7TV global cosmetics.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clients::graphql::{GraphqlResponse, Operation, Upstream, Upstreams};
use crate::resources::seventv::queries::{BADGES_AND_PAINTS, BADGES_AND_PAINTS_DOCUMENT};
use crate::resources::ResourceError;

#[derive(Debug, Default, Deserialize)]
struct CosmeticsData {
    badges: Option<BadgeList>,
    paints: Option<PaintList>,
}

#[derive(Debug, Default, Deserialize)]
struct BadgeList {
    badges: Option<Vec<Value>>,
}

#[derive(Debug, Default, Deserialize)]
struct PaintList {
    paints: Option<Vec<Value>>,
}

/// The `/7tv/BadgesPaints` response.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgesPaints {
    /// Entries carrying an `id`.
    pub badge_count: usize,
    pub badges: Vec<Value>,
    /// Entries carrying an `id`.
    pub paint_count: usize,
    pub paints: Vec<Value>,
}

/// Fetches every 7TV badge and paint.
///
/// # Errors
///
/// - [`ResourceError::EmptyResponse`] if 7TV answers without `data`
/// - [`ResourceError::Graphql`] if the request fails
pub async fn badges_and_paints(upstreams: &Upstreams) -> Result<BadgesPaints, ResourceError> {
    let op = Operation::query(Upstream::SevenTv, BADGES_AND_PAINTS_DOCUMENT).named(BADGES_AND_PAINTS);
    let reply = upstreams.execute(&op).await?;
    shape(&op, &reply)
}

fn shape(op: &Operation, reply: &GraphqlResponse) -> Result<BadgesPaints, ResourceError> {
    if reply.data.as_ref().map_or(true, Value::is_null) {
        return Err(ResourceError::EmptyResponse {
            message: "No data returned from 7TV",
        });
    }

    let data: CosmeticsData = reply.data_as(op)?;
    let badges = data.badges.and_then(|b| b.badges).unwrap_or_default();
    let paints = data.paints.and_then(|p| p.paints).unwrap_or_default();

    Ok(BadgesPaints {
        badge_count: count_with_id(&badges),
        badges,
        paint_count: count_with_id(&paints),
        paints,
    })
}

fn count_with_id(entries: &[Value]) -> usize {
    entries
        .iter()
        .filter(|entry| entry.get("id").is_some_and(|id| !id.is_null()))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn op() -> Operation {
        Operation::query(Upstream::SevenTv, BADGES_AND_PAINTS_DOCUMENT).named(BADGES_AND_PAINTS)
    }

    #[test]
    fn test_counts_only_entries_with_ids() {
        let reply: GraphqlResponse = serde_json::from_value(json!({ "data": {
            "badges": { "badges": [{ "id": "b1", "name": "A" }, { "id": null }, null] },
            "paints": { "paints": [{ "id": "p1" }, { "id": "p2" }] }
        } }))
        .unwrap();

        let shaped = shape(&op(), &reply).unwrap();
        assert_eq!(shaped.badge_count, 1);
        assert_eq!(shaped.badges.len(), 3);
        assert_eq!(shaped.paint_count, 2);
    }

    #[test]
    fn test_missing_data_is_empty_response() {
        let reply = GraphqlResponse::default();
        assert!(matches!(
            shape(&op(), &reply),
            Err(ResourceError::EmptyResponse { message: "No data returned from 7TV" })
        ));
    }
}
