//! Tutorial app: a root greeting and an item lookup with one required and
//! two optional query parameters.

use routebind_rs::prelude::*;
use serde_json::json;

/// Body of `GET /items/{item_id}`.
#[derive(Debug, Serialize)]
pub struct Item {
    pub item_id: String,
    pub needy: String,
    pub skip: i64,
    pub limit: Option<i64>,
}

pub async fn root() -> Json<serde_json::Value> {
    Json(json!({ "message": "Hello World" }))
}

pub async fn read_user_item(bound: BoundRequest) -> Result<Json<Item>> {
    let item = Item {
        item_id: bound.get("item_id")?,
        needy: bound.get("needy")?,
        skip: bound.get("skip")?,
        limit: bound.get("limit")?,
    };
    debug!(item_id = %item.item_id, skip = item.skip, "Reading item");
    Ok(Json(item))
}

/// Build the app with both routes registered.
pub fn app() -> std::result::Result<App, RouteError> {
    App::new().route("/", get(root))?.route(
        "/items/{item_id}",
        get(read_user_item)
            .query("needy", ParamType::Str)
            .query_default("skip", ParamType::Int, 0)
            .query("limit", ParamType::optional(ParamType::Int)),
    )
}
