use actix_web::get;
use actix_web::web::{Data, Json};
use serde::{Deserialize, Serialize};

use crate::database::{Database, DatabaseHealth};
use crate::utils::Envelope;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthBody {
    pub status: String,
    pub database: DatabaseHealth,
}

#[get("/health")]
#[tracing::instrument(skip(db))]
pub async fn health(db: Data<Box<dyn Database>>) -> Json<Envelope<HealthBody>> {
    let body = HealthBody {
        status: "OK".into(),
        database: db.health().await,
    };

    Json(Envelope::success(body, "Campaign Tracker API is running"))
}
