use super::error::*;
use crate::application_port::*;
use crate::domain_model::*;
use crate::infra_memory::MemoryUserDirectory;
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warp::{self, reject};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(code: ApiErrorCode, message: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(ApiError {
                code,
                message: message.into(),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TargetRequest {
    pub target: UserId,
}

#[derive(Debug, Serialize)]
pub struct Done;

pub async fn send_friend_request(
    body: TargetRequest,
    user_id: UserId,
    relationship_service: Arc<dyn RelationshipService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    relationship_service
        .send_request(user_id, body.target)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;
    Ok(warp::reply::json(&ApiResponse::ok(Done)))
}

pub async fn cancel_friend_request(
    body: TargetRequest,
    user_id: UserId,
    relationship_service: Arc<dyn RelationshipService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    relationship_service
        .cancel_request(user_id, body.target)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;
    Ok(warp::reply::json(&ApiResponse::ok(Done)))
}

pub async fn accept_friend_request(
    body: TargetRequest,
    user_id: UserId,
    relationship_service: Arc<dyn RelationshipService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    relationship_service
        .accept_request(user_id, body.target)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;
    Ok(warp::reply::json(&ApiResponse::ok(Done)))
}

pub async fn decline_friend_request(
    body: TargetRequest,
    user_id: UserId,
    relationship_service: Arc<dyn RelationshipService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    relationship_service
        .decline_request(user_id, body.target)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;
    Ok(warp::reply::json(&ApiResponse::ok(Done)))
}

pub async fn block_user(
    body: TargetRequest,
    user_id: UserId,
    relationship_service: Arc<dyn RelationshipService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    relationship_service
        .block_user(user_id, body.target)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;
    Ok(warp::reply::json(&ApiResponse::ok(Done)))
}

pub async fn unblock_user(
    body: TargetRequest,
    user_id: UserId,
    relationship_service: Arc<dyn RelationshipService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    relationship_service
        .unblock_user(user_id, body.target)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;
    Ok(warp::reply::json(&ApiResponse::ok(Done)))
}

#[derive(Debug, Deserialize)]
pub struct RelationshipQuery {
    pub other: UserId,
}

#[derive(Debug, Serialize)]
pub struct RelationshipStatusResponse {
    pub status: RelationshipStatus,
}

pub async fn relationship_status(
    query: RelationshipQuery,
    user_id: UserId,
    relationship_service: Arc<dyn RelationshipService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let status = relationship_service
        .relationship_status(user_id, query.other)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;
    Ok(warp::reply::json(&ApiResponse::ok(
        RelationshipStatusResponse { status },
    )))
}

pub async fn friend_list(
    user_id: UserId,
    relationship_service: Arc<dyn RelationshipService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let friends = relationship_service
        .list_friends(user_id)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;
    Ok(warp::reply::json(&ApiResponse::ok(friends)))
}

pub async fn friend_request_list(
    user_id: UserId,
    relationship_service: Arc<dyn RelationshipService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let requests = relationship_service
        .list_friend_requests(user_id)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;
    Ok(warp::reply::json(&ApiResponse::ok(requests)))
}

#[derive(Debug, Deserialize)]
pub struct SuggestionQuery {
    pub limit: PageSize,
}

pub async fn friend_suggestions(
    query: SuggestionQuery,
    user_id: UserId,
    relationship_service: Arc<dyn RelationshipService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let suggestions = relationship_service
        .friend_suggestions(user_id, query.limit)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;
    Ok(warp::reply::json(&ApiResponse::ok(suggestions)))
}

pub async fn notification_list(
    user_id: UserId,
    notification_service: Arc<dyn NotificationService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let notifications = notification_service
        .my_notifications(user_id)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;
    Ok(warp::reply::json(&ApiResponse::ok(notifications)))
}

/// Pushes newest-first snapshots of the caller's notification list over a
/// websocket; the connection going away cancels the underlying subscription.
pub async fn notifications_stream(
    socket: warp::ws::WebSocket,
    user_id: UserId,
    notification_service: Arc<dyn NotificationService>,
) {
    let (mut sink, _) = socket.split();
    let mut feed = match notification_service.observe_my_notifications(user_id).await {
        Ok(feed) => feed,
        Err(e) => {
            tracing::warn!(%user_id, "notification feed: {e}");
            return;
        }
    };
    while let Some(snapshot) = feed.next().await {
        let payload = match serde_json::to_string(&snapshot) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(%user_id, "serialize snapshot: {e}");
                continue;
            }
        };
        if sink.send(warp::ws::Message::text(payload)).await.is_err() {
            break;
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NotificationIdRequest {
    pub id: NotificationId,
}

pub async fn mark_notification_read(
    body: NotificationIdRequest,
    user_id: UserId,
    notification_service: Arc<dyn NotificationService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    notification_service
        .mark_read(user_id, body.id)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;
    Ok(warp::reply::json(&ApiResponse::ok(Done)))
}

pub async fn mark_all_notifications_read(
    user_id: UserId,
    notification_service: Arc<dyn NotificationService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    notification_service
        .mark_all_read(user_id)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;
    Ok(warp::reply::json(&ApiResponse::ok(Done)))
}

#[derive(Debug, Serialize)]
pub struct UnreadCountResponse {
    pub unread: usize,
}

pub async fn unread_notification_count(
    user_id: UserId,
    notification_service: Arc<dyn NotificationService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let unread = notification_service
        .unread_count(user_id)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;
    Ok(warp::reply::json(&ApiResponse::ok(UnreadCountResponse {
        unread,
    })))
}

pub async fn delete_notification(
    body: NotificationIdRequest,
    user_id: UserId,
    notification_service: Arc<dyn NotificationService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    notification_service
        .delete_notification(user_id, body.id)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;
    Ok(warp::reply::json(&ApiResponse::ok(Done)))
}

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub token: String,
}

pub async fn register_device_token(
    body: TokenRequest,
    user_id: UserId,
    device_token_registry: Arc<dyn DeviceTokenRegistry>,
) -> Result<impl warp::Reply, warp::Rejection> {
    device_token_registry
        .register_token(user_id, &body.token)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;
    Ok(warp::reply::json(&ApiResponse::ok(Done)))
}

pub async fn remove_device_token(
    user_id: UserId,
    device_token_registry: Arc<dyn DeviceTokenRegistry>,
) -> Result<impl warp::Reply, warp::Rejection> {
    device_token_registry
        .remove_token(user_id)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;
    Ok(warp::reply::json(&ApiResponse::ok(Done)))
}

#[derive(Debug, Deserialize)]
pub struct RegisterUserRequest {
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterUserResponse {
    pub user_id: UserId,
}

/// Directory shim standing in for the out-of-scope identity provider; gives
/// clients a way to seed users the relationship graph can address.
pub async fn register_user(
    body: RegisterUserRequest,
    user_directory: Arc<MemoryUserDirectory>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let username = body.username.trim();
    if username.is_empty() {
        return Err(reject::custom(ApiErrorCode::InvalidInput(
            "empty username".to_owned(),
        )));
    }
    let user_id = user_directory.add_by_name(username);
    Ok(warp::reply::json(&ApiResponse::ok(RegisterUserResponse {
        user_id,
    })))
}
