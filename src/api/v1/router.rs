use super::error::*;
use super::handler;
use crate::domain_model::UserId;
use crate::server::Server;
use std::convert::Infallible;
use std::sync::Arc;
use warp::{Filter, reject};

use crate::api::v1::handler::{RelationshipQuery, SuggestionQuery};

pub fn routes(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let send_friend_request = warp::post()
        .and(warp::path("friend_request"))
        .and(warp::path::end())
        .and(warp::body::json())
        .and(with_identity())
        .and(with(server.relationship_service.clone()))
        .and_then(handler::send_friend_request);

    let cancel_friend_request = warp::post()
        .and(warp::path("friend_request_cancel"))
        .and(warp::path::end())
        .and(warp::body::json())
        .and(with_identity())
        .and(with(server.relationship_service.clone()))
        .and_then(handler::cancel_friend_request);

    let accept_friend_request = warp::post()
        .and(warp::path("friend_request_accept"))
        .and(warp::path::end())
        .and(warp::body::json())
        .and(with_identity())
        .and(with(server.relationship_service.clone()))
        .and_then(handler::accept_friend_request);

    let decline_friend_request = warp::post()
        .and(warp::path("friend_request_decline"))
        .and(warp::path::end())
        .and(warp::body::json())
        .and(with_identity())
        .and(with(server.relationship_service.clone()))
        .and_then(handler::decline_friend_request);

    let block_user = warp::post()
        .and(warp::path("block"))
        .and(warp::path::end())
        .and(warp::body::json())
        .and(with_identity())
        .and(with(server.relationship_service.clone()))
        .and_then(handler::block_user);

    let unblock_user = warp::post()
        .and(warp::path("unblock"))
        .and(warp::path::end())
        .and(warp::body::json())
        .and(with_identity())
        .and(with(server.relationship_service.clone()))
        .and_then(handler::unblock_user);

    let relationship_status = warp::get()
        .and(warp::path("relationship"))
        .and(warp::path::end())
        .and(warp::query::<RelationshipQuery>())
        .and(with_identity())
        .and(with(server.relationship_service.clone()))
        .and_then(handler::relationship_status);

    let friend_list = warp::get()
        .and(warp::path("friend_list"))
        .and(warp::path::end())
        .and(with_identity())
        .and(with(server.relationship_service.clone()))
        .and_then(handler::friend_list);

    let friend_request_list = warp::get()
        .and(warp::path("friend_requests"))
        .and(warp::path::end())
        .and(with_identity())
        .and(with(server.relationship_service.clone()))
        .and_then(handler::friend_request_list);

    let friend_suggestions = warp::get()
        .and(warp::path("friend_suggestions"))
        .and(warp::path::end())
        .and(warp::query::<SuggestionQuery>())
        .and(with_identity())
        .and(with(server.relationship_service.clone()))
        .and_then(handler::friend_suggestions);

    let notification_list = warp::get()
        .and(warp::path("notifications"))
        .and(warp::path::end())
        .and(with_identity())
        .and(with(server.notification_service.clone()))
        .and_then(handler::notification_list);

    let notifications_stream = warp::get()
        .and(warp::path("notifications_stream"))
        .and(warp::path::end())
        .and(with_identity())
        .and(warp::ws())
        .and(with(server.notification_service.clone()))
        .map(
            |user_id: UserId,
             ws: warp::ws::Ws,
             notification_service: Arc<dyn crate::application_port::NotificationService>| {
                ws.on_upgrade(move |socket| {
                    handler::notifications_stream(socket, user_id, notification_service)
                })
            },
        );

    let mark_notification_read = warp::post()
        .and(warp::path("notification_read"))
        .and(warp::path::end())
        .and(warp::body::json())
        .and(with_identity())
        .and(with(server.notification_service.clone()))
        .and_then(handler::mark_notification_read);

    let mark_all_notifications_read = warp::post()
        .and(warp::path("notifications_read_all"))
        .and(warp::path::end())
        .and(with_identity())
        .and(with(server.notification_service.clone()))
        .and_then(handler::mark_all_notifications_read);

    let unread_notification_count = warp::get()
        .and(warp::path("notifications_unread_count"))
        .and(warp::path::end())
        .and(with_identity())
        .and(with(server.notification_service.clone()))
        .and_then(handler::unread_notification_count);

    let delete_notification = warp::post()
        .and(warp::path("notification_delete"))
        .and(warp::path::end())
        .and(warp::body::json())
        .and(with_identity())
        .and(with(server.notification_service.clone()))
        .and_then(handler::delete_notification);

    let register_device_token = warp::post()
        .and(warp::path("device_token"))
        .and(warp::path::end())
        .and(warp::body::json())
        .and(with_identity())
        .and(with(server.device_token_registry.clone()))
        .and_then(handler::register_device_token);

    let remove_device_token = warp::post()
        .and(warp::path("device_token_remove"))
        .and(warp::path::end())
        .and(with_identity())
        .and(with(server.device_token_registry.clone()))
        .and_then(handler::remove_device_token);

    let register_user = warp::post()
        .and(warp::path("users"))
        .and(warp::path::end())
        .and(warp::body::json())
        .and(with(server.user_directory.clone()))
        .and_then(handler::register_user);

    send_friend_request
        .or(cancel_friend_request)
        .or(accept_friend_request)
        .or(decline_friend_request)
        .or(block_user)
        .or(unblock_user)
        .or(relationship_status)
        .or(friend_list)
        .or(friend_request_list)
        .or(friend_suggestions)
        .or(notification_list)
        .or(notifications_stream)
        .or(mark_notification_read)
        .or(mark_all_notifications_read)
        .or(unread_notification_count)
        .or(delete_notification)
        .or(register_device_token)
        .or(remove_device_token)
        .or(register_user)
}

fn with<T: Clone + Send>(
    value: T,
) -> impl Filter<Extract = (T,), Error = Infallible> + Clone {
    warp::any().map(move || value.clone())
}

/// Caller identity from the `x-user-id` header. Authentication itself lives
/// upstream; this boundary trusts the gateway.
fn with_identity() -> impl Filter<Extract = (UserId,), Error = warp::Rejection> + Clone {
    warp::header::<String>("x-user-id").and_then(|raw: String| async move {
        raw.parse::<UserId>()
            .map_err(|_| reject::custom(ApiErrorCode::InvalidIdentity))
    })
}
