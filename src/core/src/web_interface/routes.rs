use std::convert::Infallible;
use std::sync::Arc;

use warp::path::Tail;
use warp::{http::StatusCode, reply, Filter, Rejection, Reply};

use super::connection::client_connection;
use super::types::ApiError;
use crate::assets::{asset_response, HeadTags};
use crate::session_management::{SessionHooks, SessionManager};

fn with_manager(
    manager: Arc<SessionManager>,
) -> impl Filter<Extract = (Arc<SessionManager>,), Error = Infallible> + Clone {
    warp::any().map(move || manager.clone())
}

/// Demo page carrying the injected head tags.
pub fn render_page(head: &HeadTags, app_name: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>{app}</title>\n{head}\n</head>\n\
         <body><h1>{app}</h1><p>Storage bridge connected. See /sessions for JSON.</p></body></html>",
        app = app_name,
        head = head.render()
    )
}

/// GET /
pub fn dashboard_route(page: Arc<String>) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path::end()
        .and(warp::get())
        .map(move || reply::html(page.as_str().to_string()))
}

/// GET /:mount/:file
pub fn assets_route(mount: String) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path(mount)
        .and(warp::path::tail())
        .and(warp::get())
        .and_then(|tail: Tail| async move {
            match asset_response(tail.as_str()) {
                Some((body, mime)) => Ok(reply::with_header(body, "Content-Type", mime)),
                None => Err(warp::reject::not_found()),
            }
        })
}

/// GET /sessions
pub fn list_sessions_route(
    manager: Arc<SessionManager>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path("sessions")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_manager(manager))
        .map(|manager: Arc<SessionManager>| reply::json(&manager.list_sessions()))
}

/// GET /ws
pub fn websocket_route(
    manager: Arc<SessionManager>,
    hooks: Arc<dyn SessionHooks>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path("ws")
        .and(warp::path::end())
        .and(warp::ws())
        .and(with_manager(manager))
        .map(move |ws: warp::ws::Ws, manager: Arc<SessionManager>| {
            let hooks = hooks.clone();
            ws.on_upgrade(move |socket| client_connection(socket, manager, hooks))
        })
}

/// Turns rejections into JSON errors.
pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found")
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
    } else {
        (StatusCode::BAD_REQUEST, "Bad request")
    };
    Ok(reply::with_status(
        reply::json(&ApiError {
            message: message.to_string(),
        }),
        status,
    ))
}
